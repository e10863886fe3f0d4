use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use school_dashboard::api::router;
use school_dashboard::auth::Authenticator;
use school_dashboard::config::AppConfig;
use school_dashboard::db;
use school_dashboard::genai;
use school_dashboard::services::{SWEEP_INTERVAL, SessionSweeper};
use school_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "school_dashboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;
    db::seed::seed_defaults(&pool).await?;

    let generator = genai::build_generator(config.gemini.clone())?;
    let state = AppState::new(pool, generator, Authenticator::new(config.accounts.clone()));

    let sweeper = SessionSweeper::new(
        state.sessions.clone(),
        config.session_idle_timeout,
        SWEEP_INTERVAL,
    );
    tokio::spawn(sweeper.start());

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
