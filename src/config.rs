use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::genai::GeminiConfig;
use crate::models::Role;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://school_dashboard.db?mode=rwc";
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 480;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffAccount {
    pub role: Role,
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub session_idle_timeout: Duration,
    pub gemini: Option<GeminiConfig>,
    pub accounts: Vec<StaffAccount>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let idle_minutes = match env::var("SESSION_IDLE_MINUTES") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("SESSION_IDLE_MINUTES is invalid: {}", e)))?,
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };

        let accounts = [
            staff_account_from_env(Role::Admin, "ADMIN_EMAIL", "ADMIN_PASSWORD", "ADMIN_NAME", "Administrator"),
            staff_account_from_env(Role::Teacher, "TEACHER_USERNAME", "TEACHER_PASSWORD", "TEACHER_NAME", "Teacher"),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self {
            bind_addr,
            database_url,
            session_idle_timeout: Duration::from_secs(idle_minutes * 60),
            gemini: GeminiConfig::new_from_env(),
            accounts,
        })
    }
}

fn staff_account_from_env(
    role: Role,
    username_var: &str,
    password_var: &str,
    name_var: &str,
    default_name: &str,
) -> Option<StaffAccount> {
    let username = env::var(username_var).ok().filter(|v| !v.trim().is_empty());
    let password = env::var(password_var).ok().filter(|v| !v.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Some(StaffAccount {
            role,
            username: username.trim().to_string(),
            password,
            name: env::var(name_var).unwrap_or_else(|_| default_name.to_string()),
        }),
        _ => {
            warn!(
                "{} or {} is not set; {:?} login is disabled",
                username_var, password_var, role
            );
            None
        }
    }
}
