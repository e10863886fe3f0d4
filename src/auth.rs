use sqlx::SqlitePool;
use tracing::info;

use crate::config::StaffAccount;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{Role, User};

/// Login stub: students sign in with their class and roll number,
/// staff against the accounts from configuration.
#[derive(Clone, Debug, Default)]
pub struct Authenticator {
    accounts: Vec<StaffAccount>,
}

impl Authenticator {
    pub fn new(accounts: Vec<StaffAccount>) -> Self {
        Self { accounts }
    }

    pub async fn login(
        &self,
        db: &SqlitePool,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<User>, AppError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Ok(None);
        }

        let user = match role {
            Role::Student => {
                let roll = password.trim().parse::<u32>().ok().filter(|n| *n > 0);
                match roll {
                    Some(roll) => repository::class_exists(db, username).await?.then(|| User {
                        username: username.to_string(),
                        name: format!("Class {}, Roll {}", username, roll),
                        role,
                    }),
                    None => None,
                }
            }
            Role::Teacher | Role::Admin => self
                .accounts
                .iter()
                .find(|a| a.role == role && a.username == username && a.password == password)
                .map(|a| User {
                    username: a.username.clone(),
                    name: a.name.clone(),
                    role,
                }),
        };

        match &user {
            Some(u) => info!("login succeeded for {} ({:?})", u.username, u.role),
            None => info!("login rejected for {} ({:?})", username, role),
        }
        Ok(user)
    }
}
