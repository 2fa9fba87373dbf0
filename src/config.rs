//! Runtime configuration.
//!
//! Values come from CLI flags, then environment variables, then defaults.

use crate::error::{Result, ServiceError};
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "highlights.sqlite3";
pub const DEFAULT_USER_ID: &str = "demo-user";
pub const DEFAULT_QUEUE_LIMIT: usize = 10;

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    #[arg(long = "db", env = "HIGHLIGHTS_DB", default_value = DEFAULT_DATABASE_PATH, global = true)]
    pub database_path: PathBuf,

    /// User whose highlights are read and written
    #[arg(long = "user", env = "HIGHLIGHTS_USER", default_value = DEFAULT_USER_ID, global = true)]
    pub user_id: String,

    /// Maximum number of items returned by the review queue
    #[arg(long, env = "HIGHLIGHTS_QUEUE_LIMIT", default_value_t = DEFAULT_QUEUE_LIMIT, global = true)]
    pub queue_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            user_id: DEFAULT_USER_ID.to_string(),
            queue_limit: DEFAULT_QUEUE_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ServiceError::Validation("user id must not be empty".to_string()));
        }
        if self.queue_limit == 0 {
            return Err(ServiceError::Validation(
                "queue limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
