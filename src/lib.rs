pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod services;

pub use error::ServiceError;
pub use models::{Highlight, QueueItem, Rating, ReviewState, compute_next_review, select_due};
