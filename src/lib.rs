//! Pacer Backend Library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod progress;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repositories::*;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub group_repo: Arc<GroupRepository>,
    pub user_repo: Arc<UserRepository>,
    pub group_member_repo: Arc<GroupMemberRepository>,
    pub user_data_repo: Arc<UserDataRepository>,
    pub group_message_repo: Arc<GroupMessageRepository>,
}

impl AppState {
    /// Create a new AppState with initialized repositories
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            group_repo: Arc::new(GroupRepository::new(pool.clone())),
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            group_member_repo: Arc::new(GroupMemberRepository::new(pool.clone())),
            user_data_repo: Arc::new(UserDataRepository::new(pool.clone())),
            group_message_repo: Arc::new(GroupMessageRepository::new(pool)),
        }
    }
}
