/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `root`: Service identity
/// - `tasks`: Task CRUD
/// - `users`: User registration and listing
/// - `analytics`: Dashboard aggregates

use serde::{Deserialize, Serialize};

pub mod analytics;
pub mod health;
pub mod root;
pub mod tasks;
pub mod users;

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
