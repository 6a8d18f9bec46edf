//! Common types used across the frontend application.

/// A short notification shown in the corner of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    /// Timestamp string (HH:MM:SS)
    pub timestamp: String,
}

impl Toast {
    pub fn new(id: u64, message: &str) -> Self {
        Self {
            id,
            message: message.to_string(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}
