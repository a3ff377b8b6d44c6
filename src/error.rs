/// Errors raised at the host API boundary

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWrite(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Tab operation failed: {0}")]
    Tabs(String),

    #[error("Window operation failed: {0}")]
    Windows(String),

    #[error("Menu operation failed: {0}")]
    Menus(String),

    #[error("Failed to decode host value: {0}")]
    Decode(String),
}
