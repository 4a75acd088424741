use crate::config::ConfigError;
use crate::webhook::WebhookError;

/// Errors that can occur in the TUI layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, worker thread, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The webhook client could not be set up.
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}
