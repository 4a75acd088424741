/// Errors that can occur while delivering a form to the webhook.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never completed (DNS failure, refused connection, timeout).
    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    ///
    /// Only produced in [`DeliveryMode::Checked`](super::DeliveryMode::Checked).
    #[error("webhook rejected the submission with status {0}")]
    Status(reqwest::StatusCode),

    /// The delivery worker stopped before the request could be sent.
    #[error("delivery worker is not running")]
    WorkerStopped,
}
