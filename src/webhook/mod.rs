//! Outbound delivery of a completed form to the sheet webhook.
//!
//! Delivery is a single JSON `POST`. In the default [`DeliveryMode::Opaque`]
//! mode the response is never inspected, so the only failure a caller can
//! observe is a transport error (DNS, refused connection, timeout).

mod client;
mod error;

use std::future::Future;

use crate::model::EnquiryFormData;

pub use client::{DeliveryMode, WebhookClient};
pub use error::WebhookError;

/// Something that accepts a finished form for delivery.
///
/// Implemented by [`WebhookClient`]; tests substitute in-memory fakes.
pub trait EnquirySink {
    /// Sends `form` once. No retries are attempted.
    fn deliver(
        &self,
        form: &EnquiryFormData,
    ) -> impl Future<Output = Result<(), WebhookError>> + Send;
}

/// Builds a transport error without touching the network.
#[cfg(test)]
pub(crate) fn test_transport_error() -> WebhookError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("relative URL cannot be built");
    WebhookError::Transport(err)
}
