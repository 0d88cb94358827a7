//! Failure notifications raised by the pipeline.
//!
//! Listeners are registered explicitly on the client and called
//! synchronously from the pipeline, in registration order.

use crate::http::{HttpRequest, HttpResponse};

/// A logical call failed terminally.
///
/// `response` is `None` when the transport never produced one.
#[derive(Debug, Clone, Copy)]
pub struct RequestFailed<'a> {
    pub request: &'a HttpRequest,
    pub response: Option<&'a HttpResponse>,
}

/// A first attempt was answered with 401 and is about to be retried.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationFailed<'a> {
    pub request: &'a HttpRequest,
    pub response: &'a HttpResponse,
}

pub trait FailureListener: Send + Sync {
    /// Called exactly once per terminal failure.
    fn on_request_failed(&self, event: &RequestFailed<'_>);

    fn on_authorization_failed(&self, _event: &AuthorizationFailed<'_>) {}
}
