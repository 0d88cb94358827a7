//! Execution of one logical HTTP call.
//!
//! # Design
//! `Pipeline::execute` authenticates the request, sends it through the
//! `Transport`, and classifies the outcome:
//!
//! - transport failure: `RestError` tagged by its cause, never retried;
//! - 2xx: the response is returned;
//! - 401 on the first attempt with an `Authenticator` configured: the
//!   authenticator is notified and the request is sent once more;
//! - anything else: `RestError` carrying the request, response and body.
//!
//! The retry is a bounded loop guarded by `first_attempt`, so a second 401
//! is terminal no matter what the authenticator does. The pipeline holds no
//! per-call state and can be shared across tasks. Dropping the returned
//! future cancels the in-flight exchange and any pending retry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::error::{Error, RestError, TransportError};
use crate::events::{AuthorizationFailed, FailureListener, RequestFailed};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Hook given every non-success response before it is classified.
///
/// It may return a replacement, for example after refreshing credentials and
/// resending through `transport`. Returning the response unchanged leaves
/// classification as it was.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
        transport: &dyn Transport,
    ) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    authenticator: Option<Arc<dyn Authenticator>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    listeners: Vec<Arc<dyn FailureListener>>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            authenticator: None,
            error_handler: None,
            listeners: Vec::new(),
        }
    }

    pub fn set_authenticator(&mut self, authenticator: Option<Arc<dyn Authenticator>>) {
        self.authenticator = authenticator;
    }

    pub fn set_error_handler(&mut self, handler: Option<Arc<dyn ErrorHandler>>) {
        self.error_handler = handler;
    }

    pub fn add_listener(&mut self, listener: Arc<dyn FailureListener>) {
        self.listeners.push(listener);
    }

    /// Execute `request` with the single authorization retry enabled.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self.execute_with(request, true).await
    }

    /// Execute `request`; `auth_retry = false` makes a 401 terminal.
    pub async fn execute_with(&self, request: HttpRequest, auth_retry: bool) -> Result<HttpResponse, Error> {
        let span = tracing::debug_span!(
            "rest_call",
            call_id = %Uuid::new_v4(),
            method = %request.method,
            uri = %request.uri,
        );
        self.run(request, auth_retry).instrument(span).await
    }

    async fn run(&self, mut request: HttpRequest, auth_retry: bool) -> Result<HttpResponse, Error> {
        let mut first_attempt = true;
        loop {
            if let Some(authenticator) = &self.authenticator {
                authenticator.authenticate(&mut request).await?;
            }

            tracing::debug!(first_attempt, "sending request");
            let response = match self.transport.send(&request).await {
                Ok(response) => response,
                Err(cause) => return Err(self.connection_failed(request, cause)),
            };

            let response = match &self.error_handler {
                Some(handler) if !response.is_success() => {
                    match handler.handle(&request, response, self.transport.as_ref()).await {
                        Ok(response) => response,
                        Err(cause) => return Err(self.connection_failed(request, cause)),
                    }
                }
                _ => response,
            };

            if response.is_success() {
                tracing::debug!(status = response.status, "request succeeded");
                return Ok(response);
            }

            if response.is_unauthorized() && first_attempt && auth_retry {
                if let Some(authenticator) = &self.authenticator {
                    first_attempt = false;
                    tracing::warn!("unauthorized, retrying once");
                    authenticator.on_authorization_failure(&request, &response).await;
                    self.notify_authorization_failed(&request, &response);
                    continue;
                }
            }

            tracing::warn!(status = response.status, "request failed");
            self.notify_request_failed(&request, Some(&response));
            return Err(RestError::from_response(request, response).into());
        }
    }

    fn connection_failed(&self, request: HttpRequest, cause: TransportError) -> Error {
        tracing::warn!(error = %cause, "transport failure");
        self.notify_request_failed(&request, None);
        RestError::from_transport(request, cause).into()
    }

    fn notify_request_failed(&self, request: &HttpRequest, response: Option<&HttpResponse>) {
        let event = RequestFailed { request, response };
        for listener in &self.listeners {
            listener.on_request_failed(&event);
        }
    }

    fn notify_authorization_failed(&self, request: &HttpRequest, response: &HttpResponse) {
        let event = AuthorizationFailed { request, response };
        for listener in &self.listeners {
            listener.on_authorization_failed(&event);
        }
    }
}
