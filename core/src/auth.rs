//! Authentication strategies applied to every outgoing request.
//!
//! An `Authenticator` attaches credentials before each attempt and is told
//! when the server rejects them. It never decides whether a call is retried;
//! that belongs to the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::http::{HttpRequest, HttpResponse};

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("credential refresh failed: {0}")]
    Refresh(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Attach credentials to `request`. Called before every attempt.
    async fn authenticate(&self, request: &mut HttpRequest) -> Result<(), AuthError>;

    /// Notification that `request` was answered with 401.
    async fn on_authorization_failure(&self, request: &HttpRequest, response: &HttpResponse);
}

/// Source of fresh bearer tokens, e.g. an OAuth refresh-token exchange.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<String, AuthError>;
}

/// Sends `Authorization: Bearer <token>`.
///
/// With a `TokenRefresher`, a rejected token is replaced before the
/// pipeline's retry so the second attempt carries the new one.
pub struct BearerAuthenticator {
    token: RwLock<String>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl BearerAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(token.into()),
            refresher: None,
        }
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub async fn token(&self) -> String {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = token.into();
    }
}

#[async_trait]
impl Authenticator for BearerAuthenticator {
    async fn authenticate(&self, request: &mut HttpRequest) -> Result<(), AuthError> {
        let token = self.token.read().await;
        if token.is_empty() {
            return Err(AuthError::MissingCredentials("bearer token is empty".to_string()));
        }
        request.set_header("authorization", format!("Bearer {}", token));
        Ok(())
    }

    async fn on_authorization_failure(&self, request: &HttpRequest, response: &HttpResponse) {
        tracing::warn!(
            method = %request.method,
            uri = %request.uri,
            status = response.status,
            "bearer token rejected"
        );
        let Some(refresher) = &self.refresher else {
            return;
        };
        match refresher.refresh().await {
            Ok(token) => self.set_token(token).await,
            Err(e) => tracing::warn!(error = %e, "keeping previous bearer token"),
        }
    }
}
