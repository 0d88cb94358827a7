//! The "send one request, get one response" boundary.
//!
//! The pipeline depends only on `Transport`. `ReqwestTransport` is the
//! default implementation; connection pooling, TLS and DNS stay inside
//! reqwest.

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange. `request.uri` must be absolute.
    ///
    /// The returned response has its body fully read.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = reqwest::Url::parse(&request.uri).map_err(|e| TransportError::InvalidRequest {
            message: format!("{:?} is not an absolute url", request.uri),
            source: Some(Box::new(e)),
        })?;

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await.map_err(classify)?;

        tracing::trace!(status, bytes = body.len(), "response received");
        Ok(HttpResponse { status, headers, body })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
fn classify(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout {
            message,
            source: Some(Box::new(error)),
        }
    } else if error.is_connect() {
        TransportError::Connect {
            message,
            source: Some(Box::new(error)),
        }
    } else if error.is_builder() {
        TransportError::InvalidRequest {
            message,
            source: Some(Box::new(error)),
        }
    } else {
        TransportError::Other {
            message,
            source: Some(Box::new(error)),
        }
    }
}
