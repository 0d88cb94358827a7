//! Error types for the REST pipeline.
//!
//! # Design
//! Every remote failure (the exchange could not complete, or the server
//! answered with a non-success status) surfaces as a single `RestError`
//! carrying the request, the response when one arrived, the raw body, and
//! the transport cause when there was one. Failures that point at the
//! caller's own setup (authentication mutation, serialization, configuration,
//! URL resolution) keep their own types and propagate unchanged through
//! `Error`.

use crate::auth::AuthError;
use crate::codec::CodecError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::ResolveError;

/// Boxed error used as the underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used by the pipeline and the typed facade.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The transport could not complete an exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Host unreachable, connection refused, DNS or TLS failure.
    #[error("connection failed: {message}")]
    Connect {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("request timed out: {message}")]
    Timeout {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The request could not be turned into a wire request (bad URL, bad header).
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("transport error: {message}")]
    Other {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl TransportError {
    pub fn connect(message: impl Into<String>) -> Self {
        TransportError::Connect {
            message: message.into(),
            source: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        TransportError::Timeout {
            message: message.into(),
            source: None,
        }
    }
}

/// Which failure path produced a `RestError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestErrorKind {
    /// The transport failed before any response was received.
    Connection,
    /// The request was rejected before it reached the network.
    InvalidRequest,
    /// A response arrived with a non-success status.
    Status,
}

/// The unified error for a failed REST call.
///
/// Built either from `(request, response)` after a non-success status, or
/// from `(message, request, cause)` after a transport failure. Both
/// constructors populate every field they own.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RestError {
    message: String,
    kind: RestErrorKind,
    request: HttpRequest,
    response: Option<HttpResponse>,
    content: Option<String>,
    #[source]
    source: Option<TransportError>,
}

impl RestError {
    /// A non-success response. The body is copied out as the raw error content.
    pub fn from_response(request: HttpRequest, response: HttpResponse) -> Self {
        let message = format!(
            "error requesting URL ({} {}): HTTP {}",
            request.method, request.uri, response.status
        );
        let content = response.text().into_owned();
        Self {
            message,
            kind: RestErrorKind::Status,
            request,
            response: Some(response),
            content: Some(content),
            source: None,
        }
    }

    /// A transport failure. No response is attached.
    pub fn from_transport(request: HttpRequest, cause: TransportError) -> Self {
        let (kind, what) = match &cause {
            TransportError::Connect { .. } => (RestErrorKind::Connection, "error connecting to server"),
            TransportError::Timeout { .. } => (RestErrorKind::Connection, "request timed out"),
            TransportError::Other { .. } => (RestErrorKind::Connection, "error communicating with server"),
            TransportError::InvalidRequest { .. } => (RestErrorKind::InvalidRequest, "invalid request"),
        };
        Self {
            message: format!("{what} ({} {})", request.method, request.uri),
            kind,
            request,
            response: None,
            content: None,
            source: Some(cause),
        }
    }

    pub fn kind(&self) -> RestErrorKind {
        self.kind
    }

    pub fn is_connection(&self) -> bool {
        self.kind == RestErrorKind::Connection
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Raw response body, when a response was received.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    /// The transport failure behind a connection error.
    pub fn cause(&self) -> Option<&TransportError> {
        self.source.as_ref()
    }
}

/// Invalid client configuration, reported when the setting is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot set both {property} and Converter to null")]
    CodecRequired { property: &'static str },

    #[error("cannot set Converter to null when any of Serializer or Deserializer is null")]
    ConverterRequired,

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build transport: {0}")]
    Transport(String),
}

/// Everything a call through the pipeline or the typed facade can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Rest(#[from] RestError),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl Error {
    pub fn as_rest(&self) -> Option<&RestError> {
        match self {
            Error::Rest(e) => Some(e),
            _ => None,
        }
    }

    /// Status code of the failed response, if the failure was a protocol error.
    pub fn status(&self) -> Option<u16> {
        self.as_rest().and_then(RestError::status)
    }
}
