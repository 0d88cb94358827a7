//! Typed REST request pipeline.
//!
//! # Overview
//! Turns a logical call (method, path, typed payload) into an HTTP exchange
//! with pluggable serialization and authentication, a single retry after an
//! authorization failure, and one error type for every remote failure.
//!
//! # Design
//! - `Pipeline` owns the control flow: authenticate, send, classify, retry
//!   once on 401, translate failures into `RestError`.
//! - `Transport`, `Authenticator`, `Serializer`/`Deserializer`/`Converter`,
//!   `ErrorHandler` and `FailureListener` are traits, swapped at runtime as
//!   `Arc<dyn ...>`.
//! - `RestClient` is the typed facade: URL resolution against a base address
//!   and a `ResourceRegistry`, codec selection, then the pipeline.
//! - `ReqwestTransport` is the default transport; pooling, TLS and DNS are
//!   left to reqwest.

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod pipeline;
pub mod resource;
pub mod transport;

pub use auth::{AuthError, Authenticator, BearerAuthenticator, TokenRefresher};
pub use client::{CallOptions, RestClient, RestClientBuilder};
pub use codec::{CodecError, Converter, Deserializer, JsonConverter, SerializedBody, Serializer};
pub use config::ClientConfig;
pub use error::{ConfigError, Error, RestError, RestErrorKind, Result, TransportError};
pub use events::{AuthorizationFailed, FailureListener, RequestFailed};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pipeline::{ErrorHandler, Pipeline};
pub use resource::{ResolveError, Resource, ResourceRegistry};
pub use transport::{ReqwestTransport, Transport};
