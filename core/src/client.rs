//! Typed facade over the request pipeline.
//!
//! # Design
//! `RestClient` turns a verb, a path and an optional payload into an
//! `HttpRequest`, resolves its URL (resource prefix, then base address),
//! picks codecs, and runs it through the `Pipeline`. Configuration is set
//! through `&mut self` before the client is shared; calls only need `&self`
//! and keep no per-call state on the client.
//!
//! Codec precedence for a call: the codec in `CallOptions`, then a dedicated
//! `Serializer`/`Deserializer`, then the `Converter`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::Authenticator;
use crate::codec::{self, Codecs, Converter, Deserializer, Serializer};
use crate::config::ClientConfig;
use crate::error::{ConfigError, Result};
use crate::events::FailureListener;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::pipeline::{ErrorHandler, Pipeline};
use crate::resource::{self, Resource, ResourceRegistry};
use crate::transport::{ReqwestTransport, Transport};

/// Per-call overrides.
#[derive(Clone)]
pub struct CallOptions {
    append_resource_path: bool,
    serializer: Option<Arc<dyn Serializer>>,
    deserializer: Option<Arc<dyn Deserializer>>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            append_resource_path: true,
            serializer: None,
            deserializer: None,
        }
    }
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the path exactly as given, ignoring the target type's resource prefix.
    pub fn without_resource_path(mut self) -> Self {
        self.append_resource_path = false;
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn deserializer(mut self, deserializer: Arc<dyn Deserializer>) -> Self {
        self.deserializer = Some(deserializer);
        self
    }

    pub fn converter<C: Converter + 'static>(self, converter: Arc<C>) -> Self {
        self.serializer(converter.clone()).deserializer(converter)
    }
}

/// Asynchronous REST client with pluggable codecs and authentication.
pub struct RestClient {
    pipeline: Pipeline,
    base_url: Option<Url>,
    codecs: Codecs,
    resources: ResourceRegistry,
    default_headers: Vec<(String, String)>,
}

impl RestClient {
    /// Client with default configuration rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ConfigError> {
        self.base_url = Some(parse_base(base_url)?);
        Ok(())
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn set_authenticator(&mut self, authenticator: Option<Arc<dyn Authenticator>>) {
        self.pipeline.set_authenticator(authenticator);
    }

    pub fn set_serializer(&mut self, serializer: Arc<dyn Serializer>) {
        self.codecs.set_serializer(serializer);
    }

    pub fn clear_serializer(&mut self) -> Result<(), ConfigError> {
        self.codecs.clear_serializer()
    }

    pub fn set_deserializer(&mut self, deserializer: Arc<dyn Deserializer>) {
        self.codecs.set_deserializer(deserializer);
    }

    pub fn clear_deserializer(&mut self) -> Result<(), ConfigError> {
        self.codecs.clear_deserializer()
    }

    pub fn set_converter<C: Converter + 'static>(&mut self, converter: Arc<C>) {
        self.codecs.set_converter(converter);
    }

    pub fn clear_converter(&mut self) -> Result<(), ConfigError> {
        self.codecs.clear_converter()
    }

    /// Resolve `path` for a call returning `T`.
    ///
    /// With `append_resource_path`, a relative path is prefixed with the
    /// resource path registered for `T` (or its element type).
    pub fn resolve<T: ?Sized + 'static>(&self, path: &str, append_resource_path: bool) -> Result<Url> {
        let prefix = if append_resource_path {
            self.resources.path_for::<T>()
        } else {
            None
        };
        let target = resource::prefixed_path(prefix, path);
        Ok(resource::resolve_url(self.base_url.as_ref(), &target)?)
    }

    pub async fn get<T: DeserializeOwned + 'static>(&self, path: &str) -> Result<T> {
        self.get_with(path, &CallOptions::default()).await
    }

    pub async fn get_with<T: DeserializeOwned + 'static>(&self, path: &str, options: &CallOptions) -> Result<T> {
        self.send::<T, ()>(HttpMethod::Get, path, None, options).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.post_with(path, body, &CallOptions::default()).await
    }

    pub async fn post_with<T, B>(&self, path: &str, body: &B, options: &CallOptions) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Post, path, Some(body), options).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.put_with(path, body, &CallOptions::default()).await
    }

    pub async fn put_with<T, B>(&self, path: &str, body: &B, options: &CallOptions) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Put, path, Some(body), options).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.patch_with(path, body, &CallOptions::default()).await
    }

    pub async fn patch_with<T, B>(&self, path: &str, body: &B, options: &CallOptions) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        self.send(HttpMethod::Patch, path, Some(body), options).await
    }

    pub async fn delete<T: DeserializeOwned + 'static>(&self, path: &str) -> Result<T> {
        self.delete_with(path, &CallOptions::default()).await
    }

    pub async fn delete_with<T: DeserializeOwned + 'static>(&self, path: &str, options: &CallOptions) -> Result<T> {
        self.send::<T, ()>(HttpMethod::Delete, path, None, options).await
    }

    /// Build, execute and decode one call.
    ///
    /// Codecs are selected before anything is sent, so a serialization
    /// failure never reaches the network.
    pub async fn send<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        options: &CallOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned + 'static,
        B: Serialize + ?Sized,
    {
        let url = self.resolve::<T>(path, options.append_resource_path)?;
        let request = self.build_request(method, &url, body, options)?;
        let deserializer = match &options.deserializer {
            Some(deserializer) => deserializer.clone(),
            None => self.codecs.deserializer()?,
        };

        let response = self.pipeline.execute(request).await?;
        Ok(codec::decode(deserializer.as_ref(), &response.body)?)
    }

    /// Send `body` without decoding the response.
    ///
    /// The resource prefix comes from the body's type, and any success body
    /// is discarded.
    pub async fn send_unit<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        options: &CallOptions,
    ) -> Result<()>
    where
        B: Serialize + ?Sized + 'static,
    {
        let url = self.resolve::<B>(path, options.append_resource_path)?;
        let request = self.build_request(method, &url, body, options)?;
        self.pipeline.execute(request).await?;
        Ok(())
    }

    pub async fn post_unit<B: Serialize + ?Sized + 'static>(&self, path: &str, body: &B) -> Result<()> {
        self.send_unit(HttpMethod::Post, path, Some(body), &CallOptions::default()).await
    }

    pub async fn put_unit<B: Serialize + ?Sized + 'static>(&self, path: &str, body: &B) -> Result<()> {
        self.send_unit(HttpMethod::Put, path, Some(body), &CallOptions::default()).await
    }

    /// `DELETE` whose response body, if any, is ignored. No resource prefix applies.
    pub async fn delete_unit(&self, path: &str) -> Result<()> {
        self.send_unit::<()>(HttpMethod::Delete, path, None, &CallOptions::default()).await
    }

    fn build_request<B>(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<&B>,
        options: &CallOptions,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut request = HttpRequest::new(method, url.as_str());
        for (name, value) in &self.default_headers {
            request.set_header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            let serializer = match &options.serializer {
                Some(serializer) => serializer.clone(),
                None => self.codecs.serializer()?,
            };
            request = request.with_body(codec::encode(serializer.as_ref(), body)?);
        }
        Ok(request)
    }

    /// Execute a hand-built request; a relative `uri` is resolved against the
    /// base address first.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with(request, true).await
    }

    pub async fn execute_with(&self, mut request: HttpRequest, auth_retry: bool) -> Result<HttpResponse> {
        request.uri = resource::resolve_url(self.base_url.as_ref(), &request.uri)?.into();
        self.pipeline.execute_with(request, auth_retry).await
    }
}

fn parse_base(base_url: &str) -> Result<Url, ConfigError> {
    resource::normalize_base(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Default)]
pub struct RestClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    listeners: Vec<Arc<dyn FailureListener>>,
    codecs: Codecs,
    resources: ResourceRegistry,
}

impl RestClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Replace the default `ReqwestTransport`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn listener(mut self, listener: Arc<dyn FailureListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn converter<C: Converter + 'static>(mut self, converter: Arc<C>) -> Self {
        self.codecs.set_converter(converter);
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.codecs.set_serializer(serializer);
        self
    }

    pub fn deserializer(mut self, deserializer: Arc<dyn Deserializer>) -> Self {
        self.codecs.set_deserializer(deserializer);
        self
    }

    /// Register `T`'s resource path (and `Vec<T>`'s).
    pub fn resource<T: Resource + 'static>(mut self) -> Self {
        self.resources.register::<T>();
        self
    }

    pub fn build(self) -> Result<RestClient, ConfigError> {
        let base_url = self.config.base_url.as_deref().map(parse_base).transpose()?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        let mut pipeline = Pipeline::new(transport);
        pipeline.set_authenticator(self.authenticator);
        pipeline.set_error_handler(self.error_handler);
        for listener in self.listeners {
            pipeline.add_listener(listener);
        }

        Ok(RestClient {
            pipeline,
            base_url,
            codecs: self.codecs,
            resources: self.resources,
            default_headers: self.config.default_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde::Deserialize;
    use serde_json::Value;

    use super::*;
    use crate::codec::{CodecError, JsonConverter, SerializedBody};
    use crate::error::Error;
    use crate::pipeline::testing::{CountingAuthenticator, ScriptedTransport};
    use crate::resource::ResolveError;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Todo {
        #[serde(default)]
        id: u32,
        user_id: u32,
        title: String,
        #[serde(default)]
        completed: bool,
    }

    struct Post;

    impl Resource for Post {
        const PATH: &'static str = "posts/";
    }

    impl<'de> Deserialize<'de> for Post {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Value::deserialize(deserializer).map(|_| Post)
        }
    }

    const TODO_JSON: &str = r#"{"id":1,"userId":1,"title":"delectus aut autem","completed":false}"#;

    fn client(transport: Arc<ScriptedTransport>) -> RestClient {
        RestClient::builder()
            .base_url("http://localhost:3000")
            .transport(transport)
            .resource::<Post>()
            .build()
            .unwrap()
    }

    /// Codec that ignores its input and always produces the same marker.
    struct Marker(&'static str);

    impl Serializer for Marker {
        fn serialize(&self, _value: &Value) -> Result<SerializedBody, CodecError> {
            Ok(SerializedBody {
                content: Bytes::from_static(self.0.as_bytes()),
                content_type: "text/plain".to_string(),
                charset: String::new(),
            })
        }
    }

    impl Deserializer for Marker {
        fn deserialize(&self, _content: &[u8]) -> Result<Value, CodecError> {
            Ok(Value::String(self.0.to_string()))
        }
    }

    struct FailingSerializer;

    impl Serializer for FailingSerializer {
        fn serialize(&self, _value: &Value) -> Result<SerializedBody, CodecError> {
            Err(CodecError::Serialize("unsupported".to_string()))
        }
    }

    #[tokio::test]
    async fn get_resolves_relative_path_and_decodes() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, TODO_JSON)]);
        let client = client(transport.clone());

        let todo: Todo = client.get("todos/1").await.unwrap();
        assert_eq!(todo.id, 1);
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.uri, "http://localhost:3000/todos/1");
        assert_eq!(sent.header("accept"), Some("application/json"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn relative_and_absolute_paths_send_same_request() {
        let transport = ScriptedTransport::responses(vec![
            HttpResponse::new(200, TODO_JSON),
            HttpResponse::new(200, TODO_JSON),
        ]);
        let client = client(transport.clone());

        let relative: Todo = client.get("todos/1").await.unwrap();
        let first = transport.last();
        let absolute: Todo = client.get("http://localhost:3000/todos/1").await.unwrap();
        assert_eq!(relative, absolute);
        assert_eq!(first, transport.last());
    }

    #[tokio::test]
    async fn resource_path_is_prepended_for_type_and_vec() {
        let transport = ScriptedTransport::responses(vec![
            HttpResponse::new(200, "{}"),
            HttpResponse::new(200, "[]"),
            HttpResponse::new(200, "{}"),
            HttpResponse::new(200, "{}"),
        ]);
        let client = client(transport.clone());

        client.get::<Post>("1").await.unwrap();
        assert_eq!(transport.last().uri, "http://localhost:3000/posts/1");

        client.get::<Vec<Post>>("").await.unwrap();
        assert_eq!(transport.last().uri, "http://localhost:3000/posts/");

        client
            .get_with::<Post>("todos/1", &CallOptions::new().without_resource_path())
            .await
            .unwrap();
        assert_eq!(transport.last().uri, "http://localhost:3000/todos/1");

        client.get::<Post>("http://other.test/x").await.unwrap();
        assert_eq!(transport.last().uri, "http://other.test/x");
    }

    #[tokio::test]
    async fn post_serializes_body_with_content_type() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(
            201,
            r#"{"id":201,"userId":1,"title":"Lorem Ipsum"}"#,
        )]);
        let client = client(transport.clone());
        let input = Todo {
            id: 0,
            user_id: 1,
            title: "Lorem Ipsum".to_string(),
            completed: false,
        };

        let created: Todo = client.post("todos", &input).await.unwrap();
        assert_eq!(created.user_id, 1);
        assert_eq!(created.title, "Lorem Ipsum");

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.header("content-type"), Some("application/json; charset=utf-8"));
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["userId"], 1);
        assert_eq!(body["title"], "Lorem Ipsum");
    }

    #[tokio::test]
    async fn put_patch_and_delete_use_their_methods() {
        let transport = ScriptedTransport::responses(vec![
            HttpResponse::new(200, TODO_JSON),
            HttpResponse::new(200, TODO_JSON),
            HttpResponse::new(200, ""),
        ]);
        let client = client(transport.clone());
        let patch = serde_json::json!({"completed": true});

        let _: Todo = client.put("todos/1", &patch).await.unwrap();
        assert_eq!(transport.last().method, HttpMethod::Put);
        let _: Todo = client.patch("todos/1", &patch).await.unwrap();
        assert_eq!(transport.last().method, HttpMethod::Patch);
        client.delete::<()>("todos/1").await.unwrap();
        assert_eq!(transport.last().method, HttpMethod::Delete);
        assert!(transport.last().body.is_none());
    }

    #[tokio::test]
    async fn patch_with_honours_call_options() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, "ignored")]);
        let client = client(transport.clone());
        let options = CallOptions::new()
            .without_resource_path()
            .converter(Arc::new(Marker("patched")));

        let out: String = client.patch_with("todos/1", &1, &options).await.unwrap();
        assert_eq!(out, "patched");
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.uri, "http://localhost:3000/todos/1");
        assert_eq!(sent.body.as_deref(), Some(&b"patched"[..]));
    }

    #[derive(Serialize)]
    struct NewPost {
        title: String,
    }

    impl Resource for NewPost {
        const PATH: &'static str = "posts/";
    }

    #[tokio::test]
    async fn unit_calls_take_prefix_from_body_and_skip_decoding() {
        let transport = ScriptedTransport::responses(vec![
            HttpResponse::new(201, "not json"),
            HttpResponse::new(200, "{}"),
            HttpResponse::new(200, "{}"),
        ]);
        let client = RestClient::builder()
            .base_url("http://localhost:3000")
            .transport(transport.clone())
            .resource::<NewPost>()
            .build()
            .unwrap();
        let post = NewPost {
            title: "Lorem Ipsum".to_string(),
        };

        client.post_unit("", &post).await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.uri, "http://localhost:3000/posts/");
        assert_eq!(sent.header("content-type"), Some("application/json; charset=utf-8"));

        client.put_unit("7", &post).await.unwrap();
        assert_eq!(transport.last().uri, "http://localhost:3000/posts/7");

        client.delete_unit("todos/2").await.unwrap();
        assert_eq!(transport.last().method, HttpMethod::Delete);
        assert_eq!(transport.last().uri, "http://localhost:3000/todos/2");
    }

    #[tokio::test]
    async fn unit_call_still_reports_failures() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(404, "{}")]);
        let client = client(transport);

        let err = client.delete_unit("todos/800").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn per_call_codec_wins() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, "ignored")]);
        let client = client(transport.clone());
        let options = CallOptions::new().converter(Arc::new(Marker("per-call")));

        let out: String = client.post_with("echo", &1, &options).await.unwrap();
        assert_eq!(out, "per-call");
        assert_eq!(transport.last().body.as_deref(), Some(&b"per-call"[..]));
    }

    #[tokio::test]
    async fn dedicated_deserializer_wins_over_converter() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, TODO_JSON)]);
        let mut client = client(transport);
        client.set_converter(Arc::new(JsonConverter::new()));
        client.set_deserializer(Arc::new(Marker("dedicated")));

        let out: String = client.get("todos/1").await.unwrap();
        assert_eq!(out, "dedicated");
    }

    #[tokio::test]
    async fn serialization_failure_propagates_without_sending() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, "{}")]);
        let mut client = client(transport.clone());
        client.set_serializer(Arc::new(FailingSerializer));

        let err = client.post::<Value, _>("todos", &1).await.unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::Serialize(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn undecodable_body_is_codec_error() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(200, "not json")]);
        let client = client(transport);

        let err = client.get::<Todo>("todos/1").await.unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::Deserialize(_))));
    }

    #[tokio::test]
    async fn not_found_is_rest_error_with_body() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(404, "{}")]);
        let client = client(transport);

        let err = client.get::<Todo>("todos/800").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.as_rest().and_then(|e| e.content()), Some("{}"));
    }

    #[tokio::test]
    async fn execute_resolves_relative_request() {
        let transport = ScriptedTransport::responses(vec![HttpResponse::new(201, "{}")]);
        let client = client(transport.clone());
        let request = HttpRequest::new(HttpMethod::Post, "todos");

        let response = client.execute_with(request, false).await.unwrap();
        assert!(response.is_success());
        assert_eq!(transport.last().uri, "http://localhost:3000/todos");
    }

    #[tokio::test]
    async fn relative_path_without_base_is_resolve_error() {
        let transport = ScriptedTransport::responses(vec![]);
        let client = RestClient::builder().transport(transport.clone()).build().unwrap();

        let err = client.get::<Value>("todos").await.unwrap_err();
        assert!(matches!(err, Error::Resolve(ResolveError::MissingBase(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn authenticator_on_builder_reaches_pipeline() {
        let transport = ScriptedTransport::responses(vec![
            HttpResponse::new(401, ""),
            HttpResponse::new(200, TODO_JSON),
        ]);
        let auth = Arc::new(CountingAuthenticator::default());
        let client = RestClient::builder()
            .base_url("http://localhost:3000")
            .transport(transport.clone())
            .authenticator(auth.clone())
            .build()
            .unwrap();

        let todo: Todo = client.get("todos/1").await.unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(transport.calls(), 2);
        assert_eq!(auth.failures(), 1);
    }

    #[test]
    fn clearing_deserializer_without_converter_fails_at_configuration() {
        let mut client = client(ScriptedTransport::responses(vec![]));
        client.set_serializer(Arc::new(JsonConverter::new()));
        client.set_deserializer(Arc::new(JsonConverter::new()));
        client.clear_converter().unwrap();

        let err = client.clear_deserializer().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Deserializer"), "{msg}");
        assert!(msg.contains("Converter"), "{msg}");
    }

    #[test]
    fn clearing_deserializer_with_converter_succeeds() {
        let mut client = client(ScriptedTransport::responses(vec![]));
        client.set_deserializer(Arc::new(JsonConverter::new()));
        client.clear_deserializer().unwrap();
    }

    #[test]
    fn clearing_converter_with_missing_codec_fails() {
        let mut client = client(ScriptedTransport::responses(vec![]));
        client.set_serializer(Arc::new(JsonConverter::new()));
        assert_eq!(client.clear_converter(), Err(ConfigError::ConverterRequired));
    }

    #[test]
    fn invalid_base_url_fails_build() {
        let err = RestClient::builder()
            .base_url("not a url")
            .transport(ScriptedTransport::responses(vec![]))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn base_url_path_is_kept() {
        let mut client = client(ScriptedTransport::responses(vec![]));
        client.set_base_url("http://localhost:3000/api").unwrap();
        let url = client.resolve::<Todo>("todos", true).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/todos");
    }
}
