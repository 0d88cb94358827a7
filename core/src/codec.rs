//! Serialization strategies for request and response bodies.
//!
//! # Design
//! `Serializer` and `Deserializer` are dyn-compatible so a client can swap
//! them at runtime. Typed values travel through serde's data model as a
//! `serde_json::Value`: `encode` turns a `T: Serialize` into a `Value` and
//! hands it to the serializer, `decode` does the reverse. A codec is free to
//! pick any wire encoding for that tree.
//!
//! A `Converter` is any type that is both. `Codecs` is the client's slot for
//! all three and enforces that at least one way to serialize and one way to
//! deserialize always remains configured.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("deserialization failed: {0}")]
    Deserialize(String),
}

/// Encoded request body produced by a `Serializer`.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedBody {
    pub content: Bytes,
    pub content_type: String,
    pub charset: String,
}

impl SerializedBody {
    /// Value for the `content-type` header, e.g. `application/json; charset=utf-8`.
    pub fn content_type_header(&self) -> String {
        if self.charset.is_empty() {
            self.content_type.clone()
        } else {
            format!("{}; charset={}", self.content_type, self.charset)
        }
    }
}

pub trait Serializer: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<SerializedBody, CodecError>;
}

pub trait Deserializer: Send + Sync {
    fn deserialize(&self, content: &[u8]) -> Result<Value, CodecError>;
}

/// A single strategy that serializes and deserializes.
pub trait Converter: Serializer + Deserializer {}

impl<T: Serializer + Deserializer> Converter for T {}

/// Serialize `value` with `serializer`.
pub fn encode<T: Serialize + ?Sized>(
    serializer: &dyn Serializer,
    value: &T,
) -> Result<SerializedBody, CodecError> {
    let tree = serde_json::to_value(value).map_err(|e| CodecError::Serialize(e.to_string()))?;
    serializer.serialize(&tree)
}

/// Deserialize `content` into `T` with `deserializer`.
pub fn decode<T: DeserializeOwned>(
    deserializer: &dyn Deserializer,
    content: &[u8],
) -> Result<T, CodecError> {
    let tree = deserializer.deserialize(content)?;
    serde_json::from_value(tree).map_err(|e| CodecError::Deserialize(e.to_string()))
}

/// JSON codec, the default converter of every client.
///
/// An empty body decodes as `null`, so `()` and `Option<T>` accept
/// responses without content.
#[derive(Debug, Clone, Default)]
pub struct JsonConverter {
    pretty: bool,
}

impl JsonConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonConverter {
    fn serialize(&self, value: &Value) -> Result<SerializedBody, CodecError> {
        let content = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(|e| CodecError::Serialize(e.to_string()))?;
        Ok(SerializedBody {
            content: Bytes::from(content),
            content_type: "application/json".to_string(),
            charset: "utf-8".to_string(),
        })
    }
}

impl Deserializer for JsonConverter {
    fn deserialize(&self, content: &[u8]) -> Result<Value, CodecError> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(content).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

/// A converter split into its two capabilities.
#[derive(Clone)]
struct ConverterSlot {
    serializer: Arc<dyn Serializer>,
    deserializer: Arc<dyn Deserializer>,
}

impl ConverterSlot {
    fn new<C: Converter + 'static>(converter: Arc<C>) -> Self {
        Self {
            serializer: converter.clone(),
            deserializer: converter,
        }
    }
}

/// Codec configuration of a client.
///
/// Resolution order: a dedicated `Serializer`/`Deserializer` wins over the
/// `Converter`. Per-call codecs are layered on top by the client.
#[derive(Clone)]
pub struct Codecs {
    serializer: Option<Arc<dyn Serializer>>,
    deserializer: Option<Arc<dyn Deserializer>>,
    converter: Option<ConverterSlot>,
}

impl Default for Codecs {
    /// A `JsonConverter` and no dedicated serializer or deserializer.
    fn default() -> Self {
        Self {
            serializer: None,
            deserializer: None,
            converter: Some(ConverterSlot::new(Arc::new(JsonConverter::new()))),
        }
    }
}

impl std::fmt::Debug for Codecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codecs")
            .field("serializer", &self.serializer.is_some())
            .field("deserializer", &self.deserializer.is_some())
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

impl Codecs {
    pub fn set_serializer(&mut self, serializer: Arc<dyn Serializer>) {
        self.serializer = Some(serializer);
    }

    /// Fails when no converter is configured to fall back on.
    pub fn clear_serializer(&mut self) -> Result<(), ConfigError> {
        if self.converter.is_none() {
            return Err(ConfigError::CodecRequired { property: "Serializer" });
        }
        self.serializer = None;
        Ok(())
    }

    pub fn set_deserializer(&mut self, deserializer: Arc<dyn Deserializer>) {
        self.deserializer = Some(deserializer);
    }

    /// Fails when no converter is configured to fall back on.
    pub fn clear_deserializer(&mut self) -> Result<(), ConfigError> {
        if self.converter.is_none() {
            return Err(ConfigError::CodecRequired { property: "Deserializer" });
        }
        self.deserializer = None;
        Ok(())
    }

    pub fn set_converter<C: Converter + 'static>(&mut self, converter: Arc<C>) {
        self.converter = Some(ConverterSlot::new(converter));
    }

    /// Fails unless both a serializer and a deserializer are configured.
    pub fn clear_converter(&mut self) -> Result<(), ConfigError> {
        if self.serializer.is_none() || self.deserializer.is_none() {
            return Err(ConfigError::ConverterRequired);
        }
        self.converter = None;
        Ok(())
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn serializer(&self) -> Result<Arc<dyn Serializer>, ConfigError> {
        match (&self.serializer, &self.converter) {
            (Some(serializer), _) => Ok(serializer.clone()),
            (None, Some(slot)) => Ok(slot.serializer.clone()),
            (None, None) => Err(ConfigError::CodecRequired { property: "Serializer" }),
        }
    }

    pub fn deserializer(&self) -> Result<Arc<dyn Deserializer>, ConfigError> {
        match (&self.deserializer, &self.converter) {
            (Some(deserializer), _) => Ok(deserializer.clone()),
            (None, Some(slot)) => Ok(slot.deserializer.clone()),
            (None, None) => Err(ConfigError::CodecRequired { property: "Deserializer" }),
        }
    }
}
