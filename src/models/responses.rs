//! Response-side types: full content with metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JoystickError, Result};

/// Versioning and segmentation metadata, passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub uid: Option<i64>,
    #[serde(rename = "mod", default)]
    pub modified: Option<i64>,
    #[serde(default)]
    pub variants: Option<Vec<Value>>,
    #[serde(default)]
    pub seg: Option<Vec<Value>>,
}

/// A full-format response: the content plus its metadata and hash.
///
/// `T` is `serde_json::Value` for structured reads and `String` for serialized
/// reads, where it holds the escaped JSON text of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullContent<T> {
    pub data: T,
    pub meta: Meta,
    pub hash: String,
}

/// Wire shape of a full response before `data` is projected.
#[derive(Debug, Deserialize)]
struct RawFullContent {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    hash: String,
}

impl FullContent<Value> {
    /// Reads a full-format document, keeping `data` as a structured value.
    pub fn from_document(document: Value) -> Result<Self> {
        let raw = decode_full(document)?;
        Ok(Self {
            data: raw.data,
            meta: raw.meta,
            hash: raw.hash,
        })
    }
}

impl FullContent<String> {
    /// Reads a full-format document of a serialized response, turning `data`
    /// into its JSON text with the enclosing quotes stripped.
    pub fn from_serialized_document(document: Value) -> Result<Self> {
        let raw = decode_full(document)?;
        Ok(Self {
            data: serialized_text(&raw.data),
            meta: raw.meta,
            hash: raw.hash,
        })
    }
}

fn decode_full(document: Value) -> Result<RawFullContent> {
    serde_json::from_value(document).map_err(|source| JoystickError::Decode {
        target: "FullContent",
        source,
    })
}

/// Structured content from the `data` of a serialized response.
///
/// A string holds the JSON text of the content and is parsed back; any other
/// value is already structured and is returned as is.
pub fn deserialize_data(data: Value) -> Result<Value> {
    match data {
        Value::String(text) => serde_json::from_str(&text).map_err(|source| {
            JoystickError::unknown_with("Serialized content is not in JSON format", source)
        }),
        other => Ok(other),
    }
}

/// JSON text of `value` with one pair of enclosing double quotes removed.
///
/// For a serialized payload `"{\"a\":1}"` this yields `{\"a\":1}`: the escapes
/// stay in place, only the outer quotes go.
pub fn serialized_text(value: &Value) -> String {
    strip_enclosing_quotes(&value.to_string()).to_string()
}

/// Removes a single leading and trailing `"` when both are present.
pub fn strip_enclosing_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}
