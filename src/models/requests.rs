//! Request-side types: wire bodies and per-call options.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigurationError, Result};

/// Longest description accepted by the publish endpoint, in characters after trimming.
pub const MAX_DESCRIPTION_LENGTH: usize = 50;

/// Body of every read request.
///
/// `v` is omitted entirely when no semantic version is configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody<'a> {
    #[serde(rename = "u")]
    pub user_id: &'a str,
    #[serde(rename = "p")]
    pub params: BTreeMap<&'a str, &'a Value>,
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    pub sem_ver: Option<&'a str>,
}

impl<'a> RequestBody<'a> {
    pub fn new(user_id: &'a str, params: &'a HashMap<String, Value>, sem_ver: Option<&'a str>) -> Self {
        Self {
            user_id,
            params: params.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            sem_ver: sem_ver.filter(|v| !v.is_empty()),
        }
    }
}

/// Whether read responses carry `data` as a nested document or as escaped JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Json,
    Serialized,
}

/// Per-call options for the typed accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Skip the cache lookup; the fresh result is still written to the cache
    pub refresh: bool,
}

impl ContentOptions {
    /// Options that bypass the cache lookup.
    pub fn refresh() -> Self {
        Self { refresh: true }
    }
}

// == Publish Data ==
/// Payload of a content update, serialized as `{"d", "c", "m"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishData {
    #[serde(rename = "d")]
    description: String,
    #[serde(rename = "c")]
    content: Value,
    #[serde(rename = "m")]
    dynamic_content_map: Vec<Value>,
}

impl PublishData {
    pub fn builder() -> PublishDataBuilder {
        PublishDataBuilder::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn dynamic_content_map(&self) -> &[Value] {
        &self.dynamic_content_map
    }
}

#[derive(Debug, Default)]
pub struct PublishDataBuilder {
    description: Option<String>,
    content: Option<Value>,
    dynamic_content_map: Vec<Value>,
}

impl PublishDataBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn dynamic_content_map(mut self, entries: Vec<Value>) -> Self {
        self.dynamic_content_map = entries;
        self
    }

    /// Validates and builds the payload.
    ///
    /// The description must hold 1 to 50 characters once trimmed and the
    /// content must be present and non-null.
    pub fn build(self) -> Result<PublishData> {
        let description = self.description.ok_or(ConfigurationError::MissingDescription)?;
        let length = description.trim().chars().count();
        if !(1..=MAX_DESCRIPTION_LENGTH).contains(&length) {
            return Err(ConfigurationError::InvalidDescriptionLength(length).into());
        }

        let content = self
            .content
            .filter(|content| !content.is_null())
            .ok_or(ConfigurationError::MissingContent)?;

        Ok(PublishData {
            description,
            content,
            dynamic_content_map: self.dynamic_content_map,
        })
    }
}
