//! Request variants
//!
//! [`ApiEndpoint`] describes one call against the Joystick API: where it goes,
//! what it sends, how its cache key is derived and how the response document
//! is shaped before it reaches the caller.

pub mod multiple;
pub mod publish;
pub mod single;

pub use multiple::MultipleContentEndpoint;
pub use publish::PublishUpdateEndpoint;
pub use single::SingleContentEndpoint;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{JoystickError, Result};
use crate::models::RequestBody;
use crate::transport::HttpRequest;

// == Wire Constants ==
pub const READ_API_BASE: &str = "https://api.getjoystick.com/api/v1";
pub const PUBLISH_API_BASE: &str = "https://capi.getjoystick.com/api/v1";

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

const PARAM_RESPONSE_TYPE: &str = "responseType";
const RESPONSE_TYPE_SERIALIZED: &str = "serialized";
const NODE_DATA: &str = "data";

/// One of the three request shapes the client can issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEndpoint {
    Single(SingleContentEndpoint),
    Multiple(MultipleContentEndpoint),
    PublishUpdate(PublishUpdateEndpoint),
}

impl ApiEndpoint {
    /// Picks the read variant from the number of ids: one id reads a single
    /// config, more use the combine endpoint.
    ///
    /// # Errors
    /// [`JoystickError::InvalidArgument`] for an empty id list or a blank id.
    pub fn for_contents<S: AsRef<str>>(
        content_ids: &[S],
        serialized: bool,
        full_response: bool,
    ) -> Result<Self> {
        match content_ids {
            [] => Err(no_content_id()),
            [content_id] => Ok(Self::Single(SingleContentEndpoint::new(
                content_id.as_ref(),
                serialized,
                full_response,
            )?)),
            _ => Ok(Self::Multiple(MultipleContentEndpoint::new(
                content_ids,
                serialized,
                full_response,
            )?)),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Single(_) | Self::Multiple(_) => Method::POST,
            Self::PublishUpdate(_) => Method::PUT,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Self::Single(endpoint) => endpoint.url(),
            Self::Multiple(endpoint) => endpoint.url(),
            Self::PublishUpdate(endpoint) => endpoint.url(),
        }
    }

    pub fn query_parameters(&self) -> Vec<(String, String)> {
        match self {
            Self::Single(endpoint) => endpoint.query_parameters(),
            Self::Multiple(endpoint) => endpoint.query_parameters(),
            Self::PublishUpdate(_) => Vec::new(),
        }
    }

    /// Encoded request body. Reads send `{"u", "p", "v"}` built from the
    /// configuration; publish sends its own payload.
    pub fn request_body(&self, config: &ClientConfig) -> Result<Vec<u8>> {
        match self {
            Self::Single(_) | Self::Multiple(_) => encode_body(&RequestBody::new(
                config.user_id(),
                config.params(),
                config.sem_ver(),
            )),
            Self::PublishUpdate(endpoint) => encode_body(endpoint.data()),
        }
    }

    /// Shapes a parsed response document for the caller.
    pub fn format_response(&self, document: Value) -> Result<Value> {
        match self {
            Self::Single(endpoint) => endpoint.format_response(document),
            Self::Multiple(endpoint) => endpoint.format_response(document),
            Self::PublishUpdate(_) => Err(JoystickError::Unsupported("format_response")),
        }
    }

    /// Cache key of a read request. Publish requests are never cached.
    pub fn cache_key(&self, config: &ClientConfig) -> Result<String> {
        match self {
            Self::Single(endpoint) => Ok(endpoint.cache_key(config)),
            Self::Multiple(endpoint) => Ok(endpoint.cache_key(config)),
            Self::PublishUpdate(_) => Err(JoystickError::Unsupported("cache_key")),
        }
    }

    /// Builds the complete wire request, headers included.
    pub fn to_request(&self, config: &ClientConfig) -> Result<HttpRequest> {
        Ok(HttpRequest {
            method: self.method(),
            url: self.url(),
            query: self.query_parameters(),
            headers: vec![
                (HEADER_API_KEY.to_string(), config.api_key().to_string()),
                (HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string()),
            ],
            body: self.request_body(config)?,
        })
    }
}

fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|source| JoystickError::unknown_with("Unable to encode the request body", source))
}

fn no_content_id() -> JoystickError {
    JoystickError::InvalidArgument("No content id provided.".to_string())
}

/// Rejects blank ids and returns the id unchanged otherwise.
fn checked_content_id(content_id: &str) -> Result<String> {
    if content_id.trim().is_empty() {
        return Err(JoystickError::InvalidArgument(
            "Content id must not be blank.".to_string(),
        ));
    }
    Ok(content_id.to_string())
}

fn response_type_query(serialized: bool) -> Option<(String, String)> {
    serialized.then(|| {
        (
            PARAM_RESPONSE_TYPE.to_string(),
            RESPONSE_TYPE_SERIALIZED.to_string(),
        )
    })
}
