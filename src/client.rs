//! Joystick client
//!
//! Every read goes through one path: derive the cache key, serve from the
//! cache unless a refresh is requested, otherwise call the API, shape the
//! response and store its JSON text. The typed accessors are projections of
//! that text.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::endpoints::{
    ApiEndpoint, MultipleContentEndpoint, PublishUpdateEndpoint, SingleContentEndpoint,
};
use crate::error::{JoystickError, Result};
use crate::models::{
    deserialize_data, serialized_text, strip_enclosing_quotes, ContentOptions, FullContent, PublishData,
    ResponseType,
};
use crate::transport::{HttpTransport, ReqwestTransport};

const STATUS_OK: u16 = 200;

/// Client for the Joystick remote configuration API.
///
/// Cheap to clone; clones share the transport and the configured cache.
#[derive(Clone)]
pub struct JoystickClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl JoystickClient {
    /// Creates a client backed by the default [`ReqwestTransport`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new()
            .map_err(|source| JoystickError::unknown_with("Unable to create the HTTP client", source))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // == Single Content ==

    /// Content of one config as a JSON document.
    ///
    /// With a serialized default the content arrives as JSON text and is
    /// parsed back here.
    pub async fn get_content(&self, content_id: &str, options: ContentOptions) -> Result<Value> {
        let serialized = self.config.serialized();
        let endpoint = SingleContentEndpoint::new(content_id, serialized, false)?;
        let contents = self.fetch(ApiEndpoint::Single(endpoint), options).await?;
        self.structured(parse_contents(&contents)?)
    }

    /// Content of one config decoded into `T`.
    pub async fn get_content_as<T: DeserializeOwned>(
        &self,
        content_id: &str,
        options: ContentOptions,
    ) -> Result<T> {
        let content = self.get_content(content_id, options).await?;
        decode(content)
    }

    /// Content of one config as escaped JSON text, e.g. `{\"speed\":20}`.
    pub async fn get_content_serialized(
        &self,
        content_id: &str,
        options: ContentOptions,
    ) -> Result<String> {
        let endpoint = SingleContentEndpoint::new(content_id, true, false)?;
        let contents = self.fetch(ApiEndpoint::Single(endpoint), options).await?;
        Ok(strip_enclosing_quotes(&contents).to_string())
    }

    pub async fn get_full_content(
        &self,
        content_id: &str,
        options: ContentOptions,
    ) -> Result<FullContent<Value>> {
        let endpoint = SingleContentEndpoint::new(content_id, self.config.serialized(), true)?;
        let contents = self.fetch(ApiEndpoint::Single(endpoint), options).await?;
        self.structured_full(parse_contents(&contents)?)
    }

    pub async fn get_full_content_serialized(
        &self,
        content_id: &str,
        options: ContentOptions,
    ) -> Result<FullContent<String>> {
        let endpoint = SingleContentEndpoint::new(content_id, true, true)?;
        let contents = self.fetch(ApiEndpoint::Single(endpoint), options).await?;
        FullContent::from_serialized_document(parse_contents(&contents)?)
    }

    // == Multiple Contents ==
    // Batch accessors always use the combine endpoint, even for a single id.

    /// Content of several configs keyed by content id.
    pub async fn get_contents<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        options: ContentOptions,
    ) -> Result<HashMap<String, Value>> {
        let endpoint = MultipleContentEndpoint::new(content_ids, self.config.serialized(), false)?;
        let contents = self.fetch(ApiEndpoint::Multiple(endpoint), options).await?;
        entries(&contents)?
            .into_iter()
            .map(|(content_id, data)| self.structured(data).map(|data| (content_id, data)))
            .collect()
    }

    pub async fn get_contents_serialized<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        options: ContentOptions,
    ) -> Result<HashMap<String, String>> {
        let endpoint = MultipleContentEndpoint::new(content_ids, true, false)?;
        let contents = self.fetch(ApiEndpoint::Multiple(endpoint), options).await?;
        Ok(entries(&contents)?
            .into_iter()
            .map(|(content_id, data)| (content_id, serialized_text(&data)))
            .collect())
    }

    pub async fn get_full_contents<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        options: ContentOptions,
    ) -> Result<HashMap<String, FullContent<Value>>> {
        let endpoint = MultipleContentEndpoint::new(content_ids, self.config.serialized(), true)?;
        let contents = self.fetch(ApiEndpoint::Multiple(endpoint), options).await?;
        entries(&contents)?
            .into_iter()
            .map(|(content_id, entry)| {
                self.structured_full(entry).map(|full| (content_id, full))
            })
            .collect()
    }

    pub async fn get_full_contents_serialized<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        options: ContentOptions,
    ) -> Result<HashMap<String, FullContent<String>>> {
        let endpoint = MultipleContentEndpoint::new(content_ids, true, true)?;
        let contents = self.fetch(ApiEndpoint::Multiple(endpoint), options).await?;
        entries(&contents)?
            .into_iter()
            .map(|(content_id, entry)| {
                FullContent::from_serialized_document(entry).map(|full| (content_id, full))
            })
            .collect()
    }

    /// Raw JSON text of one or more configs.
    ///
    /// One id reads a single config, several use the combine endpoint. The
    /// content is serialized when `response_type` asks for it or the config
    /// defaults to it.
    pub async fn get_contents_as_string<S: AsRef<str>>(
        &self,
        content_ids: &[S],
        response_type: Option<ResponseType>,
        full_response: bool,
        refresh: bool,
    ) -> Result<String> {
        let serialized =
            response_type == Some(ResponseType::Serialized) || self.config.serialized();
        let endpoint = ApiEndpoint::for_contents(content_ids, serialized, full_response)?;
        self.fetch(endpoint, ContentOptions { refresh }).await
    }

    // == Publish ==

    /// Publishes a new version of an existing config.
    ///
    /// Never cached; the parsed response document is returned unchanged.
    pub async fn publish_content_update(
        &self,
        content_id: &str,
        data: &PublishData,
    ) -> Result<Value> {
        let endpoint = ApiEndpoint::PublishUpdate(PublishUpdateEndpoint::new(content_id, data.clone())?);
        let response = self.execute(&endpoint).await?;
        info!(content_id, "Published content update");
        Ok(response)
    }

    // == Retrieval ==

    async fn fetch(&self, endpoint: ApiEndpoint, options: ContentOptions) -> Result<String> {
        let key = endpoint.cache_key(&self.config)?;
        let cache = self.config.cache();

        if !options.refresh {
            if let Some(contents) = cache.get(&key) {
                debug!(url = %endpoint.url(), "Joystick content served from cache");
                return Ok(contents);
            }
        }
        debug!(url = %endpoint.url(), refresh = options.refresh, "Fetching Joystick content");

        let document = self.execute(&endpoint).await?;
        let contents = endpoint.format_response(document)?.to_string();
        cache.put(key, contents.clone());
        Ok(contents)
    }

    /// Sends the request and returns the parsed body of a 200 response.
    async fn execute(&self, endpoint: &ApiEndpoint) -> Result<Value> {
        let request = endpoint.to_request(&self.config)?;
        let response = self.transport.execute(request).await.map_err(|source| {
            warn!(url = %endpoint.url(), error = %source, "Joystick request failed");
            JoystickError::unknown_with("Unable to complete the request", source)
        })?;

        if response.status != STATUS_OK {
            let status_line = response.status_line();
            warn!(url = %endpoint.url(), status = response.status, "Joystick API returned an error status");
            return Err(JoystickError::from_status(response.status, status_line));
        }
        if response.body.is_empty() {
            return Err(JoystickError::unknown("Response body is empty"));
        }

        serde_json::from_slice(&response.body)
            .map_err(|source| JoystickError::unknown_with("Response is not in JSON format", source))
    }

    /// Parses serialized `data` back into a document when the config asks
    /// for serialized responses.
    fn structured(&self, data: Value) -> Result<Value> {
        if self.config.serialized() {
            deserialize_data(data)
        } else {
            Ok(data)
        }
    }

    fn structured_full(&self, document: Value) -> Result<FullContent<Value>> {
        let mut full = FullContent::from_document(document)?;
        full.data = self.structured(full.data)?;
        Ok(full)
    }
}

fn parse_contents(contents: &str) -> Result<Value> {
    serde_json::from_str(contents)
        .map_err(|source| JoystickError::unknown_with("Response is not in JSON format", source))
}

fn entries(contents: &str) -> Result<Map<String, Value>> {
    match parse_contents(contents)? {
        Value::Object(entries) => Ok(entries),
        _ => Err(JoystickError::unknown("Combined response is not a JSON object")),
    }
}

fn decode<T: DeserializeOwned>(content: Value) -> Result<T> {
    serde_json::from_value(content).map_err(|source| JoystickError::Decode {
        target: std::any::type_name::<T>(),
        source,
    })
}
