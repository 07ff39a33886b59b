//! Batch read through the combine endpoint.

use serde_json::{Map, Value};

use super::{checked_content_id, response_type_query, NODE_DATA, READ_API_BASE};
use crate::cache::cache_key;
use crate::config::ClientConfig;
use crate::error::{JoystickError, Result};

const PARAM_CONTENT_IDS: &str = "c";
const PARAM_DYNAMIC: &str = "dynamic";

/// Reads several configs in one call.
///
/// Ids keep the caller's order on the wire; the cache key sorts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleContentEndpoint {
    content_ids: Vec<String>,
    serialized: bool,
    full_response: bool,
}

impl MultipleContentEndpoint {
    pub fn new<S: AsRef<str>>(
        content_ids: &[S],
        serialized: bool,
        full_response: bool,
    ) -> Result<Self> {
        if content_ids.is_empty() {
            return Err(super::no_content_id());
        }
        let content_ids = content_ids
            .iter()
            .map(|id| checked_content_id(id.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            content_ids,
            serialized,
            full_response,
        })
    }

    pub fn content_ids(&self) -> &[String] {
        &self.content_ids
    }

    pub fn url(&self) -> String {
        format!("{}/combine/", READ_API_BASE)
    }

    pub fn query_parameters(&self) -> Vec<(String, String)> {
        let mut query = vec![(PARAM_DYNAMIC.to_string(), "true".to_string())];
        query.extend(response_type_query(self.serialized));
        query.push((
            PARAM_CONTENT_IDS.to_string(),
            Value::from(self.content_ids.clone()).to_string(),
        ));
        query
    }

    pub fn cache_key(&self, config: &ClientConfig) -> String {
        cache_key(config, &self.content_ids, self.serialized, self.full_response)
    }

    /// Fails on any per-id error, then returns the whole document (full) or
    /// a map of content id to that entry's `data`.
    pub fn format_response(&self, document: Value) -> Result<Value> {
        let Value::Object(entries) = document else {
            return Err(JoystickError::unknown(
                "Combined response is not a JSON object",
            ));
        };
        validate(&entries)?;

        if self.full_response {
            return Ok(Value::Object(entries));
        }

        let data = entries
            .into_iter()
            .filter_map(|(content_id, entry)| match entry {
                Value::Object(mut fields) => Some((
                    content_id,
                    fields.remove(NODE_DATA).unwrap_or(Value::Null),
                )),
                _ => None,
            })
            .collect();
        Ok(Value::Object(data))
    }
}

/// String-valued entries are error messages the service reported for that id.
fn validate(entries: &Map<String, Value>) -> Result<()> {
    let errors: Map<String, Value> = entries
        .iter()
        .filter(|(_, entry)| entry.is_string())
        .map(|(content_id, message)| (content_id.clone(), message.clone()))
        .collect();
    if errors.is_empty() {
        return Ok(());
    }

    let listing = serde_json::to_string_pretty(&errors)
        .map_err(|source| JoystickError::unknown_with("Unable to describe remote errors", source))?;
    Err(JoystickError::MultipleContents(format!(
        "Response from remote server contains errors:\n{}",
        listing
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn combined() -> Value {
        json!({
            "id1": {"data": {"speed": 20}, "hash": "h1", "meta": {"uid": 0}},
            "id2": {"data": [1, 2], "hash": "h2", "meta": {"uid": 0}}
        })
    }

    #[test]
    fn test_url_and_query() {
        let endpoint = MultipleContentEndpoint::new(&["id2", "id1"], false, false).unwrap();
        assert_eq!(endpoint.url(), "https://api.getjoystick.com/api/v1/combine/");
        assert_eq!(
            endpoint.query_parameters(),
            vec![
                ("dynamic".to_string(), "true".to_string()),
                ("c".to_string(), r#"["id2","id1"]"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_serialized_query() {
        let endpoint = MultipleContentEndpoint::new(&["id1", "id2"], true, false).unwrap();
        let query = endpoint.query_parameters();
        assert_eq!(query.len(), 3);
        assert!(query.contains(&("responseType".to_string(), "serialized".to_string())));
        assert_eq!(query[0].0, "dynamic");
    }

    #[test]
    fn test_short_response_maps_ids_to_data() {
        let endpoint = MultipleContentEndpoint::new(&["id1", "id2"], false, false).unwrap();
        assert_eq!(
            endpoint.format_response(combined()).unwrap(),
            json!({"id1": {"speed": 20}, "id2": [1, 2]})
        );
    }

    #[test]
    fn test_full_response_is_unchanged() {
        let endpoint = MultipleContentEndpoint::new(&["id1", "id2"], false, true).unwrap();
        assert_eq!(endpoint.format_response(combined()).unwrap(), combined());
    }

    #[test]
    fn test_string_entries_are_errors() {
        let endpoint = MultipleContentEndpoint::new(&["id1", "id2"], false, true).unwrap();
        let document = json!({
            "id1": {"data": {"a": 1}, "hash": "h", "meta": {}},
            "id2": "Not found"
        });
        let message = match endpoint.format_response(document) {
            Err(JoystickError::MultipleContents(message)) => message,
            other => panic!("expected MultipleContents, got {:?}", other),
        };
        assert!(message.starts_with("Response from remote server contains errors:\n"));
        assert!(message.contains("\"id2\": \"Not found\""));
        assert!(!message.contains("id1"));
    }

    #[test]
    fn test_non_object_document() {
        let endpoint = MultipleContentEndpoint::new(&["id1", "id2"], false, false).unwrap();
        assert!(matches!(
            endpoint.format_response(json!("oops")),
            Err(JoystickError::ApiUnknown { .. })
        ));
    }

    #[test]
    fn test_cache_key_ignores_order() {
        let config = ClientConfig::builder().api_key("k").build().unwrap();
        let forward = MultipleContentEndpoint::new(&["a", "b"], false, false).unwrap();
        let backward = MultipleContentEndpoint::new(&["b", "a"], false, false).unwrap();
        assert_eq!(forward.cache_key(&config), backward.cache_key(&config));
    }
}
