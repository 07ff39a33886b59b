//! Single config read: `POST /config/{id}/dynamic`.

use serde_json::Value;

use super::{checked_content_id, response_type_query, NODE_DATA, READ_API_BASE};
use crate::cache::cache_key;
use crate::config::ClientConfig;
use crate::error::{JoystickError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleContentEndpoint {
    content_id: String,
    serialized: bool,
    full_response: bool,
}

impl SingleContentEndpoint {
    pub fn new(content_id: &str, serialized: bool, full_response: bool) -> Result<Self> {
        Ok(Self {
            content_id: checked_content_id(content_id)?,
            serialized,
            full_response,
        })
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn url(&self) -> String {
        format!("{}/config/{}/dynamic", READ_API_BASE, self.content_id)
    }

    pub fn query_parameters(&self) -> Vec<(String, String)> {
        response_type_query(self.serialized).into_iter().collect()
    }

    pub fn cache_key(&self, config: &ClientConfig) -> String {
        cache_key(
            config,
            &[self.content_id.as_str()],
            self.serialized,
            self.full_response,
        )
    }

    /// Whole document for full responses, its `data` field otherwise.
    pub fn format_response(&self, document: Value) -> Result<Value> {
        if self.full_response {
            return Ok(document);
        }
        match document {
            Value::Object(mut fields) => fields
                .remove(NODE_DATA)
                .ok_or_else(|| JoystickError::unknown("Response does not contain a data field")),
            _ => Err(JoystickError::unknown(
                "Response does not contain a data field",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "data": {"a": 1},
            "hash": "h",
            "meta": {"uid": 0, "mod": 0, "variants": [], "seg": []}
        })
    }

    #[test]
    fn test_url() {
        let endpoint = SingleContentEndpoint::new("id1", false, false).unwrap();
        assert_eq!(
            endpoint.url(),
            "https://api.getjoystick.com/api/v1/config/id1/dynamic"
        );
    }

    #[test]
    fn test_query_parameters() {
        let plain = SingleContentEndpoint::new("id1", false, false).unwrap();
        assert!(plain.query_parameters().is_empty());

        let serialized = SingleContentEndpoint::new("id1", true, false).unwrap();
        assert_eq!(
            serialized.query_parameters(),
            vec![("responseType".to_string(), "serialized".to_string())]
        );
    }

    #[test]
    fn test_short_response_extracts_data() {
        let endpoint = SingleContentEndpoint::new("id1", false, false).unwrap();
        assert_eq!(endpoint.format_response(document()).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_full_response_is_unchanged() {
        let endpoint = SingleContentEndpoint::new("id1", false, true).unwrap();
        assert_eq!(endpoint.format_response(document()).unwrap(), document());
    }

    #[test]
    fn test_missing_data_field() {
        let endpoint = SingleContentEndpoint::new("id1", false, false).unwrap();
        let err = endpoint.format_response(json!({"hash": "h"})).unwrap_err();
        assert!(matches!(err, JoystickError::ApiUnknown { .. }));

        let err = endpoint.format_response(json!([1, 2])).unwrap_err();
        assert!(matches!(err, JoystickError::ApiUnknown { .. }));
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!(matches!(
            SingleContentEndpoint::new(" ", false, false),
            Err(JoystickError::InvalidArgument(_))
        ));
    }
}
