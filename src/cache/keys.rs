//! Cache key derivation.
//!
//! The key is the SHA-256 hex digest of a JSON array
//! `[api_key, params, sem_ver, user_id, content_ids, serialized, full_response]`
//! where `params` (recursively) and `content_ids` are sorted first. This encoding
//! is the stability contract: keys survive process restarts and never depend on
//! map or slice iteration order.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::config::ClientConfig;

/// Computes the cache key for one request shape.
///
/// Callers guarantee `content_ids` is non-empty.
pub fn cache_key<S: AsRef<str>>(
    config: &ClientConfig,
    content_ids: &[S],
    serialized: bool,
    full_response: bool,
) -> String {
    let mut ids: Vec<&str> = content_ids.iter().map(|id| id.as_ref()).collect();
    ids.sort_unstable();

    let params: BTreeMap<&str, Value> = config
        .params()
        .iter()
        .map(|(key, value)| (key.as_str(), canonicalize(value)))
        .collect();

    let encoded = json!([
        config.api_key(),
        params,
        config.sem_ver(),
        config.user_id(),
        ids,
        serialized,
        full_response
    ])
    .to_string();

    hex::encode(Sha256::digest(encoded.as_bytes()))
}

/// Rebuilds every object with its keys in sorted order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(object) => {
            let sorted: BTreeMap<&String, Value> = object
                .iter()
                .map(|(key, inner)| (key, canonicalize(inner)))
                .collect();
            let mut canonical = Map::with_capacity(sorted.len());
            for (key, inner) in sorted {
                canonical.insert(key.clone(), inner);
            }
            Value::Object(canonical)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with_params(pairs: &[(&str, Value)]) -> ClientConfig {
        let params: HashMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ClientConfig::builder()
            .api_key("test-api-key")
            .user_id("user-id-1")
            .sem_ver("1.0.0")
            .params(params)
            .build()
            .unwrap()
    }

    #[test]
    fn test_key_is_hex_sha256() {
        let config = config_with_params(&[]);
        let key = cache_key(&config, &["id1"], false, false);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_is_stable_across_calls_and_instances() {
        let params = [("p1", json!("v1")), ("p2", json!("v2")), ("p3", json!("v3"))];
        let first = config_with_params(&params);
        let second = config_with_params(&params);

        let key = cache_key(&first, &["id1", "id2"], true, false);
        assert_eq!(key, cache_key(&first, &["id1", "id2"], true, false));
        assert_eq!(key, cache_key(&second, &["id1", "id2"], true, false));
    }

    #[test]
    fn test_key_ignores_id_order() {
        let config = config_with_params(&[]);
        assert_eq!(
            cache_key(&config, &["b", "a", "c"], false, true),
            cache_key(&config, &["c", "b", "a"], false, true)
        );
    }

    #[test]
    fn test_key_ignores_params_order() {
        let forward = config_with_params(&[("p1", json!("v1")), ("p2", json!({"x": 1, "y": 2}))]);
        let backward = config_with_params(&[("p2", json!({"y": 2, "x": 1})), ("p1", json!("v1"))]);
        assert_eq!(
            cache_key(&forward, &["id"], false, false),
            cache_key(&backward, &["id"], false, false)
        );
    }

    #[test]
    fn test_key_separates_shifted_params() {
        let left = config_with_params(&[("a", json!("bc"))]);
        let right = config_with_params(&[("ab", json!("c"))]);
        assert_ne!(
            cache_key(&left, &["id"], false, false),
            cache_key(&right, &["id"], false, false)
        );
    }

    #[test]
    fn test_key_changes_with_each_field() {
        let base = config_with_params(&[("p", json!(1))]);
        let reference = cache_key(&base, &["id1"], false, false);

        let variants = [
            ClientConfig::builder()
                .api_key("other-key")
                .user_id("user-id-1")
                .sem_ver("1.0.0")
                .param("p", 1)
                .build()
                .unwrap(),
            ClientConfig::builder()
                .api_key("test-api-key")
                .user_id("user-id-2")
                .sem_ver("1.0.0")
                .param("p", 1)
                .build()
                .unwrap(),
            ClientConfig::builder()
                .api_key("test-api-key")
                .user_id("user-id-1")
                .sem_ver("1.0.1")
                .param("p", 1)
                .build()
                .unwrap(),
            ClientConfig::builder()
                .api_key("test-api-key")
                .user_id("user-id-1")
                .param("p", 1)
                .build()
                .unwrap(),
            config_with_params(&[("p", json!(2))]),
        ];
        for config in &variants {
            assert_ne!(cache_key(config, &["id1"], false, false), reference);
        }

        assert_ne!(cache_key(&base, &["id2"], false, false), reference);
        assert_ne!(cache_key(&base, &["id1", "id2"], false, false), reference);
        assert_ne!(cache_key(&base, &["id1"], true, false), reference);
        assert_ne!(cache_key(&base, &["id1"], false, true), reference);
    }

    #[test]
    fn test_cache_ttl_and_serialized_default_do_not_affect_key() {
        let plain = ClientConfig::builder().api_key("k").build().unwrap();
        let tuned = ClientConfig::builder()
            .api_key("k")
            .cache_ttl_seconds(5)
            .serialized(true)
            .build()
            .unwrap();
        assert_eq!(
            cache_key(&plain, &["id"], true, true),
            cache_key(&tuned, &["id"], true, true)
        );
    }
}
