//! Turns the store's keyed-map payload (`{ key: record, .. }`) into an ordered
//! list of records, each carrying its key as `id`.

use log::warn;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

/// Normalizes a collection payload. `null` yields an empty list; records keep
/// the order in which the payload listed them. Entries that do not decode as
/// `T` are logged and left out.
pub fn normalize<T: DeserializeOwned>(raw: Value) -> Result<Vec<T>, serde_json::Error> {
    let entries = match raw {
        Value::Null => return Ok(Vec::new()),
        Value::Object(entries) => entries,
        other => {
            return Err(serde_json::Error::custom(format!(
                "expected a keyed map of records, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let Value::Object(mut fields) = value else {
            warn!("skipping non-record entry {key} in collection payload");
            continue;
        };
        fields.insert("id".to_string(), Value::String(key.clone()));
        match serde_json::from_value(Value::Object(fields)) {
            Ok(record) => records.push(record),
            Err(err) => warn!("skipping malformed record {key}: {err}"),
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, User};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_and_empty_payloads_normalize_to_nothing() {
        assert!(normalize::<Post>(Value::Null).expect("null").is_empty());
        assert!(normalize::<Post>(json!({})).expect("empty").is_empty());
    }

    #[test]
    fn every_key_becomes_an_id_in_payload_order() {
        let raw: Value = serde_json::from_str(
            r#"{
                "zeta": {"title": "Z", "body": "last key, first record", "image": ""},
                "-Nb1": {"title": "B", "body": "b", "image": "b.png"},
                "alpha": {"title": "A", "body": "a", "image": "a.png"}
            }"#,
        )
        .expect("payload");
        let posts: Vec<Post> = normalize(raw).expect("normalize");
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "-Nb1", "alpha"]);
        assert_eq!(posts[1].title, "B");
        assert_eq!(posts[1].image, "b.png");
    }

    #[test]
    fn key_overrides_a_stray_id_field() {
        let posts: Vec<Post> =
            normalize(json!({"real": {"id": "bogus", "title": "t"}})).expect("normalize");
        assert_eq!(posts[0].id, "real");
    }

    #[test]
    fn users_normalize_with_their_own_fields() {
        let users: Vec<User> = normalize(json!({
            "u1": {"name": "Ada", "title": "Analyst", "image": "ada.png"}
        }))
        .expect("normalize");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[0].name, "Ada");
    }

    #[test]
    fn non_record_entries_are_skipped() {
        let posts: Vec<Post> =
            normalize(json!({"a": {"title": "kept"}, "b": 42})).expect("normalize");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "a");
    }

    #[test]
    fn mistyped_record_does_not_sink_its_neighbours() {
        let posts: Vec<Post> = normalize(json!({
            "a": {"title": "fine", "body": "b", "image": "a.png"},
            "b": {"title": 42, "body": "b", "image": ""},
            "c": {"title": null}
        }))
        .expect("normalize");
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(posts[0].title, "fine");
    }

    #[test]
    fn non_map_payloads_are_rejected() {
        assert!(normalize::<Post>(json!([1, 2])).is_err());
        assert!(normalize::<Post>(json!("text")).is_err());
    }
}
