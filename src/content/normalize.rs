//! Response envelope normalization.
//!
//! The content API wraps the same data in several envelope shapes. The
//! matchers below are evaluated in a fixed order, first match wins:
//!
//! ```text
//! [ ... ]                    → Array
//! { "data": ... }            → DataWrapper   (recurse into data)
//! { "<entity>": ... }        → EntityWrapper (recurse into the entity key)
//! { ... }                    → BareRecord
//! null / scalar              → Unrecognized
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Maximum wrapper nesting followed before giving up.
const MAX_DEPTH: usize = 8;

/// One classification step of a raw payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    Array(&'a [Value]),
    DataWrapper(&'a Value),
    EntityWrapper(&'a Value),
    BareRecord(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> Envelope<'a> {
    /// Classify `raw` using the matcher order above.
    pub fn classify(raw: &'a Value, entity_hint: &str) -> Self {
        match raw {
            Value::Array(items) => Envelope::Array(items),
            Value::Object(map) => {
                if let Some(inner) = map.get("data") {
                    Envelope::DataWrapper(inner)
                } else if let Some(inner) = map.get(entity_hint) {
                    Envelope::EntityWrapper(inner)
                } else {
                    Envelope::BareRecord(map)
                }
            }
            _ => Envelope::Unrecognized,
        }
    }
}

/// Terminal result of unwrapping all envelope layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Collection(&'a [Value]),
    Record(&'a Map<String, Value>),
    Nothing,
}

/// Follow wrapper layers until a collection or a record is reached.
pub fn resolve<'a>(raw: &'a Value, entity_hint: &str) -> Resolved<'a> {
    let mut current = raw;
    for _ in 0..MAX_DEPTH {
        match Envelope::classify(current, entity_hint) {
            Envelope::Array(items) => return Resolved::Collection(items),
            Envelope::DataWrapper(inner) | Envelope::EntityWrapper(inner) => current = inner,
            Envelope::BareRecord(map) => return Resolved::Record(map),
            Envelope::Unrecognized => return Resolved::Nothing,
        }
    }
    tracing::warn!(entity = entity_hint, "Envelope nesting too deep, giving up");
    Resolved::Nothing
}

/// Normalize a payload for a collection-typed call site.
///
/// Anything that does not resolve to an array yields an empty vector.
/// Elements that cannot be coerced into `T` are skipped.
pub fn normalize_collection<T: DeserializeOwned>(raw: &Value, entity_hint: &str) -> Vec<T> {
    match resolve(raw, entity_hint) {
        Resolved::Collection(items) => items
            .iter()
            .filter_map(|item| coerce(item, entity_hint))
            .collect(),
        Resolved::Record(_) | Resolved::Nothing => Vec::new(),
    }
}

/// Normalize a payload for a single-record call site.
///
/// An array resolves to its first coercible element.
pub fn normalize_record<T: DeserializeOwned>(raw: &Value, entity_hint: &str) -> Option<T> {
    match resolve(raw, entity_hint) {
        Resolved::Record(map) => serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| tracing::warn!(entity = entity_hint, error = %e, "Record could not be coerced"))
            .ok(),
        Resolved::Collection(items) => items.iter().find_map(|item| coerce(item, entity_hint)),
        Resolved::Nothing => None,
    }
}

/// Like [`normalize_record`], but a record with nothing but defaults counts
/// as a miss. Guards against 2xx error bodies such as `{"message": "..."}`.
pub fn normalize_populated_record<T>(raw: &Value, entity_hint: &str) -> Option<T>
where
    T: DeserializeOwned + Default + PartialEq,
{
    normalize_record(raw, entity_hint).filter(|record: &T| *record != T::default())
}

fn coerce<T: DeserializeOwned>(item: &Value, entity_hint: &str) -> Option<T> {
    if !item.is_object() {
        tracing::debug!(entity = entity_hint, "Skipping non-object element");
        return None;
    }
    match serde_json::from_value(item.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(entity = entity_hint, error = %e, "Skipping element that could not be coerced");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::{Blog, Course, FooterSettings};
    use serde_json::json;

    fn slugs(courses: &[Course]) -> Vec<Option<String>> {
        courses.iter().map(|c| c.slug.clone()).collect()
    }

    #[test]
    fn test_classify_order() {
        let raw = json!({"data": [], "courses": [{"id": 1}]});
        assert!(matches!(Envelope::classify(&raw, "courses"), Envelope::DataWrapper(_)));

        let raw = json!({"courses": []});
        assert!(matches!(Envelope::classify(&raw, "courses"), Envelope::EntityWrapper(_)));

        let raw = json!({"courses": []});
        assert!(matches!(Envelope::classify(&raw, "blogs"), Envelope::BareRecord(_)));

        assert_eq!(Envelope::classify(&json!(42), "courses"), Envelope::Unrecognized);
        assert_eq!(Envelope::classify(&Value::Null, "courses"), Envelope::Unrecognized);
    }

    #[test]
    fn test_all_envelopes_yield_same_collection() {
        let items = json!([{"id": 1, "slug": "sap"}, {"id": 2, "slug": "aws"}]);
        let shapes = [
            items.clone(),
            json!({"data": items.clone()}),
            json!({"courses": items.clone()}),
            json!({"data": {"courses": items.clone()}}),
        ];

        let expected = vec![Some("sap".to_string()), Some("aws".to_string())];
        for shape in &shapes {
            let courses: Vec<Course> = normalize_collection(shape, "courses");
            assert_eq!(slugs(&courses), expected, "shape {}", shape);
        }
    }

    #[test]
    fn test_single_record_shapes() {
        let record = json!({"company_name": "Acme", "email": "hi@acme.test"});
        for shape in [record.clone(), json!({"data": record.clone()}), json!({"data": [record.clone()]})] {
            let settings: FooterSettings = normalize_record(&shape, "footer_settings").unwrap();
            assert_eq!(settings.company_name, "Acme");
        }
    }

    #[test]
    fn test_malformed_envelopes() {
        let malformed = [
            Value::Null,
            json!("oops"),
            json!(17),
            json!({"data": null}),
            json!({"data": "text"}),
            json!({"courses": 5}),
        ];
        for raw in &malformed {
            let courses: Vec<Course> = normalize_collection(raw, "courses");
            assert!(courses.is_empty(), "expected [] for {}", raw);
            let record: Option<Course> = normalize_record(raw, "courses");
            assert!(record.is_none(), "expected None for {}", raw);
        }
    }

    #[test]
    fn test_populated_record_rejects_error_bodies() {
        let raw = json!({"message": "not found"});
        assert!(normalize_record::<FooterSettings>(&raw, "footer_settings").is_some());
        assert!(normalize_populated_record::<FooterSettings>(&raw, "footer_settings").is_none());

        let raw = json!({"data": {"company_name": "Acme"}});
        assert!(normalize_populated_record::<FooterSettings>(&raw, "footer_settings").is_some());
    }

    #[test]
    fn test_bare_object_at_collection_site_is_empty() {
        let raw = json!({"message": "not found"});
        let blogs: Vec<Blog> = normalize_collection(&raw, "blogs");
        assert!(blogs.is_empty());
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let raw = json!({"data": [{"id": 1, "slug": "a"}, "junk", null, {"id": 2}]});
        let courses: Vec<Course> = normalize_collection(&raw, "courses");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].id, Some(2));
    }

    #[test]
    fn test_deep_nesting_gives_up() {
        let mut raw = json!([]);
        for _ in 0..20 {
            raw = json!({ "data": raw });
        }
        let courses: Vec<Course> = normalize_collection(&raw, "courses");
        assert!(courses.is_empty());
    }
}
