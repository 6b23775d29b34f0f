use arena_core::{ArenaError, ProblemMetadata, Result};
use serde_json::Value;

/// Accept problem metadata either wrapped as `{"payload": {...}}` or flat, and
/// return the canonical shape. A null or missing payload means the problem
/// does not exist.
pub fn normalize_metadata(value: Value) -> Result<ProblemMetadata> {
    let body = match value {
        Value::Object(mut map) if map.contains_key("payload") => {
            map.remove("payload").unwrap_or(Value::Null)
        }
        other => other,
    };

    if body.is_null() {
        return Err(ArenaError::NotFound("problem metadata is empty".to_string()));
    }

    serde_json::from_value(body)
        .map_err(|e| ArenaError::Network(format!("Malformed problem metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_sum() -> Value {
        json!({
            "problem_id": "two-sum",
            "title": "Two Sum",
            "description": "Find two indices.",
            "tags": ["array", "hash-table"],
            "difficulty": "easy",
            "testcase_run": { "run": [{ "id": "s1", "input": "[2,7,11,15],9", "expected": "[0,1]" }] },
            "supported_languages": ["python", "go"],
            "placeholder_maps": { "python": "class Solution:\n    pass\n", "go": "package main\n" }
        })
    }

    #[test]
    fn test_wrapped_and_flat_shapes_agree() {
        let wrapped = normalize_metadata(json!({ "payload": two_sum() })).unwrap();
        let flat = normalize_metadata(two_sum()).unwrap();
        assert_eq!(wrapped, flat);
        assert_eq!(flat.sample_cases().len(), 1);
        assert_eq!(flat.sample_cases()[0].id.as_deref(), Some("s1"));
        assert!(flat.supports("go"));
    }

    #[test]
    fn test_null_payload_is_not_found() {
        let err = normalize_metadata(json!({ "payload": null })).unwrap_err();
        assert!(matches!(err, ArenaError::NotFound(_)));
        let err = normalize_metadata(Value::Null).unwrap_err();
        assert!(matches!(err, ArenaError::NotFound(_)));
    }

    #[test]
    fn test_missing_problem_id_is_malformed() {
        let err = normalize_metadata(json!({ "title": "No id" })).unwrap_err();
        assert!(matches!(err, ArenaError::Network(_)));
    }

    #[test]
    fn test_optional_sections_default() {
        let meta = normalize_metadata(json!({ "problem_id": "bare" })).unwrap();
        assert!(meta.sample_cases().is_empty());
        assert!(meta.supported_languages.is_empty());
        assert_eq!(meta.placeholder("python"), "");
    }
}
