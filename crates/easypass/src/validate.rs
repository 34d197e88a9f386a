//! Shape validation for untrusted entry data
//!
//! Anything read from disk, the legacy store or an import file passes
//! through [`validate_entries`] before it is treated as an [`Entry`].
//! Invalid elements are dropped one by one; a partly corrupt collection
//! is trimmed, not rejected.
//!
//! Validation is about shape only. Id and name uniqueness are enforced when
//! entries are created (see [`crate::collection`]).

use serde_json::{Map, Value};

use crate::entry::Entry;

/// Filter and canonicalize a JSON value into a list of entries.
///
/// Non-array input yields an empty list.
pub fn validate_entries(input: &Value) -> Vec<Entry> {
    match input.as_array() {
        Some(items) => items.iter().filter_map(validate_entry).collect(),
        None => Vec::new(),
    }
}

/// Canonicalize one element, or `None` if it cannot be an entry.
///
/// Ids must be whole numbers: a fractional id such as `1.5` is rejected
/// even though it is numeric.
pub fn validate_entry(item: &Value) -> Option<Entry> {
    let record = item.as_object()?;

    let id = integer_id(record.get("id")?)?;
    let name = record.get("name")?.as_str()?.trim();
    let secret = record.get("secret")?.as_str()?;

    if name.is_empty() || secret.is_empty() {
        return None;
    }

    Some(Entry {
        id,
        name: name.to_string(),
        secret: secret.to_string(),
        description: description(record),
    })
}

fn integer_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }

    // 3.0 is an integer id written by a lenient producer; 3.5 is not
    let id = value.as_f64()?;
    if id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64 {
        Some(id as i64)
    } else {
        None
    }
}

fn description(record: &Map<String, Value>) -> String {
    record
        .get("description")
        .and_then(Value::as_str)
        .map(|d| d.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_list_input_is_empty() {
        for input in [
            json!(null),
            json!(42),
            json!("entries"),
            json!({"entries": []}),
            json!(true),
        ] {
            assert!(validate_entries(&input).is_empty(), "input: {}", input);
        }
    }

    #[test]
    fn test_trims_and_drops() {
        let input = json!([
            {"id": 1, "name": " Prod ", "secret": "x", "description": " db "},
            {"id": 2, "name": "", "secret": "y"},
            {"id": 3, "secret": "z"}
        ]);

        assert_eq!(
            validate_entries(&input),
            vec![Entry {
                id: 1,
                name: "Prod".to_string(),
                secret: "x".to_string(),
                description: "db".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let input = json!([
            null,
            "string element",
            [1, 2],
            {"id": "1", "name": "a", "secret": "b"},
            {"id": 1.5, "name": "a", "secret": "b"},
            {"id": 1, "name": 7, "secret": "b"},
            {"id": 1, "name": "a", "secret": 7},
            {"id": 1, "name": "   ", "secret": "b"},
            {"id": 1, "name": "a", "secret": ""},
            {"name": "a", "secret": "b"}
        ]);

        assert!(validate_entries(&input).is_empty());
    }

    #[test]
    fn test_secret_is_verbatim() {
        let input = json!([{"id": 1, "name": "a", "secret": "  "}]);
        let entries = validate_entries(&input);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].secret, "  ");
    }

    #[test]
    fn test_description_defaults() {
        let input = json!([
            {"id": 1, "name": "a", "secret": "s"},
            {"id": 2, "name": "b", "secret": "s", "description": null},
            {"id": 3, "name": "c", "secret": "s", "description": 12},
            {"id": 4, "name": "d", "secret": "s", "description": "  note  "}
        ]);
        let descriptions: Vec<String> = validate_entries(&input)
            .into_iter()
            .map(|e| e.description)
            .collect();

        assert_eq!(descriptions, vec!["", "", "", "note"]);
    }

    #[test]
    fn test_integral_float_id_is_accepted() {
        let input = json!([{"id": 3.0, "name": "a", "secret": "s"}]);
        assert_eq!(validate_entries(&input)[0].id, 3);
    }

    #[test]
    fn test_duplicates_are_not_filtered() {
        let input = json!([
            {"id": 1, "name": "same", "secret": "a"},
            {"id": 1, "name": "SAME", "secret": "b"}
        ]);
        assert_eq!(validate_entries(&input).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let input = json!([
            {"id": 1, "name": " a ", "secret": " s ", "description": " d "},
            {"id": 2, "name": "b", "secret": "t", "extra": true},
            {"id": "x", "name": "c", "secret": "u"}
        ]);

        let once = validate_entries(&input);
        let twice = validate_entries(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
