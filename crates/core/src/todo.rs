//! Payload rules for todo create and update requests.
//!
//! The API layer hands over the raw JSON object so the checks here see the
//! exact key list the client sent. Nothing in this module touches storage;
//! it only decides whether a payload is acceptable and extracts typed field
//! values from it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{DbId, NaiveTimestamp};

/// Entity name used in not-found errors.
pub const TODO_ENTITY: &str = "Todo";

/// Every key a todo payload may carry. Keys outside this list reject the
/// whole payload. `id`, `created_at` and `updated_at` are accepted but never
/// client-writable.
pub const TODO_FIELDS: [&str; 7] = [
    "id",
    "title",
    "description",
    "completed",
    "deadline_at",
    "created_at",
    "updated_at",
];

pub const EXTRA_ELEMENTS: &str = "extra elements detected";
pub const TITLE_MISSING: &str = "id/title not found";
pub const ID_CHANGE_NOT_ALLOWED: &str = "changing todo id not allowed";

/// A todo request body after the top-level object check.
pub type Payload = Map<String, Value>;

/// Require the request body to be a JSON object.
pub fn as_payload(body: &Value) -> Result<&Payload, CoreError> {
    body.as_object()
        .ok_or_else(|| CoreError::Validation("request body must be a JSON object".to_string()))
}

/// Keys present in `payload` that are not todo fields, in payload order.
pub fn unknown_fields(payload: &Payload) -> Vec<&str> {
    payload
        .keys()
        .map(String::as_str)
        .filter(|key| !TODO_FIELDS.contains(key))
        .collect()
}

/// Reject the payload if it carries any key outside [`TODO_FIELDS`].
pub fn reject_unknown_fields(payload: &Payload) -> Result<(), CoreError> {
    if unknown_fields(payload).is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(EXTRA_ELEMENTS.to_string()))
    }
}

/// Reject an update payload whose `id` differs from the addressed todo.
///
/// The comparison is numeric, so `4.0` matches todo 4. Any non-number `id`
/// counts as a change.
pub fn reject_id_change(payload: &Payload, path_id: DbId) -> Result<(), CoreError> {
    match payload.get("id") {
        Some(value) if !id_matches(value, path_id) => {
            Err(CoreError::Validation(ID_CHANGE_NOT_ALLOWED.to_string()))
        }
        _ => Ok(()),
    }
}

fn id_matches(value: &Value, path_id: DbId) -> bool {
    match value.as_i64() {
        Some(id) => id == path_id,
        None => value.is_f64() && value.as_f64() == Some(path_id as f64),
    }
}

fn invalid_field(name: &str) -> CoreError {
    CoreError::Validation(format!("invalid value for field '{name}'"))
}

/// Extract `title`.
///
/// Absent yields `None`. Present must be a non-empty string; null, empty,
/// or any other JSON type is reported as a missing title.
pub fn title_field(payload: &Payload) -> Result<Option<String>, CoreError> {
    match payload.get("title") {
        None => Ok(None),
        Some(Value::String(title)) if !title.is_empty() => Ok(Some(title.clone())),
        Some(_) => Err(CoreError::Validation(TITLE_MISSING.to_string())),
    }
}

/// Extract a string field that may be explicitly cleared with `null`.
///
/// `None` means absent, `Some(None)` means null.
pub fn nullable_string_field(
    payload: &Payload,
    name: &str,
) -> Result<Option<Option<String>>, CoreError> {
    match payload.get(name) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(invalid_field(name)),
    }
}

/// Extract a boolean field that may be `null`.
pub fn nullable_bool_field(payload: &Payload, name: &str) -> Result<Option<Option<bool>>, CoreError> {
    match payload.get(name) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Bool(b)) => Ok(Some(Some(*b))),
        Some(_) => Err(invalid_field(name)),
    }
}

/// Extract a boolean field where `null` is not allowed.
pub fn bool_field(payload: &Payload, name: &str) -> Result<Option<bool>, CoreError> {
    match nullable_bool_field(payload, name)? {
        Some(None) => Err(invalid_field(name)),
        other => Ok(other.flatten()),
    }
}

/// Extract `deadline_at`, parsing strings with [`parse_deadline`].
pub fn deadline_field(payload: &Payload) -> Result<Option<Option<NaiveTimestamp>>, CoreError> {
    match payload.get("deadline_at") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => parse_deadline(s).map(|d| Some(Some(d))),
        Some(_) => Err(invalid_field("deadline_at")),
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 date or date-time into a naive UTC timestamp.
///
/// Accepted forms:
/// - `2023-02-27` (midnight)
/// - `2023-02-27T09:30`, `2023-02-27T09:30:15`, `2023-02-27T09:30:15.250`
///   (a space may replace the `T`)
/// - RFC 3339 with an offset, e.g. `2023-02-27T09:30:00+10:00`, which is
///   converted to UTC.
pub fn parse_deadline(input: &str) -> Result<NaiveTimestamp, CoreError> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_utc());
    }

    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(parsed);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| CoreError::Validation(format!("invalid deadline_at: {input}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn ts(s: &str) -> NaiveTimestamp {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    // --- Shape checks ---

    #[test]
    fn non_object_body_rejected() {
        assert!(as_payload(&json!([1, 2])).is_err());
        assert!(as_payload(&json!("title")).is_err());
        assert!(as_payload(&json!({})).is_ok());
    }

    #[test]
    fn all_entity_fields_are_known() {
        let p = payload(json!({
            "id": 1,
            "title": "a",
            "description": "b",
            "completed": true,
            "deadline_at": null,
            "created_at": "2023-02-20T00:00:00",
            "updated_at": "2023-02-20T00:00:00",
        }));
        assert!(unknown_fields(&p).is_empty());
        assert!(reject_unknown_fields(&p).is_ok());
    }

    #[test]
    fn unknown_field_rejects_payload() {
        let p = payload(json!({"title": "x", "foo": "bar"}));
        assert_eq!(unknown_fields(&p), vec!["foo"]);
        assert_matches!(
            reject_unknown_fields(&p),
            Err(CoreError::Validation(msg)) if msg == EXTRA_ELEMENTS
        );
    }

    #[test]
    fn matching_id_is_not_a_change() {
        let p = payload(json!({"id": 4, "title": "x"}));
        assert!(reject_id_change(&p, 4).is_ok());
        assert!(reject_id_change(&payload(json!({})), 4).is_ok());
        assert!(reject_id_change(&payload(json!({"id": 4.0})), 4).is_ok());
    }

    #[test]
    fn differing_or_non_integer_id_is_a_change() {
        assert_matches!(
            reject_id_change(&payload(json!({"id": 5})), 4),
            Err(CoreError::Validation(msg)) if msg == ID_CHANGE_NOT_ALLOWED
        );
        assert!(reject_id_change(&payload(json!({"id": "4"})), 4).is_err());
        assert!(reject_id_change(&payload(json!({"id": null})), 4).is_err());
        assert!(reject_id_change(&payload(json!({"id": 4.5})), 4).is_err());
    }

    // --- Field extraction ---

    #[test]
    fn title_absent_is_none() {
        assert_eq!(title_field(&payload(json!({}))).unwrap(), None);
    }

    #[test]
    fn title_empty_null_or_wrong_type_is_missing() {
        for bad in [json!({"title": ""}), json!({"title": null}), json!({"title": 7})] {
            assert_matches!(
                title_field(&payload(bad)),
                Err(CoreError::Validation(msg)) if msg == TITLE_MISSING
            );
        }
    }

    #[test]
    fn description_distinguishes_absent_null_and_set() {
        let name = "description";
        assert_eq!(nullable_string_field(&payload(json!({})), name).unwrap(), None);
        assert_eq!(
            nullable_string_field(&payload(json!({"description": null})), name).unwrap(),
            Some(None)
        );
        assert_eq!(
            nullable_string_field(&payload(json!({"description": "d"})), name).unwrap(),
            Some(Some("d".to_string()))
        );
        assert!(nullable_string_field(&payload(json!({"description": 1})), name).is_err());
    }

    #[test]
    fn completed_must_be_boolean() {
        assert_eq!(bool_field(&payload(json!({"completed": true})), "completed").unwrap(), Some(true));
        assert_eq!(bool_field(&payload(json!({})), "completed").unwrap(), None);
        assert!(bool_field(&payload(json!({"completed": "true"})), "completed").is_err());
        assert!(bool_field(&payload(json!({"completed": null})), "completed").is_err());
        assert_eq!(
            nullable_bool_field(&payload(json!({"completed": null})), "completed").unwrap(),
            Some(None)
        );
    }

    #[test]
    fn deadline_field_parses_or_clears() {
        assert_eq!(
            deadline_field(&payload(json!({"deadline_at": "2023-02-27T00:00:00"}))).unwrap(),
            Some(Some(ts("2023-02-27 00:00:00")))
        );
        assert_eq!(deadline_field(&payload(json!({"deadline_at": null}))).unwrap(), Some(None));
        assert!(deadline_field(&payload(json!({"deadline_at": 20230227}))).is_err());
    }

    // --- Deadline parsing ---

    #[test]
    fn parses_naive_date_time_forms() {
        assert_eq!(parse_deadline("2023-02-27T09:30:15").unwrap(), ts("2023-02-27 09:30:15"));
        assert_eq!(parse_deadline("2023-02-27 09:30:15").unwrap(), ts("2023-02-27 09:30:15"));
        assert_eq!(parse_deadline("2023-02-27T09:30").unwrap(), ts("2023-02-27 09:30:00"));
        assert_eq!(
            parse_deadline("2023-02-27T09:30:15.250").unwrap(),
            ts("2023-02-27 09:30:15.250")
        );
    }

    #[test]
    fn parses_date_only_as_midnight() {
        assert_eq!(parse_deadline("2023-02-27").unwrap(), ts("2023-02-27 00:00:00"));
    }

    #[test]
    fn offset_is_converted_to_utc() {
        assert_eq!(
            parse_deadline("2023-02-27T10:00:00+10:00").unwrap(),
            ts("2023-02-27 00:00:00")
        );
        assert_eq!(parse_deadline("2023-02-27T00:00:00Z").unwrap(), ts("2023-02-27 00:00:00"));
    }

    #[test]
    fn malformed_deadline_rejected() {
        for bad in ["", "tomorrow", "2023-13-01", "27/02/2023", "2023-02-27T25:00:00"] {
            assert_matches!(
                parse_deadline(bad),
                Err(CoreError::Validation(msg)) if msg.starts_with("invalid deadline_at")
            );
        }
    }
}
