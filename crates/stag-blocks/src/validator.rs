//! Turns a decoded payload into a block command or a rejection.
//!
//! Validation is a pure function of the payload and the store's current lowest
//! `sort_order`; it never touches the store itself.

use serde_json::Value;

use crate::block::{Block, NAME_KEY, SORT_ORDER_KEY};
use crate::errors::RequestError;
use crate::request::{Payload, value_kind};

/// Key that selects the diagnostic dump.
pub const DEBUG_KEY: &str = "debug";
/// Input-only key carrying a nested JSON object of extra attributes.
pub const JSON_KEY: &str = "json";
/// Input-only key marking a deletion.
pub const REMOVE_KEY: &str = "remove";

/// Switches for optional protocol extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Whether a payload carrying a `debug` key requests a store dump.
    pub debug_requests: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            debug_requests: true,
        }
    }
}

/// A well-formed producer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockCommand {
    /// Dump the store without mutating it.
    Debug,
    /// Insert or replace a block.
    Upsert(Block),
    /// Delete the named block if present.
    Remove {
        /// Name of the block to delete.
        name: String,
    },
}

/// Sort order assigned to a block that does not specify one: one below the
/// current minimum, or zero for an empty store.
#[must_use]
pub const fn default_sort_order(lowest: Option<i64>) -> i64 {
    match lowest {
        Some(minimum) => minimum.saturating_sub(1),
        None => 0,
    }
}

/// Validates and normalises a decoded payload.
///
/// Nested `json` attributes only fill keys the payload does not already set.
/// The input-only `json` and `remove` keys never reach the stored block.
///
/// # Errors
///
/// Returns a [`RequestError`] describing the first structural problem found.
pub fn validate(
    mut payload: Payload,
    lowest_sort_order: Option<i64>,
    policy: ValidationPolicy,
) -> Result<BlockCommand, RequestError> {
    if policy.debug_requests && payload.contains_key(DEBUG_KEY) {
        return Ok(BlockCommand::Debug);
    }

    if let Some(nested) = payload.shift_remove(JSON_KEY) {
        merge_nested(&mut payload, nested)?;
    }

    let name = match payload.get(NAME_KEY) {
        Some(Value::String(name)) => name.clone(),
        _ => return Err(RequestError::MissingName),
    };

    let remove = match payload.shift_remove(REMOVE_KEY) {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::Bool(true)) => true,
        Some(_) => return Err(RequestError::InvalidRemoveFlag),
    };
    if remove {
        return Ok(BlockCommand::Remove { name });
    }

    let sort_order = match payload.get(SORT_ORDER_KEY) {
        None | Some(Value::Null) => {
            let assigned = default_sort_order(lowest_sort_order);
            payload.insert(SORT_ORDER_KEY.to_owned(), Value::from(assigned));
            assigned
        }
        Some(value) => value.as_i64().ok_or(RequestError::InvalidSortOrder)?,
    };

    Ok(BlockCommand::Upsert(Block::from_fields(
        name, sort_order, payload,
    )))
}

fn merge_nested(payload: &mut Payload, nested: Value) -> Result<(), RequestError> {
    let Value::String(raw) = nested else {
        return Err(RequestError::malformed_json(format!(
            "expected a string, found {}",
            value_kind(&nested)
        )));
    };
    let parsed: Value =
        serde_json::from_str(&raw).map_err(|error| RequestError::malformed_json(error.to_string()))?;
    let Value::Object(attributes) = parsed else {
        return Err(RequestError::malformed_json(format!(
            "expected a JSON object, found {}",
            value_kind(&parsed)
        )));
    };
    for (key, value) in attributes {
        if key != JSON_KEY && !payload.contains_key(&key) {
            payload.insert(key, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("test payload must be an object, got {other}"),
        }
    }

    fn upserted(command: BlockCommand) -> Block {
        match command {
            BlockCommand::Upsert(block) => block,
            other => panic!("expected upsert, got {other:?}"),
        }
    }

    #[rstest]
    #[case::empty_store(None, 0)]
    #[case::positive_minimum(Some(5), 4)]
    #[case::negative_minimum(Some(-3), -4)]
    #[case::saturates(Some(i64::MIN), i64::MIN)]
    fn assigns_default_sort_order(#[case] lowest: Option<i64>, #[case] expected: i64) {
        let command = validate(payload(json!({"name": "a"})), lowest, ValidationPolicy::default())
            .expect("valid payload");
        let block = upserted(command);
        assert_eq!(block.sort_order(), expected);
        assert_eq!(block.attribute("sort_order"), Some(&Value::from(expected)));
    }

    #[test]
    fn explicit_sort_order_is_kept() {
        let command = validate(
            payload(json!({"name": "a", "sort_order": 9})),
            Some(1),
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        assert_eq!(upserted(command).sort_order(), 9);
    }

    #[test]
    fn null_sort_order_counts_as_absent() {
        let command = validate(
            payload(json!({"name": "a", "sort_order": null})),
            Some(10),
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        assert_eq!(upserted(command).sort_order(), 9);
    }

    #[rstest]
    #[case::string(json!("5"))]
    #[case::float(json!(1.5))]
    #[case::boolean(json!(true))]
    fn rejects_non_integer_sort_order(#[case] sort_order: Value) {
        let result = validate(
            payload(json!({"name": "a", "sort_order": sort_order})),
            None,
            ValidationPolicy::default(),
        );
        assert_eq!(result, Err(RequestError::InvalidSortOrder));
    }

    #[rstest]
    #[case::absent(json!({"sort_order": 1}))]
    #[case::null(json!({"name": null}))]
    #[case::number(json!({"name": 7}))]
    fn rejects_missing_name(#[case] body: Value) {
        let result = validate(payload(body), None, ValidationPolicy::default());
        assert_eq!(result, Err(RequestError::MissingName));
        assert_eq!(
            RequestError::MissingName.to_string(),
            "Block does not have a name."
        );
    }

    #[test]
    fn nested_json_fills_gaps_and_is_stripped() {
        let command = validate(
            payload(json!({"name": "b", "color": "#ff0000", "json": r##"{"full_text":"x","color":"#00ff00"}"##})),
            None,
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        let block = upserted(command);
        assert_eq!(block.attribute("full_text"), Some(&Value::from("x")));
        assert_eq!(block.attribute("color"), Some(&Value::from("#ff0000")));
        assert!(block.attribute("json").is_none());
    }

    #[test]
    fn nested_json_may_supply_the_name() {
        let command = validate(
            payload(json!({"json": r#"{"name":"inner","sort_order":2}"#})),
            None,
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        let block = upserted(command);
        assert_eq!(block.name(), "inner");
        assert_eq!(block.sort_order(), 2);
    }

    #[rstest]
    #[case::unparsable(json!("{bad"))]
    #[case::not_an_object(json!("[1, 2]"))]
    #[case::not_a_string(json!({"full_text": "x"}))]
    fn rejects_malformed_nested_json(#[case] nested: Value) {
        let result = validate(
            payload(json!({"name": "b", "json": nested})),
            None,
            ValidationPolicy::default(),
        );
        let error = result.expect_err("nested json should be rejected");
        assert!(matches!(error, RequestError::MalformedJson { .. }));
        assert!(error.to_string().starts_with("Malformed JSON: "));
    }

    #[test]
    fn remove_flag_yields_remove_command() {
        let command = validate(
            payload(json!({"name": "a", "remove": true})),
            None,
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        assert_eq!(command, BlockCommand::Remove { name: "a".into() });
    }

    #[test]
    fn false_remove_flag_is_stripped_from_upserts() {
        let command = validate(
            payload(json!({"name": "a", "remove": false, "full_text": "x"})),
            None,
            ValidationPolicy::default(),
        )
        .expect("valid payload");
        let block = upserted(command);
        assert!(block.attribute("remove").is_none());
        let keys: Vec<&str> = block.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "full_text", "sort_order"]);
    }

    #[test]
    fn rejects_non_boolean_remove_flag() {
        let result = validate(
            payload(json!({"name": "a", "remove": "yes"})),
            None,
            ValidationPolicy::default(),
        );
        assert_eq!(result, Err(RequestError::InvalidRemoveFlag));
    }

    #[test]
    fn debug_key_short_circuits_when_enabled() {
        let command = validate(
            payload(json!({"debug": true})),
            None,
            ValidationPolicy::default(),
        )
        .expect("debug payload");
        assert_eq!(command, BlockCommand::Debug);
    }

    #[test]
    fn debug_key_is_ordinary_when_disabled() {
        let result = validate(
            payload(json!({"debug": true})),
            None,
            ValidationPolicy {
                debug_requests: false,
            },
        );
        assert_eq!(result, Err(RequestError::MissingName));
    }
}
