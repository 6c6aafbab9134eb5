//! Property-based tests for the variable engine
//!
//! Covers interpolation, inline functions, JSON extraction, assertion
//! containment and namespace clearing over generated inputs.

use mjau::assertions::{evaluate, Assertion};
use mjau::variables::{call_inline_function, extract, interpolate, VariableStore};
use proptest::prelude::*;

/// Keys shaped like real variable names: `a`, `environment.host`, `x_1`.
fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}(\\.[a-z][a-z0-9_]{0,8}){0,2}"
}

/// Values without any braces, so they cannot form placeholders.
fn arb_plain_value() -> impl Strategy<Value = String> {
    "[^{}]{0,32}"
}

fn arb_namespaced_key() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("environment."),
            Just("request."),
            Just("response."),
            Just("user."),
            Just(""),
        ],
        "[a-z]{1,6}",
    )
        .prop_map(|(prefix, name)| format!("{}{}", prefix, name))
}

proptest! {
    #[test]
    fn prop_known_key_resolves_to_value(
        key in arb_key(),
        value in arb_plain_value(),
        others in prop::collection::vec((arb_key(), arb_plain_value()), 0..5),
    ) {
        let mut store: VariableStore = others.into_iter().collect();
        store.set(key.clone(), value.clone());

        let template = format!("{{{{{}}}}}", key);
        prop_assert_eq!(interpolate(&template, &store).unwrap(), value);
    }

    #[test]
    fn prop_substituted_values_are_not_rescanned(
        key in arb_key(),
        other in arb_key(),
        other_value in arb_plain_value(),
    ) {
        prop_assume!(key != other);
        let mut store = VariableStore::new();
        store.set(other.clone(), other_value);
        store.set(key.clone(), format!("{{{{{}}}}}", other));

        let result = interpolate(&format!("{{{{{}}}}}", key), &store).unwrap();
        prop_assert_eq!(result, format!("{{{{{}}}}}", other));
    }

    #[test]
    fn prop_text_without_markers_is_unchanged(text in "[^{]{0,64}") {
        let mut store = VariableStore::new();
        store.set("a", "b");
        prop_assert_eq!(interpolate(&text, &store).unwrap(), text);
    }

    #[test]
    fn prop_random_stays_below_bound(bound in 1u64..1_000_000_000) {
        let value = call_inline_function("random", &[bound.to_string()])
            .unwrap()
            .unwrap();
        let n: u64 = value.parse().unwrap();
        prop_assert!(n < bound);
    }

    #[test]
    fn prop_extract_never_panics(json in ".{0,64}", path in "[a-z0-9.\\[\\]#*]{0,16}") {
        let _ = extract(&json, &path);
    }

    #[test]
    fn prop_extract_absent_field_is_empty(
        fields in prop::collection::btree_map("[a-m]{1,5}", any::<i32>(), 0..5),
        missing in "[n-z]{1,5}",
    ) {
        let json = serde_json::to_string(&fields).unwrap();
        prop_assert_eq!(extract(&json, &missing), "");
    }

    #[test]
    fn prop_contains_matches_substring(actual in "[a-c]{0,8}", expected in "[a-c]{0,3}") {
        let mut store = VariableStore::new();
        store.set("response.body", actual.clone());

        let outcome = evaluate(&Assertion::new("response.body", "contains", expected.clone()), &store);
        prop_assert_eq!(outcome.is_pass(), actual.contains(&expected));
    }

    #[test]
    fn prop_clearing_request_and_response_keeps_the_rest(
        keys in prop::collection::vec(arb_namespaced_key(), 0..20),
    ) {
        let mut store = VariableStore::new();
        for key in &keys {
            store.set(key.clone(), "v");
        }
        let expected: Vec<String> = store
            .iter()
            .map(|v| v.key.clone())
            .filter(|k| !k.starts_with("request.") && !k.starts_with("response."))
            .collect();

        store.clear_by_prefix("request.");
        store.clear_by_prefix("response.");

        let remaining: Vec<String> = store.iter().map(|v| v.key.clone()).collect();
        prop_assert_eq!(remaining, expected);
    }
}

#[test]
fn test_uuid_is_valid() {
    let value = call_inline_function("uuid", &[]).unwrap().unwrap();
    let parsed = uuid::Uuid::parse_str(&value).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
}

#[test]
fn test_timestamp_is_rfc3339() {
    let value = call_inline_function("timestamp", &[]).unwrap().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(&value).is_ok(), "{}", value);
}
