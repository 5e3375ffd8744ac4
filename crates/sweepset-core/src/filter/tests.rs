use crate::{
    filter::{CompareOp, FilterDescriptor},
    schema::{CollectionSchema, FieldType},
    types::RecordId,
    value::Value,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn messages_schema() -> CollectionSchema {
    CollectionSchema::new("messages")
        .field("status", FieldType::Text)
        .field("priority", FieldType::Int)
        .field("starred", FieldType::Bool)
        .field("thread", FieldType::Ulid)
}

fn row(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn conjunction_semantics() {
    let filter = FilterDescriptor::match_all()
        .eq("status", "unreplied")
        .gt("priority", 2i64);

    let hit = row(&[
        ("status", Value::from("unreplied")),
        ("priority", Value::Int(5)),
    ]);
    let miss = row(&[
        ("status", Value::from("unreplied")),
        ("priority", Value::Int(1)),
    ]);

    assert!(filter.matches(&hit));
    assert!(!filter.matches(&miss));
}

#[test]
fn missing_field_is_a_non_match() {
    let filter = FilterDescriptor::match_all().eq("status", "unreplied");
    let empty = row(&[]);

    assert!(!filter.matches(&empty));
    // Ne over a missing field is also a non-match, not a vacuous match.
    let filter = FilterDescriptor::match_all().ne("status", "replied");
    assert!(!filter.matches(&empty));
}

#[test]
fn match_all_matches_everything() {
    assert!(FilterDescriptor::match_all().matches(&row(&[])));
}

#[test]
fn set_membership() {
    let filter = FilterDescriptor::match_all().in_list("status", ["open", "pending"]);

    assert!(filter.matches(&row(&[("status", Value::from("open"))])));
    assert!(!filter.matches(&row(&[("status", Value::from("closed"))])));

    let filter = FilterDescriptor::match_all().not_in("status", ["open", "pending"]);
    assert!(filter.matches(&row(&[("status", Value::from("closed"))])));
}

#[test]
fn validate_rejects_unknown_field() {
    let schema = messages_schema();
    let err = FilterDescriptor::match_all()
        .eq("nope", 1i64)
        .validate(&schema)
        .unwrap_err();

    assert!(matches!(err, super::FilterError::UnknownField { field } if field == "nope"));
}

#[test]
fn validate_rejects_range_on_bool() {
    let schema = messages_schema();
    let err = FilterDescriptor::match_all()
        .gt("starred", true)
        .validate(&schema)
        .unwrap_err();

    assert!(matches!(
        err,
        super::FilterError::UnsupportedOperator {
            op: CompareOp::Gt,
            ty: FieldType::Bool,
            ..
        }
    ));
}

#[test]
fn validate_rejects_cross_family_literal() {
    let schema = messages_schema();
    let err = FilterDescriptor::match_all()
        .eq("priority", "high")
        .validate(&schema)
        .unwrap_err();

    assert!(matches!(err, super::FilterError::TypeMismatch { .. }));
}

#[test]
fn validate_rejects_scalar_for_in() {
    let schema = messages_schema();
    let filter = FilterDescriptor::match_all().with("status", CompareOp::In, "open");

    assert!(matches!(
        filter.validate(&schema).unwrap_err(),
        super::FilterError::ListRequired { .. }
    ));
}

#[test]
fn validate_checks_list_elements() {
    let schema = messages_schema();
    let filter = FilterDescriptor::match_all().with(
        "status",
        CompareOp::In,
        Value::List(vec![Value::from("open"), Value::Int(3)]),
    );

    assert!(matches!(
        filter.validate(&schema).unwrap_err(),
        super::FilterError::TypeMismatch { .. }
    ));
}

#[test]
fn wire_round_trip() {
    let filter = FilterDescriptor::match_all()
        .eq("status", "unreplied")
        .in_list("priority", [1i64, 2])
        .contains("status", "rep");

    let json = serde_json::to_string(&filter).expect("filter should serialize");
    let back: FilterDescriptor = serde_json::from_str(&json).expect("filter should deserialize");

    assert_eq!(filter, back);
}

// ─────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        "[a-z]{0,6}".prop_map(Value::Text),
        any::<u128>().prop_map(|n| Value::Ulid(RecordId::from_u128(n))),
    ]
}

fn arb_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Eq),
        Just(CompareOp::Ne),
        Just(CompareOp::Lt),
        Just(CompareOp::Lte),
        Just(CompareOp::Gt),
        Just(CompareOp::Gte),
        Just(CompareOp::Contains),
    ]
}

proptest! {
    // Determinism and purity: same row, same verdict, every time.
    #[test]
    fn evaluation_is_deterministic(
        field_value in arb_value(),
        literal in arb_value(),
        op in arb_op(),
    ) {
        let filter = FilterDescriptor::match_all().with("f", op, literal);
        let row = row(&[("f", field_value)]);

        let first = filter.matches(&row);
        for _ in 0..3 {
            prop_assert_eq!(filter.matches(&row), first);
        }
    }

    // Eq and Ne are complementary whenever the comparison is defined.
    #[test]
    fn eq_ne_complement(field_value in arb_value(), literal in arb_value()) {
        let row = row(&[("f", field_value.clone())]);
        let eq = FilterDescriptor::match_all().eq("f", literal.clone());
        let ne = FilterDescriptor::match_all().ne("f", literal.clone());

        if field_value.compare_eq(&literal).is_some() {
            prop_assert_ne!(eq.matches(&row), ne.matches(&row));
        } else {
            // Undefined comparisons are non-matches on both sides.
            prop_assert!(!eq.matches(&row));
            prop_assert!(!ne.matches(&row));
        }
    }
}
