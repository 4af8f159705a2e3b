//! Predicate type inference against JSON input.

use datagate::query::{walk, NodeCounter};
use datagate::{
    build_context, ColumnName, ContextBuilder, DataType, ErrorKind, Reason, RequestElement as E,
    Value,
};
use proptest::prelude::*;
use serde_json::json;

use crate::common::{customer_columns, init_tracing};

fn parse(predicate: serde_json::Value) -> E {
    serde_json::from_value(predicate).expect("predicate should deserialize")
}

#[test]
fn test_json_predicate_is_fully_typed() {
    init_tracing();
    let predicate = parse(json!({
        "type": "and",
        "operands": [
            {
                "type": "greaterThanOrEqual",
                "left": {"type": "columnName", "name": "score"},
                "right": {"type": "value", "value": 7}
            },
            {
                "type": "in",
                "column": {"name": "city"},
                "values": [{"value": "Berlin"}, {"value": "Paris"}]
            },
            {
                "type": "or",
                "operands": [
                    {"type": "columnName", "name": "active"},
                    {
                        "type": "endsWith",
                        "column": {"name": "name"},
                        "value": {"value": "son"},
                        "caseSensitive": true
                    }
                ]
            }
        ]
    }));

    let context = build_context(&customer_columns(), &predicate).unwrap();

    assert_eq!(context.require(&predicate).unwrap(), DataType::Boolean);
    assert_eq!(context.value_type(&Value::new(7)), Some(DataType::Double));
    assert_eq!(context.value_type(&Value::new("Berlin")), Some(DataType::String));
    assert_eq!(context.value_type(&Value::new("Paris")), Some(DataType::String));
    assert_eq!(context.value_type(&Value::new("son")), Some(DataType::String));
    assert_eq!(context.column_type(&ColumnName::new("active")), Some(DataType::Boolean));

    let nodes = walk(&predicate, NodeCounter::default()).unwrap().count();
    assert!(context.len() <= nodes);
}

#[test]
fn test_rejections_carry_reason_codes() {
    init_tracing();
    let cases = [
        (E::equal(E::column("missing"), E::value(1)), Reason::UnknownColumn),
        (E::and([E::column("id")]), Reason::ChildrenNotBoolean),
        (E::equal(E::column("name"), E::value(true)), Reason::DifferentLeftRightType),
        (E::ends_with("score", "x", false), Reason::ColumnNotString),
        (
            E::and([E::equal(E::column("id"), E::value(5)), E::contains("name", 5, false)]),
            Reason::ValueNotString,
        ),
    ];

    for (predicate, reason) in cases {
        let err = build_context(&customer_columns(), &predicate).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter, "{predicate:?}");
        assert_eq!(err.reason(), Some(reason), "{predicate:?}");
        assert!(!err.is_retriable());
    }
}

#[test]
fn test_builder_is_reusable_across_predicates() {
    let builder = ContextBuilder::new(&customer_columns());

    let first = builder.build(&E::equal(E::column("id"), E::value(1))).unwrap();
    let second = builder.build(&E::starts_with("city", "Ber", false)).unwrap();

    assert_eq!(first.value_type(&Value::new(1)), Some(DataType::Long));
    assert!(second.value_type(&Value::new(1)).is_none());
}

#[test]
fn test_literal_only_comparison_needs_require() {
    let predicate = E::equal(E::value(1), E::value(2));
    let context = build_context(&customer_columns(), &predicate).unwrap();

    let err = context.require(&E::value(1)).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::UntypedElement));
}

fn leaf() -> impl Strategy<Value = E> {
    prop_oneof![
        any::<i64>().prop_map(|v| E::greater_than(E::column("id"), E::value(v))),
        (-1.0e9..1.0e9f64).prop_map(|v| E::lower_than_or_equal(E::value(v), E::column("score"))),
        "[a-z]{0,6}".prop_map(|s| E::starts_with("city", s, false)),
        "[a-z]{0,6}".prop_map(|s| E::contains("name", s, true)),
        any::<bool>().prop_map(|b| E::not_equal(E::column("active"), E::value(b))),
        prop::collection::vec(any::<i64>(), 1..4).prop_map(|vs| E::not_in("id", vs)),
    ]
}

fn predicate() -> impl Strategy<Value = E> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(E::and),
            prop::collection::vec(inner, 1..4).prop_map(E::or),
        ]
    })
}

proptest! {
    #[test]
    fn prop_well_typed_predicates_type_every_leaf(predicate in predicate()) {
        let context = build_context(&customer_columns(), &predicate).unwrap();

        prop_assert_eq!(context.require(&predicate).unwrap(), DataType::Boolean);
        for (node, data_type) in context.iter() {
            if let E::ColumnName(column) = node {
                let declared = customer_columns()
                    .into_iter()
                    .find(|c| c.name() == column.name())
                    .map(|c| c.data_type());
                prop_assert_eq!(Some(data_type), declared);
            }
        }
    }

    #[test]
    fn prop_one_bad_leaf_poisons_the_tree(predicate in predicate(), flag in any::<bool>()) {
        let poisoned = E::and([predicate, E::equal(E::column("name"), E::value(flag))]);

        let err = build_context(&customer_columns(), &poisoned).unwrap_err();
        prop_assert_eq!(err.reason(), Some(Reason::DifferentLeftRightType));
    }

    #[test]
    fn prop_inference_is_deterministic(predicate in predicate()) {
        let first = build_context(&customer_columns(), &predicate).unwrap();
        let second = build_context(&customer_columns(), &predicate).unwrap();
        prop_assert_eq!(first, second);
    }
}
