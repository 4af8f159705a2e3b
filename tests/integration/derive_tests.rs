//! `#[derive(Columns)]` end to end.

use datagate::{Columns, DataType, RequestElement as E, build_context};

#[allow(dead_code)]
#[derive(Columns)]
#[columns(rename_all = "camelCase")]
struct Customer {
    id: i64,
    display_name: String,
    score: Option<f64>,
    active: bool,
    #[column(type = "DATE")]
    birthday: String,
    tags: Vec<String>,
    #[column(name = "zip")]
    postal_code: String,
    #[column(skip)]
    cache_key: u64,
}

#[test]
fn test_derived_schema() {
    let columns = Customer::columns();
    let described: Vec<(&str, DataType)> =
        columns.iter().map(|c| (c.name(), c.data_type())).collect();

    assert_eq!(
        described,
        vec![
            ("id", DataType::Long),
            ("displayName", DataType::String),
            ("score", DataType::Double),
            ("active", DataType::Boolean),
            ("birthday", DataType::Date),
            ("tags", DataType::ListOfStrings),
            ("zip", DataType::String),
        ]
    );
}

#[test]
fn test_derived_schema_drives_inference() {
    let predicate = E::and([
        E::starts_with("displayName", "Ann", false),
        E::greater_than(E::column("score"), E::value(3)),
    ]);

    let context = build_context(&Customer::columns(), &predicate).unwrap();
    assert_eq!(context.get(&E::value(3)), Some(DataType::Double));
}
