use crate::{
    model::{FieldKind, FieldSchema, RecordSchema, TypeDescriptor},
    sql::{self, StatementKind, StatementShape, placeholder, wrap_identifier},
    test_fixtures::User,
    traits::Record,
};
use proptest::prelude::*;

const TABLE: &str = "TABLE1";
const WRAPPER: &str = "\"";

fn user_descriptor() -> TypeDescriptor {
    TypeDescriptor::build(User::schema(), "db", &[]).unwrap()
}

fn excluded_id() -> Vec<String> {
    vec!["Id".to_string()]
}

fn shape<'a>(wrapper: &'a str, filter: &'a str, excluded: &'a [String]) -> StatementShape<'a> {
    StatementShape {
        table: TABLE,
        identifier_wrapper: wrapper,
        filter_column: filter,
        excluded_tags: excluded,
    }
}

// ---- fixed expectations ------------------------------------------------

#[test]
fn insert_lists_columns_and_contiguous_placeholders() {
    let excluded = excluded_id();
    let d = user_descriptor();

    assert_eq!(
        sql::insert(&shape("", "", &excluded), &d),
        "INSERT INTO TABLE1 (Name, Password, Description) VALUES ($1,$2,$3)"
    );
    assert_eq!(
        sql::insert(&shape(WRAPPER, "", &excluded), &d),
        "INSERT INTO \"TABLE1\" (\"Name\", \"Password\", \"Description\") VALUES ($1,$2,$3)"
    );
    assert_eq!(
        sql::insert(&shape("", "Id", &excluded), &d),
        "INSERT INTO TABLE1 (Name, Password, Description) VALUES ($1,$2,$3) RETURNING Id"
    );
    assert_eq!(
        sql::insert(&shape(WRAPPER, "Id", &excluded), &d),
        "INSERT INTO \"TABLE1\" (\"Name\", \"Password\", \"Description\") VALUES ($1,$2,$3) RETURNING \"Id\""
    );
}

#[test]
fn update_reserves_first_placeholder_for_filter() {
    let excluded = excluded_id();
    let d = user_descriptor();

    assert_eq!(
        sql::update(&shape("", "", &excluded), &d),
        "UPDATE TABLE1 SET Name = $1, Password = $2, Description = $3"
    );
    assert_eq!(
        sql::update(&shape(WRAPPER, "", &excluded), &d),
        "UPDATE \"TABLE1\" SET \"Name\" = $1, \"Password\" = $2, \"Description\" = $3"
    );
    assert_eq!(
        sql::update(&shape("", "Id", &excluded), &d),
        "UPDATE TABLE1 SET Name = $2, Password = $3, Description = $4 WHERE Id = $1"
    );
}

#[test]
fn select_lists_columns_and_optional_filter() {
    let excluded = excluded_id();
    let d = user_descriptor();

    assert_eq!(
        sql::select(&shape("", "", &excluded), &d),
        "SELECT Name, Password, Description FROM TABLE1"
    );
    assert_eq!(
        sql::select(&shape(WRAPPER, "", &excluded), &d),
        "SELECT \"Name\", \"Password\", \"Description\" FROM \"TABLE1\""
    );
    assert_eq!(
        sql::select(&shape("", "Id", &excluded), &d),
        "SELECT Name, Password, Description FROM TABLE1 WHERE Id = $1"
    );
    assert_eq!(
        sql::select(&shape(WRAPPER, "Id", &excluded), &d),
        "SELECT \"Name\", \"Password\", \"Description\" FROM \"TABLE1\" WHERE \"Id\" = $1"
    );
}

#[test]
fn delete_ignores_columns() {
    let excluded = excluded_id();

    assert_eq!(sql::delete(&shape("", "", &excluded)), "DELETE FROM TABLE1");
    assert_eq!(
        sql::delete(&shape(WRAPPER, "", &excluded)),
        "DELETE FROM \"TABLE1\""
    );
    assert_eq!(
        sql::delete(&shape("", "Id", &excluded)),
        "DELETE FROM TABLE1 WHERE Id = $1"
    );
}

#[test]
fn statement_dispatches_by_kind() {
    let excluded = excluded_id();
    let d = user_descriptor();
    let s = shape("", "Id", &excluded);

    assert_eq!(sql::statement(StatementKind::Insert, &s, &d), sql::insert(&s, &d));
    assert_eq!(sql::statement(StatementKind::Update, &s, &d), sql::update(&s, &d));
    assert_eq!(sql::statement(StatementKind::Select, &s, &d), sql::select(&s, &d));
    assert_eq!(sql::statement(StatementKind::Delete, &s, &d), sql::delete(&s));
}

#[test]
fn default_tag_descriptor_yields_same_text_as_explicit_tag() {
    let excluded = excluded_id();
    let by_default = TypeDescriptor::build(User::schema(), "dbcn", &[]).unwrap();

    assert_eq!(
        sql::insert(&shape("", "", &excluded), &by_default),
        sql::insert(&shape("", "", &excluded), &user_descriptor())
    );
}

#[test]
fn empty_descriptor_produces_empty_lists() {
    let d = TypeDescriptor::build(User::schema(), "nothing", &[]).unwrap();

    assert_eq!(
        sql::insert(&shape("", "", &[]), &d),
        "INSERT INTO TABLE1 () VALUES ()"
    );
    assert_eq!(sql::select(&shape("", "", &[]), &d), "SELECT  FROM TABLE1");
}

#[test]
fn wrapper_is_not_escaped_inside_identifiers() {
    assert_eq!(wrap_identifier("a\"b", "\""), "\"a\"b\"");
    assert_eq!(wrap_identifier("plain", ""), "plain");
    assert_eq!(wrap_identifier("t", "`"), "`t`");
}

#[test]
fn placeholders_are_one_based_dollar_tokens() {
    assert_eq!(placeholder(1), "$1");
    assert_eq!(placeholder(12), "$12");
}

// ---- properties --------------------------------------------------------

fn schema_with_columns(columns: &[String]) -> RecordSchema {
    let fields = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            FieldSchema::new(format!("f{i}"), "i64", FieldKind::Int).with_tag("db", column.clone())
        })
        .collect();

    RecordSchema::new("prop::Row".to_string(), fields)
}

fn arb_columns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{0,6}", 1..8)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn insert_lists_every_column_in_declaration_order(columns in arb_columns()) {
        let d = TypeDescriptor::build(&schema_with_columns(&columns), "db", &[]).unwrap();
        let s = StatementShape { table: "t", ..StatementShape::default() };

        let placeholders = (1..=columns.len())
            .map(placeholder)
            .collect::<Vec<_>>()
            .join(",");
        let expected = format!(
            "INSERT INTO t ({}) VALUES ({placeholders})",
            columns.join(", ")
        );

        prop_assert_eq!(sql::insert(&s, &d), expected);
    }

    #[test]
    fn excluding_a_column_renumbers_contiguously(
        columns in arb_columns(),
        pick in any::<prop::sample::Index>(),
    ) {
        let d = TypeDescriptor::build(&schema_with_columns(&columns), "db", &[]).unwrap();
        let dropped = columns[pick.index(columns.len())].clone();
        let excluded = vec![dropped.clone()];
        let s = StatementShape {
            table: "t",
            filter_column: "Key",
            excluded_tags: &excluded,
            ..StatementShape::default()
        };

        let kept: Vec<_> = columns.iter().filter(|c| **c != dropped).collect();
        let set = kept
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ${}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");

        prop_assert_eq!(
            sql::update(&s, &d),
            format!("UPDATE t SET {set} WHERE Key = $1")
        );
    }

    #[test]
    fn wrapper_never_touches_placeholders(
        columns in arb_columns(),
        wrapper in "[\"`']{1,2}",
    ) {
        let d = TypeDescriptor::build(&schema_with_columns(&columns), "db", &[]).unwrap();
        let s = StatementShape {
            table: "t",
            identifier_wrapper: &wrapper,
            filter_column: "Key",
            excluded_tags: &[],
        };

        let text = sql::update(&s, &d);
        for n in 1..=columns.len() + 1 {
            let wrapped = format!("{wrapper}${n}");
            prop_assert!(!text.contains(&wrapped), "placeholder wrapped in {text}");
        }
        for column in &columns {
            let wrapped = format!("{wrapper}{column}{wrapper} = $");
            prop_assert!(text.contains(&wrapped), "column not wrapped in {text}");
        }
    }

    #[test]
    fn synthesis_is_deterministic(columns in arb_columns(), filter in "[A-Z]{0,3}") {
        let d = TypeDescriptor::build(&schema_with_columns(&columns), "db", &[]).unwrap();
        let s = StatementShape { table: "t", filter_column: &filter, ..StatementShape::default() };

        for kind in StatementKind::ALL {
            prop_assert_eq!(sql::statement(kind, &s, &d), sql::statement(kind, &s, &d.clone()));
        }
    }
}
