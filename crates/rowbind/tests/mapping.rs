use proptest::prelude::*;
use rowbind::{
    db::ScriptedBackend,
    error::{ConfigurationError, ScanError},
    model::FieldKind,
    prelude::*,
};
use std::{sync::Arc, thread};

///
/// Status
/// Custom column type stored as text.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Status {
    #[default]
    Active,
    Suspended,
}

impl FieldValue for Status {
    fn to_value(&self) -> Value {
        match self {
            Self::Active => Value::from("active"),
            Self::Suspended => Value::from("suspended"),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value.as_text()? {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub struct Account {
    #[tag(dbcn = "account_id")]
    pub id: u64,
    #[tag(dbcn = "display_name")]
    pub display_name: Option<String>,
    #[tag(dbcn = "avatar")]
    pub avatar: Vec<u8>,
    #[tag(dbcn = "balance")]
    pub balance: f64,
    #[tag(dbcn = "status")]
    pub status: Status,
    #[tag(dbcn = "verified")]
    pub verified: bool,
    pub cached_score: i32,
}

fn accounts() -> QueryConfig<Account> {
    QueryConfig::<Account>::new("accounts")
}

fn account_row(id: u64, name: Option<&str>, status: &str) -> Vec<Value> {
    params![id, name, vec![1u8, 2], 10.5f64, status, true]
}

#[test]
fn derived_schema_describes_every_field() {
    let schema = Account::schema();

    assert!(schema.path.ends_with("::Account"));
    assert_eq!(schema.fields.len(), 7);
    assert_eq!(
        schema.fields[1].kind,
        FieldKind::Optional(Box::new(FieldKind::Text))
    );
    assert_eq!(schema.fields[2].kind, FieldKind::Blob);
    assert_eq!(schema.fields[4].kind, FieldKind::Custom);
    assert_eq!(schema.fields[6].tag("dbcn"), "");
}

#[test]
fn default_tag_maps_custom_and_optional_columns() {
    let backend = Arc::new(ScriptedBackend::new());
    let db = Db::new(backend.clone());

    backend.push_rows(vec![
        account_row(1, Some("ann"), "active"),
        account_row(2, None, "suspended"),
    ]);

    let mut dest: Vec<Account> = Vec::new();
    db.select(&accounts(), &mut dest, &[]).unwrap();

    assert_eq!(
        backend.last_call().unwrap().sql,
        "SELECT account_id, display_name, avatar, balance, status, verified FROM accounts"
    );
    assert_eq!(dest[0].display_name.as_deref(), Some("ann"));
    assert_eq!(dest[0].status, Status::Active);
    assert_eq!(dest[1].display_name, None);
    assert_eq!(dest[1].status, Status::Suspended);
    assert_eq!(dest[1].avatar, vec![1, 2]);
    assert_eq!(dest[1].cached_score, 0);
}

#[test]
fn custom_type_rejects_unknown_text() {
    let backend = Arc::new(ScriptedBackend::new());
    let db = Db::new(backend.clone());

    backend.push_rows(vec![account_row(1, None, "banned")]);

    let mut dest: Vec<Arc<Account>> = Vec::new();
    let err = db.select(&accounts(), &mut dest, &[]).unwrap_err();

    assert!(matches!(
        err,
        Error::Scan(ScanError::TypeMismatch { index: 4, .. })
    ));
    assert!(dest.is_empty());
}

#[test]
fn optional_prototype_field_becomes_null_argument() {
    let backend = Arc::new(ScriptedBackend::new());
    let db = Db::new(backend.clone());
    backend.push_id(3);

    let config = accounts()
        .with_excluded_tags(["account_id"])
        .with_filter_column("account_id")
        .with_item(Account {
            id: 3,
            balance: 1.0,
            ..Account::default()
        });

    db.insert(&config, &[]).unwrap();

    let call = backend.last_call().unwrap();
    assert_eq!(
        call.sql,
        "INSERT INTO accounts (display_name, avatar, balance, status, verified) \
         VALUES ($1,$2,$3,$4,$5) RETURNING account_id"
    );
    assert_eq!(
        call.args,
        vec![
            Value::Null,
            Value::Blob(Vec::new()),
            Value::Float64(1.0),
            Value::from("active"),
            Value::Bool(false),
        ]
    );
}

#[test]
fn update_filter_must_name_a_persisted_column() {
    let backend = Arc::new(ScriptedBackend::new());
    let db = Db::new(backend.clone());

    let config = accounts()
        .with_filter_column("cached_score")
        .with_item(Account::default());

    let err = db.update(&config, &[]).unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::FilterFieldNotFound { .. })
    ));
}

#[test]
fn facade_is_shared_across_threads() {
    let backend = Arc::new(ScriptedBackend::new());
    let db = Arc::new(Db::new(backend.clone()));

    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let config = accounts().with_filter_column("account_id");
                let mut dest: Vec<Account> = Vec::new();
                db.select(&config, &mut dest, &params![i]).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let calls = backend.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|c| c.sql == calls[0].sql));
}

proptest! {
    #[test]
    fn cached_and_fresh_synthesis_agree(
        table in "[a-z]{1,12}",
        wrapper in prop::sample::select(vec!["", "\"", "`"]),
        filter in prop::sample::select(vec!["", "account_id", "status"]),
        excluded in prop::sample::subsequence(
            vec!["account_id", "display_name", "avatar", "balance", "status", "verified"],
            0..=6,
        ),
    ) {
        let backend = Arc::new(ScriptedBackend::new());
        let db = Db::new(backend.clone());
        let config = accounts()
            .with_table(table)
            .with_identifier_wrapper(wrapper)
            .with_filter_column(filter)
            .with_excluded_tags(excluded);
        let mut dest: Vec<Account> = Vec::new();

        db.select(&config, &mut dest, &[]).unwrap();
        db.delete(&config, &[]).unwrap();
        db.use_cached_sql(false);
        db.select(&config, &mut dest, &[]).unwrap();
        db.delete(&config, &[]).unwrap();

        let calls = backend.calls();
        prop_assert_eq!(&calls[0].sql, &calls[2].sql);
        prop_assert_eq!(&calls[1].sql, &calls[3].sql);
    }
}
