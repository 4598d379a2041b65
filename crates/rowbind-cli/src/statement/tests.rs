use super::{Overrides, StatementError, StatementFile};
use rowbind_core::{error::ConfigurationError, sql::StatementKind};

const USERS: &str = r#"{
    "table": "users",
    "tag": "db",
    "excluded": ["Id"],
    "record": {
        "path": "app::User",
        "fields": [
            { "name": "id", "ty": "i64", "kind": "int", "tags": { "db": "Id" } },
            { "name": "name", "ty": "String", "kind": "text", "tags": { "db": "Name" } },
            { "name": "password", "ty": "String", "kind": "text", "tags": { "db": "Password" } },
            { "name": "description", "ty": "String", "kind": "text", "tags": { "db": "Description" } },
            { "name": "roles", "ty": "Vec<i32>", "kind": "unsupported", "tags": { "db": "Roles" } }
        ]
    }
}"#;

fn users() -> StatementFile {
    StatementFile::parse(USERS).unwrap()
}

#[test]
fn renders_every_kind_in_order() {
    let rendered = users()
        .apply(Overrides {
            filter: Some("Id".to_string()),
            ..Overrides::default()
        })
        .render(&StatementKind::ALL)
        .unwrap();

    let texts: Vec<_> = rendered.iter().map(|(_, sql)| sql.as_str()).collect();
    assert_eq!(
        texts,
        [
            "INSERT INTO users (Name, Password, Description) VALUES ($1,$2,$3) RETURNING Id",
            "UPDATE users SET Name = $2, Password = $3, Description = $4 WHERE Id = $1",
            "SELECT Name, Password, Description FROM users WHERE Id = $1",
            "DELETE FROM users WHERE Id = $1",
        ]
    );
}

#[test]
fn overrides_replace_file_settings() {
    let file = users().apply(Overrides {
        table: Some("accounts".to_string()),
        wrapper: Some("\"".to_string()),
        excluded: vec!["Password".to_string()],
        ..Overrides::default()
    });

    let rendered = file.render(&[StatementKind::Select]).unwrap();

    assert_eq!(
        rendered[0].1,
        "SELECT \"Id\", \"Name\", \"Description\" FROM \"accounts\""
    );
    assert_eq!(file.tag, "db");
}

#[test]
fn missing_tag_falls_back_to_default() {
    let mut file = users();
    file.tag.clear();

    assert_eq!(file.tag_name(), "dbcn");
    assert!(file.descriptor().unwrap().is_empty());
}

#[test]
fn describe_emits_descriptor_json() {
    let json = users().describe().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["record"], "app::User");
    assert_eq!(value["fields"].as_array().unwrap().len(), 4);
    assert_eq!(value["fields"][1]["column"], "Name");
}

#[test]
fn invalid_schema_is_a_configuration_error() {
    let text = USERS.replace("\"name\": \"password\"", "\"name\": \"name\"");
    let err = StatementFile::parse(&text).unwrap().render(&StatementKind::ALL).unwrap_err();

    assert!(matches!(
        err,
        StatementError::Configuration(ConfigurationError::InvalidSchema { .. })
    ));
}

#[test]
fn unknown_keys_are_rejected() {
    let text = USERS.replacen("\"table\"", "\"tables\"", 1);
    assert!(StatementFile::parse(&text).is_err());
}
