use crate::{traits::FieldValue, value::Value};
use rowbind_derive::Record;
use std::sync::Arc;

///
/// User
/// Carries both the `db` and the default `dbcn` tag on every column.
///

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub struct User {
    #[tag(db = "Id", dbcn = "Id")]
    pub id: i64,
    #[tag(db = "Name", dbcn = "Name")]
    pub name: String,
    #[tag(db = "Password", dbcn = "Password")]
    pub password: String,
    #[tag(db = "Description", dbcn = "Description")]
    pub description: String,
    pub roles: Vec<i32>,
}

impl User {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            password: format!("{name}-pw"),
            description: format!("{name} description"),
            roles: Vec::new(),
        }
    }
}

///
/// Email
/// Custom scannable newtype.
///

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Email(pub String);

impl FieldValue for Email {
    fn to_value(&self) -> Value {
        Value::Text(self.0.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_text()
            .filter(|s| s.contains('@'))
            .map(|s| Self(s.to_string()))
    }
}

///
/// Profile
/// Exercises every inclusion rule of the descriptor builder.
///

#[allow(dead_code)]
#[derive(Clone, Debug, Default, PartialEq, Record)]
pub struct Profile {
    #[tag(db = "Nick")]
    pub nick: String,
    #[tag(db = "Age")]
    pub age: Option<i32>,
    #[tag(db = "Avatar")]
    pub avatar: Vec<u8>,
    #[tag(db = "Scores")]
    pub scores: Vec<i32>,
    #[tag(db = "Secret")]
    secret: String,
    #[tag(db = "")]
    pub blank: String,
    #[tag(db = "Nested")]
    pub nested: Option<Option<i32>>,
    #[tag(db = "Email")]
    pub email: Email,
    #[tag(other = "Other")]
    pub other: u32,
    pub untagged: i64,
}

///
/// Note
/// Pointer-typed columns.
///

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub struct Note {
    #[tag(db = "Body")]
    pub body: Box<String>,
    #[tag(db = "Rank")]
    pub rank: Arc<i64>,
    #[tag(db = "Parent")]
    pub parent: Option<Box<u32>>,
}
