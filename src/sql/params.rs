//! Values bound to SQLite statements.

use sqlx::query::{Query, QueryScalar};
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// A value that can be bound to a SQLite query. Produced by request validation.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

pub fn bind<'q>(
    q: Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match v {
        SqlValue::Null => q.bind(None::<i64>),
        SqlValue::Integer(n) => q.bind(*n),
        SqlValue::Real(f) => q.bind(*f),
        SqlValue::Text(s) => q.bind(s.clone()),
    }
}

pub fn bind_scalar<'q, O>(
    q: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    v: &SqlValue,
) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
    match v {
        SqlValue::Null => q.bind(None::<i64>),
        SqlValue::Integer(n) => q.bind(*n),
        SqlValue::Real(f) => q.bind(*f),
        SqlValue::Text(s) => q.bind(s.clone()),
    }
}
