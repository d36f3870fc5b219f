//! SQLite dialect: double-quoted identifiers and anonymous `?`
//! placeholders, the form sqlx binds positionally.

use super::Dialect;

/// SQLite lexical conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    fn placeholder(&self, _index: usize) -> String {
        String::from("?")
    }
}
