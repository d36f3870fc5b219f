//! Dialect-specific identifier quoting and placeholder naming.
//!
//! Statement generation is parametric over the target database's lexical
//! conventions: how identifiers are quoted and how positional placeholders
//! are spelled. Everything else about the generated statements is
//! dialect-independent.

mod mssql;
mod mysql;
mod sqlite;

pub use mssql::MsSqlDialect;
pub use mysql::MySqlDialect;
pub use sqlite::SqliteDialect;

/// Lexical conventions for a target database.
pub trait Dialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Quotes a table or column identifier.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the parameter at `index` within one
    /// statement. Indexes start at zero and restart for every statement.
    fn placeholder(&self, index: usize) -> String;
}
