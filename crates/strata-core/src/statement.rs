//! Bound, parameterized SQL statements.
//!
//! A [`SqlStatement`] pairs a SQL text template with the ordered parameter
//! list that fills its placeholders. Statements are immutable once built:
//! the generators assemble them and hand them to an executor, which must
//! bind the parameters positionally, in order.

use crate::value::{DbType, SqlValue};

/// One bound statement parameter: the value plus its inferred database type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    value: SqlValue,
    db_type: DbType,
}

impl Parameter {
    /// Creates a parameter, inferring the database type from the value.
    #[must_use]
    pub fn new(value: SqlValue) -> Self {
        let db_type = value.db_type();
        Self { value, db_type }
    }

    /// Returns the bound value.
    #[must_use]
    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    /// Returns the inferred database type.
    #[must_use]
    pub const fn db_type(&self) -> DbType {
        self.db_type
    }
}

/// An immutable parameterized SQL statement.
///
/// Parameter order matches placeholder order in the text; placeholder
/// naming is dialect-specific (see [`crate::dialect`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    text: String,
    parameters: Vec<Parameter>,
}

impl SqlStatement {
    /// Creates a statement from its text and ordered parameter values.
    #[must_use]
    pub fn new(text: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            text: text.into(),
            parameters: values.into_iter().map(Parameter::new).collect(),
        }
    }

    /// Returns the SQL text template.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the ordered parameter list.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}
