//! INSERT statement generation.

use strata_core::dialect::Dialect;
use strata_core::statement::SqlStatement;

use crate::error::{OrmError, Result};
use crate::resolver::{InheritanceResolver, TableOperation};
use crate::state::{Lifecycle, ObjectState};

use super::{bound_value, key_values, sorted_columns};

/// Generates the ordered INSERT batch for a new object.
///
/// One statement per table operation, root-to-leaf, so every parent row
/// exists before a child row references it. Id and join columns are always
/// part of the column list; nothing is left to database defaults.
pub struct InsertGenerator<'d> {
    dialect: &'d dyn Dialect,
    resolver: InheritanceResolver,
}

impl<'d> InsertGenerator<'d> {
    /// Creates a generator targeting the given dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            resolver: InheritanceResolver::new(),
        }
    }

    /// Generates the INSERT statements for `state`, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidState`] unless the object is
    /// [`Lifecycle::New`], [`OrmError::MissingKeyValue`] when the identity
    /// has not been assigned yet, and resolver errors for inconsistent
    /// metadata. Never returns a partial batch.
    pub fn generate(&self, state: &ObjectState) -> Result<Vec<SqlStatement>> {
        if state.lifecycle() != Lifecycle::New {
            return Err(OrmError::InvalidState {
                expected: Lifecycle::New,
                actual: state.lifecycle(),
            });
        }

        let operations = self.resolver.resolve(state.class())?;
        operations
            .iter()
            .map(|operation| self.statement(state, operation))
            .collect()
    }

    fn statement(&self, state: &ObjectState, operation: &TableOperation) -> Result<SqlStatement> {
        // Fails before any text is assembled if the identity is missing.
        key_values(state, operation)?;

        let columns = sorted_columns(operation);
        let mut values = Vec::with_capacity(columns.len());

        let mut text = String::from("INSERT INTO ");
        text.push_str(&self.dialect.quote_identifier(&operation.table));
        text.push_str(" (");
        let names: Vec<String> = columns
            .iter()
            .map(|binding| self.dialect.quote_identifier(&binding.column))
            .collect();
        text.push_str(&names.join(", "));
        text.push_str(") VALUES (");
        let placeholders: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, _)| self.dialect.placeholder(i))
            .collect();
        text.push_str(&placeholders.join(", "));
        text.push(')');

        for binding in &columns {
            values.push(bound_value(state, binding));
        }

        Ok(SqlStatement::new(text, values))
    }
}
