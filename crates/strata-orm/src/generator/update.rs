//! UPDATE statement generation.

use strata_core::dialect::Dialect;
use strata_core::schema::Mapping;
use strata_core::statement::SqlStatement;
use strata_core::value::SqlValue;

use crate::error::{OrmError, Result};
use crate::resolver::{InheritanceResolver, TableOperation};
use crate::state::{Lifecycle, ObjectState};

use super::{bound_value, is_dirty, is_key_column, key_values, sorted_columns};

/// Generates the UPDATE batch for a modified object.
///
/// Only tables with at least one dirty column receive a statement; a
/// hierarchy where only the leaf changed produces exactly one UPDATE.
/// Statements are emitted child-before-parent.
///
/// Key columns stay out of the SET list, with one historical exception
/// preserved for compatibility: under class-table inheritance the identity
/// property of a brand-new object is dirty from construction, and its id
/// column does appear in the first UPDATE such an object undergoes.
pub struct UpdateGenerator<'d> {
    dialect: &'d dyn Dialect,
    resolver: InheritanceResolver,
}

impl<'d> UpdateGenerator<'d> {
    /// Creates a generator targeting the given dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            resolver: InheritanceResolver::new(),
        }
    }

    /// Generates the UPDATE statements for `state`, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidState`] unless the object is
    /// [`Lifecycle::Dirty`] or a new object already carrying dirty
    /// properties, [`OrmError::MissingKeyValue`] when a WHERE key has no
    /// value, and resolver errors for inconsistent metadata.
    pub fn generate(&self, state: &ObjectState) -> Result<Vec<SqlStatement>> {
        let acceptable = state.lifecycle() == Lifecycle::Dirty
            || (state.lifecycle() == Lifecycle::New && state.is_dirty());
        if !acceptable {
            return Err(OrmError::InvalidState {
                expected: Lifecycle::Dirty,
                actual: state.lifecycle(),
            });
        }

        let operations = self.resolver.resolve(state.class())?;
        let keys_updatable = has_class_table_link(state);

        let mut statements = Vec::new();
        for operation in operations.iter().rev() {
            if let Some(statement) = self.statement(state, operation, keys_updatable)? {
                statements.push(statement);
            }
        }
        Ok(statements)
    }

    fn statement(
        &self,
        state: &ObjectState,
        operation: &TableOperation,
        keys_updatable: bool,
    ) -> Result<Option<SqlStatement>> {
        let assignments: Vec<_> = sorted_columns(operation)
            .into_iter()
            .filter(|binding| {
                is_dirty(state, binding)
                    && (keys_updatable || !is_key_column(operation, binding))
            })
            .collect();
        if assignments.is_empty() {
            return Ok(None);
        }

        let keys = key_values(state, operation)?;

        let mut text = String::from("UPDATE ");
        text.push_str(&self.dialect.quote_identifier(&operation.table));
        text.push_str(" SET ");

        let mut values: Vec<SqlValue> = Vec::with_capacity(assignments.len() + keys.len());
        let mut index = 0_usize;

        let set_parts: Vec<String> = assignments
            .iter()
            .map(|binding| {
                let part = format!(
                    "{} = {}",
                    self.dialect.quote_identifier(&binding.column),
                    self.dialect.placeholder(index)
                );
                index += 1;
                values.push(bound_value(state, binding));
                part
            })
            .collect();
        text.push_str(&set_parts.join(", "));

        text.push_str(" WHERE ");
        let where_parts: Vec<String> = operation
            .key_columns
            .iter()
            .map(|binding| {
                let part = format!(
                    "{} = {}",
                    self.dialect.quote_identifier(&binding.column),
                    self.dialect.placeholder(index)
                );
                index += 1;
                part
            })
            .collect();
        text.push_str(&where_parts.join(" AND "));
        values.extend(keys);

        Ok(Some(SqlStatement::new(text, values)))
    }
}

/// Whether any link in the chain uses class-table inheritance.
fn has_class_table_link(state: &ObjectState) -> bool {
    state
        .class()
        .chain()
        .iter()
        .any(|c| matches!(c.super_class().map(|l| l.mapping()), Some(Mapping::ClassTable)))
}
