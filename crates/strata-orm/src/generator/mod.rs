//! Statement generators for the three persistence operations.
//!
//! Each generator is a deterministic function of an [`ObjectState`] and a
//! [`Dialect`]: no I/O, no shared mutable state, no lifecycle mutation.
//! All three ride on the resolver's table operations and differ only in
//! statement shape and emission order:
//!
//! - INSERT emits root-to-leaf so parent rows exist before children
//!   reference them.
//! - DELETE emits leaf-to-root, mirroring the foreign-key dependency.
//! - UPDATE touches only tables with at least one dirty column, emitted
//!   child-before-parent to match the historical order.
//!
//! Within every statement, columns are sorted alphabetically by column
//! name and parameters follow column order exactly.

mod delete;
mod insert;
mod update;

pub use delete::DeleteGenerator;
pub use insert::InsertGenerator;
pub use update::UpdateGenerator;

use strata_core::value::SqlValue;

use crate::error::{OrmError, Result};
use crate::resolver::{ColumnBinding, ColumnSource, TableOperation};
use crate::state::ObjectState;

/// A table operation's columns in the stable emission order.
fn sorted_columns(operation: &TableOperation) -> Vec<&ColumnBinding> {
    let mut columns: Vec<&ColumnBinding> = operation.columns.iter().collect();
    columns.sort_by(|a, b| a.column.cmp(&b.column));
    columns
}

/// The value a binding contributes to a statement.
fn bound_value(state: &ObjectState, binding: &ColumnBinding) -> SqlValue {
    match &binding.source {
        ColumnSource::Property(name) => state.get(name).cloned().unwrap_or(SqlValue::Null),
        ColumnSource::Discriminator(class_name) => SqlValue::Text(class_name.clone()),
    }
}

/// The key values for a table operation, in key-column order.
///
/// # Errors
///
/// Returns [`OrmError::MissingKeyValue`] when any key binding has no value
/// yet; a row can never be addressed, or inserted consistently across a
/// chain, without its identity.
fn key_values(state: &ObjectState, operation: &TableOperation) -> Result<Vec<SqlValue>> {
    operation
        .key_columns
        .iter()
        .map(|binding| {
            let value = bound_value(state, binding);
            if value.is_null() {
                let property = match &binding.source {
                    ColumnSource::Property(name) => name.clone(),
                    ColumnSource::Discriminator(_) => binding.column.clone(),
                };
                return Err(OrmError::MissingKeyValue {
                    class: String::from(state.class().name()),
                    property,
                });
            }
            Ok(value)
        })
        .collect()
}

/// Whether the binding's underlying property is dirty. Discriminator
/// columns never are: a row's concrete type does not change.
fn is_dirty(state: &ObjectState, binding: &ColumnBinding) -> bool {
    match &binding.source {
        ColumnSource::Property(name) => state
            .property_state(name)
            .is_some_and(crate::state::PropertyState::is_dirty),
        ColumnSource::Discriminator(_) => false,
    }
}

/// Whether a binding addresses one of the operation's key columns.
fn is_key_column(operation: &TableOperation, binding: &ColumnBinding) -> bool {
    operation
        .key_columns
        .iter()
        .any(|key| key.column == binding.column)
}
