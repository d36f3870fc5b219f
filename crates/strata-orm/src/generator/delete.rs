//! DELETE statement generation.

use strata_core::dialect::Dialect;
use strata_core::statement::SqlStatement;

use crate::error::{OrmError, Result};
use crate::resolver::{InheritanceResolver, TableOperation};
use crate::state::{Lifecycle, ObjectState};

use super::key_values;

/// Generates the ordered DELETE batch for an object marked for deletion.
///
/// One statement per table operation, leaf-to-root: child rows reference
/// their parents, so they go first. Concrete-table and single-table
/// hierarchies collapse to a single statement.
pub struct DeleteGenerator<'d> {
    dialect: &'d dyn Dialect,
    resolver: InheritanceResolver,
}

impl<'d> DeleteGenerator<'d> {
    /// Creates a generator targeting the given dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            resolver: InheritanceResolver::new(),
        }
    }

    /// Generates the DELETE statements for `state`, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidState`] unless the object is
    /// [`Lifecycle::MarkedForDelete`], [`OrmError::MissingKeyValue`] when
    /// a key has no value, and resolver errors for inconsistent metadata.
    pub fn generate(&self, state: &ObjectState) -> Result<Vec<SqlStatement>> {
        if state.lifecycle() != Lifecycle::MarkedForDelete {
            return Err(OrmError::InvalidState {
                expected: Lifecycle::MarkedForDelete,
                actual: state.lifecycle(),
            });
        }

        let operations = self.resolver.resolve(state.class())?;
        operations
            .iter()
            .rev()
            .map(|operation| self.statement(state, operation))
            .collect()
    }

    fn statement(&self, state: &ObjectState, operation: &TableOperation) -> Result<SqlStatement> {
        let keys = key_values(state, operation)?;

        let mut text = String::from("DELETE FROM ");
        text.push_str(&self.dialect.quote_identifier(&operation.table));
        text.push_str(" WHERE ");
        let where_parts: Vec<String> = operation
            .key_columns
            .iter()
            .enumerate()
            .map(|(i, binding)| {
                format!(
                    "{} = {}",
                    self.dialect.quote_identifier(&binding.column),
                    self.dialect.placeholder(i)
                )
            })
            .collect();
        text.push_str(&where_parts.join(" AND "));

        Ok(SqlStatement::new(text, keys))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use strata_core::dialect::MySqlDialect;
    use strata_core::schema::{ClassDef, Mapping};
    use strata_core::value::SqlValue;

    fn circle() -> Arc<ClassDef> {
        let shape = ClassDef::builder("Shape", "Shape_table")
            .primary_key("ShapeID", "ShapeID_field")
            .property("ShapeName", "ShapeName")
            .build()
            .unwrap();
        ClassDef::builder("Circle", "circle_table")
            .primary_key("CircleID", "CircleID_field")
            .property("Radius", "Radius")
            .extends(shape, Mapping::ClassTable)
            .build()
            .unwrap()
    }

    #[test]
    fn test_delete_rejects_unmarked_object() {
        let state =
            ObjectState::loaded(circle(), vec![("CircleID", SqlValue::Int(1))]).unwrap();
        let dialect = MySqlDialect;
        let err = DeleteGenerator::new(&dialect)
            .generate(&state)
            .unwrap_err();
        assert!(matches!(
            err,
            OrmError::InvalidState {
                expected: Lifecycle::MarkedForDelete,
                actual: Lifecycle::Clean,
            }
        ));
    }

    #[test]
    fn test_delete_emits_leaf_to_root() {
        let mut state =
            ObjectState::loaded(circle(), vec![("CircleID", SqlValue::Int(1))]).unwrap();
        state.mark_for_delete();

        let dialect = MySqlDialect;
        let statements = DeleteGenerator::new(&dialect).generate(&state).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0].text(),
            "DELETE FROM `circle_table` WHERE `CircleID_field` = ?Param0"
        );
        assert_eq!(
            statements[1].text(),
            "DELETE FROM `Shape_table` WHERE `ShapeID_field` = ?Param0"
        );
        assert_eq!(statements[0].parameters()[0].value(), &SqlValue::Int(1));
        assert_eq!(statements[1].parameters()[0].value(), &SqlValue::Int(1));
    }
}
