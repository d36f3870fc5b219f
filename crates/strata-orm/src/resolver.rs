//! Partitioning an inheritance chain into per-table column buckets.
//!
//! The resolver walks a leaf class's superclass chain and decides, per
//! mapping strategy, which physical tables an object touches and which
//! property binds each column. The three statement generators all consume
//! its output; none of them walks the chain themselves.
//!
//! Resolution is a pure function of the metadata: the same class always
//! yields the same operation list, in root-to-leaf order. Generators
//! reverse the list where foreign-key dependencies demand it.

use strata_core::schema::{ClassDef, Mapping, PropertyDef, SuperClassLink};
use strata_core::value::SqlValue;

use crate::error::{OrmError, Result};
use crate::state::ObjectState;

/// Where a column's bound value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// The live value of the named property.
    Property(String),
    /// The literal leaf class name (single-table discriminator).
    Discriminator(String),
}

/// One column of a table operation and the source of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Physical column name.
    pub column: String,
    /// Value source.
    pub source: ColumnSource,
}

impl ColumnBinding {
    fn property(column: &str, property: &str) -> Self {
        Self {
            column: String::from(column),
            source: ColumnSource::Property(String::from(property)),
        }
    }
}

/// Everything an object does to one physical table: the full column set
/// (INSERT) and the key columns (UPDATE/DELETE WHERE clauses).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOperation {
    /// The class in the chain this bucket belongs to.
    pub class: String,
    /// Physical table name.
    pub table: String,
    /// All columns written for this table, id and join columns included.
    pub columns: Vec<ColumnBinding>,
    /// Columns identifying the row, used in WHERE clauses.
    pub key_columns: Vec<ColumnBinding>,
}

/// Walks superclass chains and produces ordered per-table operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritanceResolver;

impl InheritanceResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves the table operations for a leaf class, root-first.
    ///
    /// Class-table chains yield one operation per class; concrete-table
    /// and single-table chains collapse into exactly one.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::AmbiguousMapping`] when the chain is
    /// inconsistent for its mapping: a single-table chain disagreeing on
    /// the table name or missing its discriminator, a class-table child
    /// with no resolvable join column, or a chain with no identity at all.
    pub fn resolve(&self, class: &ClassDef) -> Result<Vec<TableOperation>> {
        match class.super_class() {
            None => Ok(vec![self.own_table_operation(class)]),
            Some(link) => match link.mapping() {
                Mapping::ClassTable => self.resolve_class_table(class),
                Mapping::ConcreteTable => self.resolve_concrete_table(class),
                Mapping::SingleTable => self.resolve_single_table(class),
            },
        }
    }

    /// Returns the parent-table join key for a class-table child: the
    /// parent's key column names paired with the leaf object's own
    /// identity values. Performs no database access.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::MissingKeyValue`] when an identity value is
    /// absent or NULL, and [`OrmError::AmbiguousMapping`] when the parent's
    /// key and the chain identity disagree on column count.
    pub fn super_class_key(
        &self,
        class: &ClassDef,
        state: &ObjectState,
    ) -> Result<Vec<(String, SqlValue)>> {
        let Some(link) = class.super_class() else {
            return Ok(Vec::new());
        };

        let identity = chain_identity(class)?;
        let parent_cols = key_columns_of(link.parent());
        if parent_cols.is_empty() || parent_cols.len() != identity.len() {
            return Err(OrmError::AmbiguousMapping(format!(
                "class-table child '{}' has no resolvable join column to parent '{}'",
                class.name(),
                link.parent().name()
            )));
        }
        let mut key = Vec::with_capacity(parent_cols.len());
        for (col, prop) in parent_cols.iter().zip(&identity) {
            let value = state.get(prop.name()).cloned().unwrap_or(SqlValue::Null);
            if value.is_null() {
                return Err(OrmError::MissingKeyValue {
                    class: String::from(class.name()),
                    property: String::from(prop.name()),
                });
            }
            key.push((String::from(col.column()), value));
        }
        Ok(key)
    }

    /// Bucket for a class with no superclass: its own table, its own
    /// properties, keyed by its own primary key.
    fn own_table_operation(&self, class: &ClassDef) -> TableOperation {
        let mut columns: Vec<ColumnBinding> = class
            .properties()
            .iter()
            .map(|p| ColumnBinding::property(p.column(), p.name()))
            .collect();
        let key_columns: Vec<ColumnBinding> = class
            .primary_key()
            .iter()
            .map(|p| ColumnBinding::property(p.column(), p.name()))
            .collect();
        dedupe(&mut columns);
        TableOperation {
            class: String::from(class.name()),
            table: String::from(class.table()),
            columns,
            key_columns,
        }
    }

    /// One bucket per class in the chain, each holding only the class's
    /// own properties. The chain identity value fills every id and join
    /// column, so one logical key threads through all tables.
    fn resolve_class_table(&self, leaf: &ClassDef) -> Result<Vec<TableOperation>> {
        let identity = chain_identity(leaf)?;
        let mut operations = Vec::new();

        for member in leaf.chain() {
            let mut columns: Vec<ColumnBinding> = member
                .properties()
                .iter()
                .filter(|p| !p.is_primary_key())
                .map(|p| ColumnBinding::property(p.column(), p.name()))
                .collect();

            let own_pk = member.primary_key();
            let id_bindings = if own_pk.is_empty() {
                Vec::new()
            } else {
                if own_pk.len() != identity.len() {
                    return Err(OrmError::AmbiguousMapping(format!(
                        "class '{}' declares {} key column(s) but the chain identity has {}",
                        member.name(),
                        own_pk.len(),
                        identity.len()
                    )));
                }
                own_pk
                    .iter()
                    .zip(&identity)
                    .map(|(col, id)| ColumnBinding::property(col.column(), id.name()))
                    .collect()
            };
            columns.extend(id_bindings.iter().cloned());

            let join_bindings = match member.super_class() {
                Some(link) => self.join_bindings(member, link, &identity)?,
                None => Vec::new(),
            };
            columns.extend(join_bindings.iter().cloned());
            dedupe(&mut columns);

            let key_columns = if id_bindings.is_empty() {
                join_bindings
            } else {
                id_bindings
            };
            if key_columns.is_empty() {
                return Err(OrmError::AmbiguousMapping(format!(
                    "class '{}' resolves to table '{}' with no key column",
                    member.name(),
                    member.table()
                )));
            }

            operations.push(TableOperation {
                class: String::from(member.name()),
                table: String::from(member.table()),
                columns,
                key_columns,
            });
        }

        Ok(operations)
    }

    /// One bucket against the leaf's own table, holding every property of
    /// the whole chain. Ancestor key properties superseded by the leaf
    /// identity are left out; no ancestor table is touched.
    fn resolve_concrete_table(&self, leaf: &ClassDef) -> Result<Vec<TableOperation>> {
        let identity = chain_identity(leaf)?;

        let mut columns = Vec::new();
        for member in leaf.chain() {
            for prop in member.properties().iter().filter(|p| !p.is_primary_key()) {
                columns.push(ColumnBinding::property(prop.column(), prop.name()));
            }
        }
        let key_columns: Vec<ColumnBinding> = identity
            .iter()
            .map(|p| ColumnBinding::property(p.column(), p.name()))
            .collect();
        columns.extend(key_columns.iter().cloned());
        dedupe(&mut columns);

        Ok(vec![TableOperation {
            class: String::from(leaf.name()),
            table: String::from(leaf.table()),
            columns,
            key_columns,
        }])
    }

    /// One bucket against the root's table, holding the union of the
    /// chain's properties plus the discriminator bound to the leaf class
    /// name.
    fn resolve_single_table(&self, leaf: &ClassDef) -> Result<Vec<TableOperation>> {
        let chain = leaf.chain();
        let root = chain[0];

        for member in &chain {
            if member.table() != root.table() {
                return Err(OrmError::AmbiguousMapping(format!(
                    "single-table chain disagrees on table name: '{}' maps to '{}' but root '{}' maps to '{}'",
                    member.name(),
                    member.table(),
                    root.name(),
                    root.table()
                )));
            }
        }

        let link = leaf
            .super_class()
            .ok_or_else(|| OrmError::AmbiguousMapping(format!(
                "class '{}' resolved as single-table without a superclass link",
                leaf.name()
            )))?;
        let discriminator = link.discriminator_column().ok_or_else(|| {
            OrmError::AmbiguousMapping(format!(
                "single-table class '{}' declares no discriminator column",
                leaf.name()
            ))
        })?;

        let identity = chain_identity(leaf)?;

        let mut columns = Vec::new();
        for member in &chain {
            for prop in member.properties().iter().filter(|p| !p.is_primary_key()) {
                columns.push(ColumnBinding::property(prop.column(), prop.name()));
            }
        }
        let key_columns: Vec<ColumnBinding> = identity
            .iter()
            .map(|p| ColumnBinding::property(p.column(), p.name()))
            .collect();
        columns.extend(key_columns.iter().cloned());
        columns.push(ColumnBinding {
            column: String::from(discriminator),
            source: ColumnSource::Discriminator(String::from(leaf.name())),
        });
        dedupe(&mut columns);

        Ok(vec![TableOperation {
            class: String::from(leaf.name()),
            table: String::from(root.table()),
            columns,
            key_columns,
        }])
    }

    /// Bindings for the child-table columns referencing the parent's key.
    /// Single-column joins are named by [`SuperClassLink::join_column`];
    /// composite keys pair parent columns with identity properties
    /// positionally and admit no override.
    fn join_bindings(
        &self,
        child: &ClassDef,
        link: &SuperClassLink,
        identity: &[&PropertyDef],
    ) -> Result<Vec<ColumnBinding>> {
        if link.id_column_override().is_some() && identity.len() != 1 {
            return Err(OrmError::AmbiguousMapping(format!(
                "class '{}' overrides its join column but the chain identity is composite",
                child.name()
            )));
        }

        let parent_cols = key_columns_of(link.parent());
        if parent_cols.is_empty() || parent_cols.len() != identity.len() {
            return Err(OrmError::AmbiguousMapping(format!(
                "class-table child '{}' has no resolvable join column to parent '{}'",
                child.name(),
                link.parent().name()
            )));
        }

        if identity.len() == 1 {
            let column = link
                .join_column()
                .unwrap_or_else(|| parent_cols[0].column());
            return Ok(vec![ColumnBinding::property(column, identity[0].name())]);
        }

        Ok(parent_cols
            .iter()
            .zip(identity)
            .map(|(col, id)| ColumnBinding::property(col.column(), id.name()))
            .collect())
    }
}

/// Identity key properties for a leaf's chain: the leaf's own primary key
/// when declared, else the nearest ancestor's.
fn chain_identity(leaf: &ClassDef) -> Result<Vec<&PropertyDef>> {
    let (_, identity) = leaf.identity();
    if identity.is_empty() {
        return Err(OrmError::AmbiguousMapping(format!(
            "no class in the chain of '{}' declares a primary key",
            leaf.name()
        )));
    }
    Ok(identity)
}

/// A class's own key properties, falling back to its inherited identity.
fn key_columns_of(class: &ClassDef) -> Vec<&PropertyDef> {
    let own = class.primary_key();
    if own.is_empty() {
        class.identity().1
    } else {
        own
    }
}

/// Collapses duplicate column names, keeping the first occurrence.
fn dedupe(columns: &mut Vec<ColumnBinding>) {
    let mut seen = Vec::new();
    columns.retain(|binding| {
        if seen.contains(&binding.column) {
            false
        } else {
            seen.push(binding.column.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use strata_core::schema::ClassDef;

    fn shape() -> Arc<ClassDef> {
        ClassDef::builder("Shape", "Shape_table")
            .primary_key("ShapeID", "ShapeID_field")
            .property("ShapeName", "ShapeName")
            .build()
            .unwrap()
    }

    fn circle(mapping: Mapping) -> Arc<ClassDef> {
        ClassDef::builder("Circle", "circle_table")
            .primary_key("CircleID", "CircleID_field")
            .property("Radius", "Radius")
            .extends(shape(), mapping)
            .build()
            .unwrap()
    }

    fn columns_of(op: &TableOperation) -> Vec<&str> {
        op.columns.iter().map(|b| b.column.as_str()).collect()
    }

    #[test]
    fn test_class_table_one_operation_per_class() {
        let ops = InheritanceResolver::new()
            .resolve(&circle(Mapping::ClassTable))
            .unwrap();

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].table, "Shape_table");
        assert_eq!(ops[1].table, "circle_table");

        // Shape's id column binds the leaf identity value.
        let shape_id = ops[0]
            .columns
            .iter()
            .find(|b| b.column == "ShapeID_field")
            .unwrap();
        assert_eq!(
            shape_id.source,
            ColumnSource::Property(String::from("CircleID"))
        );

        // The child table carries its own key plus the join column.
        let mut cols = columns_of(&ops[1]);
        cols.sort_unstable();
        assert_eq!(cols, vec!["CircleID_field", "Radius", "ShapeID_field"]);
        assert_eq!(ops[1].key_columns[0].column, "CircleID_field");
    }

    #[test]
    fn test_concrete_table_collapses_to_leaf_table() {
        let ops = InheritanceResolver::new()
            .resolve(&circle(Mapping::ConcreteTable))
            .unwrap();

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].table, "circle_table");
        let mut cols = columns_of(&ops[0]);
        cols.sort_unstable();
        assert_eq!(cols, vec!["CircleID_field", "Radius", "ShapeName"]);
        assert_eq!(ops[0].key_columns[0].column, "CircleID_field");
    }

    #[test]
    fn test_single_table_uses_root_table_and_discriminator() {
        let circle = ClassDef::builder("CircleNoPrimaryKey", "Shape_table")
            .property("Radius", "Radius")
            .extends(shape(), Mapping::SingleTable)
            .discriminator("ShapeType_field")
            .build()
            .unwrap();

        let ops = InheritanceResolver::new().resolve(&circle).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].table, "Shape_table");
        assert_eq!(ops[0].key_columns[0].column, "ShapeID_field");

        let disc = ops[0]
            .columns
            .iter()
            .find(|b| b.column == "ShapeType_field")
            .unwrap();
        assert_eq!(
            disc.source,
            ColumnSource::Discriminator(String::from("CircleNoPrimaryKey"))
        );
    }

    #[test]
    fn test_single_table_name_mismatch_is_ambiguous() {
        let circle = ClassDef::builder("Circle", "circle_table")
            .property("Radius", "Radius")
            .extends(shape(), Mapping::SingleTable)
            .discriminator("ShapeType_field")
            .build()
            .unwrap();

        let err = InheritanceResolver::new().resolve(&circle).unwrap_err();
        assert!(matches!(err, OrmError::AmbiguousMapping(_)));
    }

    #[test]
    fn test_single_table_without_discriminator_is_ambiguous() {
        let circle = ClassDef::builder("Circle", "Shape_table")
            .property("Radius", "Radius")
            .extends(shape(), Mapping::SingleTable)
            .build()
            .unwrap();

        let err = InheritanceResolver::new().resolve(&circle).unwrap_err();
        assert!(matches!(err, OrmError::AmbiguousMapping(_)));
    }

    #[test]
    fn test_class_table_child_without_own_key_uses_join_column() {
        let circle = ClassDef::builder("CircleNoPrimaryKey", "circle_table")
            .property("Radius", "Radius")
            .extends(shape(), Mapping::ClassTable)
            .build()
            .unwrap();

        let ops = InheritanceResolver::new().resolve(&circle).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].key_columns[0].column, "ShapeID_field");
        assert_eq!(
            ops[1].key_columns[0].source,
            ColumnSource::Property(String::from("ShapeID"))
        );
    }

    #[test]
    fn test_class_table_id_column_override_renames_the_join_column() {
        let circle = ClassDef::builder("Circle", "circle_table")
            .primary_key("CircleID", "CircleID_field")
            .property("Radius", "Radius")
            .extends(shape(), Mapping::ClassTable)
            .id_column("Shape_ref")
            .build()
            .unwrap();

        let ops = InheritanceResolver::new().resolve(&circle).unwrap();
        let cols = columns_of(&ops[1]);
        assert!(cols.contains(&"Shape_ref"));
        assert!(!cols.contains(&"ShapeID_field"));

        let join = ops[1]
            .columns
            .iter()
            .find(|b| b.column == "Shape_ref")
            .unwrap();
        assert_eq!(join.source, ColumnSource::Property(String::from("CircleID")));
    }

    #[test]
    fn test_id_column_override_with_composite_identity_is_ambiguous() {
        let shape = ClassDef::builder("Shape", "Shape_table")
            .primary_key("ShapeID", "ShapeID_field")
            .primary_key("Revision", "ShapeRevision_field")
            .build()
            .unwrap();
        let circle = ClassDef::builder("Circle", "circle_table")
            .primary_key("CircleID", "CircleID_field")
            .primary_key("Revision", "CircleRevision_field")
            .extends(shape, Mapping::ClassTable)
            .id_column("Shape_ref")
            .build()
            .unwrap();

        let err = InheritanceResolver::new().resolve(&circle).unwrap_err();
        assert!(matches!(
            err,
            OrmError::AmbiguousMapping(ref msg) if msg.contains("override")
        ));
    }

    #[test]
    fn test_super_class_key_rejects_key_arity_mismatch() {
        use crate::state::ObjectState;

        let shape = ClassDef::builder("Shape", "Shape_table")
            .primary_key("ShapeID", "ShapeID_field")
            .primary_key("Revision", "ShapeRevision_field")
            .build()
            .unwrap();
        let circle = ClassDef::builder("Circle", "circle_table")
            .primary_key("CircleID", "CircleID_field")
            .extends(shape, Mapping::ClassTable)
            .build()
            .unwrap();

        let mut state = ObjectState::new_object(Arc::clone(&circle));
        state.set("CircleID", SqlValue::Int(7)).unwrap();

        let err = InheritanceResolver::new()
            .super_class_key(&circle, &state)
            .unwrap_err();
        assert!(matches!(err, OrmError::AmbiguousMapping(_)));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = InheritanceResolver::new();
        let class = circle(Mapping::ClassTable);
        assert_eq!(
            resolver.resolve(&class).unwrap(),
            resolver.resolve(&class).unwrap()
        );
    }

    #[test]
    fn test_three_level_chain_orders_root_first() {
        let filled = ClassDef::builder("FilledCircle", "FilledCircle_table")
            .primary_key("FilledCircleID", "FilledCircleID_field")
            .property("Colour", "Colour")
            .extends(circle(Mapping::ClassTable), Mapping::ClassTable)
            .build()
            .unwrap();

        let ops = InheritanceResolver::new().resolve(&filled).unwrap();
        let tables: Vec<&str> = ops.iter().map(|o| o.table.as_str()).collect();
        assert_eq!(tables, vec!["Shape_table", "circle_table", "FilledCircle_table"]);

        // Every id and join column binds the one chain identity.
        for op in &ops {
            for binding in &op.key_columns {
                assert_eq!(
                    binding.source,
                    ColumnSource::Property(String::from("FilledCircleID"))
                );
            }
        }
    }

    #[test]
    fn test_super_class_key_relabels_leaf_identity() {
        use crate::state::ObjectState;

        let class = circle(Mapping::ClassTable);
        let mut state = ObjectState::new_object(Arc::clone(&class));
        state.set("CircleID", SqlValue::Int(7)).unwrap();

        let key = InheritanceResolver::new()
            .super_class_key(&class, &state)
            .unwrap();
        assert_eq!(key, vec![(String::from("ShapeID_field"), SqlValue::Int(7))]);
    }

    #[test]
    fn test_super_class_key_requires_identity_value() {
        use crate::state::ObjectState;

        let class = circle(Mapping::ClassTable);
        let state = ObjectState::new_object(Arc::clone(&class));

        let err = InheritanceResolver::new()
            .super_class_key(&class, &state)
            .unwrap_err();
        assert!(matches!(err, OrmError::MissingKeyValue { .. }));
    }
}
