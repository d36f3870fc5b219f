//! Live object state: per-property values, dirty tracking, lifecycle.
//!
//! An [`ObjectState`] is the snapshot the generators consume: one
//! [`PropertyState`] for every property in the flattened inheritance
//! chain, plus the object's lifecycle classification. It is single-writer;
//! nothing here is protected for concurrent mutation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_core::schema::{ClassDef, Mapping};
use strata_core::value::{SqlValue, ToSqlValue};

use crate::error::{OrmError, Result};

/// Lifecycle classification of a live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Newly created, never persisted.
    New,
    /// Persisted and unmodified since load or last save.
    Clean,
    /// Persisted but modified since load.
    Dirty,
    /// Explicitly marked for deletion; terminal once the delete executes.
    MarkedForDelete,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Clean => write!(f, "clean"),
            Self::Dirty => write!(f, "dirty"),
            Self::MarkedForDelete => write!(f, "marked-for-delete"),
        }
    }
}

/// One property's current value and modification state.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyState {
    value: SqlValue,
    dirty: bool,
    primary_key: bool,
}

impl PropertyState {
    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    /// Returns `true` if the value changed since load (or, for the
    /// class-table identity, since construction — see [`ObjectState::new_object`]).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if this property belongs to the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// The full live state of one object: flattened properties plus lifecycle.
#[derive(Debug, Clone)]
pub struct ObjectState {
    class: Arc<ClassDef>,
    lifecycle: Lifecycle,
    properties: HashMap<String, PropertyState>,
}

impl ObjectState {
    /// Creates the state of a brand-new object: every property of the
    /// flattened chain present with a NULL value, lifecycle [`Lifecycle::New`].
    ///
    /// Historical quirk, preserved for compatibility: when the chain uses
    /// class-table inheritance, the identity property is marked dirty
    /// immediately, before any value is assigned. Downstream statement
    /// shapes depend on this — the id column shows up in the first UPDATE
    /// such an object undergoes, and the object reports dirty from birth.
    #[must_use]
    pub fn new_object(class: Arc<ClassDef>) -> Self {
        let mut properties = flattened(&class);

        let class_table_chain = class
            .chain()
            .iter()
            .any(|c| matches!(c.super_class().map(|l| l.mapping()), Some(Mapping::ClassTable)));
        if class_table_chain {
            let (_, identity) = class.identity();
            for prop in identity {
                if let Some(state) = properties.get_mut(prop.name()) {
                    state.dirty = true;
                }
            }
        }

        Self {
            class,
            lifecycle: Lifecycle::New,
            properties,
        }
    }

    /// Creates the state of an object loaded from the database: the given
    /// values applied, nothing dirty, lifecycle [`Lifecycle::Clean`].
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::UnknownProperty`] if a value is supplied for a
    /// property the chain does not declare.
    pub fn loaded<I, K>(class: Arc<ClassDef>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, SqlValue)>,
        K: AsRef<str>,
    {
        let mut properties = flattened(&class);
        for (name, value) in values {
            let state = properties
                .get_mut(name.as_ref())
                .ok_or_else(|| OrmError::UnknownProperty {
                    class: String::from(class.name()),
                    property: String::from(name.as_ref()),
                })?;
            state.value = value;
        }
        Ok(Self {
            class,
            lifecycle: Lifecycle::Clean,
            properties,
        })
    }

    /// Returns the class metadata this state was built for.
    #[must_use]
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Returns the stored lifecycle classification.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns `true` if the object has unpersisted modifications: either
    /// its lifecycle is dirty or any property is individually dirty. A
    /// brand-new class-table object reports dirty here from construction.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.lifecycle == Lifecycle::Dirty || self.properties.values().any(|p| p.dirty)
    }

    /// Sets a property value, marking the property dirty and moving a
    /// clean object to [`Lifecycle::Dirty`].
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::UnknownProperty`] if the chain declares no such
    /// property.
    pub fn set(&mut self, property: &str, value: impl ToSqlValue) -> Result<()> {
        let state = self
            .properties
            .get_mut(property)
            .ok_or_else(|| OrmError::UnknownProperty {
                class: String::from(self.class.name()),
                property: String::from(property),
            })?;
        state.value = value.to_sql_value();
        state.dirty = true;
        if self.lifecycle == Lifecycle::Clean {
            self.lifecycle = Lifecycle::Dirty;
        }
        Ok(())
    }

    /// Returns a property's current value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&SqlValue> {
        self.properties.get(property).map(PropertyState::value)
    }

    /// Returns a property's full state.
    #[must_use]
    pub fn property_state(&self, property: &str) -> Option<&PropertyState> {
        self.properties.get(property)
    }

    /// Marks the object for deletion. Irreversible: the object is
    /// discarded once the delete executes.
    pub fn mark_for_delete(&mut self) {
        self.lifecycle = Lifecycle::MarkedForDelete;
    }

    /// Records a successful insert or update: all dirty flags cleared,
    /// lifecycle moves to [`Lifecycle::Clean`]. Not applicable to objects
    /// marked for deletion.
    pub fn mark_saved(&mut self) {
        if self.lifecycle == Lifecycle::MarkedForDelete {
            return;
        }
        for state in self.properties.values_mut() {
            state.dirty = false;
        }
        self.lifecycle = Lifecycle::Clean;
    }
}

/// Builds the flattened property map for a class's whole chain.
fn flattened(class: &ClassDef) -> HashMap<String, PropertyState> {
    let mut properties = HashMap::new();
    for member in class.chain() {
        for prop in member.properties() {
            properties.insert(
                String::from(prop.name()),
                PropertyState {
                    value: SqlValue::Null,
                    dirty: false,
                    primary_key: prop.is_primary_key(),
                },
            );
        }
    }
    properties
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn test_new_object_flattens_chain() {
        let state = ObjectState::new_object(circle(Mapping::ConcreteTable));
        assert_eq!(state.lifecycle(), Lifecycle::New);
        assert!(state.get("CircleID").is_some());
        assert!(state.get("Radius").is_some());
        assert!(state.get("ShapeName").is_some());
        assert!(state.get("ShapeID").is_some());
    }

    #[test]
    fn test_new_class_table_object_is_born_dirty() {
        let state = ObjectState::new_object(circle(Mapping::ClassTable));
        assert_eq!(state.lifecycle(), Lifecycle::New);
        assert!(state.is_dirty());
        assert!(state.property_state("CircleID").unwrap().is_dirty());
    }

    #[test]
    fn test_new_concrete_table_object_is_not_dirty() {
        let state = ObjectState::new_object(circle(Mapping::ConcreteTable));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_set_marks_dirty_and_transitions_clean_to_dirty() {
        let mut state = ObjectState::loaded(
            circle(Mapping::ConcreteTable),
            vec![("CircleID", SqlValue::Int(1))],
        )
        .unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Clean);
        state.set("Radius", 10_i64).unwrap();
        assert_eq!(state.lifecycle(), Lifecycle::Dirty);
        assert!(state.property_state("Radius").unwrap().is_dirty());
        assert_eq!(state.get("Radius"), Some(&SqlValue::Int(10)));
    }

    #[test]
    fn test_set_unknown_property_fails() {
        let mut state = ObjectState::new_object(circle(Mapping::ConcreteTable));
        let err = state.set("Volume", 1_i64).unwrap_err();
        assert!(matches!(err, OrmError::UnknownProperty { .. }));
    }

    #[test]
    fn test_loaded_unknown_property_fails() {
        let err = ObjectState::loaded(
            circle(Mapping::ConcreteTable),
            vec![("Volume", SqlValue::Int(1))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            OrmError::UnknownProperty { ref property, .. } if property == "Volume"
        ));
    }

    #[test]
    fn test_mark_saved_clears_dirty_state() {
        let mut state = ObjectState::new_object(circle(Mapping::ClassTable));
        assert!(state.is_dirty());
        state.mark_saved();
        assert_eq!(state.lifecycle(), Lifecycle::Clean);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_mark_for_delete_is_terminal() {
        let mut state = ObjectState::new_object(circle(Mapping::ConcreteTable));
        state.mark_for_delete();
        assert_eq!(state.lifecycle(), Lifecycle::MarkedForDelete);
        state.mark_saved();
        assert_eq!(state.lifecycle(), Lifecycle::MarkedForDelete);
    }
}
