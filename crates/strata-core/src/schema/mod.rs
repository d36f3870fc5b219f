//! Class and property metadata for inheritance-mapped persistence.
//!
//! A [`ClassDef`] is the static description of one mapped type: its table,
//! its property-to-column bindings, its primary key, and an optional link
//! to a superclass with the inheritance mapping used between the two. The
//! superclass chain is strictly single-inheritance and acyclic by
//! construction (parent links are `Arc`s to already-built definitions).
//!
//! Definitions are produced through [`ClassDefBuilder`], which enforces the
//! invariants that can be checked on one class in isolation. Whole-chain
//! consistency (single-table agreement on table names, discriminator
//! presence) is checked where the chain is walked, in the resolver.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Inheritance mapping strategy between a class and its superclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// Each class in the hierarchy owns its own table; a child row's key is
    /// also a foreign key to its parent's row.
    ClassTable,
    /// Each instantiable class owns one table holding all inherited and own
    /// properties; ancestor tables are never touched.
    ConcreteTable,
    /// The whole hierarchy shares the root's table; a discriminator column
    /// records the concrete type of each row.
    SingleTable,
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassTable => write!(f, "class-table"),
            Self::ConcreteTable => write!(f, "concrete-table"),
            Self::SingleTable => write!(f, "single-table"),
        }
    }
}

/// One mapped property: logical name, physical column, key membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    name: String,
    column: String,
    primary_key: bool,
}

impl PropertyDef {
    /// Returns the logical property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the physical column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns `true` if this property is part of the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// Link from a class to its superclass, with the mapping strategy used
/// between the two.
#[derive(Debug, Clone)]
pub struct SuperClassLink {
    parent: Arc<ClassDef>,
    mapping: Mapping,
    discriminator_column: Option<String>,
    id_column_override: Option<String>,
}

impl SuperClassLink {
    /// Returns the superclass definition.
    #[must_use]
    pub fn parent(&self) -> &Arc<ClassDef> {
        &self.parent
    }

    /// Returns the mapping strategy.
    #[must_use]
    pub const fn mapping(&self) -> Mapping {
        self.mapping
    }

    /// Returns the discriminator column, if one is declared on this link.
    #[must_use]
    pub fn discriminator_column(&self) -> Option<&str> {
        self.discriminator_column.as_deref()
    }

    /// Returns the join-column override, if one is declared on this link.
    #[must_use]
    pub fn id_column_override(&self) -> Option<&str> {
        self.id_column_override.as_deref()
    }

    /// Returns the physical join column in the child's table referencing
    /// the parent's key: the override if set, else the parent's first
    /// primary-key column name.
    #[must_use]
    pub fn join_column(&self) -> Option<&str> {
        self.id_column_override
            .as_deref()
            .or_else(|| self.parent.primary_key().first().map(|p| p.column()))
    }
}

/// Static metadata for one mapped class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    table: String,
    properties: Vec<PropertyDef>,
    super_class: Option<SuperClassLink>,
}

impl ClassDef {
    /// Starts building a class definition.
    #[must_use]
    pub fn builder(name: impl Into<String>, table: impl Into<String>) -> ClassDefBuilder {
        ClassDefBuilder {
            name: name.into(),
            table: table.into(),
            properties: Vec::new(),
            super_class: None,
            discriminator_column: None,
            id_column_override: None,
        }
    }

    /// Returns the class name (also the discriminator value for
    /// single-table rows of this type).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the physical table for this class's own properties.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the properties declared directly on this class, in
    /// declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Returns the superclass link, if any.
    #[must_use]
    pub fn super_class(&self) -> Option<&SuperClassLink> {
        self.super_class.as_ref()
    }

    /// Looks up a property declared directly on this class.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns this class's own primary-key properties, in declaration
    /// order. Empty when the class inherits its identity entirely from a
    /// superclass.
    #[must_use]
    pub fn primary_key(&self) -> Vec<&PropertyDef> {
        self.properties.iter().filter(|p| p.primary_key).collect()
    }

    /// Returns the class that owns the chain identity and its key
    /// properties: this class's own primary key when it has one, else the
    /// nearest ancestor's.
    #[must_use]
    pub fn identity(&self) -> (&ClassDef, Vec<&PropertyDef>) {
        let own = self.primary_key();
        if !own.is_empty() {
            return (self, own);
        }
        match &self.super_class {
            Some(link) => link.parent.identity(),
            None => (self, Vec::new()),
        }
    }

    /// Returns the inheritance chain root-first, ending with this class.
    #[must_use]
    pub fn chain(&self) -> Vec<&ClassDef> {
        let mut chain = match &self.super_class {
            Some(link) => link.parent.chain(),
            None => Vec::new(),
        };
        chain.push(self);
        chain
    }
}

/// Builder for [`ClassDef`], enforcing per-class invariants at build time.
#[derive(Debug)]
pub struct ClassDefBuilder {
    name: String,
    table: String,
    properties: Vec<PropertyDef>,
    super_class: Option<(Arc<ClassDef>, Mapping)>,
    discriminator_column: Option<String>,
    id_column_override: Option<String>,
}

impl ClassDefBuilder {
    /// Declares a non-key property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            column: column.into(),
            primary_key: false,
        });
        self
    }

    /// Declares a primary-key property.
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            column: column.into(),
            primary_key: true,
        });
        self
    }

    /// Links this class to its superclass with the given mapping.
    #[must_use]
    pub fn extends(mut self, parent: Arc<ClassDef>, mapping: Mapping) -> Self {
        self.super_class = Some((parent, mapping));
        self
    }

    /// Declares the discriminator column for single-table inheritance.
    #[must_use]
    pub fn discriminator(mut self, column: impl Into<String>) -> Self {
        self.discriminator_column = Some(column.into());
        self
    }

    /// Overrides the join column referencing the parent's key under
    /// class-table inheritance.
    #[must_use]
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column_override = Some(column.into());
        self
    }

    /// Validates and builds the definition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a property name is declared twice, if the
    /// class has neither a primary key nor a superclass to inherit one
    /// from, or if a discriminator / join-column option is set without a
    /// superclass link.
    pub fn build(self) -> Result<Arc<ClassDef>, SchemaError> {
        for (i, prop) in self.properties.iter().enumerate() {
            if self.properties[..i].iter().any(|p| p.name == prop.name) {
                return Err(SchemaError::DuplicateProperty {
                    class: self.name,
                    property: prop.name.clone(),
                });
            }
        }

        if self.super_class.is_none() {
            if self.discriminator_column.is_some() || self.id_column_override.is_some() {
                return Err(SchemaError::DanglingInheritanceOption { class: self.name });
            }
            if !self.properties.iter().any(|p| p.primary_key) {
                return Err(SchemaError::MissingPrimaryKey { class: self.name });
            }
        }

        let super_class = self.super_class.map(|(parent, mapping)| SuperClassLink {
            parent,
            mapping,
            discriminator_column: self.discriminator_column,
            id_column_override: self.id_column_override,
        });

        Ok(Arc::new(ClassDef {
            name: self.name,
            table: self.table,
            properties: self.properties,
            super_class,
        }))
    }
}

/// Errors raised while constructing or registering class metadata.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A root class declares no primary key.
    #[error("class '{class}' declares no primary key and has no superclass to inherit one from")]
    MissingPrimaryKey {
        /// The offending class.
        class: String,
    },

    /// A property name is declared twice on the same class.
    #[error("class '{class}' declares property '{property}' more than once")]
    DuplicateProperty {
        /// The offending class.
        class: String,
        /// The duplicated property name.
        property: String,
    },

    /// A discriminator or join-column option is set on a class with no
    /// superclass link.
    #[error("class '{class}' sets an inheritance option but has no superclass link")]
    DanglingInheritanceOption {
        /// The offending class.
        class: String,
    },

    /// A class name is registered twice.
    #[error("class '{0}' is already registered")]
    DuplicateClass(String),

    /// A class name is not registered.
    #[error("unknown class '{0}'")]
    UnknownClass(String),
}

/// An explicit, owned collection of class definitions.
///
/// Whoever loads metadata (an XML loader, hand-written fixtures) registers
/// definitions here and passes the registry to the components that need
/// lookups. There is no process-wide registry.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<ClassDef>>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class definition under its name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateClass`] if the name is taken.
    pub fn register(&mut self, class: Arc<ClassDef>) -> Result<(), SchemaError> {
        if self.classes.contains_key(class.name()) {
            return Err(SchemaError::DuplicateClass(String::from(class.name())));
        }
        self.classes.insert(String::from(class.name()), class);
        Ok(())
    }

    /// Looks up a class definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownClass`] if the name is not registered.
    pub fn get(&self, name: &str) -> Result<&Arc<ClassDef>, SchemaError> {
        self.classes
            .get(name)
            .ok_or_else(|| SchemaError::UnknownClass(String::from(name)))
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
