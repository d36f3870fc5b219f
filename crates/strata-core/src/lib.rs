//! # strata-core
//!
//! Foundation types for the strata persistence engine:
//!
//! - Class/property metadata with inheritance links (`schema`)
//! - SQL values with inferred database types (`value`)
//! - Immutable bound statements (`statement`)
//! - Identifier-quoting and placeholder-naming dialects (`dialect`)
//!
//! This crate is purely descriptive: it knows nothing about object
//! lifecycle or statement generation (see `strata-orm`) and performs no
//! I/O.
//!
//! ## Describing a hierarchy
//!
//! ```rust
//! use strata_core::schema::{ClassDef, Mapping};
//!
//! let shape = ClassDef::builder("Shape", "Shape_table")
//!     .primary_key("ShapeID", "ShapeID_field")
//!     .property("ShapeName", "ShapeName")
//!     .build()
//!     .unwrap();
//!
//! let circle = ClassDef::builder("Circle", "circle_table")
//!     .primary_key("CircleID", "CircleID_field")
//!     .property("Radius", "Radius")
//!     .extends(shape, Mapping::ClassTable)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(circle.chain().len(), 2);
//! ```

pub mod dialect;
pub mod schema;
pub mod statement;
pub mod value;

pub use dialect::{Dialect, MsSqlDialect, MySqlDialect, SqliteDialect};
pub use schema::{ClassDef, ClassRegistry, Mapping, PropertyDef, SchemaError, SuperClassLink};
pub use statement::{Parameter, SqlStatement};
pub use value::{DbType, SqlValue, ToSqlValue};
