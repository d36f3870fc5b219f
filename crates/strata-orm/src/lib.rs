//! # strata-orm
//!
//! Inheritance-aware persistence: given a mapped class hierarchy and a
//! live object's property state, deterministically generate the ordered
//! INSERT, UPDATE, or DELETE batch that persists it — one statement per
//! physical table touched, correctly ordered against the foreign-key
//! dependencies between parent and child tables.
//!
//! Three inheritance mappings are supported:
//!
//! - **Class-table**: every class owns a table; one statement per class,
//!   parents inserted first, children deleted first.
//! - **Concrete-table**: the leaf's table holds the whole flattened
//!   property set; ancestor tables are never touched.
//! - **Single-table**: the hierarchy shares the root's table and a
//!   discriminator column names the concrete type of each row.
//!
//! ## Persisting a new object
//!
//! ```rust
//! use strata_core::dialect::MySqlDialect;
//! use strata_core::schema::{ClassDef, Mapping};
//! use strata_orm::{InsertGenerator, ObjectState};
//! use uuid::Uuid;
//!
//! let shape = ClassDef::builder("Shape", "Shape_table")
//!     .primary_key("ShapeID", "ShapeID_field")
//!     .property("ShapeName", "ShapeName")
//!     .build()
//!     .unwrap();
//! let circle = ClassDef::builder("Circle", "circle_table")
//!     .primary_key("CircleID", "CircleID_field")
//!     .property("Radius", "Radius")
//!     .extends(shape, Mapping::ClassTable)
//!     .build()
//!     .unwrap();
//!
//! let mut state = ObjectState::new_object(circle);
//! state.set("CircleID", Uuid::new_v4()).unwrap();
//! state.set("ShapeName", "MyShape").unwrap();
//! state.set("Radius", 10_i64).unwrap();
//!
//! let dialect = MySqlDialect;
//! let batch = InsertGenerator::new(&dialect).generate(&state).unwrap();
//! assert_eq!(batch.len(), 2); // Shape_table first, circle_table second
//! ```
//!
//! Generation is pure: it touches no database and never mutates the
//! object state. Executing a batch — here via [`PersistenceBroker`], or
//! through any other connection layer — happens afterwards, inside one
//! transaction, and only then does the caller transition the lifecycle.

mod broker;
mod error;
pub mod generator;
pub mod resolver;
pub mod state;

pub use broker::PersistenceBroker;
pub use error::{OrmError, Result};
pub use generator::{DeleteGenerator, InsertGenerator, UpdateGenerator};
pub use resolver::{ColumnBinding, ColumnSource, InheritanceResolver, TableOperation};
pub use state::{Lifecycle, ObjectState, PropertyState};

// Re-export commonly used types from strata-core.
pub use strata_core::dialect::{Dialect, MsSqlDialect, MySqlDialect, SqliteDialect};
pub use strata_core::schema::{ClassDef, ClassRegistry, Mapping, PropertyDef};
pub use strata_core::statement::{Parameter, SqlStatement};
pub use strata_core::value::{SqlValue, ToSqlValue};
