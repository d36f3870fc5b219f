#![allow(dead_code)]

use std::sync::Arc;

use strata_orm::{ClassDef, Mapping, ObjectState};
use uuid::Uuid;

/// Root of every fixture hierarchy.
pub fn shape() -> Arc<ClassDef> {
    ClassDef::builder("Shape", "Shape_table")
        .primary_key("ShapeID", "ShapeID_field")
        .property("ShapeName", "ShapeName")
        .build()
        .unwrap()
}

/// `Circle` subclass with its own table and key.
pub fn circle(mapping: Mapping) -> Arc<ClassDef> {
    ClassDef::builder("Circle", "circle_table")
        .primary_key("CircleID", "CircleID_field")
        .property("Radius", "Radius")
        .extends(shape(), mapping)
        .build()
        .unwrap()
}

/// Three-level class-table chain: Shape -> Circle -> FilledCircle.
pub fn filled_circle() -> Arc<ClassDef> {
    ClassDef::builder("FilledCircle", "FilledCircle_table")
        .primary_key("FilledCircleID", "FilledCircleID_field")
        .property("Colour", "Colour")
        .extends(circle(Mapping::ClassTable), Mapping::ClassTable)
        .build()
        .unwrap()
}

/// Keyless subclass sharing the root's table, discriminated by type name.
pub fn circle_no_primary_key() -> Arc<ClassDef> {
    ClassDef::builder("CircleNoPrimaryKey", "Shape_table")
        .property("Radius", "Radius")
        .extends(shape(), Mapping::SingleTable)
        .discriminator("ShapeType_field")
        .build()
        .unwrap()
}

/// A brand-new circle with its identity assigned and its fixture values.
pub fn new_circle(mapping: Mapping, id: Uuid) -> ObjectState {
    let mut state = ObjectState::new_object(circle(mapping));
    state.set("CircleID", id).unwrap();
    state.set("ShapeName", "MyShape").unwrap();
    state.set("Radius", 10_i64).unwrap();
    state
}
