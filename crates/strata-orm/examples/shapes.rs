//! Shape Hierarchy - Inheritance Mapping Example
//!
//! This example maps one Shape -> Circle hierarchy three ways and prints
//! the statement batch each mapping produces for the same new object:
//! - Class-table: one table per class, parent inserted first
//! - Concrete-table: one flattened table for the leaf
//! - Single-table: the root's table plus a discriminator column
//!
//! Run with: cargo run --example shapes

use std::sync::Arc;

use strata_core::dialect::MySqlDialect;
use strata_core::schema::{ClassDef, ClassRegistry, Mapping};
use strata_orm::{InsertGenerator, ObjectState};
use uuid::Uuid;

fn shape() -> Arc<ClassDef> {
    ClassDef::builder("Shape", "Shape_table")
        .primary_key("ShapeID", "ShapeID_field")
        .property("ShapeName", "ShapeName")
        .build()
        .expect("valid root class")
}

fn circle(mapping: Mapping) -> Arc<ClassDef> {
    let (name, table) = match mapping {
        Mapping::SingleTable => ("Circle", "Shape_table"),
        _ => ("Circle", "circle_table"),
    };
    let mut builder = ClassDef::builder(name, table)
        .property("Radius", "Radius")
        .extends(shape(), mapping);
    builder = match mapping {
        Mapping::SingleTable => builder.discriminator("ShapeType_field"),
        _ => builder.primary_key("CircleID", "CircleID_field"),
    };
    builder.build().expect("valid subclass")
}

fn print_batch(mapping: Mapping) {
    let class = circle(mapping);
    let mut registry = ClassRegistry::new();
    registry.register(Arc::clone(&class)).expect("fresh registry");

    let mut state = ObjectState::new_object(class);
    let id = Uuid::new_v4();
    let identity = match mapping {
        Mapping::SingleTable => "ShapeID",
        _ => "CircleID",
    };
    state.set(identity, id).expect("identity property");
    state.set("ShapeName", "MyShape").expect("known property");
    state.set("Radius", 10_i64).expect("known property");

    let dialect = MySqlDialect;
    let batch = InsertGenerator::new(&dialect)
        .generate(&state)
        .expect("consistent metadata");

    println!("== {mapping} ==");
    for statement in &batch {
        println!("  {}", statement.text());
        for (i, parameter) in statement.parameters().iter().enumerate() {
            println!("    ?Param{i} = {:?} ({:?})", parameter.value(), parameter.db_type());
        }
    }
    println!();
}

fn main() {
    print_batch(Mapping::ClassTable);
    print_batch(Mapping::ConcreteTable);
    print_batch(Mapping::SingleTable);
}
