//! SQL values and database type inference.
//!
//! Every parameter bound by the statement generators is a [`SqlValue`].
//! Values carry enough information to infer the database type they will
//! be transmitted as, so a bound statement can be handed to any driver
//! without re-inspecting the originating object.

use uuid::Uuid;

/// A SQL value that can be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Object identity value (GUID).
    Uuid(Uuid),
}

impl SqlValue {
    /// Returns the inferred database type for this value.
    #[must_use]
    pub const fn db_type(&self) -> DbType {
        match self {
            Self::Null => DbType::Null,
            Self::Bool(_) => DbType::Boolean,
            Self::Int(_) => DbType::BigInt,
            Self::Float(_) => DbType::Double,
            Self::Text(_) => DbType::Varchar,
            Self::Blob(_) => DbType::Blob,
            Self::Uuid(_) => DbType::Guid,
        }
    }

    /// Returns `true` if this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Database type inferred from a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    /// Unknown type carried by a NULL value.
    Null,
    /// BOOLEAN / BIT.
    Boolean,
    /// BIGINT.
    BigInt,
    /// DOUBLE PRECISION.
    Double,
    /// VARCHAR / TEXT.
    Varchar,
    /// BLOB / VARBINARY.
    Blob,
    /// GUID / UUID, transmitted as its canonical text form.
    Guid,
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Uuid {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Uuid(self)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}
