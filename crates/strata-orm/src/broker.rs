//! Transactional execution of generated statement batches.
//!
//! The broker is the one async, I/O-performing component of the crate. It
//! takes the ordered statement list a generator produced and runs it
//! inside a single transaction, so a multi-table batch either commits as
//! a whole or not at all. It also offers the three lifecycle-aware
//! convenience operations that generate, execute, and transition the
//! object state on success.

use sqlx::sqlite::{SqlitePool, SqliteArguments};
use tracing::debug;

use strata_core::dialect::SqliteDialect;
use strata_core::statement::SqlStatement;
use strata_core::value::SqlValue;

use crate::error::Result;
use crate::generator::{DeleteGenerator, InsertGenerator, UpdateGenerator};
use crate::state::ObjectState;

/// Executes statement batches against a SQLite pool.
#[derive(Debug, Clone)]
pub struct PersistenceBroker {
    pool: SqlitePool,
}

impl PersistenceBroker {
    /// Creates a broker over the given pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Executes the statements in order inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns the first database error; the transaction rolls back and
    /// nothing of the batch remains.
    pub async fn execute(&self, statements: &[SqlStatement]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for statement in statements {
            debug!(sql = statement.text(), params = statement.parameters().len(), "executing");
            let mut query = sqlx::query(statement.text());
            for parameter in statement.parameters() {
                query = bind_value(query, parameter.value());
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Inserts a new object and transitions it to clean on success.
    ///
    /// # Errors
    ///
    /// Generation errors for an object that is not new or lacks its
    /// identity value; database errors from execution.
    pub async fn insert(&self, state: &mut ObjectState) -> Result<()> {
        let dialect = SqliteDialect;
        let statements = InsertGenerator::new(&dialect).generate(state)?;
        self.execute(&statements).await?;
        state.mark_saved();
        Ok(())
    }

    /// Updates a modified object and transitions it to clean on success.
    ///
    /// # Errors
    ///
    /// Generation errors for an object with nothing to save; database
    /// errors from execution.
    pub async fn update(&self, state: &mut ObjectState) -> Result<()> {
        let dialect = SqliteDialect;
        let statements = UpdateGenerator::new(&dialect).generate(state)?;
        self.execute(&statements).await?;
        state.mark_saved();
        Ok(())
    }

    /// Deletes an object marked for deletion. The state stays terminal;
    /// the caller discards the object afterwards.
    ///
    /// # Errors
    ///
    /// Generation errors for an unmarked object; database errors from
    /// execution.
    pub async fn delete(&self, state: &ObjectState) -> Result<()> {
        let dialect = SqliteDialect;
        let statements = DeleteGenerator::new(&dialect).generate(state)?;
        self.execute(&statements).await
    }
}

/// Binds a `SqlValue` parameter to a raw query.
fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    value: &SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Blob(b) => query.bind(b.clone()),
        SqlValue::Uuid(u) => query.bind(u.to_string()),
    }
}
