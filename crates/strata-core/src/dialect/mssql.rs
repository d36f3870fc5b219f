//! SQL Server dialect: bracket-quoted identifiers and named `@ParamN`
//! placeholders.

use super::Dialect;

/// SQL Server lexical conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlDialect;

impl Dialect for MsSqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("[{ident}]")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@Param{index}")
    }
}
