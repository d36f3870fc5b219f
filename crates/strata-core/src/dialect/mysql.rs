//! MySQL dialect: backtick-quoted identifiers and named `?ParamN`
//! placeholders, matching the MySQL connector's parameter syntax.

use super::Dialect;

/// MySQL lexical conventions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("?Param{index}")
    }
}
