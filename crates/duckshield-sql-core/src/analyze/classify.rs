//! `classify` and `contains_dangerous_function`.

use crate::ast::{FunctionCall, Statement};
use crate::error::CoreError;

use super::walk::{walk_statement, Visitor};

/// The coarse statement kind the public façade reports. `Utility` and
/// `Ddl` statements other than plain DDL all collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    Select,
    Insert,
    Update,
    Delete,
    Ddl,
    Other,
}

/// DuckDB built-ins that read the filesystem, leak internal catalog
/// metadata, or otherwise escape the query sandbox. Checked
/// case-insensitively by [`classify`] and available for callers that want
/// to run [`contains_dangerous_function`] with their own list.
pub const DEFAULT_DANGEROUS_FUNCTIONS: &[&str] = &[
    "read_csv",
    "read_csv_auto",
    "read_parquet",
    "read_json",
    "read_json_auto",
    "read_text",
    "read_blob",
    "glob",
    "sqlite_scan",
    "query_table",
    "duckdb_extensions",
    "duckdb_settings",
    "duckdb_databases",
    "duckdb_secrets",
    "pragma_database_list",
];

struct Scanner<'a> {
    blocklist: &'a [&'a str],
    found: Option<String>,
}

impl Visitor for Scanner<'_> {
    fn function_call(&mut self, call: &FunctionCall) {
        if self.found.is_some() {
            return;
        }
        let lower = call.name.to_lowercase();
        if self.blocklist.iter().any(|b| b.eq_ignore_ascii_case(&lower)) {
            self.found = Some(lower);
        }
    }
}

/// Walks every function call reachable from `stmt` (including table-valued
/// functions in `FROM`) and returns the first one whose lowercased name
/// appears in `blocklist`.
#[must_use]
pub fn contains_dangerous_function(stmt: &Statement, blocklist: &[&str]) -> Option<String> {
    let mut scanner = Scanner {
        blocklist,
        found: None,
    };
    walk_statement(stmt, &mut scanner);
    scanner.found
}

/// Classifies `stmt`. Every statement kind is first scanned against
/// [`DEFAULT_DANGEROUS_FUNCTIONS`] — including a blocklisted function
/// nested inside an `INSERT ... SELECT` or `UPDATE ... FROM` — and a match
/// is reported as [`CoreError::ProhibitedFunction`] rather than as a
/// successful classification, since callers must never execute such a
/// query.
pub fn classify(stmt: &Statement) -> Result<StmtKind, CoreError> {
    if let Some(name) = contains_dangerous_function(stmt, DEFAULT_DANGEROUS_FUNCTIONS) {
        return Err(CoreError::ProhibitedFunction(name));
    }
    Ok(match stmt {
        Statement::Select(_) => StmtKind::Select,
        Statement::Insert(_) => StmtKind::Insert,
        Statement::Update(_) => StmtKind::Update,
        Statement::Delete(_) => StmtKind::Delete,
        Statement::Ddl(_) => StmtKind::Ddl,
        Statement::Utility(_) => StmtKind::Other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    #[test]
    fn classifies_select() {
        assert_eq!(classify(&parse("SELECT 1")).unwrap(), StmtKind::Select);
    }

    #[test]
    fn classifies_ddl() {
        assert_eq!(
            classify(&parse("CREATE TABLE t (a INT)")).unwrap(),
            StmtKind::Ddl
        );
    }

    #[test]
    fn rejects_blocklisted_function() {
        let err = classify(&parse("SELECT * FROM read_csv_auto('x')")).unwrap_err();
        assert!(matches!(err, CoreError::ProhibitedFunction(_)));
    }

    #[test]
    fn rejects_blocklisted_function_nested_in_insert_select() {
        let err = classify(&parse("INSERT INTO t SELECT * FROM read_csv_auto('/etc/passwd')")).unwrap_err();
        assert!(matches!(err, CoreError::ProhibitedFunction(_)));
    }
}
