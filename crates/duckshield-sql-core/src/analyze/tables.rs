//! `collect_table_names` and `target_table`.

use std::collections::HashSet;

use crate::ast::{Expr, Statement, TableFactor};

use super::walk::{walk_statement, Visitor};

struct Collector {
    out: Vec<String>,
    seen: HashSet<String>,
}

impl Collector {
    fn push(&mut self, name: String) {
        let key = name.to_lowercase();
        if self.seen.insert(key) {
            self.out.push(name);
        }
    }
}

impl Visitor for Collector {
    fn table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Table { name, .. } => self.push(name.clone()),
            TableFactor::StringSource { path, .. } => self.push(path.clone()),
            TableFactor::Function { call, .. } => {
                if let Expr::Function(f) = &**call {
                    self.push(format!("__func__{}", f.name.to_lowercase()));
                }
            }
            TableFactor::Derived { .. } | TableFactor::Pivot(_) | TableFactor::Unpivot(_) => {}
        }
    }
}

/// A deduplicated, insertion-ordered list of table names referenced
/// anywhere in `stmt`: base tables, CTE references, subqueries, and the
/// `INSERT`/`UPDATE`/`DELETE` target. Table-valued function sources are
/// reported as `__func__<lowercase_name>` so callers never mistake a
/// function-backed `FROM` for "no tables".
#[must_use]
pub fn collect_table_names(stmt: &Statement) -> Vec<String> {
    let mut collector = Collector {
        out: Vec::new(),
        seen: HashSet::new(),
    };
    if let Some(target) = stmt.target_table() {
        collector.push(target.name.clone());
    }
    walk_statement(stmt, &mut collector);
    collector.out
}

/// The unqualified target table of an `INSERT`/`UPDATE`/`DELETE`, or an
/// empty string for any other statement kind.
#[must_use]
pub fn extract_target_table(stmt: &Statement) -> String {
    stmt.target_table()
        .map(|t| t.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    #[test]
    fn collects_base_table() {
        let stmt = parse("SELECT * FROM t");
        assert_eq!(collect_table_names(&stmt), vec!["t".to_string()]);
    }

    #[test]
    fn reports_table_function_with_sentinel() {
        let stmt = parse("SELECT * FROM read_parquet('x.parquet')");
        let names = collect_table_names(&stmt);
        assert!(names.iter().any(|n| n.starts_with("__func__")));
    }

    #[test]
    fn deduplicates_joined_table() {
        let stmt = parse("SELECT * FROM t a JOIN t b ON a.id = b.id");
        assert_eq!(collect_table_names(&stmt), vec!["t".to_string()]);
    }

    #[test]
    fn collects_delete_target_and_using() {
        let stmt = parse("DELETE FROM a USING b WHERE a.id = b.id");
        let names = collect_table_names(&stmt);
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(extract_target_table(&stmt), "a");
    }
}
