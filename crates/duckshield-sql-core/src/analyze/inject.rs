//! `inject_filter`: the row-level-security rewrite pass.

use crate::ast::{
    Expr, SelectBody, SelectCore, SelectStatement, Statement, TableFactor, TableRef,
};

fn and_into(slot: &mut Option<Expr>, filter: Expr) {
    *slot = Some(match slot.take() {
        Some(existing) => existing.and(filter),
        None => filter,
    });
}

fn table_factor_references(factor: &TableFactor, table: &str) -> bool {
    match factor {
        TableFactor::Table { name, .. } => name.eq_ignore_ascii_case(table),
        TableFactor::Pivot(p) => table_ref_references(&p.source, table),
        TableFactor::Unpivot(u) => table_ref_references(&u.source, table),
        TableFactor::Derived { .. } | TableFactor::StringSource { .. } | TableFactor::Function { .. } => {
            false
        }
    }
}

pub(crate) fn table_ref_references(table_ref: &TableRef, table: &str) -> bool {
    match table_ref {
        TableRef::Factor { factor, .. } => table_factor_references(factor, table),
        TableRef::Join { left, right, .. } => {
            table_ref_references(left, table) || table_ref_references(right, table)
        }
    }
}

fn inject_into_table_factor(factor: &mut TableFactor, table: &str, filter: &Expr) {
    match factor {
        TableFactor::Derived { query, .. } => inject_into_select_statement(query, table, filter),
        TableFactor::Pivot(p) => inject_into_table_ref(&mut p.source, table, filter),
        TableFactor::Unpivot(u) => inject_into_table_ref(&mut u.source, table, filter),
        TableFactor::Table { .. } | TableFactor::StringSource { .. } | TableFactor::Function { .. } => {}
    }
}

fn inject_into_table_ref(table_ref: &mut TableRef, table: &str, filter: &Expr) {
    match table_ref {
        TableRef::Factor { factor, .. } => inject_into_table_factor(factor, table, filter),
        TableRef::Join { left, right, .. } => {
            inject_into_table_ref(left, table, filter);
            inject_into_table_ref(right, table, filter);
        }
    }
}

fn inject_into_select_core(core: &mut SelectCore, table: &str, filter: &Expr) {
    if let Some(from) = &mut core.from {
        inject_into_table_ref(from, table, filter);
    }
    let references = core
        .from
        .as_ref()
        .is_some_and(|from| table_ref_references(from, table));
    if references {
        and_into(&mut core.where_clause, filter.clone());
    }
}

fn inject_into_select_body(body: &mut SelectBody, table: &str, filter: &Expr) {
    match body {
        SelectBody::Core(core) => inject_into_select_core(core, table, filter),
        SelectBody::Values(_) => {}
        SelectBody::SetOp { left, right, .. } => {
            inject_into_select_body(left, table, filter);
            inject_into_select_body(right, table, filter);
        }
    }
}

fn inject_into_select_statement(stmt: &mut SelectStatement, table: &str, filter: &Expr) {
    if let Some(with) = &mut stmt.with {
        for cte in &mut with.ctes {
            inject_into_select_statement(&mut cte.query, table, filter);
        }
    }
    inject_into_select_body(&mut stmt.body, table, filter);
}

/// ANDs `filter` into the `WHERE` clause of every `SELECT` core whose
/// `FROM` (including joins) directly references `table`, recursing through
/// CTEs, set operations, derived tables, `LATERAL` subqueries, and
/// `PIVOT`/`UNPIVOT` sources. For `UPDATE`/`DELETE`, ANDs `filter` into the
/// statement's own `WHERE` iff its target table matches. Has no effect on
/// `INSERT`, `DDL`, or utility statements.
pub fn inject_filter(stmt: &mut Statement, table: &str, filter: &Expr) {
    match stmt {
        Statement::Select(select) => inject_into_select_statement(select, table, filter),
        Statement::Update(update) => {
            if update.target.name.eq_ignore_ascii_case(table) {
                and_into(&mut update.where_clause, filter.clone());
            }
        }
        Statement::Delete(delete) => {
            if delete.target.name.eq_ignore_ascii_case(table) {
                and_into(&mut delete.where_clause, filter.clone());
            }
        }
        Statement::Insert(_) | Statement::Ddl(_) | Statement::Utility(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    fn parse_expr(sql: &str) -> Expr {
        Parser::new(sql).unwrap().parse_expression_only().unwrap()
    }

    #[test]
    fn injects_into_matching_core_only() {
        let mut stmt = parse("SELECT * FROM t UNION ALL SELECT * FROM other");
        let filter = parse_expr("p = 1");
        inject_filter(&mut stmt, "t", &filter);
        let sql = format(&stmt);
        assert_eq!(
            sql,
            "SELECT * FROM \"t\" WHERE \"p\" = 1 UNION ALL SELECT * FROM \"other\""
        );
    }

    #[test]
    fn recurses_through_derived_tables() {
        let mut stmt = parse("SELECT * FROM (SELECT * FROM t) sub");
        let filter = parse_expr("p = 1");
        inject_filter(&mut stmt, "t", &filter);
        assert!(format(&stmt).contains("\"t\" WHERE \"p\" = 1"));
    }

    #[test]
    fn leaves_non_matching_where_untouched() {
        let mut stmt = parse("SELECT * FROM other WHERE x = 1");
        let filter = parse_expr("p = 1");
        inject_filter(&mut stmt, "t", &filter);
        assert_eq!(format(&stmt), "SELECT * FROM \"other\" WHERE \"x\" = 1");
    }

    #[test]
    fn ands_onto_existing_where_on_update() {
        let mut stmt = parse("UPDATE t SET a = 1 WHERE b = 2");
        let filter = parse_expr("p = 1");
        inject_filter(&mut stmt, "t", &filter);
        assert_eq!(
            format(&stmt),
            "UPDATE \"t\" SET \"a\" = 1 WHERE \"b\" = 2 AND \"p\" = 1"
        );
    }
}
