//! # duckshield-sql-core
//!
//! A hand-written lexer, Pratt parser, source-faithful formatter, and a set
//! of AST-level security passes for the DuckDB SQL dialect: statement
//! classification against a dangerous-function blocklist, referenced-table
//! collection, row-level-security filter injection, column masking, and
//! column-level lineage tracing.
//!
//! This crate does no I/O and knows nothing about HTTP, a catalog, or an
//! authentication subsystem — it is the frontend a data-platform gateway
//! wraps.
//!
//! ```rust
//! use duckshield_sql_core::{inject_row_filter_sql, parse, format};
//!
//! let stmt = parse("SELECT * FROM orders").unwrap();
//! assert_eq!(format(&stmt), "SELECT * FROM \"orders\"");
//!
//! let rewritten = inject_row_filter_sql(
//!     "SELECT * FROM orders",
//!     "orders",
//!     "tenant_id = 1",
//! ).unwrap();
//! assert_eq!(
//!     rewritten,
//!     "SELECT * FROM \"orders\" WHERE \"tenant_id\" = 1"
//! );
//! ```

pub mod analyze;
pub mod ast;
mod error;
pub mod format;
pub mod lexer;
pub mod parser;

use std::collections::HashMap;

pub use analyze::{
    analyze_column_lineage, classify, contains_dangerous_function, extract_target_table,
    inject_filter, ColumnLineage, ColumnOrigin, StmtKind, Transform, DEFAULT_DANGEROUS_FUNCTIONS,
};
pub use ast::{BinaryOp, Expr, Statement};
pub use error::CoreError;
pub use format::quote_identifier;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};

/// Parses `sql`, which must contain exactly one statement (an optional
/// trailing `;` is allowed). Anything left over after that one statement is
/// a [`CoreError::MultiStatement`].
///
/// # Errors
/// Returns [`CoreError::EmptyInput`] for blank input, the lexer/parser's own
/// error wrapped in [`CoreError::Parse`], or [`CoreError::MultiStatement`].
pub fn parse(sql: &str) -> Result<Statement, CoreError> {
    tracing::debug!(op = "parse", len = sql.len(), "parsing statement");
    if sql.trim().is_empty() {
        return Err(CoreError::EmptyInput);
    }
    let mut parser = Parser::new(sql)?;
    let stmt = parser.parse_statement()?;
    parser.eat_semicolon()?;
    if !parser.at_eof() {
        return Err(CoreError::MultiStatement(sql.to_string()));
    }
    Ok(stmt)
}

/// Parses `sql` as a single standalone expression, with nothing left over.
///
/// # Errors
/// Returns [`CoreError::EmptyInput`], a wrapped parse error, or
/// [`CoreError::TrailingInput`].
pub fn parse_expr(sql: &str) -> Result<Expr, CoreError> {
    tracing::debug!(op = "parse_expr", len = sql.len(), "parsing expression");
    if sql.trim().is_empty() {
        return Err(CoreError::EmptyInput);
    }
    let mut parser = Parser::new(sql)?;
    let expr = parser.parse_expression_only()?;
    if !parser.at_eof() {
        return Err(CoreError::TrailingInput(sql.to_string()));
    }
    Ok(expr)
}

/// Formats a parsed statement back into SQL.
#[must_use]
pub fn format(stmt: &Statement) -> String {
    format::format(stmt)
}

/// The deduplicated table names referenced anywhere in `stmt`.
#[must_use]
pub fn extract_table_names(stmt: &Statement) -> Vec<String> {
    analyze::collect_table_names(stmt)
}

/// Parses `sql`, parses `filter_sql` as an expression, ANDs it into every
/// `WHERE` clause that scopes `table`, and re-formats the result.
///
/// # Errors
/// Any parse failure in either input, or [`CoreError::MultiStatement`].
pub fn inject_row_filter_sql(sql: &str, table: &str, filter_sql: &str) -> Result<String, CoreError> {
    tracing::debug!(op = "inject_row_filter_sql", table, "injecting row filter");
    let mut stmt = parse(sql)?;
    let filter = parse_expr(filter_sql)?;
    analyze::inject_filter(&mut stmt, table, &filter);
    Ok(format::format(&stmt))
}

/// Parses each entry of `filters_sql`, `OR`s them together (each
/// parenthesised), and injects the combination as a single filter. A no-op
/// (just re-formats `sql`) if `filters_sql` is empty.
///
/// # Errors
/// Any parse failure, or [`CoreError::MultiStatement`].
pub fn inject_multiple_row_filters(
    sql: &str,
    table: &str,
    filters_sql: &[String],
) -> Result<String, CoreError> {
    tracing::debug!(
        op = "inject_multiple_row_filters",
        table,
        count = filters_sql.len(),
        "injecting combined row filter"
    );
    let mut stmt = parse(sql)?;
    if filters_sql.is_empty() {
        return Ok(format::format(&stmt));
    }
    let mut combined: Option<Expr> = None;
    for f in filters_sql {
        let parsed = Expr::Paren(Box::new(parse_expr(f)?));
        combined = Some(match combined {
            Some(acc) => acc.binary(BinaryOp::Or, parsed),
            None => parsed,
        });
    }
    let filter = combined.expect("filters_sql is non-empty here");
    analyze::inject_filter(&mut stmt, table, &filter);
    Ok(format::format(&stmt))
}

/// Parses `sql`, replaces masked columns of `table` per `masks` (keyed by
/// column name, mapping to a SQL expression), and re-formats the result.
/// `all_columns` is consulted only if the target list contains a bare `*`
/// that needs expanding before masks can be matched against it.
///
/// # Errors
/// Any parse failure, [`CoreError::StarExpansionRequiresColumns`], or
/// [`CoreError::MaskExpressionParse`]. Fails closed: no partially-masked SQL
/// is ever returned.
pub fn apply_column_masks(
    sql: &str,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<String, CoreError> {
    tracing::debug!(
        op = "apply_column_masks",
        table,
        mask_count = masks.len(),
        "applying column masks"
    );
    let mut stmt = parse(sql)?;
    analyze::apply_column_masks(&mut stmt, table, masks, all_columns)?;
    Ok(format::format(&stmt))
}

/// A value appearing on the right-hand side of an [`RlsRule`].
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    /// A signed integer of any width; rendered as a bare numeric literal.
    Int(i64),
    /// A floating-point value; rendered in general notation.
    Float(f64),
    Text(String),
    /// Rendered as the SQL literal `TRUE`/`FALSE`, not a quoted string.
    Bool(bool),
    /// A value of a type this crate does not support as an RLS literal
    /// (array, object, ...), carrying its source representation for the
    /// resulting error.
    Other(String),
}

/// One row-level-security rule: `column <op> value`, scoped to `table`.
#[derive(Debug, Clone, PartialEq)]
pub struct RlsRule {
    pub table: String,
    pub column: String,
    /// One of `eq`, `neq`, `lt`, `lte`, `gt`, `gte`.
    pub operator: String,
    pub value: RuleValue,
}

fn rule_operator(code: &str) -> Result<BinaryOp, CoreError> {
    match code {
        "eq" => Ok(BinaryOp::Eq),
        "neq" => Ok(BinaryOp::NotEq),
        "lt" => Ok(BinaryOp::Lt),
        "lte" => Ok(BinaryOp::LtEq),
        "gt" => Ok(BinaryOp::Gt),
        "gte" => Ok(BinaryOp::GtEq),
        other => Err(CoreError::UnsupportedOperator(other.to_string())),
    }
}

fn rule_literal(value: &RuleValue) -> Result<Expr, CoreError> {
    match value {
        RuleValue::Int(i) => Ok(Expr::number(i.to_string())),
        RuleValue::Float(f) => Ok(Expr::number(format!("{f}"))),
        RuleValue::Text(s) => Ok(Expr::string(s.clone())),
        RuleValue::Bool(b) => Ok(Expr::boolean(*b)),
        RuleValue::Other(repr) => Err(CoreError::UnsupportedLiteral(repr.clone())),
    }
}

fn rule_expr(rule: &RlsRule) -> Result<Expr, CoreError> {
    let op = rule_operator(&rule.operator)?;
    let literal = rule_literal(&rule.value)?;
    Ok(Expr::column(rule.column.clone()).binary(op, literal))
}

/// Builds a `BinaryExpr` per rule, ANDs together rules that share a table,
/// and injects each table's combined filter into `sql`.
///
/// # Errors
/// [`CoreError::UnsupportedOperator`] / [`CoreError::UnsupportedLiteral`]
/// for a rule this crate doesn't know how to render, plus anything
/// [`parse`] can return.
pub fn rewrite_query(sql: &str, rules: &[RlsRule]) -> Result<String, CoreError> {
    tracing::debug!(
        op = "rewrite_query",
        rule_count = rules.len(),
        "rewriting query with RLS rules"
    );
    let mut stmt = parse(sql)?;
    let mut by_table: Vec<(String, Expr)> = Vec::new();
    for rule in rules {
        let expr = rule_expr(rule)?;
        if let Some(entry) = by_table
            .iter_mut()
            .find(|(t, _)| t.eq_ignore_ascii_case(&rule.table))
        {
            entry.1 = entry.1.clone().and(expr);
        } else {
            by_table.push((rule.table.clone(), expr));
        }
    }
    for (table, filter) in &by_table {
        analyze::inject_filter(&mut stmt, table, filter);
    }
    Ok(format::format(&stmt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse("   ").unwrap_err(), CoreError::EmptyInput);
    }

    #[test]
    fn parse_rejects_multiple_statements() {
        let err = parse("SELECT 1; SELECT 2").unwrap_err();
        assert!(matches!(err, CoreError::MultiStatement(_)));
    }

    #[test]
    fn parse_allows_single_trailing_semicolon() {
        assert!(parse("SELECT 1;").is_ok());
    }

    #[test]
    fn parse_expr_rejects_trailing_input() {
        let err = parse_expr("1 + 1 garbage").unwrap_err();
        assert!(matches!(err, CoreError::TrailingInput(_)));
    }

    #[test]
    fn round_trips_through_format() {
        let stmt = parse("select a, b from t where a > 1 order by b").unwrap();
        assert_eq!(
            format(&stmt),
            "SELECT \"a\", \"b\" FROM \"t\" WHERE \"a\" > 1 ORDER BY \"b\""
        );
    }

    #[test]
    fn injects_single_row_filter() {
        let sql = inject_row_filter_sql("SELECT * FROM orders", "orders", "tenant_id = 1").unwrap();
        assert_eq!(sql, "SELECT * FROM \"orders\" WHERE \"tenant_id\" = 1");
    }

    #[test]
    fn injects_multiple_row_filters_with_or() {
        let sql = inject_multiple_row_filters(
            "SELECT * FROM orders",
            "orders",
            &["a = 1".to_string(), "b = 2".to_string()],
        )
        .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"orders\" WHERE (\"a\" = 1) OR (\"b\" = 2)"
        );
    }

    #[test]
    fn no_filters_is_a_no_op() {
        let sql = inject_multiple_row_filters("SELECT * FROM orders", "orders", &[]).unwrap();
        assert_eq!(sql, "SELECT * FROM \"orders\"");
    }

    #[test]
    fn rewrite_query_builds_and_combines_rules() {
        let rules = vec![
            RlsRule {
                table: "orders".to_string(),
                column: "tenant_id".to_string(),
                operator: "eq".to_string(),
                value: RuleValue::Int(7),
            },
            RlsRule {
                table: "orders".to_string(),
                column: "region".to_string(),
                operator: "neq".to_string(),
                value: RuleValue::Text("eu".to_string()),
            },
        ];
        let sql = rewrite_query("SELECT * FROM orders", &rules).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"orders\" WHERE \"tenant_id\" = 7 AND \"region\" <> 'eu'"
        );
    }

    #[test]
    fn rewrite_query_rejects_unknown_operator() {
        let rules = vec![RlsRule {
            table: "orders".to_string(),
            column: "x".to_string(),
            operator: "matches".to_string(),
            value: RuleValue::Int(1),
        }];
        let err = rewrite_query("SELECT * FROM orders", &rules).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedOperator(_)));
    }

    #[test]
    fn classify_flags_blocklisted_function() {
        let stmt = parse("SELECT * FROM read_csv_auto('x.csv')").unwrap();
        assert!(matches!(classify(&stmt), Err(CoreError::ProhibitedFunction(_))));
    }

    #[test]
    fn masks_column_end_to_end() {
        let mut masks = HashMap::new();
        masks.insert("ssn".to_string(), "'***-**-****'".to_string());
        let sql = apply_column_masks("SELECT ssn FROM people", "people", &masks, &[]).unwrap();
        assert_eq!(sql, "SELECT '***-**-****' AS \"ssn\" FROM \"people\"");
    }
}
