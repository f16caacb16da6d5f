//! AST → SQL formatter.
//!
//! Produces flat, re-parseable SQL with no newlines or indentation:
//! identifiers are unconditionally double-quoted, function and type names
//! are emitted unquoted/as-stored, operators are canonicalised (`!=`/`==`
//! become `<>`/`=`), and [`crate::ast::Ddl`]/[`crate::ast::Utility`]
//! statements are emitted from their captured source text unchanged.

mod expr;
mod stmt;

use crate::ast::{Expr, Statement};

/// Formats a full statement back into SQL.
#[must_use]
pub fn format(stmt: &Statement) -> String {
    let mut out = String::new();
    stmt::write_statement(&mut out, stmt);
    out
}

/// Formats a standalone expression back into SQL.
#[must_use]
pub fn format_expr(expr: &Expr) -> String {
    let mut out = String::new();
    expr::write_expr(&mut out, expr);
    out
}

/// Double-quotes an identifier, doubling any embedded `"`.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_identifier() {
        assert_eq!(quote_identifier("a"), "\"a\"");
    }

    #[test]
    fn doubles_embedded_quote() {
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn formats_not_equal_canonically() {
        use crate::ast::BinaryOp;
        let expr = Expr::column("x").binary(BinaryOp::NotEq, Expr::number("0"));
        assert_eq!(format_expr(&expr), "\"x\" <> 0");
    }
}
