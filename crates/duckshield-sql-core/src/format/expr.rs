//! Expression formatting.

use std::fmt::Write as _;

use crate::ast::{
    AnyAllKind, Expr, FrameBound, FrameUnit, FunctionCall, GroupingKind, InList, Literal,
    NullOrdering, OrderByItem, OrderDirection, Parameter, StarExpr, StarModifier, WindowDef,
    WindowSpec,
};

use super::quote_identifier;
use super::stmt::write_select_statement;

fn write_string_literal(out: &mut String, value: &str) {
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

fn write_list(out: &mut String, items: &[Expr], sep: &str) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write_expr(out, item);
    }
}

pub(crate) fn write_order_by_items(out: &mut String, items: &[OrderByItem]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, &item.expr);
        if item.direction == OrderDirection::Desc {
            out.push_str(" DESC");
        }
        match item.nulls {
            Some(NullOrdering::First) => out.push_str(" NULLS FIRST"),
            Some(NullOrdering::Last) => out.push_str(" NULLS LAST"),
            None => {}
        }
    }
}

pub(crate) fn write_window_def_body(out: &mut String, def: &WindowDef) {
    let mut wrote = false;
    if let Some(base) = &def.base_window {
        out.push_str(&quote_identifier(base));
        wrote = true;
    }
    if !def.partition_by.is_empty() {
        if wrote {
            out.push(' ');
        }
        out.push_str("PARTITION BY ");
        write_list(out, &def.partition_by, ", ");
        wrote = true;
    }
    if !def.order_by.is_empty() {
        if wrote {
            out.push(' ');
        }
        out.push_str("ORDER BY ");
        write_order_by_items(out, &def.order_by);
        wrote = true;
    }
    if let Some(frame) = &def.frame {
        if wrote {
            out.push(' ');
        }
        write_frame(out, frame);
    }
}

fn write_frame(out: &mut String, frame: &crate::ast::WindowFrame) {
    out.push_str(match frame.units {
        FrameUnit::Rows => "ROWS",
        FrameUnit::Range => "RANGE",
        FrameUnit::Groups => "GROUPS",
    });
    out.push(' ');
    if let Some(end) = &frame.end {
        out.push_str("BETWEEN ");
        write_frame_bound(out, &frame.start);
        out.push_str(" AND ");
        write_frame_bound(out, end);
    } else {
        write_frame_bound(out, &frame.start);
    }
}

fn write_frame_bound(out: &mut String, bound: &FrameBound) {
    match bound {
        FrameBound::UnboundedPreceding => out.push_str("UNBOUNDED PRECEDING"),
        FrameBound::CurrentRow => out.push_str("CURRENT ROW"),
        FrameBound::UnboundedFollowing => out.push_str("UNBOUNDED FOLLOWING"),
        FrameBound::Preceding(e) => {
            write_expr(out, e);
            out.push_str(" PRECEDING");
        }
        FrameBound::Following(e) => {
            write_expr(out, e);
            out.push_str(" FOLLOWING");
        }
    }
}

fn write_window_spec(out: &mut String, spec: &WindowSpec) {
    match spec {
        WindowSpec::Named(name) => out.push_str(&quote_identifier(name)),
        WindowSpec::Inline(def) => {
            out.push('(');
            write_window_def_body(out, def);
            out.push(')');
        }
    }
}

fn write_star_modifier(out: &mut String, modifier: &StarModifier) {
    match modifier {
        StarModifier::Exclude(cols) => {
            out.push_str(" EXCLUDE (");
            for (i, col) in cols.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote_identifier(col));
            }
            out.push(')');
        }
        StarModifier::Replace(items) => {
            out.push_str(" REPLACE (");
            for (i, (expr, alias)) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, expr);
                out.push_str(" AS ");
                out.push_str(&quote_identifier(alias));
            }
            out.push(')');
        }
        StarModifier::Rename(items) => {
            out.push_str(" RENAME (");
            for (i, (old, new)) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote_identifier(old));
                out.push_str(" AS ");
                out.push_str(&quote_identifier(new));
            }
            out.push(')');
        }
    }
}

fn write_star(out: &mut String, star: &StarExpr) {
    if let Some(table) = &star.table {
        out.push_str(&quote_identifier(table));
        out.push_str(".*");
    } else {
        out.push('*');
    }
    // Canonical emission order regardless of how the modifiers were parsed.
    for modifier in star
        .modifiers
        .iter()
        .filter(|m| matches!(m, StarModifier::Exclude(_)))
    {
        write_star_modifier(out, modifier);
    }
    for modifier in star
        .modifiers
        .iter()
        .filter(|m| matches!(m, StarModifier::Replace(_)))
    {
        write_star_modifier(out, modifier);
    }
    for modifier in star
        .modifiers
        .iter()
        .filter(|m| matches!(m, StarModifier::Rename(_)))
    {
        write_star_modifier(out, modifier);
    }
}

pub(crate) fn write_function_call(out: &mut String, call: &FunctionCall) {
    if let Some(schema) = &call.schema {
        out.push_str(schema);
        out.push('.');
    }
    out.push_str(&call.name);
    out.push('(');
    if call.distinct {
        out.push_str("DISTINCT ");
    }
    if call.star {
        out.push('*');
    } else {
        write_list(out, &call.args, ", ");
    }
    if !call.order_by.is_empty() {
        out.push_str(" ORDER BY ");
        write_order_by_items(out, &call.order_by);
    }
    out.push(')');
    if let Some(filter) = &call.filter {
        out.push_str(" FILTER (WHERE ");
        write_expr(out, filter);
        out.push(')');
    }
    if !call.within_group.is_empty() {
        out.push_str(" WITHIN GROUP (ORDER BY ");
        write_order_by_items(out, &call.within_group);
        out.push(')');
    }
    if let Some(window) = &call.window {
        out.push_str(" OVER ");
        write_window_spec(out, window);
    }
}

/// Writes `expr` as re-parseable SQL into `out`.
pub(crate) fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => match lit {
            Literal::Number(s) => out.push_str(s),
            Literal::String(s) => write_string_literal(out, s),
            Literal::Boolean(true) => out.push_str("TRUE"),
            Literal::Boolean(false) => out.push_str("FALSE"),
            Literal::Null => out.push_str("NULL"),
        },
        Expr::Column { table, name, .. } => {
            if let Some(table) = table {
                out.push_str(&quote_identifier(table));
                out.push('.');
            }
            out.push_str(&quote_identifier(name));
        }
        Expr::Binary { left, op, right } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_expr(out, right);
        }
        Expr::Unary { op, operand } => {
            out.push_str(op.as_str());
            if matches!(op, crate::ast::UnaryOp::Not) {
                out.push(' ');
            }
            write_expr(out, operand);
        }
        Expr::Paren(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }
        Expr::Function(call) => write_function_call(out, call),
        Expr::Case {
            operand,
            when_then,
            else_expr,
        } => {
            out.push_str("CASE");
            if let Some(operand) = operand {
                out.push(' ');
                write_expr(out, operand);
            }
            for (when, then) in when_then {
                out.push_str(" WHEN ");
                write_expr(out, when);
                out.push_str(" THEN ");
                write_expr(out, then);
            }
            if let Some(else_expr) = else_expr {
                out.push_str(" ELSE ");
                write_expr(out, else_expr);
            }
            out.push_str(" END");
        }
        Expr::Cast {
            expr,
            data_type,
            try_cast,
        } => {
            out.push_str(if *try_cast { "TRY_CAST(" } else { "CAST(" });
            write_expr(out, expr);
            out.push_str(" AS ");
            let _ = write!(out, "{data_type}");
            out.push(')');
        }
        Expr::TypeCast { expr, data_type } => {
            write_expr(out, expr);
            out.push_str("::");
            let _ = write!(out, "{data_type}");
        }
        Expr::In {
            expr,
            list,
            negated,
        } => {
            write_expr(out, expr);
            out.push_str(if *negated { " NOT IN (" } else { " IN (" });
            match list {
                InList::Values(values) => write_list(out, values, ", "),
                InList::Subquery(select) => write_select_statement(out, select),
            }
            out.push(')');
        }
        Expr::Between {
            expr,
            low,
            high,
            negated,
        } => {
            write_expr(out, expr);
            out.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
            write_expr(out, low);
            out.push_str(" AND ");
            write_expr(out, high);
        }
        Expr::IsNull { expr, negated } => {
            write_expr(out, expr);
            out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
        }
        Expr::IsBool {
            expr,
            value,
            negated,
        } => {
            write_expr(out, expr);
            out.push_str(" IS ");
            if *negated {
                out.push_str("NOT ");
            }
            out.push_str(if *value { "TRUE" } else { "FALSE" });
        }
        Expr::IsDistinctFrom {
            left,
            right,
            negated,
        } => {
            write_expr(out, left);
            out.push_str(" IS ");
            if *negated {
                out.push_str("NOT ");
            }
            out.push_str("DISTINCT FROM ");
            write_expr(out, right);
        }
        Expr::Like {
            expr,
            pattern,
            escape,
            case_insensitive,
            negated,
        } => {
            write_expr(out, expr);
            out.push(' ');
            if *negated {
                out.push_str("NOT ");
            }
            out.push_str(if *case_insensitive { "ILIKE " } else { "LIKE " });
            write_expr(out, pattern);
            if let Some(escape) = escape {
                out.push_str(" ESCAPE ");
                write_expr(out, escape);
            }
        }
        Expr::Glob {
            expr,
            pattern,
            negated,
        } => {
            write_expr(out, expr);
            out.push_str(if *negated { " NOT GLOB " } else { " GLOB " });
            write_expr(out, pattern);
        }
        Expr::SimilarTo {
            expr,
            pattern,
            escape,
            negated,
        } => {
            write_expr(out, expr);
            out.push_str(if *negated {
                " NOT SIMILAR TO "
            } else {
                " SIMILAR TO "
            });
            write_expr(out, pattern);
            if let Some(escape) = escape {
                out.push_str(" ESCAPE ");
                write_expr(out, escape);
            }
        }
        Expr::Extract { field, expr } => {
            out.push_str("EXTRACT(");
            out.push_str(&field.to_ascii_uppercase());
            out.push_str(" FROM ");
            write_expr(out, expr);
            out.push(')');
        }
        Expr::Exists { subquery, negated } => {
            out.push_str(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
            write_select_statement(out, subquery);
            out.push(')');
        }
        Expr::Subquery(select) => {
            out.push('(');
            write_select_statement(out, select);
            out.push(')');
        }
        Expr::AnyAll {
            left,
            op,
            quantifier,
            subquery,
        } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            out.push_str(match quantifier {
                AnyAllKind::Any => "ANY",
                AnyAllKind::All => "ALL",
                AnyAllKind::Some => "SOME",
            });
            out.push_str(" (");
            write_select_statement(out, subquery);
            out.push(')');
        }
        Expr::Star(star) => write_star(out, star),
        Expr::Interval { value, unit } => {
            out.push_str("INTERVAL ");
            write_expr(out, value);
            if let Some(unit) = unit {
                out.push(' ');
                out.push_str(&unit.to_ascii_uppercase());
            }
        }
        Expr::Columns(inner) => {
            out.push_str("COLUMNS(");
            write_expr(out, inner);
            out.push(')');
        }
        Expr::Lambda { params, body } => {
            if params.len() == 1 {
                out.push_str(&quote_identifier(&params[0]));
            } else {
                out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&quote_identifier(param));
                }
                out.push(')');
            }
            out.push_str(" -> ");
            write_expr(out, body);
        }
        Expr::Struct(fields) => {
            out.push('{');
            for (i, (key, value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string_literal(out, key);
                out.push_str(": ");
                write_expr(out, value);
            }
            out.push('}');
        }
        Expr::ListLiteral(items) => {
            out.push('[');
            write_list(out, items, ", ");
            out.push(']');
        }
        Expr::Map(pairs) => {
            out.push_str("MAP {");
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, key);
                out.push_str(": ");
                write_expr(out, value);
            }
            out.push('}');
        }
        Expr::Index { expr, index } => {
            write_expr(out, expr);
            out.push('[');
            write_expr(out, index);
            out.push(']');
        }
        Expr::Slice { expr, start, stop } => {
            write_expr(out, expr);
            out.push('[');
            if let Some(start) = start {
                write_expr(out, start);
            }
            out.push(':');
            if let Some(stop) = stop {
                write_expr(out, stop);
            }
            out.push(']');
        }
        Expr::ListComprehension {
            var,
            iterable,
            body,
            condition,
        } => {
            out.push('[');
            write_expr(out, body);
            out.push_str(" FOR ");
            out.push_str(&quote_identifier(var));
            out.push_str(" IN ");
            write_expr(out, iterable);
            if let Some(condition) = condition {
                out.push_str(" IF ");
                write_expr(out, condition);
            }
            out.push(']');
        }
        Expr::NamedArg { name, value } => {
            out.push_str(&quote_identifier(name));
            out.push_str(" := ");
            write_expr(out, value);
        }
        Expr::GroupingSets { kind, sets } => {
            out.push_str(match kind {
                GroupingKind::Cube => "CUBE",
                GroupingKind::Rollup => "ROLLUP",
                GroupingKind::GroupingSets => "GROUPING SETS",
            });
            out.push('(');
            for (i, set) in sets.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if set.len() == 1 {
                    write_expr(out, &set[0]);
                } else {
                    out.push('(');
                    write_list(out, set, ", ");
                    out.push(')');
                }
            }
            out.push(')');
        }
        Expr::Parameter(param) => match param {
            Parameter::Positional(_) => out.push('?'),
            Parameter::Numbered(n) => {
                let _ = write!(out, "${n}");
            }
            Parameter::Named(name) => {
                let _ = write!(out, "${name}");
            }
        },
        Expr::Default => out.push_str("DEFAULT"),
        Expr::Collate { expr, collation } => {
            write_expr(out, expr);
            out.push_str(" COLLATE ");
            out.push_str(&quote_identifier(collation));
        }
        Expr::Raw(text) => out.push_str(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn fmt(expr: &Expr) -> String {
        let mut out = String::new();
        write_expr(&mut out, expr);
        out
    }

    #[test]
    fn quotes_columns() {
        assert_eq!(fmt(&Expr::column("a")), "\"a\"");
        assert_eq!(fmt(&Expr::qualified_column("t", "a")), "\"t\".\"a\"");
    }

    #[test]
    fn canonicalises_not_eq() {
        let expr = Expr::column("a").binary(BinaryOp::NotEq, Expr::number("1"));
        assert_eq!(fmt(&expr), "\"a\" <> 1");
    }

    #[test]
    fn escapes_string_literal() {
        assert_eq!(fmt(&Expr::string("O'Brien")), "'O''Brien'");
    }

    #[test]
    fn uppercases_boolean_and_null() {
        assert_eq!(fmt(&Expr::boolean(true)), "TRUE");
        assert_eq!(fmt(&Expr::null()), "NULL");
    }

    #[test]
    fn preserves_large_integer_literal_verbatim() {
        assert_eq!(fmt(&Expr::number("3000000000")), "3000000000");
    }
}
