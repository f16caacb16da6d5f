//! Shared whole-statement traversal used by several analyzer passes.
//!
//! Table collection and the dangerous-function scan both need to visit
//! "every table factor" or "every function call" in a tree that nests
//! arbitrarily through CTEs, set operations, derived tables, and scalar
//! subqueries. Rather than hand-roll that traversal per pass, both drive
//! this single walker with a small callback trait.

use crate::ast::{
    Expr, GroupByClause, InList, OrderByClause, SelectBody, SelectCore, SelectStatement,
    Statement, TableFactor, TableRef, WindowSpec,
};

/// Callbacks invoked while walking a tree. Every method defaults to a no-op
/// so a caller only implements what it needs.
pub(crate) trait Visitor {
    fn table_factor(&mut self, _factor: &TableFactor) {}
    fn function_call(&mut self, _call: &crate::ast::FunctionCall) {}
}

pub(crate) fn walk_statement(stmt: &Statement, v: &mut dyn Visitor) {
    match stmt {
        Statement::Select(s) => walk_select_statement(s, v),
        Statement::Insert(i) => {
            match &i.source {
                crate::ast::InsertSource::Query(s) => walk_select_statement(s, v),
                crate::ast::InsertSource::Values(rows) => {
                    for row in rows {
                        for e in row {
                            walk_expr(e, v);
                        }
                    }
                }
                crate::ast::InsertSource::DefaultValues => {}
            }
            for item in &i.returning {
                walk_expr(&item.expr, v);
            }
        }
        Statement::Update(u) => {
            if let Some(from) = &u.from {
                walk_table_ref(from, v);
            }
            for a in &u.assignments {
                walk_expr(&a.value, v);
            }
            if let Some(w) = &u.where_clause {
                walk_expr(w, v);
            }
            for item in &u.returning {
                walk_expr(&item.expr, v);
            }
        }
        Statement::Delete(d) => {
            if let Some(using) = &d.using {
                walk_table_ref(using, v);
            }
            if let Some(w) = &d.where_clause {
                walk_expr(w, v);
            }
            for item in &d.returning {
                walk_expr(&item.expr, v);
            }
        }
        Statement::Ddl(_) | Statement::Utility(_) => {}
    }
}

pub(crate) fn walk_select_statement(stmt: &SelectStatement, v: &mut dyn Visitor) {
    if let Some(with) = &stmt.with {
        for cte in &with.ctes {
            walk_select_statement(&cte.query, v);
        }
    }
    walk_select_body(&stmt.body, v);
    if let OrderByClause::Items(items) = &stmt.order_by {
        for item in items {
            walk_expr(&item.expr, v);
        }
    }
    if let Some(limit) = &stmt.limit {
        walk_expr(&limit.count, v);
    }
    if let Some(offset) = &stmt.offset {
        walk_expr(offset, v);
    }
}

fn walk_select_body(body: &SelectBody, v: &mut dyn Visitor) {
    match body {
        SelectBody::Core(core) => walk_select_core(core, v),
        SelectBody::Values(rows) => {
            for row in rows {
                for e in row {
                    walk_expr(e, v);
                }
            }
        }
        SelectBody::SetOp { left, right, .. } => {
            walk_select_body(left, v);
            walk_select_body(right, v);
        }
    }
}

fn walk_select_core(core: &SelectCore, v: &mut dyn Visitor) {
    for item in &core.columns {
        walk_expr(&item.expr, v);
    }
    for e in &core.distinct_on {
        walk_expr(e, v);
    }
    if let Some(from) = &core.from {
        walk_table_ref(from, v);
    }
    if let Some(w) = &core.where_clause {
        walk_expr(w, v);
    }
    if let GroupByClause::Exprs(exprs) = &core.group_by {
        for e in exprs {
            walk_expr(e, v);
        }
    }
    if let Some(h) = &core.having {
        walk_expr(h, v);
    }
    if let Some(q) = &core.qualify {
        walk_expr(q, v);
    }
    for w in &core.windows {
        for p in &w.def.partition_by {
            walk_expr(p, v);
        }
        for o in &w.def.order_by {
            walk_expr(&o.expr, v);
        }
    }
}

pub(crate) fn walk_table_ref(table_ref: &TableRef, v: &mut dyn Visitor) {
    match table_ref {
        TableRef::Factor { factor, sample } => {
            walk_table_factor(factor, v);
            if let Some(sample) = sample {
                walk_expr(&sample.size, v);
            }
        }
        TableRef::Join {
            left,
            right,
            constraint,
            ..
        } => {
            walk_table_ref(left, v);
            walk_table_ref(right, v);
            if let crate::ast::JoinConstraint::On(expr) = constraint {
                walk_expr(expr, v);
            }
        }
    }
}

fn walk_table_factor(factor: &TableFactor, v: &mut dyn Visitor) {
    v.table_factor(factor);
    match factor {
        TableFactor::Table { .. } | TableFactor::StringSource { .. } => {}
        TableFactor::Derived { query, .. } => walk_select_statement(query, v),
        TableFactor::Function { call, .. } => walk_expr(call, v),
        TableFactor::Pivot(pivot) => {
            walk_table_ref(&pivot.source, v);
            for agg in &pivot.aggregates {
                walk_expr(&agg.expr, v);
            }
            for e in &pivot.group_by {
                walk_expr(e, v);
            }
            if let crate::ast::PivotValues::List(values) = &pivot.values {
                for e in values {
                    walk_expr(e, v);
                }
            }
        }
        TableFactor::Unpivot(unpivot) => walk_table_ref(&unpivot.source, v),
    }
}

pub(crate) fn walk_expr(expr: &Expr, v: &mut dyn Visitor) {
    match expr {
        Expr::Literal(_)
        | Expr::Column { .. }
        | Expr::Star(_)
        | Expr::Parameter(_)
        | Expr::Default
        | Expr::Raw(_) => {}
        Expr::Binary { left, right, .. } => {
            walk_expr(left, v);
            walk_expr(right, v);
        }
        Expr::Unary { operand, .. } => walk_expr(operand, v),
        Expr::Paren(inner) => walk_expr(inner, v),
        Expr::Function(call) => {
            v.function_call(call);
            for a in &call.args {
                walk_expr(a, v);
            }
            for o in &call.order_by {
                walk_expr(&o.expr, v);
            }
            if let Some(filter) = &call.filter {
                walk_expr(filter, v);
            }
            for o in &call.within_group {
                walk_expr(&o.expr, v);
            }
            if let Some(WindowSpec::Inline(def)) = &call.window {
                for p in &def.partition_by {
                    walk_expr(p, v);
                }
                for o in &def.order_by {
                    walk_expr(&o.expr, v);
                }
            }
        }
        Expr::Case {
            operand,
            when_then,
            else_expr,
        } => {
            if let Some(o) = operand {
                walk_expr(o, v);
            }
            for (w, t) in when_then {
                walk_expr(w, v);
                walk_expr(t, v);
            }
            if let Some(e) = else_expr {
                walk_expr(e, v);
            }
        }
        Expr::Cast { expr, .. } | Expr::TypeCast { expr, .. } => walk_expr(expr, v),
        Expr::In { expr, list, .. } => {
            walk_expr(expr, v);
            match list {
                InList::Values(values) => {
                    for e in values {
                        walk_expr(e, v);
                    }
                }
                InList::Subquery(s) => walk_select_statement(s, v),
            }
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            walk_expr(expr, v);
            walk_expr(low, v);
            walk_expr(high, v);
        }
        Expr::IsNull { expr, .. } | Expr::IsBool { expr, .. } => walk_expr(expr, v),
        Expr::IsDistinctFrom { left, right, .. } => {
            walk_expr(left, v);
            walk_expr(right, v);
        }
        Expr::Like {
            expr,
            pattern,
            escape,
            ..
        }
        | Expr::SimilarTo {
            expr,
            pattern,
            escape,
            ..
        } => {
            walk_expr(expr, v);
            walk_expr(pattern, v);
            if let Some(e) = escape {
                walk_expr(e, v);
            }
        }
        Expr::Glob { expr, pattern, .. } => {
            walk_expr(expr, v);
            walk_expr(pattern, v);
        }
        Expr::Extract { expr, .. } => walk_expr(expr, v),
        Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
            walk_select_statement(subquery, v);
        }
        Expr::AnyAll { left, subquery, .. } => {
            walk_expr(left, v);
            walk_select_statement(subquery, v);
        }
        Expr::Interval { value, .. } => walk_expr(value, v),
        Expr::Columns(inner) => walk_expr(inner, v),
        Expr::Lambda { body, .. } => walk_expr(body, v),
        Expr::Struct(fields) => {
            for (_, val) in fields {
                walk_expr(val, v);
            }
        }
        Expr::ListLiteral(items) => {
            for e in items {
                walk_expr(e, v);
            }
        }
        Expr::Map(pairs) => {
            for (k, val) in pairs {
                walk_expr(k, v);
                walk_expr(val, v);
            }
        }
        Expr::Index { expr, index } => {
            walk_expr(expr, v);
            walk_expr(index, v);
        }
        Expr::Slice { expr, start, stop } => {
            walk_expr(expr, v);
            if let Some(s) = start {
                walk_expr(s, v);
            }
            if let Some(s) = stop {
                walk_expr(s, v);
            }
        }
        Expr::ListComprehension {
            iterable,
            body,
            condition,
            ..
        } => {
            walk_expr(iterable, v);
            walk_expr(body, v);
            if let Some(c) = condition {
                walk_expr(c, v);
            }
        }
        Expr::NamedArg { value, .. } => walk_expr(value, v),
        Expr::GroupingSets { sets, .. } => {
            for set in sets {
                for e in set {
                    walk_expr(e, v);
                }
            }
        }
        Expr::Collate { expr, .. } => walk_expr(expr, v),
    }
}
