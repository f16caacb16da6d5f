//! Statement formatting: `SELECT`/`INSERT`/`UPDATE`/`DELETE` trees, table
//! references and joins. `Ddl`/`Utility` statements are emitted from their
//! captured raw text unchanged.

use crate::ast::{
    Assignment, Cte, DeleteStatement, GroupByClause, InsertSource, InsertStatement,
    JoinConstraint, JoinOperator, LimitClause, OnConflictAction, OrAction, OrderByClause,
    PivotTable, PivotValues, SampleClause, SelectBody, SelectCore, SelectItem, SelectStatement,
    Statement, TableAlias, TableFactor, TableName, TableRef, UnpivotTable, UpdateStatement, With,
};

use super::expr::{write_expr, write_order_by_items};
use super::quote_identifier;

fn write_table_alias(out: &mut String, alias: &TableAlias) {
    out.push_str(" AS ");
    out.push_str(&quote_identifier(&alias.name));
    if !alias.columns.is_empty() {
        out.push_str(" (");
        for (i, col) in alias.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&quote_identifier(col));
        }
        out.push(')');
    }
}

fn write_optional_table_alias(out: &mut String, alias: &Option<TableAlias>) {
    if let Some(alias) = alias {
        write_table_alias(out, alias);
    }
}

fn write_sample_clause(out: &mut String, sample: &SampleClause) {
    out.push_str(" TABLESAMPLE ");
    write_expr(out, &sample.size);
    if sample.percent {
        out.push('%');
    }
    if let Some(method) = &sample.method {
        out.push_str(" (");
        out.push_str(method);
        out.push(')');
    }
}

fn write_pivot(out: &mut String, pivot: &PivotTable) {
    out.push_str("PIVOT ");
    write_table_factor_or_ref(out, &pivot.source);
    out.push_str(" ON ");
    out.push_str(&quote_identifier(&pivot.for_column));
    out.push_str(" USING ");
    for (i, agg) in pivot.aggregates.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, &agg.expr);
        if let Some(alias) = &agg.alias {
            out.push_str(" AS ");
            out.push_str(&quote_identifier(alias));
        }
    }
    match &pivot.values {
        PivotValues::Star => {}
        PivotValues::List(values) => {
            out.push_str(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, value);
            }
            out.push(')');
        }
    }
    if !pivot.group_by.is_empty() {
        out.push_str(" GROUP BY ");
        for (i, expr) in pivot.group_by.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_expr(out, expr);
        }
    }
    write_optional_table_alias(out, &pivot.alias);
}

fn write_unpivot(out: &mut String, unpivot: &UnpivotTable) {
    out.push_str("UNPIVOT ");
    write_table_factor_or_ref(out, &unpivot.source);
    out.push_str(" ON (");
    for (i, col) in unpivot.value_columns.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&quote_identifier(col));
    }
    out.push_str(") INTO NAME ");
    out.push_str(&quote_identifier(&unpivot.name_column));
    if !unpivot.groups.is_empty() {
        out.push_str(" VALUE ");
        for (i, group) in unpivot.groups.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('(');
            for (j, col) in group.columns.iter().enumerate() {
                if j > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote_identifier(col));
            }
            out.push(')');
            if let Some(alias) = &group.alias {
                out.push_str(" AS ");
                out.push_str(&quote_identifier(alias));
            }
        }
    }
    if unpivot.include_nulls {
        out.push_str(" INCLUDE NULLS");
    }
    write_optional_table_alias(out, &unpivot.alias);
}

fn write_table_factor_or_ref(out: &mut String, source: &TableRef) {
    out.push('(');
    write_table_ref(out, source);
    out.push(')');
}

fn write_table_factor(out: &mut String, factor: &TableFactor) {
    match factor {
        TableFactor::Table {
            catalog,
            schema,
            name,
            alias,
        } => {
            if let Some(catalog) = catalog {
                out.push_str(&quote_identifier(catalog));
                out.push('.');
            }
            if let Some(schema) = schema {
                out.push_str(&quote_identifier(schema));
                out.push('.');
            }
            out.push_str(&quote_identifier(name));
            write_optional_table_alias(out, alias);
        }
        TableFactor::Derived {
            query,
            lateral,
            alias,
        } => {
            if *lateral {
                out.push_str("LATERAL ");
            }
            out.push('(');
            write_select_statement(out, query);
            out.push(')');
            write_optional_table_alias(out, alias);
        }
        TableFactor::StringSource { path, alias } => {
            out.push('\'');
            out.push_str(&path.replace('\'', "''"));
            out.push('\'');
            write_optional_table_alias(out, alias);
        }
        TableFactor::Function {
            call,
            lateral,
            with_ordinality,
            alias,
        } => {
            if *lateral {
                out.push_str("LATERAL ");
            }
            write_expr(out, call);
            if *with_ordinality {
                out.push_str(" WITH ORDINALITY");
            }
            write_optional_table_alias(out, alias);
        }
        TableFactor::Pivot(pivot) => write_pivot(out, pivot),
        TableFactor::Unpivot(unpivot) => write_unpivot(out, unpivot),
    }
}

fn join_keyword(op: JoinOperator) -> &'static str {
    match op {
        JoinOperator::Comma => ",",
        JoinOperator::Inner => "JOIN",
        JoinOperator::Left => "LEFT JOIN",
        JoinOperator::Right => "RIGHT JOIN",
        JoinOperator::Full => "FULL JOIN",
        JoinOperator::Cross => "CROSS JOIN",
        JoinOperator::Semi => "SEMI JOIN",
        JoinOperator::Anti => "ANTI JOIN",
        JoinOperator::LeftSemi => "LEFT SEMI JOIN",
        JoinOperator::LeftAnti => "LEFT ANTI JOIN",
        JoinOperator::RightSemi => "RIGHT SEMI JOIN",
        JoinOperator::RightAnti => "RIGHT ANTI JOIN",
        JoinOperator::Asof => "ASOF JOIN",
        JoinOperator::AsofLeft => "ASOF LEFT JOIN",
        JoinOperator::AsofRight => "ASOF RIGHT JOIN",
        JoinOperator::Positional => "POSITIONAL JOIN",
    }
}

pub(crate) fn write_table_ref(out: &mut String, table_ref: &TableRef) {
    match table_ref {
        TableRef::Factor { factor, sample } => {
            write_table_factor(out, factor);
            if let Some(sample) = sample {
                write_sample_clause(out, sample);
            }
        }
        TableRef::Join {
            left,
            op,
            natural,
            right,
            constraint,
        } => {
            write_table_ref(out, left);
            out.push(' ');
            if *natural {
                out.push_str("NATURAL ");
            }
            out.push_str(join_keyword(*op));
            out.push(' ');
            write_table_ref(out, right);
            match constraint {
                JoinConstraint::On(expr) => {
                    out.push_str(" ON ");
                    write_expr(out, expr);
                }
                JoinConstraint::Using(cols) => {
                    out.push_str(" USING (");
                    for (i, col) in cols.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&quote_identifier(col));
                    }
                    out.push(')');
                }
                JoinConstraint::None => {}
            }
        }
    }
}

fn write_select_item(out: &mut String, item: &SelectItem) {
    write_expr(out, &item.expr);
    if let Some(alias) = &item.alias {
        out.push_str(" AS ");
        out.push_str(&quote_identifier(alias));
    }
}

fn write_group_by(out: &mut String, group_by: &GroupByClause) {
    match group_by {
        GroupByClause::None => {}
        GroupByClause::All => out.push_str(" GROUP BY ALL"),
        GroupByClause::Exprs(exprs) => {
            out.push_str(" GROUP BY ");
            for (i, expr) in exprs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, expr);
            }
        }
    }
}

fn write_select_core(out: &mut String, core: &SelectCore) {
    out.push_str("SELECT ");
    if core.distinct {
        out.push_str("DISTINCT ");
        if !core.distinct_on.is_empty() {
            out.push_str("ON (");
            for (i, expr) in core.distinct_on.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, expr);
            }
            out.push_str(") ");
        }
    }
    for (i, item) in core.columns.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_select_item(out, item);
    }
    if let Some(from) = &core.from {
        out.push_str(" FROM ");
        write_table_ref(out, from);
    }
    if let Some(where_clause) = &core.where_clause {
        out.push_str(" WHERE ");
        write_expr(out, where_clause);
    }
    write_group_by(out, &core.group_by);
    if let Some(having) = &core.having {
        out.push_str(" HAVING ");
        write_expr(out, having);
    }
    if let Some(qualify) = &core.qualify {
        out.push_str(" QUALIFY ");
        write_expr(out, qualify);
    }
    if !core.windows.is_empty() {
        out.push_str(" WINDOW ");
        for (i, named) in core.windows.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&quote_identifier(&named.name));
            out.push_str(" AS (");
            super::expr::write_window_def_body(out, &named.def);
            out.push(')');
        }
    }
}

fn write_values(out: &mut String, rows: &[Vec<crate::ast::Expr>]) {
    out.push_str("VALUES ");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('(');
        for (j, expr) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            write_expr(out, expr);
        }
        out.push(')');
    }
}

fn write_select_body(out: &mut String, body: &SelectBody) {
    match body {
        SelectBody::Core(core) => write_select_core(out, core),
        SelectBody::Values(rows) => write_values(out, rows),
        SelectBody::SetOp {
            left,
            op,
            all,
            by_name,
            right,
        } => {
            write_select_body(out, left);
            out.push(' ');
            out.push_str(op.as_str());
            if *all {
                out.push_str(" ALL");
            }
            if *by_name {
                out.push_str(" BY NAME");
            }
            out.push(' ');
            write_select_body(out, right);
        }
    }
}

fn write_cte(out: &mut String, cte: &Cte) {
    out.push_str(&quote_identifier(&cte.name));
    if !cte.columns.is_empty() {
        out.push_str(" (");
        for (i, col) in cte.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&quote_identifier(col));
        }
        out.push(')');
    }
    match cte.materialized {
        Some(true) => out.push_str(" AS MATERIALIZED ("),
        Some(false) => out.push_str(" AS NOT MATERIALIZED ("),
        None => out.push_str(" AS ("),
    }
    write_select_statement(out, &cte.query);
    out.push(')');
}

fn write_with(out: &mut String, with: &With) {
    out.push_str("WITH ");
    if with.recursive {
        out.push_str("RECURSIVE ");
    }
    for (i, cte) in with.ctes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_cte(out, cte);
    }
    out.push(' ');
}

fn write_returning(out: &mut String, returning: &[SelectItem]) {
    if !returning.is_empty() {
        out.push_str(" RETURNING ");
        for (i, item) in returning.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_select_item(out, item);
        }
    }
}

fn write_limit(out: &mut String, limit: &LimitClause) {
    if limit.percent || limit.with_ties {
        out.push_str(" FETCH FIRST ");
        write_expr(out, &limit.count);
        if limit.percent {
            out.push_str(" PERCENT");
        }
        out.push_str(if limit.with_ties {
            " ROWS WITH TIES"
        } else {
            " ROWS ONLY"
        });
    } else {
        out.push_str(" LIMIT ");
        write_expr(out, &limit.count);
    }
}

pub(crate) fn write_select_statement(out: &mut String, stmt: &SelectStatement) {
    if let Some(with) = &stmt.with {
        write_with(out, with);
    }
    write_select_body(out, &stmt.body);
    match &stmt.order_by {
        OrderByClause::None => {}
        OrderByClause::All { direction } => {
            out.push_str(" ORDER BY ALL");
            if *direction == crate::ast::OrderDirection::Desc {
                out.push_str(" DESC");
            }
        }
        OrderByClause::Items(items) => {
            out.push_str(" ORDER BY ");
            write_order_by_items(out, items);
        }
    }
    if let Some(limit) = &stmt.limit {
        write_limit(out, limit);
    }
    if let Some(offset) = &stmt.offset {
        out.push_str(" OFFSET ");
        write_expr(out, offset);
    }
    if let Some(sample) = &stmt.sample {
        out.push_str(" USING SAMPLE ");
        write_expr(out, &sample.size);
        if sample.percent {
            out.push('%');
        } else {
            out.push_str(" ROWS");
        }
        if let Some(method) = &sample.method {
            out.push_str(" (");
            out.push_str(method);
            out.push(')');
        }
    }
}

fn write_table_name(out: &mut String, name: &TableName) {
    if let Some(catalog) = &name.catalog {
        out.push_str(&quote_identifier(catalog));
        out.push('.');
    }
    if let Some(schema) = &name.schema {
        out.push_str(&quote_identifier(schema));
        out.push('.');
    }
    out.push_str(&quote_identifier(&name.name));
    if let Some(alias) = &name.alias {
        out.push_str(" AS ");
        out.push_str(&quote_identifier(alias));
    }
}

fn write_assignments(out: &mut String, assignments: &[Assignment]) {
    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&quote_identifier(&assignment.column));
        out.push_str(" = ");
        write_expr(out, &assignment.value);
    }
}

fn write_insert(out: &mut String, insert: &InsertStatement) {
    out.push_str("INSERT ");
    match insert.or_action {
        Some(OrAction::Replace) => out.push_str("OR REPLACE "),
        Some(OrAction::Ignore) => out.push_str("OR IGNORE "),
        None => {}
    }
    out.push_str("INTO ");
    write_table_name(out, &insert.target);
    if !insert.columns.is_empty() {
        out.push_str(" (");
        for (i, col) in insert.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&quote_identifier(col));
        }
        out.push(')');
    }
    if insert.by_name {
        out.push_str(" BY NAME");
    }
    match &insert.source {
        InsertSource::Values(rows) => {
            out.push(' ');
            write_values(out, rows);
        }
        InsertSource::Query(select) => {
            out.push(' ');
            write_select_statement(out, select);
        }
        InsertSource::DefaultValues => out.push_str(" DEFAULT VALUES"),
    }
    if let Some(on_conflict) = &insert.on_conflict {
        out.push_str(" ON CONFLICT");
        if !on_conflict.target_columns.is_empty() {
            out.push_str(" (");
            for (i, col) in on_conflict.target_columns.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote_identifier(col));
            }
            out.push(')');
        }
        match &on_conflict.action {
            OnConflictAction::DoNothing => out.push_str(" DO NOTHING"),
            OnConflictAction::DoUpdate {
                assignments,
                where_clause,
            } => {
                out.push_str(" DO UPDATE SET ");
                write_assignments(out, assignments);
                if let Some(where_clause) = where_clause {
                    out.push_str(" WHERE ");
                    write_expr(out, where_clause);
                }
            }
        }
    }
    write_returning(out, &insert.returning);
}

fn write_update(out: &mut String, update: &UpdateStatement) {
    out.push_str("UPDATE ");
    write_table_name(out, &update.target);
    out.push_str(" SET ");
    write_assignments(out, &update.assignments);
    if let Some(from) = &update.from {
        out.push_str(" FROM ");
        write_table_ref(out, from);
    }
    if let Some(where_clause) = &update.where_clause {
        out.push_str(" WHERE ");
        write_expr(out, where_clause);
    }
    write_returning(out, &update.returning);
}

fn write_delete(out: &mut String, delete: &DeleteStatement) {
    out.push_str("DELETE FROM ");
    write_table_name(out, &delete.target);
    if let Some(using) = &delete.using {
        out.push_str(" USING ");
        write_table_ref(out, using);
    }
    if let Some(where_clause) = &delete.where_clause {
        out.push_str(" WHERE ");
        write_expr(out, where_clause);
    }
    write_returning(out, &delete.returning);
}

pub(crate) fn write_statement(out: &mut String, stmt: &Statement) {
    match stmt {
        Statement::Select(select) => write_select_statement(out, select),
        Statement::Insert(insert) => write_insert(out, insert),
        Statement::Update(update) => write_update(out, update),
        Statement::Delete(delete) => write_delete(out, delete),
        Statement::Ddl(ddl) => out.push_str(&ddl.sql),
        Statement::Utility(utility) => out.push_str(&utility.sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, SelectCore, SelectItem, SelectStatement};

    #[test]
    fn formats_simple_select() {
        let core = SelectCore::new(vec![SelectItem::new(Expr::number("1"))]);
        let select = SelectStatement::simple(core);
        let mut out = String::new();
        write_select_statement(&mut out, &select);
        assert_eq!(out, "SELECT 1");
    }
}
