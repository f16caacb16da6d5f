//! `apply_column_masks`: fail-closed column masking.

use std::collections::HashMap;

use crate::ast::{Expr, SelectBody, SelectCore, SelectItem, SelectStatement, Statement, TableFactor, TableRef};
use crate::error::CoreError;
use crate::parser::Parser;

use super::inject::table_ref_references;

fn parse_mask_expression(sql: &str) -> Result<Expr, crate::parser::ParseError> {
    Parser::new(sql)?.parse_expression_only()
}

/// Collects every name (alias, or the bare table name if unaliased) that a
/// column in this `FROM` could be qualified with to mean `table`, so a
/// reference like `t.ssn` or `titanic.ssn` is recognised as `table`'s
/// column the same way `ssn` is.
fn collect_table_aliases(table_ref: &TableRef, table: &str, out: &mut Vec<String>) {
    match table_ref {
        TableRef::Factor { factor, .. } => {
            if let TableFactor::Table { name, alias, .. } = factor {
                if name.eq_ignore_ascii_case(table) {
                    out.push(alias.as_ref().map_or_else(|| name.clone(), |a| a.name.clone()));
                }
            }
        }
        TableRef::Join { left, right, .. } => {
            collect_table_aliases(left, table, out);
            collect_table_aliases(right, table, out);
        }
    }
}

fn apply_to_table_factor(
    factor: &mut TableFactor,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    match factor {
        TableFactor::Derived { query, .. } => {
            apply_to_select_statement(query, table, masks, all_columns)
        }
        TableFactor::Pivot(p) => apply_to_table_ref(&mut p.source, table, masks, all_columns),
        TableFactor::Unpivot(u) => apply_to_table_ref(&mut u.source, table, masks, all_columns),
        TableFactor::Table { .. } | TableFactor::StringSource { .. } | TableFactor::Function { .. } => {
            Ok(())
        }
    }
}

fn apply_to_table_ref(
    table_ref: &mut TableRef,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    match table_ref {
        TableRef::Factor { factor, .. } => apply_to_table_factor(factor, table, masks, all_columns),
        TableRef::Join { left, right, .. } => {
            apply_to_table_ref(left, table, masks, all_columns)?;
            apply_to_table_ref(right, table, masks, all_columns)
        }
    }
}

fn apply_to_select_core(
    core: &mut SelectCore,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    if let Some(from) = &mut core.from {
        apply_to_table_ref(from, table, masks, all_columns)?;
    }
    let references = core
        .from
        .as_ref()
        .is_some_and(|from| table_ref_references(from, table));
    if !references {
        return Ok(());
    }

    let mut aliases = Vec::new();
    if let Some(from) = &core.from {
        collect_table_aliases(from, table, &mut aliases);
    }
    let is_star_for_table =
        |s: &crate::ast::StarExpr| s.table.is_none() || s.table.as_ref().is_some_and(|t| aliases.iter().any(|a| a.eq_ignore_ascii_case(t)));

    let has_matching_star = core
        .columns
        .iter()
        .any(|item| matches!(&item.expr, Expr::Star(s) if is_star_for_table(s)));
    if has_matching_star {
        if all_columns.is_empty() {
            return Err(CoreError::StarExpansionRequiresColumns {
                table: table.to_string(),
            });
        }
        let mut expanded = Vec::with_capacity(core.columns.len() + all_columns.len());
        for item in &core.columns {
            if matches!(&item.expr, Expr::Star(s) if is_star_for_table(s)) {
                for col in all_columns {
                    expanded.push(SelectItem::new(Expr::column(col.clone())));
                }
            } else {
                expanded.push(item.clone());
            }
        }
        core.columns = expanded;
    }

    for item in &mut core.columns {
        let col_name = match &item.expr {
            Expr::Column { table: None, name, .. } => Some(name.clone()),
            Expr::Column { table: Some(q), name, .. } if aliases.iter().any(|a| a.eq_ignore_ascii_case(q)) => {
                Some(name.clone())
            }
            _ => None,
        };
        let Some(col_name) = col_name else { continue };
        let Some((_, mask_sql)) = masks.iter().find(|(k, _)| k.eq_ignore_ascii_case(&col_name)) else {
            continue;
        };
        let original_name = item.alias.clone().unwrap_or_else(|| col_name.clone());
        let expr = parse_mask_expression(mask_sql).map_err(|source| CoreError::MaskExpressionParse {
            column: original_name.clone(),
            source,
        })?;
        item.expr = expr;
        item.alias = Some(original_name);
    }
    Ok(())
}

fn apply_to_select_body(
    body: &mut SelectBody,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    match body {
        SelectBody::Core(core) => apply_to_select_core(core, table, masks, all_columns),
        SelectBody::Values(_) => Ok(()),
        SelectBody::SetOp { left, right, .. } => {
            apply_to_select_body(left, table, masks, all_columns)?;
            apply_to_select_body(right, table, masks, all_columns)
        }
    }
}

fn apply_to_select_statement(
    stmt: &mut SelectStatement,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    if let Some(with) = &mut stmt.with {
        for cte in &mut with.ctes {
            apply_to_select_statement(&mut cte.query, table, masks, all_columns)?;
        }
    }
    apply_to_select_body(&mut stmt.body, table, masks, all_columns)
}

/// Replaces target-list entries of `table`'s columns that match a key in
/// `masks` (case-insensitively) with the corresponding mask expression,
/// preserving the original column name as the output alias. A target
/// qualified with `table`'s own name or its in-scope alias (`t.ssn`,
/// `titanic.ssn`) is matched the same way a bare `ssn` is. A `*` or
/// `table.*`/`alias.*` target is expanded against `all_columns` first so
/// masks have something to match against.
///
/// Fails closed: a malformed mask expression or a `SELECT *` with no
/// `all_columns` aborts the whole rewrite with an error rather than
/// emitting a partially-masked, partially-unmasked query.
pub fn apply_column_masks(
    stmt: &mut Statement,
    table: &str,
    masks: &HashMap<String, String>,
    all_columns: &[String],
) -> Result<(), CoreError> {
    match stmt {
        Statement::Select(select) => apply_to_select_statement(select, table, masks, all_columns),
        Statement::Insert(_)
        | Statement::Update(_)
        | Statement::Delete(_)
        | Statement::Ddl(_)
        | Statement::Utility(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    #[test]
    fn masks_matching_column() {
        let mut stmt = parse("SELECT \"Name\" FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("Name".to_string(), "'***'".to_string());
        apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap();
        let sql = format(&stmt);
        assert!(sql.contains("'***' AS \"Name\""));
        assert!(!sql.contains("SELECT \"Name\" FROM"));
    }

    #[test]
    fn expands_star_before_masking() {
        let mut stmt = parse("SELECT * FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("name".to_string(), "'***'".to_string());
        let columns = vec!["id".to_string(), "name".to_string()];
        apply_column_masks(&mut stmt, "titanic", &masks, &columns).unwrap();
        let sql = format(&stmt);
        assert_eq!(sql, "SELECT \"id\", '***' AS \"name\" FROM \"titanic\"");
    }

    #[test]
    fn star_without_columns_is_an_error() {
        let mut stmt = parse("SELECT * FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("name".to_string(), "'***'".to_string());
        let err = apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap_err();
        assert!(matches!(err, CoreError::StarExpansionRequiresColumns { .. }));
    }

    #[test]
    fn malformed_mask_expression_fails_closed() {
        let mut stmt = parse("SELECT name FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("name".to_string(), "(((".to_string());
        let err = apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap_err();
        assert!(matches!(err, CoreError::MaskExpressionParse { .. }));
    }

    #[test]
    fn leaves_other_tables_untouched() {
        let mut stmt = parse("SELECT name FROM other");
        let mut masks = HashMap::new();
        masks.insert("name".to_string(), "'***'".to_string());
        apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap();
        assert_eq!(format(&stmt), "SELECT \"name\" FROM \"other\"");
    }

    #[test]
    fn masks_table_qualified_column() {
        let mut stmt = parse("SELECT titanic.ssn FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("ssn".to_string(), "'***'".to_string());
        apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap();
        let sql = format(&stmt);
        assert!(sql.contains("'***' AS \"ssn\""));
        assert!(!sql.contains("\"titanic\".\"ssn\""));
    }

    #[test]
    fn masks_alias_qualified_column() {
        let mut stmt = parse("SELECT t.ssn FROM titanic t");
        let mut masks = HashMap::new();
        masks.insert("ssn".to_string(), "'***'".to_string());
        apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap();
        let sql = format(&stmt);
        assert!(sql.contains("'***' AS \"ssn\""));
    }

    #[test]
    fn does_not_mask_column_qualified_by_a_different_table() {
        let mut stmt = parse("SELECT other.ssn FROM titanic JOIN other ON titanic.id = other.id");
        let mut masks = HashMap::new();
        masks.insert("ssn".to_string(), "'***'".to_string());
        apply_column_masks(&mut stmt, "titanic", &masks, &[]).unwrap();
        assert!(format(&stmt).contains("\"other\".\"ssn\""));
    }

    #[test]
    fn expands_table_qualified_star() {
        let mut stmt = parse("SELECT titanic.* FROM titanic");
        let mut masks = HashMap::new();
        masks.insert("name".to_string(), "'***'".to_string());
        let columns = vec!["id".to_string(), "name".to_string()];
        apply_column_masks(&mut stmt, "titanic", &masks, &columns).unwrap();
        assert_eq!(format(&stmt), "SELECT \"id\", '***' AS \"name\" FROM \"titanic\"");
    }
}
