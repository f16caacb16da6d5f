//! `analyze_column_lineage`: traces each output column of a `SELECT` back to
//! the base-table columns it was computed from.

use std::collections::{HashMap, HashSet};

use crate::ast::{
    Expr, InList, SelectBody, SelectCore, SelectStatement, StarExpr, StarModifier, TableFactor,
    TableRef,
};

/// A single base-table column an output column was (transitively) derived
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnOrigin {
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
}

/// Whether an output column is an unmodified copy of a source column or the
/// result of evaluating some expression over one or more source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Direct,
    Expression,
}

/// The traced lineage of one entry in a `SELECT`'s target list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLineage {
    pub name: String,
    pub index: usize,
    pub transform: Transform,
    /// The function or construct that produced this column, if any:
    /// the uppercased function name for a call, `"CASE"`, `"CAST"`,
    /// `"EXTRACT"`, `"SUBQUERY"`, or a set-operator name for a column coming
    /// through `UNION`/`INTERSECT`/`EXCEPT`.
    pub function: Option<String>,
    pub sources: Vec<ColumnOrigin>,
}

#[derive(Debug, Clone)]
struct ColumnInfo {
    name: String,
    transform: Transform,
    function: Option<String>,
    sources: Vec<ColumnOrigin>,
}

#[derive(Debug, Clone)]
struct Source {
    alias: String,
    columns: Vec<ColumnInfo>,
}

struct Trace {
    transform: Transform,
    function: Option<String>,
    sources: Vec<ColumnOrigin>,
}

impl Trace {
    fn direct(function: Option<String>, sources: Vec<ColumnOrigin>) -> Self {
        Self {
            transform: Transform::Direct,
            function,
            sources,
        }
    }

    fn expr(function: Option<String>, sources: Vec<ColumnOrigin>) -> Self {
        Self {
            transform: Transform::Expression,
            function,
            sources,
        }
    }
}

struct Analyzer<'a> {
    schema_info: &'a HashMap<String, Vec<String>>,
    ctes: HashMap<String, Vec<ColumnInfo>>,
}

impl<'a> Analyzer<'a> {
    fn new(schema_info: &'a HashMap<String, Vec<String>>) -> Self {
        Self {
            schema_info,
            ctes: HashMap::new(),
        }
    }

    fn lookup_schema(&self, schema: Option<&str>, table: &str) -> Option<&Vec<String>> {
        if let Some(s) = schema {
            let combined = format!("{s}.{table}");
            if let Some(cols) = self
                .schema_info
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&combined))
                .map(|(_, v)| v)
            {
                return Some(cols);
            }
        }
        self.schema_info
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(table))
            .map(|(_, v)| v)
    }

    fn analyze_select_statement(
        &mut self,
        stmt: &SelectStatement,
        ancestors: &[Vec<Source>],
    ) -> Vec<ColumnInfo> {
        let mut saved = Vec::new();
        if let Some(with) = &stmt.with {
            for cte in &with.ctes {
                let mut cols = self.analyze_select_statement(&cte.query, ancestors);
                if !cte.columns.is_empty() {
                    for (col, new_name) in cols.iter_mut().zip(cte.columns.iter()) {
                        col.name = new_name.clone();
                    }
                }
                let key = cte.name.to_lowercase();
                saved.push((key.clone(), self.ctes.insert(key, cols)));
            }
        }
        let result = self.analyze_select_body(&stmt.body, ancestors);
        for (key, previous) in saved.into_iter().rev() {
            match previous {
                Some(cols) => {
                    self.ctes.insert(key, cols);
                }
                None => {
                    self.ctes.remove(&key);
                }
            }
        }
        result
    }

    fn analyze_select_body(&mut self, body: &SelectBody, ancestors: &[Vec<Source>]) -> Vec<ColumnInfo> {
        match body {
            SelectBody::Core(core) => self.analyze_select_core(core, ancestors),
            SelectBody::Values(rows) => {
                let width = rows.first().map_or(0, Vec::len);
                (0..width)
                    .map(|i| ColumnInfo {
                        name: format!("column{i}"),
                        transform: Transform::Expression,
                        function: None,
                        sources: Vec::new(),
                    })
                    .collect()
            }
            SelectBody::SetOp {
                left, op, right, ..
            } => {
                let left_cols = self.analyze_select_body(left, ancestors);
                let right_cols = self.analyze_select_body(right, ancestors);
                let n = left_cols.len().min(right_cols.len());
                left_cols
                    .into_iter()
                    .zip(right_cols)
                    .take(n)
                    .map(|(l, r)| {
                        let mut sources = l.sources;
                        sources.extend(r.sources);
                        ColumnInfo {
                            name: l.name,
                            transform: Transform::Expression,
                            function: Some(op.as_str().to_string()),
                            sources,
                        }
                    })
                    .collect()
            }
        }
    }

    fn analyze_select_core(&mut self, core: &SelectCore, ancestors: &[Vec<Source>]) -> Vec<ColumnInfo> {
        let scope = self.collect_sources(core.from.as_ref(), ancestors);
        let targets = expand_targets(core, &scope);
        targets
            .into_iter()
            .enumerate()
            .map(|(_i, (alias, expr))| {
                let trace = self.trace_expr(&expr, &scope, ancestors);
                let name = alias.unwrap_or_else(|| default_name(&expr));
                ColumnInfo {
                    name,
                    transform: trace.transform,
                    function: trace.function,
                    sources: trace.sources,
                }
            })
            .collect()
    }

    fn collect_sources(&mut self, from: Option<&TableRef>, ancestors: &[Vec<Source>]) -> Vec<Source> {
        let mut out = Vec::new();
        if let Some(tr) = from {
            self.collect_from_table_ref(tr, ancestors, &mut out);
        }
        out
    }

    fn collect_from_table_ref(
        &mut self,
        table_ref: &TableRef,
        ancestors: &[Vec<Source>],
        out: &mut Vec<Source>,
    ) {
        match table_ref {
            TableRef::Factor { factor, .. } => {
                if let Some(src) = self.source_from_factor(factor, ancestors) {
                    out.push(src);
                }
            }
            TableRef::Join { left, right, .. } => {
                self.collect_from_table_ref(left, ancestors, out);
                self.collect_from_table_ref(right, ancestors, out);
            }
        }
    }

    fn source_from_factor(&mut self, factor: &TableFactor, ancestors: &[Vec<Source>]) -> Option<Source> {
        match factor {
            TableFactor::Table {
                schema, name, alias, ..
            } => {
                let alias_name = alias
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| name.clone());
                let key = name.to_lowercase();
                let columns = if let Some(cte_cols) = self.ctes.get(&key) {
                    cte_cols.clone()
                } else {
                    self.lookup_schema(schema.as_deref(), name)
                        .map(|names| {
                            names
                                .iter()
                                .map(|c| ColumnInfo {
                                    name: c.clone(),
                                    transform: Transform::Direct,
                                    function: None,
                                    sources: vec![ColumnOrigin {
                                        schema: schema.clone(),
                                        table: name.clone(),
                                        column: c.clone(),
                                    }],
                                })
                                .collect()
                        })
                        .unwrap_or_default()
                };
                Some(Source {
                    alias: alias_name,
                    columns,
                })
            }
            TableFactor::Derived { query, alias, .. } => {
                let inner = self.analyze_select_statement(query, ancestors);
                let alias_name = alias.as_ref().map(|a| a.name.clone()).unwrap_or_default();
                let columns = match alias {
                    Some(a) if !a.columns.is_empty() => inner
                        .into_iter()
                        .zip(a.columns.iter())
                        .map(|(mut c, new_name)| {
                            c.name = new_name.clone();
                            c
                        })
                        .collect(),
                    _ => inner,
                };
                Some(Source {
                    alias: alias_name,
                    columns,
                })
            }
            TableFactor::StringSource { .. } => None,
            TableFactor::Function { alias, .. } => Some(Source {
                alias: alias.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                columns: alias
                    .as_ref()
                    .map(|a| expr_columns(&a.columns))
                    .unwrap_or_default(),
            }),
            TableFactor::Pivot(p) => Some(Source {
                alias: p.alias.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                columns: p
                    .alias
                    .as_ref()
                    .map(|a| expr_columns(&a.columns))
                    .unwrap_or_default(),
            }),
            TableFactor::Unpivot(u) => Some(Source {
                alias: u.alias.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                columns: u
                    .alias
                    .as_ref()
                    .map(|a| expr_columns(&a.columns))
                    .unwrap_or_default(),
            }),
        }
    }

    fn trace_column(
        &self,
        table: Option<&str>,
        name: &str,
        scope: &[Source],
        ancestors: &[Vec<Source>],
    ) -> Trace {
        if let Some(qualifier) = table {
            if let Some(col) = find_qualified(scope, qualifier, name) {
                return Trace::direct(col.function.clone(), col.sources.clone());
            }
            for anc in ancestors.iter().rev() {
                if let Some(col) = find_qualified(anc, qualifier, name) {
                    return col_as_trace(col);
                }
            }
            return Trace::expr(None, Vec::new());
        }
        let matches: Vec<&ColumnInfo> = scope
            .iter()
            .flat_map(|s| s.columns.iter())
            .filter(|c| c.name.eq_ignore_ascii_case(name))
            .collect();
        if matches.len() == 1 {
            return col_as_trace(matches[0]);
        }
        if matches.is_empty() {
            for anc in ancestors.iter().rev() {
                let anc_matches: Vec<&ColumnInfo> = anc
                    .iter()
                    .flat_map(|s| s.columns.iter())
                    .filter(|c| c.name.eq_ignore_ascii_case(name))
                    .collect();
                if anc_matches.len() == 1 {
                    return col_as_trace(anc_matches[0]);
                }
            }
        }
        Trace::expr(None, Vec::new())
    }

    fn trace_expr(&mut self, expr: &Expr, scope: &[Source], ancestors: &[Vec<Source>]) -> Trace {
        match expr {
            Expr::Literal(_)
            | Expr::Default
            | Expr::Parameter(_)
            | Expr::Raw(_)
            | Expr::Star(_) => Trace::expr(None, Vec::new()),
            Expr::Column { table, name, .. } => self.trace_column(table.as_deref(), name, scope, ancestors),
            Expr::Binary { left, right, .. } => self.merge(&[left, right], scope, ancestors, None),
            Expr::Unary { operand, .. } => self.merge(&[operand], scope, ancestors, None),
            Expr::Paren(inner) => self.trace_expr(inner, scope, ancestors),
            Expr::Function(call) => {
                let mut parts: Vec<&Expr> = call.args.iter().collect();
                let order_exprs: Vec<&Expr> = call.order_by.iter().map(|o| &o.expr).collect();
                parts.extend(order_exprs.iter().copied());
                if let Some(f) = &call.filter {
                    parts.push(f);
                }
                let within_exprs: Vec<&Expr> = call.within_group.iter().map(|o| &o.expr).collect();
                parts.extend(within_exprs.iter().copied());
                self.merge(&parts, scope, ancestors, Some(call.name.to_uppercase()))
            }
            Expr::Case {
                operand,
                when_then,
                else_expr,
            } => {
                let mut parts: Vec<&Expr> = Vec::new();
                if let Some(o) = operand {
                    parts.push(o);
                }
                for (w, t) in when_then {
                    parts.push(w);
                    parts.push(t);
                }
                if let Some(e) = else_expr {
                    parts.push(e);
                }
                self.merge(&parts, scope, ancestors, Some("CASE".to_string()))
            }
            Expr::Cast { expr, .. } | Expr::TypeCast { expr, .. } => {
                self.merge(&[expr], scope, ancestors, Some("CAST".to_string()))
            }
            Expr::In { expr, list, .. } => match list {
                InList::Values(values) => {
                    let mut parts = vec![expr.as_ref()];
                    parts.extend(values.iter());
                    self.merge(&parts, scope, ancestors, None)
                }
                InList::Subquery(subquery) => {
                    let mut sources = self.trace_expr(expr, scope, ancestors).sources;
                    sources.extend(self.subquery_sources(subquery, scope, ancestors));
                    Trace::expr(Some("SUBQUERY".to_string()), sources)
                }
            },
            Expr::Between {
                expr, low, high, ..
            } => self.merge(&[expr, low, high], scope, ancestors, None),
            Expr::IsNull { expr, .. } | Expr::IsBool { expr, .. } => self.merge(&[expr], scope, ancestors, None),
            Expr::IsDistinctFrom { left, right, .. } => self.merge(&[left, right], scope, ancestors, None),
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
                let mut parts = vec![expr.as_ref(), pattern.as_ref()];
                if let Some(e) = escape {
                    parts.push(e);
                }
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::Glob { expr, pattern, .. } => self.merge(&[expr, pattern], scope, ancestors, None),
            Expr::Extract { expr, .. } => self.merge(&[expr], scope, ancestors, Some("EXTRACT".to_string())),
            Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
                Trace::expr(Some("SUBQUERY".to_string()), self.subquery_sources(subquery, scope, ancestors))
            }
            Expr::AnyAll { left, subquery, .. } => {
                let mut sources = self.trace_expr(left, scope, ancestors).sources;
                sources.extend(self.subquery_sources(subquery, scope, ancestors));
                Trace::expr(Some("SUBQUERY".to_string()), sources)
            }
            Expr::Interval { value, .. } => self.merge(&[value], scope, ancestors, None),
            Expr::Columns(inner) | Expr::Lambda { body: inner, .. } | Expr::Collate { expr: inner, .. } => {
                self.merge(&[inner], scope, ancestors, None)
            }
            Expr::Struct(fields) => {
                let parts: Vec<&Expr> = fields.iter().map(|(_, v)| v).collect();
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::ListLiteral(items) => {
                let parts: Vec<&Expr> = items.iter().collect();
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::Map(pairs) => {
                let mut parts = Vec::with_capacity(pairs.len() * 2);
                for (k, v) in pairs {
                    parts.push(k);
                    parts.push(v);
                }
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::Index { expr, index } => self.merge(&[expr, index], scope, ancestors, None),
            Expr::Slice { expr, start, stop } => {
                let mut parts = vec![expr.as_ref()];
                if let Some(s) = start {
                    parts.push(s);
                }
                if let Some(s) = stop {
                    parts.push(s);
                }
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::ListComprehension {
                iterable,
                body,
                condition,
                ..
            } => {
                let mut parts = vec![iterable.as_ref(), body.as_ref()];
                if let Some(c) = condition {
                    parts.push(c);
                }
                self.merge(&parts, scope, ancestors, None)
            }
            Expr::NamedArg { value, .. } => self.trace_expr(value, scope, ancestors),
            Expr::GroupingSets { sets, .. } => {
                let parts: Vec<&Expr> = sets.iter().flatten().collect();
                self.merge(&parts, scope, ancestors, None)
            }
        }
    }

    fn merge(
        &mut self,
        parts: &[&Expr],
        scope: &[Source],
        ancestors: &[Vec<Source>],
        function: Option<String>,
    ) -> Trace {
        let mut sources = Vec::new();
        for part in parts {
            sources.extend(self.trace_expr(part, scope, ancestors).sources);
        }
        Trace::expr(function, sources)
    }

    fn subquery_sources(
        &mut self,
        subquery: &SelectStatement,
        scope: &[Source],
        ancestors: &[Vec<Source>],
    ) -> Vec<ColumnOrigin> {
        let mut extended = ancestors.to_vec();
        extended.push(scope.to_vec());
        self.analyze_select_statement(subquery, &extended)
            .into_iter()
            .flat_map(|c| c.sources)
            .collect()
    }
}

fn col_as_trace(col: &ColumnInfo) -> Trace {
    Trace {
        transform: col.transform,
        function: col.function.clone(),
        sources: col.sources.clone(),
    }
}

fn find_qualified<'a>(scope: &'a [Source], qualifier: &str, name: &str) -> Option<&'a ColumnInfo> {
    scope
        .iter()
        .find(|s| s.alias.eq_ignore_ascii_case(qualifier))
        .and_then(|s| s.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
}

fn expr_columns(names: &[String]) -> Vec<ColumnInfo> {
    names
        .iter()
        .map(|n| ColumnInfo {
            name: n.clone(),
            transform: Transform::Expression,
            function: None,
            sources: Vec::new(),
        })
        .collect()
}

fn default_name(expr: &Expr) -> String {
    match expr {
        Expr::Column { name, .. } => name.clone(),
        Expr::Function(call) => call.name.to_lowercase(),
        _ => String::new(),
    }
}

fn expand_targets(core: &SelectCore, scope: &[Source]) -> Vec<(Option<String>, Expr)> {
    let mut out = Vec::new();
    for item in &core.columns {
        if let Expr::Star(star) = &item.expr {
            for (name, expr) in expand_star(star, scope) {
                out.push((Some(name), expr));
            }
        } else {
            out.push((item.alias.clone(), item.expr.clone()));
        }
    }
    out
}

fn expand_star(star: &StarExpr, scope: &[Source]) -> Vec<(String, Expr)> {
    let candidates: Vec<(String, String)> = if let Some(t) = &star.table {
        scope
            .iter()
            .filter(|s| s.alias.eq_ignore_ascii_case(t))
            .flat_map(|s| s.columns.iter().map(|c| (s.alias.clone(), c.name.clone())))
            .collect()
    } else {
        scope
            .iter()
            .flat_map(|s| s.columns.iter().map(|c| (s.alias.clone(), c.name.clone())))
            .collect()
    };

    let mut excluded: HashSet<String> = HashSet::new();
    let mut renames: HashMap<String, String> = HashMap::new();
    let mut replaces: HashMap<String, Expr> = HashMap::new();
    for modifier in &star.modifiers {
        match modifier {
            StarModifier::Exclude(cols) => {
                for c in cols {
                    excluded.insert(c.to_lowercase());
                }
            }
            StarModifier::Rename(pairs) => {
                for (orig, new) in pairs {
                    renames.insert(orig.to_lowercase(), new.clone());
                }
            }
            StarModifier::Replace(pairs) => {
                for (expr, orig) in pairs {
                    replaces.insert(orig.to_lowercase(), expr.clone());
                }
            }
        }
    }

    let mut out = Vec::new();
    for (alias, col) in candidates {
        let key = col.to_lowercase();
        if excluded.contains(&key) {
            continue;
        }
        let output_name = renames.get(&key).cloned().unwrap_or_else(|| col.clone());
        let expr = replaces.get(&key).cloned().unwrap_or_else(|| {
            if star.table.is_some() {
                Expr::qualified_column(alias.clone(), col.clone())
            } else {
                Expr::column(col.clone())
            }
        });
        out.push((output_name, expr));
    }
    out
}

fn dedup_sources(sources: Vec<ColumnOrigin>) -> Vec<ColumnOrigin> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut out = Vec::new();
    for s in sources {
        let key = (
            s.schema.as_deref().unwrap_or_default().to_lowercase(),
            s.table.to_lowercase(),
            s.column.to_lowercase(),
        );
        if seen.insert(key) {
            out.push(s);
        }
    }
    out
}

/// Traces each output column of `stmt` back to the base-table columns it was
/// computed from. `schema_info` maps known table names (optionally
/// `schema.table`) to their column lists; tables absent from it contribute
/// no columns to the scope they're used in, so any column reference against
/// them resolves as an untraceable expression rather than erroring.
///
/// Non-`SELECT` statements yield no lineage.
#[must_use]
pub fn analyze_column_lineage(
    stmt: &crate::ast::Statement,
    schema_info: &HashMap<String, Vec<String>>,
) -> Vec<ColumnLineage> {
    let crate::ast::Statement::Select(select) = stmt else {
        return Vec::new();
    };
    let mut analyzer = Analyzer::new(schema_info);
    analyzer
        .analyze_select_statement(select, &[])
        .into_iter()
        .enumerate()
        .map(|(index, col)| ColumnLineage {
            name: col.name,
            index,
            transform: col.transform,
            function: col.function,
            sources: dedup_sources(col.sources),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> crate::ast::Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    fn schema(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.iter().map(|s| (*s).to_string()).collect()))
            .collect()
    }

    #[test]
    fn star_expands_over_schema() {
        let stmt = parse("SELECT * FROM t");
        let schema_info = schema(&[("t", &["a", "b", "c"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage.len(), 3);
        assert_eq!(lineage[0].name, "a");
        assert_eq!(lineage[0].transform, Transform::Direct);
        assert_eq!(
            lineage[0].sources,
            vec![ColumnOrigin {
                schema: None,
                table: "t".to_string(),
                column: "a".to_string()
            }]
        );
    }

    #[test]
    fn cte_chain_renames_column() {
        let stmt = parse(
            "WITH c1 AS (SELECT a AS y FROM t), c2 AS (SELECT y FROM c1) SELECT y FROM c2",
        );
        let schema_info = schema(&[("t", &["a"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage[0].name, "y");
        assert_eq!(
            lineage[0].sources,
            vec![ColumnOrigin {
                schema: None,
                table: "t".to_string(),
                column: "a".to_string()
            }]
        );
    }

    #[test]
    fn cte_scope_does_not_leak_into_sibling_from_items() {
        let stmt = parse("SELECT * FROM (WITH c AS (SELECT a FROM t) SELECT * FROM c) x, c");
        let schema_info = schema(&[("t", &["a"]), ("c", &["real_col"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        let names: Vec<&str> = lineage.iter().map(|col| col.name.as_str()).collect();
        assert!(names.contains(&"real_col"), "real table `c` should not be shadowed by the inner CTE: {names:?}");
        assert_eq!(names.iter().filter(|n| **n == "a").count(), 1);
    }

    #[test]
    fn in_subquery_unions_sources() {
        let stmt = parse("SELECT a IN (SELECT x FROM s) AS flag FROM t");
        let schema_info = schema(&[("t", &["a"]), ("s", &["x"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage[0].name, "flag");
        assert_eq!(lineage[0].function.as_deref(), Some("SUBQUERY"));
        let mut sources = lineage[0].sources.clone();
        sources.sort_by(|a, b| a.table.cmp(&b.table));
        assert_eq!(
            sources,
            vec![
                ColumnOrigin {
                    schema: None,
                    table: "s".to_string(),
                    column: "x".to_string()
                },
                ColumnOrigin {
                    schema: None,
                    table: "t".to_string(),
                    column: "a".to_string()
                },
            ]
        );
    }

    #[test]
    fn self_reference_deduplicates_sources() {
        let stmt = parse("SELECT a + a AS d FROM t");
        let schema_info = schema(&[("t", &["a"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage[0].sources.len(), 1);
        assert_eq!(lineage[0].transform, Transform::Expression);
    }

    #[test]
    fn non_select_statement_has_no_lineage() {
        let stmt = parse("DELETE FROM t WHERE a = 1");
        assert!(analyze_column_lineage(&stmt, &HashMap::new()).is_empty());
    }

    #[test]
    fn unaliased_function_call_gets_lowercased_name() {
        let stmt = parse("SELECT UPPER(a) FROM t");
        let schema_info = schema(&[("t", &["a"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage[0].name, "upper");
    }

    #[test]
    fn unaliased_opaque_expression_gets_an_empty_name() {
        let stmt = parse("SELECT 1 + 1 FROM t");
        let schema_info = schema(&[("t", &["a"])]);
        let lineage = analyze_column_lineage(&stmt, &schema_info);
        assert_eq!(lineage[0].name, "");
    }
}

