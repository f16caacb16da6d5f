//! Statement AST types: `SELECT`/`INSERT`/`UPDATE`/`DELETE` trees, table
//! references and joins, and the verbatim-captured `Ddl`/`Utility` forms.

use super::expression::{Expr, NamedWindow, OrderByItem};

/// `CUBE`/`ROLLUP`/`GROUPING SETS` share the group-by clause with plain
/// expression lists; the grouping constructs themselves are expressions
/// (`Expr::GroupingSets`) that appear inside this list.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupByClause {
    /// No `GROUP BY`.
    None,
    /// `GROUP BY ALL`.
    All,
    /// `GROUP BY expr, expr, ...` (individual entries may themselves be
    /// `Expr::GroupingSets`).
    Exprs(Vec<Expr>),
}

/// `ORDER BY` at the statement level, including DuckDB's `ORDER BY ALL`.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderByClause {
    None,
    All { direction: super::expression::OrderDirection },
    Items(Vec<OrderByItem>),
}

/// `LIMIT` / `FETCH FIRST ... ROWS [ONLY|WITH TIES]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitClause {
    pub count: Expr,
    pub percent: bool,
    pub with_ties: bool,
}

/// `USING SAMPLE n [PERCENT] [(method)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleClause {
    pub size: Expr,
    pub percent: bool,
    pub method: Option<String>,
}

/// One target-list entry of a `SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }
}

/// The non-set-operation heart of a `SELECT`: everything between `SELECT`
/// and the next `UNION`/`INTERSECT`/`EXCEPT` (or end of statement).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCore {
    pub distinct: bool,
    /// `SELECT DISTINCT ON (expr, ...)`.
    pub distinct_on: Vec<Expr>,
    pub columns: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: GroupByClause,
    pub having: Option<Expr>,
    pub qualify: Option<Expr>,
    pub windows: Vec<NamedWindow>,
}

impl SelectCore {
    #[must_use]
    pub fn new(columns: Vec<SelectItem>) -> Self {
        Self {
            distinct: false,
            distinct_on: Vec::new(),
            columns,
            from: None,
            where_clause: None,
            group_by: GroupByClause::None,
            having: None,
            qualify: None,
            windows: Vec::new(),
        }
    }
}

/// `UNION` / `INTERSECT` / `EXCEPT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// The body of a `SELECT` statement: either a single core, a bare `VALUES`
/// list, or a left-associative tree of set operations over either.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectBody {
    Core(Box<SelectCore>),
    Values(Vec<Vec<Expr>>),
    SetOp {
        left: Box<SelectBody>,
        op: SetOperator,
        all: bool,
        by_name: bool,
        right: Box<SelectBody>,
    },
}

/// One `WITH` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Vec<String>,
    /// `Some(true)`/`Some(false)` if `MATERIALIZED`/`NOT MATERIALIZED` was
    /// explicit; `None` if unspecified.
    pub materialized: Option<bool>,
    pub query: Box<SelectStatement>,
}

/// A `WITH [RECURSIVE] cte, ...` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// A full `SELECT` statement, including any `WITH` prefix, the
/// set-operation body, and the outer `ORDER BY`/`LIMIT`/`OFFSET`/`FETCH`/
/// `SAMPLE` clauses that bind to the statement as a whole rather than to any
/// one core.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub with: Option<With>,
    pub body: SelectBody,
    pub order_by: OrderByClause,
    pub limit: Option<LimitClause>,
    pub offset: Option<Expr>,
    pub sample: Option<SampleClause>,
}

impl SelectStatement {
    #[must_use]
    pub fn simple(core: SelectCore) -> Self {
        Self {
            with: None,
            body: SelectBody::Core(Box::new(core)),
            order_by: OrderByClause::None,
            limit: None,
            offset: None,
            sample: None,
        }
    }
}

/// `t`, `schema.t`, `catalog.schema.t`, with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableAlias {
    pub name: String,
    pub columns: Vec<String>,
}

/// Aggregate expression paired with its optional output alias inside a
/// `PIVOT` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotAggregate {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// The `IN (...)` list of a `PIVOT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum PivotValues {
    Star,
    List(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub source: Box<TableRef>,
    pub aggregates: Vec<PivotAggregate>,
    pub for_column: String,
    pub values: PivotValues,
    pub group_by: Vec<Expr>,
    pub alias: Option<TableAlias>,
}

/// A parenthesised `(c1, c2) AS 'label'` group inside `UNPIVOT ... INTO`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnpivotGroup {
    pub columns: Vec<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnpivotTable {
    pub source: Box<TableRef>,
    pub value_columns: Vec<String>,
    pub name_column: String,
    pub groups: Vec<UnpivotGroup>,
    pub include_nulls: bool,
    pub alias: Option<TableAlias>,
}

/// A single item that can appear in a `FROM` clause before any joins are
/// applied to it.
#[derive(Debug, Clone, PartialEq)]
pub enum TableFactor {
    Table {
        catalog: Option<String>,
        schema: Option<String>,
        name: String,
        alias: Option<TableAlias>,
    },
    Derived {
        query: Box<SelectStatement>,
        lateral: bool,
        alias: Option<TableAlias>,
    },
    /// A bare string literal used as a table source, e.g.
    /// `FROM 'data.parquet'`.
    StringSource {
        path: String,
        alias: Option<TableAlias>,
    },
    Function {
        call: Box<Expr>,
        lateral: bool,
        with_ordinality: bool,
        alias: Option<TableAlias>,
    },
    Pivot(Box<PivotTable>),
    Unpivot(Box<UnpivotTable>),
}

/// A join or comma-join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOperator {
    /// Comma-separated `FROM a, b`.
    Comma,
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Semi,
    Anti,
    LeftSemi,
    LeftAnti,
    RightSemi,
    RightAnti,
    Asof,
    AsofLeft,
    AsofRight,
    Positional,
}

/// The join predicate: `ON expr`, `USING (cols)`, or neither.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    On(Box<Expr>),
    Using(Vec<String>),
    None,
}

/// A `FROM` clause, modeled as a possibly-empty tree of joins over table
/// factors (a bare table is `TableRef::Factor` with no joins).
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    Factor {
        factor: TableFactor,
        sample: Option<SampleClause>,
    },
    Join {
        left: Box<TableRef>,
        op: JoinOperator,
        natural: bool,
        right: Box<TableRef>,
        constraint: JoinConstraint,
    },
}

/// `schema.table` / `catalog.schema.table` target of an `INSERT`/`UPDATE`/
/// `DELETE`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableName {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

impl TableName {
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
            alias: None,
        }
    }
}

/// `INSERT OR REPLACE` / `INSERT OR IGNORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrAction {
    Replace,
    Ignore,
}

/// The data source of an `INSERT`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Query(Box<SelectStatement>),
    DefaultValues,
}

/// `col = expr` inside `SET` or `DO UPDATE SET`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

/// The action of an `ON CONFLICT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum OnConflictAction {
    DoNothing,
    DoUpdate {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub target_columns: Vec<String>,
    pub action: OnConflictAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub target: TableName,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub or_action: Option<OrAction>,
    pub by_name: bool,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<SelectItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub target: TableName,
    pub assignments: Vec<Assignment>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub target: TableName,
    pub using: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectItem>,
}

/// A `CREATE`/`ALTER`/`DROP`/`TRUNCATE` statement, captured verbatim. Its
/// `kind` is only ever used for reporting/logging — the SQL text is never
/// re-parsed into a column model.
#[derive(Debug, Clone, PartialEq)]
pub struct Ddl {
    pub kind: String,
    pub sql: String,
}

/// Everything else DuckDB accepts at the top level (`COPY`, `PRAGMA`,
/// `CALL`, `EXPLAIN`, transaction control, ...), captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    pub kind: String,
    pub sql: String,
}

/// A single parsed SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Box<SelectStatement>),
    Insert(Box<InsertStatement>),
    Update(Box<UpdateStatement>),
    Delete(Box<DeleteStatement>),
    Ddl(Ddl),
    Utility(Utility),
}

impl Statement {
    /// The target table of statements that have exactly one (`INSERT`,
    /// `UPDATE`, `DELETE`); `None` for `SELECT` and verbatim statements.
    #[must_use]
    pub fn target_table(&self) -> Option<&TableName> {
        match self {
            Self::Insert(i) => Some(&i.target),
            Self::Update(u) => Some(&u.target),
            Self::Delete(d) => Some(&d.target),
            Self::Select(_) | Self::Ddl(_) | Self::Utility(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Literal;

    #[test]
    fn select_core_defaults_have_no_clauses() {
        let core = SelectCore::new(vec![SelectItem::new(Expr::Literal(Literal::Number(
            "1".to_string(),
        )))]);
        assert!(core.from.is_none());
        assert!(core.where_clause.is_none());
        assert_eq!(core.group_by, GroupByClause::None);
    }

    #[test]
    fn target_table_only_for_dml() {
        let select = Statement::Select(Box::new(SelectStatement::simple(SelectCore::new(
            vec![],
        ))));
        assert!(select.target_table().is_none());

        let delete = Statement::Delete(Box::new(DeleteStatement {
            target: TableName::simple("users"),
            using: None,
            where_clause: None,
            returning: vec![],
        }));
        assert_eq!(delete.target_table().unwrap().name, "users");
    }
}
