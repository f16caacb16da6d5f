//! Expression AST types.
//!
//! Every node here is reachable from a parsed [`crate::ast::Statement`] and
//! carries enough information for [`crate::format::format_expr`] to produce
//! re-parseable SQL.

use super::{DataType, SelectStatement};

/// A literal value. Numbers keep their original textual form so that
/// round-tripping never loses precision — a 64-bit literal typed by hand is
/// not coerced through a narrower numeric path.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer or floating-point literal, stored exactly as written
    /// (including any decimal point, exponent, or digit grouping).
    Number(String),
    /// String literal, already unescaped (`''` collapsed to `'`).
    String(String),
    /// `TRUE` / `FALSE`.
    Boolean(bool),
    /// `NULL`.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Canonical SQL spelling of the operator (post `!=`/`==` normalisation).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "//",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// True for the six comparison operators the RLS rule builder accepts.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// `ASC`/`DESC` for `ORDER BY` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// `NULLS FIRST`/`NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

/// A single `ORDER BY` entry, reused for the top-level clause, aggregate
/// `ORDER BY`, and `WITHIN GROUP (ORDER BY ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: OrderDirection,
    pub nulls: Option<NullOrdering>,
}

/// `ANY` / `ALL` / `SOME` subquery quantifier (see `Expr::AnyAll`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyAllKind {
    Any,
    All,
    Some,
}

/// `CUBE` / `ROLLUP` / `GROUPING SETS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingKind {
    Cube,
    Rollup,
    GroupingSets,
}

/// Frame unit for a window's `ROWS`/`RANGE`/`GROUPS` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

/// One endpoint of a window frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(Box<Expr>),
    CurrentRow,
    Following(Box<Expr>),
    UnboundedFollowing,
}

/// A window frame clause, e.g. `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    pub units: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

/// The body of a window spec, shared by inline `OVER (...)` and named
/// `WINDOW name AS (...)` definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowDef {
    pub base_window: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub frame: Option<WindowFrame>,
}

/// A window spec attached to a function call via `OVER`.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSpec {
    /// A bare reference to a name declared in the statement's `WINDOW` clause.
    Named(String),
    /// An inline definition, e.g. `OVER (PARTITION BY a ORDER BY b)`.
    Inline(WindowDef),
}

/// A named entry of a `WINDOW name AS (...)` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedWindow {
    pub name: String,
    pub def: WindowDef,
}

/// A function call. Covers plain scalar calls, aggregates (`DISTINCT`,
/// `FILTER`, inner `ORDER BY`), and window functions (`OVER`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub schema: Option<String>,
    pub name: String,
    pub distinct: bool,
    /// `COUNT(*)` — args is empty and this is set instead.
    pub star: bool,
    pub args: Vec<Expr>,
    /// `ORDER BY` inside the call, e.g. `STRING_AGG(x, ',' ORDER BY y)`.
    pub order_by: Vec<OrderByItem>,
    /// `FILTER (WHERE ...)`.
    pub filter: Option<Box<Expr>>,
    /// `WITHIN GROUP (ORDER BY ...)` — parsed leniently, round-tripped only.
    pub within_group: Vec<OrderByItem>,
    pub window: Option<WindowSpec>,
}

impl FunctionCall {
    #[must_use]
    pub fn simple(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            distinct: false,
            star: false,
            args,
            order_by: Vec::new(),
            filter: None,
            within_group: Vec::new(),
            window: None,
        }
    }
}

/// A single modifier following a star expression.
#[derive(Debug, Clone, PartialEq)]
pub enum StarModifier {
    Exclude(Vec<String>),
    Replace(Vec<(Expr, String)>),
    Rename(Vec<(String, String)>),
}

/// `*`, `t.*`, or either with trailing `EXCLUDE`/`REPLACE`/`RENAME`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarExpr {
    pub table: Option<String>,
    pub modifiers: Vec<StarModifier>,
}

/// An entry of `IN (...)` when given as a value list rather than a subquery.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    Values(Vec<Expr>),
    Subquery(Box<SelectStatement>),
}

/// A `?`, `$1`, or `$name` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// `?`, numbered by its 1-based occurrence in the statement.
    Positional(usize),
    /// `$1` — a dollar-numbered placeholder.
    Numbered(u32),
    /// `$name` — a dollar-named placeholder.
    Named(String),
}

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A column reference, optionally qualified with a table/alias.
    Column {
        table: Option<String>,
        name: String,
        /// Whether the column name was written as a double-quoted identifier.
        quoted: bool,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
    Function(Box<FunctionCall>),
    Case {
        operand: Option<Box<Expr>>,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
        try_cast: bool,
    },
    /// DuckDB postfix `expr::TYPE`.
    TypeCast {
        expr: Box<Expr>,
        data_type: DataType,
    },
    In {
        expr: Box<Expr>,
        list: InList,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    IsBool {
        expr: Box<Expr>,
        value: bool,
        negated: bool,
    },
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        case_insensitive: bool,
        negated: bool,
    },
    Glob {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        negated: bool,
    },
    SimilarTo {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
    },
    Extract {
        field: String,
        expr: Box<Expr>,
    },
    Exists {
        subquery: Box<SelectStatement>,
        negated: bool,
    },
    Subquery(Box<SelectStatement>),
    /// `expr op ANY|ALL|SOME (subquery)`.
    AnyAll {
        left: Box<Expr>,
        op: BinaryOp,
        quantifier: AnyAllKind,
        subquery: Box<SelectStatement>,
    },
    Star(StarExpr),
    Interval {
        value: Box<Expr>,
        unit: Option<String>,
    },
    /// `COLUMNS(pattern)` / `COLUMNS(*)`.
    Columns(Box<Expr>),
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    /// `{'key': value, ...}` — ordered, keys preserved verbatim.
    Struct(Vec<(String, Expr)>),
    ListLiteral(Vec<Expr>),
    /// `MAP {key: value, ...}`.
    Map(Vec<(Expr, Expr)>),
    Index {
        expr: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        expr: Box<Expr>,
        start: Option<Box<Expr>>,
        stop: Option<Box<Expr>>,
    },
    /// `[body FOR var IN iterable (IF condition)?]`.
    ListComprehension {
        var: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
        condition: Option<Box<Expr>>,
    },
    /// `name := expr` (named argument in a function call).
    NamedArg {
        name: String,
        value: Box<Expr>,
    },
    GroupingSets {
        kind: GroupingKind,
        sets: Vec<Vec<Expr>>,
    },
    Parameter(Parameter),
    Default,
    Collate {
        expr: Box<Expr>,
        collation: String,
    },
    /// Escape hatch for fragments the parser cannot represent structurally.
    /// Defined for forward compatibility; never produced by this parser.
    Raw(String),
}

impl Expr {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
            quoted: false,
        }
    }

    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            table: Some(table.into()),
            name: name.into(),
            quoted: false,
        }
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    #[must_use]
    pub fn number(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(value.into()))
    }

    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Returns the bare column name if this expression is an unqualified
    /// column reference — used by the masking pass to decide whether a
    /// target-list item is "just a column".
    #[must_use]
    pub fn as_bare_column(&self) -> Option<&str> {
        match self {
            Self::Column { table: None, name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_op_canonicalises_not_eq() {
        assert_eq!(BinaryOp::NotEq.as_str(), "<>");
    }

    #[test]
    fn comparison_ops_recognised() {
        assert!(BinaryOp::Eq.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
    }

    #[test]
    fn expr_builders_chain() {
        let expr = Expr::column("age")
            .binary(BinaryOp::Gt, Expr::number("18"))
            .and(Expr::qualified_column("t", "active").binary(BinaryOp::Eq, Expr::boolean(true)));
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn as_bare_column_rejects_qualified() {
        assert_eq!(Expr::column("x").as_bare_column(), Some("x"));
        assert_eq!(Expr::qualified_column("t", "x").as_bare_column(), None);
    }
}
