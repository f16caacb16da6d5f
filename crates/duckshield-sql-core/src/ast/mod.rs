//! Abstract syntax tree for the DuckDB SQL dialect this crate parses.
//!
//! The tree is a plain tagged union, not a visitor/trait-object hierarchy:
//! every pass in [`crate::format`] and [`crate::analyze`] works by matching
//! exhaustively on these enums.

mod expression;
mod statement;
mod types;

pub use expression::{
    AnyAllKind, BinaryOp, Expr, FrameBound, FrameUnit, FunctionCall, GroupingKind, InList,
    Literal, NamedWindow, NullOrdering, OrderByItem, OrderDirection, Parameter, StarExpr,
    StarModifier, UnaryOp, WindowDef, WindowFrame, WindowSpec,
};
pub use statement::{
    Assignment, Cte, DeleteStatement, Ddl, GroupByClause, InsertSource, InsertStatement,
    JoinConstraint, JoinOperator, LimitClause, OnConflict, OnConflictAction, OrAction,
    OrderByClause, PivotAggregate, PivotTable, PivotValues, SampleClause, SelectBody, SelectCore,
    SelectItem, SelectStatement, SetOperator, Statement, TableAlias, TableFactor, TableName,
    TableRef, UnpivotGroup, UnpivotTable, UpdateStatement, Utility, With,
};
pub use types::DataType;
