//! Recursive-descent parser with a Pratt expression core, covering the
//! DuckDB SQL dialect this crate targets.
//!
//! # Parsing approach
//!
//! `SELECT`/`INSERT`/`UPDATE`/`DELETE` are parsed by dedicated
//! recursive-descent methods; everything else (`CREATE`, `ALTER`, `DROP`,
//! `TRUNCATE`, and utility commands like `COPY`/`PRAGMA`/`CALL`) is
//! recognised by its leading keyword and captured verbatim rather than
//! parsed into a structural model — see [`crate::ast::Ddl`] and
//! [`crate::ast::Utility`]. Expressions use a Pratt (top-down operator
//! precedence) parser; its binding-power tables live in [`pratt`].
//!
//! # SELECT
//!
//! `WITH [RECURSIVE]` CTEs (with optional column lists and
//! `[NOT] MATERIALIZED`), `UNION`/`INTERSECT`/`EXCEPT [ALL] [BY NAME]` set
//! operations over cores or `VALUES` lists, `SELECT [ALL|DISTINCT [ON (...)]]`
//! target lists (star with `EXCLUDE`/`REPLACE`/`RENAME`, friendly `name:
//! expr` aliases), `FROM` with the full join grammar (`NATURAL`, `LEFT
//! /RIGHT/FULL [OUTER]`, `CROSS`, `[LEFT|RIGHT] SEMI/ANTI`, `ASOF [LEFT
//! |RIGHT]`, `POSITIONAL`, `LATERAL`, derived tables, table functions with
//! `WITH ORDINALITY`, string-literal sources, `PIVOT`/`UNPIVOT`,
//! `TABLESAMPLE`/`USING SAMPLE`), `WHERE`, `GROUP BY [ALL | CUBE | ROLLUP |
//! GROUPING SETS]`, `HAVING`, `QUALIFY`, named `WINDOW` clauses, outer
//! `ORDER BY [ALL]`, `LIMIT [PERCENT]` / `FETCH FIRST|NEXT ... ROWS
//! [ONLY|WITH TIES]`, `OFFSET`.
//!
//! # Expressions
//!
//! Literals (numbers kept verbatim, strings, booleans, `NULL`), column
//! references (qualified and unqualified, quoted), all arithmetic/bitwise/
//! comparison/logical operators with DuckDB's precedence (including
//! right-associative `^`), `IS [NOT] NULL/TRUE/FALSE/DISTINCT FROM`,
//! `[NOT] IN`/`BETWEEN`/`LIKE`/`ILIKE`/`GLOB`/`SIMILAR TO`, `expr op
//! ANY|ALL|SOME (subquery)`, `CASE`, `CAST`/`TRY_CAST`/`::`, `EXTRACT`,
//! `INTERVAL`, `EXISTS`, scalar and correlated subqueries, function calls
//! (`DISTINCT`, `FILTER (WHERE ...)`, `WITHIN GROUP`, named args `name :=
//! expr`, `OVER` windows), list/struct/map literals, list comprehensions,
//! lambdas (`x -> expr`, `(a, b) -> expr`), `COLUMNS(pattern)`, indexing and
//! slicing, `COLLATE`, positional (`?`) and dollar (`$1`, `$name`)
//! parameters.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
