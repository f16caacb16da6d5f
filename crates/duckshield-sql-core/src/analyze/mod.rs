//! Analysis and rewrite passes over the statement tree: table inventory,
//! the dangerous-function/statement-kind gate, row-filter injection, column
//! masking, and column-lineage tracing.

mod classify;
mod inject;
mod lineage;
mod mask;
mod tables;
mod walk;

pub use classify::{classify, contains_dangerous_function, StmtKind, DEFAULT_DANGEROUS_FUNCTIONS};
pub use inject::inject_filter;
pub use lineage::{analyze_column_lineage, ColumnLineage, ColumnOrigin, Transform};
pub use mask::apply_column_masks;
pub use tables::{collect_table_names, extract_target_table};
