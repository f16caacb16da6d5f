//! Type names, as they appear in `CAST`/`::` and `COLLATE`.
//!
//! DDL statements (`CREATE TABLE`, ...) are captured verbatim (see
//! [`crate::ast::Ddl`]) rather than parsed into a column/type model, so this
//! module only needs to represent type references that appear inside
//! expressions.

use core::fmt;

/// A type name as written in source, e.g. `INTEGER`, `DECIMAL(10, 2)`,
/// `VARCHAR[]`, `TIMESTAMP WITH TIME ZONE`.
///
/// The parameter list inside parens is kept as opaque text rather than
/// parsed into typed fields — DuckDB's type grammar is large and
/// fast-moving, and nothing downstream of parsing needs to interpret a
/// `DECIMAL`'s precision/scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// The base type name, normalised to uppercase (e.g. `"DOUBLE PRECISION"`,
    /// `"TIMESTAMP WITH TIME ZONE"`).
    pub name: String,
    /// Raw text between the parens, if any, e.g. `"10, 2"`.
    pub params: Option<String>,
    /// Number of trailing `[]` array suffixes.
    pub array_dims: u32,
}

impl DataType {
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
            array_dims: 0,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(params) = &self.params {
            write!(f, "({params})")?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_params_and_array_dims() {
        let ty = DataType {
            name: "DECIMAL".to_string(),
            params: Some("10, 2".to_string()),
            array_dims: 1,
        };
        assert_eq!(ty.to_string(), "DECIMAL(10, 2)[]");
    }

    #[test]
    fn simple_has_no_params() {
        assert_eq!(DataType::simple("INTEGER").to_string(), "INTEGER");
    }
}
