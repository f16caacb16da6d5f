//! The JSON shape of an `apply-rls --rules` file: a mix of raw SQL filters
//! and structured `column <op> value` rules, both scoped to a table.

use std::collections::HashMap;

use duckshield_sql_core::{RlsRule, RuleValue};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Raw {
        table: String,
        filter: String,
    },
    Rule {
        table: String,
        column: String,
        operator: String,
        value: Value,
    },
}

fn json_to_rule_value(value: &Value) -> RuleValue {
    match value {
        Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().map_or_else(|| RuleValue::Other(n.to_string()), RuleValue::Float),
            RuleValue::Int,
        ),
        Value::String(s) => RuleValue::Text(s.clone()),
        Value::Bool(b) => RuleValue::Bool(*b),
        other => RuleValue::Other(other.to_string()),
    }
}

/// Splits a parsed rule file into structured rules (fed to
/// `rewrite_query`) and raw per-table filters (fed to
/// `inject_multiple_row_filters`).
pub fn partition_rules(entries: Vec<RuleEntry>) -> (Vec<RlsRule>, HashMap<String, Vec<String>>) {
    let mut rules = Vec::new();
    let mut raw: HashMap<String, Vec<String>> = HashMap::new();
    for entry in entries {
        match entry {
            RuleEntry::Rule {
                table,
                column,
                operator,
                value,
            } => rules.push(RlsRule {
                table,
                column,
                operator,
                value: json_to_rule_value(&value),
            }),
            RuleEntry::Raw { table, filter } => raw.entry(table).or_default().push(filter),
        }
    }
    (rules, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_raw_and_structured_entries() {
        let json = r#"[
            {"table": "orders", "filter": "tenant_id = 1"},
            {"table": "orders", "column": "region", "operator": "eq", "value": "eu"}
        ]"#;
        let entries: Vec<RuleEntry> = serde_json::from_str(json).unwrap();
        let (rules, raw) = partition_rules(entries);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].column, "region");
        assert_eq!(raw.get("orders").unwrap(), &vec!["tenant_id = 1".to_string()]);
    }

    #[test]
    fn malformed_rule_file_is_a_json_error() {
        let err = serde_json::from_str::<Vec<RuleEntry>>("not json").unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn numeric_values_become_int_or_float() {
        assert_eq!(json_to_rule_value(&Value::from(7)), RuleValue::Int(7));
        assert_eq!(json_to_rule_value(&Value::from(1.5)), RuleValue::Float(1.5));
    }
}
