//! Thin CLI gateway: glues stdin/file input to `duckshield-sql-core`'s
//! façade. Owns no parsing or rewriting logic of its own.

mod error;
mod rules;

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

use error::GatewayError;
use rules::RuleEntry;

#[derive(Parser, Debug)]
#[command(name = "duckshield-gateway", version, about)]
struct Cli {
    /// Unused by this façade-only gateway; carried for parity with the
    /// platform's usual `--database`/`DATABASE_URL` connection convention.
    #[arg(long, env = "DUCKSHIELD_DATABASE", global = true)]
    database: Option<String>,

    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a statement, rejecting it if it calls a blocklisted function.
    Classify {
        #[arg(long)]
        sql: Option<String>,
    },
    /// Print the deduplicated table names a statement references.
    Tables {
        #[arg(long)]
        sql: Option<String>,
    },
    /// Parse a statement and re-emit it in canonical form.
    Format {
        #[arg(long)]
        sql: Option<String>,
    },
    /// Inject row-level-security filters described by a JSON rules file.
    ApplyRls {
        #[arg(long)]
        sql: Option<String>,
        #[arg(long, required = true)]
        rules: PathBuf,
    },
    /// Replace masked columns of one table per a JSON masks file.
    Mask {
        #[arg(long)]
        sql: Option<String>,
        #[arg(long, required = true)]
        masks: PathBuf,
        #[arg(long)]
        table: String,
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(database) = &cli.database {
        tracing::debug!(database = database.as_str(), "database flag set (unused)");
    }
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<String, GatewayError> {
    match command {
        Commands::Classify { sql } => {
            let sql = read_sql(sql)?;
            let stmt = duckshield_sql_core::parse(&sql)?;
            let kind = duckshield_sql_core::classify(&stmt)?;
            Ok(format!("{kind:?}"))
        }
        Commands::Tables { sql } => {
            let sql = read_sql(sql)?;
            let stmt = duckshield_sql_core::parse(&sql)?;
            Ok(duckshield_sql_core::extract_table_names(&stmt).join("\n"))
        }
        Commands::Format { sql } => {
            let sql = read_sql(sql)?;
            let stmt = duckshield_sql_core::parse(&sql)?;
            Ok(duckshield_sql_core::format(&stmt))
        }
        Commands::ApplyRls { sql, rules } => {
            let sql = read_sql(sql)?;
            let contents = std::fs::read_to_string(&rules)?;
            let entries: Vec<RuleEntry> = serde_json::from_str(&contents)?;
            let (structured, raw) = rules::partition_rules(entries);
            let mut current = sql;
            if !structured.is_empty() {
                current = duckshield_sql_core::rewrite_query(&current, &structured)?;
            }
            for (table, filters) in &raw {
                current = duckshield_sql_core::inject_multiple_row_filters(&current, table, filters)?;
            }
            Ok(current)
        }
        Commands::Mask {
            sql,
            masks,
            table,
            columns,
        } => {
            let sql = read_sql(sql)?;
            let contents = std::fs::read_to_string(&masks)?;
            let masks: HashMap<String, String> = serde_json::from_str(&contents)?;
            Ok(duckshield_sql_core::apply_column_masks(&sql, &table, &masks, &columns)?)
        }
    }
}

fn read_sql(explicit: Option<String>) -> io::Result<String> {
    match explicit {
        Some(sql) => Ok(sql),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_rls_requires_rules_flag() {
        let err = Cli::try_parse_from(["duckshield-gateway", "apply-rls"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn mask_requires_masks_flag() {
        let err =
            Cli::try_parse_from(["duckshield-gateway", "mask", "--table", "t"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn classify_accepts_inline_sql() {
        let cli = Cli::try_parse_from(["duckshield-gateway", "classify", "--sql", "SELECT 1"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { sql: Some(_) }));
    }

    #[test]
    fn rule_file_read_error_is_a_gateway_error() {
        let err = run(Commands::ApplyRls {
            sql: Some("SELECT 1".to_string()),
            rules: PathBuf::from("/nonexistent/rules.json"),
        })
        .unwrap_err();
        assert!(matches!(err, GatewayError::Io(_)));
    }
}
