//! The gateway's error type: I/O and config-parsing failures layered over
//! the core's own [`duckshield_sql_core::CoreError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing rule/mask config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] duckshield_sql_core::CoreError),
}
