//! Grammar check delegated to the expression engine

use crate::engine::ExpressionEngine;
use exprguard_common::{Error, Result};
use tracing::debug;

/// Parse `expression` with `engine` without executing it
///
/// # Errors
/// * `InvalidSyntax` wrapping the engine's parse message
pub fn validate_syntax<E: ExpressionEngine>(engine: &E, expression: &str) -> Result<()> {
    engine.parse(expression).map(|_| ()).map_err(|e| {
        debug!("Engine rejected expression '{}': {}", expression, e);
        Error::invalid_syntax(format!("Invalid expression syntax: {e}"))
    })
}
