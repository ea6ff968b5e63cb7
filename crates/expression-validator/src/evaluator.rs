//! Expression evaluation against variable bindings

use crate::engine::{CelEngine, ExpressionEngine};
use exprguard_common::{Bindings, Error, Result, VariableValue};
use tracing::{error, info};

/// Evaluates stored expressions to a boolean
#[derive(Debug, Clone, Default)]
pub struct Evaluator<E = CelEngine> {
    engine: E,
}

impl Evaluator<CelEngine> {
    pub fn new() -> Self {
        Self::with_engine(CelEngine)
    }
}

impl<E: ExpressionEngine> Evaluator<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Evaluate `expression` with `bindings`
    ///
    /// Every variable the expression references must be bound; there are no
    /// defaults.
    ///
    /// # Errors
    /// * `InvalidArgument` if `bindings` is empty
    /// * `Internal` if the engine cannot parse `expression`
    /// * `Evaluation` for any failure while executing, including a
    ///   non-boolean result
    pub fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<bool> {
        if bindings.is_empty() {
            return Err(Error::invalid_argument("Variables cannot be null or empty"));
        }

        let program = self
            .engine
            .parse(expression)
            .map_err(|e| Error::Internal(format!("Stored expression failed to parse: {e}")))?;

        let outcome = self
            .engine
            .execute(&program, bindings)
            .map_err(|e| e.to_string())
            .and_then(|value| match value {
                VariableValue::Boolean(b) => Ok(b),
                other => Err(format!(
                    "Expression did not return a boolean, got {} {}",
                    other.type_name(),
                    other
                )),
            });

        match outcome {
            Ok(result) => {
                info!("Evaluation result: {}", result);
                Ok(result)
            }
            Err(message) => {
                error!("Error during expression evaluation: {}", message);
                Err(Error::Evaluation(message))
            }
        }
    }
}
