//! Validation pipeline
//!
//! Runs the checks in a fixed order and stops at the first failure:
//! preprocess, lone operators, lone `=`, parentheses, nesting depth,
//! engine syntax.

use crate::engine::{CelEngine, ExpressionEngine};
use crate::operators::{validate_assignment_operator, validate_operators};
use crate::parentheses::{validate_nesting_depth, validate_parentheses};
use crate::preprocess::preprocess;
use crate::syntax::validate_syntax;
use exprguard_common::{Error, Result};

/// Validates raw expression text before it reaches the engine
#[derive(Debug, Clone, Default)]
pub struct Validator<E = CelEngine> {
    engine: E,
}

impl Validator<CelEngine> {
    pub fn new() -> Self {
        Self::with_engine(CelEngine)
    }
}

impl<E: ExpressionEngine> Validator<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Validate raw text
    ///
    /// Already-normalized text passes through preprocessing unchanged, so
    /// validating raw and normalized forms gives the same outcome.
    pub fn validate(&self, raw: &str) -> Result<()> {
        let normalized = preprocess(raw)?;
        self.validate_normalized(&normalized)
    }

    /// Validate text that has already been through [`preprocess`]
    pub fn validate_normalized(&self, expression: &str) -> Result<()> {
        if expression.is_empty() {
            return Err(Error::invalid_argument("Expression cannot be null or empty."));
        }

        validate_operators(expression)?;
        validate_assignment_operator(expression)?;
        validate_parentheses(expression)?;
        validate_nesting_depth(expression)?;
        validate_syntax(&self.engine, expression)?;

        Ok(())
    }
}
