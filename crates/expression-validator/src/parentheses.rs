//! Parenthesis balance check

use exprguard_common::{Error, Result};

pub const UNBALANCED_MESSAGE: &str = "Unbalanced parentheses in expression.";

/// Deepest parenthesis nesting accepted before the engine sees the text
pub const MAX_NESTING_DEPTH: usize = 32;

/// Verify that nesting depth never drops below zero and ends at zero
///
/// Parentheses inside quoted strings are counted like any other.
///
/// # Errors
/// * `InvalidSyntax` on the first unmatched `)` or on unclosed `(` at the end
pub fn validate_parentheses(expression: &str) -> Result<()> {
    let mut balance: i64 = 0;
    for c in expression.chars() {
        match c {
            '(' => balance += 1,
            ')' => balance -= 1,
            _ => {}
        }
        if balance < 0 {
            return Err(Error::invalid_syntax(UNBALANCED_MESSAGE));
        }
    }

    if balance != 0 {
        return Err(Error::invalid_syntax(UNBALANCED_MESSAGE));
    }

    Ok(())
}

/// Reject expressions nested deeper than [`MAX_NESTING_DEPTH`]
///
/// The engine's parser recurses per nesting level, so unbounded nesting
/// would exhaust the stack.
///
/// # Errors
/// * `InvalidSyntax` if parentheses nest more than `MAX_NESTING_DEPTH` levels
pub fn validate_nesting_depth(expression: &str) -> Result<()> {
    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(Error::invalid_syntax(format!(
                        "Expression nesting is too deep (maximum {MAX_NESTING_DEPTH} levels)."
                    )));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}
