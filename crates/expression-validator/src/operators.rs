//! Forbidden lone-operator detection
//!
//! Single `=`, `&` and `|` are almost always typos for `==`, `&&` and `||`.
//! Each check walks the characters once, looking at the immediate
//! neighbours of every candidate operator.

use exprguard_common::{Error, Result};

pub const INVALID_OPERATOR_MESSAGE: &str = "Invalid operator or syntax found in expression.";
pub const INVALID_ASSIGNMENT_MESSAGE: &str = "Invalid operator '=' found. Use '==' for comparisons.";

fn is_comparison_neighbour(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

/// Returns true if the expression contains an `=` with no `=`, `!`, `<` or `>`
/// directly before or after it
pub fn has_lone_assignment(expression: &str) -> bool {
    let chars: Vec<char> = expression.chars().collect();
    (0..chars.len()).any(|i| {
        chars[i] == '='
            && !(i > 0 && is_comparison_neighbour(chars[i - 1]))
            && !chars.get(i + 1).is_some_and(|&c| is_comparison_neighbour(c))
    })
}

/// Returns true if `op` appears without the same character on either side
fn has_lone(chars: &[char], op: char) -> bool {
    (0..chars.len()).any(|i| {
        chars[i] == op
            && !(i > 0 && chars[i - 1] == op)
            && chars.get(i + 1) != Some(&op)
    })
}

/// Returns true if any of the lone `=`, `&` or `|` patterns occurs
pub fn has_invalid_operator(expression: &str) -> bool {
    let chars: Vec<char> = expression.chars().collect();
    has_lone_assignment(expression) || has_lone(&chars, '&') || has_lone(&chars, '|')
}

/// Reject lone `=`, `&` and `|` operators
///
/// # Errors
/// * `InvalidSyntax` if any forbidden operator is found
pub fn validate_operators(expression: &str) -> Result<()> {
    if has_invalid_operator(expression) {
        return Err(Error::invalid_syntax(INVALID_OPERATOR_MESSAGE));
    }
    Ok(())
}

/// Reject a lone `=` with a message pointing at `==`
///
/// # Errors
/// * `InvalidSyntax` if a lone `=` is found
pub fn validate_assignment_operator(expression: &str) -> Result<()> {
    if has_lone_assignment(expression) {
        return Err(Error::invalid_syntax(INVALID_ASSIGNMENT_MESSAGE));
    }
    Ok(())
}
