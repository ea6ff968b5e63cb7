//! Keyword operator normalization

use exprguard_common::{Error, Result};

/// Normalize keyword operators into their symbolic form and trim the result
///
/// `" OR "` becomes `" || "` and `" AND "` becomes `" && "`. Matching is
/// case-sensitive and requires the surrounding spaces.
///
/// # Errors
/// * `InvalidArgument` if `expression` is empty
pub fn preprocess(expression: &str) -> Result<String> {
    if expression.is_empty() {
        return Err(Error::invalid_argument("Expression cannot be null or empty"));
    }

    Ok(expression
        .replace(" OR ", " || ")
        .replace(" AND ", " && ")
        .trim()
        .to_string())
}
