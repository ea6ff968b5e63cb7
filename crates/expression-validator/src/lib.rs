//! Expression Validator
//!
//! Guard layer in front of an embedded expression engine. Raw expression
//! strings are normalized, checked for common operator mistakes and
//! unbalanced parentheses, and parsed by the engine before they are accepted.
//! Accepted expressions are evaluated against caller-supplied bindings.

pub mod engine;
pub mod evaluator;
pub mod operators;
pub mod parentheses;
pub mod pipeline;
pub mod preprocess;
pub mod syntax;

pub use engine::{CelEngine, EngineError, ExpressionEngine};
pub use evaluator::Evaluator;
pub use pipeline::Validator;
pub use preprocess::preprocess;
