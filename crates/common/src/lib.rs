pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{bindings_from_json, Bindings, Expression, VariableValue};
