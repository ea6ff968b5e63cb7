//! Embedded expression engine interface
//!
//! The validator and evaluator only need two things from an engine: turn
//! text into a parsed program, and run that program against bindings.
//! [`CelEngine`] provides both on top of `cel-interpreter`.

use cel_interpreter::{Context, Program, Value};
use exprguard_common::{Bindings, VariableValue};
use std::any::Any;
use std::sync::Arc;
use std::thread;
use thiserror::Error;

/// Stack given to the parser thread. The CEL parser recurses once per
/// nesting level and uses far more stack per level in debug builds.
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Failure reported by an engine while parsing or executing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

/// A parse-then-execute expression engine
pub trait ExpressionEngine: Send + Sync {
    /// Parsed form of an expression
    type Program;

    /// Parse `text` without executing it
    fn parse(&self, text: &str) -> Result<Self::Program, EngineError>;

    /// Execute a parsed program against `bindings`
    fn execute(&self, program: &Self::Program, bindings: &Bindings) -> Result<VariableValue, EngineError>;
}

/// Engine backed by the Common Expression Language interpreter
///
/// Holds no state; every execution builds a fresh context from its bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelEngine;

impl CelEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEngine for CelEngine {
    type Program = Program;

    /// Compile `text` on a dedicated thread
    ///
    /// The generated parser panics on some malformed input (trailing
    /// operators, stray control characters) instead of returning an error.
    /// Joining the thread turns such a panic into an `EngineError`.
    fn parse(&self, text: &str) -> Result<Program, EngineError> {
        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("cel-parser".to_string())
                .stack_size(PARSER_STACK_SIZE)
                .spawn_scoped(scope, || Program::compile(text).map_err(|e| e.to_string()))
                .map_err(|e| EngineError(format!("failed to start parser: {e}")))?;

            match handle.join() {
                Ok(compiled) => compiled.map_err(EngineError),
                Err(payload) => Err(EngineError(format!(
                    "parser rejected input: {}",
                    panic_message(payload.as_ref())
                ))),
            }
        })
    }

    fn execute(&self, program: &Program, bindings: &Bindings) -> Result<VariableValue, EngineError> {
        let context = build_cel_context(bindings);
        let value = program
            .execute(&context)
            .map_err(|e| EngineError(e.to_string()))?;
        from_cel_value(value)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("malformed expression")
}

fn build_cel_context(bindings: &Bindings) -> Context<'_> {
    let mut context = Context::default();
    for (name, value) in bindings {
        context.add_variable_from_value(name.as_str(), to_cel_value(value));
    }
    context
}

fn to_cel_value(value: &VariableValue) -> Value {
    match value {
        VariableValue::Integer(i) => Value::Int(*i),
        VariableValue::Float(f) => Value::Float(*f),
        VariableValue::Boolean(b) => Value::Bool(*b),
        VariableValue::String(s) => Value::String(Arc::new(s.clone())),
    }
}

fn from_cel_value(value: Value) -> Result<VariableValue, EngineError> {
    match value {
        Value::Int(i) => Ok(VariableValue::Integer(i)),
        Value::UInt(u) => Ok(i64::try_from(u)
            .map(VariableValue::Integer)
            .unwrap_or(VariableValue::Float(u as f64))),
        Value::Float(f) => Ok(VariableValue::Float(f)),
        Value::Bool(b) => Ok(VariableValue::Boolean(b)),
        Value::String(s) => Ok(VariableValue::String(s.to_string())),
        other => Err(EngineError(format!("unsupported result type {other:?}"))),
    }
}
