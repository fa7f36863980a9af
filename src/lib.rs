pub mod errors;
pub mod options;
pub mod engine;
pub mod functions;
pub mod host;
pub mod pool;
mod cursor;
mod evaluator;
mod ops;
mod variables;

use std::sync::OnceLock;

use serde_json::Value;

pub use engine::Engine;
pub use errors::{EvalError, Result};
pub use evaluator::{Env, Evaluator};
pub use options::Options;
pub use variables::{constant, CONSTANT_NAMES};

/// Evaluate `expr` against `context` with a process-wide default engine
/// (JSON object model, wall clock, thread-local randomness).
///
/// Operators are applied left to right with no precedence, so `2+3*4` is `20`.
pub fn eval(expr: &str, context: &Value) -> Result<f64> {
    static DEFAULT: OnceLock<Engine> = OnceLock::new();
    DEFAULT.get_or_init(Engine::default).eval(expr, context)
}
