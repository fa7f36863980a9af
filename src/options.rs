use serde::Deserialize;

use crate::errors::{EvalError, Result};

/// Engine-wide knobs. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Deepest allowed nesting of groups, function calls and unary signs.
    pub max_depth: usize,
    /// Evaluators kept warm in the pool. Extra concurrent callers get transient instances.
    pub pool_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: 128,
            pool_capacity: 8,
        }
    }
}

impl Options {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EvalError::Config(e.to_string()))
    }
}
