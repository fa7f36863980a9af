use thiserror::Error;

/// Everything that can abort an evaluation. The first violation wins; there is no
/// partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Malformed syntax. `position` is the character offset where scanning stopped.
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    /// A builtin received fewer or more arguments than it accepts.
    #[error("parameter count mismatch: {function} expects {expected}")]
    ParamCountMismatch {
        function: &'static str,
        expected: &'static str,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Groups, calls or unary chains nested past `Options::max_depth`.
    #[error("expression nesting exceeds the limit of {0}")]
    TooDeep(usize),

    #[error("config error: {0}")]
    Config(String),
}

impl EvalError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        EvalError::Parse {
            position,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
