// Single-pass scanner and evaluator. There is no token stream and no AST: each parse
// routine returns the value of what it consumed.

use serde_json::Value;

use crate::cursor::Cursor;
use crate::errors::{EvalError, Result};
use crate::functions::{Args, Arity, Builtin, RandomSource, ThreadRandom};
use crate::host::{JsonModel, ObjectModel, Tick};
use crate::options::Options;
use crate::ops::BinOp;
use crate::pool::Recycle;

/// Inputs borrowed for one evaluation.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub context: &'a Value,
    pub model: &'a dyn ObjectModel,
    pub random: &'a dyn RandomSource,
    /// Clock sample backing `$time` and friends, taken once per call.
    pub tick: Tick,
    pub max_depth: usize,
}

impl<'a> Env<'a> {
    /// JSON object model, thread-local randomness, a zeroed clock.
    pub fn new(context: &'a Value) -> Self {
        Self {
            context,
            model: &JsonModel,
            random: &ThreadRandom,
            tick: Tick::default(),
            max_depth: Options::default().max_depth,
        }
    }

    pub fn with_model(mut self, model: &'a dyn ObjectModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_random(mut self, random: &'a dyn RandomSource) -> Self {
        self.random = random;
        self
    }

    pub fn with_tick(mut self, tick: Tick) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Where a statement is allowed to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Outermost statement: end of input closes it.
    Top,
    /// `( ... )`: only `)` closes it.
    Group,
    /// One function argument: `)` or `,`.
    Param,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Input,
    Paren,
    Comma,
}

/// Reusable evaluator state. Instances are meant to be pooled; see `Engine`.
#[derive(Debug, Default)]
pub struct Evaluator {
    pub(crate) cursor: Cursor,
    /// Identifier accumulator for function names, constants and member paths.
    pub(crate) scratch: String,
    /// Unmatched `(` seen so far.
    depth: usize,
    /// Current recursion depth, checked against `Env::max_depth`.
    nesting: usize,
}

impl Recycle for Evaluator {
    fn recycle(&mut self) {
        self.cursor.clear();
        self.scratch.clear();
        self.depth = 0;
        self.nesting = 0;
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates `expr` left to right. Operators have no precedence; only parentheses
    /// change the order.
    pub fn eval(&mut self, expr: &str, env: &Env<'_>) -> Result<f64> {
        self.recycle();
        self.cursor.load(expr);
        tracing::trace!(expr, "evaluating");
        let out = self.statement(env, Scope::Top).map(|(value, _)| value);
        match &out {
            Ok(value) => tracing::trace!(expr, value, "evaluated"),
            Err(e) => tracing::trace!(expr, error = %e, "evaluation failed"),
        }
        self.recycle();
        out
    }

    /// Value (operator Value)* up to the terminator `scope` allows.
    fn statement(&mut self, env: &Env<'_>, scope: Scope) -> Result<(f64, End)> {
        let mut result = self.value(env)?;
        loop {
            self.cursor.skip_ws();
            match self.cursor.current() {
                None if scope == Scope::Top => return Ok((result, End::Input)),
                None => return Err(self.error("missing ')'")),
                Some(')') => {
                    self.close_group()?;
                    return Ok((result, End::Paren));
                }
                Some(',') if scope == Scope::Param => {
                    self.cursor.bump();
                    return Ok((result, End::Comma));
                }
                Some(_) => {
                    let op = self.operator()?;
                    let rhs = self.value(env)?;
                    result = op.apply(result, rhs);
                }
            }
        }
    }

    /// One function argument. The flag is true when `)` closed the list and false
    /// when a `,` says more arguments follow.
    fn parameter(&mut self, env: &Env<'_>) -> Result<(f64, bool)> {
        let (value, end) = self.statement(env, Scope::Param)?;
        Ok((value, end == End::Paren))
    }

    fn value(&mut self, env: &Env<'_>) -> Result<f64> {
        self.cursor.skip_ws();
        match self.cursor.current() {
            None => Err(self.error("expected a value, found end of input")),
            Some(c) if c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.function(env),
            Some('$') => {
                self.cursor.bump();
                self.variable(env)
            }
            Some('(') => {
                self.cursor.bump();
                self.depth += 1;
                self.nested(env, |ev| ev.statement(env, Scope::Group))
                    .map(|(value, _)| value)
            }
            Some('+') => {
                self.cursor.bump();
                self.nested(env, |ev| ev.value(env))
            }
            Some('-') => {
                self.cursor.bump();
                self.nested(env, |ev| ev.value(env)).map(|v| -v)
            }
            // An empty operand right before `)` reads as zero.
            Some(')') => Ok(0.0),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
        }
    }

    /// Digits with at most one decimal point, accumulated without building a string.
    fn number(&mut self) -> Result<f64> {
        let mut high: u64 = 0;
        let mut low: u64 = 0;
        let mut frac_digits: i32 = 0;
        let mut seen_point = false;
        while let Some(c) = self.cursor.current() {
            if c == '.' {
                if seen_point {
                    return Err(self.error("second decimal point in number"));
                }
                seen_point = true;
            } else if let Some(d) = c.to_digit(10) {
                let d = u64::from(d);
                if !seen_point {
                    high = high
                        .checked_mul(10)
                        .and_then(|h| h.checked_add(d))
                        .ok_or_else(|| self.error("number too large"))?;
                } else if let Some(l) = low.checked_mul(10).and_then(|l| l.checked_add(d)) {
                    // digits past u64 precision are dropped
                    low = l;
                    frac_digits += 1;
                }
            } else {
                break;
            }
            self.cursor.bump();
        }
        if frac_digits == 0 {
            Ok(high as f64)
        } else {
            Ok(high as f64 + low as f64 / 10f64.powi(frac_digits))
        }
    }

    fn operator(&mut self) -> Result<BinOp> {
        let Some(c) = self.cursor.current() else {
            return Err(self.error("expected an operator, found end of input"));
        };
        let (op, width) = match (c, self.cursor.peek()) {
            ('+', _) => (BinOp::Add, 1),
            ('-', _) => (BinOp::Sub, 1),
            ('*', _) => (BinOp::Mul, 1),
            ('/', _) => (BinOp::Div, 1),
            ('%', _) => (BinOp::Rem, 1),
            ('^', _) => (BinOp::Pow, 1),
            ('=', Some('=')) => (BinOp::Eq, 2),
            ('=', _) => (BinOp::Eq, 1),
            ('!', Some('=')) => (BinOp::Ne, 2),
            ('<', Some('=')) => (BinOp::Le, 2),
            ('<', _) => (BinOp::Lt, 1),
            ('>', Some('=')) => (BinOp::Ge, 2),
            ('>', _) => (BinOp::Gt, 1),
            ('|', Some('|')) => (BinOp::Or, 2),
            ('|', _) => (BinOp::BitOr, 1),
            ('&', Some('&')) => (BinOp::And, 2),
            ('&', _) => (BinOp::BitAnd, 1),
            (other, _) => {
                return Err(self.error(format!("unexpected '{other}', expected an operator")))
            }
        };
        for _ in 0..width {
            self.cursor.bump();
        }
        Ok(op)
    }

    fn function(&mut self, env: &Env<'_>) -> Result<f64> {
        self.scratch.clear();
        while let Some(c) = self.cursor.current() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            self.scratch.push(c.to_ascii_lowercase());
            self.cursor.bump();
        }
        self.cursor.skip_ws();
        if !self.cursor.consume_char('(') {
            return Err(self.error(format!(
                "expected '(' after function name '{}'",
                self.scratch
            )));
        }
        self.depth += 1;
        let builtin = Builtin::lookup(&self.scratch)
            .ok_or_else(|| EvalError::UnknownFunction(self.scratch.clone()))?;
        let args = self.nested(env, |ev| ev.arguments(env, builtin))?;
        builtin
            .call(args, env.random)
            .ok_or_else(|| builtin.arity_error())
    }

    fn arguments(&mut self, env: &Env<'_>, builtin: Builtin) -> Result<Args> {
        let mismatch = || builtin.arity_error();
        let (first, closed) = self.parameter(env)?;
        match builtin.arity() {
            Arity::One if closed => Ok(Args::One(first)),
            Arity::One => Err(mismatch()),
            Arity::OneOrTwo if closed => Ok(Args::One(first)),
            Arity::Two if closed => Err(mismatch()),
            Arity::Two | Arity::OneOrTwo => {
                let (second, closed) = self.parameter(env)?;
                if closed {
                    Ok(Args::Two(first, second))
                } else {
                    Err(mismatch())
                }
            }
        }
    }

    fn close_group(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(self.error("unmatched ')'"));
        }
        self.depth -= 1;
        self.cursor.bump();
        Ok(())
    }

    /// Runs `f` one recursion level deeper, failing once `max_depth` is reached.
    fn nested<T>(&mut self, env: &Env<'_>, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.nesting >= env.max_depth {
            return Err(EvalError::TooDeep(env.max_depth));
        }
        self.nesting += 1;
        let out = f(self);
        self.nesting -= 1;
        out
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::parse(self.cursor.position(), message)
    }
}
