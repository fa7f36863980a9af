use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde_json::Value;

use crate::errors::Result;
use crate::evaluator::{Env, Evaluator};
use crate::host::Tick;

/// Every name `constant` recognises.
pub const CONSTANT_NAMES: &[&str] = &[
    "pi",
    "2pi",
    "pi_2",
    "rad2deg",
    "deg2rad",
    "secsinmin",
    "secsinhour",
    "secsinday",
    "secsinweek",
    "secsinyear",
    "infinity",
    "inf",
    "-infinity",
    "-inf",
    "time",
    "unscaledtime",
    "fixedtime",
    "deltatime",
    "fixeddeltatime",
];

/// Value of a `$name` constant. `name` must already be lower-case. Clock entries read
/// from `tick`.
pub fn constant(name: &str, tick: &Tick) -> Option<f64> {
    let v = match name {
        "pi" => PI,
        "2pi" => TAU,
        "pi_2" => FRAC_PI_2,
        "rad2deg" => 180.0 / PI,
        "deg2rad" => PI / 180.0,
        "secsinmin" => 60.0,
        "secsinhour" => 3_600.0,
        "secsinday" => 86_400.0,
        "secsinweek" => 604_800.0,
        "secsinyear" => 31_536_000.0,
        "infinity" | "inf" => f64::INFINITY,
        "-infinity" | "-inf" => f64::NEG_INFINITY,
        "time" => tick.time,
        "unscaledtime" => tick.unscaled_time,
        "fixedtime" => tick.fixed_time,
        "deltatime" => tick.delta_time,
        "fixeddeltatime" => tick.fixed_delta_time,
        _ => return None,
    };
    Some(v)
}

/// Characters that may directly follow a bare `$`.
fn ends_operand(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ')' | ',' | '+' | '-' | '*' | '/' | '%' | '^' | '=' | '!' | '<' | '>' | '|' | '&'
        )
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Evaluator {
    /// Resolves what follows a `$`, which has already been consumed.
    pub(crate) fn variable(&mut self, env: &Env<'_>) -> Result<f64> {
        match self.cursor.current() {
            // `$-inf` is a constant, `$-1` is the context minus one
            Some('-') if self.cursor.peek().is_some_and(|c| c.is_ascii_alphabetic()) => {
                Ok(self.named_constant(env))
            }
            None => Ok(env.model.to_f64(env.context)),
            Some(c) if ends_operand(c) => Ok(env.model.to_f64(env.context)),
            Some('.') => {
                self.cursor.bump();
                self.member_path(env, Some(env.context))
            }
            Some('(') => {
                self.cursor.bump();
                self.component_path(env)
            }
            Some(c) if is_ident(c) => Ok(self.named_constant(env)),
            Some(c) => Err(self.error(format!("unexpected '{c}' after '$'"))),
        }
    }

    /// Unknown names read as zero.
    fn named_constant(&mut self, env: &Env<'_>) -> f64 {
        self.scratch.clear();
        if self.cursor.consume_char('-') {
            self.scratch.push('-');
        }
        while let Some(c) = self.cursor.current() {
            if !is_ident(c) {
                break;
            }
            self.scratch.extend(c.to_lowercase());
            self.cursor.bump();
        }
        constant(&self.scratch, &env.tick).unwrap_or_else(|| {
            tracing::debug!(name = %self.scratch, "unknown constant, reading as 0");
            0.0
        })
    }

    /// `$(TypeName).member...`, positioned just after the `(`.
    fn component_path(&mut self, env: &Env<'_>) -> Result<f64> {
        self.scratch.clear();
        loop {
            match self.cursor.current() {
                None => return Err(self.error("unterminated type name, missing ')'")),
                Some(')') => {
                    self.cursor.bump();
                    break;
                }
                Some(c) => {
                    self.scratch.push(c);
                    self.cursor.bump();
                }
            }
        }
        if !self.cursor.consume_char('.') {
            return Err(self.error(format!(
                "expected '.' after '$({})'",
                self.scratch
            )));
        }
        let type_name = self.scratch.trim();
        let target = env.model.component(env.context, type_name);
        if target.is_none() {
            tracing::debug!(type_name, "component not found");
        }
        self.member_path(env, target)
    }

    /// `name(.name)*`, positioned on the first name. Each segment is looked up on the
    /// previous one; any missing segment makes the whole path read as zero.
    fn member_path<'v>(&mut self, env: &Env<'v>, mut target: Option<&'v Value>) -> Result<f64> {
        loop {
            self.scratch.clear();
            while let Some(c) = self.cursor.current() {
                if !is_ident(c) {
                    break;
                }
                self.scratch.push(c);
                self.cursor.bump();
            }
            if self.scratch.is_empty() {
                return Err(self.error("expected a member name after '.'"));
            }
            let next = target.and_then(|t| env.model.member(t, &self.scratch));
            if next.is_none() && target.is_some() {
                tracing::debug!(member = %self.scratch, "member not found");
            }
            target = next;
            if !self.cursor.consume_char('.') {
                break;
            }
        }
        Ok(target.map_or(0.0, |v| env.model.to_f64(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(expr: &str, ctx: &Value) -> Result<f64> {
        Evaluator::new().eval(expr, &Env::new(ctx))
    }

    #[test]
    fn constants_are_case_insensitive() {
        let ctx = Value::Null;
        assert!((run("$pi", &ctx).unwrap() - PI).abs() < 1e-9);
        assert!((run("$PI", &ctx).unwrap() - PI).abs() < 1e-9);
        assert!((run("$2Pi", &ctx).unwrap() - TAU).abs() < 1e-9);
        assert!((run("$pi_2", &ctx).unwrap() - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(run("$SecsInHour", &ctx).unwrap(), 3600.0);
        assert_eq!(run("$notarealconst", &ctx).unwrap(), 0.0);
    }

    #[test]
    fn infinities() {
        let ctx = Value::Null;
        assert_eq!(run("$inf", &ctx).unwrap(), f64::INFINITY);
        assert_eq!(run("$Infinity", &ctx).unwrap(), f64::INFINITY);
        assert_eq!(run("$-inf", &ctx).unwrap(), f64::NEG_INFINITY);
        assert_eq!(run("$-INFINITY", &ctx).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn every_listed_name_resolves() {
        let tick = Tick::default();
        for name in CONSTANT_NAMES {
            assert!(constant(name, &tick).is_some(), "{name}");
        }
        assert_eq!(constant("nope", &tick), None);
    }

    #[test]
    fn clock_constants_read_the_tick() {
        let ctx = Value::Null;
        let tick = Tick {
            time: 10.0,
            unscaled_time: 11.0,
            fixed_time: 9.5,
            delta_time: 0.25,
            fixed_delta_time: 0.02,
        };
        let env = Env::new(&ctx).with_tick(tick);
        let mut ev = Evaluator::new();
        assert_eq!(ev.eval("$time", &env).unwrap(), 10.0);
        assert_eq!(ev.eval("$UnscaledTime", &env).unwrap(), 11.0);
        assert_eq!(ev.eval("$fixedtime", &env).unwrap(), 9.5);
        assert_eq!(ev.eval("$deltatime*4", &env).unwrap(), 1.0);
        assert_eq!(ev.eval("$fixeddeltatime", &env).unwrap(), 0.02);
    }

    #[test]
    fn bare_context() {
        let ctx = json!(7);
        assert_eq!(run("$", &ctx).unwrap(), 7.0);
        assert_eq!(run("$*2", &ctx).unwrap(), 14.0);
        assert_eq!(run("$ - 1", &ctx).unwrap(), 6.0);
        assert_eq!(run("$-1", &ctx).unwrap(), 6.0);
        assert_eq!(run("abs($)", &ctx).unwrap(), 7.0);
        assert_eq!(run("atan2($,1)", &ctx).unwrap(), 7f64.atan2(1.0));
        assert_eq!(run("($)", &ctx).unwrap(), 7.0);
    }

    #[test]
    fn member_paths() {
        let ctx = json!({"Health": 42, "stats": {"speed": 3.5, "buffs": [1, 2]}});
        assert_eq!(run("$.Health", &ctx).unwrap(), 42.0);
        assert_eq!(run("$.stats.speed*2", &ctx).unwrap(), 7.0);
        assert_eq!(run("$.stats.buffs.1", &ctx).unwrap(), 2.0);
        assert_eq!(run("$.missing", &ctx).unwrap(), 0.0);
        assert_eq!(run("$.missing.deeper+1", &ctx).unwrap(), 1.0);
    }

    #[test]
    fn component_paths() {
        let ctx = json!({"components": {"Transform": {"position": {"x": 4}}}});
        assert_eq!(run("$(Transform).position.x", &ctx).unwrap(), 4.0);
        assert_eq!(run("$(Rigidbody).mass", &ctx).unwrap(), 0.0);
    }

    #[test]
    fn malformed_variables() {
        let ctx = json!({});
        assert!(matches!(run("$(Transform", &ctx), Err(EvalError::Parse { .. })));
        assert!(matches!(run("$(Transform)x", &ctx), Err(EvalError::Parse { .. })));
        assert!(matches!(run("$.", &ctx), Err(EvalError::Parse { .. })));
        assert!(matches!(run("$.a.", &ctx), Err(EvalError::Parse { .. })));
        assert!(matches!(run("$#", &ctx), Err(EvalError::Parse { .. })));
    }
}
