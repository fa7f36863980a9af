use serde_json::Value;

use crate::errors::Result;
use crate::evaluator::{Env, Evaluator};
use crate::functions::{RandomSource, ThreadRandom};
use crate::host::{Clock, JsonModel, ObjectModel, SystemClock};
use crate::options::Options;
use crate::pool::Pool;

/// Shared entry point for hot-path evaluation.
///
/// An `Engine` pools its evaluators, so a call checks one out, samples the clock once,
/// evaluates and hands the evaluator back, without allocating once the pool is warm.
/// The context is only borrowed for the call and never retained.
pub struct Engine {
    pool: Pool<Evaluator>,
    model: Box<dyn ObjectModel>,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
    options: Options,
}

impl Engine {
    pub fn new(options: Options) -> Self {
        Self {
            pool: Pool::new(options.pool_capacity),
            model: Box::new(JsonModel),
            clock: Box::new(SystemClock::new()),
            random: Box::new(ThreadRandom),
            options,
        }
    }

    pub fn with_object_model(mut self, model: impl ObjectModel + 'static) -> Self {
        self.model = Box::new(model);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Evaluators currently parked in the pool.
    pub fn idle_evaluators(&self) -> usize {
        self.pool.idle()
    }

    pub fn eval(&self, expr: &str, context: &Value) -> Result<f64> {
        let mut evaluator = self.pool.acquire();
        let env = Env {
            context,
            model: self.model.as_ref(),
            random: self.random.as_ref(),
            tick: self.clock.now(),
            max_depth: self.options.max_depth,
        };
        evaluator.eval(expr, &env)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
