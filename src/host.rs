//! Collaborators supplied by the host application: how context objects are read and
//! where the clock-derived constants come from.

use std::time::Instant;

use serde_json::Value;

/// Read-only view of context objects.
pub trait ObjectModel: Send + Sync {
    /// Numeric value of an object referenced bare (`$` or the tail of a path).
    fn to_f64(&self, value: &Value) -> f64;

    /// Named member of `target`, `None` when absent.
    fn member<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value>;

    /// Sub-object of `context` registered under `type_name` (the `$(Type)` form).
    fn component<'v>(&self, context: &'v Value, type_name: &str) -> Option<&'v Value>;
}

/// Object model over plain JSON documents.
///
/// Members are object keys, matched exactly first and then ignoring ASCII case. Arrays
/// take decimal indices as member names. Components live under a `components` object,
/// falling back to a top-level key of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModel;

impl ObjectModel for JsonModel {
    fn to_f64(&self, value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn member<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        match target {
            Value::Object(map) => map.get(name).or_else(|| {
                map.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            }),
            Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn component<'v>(&self, context: &'v Value, type_name: &str) -> Option<&'v Value> {
        context
            .get("components")
            .and_then(|c| c.get(type_name))
            .or_else(|| context.get(type_name))
    }
}

/// One sample of the host's frame clock, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub unscaled_time: f64,
    pub fixed_time: f64,
    pub delta_time: f64,
    pub fixed_delta_time: f64,
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Tick;
}

/// Seconds elapsed since the clock was created. There is no frame loop, so both
/// deltas read as zero and the fixed time tracks the scaled time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Tick {
        let t = self.start.elapsed().as_secs_f64();
        Tick {
            time: t,
            unscaled_time: t,
            fixed_time: t,
            delta_time: 0.0,
            fixed_delta_time: 0.0,
        }
    }
}

/// Always reports the same sample. Hosts that drive their own frame loop can build
/// one per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedClock(pub Tick);

impl Clock for FixedClock {
    fn now(&self) -> Tick {
        self.0
    }
}
