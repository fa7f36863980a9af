use rand::Rng;

use crate::errors::EvalError;

/// Uniform random numbers for `rand` and `randint`.
pub trait RandomSource: Send + Sync {
    /// A float in `[min, max]`.
    fn uniform(&self, min: f64, max: f64) -> f64;
    /// An integer in `[min, max)`; `min` when the range is empty.
    fn int(&self, min: i64, max: i64) -> i64;
}

/// Backed by the thread-local generator from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, min: f64, max: f64) -> f64 {
        if min == max || !(min.is_finite() && max.is_finite()) {
            return min;
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let mut rng = rand::thread_rng();
        if hi - lo < f64::MAX / 2.0 {
            rng.gen_range(lo..=hi)
        } else {
            // `Uniform` rejects spans this wide, so interpolate between the bounds
            let t: f64 = rng.gen();
            (lo * (1.0 - t) + hi * t).clamp(lo, hi)
        }
    }

    fn int(&self, min: i64, max: i64) -> i64 {
        if min == max {
            return min;
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        rand::thread_rng().gen_range(lo..hi)
    }
}

/// How many arguments a builtin takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Two,
    OneOrTwo,
}

impl Arity {
    pub fn describe(self) -> &'static str {
        match self {
            Arity::One => "1 argument",
            Arity::Two => "2 arguments",
            Arity::OneOrTwo => "1 or 2 arguments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Args {
    One(f64),
    Two(f64, f64),
}

/// The builtin function table. Names are matched case-insensitively by the caller,
/// which lower-cases them while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Sqrt,
    Cos,
    Sin,
    Tan,
    Acos,
    Asin,
    Atan,
    Atan2,
    Rand,
    RandInt,
}

impl Builtin {
    pub const ALL: [Builtin; 11] = [
        Builtin::Abs,
        Builtin::Sqrt,
        Builtin::Cos,
        Builtin::Sin,
        Builtin::Tan,
        Builtin::Acos,
        Builtin::Asin,
        Builtin::Atan,
        Builtin::Atan2,
        Builtin::Rand,
        Builtin::RandInt,
    ];

    pub fn lookup(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Sqrt => "sqrt",
            Builtin::Cos => "cos",
            Builtin::Sin => "sin",
            Builtin::Tan => "tan",
            Builtin::Acos => "acos",
            Builtin::Asin => "asin",
            Builtin::Atan => "atan",
            Builtin::Atan2 => "atan2",
            Builtin::Rand => "rand",
            Builtin::RandInt => "randint",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::Atan2 => Arity::Two,
            Builtin::Rand | Builtin::RandInt => Arity::OneOrTwo,
            _ => Arity::One,
        }
    }

    pub fn arity_error(self) -> EvalError {
        EvalError::ParamCountMismatch {
            function: self.name(),
            expected: self.arity().describe(),
        }
    }

    /// Applies the function, or `None` when the shape of `args` does not fit `arity()`.
    pub fn call(self, args: Args, random: &dyn RandomSource) -> Option<f64> {
        let v = match (self, args) {
            (Builtin::Abs, Args::One(x)) => x.abs(),
            (Builtin::Sqrt, Args::One(x)) => x.sqrt(),
            (Builtin::Cos, Args::One(x)) => x.cos(),
            (Builtin::Sin, Args::One(x)) => x.sin(),
            (Builtin::Tan, Args::One(x)) => x.tan(),
            (Builtin::Acos, Args::One(x)) => x.acos(),
            (Builtin::Asin, Args::One(x)) => x.asin(),
            (Builtin::Atan, Args::One(x)) => x.atan(),
            (Builtin::Atan2, Args::Two(y, x)) => y.atan2(x),
            (Builtin::Rand, Args::One(max)) => random.uniform(0.0, max),
            (Builtin::Rand, Args::Two(min, max)) => random.uniform(min, max),
            (Builtin::RandInt, Args::One(max)) => random.int(0, max as i64) as f64,
            (Builtin::RandInt, Args::Two(min, max)) => random.int(min as i64, max as i64) as f64,
            _ => return None,
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_by_name() {
        assert_eq!(Builtin::lookup("atan2"), Some(Builtin::Atan2));
        assert_eq!(Builtin::lookup("randint"), Some(Builtin::RandInt));
        assert_eq!(Builtin::lookup("foo"), None);
        for b in Builtin::ALL {
            assert_eq!(Builtin::lookup(b.name()), Some(b));
        }
    }

    #[test]
    fn arities() {
        assert_eq!(Builtin::Sqrt.arity(), Arity::One);
        assert_eq!(Builtin::Atan2.arity(), Arity::Two);
        assert_eq!(Builtin::Rand.arity(), Arity::OneOrTwo);
    }

    #[test]
    fn math() {
        let r = ThreadRandom;
        assert_eq!(Builtin::Abs.call(Args::One(-5.0), &r), Some(5.0));
        assert_eq!(Builtin::Sqrt.call(Args::One(16.0), &r), Some(4.0));
        assert_eq!(Builtin::Atan2.call(Args::Two(0.0, 1.0), &r), Some(0.0));
        assert!(Builtin::Sqrt.call(Args::One(-1.0), &r).is_some_and(f64::is_nan));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let r = ThreadRandom;
        assert_eq!(Builtin::Abs.call(Args::Two(1.0, 2.0), &r), None);
        assert_eq!(Builtin::Atan2.call(Args::One(1.0), &r), None);
        assert_eq!(
            Builtin::Atan2.arity_error(),
            EvalError::ParamCountMismatch {
                function: "atan2",
                expected: "2 arguments",
            }
        );
    }

    #[test]
    fn uniform_respects_bounds() {
        let r = ThreadRandom;
        for _ in 0..100 {
            let x = r.uniform(-2.0, 3.0);
            assert!((-2.0..=3.0).contains(&x));
            let y = r.uniform(3.0, -2.0);
            assert!((-2.0..=3.0).contains(&y));
        }
        assert_eq!(r.uniform(1.0, 1.0), 1.0);
    }

    #[test]
    fn uniform_spanning_the_whole_f64_range() {
        let r = ThreadRandom;
        for _ in 0..100 {
            let x = r.uniform(-f64::MAX, f64::MAX);
            assert!(x.is_finite());
            let y = r.uniform(f64::MAX, -f64::MAX);
            assert!(y.is_finite());
            let z = r.uniform(-1.0, f64::MAX);
            assert!((-1.0..=f64::MAX).contains(&z));
        }
    }

    #[test]
    fn int_is_half_open() {
        let r = ThreadRandom;
        for _ in 0..100 {
            let n = r.int(-3, 3);
            assert!((-3..3).contains(&n));
        }
        assert_eq!(r.int(4, 4), 4);
        assert_eq!(r.int(4, 5), 4);
    }

    #[test]
    fn single_bound_starts_at_zero() {
        let r = ThreadRandom;
        for _ in 0..50 {
            let x = Builtin::Rand.call(Args::One(2.0), &r).unwrap();
            assert!((0.0..=2.0).contains(&x));
            let n = Builtin::RandInt.call(Args::One(3.0), &r).unwrap();
            assert!([0.0, 1.0, 2.0].contains(&n));
        }
    }
}
