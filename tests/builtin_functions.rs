use serde_json::Value;
use tween_expr::functions::RandomSource;
use tween_expr::host::{FixedClock, Tick};
use tween_expr::{constant, Engine, Options, CONSTANT_NAMES};

/// Always answers with the low bound, so results are predictable.
struct LowBound;

impl RandomSource for LowBound {
    fn uniform(&self, min: f64, _max: f64) -> f64 {
        min
    }

    fn int(&self, min: i64, _max: i64) -> i64 {
        min
    }
}

fn engine() -> Engine {
    Engine::new(Options::default()).with_random(LowBound)
}

#[test]
fn test_trig() {
    let e = engine();
    let close = |expr: &str, want: f64| {
        let got = e.eval(expr, &Value::Null).unwrap();
        assert!((got - want).abs() < 1e-12, "{expr}: {got} != {want}");
    };
    close("sin($pi_2)", 1.0);
    close("cos(0)", 1.0);
    close("tan(0)", 0.0);
    close("asin(1)", std::f64::consts::FRAC_PI_2);
    close("acos(1)", 0.0);
    close("atan(1)*4", std::f64::consts::PI);
    close("atan2(1,0)", std::f64::consts::FRAC_PI_2);
}

#[test]
fn test_random_overloads_use_source() {
    let e = engine();
    assert_eq!(e.eval("rand(5)", &Value::Null).unwrap(), 0.0);
    assert_eq!(e.eval("rand(2,5)", &Value::Null).unwrap(), 2.0);
    assert_eq!(e.eval("randint(9)", &Value::Null).unwrap(), 0.0);
    assert_eq!(e.eval("randint(3.9,9)", &Value::Null).unwrap(), 3.0);
}

#[test]
fn test_default_random_in_range() {
    for _ in 0..50 {
        let x = tween_expr::eval("rand(-1,1)", &Value::Null).unwrap();
        assert!((-1.0..=1.0).contains(&x));
        let n = tween_expr::eval("randint(0,4)", &Value::Null).unwrap();
        assert!(n.fract() == 0.0 && (0.0..4.0).contains(&n));
    }
}

#[test]
fn test_names_are_case_insensitive() {
    let e = engine();
    assert_eq!(e.eval("ABS(-2)+Sqrt(4)", &Value::Null).unwrap(), 4.0);
    assert_eq!(e.eval("$SECSINMIN", &Value::Null).unwrap(), 60.0);
}

#[test]
fn test_clock_constants() {
    let tick = Tick {
        time: 12.0,
        unscaled_time: 13.0,
        fixed_time: 11.0,
        delta_time: 0.5,
        fixed_delta_time: 0.25,
    };
    let e = engine().with_clock(FixedClock(tick));
    assert_eq!(e.eval("$time+$unscaledtime", &Value::Null).unwrap(), 25.0);
    assert_eq!(e.eval("$fixedtime", &Value::Null).unwrap(), 11.0);
    assert_eq!(e.eval("$deltatime/$fixeddeltatime", &Value::Null).unwrap(), 2.0);
}

#[test]
fn test_constant_table() {
    let tick = Tick::default();
    assert_eq!(constant("secsinweek", &tick), Some(604_800.0));
    assert_eq!(constant("secsinyear", &tick), Some(31_536_000.0));
    assert_eq!(constant("-inf", &tick), Some(f64::NEG_INFINITY));
    assert!(CONSTANT_NAMES.contains(&"fixeddeltatime"));
}
