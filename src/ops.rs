/// Binary operators. There is no precedence: the evaluator applies them strictly
/// left to right as it meets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Or,
    And,
    BitOr,
    BitAnd,
}

impl BinOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Rem => lhs % rhs,
            BinOp::Pow => lhs.powf(rhs),
            BinOp::Eq => flag(fuzzy_equal(lhs, rhs)),
            BinOp::Ne => flag(!fuzzy_equal(lhs, rhs)),
            BinOp::Lt => flag(lhs < rhs),
            BinOp::Le => flag(lhs <= rhs),
            BinOp::Gt => flag(lhs > rhs),
            BinOp::Ge => flag(lhs >= rhs),
            BinOp::Or => flag(truthy(lhs) || truthy(rhs)),
            BinOp::And => flag(truthy(lhs) && truthy(rhs)),
            BinOp::BitOr => f64::from((lhs as i32) | (rhs as i32)),
            BinOp::BitAnd => f64::from((lhs as i32) & (rhs as i32)),
        }
    }
}

pub fn truthy(v: f64) -> bool {
    v != 0.0
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Equality at single-precision granularity: both sides are narrowed to `f32` and
/// compared with a relative tolerance of 1e-6, floored just above zero.
pub fn fuzzy_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let (a, b) = (a as f32, b as f32);
    let floor = f32::from_bits(1) * 8.0;
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(floor)
}
