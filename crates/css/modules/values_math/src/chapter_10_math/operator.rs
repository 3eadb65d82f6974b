//! Operator table and the numeric semantics shared by folding and deferred evaluation.
//! Spec: <https://www.w3.org/TR/css-values-4/#math-function>

use core::f64::consts::PI;

/// Every operator an operation node or a deferred calculation can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Min,
    Max,
    Clamp,
    RoundNearest,
    RoundUp,
    RoundDown,
    RoundToZero,
    Mod,
    Rem,
    Hypot,
    Abs,
    Sign,
    Pow,
    Sqrt,
    Log,
    Exp,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Progress,
    MediaProgress,
    ContainerProgress,
}

impl MathOperator {
    /// Operator for a math function name. `round` maps to [`Self::RoundNearest`];
    /// the parser swaps in the explicit strategy.
    pub fn from_function_name(name: &str) -> Option<Self> {
        let op = cssparser::match_ignore_ascii_case! { name,
            "min" => Self::Min,
            "max" => Self::Max,
            "clamp" => Self::Clamp,
            "round" => Self::RoundNearest,
            "mod" => Self::Mod,
            "rem" => Self::Rem,
            "hypot" => Self::Hypot,
            "abs" => Self::Abs,
            "sign" => Self::Sign,
            "pow" => Self::Pow,
            "sqrt" => Self::Sqrt,
            "log" => Self::Log,
            "exp" => Self::Exp,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "atan2" => Self::Atan2,
            "progress" => Self::Progress,
            "media-progress" => Self::MediaProgress,
            "container-progress" => Self::ContainerProgress,
            _ => return None,
        };
        Some(op)
    }

    /// Function name used when serializing. Arithmetic operators have none.
    pub const fn function_name(self) -> Option<&'static str> {
        let name = match self {
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => return None,
            Self::Min => "min",
            Self::Max => "max",
            Self::Clamp => "clamp",
            Self::RoundNearest | Self::RoundUp | Self::RoundDown | Self::RoundToZero => "round",
            Self::Mod => "mod",
            Self::Rem => "rem",
            Self::Hypot => "hypot",
            Self::Abs => "abs",
            Self::Sign => "sign",
            Self::Pow => "pow",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Exp => "exp",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
            Self::Progress => "progress",
            Self::MediaProgress => "media-progress",
            Self::ContainerProgress => "container-progress",
        };
        Some(name)
    }

    /// Infix symbol of an arithmetic operator.
    pub const fn symbol(self) -> Option<char> {
        match self {
            Self::Add => Some('+'),
            Self::Subtract => Some('-'),
            Self::Multiply => Some('*'),
            Self::Divide => Some('/'),
            _ => None,
        }
    }

    /// Rounding strategy keyword; `None` for nearest, which serializes implicitly.
    pub const fn rounding_strategy_keyword(self) -> Option<&'static str> {
        match self {
            Self::RoundUp => Some("up"),
            Self::RoundDown => Some("down"),
            Self::RoundToZero => Some("to-zero"),
            _ => None,
        }
    }

    /// Inclusive bounds on the operand count.
    pub const fn arity(self) -> (usize, usize) {
        match self {
            Self::Add
            | Self::Subtract
            | Self::Multiply
            | Self::Divide
            | Self::RoundNearest
            | Self::RoundUp
            | Self::RoundDown
            | Self::RoundToZero
            | Self::Mod
            | Self::Rem
            | Self::Pow
            | Self::Atan2 => (2, 2),
            Self::Min | Self::Max | Self::Hypot => (1, usize::MAX),
            Self::Clamp | Self::Progress | Self::MediaProgress | Self::ContainerProgress => (3, 3),
            Self::Abs
            | Self::Sign
            | Self::Sqrt
            | Self::Exp
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Asin
            | Self::Acos
            | Self::Atan => (1, 1),
            Self::Log => (1, 2),
        }
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Subtract | Self::Multiply | Self::Divide)
    }

    pub const fn is_additive(self) -> bool {
        matches!(self, Self::Add | Self::Subtract)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(self, Self::Min | Self::Max | Self::Clamp)
    }

    pub const fn is_stepped(self) -> bool {
        matches!(
            self,
            Self::RoundNearest
                | Self::RoundUp
                | Self::RoundDown
                | Self::RoundToZero
                | Self::Mod
                | Self::Rem
        )
    }

    pub const fn is_exponential(self) -> bool {
        matches!(
            self,
            Self::Pow | Self::Sqrt | Self::Log | Self::Exp | Self::Hypot
        )
    }

    pub const fn is_sign_related(self) -> bool {
        matches!(self, Self::Abs | Self::Sign)
    }

    pub const fn is_trigonometric(self) -> bool {
        matches!(
            self,
            Self::Sin | Self::Cos | Self::Tan | Self::Asin | Self::Acos | Self::Atan | Self::Atan2
        )
    }

    pub const fn is_progress(self) -> bool {
        matches!(
            self,
            Self::Progress | Self::MediaProgress | Self::ContainerProgress
        )
    }
}

/// Apply `op` to operand values already expressed in one common unit.
///
/// Forward trigonometric functions take radians; inverse ones return degrees.
/// Operand slices of the wrong length yield NaN, and so does any NaN operand.
pub fn evaluate_operator(op: MathOperator, operands: &[f64]) -> f64 {
    if operands.iter().any(|value| value.is_nan()) {
        return f64::NAN;
    }
    match (op, operands) {
        (MathOperator::Add, &[left, right]) => left + right,
        (MathOperator::Subtract, &[left, right]) => left - right,
        (MathOperator::Multiply, &[left, right]) => left * right,
        (MathOperator::Divide, &[left, right]) => left / right,
        (MathOperator::Min, values) if !values.is_empty() => fold_min_max(values, true),
        (MathOperator::Max, values) if !values.is_empty() => fold_min_max(values, false),
        (MathOperator::Clamp, &[low, value, high]) => {
            let inner = fold_min_max(&[value, high], true);
            fold_min_max(&[low, inner], false)
        }
        (
            MathOperator::RoundNearest
            | MathOperator::RoundUp
            | MathOperator::RoundDown
            | MathOperator::RoundToZero,
            &[value, step],
        ) => round_to_step(op, value, step),
        (MathOperator::Mod, &[dividend, divisor]) => modulo(dividend, divisor, true),
        (MathOperator::Rem, &[dividend, divisor]) => modulo(dividend, divisor, false),
        (MathOperator::Hypot, values) if !values.is_empty() => {
            values.iter().fold(0.0, |acc: f64, value| acc.hypot(*value))
        }
        (MathOperator::Abs, &[value]) => value.abs(),
        (MathOperator::Sign, &[value]) => sign(value),
        (MathOperator::Pow, &[base, exponent]) => base.powf(exponent),
        (MathOperator::Sqrt, &[value]) => value.sqrt(),
        (MathOperator::Log, &[value]) => value.ln(),
        (MathOperator::Log, &[value, base]) => value.ln() / base.ln(),
        (MathOperator::Exp, &[value]) => value.exp(),
        (MathOperator::Sin, &[radians]) => sin_degrees(radians.to_degrees()),
        (MathOperator::Cos, &[radians]) => cos_degrees(radians.to_degrees()),
        (MathOperator::Tan, &[radians]) => tan_degrees(radians.to_degrees()),
        (MathOperator::Asin, &[value]) => clamp_angle(value.asin().to_degrees(), -90.0, 90.0),
        (MathOperator::Acos, &[value]) => clamp_angle(value.acos().to_degrees(), 0.0, 180.0),
        (MathOperator::Atan, &[value]) => clamp_angle(value.atan().to_degrees(), -90.0, 90.0),
        (MathOperator::Atan2, &[y_value, x_value]) => y_value.atan2(x_value).to_degrees(),
        (
            MathOperator::Progress | MathOperator::MediaProgress | MathOperator::ContainerProgress,
            &[value, start, end],
        ) => (value - start) / (end - start),
        _ => f64::NAN,
    }
}

fn fold_min_max(values: &[f64], take_min: bool) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return f64::NAN;
    };
    iter.fold(first, |acc, value| {
        if acc.is_nan() || value.is_nan() {
            return f64::NAN;
        }
        // -0 sorts below +0.
        let value_first = if take_min {
            value < acc || (value == acc && value.is_sign_negative())
        } else {
            value > acc || (value == acc && acc.is_sign_negative())
        };
        if value_first { value } else { acc }
    })
}

/// `round(<strategy>, value, step)` including the infinity rules of CSS Values 4.
pub fn round_to_step(op: MathOperator, value: f64, step: f64) -> f64 {
    let step = step.abs();
    if step == 0.0 || value.is_nan() || step.is_nan() {
        return f64::NAN;
    }
    if value.is_infinite() {
        return if step.is_infinite() { f64::NAN } else { value };
    }
    if step.is_infinite() {
        let negative = value.is_sign_negative();
        return match op {
            MathOperator::RoundUp if !negative && value != 0.0 => f64::INFINITY,
            MathOperator::RoundDown if negative && value != 0.0 => f64::NEG_INFINITY,
            MathOperator::RoundUp | MathOperator::RoundDown if value == 0.0 => value,
            _ if negative => -0.0,
            _ => 0.0,
        };
    }

    let quotient = value / step;
    let lower = quotient.floor() * step;
    let upper = quotient.ceil() * step;
    match op {
        MathOperator::RoundUp => upper,
        MathOperator::RoundDown => lower,
        MathOperator::RoundToZero => {
            if lower.abs() < upper.abs() {
                lower
            } else {
                upper
            }
        }
        // Ties go to the upper bound.
        _ => {
            if value - lower < upper - value {
                lower
            } else {
                upper
            }
        }
    }
}

/// `mod()` (floored, sign of the divisor) or `rem()` (truncated, sign of the dividend).
pub fn modulo(dividend: f64, divisor: f64, floored: bool) -> f64 {
    if divisor.is_infinite() && dividend.is_finite() {
        if floored && dividend.is_sign_negative() != divisor.is_sign_negative() {
            return f64::NAN;
        }
        return dividend;
    }
    let (remainder, same_sign_as) = if floored {
        (dividend - divisor * (dividend / divisor).floor(), divisor)
    } else {
        (dividend - divisor * (dividend / divisor).trunc(), dividend)
    };
    if remainder == 0.0 && same_sign_as.is_sign_negative() {
        -0.0
    } else {
        remainder
    }
}

/// `sign()`: zeros and NaN come back unchanged, everything else is ±1.
pub fn sign(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        value
    } else if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

fn clamp_angle(degrees: f64, low: f64, high: f64) -> f64 {
    if degrees.is_nan() {
        return degrees;
    }
    degrees.clamp(low, high)
}

/// Sine of an angle in degrees, exact at multiples of 90°.
pub fn sin_degrees(degrees: f64) -> f64 {
    if degrees == 0.0 {
        return degrees;
    }
    match degrees.rem_euclid(360.0) {
        0.0 | 180.0 => 0.0,
        90.0 => 1.0,
        270.0 => -1.0,
        _ => (degrees * PI / 180.0).sin(),
    }
}

/// Cosine of an angle in degrees, exact at multiples of 90°.
pub fn cos_degrees(degrees: f64) -> f64 {
    match degrees.rem_euclid(360.0) {
        0.0 => 1.0,
        90.0 | 270.0 => 0.0,
        180.0 => -1.0,
        _ => (degrees * PI / 180.0).cos(),
    }
}

/// Tangent of an angle in degrees: ±∞ at odd multiples of 90°.
pub fn tan_degrees(degrees: f64) -> f64 {
    if degrees == 0.0 {
        return degrees;
    }
    match degrees.rem_euclid(360.0) {
        0.0 | 180.0 => 0.0,
        45.0 | 225.0 => 1.0,
        135.0 | 315.0 => -1.0,
        90.0 => f64::INFINITY,
        270.0 => f64::NEG_INFINITY,
        _ => (degrees * PI / 180.0).tan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Floored `mod` follows the divisor, truncated `rem` follows the dividend.
    fn mod_and_rem_signs() {
        assert_eq!(modulo(-3.0, 5.0, true), 2.0);
        assert_eq!(modulo(-3.0, 5.0, false), -3.0);
        assert_eq!(modulo(3.0, -5.0, true), -2.0);
        assert!(modulo(-3.0, f64::INFINITY, true).is_nan());
        assert_eq!(modulo(-3.0, f64::INFINITY, false), -3.0);
        assert!(modulo(5.0, -5.0, true).is_sign_negative());
    }

    #[test]
    /// An infinite divisor leaves a finite dividend of the same sign untouched.
    fn mod_by_infinity_keeps_dividend() {
        assert_eq!(modulo(3.0, f64::INFINITY, true), 3.0);
        assert_eq!(modulo(-3.0, f64::NEG_INFINITY, true), -3.0);
        assert_eq!(modulo(0.0, f64::INFINITY, true), 0.0);
        assert!(modulo(-0.0, f64::NEG_INFINITY, true).is_sign_negative());
        assert!(modulo(3.0, f64::NEG_INFINITY, true).is_nan());
        assert!(modulo(f64::INFINITY, f64::INFINITY, true).is_nan());
        assert_eq!(modulo(3.0, f64::NEG_INFINITY, false), 3.0);
    }

    #[test]
    /// A NaN operand makes every function NaN, including those libm would settle.
    fn nan_operands_poison_every_function() {
        assert!(evaluate_operator(MathOperator::Pow, &[1.0, f64::NAN]).is_nan());
        assert!(evaluate_operator(MathOperator::Pow, &[f64::NAN, 0.0]).is_nan());
        assert!(evaluate_operator(MathOperator::Hypot, &[f64::INFINITY, f64::NAN]).is_nan());
        assert!(evaluate_operator(MathOperator::Log, &[f64::NAN, 1.0]).is_nan());
        assert!(evaluate_operator(MathOperator::Clamp, &[f64::NAN, 1.0, 2.0]).is_nan());
    }

    #[test]
    /// Rounding strategies, tie-breaking and the infinite-step rules.
    fn rounding_strategies() {
        assert_eq!(round_to_step(MathOperator::RoundNearest, 2.5, 1.0), 3.0);
        assert_eq!(round_to_step(MathOperator::RoundNearest, -2.5, 1.0), -2.0);
        assert_eq!(round_to_step(MathOperator::RoundUp, 2.1, 1.0), 3.0);
        assert_eq!(round_to_step(MathOperator::RoundDown, -2.1, 1.0), -3.0);
        assert_eq!(round_to_step(MathOperator::RoundToZero, -2.7, 1.0), -2.0);
        assert!(round_to_step(MathOperator::RoundNearest, 1.0, 0.0).is_nan());
        assert!(round_to_step(MathOperator::RoundNearest, f64::INFINITY, f64::INFINITY).is_nan());
        assert_eq!(round_to_step(MathOperator::RoundUp, 5.0, f64::INFINITY), f64::INFINITY);
        assert_eq!(round_to_step(MathOperator::RoundDown, 5.0, f64::INFINITY), 0.0);
        assert!(round_to_step(MathOperator::RoundNearest, -5.0, f64::INFINITY).is_sign_negative());
        assert_eq!(round_to_step(MathOperator::RoundNearest, 17.0, 5.0), 15.0);
    }

    #[test]
    /// `sign` keeps zeros (with their sign bit) and NaN.
    fn sign_preserves_zero_and_nan() {
        assert_eq!(sign(5.0), 1.0);
        assert_eq!(sign(-5.0), -1.0);
        assert!(sign(-0.0).is_sign_negative() && sign(-0.0) == 0.0);
        assert!(sign(0.0).is_sign_positive() && sign(0.0) == 0.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    /// NaN poisons comparisons and clamp resolves conflicts toward the minimum.
    fn comparisons_propagate_nan() {
        assert!(evaluate_operator(MathOperator::Min, &[1.0, f64::NAN]).is_nan());
        assert_eq!(evaluate_operator(MathOperator::Max, &[1.0, 4.0, 2.0]), 4.0);
        assert_eq!(evaluate_operator(MathOperator::Clamp, &[10.0, 2.0, 20.0]), 10.0);
        assert_eq!(evaluate_operator(MathOperator::Clamp, &[10.0, 30.0, 5.0]), 10.0);
        assert!(evaluate_operator(MathOperator::Min, &[0.0, -0.0]).is_sign_negative());
    }

    #[test]
    /// Trigonometry is exact at the quarter turns.
    fn trigonometry_snaps_quarter_turns() {
        assert_eq!(sin_degrees(90.0), 1.0);
        assert_eq!(sin_degrees(180.0), 0.0);
        assert_eq!(cos_degrees(-90.0), 0.0);
        assert_eq!(tan_degrees(90.0), f64::INFINITY);
        assert_eq!(tan_degrees(-90.0), f64::NEG_INFINITY);
        assert_eq!(evaluate_operator(MathOperator::Asin, &[1.0]), 90.0);
        assert_eq!(evaluate_operator(MathOperator::Acos, &[-1.0]), 180.0);
        assert!(evaluate_operator(MathOperator::Asin, &[2.0]).is_nan());
        assert_eq!(evaluate_operator(MathOperator::Atan2, &[1.0, 0.0]), 90.0);
    }

    #[test]
    /// Exponential family and progress.
    fn exponential_and_progress() {
        assert_eq!(evaluate_operator(MathOperator::Pow, &[2.0, 10.0]), 1024.0);
        assert_eq!(evaluate_operator(MathOperator::Hypot, &[3.0, 4.0]), 5.0);
        assert!((evaluate_operator(MathOperator::Log, &[8.0, 2.0]) - 3.0).abs() < 1e-12);
        assert_eq!(evaluate_operator(MathOperator::Progress, &[5.0, 0.0, 10.0]), 0.5);
        assert!(evaluate_operator(MathOperator::Sqrt, &[1.0, 2.0]).is_nan());
    }

    #[test]
    /// Arity table drives argument collection.
    fn arity_table() {
        assert_eq!(MathOperator::Clamp.arity(), (3, 3));
        assert_eq!(MathOperator::Log.arity(), (1, 2));
        assert_eq!(MathOperator::Hypot.arity().0, 1);
        assert_eq!(MathOperator::from_function_name("ATAN2"), Some(MathOperator::Atan2));
        assert_eq!(MathOperator::from_function_name("calc"), None);
    }
}
