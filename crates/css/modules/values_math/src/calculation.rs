//! Layout-time calculation values.
//!
//! A math expression that cannot be resolved while computing style is lowered into a
//! [`CalculationExpression`]: lengths are already in zoomed pixels, percentages stay
//! symbolic, and anchor queries wait for an [`AnchorEvaluator`].

use core::ops::{Add, Sub};
use std::rc::Rc;

use crate::chapter_10_math::operator::evaluate_operator;
use crate::chapter_10_math::{AnchorQueryType, AnchorQueryValue, AnchorSpecifier, MathOperator};
use crate::clamping::clamp_length_f32;

/// `pixels + percent%`, the compact form of a length-percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelsAndPercent {
    pub pixels: f32,
    pub percent: f32,
}

impl PixelsAndPercent {
    pub const fn new(pixels: f32, percent: f32) -> Self {
        Self { pixels, percent }
    }

    pub const fn pixels(pixels: f32) -> Self {
        Self {
            pixels,
            percent: 0.0,
        }
    }

    pub const fn percent(percent: f32) -> Self {
        Self {
            pixels: 0.0,
            percent,
        }
    }

    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            pixels: self.pixels * factor,
            percent: self.percent * factor,
        }
    }

    /// Resolve against the percentage basis.
    pub fn resolve(self, max_value: f32) -> f32 {
        self.pixels + self.percent / 100.0 * max_value
    }
}

impl Add for PixelsAndPercent {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            pixels: self.pixels + rhs.pixels,
            percent: self.percent + rhs.percent,
        }
    }
}

impl Sub for PixelsAndPercent {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            pixels: self.pixels - rhs.pixels,
            percent: self.percent - rhs.percent,
        }
    }
}

/// Range a resolved value is clamped into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueRange {
    #[default]
    All,
    NonNegative,
}

impl ValueRange {
    pub fn clamp(self, value: f32) -> f32 {
        match self {
            Self::All => value,
            Self::NonNegative => value.max(0.0),
        }
    }
}

/// Deferred `anchor()` / `anchor-size()` query.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorQueryExpression {
    pub query_type: AnchorQueryType,
    pub specifier: AnchorSpecifier,
    pub value: AnchorQueryValue,
    pub fallback: Option<Rc<CalculationExpression>>,
}

/// Resolves anchor queries once the anchor's geometry is known.
pub trait AnchorEvaluator {
    /// Pixel value of the query, or `None` if the anchor cannot be resolved.
    fn evaluate(&self, query: &AnchorQueryExpression) -> Option<f32>;
}

/// Symbolic calculation tree, evaluated against a percentage basis at layout time.
#[derive(Clone, Debug, PartialEq)]
pub enum CalculationExpression {
    PixelsAndPercent(PixelsAndPercent),
    Number(f32),
    AnchorQuery(AnchorQueryExpression),
    Operation {
        op: MathOperator,
        children: Vec<Rc<CalculationExpression>>,
    },
}

impl CalculationExpression {
    /// Build an operation, folding it when the children allow.
    ///
    /// Additive and multiplicative arithmetic folds over pixel/percent pairs. Any other
    /// operator folds only when every child is a number; `progress()` also folds over
    /// pure pixel values.
    pub fn create_simplified(op: MathOperator, children: Vec<Rc<Self>>) -> Rc<Self> {
        if let Some(folded) = Self::fold(op, &children) {
            log::trace!(target: "css::values::calculation", "[CALC-FOLD] op={op:?} result={folded:?}");
            return Rc::new(folded);
        }
        Rc::new(Self::Operation { op, children })
    }

    fn fold(op: MathOperator, children: &[Rc<Self>]) -> Option<Self> {
        match (op, children) {
            (MathOperator::Add, [left, right]) => match (left.as_ref(), right.as_ref()) {
                (Self::PixelsAndPercent(lhs), Self::PixelsAndPercent(rhs)) => {
                    return Some(Self::PixelsAndPercent(*lhs + *rhs));
                }
                (Self::Number(lhs), Self::Number(rhs)) => return Some(Self::Number(lhs + rhs)),
                _ => return None,
            },
            (MathOperator::Subtract, [left, right]) => match (left.as_ref(), right.as_ref()) {
                (Self::PixelsAndPercent(lhs), Self::PixelsAndPercent(rhs)) => {
                    return Some(Self::PixelsAndPercent(*lhs - *rhs));
                }
                (Self::Number(lhs), Self::Number(rhs)) => return Some(Self::Number(lhs - rhs)),
                _ => return None,
            },
            (MathOperator::Multiply, [left, right]) => match (left.as_ref(), right.as_ref()) {
                (Self::PixelsAndPercent(value), Self::Number(factor))
                | (Self::Number(factor), Self::PixelsAndPercent(value)) => {
                    return Some(Self::PixelsAndPercent(value.scale(*factor)));
                }
                (Self::Number(lhs), Self::Number(rhs)) => return Some(Self::Number(lhs * rhs)),
                _ => return None,
            },
            (MathOperator::Divide, [left, right]) => match (left.as_ref(), right.as_ref()) {
                (Self::PixelsAndPercent(value), Self::Number(divisor)) => {
                    return Some(Self::PixelsAndPercent(value.scale(1.0 / *divisor)));
                }
                (Self::Number(lhs), Self::Number(rhs)) => return Some(Self::Number(lhs / rhs)),
                _ => return None,
            },
            _ => {}
        }

        let mut values = Vec::with_capacity(children.len());
        for child in children {
            match child.as_ref() {
                Self::Number(value) => values.push(f64::from(*value)),
                Self::PixelsAndPercent(pair)
                    if op == MathOperator::Progress && pair.percent == 0.0 =>
                {
                    values.push(f64::from(pair.pixels));
                }
                _ => return None,
            }
        }
        Some(Self::Number(evaluate_operator(op, &values) as f32))
    }

    /// Resolve against `max_value` (the percentage basis).
    pub fn evaluate(&self, max_value: f32, anchor_evaluator: Option<&dyn AnchorEvaluator>) -> f32 {
        match self {
            Self::PixelsAndPercent(pair) => pair.resolve(max_value),
            Self::Number(value) => *value,
            Self::AnchorQuery(query) => anchor_evaluator
                .and_then(|evaluator| evaluator.evaluate(query))
                .or_else(|| {
                    query
                        .fallback
                        .as_ref()
                        .map(|fallback| fallback.evaluate(max_value, anchor_evaluator))
                })
                .unwrap_or(0.0),
            Self::Operation { op, children } => {
                let values: Vec<f64> = children
                    .iter()
                    .map(|child| f64::from(child.evaluate(max_value, anchor_evaluator)))
                    .collect();
                evaluate_operator(*op, &values) as f32
            }
        }
    }

    pub fn has_anchor_queries(&self) -> bool {
        match self {
            Self::PixelsAndPercent(_) | Self::Number(_) => false,
            Self::AnchorQuery(_) => true,
            Self::Operation { children, .. } => {
                children.iter().any(|child| child.has_anchor_queries())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CalculationData {
    PixelsAndPercent(PixelsAndPercent),
    Expression(Rc<CalculationExpression>),
}

/// A resolved `calc()` length, either a compact pair or a deferred tree.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculationValue {
    data: CalculationData,
    range: ValueRange,
}

impl CalculationValue {
    pub fn create(value: PixelsAndPercent, range: ValueRange) -> Self {
        Self {
            data: CalculationData::PixelsAndPercent(value),
            range,
        }
    }

    /// Store `expression`, collapsing it to a pair when it is one.
    pub fn create_simplified(expression: Rc<CalculationExpression>, range: ValueRange) -> Self {
        if let CalculationExpression::PixelsAndPercent(pair) = expression.as_ref() {
            return Self::create(*pair, range);
        }
        Self {
            data: CalculationData::Expression(expression),
            range,
        }
    }

    /// Resolve against the percentage basis, clamped into the value range.
    pub fn evaluate(&self, max_value: f32, anchor_evaluator: Option<&dyn AnchorEvaluator>) -> f32 {
        let value = match &self.data {
            CalculationData::PixelsAndPercent(pair) => pair.resolve(max_value),
            CalculationData::Expression(expression) => {
                expression.evaluate(max_value, anchor_evaluator)
            }
        };
        self.range.clamp(clamp_length_f32(value))
    }

    pub fn pixels_and_percent(&self) -> Option<PixelsAndPercent> {
        match &self.data {
            CalculationData::PixelsAndPercent(pair) => Some(*pair),
            CalculationData::Expression(_) => None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self.data, CalculationData::Expression(_))
    }

    /// The value as an expression tree (a pair becomes a single leaf).
    pub fn expression(&self) -> Rc<CalculationExpression> {
        match &self.data {
            CalculationData::PixelsAndPercent(pair) => {
                Rc::new(CalculationExpression::PixelsAndPercent(*pair))
            }
            CalculationData::Expression(expression) => Rc::clone(expression),
        }
    }

    pub const fn range(&self) -> ValueRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(pixels: f32, percent: f32) -> Rc<CalculationExpression> {
        Rc::new(CalculationExpression::PixelsAndPercent(PixelsAndPercent::new(pixels, percent)))
    }

    fn number(value: f32) -> Rc<CalculationExpression> {
        Rc::new(CalculationExpression::Number(value))
    }

    struct FixedAnchor(f32);

    impl AnchorEvaluator for FixedAnchor {
        fn evaluate(&self, _query: &AnchorQueryExpression) -> Option<f32> {
            Some(self.0)
        }
    }

    #[test]
    /// Linear arithmetic over pairs folds into one pair.
    fn arithmetic_folds_pairs() {
        let sum = CalculationExpression::create_simplified(
            MathOperator::Add,
            vec![pair(10.0, 0.0), pair(0.0, 50.0)],
        );
        let doubled =
            CalculationExpression::create_simplified(MathOperator::Multiply, vec![sum, number(2.0)]);
        assert_eq!(
            *doubled,
            CalculationExpression::PixelsAndPercent(PixelsAndPercent::new(20.0, 100.0))
        );
    }

    #[test]
    /// Comparisons over percentages stay symbolic and resolve against the basis.
    fn comparisons_with_percent_stay_deferred() {
        let min = CalculationExpression::create_simplified(
            MathOperator::Min,
            vec![pair(0.0, 50.0), pair(100.0, 0.0)],
        );
        assert!(matches!(*min, CalculationExpression::Operation { .. }));
        assert_eq!(min.evaluate(100.0, None), 50.0);
        assert_eq!(min.evaluate(400.0, None), 100.0);

        let pure = CalculationExpression::create_simplified(
            MathOperator::Max,
            vec![pair(3.0, 0.0), pair(7.0, 0.0)],
        );
        assert!(matches!(*pure, CalculationExpression::Operation { .. }));
        assert_eq!(pure.evaluate(0.0, None), 7.0);

        let numbers =
            CalculationExpression::create_simplified(MathOperator::Max, vec![number(3.0), number(7.0)]);
        assert_eq!(*numbers, CalculationExpression::Number(7.0));
    }

    #[test]
    /// Progress folds pixel operands into a number; `sign` of a length stays symbolic.
    fn only_progress_folds_pixel_operands() {
        let progress = CalculationExpression::create_simplified(
            MathOperator::Progress,
            vec![pair(50.0, 0.0), pair(0.0, 0.0), pair(200.0, 0.0)],
        );
        assert_eq!(*progress, CalculationExpression::Number(0.25));

        let sign = CalculationExpression::create_simplified(MathOperator::Sign, vec![pair(11.0, 0.0)]);
        let scaled =
            CalculationExpression::create_simplified(MathOperator::Multiply, vec![pair(10.0, 0.0), sign]);
        assert!(matches!(*scaled, CalculationExpression::Operation { .. }));
        assert_eq!(scaled.evaluate(0.0, None), 10.0);
    }

    #[test]
    /// Anchor queries use the evaluator first, then the fallback, then zero.
    fn anchor_queries_resolve_through_evaluator() {
        let query = Rc::new(CalculationExpression::AnchorQuery(AnchorQueryExpression {
            query_type: AnchorQueryType::Anchor,
            specifier: AnchorSpecifier::Default,
            value: AnchorQueryValue::Side(crate::chapter_10_math::AnchorSide::Top),
            fallback: Some(pair(5.0, 0.0)),
        }));
        assert!(query.has_anchor_queries());
        assert_eq!(query.evaluate(0.0, None), 5.0);
        assert_eq!(query.evaluate(0.0, Some(&FixedAnchor(42.0))), 42.0);
    }

    #[test]
    /// Non-negative values clamp at zero and infinities stay finite.
    fn calculation_value_clamps() {
        let value = CalculationValue::create(PixelsAndPercent::new(-10.0, 0.0), ValueRange::NonNegative);
        assert_eq!(value.evaluate(100.0, None), 0.0);
        let infinite = CalculationValue::create_simplified(
            CalculationExpression::create_simplified(
                MathOperator::Max,
                vec![pair(1.0, 0.0), pair(f32::INFINITY, 0.0)],
            ),
            ValueRange::All,
        );
        assert!(infinite.is_expression());
        assert_eq!(infinite.evaluate(0.0, None), f32::MAX);
    }
}
