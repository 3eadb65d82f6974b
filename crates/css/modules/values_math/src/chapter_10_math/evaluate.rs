//! Evaluation backends.
//!
//! The same tree can be asked for an immediate canonical value, a pixels-plus-percent
//! pair, or a deferred [`CalculationExpression`] for layout time.

use core::f64::consts::PI;
use std::rc::Rc;

use smallvec::SmallVec;

use super::category::{CalculationCategory, common_category};
use super::literal::NumericLiteral;
use super::node::{MathExpressionNode, NodeKind, Operation};
use super::operator::{MathOperator, cos_degrees, evaluate_operator, sin_degrees, tan_degrees};
use crate::calculation::{
    AnchorQueryExpression, CalculationExpression, CalculationValue, PixelsAndPercent, ValueRange,
};
use crate::chapter_5_numeric_types::UnitType;
use crate::chapter_6_distance_units::{LengthResolver, ViewportKind, compute_length_px};
use crate::clamping::clamp_length;

/// Pixel size of a `media-progress()` / `container-progress()` feature, zoomed.
fn progress_feature_px(
    op: MathOperator,
    feature: &str,
    resolver: &dyn LengthResolver,
) -> Option<f64> {
    let size = match op {
        MathOperator::MediaProgress => resolver.viewport_size(ViewportKind::Default),
        MathOperator::ContainerProgress => resolver
            .container_size()
            .unwrap_or_else(|| resolver.viewport_size(ViewportKind::Small)),
        _ => return None,
    };
    let (width, height) = size;
    let horizontal = resolver.is_horizontal_writing_mode();
    let css_pixels = match feature {
        "width" => width,
        "height" => height,
        "inline-size" if horizontal => width,
        "inline-size" => height,
        "block-size" if horizontal => height,
        "block-size" => width,
        _ => return None,
    };
    Some(resolver.zoomed_pixels(css_pixels))
}

/// Feature name and the start/end operands of a progress-in-context operation.
fn progress_parts(
    operation: &Operation,
) -> Option<(&str, &Rc<MathExpressionNode>, &Rc<MathExpressionNode>)> {
    let (feature, start, end) = match operation.operands.as_slice() {
        [feature, start, end] | [feature, _, start, end] => (feature, start, end),
        _ => return None,
    };
    match feature.kind() {
        NodeKind::IdentifierLiteral(name) => Some((name.as_str(), start, end)),
        _ => None,
    }
}

impl MathExpressionNode {
    /// Value in the canonical unit of the node's category, when no context is needed.
    ///
    /// Fails for percent-length and identifier categories, relative units, anchor
    /// queries, and media/container progress.
    pub fn compute_value_in_canonical_unit(&self) -> Option<f64> {
        self.category().canonical_unit()?;
        self.evaluate_with(
            &|literal_node| {
                literal_node
                    .as_literal()
                    .and_then(NumericLiteral::compute_in_canonical_unit)
            },
            None,
        )
    }

    /// Value with relative lengths resolved through `resolver`; lengths come out in
    /// zoomed pixels, other categories in their canonical unit. Percentages and
    /// anchor queries are unavailable.
    pub fn compute_value_with_resolver(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.evaluate_with(
            &|literal_node| {
                let literal = literal_node.as_literal()?;
                match literal.category() {
                    CalculationCategory::Length => {
                        compute_length_px(literal.value, literal.unit, resolver)
                    }
                    CalculationCategory::Percent => None,
                    _ => literal.compute_in_canonical_unit(),
                }
            },
            Some(resolver),
        )
    }

    /// Shared recursive evaluator; `leaf` maps literal nodes to numbers.
    fn evaluate_with(
        &self,
        leaf: &dyn Fn(&Self) -> Option<f64>,
        resolver: Option<&dyn LengthResolver>,
    ) -> Option<f64> {
        match self.kind() {
            NodeKind::NumericLiteral(_) => leaf(self),
            NodeKind::IdentifierLiteral(_) | NodeKind::AnchorQuery(_) => None,
            NodeKind::Operation(operation) => match operation.op {
                MathOperator::Sin | MathOperator::Cos | MathOperator::Tan => {
                    let operand = operation.operands.first()?;
                    let value = operand.evaluate_with(leaf, resolver)?;
                    let degrees = if operand.category() == CalculationCategory::Angle {
                        value
                    } else {
                        value.to_degrees()
                    };
                    Some(match operation.op {
                        MathOperator::Sin => sin_degrees(degrees),
                        MathOperator::Cos => cos_degrees(degrees),
                        _ => tan_degrees(degrees),
                    })
                }
                MathOperator::MediaProgress | MathOperator::ContainerProgress => {
                    let (feature, start, end) = progress_parts(operation)?;
                    let feature_px = progress_feature_px(operation.op, feature, resolver?)?;
                    let start = start.evaluate_with(leaf, resolver)?;
                    let end = end.evaluate_with(leaf, resolver)?;
                    Some(evaluate_operator(MathOperator::Progress, &[feature_px, start, end]))
                }
                op => {
                    let values = operation
                        .operands
                        .iter()
                        .map(|operand| operand.evaluate_with(leaf, resolver))
                        .collect::<Option<Vec<f64>>>()?;
                    Some(evaluate_operator(op, &values))
                }
            },
        }
    }

    /// Zoomed pixel value of a length (or number) tree.
    pub fn compute_length_px(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        match self.category() {
            CalculationCategory::Length | CalculationCategory::Number => {
                self.compute_value_with_resolver(resolver)
            }
            _ => None,
        }
    }

    /// Number value of a number-category tree, resolving relative units if needed.
    pub fn compute_number(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        if self.category() != CalculationCategory::Number {
            return None;
        }
        self.compute_value_in_canonical_unit()
            .or_else(|| self.compute_value_with_resolver(resolver))
    }

    /// `pixels + percent` form of a linear length-percentage tree.
    ///
    /// Only `+ - * /` over lengths, percentages and numbers qualify; bare numbers
    /// count as pixels. Factors and divisors must be literal arithmetic, so a
    /// `sign()`, `round()` or `progress()` factor leaves the tree to the deferred form.
    pub fn to_pixels_and_percent(&self, resolver: &dyn LengthResolver) -> Option<PixelsAndPercent> {
        match self.kind() {
            NodeKind::NumericLiteral(literal) => match literal.category() {
                CalculationCategory::Length => {
                    let pixels = compute_length_px(literal.value, literal.unit, resolver)?;
                    Some(PixelsAndPercent::pixels(pixels as f32))
                }
                CalculationCategory::Percent => {
                    Some(PixelsAndPercent::percent(literal.value as f32))
                }
                CalculationCategory::Number => Some(PixelsAndPercent::pixels(
                    (literal.value * resolver.zoom()) as f32,
                )),
                _ => None,
            },
            NodeKind::IdentifierLiteral(_) | NodeKind::AnchorQuery(_) => None,
            NodeKind::Operation(operation) => {
                let [left, right] = operation.operands.as_slice() else {
                    return None;
                };
                match operation.op {
                    MathOperator::Add => {
                        Some(left.to_pixels_and_percent(resolver)? + right.to_pixels_and_percent(resolver)?)
                    }
                    MathOperator::Subtract => {
                        Some(left.to_pixels_and_percent(resolver)? - right.to_pixels_and_percent(resolver)?)
                    }
                    MathOperator::Multiply => {
                        let (value, factor) = if right.category() == CalculationCategory::Number {
                            (left, right)
                        } else {
                            (right, left)
                        };
                        let factor = factor.literal_number()?;
                        Some(value.to_pixels_and_percent(resolver)?.scale(factor as f32))
                    }
                    MathOperator::Divide => {
                        let divisor = right.literal_number()?;
                        Some(left.to_pixels_and_percent(resolver)?.scale((1.0 / divisor) as f32))
                    }
                    _ => None,
                }
            }
        }
    }

    /// Value of a number built only from numeric literals and `+ - * /`.
    fn literal_number(&self) -> Option<f64> {
        match self.kind() {
            NodeKind::NumericLiteral(literal)
                if literal.category() == CalculationCategory::Number =>
            {
                Some(literal.value)
            }
            NodeKind::Operation(operation) if operation.op.is_arithmetic() => {
                let values = operation
                    .operands
                    .iter()
                    .map(|operand| operand.literal_number())
                    .collect::<Option<SmallVec<f64, 2>>>()?;
                Some(evaluate_operator(operation.op, &values))
            }
            _ => None,
        }
    }

    /// Lower the tree into a deferred calculation; lengths become zoomed pixels.
    pub fn to_calculation_expression(
        &self,
        resolver: &dyn LengthResolver,
    ) -> Rc<CalculationExpression> {
        if matches!(
            self.category(),
            CalculationCategory::Length
                | CalculationCategory::Percent
                | CalculationCategory::PercentLength
        ) && let Some(pair) = self.to_pixels_and_percent(resolver)
        {
            return Rc::new(CalculationExpression::PixelsAndPercent(pair));
        }

        match self.kind() {
            NodeKind::NumericLiteral(literal) => {
                let expression = match literal.category() {
                    CalculationCategory::Length => {
                        let pixels = compute_length_px(literal.value, literal.unit, resolver)
                            .unwrap_or_else(|| {
                                log::warn!(target: "css::values::math", "[CALC-EVAL] unresolved length unit={:?}", literal.unit);
                                f64::NAN
                            });
                        CalculationExpression::PixelsAndPercent(PixelsAndPercent::pixels(pixels as f32))
                    }
                    CalculationCategory::Percent => CalculationExpression::PixelsAndPercent(
                        PixelsAndPercent::percent(literal.value as f32),
                    ),
                    _ => CalculationExpression::Number(
                        literal.compute_in_canonical_unit().unwrap_or(literal.value) as f32,
                    ),
                };
                Rc::new(expression)
            }
            NodeKind::IdentifierLiteral(_) => Rc::new(CalculationExpression::Number(0.0)),
            NodeKind::AnchorQuery(query) => {
                Rc::new(CalculationExpression::AnchorQuery(AnchorQueryExpression {
                    query_type: query.query_type,
                    specifier: query.specifier.clone(),
                    value: query.value,
                    fallback: query
                        .fallback
                        .as_ref()
                        .map(|fallback| fallback.to_calculation_expression(resolver)),
                }))
            }
            NodeKind::Operation(operation) => {
                if matches!(
                    operation.op,
                    MathOperator::MediaProgress | MathOperator::ContainerProgress
                ) && let Some((feature, start, end)) = progress_parts(operation)
                {
                    let feature_px =
                        progress_feature_px(operation.op, feature, resolver).unwrap_or(f64::NAN);
                    return CalculationExpression::create_simplified(
                        MathOperator::Progress,
                        vec![
                            Rc::new(CalculationExpression::PixelsAndPercent(
                                PixelsAndPercent::pixels(feature_px as f32),
                            )),
                            start.to_calculation_expression(resolver),
                            end.to_calculation_expression(resolver),
                        ],
                    );
                }
                let children = operation
                    .operands
                    .iter()
                    .map(|operand| {
                        let child = operand.to_calculation_expression(resolver);
                        // Deferred trigonometry works in radians.
                        if matches!(
                            operation.op,
                            MathOperator::Sin | MathOperator::Cos | MathOperator::Tan
                        ) && operand.category() == CalculationCategory::Angle
                        {
                            let to_radians = Rc::new(CalculationExpression::Number((PI / 180.0) as f32));
                            CalculationExpression::create_simplified(
                                MathOperator::Multiply,
                                vec![child, to_radians],
                            )
                        } else {
                            child
                        }
                    })
                    .collect();
                CalculationExpression::create_simplified(operation.op, children)
            }
        }
    }

    /// Final value for a length-percentage property, with non-finite results clamped.
    ///
    /// A deferred tree that evaluates to NaN or ±∞ (probed against a basis of 1, and of
    /// -1 when negative bases are allowed) collapses into a clamped pair.
    pub fn to_calc_value(
        &self,
        resolver: &dyn LengthResolver,
        range: ValueRange,
        allows_negative_percentage_reference: bool,
    ) -> CalculationValue {
        if let Some(pair) = self.to_pixels_and_percent(resolver) {
            let clamped = PixelsAndPercent::new(
                clamp_length(f64::from(pair.pixels)),
                clamp_length(f64::from(pair.percent)),
            );
            return CalculationValue::create(clamped, range);
        }
        let expression = self.to_calculation_expression(resolver);
        let mut probes = vec![1.0_f32];
        if allows_negative_percentage_reference {
            probes.push(-1.0);
        }
        if !expression.has_anchor_queries() {
            for basis in probes {
                let value = expression.evaluate(basis, None);
                if !value.is_finite() {
                    log::debug!(target: "css::values::math", "[CALC-EVAL] non-finite result={value} basis={basis}");
                    let clamped = clamp_length(f64::from(value));
                    return CalculationValue::create(PixelsAndPercent::new(clamped, clamped), range);
                }
            }
        }
        CalculationValue::create_simplified(expression, range)
    }

    /// Expression tree equivalent to a resolved pair: `percent ± |pixels|`.
    pub fn from_pixels_and_percent(value: PixelsAndPercent) -> Option<Rc<Self>> {
        if value.percent == 0.0 {
            return Self::new_literal(f64::from(value.pixels), UnitType::Pixels);
        }
        let percent = Self::new_literal(f64::from(value.percent), UnitType::Percentage)?;
        if value.pixels == 0.0 {
            return Some(percent);
        }
        let pixels = Self::new_literal(f64::from(value.pixels.abs()), UnitType::Pixels)?;
        let op = if value.pixels < 0.0 {
            MathOperator::Subtract
        } else {
            MathOperator::Add
        };
        Self::create_arithmetic_operation(&percent, &pixels, op)
    }

    /// Rebuild an expression tree from a deferred calculation.
    ///
    /// Supports arithmetic, comparison, stepped, `hypot()`, `abs()`, `sign()` and anchor
    /// queries; anything else yields `None`.
    pub fn from_calculation_expression(expression: &CalculationExpression) -> Option<Rc<Self>> {
        match expression {
            CalculationExpression::PixelsAndPercent(pair) => Self::from_pixels_and_percent(*pair),
            CalculationExpression::Number(value) => {
                Self::new_literal(f64::from(*value), UnitType::Number)
            }
            CalculationExpression::AnchorQuery(query) => {
                let fallback = match &query.fallback {
                    Some(fallback) => Some(Self::from_calculation_expression(fallback)?),
                    None => None,
                };
                Self::create_anchor_query(
                    query.query_type,
                    query.specifier.clone(),
                    query.value,
                    fallback,
                )
            }
            CalculationExpression::Operation { op, children } => {
                let operands = children
                    .iter()
                    .map(|child| Self::from_calculation_expression(child))
                    .collect::<Option<SmallVec<Rc<Self>, 2>>>()?;
                match (op, operands.as_slice()) {
                    (_, [left, right]) if op.is_arithmetic() => {
                        Self::create_arithmetic_operation(left, right, *op)
                    }
                    (MathOperator::Abs | MathOperator::Sign, [operand]) => {
                        Self::create_sign_related_function(operand, *op)
                    }
                    _ if op.is_comparison() || op.is_stepped() || *op == MathOperator::Hypot => {
                        let (min, max) = op.arity();
                        let category =
                            common_category(operands.iter().map(|operand| operand.category()));
                        if operands.len() < min
                            || operands.len() > max
                            || category == CalculationCategory::Other
                        {
                            return None;
                        }
                        Some(Self::new_operation(*op, operands, category))
                    }
                    _ => None,
                }
            }
        }
    }

    pub fn from_calculation_value(value: &CalculationValue) -> Option<Rc<Self>> {
        match value.pixels_and_percent() {
            Some(pair) => Self::from_pixels_and_percent(pair),
            None => Self::from_calculation_expression(&value.expression()),
        }
    }
}
