//! §10.7–§10.10 Operation construction, type inference and constant folding.
//! Spec: <https://www.w3.org/TR/css-values-4/#calc-simplification>
//!
//! Every factory returns `None` when the operands fail the type check; a node with
//! category `other` is never built.

use std::rc::Rc;

use smallvec::SmallVec;

use super::category::{CalculationCategory, add_subtract_category, common_category};
use super::literal::NumericLiteral;
use super::node::{
    AnchorQuery, AnchorQueryType, AnchorQueryValue, AnchorSpecifier, MathExpressionNode, NodeKind,
};
use super::operator::{
    MathOperator, cos_degrees, evaluate_operator, modulo, round_to_step, sign, sin_degrees,
    tan_degrees,
};
use crate::chapter_5_numeric_types::{UnitType, canonical_unit_for_category};

type Operands = SmallVec<Rc<MathExpressionNode>, 2>;

/// Result category of a binary arithmetic node, `Other` when the operands do not combine.
pub fn determine_category(
    left: &MathExpressionNode,
    right: &MathExpressionNode,
    op: MathOperator,
) -> CalculationCategory {
    let left_category = left.category();
    let right_category = right.category();
    if matches!(left_category, CalculationCategory::Identifier | CalculationCategory::Other)
        || matches!(right_category, CalculationCategory::Identifier | CalculationCategory::Other)
    {
        return CalculationCategory::Other;
    }
    match op {
        MathOperator::Add | MathOperator::Subtract => {
            add_subtract_category(left_category, right_category)
        }
        MathOperator::Multiply => {
            if left_category == CalculationCategory::Number {
                right_category
            } else if right_category == CalculationCategory::Number {
                left_category
            } else {
                CalculationCategory::Other
            }
        }
        MathOperator::Divide => {
            if right_category == CalculationCategory::Number {
                left_category
            } else {
                CalculationCategory::Other
            }
        }
        _ => CalculationCategory::Other,
    }
}

/// Whether the node is a literal whose canonical value is known without context.
///
/// Percentages are excluded: their basis may be negative, so comparing them early
/// could pick the wrong operand.
fn can_eagerly_simplify(node: &MathExpressionNode) -> bool {
    let Some(literal) = node.as_literal() else {
        return false;
    };
    matches!(
        literal.category(),
        CalculationCategory::Number
            | CalculationCategory::Length
            | CalculationCategory::Angle
            | CalculationCategory::Time
            | CalculationCategory::Frequency
            | CalculationCategory::Resolution
    ) && literal.compute_in_canonical_unit().is_some()
}

fn canonical_values(operands: &[Rc<MathExpressionNode>]) -> Option<Vec<f64>> {
    if !operands.iter().all(|operand| can_eagerly_simplify(operand)) {
        return None;
    }
    operands
        .iter()
        .map(|operand| operand.as_literal()?.compute_in_canonical_unit())
        .collect()
}

fn folded_literal(value: f64, category: CalculationCategory) -> Option<Rc<MathExpressionNode>> {
    let unit = category.canonical_unit()?;
    log::trace!(target: "css::values::math", "[CALC-FOLD] value={value} unit={unit:?}");
    MathExpressionNode::new_literal(value, unit)
}

fn fails(function: &str) -> Option<Rc<MathExpressionNode>> {
    log::debug!(target: "css::values::math", "[CALC-TYPE] type check failed function={function}");
    None
}

impl MathExpressionNode {
    /// Binary arithmetic node without any folding.
    pub fn create_arithmetic_operation(
        left: &Rc<Self>,
        right: &Rc<Self>,
        op: MathOperator,
    ) -> Option<Rc<Self>> {
        let category = determine_category(left, right, op);
        if category == CalculationCategory::Other {
            return fails(if op.is_additive() { "sum" } else { "product" });
        }
        Some(Self::new_operation(
            op,
            [Rc::clone(left), Rc::clone(right)].into_iter().collect(),
            category,
        ))
    }

    /// Binary arithmetic node, folded whenever both sides allow it.
    pub fn create_arithmetic_operation_simplified(
        left: &Rc<Self>,
        right: &Rc<Self>,
        op: MathOperator,
    ) -> Option<Rc<Self>> {
        let category = determine_category(left, right, op);
        if category == CalculationCategory::Other {
            return fails(if op.is_additive() { "sum" } else { "product" });
        }

        if let Some(distributed) = Self::maybe_distribute(left, right, op) {
            return Some(distributed);
        }

        let (Some(left_literal), Some(right_literal)) = (left.as_literal(), right.as_literal())
        else {
            return Some(Self::new_operation(
                op,
                [Rc::clone(left), Rc::clone(right)].into_iter().collect(),
                category,
            ));
        };

        let folded = match op {
            MathOperator::Add | MathOperator::Subtract => {
                fold_additive(left_literal, right_literal, op)
            }
            MathOperator::Multiply | MathOperator::Divide => {
                fold_multiplicative(left_literal, right_literal, op)
            }
            _ => None,
        };
        if let Some(literal) = folded {
            log::trace!(target: "css::values::math", "[CALC-FOLD] op={op:?} result={literal:?}");
            return Self::from_numeric_literal(literal);
        }
        Some(Self::new_operation(
            op,
            [Rc::clone(left), Rc::clone(right)].into_iter().collect(),
            category,
        ))
    }

    /// `(a ± b) * k`, `k * (a ± b)` and `(a ± b) / k` where `a` and `b` are literals.
    fn maybe_distribute(left: &Rc<Self>, right: &Rc<Self>, op: MathOperator) -> Option<Rc<Self>> {
        let (sum, factor, sum_on_left) = match op {
            MathOperator::Multiply | MathOperator::Divide
                if right.category() == CalculationCategory::Number =>
            {
                (left, right, true)
            }
            MathOperator::Multiply if left.category() == CalculationCategory::Number => {
                (right, left, false)
            }
            _ => return None,
        };
        if !factor.is_numeric_literal() {
            return None;
        }
        let operation = sum.as_operation()?;
        if !operation.op.is_additive()
            || !operation.operands.iter().all(|operand| operand.is_numeric_literal())
        {
            return None;
        }
        let [first, second] = operation.operands.as_slice() else {
            return None;
        };
        let distribute = |term: &Rc<Self>| {
            if sum_on_left {
                Self::create_arithmetic_operation_simplified(term, factor, op)
            } else {
                Self::create_arithmetic_operation_simplified(factor, term, op)
            }
        };
        let first = distribute(first)?;
        let second = distribute(second)?;
        let result = Self::create_arithmetic_operation_simplified(&first, &second, operation.op)?;
        log::trace!(target: "css::values::math", "[CALC-FOLD] distributed op={op:?}");
        Some(result.with_nested(true))
    }

    /// `min()`, `max()` or `clamp()`.
    pub fn create_comparison_function_simplified(
        operands: Operands,
        op: MathOperator,
    ) -> Option<Rc<Self>> {
        let category = common_category(operands.iter().map(|operand| operand.category()));
        if category == CalculationCategory::Other {
            return fails(op.function_name().unwrap_or("comparison"));
        }
        if let [only] = operands.as_slice() {
            return Some(Rc::clone(only));
        }
        if let Some(values) = canonical_values(&operands) {
            return folded_literal(evaluate_operator(op, &values), category);
        }
        Some(Self::new_operation(op, operands, category))
    }

    /// `round()`, `mod()` or `rem()`.
    pub fn create_stepped_value_function(operands: Operands, op: MathOperator) -> Option<Rc<Self>> {
        let [value, step] = operands.as_slice() else {
            return fails(op.function_name().unwrap_or("stepped"));
        };
        let category = add_subtract_category(value.category(), step.category());
        if category == CalculationCategory::Other {
            return fails(op.function_name().unwrap_or("stepped"));
        }
        if let Some(values) = canonical_values(&operands)
            && let [value, step] = values.as_slice()
        {
            let result = match op {
                MathOperator::Mod => modulo(*value, *step, true),
                MathOperator::Rem => modulo(*value, *step, false),
                _ => round_to_step(op, *value, *step),
            };
            return folded_literal(result, category);
        }
        Some(Self::new_operation(op, operands, category))
    }

    /// `sin()` … `atan2()`.
    pub fn create_trigonometric_function_simplified(
        operands: Operands,
        op: MathOperator,
    ) -> Option<Rc<Self>> {
        let name = op.function_name().unwrap_or("trigonometric");
        match (op, operands.as_slice()) {
            (MathOperator::Sin | MathOperator::Cos | MathOperator::Tan, [operand]) => {
                if !matches!(
                    operand.category(),
                    CalculationCategory::Number | CalculationCategory::Angle
                ) {
                    return fails(name);
                }
                if let Some(degrees) = angle_in_degrees(operand) {
                    let result = match op {
                        MathOperator::Sin => sin_degrees(degrees),
                        MathOperator::Cos => cos_degrees(degrees),
                        _ => tan_degrees(degrees),
                    };
                    return Self::new_literal(result, UnitType::Number);
                }
                Some(Self::new_operation(op, operands, CalculationCategory::Number))
            }
            (MathOperator::Asin | MathOperator::Acos | MathOperator::Atan, [operand]) => {
                if operand.category() != CalculationCategory::Number {
                    return fails(name);
                }
                if let Some(values) = canonical_values(&operands) {
                    return Self::new_literal(evaluate_operator(op, &values), UnitType::Degrees);
                }
                Some(Self::new_operation(op, operands, CalculationCategory::Angle))
            }
            (MathOperator::Atan2, [y_operand, x_operand]) => {
                let category = add_subtract_category(y_operand.category(), x_operand.category());
                if !matches!(
                    category,
                    CalculationCategory::Number
                        | CalculationCategory::Length
                        | CalculationCategory::Percent
                        | CalculationCategory::Time
                        | CalculationCategory::Frequency
                        | CalculationCategory::Angle
                        | CalculationCategory::Resolution
                ) {
                    return fails(name);
                }
                let raw = match (y_operand.as_literal(), x_operand.as_literal()) {
                    (Some(y_literal), Some(x_literal)) if y_literal.unit == x_literal.unit => {
                        Some(vec![y_literal.value, x_literal.value])
                    }
                    _ => canonical_values(&operands),
                };
                if let Some(values) = raw {
                    return Self::new_literal(evaluate_operator(op, &values), UnitType::Degrees);
                }
                Some(Self::new_operation(op, operands, CalculationCategory::Angle))
            }
            _ => fails(name),
        }
    }

    /// `pow()`, `sqrt()`, `log()`, `exp()` and `hypot()`.
    pub fn create_exponential_function(operands: Operands, op: MathOperator) -> Option<Rc<Self>> {
        let name = op.function_name().unwrap_or("exponential");
        let (min, max) = op.arity();
        if operands.len() < min || operands.len() > max || !op.is_exponential() {
            return fails(name);
        }
        let category = if op == MathOperator::Hypot {
            common_category(operands.iter().map(|operand| operand.category()))
        } else if operands
            .iter()
            .all(|operand| operand.category() == CalculationCategory::Number)
        {
            CalculationCategory::Number
        } else {
            CalculationCategory::Other
        };
        if category == CalculationCategory::Other {
            return fails(name);
        }
        if let Some(values) = canonical_values(&operands) {
            return folded_literal(evaluate_operator(op, &values), category);
        }
        Some(Self::new_operation(op, operands, category))
    }

    /// `abs()` or `sign()`.
    pub fn create_sign_related_function(operand: &Rc<Self>, op: MathOperator) -> Option<Rc<Self>> {
        let name = op.function_name().unwrap_or("sign");
        if matches!(
            operand.category(),
            CalculationCategory::Identifier | CalculationCategory::Other
        ) || !op.is_sign_related()
        {
            return fails(name);
        }
        let category = if op == MathOperator::Sign {
            CalculationCategory::Number
        } else {
            operand.category()
        };
        if can_eagerly_simplify(operand)
            && let Some(value) = operand
                .as_literal()
                .and_then(NumericLiteral::compute_in_canonical_unit)
        {
            let result = if op == MathOperator::Sign {
                sign(value)
            } else {
                value.abs()
            };
            return folded_literal(result, category);
        }
        Some(Self::new_operation(op, [Rc::clone(operand)].into_iter().collect(), category))
    }

    /// `progress(value from start to end)`.
    pub fn create_progress_function(
        value: &Rc<Self>,
        start: &Rc<Self>,
        end: &Rc<Self>,
    ) -> Option<Rc<Self>> {
        let category =
            common_category([value.category(), start.category(), end.category()]);
        if category == CalculationCategory::Other {
            return fails("progress");
        }
        let operands: Operands = [Rc::clone(value), Rc::clone(start), Rc::clone(end)]
            .into_iter()
            .collect();
        let literals: Option<Vec<&NumericLiteral>> =
            operands.iter().map(|operand| operand.as_literal()).collect();
        let raw = literals.and_then(|literals| {
            let unit = literals.first()?.unit;
            literals
                .iter()
                .all(|literal| literal.unit == unit)
                .then(|| literals.iter().map(|literal| literal.value).collect::<Vec<_>>())
        });
        if let Some(values) = raw.or_else(|| canonical_values(&operands)) {
            return Self::new_literal(
                evaluate_operator(MathOperator::Progress, &values),
                UnitType::Number,
            );
        }
        Some(Self::new_operation(
            MathOperator::Progress,
            operands,
            CalculationCategory::Number,
        ))
    }

    /// `media-progress(<feature> from start to end)`; resolved only at layout time.
    pub fn create_media_progress_function(
        feature: &Rc<Self>,
        start: &Rc<Self>,
        end: &Rc<Self>,
    ) -> Option<Rc<Self>> {
        if !matches!(feature.kind(), NodeKind::IdentifierLiteral(_))
            || common_category([start.category(), end.category()]) != CalculationCategory::Length
        {
            return fails("media-progress");
        }
        Some(Self::new_operation(
            MathOperator::MediaProgress,
            [Rc::clone(feature), Rc::clone(start), Rc::clone(end)].into_iter().collect(),
            CalculationCategory::Number,
        ))
    }

    /// `container-progress(<feature> [of <name>]? from start to end)`.
    ///
    /// The container name, when present, is stored as an identifier operand between
    /// the feature and the start value.
    pub fn create_container_progress_function(
        feature: &Rc<Self>,
        container_name: Option<&Rc<Self>>,
        start: &Rc<Self>,
        end: &Rc<Self>,
    ) -> Option<Rc<Self>> {
        let identifiers_ok = matches!(feature.kind(), NodeKind::IdentifierLiteral(_))
            && container_name
                .is_none_or(|name| matches!(name.kind(), NodeKind::IdentifierLiteral(_)));
        if !identifiers_ok
            || common_category([start.category(), end.category()]) != CalculationCategory::Length
        {
            return fails("container-progress");
        }
        let mut operands: Operands = [Rc::clone(feature)].into_iter().collect();
        if let Some(name) = container_name {
            operands.push(Rc::clone(name));
        }
        operands.push(Rc::clone(start));
        operands.push(Rc::clone(end));
        Some(Self::new_operation(
            MathOperator::ContainerProgress,
            operands,
            CalculationCategory::Number,
        ))
    }

    /// `anchor()` / `anchor-size()` leaf; the fallback must be a length-percentage.
    pub fn create_anchor_query(
        query_type: AnchorQueryType,
        specifier: AnchorSpecifier,
        value: AnchorQueryValue,
        fallback: Option<Rc<Self>>,
    ) -> Option<Rc<Self>> {
        let value_matches_type = match (query_type, value) {
            (AnchorQueryType::Anchor, AnchorQueryValue::Side(_) | AnchorQueryValue::Percentage(_))
            | (AnchorQueryType::AnchorSize, AnchorQueryValue::Size(_)) => true,
            (AnchorQueryType::Anchor, AnchorQueryValue::Size(_))
            | (
                AnchorQueryType::AnchorSize,
                AnchorQueryValue::Side(_) | AnchorQueryValue::Percentage(_),
            ) => false,
        };
        let fallback_ok = fallback.as_ref().is_none_or(|fallback| {
            matches!(
                fallback.category(),
                CalculationCategory::Length
                    | CalculationCategory::Percent
                    | CalculationCategory::PercentLength
            )
        });
        if !value_matches_type || !fallback_ok {
            return fails("anchor");
        }
        Some(Self::new_anchor_query(AnchorQuery {
            query_type,
            specifier,
            value,
            fallback,
        }))
    }
}

/// Input of a forward trigonometric function in degrees; bare numbers are radians.
fn angle_in_degrees(operand: &MathExpressionNode) -> Option<f64> {
    if !can_eagerly_simplify(operand) {
        return None;
    }
    let literal = operand.as_literal()?;
    if literal.category() == CalculationCategory::Number {
        Some(literal.value.to_degrees())
    } else {
        literal.compute_in_canonical_unit()
    }
}

fn fold_additive(
    left: &NumericLiteral,
    right: &NumericLiteral,
    op: MathOperator,
) -> Option<NumericLiteral> {
    let apply = |lhs: f64, rhs: f64| evaluate_operator(op, &[lhs, rhs]);
    if left.category() == CalculationCategory::Number
        && right.category() == CalculationCategory::Number
    {
        let unit = if left.unit == UnitType::Integer && right.unit == UnitType::Integer {
            UnitType::Integer
        } else {
            UnitType::Number
        };
        return Some(NumericLiteral {
            value: apply(left.value, right.value),
            unit,
        });
    }
    if left.unit == right.unit {
        return Some(NumericLiteral {
            value: apply(left.value, right.value),
            unit: left.unit,
        });
    }
    let family = left.unit.unit_category();
    if family != right.unit.unit_category() {
        return None;
    }
    let canonical = canonical_unit_for_category(family)?;
    let left_factor = left.unit.conversion_to_canonical_units_scale_factor();
    let right_factor = right.unit.conversion_to_canonical_units_scale_factor();
    if !left_factor.is_finite() || !right_factor.is_finite() {
        return None;
    }
    Some(NumericLiteral {
        value: apply(left.value * left_factor, right.value * right_factor),
        unit: canonical,
    })
}

fn fold_multiplicative(
    left: &NumericLiteral,
    right: &NumericLiteral,
    op: MathOperator,
) -> Option<NumericLiteral> {
    let left_is_number = left.category() == CalculationCategory::Number;
    let right_is_number = right.category() == CalculationCategory::Number;
    let value = evaluate_operator(op, &[left.value, right.value]);
    if left_is_number && right_is_number {
        let unit = if op == MathOperator::Multiply
            && left.unit == UnitType::Integer
            && right.unit == UnitType::Integer
        {
            UnitType::Integer
        } else {
            UnitType::Number
        };
        return Some(NumericLiteral { value, unit });
    }
    if right_is_number {
        return Some(NumericLiteral {
            value,
            unit: left.unit,
        });
    }
    // A number can only be the dividend of a unitless quotient.
    if left_is_number && op == MathOperator::Multiply {
        return Some(NumericLiteral {
            value,
            unit: right.unit,
        });
    }
    None
}
