//! Tests for the node factories: type checking, eager folding and distribution.

use super::*;
use crate::chapter_5_numeric_types::UnitType;

fn literal(value: f64, unit: UnitType) -> Option<Rc<MathExpressionNode>> {
    MathExpressionNode::new_literal(value, unit)
}

#[test]
/// Absolute lengths fold across units into pixels.
///
/// # Panics
/// Panics if folding produces the wrong literal.
fn absolute_lengths_fold_to_pixels() {
    let inch = literal(1.0, UnitType::Inches);
    let sum = inch.as_ref().and_then(|inch| {
        MathExpressionNode::create_arithmetic_operation_simplified(inch, inch, MathOperator::Add)
    });
    assert_eq!(
        sum.as_deref().and_then(MathExpressionNode::as_literal).copied(),
        Some(NumericLiteral {
            value: 192.0,
            unit: UnitType::Pixels,
        })
    );

    let centimeter = literal(1.0, UnitType::Centimeters).unwrap();
    let millimeter = literal(1.0, UnitType::Millimeters).unwrap();
    let sum = MathExpressionNode::create_arithmetic_operation_simplified(
        &centimeter,
        &millimeter,
        MathOperator::Add,
    );
    assert_close(sum.and_then(|node| node.double_value()), 96.0 / 2.54 * 1.1);
}

#[test]
/// Relative lengths only fold with the same unit; mixes stay as operations.
///
/// # Panics
/// Panics if a relative length is folded into pixels.
fn relative_lengths_keep_their_unit() {
    let one_em = literal(1.0, UnitType::Ems).unwrap();
    let two_em = literal(2.0, UnitType::Ems).unwrap();
    let one_px = literal(1.0, UnitType::Pixels).unwrap();
    let same_unit =
        MathExpressionNode::create_arithmetic_operation_simplified(&one_em, &two_em, MathOperator::Add);
    assert_eq!(
        same_unit.as_deref().and_then(MathExpressionNode::as_literal).copied(),
        Some(NumericLiteral {
            value: 3.0,
            unit: UnitType::Ems,
        })
    );

    let mixed =
        MathExpressionNode::create_arithmetic_operation_simplified(&one_em, &one_px, MathOperator::Add);
    assert!(mixed.as_ref().is_some_and(|node| node.is_operation()));
    assert_eq!(mixed.map(|node| node.category()), Some(CalculationCategory::Length));
}

#[test]
/// The binary category table, including identifiers that never combine.
///
/// # Panics
/// Panics if a category is inferred incorrectly.
fn binary_categories() {
    let length = literal(1.0, UnitType::Pixels).unwrap();
    let number = literal(2.0, UnitType::Number).unwrap();
    let percent = literal(3.0, UnitType::Percentage).unwrap();
    let identifier = MathExpressionNode::new_identifier("width");
    assert_eq!(
        determine_category(&number, &length, MathOperator::Multiply),
        CalculationCategory::Length
    );
    assert_eq!(
        determine_category(&length, &number, MathOperator::Divide),
        CalculationCategory::Length
    );
    assert_eq!(
        determine_category(&length, &length, MathOperator::Divide),
        CalculationCategory::Other
    );
    assert_eq!(
        determine_category(&length, &percent, MathOperator::Subtract),
        CalculationCategory::PercentLength
    );
    assert_eq!(
        determine_category(&identifier, &number, MathOperator::Multiply),
        CalculationCategory::Other
    );
    assert_eq!(
        determine_category(&length, &number, MathOperator::Min),
        CalculationCategory::Other
    );
    assert_eq!(
        MathExpressionNode::create_arithmetic_operation(&length, &number, MathOperator::Add),
        None
    );
}

#[test]
/// A literal factor distributes over a sum of literals and marks the result nested.
///
/// # Panics
/// Panics if distribution is skipped or applied to a non-literal sum.
fn distribution_over_literal_sums() {
    let one_px = literal(1.0, UnitType::Pixels).unwrap();
    let two_percent = literal(2.0, UnitType::Percentage).unwrap();
    let three = literal(3.0, UnitType::Integer).unwrap();
    let sum =
        MathExpressionNode::create_arithmetic_operation(&one_px, &two_percent, MathOperator::Add)
            .unwrap();

    let product =
        MathExpressionNode::create_arithmetic_operation_simplified(&sum, &three, MathOperator::Multiply);
    assert!(product.as_ref().is_some_and(|node| node.is_nested()));
    assert_eq!(product.map(|node| node.css_text()), Some("6% + 3px".to_owned()));

    let flipped =
        MathExpressionNode::create_arithmetic_operation_simplified(&three, &sum, MathOperator::Multiply);
    assert_eq!(flipped.map(|node| node.css_text()), Some("6% + 3px".to_owned()));

    let minimum = MathExpressionNode::create_comparison_function_simplified(
        [Rc::clone(&one_px), Rc::clone(&two_percent)].into_iter().collect(),
        MathOperator::Min,
    )
    .unwrap();
    let opaque_sum =
        MathExpressionNode::create_arithmetic_operation(&minimum, &one_px, MathOperator::Add)
            .unwrap();
    let kept = MathExpressionNode::create_arithmetic_operation_simplified(
        &opaque_sum,
        &three,
        MathOperator::Multiply,
    );
    assert_eq!(
        kept.as_ref().and_then(|node| node.as_operation()).map(|operation| operation.op),
        Some(MathOperator::Multiply)
    );
    assert!(kept.is_some_and(|node| !node.is_nested()));
}

#[test]
/// Comparisons fold known values, keep percentages symbolic and collapse single
/// operands.
///
/// # Panics
/// Panics if a comparison folds when it must not, or vice versa.
fn comparison_folding() {
    let one_px = literal(1.0, UnitType::Pixels).unwrap();
    let two_in = literal(2.0, UnitType::Inches).unwrap();
    let one_percent = literal(1.0, UnitType::Percentage).unwrap();
    let single = MathExpressionNode::create_comparison_function_simplified(
        [Rc::clone(&one_px)].into_iter().collect(),
        MathOperator::Max,
    );
    assert!(single.is_some_and(|node| Rc::ptr_eq(&node, &one_px)));

    let folded = MathExpressionNode::create_comparison_function_simplified(
        [Rc::clone(&one_px), Rc::clone(&two_in)].into_iter().collect(),
        MathOperator::Max,
    );
    assert_close(folded.and_then(|node| node.double_value()), 192.0);

    let symbolic = MathExpressionNode::create_comparison_function_simplified(
        [Rc::clone(&one_px), Rc::clone(&one_percent)].into_iter().collect(),
        MathOperator::Min,
    );
    assert!(symbolic.as_ref().is_some_and(|node| node.has_comparisons()));
    assert_eq!(
        symbolic.map(|node| node.category()),
        Some(CalculationCategory::PercentLength)
    );
}

#[test]
/// `mod`, `rem`, `sign` and `abs` fold with the documented sign rules.
///
/// # Panics
/// Panics if a stepped or sign-related result is wrong.
fn stepped_and_sign_functions() {
    assert_eq!(css("mod(-3, 5)"), Ok("calc(2)".to_owned()));
    assert_eq!(css("rem(-3, 5)"), Ok("calc(-3)".to_owned()));
    assert_eq!(css("mod(18px, 5px)"), Ok("calc(3px)".to_owned()));
    assert_eq!(css("sign(-3px)"), Ok("calc(-1)".to_owned()));
    assert_eq!(css("abs(-3px)"), Ok("calc(3px)".to_owned()));
    assert_eq!(css("sign(1%)"), Ok("sign(1%)".to_owned()));
    assert_eq!(root("sign(1%)").map(|node| node.category()), Some(CalculationCategory::Number));
    assert!(root("sign(-0)").and_then(|node| node.double_value()).is_some_and(|value| {
        value == 0.0 && value.is_sign_negative()
    }));

    let one = literal(1.0, UnitType::Number).unwrap();
    assert_eq!(
        MathExpressionNode::create_stepped_value_function(
            [Rc::clone(&one), Rc::clone(&one), Rc::clone(&one)].into_iter().collect(),
            MathOperator::Mod,
        ),
        None
    );
}

#[test]
/// An infinite divisor returns a finite dividend of the same sign.
///
/// # Panics
/// Panics if `mod()` by infinity loses the dividend.
fn mod_by_infinity_folds_to_dividend() {
    assert_eq!(css("mod(3, infinity)"), Ok("calc(3)".to_owned()));
    assert_eq!(css("mod(-3, -infinity)"), Ok("calc(-3)".to_owned()));
    assert_eq!(css("mod(0, infinity)"), Ok("calc(0)".to_owned()));
    assert_eq!(css("mod(3px, infinity * 1px)"), Ok("calc(3px)".to_owned()));
    assert_eq!(css("mod(3, -infinity)"), Ok("calc(NaN)".to_owned()));
}

#[test]
/// NaN operands fold to NaN even where `pow` or `hypot` would settle on a number.
///
/// # Panics
/// Panics if a NaN operand is swallowed.
fn nan_operands_fold_to_nan() {
    assert_eq!(css("pow(1, NaN)"), Ok("calc(NaN)".to_owned()));
    assert_eq!(css("pow(NaN, 0)"), Ok("calc(NaN)".to_owned()));
    assert_eq!(css("hypot(infinity, NaN)"), Ok("calc(NaN)".to_owned()));
    assert_eq!(css("hypot(1px, NaN * 1px)"), Ok("calc(NaN * 1px)".to_owned()));
}

#[test]
/// Comparison results follow `clamp(MIN, VAL, MAX)` with MIN winning conflicts.
///
/// # Panics
/// Panics if clamp resolves the wrong bound.
fn clamp_folding() {
    assert_eq!(css("clamp(10px, 2px, 20px)"), Ok("calc(10px)".to_owned()));
    assert_eq!(css("clamp(10px, 30px, 20px)"), Ok("calc(20px)".to_owned()));
    assert_eq!(css("clamp(10px, 30px, 5px)"), Ok("calc(10px)".to_owned()));
    assert_eq!(css("clamp(1%, 5px, 2%)"), Ok("clamp(1%, 5px, 2%)".to_owned()));
}

#[test]
/// Trigonometric functions fold exactly at quarter turns and type-check their input.
///
/// # Panics
/// Panics if a trigonometric result is wrong.
fn trigonometric_folding() {
    assert_eq!(css("sin(90deg)"), Ok("calc(1)".to_owned()));
    assert_eq!(css("cos(0)"), Ok("calc(1)".to_owned()));
    assert_eq!(css("tan(45deg)"), Ok("calc(1)".to_owned()));
    assert_eq!(css("sin(30deg)"), Ok("calc(0.5)".to_owned()));
    assert_eq!(css("cos(0.5turn)"), Ok("calc(-1)".to_owned()));
    assert_eq!(css("asin(1)"), Ok("calc(90deg)".to_owned()));
    assert_eq!(css("acos(2)"), Ok("calc(NaN * 1deg)".to_owned()));
    assert_eq!(css("atan2(1px, 1px)"), Ok("calc(45deg)".to_owned()));
    assert_eq!(css("atan2(1in, -96px)"), Ok("calc(135deg)".to_owned()));
    assert_eq!(parse("asin(1deg)"), Err(MathParseError::TypeMismatch));
    assert_eq!(parse("atan2(1px, 1deg)"), Err(MathParseError::TypeMismatch));
}

#[test]
/// Exponential functions work on numbers, except `hypot()` which keeps the unit.
///
/// # Panics
/// Panics if an exponential result is wrong.
fn exponential_folding() {
    assert_eq!(css("pow(2, 10)"), Ok("calc(1024)".to_owned()));
    assert_eq!(css("sqrt(16)"), Ok("calc(4)".to_owned()));
    assert_eq!(css("exp(0)"), Ok("calc(1)".to_owned()));
    assert_eq!(css("log(8, 2)"), Ok("calc(3)".to_owned()));
    assert_eq!(css("hypot(3px, 4px)"), Ok("calc(5px)".to_owned()));
    assert_eq!(css("hypot(3em, 4em)"), Ok("hypot(3em, 4em)".to_owned()));
    assert_eq!(parse("sqrt(4px)"), Err(MathParseError::TypeMismatch));
}

#[test]
/// Progress functions require lengths for their bounds and an identifier feature.
///
/// # Panics
/// Panics if an ill-formed progress node is built.
fn progress_factories() {
    let zero = literal(0.0, UnitType::Pixels).unwrap();
    let hundred = literal(100.0, UnitType::Pixels).unwrap();
    let number = literal(1.0, UnitType::Number).unwrap();
    let feature = MathExpressionNode::new_identifier("width");
    let name = MathExpressionNode::new_identifier("sidebar");

    assert_eq!(
        MathExpressionNode::create_media_progress_function(&feature, &number, &hundred),
        None
    );
    assert_eq!(
        MathExpressionNode::create_media_progress_function(&zero, &zero, &hundred),
        None
    );

    let container = MathExpressionNode::create_container_progress_function(
        &feature,
        Some(&name),
        &zero,
        &hundred,
    );
    assert_eq!(
        container.as_ref().and_then(|node| node.as_operation()).map(|operation| operation.operands.len()),
        Some(4)
    );
    assert_eq!(container.map(|node| node.category()), Some(CalculationCategory::Number));

    let folded = MathExpressionNode::create_progress_function(&number, &number, &number);
    assert!(folded.and_then(|node| node.double_value()).is_some_and(f64::is_nan));
}

#[test]
/// `double_value` reads literals directly and computes context-free trees.
///
/// # Panics
/// Panics if a value is reported for a context-dependent tree.
fn double_value_and_resolved_unit() {
    assert_close(root("calc(1in)").and_then(|node| node.double_value()), 96.0);
    assert_eq!(root("calc(1em + 1px)").and_then(|node| node.double_value()), None);
    assert_eq!(
        root("calc(1em + 2em)").and_then(|node| node.resolved_unit_type()),
        Some(UnitType::Ems)
    );
    assert_eq!(root("calc(1% + 1px)").and_then(|node| node.resolved_unit_type()), None);
    assert_eq!(
        root("calc(1ms + 1s)").and_then(|node| node.resolved_unit_type()),
        Some(UnitType::Seconds)
    );
    assert!(root("calc(0px)").is_some_and(|node| node.is_zero()));
}
