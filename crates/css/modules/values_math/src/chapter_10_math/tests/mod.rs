//! Tests for the math expression engine: parsing, folding, serialization and the
//! evaluation backends.

#![allow(clippy::unwrap_used, reason = "tests unwrap values that must build")]

use std::rc::Rc;

use super::*;
use crate::MathParseError;

mod simplify_tests;

const EPSILON: f64 = 1e-9;

#[inline]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse with every feature enabled and both anchor functions allowed.
#[inline]
pub fn parse(text: &str) -> Result<MathFunctionValue, MathParseError> {
    parse_with(
        text,
        &ParserOptions {
            allowed_anchor_queries: AllowedAnchorQueries::ALL,
            ..ParserOptions::default()
        },
    )
}

#[inline]
pub fn parse_with(text: &str, options: &ParserOptions) -> Result<MathFunctionValue, MathParseError> {
    init_logger();
    parse_math_function_str(text, options)
}

/// Serialized form of `text` after a successful parse.
#[inline]
pub fn css(text: &str) -> Result<String, MathParseError> {
    parse(text).map(|value| value.css_text())
}

/// Expression root of a parse that is expected to succeed.
#[inline]
pub fn root(text: &str) -> Option<Rc<MathExpressionNode>> {
    parse(text).ok().map(|value| Rc::clone(value.expression()))
}

/// Assert that `actual` is present and within [`EPSILON`] of `expected`.
///
/// # Panics
/// Panics when the value is missing or too far off.
#[inline]
pub fn assert_close(actual: Option<f64>, expected: f64) {
    assert!(
        actual.is_some_and(|value| (value - expected).abs() < EPSILON),
        "expected {expected}, got {actual:?}"
    );
}
