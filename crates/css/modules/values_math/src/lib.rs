//! CSS Values and Units Module Level 4 — Mathematical expressions and the unit types they
//! operate on.
//! Spec: <https://www.w3.org/TR/css-values-4/#math>
//!
//! The engine consumes a `cssparser` token cursor positioned inside a math function,
//! builds an immutable expression tree (folding constants while it goes), and hands
//! the tree to one of three evaluation backends: an immediate canonical-unit value, a
//! pixels-plus-percent pair, or a deferred [`CalculationExpression`] resolved at layout
//! time.

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the CSS Values 4 table of contents.
pub mod chapter_3_identifiers;
pub mod chapter_5_numeric_types;
pub mod chapter_6_distance_units;
// §10 Mathematical Expressions, plus the css-anchor-position-1 anchor functions.
#[path = "chapter_10_math/mod.rs"]
pub mod chapter_10_math;
// Layout-time representation of resolved calc() values.
pub mod calculation;
pub mod clamping;

// Re-exports for ergonomic access from other crates.
pub use calculation::{
    AnchorEvaluator, AnchorQueryExpression, CalculationExpression, CalculationValue,
    PixelsAndPercent, ValueRange,
};
pub use chapter_3_identifiers::{Ident, parse_dashed_ident, parse_ident};
pub use chapter_5_numeric_types::{UnitCategory, UnitType, canonical_unit_for_category};
pub use chapter_6_distance_units::{
    FontMetric, LengthResolver, StaticLengthResolver, Viewport, ViewportKind, compute_length_px,
};
pub use chapter_10_math::{
    AllowedAnchorQueries, AnchorQuery, AnchorQueryType, AnchorQueryValue, AnchorSide,
    AnchorSizeValue, AnchorSpecifier, CalculationCategory, LiteralCache, MAX_EXPRESSION_DEPTH,
    MathExpressionNode, MathExpressionParser, MathFeatures, MathFunctionValue, MathOperator,
    NodeKind, NumericLiteral, Operation, ParserOptions, ScopedName, TreeScopeId,
    parse_math_function_str,
};

/// Errors raised while parsing a math expression.
///
/// Inside the parser these travel as `cssparser::ParseError::Custom`; every one of them
/// is recoverable and only means "this value is invalid".
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MathParseError {
    /// The next token did not match the expected grammar.
    #[error("unexpected token")]
    UnexpectedToken,
    /// The input ended before the grammar was satisfied.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// The function name is not a math function.
    #[error("unsupported math function `{0}`")]
    UnsupportedFunction(String),
    /// The function exists but its feature gate is off.
    #[error("math function `{0}` is not enabled")]
    FeatureDisabled(String),
    /// The dimension unit is unknown or not enabled.
    #[error("unsupported unit `{0}`")]
    UnsupportedUnit(String),
    /// Wrong number of comma-separated arguments.
    #[error("`{function}` takes {min}..={max} arguments, found {found}")]
    ArgumentCount {
        function: &'static str,
        min: usize,
        max: usize,
        found: usize,
    },
    /// Operand categories cannot be combined (the node would have category `other`).
    #[error("incompatible operand types")]
    TypeMismatch,
    /// Nesting went deeper than the configured limit.
    #[error("expression nesting exceeds {0} levels")]
    DepthLimitExceeded(usize),
    /// An anchor function was used where the property does not accept it.
    #[error("anchor query not allowed in this context")]
    AnchorQueryNotAllowed,
    /// Malformed `anchor()` or `anchor-size()` arguments.
    #[error("invalid anchor query")]
    InvalidAnchorQuery,
    /// Unknown feature name in `media-progress()` or `container-progress()`.
    #[error("unsupported progress feature `{0}`")]
    InvalidProgressFeature(String),
}
