//! CSS Values & Units Level 4 — §10 Mathematical Expressions
//! Spec: <https://www.w3.org/TR/css-values-4/#math>
//!
//! Also hosts the `anchor()` / `anchor-size()` query leaves from
//! css-anchor-position-1 §3, which can appear anywhere a length may.

mod cache;
pub mod category;
mod evaluate;
mod features;
mod function_value;
pub mod literal;
mod node;
pub mod operator;
mod parser;
pub mod serialize;
mod simplify;

pub use cache::LiteralCache;
pub use category::{CalculationCategory, add_subtract_category, category_of};
pub use features::{AllowedAnchorQueries, MAX_EXPRESSION_DEPTH, MathFeatures, ParserOptions};
pub use function_value::MathFunctionValue;
pub use literal::NumericLiteral;
pub use node::{
    AnchorQuery, AnchorQueryType, AnchorQueryValue, AnchorSide, AnchorSizeValue, AnchorSpecifier,
    MathExpressionNode, NodeKind, Operation, ScopedName, TreeScopeId,
};
pub use operator::MathOperator;
pub use parser::{MathExpressionParser, parse_math_function_str};
pub use simplify::determine_category;

#[cfg(test)]
mod tests;
