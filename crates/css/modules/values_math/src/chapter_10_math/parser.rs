//! §10.1 Basic arithmetic and §10.2–§10.9 math function syntax; css-anchor-position-1 §3
//! anchor functions.
//! Spec: <https://www.w3.org/TR/css-values-4/#calc-syntax>
//!
//! Recursive descent over a `cssparser` token cursor. Folding happens while the tree
//! is built, through the `create_*` factories.

use std::rc::Rc;

use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, Token};
use smallvec::SmallVec;

use super::cache::LiteralCache;
use super::category::{CalculationCategory, category_of};
use super::features::ParserOptions;
use super::function_value::MathFunctionValue;
use super::node::{
    AnchorQueryType, AnchorQueryValue, AnchorSide, AnchorSizeValue, AnchorSpecifier,
    MathExpressionNode, ScopedName,
};
use super::operator::MathOperator;
use crate::MathParseError;
use crate::calculation::ValueRange;
use crate::chapter_3_identifiers::{parse_dashed_ident, parse_ident};
use crate::chapter_5_numeric_types::UnitType;

type Node = Rc<MathExpressionNode>;
type MathResult<'i, T> = Result<T, ParseError<'i, MathParseError>>;

/// Feature names accepted by `media-progress()`.
const MEDIA_PROGRESS_FEATURES: [&str; 2] = ["width", "height"];
/// Feature names accepted by `container-progress()`.
const CONTAINER_PROGRESS_FEATURES: [&str; 4] = ["width", "height", "inline-size", "block-size"];

/// One parsing session: options plus the literal cache shared by every expression
/// parsed through it.
#[derive(Debug, Default)]
pub struct MathExpressionParser {
    options: ParserOptions,
    cache: LiteralCache,
}

impl MathExpressionParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            cache: LiteralCache::new(),
        }
    }

    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub const fn cache(&self) -> &LiteralCache {
        &self.cache
    }

    /// Parse a math function whose function token is the next token of `input`.
    ///
    /// # Errors
    /// Fails when the next token is not a supported math function or when its
    /// contents do not form a valid, type-correct expression.
    pub fn parse_math_function<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        value_range: ValueRange,
    ) -> MathResult<'i, MathFunctionValue> {
        let token = input.next()?.clone();
        let Token::Function(name) = token else {
            return Err(self.error(input, MathParseError::UnexpectedToken));
        };
        let expression = self.parse_function(input, &name, 0)?;
        log::debug!(target: "css::values::math", "[CALC-PARSE] parsed function={} category={:?}", name.as_ref(), expression.category());
        Ok(MathFunctionValue::new(expression, value_range))
    }

    /// Parse a bare `<calc-sum>` filling the rest of `input`.
    ///
    /// # Errors
    /// Fails on any syntax or type error, or when tokens remain after the sum.
    pub fn parse_expression<'i>(&mut self, input: &mut Parser<'i, '_>) -> MathResult<'i, Node> {
        let expression = self.parse_sum(input, 0)?;
        input.expect_exhausted()?;
        Ok(expression)
    }

    fn error<'i>(&self, input: &Parser<'i, '_>, error: MathParseError) -> ParseError<'i, MathParseError> {
        log::debug!(target: "css::values::math", "[CALC-PARSE] rejected reason={error}");
        input.new_custom_error(error)
    }

    fn check_depth<'i>(&self, input: &Parser<'i, '_>, depth: usize) -> MathResult<'i, usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(self.error(input, MathParseError::DepthLimitExceeded(self.options.max_depth)));
        }
        Ok(depth)
    }

    fn built<'i>(&self, input: &Parser<'i, '_>, node: Option<Node>) -> MathResult<'i, Node> {
        node.ok_or_else(|| self.error(input, MathParseError::TypeMismatch))
    }

    /// `<calc-sum> = <calc-product> [ [ '+' | '-' ] <calc-product> ]*`, with the operator
    /// surrounded by whitespace.
    fn parse_sum<'i>(&mut self, input: &mut Parser<'i, '_>, depth: usize) -> MathResult<'i, Node> {
        let mut result = self.parse_product(input, depth)?;
        loop {
            let state = input.state();
            if !matches!(input.next_including_whitespace(), Ok(Token::WhiteSpace(_))) {
                input.reset(&state);
                break;
            }
            let op = match input.next_including_whitespace() {
                Ok(Token::Delim('+')) => MathOperator::Add,
                Ok(Token::Delim('-')) => MathOperator::Subtract,
                _ => {
                    input.reset(&state);
                    break;
                }
            };
            if !matches!(input.next_including_whitespace(), Ok(Token::WhiteSpace(_))) {
                return Err(self.error(input, MathParseError::UnexpectedToken));
            }
            let rhs = self.parse_product(input, depth)?;
            let combined =
                MathExpressionNode::create_arithmetic_operation_simplified(&result, &rhs, op);
            result = self.built(input, combined)?;
        }
        Ok(result)
    }

    /// `<calc-product> = <calc-value> [ [ '*' | '/' ] <calc-value> ]*`
    fn parse_product<'i>(&mut self, input: &mut Parser<'i, '_>, depth: usize) -> MathResult<'i, Node> {
        let mut result = self.parse_value(input, depth)?;
        loop {
            let state = input.state();
            let op = match input.next() {
                Ok(Token::Delim('*')) => MathOperator::Multiply,
                Ok(Token::Delim('/')) => MathOperator::Divide,
                _ => {
                    input.reset(&state);
                    break;
                }
            };
            let rhs = self.parse_value(input, depth)?;
            let combined =
                MathExpressionNode::create_arithmetic_operation_simplified(&result, &rhs, op);
            result = self.built(input, combined)?;
        }
        Ok(result)
    }

    /// `<calc-value>`: a numeric token, a constant, a parenthesised sum or a math function.
    fn parse_value<'i>(&mut self, input: &mut Parser<'i, '_>, depth: usize) -> MathResult<'i, Node> {
        let token = input.next()?.clone();
        match token {
            Token::Number { value, int_value, .. } => {
                let unit = if int_value.is_some() {
                    UnitType::Integer
                } else {
                    UnitType::Number
                };
                let node = self.cache.literal(f64::from(value), unit);
                self.built(input, node)
            }
            Token::Percentage { unit_value, .. } => {
                let node = self
                    .cache
                    .literal(f64::from(unit_value * 100.0), UnitType::Percentage);
                self.built(input, node)
            }
            Token::Dimension { value, unit, .. } => {
                let features = self.options.features;
                let Some(unit_type) = UnitType::from_keyword(unit.as_ref()).filter(|unit_type| {
                    category_of(*unit_type, &features) != CalculationCategory::Other
                }) else {
                    let unsupported = MathParseError::UnsupportedUnit(unit.as_ref().to_owned());
                    return Err(self.error(input, unsupported));
                };
                let node = self.cache.literal(f64::from(value), unit_type);
                self.built(input, node)
            }
            Token::Ident(name) => {
                let constant = cssparser::match_ignore_ascii_case! { name.as_ref(),
                    "e" => core::f64::consts::E,
                    "pi" => core::f64::consts::PI,
                    "infinity" => f64::INFINITY,
                    "-infinity" => f64::NEG_INFINITY,
                    "nan" => f64::NAN,
                    _ => return Err(self.error(input, MathParseError::UnexpectedToken)),
                };
                self.built(input, MathExpressionNode::new_literal(constant, UnitType::Number))
            }
            Token::ParenthesisBlock => {
                let depth = self.check_depth(input, depth)?;
                let inner = input.parse_nested_block(|block| self.parse_sum(block, depth))?;
                Ok(inner.with_nested(true))
            }
            Token::Function(name) => self.parse_function(input, &name, depth),
            Token::AtKeyword(_)
            | Token::Hash(_)
            | Token::IDHash(_)
            | Token::QuotedString(_)
            | Token::UnquotedUrl(_)
            | Token::Delim(_)
            | Token::WhiteSpace(_)
            | Token::Comment(_)
            | Token::Colon
            | Token::Semicolon
            | Token::Comma
            | Token::IncludeMatch
            | Token::DashMatch
            | Token::PrefixMatch
            | Token::SuffixMatch
            | Token::SubstringMatch
            | Token::CDO
            | Token::CDC
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock
            | Token::BadUrl(_)
            | Token::BadString(_)
            | Token::CloseParenthesis
            | Token::CloseSquareBracket
            | Token::CloseCurlyBracket => Err(self.error(input, MathParseError::UnexpectedToken)),
        }
    }

    /// Dispatch on a function name; `input` is positioned right after the function token.
    fn parse_function<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        name: &str,
        depth: usize,
    ) -> MathResult<'i, Node> {
        let depth = self.check_depth(input, depth)?;
        let features = self.options.features;

        if name.eq_ignore_ascii_case("calc") {
            let inner = input.parse_nested_block(|block| self.parse_sum(block, depth))?;
            return Ok(inner.with_nested(true));
        }
        if name.eq_ignore_ascii_case("anchor") || name.eq_ignore_ascii_case("anchor-size") {
            let query_type = if name.eq_ignore_ascii_case("anchor") {
                AnchorQueryType::Anchor
            } else {
                AnchorQueryType::AnchorSize
            };
            if !features.anchor_positioning {
                return Err(self.error(input, MathParseError::FeatureDisabled(name.to_owned())));
            }
            let allowed = match query_type {
                AnchorQueryType::Anchor => self.options.allowed_anchor_queries.anchor,
                AnchorQueryType::AnchorSize => self.options.allowed_anchor_queries.anchor_size,
            };
            if !allowed {
                return Err(self.error(input, MathParseError::AnchorQueryNotAllowed));
            }
            return input.parse_nested_block(|block| self.parse_anchor_query(block, query_type, depth));
        }

        let Some(op) = MathOperator::from_function_name(name) else {
            return Err(self.error(input, MathParseError::UnsupportedFunction(name.to_owned())));
        };
        let enabled = if op.is_comparison() {
            true
        } else if op.is_stepped() {
            features.stepped_value_functions
        } else if op.is_exponential() {
            features.exponential_functions
        } else if op.is_sign_related() {
            features.sign_functions
        } else if op.is_trigonometric() {
            features.trigonometric_functions
        } else {
            features.progress_notation
        };
        if !enabled {
            return Err(self.error(input, MathParseError::FeatureDisabled(name.to_owned())));
        }

        input.parse_nested_block(|block| match op {
            MathOperator::Progress => self.parse_progress(block, depth),
            MathOperator::MediaProgress | MathOperator::ContainerProgress => {
                self.parse_progress_in_context(block, op, depth)
            }
            MathOperator::RoundNearest => self.parse_round(block, depth),
            _ => {
                let operands = self.parse_arguments(block, op, depth)?;
                let node = if op.is_comparison() {
                    MathExpressionNode::create_comparison_function_simplified(operands, op)
                } else if op.is_stepped() {
                    MathExpressionNode::create_stepped_value_function(operands, op)
                } else if op.is_exponential() {
                    MathExpressionNode::create_exponential_function(operands, op)
                } else if op.is_trigonometric() {
                    MathExpressionNode::create_trigonometric_function_simplified(operands, op)
                } else {
                    operands
                        .first()
                        .and_then(|operand| MathExpressionNode::create_sign_related_function(operand, op))
                };
                self.built(block, node)
            }
        })
    }

    /// Comma-separated `<calc-sum>` arguments, checked against the operator's arity.
    fn parse_arguments<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        op: MathOperator,
        depth: usize,
    ) -> MathResult<'i, SmallVec<Node, 2>> {
        let mut operands: SmallVec<Node, 2> = SmallVec::new();
        loop {
            operands.push(self.parse_sum(input, depth)?);
            if input.try_parse(Parser::expect_comma).is_err() {
                break;
            }
        }
        let (min, max) = op.arity();
        if operands.len() < min || operands.len() > max {
            return Err(self.error(input, MathParseError::ArgumentCount {
                function: op.function_name().unwrap_or("calc"),
                min,
                max,
                found: operands.len(),
            }));
        }
        Ok(operands)
    }

    /// `round(<rounding-strategy>?, A, B?)`; `B` defaults to `1` when `A` is a number.
    fn parse_round<'i>(&mut self, input: &mut Parser<'i, '_>, depth: usize) -> MathResult<'i, Node> {
        let strategy = input
            .try_parse(|block| -> Result<MathOperator, ParseError<'i, MathParseError>> {
                let ident = parse_ident(block).map_err(|error| block.new_custom_error(error))?;
                let op = match ident.0.as_str() {
                    "nearest" => MathOperator::RoundNearest,
                    "up" => MathOperator::RoundUp,
                    "down" => MathOperator::RoundDown,
                    "to-zero" => MathOperator::RoundToZero,
                    _ => return Err(block.new_custom_error(MathParseError::UnexpectedToken)),
                };
                block.expect_comma()?;
                Ok(op)
            })
            .unwrap_or(MathOperator::RoundNearest);

        let mut operands = self.parse_arguments(input, MathOperator::Hypot, depth)?;
        if operands.len() > 2 {
            return Err(self.error(input, MathParseError::ArgumentCount {
                function: "round",
                min: 1,
                max: 2,
                found: operands.len(),
            }));
        }
        if operands.len() == 1 {
            let is_number = operands
                .first()
                .is_some_and(|operand| operand.category() == CalculationCategory::Number);
            if !is_number {
                return Err(self.error(input, MathParseError::TypeMismatch));
            }
            let step = self.cache.literal(1.0, UnitType::Number);
            operands.push(self.built(input, step)?);
        }
        let node = MathExpressionNode::create_stepped_value_function(operands, strategy);
        self.built(input, node)
    }

    /// `progress(<calc-sum> from <calc-sum> to <calc-sum>)`
    fn parse_progress<'i>(&mut self, input: &mut Parser<'i, '_>, depth: usize) -> MathResult<'i, Node> {
        let value = self.parse_sum(input, depth)?;
        input.expect_ident_matching("from")?;
        let start = self.parse_sum(input, depth)?;
        input.expect_ident_matching("to")?;
        let end = self.parse_sum(input, depth)?;
        let node = MathExpressionNode::create_progress_function(&value, &start, &end);
        self.built(input, node)
    }

    /// `media-progress(<feature> from A to B)` and
    /// `container-progress(<feature> [of <name>]? from A to B)`.
    fn parse_progress_in_context<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        op: MathOperator,
        depth: usize,
    ) -> MathResult<'i, Node> {
        let feature = parse_ident(input).map_err(|error| self.error(input, error))?;
        let known: &[&str] = if op == MathOperator::MediaProgress {
            &MEDIA_PROGRESS_FEATURES
        } else {
            &CONTAINER_PROGRESS_FEATURES
        };
        if !known.contains(&feature.0.as_str()) {
            return Err(self.error(input, MathParseError::InvalidProgressFeature(feature.0)));
        }
        let feature = MathExpressionNode::new_identifier(feature.0);

        let container_name = if op == MathOperator::ContainerProgress
            && input.try_parse(|block| block.expect_ident_matching("of")).is_ok()
        {
            let token = input.next()?.clone();
            let Token::Ident(name) = token else {
                return Err(self.error(input, MathParseError::UnexpectedToken));
            };
            let name = name.as_ref().to_owned();
            Some(MathExpressionNode::new_identifier(name))
        } else {
            None
        };

        input.expect_ident_matching("from")?;
        let start = self.parse_sum(input, depth)?;
        input.expect_ident_matching("to")?;
        let end = self.parse_sum(input, depth)?;
        let node = if op == MathOperator::MediaProgress {
            MathExpressionNode::create_media_progress_function(&feature, &start, &end)
        } else {
            MathExpressionNode::create_container_progress_function(
                &feature,
                container_name.as_ref(),
                &start,
                &end,
            )
        };
        self.built(input, node)
    }

    /// `anchor(<dashed-ident>? <anchor-side>, <length-percentage>?)` or
    /// `anchor-size(<dashed-ident>? <anchor-size>?, <length-percentage>?)`; the name and
    /// the side/size may come in either order.
    fn parse_anchor_query<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        query_type: AnchorQueryType,
        depth: usize,
    ) -> MathResult<'i, Node> {
        let mut name: Option<String> = None;
        let mut value: Option<AnchorQueryValue> = None;
        for _ in 0..2 {
            if name.is_none()
                && let Ok(dashed) = input.try_parse(|block| {
                    parse_dashed_ident(block)
                        .map_err(|error| block.new_custom_error::<_, MathParseError>(error))
                })
            {
                name = Some(dashed);
                continue;
            }
            if value.is_none()
                && let Ok(parsed) = input.try_parse(|block| Self::parse_anchor_value(block, query_type))
            {
                value = Some(parsed);
                continue;
            }
            break;
        }

        let value = match (query_type, value) {
            (_, Some(value)) => value,
            (AnchorQueryType::AnchorSize, None) => AnchorQueryValue::Size(AnchorSizeValue::Implicit),
            (AnchorQueryType::Anchor, None) => {
                return Err(self.error(input, MathParseError::InvalidAnchorQuery));
            }
        };

        let has_leading_arguments = name.is_some()
            || !matches!(value, AnchorQueryValue::Size(AnchorSizeValue::Implicit));
        let fallback = if input.is_exhausted() {
            None
        } else {
            if has_leading_arguments {
                input.expect_comma()?;
            }
            Some(self.parse_sum(input, depth)?)
        };

        let specifier = name.map_or(AnchorSpecifier::Default, |name| {
            AnchorSpecifier::Named(ScopedName { name, scope: None })
        });
        let node = MathExpressionNode::create_anchor_query(query_type, specifier, value, fallback);
        node.ok_or_else(|| self.error(input, MathParseError::InvalidAnchorQuery))
    }

    fn parse_anchor_value<'i>(
        input: &mut Parser<'i, '_>,
        query_type: AnchorQueryType,
    ) -> MathResult<'i, AnchorQueryValue> {
        let token = input.next()?.clone();
        let value = match (query_type, &token) {
            (AnchorQueryType::Anchor, Token::Ident(keyword)) => {
                AnchorSide::from_keyword(keyword.as_ref()).map(AnchorQueryValue::Side)
            }
            (AnchorQueryType::Anchor, Token::Percentage { unit_value, .. }) => {
                Some(AnchorQueryValue::Percentage(f64::from(unit_value * 100.0)))
            }
            (AnchorQueryType::AnchorSize, Token::Ident(keyword)) => {
                AnchorSizeValue::from_keyword(keyword.as_ref()).map(AnchorQueryValue::Size)
            }
            _ => None,
        };
        value.ok_or_else(|| input.new_custom_error(MathParseError::InvalidAnchorQuery))
    }
}

/// Parse `text` as one complete math function.
///
/// # Errors
/// Returns the first [`MathParseError`] hit; source locations are dropped.
pub fn parse_math_function_str(
    text: &str,
    options: &ParserOptions,
) -> Result<MathFunctionValue, MathParseError> {
    let mut parser_input = ParserInput::new(text);
    let mut input = Parser::new(&mut parser_input);
    let mut math = MathExpressionParser::new(*options);
    input
        .parse_entirely(|parser| math.parse_math_function(parser, ValueRange::All))
        .map_err(|error| match error.kind {
            ParseErrorKind::Custom(custom) => custom,
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => MathParseError::UnexpectedEnd,
            ParseErrorKind::Basic(_) => MathParseError::UnexpectedToken,
        })
}
