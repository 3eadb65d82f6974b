#![allow(clippy::unwrap_used, reason = "tests unwrap parses that must succeed")]

use css_values_math::{
    AllowedAnchorQueries, CalculationCategory, MathExpressionParser, MathFeatures,
    MathFunctionValue, MathParseError, ParserOptions, PixelsAndPercent, StaticLengthResolver,
    ValueRange, Viewport, parse_math_function_str,
};
use cssparser::{Parser, ParserInput, Token};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn inset_options() -> ParserOptions {
    ParserOptions {
        allowed_anchor_queries: AllowedAnchorQueries::ALL,
        ..ParserOptions::default()
    }
}

/// Parse a space-separated list of math functions the way a shorthand property would,
/// sharing one parser session across all of them.
fn parse_list(text: &str, range: ValueRange) -> Vec<MathFunctionValue> {
    let mut parser_input = ParserInput::new(text);
    let mut input = Parser::new(&mut parser_input);
    let mut math = MathExpressionParser::new(ParserOptions::default());
    let mut values = Vec::new();
    while !input.is_exhausted() {
        let value = math.parse_math_function(&mut input, range).unwrap();
        values.push(value);
    }
    values
}

#[test]
fn width_style_values_compute_to_pixels() {
    init_logger();
    let resolver = StaticLengthResolver::default();
    let value = parse_math_function_str("calc(100% - 2 * 1em)", &ParserOptions::default()).unwrap();
    assert!(value.has_percentage());
    assert_eq!(value.css_text(), "calc(100% - 2em)");

    let layout = value.to_calc_value(&resolver);
    assert_eq!(layout.pixels_and_percent(), Some(PixelsAndPercent::new(-32.0, 100.0)));
    assert_eq!(layout.evaluate(400.0, None), 368.0);
}

#[test]
fn shorthand_lists_share_one_session() {
    init_logger();
    let values = parse_list("calc(10px + 1em) min(10px, 5%) clamp(1px, 10px, 5px)", ValueRange::NonNegative);
    let texts: Vec<String> = values.iter().map(MathFunctionValue::css_text).collect();
    assert_eq!(texts, ["calc(1em + 10px)", "min(10px, 5%)", "calc(5px)"]);
    assert!(values.iter().all(|value| value.value_range() == ValueRange::NonNegative));
}

#[test]
fn invalid_values_leave_the_cursor_usable() {
    init_logger();
    let mut parser_input = ParserInput::new("calc(1px + 1deg) 12px");
    let mut input = Parser::new(&mut parser_input);
    let mut math = MathExpressionParser::new(ParserOptions::default());
    let failed = input.try_parse(|cursor| math.parse_math_function(cursor, ValueRange::All));
    assert_eq!(failed.map(|value| value.css_text()).ok(), None);
    assert!(matches!(input.next(), Ok(Token::Function(_))));
    assert!(matches!(input.next(), Ok(Token::Dimension { .. })));
}

#[test]
fn categories_follow_units() {
    init_logger();
    let category = |text: &str| {
        parse_math_function_str(text, &ParserOptions::default())
            .map(|value| value.category())
    };
    assert_eq!(category("calc(1s + 1ms)"), Ok(CalculationCategory::Time));
    assert_eq!(category("calc(1dppx * 2)"), Ok(CalculationCategory::Resolution));
    assert_eq!(category("calc(2x)"), Ok(CalculationCategory::Resolution));
    assert_eq!(category("calc(1hz + 1khz)"), Ok(CalculationCategory::Frequency));
    assert_eq!(category("calc(1% * 3)"), Ok(CalculationCategory::Percent));
    assert_eq!(category("calc(1px / 1px)"), Err(MathParseError::TypeMismatch));
}

#[test]
fn container_units_fall_back_to_small_viewport() {
    init_logger();
    let value = parse_math_function_str("calc(10cqw + 10cqh)", &ParserOptions::default()).unwrap();
    let without_container = StaticLengthResolver::default();
    assert_eq!(value.compute_length_px(&without_container), Some(140.0));

    let with_container = StaticLengthResolver {
        container: Some(Viewport {
            width_px: 200,
            height_px: 50,
        }),
        ..StaticLengthResolver::default()
    };
    assert_eq!(value.compute_length_px(&with_container), Some(25.0));
}

#[test]
fn baseline_features_reject_modern_syntax() {
    init_logger();
    let baseline = ParserOptions {
        features: MathFeatures::baseline(),
        ..inset_options()
    };
    assert_eq!(
        parse_math_function_str("calc(1px + 1px)", &baseline).map(|value| value.css_text()),
        Ok("calc(2px)".to_owned())
    );
    assert_eq!(
        parse_math_function_str("mod(5px, 2px)", &baseline),
        Err(MathParseError::FeatureDisabled("mod".to_owned()))
    );
    assert_eq!(
        parse_math_function_str("anchor-size(width)", &baseline),
        Err(MathParseError::FeatureDisabled("anchor-size".to_owned()))
    );
    assert_eq!(
        parse_math_function_str("anchor-size(width)", &inset_options()).map(|value| value.css_text()),
        Ok("anchor-size(width)".to_owned())
    );
}

#[test]
fn errors_render_human_readable_messages() {
    init_logger();
    let error = parse_math_function_str("clamp(1px)", &ParserOptions::default()).unwrap_err();
    assert_eq!(error.to_string(), "`clamp` takes 3..=3 arguments, found 1");
    let error = parse_math_function_str("calc(1px", &ParserOptions::default())
        .and_then(|_| parse_math_function_str("calc(", &ParserOptions::default()))
        .unwrap_err();
    assert_eq!(error, MathParseError::UnexpectedEnd);
    assert_eq!(error.to_string(), "unexpected end of input");
}
