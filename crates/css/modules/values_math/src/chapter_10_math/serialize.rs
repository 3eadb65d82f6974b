//! §10.12 Serialization.
//! Spec: <https://www.w3.org/TR/css-values-4/#calc-serialize>

use std::rc::Rc;

use super::literal::NumericLiteral;
use super::node::{
    AnchorQuery, AnchorQueryType, AnchorQueryValue, AnchorSpecifier, MathExpressionNode, NodeKind,
    Operation,
};
use super::operator::MathOperator;
use crate::chapter_5_numeric_types::UnitType;

/// Largest magnitude printed through the integer fast path.
const MAX_INTEGER_FAST_PATH: f64 = 999_999.0;
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a number the way computed CSS values print: at most six significant digits,
/// exponent notation outside `1e-4..1e6`, and spelled-out non-finite values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "infinity" } else { "-infinity" }.to_owned();
    }
    if value.fract() == 0.0 && value.abs() <= MAX_INTEGER_FAST_PATH {
        return format!("{}", value as i64);
    }

    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }
    let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_owned()
}

fn trim_fraction(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}

/// One term of a flattened sum.
enum SumTerm<'a> {
    Literal(f64, UnitType),
    Compound { negated: bool, node: &'a Rc<MathExpressionNode> },
}

fn collect_sum_terms<'a>(node: &'a Rc<MathExpressionNode>, negated: bool, out: &mut Vec<SumTerm<'a>>) {
    if let Some(operation) = node.as_operation()
        && operation.op.is_additive()
        && let [left, right] = operation.operands.as_slice()
    {
        collect_sum_terms(left, negated, out);
        collect_sum_terms(right, negated != (operation.op == MathOperator::Subtract), out);
        return;
    }
    match node.as_literal() {
        Some(literal) => {
            let value = if negated { -literal.value } else { literal.value };
            out.push(SumTerm::Literal(value, literal.unit));
        }
        None => out.push(SumTerm::Compound { negated, node }),
    }
}

/// Sort key of a literal term: numbers, then percentages, then dimensions by keyword.
fn literal_rank(unit: UnitType) -> (u8, String) {
    match unit {
        UnitType::Number | UnitType::Integer => (0, String::new()),
        UnitType::Percentage => (1, String::new()),
        _ => (2, unit.keyword().to_ascii_lowercase()),
    }
}

fn serialize_sum(node: &Rc<MathExpressionNode>) -> String {
    let mut terms = Vec::new();
    collect_sum_terms(node, false, &mut terms);

    // Combine literals that share a unit; numbers and integers share a slot.
    let mut literals: Vec<((u8, String), NumericLiteral)> = Vec::new();
    let mut compounds = Vec::new();
    for term in terms {
        match term {
            SumTerm::Literal(value, unit) => {
                let rank = literal_rank(unit);
                if let Some((_, existing)) = literals.iter_mut().find(|(key, _)| *key == rank) {
                    existing.value += value;
                    if existing.unit == UnitType::Integer && unit != UnitType::Integer {
                        existing.unit = UnitType::Number;
                    }
                } else {
                    literals.push((rank, NumericLiteral { value, unit }));
                }
            }
            SumTerm::Compound { negated, node } => compounds.push((negated, node)),
        }
    }
    literals.sort_by(|(left, _), (right, _)| left.cmp(right));

    let mut text = String::new();
    for (_, literal) in &literals {
        if text.is_empty() {
            text.push_str(&literal.css_text());
        } else if literal.value < 0.0 || (literal.value == 0.0 && literal.value.is_sign_negative()) {
            text.push_str(" - ");
            text.push_str(&NumericLiteral { value: -literal.value, ..*literal }.css_text());
        } else {
            text.push_str(" + ");
            text.push_str(&literal.css_text());
        }
    }
    for (negated, compound) in compounds {
        let compound_text = css_text(compound);
        if text.is_empty() {
            if negated {
                text.push_str("-1 * ");
            }
            text.push_str(&compound_text);
        } else {
            text.push_str(if negated { " - " } else { " + " });
            text.push_str(&compound_text);
        }
    }
    text
}

fn serialize_product(operation: &Operation) -> String {
    let [left, right] = operation.operands.as_slice() else {
        return String::new();
    };
    let needs_parens = |operand: &MathExpressionNode, divisor: bool| {
        operand.as_operation().is_some_and(|inner| {
            inner.op.is_additive()
                || (inner.op.is_arithmetic() && (divisor || operand.is_nested()))
        })
    };
    let wrap = |operand: &Rc<MathExpressionNode>, divisor: bool| {
        let text = css_text(operand);
        if needs_parens(operand, divisor) {
            format!("({text})")
        } else {
            text
        }
    };
    let symbol = operation.op.symbol().unwrap_or('*');
    format!(
        "{} {symbol} {}",
        wrap(left, false),
        wrap(right, operation.op == MathOperator::Divide)
    )
}

fn serialize_function(operation: &Operation) -> String {
    let name = operation.op.function_name().unwrap_or_default();
    let args: Vec<String> = operation.operands.iter().map(css_text).collect();
    match (operation.op, args.as_slice()) {
        (MathOperator::Progress, [value, start, end]) => {
            format!("progress({value} from {start} to {end})")
        }
        (MathOperator::MediaProgress | MathOperator::ContainerProgress, [feature, start, end]) => {
            format!("{name}({feature} from {start} to {end})")
        }
        (MathOperator::ContainerProgress, [feature, container, start, end]) => {
            format!("{name}({feature} of {container} from {start} to {end})")
        }
        _ => {
            let joined = args.join(", ");
            match operation.op.rounding_strategy_keyword() {
                Some(strategy) => format!("{name}({strategy}, {joined})"),
                None => format!("{name}({joined})"),
            }
        }
    }
}

fn serialize_anchor_query(query: &AnchorQuery) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let AnchorSpecifier::Named(name) = &query.specifier {
        parts.push(name.name.clone());
    }
    match query.value {
        AnchorQueryValue::Side(side) => parts.push(side.keyword().to_owned()),
        AnchorQueryValue::Percentage(percent) => parts.push(format!("{}%", format_number(percent))),
        AnchorQueryValue::Size(size) => {
            if let Some(keyword) = size.keyword() {
                parts.push(keyword.to_owned());
            }
        }
    }
    let mut text = String::from(match query.query_type {
        AnchorQueryType::Anchor => "anchor(",
        AnchorQueryType::AnchorSize => "anchor-size(",
    });
    text.push_str(&parts.join(" "));
    if let Some(fallback) = &query.fallback {
        if !parts.is_empty() {
            text.push_str(", ");
        }
        text.push_str(&css_text(fallback));
    }
    text.push(')');
    text
}

/// Serialized form of an expression tree (without the outer `calc()`).
pub fn css_text(node: &Rc<MathExpressionNode>) -> String {
    match node.kind() {
        NodeKind::NumericLiteral(literal) => literal.css_text(),
        NodeKind::IdentifierLiteral(name) => name.clone(),
        NodeKind::AnchorQuery(query) => serialize_anchor_query(query),
        NodeKind::Operation(operation) => {
            if operation.op.is_additive() {
                serialize_sum(node)
            } else if operation.op.is_arithmetic() {
                serialize_product(operation)
            } else {
                serialize_function(operation)
            }
        }
    }
}

impl MathExpressionNode {
    pub fn css_text(self: &Rc<Self>) -> String {
        css_text(self)
    }
}
