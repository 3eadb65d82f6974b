//! CSS Values & Units Level 4 — §4.2 Author-defined Identifiers
//! Spec: <https://www.w3.org/TR/css-values-4/#dashed-idents>

use crate::MathParseError;
use cssparser::{Parser, Token};

/// A CSS identifier value, lowercased for keyword comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident(pub String);

/// Parse a CSS identifier token (keywords are ASCII-lowercased).
///
/// # Errors
/// Returns `MathParseError::UnexpectedToken` when the next token is not an identifier.
#[inline]
pub fn parse_ident(input: &mut Parser) -> Result<Ident, MathParseError> {
    match input.next() {
        Ok(Token::Ident(text)) => Ok(Ident(text.as_ref().to_ascii_lowercase())),
        Ok(_) => Err(MathParseError::UnexpectedToken),
        Err(_) => Err(MathParseError::UnexpectedEnd),
    }
}

/// Parse a `<dashed-ident>` (`--name`), preserving case since it is author-defined.
///
/// # Errors
/// Returns `MathParseError::UnexpectedToken` when the next token is not an identifier
/// starting with two dashes.
pub fn parse_dashed_ident(input: &mut Parser) -> Result<String, MathParseError> {
    input.next().map_or(Err(MathParseError::UnexpectedEnd), |token| {
        match token.clone() {
            Token::Ident(text) if text.starts_with("--") && text.len() > 2 => {
                Ok(text.as_ref().to_owned())
            }
            Token::Ident(_)
            | Token::AtKeyword(_)
            | Token::Hash(_)
            | Token::IDHash(_)
            | Token::QuotedString(_)
            | Token::UnquotedUrl(_)
            | Token::Delim(_)
            | Token::Number { .. }
            | Token::Percentage { .. }
            | Token::Dimension { .. }
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
            | Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock
            | Token::BadUrl(_)
            | Token::BadString(_)
            | Token::CloseParenthesis
            | Token::CloseSquareBracket
            | Token::CloseCurlyBracket => Err(MathParseError::UnexpectedToken),
        }
    })
}
