//! Abbreviation tokenizer
//!
//! Scans an abbreviation left to right and produces structural tokens. At each
//! position the scanner is in its start state and dispatches on the next
//! character:
//!
//! - `[` reads an attribute block (one token per attribute)
//! - `#` / `.` read id and class shorthand
//! - `*` reads a multiplier
//! - `{` reads a brace-balanced text literal, kept verbatim
//! - `>`, `+`, `^`, `(`, `)` are structural operators
//! - `/` marks the preceding element as self-closing
//! - anything else that can appear in a tag name starts an element name
//!
//! Every completed token returns the scanner to the start state. Unbalanced
//! brackets, braces or parentheses abort tokenization with a [`ZenError::Parse`].

use std::ops::Range;

use crate::Result;
use crate::error::{ParseErrorKind, ZenError};

/// Byte range of a token in the abbreviation
pub type Span = Range<usize>;

/// Which shorthand produced an [`TokenKind::IdClass`] token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandKind {
    Id,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// `>`
    Child,
    /// `+`
    Sibling,
    /// `^`
    ClimbUp,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Element(String),
    IdClass(ShorthandKind, String),
    /// Attribute name and value (empty when none was given)
    Attribute(String, String),
    Multiplier(usize),
    Text(String),
    SelfClose,
    Operator(OperatorKind),
}

/// A token with its kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_operator(&self, op: OperatorKind) -> bool {
        self.kind == TokenKind::Operator(op)
    }
}

/// Tokenize an abbreviation
///
/// Leading and trailing whitespace is ignored; spans stay relative to the
/// untrimmed input.
pub fn tokenize(abbreviation: &str) -> Result<Vec<Token>> {
    let end = abbreviation.trim_end().len();
    let start = abbreviation.len() - abbreviation.trim_start().len();
    if start >= end {
        return Err(ZenError::parse_error(ParseErrorKind::EmptyAbbreviation, 0));
    }

    let input = &abbreviation[..end];
    let mut tokens = Vec::new();
    let mut groups: Vec<usize> = Vec::new();
    let mut i = start;

    while let Some((current, size)) = next_char(input, i) {
        let token_start = i;

        match current {
            '[' => {
                let (attributes, block_end) = lex_attributes(input, token_start)?;
                for (name, value) in attributes {
                    tokens.push(Token::new(
                        TokenKind::Attribute(name, value),
                        token_start..block_end,
                    ));
                }
                i = block_end;
            }
            '#' | '.' => {
                let name_end = scan_name(input, i + size);
                if name_end == i + size {
                    return Err(ZenError::parse_error(
                        ParseErrorKind::UnexpectedCharacter(current),
                        token_start,
                    ));
                }
                let kind = if current == '#' {
                    ShorthandKind::Id
                } else {
                    ShorthandKind::Class
                };
                tokens.push(Token::new(
                    TokenKind::IdClass(kind, input[i + size..name_end].to_string()),
                    token_start..name_end,
                ));
                i = name_end;
            }
            '*' => {
                let digits_start = i + size;
                let digits_end = digits_start
                    + input[digits_start..]
                        .bytes()
                        .take_while(u8::is_ascii_digit)
                        .count();
                let count = if digits_end == digits_start {
                    1
                } else {
                    // Only overflow can fail here; the node ceiling rejects it later
                    input[digits_start..digits_end]
                        .parse::<usize>()
                        .unwrap_or(usize::MAX)
                };
                if count == 0 {
                    return Err(ZenError::parse_error(
                        ParseErrorKind::InvalidMultiplier,
                        token_start,
                    ));
                }
                tokens.push(Token::new(
                    TokenKind::Multiplier(count),
                    token_start..digits_end,
                ));
                i = digits_end;
            }
            '{' => {
                let text_end = lex_text(input, token_start)?;
                tokens.push(Token::new(
                    TokenKind::Text(input[token_start + 1..text_end - 1].to_string()),
                    token_start..text_end,
                ));
                i = text_end;
            }
            '>' | '+' | '^' => {
                let op = match current {
                    '>' => OperatorKind::Child,
                    '+' => OperatorKind::Sibling,
                    _ => OperatorKind::ClimbUp,
                };
                tokens.push(Token::new(TokenKind::Operator(op), span(i, i + size)));
                i += size;
            }
            '(' => {
                groups.push(token_start);
                tokens.push(Token::new(
                    TokenKind::Operator(OperatorKind::GroupOpen),
                    span(i, i + size),
                ));
                i += size;
            }
            ')' => {
                if groups.pop().is_none() {
                    return Err(ZenError::parse_error(
                        ParseErrorKind::UnbalancedParen,
                        token_start,
                    ));
                }
                tokens.push(Token::new(
                    TokenKind::Operator(OperatorKind::GroupClose),
                    span(i, i + size),
                ));
                i += size;
            }
            ']' => {
                return Err(ZenError::parse_error(
                    ParseErrorKind::UnbalancedBracket,
                    token_start,
                ));
            }
            '}' => {
                return Err(ZenError::parse_error(
                    ParseErrorKind::UnbalancedBrace,
                    token_start,
                ));
            }
            '/' => {
                tokens.push(Token::new(TokenKind::SelfClose, span(i, i + size)));
                i += size;
            }
            c if is_name_char(c) => {
                let name_end = scan_name(input, i);
                tokens.push(Token::new(
                    TokenKind::Element(input[i..name_end].to_string()),
                    token_start..name_end,
                ));
                i = name_end;
            }
            c => {
                return Err(ZenError::parse_error(
                    ParseErrorKind::UnexpectedCharacter(c),
                    token_start,
                ));
            }
        }
    }

    if let Some(open) = groups.pop() {
        return Err(ZenError::parse_error(ParseErrorKind::UnbalancedParen, open));
    }

    Ok(tokens)
}

/// Characters allowed in tag names and id/class shorthand
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '!' | '$' | '@')
}

fn scan_name(input: &str, start: usize) -> usize {
    let mut end = start;
    while let Some((c, size)) = next_char(input, end)
        && is_name_char(c)
    {
        end += size;
    }
    end
}

/// Lex a `[...]` block starting at `start`; returns the attributes and the end offset
fn lex_attributes(input: &str, start: usize) -> Result<(Vec<(String, String)>, usize)> {
    let mut attributes = Vec::new();
    let mut i = start + 1;

    loop {
        while let Some((c, size)) = next_char(input, i)
            && c.is_whitespace()
        {
            i += size;
        }

        let Some((c, size)) = next_char(input, i) else {
            return Err(ZenError::parse_error(
                ParseErrorKind::UnbalancedBracket,
                start,
            ));
        };
        if c == ']' {
            return Ok((attributes, i + size));
        }

        let name_start = i;
        while let Some((c, size)) = next_char(input, i)
            && !c.is_whitespace()
            && !matches!(c, '=' | '[' | ']' | '"' | '\'')
        {
            i += size;
        }
        if i == name_start {
            return Err(ZenError::parse_error(
                ParseErrorKind::UnexpectedCharacter(c),
                i,
            ));
        }
        let name = input[name_start..i].to_string();

        let mut value = String::new();
        if let Some(('=', eq_size)) = next_char(input, i) {
            i += eq_size;
            match next_char(input, i) {
                Some((quote @ ('"' | '\''), quote_size)) => {
                    let value_start = i + quote_size;
                    let Some(len) = input[value_start..].find(quote) else {
                        return Err(ZenError::parse_error(
                            ParseErrorKind::UnbalancedBracket,
                            start,
                        ));
                    };
                    value = input[value_start..value_start + len].to_string();
                    i = value_start + len + quote_size;
                }
                _ => {
                    let value_start = i;
                    let mut depth = 0usize;
                    while let Some((c, size)) = next_char(input, i) {
                        match c {
                            '[' => depth += 1,
                            ']' if depth == 0 => break,
                            ']' => depth -= 1,
                            c if c.is_whitespace() && depth == 0 => break,
                            _ => {}
                        }
                        i += size;
                    }
                    value = input[value_start..i].to_string();
                }
            }
        }

        attributes.push((name, value));
    }
}

/// Lex a `{...}` literal starting at `start`; returns the offset after the closing brace
fn lex_text(input: &str, start: usize) -> Result<usize> {
    let mut depth = 0usize;
    let mut i = start;

    while let Some((c, size)) = next_char(input, i) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + size);
                }
            }
            _ => {}
        }
        i += size;
    }

    Err(ZenError::parse_error(ParseErrorKind::UnbalancedBrace, start))
}

/// Get the next character and its byte size at `pos`
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

/// Create a span from start to end
fn span(start: usize, end: usize) -> Span {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn parse_kind(input: &str) -> ParseErrorKind {
        tokenize(input).unwrap_err().parse_kind().unwrap()
    }

    #[test]
    fn test_element_with_shorthand() {
        assert_eq!(
            kinds("div#main.a.b"),
            vec![
                TokenKind::Element("div".into()),
                TokenKind::IdClass(ShorthandKind::Id, "main".into()),
                TokenKind::IdClass(ShorthandKind::Class, "a".into()),
                TokenKind::IdClass(ShorthandKind::Class, "b".into()),
            ]
        );
    }

    #[test]
    fn test_operators_and_multiplier() {
        assert_eq!(
            kinds("ul>li*3^p+a"),
            vec![
                TokenKind::Element("ul".into()),
                TokenKind::Operator(OperatorKind::Child),
                TokenKind::Element("li".into()),
                TokenKind::Multiplier(3),
                TokenKind::Operator(OperatorKind::ClimbUp),
                TokenKind::Element("p".into()),
                TokenKind::Operator(OperatorKind::Sibling),
                TokenKind::Element("a".into()),
            ]
        );
    }

    #[test]
    fn test_attribute_block() {
        assert_eq!(
            kinds(r#"input[type=text name="full name" disabled data-x='1']"#),
            vec![
                TokenKind::Element("input".into()),
                TokenKind::Attribute("type".into(), "text".into()),
                TokenKind::Attribute("name".into(), "full name".into()),
                TokenKind::Attribute("disabled".into(), String::new()),
                TokenKind::Attribute("data-x".into(), "1".into()),
            ]
        );
    }

    #[test]
    fn test_attribute_value_with_nested_brackets() {
        assert_eq!(
            kinds("a[data-path=items[0]]"),
            vec![
                TokenKind::Element("a".into()),
                TokenKind::Attribute("data-path".into(), "items[0]".into()),
            ]
        );
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            kinds("p{a>b+c {nested}}"),
            vec![
                TokenKind::Element("p".into()),
                TokenKind::Text("a>b+c {nested}".into()),
            ]
        );
    }

    #[test]
    fn test_group_and_self_close() {
        assert_eq!(
            kinds("(br/)*2"),
            vec![
                TokenKind::Operator(OperatorKind::GroupOpen),
                TokenKind::Element("br".into()),
                TokenKind::SelfClose,
                TokenKind::Operator(OperatorKind::GroupClose),
                TokenKind::Multiplier(2),
            ]
        );
    }

    #[test]
    fn test_bare_multiplier_defaults_to_one() {
        assert_eq!(
            kinds("li*"),
            vec![TokenKind::Element("li".into()), TokenKind::Multiplier(1)]
        );
    }

    #[test]
    fn test_overflowing_multiplier_saturates() {
        assert_eq!(
            kinds("li*99999999999999999999999"),
            vec![
                TokenKind::Element("li".into()),
                TokenKind::Multiplier(usize::MAX)
            ]
        );
    }

    #[test]
    fn test_spans_are_relative_to_untrimmed_input() {
        let tokens = tokenize("  a>b  ").unwrap();
        assert_eq!(tokens[0].span, 2..3);
        assert_eq!(tokens[2].span, 4..5);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_kind("   "), ParseErrorKind::EmptyAbbreviation);
        assert_eq!(parse_kind("div[class="), ParseErrorKind::UnbalancedBracket);
        assert_eq!(parse_kind("div[title=\"x]"), ParseErrorKind::UnbalancedBracket);
        assert_eq!(parse_kind("div]"), ParseErrorKind::UnbalancedBracket);
        assert_eq!(parse_kind("p{text"), ParseErrorKind::UnbalancedBrace);
        assert_eq!(parse_kind("(div>p"), ParseErrorKind::UnbalancedParen);
        assert_eq!(parse_kind("div)"), ParseErrorKind::UnbalancedParen);
        assert_eq!(parse_kind("li*0"), ParseErrorKind::InvalidMultiplier);
        assert_eq!(
            parse_kind("div p"),
            ParseErrorKind::UnexpectedCharacter(' ')
        );
        assert_eq!(parse_kind("div#"), ParseErrorKind::UnexpectedCharacter('#'));
    }

    #[test]
    fn test_error_offset_points_at_opening_bracket() {
        let err = tokenize("ul>li[title=").unwrap_err();
        assert!(matches!(err, ZenError::Parse { offset: 5, .. }));
    }
}
