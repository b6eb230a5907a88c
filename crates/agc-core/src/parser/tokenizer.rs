//! Data-line tokenizer — variable declarations and check calls
//!
//! Handles the two structured data lines of the specification format:
//!
//! - `request := FALSE` (variable declaration; the value is kept verbatim)
//! - `compatibility(waiter, customer)` (check call)
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Every error reports line:column

use crate::{Error, Result};

/// Token types for specification data lines
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Assign, // :=
    LParen, // (
    RParen, // )
    Comma,  // ,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Assign => write!(f, "':='"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of line"),
        }
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// A tokenized `name := value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

/// A tokenized `kind(arg, arg, ...)` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee: String,
    pub callee_span: Span,
    pub args: Vec<String>,
}

/// Tokenizer for a single data line
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Tokenizer {
    /// Create a tokenizer over one line of text; `line` is used in spans
    pub fn new(text: &str, line: usize) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line,
        }
    }

    /// Tokenize the remaining input into a stream of spanned tokens
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    /// Read the next token, skipping whitespace
    pub fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace();
        let span = self.current_span();

        let ch = match self.peek() {
            Some(c) => c,
            None => {
                return Ok(SpannedToken {
                    token: Token::Eof,
                    span,
                })
            }
        };

        let token = match ch {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ':' if self.peek_ahead(1) == Some('=') => {
                self.advance();
                self.advance();
                Token::Assign
            }
            c if is_identifier_start(c) => Token::Identifier(self.read_identifier()),
            _ => {
                return Err(Error::parse(
                    self.line,
                    format!("unexpected character '{}' at {}", ch, span),
                ))
            }
        };

        Ok(SpannedToken { token, span })
    }

    /// Everything after the current position, trimmed and untokenized
    pub fn rest(&mut self) -> String {
        let text: String = self.input[self.position..].iter().collect();
        self.position = self.input.len();
        text.trim().to_string()
    }

    fn expect(&mut self, expected: Token) -> Result<Span> {
        let next = self.next_token()?;
        if next.token == expected {
            Ok(next.span)
        } else {
            Err(Error::parse(
                self.line,
                format!("expected {} but found {} at {}", expected, next.token, next.span),
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, Span)> {
        let next = self.next_token()?;
        match next.token {
            Token::Identifier(name) => Ok((name, next.span)),
            other => Err(Error::parse(
                self.line,
                format!("expected identifier but found {} at {}", other, next.span),
            )),
        }
    }

    // ── Character helpers ──────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.position + 1,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if is_identifier_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.position].iter().collect()
    }
}

// ── Line grammars ──────────────────────────────────────────

/// Parse `identifier := expression`
///
/// The expression is not interpreted; it is emitted verbatim as the
/// variable's initial value.
pub fn assignment(text: &str, line: usize) -> Result<Assignment> {
    let mut tokenizer = Tokenizer::new(text, line);
    let (name, _) = tokenizer.expect_identifier()?;
    tokenizer.expect(Token::Assign)?;
    let value = tokenizer.rest();
    if value.is_empty() {
        return Err(Error::parse(
            line,
            format!("variable '{}' has no initial value", name),
        ));
    }
    Ok(Assignment { name, value })
}

/// Parse `callee(arg, arg, ...)`, nothing may follow the closing paren
pub fn call(text: &str, line: usize) -> Result<Call> {
    let mut tokenizer = Tokenizer::new(text, line);
    let (callee, callee_span) = tokenizer.expect_identifier()?;
    tokenizer.expect(Token::LParen)?;

    let mut args = Vec::new();
    loop {
        let (arg, _) = tokenizer.expect_identifier()?;
        args.push(arg);

        let next = tokenizer.next_token()?;
        match next.token {
            Token::Comma => continue,
            Token::RParen => break,
            other => {
                return Err(Error::parse(
                    line,
                    format!("expected ',' or ')' but found {} at {}", other, next.span),
                ))
            }
        }
    }
    tokenizer.expect(Token::Eof)?;

    Ok(Call {
        callee,
        callee_span,
        args,
    })
}

/// Whether `text` is a single well-formed identifier
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Tokenizer::new(input, 1)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|st| st.token)
            .collect()
    }

    // ── Tokens ─────────────────────────────────────────

    #[test]
    fn test_tokenize_check_call() {
        assert_eq!(
            tokenize("compatibility(waiter, customer)"),
            vec![
                Token::Identifier("compatibility".into()),
                Token::LParen,
                Token::Identifier("waiter".into()),
                Token::Comma,
                Token::Identifier("customer".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_assign() {
        assert_eq!(
            tokenize("request := x"),
            vec![
                Token::Identifier("request".into()),
                Token::Assign,
                Token::Identifier("x".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_colon_rejected() {
        let err = Tokenizer::new("a : b", 3).tokenize().unwrap_err();
        assert!(err.to_string().contains("unexpected character ':' at 3:3"));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = Tokenizer::new("  f(a)", 9).tokenize().unwrap();
        assert_eq!(tokens[0].span, Span { line: 9, column: 3 });
        assert_eq!(tokens[1].span, Span { line: 9, column: 4 });
        assert_eq!(tokens[2].span, Span { line: 9, column: 5 });
    }

    // ── Assignments ────────────────────────────────────

    #[test]
    fn test_assignment_literal() {
        let a = assignment("request := FALSE", 4).unwrap();
        assert_eq!(a.name, "request");
        assert_eq!(a.value, "FALSE");
    }

    #[test]
    fn test_assignment_keeps_expression_verbatim() {
        let a = assignment("ready:=  !busy & (x | y)", 4).unwrap();
        assert_eq!(a.name, "ready");
        assert_eq!(a.value, "!busy & (x | y)");
    }

    #[test]
    fn test_assignment_missing_value() {
        let err = assignment("request :=", 12).unwrap_err();
        assert!(matches!(err, Error::ParseError { line: 12, .. }));
    }

    #[test]
    fn test_assignment_missing_marker() {
        let err = assignment("request FALSE", 2).unwrap_err();
        assert!(err.to_string().contains("expected ':='"));
    }

    #[test]
    fn test_assignment_invalid_name() {
        assert!(assignment("1request := FALSE", 2).is_err());
    }

    // ── Calls ──────────────────────────────────────────

    #[test]
    fn test_call_two_args() {
        let c = call("consistency( waiter ,customer )", 20).unwrap();
        assert_eq!(c.callee, "consistency");
        assert_eq!(c.args, vec!["waiter", "customer"]);
    }

    #[test]
    fn test_call_trailing_garbage() {
        let err = call("consistency(a, b) extra", 20).unwrap_err();
        assert!(err.to_string().contains("expected end of line"));
    }

    #[test]
    fn test_call_unclosed() {
        assert!(call("consistency(a, b", 20).is_err());
    }

    #[test]
    fn test_call_empty_arg() {
        assert!(call("consistency(a, )", 20).is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("waiter"));
        assert!(is_identifier("_tmp1"));
        assert!(is_identifier("bus-ctrl"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("two words"));
        assert!(!is_identifier(""));
    }
}
