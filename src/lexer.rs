// src/lexer.rs
//! Tokenization of Simple source text.
//!
//! The heavy lifting is done by the logos-derived [`TokenKind`]; this module
//! wraps it so every token carries a [`SourceSpan`], lexical failures become
//! [`ParseError`]s, and a final `Eof` token is emitted exactly once.
use crate::{
    error::parse_error::ParseError,
    location::line_tracker::LineTracker,
    tokens::{
        token::Token,
        token_kind::{LexError, TokenKind},
    },
};
use logos::Logos;

pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line_tracker: LineTracker,
    source_len: usize,
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(file_path: &str, source: &'a str) -> Self {
        let line_tracker = LineTracker::new(file_path, source.to_owned());
        let inner = TokenKind::lexer(source);
        let source_len = source.len();
        Lexer { inner, line_tracker, source_len, eof_emitted: false }
    }

    #[must_use]
    pub const fn line_tracker(&self) -> &LineTracker {
        &self.line_tracker
    }

    /// Produces the next token, an `Eof` token at end of input, and `None`
    /// afterwards.
    pub fn next_token(&mut self) -> Option<Result<Token, ParseError>> {
        if self.eof_emitted {
            return None;
        }

        let (kind_result, range) = if let Some(kind_result) = self.inner.next() {
            (kind_result, self.inner.span())
        } else {
            self.eof_emitted = true;
            (Ok(TokenKind::Eof), self.source_len..self.source_len)
        };

        let span = self.line_tracker.span_for(range);
        Some(match kind_result {
            Ok(kind) => Ok(Token { kind, span }),
            Err(LexError::LeadingZero) => Err(ParseError::LeadingZero { span }),
            Err(LexError::IntegerOverflow) => Err(ParseError::IntegerOutOfRange { span }),
            Err(LexError::UnexpectedCharacter) => {
                Err(ParseError::Unexpected { found: self.inner.slice().to_owned(), span })
            }
        })
    }
}

/// Lexes the whole input eagerly, stopping at the first failure.
///
/// The returned stream always ends with an `Eof` token.
pub fn tokenize(file_path: &str, source: &str) -> Result<(Vec<Token>, LineTracker), ParseError> {
    let mut lexer = Lexer::new(file_path, source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token?);
    }
    let line_tracker = lexer.line_tracker().clone();
    Ok((tokens, line_tracker))
}
