// src/tokens/token.rs
use crate::location::source_span::SourceSpan;
use crate::tokens::token_kind::TokenKind;
use std::fmt;

/// A token together with the span of source text it was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}
