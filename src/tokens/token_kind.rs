// src/tokens/token_kind.rs
use logos::Logos;
use std::fmt;

/// Lexical failures surfaced by the logos callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
    /// Integer literals other than `0` itself must not start with `0`.
    LeadingZero,
    IntegerOverflow,
}

fn parse_integer(lex: &mut logos::Lexer<TokenKind>) -> Result<i64, LexError> {
    let slice = lex.slice();
    if slice.len() > 1 && slice.starts_with('0') {
        return Err(LexError::LeadingZero);
    }
    slice.parse::<i64>().map_err(|_| LexError::IntegerOverflow)
}

/// Token set for the Simple grammar.
///
/// Whitespace is any byte at or below 0x20. Keywords are declared as plain
/// tokens so they win against the identifier regex on exact matches, while
/// longer identifiers (`ifx`, `inta`) still lex as identifiers.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[\x00-\x20]+")]
pub enum TokenKind {
    // Multi-character operators first
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,

    // Single-character operators and punctuation
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("!")]
    Not,
    #[token("=")]
    Equal,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(";")]
    Semicolon,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    // Keywords
    #[token("if")]
    KeywordIf,
    #[token("else")]
    KeywordElse,
    #[token("int")]
    KeywordInt,
    #[token("return")]
    KeywordReturn,
    #[token("true")]
    KeywordTrue,
    #[token("false")]
    KeywordFalse,

    /// Debug directive that snapshots the graph mid-parse.
    #[token("#showGraph")]
    ShowGraph,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned(), priority = 2)]
    Identifier(String),

    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),

    /// Synthesized by the lexer wrapper once the input is exhausted.
    Eof,
}

impl TokenKind {
    /// True for tokens that may not be used as identifiers.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::KeywordIf
                | Self::KeywordElse
                | Self::KeywordInt
                | Self::KeywordReturn
                | Self::KeywordTrue
                | Self::KeywordFalse
        )
    }
}

impl fmt::Display for TokenKind {
    /// Renders the token the way it appears in source, for diagnostics.
    /// `Eof` renders as the empty string so "expected ;: " reads naturally
    /// at end of input.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EqualEqual => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::Not => write!(f, "!"),
            Self::Equal => write!(f, "="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Semicolon => write!(f, ";"),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
            Self::OpenBrace => write!(f, "{{"),
            Self::CloseBrace => write!(f, "}}"),
            Self::KeywordIf => write!(f, "if"),
            Self::KeywordElse => write!(f, "else"),
            Self::KeywordInt => write!(f, "int"),
            Self::KeywordReturn => write!(f, "return"),
            Self::KeywordTrue => write!(f, "true"),
            Self::KeywordFalse => write!(f, "false"),
            Self::ShowGraph => write!(f, "#showGraph"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Eof => Ok(()),
        }
    }
}
