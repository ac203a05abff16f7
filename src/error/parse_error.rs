// src/error/parse_error.rs
use crate::location::source_span::SourceSpan;
use thiserror::Error;

/// Fatal failures raised while lexing or parsing.
///
/// Every variant carries the span it was raised at. The `Display` text is
/// the stable, user-visible message; the span is rendered separately by the
/// [`crate::error::ErrorReporter`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Syntax error, expected {expected}: {found}")]
    Expected { expected: String, found: String, span: SourceSpan },

    #[error("Syntax error, unexpected {found}")]
    Unexpected { found: String, span: SourceSpan },

    #[error("Syntax error: integer values cannot start with '0'")]
    LeadingZero { span: SourceSpan },

    #[error("Syntax error: integer value does not fit in 64 bits")]
    IntegerOutOfRange { span: SourceSpan },

    #[error("Expected an identifier, but found '{found}'")]
    ExpectedIdentifier { found: String, span: SourceSpan },

    #[error("Undefined name '{name}'")]
    UndefinedName { name: String, span: SourceSpan },

    #[error("Redefining name '{name}'")]
    RedefinedName { name: String, span: SourceSpan },

    #[error("Cannot define a new name on one arm of an if")]
    UnbalancedIfArms { span: SourceSpan },
}

impl ParseError {
    #[must_use]
    pub const fn span(&self) -> &SourceSpan {
        match self {
            Self::Expected { span, .. }
            | Self::Unexpected { span, .. }
            | Self::LeadingZero { span }
            | Self::IntegerOutOfRange { span }
            | Self::ExpectedIdentifier { span, .. }
            | Self::UndefinedName { span, .. }
            | Self::RedefinedName { span, .. }
            | Self::UnbalancedIfArms { span } => span,
        }
    }
}
