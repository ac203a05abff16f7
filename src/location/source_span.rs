// src/location/source_span.rs
use crate::location::source_location::SourceLocation;
use std::fmt;
use std::sync::Arc;

/// A contiguous range of source code in a specific file.
///
/// `start` is inclusive, `end` is exclusive. Spans are attached to every
/// token and carried into errors for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceSpan {
    /// Path to the source file (shared reference).
    pub file_path: Arc<str>,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    #[must_use]
    pub const fn new(file_path: Arc<str>, start: SourceLocation, end: SourceLocation) -> Self {
        Self { file_path, start, end }
    }
}

impl Default for SourceSpan {
    fn default() -> Self {
        Self::new(Arc::from(""), SourceLocation::default(), SourceLocation::default())
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.start.line, self.start.column)
    }
}
