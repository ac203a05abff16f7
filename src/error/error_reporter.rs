// src/error/error_reporter.rs
use crate::error::parse_error::ParseError;
use crate::location::line_tracker::LineTracker;
use console::style;

/// Renders parse errors with source context for the CLI.
pub struct ErrorReporter {
    line_tracker: LineTracker,
}

impl ErrorReporter {
    #[must_use]
    pub fn new(line_tracker: LineTracker) -> Self {
        Self { line_tracker }
    }

    pub fn report(&self, error: &ParseError) {
        let span = error.span();
        eprintln!(
            "{} {}\n{} {}",
            style("ERROR:").red().bold(),
            style(error).yellow(),
            style("Location:").blue(),
            style(span).cyan()
        );

        let line = span.start.line;
        let Some(source_line) = self.line_tracker.get_line(line) else { return };
        if source_line.is_empty() {
            return;
        }

        eprintln!("{line:4} │ {source_line}");

        let width = if span.start.line == span.end.line {
            (span.end.column - span.start.column).max(1)
        } else {
            1
        };
        let underline = " ".repeat(span.start.column - 1) + &"^".repeat(width);
        eprintln!("     │ {}", style(underline).red().bold());
    }
}
