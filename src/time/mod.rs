// src/time/mod.rs
//! Phase timing for the CLI's `--timings` mode.
use std::fmt;
use std::time::{Duration, Instant};

pub struct Timer {
    start: Instant,
    title: String,
}

impl Timer {
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self { title: title.to_owned(), start: Instant::now() }
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, format_duration(self.elapsed()))
    }
}

/// Picks the most readable unit for a duration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos() as f64;
    if nanos < 1_000.0 {
        format!("{nanos:.0} ns")
    } else if nanos < 1_000_000.0 {
        format!("{:.2} us", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}
