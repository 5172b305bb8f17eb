//! Fetch windows: how many days around today a single request covers.

use std::fmt;

use jiff::{Span, Zoned, civil::Date};

/// The feed refuses spans longer than this many days.
pub const MAX_WINDOW_DAYS: i32 = 7;

/// Errors constructing or resolving a window.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("cannot fetch more than {MAX_WINDOW_DAYS} days in one request (got {0})")]
    OutOfRange(i32),

    #[error("date arithmetic overflowed: {0}")]
    Overflow(#[from] jiff::Error),
}

/// A signed day offset from today, bounded to `±MAX_WINDOW_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow(i32);

impl FetchWindow {
    pub fn new(days: i32) -> Result<Self, WindowError> {
        if days.unsigned_abs() > MAX_WINDOW_DAYS.unsigned_abs() {
            return Err(WindowError::OutOfRange(days));
        }
        Ok(Self(days))
    }

    pub fn days(self) -> i32 {
        self.0
    }

    /// Resolves the window against `today`.
    ///
    /// Positive offsets look forward (`[today, today+d]`), negative ones
    /// look back (`[today+d, today]`).
    pub fn span_from(self, today: Date) -> Result<DateSpan, WindowError> {
        let other = today.checked_add(Span::new().days(self.0))?;
        let (start, end) = if self.0 >= 0 {
            (today, other)
        } else {
            (other, today)
        };
        Ok(DateSpan { start, end })
    }

    /// Resolves the window against the local calendar date.
    pub fn span(self) -> Result<DateSpan, WindowError> {
        self.span_from(Zoned::now().date())
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: Date,
    pub end: Date,
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
