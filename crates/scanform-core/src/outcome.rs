//! Terminal states, conversion-count accounting, and the public error type.
//!
//! Every call runs to exactly one terminal state. The classic return value
//! is the count of bound fields, with one carve-out: when nothing was bound
//! and the source was exhausted before the first field, the call reports the
//! end-of-input sentinel instead of zero.

use thiserror::Error;

/// End-of-input sentinel returned by [`Report::count`].
pub const EOF: i32 = -1;

/// Terminal state of a conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The whole template was processed.
    Completed,
    /// Input did not conform to the template at some directive.
    MatchFailure,
    /// The source was exhausted (or errored) before the current field could
    /// consume its first character.
    InputFailure,
    /// Malformed template or destination list. Fatal to the call.
    FormatError,
    /// A destination was too small for a variable-length result.
    CapacityError,
}

/// Result of one conversion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Number of non-suppressed fields successfully bound.
    pub converted: usize,
    /// Terminal state the call reached.
    pub status: Status,
}

impl Report {
    /// The classic integer return value: the bound-field count, or [`EOF`]
    /// when the count is zero and the terminal state is input exhaustion.
    #[must_use]
    pub fn count(&self) -> i32 {
        if self.converted == 0 && self.status == Status::InputFailure {
            EOF
        } else {
            self.converted as i32
        }
    }

    /// Maps the report onto a `Result` for callers that treat fatal states
    /// as errors. Partial success (a truncated count after a match failure)
    /// is `Ok`.
    pub fn into_result(self) -> Result<usize, ScanError> {
        match self.status {
            Status::FormatError => Err(ScanError::Format),
            Status::CapacityError => Err(ScanError::Capacity),
            Status::InputFailure if self.converted == 0 => Err(ScanError::InputExhausted),
            _ => Ok(self.converted),
        }
    }
}

/// Fatal conversion-call outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The source was exhausted before the first field converted.
    #[error("input exhausted before the first conversion")]
    InputExhausted,
    /// Malformed conversion directive, or a destination list that does not
    /// agree with the template.
    #[error("malformed conversion directive or destination list")]
    Format,
    /// A destination was too small for a variable-length result.
    #[error("destination capacity too small for converted field")]
    Capacity,
}

/// Tracks bound fields while a call runs.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    converted: usize,
}

impl Accumulator {
    pub(crate) fn bound(&mut self) {
        self.converted += 1;
    }

    pub(crate) fn converted(&self) -> usize {
        self.converted
    }

    pub(crate) fn finish(self, status: Status) -> Report {
        Report {
            converted: self.converted,
            status,
        }
    }
}
