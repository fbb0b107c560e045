//! Pull-based input sources.
//!
//! One source instance backs one conversion call. Three backends exist:
//! a fixed in-memory buffer ([`BufferSource`]), a byte stream
//! ([`stream::ScanStream`] plus a per-call adapter), and an interactive
//! console ([`console::Console`]). All expose the same contract: fetch the
//! next character, push characters back, and count what the call consumed.

pub mod buffer;
pub mod console;
pub mod stream;

pub use buffer::BufferSource;

use crate::chars::ScanChar;

/// One fetch from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch<C> {
    /// The next character.
    Char(C),
    /// End of the underlying data.
    End,
    /// The underlying resource reported an error. Sticky.
    Error,
}

/// A character provider for one conversion call.
///
/// `unget` is LIFO and may hold several pending characters; ungot
/// characters come back from `next` before anything new is read. Interactive
/// devices are only required to honor a single pending character.
pub trait Source<C: ScanChar> {
    /// Fetches the next character, an end marker, or an error marker.
    fn next(&mut self) -> Fetch<C>;

    /// Pushes back a character previously returned by `next`.
    fn unget(&mut self, c: C);

    /// Characters consumed so far in this call. Decremented by `unget`.
    fn consumed(&self) -> usize;

    /// Looks at the next character without consuming it.
    fn peek(&mut self) -> Fetch<C>
    where
        Self: Sized,
    {
        match self.next() {
            Fetch::Char(c) => {
                self.unget(c);
                Fetch::Char(c)
            }
            other => other,
        }
    }
}
