//! # scanform-core
//!
//! A format-driven input conversion engine: the `scanf`-family core as a
//! safe Rust library. Given a template string and an ordered list of typed
//! destination slots, the engine consumes characters from an input source,
//! matches literals and whitespace, converts fields (integers in bases
//! 2–36, floating point, strings, scansets, character counts), and reports
//! how many fields were bound.
//!
//! Three source backends (in-memory buffer, stream, interactive console),
//! two character widths (narrow bytes and wide code units), and two
//! destination-binding modes (classic and bounds-checked) combine into one
//! generic engine; see [`Scanner`] and the free `scan_*` entry points.
//!
//! ```
//! use scanform_core::{scan_bytes, Slot, Status};
//!
//! let mut n: i32 = 0;
//! let mut word = [0u8; 8];
//! let report = scan_bytes(
//!     b"  42 apples",
//!     "%d %s",
//!     &mut [Slot::I32(&mut n), Slot::Bytes(&mut word)],
//! );
//! assert_eq!(report.count(), 2);
//! assert_eq!(report.status, Status::Completed);
//! assert_eq!(n, 42);
//! assert_eq!(&word[..7], b"apples\0");
//! ```

#![deny(unsafe_code)]

pub mod api;
pub mod chars;
pub mod diag;
pub mod locale;
pub mod outcome;
pub mod slot;
pub mod source;

mod engine;
mod format;
mod numeric;

pub use api::{
    Scanner, scan_bytes, scan_bytes_checked, scan_console, scan_console_checked, scan_reader,
    scan_reader_checked, scan_wide, scan_wide_checked, scan_wide_reader, scan_wide_reader_checked,
};
pub use chars::{WideChar, to_wide};
pub use locale::ScanLocale;
pub use outcome::{EOF, Report, ScanError, Status};
pub use slot::Slot;
pub use source::console::{Console, ConsoleDevice, StdinConsole};
pub use source::stream::{ScanStream, WideScanStream};
pub use source::{BufferSource, Fetch, Source};
