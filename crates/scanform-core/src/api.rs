//! Public entry points.
//!
//! [`Scanner`] is the orthogonal core: a binding mode crossed with a locale,
//! applied to any source backend at either character width. The free
//! functions below give one named entry point per
//! {source kind} × {character width} × {binding mode} combination and
//! forward to a `Scanner` unchanged, the way the classic family's outer
//! wrappers forward their argument lists.

use std::io::Read;

use crate::chars::{ScanChar, WideChar};
use crate::engine;
use crate::locale::ScanLocale;
use crate::outcome::Report;
use crate::slot::{BindMode, Binder, Slot};
use crate::source::buffer::BufferSource;
use crate::source::console::{Console, ConsoleDevice, ConsoleSource};
use crate::source::stream::{ScanStream, StreamSource, WideScanStream, WideStreamSource};
use crate::source::Source;

/// A conversion-engine configuration: binding mode plus locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    locale: ScanLocale,
    checked: bool,
}

impl Scanner {
    /// Classic binding mode, default locale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds-checked binding mode, default locale.
    #[must_use]
    pub fn checked() -> Self {
        Self {
            locale: ScanLocale::default(),
            checked: true,
        }
    }

    /// Replaces the locale configuration.
    #[must_use]
    pub fn with_locale(mut self, locale: ScanLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Scans a narrow in-memory buffer.
    pub fn scan_bytes(&self, input: &[u8], format: &str, slots: &mut [Slot<'_>]) -> Report {
        let mut src = BufferSource::new(input);
        self.dispatch(&mut src, format.as_bytes(), slots)
    }

    /// Scans a wide in-memory buffer.
    pub fn scan_wide(
        &self,
        input: &[WideChar],
        format: &[WideChar],
        slots: &mut [Slot<'_>],
    ) -> Report {
        let mut src = BufferSource::new(input);
        self.dispatch(&mut src, format, slots)
    }

    /// Scans a narrow byte stream.
    pub fn scan_reader<R: Read>(
        &self,
        stream: &mut ScanStream<R>,
        format: &str,
        slots: &mut [Slot<'_>],
    ) -> Report {
        let mut src = StreamSource::new(stream);
        self.dispatch(&mut src, format.as_bytes(), slots)
    }

    /// Scans a wide code-unit stream.
    pub fn scan_wide_reader<I: Iterator<Item = WideChar>>(
        &self,
        stream: &mut WideScanStream<I>,
        format: &[WideChar],
        slots: &mut [Slot<'_>],
    ) -> Report {
        let mut src = WideStreamSource::new(stream);
        self.dispatch(&mut src, format, slots)
    }

    /// Scans an interactive console, echoing consumed characters.
    pub fn scan_console<D: ConsoleDevice>(
        &self,
        console: &mut Console<D>,
        format: &str,
        slots: &mut [Slot<'_>],
    ) -> Report {
        let mut src = ConsoleSource::new(console);
        self.dispatch(&mut src, format.as_bytes(), slots)
    }

    fn dispatch<C: ScanChar, S: Source<C>>(
        &self,
        src: &mut S,
        format: &[C],
        slots: &mut [Slot<'_>],
    ) -> Report {
        let mode = if self.checked {
            BindMode::Checked
        } else {
            BindMode::Classic
        };
        let mut binder = Binder::new(slots, mode);
        engine::run(src, format, &mut binder, &self.locale)
    }
}

/// Scans a narrow buffer with classic binding.
pub fn scan_bytes(input: &[u8], format: &str, slots: &mut [Slot<'_>]) -> Report {
    Scanner::new().scan_bytes(input, format, slots)
}

/// Scans a narrow buffer with bounds-checked binding.
pub fn scan_bytes_checked(input: &[u8], format: &str, slots: &mut [Slot<'_>]) -> Report {
    Scanner::checked().scan_bytes(input, format, slots)
}

/// Scans a wide buffer with classic binding.
pub fn scan_wide(input: &[WideChar], format: &[WideChar], slots: &mut [Slot<'_>]) -> Report {
    Scanner::new().scan_wide(input, format, slots)
}

/// Scans a wide buffer with bounds-checked binding.
pub fn scan_wide_checked(
    input: &[WideChar],
    format: &[WideChar],
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::checked().scan_wide(input, format, slots)
}

/// Scans a narrow byte stream with classic binding.
pub fn scan_reader<R: Read>(
    stream: &mut ScanStream<R>,
    format: &str,
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::new().scan_reader(stream, format, slots)
}

/// Scans a narrow byte stream with bounds-checked binding.
pub fn scan_reader_checked<R: Read>(
    stream: &mut ScanStream<R>,
    format: &str,
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::checked().scan_reader(stream, format, slots)
}

/// Scans a wide code-unit stream with classic binding.
pub fn scan_wide_reader<I: Iterator<Item = WideChar>>(
    stream: &mut WideScanStream<I>,
    format: &[WideChar],
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::new().scan_wide_reader(stream, format, slots)
}

/// Scans a wide code-unit stream with bounds-checked binding.
pub fn scan_wide_reader_checked<I: Iterator<Item = WideChar>>(
    stream: &mut WideScanStream<I>,
    format: &[WideChar],
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::checked().scan_wide_reader(stream, format, slots)
}

/// Scans an interactive console with classic binding.
pub fn scan_console<D: ConsoleDevice>(
    console: &mut Console<D>,
    format: &str,
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::new().scan_console(console, format, slots)
}

/// Scans an interactive console with bounds-checked binding.
pub fn scan_console_checked<D: ConsoleDevice>(
    console: &mut Console<D>,
    format: &str,
    slots: &mut [Slot<'_>],
) -> Report {
    Scanner::checked().scan_console(console, format, slots)
}
