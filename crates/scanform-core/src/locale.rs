//! Pass-through locale configuration.
//!
//! The engine recognizes digits and letters per the C locale only; the one
//! locale-sensitive knob it honors is the decimal point character used by
//! floating-point conversions. Callers with no locale needs use the default.

/// Locale-like configuration handed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLocale {
    /// The character accepted as the decimal point in float fields.
    pub decimal_point: char,
}

impl Default for ScanLocale {
    fn default() -> Self {
        Self { decimal_point: '.' }
    }
}

impl ScanLocale {
    /// A locale with a custom decimal point.
    #[must_use]
    pub fn with_decimal_point(decimal_point: char) -> Self {
        Self { decimal_point }
    }
}
