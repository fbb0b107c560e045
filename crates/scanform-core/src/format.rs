//! Template interpretation.
//!
//! A cursor walks the template left to right and classifies one directive
//! at a time: whitespace skip, literal match, or a `%` field with its
//! flags. The `%%` sequence collapses to a literal `%` match. Scansets keep
//! a borrowed view of the template body and are evaluated against it at
//! match time.

use crate::chars::ScanChar;

/// Length modifier of a field directive. Selects destination storage width
/// only; it never changes what the field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LengthMod {
    None,
    /// `hh`
    Hh,
    /// `h`
    H,
    /// `l`
    L,
    /// `ll`
    Ll,
    /// `L`
    UpperL,
    /// `w`
    W,
    /// `I32`
    Fixed32,
    /// `I64`
    Fixed64,
    /// bare `I`: native width
    Native,
}

/// Bracketed character class of a scanset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanSet<'f, C: ScanChar> {
    pub negated: bool,
    pub body: &'f [C],
}

impl<C: ScanChar> ScanSet<'_, C> {
    /// Membership test, honoring `a-b` ranges when `-` is neither first nor
    /// last in the body.
    pub(crate) fn contains(&self, code: u32) -> bool {
        let b = self.body;
        let mut hit = false;
        let mut i = 0;
        while i < b.len() {
            if i + 2 < b.len() && b[i + 1].code() == u32::from(b'-') {
                let lo = b[i].code();
                let hi = b[i + 2].code();
                if lo <= code && code <= hi {
                    hit = true;
                }
                i += 3;
            } else if i + 2 == b.len() && b[i + 1].code() == u32::from(b'-') {
                // Trailing `-` and the character before it are literals.
                if b[i].code() == code || u32::from(b'-') == code {
                    hit = true;
                }
                i += 2;
            } else {
                if b[i].code() == code {
                    hit = true;
                }
                i += 1;
            }
        }
        hit != self.negated
    }
}

/// Conversion kind of a field directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conv<'f, C: ScanChar> {
    /// `d`: signed decimal.
    Dec,
    /// `i`: signed, base inferred from a `0x`/`0` prefix.
    Auto,
    /// `o`: unsigned octal.
    Oct,
    /// `u`: unsigned decimal.
    Udec,
    /// `x`/`X`: unsigned hex, optional `0x` prefix.
    Hex,
    /// `e`/`E`/`f`/`F`/`g`/`G`: floating point.
    Float,
    /// `s`/`S`: whitespace-delimited run. `flip` inverts the default
    /// storage width (`S`).
    Str { flip: bool },
    /// `c`/`C`: exactly width characters (default 1), whitespace included.
    Chars { flip: bool },
    /// `[...]`: maximal run over an explicit character class.
    Set(ScanSet<'f, C>),
    /// `n`: characters consumed so far; never counted as a conversion.
    Count,
    /// `p`: pointer-form hex magnitude at native width.
    Ptr,
}

/// One parsed field directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldSpec<'f, C: ScanChar> {
    pub suppress: bool,
    pub width: Option<usize>,
    pub length: LengthMod,
    pub conv: Conv<'f, C>,
}

/// One template directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive<'f, C: ScanChar> {
    /// Skip zero or more input whitespace characters. Never fails.
    Space,
    /// Match this character exactly.
    Literal(C),
    /// Convert one field.
    Field(FieldSpec<'f, C>),
}

/// Why a template failed to parse. Feeds diagnostics; the call outcome is
/// always a format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormatFault {
    DanglingPercent,
    UnknownConversion(u32),
    UnterminatedSet,
}

/// Read-only cursor over a template.
#[derive(Debug)]
pub(crate) struct FormatCursor<'f, C: ScanChar> {
    fmt: &'f [C],
    pos: usize,
}

impl<'f, C: ScanChar> FormatCursor<'f, C> {
    pub(crate) fn new(fmt: &'f [C]) -> Self {
        Self { fmt, pos: 0 }
    }

    fn peek(&self) -> Option<C> {
        self.fmt.get(self.pos).copied()
    }

    fn peek_code(&self) -> Option<u32> {
        self.peek().map(ScanChar::code)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Parses the next directive, `Ok(None)` at the end of the template.
    pub(crate) fn next_directive(&mut self) -> Result<Option<Directive<'f, C>>, FormatFault> {
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        self.bump();
        if c.is_space() {
            return Ok(Some(Directive::Space));
        }
        if c.code() != u32::from(b'%') {
            return Ok(Some(Directive::Literal(c)));
        }
        if self.peek_code() == Some(u32::from(b'%')) {
            let percent = self.fmt[self.pos];
            self.bump();
            return Ok(Some(Directive::Literal(percent)));
        }
        self.parse_field().map(|spec| Some(Directive::Field(spec)))
    }

    fn parse_field(&mut self) -> Result<FieldSpec<'f, C>, FormatFault> {
        let mut suppress = false;
        if self.peek_code() == Some(u32::from(b'*')) {
            suppress = true;
            self.bump();
        }

        let mut width: usize = 0;
        let mut saw_width = false;
        while let Some(code) = self.peek_code() {
            let Some(d) = code.checked_sub(u32::from(b'0')).filter(|&d| d <= 9) else {
                break;
            };
            saw_width = true;
            width = width.saturating_mul(10).saturating_add(d as usize);
            self.bump();
        }
        // An explicit width of zero behaves as if no width was given.
        let width = (saw_width && width > 0).then_some(width);

        let length = self.parse_length_modifier();

        let Some(code) = self.peek_code() else {
            return Err(FormatFault::DanglingPercent);
        };
        self.bump();
        let conv = match u8::try_from(code) {
            Ok(b'd') => Conv::Dec,
            Ok(b'i') => Conv::Auto,
            Ok(b'o') => Conv::Oct,
            Ok(b'u') => Conv::Udec,
            Ok(b'x' | b'X') => Conv::Hex,
            Ok(b'e' | b'E' | b'f' | b'F' | b'g' | b'G') => Conv::Float,
            Ok(b's') => Conv::Str { flip: false },
            Ok(b'S') => Conv::Str { flip: true },
            Ok(b'c') => Conv::Chars { flip: false },
            Ok(b'C') => Conv::Chars { flip: true },
            Ok(b'n') => Conv::Count,
            Ok(b'p') => Conv::Ptr,
            Ok(b'[') => Conv::Set(self.parse_set()?),
            _ => return Err(FormatFault::UnknownConversion(code)),
        };

        Ok(FieldSpec {
            suppress,
            width,
            length,
            conv,
        })
    }

    fn parse_length_modifier(&mut self) -> LengthMod {
        match self.peek_code() {
            Some(c) if c == u32::from(b'h') => {
                self.bump();
                if self.peek_code() == Some(u32::from(b'h')) {
                    self.bump();
                    LengthMod::Hh
                } else {
                    LengthMod::H
                }
            }
            Some(c) if c == u32::from(b'l') => {
                self.bump();
                if self.peek_code() == Some(u32::from(b'l')) {
                    self.bump();
                    LengthMod::Ll
                } else {
                    LengthMod::L
                }
            }
            Some(c) if c == u32::from(b'L') => {
                self.bump();
                LengthMod::UpperL
            }
            Some(c) if c == u32::from(b'w') => {
                self.bump();
                LengthMod::W
            }
            Some(c) if c == u32::from(b'I') => {
                self.bump();
                let two = (self.peek_code(), self.fmt.get(self.pos + 1).map(|c| c.code()));
                match two {
                    (Some(a), Some(b)) if a == u32::from(b'6') && b == u32::from(b'4') => {
                        self.bump();
                        self.bump();
                        LengthMod::Fixed64
                    }
                    (Some(a), Some(b)) if a == u32::from(b'3') && b == u32::from(b'2') => {
                        self.bump();
                        self.bump();
                        LengthMod::Fixed32
                    }
                    _ => LengthMod::Native,
                }
            }
            _ => LengthMod::None,
        }
    }

    fn parse_set(&mut self) -> Result<ScanSet<'f, C>, FormatFault> {
        let negated = if self.peek_code() == Some(u32::from(b'^')) {
            self.bump();
            true
        } else {
            false
        };
        let start = self.pos;
        // A `]` in the first body position is a member, not the terminator.
        if self.peek_code() == Some(u32::from(b']')) {
            self.bump();
        }
        loop {
            match self.peek_code() {
                Some(c) if c == u32::from(b']') => {
                    let body = &self.fmt[start..self.pos];
                    self.bump();
                    return Ok(ScanSet { negated, body });
                }
                Some(_) => self.bump(),
                None => return Err(FormatFault::UnterminatedSet),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(fmt: &[u8]) -> FieldSpec<'_, u8> {
        let mut cursor = FormatCursor::new(fmt);
        match cursor.next_directive() {
            Ok(Some(Directive::Field(spec))) => spec,
            other => panic!("expected field, got {other:?}"),
        }
    }

    #[test]
    fn test_space_and_literal_directives() {
        let mut cursor = FormatCursor::new(b" a".as_slice());
        assert_eq!(cursor.next_directive(), Ok(Some(Directive::Space)));
        assert_eq!(cursor.next_directive(), Ok(Some(Directive::Literal(b'a'))));
        assert_eq!(cursor.next_directive(), Ok(None));
    }

    #[test]
    fn test_double_percent_collapses_to_literal() {
        let mut cursor = FormatCursor::new(b"%%".as_slice());
        assert_eq!(cursor.next_directive(), Ok(Some(Directive::Literal(b'%'))));
        assert_eq!(cursor.next_directive(), Ok(None));
    }

    #[test]
    fn test_basic_field() {
        let spec = field(b"%d");
        assert!(!spec.suppress);
        assert_eq!(spec.width, None);
        assert_eq!(spec.length, LengthMod::None);
        assert_eq!(spec.conv, Conv::Dec);
    }

    #[test]
    fn test_flags_parse_in_order() {
        let spec = field(b"%*12lld");
        assert!(spec.suppress);
        assert_eq!(spec.width, Some(12));
        assert_eq!(spec.length, LengthMod::Ll);
        assert_eq!(spec.conv, Conv::Dec);
    }

    #[test]
    fn test_zero_width_means_no_width() {
        assert_eq!(field(b"%0d").width, None);
    }

    #[test]
    fn test_length_modifiers() {
        assert_eq!(field(b"%hhd").length, LengthMod::Hh);
        assert_eq!(field(b"%hd").length, LengthMod::H);
        assert_eq!(field(b"%ld").length, LengthMod::L);
        assert_eq!(field(b"%lld").length, LengthMod::Ll);
        assert_eq!(field(b"%Lf").length, LengthMod::UpperL);
        assert_eq!(field(b"%ws").length, LengthMod::W);
        assert_eq!(field(b"%I64x").length, LengthMod::Fixed64);
        assert_eq!(field(b"%I32u").length, LengthMod::Fixed32);
        assert_eq!(field(b"%Id").length, LengthMod::Native);
    }

    #[test]
    fn test_conversion_kinds() {
        assert_eq!(field(b"%i").conv, Conv::Auto);
        assert_eq!(field(b"%o").conv, Conv::Oct);
        assert_eq!(field(b"%u").conv, Conv::Udec);
        assert_eq!(field(b"%X").conv, Conv::Hex);
        assert_eq!(field(b"%G").conv, Conv::Float);
        assert_eq!(field(b"%S").conv, Conv::Str { flip: true });
        assert_eq!(field(b"%C").conv, Conv::Chars { flip: true });
        assert_eq!(field(b"%n").conv, Conv::Count);
        assert_eq!(field(b"%p").conv, Conv::Ptr);
    }

    #[test]
    fn test_unknown_conversion_is_fault() {
        let mut cursor = FormatCursor::new(b"%q".as_slice());
        assert_eq!(
            cursor.next_directive(),
            Err(FormatFault::UnknownConversion(u32::from(b'q')))
        );
    }

    #[test]
    fn test_dangling_percent_is_fault() {
        let mut cursor = FormatCursor::new(b"%".as_slice());
        assert_eq!(cursor.next_directive(), Err(FormatFault::DanglingPercent));
        let mut cursor = FormatCursor::new(b"%12l".as_slice());
        assert_eq!(cursor.next_directive(), Err(FormatFault::DanglingPercent));
    }

    #[test]
    fn test_scanset_plain() {
        let spec = field(b"%[abc]");
        let Conv::Set(set) = spec.conv else {
            panic!("expected scanset");
        };
        assert!(!set.negated);
        assert!(set.contains(u32::from(b'a')));
        assert!(set.contains(u32::from(b'c')));
        assert!(!set.contains(u32::from(b'd')));
    }

    #[test]
    fn test_scanset_negated_with_leading_bracket() {
        let spec = field(b"%[^]x]");
        let Conv::Set(set) = spec.conv else {
            panic!("expected scanset");
        };
        assert!(set.negated);
        assert!(!set.contains(u32::from(b']')));
        assert!(!set.contains(u32::from(b'x')));
        assert!(set.contains(u32::from(b'a')));
    }

    #[test]
    fn test_scanset_ranges() {
        let spec = field(b"%[a-fA-F0-9]");
        let Conv::Set(set) = spec.conv else {
            panic!("expected scanset");
        };
        assert!(set.contains(u32::from(b'b')));
        assert!(set.contains(u32::from(b'D')));
        assert!(set.contains(u32::from(b'7')));
        assert!(!set.contains(u32::from(b'g')));
    }

    #[test]
    fn test_scanset_literal_dashes() {
        // Leading and trailing `-` are members, not range markers.
        let spec = field(b"%[-az-]");
        let Conv::Set(set) = spec.conv else {
            panic!("expected scanset");
        };
        assert!(set.contains(u32::from(b'-')));
        assert!(set.contains(u32::from(b'a')));
        assert!(set.contains(u32::from(b'z')));
        assert!(!set.contains(u32::from(b'b')));
    }

    #[test]
    fn test_unterminated_scanset_is_fault() {
        let mut cursor = FormatCursor::new(b"%[abc".as_slice());
        assert_eq!(cursor.next_directive(), Err(FormatFault::UnterminatedSet));
    }
}
