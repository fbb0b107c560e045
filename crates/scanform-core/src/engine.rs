//! The per-call conversion loop.
//!
//! One generic engine body serves every variant: the input-source backend
//! and the character width arrive as type parameters, the binding mode as a
//! flag on the binder. The loop walks the template one directive at a time,
//! pulls characters through a width-capped field reader, and stops at the
//! first terminal state.

use core::marker::PhantomData;

use crate::chars::{ScanChar, ascii_lower, digit_value};
use crate::diag::trace_event;
use crate::format::{Conv, Directive, FieldSpec, FormatCursor, LengthMod, ScanSet};
use crate::locale::ScanLocale;
use crate::numeric::{IntAccum, store_signed, store_unsigned};
use crate::outcome::{Accumulator, Report, Status};
use crate::slot::{BindFault, BindMode, Binder, RunStorage};
use crate::source::{Fetch, Source};

/// Runs one conversion call to its terminal state.
pub(crate) fn run<C, S>(
    src: &mut S,
    fmt: &[C],
    binder: &mut Binder<'_, '_>,
    locale: &ScanLocale,
) -> Report
where
    C: ScanChar,
    S: Source<C>,
{
    let mut acc = Accumulator::default();
    let mut cursor = FormatCursor::new(fmt);
    loop {
        let directive = match cursor.next_directive() {
            Ok(Some(directive)) => directive,
            Ok(None) => return acc.finish(Status::Completed),
            Err(fault) => {
                trace_event!("template fault {fault:?}");
                return acc.finish(Status::FormatError);
            }
        };
        match directive {
            Directive::Space => skip_whitespace(src),
            Directive::Literal(expected) => match src.next() {
                Fetch::Char(c) if c == expected => {}
                Fetch::Char(c) => {
                    src.unget(c);
                    trace_event!("literal mismatch after {} consumed", src.consumed());
                    return acc.finish(Status::MatchFailure);
                }
                Fetch::End | Fetch::Error => return acc.finish(Status::MatchFailure),
            },
            Directive::Field(spec) => {
                // Whitespace is skipped before every conversion except
                // character, scanset, and position fields.
                if !matches!(spec.conv, Conv::Chars { .. } | Conv::Set(_) | Conv::Count) {
                    skip_whitespace(src);
                }
                match convert_field(src, &spec, binder, locale) {
                    FieldOutcome::Bound => acc.bound(),
                    FieldOutcome::Matched => {}
                    FieldOutcome::Fail(status) => {
                        trace_event!("field fault {status:?} after {} bound", acc.converted());
                        return acc.finish(status);
                    }
                }
            }
        }
    }
}

fn skip_whitespace<C: ScanChar, S: Source<C>>(src: &mut S) {
    loop {
        match src.next() {
            Fetch::Char(c) if c.is_space() => {}
            Fetch::Char(c) => {
                src.unget(c);
                return;
            }
            Fetch::End | Fetch::Error => return,
        }
    }
}

/// What one field directive produced.
enum FieldOutcome {
    /// Converted and written to a destination; counts.
    Bound,
    /// Fully processed without a countable binding (suppressed, `%n`).
    Matched,
    /// Terminal state for the call.
    Fail(Status),
}

fn fault_status(fault: BindFault) -> Status {
    match fault {
        BindFault::Missing | BindFault::TypeMismatch => Status::FormatError,
        BindFault::Capacity => Status::CapacityError,
    }
}

/// Integer destination width for a length modifier, `None` when the
/// modifier does not apply to integer conversions.
fn int_bits(length: LengthMod) -> Option<u32> {
    match length {
        LengthMod::Hh => Some(8),
        LengthMod::H => Some(16),
        LengthMod::None | LengthMod::Fixed32 => Some(32),
        LengthMod::L
        | LengthMod::Ll
        | LengthMod::UpperL
        | LengthMod::Fixed64
        | LengthMod::Native => Some(64),
        LengthMod::W => None,
    }
}

fn float_bits(length: LengthMod) -> Option<u32> {
    match length {
        LengthMod::None => Some(32),
        LengthMod::L | LengthMod::UpperL => Some(64),
        _ => None,
    }
}

/// Storage width for string/character/scanset conversions. `flip` is set by
/// the `S`/`C` kinds, which invert the engine's default width.
fn run_storage(length: LengthMod, flip: bool, wide_engine: bool) -> Option<RunStorage> {
    match length {
        LengthMod::Hh | LengthMod::H => Some(RunStorage::Narrow),
        LengthMod::L | LengthMod::W => Some(RunStorage::Wide),
        LengthMod::None => Some(if wide_engine != flip {
            RunStorage::Wide
        } else {
            RunStorage::Narrow
        }),
        _ => None,
    }
}

/// Pulls characters for one field, honoring its width limit and recording
/// whether the source ran out.
struct FieldReader<'x, C: ScanChar, S: Source<C>> {
    src: &'x mut S,
    remaining: usize,
    exhausted: bool,
    taken: usize,
    _width: PhantomData<C>,
}

impl<'x, C: ScanChar, S: Source<C>> FieldReader<'x, C, S> {
    fn new(src: &'x mut S, width: Option<usize>) -> Self {
        Self {
            src,
            remaining: width.unwrap_or(usize::MAX),
            exhausted: false,
            taken: 0,
            _width: PhantomData,
        }
    }

    fn next(&mut self) -> Option<C> {
        if self.remaining == 0 {
            return None;
        }
        match self.src.next() {
            Fetch::Char(c) => {
                self.remaining -= 1;
                self.taken += 1;
                Some(c)
            }
            Fetch::End | Fetch::Error => {
                self.exhausted = true;
                None
            }
        }
    }

    fn unget(&mut self, c: C) {
        debug_assert!(self.taken > 0, "unget with nothing taken");
        self.remaining = self.remaining.saturating_add(1);
        self.taken -= 1;
        self.src.unget(c);
    }

    /// Failure status for a field that matched nothing: input exhaustion
    /// before the field's first character is an input failure, anything
    /// else a match failure.
    fn empty_fail(&self) -> Status {
        if self.exhausted && self.taken == 0 {
            Status::InputFailure
        } else {
            Status::MatchFailure
        }
    }
}

fn convert_field<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    locale: &ScanLocale,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    match spec.conv {
        Conv::Dec => scan_int(src, spec, binder, IntKind::Signed, 10, false),
        Conv::Auto => scan_int(src, spec, binder, IntKind::Signed, 10, true),
        Conv::Oct => scan_int(src, spec, binder, IntKind::Unsigned, 8, false),
        Conv::Udec => scan_int(src, spec, binder, IntKind::Unsigned, 10, false),
        Conv::Hex => scan_int(src, spec, binder, IntKind::Unsigned, 16, false),
        Conv::Ptr => scan_int(src, spec, binder, IntKind::Pointer, 16, false),
        Conv::Float => scan_float(src, spec, binder, locale),
        Conv::Str { flip } => scan_run(src, spec, binder, RunKind::Token, flip),
        Conv::Set(set) => scan_run(src, spec, binder, RunKind::Set(set), false),
        Conv::Chars { flip } => scan_chars(src, spec, binder, flip),
        Conv::Count => bind_position(src, spec, binder),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum IntKind {
    Signed,
    Unsigned,
    Pointer,
}

fn scan_int<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    kind: IntKind,
    default_base: u32,
    infer: bool,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let bits = match kind {
        IntKind::Pointer => 64,
        _ => match int_bits(spec.length) {
            Some(bits) => bits,
            None => return FieldOutcome::Fail(Status::FormatError),
        },
    };
    let mut rd = FieldReader::new(src, spec.width);

    let Some(mut c) = rd.next() else {
        return FieldOutcome::Fail(rd.empty_fail());
    };

    let mut negative = false;
    if matches!(c.code(), 0x2B | 0x2D) {
        negative = c.code() == 0x2D;
        match rd.next() {
            Some(next) => c = next,
            None => return FieldOutcome::Fail(rd.empty_fail()),
        }
    }

    let mut base = default_base;

    // A leading zero may introduce a base prefix: `0x`/`0X` for hex (and
    // for the inferring kind), a bare `0` for octal when inferring. The
    // prefix is taken only when a valid hex digit follows, exactly as a
    // numeric literal would be read; otherwise the zero stands alone.
    if c.code() == 0x30 && (infer || base == 16) {
        match rd.next() {
            Some(x) if matches!(x.code(), 0x78 | 0x58) => match rd.next() {
                Some(h) if digit_value(h.code(), 16).is_some() => {
                    base = 16;
                    c = h;
                }
                other => {
                    if let Some(o) = other {
                        rd.unget(o);
                    }
                    rd.unget(x);
                    return finish_int(spec, binder, kind, bits, negative, 0, false);
                }
            },
            Some(other) => {
                rd.unget(other);
                if infer {
                    base = 8;
                }
            }
            None => return finish_int(spec, binder, kind, bits, negative, 0, false),
        }
    }

    let mut accum = IntAccum::new(base);
    let mut cur = Some(c);
    loop {
        match cur {
            Some(ch) => match digit_value(ch.code(), base) {
                Some(digit) => {
                    accum.push(digit);
                    cur = rd.next();
                }
                None => {
                    rd.unget(ch);
                    break;
                }
            },
            None => break,
        }
    }

    if accum.digits() == 0 {
        return FieldOutcome::Fail(rd.empty_fail());
    }
    let (magnitude, overflow) = accum.value();
    finish_int(spec, binder, kind, bits, negative, magnitude, overflow)
}

fn finish_int<C: ScanChar>(
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    kind: IntKind,
    bits: u32,
    negative: bool,
    magnitude: u64,
    overflow: bool,
) -> FieldOutcome {
    if spec.suppress {
        return FieldOutcome::Matched;
    }
    let bound = match kind {
        IntKind::Signed => binder.bind_signed(bits, store_signed(negative, magnitude, overflow, bits)),
        IntKind::Unsigned | IntKind::Pointer => {
            binder.bind_unsigned(bits, store_unsigned(negative, magnitude, overflow, bits))
        }
    };
    match bound {
        Ok(()) => FieldOutcome::Bound,
        Err(fault) => FieldOutcome::Fail(fault_status(fault)),
    }
}

/// Pushes a run of decimal digits into `text`; returns the digit count and
/// the first non-digit (already consumed).
fn push_digits<C, S>(
    rd: &mut FieldReader<'_, C, S>,
    text: &mut String,
    start: Option<C>,
) -> (usize, Option<C>)
where
    C: ScanChar,
    S: Source<C>,
{
    let mut count = 0;
    let mut cur = start;
    loop {
        match cur {
            Some(ch) if digit_value(ch.code(), 10).is_some() => {
                text.push(ch.code() as u8 as char);
                count += 1;
                cur = rd.next();
            }
            other => return (count, other),
        }
    }
}

fn scan_float<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    locale: &ScanLocale,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let Some(bits) = float_bits(spec.length) else {
        return FieldOutcome::Fail(Status::FormatError);
    };
    let decimal_point = locale.decimal_point as u32;
    let mut rd = FieldReader::new(src, spec.width);

    let Some(mut c) = rd.next() else {
        return FieldOutcome::Fail(rd.empty_fail());
    };

    let mut text = String::new();
    let mut sign_char: Option<C> = None;
    if matches!(c.code(), 0x2B | 0x2D) {
        sign_char = Some(c);
        text.push(c.code() as u8 as char);
        match rd.next() {
            Some(next) => c = next,
            None => return FieldOutcome::Fail(Status::MatchFailure),
        }
    }

    // Free-form infinity / not-a-number tokens.
    if matches!(ascii_lower(c.code()), 0x69 | 0x6E) {
        return scan_float_token(&mut rd, spec, binder, bits, text, c);
    }

    let (int_digits, after_int) = push_digits(&mut rd, &mut text, Some(c));
    let mut mantissa_digits = int_digits;
    let mut cur = after_int;
    let mut consumed_point = false;
    if let Some(point) = cur {
        if point.code() == decimal_point {
            consumed_point = true;
            text.push('.');
            let first_frac = rd.next();
            let (frac_digits, after_frac) = push_digits(&mut rd, &mut text, first_frac);
            mantissa_digits += frac_digits;
            cur = after_frac;
        }
    }

    if mantissa_digits == 0 {
        // Nothing numeric: restore the lookahead, the point, and the sign.
        let had_char = rd.taken > 0;
        if let Some(ch) = cur {
            rd.unget(ch);
        }
        if consumed_point {
            rd.unget(C::from_code(decimal_point));
        }
        if let Some(s) = sign_char {
            rd.unget(s);
        }
        return FieldOutcome::Fail(if rd.exhausted && !had_char {
            Status::InputFailure
        } else {
            Status::MatchFailure
        });
    }

    // Exponent: committed only when at least one digit follows the marker
    // (and its optional sign); a dangling marker is pushed back untouched.
    if let Some(marker) = cur {
        if ascii_lower(marker.code()) == u32::from(b'e') {
            cur = None;
            let mut exp_sign: Option<C> = None;
            let mut after = rd.next();
            if let Some(s2) = after {
                if matches!(s2.code(), 0x2B | 0x2D) {
                    exp_sign = Some(s2);
                    after = rd.next();
                }
            }
            match after {
                Some(d) if digit_value(d.code(), 10).is_some() => {
                    text.push('e');
                    if let Some(s2) = exp_sign {
                        text.push(s2.code() as u8 as char);
                    }
                    let (_, rest) = push_digits(&mut rd, &mut text, Some(d));
                    cur = rest;
                }
                other => {
                    if let Some(o) = other {
                        rd.unget(o);
                    }
                    if let Some(s2) = exp_sign {
                        rd.unget(s2);
                    }
                    rd.unget(marker);
                }
            }
        }
    }
    if let Some(ch) = cur {
        rd.unget(ch);
    }

    let Ok(value) = text.parse::<f64>() else {
        return FieldOutcome::Fail(Status::MatchFailure);
    };
    bind_float_value(spec, binder, bits, value)
}

/// Matches `inf`, `infinity`, or `nan` case-insensitively, backing off to
/// the longest valid prefix.
fn scan_float_token<C, S>(
    rd: &mut FieldReader<'_, C, S>,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    bits: u32,
    mut text: String,
    first: C,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let (token, full, short): (&[u8], usize, usize) = if ascii_lower(first.code()) == 0x69 {
        (b"infinity", 8, 3)
    } else {
        (b"nan", 3, 3)
    };

    let mut seen: Vec<C> = vec![first];
    while seen.len() < full {
        match rd.next() {
            Some(ch) if ascii_lower(ch.code()) == u32::from(token[seen.len()]) => seen.push(ch),
            Some(ch) => {
                rd.unget(ch);
                break;
            }
            None => break,
        }
    }

    let matched = if seen.len() == full {
        full
    } else if seen.len() >= short {
        for &ch in seen[short..].iter().rev() {
            rd.unget(ch);
        }
        short
    } else {
        for &ch in seen.iter().rev() {
            rd.unget(ch);
        }
        return FieldOutcome::Fail(Status::MatchFailure);
    };

    for &byte in &token[..matched] {
        text.push(byte as char);
    }
    let Ok(value) = text.parse::<f64>() else {
        return FieldOutcome::Fail(Status::MatchFailure);
    };
    bind_float_value(spec, binder, bits, value)
}

fn bind_float_value<C: ScanChar>(
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    bits: u32,
    value: f64,
) -> FieldOutcome {
    if spec.suppress {
        return FieldOutcome::Matched;
    }
    match binder.bind_float(bits, value) {
        Ok(()) => FieldOutcome::Bound,
        Err(fault) => FieldOutcome::Fail(fault_status(fault)),
    }
}

/// Run-extraction fields: `%s` (whitespace-delimited token) and `%[...]`.
enum RunKind<'f, C: ScanChar> {
    Token,
    Set(ScanSet<'f, C>),
}

fn scan_run<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    kind: RunKind<'_, C>,
    flip: bool,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let Some(storage) = run_storage(spec.length, flip, C::WIDE) else {
        return FieldOutcome::Fail(Status::FormatError);
    };
    let capacity = if spec.suppress {
        None
    } else {
        match binder.peek_run_capacity(storage) {
            Ok(0) => return FieldOutcome::Fail(Status::CapacityError),
            Ok(n) => Some(n),
            Err(fault) => return FieldOutcome::Fail(fault_status(fault)),
        }
    };
    // The checked mode stops consuming at the destination bound; classic
    // mode consumes the full run and the bind detects any overflow.
    let limit = match (binder.mode(), capacity) {
        (BindMode::Checked, Some(n)) => Some(n - 1),
        _ => None,
    };

    let accept = |code: u32| match &kind {
        RunKind::Token => !matches!(code, 0x20 | 0x09..=0x0D),
        RunKind::Set(set) => set.contains(code),
    };

    let mut rd = FieldReader::new(src, spec.width);
    let mut run: Vec<u32> = Vec::new();
    let mut capped = false;
    loop {
        if limit == Some(run.len()) {
            if let Some(ch) = rd.next() {
                capped = accept(ch.code());
                rd.unget(ch);
            }
            break;
        }
        match rd.next() {
            Some(ch) if accept(ch.code()) => run.push(ch.code()),
            Some(ch) => {
                rd.unget(ch);
                break;
            }
            None => break,
        }
    }

    if capped && spec.width.is_none() {
        return FieldOutcome::Fail(Status::CapacityError);
    }
    if run.is_empty() && !capped {
        return FieldOutcome::Fail(rd.empty_fail());
    }
    if spec.suppress {
        return FieldOutcome::Matched;
    }
    match binder.bind_run(storage, &run, true) {
        Ok(()) => FieldOutcome::Bound,
        Err(fault) => FieldOutcome::Fail(fault_status(fault)),
    }
}

fn scan_chars<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
    flip: bool,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let Some(storage) = run_storage(spec.length, flip, C::WIDE) else {
        return FieldOutcome::Fail(Status::FormatError);
    };
    let want = spec.width.unwrap_or(1);
    if !spec.suppress && binder.mode() == BindMode::Checked {
        match binder.peek_run_capacity(storage) {
            Ok(n) if n < want => return FieldOutcome::Fail(Status::CapacityError),
            Ok(_) => {}
            Err(fault) => return FieldOutcome::Fail(fault_status(fault)),
        }
    }

    let mut rd = FieldReader::new(src, Some(want));
    let mut run: Vec<u32> = Vec::new();
    while run.len() < want {
        match rd.next() {
            Some(ch) => run.push(ch.code()),
            None => return FieldOutcome::Fail(Status::InputFailure),
        }
    }
    if spec.suppress {
        return FieldOutcome::Matched;
    }
    match binder.bind_run(storage, &run, false) {
        Ok(()) => FieldOutcome::Bound,
        Err(fault) => FieldOutcome::Fail(fault_status(fault)),
    }
}

fn bind_position<C, S>(
    src: &mut S,
    spec: &FieldSpec<'_, C>,
    binder: &mut Binder<'_, '_>,
) -> FieldOutcome
where
    C: ScanChar,
    S: Source<C>,
{
    let Some(bits) = int_bits(spec.length) else {
        return FieldOutcome::Fail(Status::FormatError);
    };
    if spec.suppress {
        return FieldOutcome::Matched;
    }
    let count = src.consumed() as u64;
    match binder.bind_signed(bits, store_signed(false, count, false, bits)) {
        Ok(()) => FieldOutcome::Matched,
        Err(fault) => FieldOutcome::Fail(fault_status(fault)),
    }
}
