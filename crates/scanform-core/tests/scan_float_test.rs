//! Floating-point conversion behavior.

use scanform_core::{ScanLocale, Scanner, Slot, Status, scan_bytes};

#[test]
fn basic_float_forms() {
    let mut f: f32 = 0.0;
    let report = scan_bytes(b"3.5", "%f", &mut [Slot::F32(&mut f)]);
    assert_eq!(report.count(), 1);
    assert_eq!(f, 3.5);

    let mut d: f64 = 0.0;
    let report = scan_bytes(b"-2.5e2", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert_eq!(d, -250.0);

    let mut d: f64 = 0.0;
    let report = scan_bytes(b"1E3", "%le", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert_eq!(d, 1000.0);
}

#[test]
fn fractional_only_and_trailing_point() {
    let mut d: f64 = 0.0;
    let report = scan_bytes(b".5", "%lg", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert_eq!(d, 0.5);

    let mut d: f64 = 0.0;
    let report = scan_bytes(b"7.", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert_eq!(d, 7.0);
}

#[test]
fn dangling_exponent_marker_is_not_consumed() {
    let mut d: f64 = 0.0;
    let mut rest = [0u8; 4];
    let report = scan_bytes(
        b"1e+x",
        "%lf%s",
        &mut [Slot::F64(&mut d), Slot::Bytes(&mut rest)],
    );
    assert_eq!(report.count(), 2);
    assert_eq!(d, 1.0);
    assert_eq!(&rest[..4], b"e+x\0");
}

#[test]
fn bare_exponent_marker_is_not_consumed() {
    let mut d: f64 = 0.0;
    let mut rest = [0u8; 4];
    let report = scan_bytes(
        b"25ez",
        "%lf%s",
        &mut [Slot::F64(&mut d), Slot::Bytes(&mut rest)],
    );
    assert_eq!(report.count(), 2);
    assert_eq!(d, 25.0);
    assert_eq!(&rest[..3], b"ez\0");
}

#[test]
fn infinity_tokens() {
    let mut d: f64 = 0.0;
    let report = scan_bytes(b"inf", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert!(d.is_infinite() && d.is_sign_positive());

    let mut d: f64 = 0.0;
    let report = scan_bytes(b"-Infinity", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert!(d.is_infinite() && d.is_sign_negative());
}

#[test]
fn partial_infinity_backs_off_to_inf() {
    let mut d: f64 = 0.0;
    let mut rest = [0u8; 4];
    let report = scan_bytes(
        b"infix",
        "%lf%s",
        &mut [Slot::F64(&mut d), Slot::Bytes(&mut rest)],
    );
    assert_eq!(report.count(), 2);
    assert!(d.is_infinite());
    assert_eq!(&rest[..3], b"ix\0");
}

#[test]
fn nan_token() {
    let mut d: f64 = 0.0;
    let report = scan_bytes(b"NaN", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert!(d.is_nan());
}

#[test]
fn incomplete_token_is_match_failure() {
    let mut d: f64 = 0.0;
    let report = scan_bytes(b"na", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.converted, 0);
    assert_eq!(report.status, Status::MatchFailure);
}

#[test]
fn point_without_digits_is_match_failure() {
    let mut d: f64 = 0.0;
    let mut c: [u8; 1] = [0];
    let report = scan_bytes(
        b".x",
        "%lf%c",
        &mut [Slot::F64(&mut d), Slot::Bytes(&mut c)],
    );
    assert_eq!(report.converted, 0);
    assert_eq!(report.status, Status::MatchFailure);
}

#[test]
fn float_width_limit() {
    let mut f: f32 = 0.0;
    let mut rest: i32 = 0;
    let report = scan_bytes(
        b"12345",
        "%3f%d",
        &mut [Slot::F32(&mut f), Slot::I32(&mut rest)],
    );
    assert_eq!(report.count(), 2);
    assert_eq!(f, 123.0);
    assert_eq!(rest, 45);
}

#[test]
fn locale_decimal_point_is_honored() {
    let locale = ScanLocale::with_decimal_point(',');
    let mut d: f64 = 0.0;
    let report = Scanner::new()
        .with_locale(locale)
        .scan_bytes(b"3,5", "%lf", &mut [Slot::F64(&mut d)]);
    assert_eq!(report.count(), 1);
    assert_eq!(d, 3.5);
}

#[test]
fn suppressed_float_consumes_token() {
    let mut n: i32 = 0;
    let report = scan_bytes(b"2.5 9", "%*f %d", &mut [Slot::I32(&mut n)]);
    assert_eq!(report.count(), 1);
    assert_eq!(n, 9);
}
