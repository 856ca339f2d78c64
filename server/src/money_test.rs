use super::*;

// =============================================================================
// format_cents
// =============================================================================

#[test]
fn format_cents_zero() {
    assert_eq!(format_cents(0), "0.00");
}

#[test]
fn format_cents_whole_dollars() {
    assert_eq!(format_cents(10_000), "100.00");
}

#[test]
fn format_cents_sub_dollar() {
    assert_eq!(format_cents(7), "0.07");
}

#[test]
fn format_cents_mixed() {
    assert_eq!(format_cents(123_456), "1234.56");
}

#[test]
fn format_cents_negative() {
    assert_eq!(format_cents(-1250), "-12.50");
}

#[test]
fn format_cents_negative_sub_dollar() {
    assert_eq!(format_cents(-5), "-0.05");
}

#[test]
fn format_cents_i64_min_does_not_panic() {
    let rendered = format_cents(i64::MIN);
    assert!(rendered.starts_with('-'));
    assert!(rendered.ends_with(".08"));
}

// =============================================================================
// parse_cents
// =============================================================================

#[test]
fn parse_cents_whole() {
    assert_eq!(parse_cents("100"), Some(10_000));
}

#[test]
fn parse_cents_two_fraction_digits() {
    assert_eq!(parse_cents("12.34"), Some(1234));
}

#[test]
fn parse_cents_one_fraction_digit_scales() {
    assert_eq!(parse_cents("12.5"), Some(1250));
}

#[test]
fn parse_cents_negative() {
    assert_eq!(parse_cents("-0.75"), Some(-75));
}

#[test]
fn parse_cents_explicit_plus() {
    assert_eq!(parse_cents("+3.00"), Some(300));
}

#[test]
fn parse_cents_trims_whitespace() {
    assert_eq!(parse_cents("  42.00 "), Some(4200));
}

#[test]
fn parse_cents_bare_fraction() {
    assert_eq!(parse_cents(".99"), Some(99));
}

#[test]
fn parse_cents_rejects_three_fraction_digits() {
    assert_eq!(parse_cents("1.234"), None);
}

#[test]
fn parse_cents_rejects_garbage() {
    assert_eq!(parse_cents("abc"), None);
    assert_eq!(parse_cents(""), None);
    assert_eq!(parse_cents("."), None);
    assert_eq!(parse_cents("1.2.3"), None);
}

#[test]
fn parse_cents_rejects_overflow() {
    assert_eq!(parse_cents("92233720368547758.08"), None);
}

#[test]
fn parse_format_round_trip() {
    for cents in [0, 1, 99, 100, -100, 123_456, -9_999] {
        assert_eq!(parse_cents(&format_cents(cents)), Some(cents));
    }
}
