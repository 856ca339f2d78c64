use super::*;

#[test]
fn accepts_valid_dates() {
    assert!(parse_iso_date("2025-01-01").is_some());
    assert!(parse_iso_date("2024-02-29").is_some());
}

#[test]
fn rejects_impossible_dates() {
    assert!(parse_iso_date("2025-02-30").is_none());
    assert!(parse_iso_date("2025-13-01").is_none());
    assert!(parse_iso_date("2025-00-10").is_none());
}

#[test]
fn rejects_malformed_input() {
    assert!(parse_iso_date("").is_none());
    assert!(parse_iso_date("January 1").is_none());
    assert!(parse_iso_date("2025/01/01").is_none());
    assert!(parse_iso_date("2025-1-1").is_none());
    assert!(parse_iso_date("2025-01-01T00:00:00Z").is_none());
}

#[test]
fn ordering_follows_calendar() {
    let early = parse_iso_date("2025-01-31").unwrap();
    let late = parse_iso_date("2025-02-01").unwrap();
    assert!(early < late);
}
