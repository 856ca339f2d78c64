use super::*;

// =============================================================================
// Page::from_query
// =============================================================================

#[test]
fn defaults_when_query_empty() {
    let page = Page::from_query(PageQuery::default());
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, DEFAULT_PER_PAGE);
}

#[test]
fn page_floor_is_one() {
    let page = Page::from_query(PageQuery { page: Some(0), per_page: None });
    assert_eq!(page.page, 1);

    let page = Page::from_query(PageQuery { page: Some(-3), per_page: None });
    assert_eq!(page.page, 1);
}

#[test]
fn per_page_clamped_low() {
    let page = Page::from_query(PageQuery { page: None, per_page: Some(1) });
    assert_eq!(page.per_page, MIN_PER_PAGE);
}

#[test]
fn per_page_clamped_high() {
    let page = Page::from_query(PageQuery { page: None, per_page: Some(5000) });
    assert_eq!(page.per_page, MAX_PER_PAGE);
}

#[test]
fn per_page_in_range_kept() {
    let page = Page::from_query(PageQuery { page: Some(3), per_page: Some(25) });
    assert_eq!(page.page, 3);
    assert_eq!(page.per_page, 25);
}

#[test]
fn offset_math() {
    let page = Page::from_query(PageQuery { page: Some(3), per_page: Some(20) });
    assert_eq!(page.offset(), 40);
    assert_eq!(page.limit(), 20);
}

#[test]
fn first_page_offset_zero() {
    let page = Page::from_query(PageQuery::default());
    assert_eq!(page.offset(), 0);
}

// =============================================================================
// total_pages
// =============================================================================

#[test]
fn total_pages_empty_is_one() {
    assert_eq!(total_pages(0, 10), 1);
}

#[test]
fn total_pages_exact_multiple() {
    assert_eq!(total_pages(100, 10), 10);
}

#[test]
fn total_pages_rounds_up() {
    assert_eq!(total_pages(101, 10), 11);
    assert_eq!(total_pages(9, 10), 1);
}

// =============================================================================
// Paginated
// =============================================================================

#[test]
fn paginated_envelope_totals() {
    let page = Page::from_query(PageQuery { page: Some(2), per_page: Some(10) });
    let wrapped = Paginated::new(vec![1, 2, 3], page, 23);
    assert_eq!(wrapped.page, 2);
    assert_eq!(wrapped.per_page, 10);
    assert_eq!(wrapped.total_items, 23);
    assert_eq!(wrapped.total_pages, 3);
    assert_eq!(wrapped.items, vec![1, 2, 3]);
}

#[test]
fn paginated_serializes_items_inline() {
    let page = Page::from_query(PageQuery::default());
    let wrapped = Paginated::new(vec!["a"], page, 1);
    let json = serde_json::to_value(&wrapped).unwrap();
    assert_eq!(json["items"][0], "a");
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["total_pages"], 1);
}
