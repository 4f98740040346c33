use super::*;

#[test]
fn catalog_query_skips_blank_filters() {
    assert_eq!(catalog_query("", "   "), ProductQuery::default());
}

#[test]
fn catalog_query_trims_values() {
    let query = catalog_query(" Books ", " rust ");
    assert_eq!(query.category.as_deref(), Some("Books"));
    assert_eq!(query.search.as_deref(), Some("rust"));
    assert_eq!(query.limit, None);
}
