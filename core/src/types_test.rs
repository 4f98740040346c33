use super::*;

// =============================================================
// Helpers
// =============================================================

fn make_product(id: &str) -> Product {
    Product {
        id: id.to_owned(),
        name: format!("Product {id}"),
        description: String::new(),
        price: 10.0,
        category: "Books".to_owned(),
        stock: 3,
        images: Vec::new(),
        status: ProductStatus::Active,
        image_url: None,
        created_by: None,
        created_at: None,
    }
}

// =============================================================
// UserRecord / Role
// =============================================================

#[test]
fn user_record_deserializes_minimal_payload() {
    let user: UserRecord = serde_json::from_value(serde_json::json!({
        "id": "u-1",
        "name": "alice",
    }))
    .unwrap();
    assert_eq!(user.role, Role::Customer);
    assert_eq!(user.email, "");
    assert_eq!(user.picture, None);
    assert!(!user.is_admin());
}

#[test]
fn role_admin_is_case_insensitive() {
    let user: UserRecord = serde_json::from_value(serde_json::json!({
        "id": "u-1",
        "name": "Root",
        "email": "root@example.com",
        "role": "ADMIN",
        "provider": "google",
    }))
    .unwrap();
    assert!(user.is_admin());
    assert_eq!(user.provider.as_deref(), Some("google"));
}

#[test]
fn unknown_role_reads_as_customer() {
    let role: Role = serde_json::from_value(serde_json::json!("moderator")).unwrap();
    assert_eq!(role, Role::Customer);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Admin).unwrap(), serde_json::json!("admin"));
}

#[test]
fn initial_uppercases_first_letter() {
    let user = UserRecord {
        id: "u".to_owned(),
        name: "éva".to_owned(),
        email: String::new(),
        role: Role::Customer,
        picture: None,
        provider: None,
    };
    assert_eq!(user.initial(), "É");
}

#[test]
fn initial_of_empty_name_is_placeholder() {
    let user = UserRecord {
        id: "u".to_owned(),
        name: String::new(),
        email: String::new(),
        role: Role::Customer,
        picture: None,
        provider: None,
    };
    assert_eq!(user.initial(), "?");
}

// =============================================================
// SessionGrant
// =============================================================

#[test]
fn session_grant_reads_session_token_field() {
    let grant: SessionGrant = serde_json::from_value(serde_json::json!({
        "user": { "id": "u-1", "name": "A" },
        "session_token": "tok-1",
    }))
    .unwrap();
    assert_eq!(grant.token, "tok-1");
}

#[test]
fn session_grant_reads_access_token_field() {
    let grant: SessionGrant = serde_json::from_value(serde_json::json!({
        "access_token": "tok-2",
        "user": { "id": "u-2", "name": "B" },
    }))
    .unwrap();
    assert_eq!(grant.token, "tok-2");
    assert_eq!(grant.user.id, "u-2");
}

// =============================================================
// Product
// =============================================================

#[test]
fn product_status_keeps_unknown_values() {
    let status: ProductStatus = serde_json::from_value(serde_json::json!("archived")).unwrap();
    assert_eq!(status, ProductStatus::Other("archived".to_owned()));
    assert_eq!(serde_json::to_value(&status).unwrap(), serde_json::json!("archived"));
}

#[test]
fn product_defaults_optional_fields() {
    let product: Product = serde_json::from_value(serde_json::json!({
        "id": "p-1",
        "name": "Lamp",
        "price": 19.5,
    }))
    .unwrap();
    assert_eq!(product.status, ProductStatus::Active);
    assert!(product.images.is_empty());
    assert!(!product.in_stock());
    assert_eq!(product.cover_image(), None);
}

#[test]
fn cover_image_prefers_first_blob() {
    let mut product = make_product("p-1");
    product.images = vec!["QUJD".to_owned(), "REVG".to_owned()];
    product.image_url = Some("https://cdn.example.com/p.jpg".to_owned());
    assert_eq!(product.cover_image().as_deref(), Some("data:image/jpeg;base64,QUJD"));
}

#[test]
fn cover_image_falls_back_to_image_url() {
    let mut product = make_product("p-1");
    product.image_url = Some("https://cdn.example.com/p.jpg".to_owned());
    assert_eq!(product.cover_image().as_deref(), Some("https://cdn.example.com/p.jpg"));
}

#[test]
fn image_data_url_passes_through_existing_data_urls() {
    assert_eq!(image_data_url("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
}

#[test]
fn product_draft_omits_unset_fields() {
    let draft = ProductDraft { price: Some(5.0), stock: Some(2), ..ProductDraft::default() };
    assert_eq!(serde_json::to_value(&draft).unwrap(), serde_json::json!({ "price": 5.0, "stock": 2 }));
}

#[test]
fn product_draft_parses_partial_json() {
    let draft: ProductDraft = serde_json::from_str(r#"{"name":"Mug","status":"draft"}"#).unwrap();
    assert_eq!(draft.name.as_deref(), Some("Mug"));
    assert_eq!(draft.status, Some(ProductStatus::Draft));
    assert_eq!(draft.price, None);
}

// =============================================================
// ProductQuery
// =============================================================

#[test]
fn empty_query_has_no_pairs() {
    let query = ProductQuery::default();
    assert!(query.query_pairs().is_empty());
    assert_eq!(query.to_query_string(), "");
}

#[test]
fn query_pairs_skip_blank_text_and_keep_order() {
    let query = ProductQuery {
        category: Some("  ".to_owned()),
        search: Some("red mug".to_owned()),
        min_price: Some(10.0),
        max_price: Some(99.5),
        sort_by: Some("price".to_owned()),
        limit: Some(3),
    };
    assert_eq!(
        query.query_pairs(),
        vec![
            ("search", "red mug".to_owned()),
            ("min_price", "10".to_owned()),
            ("max_price", "99.5".to_owned()),
            ("sort_by", "price".to_owned()),
        ]
    );
    assert_eq!(query.to_query_string(), "search=red+mug&min_price=10&max_price=99.5&sort_by=price");
}

#[test]
fn apply_limit_truncates() {
    let query = ProductQuery { limit: Some(2), ..ProductQuery::default() };
    let products = vec![make_product("a"), make_product("b"), make_product("c")];
    let limited = query.apply_limit(products);
    assert_eq!(limited.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn apply_limit_without_limit_keeps_all() {
    let products = vec![make_product("a"), make_product("b")];
    assert_eq!(ProductQuery::default().apply_limit(products).len(), 2);
}

// =============================================================
// Analytics
// =============================================================

#[test]
fn analytics_reads_page_view_list() {
    let analytics: Analytics = serde_json::from_value(serde_json::json!({
        "total_visitors": 120,
        "unique_visitors": 80,
        "total_products": 12,
        "total_users": 7,
        "page_views": [ { "_id": "/products", "count": 40 }, { "page": "/", "count": 30 } ],
    }))
    .unwrap();
    assert_eq!(analytics.total_visitors, 120);
    assert_eq!(analytics.page_views[0], PageViews { page: "/products".to_owned(), count: 40 });
    assert_eq!(analytics.page_views[1].page, "/");
}

#[test]
fn analytics_reads_page_view_map_sorted_by_count() {
    let analytics: Analytics = serde_json::from_value(serde_json::json!({
        "page_views": { "/": 5, "/about": 9, "/cart": 5 },
    }))
    .unwrap();
    let pages: Vec<_> = analytics.page_views.iter().map(|v| v.page.as_str()).collect();
    assert_eq!(pages, vec!["/about", "/", "/cart"]);
    assert_eq!(analytics.total_users, 0);
}

#[test]
fn analytics_missing_histogram_is_empty() {
    let analytics: Analytics = serde_json::from_value(serde_json::json!({ "total_users": 2 })).unwrap();
    assert!(analytics.page_views.is_empty());
}
