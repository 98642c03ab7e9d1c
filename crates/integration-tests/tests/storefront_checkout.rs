//! Integration tests for coupon validation and order placement.
//!
//! Run with: `cargo test -p harvest-hub-integration-tests -- --ignored`

use harvest_hub_integration_tests::{client, insert_coupon, pool, storefront_url, unique_email};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn validate(code: &str) -> Value {
    client()
        .post(format!("{}/validate-coupon", storefront_url()))
        .json(&json!({ "code": code }))
        .send()
        .await
        .expect("Failed to call /validate-coupon")
        .json()
        .await
        .expect("Response was not JSON")
}

async fn place_order(email: &str, cart: &str) -> reqwest::Response {
    client()
        .post(format!("{}/place-order", storefront_url()))
        .form(&[
            ("name", "Integration Tester"),
            ("email", email),
            ("phone", "555-0100"),
            ("address", "1 Orchard Lane"),
            ("payment", "Card"),
            ("cart_data", cart),
        ])
        .send()
        .await
        .expect("Failed to call /place-order")
}

// ============================================================================
// Coupon Validator
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_active_coupon_is_valid() {
    let pool = pool().await;
    let code = insert_coupon(&pool, 15, true).await;

    let body = validate(&code).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["discount"].as_f64(), Some(15.0));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_coupon_match_is_exact() {
    let pool = pool().await;
    let code = insert_coupon(&pool, 10, true).await;

    assert_eq!(validate(&code.to_lowercase()).await, json!({ "valid": false }));
    assert_eq!(validate(&format!(" {code}")).await, json!({ "valid": false }));
    assert_eq!(validate("").await, json!({ "valid": false }));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_inactive_coupon_is_rejected_by_default() {
    let pool = pool().await;
    let code = insert_coupon(&pool, 20, false).await;

    assert_eq!(validate(&code).await, json!({ "valid": false }));
}

// ============================================================================
// Order Writer
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_place_order_persists_exact_totals() {
    let pool = pool().await;
    let email = unique_email("order");

    let resp = place_order(
        &email,
        r#"[{"product_id": 1, "name": "Brocoli", "price": 2.67, "qty": 2}, {"price": "1.76", "qty": 1}]"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("data-order-placed"));

    let (subtotal, tax, total, status): (Decimal, Decimal, Decimal, String) = sqlx::query_as(
        r"
        SELECT o.subtotal, o.tax_amount, o.total_amount, o.payment_status
        FROM storefront.orders o
        JOIN storefront.customers c ON c.customer_id = o.customer_id
        WHERE c.email = $1
        ",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("Order row missing");

    assert_eq!(subtotal, Decimal::new(710, 2));
    assert_eq!(tax, Decimal::new(71, 2));
    assert_eq!(total, Decimal::new(781, 2));
    assert_eq!(status, "Pending");

    let items: i64 = sqlx::query_scalar(
        r"
        SELECT COUNT(*)
        FROM storefront.order_items oi
        JOIN storefront.orders o ON o.order_id = oi.order_id
        JOIN storefront.customers c ON c.customer_id = o.customer_id
        WHERE c.email = $1
        ",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("Failed to count items");
    assert_eq!(items, 2);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_malformed_cart_writes_nothing() {
    let pool = pool().await;
    let email = unique_email("malformed");

    let resp = place_order(&email, r#"{"price": 1}"#).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers()
            .get("x-error-code")
            .and_then(|v| v.to_str().ok()),
        Some("malformed_payload")
    );

    let customers: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM storefront.customers WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .expect("Failed to count customers");
    assert_eq!(customers, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_double_submission_creates_two_orders() {
    let pool = pool().await;
    let email = unique_email("double");
    let cart = r#"[{"price": 2.29, "qty": 1}]"#;

    assert_eq!(place_order(&email, cart).await.status(), StatusCode::OK);
    assert_eq!(place_order(&email, cart).await.status(), StatusCode::OK);

    let (customers, orders): (i64, i64) = sqlx::query_as(
        r"
        SELECT COUNT(DISTINCT c.customer_id), COUNT(o.order_id)
        FROM storefront.customers c
        JOIN storefront.orders o ON o.customer_id = c.customer_id
        WHERE c.email = $1
        ",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("Failed to count orders");

    assert_eq!(customers, 2);
    assert_eq!(orders, 2);
}
