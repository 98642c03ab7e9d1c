//! Integration tests for signup, login and the dashboards.
//!
//! Run with: `cargo test -p harvest-hub-integration-tests -- --ignored`

use harvest_hub_integration_tests::{client, storefront_url, unique_email};
use reqwest::{Client, StatusCode, header};

async fn signup(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/signup", storefront_url()))
        .form(&[("name", "Tester"), ("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to call /signup")
}

async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/login", storefront_url()))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to call /login")
}

fn location(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_signup_then_login_reaches_dashboard() {
    let client = client();
    let email = unique_email("signup");

    let resp = signup(&client, &email, "correct horse battery").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login?signed_up=1"));

    let resp = login(&client, &email, "correct horse battery").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = client
        .get(format!("{}/dashboard", storefront_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_wrong_password_rerenders_login() {
    let client = client();
    let email = unique_email("wrongpw");
    signup(&client, &email, "correct horse battery").await;

    let resp = login(&client, &email, "not the password").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid email or password."));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_signup_is_refused() {
    let client = client();
    let email = unique_email("dup");
    signup(&client, &email, "correct horse battery").await;

    let resp = signup(&client, &email, "correct horse battery").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("already exists"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_customer_cannot_open_admin() {
    let client = client();
    let email = unique_email("notadmin");
    signup(&client, &email, "correct horse battery").await;
    login(&client, &email, "correct horse battery").await;

    let resp = client
        .get(format!("{}/admin", storefront_url()))
        .send()
        .await
        .expect("Failed to get admin");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        resp.text().await.expect("Failed to read response"),
        "Access Denied! Administrators only."
    );
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_details_falls_back_to_default_product() {
    let resp = client()
        .get(format!("{}/details?name=Dragonfruit", storefront_url()))
        .send()
        .await
        .expect("Failed to get details");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Brocoli"));
}
