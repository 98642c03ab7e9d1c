//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with featured products
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Database readiness check
//!
//! # Catalog
//! GET  /shop                   - Product grid
//! GET  /details?name=<name>    - Product detail (falls back to Brocoli)
//!
//! # Cart & Checkout
//! GET  /cart                   - Cart page (cart lives in localStorage)
//! GET  /checkout               - Checkout form
//! POST /validate-coupon        - JSON coupon check
//! POST /place-order            - Order writer
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /signup                 - Signup page
//! POST /signup                 - Signup action
//! GET  /logout                 - Logout action
//!
//! # Dashboards
//! GET  /dashboard              - Order history (requires login)
//! GET  /admin                  - Sales dashboard (requires admin)
//!
//! # Static pages
//! GET  /about, /contact, /privacy, /coming-soon
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod checkout;
pub mod pages;
pub mod shop;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::middleware::{
    auth_rate_limiter, checkout_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

// =============================================================================
// Shared view data
// =============================================================================

/// Header navigation state shared by every page.
#[derive(Debug, Clone, Default)]
pub struct NavView {
    pub user_name: Option<String>,
    pub is_admin: bool,
}

impl NavView {
    /// Build navigation state for the (possibly absent) current user.
    #[must_use]
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        user.map_or_else(Self::default, |u| Self {
            user_name: Some(u.name.clone()),
            is_admin: u.is_admin(),
        })
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Login and signup posts, behind the strict rate limiter.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route_layer(auth_rate_limiter())
}

/// Order and coupon posts, behind the relaxed rate limiter.
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/validate-coupon", post(checkout::validate_coupon))
        .route("/place-order", post(checkout::place_order))
        .route_layer(checkout_rate_limiter())
}

/// Create all page and API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/shop", get(shop::shop))
        .route("/details", get(shop::details))
        .route("/cart", get(pages::cart))
        .route("/checkout", get(pages::checkout))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/privacy", get(pages::privacy))
        .route("/coming-soon", get(pages::coming_soon))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(account::dashboard))
        .route("/admin", get(admin::dashboard))
        .merge(auth_routes())
        .merge(checkout_routes())
}

/// Build the full application: routes, static files, sessions and the
/// request-scoped middleware.
///
/// Sentry and tracing layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{CheckoutConfig, LogFormat, StorefrontConfig};

    /// State over a pool that never connects; only routes that stay away from
    /// the database can be exercised.
    fn offline_state() -> AppState {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://127.0.0.1:1/offline"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
            checkout: CheckoutConfig::default(),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:1/offline")
            .unwrap();
        AppState::new(config, pool)
    }

    fn post(uri: &str, content_type: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-real-ip", "203.0.113.10")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(offline_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let response = app(offline_state())
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_validate_coupon_empty_code() {
        let response = app(offline_state())
            .oneshot(post("/validate-coupon", "application/json", r#"{"code": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"valid":false}"#);
    }

    #[tokio::test]
    async fn test_validate_coupon_missing_code() {
        let response = app(offline_state())
            .oneshot(post("/validate-coupon", "application/json", "{}"))
            .await
            .unwrap();

        assert_eq!(body_text(response).await, r#"{"valid":false}"#);
    }

    #[tokio::test]
    async fn test_validate_coupon_unusable_bodies() {
        for (content_type, body) in [
            ("application/json", r#"{"code": 123}"#),
            ("application/json", "not json"),
            ("text/plain", r#"{"code": "SAVE15"}"#),
        ] {
            let response = app(offline_state())
                .oneshot(post("/validate-coupon", content_type, body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{body}");
            assert_eq!(body_text(response).await, r#"{"valid":false}"#);
        }
    }

    #[tokio::test]
    async fn test_validate_coupon_store_failure_is_invalid() {
        let response = app(offline_state())
            .oneshot(post("/validate-coupon", "application/json", r#"{"code": "SAVE15"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"valid":false}"#);
    }

    #[tokio::test]
    async fn test_place_order_malformed_cart() {
        let response = app(offline_state())
            .oneshot(post(
                "/place-order",
                "application/x-www-form-urlencoded",
                "name=Ada&email=ada%40example.com&phone=1&address=x&payment=Card&cart_data=not-json",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("x-error-code").unwrap(),
            "malformed_payload"
        );
        assert!(
            body_text(response)
                .await
                .starts_with("Error processing order (malformed_payload): ")
        );
    }

    #[tokio::test]
    async fn test_place_order_missing_cart() {
        let response = app(offline_state())
            .oneshot(post(
                "/place-order",
                "application/x-www-form-urlencoded",
                "name=Ada&email=ada%40example.com",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Error processing order (malformed_payload): cart payload is missing"
        );
    }

    #[tokio::test]
    async fn test_dashboard_redirects_anonymous_users() {
        let response = app(offline_state())
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_nav_view() {
        assert!(NavView::for_user(None).user_name.is_none());

        let admin = CurrentUser {
            id: harvest_hub_core::UserId::new(1),
            name: "Admin".to_string(),
            email: "admin@harvesthub.test".parse().unwrap(),
            role: harvest_hub_core::UserRole::Admin,
        };
        let nav = NavView::for_user(Some(&admin));
        assert_eq!(nav.user_name.as_deref(), Some("Admin"));
        assert!(nav.is_admin);
    }
}
