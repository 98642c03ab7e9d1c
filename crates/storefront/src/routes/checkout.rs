//! Coupon validation and order placement handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use harvest_hub_core::format_money;

use super::NavView;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::PlacedOrder;
use crate::services::{CheckoutRequest, CouponValidation};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /validate-coupon`.
///
/// `code` is kept as raw JSON so that a number or object is answered as an
/// invalid coupon rather than rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct CouponRequest {
    #[serde(default)]
    pub code: Option<Value>,
}

impl CouponRequest {
    /// The submitted code, if it is a string.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_ref().and_then(Value::as_str)
    }
}

/// Checkout form fields. Missing fields arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlaceOrderForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment: String,
    pub cart_data: String,
}

impl From<PlaceOrderForm> for CheckoutRequest {
    fn from(form: PlaceOrderForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            phone: form.phone,
            address: form.address,
            payment_method: form.payment,
            cart_data: form.cart_data,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// One line on the confirmation page.
#[derive(Debug, Clone)]
pub struct ConfirmationLineView {
    pub quantity: u32,
    pub unit_price: String,
    pub total_price: String,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order_confirmation.html")]
pub struct OrderConfirmationTemplate {
    pub nav: NavView,
    pub order_id: i32,
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub lines: Vec<ConfirmationLineView>,
}

impl OrderConfirmationTemplate {
    fn new(nav: NavView, placed: &PlacedOrder) -> Self {
        Self {
            nav,
            order_id: placed.order.id.as_i32(),
            customer_name: placed.customer.full_name.clone(),
            email: placed.customer.email.clone(),
            address: placed.customer.address.clone(),
            payment_method: placed.order.payment_method.clone(),
            payment_status: placed.order.payment_status.to_string(),
            subtotal: format_money(placed.order.subtotal),
            tax: format_money(placed.order.tax_amount),
            total: format_money(placed.order.total_amount),
            lines: placed
                .items
                .iter()
                .map(|item| ConfirmationLineView {
                    quantity: item.quantity,
                    unit_price: format_money(item.unit_price),
                    total_price: format_money(item.total_price),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Check a coupon code.
///
/// Always answers 200; unknown codes, unreadable bodies and lookup failures
/// are `{"valid": false}`.
#[instrument(skip(state, body))]
pub async fn validate_coupon(
    State(state): State<AppState>,
    body: std::result::Result<Json<CouponRequest>, JsonRejection>,
) -> Json<CouponValidation> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable coupon request");
            CouponRequest::default()
        }
    };
    Json(state.coupons().validate(request.code()).await)
}

/// Place an order from the checkout form.
///
/// # Errors
///
/// Returns 400 with code `malformed_payload` for an unusable cart, or 500
/// with code `persistence_failure` if the order could not be saved.
#[instrument(skip(state, user, form))]
pub async fn place_order(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<PlaceOrderForm>,
) -> Result<OrderConfirmationTemplate> {
    let placed = state.orders().place_order(form.into()).await?;

    Ok(OrderConfirmationTemplate::new(
        NavView::for_user(user.as_ref()),
        &placed,
    ))
}
