//! Customer, order and order item types.
//!
//! `New*` types are what the order writer hands to the store; the others are
//! what the store returns once rows exist.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use harvest_hub_core::{
    CouponId, CustomerId, OrderId, OrderItemId, OrderTotals, PaymentStatus, ProductId,
    format_money,
};

// =============================================================================
// Write-side types
// =============================================================================

/// Contact details captured on the checkout form.
///
/// Fields are free-form and stored as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

/// Order header to insert once the customer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub totals: OrderTotals,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub coupon_id: Option<CouponId>,
}

/// One cart line to insert as an order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

// =============================================================================
// Persisted types
// =============================================================================

/// A customer row. One is created per checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// An order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub coupon_id: Option<CouponId>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub order_date: DateTime<Utc>,
}

/// An order item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Everything written by one successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub customer: Customer,
    pub order: Order,
    /// Empty when order items are not persisted.
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Dashboard views
// =============================================================================

/// An order as listed on a shopper's dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerOrderSummary {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub item_count: i64,
}

/// An order as listed on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOrderSummary {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesOverview {
    /// Sum of every order's total.
    pub total_sales: Decimal,
    pub order_count: i64,
    pub user_count: i64,
}

impl SalesOverview {
    /// Total sales formatted for display.
    #[must_use]
    pub fn display_total_sales(&self) -> String {
        format_money(self.total_sales)
    }
}
