//! Order writer.
//!
//! Turns a checkout form into a customer row, an order row and (optionally)
//! order item rows. Totals are computed here from the submitted cart; the
//! client's own arithmetic is never trusted.
//!
//! # Commit modes
//!
//! - [`CommitMode::Atomic`] hands everything to
//!   [`CheckoutStore::insert_checkout`], which writes inside one transaction.
//! - [`CommitMode::Sequential`] writes the customer, then the order, then the
//!   items, each committed on its own. A failure part way through leaves the
//!   earlier rows in place; they are logged so they can be found.

use std::future::Future;

use thiserror::Error;
use tracing::instrument;

use harvest_hub_core::{CartError, CartPayload, CustomerId, OrderId, OrderTotals, PaymentStatus};

use crate::config::{CheckoutConfig, CommitMode};
use crate::db::RepositoryError;
use crate::models::{
    Customer, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem, PlacedOrder,
};

/// Write access needed by the order writer.
pub trait CheckoutStore: Send + Sync {
    /// Insert the customer, order and items in a single transaction.
    fn insert_checkout(
        &self,
        customer: &NewCustomer,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<PlacedOrder, RepositoryError>> + Send;

    /// Insert and commit one customer row.
    fn insert_customer(
        &self,
        customer: &NewCustomer,
    ) -> impl Future<Output = Result<Customer, RepositoryError>> + Send;

    /// Insert and commit one order row for an existing customer.
    fn insert_order(
        &self,
        customer_id: CustomerId,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Insert and commit the items of an existing order.
    fn insert_order_items(
        &self,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<Vec<OrderItem>, RepositoryError>> + Send;
}

/// Reasons a checkout fails.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart payload could not be parsed.
    #[error("{0}")]
    MalformedPayload(#[from] CartError),

    /// A store write failed.
    #[error("{0}")]
    PersistenceFailure(#[from] RepositoryError),
}

impl CheckoutError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "malformed_payload",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}

/// Raw checkout form submission.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    /// JSON-encoded cart, exactly as the browser sent it.
    pub cart_data: String,
}

/// Places orders against a [`CheckoutStore`].
pub struct OrderService<S> {
    store: S,
    config: CheckoutConfig,
}

impl<S: CheckoutStore> OrderService<S> {
    /// Create an order writer.
    #[must_use]
    pub const fn new(store: S, config: CheckoutConfig) -> Self {
        Self { store, config }
    }

    /// Parse the cart, compute totals and persist the order.
    ///
    /// Every call creates a fresh customer; repeat shoppers are not merged.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MalformedPayload` if the cart cannot be parsed,
    /// or `CheckoutError::PersistenceFailure` if a write fails.
    #[instrument(skip(self, request), fields(payment_method = %request.payment_method))]
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<PlacedOrder, CheckoutError> {
        let cart = CartPayload::parse(&request.cart_data)?;
        let totals = OrderTotals::try_from(&cart)?;

        let customer = NewCustomer {
            full_name: request.name,
            email: request.email,
            phone_number: request.phone,
            address: request.address,
        };
        let order = NewOrder {
            totals,
            payment_method: request.payment_method,
            payment_status: PaymentStatus::Pending,
            coupon_id: None,
        };
        let items: Vec<NewOrderItem> = if self.config.persist_order_items {
            cart.lines()
                .iter()
                .map(|line| {
                    Ok(NewOrderItem {
                        product_id: line.product_id,
                        quantity: line.quantity,
                        unit_price: line.price,
                        total_price: line.line_total().ok_or(CartError::TotalOverflow)?,
                    })
                })
                .collect::<Result<_, CartError>>()?
        } else {
            Vec::new()
        };

        let placed = match self.config.commit_mode {
            CommitMode::Atomic => self.store.insert_checkout(&customer, &order, &items).await?,
            CommitMode::Sequential => self.place_sequential(&customer, &order, &items).await?,
        };

        tracing::info!(
            customer_id = %placed.customer.id,
            order_id = %placed.order.id,
            items = placed.items.len(),
            total = %placed.order.total_amount,
            "Order placed"
        );

        Ok(placed)
    }

    async fn place_sequential(
        &self,
        customer: &NewCustomer,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<PlacedOrder, RepositoryError> {
        let customer = self.store.insert_customer(customer).await?;

        let order = match self.store.insert_order(customer.id, order).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(
                    customer_id = %customer.id,
                    error = %e,
                    "Order insert failed; customer row was already committed"
                );
                return Err(e);
            }
        };

        let items = if items.is_empty() {
            Vec::new()
        } else {
            match self.store.insert_order_items(order.id, items).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        customer_id = %customer.id,
                        order_id = %order.id,
                        error = %e,
                        "Order item insert failed; customer and order rows were already committed"
                    );
                    return Err(e);
                }
            }
        };

        Ok(PlacedOrder {
            customer,
            order,
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use harvest_hub_core::{OrderItemId, ProductId};

    use super::*;
    use crate::config::InactiveCouponPolicy;

    /// Which write the memory store should refuse.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailAt {
        Nothing,
        Order,
        Items,
    }

    #[derive(Default)]
    struct Tables {
        customers: Vec<Customer>,
        orders: Vec<Order>,
        items: Vec<OrderItem>,
    }

    /// In-memory tables with failure injection.
    struct MemoryStore {
        tables: Mutex<Tables>,
        fail_at: FailAt,
    }

    impl MemoryStore {
        fn new(fail_at: FailAt) -> Self {
            Self {
                tables: Mutex::new(Tables::default()),
                fail_at,
            }
        }

        fn counts(&self) -> (usize, usize, usize) {
            let t = self.tables.lock().unwrap();
            (t.customers.len(), t.orders.len(), t.items.len())
        }

        fn injected() -> RepositoryError {
            RepositoryError::DataCorruption("injected failure".to_string())
        }

        fn make_customer(t: &Tables, c: &NewCustomer) -> Customer {
            Customer {
                id: CustomerId::new(i32::try_from(t.customers.len()).unwrap() + 1),
                full_name: c.full_name.clone(),
                email: c.email.clone(),
                phone_number: c.phone_number.clone(),
                address: c.address.clone(),
                created_at: Utc::now(),
            }
        }

        fn make_order(t: &Tables, customer_id: CustomerId, o: &NewOrder) -> Order {
            Order {
                id: OrderId::new(i32::try_from(t.orders.len()).unwrap() + 1),
                customer_id,
                coupon_id: o.coupon_id,
                subtotal: o.totals.subtotal,
                tax_amount: o.totals.tax,
                total_amount: o.totals.total,
                payment_method: o.payment_method.clone(),
                payment_status: o.payment_status,
                order_date: Utc::now(),
            }
        }

        fn make_items(t: &Tables, order_id: OrderId, items: &[NewOrderItem]) -> Vec<OrderItem> {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| OrderItem {
                    id: OrderItemId::new(i32::try_from(t.items.len() + i).unwrap() + 1),
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                })
                .collect()
        }
    }

    impl CheckoutStore for MemoryStore {
        async fn insert_checkout(
            &self,
            customer: &NewCustomer,
            order: &NewOrder,
            items: &[NewOrderItem],
        ) -> Result<PlacedOrder, RepositoryError> {
            // Nothing becomes visible unless every step succeeds
            let mut t = self.tables.lock().unwrap();
            let customer = Self::make_customer(&t, customer);
            if self.fail_at == FailAt::Order {
                return Err(Self::injected());
            }
            let order = Self::make_order(&t, customer.id, order);
            if self.fail_at == FailAt::Items && !items.is_empty() {
                return Err(Self::injected());
            }
            let items = Self::make_items(&t, order.id, items);

            t.customers.push(customer.clone());
            t.orders.push(order.clone());
            t.items.extend(items.iter().copied());
            Ok(PlacedOrder {
                customer,
                order,
                items,
            })
        }

        async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
            let mut t = self.tables.lock().unwrap();
            let customer = Self::make_customer(&t, customer);
            t.customers.push(customer.clone());
            Ok(customer)
        }

        async fn insert_order(
            &self,
            customer_id: CustomerId,
            order: &NewOrder,
        ) -> Result<Order, RepositoryError> {
            if self.fail_at == FailAt::Order {
                return Err(Self::injected());
            }
            let mut t = self.tables.lock().unwrap();
            let order = Self::make_order(&t, customer_id, order);
            t.orders.push(order.clone());
            Ok(order)
        }

        async fn insert_order_items(
            &self,
            order_id: OrderId,
            items: &[NewOrderItem],
        ) -> Result<Vec<OrderItem>, RepositoryError> {
            if self.fail_at == FailAt::Items {
                return Err(Self::injected());
            }
            let mut t = self.tables.lock().unwrap();
            let items = Self::make_items(&t, order_id, items);
            t.items.extend(items.iter().copied());
            Ok(items)
        }
    }

    fn config(commit_mode: CommitMode, persist_order_items: bool) -> CheckoutConfig {
        CheckoutConfig {
            commit_mode,
            persist_order_items,
            inactive_coupons: InactiveCouponPolicy::Reject,
        }
    }

    fn request(cart_data: &str) -> CheckoutRequest {
        CheckoutRequest {
            name: "Ada Farmer".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Orchard Lane".to_string(),
            payment_method: "Cash on Delivery".to_string(),
            cart_data: cart_data.to_string(),
        }
    }

    const BROCOLI_AND_POTATOES: &str =
        r#"[{"product_id": 1, "price": 2.67, "qty": 2}, {"product_id": 3, "price": 1.76, "qty": 1}]"#;

    #[tokio::test]
    async fn test_place_order_computes_totals() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Atomic, true),
        );

        let placed = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap();

        assert_eq!(placed.order.subtotal, Decimal::new(710, 2));
        assert_eq!(placed.order.tax_amount, Decimal::new(71, 2));
        assert_eq!(placed.order.total_amount, Decimal::new(781, 2));
        assert_eq!(placed.order.payment_status, PaymentStatus::Pending);
        assert_eq!(placed.order.payment_method, "Cash on Delivery");
        assert_eq!(placed.order.coupon_id, None);
        assert_eq!(placed.order.customer_id, placed.customer.id);
        assert_eq!(placed.customer.full_name, "Ada Farmer");
    }

    #[tokio::test]
    async fn test_order_items_mirror_cart_lines() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Atomic, true),
        );

        let placed = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap();

        assert_eq!(placed.items.len(), 2);
        let first = placed.items.first().unwrap();
        assert_eq!(first.product_id, Some(ProductId::new(1)));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.total_price, Decimal::new(534, 2));
        assert!(placed.items.iter().all(|i| i.order_id == placed.order.id));
    }

    #[tokio::test]
    async fn test_order_items_can_be_disabled() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Sequential, false),
        );

        let placed = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap();

        assert!(placed.items.is_empty());
        assert_eq!(svc.store.counts(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_malformed_cart_writes_nothing() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Sequential, true),
        );

        for cart in ["", "not json", r#"{"price": 1}"#, r#"[{"qty": 1}]"#] {
            let err = svc.place_order(request(cart)).await.unwrap_err();
            assert_eq!(err.code(), "malformed_payload");
        }
        assert_eq!(svc.store.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_overflowing_cart_is_malformed() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Sequential, true),
        );

        for cart in [
            r#"[{"price": "79228162514264337593543950335", "qty": 2}]"#,
            r#"[{"price": 1e28, "qty": 8}]"#,
            r#"[{"price": 1, "qty": 3000000000}]"#,
        ] {
            let err = svc.place_order(request(cart)).await.unwrap_err();
            assert_eq!(err.code(), "malformed_payload", "cart {cart}");
        }
        assert_eq!(svc.store.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_empty_cart_places_zero_order() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Atomic, true),
        );

        let placed = svc.place_order(request("[]")).await.unwrap();

        assert!(placed.order.total_amount.is_zero());
        assert!(placed.items.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_order_failure_leaves_customer() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Order),
            config(CommitMode::Sequential, true),
        );

        let err = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap_err();

        assert_eq!(err.code(), "persistence_failure");
        assert_eq!(svc.store.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_atomic_order_failure_leaves_nothing() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Order),
            config(CommitMode::Atomic, true),
        );

        let err = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap_err();

        assert_eq!(err.code(), "persistence_failure");
        assert_eq!(svc.store.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_item_failure_by_commit_mode() {
        let sequential = OrderService::new(
            MemoryStore::new(FailAt::Items),
            config(CommitMode::Sequential, true),
        );
        assert!(sequential.place_order(request(BROCOLI_AND_POTATOES)).await.is_err());
        assert_eq!(sequential.store.counts(), (1, 1, 0));

        let atomic = OrderService::new(
            MemoryStore::new(FailAt::Items),
            config(CommitMode::Atomic, true),
        );
        assert!(atomic.place_order(request(BROCOLI_AND_POTATOES)).await.is_err());
        assert_eq!(atomic.store.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_duplicate_submission_creates_two_orders() {
        let svc = OrderService::new(
            MemoryStore::new(FailAt::Nothing),
            config(CommitMode::Atomic, true),
        );

        let first = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap();
        let second = svc.place_order(request(BROCOLI_AND_POTATOES)).await.unwrap();

        assert_ne!(first.customer.id, second.customer.id);
        assert_ne!(first.order.id, second.order.id);
        assert_eq!(svc.store.counts(), (2, 2, 4));
    }

    #[test]
    fn test_error_codes_and_messages() {
        let err = CheckoutError::from(CartError::NotAnArray);
        assert_eq!(err.code(), "malformed_payload");
        assert_eq!(err.to_string(), "cart payload must be a JSON array of line items");

        let err = CheckoutError::from(RepositoryError::NotFound);
        assert_eq!(err.code(), "persistence_failure");
    }
}
