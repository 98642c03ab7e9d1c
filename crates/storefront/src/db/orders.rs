//! Customer, order and order item repository.
//!
//! The insert helpers are generic over the executor so the same SQL runs
//! either directly on the pool (each statement commits on its own) or inside
//! a transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use harvest_hub_core::{CouponId, CustomerId, OrderId, OrderItemId, PaymentStatus, ProductId};

use super::RepositoryError;
use crate::models::{
    AdminOrderSummary, Customer, CustomerOrderSummary, NewCustomer, NewOrder, NewOrderItem, Order,
    OrderItem, PlacedOrder, SalesOverview,
};
use crate::services::CheckoutStore;

// =============================================================================
// Row types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: CustomerId,
    full_name: String,
    email: String,
    phone_number: String,
    address: String,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.customer_id,
            full_name: row.full_name,
            email: row.email,
            phone_number: row.phone_number,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: OrderId,
    customer_id: CustomerId,
    coupon_id: Option<CouponId>,
    subtotal: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
    payment_method: String,
    payment_status: String,
    order_date: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.order_id,
            customer_id: row.customer_id,
            coupon_id: row.coupon_id,
            subtotal: row.subtotal,
            tax_amount: row.tax_amount,
            total_amount: row.total_amount,
            payment_method: row.payment_method,
            payment_status: parse_status(&row.payment_status)?,
            order_date: row.order_date,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_item_id: OrderItemId,
    order_id: OrderId,
    product_id: Option<ProductId>,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order item {} has negative quantity {}",
                row.order_item_id, row.quantity
            ))
        })?;
        Ok(Self {
            id: row.order_item_id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerOrderRow {
    order_id: OrderId,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    payment_status: String,
    item_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    order_id: OrderId,
    customer_name: String,
    customer_email: String,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    payment_method: String,
    payment_status: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OverviewRow {
    total_sales: Decimal,
    order_count: i64,
    user_count: i64,
}

fn parse_status(raw: &str) -> Result<PaymentStatus, RepositoryError> {
    raw.parse().map_err(RepositoryError::DataCorruption)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for checkout writes and order reporting.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders placed with `email`, newest first.
    ///
    /// Customers are matched case-insensitively on the email typed at checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<CustomerOrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerOrderRow>(
            r"
            SELECT o.order_id, o.order_date, o.total_amount, o.payment_status,
                   COALESCE(SUM(oi.quantity), 0)::BIGINT AS item_count
            FROM storefront.orders o
            JOIN storefront.customers c ON c.customer_id = o.customer_id
            LEFT JOIN storefront.order_items oi ON oi.order_id = o.order_id
            WHERE lower(c.email) = lower($1)
            GROUP BY o.order_id
            ORDER BY o.order_date DESC, o.order_id DESC
            ",
        )
        .bind(email)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(CustomerOrderSummary {
                    order_id: r.order_id,
                    order_date: r.order_date,
                    total_amount: r.total_amount,
                    payment_status: parse_status(&r.payment_status)?,
                    item_count: r.item_count,
                })
            })
            .collect()
    }

    /// Every order with its customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            r"
            SELECT o.order_id, c.full_name AS customer_name, c.email AS customer_email,
                   o.order_date, o.total_amount, o.payment_method, o.payment_status
            FROM storefront.orders o
            JOIN storefront.customers c ON c.customer_id = o.customer_id
            ORDER BY o.order_date DESC, o.order_id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(AdminOrderSummary {
                    order_id: r.order_id,
                    customer_name: r.customer_name,
                    customer_email: r.customer_email,
                    order_date: r.order_date,
                    total_amount: r.total_amount,
                    payment_method: r.payment_method,
                    payment_status: parse_status(&r.payment_status)?,
                })
            })
            .collect()
    }

    /// Total sales and counts for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_overview(&self) -> Result<SalesOverview, RepositoryError> {
        let row = sqlx::query_as::<_, OverviewRow>(
            r"
            SELECT COALESCE(SUM(total_amount), 0) AS total_sales,
                   COUNT(*) AS order_count,
                   (SELECT COUNT(*) FROM storefront.users) AS user_count
            FROM storefront.orders
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(SalesOverview {
            total_sales: row.total_sales,
            order_count: row.order_count,
            user_count: row.user_count,
        })
    }
}

impl CheckoutStore for OrderRepository<'_> {
    async fn insert_checkout(
        &self,
        customer: &NewCustomer,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<PlacedOrder, RepositoryError> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await?;

        let customer = insert_customer(&mut *tx, customer).await?;
        let order = insert_order(&mut *tx, customer.id, order).await?;
        let items = if items.is_empty() {
            Vec::new()
        } else {
            insert_order_items(&mut *tx, order.id, items).await?
        };

        tx.commit().await?;

        Ok(PlacedOrder {
            customer,
            order,
            items,
        })
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        insert_customer(self.pool, customer).await
    }

    async fn insert_order(
        &self,
        customer_id: CustomerId,
        order: &NewOrder,
    ) -> Result<Order, RepositoryError> {
        insert_order(self.pool, customer_id, order).await
    }

    async fn insert_order_items(
        &self,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        insert_order_items(self.pool, order_id, items).await
    }
}

// =============================================================================
// Insert helpers
// =============================================================================

async fn insert_customer<'e>(
    executor: impl PgExecutor<'e>,
    customer: &NewCustomer,
) -> Result<Customer, RepositoryError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        r"
        INSERT INTO storefront.customers (full_name, email, phone_number, address)
        VALUES ($1, $2, $3, $4)
        RETURNING customer_id, full_name, email, phone_number, address, created_at
        ",
    )
    .bind(&customer.full_name)
    .bind(&customer.email)
    .bind(&customer.phone_number)
    .bind(&customer.address)
    .fetch_one(executor)
    .await?;

    Ok(Customer::from(row))
}

async fn insert_order<'e>(
    executor: impl PgExecutor<'e>,
    customer_id: CustomerId,
    order: &NewOrder,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
        r"
        INSERT INTO storefront.orders
            (customer_id, coupon_id, subtotal, tax_amount, total_amount,
             payment_method, payment_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING order_id, customer_id, coupon_id, subtotal, tax_amount, total_amount,
                  payment_method, payment_status, order_date
        ",
    )
    .bind(customer_id)
    .bind(order.coupon_id)
    .bind(order.totals.subtotal)
    .bind(order.totals.tax)
    .bind(order.totals.total)
    .bind(&order.payment_method)
    .bind(order.payment_status.as_str())
    .fetch_one(executor)
    .await?;

    Order::try_from(row)
}

/// Insert all items with one statement.
async fn insert_order_items<'e>(
    executor: impl PgExecutor<'e>,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let product_ids: Vec<Option<i32>> = items
        .iter()
        .map(|i| i.product_id.map(|id| id.as_i32()))
        .collect();
    let quantities = items
        .iter()
        .map(|i| i32::try_from(i.quantity))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RepositoryError::Database(sqlx::Error::Encode(Box::new(e))))?;
    let unit_prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();
    let total_prices: Vec<Decimal> = items.iter().map(|i| i.total_price).collect();

    let rows = sqlx::query_as::<_, OrderItemRow>(
        r"
        INSERT INTO storefront.order_items
            (order_id, product_id, quantity, unit_price, total_price)
        SELECT $1, item.product_id, item.quantity, item.unit_price, item.total_price
        FROM UNNEST($2::INT4[], $3::INT4[], $4::NUMERIC[], $5::NUMERIC[])
            WITH ORDINALITY AS item(product_id, quantity, unit_price, total_price, position)
        ORDER BY item.position
        RETURNING order_item_id, order_id, product_id, quantity, unit_price, total_price
        ",
    )
    .bind(order_id)
    .bind(product_ids)
    .bind(quantities)
    .bind(unit_prices)
    .bind(total_prices)
    .fetch_all(executor)
    .await?;

    in_insertion_order(rows)
}

/// `RETURNING` rows carry no ordering guarantee; serial ids follow insertion.
fn in_insertion_order(rows: Vec<OrderItemRow>) -> Result<Vec<OrderItem>, RepositoryError> {
    let mut items = rows
        .into_iter()
        .map(OrderItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    items.sort_by_key(|item| item.id);
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(id: i32, quantity: i32) -> OrderItemRow {
        OrderItemRow {
            order_item_id: OrderItemId::new(id),
            order_id: OrderId::new(1),
            product_id: None,
            quantity,
            unit_price: Decimal::ONE,
            total_price: Decimal::from(quantity),
        }
    }

    #[test]
    fn test_returned_items_sorted_by_id() {
        let items = in_insertion_order(vec![row(12, 3), row(10, 1), row(11, 2)]).unwrap();

        let ids: Vec<i32> = items.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, [10, 11, 12]);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_negative_quantity_is_corruption() {
        let err = in_insertion_order(vec![row(1, -1)]).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
