//! Shopper dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use harvest_hub_core::format_money;

use super::NavView;
use crate::db::OrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CustomerOrderSummary;
use crate::state::AppState;

/// Order row display data.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub order_id: i32,
    pub date: String,
    pub item_count: i64,
    pub total: String,
    pub status: String,
}

impl From<&CustomerOrderSummary> for OrderRowView {
    fn from(order: &CustomerOrderSummary) -> Self {
        Self {
            order_id: order.order_id.as_i32(),
            date: order.order_date.format("%b %-d, %Y").to_string(),
            item_count: order.item_count,
            total: format_money(order.total_amount),
            status: order.payment_status.to_string(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: NavView,
    pub name: String,
    pub email: String,
    pub orders: Vec<OrderRowView>,
}

/// Order history for the logged-in user.
///
/// Orders are found through the email typed at checkout, so guest orders
/// placed with the account's address show up too.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<DashboardTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_for_email(user.email.as_str())
        .await?;

    Ok(DashboardTemplate {
        nav: NavView::for_user(Some(&user)),
        name: user.name.clone(),
        email: user.email.to_string(),
        orders: orders.iter().map(OrderRowView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use harvest_hub_core::{OrderId, PaymentStatus};

    use super::*;

    #[test]
    fn test_order_row_view() {
        let summary = CustomerOrderSummary {
            order_id: OrderId::new(42),
            order_date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            total_amount: Decimal::new(1295, 2),
            payment_status: PaymentStatus::Pending,
            item_count: 3,
        };

        let view = OrderRowView::from(&summary);
        assert_eq!(view.order_id, 42);
        assert_eq!(view.date, "Mar 5, 2024");
        assert_eq!(view.total, "$12.95");
        assert_eq!(view.status, "Pending");
    }
}
