//! Admin sales dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use harvest_hub_core::format_money;

use super::NavView;
use crate::db::{OrderRepository, UserRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrderSummary, User};
use crate::state::AppState;

/// Order row display data.
#[derive(Debug, Clone)]
pub struct AdminOrderView {
    pub order_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub date: String,
    pub total: String,
    pub payment_method: String,
    pub status: String,
}

impl From<&AdminOrderSummary> for AdminOrderView {
    fn from(order: &AdminOrderSummary) -> Self {
        Self {
            order_id: order.order_id.as_i32(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            date: order.order_date.format("%Y-%m-%d %H:%M").to_string(),
            total: format_money(order.total_amount),
            payment_method: order.payment_method.clone(),
            status: order.payment_status.to_string(),
        }
    }
}

/// User row display data.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
        }
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub nav: NavView,
    pub total_sales: String,
    pub order_count: i64,
    pub user_count: i64,
    pub orders: Vec<AdminOrderView>,
    pub users: Vec<UserView>,
}

/// Sales totals, every order and every account.
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<AdminTemplate> {
    let orders = OrderRepository::new(state.pool());
    let overview = orders.sales_overview().await?;
    let recent = orders.list_all().await?;
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(AdminTemplate {
        nav: NavView::for_user(Some(&admin)),
        total_sales: overview.display_total_sales(),
        order_count: overview.order_count,
        user_count: overview.user_count,
        orders: recent.iter().map(AdminOrderView::from).collect(),
        users: users.iter().map(UserView::from).collect(),
    })
}
