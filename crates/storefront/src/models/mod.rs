//! Domain models for storefront.
//!
//! These are validated domain objects, separate from the database row types
//! that live next to each repository.

pub mod coupon;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use coupon::Coupon;
pub use order::{
    AdminOrderSummary, Customer, CustomerOrderSummary, NewCustomer, NewOrder, NewOrderItem, Order,
    OrderItem, PlacedOrder, SalesOverview,
};
pub use product::Product;
pub use session::CurrentUser;
pub use user::User;
