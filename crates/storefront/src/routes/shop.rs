//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use super::NavView;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::state::AppState;

/// Product shown when `/details` has no usable `name`.
pub const DEFAULT_PRODUCT: &str = "Brocoli";

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    /// Formatted, e.g. `$2.67`.
    pub price: String,
    /// Plain decimal for the cart script, e.g. `2.67`.
    pub price_value: String,
    pub image_url: String,
    pub category: String,
    pub description: String,
    pub detail_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let encoded: String = url::form_urlencoded::byte_serialize(product.name.as_bytes()).collect();
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.display_price(),
            price_value: product.price.normalize().to_string(),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            detail_url: format!("/details?name={encoded}"),
        }
    }
}

/// Query parameters for the detail page.
#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub name: Option<String>,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub nav: NavView,
    pub products: Vec<ProductView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "details.html")]
pub struct DetailsTemplate {
    pub nav: NavView,
    pub product: ProductView,
}

/// Display every product.
#[instrument(skip(state, user))]
pub async fn shop(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ShopTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(ShopTemplate {
        nav: NavView::for_user(user.as_ref()),
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display one product by name.
///
/// Unknown or missing names show the default product instead.
#[instrument(skip(state, user))]
pub async fn details(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<DetailsQuery>,
) -> Result<DetailsTemplate> {
    let products = ProductRepository::new(state.pool());

    let requested = query.name.as_deref().filter(|n| !n.trim().is_empty());
    let mut product = match requested {
        Some(name) => products.get_by_name(name).await?,
        None => None,
    };
    if product.is_none() {
        if let Some(name) = requested {
            tracing::debug!(name, "Unknown product, showing default");
        }
        product = products.get_by_name(DEFAULT_PRODUCT).await?;
    }
    let product = product.ok_or_else(|| AppError::NotFound(format!("product {DEFAULT_PRODUCT}")))?;

    Ok(DetailsTemplate {
        nav: NavView::for_user(user.as_ref()),
        product: ProductView::from(&product),
    })
}
