//! Home, cart, checkout and static page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::NavView;
use super::shop::ProductView;
use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: i64 = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub featured: Vec<ProductView>,
}

/// Home page with a few featured products.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let featured = ProductRepository::new(state.pool())
        .featured(FEATURED_PRODUCTS)
        .await?;

    Ok(HomeTemplate {
        nav: NavView::for_user(user.as_ref()),
        featured: featured.iter().map(ProductView::from).collect(),
    })
}

// =============================================================================
// Pages whose only data is the nav bar
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub nav: NavView,
}

/// Cart page. The cart itself lives in the browser's `localStorage`.
pub async fn cart(OptionalAuth(user): OptionalAuth) -> CartTemplate {
    CartTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
}

/// Checkout form. The cart script fills `cart_data` on submit.
pub async fn checkout(OptionalAuth(user): OptionalAuth) -> CheckoutTemplate {
    CheckoutTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub nav: NavView,
}

/// About page.
pub async fn about(OptionalAuth(user): OptionalAuth) -> AboutTemplate {
    AboutTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub nav: NavView,
}

/// Contact page.
pub async fn contact(OptionalAuth(user): OptionalAuth) -> ContactTemplate {
    ContactTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "privacy.html")]
pub struct PrivacyTemplate {
    pub nav: NavView,
}

/// Privacy policy.
pub async fn privacy(OptionalAuth(user): OptionalAuth) -> PrivacyTemplate {
    PrivacyTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "coming_soon.html")]
pub struct ComingSoonTemplate {
    pub nav: NavView,
}

/// Placeholder for features that are not live yet.
pub async fn coming_soon(OptionalAuth(user): OptionalAuth) -> ComingSoonTemplate {
    ComingSoonTemplate {
        nav: NavView::for_user(user.as_ref()),
    }
}
