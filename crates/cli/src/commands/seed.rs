//! Seed the product catalog.
//!
//! Products are upserted by name, so running the command again updates
//! prices and descriptions in place.

use harvest_hub_storefront::db::ProductRepository;
use harvest_hub_storefront::db::products::ProductSeed;
use rust_decimal::Decimal;
use tracing::info;

use super::connect;

/// The default produce catalog.
fn default_catalog() -> [ProductSeed<'static>; 4] {
    [
        ProductSeed {
            name: "Brocoli",
            price: Decimal::new(267, 2),
            image_url: "/static/images/vegetable-item-2.jpg",
            category: "Vegetables",
            description: "Fresh organic broccoli, rich in vitamins and minerals. Sourced directly from organic farms.",
        },
        ProductSeed {
            name: "Apple",
            price: Decimal::new(259, 2),
            image_url: "/static/images/featur-1.jpg",
            category: "Fruits",
            description: "Crisp, juicy, and naturally sweet apples. Perfect for a healthy snack.",
        },
        ProductSeed {
            name: "Strawberry",
            price: Decimal::new(229, 2),
            image_url: "/static/images/featur-2.jpg",
            category: "Fruits",
            description: "Sweet and red strawberries, handpicked fresh from the farm.",
        },
        ProductSeed {
            name: "Potatoes",
            price: Decimal::new(176, 2),
            image_url: "/static/images/vegetable-item-5.jpg",
            category: "Vegetables",
            description: "Organic potatoes, great for frying, boiling or baking.",
        },
    ]
}

/// Insert or update the default catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an upsert fails.
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool);

    for seed in default_catalog() {
        let product = products.upsert(&seed).await?;
        info!("  {} ({}) -> id {}", product.name, product.display_price(), product.id);
    }

    info!("Catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_fallback_product() {
        let catalog = default_catalog();
        assert!(catalog.iter().any(|p| p.name == "Brocoli"));
        assert!(catalog.iter().all(|p| p.price > Decimal::ZERO));
    }
}
