use grocer_catalog::CategoryMatcher;
use grocer_storefront::backend::{Backend, Filter, tables};
use grocer_storefront::local::load_categories;
use grocer_storefront::{
    FileLocalStore, MemoryBackend, StorefrontApi, sample_products, setup_environment,
};
use shared::models::{ADMIN_ROLE, Product};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. dotenv, config, logging
    let config = setup_environment();
    tracing::info!("Grocer storefront demo starting...");

    // 2. Matcher and the saved (or default) category list
    let matcher = CategoryMatcher::new(config.synonym_table()?);
    let local = FileLocalStore::open(&config.state_dir)?;
    let categories = load_categories(&local)?;

    // 3. In-memory backend, seeded by an admin account
    let backend = Arc::new(MemoryBackend::new());
    let api = StorefrontApi::new(backend.clone(), backend.clone())
        .with_matcher(matcher)
        .with_product_limit(config.product_fetch_limit);

    api.sign_up("admin@grocer.local", "admin", "admin").await?;
    let admin = api
        .current_user()
        .await?
        .ok_or_else(|| anyhow::anyhow!("demo admin has no session"))?;
    backend
        .update(
            tables::PROFILES,
            serde_json::json!({ "role": ADMIN_ROLE }),
            &[Filter::eq("id", &admin.id)],
        )
        .await?;
    api.seed_products(sample_products()?).await?;

    // 4. Each category with the products assigned to it
    let products = api.get_products().await?;
    let categories = categories.list();
    println!("{} products, {} categories", products.len(), categories.len());

    for category in &categories {
        println!("\n{} (/{})", category.title, category.slug);
        for product in api.matcher().partition(&products, &category.title) {
            println!("  - {} [{}] {}", product.name, product.display_category(), product.price);
        }
    }

    let unmatched: Vec<&Product> = products
        .iter()
        .filter(|p| {
            !categories
                .iter()
                .any(|c| api.matcher().belongs_to_category(*p, &c.title))
        })
        .collect();
    if !unmatched.is_empty() {
        println!("\nUncategorized:");
        for product in unmatched {
            println!("  - {} [{}]", product.name, product.display_category());
        }
    }

    Ok(())
}
