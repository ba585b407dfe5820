//! Seed the product catalog with demo data.
//!
//! Inserts a small fixed catalog so a fresh install (or the integration
//! test suite) has products to list, search, and order. Without `--fresh`
//! the command is a no-op when products already exist, so it is safe to
//! run on every deploy.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use vestra_core::Money;

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Neither `VESTRA_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Demo catalog: (name, brand, category, size, color, price in cents, image).
const DEMO_PRODUCTS: &[(&str, &str, &str, &str, &str, i64, Option<&str>)] = &[
    ("Air Zoom Runner", "Nike", "shoes", "42", "white", 12_999, Some("air-zoom-runner.png")),
    ("Classic Leather", "Reebok", "shoes", "43", "black", 8_499, Some("classic-leather.png")),
    ("Suede XXI", "Puma", "shoes", "41", "red", 7_999, Some("suede-xxi.png")),
    ("Gazelle", "Adidas", "shoes", "44", "navy", 9_499, Some("gazelle.png")),
    ("Heavyweight Hoodie", "Champion", "clothes", "L", "grey", 5_999, Some("heavyweight-hoodie.png")),
    ("Box Logo Tee", "Vestra", "clothes", "M", "white", 4_499, Some("box-logo-tee.png")),
    ("Tech Fleece Joggers", "Nike", "clothes", "M", "black", 6_999, Some("tech-fleece-joggers.png")),
    ("Trefoil Tee", "Adidas", "clothes", "S", "green", 2_999, Some("trefoil-tee.png")),
    ("5-Panel Cap", "New Era", "accessories", "one size", "black", 3_499, Some("five-panel-cap.png")),
    ("Everyday Socks 3-Pack", "Nike", "accessories", "39-42", "white", 1_499, None),
];

/// Seed the product catalog.
///
/// With `fresh`, existing products are wiped first, which cascades to
/// cart lines and order lines that reference them.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a query fails.
pub async fn run(fresh: bool) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    if fresh {
        tracing::warn!("--fresh: clearing products, carts, and orders");
        sqlx::query("TRUNCATE products, orders RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await?;
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM products")
            .fetch_one(&pool)
            .await?;

        if existing > 0 {
            tracing::info!(existing, "Products already present, skipping (use --fresh to reseed)");
            return Ok(());
        }
    }

    for (name, brand, category, size, color, cents, image_url) in DEMO_PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO products (name, brand, category, size, color, price, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(name)
        .bind(brand)
        .bind(category)
        .bind(size)
        .bind(color)
        .bind(Money::from_cents(*cents))
        .bind(*image_url)
        .execute(&pool)
        .await?;
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "Seeding complete!");
    Ok(())
}

fn database_url() -> Result<SecretString, SeedError> {
    std::env::var("VESTRA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("VESTRA_DATABASE_URL"))
}
