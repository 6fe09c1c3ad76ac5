//! Back-office command handlers.
//!
//! Everything except `seed` needs an admin session. Seeding is a setup step
//! run against a fresh deployment, before any admin account exists.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use divan_core::{Category, Product, ProductDraft, RecordId};
use rust_decimal::Decimal;

use crate::app::{clip, fmt_price, fmt_timestamp, App};

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Show counts, revenue, latest orders, and users
    Stats,
    /// Create a product, or edit one with --id
    SaveProduct(ProductArgs),
    /// Delete a product
    DeleteProduct { id: String },
    /// Recompute a product's average rating from its reviews
    RefreshRating { id: String },
    /// Bulk-create products from a JSON array file
    Seed {
        #[arg(long)]
        file: PathBuf,
        /// Pause between requests; defaults to DIVAN_SEED_DELAY_MS
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

/// Product form fields. When editing, omitted fields keep their stored value.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product to edit; omit to create a new one
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub title_kg: Option<String>,
    #[arg(long)]
    pub title_ru: Option<String>,
    #[arg(long)]
    pub title_en: Option<String>,
    #[arg(long)]
    pub description_kg: Option<String>,
    #[arg(long)]
    pub description_ru: Option<String>,
    #[arg(long)]
    pub description_en: Option<String>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub material: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Cover image URL
    #[arg(long)]
    pub cover: Option<String>,
    #[arg(long)]
    pub rating: Option<f64>,
}

impl ProductArgs {
    /// Overlays the given flags onto `draft`.
    pub(crate) fn apply(&self, draft: &mut ProductDraft) {
        fn set(field: &mut String, value: Option<&String>) {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
        set(&mut draft.title_kg, self.title_kg.as_ref());
        set(&mut draft.title_ru, self.title_ru.as_ref());
        set(&mut draft.title_en, self.title_en.as_ref());
        set(&mut draft.description_kg, self.description_kg.as_ref());
        set(&mut draft.description_ru, self.description_ru.as_ref());
        set(&mut draft.description_en, self.description_en.as_ref());
        if let Some(price) = self.price {
            draft.price = price;
        }
        if self.category.is_some() {
            draft.category = self.category;
        }
        if self.material.is_some() {
            draft.material.clone_from(&self.material);
        }
        if self.color.is_some() {
            draft.color.clone_from(&self.color);
        }
        if self.cover.is_some() {
            draft.cover.clone_from(&self.cover);
        }
        if let Some(rating) = self.rating {
            draft.rating_avg = rating;
        }
    }
}

/// # Errors
///
/// Returns an error unless an admin is logged in and all three collections
/// load.
pub(crate) async fn run_admin_stats(app: &App) -> anyhow::Result<()> {
    app.require_admin()?;
    let stats = app.api.dashboard_stats().await?;

    println!("Products: {}", stats.product_count);
    println!("Orders:   {}", stats.order_count);
    println!("Users:    {}", stats.user_count);
    println!("Revenue:  {}", fmt_price(stats.revenue));
    println!();
    println!("Latest orders:");
    for order in &stats.latest_orders {
        println!(
            "  {:<10}{:<10}{:<18}{:<12}{:>16}",
            order.id.as_ref().map_or("\u{2014}", RecordId::as_str),
            order.user_id.as_str(),
            fmt_timestamp(order.created_at),
            order.status.as_str(),
            fmt_price(order.total)
        );
    }
    println!();
    println!("Users:");
    for user in &stats.users {
        println!(
            "  {:<10}{:<30}{}",
            user.id.as_ref().map_or("\u{2014}", RecordId::as_str),
            clip(&user.full_name, 28),
            user.email
        );
    }
    Ok(())
}

/// Create or edit a product from command-line fields.
///
/// # Errors
///
/// Returns an error unless an admin is logged in, the resulting draft is
/// valid, and the write succeeds.
pub(crate) async fn run_admin_save_product(app: &App, args: &ProductArgs) -> anyhow::Result<()> {
    app.require_admin()?;
    let id = args.id.as_deref().map(RecordId::from);

    let mut draft = match &id {
        Some(id) => {
            let existing = app
                .api
                .products()
                .get_by_id(id)
                .await
                .with_context(|| format!("failed to load product {id}"))?;
            ProductDraft::from_product(&existing)
        }
        None => ProductDraft::default(),
    };
    args.apply(&mut draft);

    let saved = app.api.save_product(id.as_ref(), draft).await?;
    println!(
        "saved product {}: {}",
        saved.id.as_ref().map_or("\u{2014}", RecordId::as_str),
        saved.title(app.locale)
    );
    Ok(())
}

/// # Errors
///
/// Returns an error unless an admin is logged in and the delete succeeds.
pub(crate) async fn run_admin_delete_product(app: &App, id: &str) -> anyhow::Result<()> {
    app.require_admin()?;
    let removed = app.api.delete_product(&RecordId::from(id)).await?;
    println!("deleted product {id}: {}", removed.title(app.locale));
    Ok(())
}

/// # Errors
///
/// Returns an error unless an admin is logged in and the refresh succeeds,
/// including when the product changed during the refresh.
pub(crate) async fn run_admin_refresh_rating(app: &App, id: &str) -> anyhow::Result<()> {
    app.require_admin()?;
    let average = app.api.refresh_product_rating(&RecordId::from(id)).await?;
    println!("product {id} rating is now {average:.1}");
    Ok(())
}

/// Read a JSON array of products from `path`.
pub(crate) fn read_seed_file(path: &Path) -> anyhow::Result<Vec<Product>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of products", path.display()))
}

/// POST every product in `file` to the seeding endpoint.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed. Individual failed
/// products are counted, not fatal.
pub(crate) async fn run_admin_seed(
    app: &App,
    file: &Path,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let products = read_seed_file(file)?;
    if products.is_empty() {
        println!("{} has no products", file.display());
        return Ok(());
    }

    let delay = Duration::from_millis(delay_ms.unwrap_or(app.config.seed_delay_ms));
    let report = app.api.seed_products(&products, delay).await;
    println!(
        "seeded {} of {} products ({} failed)",
        report.created,
        products.len(),
        report.failed
    );
    Ok(())
}
