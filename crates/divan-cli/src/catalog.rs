//! Catalog browsing and product detail commands.

use clap::Args;
use divan_core::catalog::facet_values;
use divan_core::{Category, CatalogView, Facet, Locale, Product, RecordId, SortKey};
use rust_decimal::Decimal;

use crate::app::{clip, fmt_price, fmt_timestamp, App};

/// Arguments for `divan catalog`.
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog deep link query, e.g. `category=sofa&search=oak`
    #[arg(long)]
    pub link: Option<String>,
    /// Free-text search over titles and descriptions
    #[arg(long)]
    pub search: Option<String>,
    /// sofa, bed, table, chair or wardrobe
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub material: Option<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// price-asc, price-desc, rating-desc or name-asc
    #[arg(long)]
    pub sort: Option<SortKey>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Also list the colors and materials present in the catalog
    #[arg(long)]
    pub facets: bool,
}

impl CatalogArgs {
    /// Builds the view: deep link first, then explicit flags on top.
    pub(crate) fn view(&self, locale: Locale) -> CatalogView {
        let mut view = match self.link.as_deref() {
            Some(link) => CatalogView::from_query_params(parse_query(link), locale),
            None => CatalogView::new(locale),
        };
        if let Some(search) = &self.search {
            view.set_search(search.clone());
        }
        view.update_filters(|f| {
            if self.category.is_some() {
                f.category = self.category;
            }
            f.color.clone_from(&self.color);
            f.material.clone_from(&self.material);
            f.min_price = self.min_price;
            f.max_price = self.max_price;
            f.min_rating = self.min_rating;
            f.sort = self.sort;
        });
        view.go_to_page(self.page);
        view
    }
}

/// Splits `a=1&b=2` into pairs. Keys without `=` get an empty value.
fn parse_query(query: &str) -> Vec<(&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}

/// List one page of the filtered, sorted catalog.
///
/// # Errors
///
/// Never fails on network errors: an unreachable catalog prints as empty.
pub(crate) async fn run_catalog(app: &App, args: &CatalogArgs) -> anyhow::Result<()> {
    let products = app.api.load_catalog().await;
    let view = args.view(app.locale);
    let page = view.page(&products);

    if args.facets {
        println!("colors:    {}", facet_values(&products, Facet::Color).join(", "));
        println!("materials: {}", facet_values(&products, Facet::Material).join(", "));
        println!();
    }

    if page.items.is_empty() {
        if view.has_active_filters() || !view.search().is_empty() {
            println!("no products match the current search and filters");
        } else {
            println!("no products available");
        }
        return Ok(());
    }

    print_product_table(app, &page.items);
    println!();
    println!(
        "page {} of {} ({} products)",
        page.page, page.total_pages, page.total_items
    );
    if page.has_next() {
        println!("next: --page {}", page.page + 1);
    }
    Ok(())
}

pub(crate) fn print_product_table(app: &App, products: &[&Product]) {
    println!(
        "{:<10}{:<42}{:<11}{:>14}{:>8}",
        "ID", "TITLE", "CATEGORY", "PRICE", "RATING"
    );
    for product in products {
        let id = product.id.as_ref().map_or("\u{2014}", RecordId::as_str);
        let category = product.category.map_or("\u{2014}", Category::as_str);
        let stock = if product.in_stock() { "" } else { "  (out of stock)" };
        println!(
            "{:<10}{:<42}{:<11}{:>14}{:>8.1}{stock}",
            id,
            clip(product.title(app.locale), 38),
            category,
            fmt_price(product.price),
            product.rating_avg,
        );
    }
}

/// Show one product with its reviews and related products.
///
/// The product, the catalog, and the reviews are fetched concurrently. A
/// failed review load is logged and shown as no reviews.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded or the local favorites
/// cannot be read.
pub(crate) async fn run_product(app: &App, id: &str) -> anyhow::Result<()> {
    let id = RecordId::from(id);
    let (detail, reviews) = tokio::join!(
        app.api.product_detail(&id),
        app.api.reviews_for_product(&id)
    );
    let detail = detail?;
    let reviews = reviews.unwrap_or_else(|e| {
        tracing::error!(product_id = %id, error = %e, "failed to load reviews");
        Vec::new()
    });
    let favorite = app.favorites().is_favorite(&id)?;

    let product = &detail.product;
    println!(
        "{}{}",
        product.title(app.locale),
        if favorite { "  \u{2665}" } else { "" }
    );
    println!("Price:    {}", fmt_price(product.price));
    println!("Rating:   {:.1}", product.rating_avg);
    if let Some(category) = product.category {
        println!("Category: {category}");
    }
    if let Some(material) = &product.material {
        println!("Material: {material}");
    }
    if let Some(color) = &product.color {
        println!("Color:    {color}");
    }
    match product.stock {
        Some(0) => println!("Stock:    out of stock"),
        Some(n) => println!("Stock:    {n}"),
        None => {}
    }
    let description = product.description(app.locale);
    if !description.is_empty() {
        println!();
        println!("{description}");
    }

    println!();
    println!("Reviews ({}):", reviews.len());
    for entry in &reviews {
        println!(
            "  {:.1}  {}  {}  {}",
            entry.review.rating,
            fmt_timestamp(entry.review.created_at),
            entry.author,
            clip(&entry.review.text, 60)
        );
    }

    if !detail.related.is_empty() {
        println!();
        println!("Related:");
        for related in &detail.related {
            println!(
                "  {:<10}{}",
                related.id.as_ref().map_or("\u{2014}", RecordId::as_str),
                related.title(app.locale)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query_splits_pairs() {
        assert_eq!(
            parse_query("?category=sofa&search=oak&flag"),
            [("category", "sofa"), ("search", "oak"), ("flag", "")]
        );
    }

    #[test]
    fn parse_query_ignores_empty_segments() {
        assert_eq!(parse_query("&&category=bed&"), [("category", "bed")]);
        assert!(parse_query("").is_empty());
    }
}
