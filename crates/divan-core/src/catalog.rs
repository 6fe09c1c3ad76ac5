//! Catalog query pipeline.
//!
//! Turns the fully loaded product list plus a free-text search, a filter set,
//! a sort key, and a page number into the slice of products shown on one
//! catalog page. Everything runs in memory; the backend does no filtering.
//!
//! Filters are conjunctive. Sorting is stable, so products that compare equal
//! keep their original relative order. An unset sort key keeps insertion order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::product::{Category, Product};

/// Products per catalog page.
pub const PAGE_SIZE: usize = 12;

/// Related products shown under a product detail view.
pub const RELATED_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Localized title, case-insensitive.
    NameAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingDesc,
        SortKey::NameAsc,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::RatingDesc => "ratingDesc",
            SortKey::NameAsc => "nameAsc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key \"{0}\" (expected priceAsc, priceDesc, ratingDesc or nameAsc)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    /// Accepts `priceAsc`, `price-asc`, `price_asc` and case variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().to_ascii_lowercase() == squashed)
            .ok_or_else(|| UnknownSortKey(s.to_owned()))
    }
}

/// Active catalog filters. `None` means the filter is off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilters {
    pub category: Option<Category>,
    /// Case-insensitive substring of the product color.
    pub color: Option<String>,
    /// Case-insensitive substring of the product material.
    pub material: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
    pub sort: Option<SortKey>,
}

impl CatalogFilters {
    /// `true` if any filter or a sort key is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.color.is_some()
            || self.material.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_rating.is_some()
            || self.sort.is_some()
    }

    /// Drops blank text filters so `Some("")` behaves like `None`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.color = non_blank(self.color);
        self.material = non_blank(self.material);
        self
    }

    /// `true` if `product` satisfies every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != Some(category) {
                return false;
            }
        }
        if !attribute_matches(self.color.as_deref(), product.color.as_deref()) {
            return false;
        }
        if !attribute_matches(self.material.as_deref(), product.material.as_deref()) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.min_rating.is_some_and(|min| product.rating_avg < min) {
            return false;
        }
        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn attribute_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted.map(str::trim).filter(|w| !w.is_empty()), actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(w), Some(a)) => a.to_lowercase().contains(&w.to_lowercase()),
    }
}

/// Case-insensitive substring match against the catalog title and
/// description (requested locale, else Kyrgyz). A blank query matches
/// everything.
#[must_use]
pub fn matches_search(product: &Product, query: &str, locale: Locale) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    product.catalog_title(locale).to_lowercase().contains(&query)
        || product
            .catalog_description(locale)
            .to_lowercase()
            .contains(&query)
}

/// Applies search and filters, then the sort key, returning borrowed products.
#[must_use]
pub fn filter_and_sort<'a>(
    products: &'a [Product],
    search: &str,
    filters: &CatalogFilters,
    locale: Locale,
) -> Vec<&'a Product> {
    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| matches_search(p, search, locale))
        .filter(|p| filters.matches(p))
        .collect();
    if let Some(key) = filters.sort {
        sort_products(&mut matched, key, locale);
    }
    matched
}

/// Stable in-place sort by `key`.
pub fn sort_products(products: &mut [&Product], key: SortKey, locale: Locale) {
    match key {
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::RatingDesc => products.sort_by(|a, b| rating_desc(a, b)),
        SortKey::NameAsc => {
            products.sort_by_cached_key(|p| collation_key(p.catalog_title(locale)));
        }
    }
}

fn rating_desc(a: &Product, b: &Product) -> Ordering {
    b.rating_avg.total_cmp(&a.rating_avg)
}

/// Comparison key for title ordering: lowercase with `ё` folded into `е`, so
/// Cyrillic titles sort the way a Russian or Kyrgyz reader expects.
#[must_use]
pub fn collation_key(title: &str) -> String {
    title
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// Number of pages needed for `item_count` items.
#[must_use]
pub fn total_pages(item_count: usize) -> usize {
    item_count.div_ceil(PAGE_SIZE)
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page actually returned after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Matches across all pages.
    pub total_items: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Cuts page `page` (1-indexed) out of `items`. Requests past either end are
/// clamped to the first or last page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let pages = total_pages(items.len());
    let page = page.clamp(1, pages.max(1));
    let start = (page - 1) * PAGE_SIZE;
    let slice = items.iter().skip(start).take(PAGE_SIZE).cloned().collect();
    Page {
        items: slice,
        page,
        total_pages: pages,
        total_items: items.len(),
    }
}

/// Facet whose distinct values feed a filter dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Color,
    Material,
}

/// Distinct non-empty values of `facet` across `products`, sorted.
#[must_use]
pub fn facet_values(products: &[Product], facet: Facet) -> Vec<String> {
    let mut values: Vec<String> = products
        .iter()
        .filter_map(|p| match facet {
            Facet::Color => p.color.as_deref(),
            Facet::Material => p.material.as_deref(),
        })
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Up to [`RELATED_LIMIT`] other products from the same category, in list order.
#[must_use]
pub fn related_products<'a>(products: &'a [Product], product: &Product) -> Vec<&'a Product> {
    let Some(category) = product.category else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|p| p.category == Some(category) && !p.same_id(product))
        .take(RELATED_LIMIT)
        .collect()
}

/// Catalog state for one browsing session.
///
/// Any change to search, filters, or sort sends the view back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    search: String,
    filters: CatalogFilters,
    locale: Locale,
    page: usize,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl CatalogView {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            search: String::new(),
            filters: CatalogFilters::default(),
            locale,
            page: 1,
        }
    }

    /// Seeds the view from URL query parameters.
    ///
    /// Only `category` (catalog deep links) and `search` (home page redirect)
    /// are honored. An unrecognized category is ignored.
    pub fn from_query_params<I, K, V>(params: I, locale: Locale) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut view = Self::new(locale);
        for (key, value) in params {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "category" if !value.is_empty() => match value.parse::<Category>() {
                    Ok(category) => view.filters.category = Some(category),
                    Err(e) => tracing::debug!(error = %e, "ignoring category query parameter"),
                },
                "search" => value.clone_into(&mut view.search),
                _ => {}
            }
        }
        view
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    pub fn set_filters(&mut self, filters: CatalogFilters) {
        self.filters = filters.normalized();
        self.page = 1;
    }

    /// Edits the filters in place, e.g. `view.update_filters(|f| f.color = None)`.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut CatalogFilters)) {
        let mut filters = self.filters.clone();
        edit(&mut filters);
        self.set_filters(filters);
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.filters.sort = sort;
        self.page = 1;
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    /// Clears every filter and the sort key. The search text is kept.
    pub fn reset(&mut self) {
        self.set_filters(CatalogFilters::default());
    }

    /// Switching locale changes what search and name sort compare against.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Runs the pipeline over `products` and returns the current page.
    #[must_use]
    pub fn page<'a>(&self, products: &'a [Product]) -> Page<&'a Product> {
        let matched = filter_and_sort(products, &self.search, &self.filters, self.locale);
        paginate(&matched, self.page)
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
