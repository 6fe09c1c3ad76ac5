use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ids::{product_id_from_fields, ProductId};
use crate::locale::Locale;
use crate::serde_helpers::{
    lenient_decimal, lenient_f64, lenient_optional, lenient_stock, lenient_string,
    lenient_timestamp,
};
use crate::validation::{required, ValidationError};

/// Furniture category. Values outside the known set deserialize as
/// [`Category::Other`] so a single odd record cannot break a catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sofa,
    Bed,
    Table,
    Chair,
    Wardrobe,
    #[serde(other)]
    Other,
}

impl Category {
    /// Categories offered in the catalog filter, in display order.
    pub const SELECTABLE: [Category; 5] = [
        Category::Sofa,
        Category::Bed,
        Category::Table,
        Category::Chair,
        Category::Wardrobe,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sofa => "sofa",
            Category::Bed => "bed",
            Category::Table => "table",
            Category::Chair => "chair",
            Category::Wardrobe => "wardrobe",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category \"{0}\"")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Category::SELECTABLE
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or(UnknownCategory(lowered))
    }
}

/// A catalog item as stored by the products endpoint.
///
/// Fields the client does not model are kept in `extra` and written back
/// untouched, because the backend only supports full-record replacement.
/// Every modelled field decodes leniently, so a single odd record cannot
/// break a catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Product {
    /// Resolved from [`crate::ids::PRODUCT_ID_KEYS`]; see the `Deserialize` impl.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title_kg: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title_ru: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title_en: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description_kg: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description_ru: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description_en: String,
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub price: Decimal,
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub material: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// Cover image URL.
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating_avg: f64,
    #[serde(
        default,
        deserialize_with = "lenient_stock",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Records may carry several of the id keys at once, which serde aliases
// reject as a duplicate field. The first non-null key wins; the other keys
// stay in `extra`.
impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let id = product_id_from_fields(&fields);
        fields.remove("id");
        let mut product =
            Product::deserialize(Value::Object(fields)).map_err(de::Error::custom)?;
        product.id = id;
        Ok(product)
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Product::serialize(self, serializer)
    }
}

impl Product {
    /// Localized title, falling back through the other locales.
    #[must_use]
    pub fn title(&self, locale: Locale) -> &str {
        first_non_blank(locale.fallback_chain().map(|l| self.title_in(l)))
    }

    /// Localized description, falling back through the other locales.
    #[must_use]
    pub fn description(&self, locale: Locale) -> &str {
        first_non_blank(locale.fallback_chain().map(|l| self.description_in(l)))
    }

    /// Title as the catalog searches and sorts it: the requested locale, else
    /// Kyrgyz. Never falls back to a third locale.
    #[must_use]
    pub fn catalog_title(&self, locale: Locale) -> &str {
        first_non_blank([self.title_in(locale), self.title_kg.as_str()])
    }

    /// Description counterpart of [`Product::catalog_title`].
    #[must_use]
    pub fn catalog_description(&self, locale: Locale) -> &str {
        first_non_blank([self.description_in(locale), self.description_kg.as_str()])
    }

    fn title_in(&self, locale: Locale) -> &str {
        match locale {
            Locale::Kg => &self.title_kg,
            Locale::Ru => &self.title_ru,
            Locale::En => &self.title_en,
        }
    }

    fn description_in(&self, locale: Locale) -> &str {
        match locale {
            Locale::Kg => &self.description_kg,
            Locale::Ru => &self.description_ru,
            Locale::En => &self.description_en,
        }
    }

    /// Products without a stock figure are treated as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|s| s > 0)
    }

    /// `true` when both products carry the same non-blank id.
    #[must_use]
    pub fn same_id(&self, other: &Product) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => !a.is_blank() && a == b,
            _ => false,
        }
    }
}

/// Admin form input for creating or editing a [`Product`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub title_kg: String,
    pub title_ru: String,
    pub title_en: String,
    pub description_kg: String,
    pub description_ru: String,
    pub description_en: String,
    pub price: Decimal,
    pub cover: Option<String>,
    /// Defaults to [`Category::Sofa`] when left unset.
    pub category: Option<Category>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub rating_avg: f64,
}

impl ProductDraft {
    /// Prefills a draft from an existing record for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            title_kg: product.title_kg.clone(),
            title_ru: product.title_ru.clone(),
            title_en: product.title_en.clone(),
            description_kg: product.description_kg.clone(),
            description_ru: product.description_ru.clone(),
            description_en: product.description_en.clone(),
            price: product.price,
            cover: product.cover.clone(),
            category: product.category,
            material: product.material.clone(),
            color: product.color.clone(),
            rating_avg: product.rating_avg,
        }
    }

    /// Validates the draft and turns it into a record stamped with `created_at`.
    ///
    /// Callers pass the original timestamp when editing and the current time
    /// when creating.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] if any of the three titles is blank.
    /// - [`ValidationError::NonPositivePrice`] if `price <= 0`.
    pub fn into_product(self, created_at: DateTime<Utc>) -> Result<Product, ValidationError> {
        let title_kg = required("titleKg", &self.title_kg)?.to_owned();
        let title_ru = required("titleRu", &self.title_ru)?.to_owned();
        let title_en = required("titleEn", &self.title_en)?.to_owned();
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }

        let rating_avg = if self.rating_avg.is_finite() {
            self.rating_avg
        } else {
            0.0
        };

        Ok(Product {
            id: None,
            title_kg,
            title_ru,
            title_en,
            description_kg: self.description_kg,
            description_ru: self.description_ru,
            description_en: self.description_en,
            price: self.price,
            category: Some(self.category.unwrap_or(Category::Sofa)),
            material: non_blank(self.material),
            color: non_blank(self.color),
            cover: non_blank(self.cover),
            rating_avg,
            stock: None,
            created_at: Some(created_at),
            extra: Map::new(),
        })
    }
}

fn first_non_blank<'a>(candidates: impl IntoIterator<Item = &'a str>) -> &'a str {
    candidates
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
