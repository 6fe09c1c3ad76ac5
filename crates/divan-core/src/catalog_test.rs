use std::str::FromStr;

use serde_json::json;

use super::*;
use crate::ids::RecordId;

fn product(id: &str, title: &str, price: i64, category: &str) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "titleKg": title,
        "titleRu": title,
        "titleEn": title,
        "price": price,
        "category": category,
    }))
    .unwrap()
}

fn ids(products: &[&Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.id.as_ref().map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn many(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| product(&i.to_string(), &format!("Item {i}"), 100, "chair"))
        .collect()
}

#[test]
fn price_asc_orders_by_price() {
    let products = [
        product("a", "A", 10, "sofa"),
        product("b", "B", 30, "sofa"),
        product("c", "C", 20, "sofa"),
    ];
    let filters = CatalogFilters {
        sort: Some(SortKey::PriceAsc),
        ..CatalogFilters::default()
    };
    let out = filter_and_sort(&products, "", &filters, Locale::En);
    assert_eq!(ids(&out), ["a", "c", "b"]);
}

#[test]
fn min_price_is_inclusive_lower_bound() {
    let products = [
        product("a", "A", 10, "sofa"),
        product("b", "B", 30, "sofa"),
        product("c", "C", 20, "sofa"),
        product("d", "D", 15, "sofa"),
    ];
    let filters = CatalogFilters {
        min_price: Some(Decimal::from(15)),
        ..CatalogFilters::default()
    };
    let out = filter_and_sort(&products, "", &filters, Locale::En);
    assert_eq!(ids(&out), ["b", "c", "d"]);
}

#[test]
fn filters_are_conjunctive() {
    let mut leather_sofa = product("1", "Leather sofa", 500, "sofa");
    leather_sofa.material = Some("Leather".to_owned());
    leather_sofa.color = Some("Brown".to_owned());
    leather_sofa.rating_avg = 4.8;

    let mut fabric_sofa = product("2", "Fabric sofa", 300, "sofa");
    fabric_sofa.material = Some("Fabric".to_owned());
    fabric_sofa.color = Some("Dark brown".to_owned());
    fabric_sofa.rating_avg = 4.9;

    let mut leather_chair = product("3", "Leather chair", 200, "chair");
    leather_chair.material = Some("leather".to_owned());
    leather_chair.color = Some("brown".to_owned());
    leather_chair.rating_avg = 5.0;

    let products = [leather_sofa, fabric_sofa, leather_chair];
    let filters = CatalogFilters {
        category: Some(Category::Sofa),
        material: Some("LEATHER".to_owned()),
        color: Some("brown".to_owned()),
        min_rating: Some(4.5),
        ..CatalogFilters::default()
    };
    let out = filter_and_sort(&products, "", &filters, Locale::En);
    assert_eq!(ids(&out), ["1"]);
}

#[test]
fn attribute_filter_excludes_products_without_attribute() {
    let products = [product("1", "Plain", 100, "bed")];
    let filters = CatalogFilters {
        color: Some("white".to_owned()),
        ..CatalogFilters::default()
    };
    assert!(filter_and_sort(&products, "", &filters, Locale::Kg).is_empty());
}

#[test]
fn max_price_is_inclusive() {
    let products = [product("a", "A", 20, "bed"), product("b", "B", 21, "bed")];
    let filters = CatalogFilters {
        max_price: Some(Decimal::from(20)),
        ..CatalogFilters::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&products, "", &filters, Locale::Kg)),
        ["a"]
    );
}

#[test]
fn search_uses_localized_title_and_description() {
    let mut p = product("1", "", 100, "table");
    p.title_en = "Oak table".to_owned();
    p.title_ru = "Дубовый стол".to_owned();
    p.description_ru = "Массив дуба".to_owned();
    let products = [p];

    assert_eq!(
        filter_and_sort(&products, "OAK", &CatalogFilters::default(), Locale::En).len(),
        1
    );
    assert_eq!(
        filter_and_sort(&products, "массив", &CatalogFilters::default(), Locale::Ru).len(),
        1
    );
    assert!(filter_and_sort(&products, "oak", &CatalogFilters::default(), Locale::Ru).is_empty());
}

#[test]
fn search_falls_back_when_locale_text_missing() {
    let mut p = product("1", "", 100, "table");
    p.title_kg = "Стол".to_owned();
    let products = [p];
    assert_eq!(
        filter_and_sort(&products, "стол", &CatalogFilters::default(), Locale::En).len(),
        1
    );
}

#[test]
fn search_does_not_reach_past_kyrgyz() {
    let mut p = product("1", "", 100, "table");
    p.title_kg = String::new();
    p.title_ru = "Стол".to_owned();
    let products = [p];
    assert!(filter_and_sort(&products, "стол", &CatalogFilters::default(), Locale::En).is_empty());
    assert_eq!(
        filter_and_sort(&products, "стол", &CatalogFilters::default(), Locale::Ru).len(),
        1
    );
}

#[test]
fn unsorted_output_keeps_input_order() {
    let products = [
        product("z", "Z", 5, "sofa"),
        product("a", "A", 50, "sofa"),
        product("m", "M", 1, "sofa"),
    ];
    let out = filter_and_sort(&products, "", &CatalogFilters::default(), Locale::En);
    assert_eq!(ids(&out), ["z", "a", "m"]);
}

#[test]
fn price_sort_is_stable_for_ties() {
    let products = [
        product("first", "X", 10, "sofa"),
        product("cheap", "Y", 5, "sofa"),
        product("second", "Z", 10, "sofa"),
    ];
    let filters = CatalogFilters {
        sort: Some(SortKey::PriceDesc),
        ..CatalogFilters::default()
    };
    let out = filter_and_sort(&products, "", &filters, Locale::En);
    assert_eq!(ids(&out), ["first", "second", "cheap"]);
}

#[test]
fn rating_desc_puts_best_first() {
    let mut a = product("a", "A", 1, "bed");
    a.rating_avg = 3.5;
    let b = product("b", "B", 1, "bed");
    let mut c = product("c", "C", 1, "bed");
    c.rating_avg = 4.9;
    let products = [a, b, c];
    let filters = CatalogFilters {
        sort: Some(SortKey::RatingDesc),
        ..CatalogFilters::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&products, "", &filters, Locale::En)),
        ["c", "a", "b"]
    );
}

#[test]
fn name_sort_ignores_case_and_folds_yo() {
    let products = [
        product("3", "ёлка", 1, "sofa"),
        product("1", "Банкетка", 1, "sofa"),
        product("2", "диван", 1, "sofa"),
        product("4", "Жёсткий стул", 1, "sofa"),
    ];
    let filters = CatalogFilters {
        sort: Some(SortKey::NameAsc),
        ..CatalogFilters::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&products, "", &filters, Locale::Ru)),
        ["1", "2", "3", "4"]
    );
}

#[test]
fn sort_key_parses_common_spellings() {
    assert_eq!(SortKey::from_str("priceAsc").unwrap(), SortKey::PriceAsc);
    assert_eq!(SortKey::from_str("price-desc").unwrap(), SortKey::PriceDesc);
    assert_eq!(SortKey::from_str("RATING_DESC").unwrap(), SortKey::RatingDesc);
    assert!(SortKey::from_str("newest").is_err());
}

#[test]
fn total_pages_rounds_up() {
    assert_eq!(total_pages(0), 0);
    assert_eq!(total_pages(1), 1);
    assert_eq!(total_pages(12), 1);
    assert_eq!(total_pages(13), 2);
    assert_eq!(total_pages(25), 3);
}

#[test]
fn paginate_slices_by_page_size() {
    let products = many(25);
    let refs: Vec<&Product> = products.iter().collect();

    let first = paginate(&refs, 1);
    assert_eq!(first.items.len(), PAGE_SIZE);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_items, 25);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let last = paginate(&refs, 3);
    assert_eq!(last.items.len(), 1);
    assert_eq!(ids(&last.items), ["24"]);
    assert!(!last.has_next());
}

#[test]
fn paginate_clamps_out_of_range_pages() {
    let products = many(13);
    let refs: Vec<&Product> = products.iter().collect();
    assert_eq!(paginate(&refs, 0).page, 1);
    assert_eq!(paginate(&refs, 99).page, 2);

    let empty: Vec<&Product> = Vec::new();
    let page = paginate(&empty, 4);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
}

#[test]
fn changing_filters_resets_page() {
    let products = many(30);
    let mut view = CatalogView::new(Locale::En);
    view.go_to_page(3);
    assert_eq!(view.page(&products).page, 3);

    view.update_filters(|f| f.max_price = Some(Decimal::from(500)));
    assert_eq!(view.current_page(), 1);

    view.go_to_page(2);
    view.set_search("item");
    assert_eq!(view.current_page(), 1);

    view.go_to_page(2);
    view.set_sort(Some(SortKey::NameAsc));
    assert_eq!(view.current_page(), 1);
}

#[test]
fn reset_clears_filters_but_keeps_search() {
    let mut view = CatalogView::new(Locale::En);
    view.set_search("sofa");
    view.set_filters(CatalogFilters {
        category: Some(Category::Bed),
        color: Some("red".to_owned()),
        ..CatalogFilters::default()
    });
    assert!(view.has_active_filters());

    view.reset();
    assert!(!view.has_active_filters());
    assert_eq!(view.search(), "sofa");
}

#[test]
fn blank_text_filters_are_inactive() {
    let mut view = CatalogView::default();
    view.set_filters(CatalogFilters {
        color: Some("  ".to_owned()),
        ..CatalogFilters::default()
    });
    assert!(!view.filters().is_active());
    assert_eq!(view.current_page(), 1);
}

#[test]
fn query_params_seed_category_and_search() {
    let view = CatalogView::from_query_params(
        [("category", "wardrobe"), ("search", "oak"), ("page", "4")],
        Locale::Ru,
    );
    assert_eq!(view.filters().category, Some(Category::Wardrobe));
    assert_eq!(view.search(), "oak");
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.locale(), Locale::Ru);
}

#[test]
fn unknown_category_param_is_ignored() {
    let view = CatalogView::from_query_params([("category", "lamp")], Locale::Kg);
    assert_eq!(view.filters().category, None);
}

#[test]
fn facet_values_are_distinct_and_sorted() {
    let mut a = product("1", "A", 1, "sofa");
    a.color = Some("White".to_owned());
    a.material = Some("Oak".to_owned());
    let mut b = product("2", "B", 1, "sofa");
    b.color = Some("Black".to_owned());
    let mut c = product("3", "C", 1, "sofa");
    c.color = Some("White".to_owned());
    c.material = Some(String::new());
    let products = [a, b, c];

    assert_eq!(facet_values(&products, Facet::Color), ["Black", "White"]);
    assert_eq!(facet_values(&products, Facet::Material), ["Oak"]);
}

#[test]
fn related_products_share_category_and_exclude_self() {
    let products: Vec<Product> = (1..=7)
        .map(|i| {
            let category = if i == 3 { "bed" } else { "sofa" };
            product(&i.to_string(), "P", 1, category)
        })
        .collect();
    let current = &products[0];
    let related = related_products(&products, current);
    assert_eq!(ids(&related), ["2", "4", "5", "6"]);
    assert!(related.iter().all(|p| p.id != Some(RecordId::from("1"))));
}

#[test]
fn related_products_empty_without_category() {
    let mut current = product("1", "P", 1, "sofa");
    current.category = None;
    let products = [product("2", "Q", 1, "sofa")];
    assert!(related_products(&products, &current).is_empty());
}
