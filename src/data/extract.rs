//! HTML extraction for each page view
//!
//! Pure functions over a parsed document. Extraction never fails: a missing
//! node yields an empty string, a `None` image or an empty list, because the
//! upstream markup is not under our control. Output lists follow document order.

use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

use super::selectors::Selectors;
use super::{Category, ItemDetail, MenuItem, RestaurantInfo, Special};

/// Concatenated, trimmed text of every match
fn text_of<'a>(matches: impl Iterator<Item = ElementRef<'a>>) -> String {
    matches
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn attr_of(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

/// Attribute of the first match, if both the node and the attribute exist
fn first_attr<'a>(mut matches: impl Iterator<Item = ElementRef<'a>>, name: &str) -> Option<String> {
    matches
        .next()
        .and_then(|el| el.value().attr(name))
        .map(str::to_string)
}

/// Trimmed text of each match as its own entry
fn each_text<'a>(matches: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    matches
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

pub fn categories(doc: &Html, selectors: &Selectors) -> Vec<Category> {
    let sel = &selectors.categories;
    doc.select(&sel.container)
        .map(|el| Category {
            id: attr_of(el, &sel.id_attribute),
            name: text_of(el.select(&sel.name)),
            description: text_of(el.select(&sel.description)),
        })
        .collect()
}

pub fn items(doc: &Html, selectors: &Selectors) -> Vec<MenuItem> {
    let sel = &selectors.items;
    doc.select(&sel.container)
        .map(|el| MenuItem {
            id: attr_of(el, &sel.id_attribute),
            name: text_of(el.select(&sel.name)),
            price: text_of(el.select(&sel.price)),
            description: text_of(el.select(&sel.description)),
            image: first_attr(el.select(&sel.image), &sel.image_attribute),
            category: None,
        })
        .collect()
}

/// Extracts the detail page of `item_id`
///
/// The id is the one requested rather than anything read from the page.
pub fn item_detail(doc: &Html, selectors: &Selectors, item_id: &str) -> ItemDetail {
    let sel = &selectors.item_detail;

    // Later rows with the same nutrient name win
    let nutritional_info: BTreeMap<String, String> = doc
        .select(&sel.nutrition_row)
        .map(|row| {
            (
                text_of(row.select(&sel.nutrition_name)),
                text_of(row.select(&sel.nutrition_value)),
            )
        })
        .collect();

    ItemDetail {
        id: item_id.to_string(),
        name: text_of(doc.select(&sel.name)),
        price: text_of(doc.select(&sel.price)),
        description: text_of(doc.select(&sel.description)),
        image: first_attr(doc.select(&sel.image), &sel.image_attribute),
        ingredients: each_text(doc.select(&sel.ingredient)),
        allergens: each_text(doc.select(&sel.allergen)),
        nutritional_info,
    }
}

pub fn restaurant_info(doc: &Html, selectors: &Selectors) -> RestaurantInfo {
    let sel = &selectors.restaurant;
    RestaurantInfo {
        name: text_of(doc.select(&sel.name)),
        address: text_of(doc.select(&sel.address)),
        phone: text_of(doc.select(&sel.phone)),
        hours: text_of(doc.select(&sel.hours)),
        description: text_of(doc.select(&sel.description)),
    }
}

pub fn specials(doc: &Html, selectors: &Selectors) -> Vec<Special> {
    let sel = &selectors.specials;
    doc.select(&sel.container)
        .map(|el| Special {
            id: attr_of(el, &sel.id_attribute),
            name: text_of(el.select(&sel.name)),
            price: text_of(el.select(&sel.price)),
            description: text_of(el.select(&sel.description)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SelectorConfig;

    fn selectors() -> Selectors {
        SelectorConfig::default().compile().unwrap()
    }

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn test_categories_in_document_order() {
        let html = doc(r#"
            <div class="menu-category" data-category-id="1">
                <h2 class="category-name">  Starters </h2>
                <p class="category-description">Small plates</p>
            </div>
            <div class="menu-category" data-category-id="2">
                <h2 class="category-name">Mains</h2>
            </div>
        "#);

        let result = categories(&html, &selectors());

        assert_eq!(
            result,
            vec![
                Category {
                    id: "1".to_string(),
                    name: "Starters".to_string(),
                    description: "Small plates".to_string(),
                },
                Category {
                    id: "2".to_string(),
                    name: "Mains".to_string(),
                    description: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_category_without_id_attribute_gets_empty_id() {
        let html = doc(r#"<div class="menu-category"><span class="category-name">Drinks</span></div>"#);

        let result = categories(&html, &selectors());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "");
        assert_eq!(result[0].name, "Drinks");
    }

    #[test]
    fn test_items_with_and_without_image() {
        let html = doc(r#"
            <div class="menu-item" data-item-id="10">
                <span class="item-name">Spring Rolls</span>
                <span class="item-price">$5.00</span>
                <p class="item-description">Crispy veg rolls</p>
                <img class="item-image" src="/img/rolls.jpg">
            </div>
            <div class="menu-item" data-item-id="11">
                <span class="item-name">Soup</span>
            </div>
        "#);

        let result = items(&html, &selectors());

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "10");
        assert_eq!(result[0].price, "$5.00");
        assert_eq!(result[0].description, "Crispy veg rolls");
        assert_eq!(result[0].image.as_deref(), Some("/img/rolls.jpg"));
        assert!(result[0].category.is_none());
        assert_eq!(result[1].name, "Soup");
        assert_eq!(result[1].price, "");
        assert!(result[1].image.is_none());
    }

    #[test]
    fn test_image_node_without_src_is_none() {
        let html = doc(r#"<div class="menu-item"><img class="item-image"></div>"#);

        let result = items(&html, &selectors());

        assert!(result[0].image.is_none());
    }

    #[test]
    fn test_text_joins_nested_and_repeated_matches() {
        let html = doc(r#"
            <div class="menu-item">
                <span class="item-name">Pad <em>Thai</em></span>
                <span class="item-price">$9</span><span class="item-price">.50</span>
            </div>
        "#);

        let result = items(&html, &selectors());

        assert_eq!(result[0].name, "Pad Thai");
        assert_eq!(result[0].price, "$9.50");
    }

    #[test]
    fn test_item_detail_collects_lists() {
        let html = doc(r#"
            <h1 class="item-detail-name">Green Curry</h1>
            <span class="item-detail-price">$12</span>
            <p class="item-detail-description">Coconut based</p>
            <img class="item-detail-image" src="curry.png">
            <ul>
                <li class="ingredient-item">Coconut milk</li>
                <li class="ingredient-item"> Basil </li>
            </ul>
            <ul><li class="allergen-item">Nuts</li></ul>
            <table>
                <tr class="nutrition-item"><td class="nutrition-name">Calories</td><td class="nutrition-value">540</td></tr>
                <tr class="nutrition-item"><td class="nutrition-name">Fat</td><td class="nutrition-value">30g</td></tr>
            </table>
        "#);

        let detail = item_detail(&html, &selectors(), "42");

        assert_eq!(detail.id, "42");
        assert_eq!(detail.name, "Green Curry");
        assert_eq!(detail.price, "$12");
        assert_eq!(detail.description, "Coconut based");
        assert_eq!(detail.image.as_deref(), Some("curry.png"));
        assert_eq!(detail.ingredients, vec!["Coconut milk", "Basil"]);
        assert_eq!(detail.allergens, vec!["Nuts"]);
        assert_eq!(detail.nutritional_info.get("Calories").map(String::as_str), Some("540"));
        assert_eq!(detail.nutritional_info.get("Fat").map(String::as_str), Some("30g"));
    }

    #[test]
    fn test_item_detail_duplicate_nutrient_keeps_last() {
        let html = doc(r#"
            <div class="nutrition-item"><span class="nutrition-name">Salt</span><span class="nutrition-value">1g</span></div>
            <div class="nutrition-item"><span class="nutrition-name">Salt</span><span class="nutrition-value">2g</span></div>
        "#);

        let detail = item_detail(&html, &selectors(), "1");

        assert_eq!(detail.nutritional_info.len(), 1);
        assert_eq!(detail.nutritional_info["Salt"], "2g");
    }

    #[test]
    fn test_restaurant_info_fields() {
        let html = doc(r#"
            <h1 class="restaurant-name">Lotus</h1>
            <p class="restaurant-address">1 Main St</p>
            <p class="restaurant-phone">555-0100</p>
            <p class="restaurant-hours">9-5</p>
        "#);

        let info = restaurant_info(&html, &selectors());

        assert_eq!(info.name, "Lotus");
        assert_eq!(info.address, "1 Main St");
        assert_eq!(info.phone, "555-0100");
        assert_eq!(info.hours, "9-5");
        assert_eq!(info.description, "");
    }

    #[test]
    fn test_specials() {
        let html = doc(r#"
            <div class="special-item" data-item-id="s1">
                <span class="special-name">Chef's Soup</span>
                <span class="special-price">$6</span>
                <span class="special-description">Ask your server</span>
            </div>
        "#);

        let result = specials(&html, &selectors());

        assert_eq!(
            result,
            vec![Special {
                id: "s1".to_string(),
                name: "Chef's Soup".to_string(),
                price: "$6".to_string(),
                description: "Ask your server".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_matching_nodes_yields_empty_results() {
        let html = doc("<p>Closed for renovation</p>");
        let sel = selectors();

        assert!(categories(&html, &sel).is_empty());
        assert!(items(&html, &sel).is_empty());
        assert!(specials(&html, &sel).is_empty());
        assert_eq!(restaurant_info(&html, &sel), RestaurantInfo::default());

        let detail = item_detail(&html, &sel, "9");
        assert_eq!(detail.id, "9");
        assert_eq!(detail.name, "");
        assert!(detail.image.is_none());
        assert!(detail.ingredients.is_empty());
        assert!(detail.allergens.is_empty());
        assert!(detail.nutritional_info.is_empty());
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let html = Html::parse_document(
            r#"<div class="menu-item" data-item-id="1"><span class="item-name">Unclosed"#,
        );

        let result = items(&html, &selectors());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Unclosed");
    }

    #[test]
    fn test_overridden_selectors_are_used() {
        let mut config = SelectorConfig::default();
        config.items.container = "li.dish".to_string();
        config.items.image_attribute = "data-src".to_string();
        let sel = config.compile().unwrap();

        let html = doc(r#"<ul><li class="dish" data-item-id="3"><img class="item-image" data-src="lazy.jpg"></li></ul>"#);

        let result = items(&html, &sel);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
        assert_eq!(result[0].image.as_deref(), Some("lazy.jpg"));
    }
}
