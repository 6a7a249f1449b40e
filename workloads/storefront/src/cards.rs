//! Product cards.

use shop_dom::{el, Document, Fragment, VNode};

use crate::error::RenderError;
use crate::product::Product;
use crate::PRODUCTS_CONTAINER_SELECTOR;

/// Width attribute of every product picture.
pub const PICTURE_WIDTH: u32 = 250;

/// Label of the (inert) add-to-bag control.
pub const ADD_TO_BAG_LABEL: &str = "Add to bag";

/// Build the card for one product.
pub fn render_product_card(product: &Product) -> VNode {
    let picture = el("div").class("product-picture").child(
        el("img")
            .attr("src", product.image())
            .attr("loading", "lazy")
            .attr("alt", product.alt_text())
            .attr("width", PICTURE_WIDTH.to_string()),
    );

    let info = el("div")
        .class("product-info")
        .child(el("h5").class("categories").text(product.category()))
        .child(el("h4").class("title").text(product.title()))
        .child(
            el("h3")
                .class("price")
                .child(el("span").text(product.price_label())),
        )
        .child(el("button").text(ADD_TO_BAG_LABEL));

    el("div").class("product").child(picture).child(info).into()
}

/// Build the cards for a product list, in input order.
pub fn render_products(products: &[Product]) -> Fragment {
    products.iter().map(render_product_card).collect()
}

/// Append one card per product to the product container in a single batch.
///
/// Returns the number of cards appended. An empty list appends nothing.
pub fn display_products(doc: &mut Document, products: &[Product]) -> Result<usize, RenderError> {
    let container = doc
        .query_selector(PRODUCTS_CONTAINER_SELECTOR)?
        .ok_or_else(|| RenderError::MissingContainer {
            selector: PRODUCTS_CONTAINER_SELECTOR.to_string(),
        })?;

    let cards = render_products(products);
    Ok(doc.append_fragment(container, cards).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_dom::Mutation;

    fn shirt() -> Product {
        Product::new("Shirt", "Apparel", 19.99, "http://x/y.png")
    }

    fn page() -> Document {
        Document::new(
            el("body").child(
                el("section")
                    .id("all-products")
                    .child(el("div").class("container")),
            ),
        )
    }

    #[test]
    fn test_card_field_mapping() {
        let card = render_product_card(&shirt());
        let card = card.as_element().unwrap();

        assert!(card.has_class("product"));
        assert_eq!(card.find_by_class("title").unwrap().text_content(), "Shirt");
        assert_eq!(
            card.find_by_class("categories").unwrap().text_content(),
            "Apparel"
        );
        assert_eq!(
            card.find_by_class("price").unwrap().text_content(),
            "US$ 19.99"
        );

        let img = card.find_by_tag("img").unwrap();
        assert!(img.get_attr("alt").unwrap().contains("Shirt"));
        assert_eq!(img.get_attr("src"), Some("http://x/y.png"));
        assert_eq!(img.get_attr("loading"), Some("lazy"));
        assert_eq!(img.get_attr("width"), Some("250"));
        assert_eq!(card.find_by_tag("button").unwrap().text_content(), "Add to bag");
    }

    #[test]
    fn test_card_markup() {
        let doc = Document::new(
            render_product_card(&shirt())
                .as_element()
                .cloned()
                .unwrap(),
        );
        assert_eq!(
            doc.outer_html(doc.root()),
            concat!(
                r#"<div class="product"><div class="product-picture">"#,
                r#"<img src="http://x/y.png" loading="lazy" alt="product: Shirt" width="250">"#,
                r#"</div><div class="product-info"><h5 class="categories">Apparel</h5>"#,
                r#"<h4 class="title">Shirt</h4><h3 class="price"><span>US$ 19.99</span></h3>"#,
                r#"<button>Add to bag</button></div></div>"#
            )
        );
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let card = render_product_card(&Product::default());
        let card = card.as_element().unwrap();
        assert_eq!(card.find_by_class("title").unwrap().text_content(), "");
        assert_eq!(card.find_by_class("price").unwrap().text_content(), "US$ ");
        assert_eq!(card.find_by_tag("img").unwrap().get_attr("src"), Some(""));
    }

    #[test]
    fn test_display_preserves_order_in_one_batch() {
        let products: Vec<Product> = (0..5)
            .map(|i| Product::new(format!("item {}", i), "c", i as f64, "i"))
            .collect();
        let snapshot = products.clone();
        let mut doc = page();

        assert_eq!(display_products(&mut doc, &products).unwrap(), 5);
        assert_eq!(products, snapshot);

        let titles: Vec<String> = doc
            .query_selector_all(".product .title")
            .unwrap()
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(titles, vec!["item 0", "item 1", "item 2", "item 3", "item 4"]);

        let container = doc.query_selector(PRODUCTS_CONTAINER_SELECTOR).unwrap().unwrap();
        assert_eq!(
            doc.mutations(),
            &[Mutation::ChildList {
                target: container,
                added: 5,
                removed: 0
            }]
        );
    }

    #[test]
    fn test_empty_list_appends_nothing() {
        let mut doc = page();
        assert_eq!(display_products(&mut doc, &[]).unwrap(), 0);
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_missing_container() {
        let mut doc = Document::new(el("body"));
        let err = display_products(&mut doc, &[shirt()]).unwrap_err();
        assert!(matches!(err, RenderError::MissingContainer { .. }));
    }
}
