//! Page shell.

use shop_dom::{el, Document, VElement};

/// Title of the storefront page.
pub const PAGE_TITLE: &str = "Storefront";

/// CSS for the storefront page.
pub const PAGE_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }
.hidden { display: none; }
.site-header { background: #333; color: white; padding: 1rem 2rem; }
.site-footer { background: #333; color: white; padding: 2rem; text-align: center; margin-top: 2rem; }

/* Country bar */
.country-bar { background: #222; color: #eee; text-align: center; font-size: 0.85rem; padding: 0.5rem; }
.country-bar p { margin: 0; }

/* Products */
#all-products { max-width: 1200px; margin: 0 auto; padding: 2rem; }
#all-products .container { display: grid; grid-template-columns: repeat(auto-fill, minmax(250px, 1fr)); gap: 1.5rem; }
.product { background: white; border-radius: 8px; overflow: hidden; display: flex; flex-direction: column; }
.product-picture { display: flex; justify-content: center; padding: 1rem; }
.product-picture img { max-width: 100%; height: 250px; object-fit: contain; }
.product-info { padding: 1rem; display: flex; flex-direction: column; gap: 0.5rem; flex: 1; }
.categories { color: #888; text-transform: uppercase; margin: 0; }
.title { margin: 0; }
.price { margin: 0; color: #2a7; }
.product-info button { margin-top: auto; padding: 0.75rem; border: none; border-radius: 4px; background: #333; color: white; cursor: pointer; }
.section-error { color: #c00; padding: 1rem; background: #fee; border-radius: 4px; }
"#;

/// Build the static page: head, hidden country bar, empty product
/// container and footer.
pub fn page_shell() -> VElement {
    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(
            el("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(el("title").text(PAGE_TITLE))
        .child(el("style").text(PAGE_STYLES));

    let body = el("body")
        .child(el("section").class("country-bar").class("hidden"))
        .child(el("header").class("site-header").child(el("h1").text(PAGE_TITLE)))
        .child(
            el("main").child(
                el("section")
                    .id("all-products")
                    .child(el("h2").text("All products"))
                    .child(el("div").class("container")),
            ),
        )
        .child(
            el("footer")
                .class("site-footer")
                .child(el("p").text("Prices include VAT where applicable")),
        );

    el("html").attr("lang", "en").child(head).child(body)
}

/// A fresh document holding the page shell.
pub fn page_document() -> Document {
    Document::new(page_shell())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BANNER_SELECTOR, HIDDEN_CLASS, PRODUCTS_CONTAINER_SELECTOR, PRODUCTS_REGION_SELECTOR};

    #[test]
    fn test_shell_regions() {
        let doc = page_document();

        let bar = doc.query_selector(BANNER_SELECTOR).unwrap().unwrap();
        assert!(doc.has_class(bar, HIDDEN_CLASS));
        assert!(doc.children(bar).is_empty());

        let container = doc.query_selector(PRODUCTS_CONTAINER_SELECTOR).unwrap().unwrap();
        assert!(doc.children(container).is_empty());
        assert!(doc.query_selector(PRODUCTS_REGION_SELECTOR).unwrap().is_some());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn test_shell_html() {
        let html = page_document().to_html();
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\"><head>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<title>Storefront</title>"));
        assert!(html.contains(".hidden { display: none; }"));
        assert!(html.contains("<section class=\"country-bar hidden\"></section>"));
        assert!(html.contains("<section id=\"all-products\"><h2>All products</h2><div class=\"container\"></div></section>"));
    }
}
