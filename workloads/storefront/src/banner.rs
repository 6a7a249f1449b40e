//! Country/VAT banner.

use shop_core::BannerConfig;
use shop_dom::{el, Document, Fragment, VElement};

use crate::error::RenderError;
use crate::{BANNER_SELECTOR, HIDDEN_CLASS};

/// Banner message: `Orders to <b>{country}</b> are subject to <b>{vat}%</b> VAT`.
pub fn render_banner(banner: &BannerConfig) -> VElement {
    el("p")
        .text("Orders to ")
        .child(el("b").text(banner.country.as_str()))
        .text(" are subject to ")
        .child(el("b").text(format!("{}%", banner.vat_percent)))
        .text(" VAT")
}

/// Fill the country bar with the banner message and make it visible.
///
/// Returns `false` when the page has no country bar; that is not an error.
/// Running it again leaves the same content and visibility.
pub fn show_top_bar(doc: &mut Document, banner: &BannerConfig) -> Result<bool, RenderError> {
    let Some(bar) = doc.query_selector(BANNER_SELECTOR)? else {
        return Ok(false);
    };

    doc.replace_children(bar, Fragment::from(render_banner(banner)));
    doc.remove_class(bar, HIDDEN_CLASS);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::new(
            el("body")
                .child(el("section").class("country-bar").class("hidden"))
                .child(el("main")),
        )
    }

    #[test]
    fn test_banner_text() {
        let doc = Document::new(render_banner(&BannerConfig::default()));
        assert_eq!(
            doc.text_content(doc.root()),
            "Orders to France are subject to 20% VAT"
        );
        assert_eq!(
            doc.outer_html(doc.root()),
            "<p>Orders to <b>France</b> are subject to <b>20%</b> VAT</p>"
        );
    }

    #[test]
    fn test_shows_bar() {
        let mut doc = page();
        assert!(show_top_bar(&mut doc, &BannerConfig::default()).unwrap());

        let bar = doc.query_selector(BANNER_SELECTOR).unwrap().unwrap();
        assert!(!doc.has_class(bar, HIDDEN_CLASS));
        assert!(doc.has_class(bar, "country-bar"));
        assert_eq!(doc.child_elements(bar).len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let config = BannerConfig {
            country: "Germany".to_string(),
            vat_percent: 19,
        };
        let mut doc = page();
        show_top_bar(&mut doc, &config).unwrap();
        let bar = doc.query_selector(BANNER_SELECTOR).unwrap().unwrap();
        let first = doc.outer_html(bar);

        show_top_bar(&mut doc, &config).unwrap();
        assert_eq!(doc.outer_html(bar), first);
        assert_eq!(doc.child_elements(bar).len(), 1);
        assert_eq!(
            doc.text_content(bar),
            "Orders to Germany are subject to 19% VAT"
        );
    }

    #[test]
    fn test_missing_bar_is_noop() {
        let mut doc = Document::new(el("body").child(el("main")));
        let before = doc.to_html();
        assert!(!show_top_bar(&mut doc, &BannerConfig::default()).unwrap());
        assert_eq!(doc.to_html(), before);
        assert!(doc.mutations().is_empty());
    }
}
