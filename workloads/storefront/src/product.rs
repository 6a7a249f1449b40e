//! Product records from the catalog API.

use serde::{Deserialize, Serialize};

/// A product as returned by the catalog endpoint.
///
/// Every field is optional: entries missing a field still parse and render
/// the field as empty. Fields the page does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Create a product with every field set.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            category: Some(category.into()),
            price: Some(price),
            image: Some(image.into()),
        }
    }

    /// Title, or empty.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Category, or empty.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    /// Image URI, or empty.
    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    /// Price label: `US$ ` followed by the number exactly as parsed, with
    /// no rounding or locale formatting.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("US$ {}", format_number(price)),
            None => "US$ ".to_string(),
        }
    }

    /// Alt text for the product picture.
    pub fn alt_text(&self) -> String {
        format!("product: {}", self.title())
    }
}

/// Shortest round-trip form of a number, as a browser prints it: plain
/// decimal for magnitudes in `[1e-6, 1e21)`, exponent form otherwise, and
/// no sign on zero.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }

    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_entry() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title(), "Fjallraven - Foldsack No. 1 Backpack");
        assert_eq!(product.category(), "men's clothing");
        assert_eq!(product.price_label(), "US$ 109.95");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let product: Product = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(product.title(), "");
        assert_eq!(product.image(), "");
        assert_eq!(product.price_label(), "US$ ");
        assert_eq!(product.alt_text(), "product: ");
    }

    #[test]
    fn test_price_label_is_not_rounded() {
        assert_eq!(Product::new("a", "b", 19.99, "c").price_label(), "US$ 19.99");
        assert_eq!(Product::new("a", "b", 55.0, "c").price_label(), "US$ 55");
        assert_eq!(Product::new("a", "b", 7.123, "c").price_label(), "US$ 7.123");
    }

    #[test]
    fn test_price_label_edge_numbers() {
        let label = |price: f64| Product::new("a", "b", price, "c").price_label();
        assert_eq!(label(-0.0), "US$ 0");
        assert_eq!(label(-5.5), "US$ -5.5");
        assert_eq!(label(1e21), "US$ 1e+21");
        assert_eq!(label(1.5e25), "US$ 1.5e+25");
        assert_eq!(label(123456789012345680000.0), "US$ 123456789012345680000");
        assert_eq!(label(0.000001), "US$ 0.000001");
        assert_eq!(label(0.0000001), "US$ 1e-7");
        assert_eq!(label(-2.5e-8), "US$ -2.5e-8");
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(serde_json::from_str::<Product>(r#"{"price": "cheap"}"#).is_err());
    }
}
