//! Line-oriented text forms of the gateway's merchant settings.
//!
//! Locale map lines are `site_locale|processor_locale`; brand lines are
//! `title|PM|BRAND`. Lines with the wrong number of fields are dropped and
//! every field is trimmed, so formatting a parsed text yields its normalized
//! form rather than the original bytes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Site locale to processor UI locale.
pub type LocaleMap = BTreeMap<String, String>;

/// A payment method the buyer can pick before the redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub title: String,
    #[serde(rename = "PM")]
    pub method_code: String,
    #[serde(rename = "BRAND")]
    pub brand_code: String,
}

fn split_fields(line: &str, expected: usize) -> Option<Vec<&str>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    (parts.len() == expected).then_some(parts)
}

/// Later lines win when a site locale repeats.
pub fn parse_locale_map(text: &str) -> LocaleMap {
    text.lines()
        .filter_map(|line| split_fields(line, 2))
        .map(|parts| (parts[0].to_string(), parts[1].to_string()))
        .collect()
}

pub fn format_locale_map(map: &LocaleMap) -> String {
    map.iter()
        .map(|(site, processor)| format!("{site}|{processor}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_brands(text: &str) -> Vec<Brand> {
    text.lines()
        .filter_map(|line| split_fields(line, 3))
        .map(|parts| Brand {
            title: parts[0].to_string(),
            method_code: parts[1].to_string(),
            brand_code: parts[2].to_string(),
        })
        .collect()
}

pub fn format_brands(brands: &[Brand]) -> String {
    brands
        .iter()
        .map(|b| format!("{}|{}|{}", b.title, b.method_code, b.brand_code))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_map_trims_and_drops_malformed() {
        let text = " en | en_US \nfr|fr_FR|extra\n\nnl\nde|de_DE\r\n";
        let map = parse_locale_map(text);
        assert_eq!(map.len(), 2);
        assert_eq!(map["en"], "en_US");
        assert_eq!(map["de"], "de_DE");
        assert_eq!(format_locale_map(&map), "de|de_DE\nen|en_US");
    }

    #[test]
    fn test_locale_map_round_trip_is_stable() {
        let normalized = format_locale_map(&parse_locale_map("b|2\na|1\n"));
        assert_eq!(format_locale_map(&parse_locale_map(&normalized)), normalized);
    }

    #[test]
    fn test_brands_keep_order() {
        let text = "Visa | CreditCard | VISA\nbroken|line\nPayPal|PAYPAL|PAYPAL\n";
        let brands = parse_brands(text);
        assert_eq!(brands.len(), 2);
        assert_eq!(brands[0].title, "Visa");
        assert_eq!(brands[0].method_code, "CreditCard");
        assert_eq!(brands[1].brand_code, "PAYPAL");
        assert_eq!(
            format_brands(&brands),
            "Visa|CreditCard|VISA\nPayPal|PAYPAL|PAYPAL"
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_locale_map("").is_empty());
        assert!(parse_brands("\n\n").is_empty());
        assert_eq!(format_brands(&[]), "");
    }

    #[test]
    fn test_brand_serde_names() {
        let brand = Brand {
            title: "Visa".to_string(),
            method_code: "CreditCard".to_string(),
            brand_code: "VISA".to_string(),
        };
        let json = serde_json::to_value(&brand).unwrap();
        assert_eq!(json["PM"], "CreditCard");
        assert_eq!(json["BRAND"], "VISA");
    }
}
