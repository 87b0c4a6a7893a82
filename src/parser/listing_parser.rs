// Product-page HTML parsing: availability, title and price fallbacks
use crate::model::{Extraction, ListingDetails};
use scraper::{Html, Selector};

/// Ordered price probes, covering the page layouts seen across product
/// categories. First probe that yields a parseable number wins; the rest
/// are not consulted.
const PRICE_SELECTORS: &[&str] = &[
    "span.a-price-whole",
    "span.a-offscreen",
    "span.a-price",
    "span#priceblock_ourprice",
    "span#priceblock_dealprice",
    "span.a-color-price",
    "span.a-text-price",
];

pub struct ListingParser;

impl ListingParser {
    pub fn new() -> Self {
        Self
    }

    /// Reads one parsed document. The availability check runs first and
    /// short-circuits everything else, price markup included.
    pub fn extract(&self, document: &Html) -> Extraction {
        if self.is_unavailable(document) {
            return Extraction::Unavailable;
        }

        let name = self.extract_name(document);
        match self.extract_price(document) {
            Some(price) => Extraction::Listed(ListingDetails { name, price }),
            None => Extraction::FieldNotFound("price"),
        }
    }

    fn is_unavailable(&self, document: &Html) -> bool {
        let availability = Selector::parse("div#availability").unwrap();
        if document
            .select(&availability)
            .next()
            .is_some_and(|node| text_of(&node).contains("Currently unavailable"))
        {
            return true;
        }

        let out_of_stock = Selector::parse("span.a-color-price").unwrap();
        document
            .select(&out_of_stock)
            .next()
            .is_some_and(|node| text_of(&node).contains("Out of Stock"))
    }

    fn extract_name(&self, document: &Html) -> Option<String> {
        let title = Selector::parse("span#productTitle").unwrap();
        let name = text_of(&document.select(&title).next()?);
        (!name.is_empty()).then_some(name)
    }

    fn extract_price(&self, document: &Html) -> Option<f64> {
        for selector_text in PRICE_SELECTORS {
            let selector = Selector::parse(selector_text).unwrap();
            let Some(node) = document.select(&selector).next() else {
                continue;
            };
            if let Some(price) = parse_price(&text_of(&node)) {
                return Some(price);
            }
        }
        None
    }
}

fn text_of(node: &scraper::ElementRef) -> String {
    node.text().collect::<String>().trim().to_string()
}

/// Strips everything that is not a digit or a decimal point, then parses.
/// "$1,299.00" becomes 1299.00.
fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
