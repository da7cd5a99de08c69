// AutoScout24-specific HTML parsing.
//
// Detail pages are queried positionally: the marketplace markup carries
// obfuscated, build-dependent class names, so apart from a few stable
// section ids everything is addressed by element position. A field whose
// node is absent or empty yields the sentinel default, never an error.
use crate::model::{CarRecord, UNKNOWN};

use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;

pub struct AutoscoutParser;

impl AutoscoutParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the detail-page links of all listing items on a result
    /// page, resolved against the page URL. Duplicates within one page are
    /// dropped.
    pub fn extract_links(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let item_selector = Selector::parse(r#"div[class*="ListItem_wrapper"]"#).unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();

        let base = Url::parse(page_url).ok();
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for item in document.select(&item_selector) {
            let Some(anchor) = item.select(&link_selector).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let resolved = match &base {
                Some(base) => match base.join(href) {
                    Ok(url) => url.to_string(),
                    Err(_) => continue,
                },
                None => href.to_string(),
            };

            if seen.insert(resolved.clone()) {
                links.push(resolved);
            }
        }

        links
    }

    /// Extracts one listing record from a detail page. Every configured
    /// field is queried independently; missing markup degrades to the
    /// sentinel for that field only.
    pub fn extract_record(&self, url: &str, html: &str) -> CarRecord {
        let document = Html::parse_document(html);
        let field = |css: &str| field_text(&document, css);

        CarRecord {
            url: url.to_string(),
            brand: field("h1 > div:nth-of-type(1) > span:nth-of-type(1)"),
            model: field("h1 > div:nth-of-type(1) > span:nth-of-type(2)"),
            price: field("main > div:nth-of-type(3) > div:nth-of-type(1) > div > span"),
            first_registration: field(
                "main > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(3) > div:nth-of-type(4)",
            ),
            mileage: field("main > div:nth-of-type(1) > div:nth-of-type(4)"),
            fuel_type: field("main > div:nth-of-type(4) > div:nth-of-type(4)"),
            color: field("#color-section dl > dd:nth-of-type(1)"),
            gearbox: field("#technical-details-section dl > dd:nth-of-type(2)"),
            power: field("#technical-details-section dl > dd:nth-of-type(1)"),
            engine_size: field("#technical-details-section dl > dd:nth-of-type(3)"),
            seller: field(
                "main > div:nth-of-type(3) > div:nth-of-type(3) > div:nth-of-type(2) > div:nth-of-type(6) > div:nth-of-type(4)",
            ),
            location: field("main > div:nth-of-type(3) > div:nth-of-type(2) > a"),
            body_type: field("#basic-details-section dl > dd:nth-of-type(1)"),
            doors: field("#basic-details-section dl > dd:nth-of-type(5)"),
            seats: field("#basic-details-section dl > dd:nth-of-type(4)"),
            drivetrain: field("#basic-details-section dl > dd:nth-of-type(3)"),
            co2_emission: field("#environment-details-section dl > dd:nth-of-type(2)"),
            emission_class: field("#environment-details-section dl > dd:nth-of-type(3)"),
            condition: field("#basic-details-section dl > dd:nth-of-type(2)"),
            upholstery: field("#color-section dl > dd:nth-of-type(4)"),
            upholstery_color: field("#color-section dl > dd:nth-of-type(3)"),
        }
    }
}

fn field_text(document: &Html, css: &str) -> String {
    Selector::parse(css)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|node| node.text().collect::<String>().trim().to_string())
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
