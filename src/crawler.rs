use crate::fetch::Fetch;
use crate::model::CarRecord;
use crate::parser::AutoscoutParser;

use futures::future::join_all;
use rand::Rng;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};

pub fn listing_url(brand: &str, page: u32) -> String {
    format!("https://www.autoscout24.com/lst/{brand}?atype=C&desc=1&page={page}")
}

/// Walks the paginated result pages of one brand and collects a record per
/// discovered detail page. Pagination never runs past `pages_per_brand`;
/// a result page without any listings ends the brand early.
pub struct Crawler<F> {
    fetcher: F,
    parser: AutoscoutParser,
    pages_per_brand: u32,
    request_delay_ms: u64,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, pages_per_brand: u32, request_delay_ms: u64) -> Self {
        Self {
            fetcher,
            parser: AutoscoutParser::new(),
            pages_per_brand,
            request_delay_ms,
        }
    }

    pub async fn crawl_brand(&self, brand: &str) -> Vec<CarRecord> {
        let mut records = Vec::new();

        for page in 1..=self.pages_per_brand {
            let url = listing_url(brand, page);
            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Skipping page {page} of {brand}: {e}");
                    self.pause().await;
                    continue;
                }
            };

            let links = self.parser.extract_links(&html, &url);
            if links.is_empty() {
                info!("No listings on page {page} of {brand}, stopping.");
                break;
            }

            let fetches = links.iter().map(|link| self.fetch_detail(link));
            records.extend(join_all(fetches).await.into_iter().flatten());

            info!("Page {page} of {brand}: {} listings.", links.len());
            self.pause().await;
        }

        records
    }

    async fn fetch_detail(&self, url: &str) -> Option<CarRecord> {
        match self.fetcher.fetch(url).await {
            Ok(html) => Some(self.parser.extract_record(url, &html)),
            Err(e) => {
                warn!("Skipping detail page {url}: {e}");
                None
            }
        }
    }

    async fn pause(&self) {
        if self.request_delay_ms == 0 {
            return;
        }
        // Jitter the delay so page requests do not arrive on a fixed beat.
        let jitter = rand::rng().random_range(0..=self.request_delay_ms / 2);
        sleep(Duration::from_millis(self.request_delay_ms + jitter)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScrapeError, UNKNOWN};
    use std::sync::Mutex;

    /// Serves a canned result page (one listing each) until `pages_with_items`
    /// is exhausted, then empty pages; records every fetched URL.
    struct StubFetcher {
        pages_with_items: u32,
        fetched: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages_with_items: u32) -> Self {
            Self {
                pages_with_items,
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn listing_fetches(&self) -> usize {
            self.fetched
                .lock()
                .unwrap()
                .iter()
                .filter(|url| url.contains("atype=C"))
                .count()
        }
    }

    #[async_trait::async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.fetched.lock().unwrap().push(url.to_string());

            if let Some(page) = url.split("page=").nth(1) {
                let page: u32 = page.parse().unwrap();
                if page <= self.pages_with_items {
                    return Ok(format!(
                        r#"<div class="ListItem_wrapper__x"><a href="/offers/item-{page}">car</a></div>"#
                    ));
                }
                return Ok("<html></html>".to_string());
            }

            // Detail page; content is irrelevant for these tests.
            Ok("<html></html>".to_string())
        }
    }

    #[tokio::test]
    async fn pagination_halts_exactly_at_the_page_cap() {
        let crawler = Crawler::new(StubFetcher::new(u32::MAX), 5, 0);

        let records = crawler.crawl_brand("bmw").await;

        assert_eq!(crawler.fetcher.listing_fetches(), 5);
        assert_eq!(records.len(), 5);
    }

    #[tokio::test]
    async fn empty_result_page_stops_the_brand_early() {
        let crawler = Crawler::new(StubFetcher::new(2), 10, 0);

        let records = crawler.crawl_brand("audi").await;

        // Pages 1 and 2 have listings; page 3 is empty and ends the walk.
        assert_eq!(crawler.fetcher.listing_fetches(), 3);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.brand == UNKNOWN));
    }

    #[test]
    fn listing_url_carries_brand_and_page() {
        assert_eq!(
            listing_url("alfa-romeo", 7),
            "https://www.autoscout24.com/lst/alfa-romeo?atype=C&desc=1&page=7"
        );
    }
}
