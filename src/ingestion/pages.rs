//! Documentation page scraping
//!
//! Pages are fetched with a timeout, reduced to visible text, and truncated.
//! Every failure is reported per URL; nothing here aborts a knowledge build.

use reqwest::Client;
use scraper::{Html, Node, Selector};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::errors::{DeskError, ModelError, ModelResult, Result};
use crate::ingestion::corpus::{ChunkOrigin, DocCategory, SourceDocument};

const BACKEND: &str = "scraper";

/// Elements whose text never reaches the corpus
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Reduce an HTML page to single-spaced visible text of at most `max_chars` chars
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = match body {
        Some(element) => *element,
        None => document.tree.root(),
    };

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(e) if SKIPPED_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                words.extend(text.split_whitespace());
            }
        }
    }

    words.join(" ").chars().take(max_chars).collect()
}

/// Fetches documentation pages, caching each URL for the scraper's lifetime
pub struct PageScraper {
    client: Client,
    config: ScrapeConfig,
    cache: HashMap<String, String>,
}

impl PageScraper {
    /// Create a scraper with the configured timeout and User-Agent
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(DeskError::HttpError)?;

        Ok(Self {
            client,
            config,
            cache: HashMap::new(),
        })
    }

    /// Number of pages fetched so far
    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }

    /// Fetch one page and return its visible text
    pub async fn fetch(&mut self, url: &str) -> ModelResult<String> {
        if let Some(text) = self.cache.get(url) {
            debug!(url, "scrape cache hit");
            return Ok(text.clone());
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::network(BACKEND, format!("{} timed out", url))
            } else {
                ModelError::network(BACKEND, format!("{}: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::network(BACKEND, format!("{}: HTTP {}", url, status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ModelError::network(BACKEND, format!("{}: {}", url, e)))?;

        let text = extract_text(&html, self.config.max_chars);
        if text.is_empty() {
            return Err(ModelError::parse(BACKEND, format!("{}: no visible text", url)));
        }

        self.cache.insert(url.to_string(), text.clone());
        Ok(text)
    }

    /// Scrape every configured URL, skipping failures
    ///
    /// Network fetches are separated by the configured fixed delay. A URL
    /// listed under several categories yields one document, tagged with the
    /// first category it appears under.
    pub async fn scrape_all(&mut self, urls: &BTreeMap<String, Vec<String>>) -> Vec<SourceDocument> {
        let mut documents = Vec::new();
        let mut indexed: HashSet<&str> = HashSet::new();
        let mut fetched_any = false;

        for (key, category_urls) in urls {
            let category = match key.parse::<DocCategory>() {
                Ok(category) => category,
                Err(e) => {
                    warn!(category = %key, "skipping scrape targets: {}", e);
                    continue;
                }
            };

            for url in category_urls {
                if indexed.contains(url.as_str()) {
                    debug!(url = %url, category = %category, "page already indexed");
                    continue;
                }

                let cached = self.cache.contains_key(url);
                if !cached && fetched_any {
                    tokio::time::sleep(self.config.delay()).await;
                }
                if !cached {
                    fetched_any = true;
                }

                match self.fetch(url).await {
                    Ok(text) => {
                        info!(url = %url, category = %category, chars = text.len(), "scraped page");
                        indexed.insert(url.as_str());
                        documents.push(SourceDocument {
                            source: url.clone(),
                            category,
                            origin: ChunkOrigin::Scraped,
                            text,
                        });
                    }
                    Err(e) => warn!(url = %url, "skipping page: {}", e),
                }
            }
        }

        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_drops_script_and_style() {
        let html = r#"
            <html>
              <head><title>Docs</title><style>body { color: red; }</style></head>
              <body>
                <h1>Connect   Snowflake</h1>
                <script>var secret = "hidden";</script>
                <p>Enter your
                   account URL.</p>
                <noscript>Enable JavaScript</noscript>
              </body>
            </html>
        "#;
        let text = extract_text(html, 8000);
        assert_eq!(text, "Connect Snowflake Enter your account URL.");
    }

    #[test]
    fn test_extract_text_truncates_to_cap() {
        let html = format!("<body><p>{}</p></body>", "word ".repeat(100));
        let text = extract_text(&html, 20);
        assert_eq!(text.chars().count(), 20);
    }

    #[test]
    fn test_extract_text_without_body_uses_whole_document() {
        let text = extract_text("plain text only", 100);
        assert_eq!(text, "plain text only");
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = PageScraper::new(ScrapeConfig::default());
        assert!(scraper.is_ok());
        assert_eq!(scraper.unwrap().cached_pages(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_network_failure() {
        let config = ScrapeConfig {
            timeout_secs: 1,
            ..ScrapeConfig::default()
        };
        let mut scraper = PageScraper::new(config).unwrap();
        let result = scraper.fetch("http://127.0.0.1:9/docs").await;
        assert!(matches!(result, Err(ModelError::Network { .. })));
    }

    #[tokio::test]
    async fn test_scrape_all_skips_failures_and_unknown_categories() {
        let config = ScrapeConfig {
            timeout_secs: 1,
            delay_ms: 0,
            ..ScrapeConfig::default()
        };
        let mut scraper = PageScraper::new(config).unwrap();

        let mut urls = BTreeMap::new();
        urls.insert("sso".to_string(), vec!["http://127.0.0.1:9/sso".to_string()]);
        urls.insert("billing".to_string(), vec!["http://127.0.0.1:9/billing".to_string()]);

        let documents = scraper.scrape_all(&urls).await;
        assert!(documents.is_empty());
    }
}
