use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::utils::error::{AppError, Result};

const REFURBISHED_STORE_URL: &str = "https://store.steampowered.com/sale/steamdeckrefurbished";
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub url: String,
    /// CSS selector for the cart button of each product card.
    pub cart_button_selector: String,
    /// How many element levels above the cart button the full product card
    /// sits. Coupled to the storefront markup; tune here, nowhere else.
    pub ancestor_depth: usize,
    pub user_agent: String,
    pub page_load_timeout: Duration,
    /// Grace period after the cart buttons appear, for late re-renders.
    pub settle_delay: Duration,
    pub chrome_path: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: REFURBISHED_STORE_URL.to_string(),
            cart_button_selector: "div.btn_addtocart".to_string(),
            ancestor_depth: 6,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            page_load_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            chrome_path: std::env::var("CHROME_PATH").ok(),
        }
    }
}

/// Source of raw product-card texts for one check.
#[async_trait]
pub trait CartTextSource: Send + Sync {
    async fn fetch_cart_button_texts(&self) -> Result<Vec<String>>;
}

pub struct PageScraper {
    config: ScraperConfig,
}

impl PageScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    fn launch_browser(&self) -> Result<Browser> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Scraping(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &self.config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        Browser::new(launch_options)
            .map_err(|e| AppError::Scraping(format!("Failed to launch browser: {}", e)))
    }

    fn scrape_page_content(&self) -> Result<String> {
        let browser = self.launch_browser()?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Scraping(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&self.config.user_agent, None, None)
            .map_err(|e| AppError::Scraping(format!("Failed to set user agent: {}", e)))?;

        // Collect the result first so the tab is closed on every path; the
        // browser process itself goes down with the Browser handle.
        let content = (|| -> Result<String> {
            tab.navigate_to(&self.config.url)
                .map_err(|e| AppError::Navigation(format!("{}: {}", self.config.url, e)))?;
            tab.wait_until_navigated()
                .map_err(|e| AppError::Navigation(format!("Page load failed: {}", e)))?;

            // Bounded stand-in for a network-idle wait: the page counts as
            // settled once the cart buttons are in the DOM.
            tab.wait_for_element_with_custom_timeout(
                &self.config.cart_button_selector,
                self.config.page_load_timeout,
            )
            .map_err(|_| AppError::ElementNotFound {
                selector: self.config.cart_button_selector.clone(),
            })?;

            std::thread::sleep(self.config.settle_delay);

            tab.get_content()
                .map_err(|e| AppError::Scraping(format!("Failed to get page content: {}", e)))
        })();

        let _ = tab.close(true);
        drop(browser);

        content
    }

    fn extract_card_texts(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(&self.config.cart_button_selector).map_err(|e| {
            AppError::Config(format!(
                "Invalid CSS selector '{}': {:?}",
                self.config.cart_button_selector, e
            ))
        })?;

        let texts: Vec<String> = document
            .select(&selector)
            .map(|button| product_card_text(button, self.config.ancestor_depth))
            .collect();

        if texts.is_empty() {
            return Err(AppError::ElementNotFound {
                selector: self.config.cart_button_selector.clone(),
            });
        }

        Ok(texts)
    }
}

#[async_trait]
impl CartTextSource for PageScraper {
    async fn fetch_cart_button_texts(&self) -> Result<Vec<String>> {
        tracing::info!(url = %self.config.url, "Loading storefront page");
        let html = self.scrape_page_content()?;
        let texts = self.extract_card_texts(&html)?;
        tracing::debug!(cards = texts.len(), "Extracted product card texts");
        Ok(texts)
    }
}

/// Combined text of the product card that holds `button`.
///
/// Walks up `ancestor_depth` element ancestors, stopping early at the
/// document edge, then collects and whitespace-normalizes the subtree text.
fn product_card_text(button: ElementRef<'_>, ancestor_depth: usize) -> String {
    let mut container = button;
    for ancestor in button.ancestors().take(ancestor_depth) {
        match ElementRef::wrap(ancestor) {
            Some(element) if element.value().name() != "html" => container = element,
            _ => break,
        }
    }

    let text = container.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
