pub mod catalog;
pub mod checker;
pub mod config;
pub mod logfile;
pub mod notifier;
pub mod runner;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use catalog::{DeviceCatalog, DeviceSpec, MatchPolicy, Priority};
pub use notifier::{NotificationMessage, Notify, PushoverNotifier};
pub use scraper::{CartTextSource, PageScraper, ScraperConfig};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
