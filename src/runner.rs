use tracing::{debug, error, info, warn};

use crate::catalog::{DeviceCatalog, DeviceSpec, Priority};
use crate::checker::{classify, AvailabilityResult};
use crate::logfile::RunLog;
use crate::notifier::{NotificationMessage, Notify};
use crate::scraper::CartTextSource;
use crate::utils::error::{AppError, Result};

const DEFAULT_SOUND: &str = "pushover";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub device: String,
    pub notify_success: bool,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockOutcome {
    TargetInStock,
    /// Display names of the other cataloged devices that are available.
    OthersInStock(Vec<String>),
    NoStock,
}

/// One full check: resolve device, scrape, classify, decide, notify, log.
///
/// Scrape failures trigger a best-effort error notification before the
/// original error propagates. Once classification succeeded, notification
/// failures are logged and swallowed; the run still counts as completed.
pub async fn run(
    options: &RunOptions,
    catalog: &DeviceCatalog,
    source: &dyn CartTextSource,
    notifier: &dyn Notify,
    log: &RunLog,
) -> Result<()> {
    let target = catalog.get(&options.device).ok_or_else(|| AppError::UnknownDevice {
        code: options.device.clone(),
    })?;
    info!(device = %target.code, "Starting stock check");

    let texts = match source.fetch_cart_button_texts().await {
        Ok(texts) => texts,
        Err(err) => {
            error!(error = %err, "Scrape failed");
            if let Err(notify_err) = notifier.notify(&error_message(target, &err)).await {
                warn!(error = %notify_err, "Failed to deliver error notification");
            }
            log.error(&format!("ERROR: {}", err));
            return Err(err);
        }
    };

    let available = classify(&texts, catalog);
    debug!(available = ?available, "Classified availability");

    let (outcome, messages) = decide(target, &available, catalog, options.notify_success, &options.url);

    for message in &messages {
        if let Err(err) = notifier.notify(message).await {
            warn!(title = %message.title, error = %err, "Notification delivery failed");
        }
    }

    match &outcome {
        StockOutcome::TargetInStock => {
            info!(device = %target.code, "Target device is IN STOCK");
            log.in_stock(&format!("IN STOCK: {}", target.code));
            log.check(&format!("checked {}: in stock", target.code));
        }
        StockOutcome::OthersInStock(names) => {
            info!(others = ?names, "Target not available, other devices are");
            log.check(&format!(
                "checked {}: no stock (others available: {})",
                target.code,
                names.join(", ")
            ));
        }
        StockOutcome::NoStock => {
            info!("Nothing in stock");
            log.check(&format!("checked {}: no stock", target.code));
        }
    }

    Ok(())
}

/// Branch table of the run: which outcome, and which notifications to send.
/// Pure so every arm is unit-testable without a browser.
pub fn decide(
    target: &DeviceSpec,
    available: &AvailabilityResult,
    catalog: &DeviceCatalog,
    notify_success: bool,
    url: &str,
) -> (StockOutcome, Vec<NotificationMessage>) {
    if available.contains(target.code.as_str()) {
        let message = NotificationMessage::new(
            format!("{} is IN STOCK! Grab it: {}", target.display_name, url),
            "Steam Deck IN STOCK",
            target.priority,
            target.sound.clone(),
        );
        return (StockOutcome::TargetInStock, vec![message]);
    }

    let others: Vec<String> = catalog
        .devices()
        .iter()
        .filter(|d| d.code != target.code && available.contains(d.code.as_str()))
        .map(|d| d.display_name.clone())
        .collect();

    if !others.is_empty() {
        // Always normal urgency, whichever device triggered it.
        let message = NotificationMessage::new(
            format!(
                "{} is still out, but available now: {}",
                target.display_name,
                others.join(", ")
            ),
            "Other Steam Decks available",
            Priority::Normal,
            DEFAULT_SOUND,
        );
        return (StockOutcome::OthersInStock(others), vec![message]);
    }

    let messages = if notify_success {
        vec![NotificationMessage::new(
            format!("No stock for {}. Still watching.", target.display_name),
            "Stock check complete",
            Priority::Normal,
            DEFAULT_SOUND,
        )]
    } else {
        Vec::new()
    };

    (StockOutcome::NoStock, messages)
}

fn error_message(target: &DeviceSpec, err: &AppError) -> NotificationMessage {
    NotificationMessage::new(
        format!("Stock check for {} failed: {}", target.display_name, err),
        "Stock check failed",
        Priority::High,
        "falling",
    )
}
