use clap::Parser;
use tracing::{error, info};

use deck_watcher::catalog::DeviceCatalog;
use deck_watcher::config::Cli;
use deck_watcher::logfile::RunLog;
use deck_watcher::notifier::PushoverNotifier;
use deck_watcher::runner::{self, RunOptions};
use deck_watcher::scraper::{PageScraper, ScraperConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deck_watcher=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let catalog = DeviceCatalog::steam_deck();

    if cli.list_devices {
        print_catalog(&catalog);
        return Ok(());
    }

    let notifier = PushoverNotifier::new(cli.pushover_credentials());
    let scraper = PageScraper::new(ScraperConfig {
        url: cli.url.clone(),
        ..ScraperConfig::default()
    });
    let log = RunLog::new(&cli.log_dir);
    let options = RunOptions {
        device: cli.device.clone(),
        notify_success: cli.notify_success,
        url: cli.url.clone(),
    };

    match runner::run(&options, &catalog, &scraper, &notifier, &log).await {
        Ok(()) => {
            info!("Stock check complete");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "Stock check failed");
            Err(err.into())
        }
    }
}

fn print_catalog(catalog: &DeviceCatalog) {
    println!("{:<10} {:<24} {:<10} {}", "CODE", "DEVICE", "PRIORITY", "SOUND");
    for device in catalog.devices() {
        println!(
            "{:<10} {:<24} {:<10} {}",
            device.code,
            device.display_name,
            format!("{:?}", device.priority).to_lowercase(),
            device.sound
        );
    }
}
