use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use crate::notifier::PushoverCredentials;

pub const PUSHOVER_USER_ENV: &str = "PUSHOVER_USER_KEY";
pub const PUSHOVER_TOKEN_ENV: &str = "PUSHOVER_API_TOKEN";

/// Check the refurbished Steam Deck storefront once and push an alert when
/// the watched variant is purchasable.
#[derive(Parser, Debug)]
#[command(name = "deck-watcher", version, about)]
pub struct Cli {
    /// Device code to monitor (see --list-devices).
    #[arg(long, default_value = "oled-512")]
    pub device: String,

    /// Pushover user key; overrides the PUSHOVER_USER_KEY variable.
    #[arg(long)]
    pub pushover_user: Option<String>,

    /// Pushover API token; overrides the PUSHOVER_API_TOKEN variable.
    #[arg(long)]
    pub pushover_token: Option<String>,

    /// Also send a heartbeat notification when nothing is in stock.
    #[arg(long)]
    pub notify_success: bool,

    /// Print the device catalog and exit without checking.
    #[arg(long)]
    pub list_devices: bool,

    /// Storefront URL to check.
    #[arg(long, default_value = "https://store.steampowered.com/sale/steamdeckrefurbished")]
    pub url: String,

    /// Directory for the append-only check logs.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Cli {
    /// CLI overrides win over the environment. A partial pair can never
    /// authenticate, so it disables delivery like a missing one.
    pub fn pushover_credentials(&self) -> Option<PushoverCredentials> {
        resolve_credentials(
            self.pushover_user.clone(),
            self.pushover_token.clone(),
            |name| std::env::var(name).ok(),
        )
    }
}

fn resolve_credentials(
    cli_user: Option<String>,
    cli_token: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<PushoverCredentials> {
    let user_key = cli_user.or_else(|| env(PUSHOVER_USER_ENV));
    let api_token = cli_token.or_else(|| env(PUSHOVER_TOKEN_ENV));

    match (user_key, api_token) {
        (Some(user_key), Some(api_token)) => Some(PushoverCredentials { user_key, api_token }),
        (None, None) => None,
        _ => {
            warn!("Only one of Pushover user key / API token is set; notifications disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["deck-watcher"]);
        assert_eq!(cli.device, "oled-512");
        assert!(!cli.notify_success);
        assert!(!cli.list_devices);
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
        assert!(cli.url.contains("steamdeckrefurbished"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "deck-watcher",
            "--device",
            "lcd-256",
            "--notify-success",
            "--log-dir",
            "/tmp/deck-logs",
        ]);
        assert_eq!(cli.device, "lcd-256");
        assert!(cli.notify_success);
        assert_eq!(cli.log_dir, PathBuf::from("/tmp/deck-logs"));
    }

    #[test]
    fn test_credentials_from_cli() {
        let creds = resolve_credentials(
            Some("u-cli".to_string()),
            Some("a-cli".to_string()),
            no_env,
        )
        .unwrap();
        assert_eq!(creds.user_key, "u-cli");
        assert_eq!(creds.api_token, "a-cli");
    }

    #[test]
    fn test_cli_overrides_environment() {
        let creds = resolve_credentials(Some("u-cli".to_string()), None, |name| {
            match name {
                PUSHOVER_USER_ENV => Some("u-env".to_string()),
                PUSHOVER_TOKEN_ENV => Some("a-env".to_string()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(creds.user_key, "u-cli");
        assert_eq!(creds.api_token, "a-env");
    }

    #[test]
    fn test_absent_credentials_disable_delivery() {
        assert!(resolve_credentials(None, None, no_env).is_none());
    }

    #[test]
    fn test_partial_credentials_disable_delivery() {
        let creds = resolve_credentials(Some("u-cli".to_string()), None, no_env);
        assert!(creds.is_none());

        let creds = resolve_credentials(None, Some("a-cli".to_string()), no_env);
        assert!(creds.is_none());
    }
}
