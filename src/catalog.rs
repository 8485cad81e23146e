use serde::{Deserialize, Serialize};

/// Marker string Valve renders on sold-out product cards.
pub const OUT_OF_STOCK_MARKER: &str = "Out of stock";

/// Notification urgency, mapped onto Pushover's integer priority scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Emergency,
}

impl Priority {
    pub fn as_pushover(self) -> i8 {
        match self {
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Emergency => 2,
        }
    }
}

/// How a device's availability is decided from a cart button text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Available iff every term appears in a single button text.
    AllTerms { terms: Vec<String> },
    /// Available iff the display name appears and the out-of-stock marker
    /// does not. More tolerant of storefront copy changes around the
    /// purchase button itself.
    PresentNotOutOfStock,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceSpec {
    pub code: String,
    pub display_name: String,
    pub policy: MatchPolicy,
    pub priority: Priority,
    pub sound: String,
}

impl DeviceSpec {
    /// Evaluate this device's match policy against one product-card text.
    pub fn matches(&self, text: &str) -> bool {
        match &self.policy {
            MatchPolicy::AllTerms { terms } => terms.iter().all(|term| text.contains(term.as_str())),
            MatchPolicy::PresentNotOutOfStock => {
                text.contains(self.display_name.as_str()) && !text.contains(OUT_OF_STOCK_MARKER)
            }
        }
    }
}

/// Fixed table of monitored product variants, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCatalog {
    devices: Vec<DeviceSpec>,
}

impl DeviceCatalog {
    pub fn new(devices: Vec<DeviceSpec>) -> Self {
        Self { devices }
    }

    /// The certified-refurbished storefront variants.
    pub fn steam_deck() -> Self {
        fn spec(code: &str, display_name: &str, priority: Priority, sound: &str) -> DeviceSpec {
            DeviceSpec {
                code: code.to_string(),
                display_name: display_name.to_string(),
                policy: MatchPolicy::PresentNotOutOfStock,
                priority,
                sound: sound.to_string(),
            }
        }

        Self::new(vec![
            spec("lcd-256", "Steam Deck LCD 256GB", Priority::Normal, "pushover"),
            spec("lcd-512", "Steam Deck LCD 512GB", Priority::Normal, "pushover"),
            spec("oled-512", "Steam Deck 512 GB OLED", Priority::High, "cashregister"),
            spec("oled-1tb", "Steam Deck 1TB OLED", Priority::High, "cashregister"),
        ])
    }

    pub fn get(&self, code: &str) -> Option<&DeviceSpec> {
        self.devices.iter().find(|d| d.code == code)
    }

    pub fn devices(&self) -> &[DeviceSpec] {
        &self.devices
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code() {
        let catalog = DeviceCatalog::steam_deck();
        let device = catalog.get("oled-512").unwrap();
        assert_eq!(device.display_name, "Steam Deck 512 GB OLED");
        assert_eq!(device.priority, Priority::High);
    }

    #[test]
    fn test_unknown_code() {
        let catalog = DeviceCatalog::steam_deck();
        assert!(catalog.get("oled-9tb").is_none());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let catalog = DeviceCatalog::steam_deck();
        let codes: Vec<&str> = catalog.codes().collect();
        assert_eq!(codes, vec!["lcd-256", "lcd-512", "oled-512", "oled-1tb"]);
    }

    #[test]
    fn test_shipped_catalog_uses_lenient_policy() {
        let catalog = DeviceCatalog::steam_deck();
        for device in catalog.devices() {
            assert_eq!(device.policy, MatchPolicy::PresentNotOutOfStock);
            assert!(!device.sound.is_empty());
        }
    }

    #[test]
    fn test_all_terms_policy() {
        let device = DeviceSpec {
            code: "oled-512".to_string(),
            display_name: "Steam Deck 512 GB OLED".to_string(),
            policy: MatchPolicy::AllTerms {
                terms: vec!["512 GB OLED".to_string(), "Add to cart".to_string()],
            },
            priority: Priority::High,
            sound: "cashregister".to_string(),
        };

        assert!(device.matches("Steam Deck 512 GB OLED $449.00 Add to cart"));
        // Missing the cart term excludes it, even with the model present.
        assert!(!device.matches("Steam Deck 512 GB OLED $449.00 Out of stock"));
        assert!(!device.matches("Add to cart"));
    }

    #[test]
    fn test_present_not_out_of_stock_policy() {
        let catalog = DeviceCatalog::steam_deck();
        let device = catalog.get("lcd-256").unwrap();

        assert!(device.matches("Steam Deck LCD 256GB $319.00 Add to cart"));
        assert!(!device.matches("Steam Deck LCD 256GB $319.00 Out of stock"));
        assert!(!device.matches("Steam Deck 512 GB OLED $449.00 Add to cart"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let catalog = DeviceCatalog::steam_deck();
        let device = catalog.get("lcd-256").unwrap();
        assert!(!device.matches("steam deck lcd 256gb add to cart"));
    }

    #[test]
    fn test_priority_pushover_mapping() {
        assert_eq!(Priority::Low.as_pushover(), -1);
        assert_eq!(Priority::Normal.as_pushover(), 0);
        assert_eq!(Priority::High.as_pushover(), 1);
        assert_eq!(Priority::Emergency.as_pushover(), 2);
    }

    #[test]
    fn test_policy_serialization() {
        let policy = MatchPolicy::AllTerms {
            terms: vec!["OLED".to_string()],
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("all_terms"));

        let lenient: MatchPolicy =
            serde_json::from_str(r#"{"type":"present_not_out_of_stock"}"#).unwrap();
        assert_eq!(lenient, MatchPolicy::PresentNotOutOfStock);
    }
}
