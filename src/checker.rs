use std::collections::BTreeSet;

use crate::catalog::DeviceCatalog;

/// Device codes whose match policy succeeded against the current scrape.
/// Always a subset of the catalog's codes.
pub type AvailabilityResult = BTreeSet<String>;

/// Classify scraped product-card texts against every catalog entry.
///
/// Existential per device: a single satisfying text marks the device
/// available. Pure and order-independent over `texts`; an empty result is a
/// normal outcome, not an error.
pub fn classify(texts: &[String], catalog: &DeviceCatalog) -> AvailabilityResult {
    catalog
        .devices()
        .iter()
        .filter(|device| texts.iter().any(|text| device.matches(text)))
        .map(|device| device.code.clone())
        .collect()
}
