//! JSON output formatting

use serde::{Deserialize, Serialize};
use textpro_core::features::{feature_tier, FeatureTier, FREE_FEATURES, PREMIUM_FEATURES};
use textpro_core::{LicenseInfo, LicenseState, StatusSnapshot};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonStatus {
    pub online: bool,
    pub state: LicenseState,
    pub premium_enabled: bool,
    pub license: Option<LicenseInfo>,
}

impl JsonStatus {
    pub fn new(snapshot: StatusSnapshot, premium_enabled: bool) -> Self {
        Self {
            online: snapshot.is_online,
            state: snapshot.state(),
            premium_enabled,
            license: snapshot.license,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFeature {
    pub id: String,
    pub tier: FeatureTier,
    pub available: bool,
}

pub fn features(premium_enabled: bool) -> Vec<JsonFeature> {
    FREE_FEATURES
        .iter()
        .chain(PREMIUM_FEATURES.iter())
        .filter_map(|id| {
            let tier = feature_tier(id)?;
            Some(JsonFeature {
                id: id.to_string(),
                tier,
                available: tier == FeatureTier::Free || premium_enabled,
            })
        })
        .collect()
}

pub fn print<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize JSON: {}", e),
    }
}
