//! Feature gate — decides allow/deny from the premium flag and dispatches
//!
//! The gate holds no licensing logic of its own: callers pass in the boolean
//! computed by the license engine.

pub mod free;
pub mod premium;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature ids available without a license
pub const FREE_FEATURES: &[&str] = &["characterCount", "wordCount"];

/// Feature ids that require an active license
pub const PREMIUM_FEATURES: &[&str] = &[
    "toUpperCase",
    "toLowerCase",
    "base64Encode",
    "base64Decode",
];

pub const LICENSE_REQUIRED: &str = "Premium license required for this feature";
pub const UNKNOWN_FEATURE: &str = "Unknown feature";

/// The host document a feature reads from and writes to.
pub trait TextBuffer {
    fn text(&self) -> String;

    fn replace_all(&mut self, text: String) -> Result<(), FeatureError>;
}

/// Plain in-memory document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBuffer(pub String);

impl StringBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TextBuffer for StringBuffer {
    fn text(&self) -> String {
        self.0.clone()
    }

    fn replace_all(&mut self, text: String) -> Result<(), FeatureError> {
        self.0 = text;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Invalid base64 string")]
    InvalidBase64,
    #[error("Failed to write document: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureTier {
    Free,
    Premium,
}

impl fmt::Display for FeatureTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureTier::Free => write!(f, "Free"),
            FeatureTier::Premium => write!(f, "Premium"),
        }
    }
}

/// Uniform outcome of a feature request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub success: bool,
    pub message: String,
}

impl FeatureResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub fn is_premium_feature(feature: &str) -> bool {
    PREMIUM_FEATURES.contains(&feature)
}

/// Returns the tier of a known feature id.
pub fn feature_tier(feature: &str) -> Option<FeatureTier> {
    if FREE_FEATURES.contains(&feature) {
        Some(FeatureTier::Free)
    } else if is_premium_feature(feature) {
        Some(FeatureTier::Premium)
    } else {
        None
    }
}

/// Runs `feature` against `buffer` if the license allows it.
///
/// Premium features with `premium_enabled == false` fail with
/// `LICENSE_REQUIRED` and leave the buffer untouched.
pub fn execute(
    feature: &str,
    premium_enabled: bool,
    buffer: &mut dyn TextBuffer,
) -> FeatureResult {
    if is_premium_feature(feature) && !premium_enabled {
        return FeatureResult::fail(LICENSE_REQUIRED);
    }

    let outcome = match feature {
        "characterCount" => Ok(format!(
            "Character count: {}",
            free::character_count(&buffer.text())
        )),
        "wordCount" => Ok(format!("Word count: {}", free::word_count(&buffer.text()))),
        "toUpperCase" => {
            premium::to_upper_case(buffer).map(|_| "Text converted to uppercase".to_string())
        }
        "toLowerCase" => {
            premium::to_lower_case(buffer).map(|_| "Text converted to lowercase".to_string())
        }
        "base64Encode" => {
            premium::base64_encode(buffer).map(|_| "Text encoded to base64".to_string())
        }
        "base64Decode" => {
            premium::base64_decode(buffer).map(|_| "Text decoded from base64".to_string())
        }
        _ => return FeatureResult::fail(UNKNOWN_FEATURE),
    };

    match outcome {
        Ok(message) => FeatureResult::ok(message),
        Err(e) => {
            tracing::debug!(feature, error = %e, "feature failed");
            FeatureResult::fail(e.to_string())
        }
    }
}
