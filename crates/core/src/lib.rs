//! Text Tools Pro core
//!
//! This crate provides the license-gated core of Text Tools Pro:
//! - License lifecycle engine (activate, revalidate, offline grace, expiry)
//! - Licensing service client and connectivity probe
//! - Durable key/value license state
//! - Feature gate and the text features behind it

pub mod config;
pub mod features;
pub mod license;

pub use config::{Environment, TextProConfig};
pub use features::{execute, FeatureResult, FeatureTier, StringBuffer, TextBuffer};
pub use license::{
    LicenseEngine, LicenseError, LicenseInfo, LicenseService, LicenseState, Notice,
    StatusSnapshot,
};

/// Text Tools Pro version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
