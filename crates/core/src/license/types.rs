//! Core types for the license lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

use super::response::LicenseResponse;
use super::store::StoreError;

/// Server-reported license key status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    #[default]
    Inactive,
    Expired,
    Disabled,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseStatus::Active => write!(f, "active"),
            LicenseStatus::Inactive => write!(f, "inactive"),
            LicenseStatus::Expired => write!(f, "expired"),
            LicenseStatus::Disabled => write!(f, "disabled"),
            LicenseStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Last known license + instance pair, as obtained from the licensing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub license_key: String,
    pub instance_id: String,
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub status: LicenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_limit: Option<u32>,
    #[serde(default)]
    pub activation_usage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
}

impl LicenseRecord {
    /// Builds a record from an activation response.
    ///
    /// Returns `None` unless both the license key and a non-empty instance id
    /// are present.
    pub fn from_response(resp: &LicenseResponse) -> Option<Self> {
        let key = resp.license_key.as_ref()?;
        let instance = resp.instance.as_ref()?;
        let meta = resp.meta.clone().unwrap_or_default();

        let record = Self {
            license_key: key.key.clone(),
            instance_id: instance.id.clone(),
            instance_name: instance.name.clone(),
            status: key.status,
            expires_at: key.expires_at.clone(),
            activation_limit: key.activation_limit,
            activation_usage: key.activation_usage,
            created_at: key.created_at.clone(),
            product_name: meta.product_name,
            customer_name: meta.customer_name,
            customer_email: meta.customer_email,
        };
        record.is_complete().then_some(record)
    }

    /// Applies a validation response on top of this record.
    ///
    /// Fields the response omits keep their previous values, so the key and
    /// instance identity never go missing after a refresh.
    pub fn refreshed(&self, resp: &LicenseResponse) -> Self {
        let mut next = self.clone();

        if let Some(key) = &resp.license_key {
            if !key.key.is_empty() {
                next.license_key = key.key.clone();
            }
            next.status = key.status;
            next.expires_at = key.expires_at.clone();
            next.activation_limit = key.activation_limit;
            next.activation_usage = key.activation_usage;
            if key.created_at.is_some() {
                next.created_at = key.created_at.clone();
            }
        }
        if let Some(instance) = &resp.instance {
            if !instance.id.is_empty() {
                next.instance_id = instance.id.clone();
            }
            if !instance.name.is_empty() {
                next.instance_name = instance.name.clone();
            }
        }
        if let Some(meta) = &resp.meta {
            next.product_name = meta.product_name.clone();
            next.customer_name = meta.customer_name.clone();
            next.customer_email = meta.customer_email.clone();
        }

        next
    }

    /// A record missing either half of its identity counts as no license.
    pub fn is_complete(&self) -> bool {
        !self.license_key.is_empty() && !self.instance_id.is_empty()
    }
}

/// Process-durable flags layered on top of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedFlags {
    pub temporarily_disabled: bool,
    pub expired: bool,
    pub expiration_notification_shown: bool,
}

/// Effective license view handed to consumers. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    #[serde(flatten)]
    pub record: LicenseRecord,
    pub valid: bool,
    pub temporarily_disabled: bool,
    pub expired: bool,
}

impl LicenseInfo {
    pub fn new(record: LicenseRecord, flags: DerivedFlags) -> Self {
        Self {
            valid: record.is_complete() && !flags.temporarily_disabled && !flags.expired,
            temporarily_disabled: flags.temporarily_disabled,
            expired: flags.expired,
            record,
        }
    }

    pub fn state(&self) -> LicenseState {
        if self.expired {
            LicenseState::Expired
        } else if self.temporarily_disabled {
            LicenseState::TemporarilyDisabled
        } else if self.valid {
            LicenseState::Active
        } else {
            LicenseState::Invalid
        }
    }
}

/// Conceptual lifecycle state, derived from the record and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseState {
    NoLicense,
    Active,
    TemporarilyDisabled,
    Expired,
    Invalid,
}

impl fmt::Display for LicenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseState::NoLicense => write!(f, "No license"),
            LicenseState::Active => write!(f, "Active"),
            LicenseState::TemporarilyDisabled => write!(f, "Temporarily disabled"),
            LicenseState::Expired => write!(f, "Expired"),
            LicenseState::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Owned status value delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_online: bool,
    pub license: Option<LicenseInfo>,
}

impl StatusSnapshot {
    pub fn state(&self) -> LicenseState {
        self.license
            .as_ref()
            .map(LicenseInfo::state)
            .unwrap_or(LicenseState::NoLicense)
    }
}

/// Premium access: a record exists, it is valid, and neither suspension flag is set.
pub fn premium_enabled(
    has_record: bool,
    valid: bool,
    temporarily_disabled: bool,
    expired: bool,
) -> bool {
    has_record && valid && !temporarily_disabled && !expired
}

#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("Invalid license key format. Expected XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX.")]
    InvalidKeyFormat,
    #[error("This license key is not valid for this product.")]
    ProductMismatch,
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("No license is activated")]
    NoLicense,
    #[error("License storage error: {0}")]
    Store(#[from] StoreError),
}

impl LicenseError {
    /// Transport faults must never be used to mutate persisted state.
    pub fn is_transport(&self) -> bool {
        matches!(self, LicenseError::Network(_))
    }
}
