//! Wire format of the licensing service (activate / validate / deactivate)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::types::LicenseStatus;

/// Error text the service returns for a key it no longer knows about.
pub const KEY_NOT_FOUND: &str = "license_key not found.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub license_key: Option<LicenseKeyData>,
    #[serde(default)]
    pub instance: Option<InstanceData>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseKeyData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LicenseStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub activation_limit: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activation_usage: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variant_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variant_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_email: String,
}

/// Reads `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LicenseResponse {
    /// Decodes a response body.
    ///
    /// When the typed decode fails but the body still carries an `error`
    /// string, the top-level flags and that error are kept so a structured
    /// rejection is never mistaken for a transport fault.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(resp) => Ok(resp),
            Err(e) => {
                let Some(error) = value.get("error").and_then(Value::as_str) else {
                    return Err(e);
                };
                tracing::debug!(error = %e, "partially decoded license response");
                let flag = |name: &str| value.get(name).and_then(Value::as_bool);
                Ok(Self {
                    activated: flag("activated"),
                    valid: flag("valid"),
                    deactivated: flag("deactivated"),
                    error: Some(error.to_string()),
                    ..Default::default()
                })
            }
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        self.error.as_deref() == Some(KEY_NOT_FOUND)
    }

    pub fn is_expired(&self) -> bool {
        self.license_key
            .as_ref()
            .is_some_and(|k| k.status == LicenseStatus::Expired)
    }

    pub fn is_valid(&self) -> bool {
        self.valid == Some(true)
    }

    /// True when the server created an instance and returned its id.
    pub fn has_activated_instance(&self) -> bool {
        self.activated == Some(true) && self.instance.as_ref().is_some_and(|i| !i.id.is_empty())
    }

    /// True when the response belongs to the given store and product.
    pub fn matches_product(&self, store_id: u64, product_id: u64) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|m| m.store_id == store_id && m.product_id == product_id)
    }
}
