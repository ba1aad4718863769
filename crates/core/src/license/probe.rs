//! Connectivity probe against the licensing service

use super::types::LicenseError;

/// Answers "is the licensing service reachable right now?". Never fails.
pub trait ConnectivityProbe: Send {
    fn probe(&self) -> bool;
}

pub struct HttpProbe {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> Result<Self, LicenseError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LicenseError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ConnectivityProbe for HttpProbe {
    /// Any response, whatever its status, means online.
    fn probe(&self) -> bool {
        match self.client.get(&self.url).send() {
            Ok(resp) => {
                tracing::trace!(status = %resp.status(), "ping answered");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "ping failed");
                false
            }
        }
    }
}
