//! HTTP client for the licensing service (activate / validate / deactivate)

use super::response::LicenseResponse;
use super::types::LicenseError;
use crate::config::EndpointsConfig;
use reqwest::StatusCode;
use serde::Serialize;

/// Remote license operations.
///
/// A structured rejection (HTTP 400/404 with a JSON body) is an `Ok` response
/// carrying `error`. Only transport or unexpected failures come back as
/// `LicenseError::Network`.
pub trait LicenseApi: Send {
    fn activate(&self, key: &str, instance_name: &str) -> Result<LicenseResponse, LicenseError>;

    fn validate(&self, key: &str, instance_id: &str) -> Result<LicenseResponse, LicenseError>;

    fn deactivate(&self, key: &str, instance_id: &str) -> Result<LicenseResponse, LicenseError>;
}

#[derive(Serialize)]
pub struct ActivateRequest<'a> {
    pub license_key: &'a str,
    pub instance_name: &'a str,
}

#[derive(Serialize)]
pub struct InstanceRequest<'a> {
    pub license_key: &'a str,
    pub instance_id: &'a str,
}

pub struct HttpLicenseClient {
    client: reqwest::blocking::Client,
    endpoints: EndpointsConfig,
}

impl HttpLicenseClient {
    pub fn new(endpoints: EndpointsConfig) -> Result<Self, LicenseError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LicenseError::Network(e.to_string()))?;
        Ok(Self { client, endpoints })
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<LicenseResponse, LicenseError> {
        let resp = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(body)
            .send()
            .map_err(|e| LicenseError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() && !is_structured_rejection(status) {
            return Err(LicenseError::Network(format!("HTTP {}", status)));
        }

        let body = resp
            .json::<serde_json::Value>()
            .map_err(|e| LicenseError::Network(e.to_string()))?;
        LicenseResponse::from_value(body).map_err(|e| LicenseError::Network(e.to_string()))
    }
}

/// Statuses whose JSON body is an application-level answer, not a fault.
pub fn is_structured_rejection(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND
}

impl LicenseApi for HttpLicenseClient {
    fn activate(&self, key: &str, instance_name: &str) -> Result<LicenseResponse, LicenseError> {
        let body = ActivateRequest {
            license_key: key,
            instance_name,
        };
        self.post(&self.endpoints.activate, &body)
    }

    fn validate(&self, key: &str, instance_id: &str) -> Result<LicenseResponse, LicenseError> {
        let body = InstanceRequest {
            license_key: key,
            instance_id,
        };
        self.post(&self.endpoints.validate, &body)
    }

    fn deactivate(&self, key: &str, instance_id: &str) -> Result<LicenseResponse, LicenseError> {
        let body = InstanceRequest {
            license_key: key,
            instance_id,
        };
        self.post(&self.endpoints.deactivate, &body)
    }
}
