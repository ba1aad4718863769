//! Host-facing license service
//!
//! Wraps the engine in a single-writer `Mutex` so the poller thread and user
//! commands never interleave, and owns the poller's lifecycle.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use super::client::HttpLicenseClient;
use super::engine::{EngineSettings, LicenseEngine, ValidationOutcome};
use super::notify::Notifier;
use super::poller::{Poller, SharedEngine};
use super::probe::HttpProbe;
use super::store::{FileStore, KeyValueStore};
use super::types::{LicenseError, LicenseInfo, StatusSnapshot};
use crate::config::TextProConfig;
use crate::features::{self, FeatureResult, TextBuffer};

pub struct LicenseService {
    engine: SharedEngine,
    interval: Duration,
    poller: Option<Poller>,
}

impl LicenseService {
    pub fn new(engine: LicenseEngine, interval: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            interval,
            poller: None,
        }
    }

    /// Builds the production wiring: HTTP client + probe and the file store
    /// named by `config` (or the default state file).
    pub fn from_config(config: &TextProConfig, notifier: impl Notifier + 'static) -> Result<Self> {
        let store_path = match &config.storage.path {
            Some(p) => p.clone(),
            None => FileStore::default_path().context("Could not determine config directory")?,
        };
        let store = FileStore::open(&store_path)
            .with_context(|| format!("open license state {}", store_path.display()))?;
        let api = HttpLicenseClient::new(config.endpoints.clone())?;
        let probe = HttpProbe::new(config.endpoints.ping.clone())?;

        let engine = LicenseEngine::new(
            EngineSettings::from(config),
            Box::new(api),
            Box::new(probe),
            Box::new(store) as Box<dyn KeyValueStore>,
        )
        .with_notifier(notifier);

        Ok(Self::new(engine, config.timing.tick_interval()))
    }

    /// Runs the startup check, then starts periodic ticks.
    pub fn initialize(&mut self) -> Result<StatusSnapshot> {
        let snapshot = self.lock()?.tick();
        if self.poller.is_none() {
            let poller = Poller::start(Arc::clone(&self.engine), self.interval)
                .context("spawn license poller")?;
            self.poller = Some(poller);
        }
        info!(interval_ms = self.interval.as_millis() as u64, "license polling started");
        Ok(snapshot)
    }

    /// Runs a single tick on the caller's thread, for one-shot hosts that
    /// never start the poller.
    pub fn check(&self) -> Result<StatusSnapshot> {
        Ok(self.lock()?.tick())
    }

    pub fn subscribe(&self) -> Result<Receiver<StatusSnapshot>> {
        Ok(self.lock()?.subscribe())
    }

    pub fn activate(&self, key: &str) -> Result<LicenseInfo, LicenseError> {
        self.with_engine(|engine| engine.activate(key))
    }

    pub fn deactivate(&self) -> Result<(), LicenseError> {
        self.with_engine(|engine| engine.deactivate())
    }

    pub fn validate(&self) -> Result<ValidationOutcome, LicenseError> {
        self.with_engine(|engine| engine.validate())
    }

    pub fn is_premium_enabled(&self) -> bool {
        self.lock().map(|e| e.is_premium_enabled()).unwrap_or(false)
    }

    pub fn snapshot(&self) -> Result<StatusSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn license_info(&self) -> Option<LicenseInfo> {
        self.lock().ok().and_then(|e| e.license_info())
    }

    /// Runs a feature through the gate with the current premium flag.
    pub fn execute_feature(&self, feature: &str, buffer: &mut dyn TextBuffer) -> FeatureResult {
        features::execute(feature, self.is_premium_enabled(), buffer)
    }

    pub fn engine(&self) -> SharedEngine {
        Arc::clone(&self.engine)
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Stops polling and tears the engine down.
    pub fn dispose(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        if let Ok(mut engine) = self.engine.lock() {
            engine.dispose();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LicenseEngine>> {
        self.engine
            .lock()
            .map_err(|_| anyhow::anyhow!("license engine lock poisoned"))
    }

    fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut LicenseEngine) -> Result<T, LicenseError>,
    ) -> Result<T, LicenseError> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| LicenseError::Rejected("license engine unavailable".to_string()))?;
        f(&mut engine)
    }
}

impl Drop for LicenseService {
    fn drop(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}
