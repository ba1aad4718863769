//! License lifecycle engine
//!
//! Owns the license record and derived flags, applies the offline-grace
//! policy on every tick, and answers `is_premium_enabled()` without I/O.
//! All mutation goes through `&mut self`; hosts that share the engine across
//! threads wrap it in a `Mutex` (see `LicenseService`).

use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::client::LicenseApi;
use super::clock::{Clock, SystemClock};
use super::machine;
use super::notify::{Notice, Notifier, SilentNotifier, Subscribers};
use super::probe::ConnectivityProbe;
use super::response::LicenseResponse;
use super::store::{keys, KeyValueStore, KeyValueStoreExt, StoreError};
use super::types::{
    premium_enabled, DerivedFlags, LicenseError, LicenseInfo, LicenseRecord, StatusSnapshot,
};
use super::validator::is_valid_license_key;
use crate::config::TextProConfig;

const MISSING_INSTANCE: &str = "Activation failed: Missing instance data";

/// Values the engine needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub store_id: u64,
    pub product_id: u64,
    pub offline_limit: Duration,
    pub instance_prefix: String,
}

impl From<&TextProConfig> for EngineSettings {
    fn from(config: &TextProConfig) -> Self {
        Self {
            store_id: config.product.store_id,
            product_id: config.product.product_id,
            offline_limit: config.timing.offline_limit(),
            instance_prefix: config.instance.name_prefix.clone(),
        }
    }
}

/// What a validation round did to the local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Nothing stored, nothing to validate
    NoLicense,
    Valid,
    Expired,
    /// Server no longer knows the key; local state cleared
    Revoked,
    /// Any other rejection; license deactivated locally and remotely
    Invalidated { reason: String },
}

pub struct LicenseEngine {
    settings: EngineSettings,
    api: Box<dyn LicenseApi>,
    probe: Box<dyn ConnectivityProbe>,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    subscribers: Subscribers,
    record: Option<LicenseRecord>,
    flags: DerivedFlags,
    is_online: bool,
    ticks: u64,
    disposed: bool,
}

impl LicenseEngine {
    /// Creates an engine and restores record + flags from `store`.
    pub fn new(
        settings: EngineSettings,
        api: Box<dyn LicenseApi>,
        probe: Box<dyn ConnectivityProbe>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let record = store
            .get_typed::<LicenseRecord>(keys::STORED_LICENSE_INFO)
            .filter(LicenseRecord::is_complete);
        let flags = DerivedFlags {
            temporarily_disabled: store.get_or(keys::TEMPORARILY_DISABLED, false),
            expired: store.get_or(keys::EXPIRED, false),
            expiration_notification_shown: store.get_or(keys::NOTIFICATION_SHOWN, false),
        };
        debug!(
            has_license = record.is_some(),
            temporarily_disabled = flags.temporarily_disabled,
            expired = flags.expired,
            "license state restored"
        );

        Self {
            settings,
            api,
            probe,
            store,
            clock: Box::new(SystemClock),
            notifier: Box::new(SilentNotifier),
            subscribers: Subscribers::default(),
            record,
            flags,
            is_online: false,
            ticks: 0,
            disposed: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // -- Queries --

    pub fn is_premium_enabled(&self) -> bool {
        match self.license_info() {
            Some(info) => premium_enabled(
                true,
                info.valid,
                info.temporarily_disabled,
                info.expired,
            ),
            None => false,
        }
    }

    pub fn license_info(&self) -> Option<LicenseInfo> {
        self.record
            .clone()
            .map(|record| LicenseInfo::new(record, self.flags))
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            is_online: self.is_online,
            license: self.license_info(),
        }
    }

    pub fn record(&self) -> Option<&LicenseRecord> {
        self.record.as_ref()
    }

    pub fn flags(&self) -> DerivedFlags {
        self.flags
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn last_online(&self) -> Option<u64> {
        self.store.get_typed(keys::LAST_ONLINE)
    }

    pub fn offline_since(&self) -> Option<u64> {
        self.store.get_typed(keys::OFFLINE_START)
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn subscribe(&mut self) -> Receiver<StatusSnapshot> {
        self.subscribers.subscribe()
    }

    // -- Commands --

    /// One connectivity check. Online ticks revalidate the license; offline
    /// ticks apply the offline-grace policy. Background faults are logged,
    /// never returned.
    pub fn tick(&mut self) -> StatusSnapshot {
        if self.disposed {
            return self.snapshot();
        }

        let online = self.probe.probe();
        let now = self.clock.now_ms();
        self.is_online = online;
        debug!(online, tick = self.ticks, "connectivity tick");

        if online {
            if let Err(e) = self.mark_online(now) {
                warn!(error = %e, "failed to record last online timestamp");
            }
            match self.validate_inner() {
                Ok(outcome) => debug!(?outcome, "background validation"),
                Err(e) => warn!(error = %e, "background validation failed, keeping license state"),
            }
        } else if let Err(e) = self.check_offline_grace(now) {
            warn!(error = %e, "failed to apply offline grace policy");
        }

        self.ticks += 1;
        self.broadcast()
    }

    /// Revalidates the stored license against the service.
    ///
    /// A transport fault comes back as `Err` and leaves every persisted value
    /// untouched. Any answer from the service counts as being online.
    pub fn validate(&mut self) -> Result<ValidationOutcome, LicenseError> {
        let asked_service = self.record.is_some();
        let result = self.validate_inner();
        let answered = !matches!(&result, Err(e) if e.is_transport());
        if asked_service && answered && !self.disposed {
            let now = self.clock.now_ms();
            self.is_online = true;
            if let Err(e) = self.mark_online(now) {
                warn!(error = %e, "failed to record last online timestamp");
            }
        }
        self.broadcast();
        result
    }

    /// Activates `key` on this installation.
    pub fn activate(&mut self, key: &str) -> Result<LicenseInfo, LicenseError> {
        let key = key.trim();
        if !is_valid_license_key(key) {
            return Err(LicenseError::InvalidKeyFormat);
        }

        let instance_name =
            machine::instance_name(&self.settings.instance_prefix, self.clock.now_ms());
        let resp = self.api.activate(key, &instance_name)?;

        if !resp.has_activated_instance() {
            let message = resp.error.unwrap_or_else(|| MISSING_INSTANCE.to_string());
            info!(error = %message, "activation rejected");
            return Err(LicenseError::Rejected(message));
        }
        if !resp.matches_product(self.settings.store_id, self.settings.product_id) {
            let meta = resp.meta.unwrap_or_default();
            warn!(
                store_id = meta.store_id,
                product_id = meta.product_id,
                "activation response belongs to another product"
            );
            return Err(LicenseError::ProductMismatch);
        }
        let record = LicenseRecord::from_response(&resp)
            .ok_or_else(|| LicenseError::Rejected(MISSING_INSTANCE.to_string()))?;

        info!(instance_id = %record.instance_id, "license activated");
        self.record = Some(record);
        self.flags.expired = false;
        self.flags.expiration_notification_shown = false;
        self.save_record()?;
        self.save_flags()?;

        self.notifier.notify(Notice::Activated);
        let snapshot = self.broadcast();
        snapshot.license.ok_or(LicenseError::NoLicense)
    }

    /// Deactivates the stored license remotely, then clears it locally.
    ///
    /// The local clear happens whatever the remote outcome; a transport fault
    /// is still returned to the caller afterwards.
    pub fn deactivate(&mut self) -> Result<(), LicenseError> {
        let Some(record) = self.record.clone() else {
            return Err(LicenseError::NoLicense);
        };

        let result = self.deactivate_inner(&record);
        if result.is_ok() {
            self.notifier.notify(Notice::Deactivated);
        }
        self.broadcast();
        result
    }

    /// Stops all further ticks and drops subscribers.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.subscribers.clear();
        if let Err(e) = self.store.flush() {
            warn!(error = %e, "failed to flush license state");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // -- Transitions --

    fn validate_inner(&mut self) -> Result<ValidationOutcome, LicenseError> {
        let Some(record) = self.record.clone() else {
            return Ok(ValidationOutcome::NoLicense);
        };

        let resp = self.api.validate(&record.license_key, &record.instance_id)?;
        if self.disposed {
            return Ok(ValidationOutcome::NoLicense);
        }

        if resp.is_key_not_found() {
            info!("license key not found on server, removing it");
            self.clear_local()?;
            self.notifier.notify(Notice::KeyRemoved);
            return Ok(ValidationOutcome::Revoked);
        }

        if resp.is_expired() {
            return self.apply_expired(&record, &resp);
        }

        if resp.is_valid() {
            return self.apply_valid(&record, &resp);
        }

        let reason = resp
            .error
            .clone()
            .unwrap_or_else(|| "license is no longer valid".to_string());
        warn!(reason = %reason, "license rejected, deactivating");
        if let Err(e) = self.deactivate_inner(&record) {
            warn!(error = %e, "remote deactivation of rejected license failed");
        }
        Ok(ValidationOutcome::Invalidated { reason })
    }

    fn apply_valid(
        &mut self,
        record: &LicenseRecord,
        resp: &LicenseResponse,
    ) -> Result<ValidationOutcome, LicenseError> {
        let was_disabled = self.flags.temporarily_disabled;
        self.record = Some(record.refreshed(resp));
        self.flags = DerivedFlags::default();
        self.save_record()?;
        self.save_flags()?;

        if was_disabled {
            info!("premium features re-enabled");
            self.notifier.notify(Notice::ReEnabled);
        }
        Ok(ValidationOutcome::Valid)
    }

    fn apply_expired(
        &mut self,
        record: &LicenseRecord,
        resp: &LicenseResponse,
    ) -> Result<ValidationOutcome, LicenseError> {
        let first_report = !self.flags.expiration_notification_shown;
        self.record = Some(record.refreshed(resp));
        self.flags.expired = true;
        self.flags.expiration_notification_shown = true;
        self.save_record()?;
        self.save_flags()?;

        if first_report {
            info!("license expired");
            self.notifier.notify(Notice::Expired);
        }
        Ok(ValidationOutcome::Expired)
    }

    fn deactivate_inner(&mut self, record: &LicenseRecord) -> Result<(), LicenseError> {
        let remote = self
            .api
            .deactivate(&record.license_key, &record.instance_id);
        self.clear_local()?;

        match remote {
            Ok(resp) => {
                if let Some(error) = resp.error {
                    warn!(error = %error, "server did not confirm deactivation");
                }
                info!(instance_id = %record.instance_id, "license deactivated");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn check_offline_grace(&mut self, now: u64) -> Result<(), StoreError> {
        let offline_start = match self.store.get_typed::<u64>(keys::OFFLINE_START) {
            Some(ts) => ts,
            None => {
                self.store.set_typed(keys::OFFLINE_START, &now)?;
                now
            }
        };
        let baseline = self
            .store
            .get_typed::<u64>(keys::LAST_ONLINE)
            .unwrap_or(offline_start);
        let offline_for = now.saturating_sub(baseline);
        let limit = self.settings.offline_limit.as_millis() as u64;

        if self.record.is_some() && !self.flags.temporarily_disabled && offline_for > limit {
            warn!(offline_for_ms = offline_for, limit_ms = limit, "offline limit exceeded");
            self.flags.temporarily_disabled = true;
            self.save_flags()?;
            self.notifier.notify(Notice::TemporarilyDisabled);
        }
        Ok(())
    }

    fn mark_online(&mut self, now: u64) -> Result<(), StoreError> {
        self.store.set_typed(keys::LAST_ONLINE, &now)?;
        self.store.remove(keys::OFFLINE_START)
    }

    // -- Persistence --

    fn save_record(&mut self) -> Result<(), StoreError> {
        match &self.record {
            Some(record) => {
                self.store.set_typed(keys::STORED_LICENSE_INFO, record)?;
                self.store.set_typed(keys::LICENSE_KEY, &record.license_key)?;
                self.store.set_typed(keys::INSTANCE_ID, &record.instance_id)
            }
            None => {
                self.store.remove(keys::STORED_LICENSE_INFO)?;
                self.store.remove(keys::LICENSE_KEY)?;
                self.store.remove(keys::INSTANCE_ID)
            }
        }
    }

    fn save_flags(&mut self) -> Result<(), StoreError> {
        self.store
            .set_typed(keys::TEMPORARILY_DISABLED, &self.flags.temporarily_disabled)?;
        self.store.set_typed(keys::EXPIRED, &self.flags.expired)?;
        self.store.set_typed(
            keys::NOTIFICATION_SHOWN,
            &self.flags.expiration_notification_shown,
        )
    }

    fn clear_local(&mut self) -> Result<(), StoreError> {
        self.record = None;
        self.flags = DerivedFlags::default();
        self.save_record()?;
        self.save_flags()
    }

    fn broadcast(&mut self) -> StatusSnapshot {
        let snapshot = self.snapshot();
        if !self.disposed {
            self.subscribers.broadcast(&snapshot);
        }
        snapshot
    }
}
