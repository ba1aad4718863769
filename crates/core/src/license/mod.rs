//! License lifecycle for Text Tools Pro
//!
//! Handles activation, periodic revalidation, offline-grace tracking and
//! expiry, and derives the single "premium enabled" flag the feature gate
//! consults.

pub mod client;
pub mod clock;
pub mod engine;
pub mod machine;
pub mod notify;
pub mod poller;
pub mod probe;
pub mod response;
pub mod service;
pub mod store;
pub mod types;
pub mod validator;

pub use client::{HttpLicenseClient, LicenseApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineSettings, LicenseEngine, ValidationOutcome};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, SilentNotifier};
pub use poller::{Poller, SharedEngine};
pub use probe::{ConnectivityProbe, HttpProbe};
pub use response::LicenseResponse;
pub use service::LicenseService;
pub use store::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore, StoreError};
pub use types::{
    premium_enabled, DerivedFlags, LicenseError, LicenseInfo, LicenseRecord, LicenseState,
    LicenseStatus, StatusSnapshot,
};
