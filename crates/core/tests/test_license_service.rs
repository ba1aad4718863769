//! Service + poller lifecycle tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use textpro_core::features::{StringBuffer, LICENSE_REQUIRED};
use textpro_core::license::response::{InstanceData, LicenseKeyData, ResponseMeta};
use textpro_core::license::{
    ConnectivityProbe, EngineSettings, LicenseApi, LicenseEngine, LicenseError, LicenseResponse,
    LicenseService, LicenseState, LicenseStatus, MemoryStore, Poller,
};

const KEY: &str = "38b1460a-5104-4067-a91d-77b872934d51";

/// Service that accepts every key for the configured product.
#[derive(Clone, Default)]
struct AcceptingApi {
    validations: Arc<AtomicUsize>,
}

fn accepted(activated: bool) -> LicenseResponse {
    LicenseResponse {
        activated: activated.then_some(true),
        valid: Some(true),
        license_key: Some(LicenseKeyData {
            status: LicenseStatus::Active,
            key: KEY.to_string(),
            ..Default::default()
        }),
        instance: Some(InstanceData {
            id: "inst-1".to_string(),
            name: "textpro-test".to_string(),
            created_at: None,
        }),
        meta: Some(ResponseMeta {
            store_id: 1,
            product_id: 2,
            ..Default::default()
        }),
        ..Default::default()
    }
}

impl LicenseApi for AcceptingApi {
    fn activate(&self, _key: &str, _name: &str) -> Result<LicenseResponse, LicenseError> {
        Ok(accepted(true))
    }

    fn validate(&self, _key: &str, _instance: &str) -> Result<LicenseResponse, LicenseError> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        Ok(accepted(false))
    }

    fn deactivate(&self, _key: &str, _instance: &str) -> Result<LicenseResponse, LicenseError> {
        Ok(LicenseResponse {
            deactivated: Some(true),
            ..Default::default()
        })
    }
}

struct StaticProbe(Arc<AtomicBool>);

impl ConnectivityProbe for StaticProbe {
    fn probe(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn service(interval: Duration) -> (LicenseService, AcceptingApi) {
    let api = AcceptingApi::default();
    let engine = LicenseEngine::new(
        EngineSettings {
            store_id: 1,
            product_id: 2,
            offline_limit: Duration::from_secs(30),
            instance_prefix: "textpro".to_string(),
        },
        Box::new(api.clone()),
        Box::new(StaticProbe(Arc::new(AtomicBool::new(true)))),
        Box::new(MemoryStore::new()),
    );
    (LicenseService::new(engine, interval), api)
}

#[test]
fn test_initialize_runs_startup_check_and_polls() {
    let (mut service, _api) = service(Duration::from_millis(20));
    let rx = service.subscribe().unwrap();

    let startup = service.initialize().unwrap();
    assert!(startup.is_online);
    assert!(service.is_polling());

    // Startup tick plus at least one background tick
    rx.recv_timeout(Duration::from_secs(2)).unwrap();
    rx.recv_timeout(Duration::from_secs(2)).unwrap();

    service.dispose();
    assert!(!service.is_polling());
    assert!(service.engine().lock().unwrap().is_disposed());
}

#[test]
fn test_gate_follows_license_through_service() {
    let (service, _api) = service(Duration::from_secs(60));
    let mut buffer = StringBuffer::new("abc");

    let denied = service.execute_feature("toUpperCase", &mut buffer);
    assert_eq!(denied.message, LICENSE_REQUIRED);

    service.activate(KEY).unwrap();
    assert!(service.is_premium_enabled());
    assert!(service.execute_feature("toUpperCase", &mut buffer).success);
    assert_eq!(buffer.0, "ABC");

    service.deactivate().unwrap();
    assert!(!service.is_premium_enabled());
    assert_eq!(service.snapshot().unwrap().state(), LicenseState::NoLicense);
}

#[test]
fn test_background_ticks_revalidate() {
    let (mut service, api) = service(Duration::from_millis(10));
    service.activate(KEY).unwrap();
    service.initialize().unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while api.validations.load(Ordering::SeqCst) < 3 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(api.validations.load(Ordering::SeqCst) >= 3);
    assert!(service.license_info().unwrap().valid);
}

#[test]
fn test_poller_stops_on_drop() {
    let (service, _api) = service(Duration::from_millis(5));
    let engine = service.engine();

    let poller = Poller::start(Arc::clone(&engine), Duration::from_millis(5)).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    drop(poller);

    let ticks = engine.lock().unwrap().tick_count();
    assert!(ticks > 0);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(engine.lock().unwrap().tick_count(), ticks);
}
