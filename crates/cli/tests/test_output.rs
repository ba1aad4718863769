//! Output formatting

use textpro_cli::output::json::{self, JsonStatus};
use textpro_cli::output::terminal::{format_notice, format_status_line, mask_key};
use textpro_core::features::FeatureTier;
use textpro_core::license::{DerivedFlags, LicenseRecord, LicenseStatus, Notice};
use textpro_core::{LicenseInfo, LicenseState, StatusSnapshot};

fn info(flags: DerivedFlags) -> LicenseInfo {
    LicenseInfo::new(
        LicenseRecord {
            license_key: "38b1460a-5104-4067-a91d-77b872934d51".into(),
            instance_id: "inst".into(),
            instance_name: "textpro-x".into(),
            status: LicenseStatus::Active,
            expires_at: None,
            activation_limit: Some(1),
            activation_usage: 1,
            created_at: None,
            product_name: String::new(),
            customer_name: String::new(),
            customer_email: String::new(),
        },
        flags,
    )
}

#[test]
fn test_json_status_reports_state_and_license() {
    let snapshot = StatusSnapshot {
        is_online: false,
        license: Some(info(DerivedFlags {
            temporarily_disabled: true,
            ..Default::default()
        })),
    };

    let value = serde_json::to_value(JsonStatus::new(snapshot, false)).unwrap();
    assert_eq!(value["online"], false);
    assert_eq!(value["state"], "temporarily_disabled");
    assert_eq!(value["premium_enabled"], false);
    assert_eq!(value["license"]["instance_id"], "inst");
    assert_eq!(value["license"]["temporarily_disabled"], true);
}

#[test]
fn test_json_status_without_license() {
    let snapshot = StatusSnapshot {
        is_online: true,
        license: None,
    };
    let status = JsonStatus::new(snapshot, false);
    assert_eq!(status.state, LicenseState::NoLicense);
    assert!(status.license.is_none());
}

#[test]
fn test_json_features_mark_premium_availability() {
    let locked = json::features(false);
    assert_eq!(locked.len(), 6);
    for f in &locked {
        assert_eq!(f.available, f.tier == FeatureTier::Free, "{}", f.id);
    }

    assert!(json::features(true).iter().all(|f| f.available));
}

#[test]
fn test_masks_all_but_last_key_segment() {
    assert_eq!(
        mask_key("38b1460a-5104-4067-a91d-77b872934d51"),
        "****-77b872934d51"
    );
    assert_eq!(mask_key("opaque"), "****");
}

#[test]
fn test_notice_lines_carry_message() {
    colored::control::set_override(false);
    assert_eq!(
        format_notice(Notice::ReEnabled),
        "  \u{2713} Premium features have been re-enabled."
    );
    assert!(format_notice(Notice::Expired).contains("Your license has expired."));

    let line = format_status_line(
        &StatusSnapshot {
            is_online: true,
            license: Some(info(DerivedFlags::default())),
        },
        true,
    );
    assert_eq!(line, "  [online] Active \u{00b7} premium on");
}
