//! Terminal output formatting

use colored::Colorize;
use textpro_core::features::{FeatureTier, FREE_FEATURES, PREMIUM_FEATURES};
use textpro_core::license::{Notice, NoticeLevel, Notifier};
use textpro_core::{FeatureResult, LicenseInfo, LicenseState, StatusSnapshot};

/// Renders engine notices as colored stderr lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(notice));
    }
}

pub fn format_notice(notice: Notice) -> String {
    match notice.level() {
        NoticeLevel::Warning => {
            format!("  {} {}", "\u{26a0}".yellow(), notice.message().yellow())
        }
        NoticeLevel::Info => format!("  {} {}", "\u{2713}".green(), notice.message()),
    }
}

pub fn format_state(state: LicenseState) -> String {
    let label = state.to_string();
    match state {
        LicenseState::Active => label.green().bold().to_string(),
        LicenseState::TemporarilyDisabled | LicenseState::Expired => {
            label.yellow().bold().to_string()
        }
        LicenseState::Invalid => label.red().bold().to_string(),
        LicenseState::NoLicense => label.dimmed().to_string(),
    }
}

/// One-line summary used by `watch` for each status change.
pub fn format_status_line(snapshot: &StatusSnapshot, premium_enabled: bool) -> String {
    let online = if snapshot.is_online {
        "online".green()
    } else {
        "offline".yellow()
    };
    let premium = if premium_enabled {
        "premium on".green()
    } else {
        "premium off".dimmed()
    };
    format!(
        "  [{}] {} \u{00b7} {}",
        online,
        format_state(snapshot.state()),
        premium
    )
}

pub fn print_status(snapshot: &StatusSnapshot, premium_enabled: bool) {
    let online = if snapshot.is_online {
        "online".green()
    } else {
        "offline".yellow()
    };
    println!("  {}: {}", "Service".bold(), online);
    println!("  {}: {}", "License".bold(), format_state(snapshot.state()));
    println!(
        "  {}: {}",
        "Premium".bold(),
        if premium_enabled {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );

    if let Some(info) = &snapshot.license {
        print_license_details(info);
    }
}

fn print_license_details(info: &LicenseInfo) {
    let record = &info.record;
    println!("  {}: {}", "Key".bold(), mask_key(&record.license_key));
    println!("  {}: {}", "Instance".bold(), record.instance_id.dimmed());
    println!("  {}: {}", "Status".bold(), record.status.to_string().cyan());

    if !record.product_name.is_empty() {
        println!("  {}: {}", "Product".bold(), record.product_name);
    }
    if !record.customer_name.is_empty() {
        println!(
            "  {}: {} <{}>",
            "Customer".bold(),
            record.customer_name,
            record.customer_email
        );
    }
    if let Some(limit) = record.activation_limit {
        println!(
            "  {}: {}/{}",
            "Activations".bold(),
            record.activation_usage,
            limit
        );
    }
    if let Some(expires) = &record.expires_at {
        println!("  {}: {}", "Expires".bold(), expires);
    }
}

/// Shows only the last key segment.
pub fn mask_key(key: &str) -> String {
    match key.rsplit_once('-') {
        Some((_, tail)) => format!("****-{}", tail),
        None => "****".to_string(),
    }
}

pub fn print_feature_result(result: &FeatureResult) {
    if result.success {
        eprintln!("  {} {}", "\u{2713}".green(), result.message);
    } else {
        eprintln!("  {} {}", "\u{2717}".red(), result.message.red());
    }
}

pub fn print_features(premium_enabled: bool) {
    for feature in FREE_FEATURES {
        println!(
            "  {} {:<16} {}",
            "\u{2713}".green(),
            feature,
            FeatureTier::Free.to_string().dimmed()
        );
    }
    for feature in PREMIUM_FEATURES {
        let mark = if premium_enabled {
            "\u{2713}".green()
        } else {
            "\u{2717}".red()
        };
        println!(
            "  {} {:<16} {}",
            mark,
            feature,
            FeatureTier::Premium.to_string().cyan()
        );
    }
    if !premium_enabled {
        println!();
        println!(
            "  Premium features need an active license. Run '{}'.",
            "textpro activate <KEY>".bold()
        );
    }
}
