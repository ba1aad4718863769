//! License commands — activate, deactivate, status, validate

use anyhow::{Context, Result};
use colored::Colorize;
use textpro_core::license::ValidationOutcome;
use textpro_core::{LicenseService, TextProConfig};

use super::open_service;
use crate::output::terminal::{print_status, TerminalNotifier};
use crate::output::{self, json::JsonStatus};
use crate::OutputFormat;

pub fn activate(config: &TextProConfig, key: &str) -> Result<()> {
    let service = LicenseService::from_config(config, TerminalNotifier)?;

    eprint!("  Activating... ");
    match service.activate(key) {
        Ok(_) => {
            eprintln!("{}", "done".green());
            eprintln!();
            let snapshot = service.snapshot()?;
            print_status(&snapshot, service.is_premium_enabled());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "failed".red());
            Err(e).context("Activation failed")
        }
    }
}

pub fn deactivate(config: &TextProConfig) -> Result<()> {
    let service = LicenseService::from_config(config, TerminalNotifier)?;

    eprint!("  Deactivating... ");
    match service.deactivate() {
        Ok(()) => {
            eprintln!("{}", "done".green());
            Ok(())
        }
        Err(e) if e.is_transport() => {
            eprintln!("{}", "offline".yellow());
            eprintln!(
                "  License removed locally; the server could not be reached. ({})",
                e.to_string().dimmed()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "failed".red());
            Err(e.into())
        }
    }
}

pub fn status(config: &TextProConfig, format: OutputFormat) -> Result<()> {
    let (service, snapshot) = open_service(config)?;
    let premium = service.is_premium_enabled();

    match format {
        OutputFormat::Terminal => print_status(&snapshot, premium),
        OutputFormat::Json => output::json::print(&JsonStatus::new(snapshot, premium)),
    }
    Ok(())
}

pub fn validate(config: &TextProConfig) -> Result<()> {
    let service = LicenseService::from_config(config, TerminalNotifier)?;

    eprint!("  Validating... ");
    let outcome = service.validate().context("Validation failed")?;
    match &outcome {
        ValidationOutcome::NoLicense => {
            eprintln!("{}", "skipped".dimmed());
            eprintln!("  No license is activated.");
        }
        ValidationOutcome::Valid => eprintln!("{}", "valid".green()),
        ValidationOutcome::Expired => eprintln!("{}", "expired".yellow()),
        ValidationOutcome::Revoked => eprintln!("{}", "removed".red()),
        ValidationOutcome::Invalidated { reason } => {
            eprintln!("{}", "invalid".red());
            eprintln!("  {}", reason);
        }
    }
    Ok(())
}
