//! Watch command — run the license service and report status changes

use anyhow::Result;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;
use textpro_core::{LicenseService, LicenseState, StatusSnapshot, TextProConfig};

use crate::output::terminal::{format_status_line, TerminalNotifier};

pub fn run(config: &TextProConfig, interval_ms: Option<u64>) -> Result<()> {
    let mut config = config.clone();
    if let Some(ms) = interval_ms {
        config.timing.tick_interval_ms = ms;
    }

    eprintln!(
        "{}",
        format!("  textpro v{} — license watch", textpro_core::VERSION).bold()
    );
    eprintln!();

    let mut service = LicenseService::from_config(&config, TerminalNotifier)?;
    let rx = service.subscribe()?;

    // ── Startup check + polling ────────────────────────────────
    let startup = service.initialize()?;
    eprintln!(
        "{}",
        format_status_line(&startup, service.is_premium_enabled())
    );
    eprintln!();
    eprintln!("  {}", "Watching license status... (Ctrl-C to stop)".dimmed());

    // ── Ctrl-C handler ─────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    // ── Event loop ─────────────────────────────────────────────
    let mut last = Shown::from(&startup);
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(snapshot) => {
                let shown = Shown::from(&snapshot);
                if shown != last {
                    let premium = service.is_premium_enabled();
                    eprintln!("{}", format_status_line(&snapshot, premium));
                    last = shown;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    service.dispose();
    eprintln!();
    eprintln!("  {}", "Stopped watching.".bold());
    Ok(())
}

/// The part of a snapshot worth a new status line.
#[derive(Debug, PartialEq, Eq)]
struct Shown {
    online: bool,
    state: LicenseState,
}

impl From<&StatusSnapshot> for Shown {
    fn from(snapshot: &StatusSnapshot) -> Self {
        Self {
            online: snapshot.is_online,
            state: snapshot.state(),
        }
    }
}
