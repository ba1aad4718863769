//! CLI commands

pub mod auth;
pub mod features;
pub mod init;
pub mod run;
pub mod watch;

use anyhow::Result;
use textpro_core::{LicenseService, StatusSnapshot, TextProConfig};

use crate::output::terminal::TerminalNotifier;

/// Builds the production service and runs the startup check on this thread.
///
/// One-shot commands never start the poller; the startup tick alone applies
/// the offline and expiry policies before they act.
pub(crate) fn open_service(config: &TextProConfig) -> Result<(LicenseService, StatusSnapshot)> {
    let service = LicenseService::from_config(config, TerminalNotifier)?;
    let snapshot = service.check()?;
    tracing::debug!(
        online = snapshot.is_online,
        state = %snapshot.state(),
        "startup check"
    );
    Ok((service, snapshot))
}
