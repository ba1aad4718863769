//! Activation instance naming
//!
//! Every activation occupies one slot on the license; the slot is labelled
//! with an anonymous per-machine fingerprint so users can tell installs apart
//! in the store dashboard without exposing who or where they are.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Number of fingerprint bytes kept (rendered as twice as many hex chars).
const FINGERPRINT_BYTES: usize = 8;

/// Stable anonymous fingerprint of this machine: hashed `user@host`, or the
/// config directory when neither is known.
pub fn machine_id() -> String {
    let digest = Sha256::new()
        .chain_update(machine_seed().as_bytes())
        .finalize();
    to_hex(&digest[..FINGERPRINT_BYTES])
}

/// `<prefix>-<machine id>-<epoch ms>`
pub fn instance_name(prefix: &str, now_ms: u64) -> String {
    format!("{}-{}-{}", prefix, machine_id(), now_ms)
}

fn machine_seed() -> String {
    let user = ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_default();
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default();

    if user.is_empty() && host.is_empty() {
        return dirs::config_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "textpro-unknown".to_string());
    }
    format!("{}@{}", user, host)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        })
}
