//! User-facing notices and status subscriptions

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::types::StatusSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// One-shot messages the engine surfaces to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    TemporarilyDisabled,
    ReEnabled,
    Expired,
    KeyRemoved,
    Activated,
    Deactivated,
}

impl Notice {
    pub fn level(self) -> NoticeLevel {
        match self {
            Notice::TemporarilyDisabled | Notice::Expired => NoticeLevel::Warning,
            _ => NoticeLevel::Info,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::TemporarilyDisabled => {
                "Premium features temporarily disabled due to offline duration limit."
            }
            Notice::ReEnabled => "Premium features have been re-enabled.",
            Notice::Expired => {
                "Your license has expired. Please renew to continue using premium features."
            }
            Notice::KeyRemoved => {
                "Your license key was not found and has been removed. It may have been regenerated or revoked."
            }
            Notice::Activated => "License activated successfully",
            Notice::Deactivated => "License deactivated successfully",
        }
    }
}

pub trait Notifier: Send {
    fn notify(&self, notice: Notice);
}

/// Drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Keeps notices in memory. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn count(&self, notice: Notice) -> usize {
        self.notices().iter().filter(|n| **n == notice).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut log) = self.log.lock() {
            log.push(notice);
        }
    }
}

/// Observer registry. Each subscriber gets its own channel of owned snapshots.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<Sender<StatusSnapshot>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<StatusSnapshot> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Sends `snapshot` to every live subscriber, pruning disconnected ones.
    pub fn broadcast(&mut self, snapshot: &StatusSnapshot) {
        self.senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub fn clear(&mut self) {
        self.senders.clear();
    }
}
