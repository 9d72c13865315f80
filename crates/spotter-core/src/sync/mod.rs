//! Change notification for the shared collections.
//!
//! Notifications only say *that* a collection changed; subscribers react by
//! refetching the whole collection. Two transports feed the same
//! [`ChangeEvent`] type: [`ChangeHub`] fans out this process's own writes,
//! and [`ChangeWatcher`] polls the record store for everyone else's.

mod hub;
mod refresh;
mod watcher;

pub use hub::{ChangeHub, Subscription};
pub use refresh::{RefreshGuard, RefreshOutcome, RefreshTicket};
pub use watcher::{
    collection_fingerprint, ChangeWatcher, DEFAULT_POLL_INTERVAL, SUBSCRIBE_DELAY,
};

use std::fmt;

use crate::store::Resource;

/// One notification channel: a collection within a sync group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub resource: Resource,
    pub sync_code: String,
}

impl ChannelKey {
    pub fn new(resource: Resource, sync_code: impl Into<String>) -> Self {
        Self {
            resource,
            sync_code: sync_code.into(),
        }
    }

    /// Channel name, e.g. `sessions_SHARED`
    pub fn name(&self) -> String {
        format!("{}_{}", self.resource.collection(), self.sync_code)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.resource.collection(), self.sync_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Something changed but the kind is unknown (detected by polling)
    Changed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub channel: ChannelKey,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(resource: Resource, sync_code: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            channel: ChannelKey::new(resource, sync_code),
            kind,
        }
    }

    pub const fn resource(&self) -> Resource {
        self.channel.resource
    }
}
