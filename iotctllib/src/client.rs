//! API client seam used by command handlers.
//!
//! Commands only need `list` and `get` for each resource. [`ResourceApi`]
//! captures that, and [`SnapshotClient`] implements it over a JSON snapshot
//! of the platform's resources:
//!
//! ```json
//! { "apps": [...], "channels": [...], "devicePreferences": [...] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IotctlError;
use crate::resources::{
    App, AppListOptions, Channel, ChannelListOptions, DevicePreference, Resource,
};
use crate::Result;

/// List and fetch operations for one resource type.
pub trait ResourceApi<T> {
    /// All items visible to the caller.
    fn list(&self) -> Result<Vec<T>>;

    /// A single item by primary key.
    fn get(&self, id: &str) -> Result<T>;
}

/// Resources captured from the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub device_preferences: Vec<DevicePreference>,
}

/// [`ResourceApi`] implementation backed by a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotClient {
    snapshot: Snapshot,
}

fn find<T: Resource + Clone>(items: &[T], id: &str) -> Result<T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or_else(|| IotctlError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
}

impl SnapshotClient {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Load a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| IotctlError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Apps passing `options`.
    pub fn list_apps(&self, options: &AppListOptions) -> Vec<App> {
        self.snapshot
            .apps
            .iter()
            .filter(|app| options.matches(app))
            .cloned()
            .collect()
    }

    /// Channels passing `options`.
    pub fn list_channels(&self, options: &ChannelListOptions) -> Vec<Channel> {
        self.snapshot
            .channels
            .iter()
            .filter(|channel| options.matches(channel))
            .cloned()
            .collect()
    }
}

impl ResourceApi<App> for SnapshotClient {
    fn list(&self) -> Result<Vec<App>> {
        Ok(self.list_apps(&AppListOptions::default()))
    }

    fn get(&self, id: &str) -> Result<App> {
        find(&self.snapshot.apps, id)
    }
}

impl ResourceApi<Channel> for SnapshotClient {
    fn list(&self) -> Result<Vec<Channel>> {
        Ok(self.list_channels(&ChannelListOptions::default()))
    }

    fn get(&self, id: &str) -> Result<Channel> {
        find(&self.snapshot.channels, id)
    }
}

impl ResourceApi<DevicePreference> for SnapshotClient {
    fn list(&self) -> Result<Vec<DevicePreference>> {
        Ok(self.snapshot.device_preferences.clone())
    }

    fn get(&self, id: &str) -> Result<DevicePreference> {
        find(&self.snapshot.device_preferences, id)
    }
}
