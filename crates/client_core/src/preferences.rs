//! Durable preference snapshot backed by a single named record.

use std::sync::Arc;

use shared::domain::{PreferenceInput, PreferenceUpdate};
use storage::KeyValueStore;
use tracing::{debug, warn};

use crate::error::PreferenceStoreError;

pub const PREFERENCES_STORAGE_KEY: &str = "songFormData";

#[derive(Clone)]
pub struct PreferenceStore {
    records: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(records: Arc<dyn KeyValueStore>) -> Self {
        Self { records }
    }

    /// Reads the saved snapshot, surfacing storage and decode failures.
    ///
    /// A missing record is not an error and yields the defaults. Keys absent from
    /// the record are backfilled from the defaults, unknown keys are ignored.
    pub async fn try_load(&self) -> Result<PreferenceInput, PreferenceStoreError> {
        let Some(raw) = self.records.get(PREFERENCES_STORAGE_KEY).await? else {
            return Ok(PreferenceInput::default());
        };
        serde_json::from_str(&raw).map_err(PreferenceStoreError::Corrupt)
    }

    /// Never fails: anything unreadable falls back to the defaults.
    pub async fn load(&self) -> PreferenceInput {
        match self.try_load().await {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!(
                    key = PREFERENCES_STORAGE_KEY,
                    "failed to load saved preferences, using defaults: {err}"
                );
                PreferenceInput::default()
            }
        }
    }

    pub fn update(current: &PreferenceInput, update: PreferenceUpdate) -> PreferenceInput {
        current.with_update(update)
    }

    pub async fn save(&self, snapshot: &PreferenceInput) -> Result<(), PreferenceStoreError> {
        let raw = serde_json::to_string(snapshot).map_err(PreferenceStoreError::Encode)?;
        self.records.put(PREFERENCES_STORAGE_KEY, &raw).await?;
        debug!(key = PREFERENCES_STORAGE_KEY, "saved preferences");
        Ok(())
    }

    /// Erases the saved record and hands back the defaults to show in the form.
    pub async fn clear(&self) -> Result<PreferenceInput, PreferenceStoreError> {
        self.records.remove(PREFERENCES_STORAGE_KEY).await?;
        debug!(key = PREFERENCES_STORAGE_KEY, "cleared saved preferences");
        Ok(PreferenceInput::default())
    }
}

#[cfg(test)]
#[path = "tests/preferences_tests.rs"]
mod tests;
