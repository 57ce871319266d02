//! Consent persistence.
//!
//! Fail-closed: anything short of a well-formed record with `given` set
//! reads as "no consent".

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::StorageError;
use crate::logging::structured::LogContext;
use crate::storage::{
    load_or_clear, write_json, KeyValueStore, CONSENT_DATE_KEY, CONSENT_GIVEN_KEY,
    CONSENT_PREFERENCES_KEY,
};

use super::preferences::{ConsentCategory, ConsentPreferences, ConsentRecord};

/// Reads and writes the consent record in key-value storage.
#[derive(Clone)]
pub struct ConsentStore {
    store: Arc<dyn KeyValueStore>,
    ctx: LogContext,
}

impl ConsentStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ctx: &LogContext) -> Self {
        Self {
            store,
            ctx: ctx.with_component("consent"),
        }
    }

    /// Saved preferences, or `None` when absent or corrupt.
    pub fn load(&self) -> Option<ConsentPreferences> {
        load_or_clear(
            self.store.as_ref(),
            CONSENT_PREFERENCES_KEY,
            |_: &ConsentPreferences| Ok(()),
            &self.ctx,
        )
    }

    /// Persist `prefs` as a fresh record, replacing any previous one.
    ///
    /// The `given` flag is written last so an interrupted save never reads
    /// as consent.
    pub fn save(&self, prefs: ConsentPreferences) -> Result<ConsentRecord, StorageError> {
        let record = ConsentRecord {
            given: true,
            preferences: prefs,
            timestamp: Utc::now(),
        };

        write_json(self.store.as_ref(), CONSENT_PREFERENCES_KEY, &record.preferences)?;
        self.store.set(
            CONSENT_DATE_KEY,
            &record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        self.store.set(CONSENT_GIVEN_KEY, "true")?;

        log::info!(
            "{} CONSENT_SAVED scopes={:?}",
            self.ctx,
            record.preferences.granted_scopes()
        );
        Ok(record)
    }

    /// Remove the record. Clearing an absent record is a no-op.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CONSENT_GIVEN_KEY)?;
        self.store.remove(CONSENT_PREFERENCES_KEY)?;
        self.store.remove(CONSENT_DATE_KEY)?;
        log::info!("{} CONSENT_CLEARED", self.ctx);
        Ok(())
    }

    /// Whether the user has made any consent choice.
    pub fn is_given(&self) -> bool {
        self.store.get(CONSENT_GIVEN_KEY).as_deref() == Some("true")
    }

    pub fn has_consent(&self, category: ConsentCategory) -> bool {
        if !self.is_given() {
            return false;
        }
        self.load()
            .map(|prefs| prefs.is_granted(category))
            .unwrap_or(false)
    }

    /// The full record, when every part of it is present and valid.
    pub fn record(&self) -> Option<ConsentRecord> {
        if !self.is_given() {
            return None;
        }
        let preferences = self.load()?;
        let raw_date = self.store.get(CONSENT_DATE_KEY)?;
        let timestamp = match DateTime::parse_from_rfc3339(&raw_date) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                log::warn!(
                    "{} STORAGE_CORRUPT key={} reason={}",
                    self.ctx,
                    CONSENT_DATE_KEY,
                    e
                );
                if let Err(e) = self.store.remove(CONSENT_DATE_KEY) {
                    log::error!(
                        "{} STORAGE_CLEAR_FAILED key={} error={}",
                        self.ctx,
                        CONSENT_DATE_KEY,
                        e
                    );
                }
                return None;
            }
        };

        Some(ConsentRecord {
            given: true,
            preferences,
            timestamp,
        })
    }
}
