//! The persistence adapter: cache routing, trims, idempotent writes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swarmsong_core::{
    Classification, EvolutionaryDecision, PoetryRecord, ProceduralProfile,
};

use crate::error::StoreError;
use crate::keys;
use crate::kv::KvStore;
use crate::signer::{NullSigner, Signer};

/// Compact consensus summary kept under `consensus:latest` / history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    pub id: String,
    pub consensus_achieved: bool,
    pub participant_count: usize,
    pub consensus_time: f64,
    pub beauty: f64,
    pub timestamp: u64,
}

/// A poem with its quality profile and routing, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoemEntry {
    pub id: String,
    pub poem: PoetryRecord,
    pub profile: ProceduralProfile,
    pub classification: Classification,
    /// Opaque integrity token from the configured [`Signer`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veritas_signature: Option<String>,
}

/// Metadata for one emitted MIDI file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiRecordingMeta {
    pub id: String,
    pub file_name: String,
    pub byte_len: usize,
    pub compressed: bool,
    /// BLAKE3 of the uncompressed SMF bytes.
    pub hash: String,
    pub note_count: usize,
    pub duration_seconds: f64,
    pub quality: f64,
}

/// Lifecycle state of a pending suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Applied,
}

/// An evolutionary decision queued for operator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSuggestion {
    pub id: String,
    pub decision: EvolutionaryDecision,
    pub status: SuggestionStatus,
    pub approved_by: Option<String>,
    pub created_at: u64,
}

/// Writes records, enforces cache caps, publishes notifications.
///
/// Writes are idempotent under retry: every record id is derived from
/// content, and a push whose id is already marked for the key is a no-op.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn KvStore>,
    signer: Arc<dyn Signer>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_signer(store, Arc::new(NullSigner))
    }

    /// Adapter that attaches integrity tokens from `signer` to poem
    /// entries.
    pub fn with_signer(store: Arc<dyn KvStore>, signer: Arc<dyn Signer>) -> Self {
        Self { store, signer }
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Pushes a record to a capped list unless its id was already written.
    /// Returns whether a write happened.
    fn push_capped(
        &self,
        key: &str,
        cap: Option<usize>,
        id: &str,
        json: &str,
    ) -> Result<bool, StoreError> {
        let seen_key = format!("seen:{key}:{id}");
        if self.store.get(&seen_key)?.is_some() {
            log::debug!("skipping duplicate write of {id} to {key}");
            return Ok(false);
        }
        self.store.set(&seen_key, "1")?;
        self.store.list_push(key, json)?;
        if let Some(cap) = cap {
            self.store.list_trim(key, cap)?;
        }
        Ok(true)
    }

    /// Stores a consensus summary under `latest` and the rolling history.
    pub fn record_consensus(&self, summary: &ConsensusSummary) -> Result<(), StoreError> {
        let json = serde_json::to_string(summary)?;
        self.store.set(keys::CONSENSUS_LATEST, &json)?;
        self.push_capped(
            keys::CONSENSUS_HISTORY,
            Some(keys::CONSENSUS_HISTORY_CAP),
            &summary.id,
            &json,
        )?;
        Ok(())
    }

    /// Stores an accepted poem and routes the artifact by classification.
    ///
    /// Legendary records are explicitly preserved: their list is never
    /// trimmed. Rejected artifacts keep their poem entry but join no art
    /// cache.
    pub fn record_poem(&self, entry: &PoemEntry) -> Result<(), StoreError> {
        let mut entry = entry.clone();
        entry.veritas_signature = self
            .signer
            .sign(serde_json::to_string(&entry.poem)?.as_bytes());
        let json = serde_json::to_string(&entry)?;
        self.push_capped(keys::POEMS_NFT, Some(keys::POEMS_CAP), &entry.id, &json)?;

        let route = match entry.classification {
            Classification::Legendary => Some((keys::ART_LEGENDARY, None)),
            Classification::Experimental => {
                Some((keys::ART_EXPERIMENTAL, Some(keys::ART_EXPERIMENTAL_CAP)))
            }
            Classification::Common => Some((keys::ART_COMMON, Some(keys::ART_COMMON_CAP))),
            Classification::Rejected => None,
        };
        if let Some((key, cap)) = route {
            self.push_capped(key, cap, &entry.id, &json)?;
        }
        Ok(())
    }

    /// Stores metadata for an emitted MIDI file.
    pub fn record_midi(&self, meta: &MidiRecordingMeta) -> Result<(), StoreError> {
        let json = serde_json::to_string(meta)?;
        self.push_capped(
            keys::MIDI_RECORDINGS,
            Some(keys::MIDI_RECORDINGS_CAP),
            &meta.id,
            &json,
        )?;
        Ok(())
    }

    /// Appends to the bounded profile log.
    pub fn log_profile(&self, profile: &ProceduralProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        self.store.list_push(keys::PROFILE_LOG, &json)?;
        self.store
            .list_trim(keys::PROFILE_LOG, keys::PROFILE_LOG_CAP)?;
        Ok(())
    }

    /// Reads the authoritative pending-suggestion list.
    pub fn pending_suggestions(&self) -> Result<Vec<PendingSuggestion>, StoreError> {
        match self.store.get(keys::PENDING_SUGGESTIONS)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Appends a suggestion atomically and re-publishes the list.
    pub fn push_suggestion(&self, suggestion: &PendingSuggestion) -> Result<(), StoreError> {
        let suggestion = suggestion.clone();
        self.store
            .transaction(keys::PENDING_SUGGESTIONS, &mut |current| {
                let mut list: Vec<PendingSuggestion> = current
                    .as_deref()
                    .and_then(|json| serde_json::from_str(json).ok())
                    .unwrap_or_default();
                if !list.iter().any(|s| s.id == suggestion.id) {
                    list.push(suggestion.clone());
                }
                serde_json::to_string(&list).ok()
            })?;
        self.publish_suggestions()
    }

    /// Marks a suggestion applied and re-publishes the list.
    pub fn apply_suggestion(&self, id: &str, approved_by: &str) -> Result<(), StoreError> {
        let mut found = false;
        self.store
            .transaction(keys::PENDING_SUGGESTIONS, &mut |current| {
                let mut list: Vec<PendingSuggestion> = current
                    .as_deref()
                    .and_then(|json| serde_json::from_str(json).ok())
                    .unwrap_or_default();
                for s in &mut list {
                    if s.id == id {
                        s.status = SuggestionStatus::Applied;
                        s.approved_by = Some(approved_by.to_string());
                        found = true;
                    }
                }
                serde_json::to_string(&list).ok()
            })?;
        if !found {
            return Err(StoreError::UnknownSuggestion(id.to_string()));
        }
        self.publish_suggestions()
    }

    /// Removes a suggestion and re-publishes the list.
    pub fn reject_suggestion(&self, id: &str) -> Result<(), StoreError> {
        let mut found = false;
        self.store
            .transaction(keys::PENDING_SUGGESTIONS, &mut |current| {
                let mut list: Vec<PendingSuggestion> = current
                    .as_deref()
                    .and_then(|json| serde_json::from_str(json).ok())
                    .unwrap_or_default();
                let before = list.len();
                list.retain(|s| s.id != id);
                found = list.len() != before;
                serde_json::to_string(&list).ok()
            })?;
        if !found {
            return Err(StoreError::UnknownSuggestion(id.to_string()));
        }
        self.publish_suggestions()
    }

    /// Publishes the current pending-suggestion list.
    pub fn publish_suggestions(&self) -> Result<(), StoreError> {
        let list = self.pending_suggestions()?;
        let json = serde_json::to_string(&list)?;
        self.store.publish(keys::PENDING_SUGGESTIONS, &json)
    }

    /// Persists and publishes the active mode string.
    pub fn record_mode(&self, mode: &str) -> Result<(), StoreError> {
        self.store.set(keys::OPTIMIZATION_MODE, mode)?;
        self.store.publish(keys::OPTIMIZATION_MODE, mode)
    }
}
