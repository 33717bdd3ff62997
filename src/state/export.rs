//! Snapshot export/import.
//!
//! The snapshot is a complete, lossless picture of the ledger: buckets,
//! per-bucket voter sets, manual overrides, and user→bucket pointers, so a
//! re-import restores re-voting eligibility, not just the counts. Import is
//! validate-then-replace: a malformed snapshot is rejected wholesale and
//! the prior ledger stays untouched.

use super::{Ledger, WheelState};
use crate::error::{WheelError, WheelResult};
use crate::normalize::{normalize_phrase, normalize_username};
use crate::types::{PhraseBucket, PhraseKey, Username};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Schema version for snapshot format compatibility
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketExport {
    pub phrase: PhraseKey,
    /// Displayed count at export time (redundant but human-readable)
    pub count: u32,
    pub voters: Vec<Username>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_count: Option<u32>,
}

/// A serializable snapshot of the full ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelExport {
    pub schema_version: u32,
    /// Export timestamp (RFC3339)
    pub exported_at: String,
    /// Buckets in creation order
    pub buckets: Vec<BucketExport>,
    /// user -> phrase of their current bucket
    pub user_votes: HashMap<Username, PhraseKey>,
}

impl WheelExport {
    /// Validate internal consistency before import
    pub fn validate(&self) -> WheelResult<()> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(WheelError::InvalidState(format!(
                "snapshot schema version {} is newer than supported version {}",
                self.schema_version, EXPORT_SCHEMA_VERSION
            )));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for bucket in &self.buckets {
            if bucket.phrase.is_empty() {
                return Err(WheelError::InvalidState(
                    "snapshot contains a bucket with an empty phrase".to_string(),
                ));
            }
            if !seen.insert(&bucket.phrase) {
                return Err(WheelError::InvalidState(format!(
                    "duplicate bucket phrase '{}'",
                    bucket.phrase
                )));
            }

            // phrases must already be in canonical form or every lookup
            // after import would miss them
            if bucket.phrase != normalize_phrase(&bucket.phrase) {
                return Err(WheelError::InvalidState(format!(
                    "bucket phrase '{}' is not in canonical form",
                    bucket.phrase
                )));
            }

            let derived = bucket.voters.len() as u32;
            let expected = bucket.manual_count.unwrap_or(derived);
            if bucket.count != expected {
                return Err(WheelError::InvalidState(format!(
                    "bucket '{}' count {} does not match its voters/override",
                    bucket.phrase, bucket.count
                )));
            }

            // every attributed voter must point back at this bucket
            for voter in &bucket.voters {
                if self.user_votes.get(voter) != Some(&bucket.phrase) {
                    return Err(WheelError::InvalidState(format!(
                        "voter '{}' is attributed to '{}' but their vote points elsewhere",
                        voter, bucket.phrase
                    )));
                }
            }
        }

        for (user, phrase) in &self.user_votes {
            if *user != normalize_username(user) {
                return Err(WheelError::InvalidState(format!(
                    "username '{user}' is not in canonical form"
                )));
            }
            let Some(bucket) = self.buckets.iter().find(|b| b.phrase == *phrase) else {
                return Err(WheelError::InvalidState(format!(
                    "user '{user}' votes for '{phrase}' which is not in the snapshot"
                )));
            };
            if !bucket.voters.contains(user) {
                return Err(WheelError::InvalidState(format!(
                    "user '{user}' votes for '{phrase}' but is missing from its voters"
                )));
            }
        }

        Ok(())
    }
}

impl WheelState {
    /// Snapshot the current ledger
    pub async fn export_state(&self) -> WheelExport {
        let ledger = self.ledger.read().await;
        let buckets = ledger
            .buckets
            .iter()
            .map(|b| BucketExport {
                phrase: b.phrase.clone(),
                count: b.count(),
                voters: b.voters.clone(),
                manual_count: b.manual_count,
            })
            .collect();

        WheelExport {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            buckets,
            user_votes: ledger.user_votes.clone(),
        }
    }

    /// Replace the ledger with a snapshot, atomically.
    ///
    /// Rejects with `InvalidState` (leaving the prior ledger intact) when
    /// the snapshot fails validation.
    pub async fn import_state(&self, snapshot: WheelExport) -> WheelResult<()> {
        snapshot.validate()?;

        let mut restored = Ledger::default();
        for export in snapshot.buckets {
            restored.buckets.push(PhraseBucket {
                phrase: export.phrase,
                voters: export.voters,
                manual_count: export.manual_count,
            });
        }
        restored.user_votes = snapshot.user_votes;

        let mut ledger = self.ledger.write().await;
        *ledger = restored;
        tracing::info!(
            buckets = ledger.buckets.len(),
            users = ledger.user_votes.len(),
            "ledger restored from snapshot"
        );
        Ok(())
    }
}
