mod edit;
mod export;
mod rank;
mod session;
mod vote;

pub use export::{BucketExport, WheelExport, EXPORT_SCHEMA_VERSION};
pub use rank::WheelEntry;
pub use session::spawn_window_watcher;

use crate::config::WheelConfig;
use crate::types::{PhraseBucket, PhraseKey, Username, VotePhase};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The bucket set and per-user vote pointers.
///
/// Buckets live in a Vec so creation order is preserved; ranking and the
/// matcher tie-breaks iterate it directly and never depend on map order.
/// The whole struct sits behind one lock because every vote mutation has to
/// touch a bucket and the user pointer as a pair.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub(crate) buckets: Vec<PhraseBucket>,
    pub(crate) user_votes: HashMap<Username, PhraseKey>,
}

impl Ledger {
    pub(crate) fn bucket(&self, phrase: &str) -> Option<&PhraseBucket> {
        self.buckets.iter().find(|b| b.phrase == phrase)
    }

    pub(crate) fn bucket_mut(&mut self, phrase: &str) -> Option<&mut PhraseBucket> {
        self.buckets.iter_mut().find(|b| b.phrase == phrase)
    }

    /// Remove a user's active vote, returning the bucket it pointed at.
    ///
    /// The emptied bucket is kept even at zero voters; only the table
    /// editor deletes rows, so manual entries and exports stay intact.
    pub(crate) fn detach_user(&mut self, user: &str) -> Option<PhraseKey> {
        let prior = self.user_votes.remove(user)?;
        if let Some(bucket) = self.bucket_mut(&prior) {
            bucket.voters.retain(|v| v != user);
        }
        Some(prior)
    }
}

/// Voting-window state
#[derive(Debug, Clone)]
pub(crate) struct VoteSession {
    pub(crate) phase: VotePhase,
    pub(crate) deadline: Option<DateTime<Utc>>,
    pub(crate) top_n: usize,
}

/// Shared engine handle.
///
/// One instance per session, created by the host application and cloned
/// into the chat transport and the rendering layer. Cheap to clone; all
/// clones share the same ledger and session.
#[derive(Clone)]
pub struct WheelState {
    pub(crate) config: WheelConfig,
    pub(crate) ledger: Arc<RwLock<Ledger>>,
    pub(crate) session: Arc<RwLock<VoteSession>>,
}

impl WheelState {
    pub fn new(config: WheelConfig) -> Self {
        let session = VoteSession {
            phase: VotePhase::Idle,
            deadline: None,
            top_n: config.default_top_n,
        };
        Self {
            config,
            ledger: Arc::new(RwLock::new(Ledger::default())),
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }
}

impl Default for WheelState {
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_is_empty_and_idle() {
        let state = WheelState::default();
        assert_eq!(state.phase().await, VotePhase::Idle);
        assert!(state.top_n().await.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_ledger() {
        let state = WheelState::default();
        let clone = state.clone();
        state.add_phrase("shared row").await.unwrap();
        assert_eq!(clone.top_n().await.len(), 1);
    }
}
