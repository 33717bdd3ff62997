use super::WheelState;
use crate::error::{WheelError, WheelResult};
use crate::normalize::normalize_phrase;
use crate::types::{PhraseBucket, PhraseKey, Username};

/// One wheel segment's worth of data for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEntry {
    pub phrase: PhraseKey,
    pub count: u32,
    /// Sorted for a stable "voted by" rotation
    pub voters: Vec<Username>,
}

impl WheelState {
    /// The top-N buckets as (phrase, displayed count), count descending.
    ///
    /// Ties keep creation order: the sort is stable over the
    /// creation-ordered bucket vector, never over map iteration order.
    /// Recomputed on every call; nothing is cached across mutations.
    pub async fn top_n(&self) -> Vec<(PhraseKey, u32)> {
        let limit = self.top_n_limit().await;
        self.top_n_with(limit).await
    }

    pub async fn top_n_with(&self, n: usize) -> Vec<(PhraseKey, u32)> {
        let mut ranked = self.rows().await;
        ranked.truncate(n);
        ranked
    }

    /// Every row, ranked: the full segment table
    pub async fn rows(&self) -> Vec<(PhraseKey, u32)> {
        let ledger = self.ledger.read().await;
        let mut ranked: Vec<(PhraseKey, u32)> = ledger
            .buckets
            .iter()
            .map(|b| (b.phrase.clone(), b.count()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Users currently attributed to a bucket, sorted for display
    pub async fn voters_of(&self, phrase: &str) -> WheelResult<Vec<Username>> {
        let key = normalize_phrase(phrase);
        let ledger = self.ledger.read().await;
        let bucket = ledger
            .bucket(&key)
            .ok_or_else(|| WheelError::NotFound(format!("no bucket '{key}'")))?;
        let mut voters = bucket.voters.clone();
        voters.sort();
        Ok(voters)
    }

    /// Top-N segments with their voters, ready for the spinner.
    ///
    /// Counts and voters come from a single ledger read, so each entry is
    /// internally consistent even under concurrent voting.
    pub async fn wheel_entries(&self) -> Vec<WheelEntry> {
        let limit = self.top_n_limit().await;
        let ledger = self.ledger.read().await;
        let mut ranked: Vec<&PhraseBucket> = ledger.buckets.iter().collect();
        ranked.sort_by(|a, b| b.count().cmp(&a.count()));
        ranked
            .into_iter()
            .take(limit)
            .map(|bucket| {
                let mut voters = bucket.voters.clone();
                voters.sort();
                WheelEntry {
                    phrase: bucket.phrase.clone(),
                    count: bucket.count(),
                    voters,
                }
            })
            .collect()
    }
}
