//! Manual table-edit operations.
//!
//! The rendering layer's segment table calls these directly; they bypass
//! the voting window entirely and are allowed in both phases. Manual count
//! edits set a display-only override on the bucket instead of touching its
//! voter set, so live chat attribution survives host fiddling.

use super::WheelState;
use crate::error::{WheelError, WheelResult};
use crate::matcher::find_merge_target;
use crate::normalize::normalize_phrase;
use crate::types::{PhraseBucket, PhraseKey};

impl WheelState {
    /// Override a bucket's displayed count
    pub async fn set_count(&self, phrase: &str, count: u32) -> WheelResult<()> {
        let key = normalize_phrase(phrase);
        let mut ledger = self.ledger.write().await;
        let bucket = ledger
            .bucket_mut(&key)
            .ok_or_else(|| WheelError::NotFound(format!("no bucket '{key}'")))?;
        bucket.manual_count = Some(count);
        tracing::debug!(phrase = %key, count, "manual count set");
        Ok(())
    }

    /// Drop a bucket's manual override, returning to the voter-derived count
    pub async fn sync_count(&self, phrase: &str) -> WheelResult<()> {
        let key = normalize_phrase(phrase);
        let mut ledger = self.ledger.write().await;
        let bucket = ledger
            .bucket_mut(&key)
            .ok_or_else(|| WheelError::NotFound(format!("no bucket '{key}'")))?;
        bucket.manual_count = None;
        Ok(())
    }

    /// Add a row by hand.
    ///
    /// Runs the same merge policy as chat votes; when a target exists the
    /// row already "is" that bucket and nothing changes. A genuinely new
    /// row starts with no voters and persists until explicitly removed.
    pub async fn add_phrase(&self, text: &str) -> WheelResult<PhraseKey> {
        let key = normalize_phrase(text);
        if key.is_empty() {
            return Err(WheelError::InvalidInput(
                "phrase is empty after normalization".to_string(),
            ));
        }

        let mut ledger = self.ledger.write().await;
        let target = find_merge_target(&key, &ledger.buckets, self.config.min_match_len, None)
            .map(str::to_owned);
        if let Some(target) = target {
            return Ok(target);
        }

        ledger.buckets.push(PhraseBucket::new(key.clone()));
        tracing::debug!(phrase = %key, "manual row added");
        Ok(key)
    }

    /// Delete a row. Its voters lose their active vote and may vote again.
    pub async fn remove_phrase(&self, phrase: &str) -> WheelResult<()> {
        let key = normalize_phrase(phrase);
        let mut ledger = self.ledger.write().await;

        let idx = ledger
            .buckets
            .iter()
            .position(|b| b.phrase == key)
            .ok_or_else(|| WheelError::NotFound(format!("no bucket '{key}'")))?;

        ledger.buckets.remove(idx);
        ledger.user_votes.retain(|_, v| *v != key);
        tracing::debug!(phrase = %key, "row removed");
        Ok(())
    }

    /// Rename a row, merging into an existing bucket when the new text
    /// resolves to one.
    ///
    /// On merge the voters move across (their vote pointers follow) and, if
    /// either side carried a manual override, the combined displayed count
    /// becomes the target's override. Otherwise the row is renamed in place
    /// and keeps its creation position.
    pub async fn rename_phrase(&self, old: &str, new: &str) -> WheelResult<PhraseKey> {
        let old_key = normalize_phrase(old);
        let new_key = normalize_phrase(new);
        if new_key.is_empty() {
            return Err(WheelError::InvalidInput(
                "phrase is empty after normalization".to_string(),
            ));
        }

        let mut ledger = self.ledger.write().await;
        let idx = ledger
            .buckets
            .iter()
            .position(|b| b.phrase == old_key)
            .ok_or_else(|| WheelError::NotFound(format!("no bucket '{old_key}'")))?;

        if new_key == old_key {
            return Ok(old_key);
        }

        let target = find_merge_target(
            &new_key,
            &ledger.buckets,
            self.config.min_match_len,
            Some(&old_key),
        )
        .map(str::to_owned);

        match target {
            Some(target_key) => {
                let old_bucket = ledger.buckets.remove(idx);
                let combined = old_bucket
                    .count()
                    .saturating_add(ledger.bucket(&target_key).map(|b| b.count()).unwrap_or(0));
                let had_override = old_bucket.manual_count.is_some();

                for voter in old_bucket.voters {
                    ledger.user_votes.insert(voter.clone(), target_key.clone());
                    if let Some(bucket) = ledger.bucket_mut(&target_key) {
                        if !bucket.voters.contains(&voter) {
                            bucket.voters.push(voter);
                        }
                    }
                }

                if let Some(bucket) = ledger.bucket_mut(&target_key) {
                    if had_override || bucket.manual_count.is_some() {
                        bucket.manual_count = Some(combined);
                    }
                }

                tracing::debug!(from = %old_key, into = %target_key, "rows merged by rename");
                Ok(target_key)
            }
            None => {
                let voters = ledger.buckets[idx].voters.clone();
                for voter in voters {
                    ledger.user_votes.insert(voter, new_key.clone());
                }
                ledger.buckets[idx].phrase = new_key.clone();
                tracing::debug!(from = %old_key, to = %new_key, "row renamed");
                Ok(new_key)
            }
        }
    }
}
