use super::WheelState;
use crate::error::{WheelError, WheelResult};
use crate::matcher::find_merge_target;
use crate::normalize::{normalize_phrase, normalize_username};
use crate::types::{PhraseBucket, PhraseKey, VotePhase};

impl WheelState {
    /// Entry point for the chat transport.
    ///
    /// Polls the voting window first so an expired window closes even when
    /// the watcher task isn't running, then forwards to `cast_vote` only
    /// while voting is open. Returns the bucket the vote landed in, or
    /// `None` when the message was dropped.
    pub async fn on_chat_message(&self, username: &str, message: &str) -> Option<PhraseKey> {
        self.poll_window().await;

        if self.phase().await != VotePhase::VotingOpen {
            tracing::trace!(username, "chat message ignored, voting idle");
            return None;
        }

        self.cast_vote(username, message).await
    }

    /// Cast or re-cast a user's vote.
    ///
    /// Normalizes the message, resolves a merge target among existing
    /// buckets, and moves the user's single vote there. Empty phrases and
    /// empty usernames are silently ignored. Casting the same resolved
    /// phrase twice is a no-op; a different phrase moves the vote (the old
    /// bucket keeps existing even when it drops to zero voters).
    pub async fn cast_vote(&self, username: &str, message: &str) -> Option<PhraseKey> {
        let user = normalize_username(username);
        if user.is_empty() {
            return None;
        }

        let phrase = normalize_phrase(message);
        if phrase.is_empty() {
            tracing::trace!(username = %user, "vote ignored, empty after normalization");
            return None;
        }

        let mut ledger = self.ledger.write().await;

        let target = find_merge_target(&phrase, &ledger.buckets, self.config.min_match_len, None)
            .map(str::to_owned)
            .unwrap_or(phrase);

        // Same resolved bucket as the current vote: nothing to do
        if ledger.user_votes.get(&user) == Some(&target) {
            return Some(target);
        }

        ledger.detach_user(&user);

        match ledger.buckets.iter().position(|b| b.phrase == target) {
            Some(idx) => {
                if !ledger.buckets[idx].voters.contains(&user) {
                    ledger.buckets[idx].voters.push(user.clone());
                }
            }
            None => {
                let mut bucket = PhraseBucket::new(target.clone());
                bucket.voters.push(user.clone());
                ledger.buckets.push(bucket);
            }
        }
        ledger.user_votes.insert(user.clone(), target.clone());

        tracing::debug!(user = %user, phrase = %target, "vote cast");
        Some(target)
    }

    /// Clear a user's active vote, decrementing their bucket
    pub async fn remove_user_vote(&self, username: &str) -> WheelResult<()> {
        let user = normalize_username(username);
        let mut ledger = self.ledger.write().await;

        match ledger.detach_user(&user) {
            Some(prior) => {
                tracing::debug!(user = %user, phrase = %prior, "vote removed");
                Ok(())
            }
            None => Err(WheelError::NotFound(format!(
                "user '{user}' has no active vote"
            ))),
        }
    }

    /// Sum of displayed counts over all buckets (test and display helper)
    pub async fn total_votes(&self) -> u32 {
        let ledger = self.ledger.read().await;
        ledger.buckets.iter().map(|b| b.count()).sum()
    }
}
