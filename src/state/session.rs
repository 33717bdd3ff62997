use super::WheelState;
use crate::types::VotePhase;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Poll interval for the background window watcher
const WATCHER_TICK: Duration = Duration::from_millis(250);

impl WheelState {
    pub async fn phase(&self) -> VotePhase {
        self.session.read().await.phase
    }

    /// Open the voting window.
    ///
    /// Starting while already open restarts the window with a fresh
    /// deadline rather than stacking a second one.
    pub async fn start_vote(&self) {
        let mut session = self.session.write().await;
        let deadline = Utc::now() + ChronoDuration::seconds(self.config.vote_duration_secs as i64);
        session.phase = VotePhase::VotingOpen;
        session.deadline = Some(deadline);
        tracing::info!(%deadline, "voting window opened");
    }

    /// Close the voting window early. No-op when already idle.
    pub async fn stop_vote(&self) {
        let mut session = self.session.write().await;
        if session.phase == VotePhase::Idle {
            return;
        }
        session.phase = VotePhase::Idle;
        session.deadline = None;
        tracing::info!("voting window stopped");
    }

    /// Explicit new-session clear: drops all buckets and user votes and
    /// closes the window. Never triggered implicitly.
    pub async fn reset(&self) {
        {
            let mut ledger = self.ledger.write().await;
            ledger.buckets.clear();
            ledger.user_votes.clear();
        }
        let mut session = self.session.write().await;
        session.phase = VotePhase::Idle;
        session.deadline = None;
        tracing::info!("session reset");
    }

    /// Fire the time-triggered close if the deadline has passed.
    /// Returns true when this call performed the transition.
    pub async fn poll_window(&self) -> bool {
        self.poll_window_at(Utc::now()).await
    }

    pub(crate) async fn poll_window_at(&self, now: DateTime<Utc>) -> bool {
        let mut session = self.session.write().await;
        if session.phase != VotePhase::VotingOpen {
            return false;
        }
        match session.deadline {
            Some(deadline) if now >= deadline => {
                session.phase = VotePhase::Idle;
                session.deadline = None;
                tracing::info!("voting window expired");
                true
            }
            _ => false,
        }
    }

    /// Seconds left in the window, for the countdown display
    pub async fn remaining_secs(&self) -> Option<u64> {
        let session = self.session.read().await;
        if session.phase != VotePhase::VotingOpen {
            return None;
        }
        let deadline = session.deadline?;
        Some((deadline - Utc::now()).num_seconds().max(0) as u64)
    }

    /// Set how many phrases the wheel shows (clamped to at least 1)
    pub async fn set_top_n(&self, n: usize) {
        self.session.write().await.top_n = n.max(1);
    }

    pub async fn top_n_limit(&self) -> usize {
        self.session.read().await.top_n
    }
}

/// Spawn a background task that fires the window auto-close even when no
/// chat messages arrive. The chat path also polls on every message, so the
/// watcher only matters for a silent channel.
pub fn spawn_window_watcher(state: WheelState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(WATCHER_TICK).await;
            state.poll_window().await;
        }
    })
}
