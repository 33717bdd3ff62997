use serde::{Deserialize, Serialize};

/// Canonical (normalized) phrase text, also the bucket's display text
pub type PhraseKey = String;
/// Normalized chat username
pub type Username = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VotePhase {
    Idle,
    VotingOpen,
}

/// A merged group of near-duplicate phrases treated as one votable option.
///
/// The displayed count is derived from `voters` unless the table editor has
/// set a manual override; chat votes keep maintaining `voters` underneath
/// the override so that re-vote eligibility survives manual edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseBucket {
    pub phrase: PhraseKey,
    /// Users currently attributed to this bucket, in vote order
    pub voters: Vec<Username>,
    /// Manual count override set by the table editor (display-only overlay)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_count: Option<u32>,
}

impl PhraseBucket {
    pub fn new(phrase: PhraseKey) -> Self {
        Self {
            phrase,
            voters: Vec::new(),
            manual_count: None,
        }
    }

    /// Displayed vote count: manual override if set, otherwise |voters|
    pub fn count(&self) -> u32 {
        self.manual_count.unwrap_or(self.voters.len() as u32)
    }
}
