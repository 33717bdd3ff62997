/// Engine configuration
#[derive(Debug, Clone)]
pub struct WheelConfig {
    /// Length of the voting window in seconds
    pub vote_duration_secs: u64,
    /// Default number of phrases shown on the wheel
    pub default_top_n: usize,
    /// Minimum length of the shorter string for a containment merge
    pub min_match_len: usize,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            vote_duration_secs: 120,
            default_top_n: 10,
            min_match_len: 3,
        }
    }
}

impl WheelConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let vote_duration_secs = std::env::var("WHEEL_VOTE_DURATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.vote_duration_secs);

        let default_top_n = std::env::var("WHEEL_TOP_N")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(defaults.default_top_n);

        let min_match_len = std::env::var("WHEEL_MIN_MATCH_LEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.min_match_len);

        Self {
            vote_duration_secs,
            default_top_n,
            min_match_len,
        }
    }
}
