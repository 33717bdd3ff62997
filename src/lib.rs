// Core engine for a live audience voting wheel. Chat transport and
// rendering live in the host application; they drive this crate through
// a shared WheelState handle.

pub mod config;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod spinner;
pub mod state;
pub mod types;

pub use config::WheelConfig;
pub use error::{WheelError, WheelResult};
pub use state::WheelState;
pub use types::{PhraseBucket, VotePhase};
