//! Scenario engine: sessions, turn resolution, delayed effects and phases

pub mod delayed;
pub mod phase;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod store;

pub use delayed::{DelayQueue, DelayedEffect};
pub use phase::{classify, detect_pattern, PatternKind, Phase};
pub use rules::{resolve, PendingDelay, Resolution};
pub use session::{Session, SessionSummary, SessionView, TurnOutcome, TurnRecord};
pub use store::{SessionStore, StoreConfig};
