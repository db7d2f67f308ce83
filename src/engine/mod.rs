mod action_log;
mod clock;
mod command;
mod match_engine;
mod state;
mod undo;

pub use action_log::{ActionKind, LogEntry, LoggedAction, PriorMatch};
pub use clock::MatchClock;
pub use command::{Command, Rejection};
pub use match_engine::{EngineHandle, MatchEngine};
pub use state::{MatchState, MatchView};
