mod types;

pub use types::{EngineEvent, MatchId, PerTeam, SetHistory, SkillTag, TeamSide};
