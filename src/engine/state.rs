use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::LogEntry;
use crate::events::{MatchId, SetHistory, TeamSide};
use crate::roster::Roster;
use crate::rotation::RotationReport;
use crate::score::{MatchFlags, ScoreFrame};
use crate::sync::SyncState;

/// The root aggregate. Only the engine writes to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
	pub match_id: MatchId,
	pub config: GameConfig,
	#[serde(default)]
	pub frame: ScoreFrame,
	#[serde(default)]
	pub match_duration_seconds: u64,
	#[serde(default)]
	pub history: Vec<SetHistory>,
	#[serde(default)]
	pub match_log: Vec<LogEntry>,
	pub roster: Roster,
	#[serde(default)]
	pub rotation_report: Option<RotationReport>,
	#[serde(default)]
	pub sync: SyncState,
}

impl MatchState {
	pub fn new(match_id: MatchId, config: GameConfig) -> Self {
		Self {
			match_id,
			config,
			frame: ScoreFrame::default(),
			match_duration_seconds: 0,
			history: Vec::new(),
			match_log: Vec::new(),
			roster: Roster::default(),
			rotation_report: None,
			sync: SyncState::default(),
		}
	}

	pub fn score(&self, side: TeamSide) -> u32 {
		self.frame.score.get(side)
	}

	pub fn sets(&self, side: TeamSide) -> u32 {
		self.frame.sets.get(side)
	}

	pub fn is_match_over(&self) -> bool {
		self.frame.is_match_over
	}

	/// True once anything has been scored in this match, finished or not.
	pub fn has_started(&self) -> bool {
		!self.frame.is_fresh() || !self.history.is_empty()
	}

	pub fn team_name(&self, side: TeamSide) -> &str {
		&self.roster.side(side).name
	}
}

/// Read-only view handed back for every accepted command.
#[derive(Debug, Clone, Copy)]
pub struct MatchView<'a> {
	pub state: &'a MatchState,
	pub flags: MatchFlags,
}

impl std::ops::Deref for MatchView<'_> {
	type Target = MatchState;

	fn deref(&self) -> &MatchState {
		self.state
	}
}
