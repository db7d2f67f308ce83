use serde::{Deserialize, Serialize};

use crate::engine::ActionKind;
use crate::history::MatchRecord;
use crate::roster::PlayerId;
use crate::rotation::RotationReport;
use crate::sync::StateSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl std::fmt::Display for MatchId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:08x}", self.0 & 0xFFFFFFFF)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamSide {
	A,
	B,
}

impl TeamSide {
	pub fn other(self) -> Self {
		match self {
			TeamSide::A => TeamSide::B,
			TeamSide::B => TeamSide::A,
		}
	}

	pub fn both() -> [TeamSide; 2] {
		[TeamSide::A, TeamSide::B]
	}
}

impl std::fmt::Display for TeamSide {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TeamSide::A => write!(f, "A"),
			TeamSide::B => write!(f, "B"),
		}
	}
}

/// How a rally was won, used for player attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTag {
	Attack,
	Block,
	Ace,
	OpponentError,
	Generic,
}

impl std::fmt::Display for SkillTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SkillTag::Attack => write!(f, "attack"),
			SkillTag::Block => write!(f, "block"),
			SkillTag::Ace => write!(f, "ace"),
			SkillTag::OpponentError => write!(f, "opponent error"),
			SkillTag::Generic => write!(f, "point"),
		}
	}
}

/// A value kept once per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerTeam<T> {
	pub a: T,
	pub b: T,
}

impl<T: Copy> PerTeam<T> {
	pub fn new(a: T, b: T) -> Self {
		Self { a, b }
	}

	pub fn get(&self, side: TeamSide) -> T {
		match side {
			TeamSide::A => self.a,
			TeamSide::B => self.b,
		}
	}

	pub fn set(&mut self, side: TeamSide, value: T) {
		match side {
			TeamSide::A => self.a = value,
			TeamSide::B => self.b = value,
		}
	}
}

impl<T> PerTeam<T> {
	pub fn get_mut(&mut self, side: TeamSide) -> &mut T {
		match side {
			TeamSide::A => &mut self.a,
			TeamSide::B => &mut self.b,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetHistory {
	pub set_number: u32,
	pub score_a: u32,
	pub score_b: u32,
	pub winner: TeamSide,
}

#[derive(Debug, Clone)]
pub enum EngineEvent {
	PointScored {
		team: TeamSide,
		score: PerTeam<u32>,
		player: Option<PlayerId>,
	},

	SuddenDeath {
		set_number: u32,
	},

	SetCompleted(SetHistory),

	MatchCompleted(Box<MatchRecord>),

	/// The match-winning point was undone.
	MatchReopened {
		match_id: MatchId,
	},

	TeamsRotated(Box<RotationReport>),

	Undone {
		kind: ActionKind,
	},

	MatchReset {
		match_id: MatchId,
	},

	SnapshotReady(Box<StateSnapshot>),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_team_side_other() {
		assert_eq!(TeamSide::A.other(), TeamSide::B);
		assert_eq!(TeamSide::B.other(), TeamSide::A);
	}

	#[test]
	fn test_per_team_access() {
		let mut score = PerTeam::new(3u32, 5u32);
		assert_eq!(score.get(TeamSide::A), 3);
		assert_eq!(score.get(TeamSide::B), 5);

		*score.get_mut(TeamSide::A) += 1;
		score.set(TeamSide::B, 0);
		assert_eq!(score, PerTeam::new(4, 0));
	}

	#[test]
	fn test_skill_tag_serialization() {
		let json = serde_json::to_string(&SkillTag::OpponentError).unwrap();
		assert_eq!(json, "\"opponent_error\"");
	}

	#[test]
	fn test_match_id_display() {
		assert_eq!(MatchId(0x1_0000_00ff).to_string(), "000000ff");
	}
}
