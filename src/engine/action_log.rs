use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::events::{MatchId, SetHistory, SkillTag, TeamSide};
use crate::roster::{DeletedPlayer, Player, PlayerId, RosterSnapshot, RotationDirection, TeamId, TeamRef};
use crate::rotation::RotationReport;
use crate::score::ScoreFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
	Point,
	PointCorrection,
	Timeout,
	ServeChange,
	SideSwap,
	Rotation,
	ManualRotation,
	Substitution,
	RosterEdit,
	Timer,
	Settings,
}

impl std::fmt::Display for ActionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ActionKind::Point => "POINT",
			ActionKind::PointCorrection => "POINT_CORRECTION",
			ActionKind::Timeout => "TIMEOUT",
			ActionKind::ServeChange => "SERVE_CHANGE",
			ActionKind::SideSwap => "SIDE_SWAP",
			ActionKind::Rotation => "ROTATION",
			ActionKind::ManualRotation => "MANUAL_ROTATION",
			ActionKind::Substitution => "SUBSTITUTION",
			ActionKind::RosterEdit => "ROSTER_EDIT",
			ActionKind::Timer => "TIMER",
			ActionKind::Settings => "SETTINGS",
		};
		write!(f, "{}", name)
	}
}

/// Everything a finished match owned, kept so a rotation can be undone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorMatch {
	pub match_id: MatchId,
	pub frame: ScoreFrame,
	pub history: Vec<SetHistory>,
	pub log: Vec<LogEntry>,
	pub roster: RosterSnapshot,
	pub rotation_report: Option<RotationReport>,
	pub duration: u64,
}

/// One reversible step. Each variant carries what undo needs to put the
/// state back exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoggedAction {
	Point {
		team: TeamSide,
		#[serde(default)]
		player: Option<PlayerId>,
		#[serde(default)]
		skill: Option<SkillTag>,
		prev: ScoreFrame,
		/// The set this point closed, if any.
		#[serde(default)]
		closed_set: Option<SetHistory>,
		/// Side-out rotation applied to the team gaining the serve.
		#[serde(default)]
		auto_rotated: bool,
		#[serde(default)]
		prev_report: Option<Box<RotationReport>>,
	},
	PointCorrection {
		team: TeamSide,
		prev: ScoreFrame,
	},
	Timeout {
		team: TeamSide,
		prev: u8,
	},
	ServeChange {
		prev: Option<TeamSide>,
		prev_served: bool,
		next: TeamSide,
	},
	SideSwap,
	Rotation {
		prior: Box<PriorMatch>,
		#[serde(default)]
		report: Option<Box<RotationReport>>,
	},
	ManualRotation {
		team: TeamSide,
		direction: RotationDirection,
	},
	CommitRotation {
		team: TeamSide,
		offset: usize,
	},
	Substitution {
		team: TeamId,
		incoming: PlayerId,
		outgoing: PlayerId,
	},
	RosterEdit {
		label: String,
		before: Box<RosterSnapshot>,
	},
	PlayerRemoved {
		player: Player,
		before: Box<RosterSnapshot>,
	},
	/// A pending deletion taken back. Undo returns it to the buffer.
	PlayerRestored {
		deleted: DeletedPlayer,
		before: Box<RosterSnapshot>,
	},
	TimerToggle {
		prev_running: bool,
	},
	TimerSet {
		prev_seconds: u64,
	},
	Settings {
		prev: Box<GameConfig>,
		#[serde(default)]
		roster: Option<Box<RosterSnapshot>>,
	},
}

impl LoggedAction {
	pub fn kind(&self) -> ActionKind {
		match self {
			LoggedAction::Point { .. } => ActionKind::Point,
			LoggedAction::PointCorrection { .. } => ActionKind::PointCorrection,
			LoggedAction::Timeout { .. } => ActionKind::Timeout,
			LoggedAction::ServeChange { .. } => ActionKind::ServeChange,
			LoggedAction::SideSwap => ActionKind::SideSwap,
			LoggedAction::Rotation { .. } => ActionKind::Rotation,
			LoggedAction::ManualRotation { .. } | LoggedAction::CommitRotation { .. } => {
				ActionKind::ManualRotation
			}
			LoggedAction::Substitution { .. } => ActionKind::Substitution,
			LoggedAction::RosterEdit { .. }
			| LoggedAction::PlayerRemoved { .. }
			| LoggedAction::PlayerRestored { .. } => ActionKind::RosterEdit,
			LoggedAction::TimerToggle { .. } | LoggedAction::TimerSet { .. } => ActionKind::Timer,
			LoggedAction::Settings { .. } => ActionKind::Settings,
		}
	}

	pub fn team(&self) -> Option<TeamRef> {
		match self {
			LoggedAction::Point { team, .. }
			| LoggedAction::PointCorrection { team, .. }
			| LoggedAction::Timeout { team, .. }
			| LoggedAction::ManualRotation { team, .. }
			| LoggedAction::CommitRotation { team, .. } => Some(TeamRef::Side(*team)),
			LoggedAction::ServeChange { next, .. } => Some(TeamRef::Side(*next)),
			LoggedAction::Substitution { team, .. } => Some(TeamRef::Id(*team)),
			_ => None,
		}
	}

	pub fn player(&self) -> Option<PlayerId> {
		match self {
			LoggedAction::Point { player, .. } => *player,
			LoggedAction::Substitution { incoming, .. } => Some(*incoming),
			LoggedAction::PlayerRemoved { player, .. } => Some(player.id),
			LoggedAction::PlayerRestored { deleted, .. } => Some(deleted.player.id),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Milliseconds since the epoch.
	pub at: i64,
	pub action: LoggedAction,
}

impl LogEntry {
	pub fn now(action: LoggedAction) -> Self {
		Self {
			at: chrono::Utc::now().timestamp_millis(),
			action,
		}
	}

	pub fn kind(&self) -> ActionKind {
		self.action.kind()
	}
}
