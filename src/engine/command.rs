use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::MatchState;
use crate::events::{SkillTag, TeamSide};
use crate::roster::{
	NewPlayer, PlayerId, PlayerProfile, PlayerUpdate, RosterError, RosterSlot, RotationDirection,
	TeamId, TeamRef, TeamUpdate,
};

/// Every way the UI can ask the engine to change the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
	AddPoint {
		team: TeamSide,
		#[serde(default)]
		player: Option<PlayerId>,
		#[serde(default)]
		skill: Option<SkillTag>,
	},
	SubtractPoint {
		team: TeamSide,
	},
	SetServer {
		team: TeamSide,
	},
	UseTimeout {
		team: TeamSide,
	},
	Undo,
	ToggleSides,
	ToggleTimer,
	ResetTimer,
	SetMatchDuration {
		seconds: u64,
	},
	RotateTeams,
	ManualRotate {
		team: TeamSide,
		direction: RotationDirection,
	},
	CommitRotation {
		team: TeamSide,
	},
	SubstitutePlayers {
		team: TeamRef,
		incoming: PlayerId,
		outgoing: PlayerId,
	},
	BalanceTeams,
	ReorderQueue {
		from: usize,
		to: usize,
	},
	DisbandTeam {
		team: TeamId,
	},
	AddPlayer {
		player: NewPlayer,
		target: RosterSlot,
	},
	GeneratePlayers {
		text: String,
	},
	RemovePlayer {
		player: PlayerId,
	},
	UndoRemovePlayer,
	CommitDeletions,
	MovePlayer {
		player: PlayerId,
		to: RosterSlot,
		#[serde(default)]
		index: Option<usize>,
	},
	UpdatePlayer {
		player: PlayerId,
		update: PlayerUpdate,
	},
	UpdateTeam {
		team: TeamRef,
		update: TeamUpdate,
	},
	RelinkProfile {
		player: PlayerId,
		profile: PlayerProfile,
	},
	SyncProfiles {
		profiles: Vec<PlayerProfile>,
	},
	ApplySettings {
		config: GameConfig,
		#[serde(default)]
		reset: bool,
	},
	ResetMatch,
	LoadState {
		state: Box<MatchState>,
	},
}

impl Command {
	pub fn name(&self) -> &'static str {
		match self {
			Command::AddPoint { .. } => "ADD_POINT",
			Command::SubtractPoint { .. } => "SUBTRACT_POINT",
			Command::SetServer { .. } => "SET_SERVER",
			Command::UseTimeout { .. } => "USE_TIMEOUT",
			Command::Undo => "UNDO",
			Command::ToggleSides => "TOGGLE_SIDES",
			Command::ToggleTimer => "TOGGLE_TIMER",
			Command::ResetTimer => "RESET_TIMER",
			Command::SetMatchDuration { .. } => "SET_MATCH_DURATION",
			Command::RotateTeams => "ROTATE_TEAMS",
			Command::ManualRotate { .. } => "MANUAL_ROTATE",
			Command::CommitRotation { .. } => "COMMIT_ROTATION",
			Command::SubstitutePlayers { .. } => "SUBSTITUTE_PLAYERS",
			Command::BalanceTeams => "BALANCE_TEAMS",
			Command::ReorderQueue { .. } => "REORDER_QUEUE",
			Command::DisbandTeam { .. } => "DISBAND_TEAM",
			Command::AddPlayer { .. } => "ADD_PLAYER",
			Command::GeneratePlayers { .. } => "GENERATE_PLAYERS",
			Command::RemovePlayer { .. } => "REMOVE_PLAYER",
			Command::UndoRemovePlayer => "UNDO_REMOVE_PLAYER",
			Command::CommitDeletions => "COMMIT_DELETIONS",
			Command::MovePlayer { .. } => "MOVE_PLAYER",
			Command::UpdatePlayer { .. } => "UPDATE_PLAYER",
			Command::UpdateTeam { .. } => "UPDATE_TEAM",
			Command::RelinkProfile { .. } => "RELINK_PROFILE",
			Command::SyncProfiles { .. } => "SYNC_PROFILES",
			Command::ApplySettings { .. } => "APPLY_SETTINGS",
			Command::ResetMatch => "RESET_MATCH",
			Command::LoadState { .. } => "LOAD_STATE",
		}
	}
}

/// Why a command was refused. A rejected command never changes state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
	#[error("the match is over")]
	MatchOver,
	#[error("the match is still in progress")]
	MatchInProgress,
	#[error("nothing to undo")]
	NothingToUndo,
	#[error("team {0} has no timeouts left this set")]
	TimeoutsExhausted(TeamSide),
	#[error("team {0} has no points to take away")]
	ScoreAtZero(TeamSide),
	#[error("spectators cannot change the match")]
	ReadOnly,
	#[error("invalid settings: {0}")]
	InvalidConfig(String),
	#[error("scoring settings cannot change during a match without a reset")]
	ConfigLocked,
	#[error("invalid state: {0}")]
	InvalidState(String),
	#[error("snapshot is for session {got}, expected {expected}")]
	SessionMismatch { expected: String, got: String },
	#[error("snapshot v{got} is not newer than v{current}")]
	StaleSnapshot { current: u64, got: u64 },
	#[error("not following a session")]
	NotSpectating,
	#[error(transparent)]
	Roster(#[from] RosterError),
}
