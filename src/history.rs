use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{GameConfig, APP_DIR};
use crate::engine::{LogEntry, MatchState};
use crate::events::{MatchId, PerTeam, SetHistory, TeamSide};
use crate::roster::Team;

/// Immutable summary of a finished match, handed to the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
	pub id: MatchId,
	/// RFC 3339, UTC.
	pub completed_at: String,
	pub config: GameConfig,
	pub team_a: Team,
	pub team_b: Team,
	pub sets: Vec<SetHistory>,
	pub sets_won: PerTeam<u32>,
	pub winner: TeamSide,
	pub duration_seconds: u64,
	pub log: Vec<LogEntry>,
}

impl MatchRecord {
	pub fn from_state(state: &MatchState) -> Option<Self> {
		let winner = state.frame.match_winner?;
		Some(Self {
			id: state.match_id,
			completed_at: Utc::now().to_rfc3339(),
			config: state.config.clone(),
			team_a: state.roster.team_a.clone(),
			team_b: state.roster.team_b.clone(),
			sets: state.history.clone(),
			sets_won: state.frame.sets,
			winner,
			duration_seconds: state.match_duration_seconds,
			log: state.match_log.clone(),
		})
	}

	pub fn team(&self, side: TeamSide) -> &Team {
		match side {
			TeamSide::A => &self.team_a,
			TeamSide::B => &self.team_b,
		}
	}

	pub fn summary(&self) -> String {
		let sets: Vec<String> = self
			.sets
			.iter()
			.map(|s| format!("{}-{}", s.score_a, s.score_b))
			.collect();
		format!(
			"{} def. {} {}-{} ({})",
			self.team(self.winner).name,
			self.team(self.winner.other()).name,
			self.sets_won.get(self.winner),
			self.sets_won.get(self.winner.other()),
			sets.join(", ")
		)
	}
}

pub fn history_dir() -> PathBuf {
	match dirs::data_dir() {
		Some(dir) => dir.join(APP_DIR).join("history"),
		None => PathBuf::from("history"),
	}
}

pub fn save_record<P: AsRef<Path>>(dir: P, record: &MatchRecord) -> Result<PathBuf, String> {
	let dir = dir.as_ref();
	fs::create_dir_all(dir)
		.map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

	let path = dir.join(format!("match-{}.json", record.id));
	let content = serde_json::to_string_pretty(record)
		.map_err(|e| format!("Failed to serialize match record: {}", e))?;
	fs::write(&path, content)
		.map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

	Ok(path)
}

/// Loads every record in `dir`, oldest first.
pub fn load_records<P: AsRef<Path>>(dir: P) -> Result<Vec<MatchRecord>, String> {
	let dir = dir.as_ref();
	if !dir.exists() {
		return Ok(Vec::new());
	}

	let entries = fs::read_dir(dir)
		.map_err(|e| format!("Failed to read {}: {}", dir.display(), e))?;

	let mut records = Vec::new();
	for entry in entries {
		let path = entry
			.map_err(|e| format!("Failed to read entry in {}: {}", dir.display(), e))?
			.path();
		if path.extension().and_then(|e| e.to_str()) != Some("json") {
			continue;
		}
		let content = fs::read_to_string(&path)
			.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
		let record: MatchRecord = serde_json::from_str(&content)
			.map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
		records.push(record);
	}

	records.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
	Ok(records)
}
