use serde::{Deserialize, Serialize};

use crate::events::TeamSide;

mod ops;
mod player;
mod profiles;
mod team;

pub use ops::TeamUpdate;
pub use player::{
	parse_generated_line, sanitize_name, validate_skill, NewPlayer, Player, PlayerId, PlayerUpdate,
	ProfileId, DEFAULT_SKILL, MAX_SKILL, MIN_SKILL,
};
pub use profiles::{PlayerProfile, ProfileStore};
pub use team::{RotationDirection, Team, TeamId, TeamRef, TEAM_COLORS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
	#[error("player {0} not found")]
	PlayerNotFound(PlayerId),
	#[error("{0} not found")]
	TeamNotFound(TeamRef),
	#[error("{team} is full ({capacity} on court)")]
	CourtFull { team: String, capacity: usize },
	#[error("{team} bench is full ({limit} reserves)")]
	BenchFull { team: String, limit: usize },
	#[error("number {number} is already taken in {team}")]
	DuplicateNumber { number: u8, team: String },
	#[error("player name cannot be empty")]
	EmptyName,
	#[error("skill {0} is outside 1-10")]
	InvalidSkill(u8),
	#[error("player {player} is not on court for {team}")]
	NotOnCourt { player: PlayerId, team: String },
	#[error("player {player} is not on the bench for {team}")]
	NotOnBench { player: PlayerId, team: String },
	#[error("no removed player to restore")]
	NothingToRestore,
	#[error("queue position {index} is out of range (queue has {len})")]
	QueueIndexOutOfRange { index: usize, len: usize },
	#[error("{0} is on court and cannot be disbanded")]
	NotQueued(TeamRef),
	#[error("{team} needs at least two players to rotate")]
	NotEnoughPlayers { team: String },
	#[error("{team} still has players on the bench")]
	BenchInUse { team: String },
}

/// Hands out player and team ids. Never rolled back, so ids are never
/// reused even when the roster itself is restored by undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
	next_player: u64,
	next_team: u64,
}

impl Default for IdAllocator {
	fn default() -> Self {
		Self { next_player: 1, next_team: 3 }
	}
}

impl IdAllocator {
	pub fn player(&mut self) -> PlayerId {
		let id = PlayerId(self.next_player);
		self.next_player += 1;
		id
	}

	pub fn team(&mut self) -> TeamId {
		let id = TeamId(self.next_team);
		self.next_team += 1;
		id
	}

	pub fn peek_player(&self) -> PlayerId {
		PlayerId(self.next_player)
	}

	/// Moves the counters past every id already present.
	pub fn observe(&mut self, max_player: u64, max_team: u64) {
		self.next_player = self.next_player.max(max_player + 1);
		self.next_team = self.next_team.max(max_team + 1);
	}
}

/// Where a command wants a player to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum RosterSlot {
	Lineup { team: TeamRef },
	Bench { team: TeamRef },
	/// The last queue team with room, or a new one.
	NextInQueue,
	Unassigned,
}

/// A concrete list a player lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
	Lineup(TeamId),
	Bench(TeamId),
	Unassigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLocation {
	pub container: Container,
	pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPlayer {
	pub player: Player,
	pub from: Container,
	pub index: usize,
}

/// Team membership without the deletion buffer or id counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
	pub team_a: Team,
	pub team_b: Team,
	pub queue: Vec<Team>,
	pub unassigned: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
	pub team_a: Team,
	pub team_b: Team,
	#[serde(default)]
	pub queue: Vec<Team>,
	#[serde(default)]
	pub unassigned: Vec<Player>,
	#[serde(default)]
	pub pending_deletions: Vec<DeletedPlayer>,
	#[serde(default)]
	pub ids: IdAllocator,
}

impl Default for Roster {
	fn default() -> Self {
		Self {
			team_a: Team::new(TeamId(1), "Home", Team::default_color(TeamId(1))),
			team_b: Team::new(TeamId(2), "Guest", Team::default_color(TeamId(2))),
			queue: Vec::new(),
			unassigned: Vec::new(),
			pending_deletions: Vec::new(),
			ids: IdAllocator::default(),
		}
	}
}

impl Roster {
	pub fn side(&self, side: TeamSide) -> &Team {
		match side {
			TeamSide::A => &self.team_a,
			TeamSide::B => &self.team_b,
		}
	}

	pub fn side_mut(&mut self, side: TeamSide) -> &mut Team {
		match side {
			TeamSide::A => &mut self.team_a,
			TeamSide::B => &mut self.team_b,
		}
	}

	pub fn side_of(&self, id: TeamId) -> Option<TeamSide> {
		if self.team_a.id == id {
			Some(TeamSide::A)
		} else if self.team_b.id == id {
			Some(TeamSide::B)
		} else {
			None
		}
	}

	pub fn team(&self, team: TeamRef) -> Option<&Team> {
		match team {
			TeamRef::Side(side) => Some(self.side(side)),
			TeamRef::Id(id) => self.teams().find(|t| t.id == id),
		}
	}

	pub fn team_mut(&mut self, team: TeamRef) -> Option<&mut Team> {
		match team {
			TeamRef::Side(side) => Some(self.side_mut(side)),
			TeamRef::Id(id) => self.team_by_id_mut(id),
		}
	}

	pub fn team_by_id_mut(&mut self, id: TeamId) -> Option<&mut Team> {
		if self.team_a.id == id {
			return Some(&mut self.team_a);
		}
		if self.team_b.id == id {
			return Some(&mut self.team_b);
		}
		self.queue.iter_mut().find(|t| t.id == id)
	}

	/// Court teams first, then the queue in order.
	pub fn teams(&self) -> impl Iterator<Item = &Team> {
		[&self.team_a, &self.team_b].into_iter().chain(self.queue.iter())
	}

	pub fn team_name(&self, id: TeamId) -> String {
		self.teams()
			.find(|t| t.id == id)
			.map(|t| t.name.clone())
			.unwrap_or_else(|| format!("team #{}", id.0))
	}

	pub fn locate(&self, player: PlayerId) -> Option<PlayerLocation> {
		for team in self.teams() {
			if let Some(index) = team.players.iter().position(|p| p.id == player) {
				return Some(PlayerLocation { container: Container::Lineup(team.id), index });
			}
			if let Some(index) = team.reserves.iter().position(|p| p.id == player) {
				return Some(PlayerLocation { container: Container::Bench(team.id), index });
			}
		}
		self.unassigned
			.iter()
			.position(|p| p.id == player)
			.map(|index| PlayerLocation { container: Container::Unassigned, index })
	}

	pub fn player(&self, id: PlayerId) -> Option<&Player> {
		self.all_players().find(|p| p.id == id)
	}

	pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
		let location = self.locate(id)?;
		let list = self.container_mut(location.container)?;
		list.get_mut(location.index)
	}

	pub fn container_mut(&mut self, container: Container) -> Option<&mut Vec<Player>> {
		match container {
			Container::Lineup(id) => self.team_by_id_mut(id).map(|t| &mut t.players),
			Container::Bench(id) => self.team_by_id_mut(id).map(|t| &mut t.reserves),
			Container::Unassigned => Some(&mut self.unassigned),
		}
	}

	/// Every live player, excluding the deletion buffer.
	pub fn all_players(&self) -> impl Iterator<Item = &Player> {
		self.teams()
			.flat_map(|t| t.players.iter().chain(t.reserves.iter()))
			.chain(self.unassigned.iter())
	}

	pub fn snapshot(&self) -> RosterSnapshot {
		RosterSnapshot {
			team_a: self.team_a.clone(),
			team_b: self.team_b.clone(),
			queue: self.queue.clone(),
			unassigned: self.unassigned.clone(),
		}
	}

	pub fn restore(&mut self, snapshot: RosterSnapshot) {
		self.team_a = snapshot.team_a;
		self.team_b = snapshot.team_b;
		self.queue = snapshot.queue;
		self.unassigned = snapshot.unassigned;
	}

	/// Re-seeds the id counters from the ids currently in use.
	pub fn observe_ids(&mut self) {
		let max_player = self
			.all_players()
			.chain(self.pending_deletions.iter().map(|d| &d.player))
			.map(|p| p.id.0)
			.max()
			.unwrap_or(0);
		let max_team = self.teams().map(|t| t.id.0).max().unwrap_or(0);
		self.ids.observe(max_player, max_team);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::CourtLimits;

	const LIMITS: CourtLimits = CourtLimits { court_size: 6, bench_limit: 2 };

	#[test]
	fn test_default_roster_has_two_teams() {
		let roster = Roster::default();
		assert_eq!(roster.team_a.id, TeamId(1));
		assert_eq!(roster.team_b.id, TeamId(2));
		assert!(roster.queue.is_empty());
	}

	#[test]
	fn test_locate_across_lists() {
		let mut roster = Roster::default();
		let a = roster.add_player(NewPlayer::new("Ana"), RosterSlot::Lineup { team: TeamSide::A.into() }, LIMITS).unwrap();
		let b = roster.add_player(NewPlayer::new("Bia"), RosterSlot::Bench { team: TeamSide::B.into() }, LIMITS).unwrap();
		let c = roster.add_player(NewPlayer::new("Caio"), RosterSlot::Unassigned, LIMITS).unwrap();

		assert_eq!(roster.locate(a).unwrap().container, Container::Lineup(TeamId(1)));
		assert_eq!(roster.locate(b).unwrap().container, Container::Bench(TeamId(2)));
		assert_eq!(roster.locate(c).unwrap().container, Container::Unassigned);
		assert!(roster.locate(PlayerId(99)).is_none());
	}

	#[test]
	fn test_observe_ids_skips_existing() {
		let mut roster = Roster::default();
		roster.unassigned.push(Player {
			id: PlayerId(41),
			name: "Loaded".to_string(),
			number: None,
			skill: 5,
			fixed: false,
			profile_id: None,
			display_order: 0,
			original_index: 0,
		});
		roster.observe_ids();
		assert_eq!(roster.ids.peek_player(), PlayerId(42));
	}

	#[test]
	fn test_snapshot_restore() {
		let mut roster = Roster::default();
		let snapshot = roster.snapshot();
		roster.add_player(NewPlayer::new("Ana"), RosterSlot::NextInQueue, LIMITS).unwrap();
		assert_eq!(roster.queue.len(), 1);

		roster.restore(snapshot);
		assert!(roster.queue.is_empty());
		assert_eq!(roster.ids.peek_player(), PlayerId(2));
	}
}
