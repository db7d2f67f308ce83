use serde::{Deserialize, Serialize};

use crate::events::TeamSide;
use crate::roster::{Player, PlayerId};

pub const TEAM_COLORS: [&str; 8] = [
	"indigo", "rose", "emerald", "amber", "sky", "violet", "orange", "teal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u64);

/// Addresses a team either by court side or by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRef {
	Side(TeamSide),
	Id(TeamId),
}

impl std::fmt::Display for TeamRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TeamRef::Side(side) => write!(f, "team {}", side),
			TeamRef::Id(id) => write!(f, "team #{}", id.0),
		}
	}
}

impl From<TeamSide> for TeamRef {
	fn from(side: TeamSide) -> Self {
		TeamRef::Side(side)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
	Clockwise,
	CounterClockwise,
}

impl RotationDirection {
	pub fn opposite(self) -> Self {
		match self {
			RotationDirection::Clockwise => RotationDirection::CounterClockwise,
			RotationDirection::CounterClockwise => RotationDirection::Clockwise,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
	pub id: TeamId,
	pub name: String,
	pub color: String,
	#[serde(default)]
	pub logo: Option<String>,
	pub players: Vec<Player>,
	#[serde(default)]
	pub reserves: Vec<Player>,
	/// Presentation-only rotation over `players`.
	#[serde(default)]
	pub tactical_offset: usize,
	#[serde(default)]
	pub has_active_bench: bool,
}

impl Team {
	pub fn new(id: TeamId, name: impl Into<String>, color: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			color: color.into(),
			logo: None,
			players: Vec::new(),
			reserves: Vec::new(),
			tactical_offset: 0,
			has_active_bench: false,
		}
	}

	pub fn default_color(id: TeamId) -> &'static str {
		TEAM_COLORS[(id.0 as usize) % TEAM_COLORS.len()]
	}

	/// Court order as presented, with the tactical offset applied.
	pub fn rotated_view(&self) -> Vec<&Player> {
		let n = self.players.len();
		if n == 0 {
			return Vec::new();
		}
		let k = self.tactical_offset % n;
		(0..n).map(|i| &self.players[(i + n - k) % n]).collect()
	}

	/// Rewrites the underlying order by one slot.
	pub fn rotate(&mut self, direction: RotationDirection) {
		if self.players.len() < 2 {
			return;
		}
		match direction {
			RotationDirection::Clockwise => self.players.rotate_right(1),
			RotationDirection::CounterClockwise => self.players.rotate_left(1),
		}
	}

	pub fn shift_offset(&mut self, direction: RotationDirection) {
		let n = self.players.len();
		if n < 2 {
			return;
		}
		self.tactical_offset = match direction {
			RotationDirection::Clockwise => (self.tactical_offset + 1) % n,
			RotationDirection::CounterClockwise => (self.tactical_offset + n - 1) % n,
		};
	}

	/// Folds the tactical offset into the stored order.
	pub fn commit_offset(&mut self) {
		let n = self.players.len();
		if n > 0 {
			self.players.rotate_right(self.tactical_offset % n);
		}
		self.tactical_offset = 0;
	}

	/// Undoes `commit_offset` for a previously committed `offset`.
	pub fn uncommit_offset(&mut self, offset: usize) {
		let n = self.players.len();
		if n > 0 {
			self.players.rotate_left(offset % n);
		}
		self.tactical_offset = offset;
	}

	pub fn strength(&self) -> u32 {
		self.players.iter().map(|p| p.skill as u32).sum()
	}

	pub fn average_skill(&self) -> f64 {
		if self.players.is_empty() {
			0.0
		} else {
			self.strength() as f64 / self.players.len() as f64
		}
	}

	pub fn contains(&self, id: PlayerId) -> bool {
		self.players.iter().chain(self.reserves.iter()).any(|p| p.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.players.is_empty() && self.reserves.is_empty()
	}

	pub fn number_holder(&self, number: u8, except: Option<PlayerId>) -> Option<&Player> {
		self.players
			.iter()
			.chain(self.reserves.iter())
			.find(|p| p.number == Some(number) && Some(p.id) != except)
	}

	pub fn fixed_players(&self) -> impl Iterator<Item = &Player> {
		self.players.iter().filter(|p| p.fixed)
	}

	pub fn renumber_display_order(&mut self) {
		for (i, player) in self.players.iter_mut().enumerate() {
			player.display_order = i as u32;
		}
		for (i, player) in self.reserves.iter_mut().enumerate() {
			player.display_order = i as u32;
		}
	}
}
