use serde::{Deserialize, Serialize};

use crate::events::{PerTeam, TeamSide};

mod flags;
mod rules;

pub use flags::MatchFlags;
pub use rules::{CappedDeuce, DeucePolicy, SuddenDeathReset, WinByTwo};

pub const MAX_TIMEOUTS_PER_SET: u8 = 2;

/// The scoring half of the match state. Small and `Copy`, so a point can
/// keep the whole previous frame as its undo data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFrame {
	pub score: PerTeam<u32>,
	pub sets: PerTeam<u32>,
	pub timeouts: PerTeam<u8>,
	/// Whether each team has served at least once in the current set.
	pub served: PerTeam<bool>,
	pub serving: Option<TeamSide>,
	pub current_set: u32,
	pub swapped_sides: bool,
	pub in_sudden_death: bool,
	pub is_match_over: bool,
	pub match_winner: Option<TeamSide>,
	pub is_timer_running: bool,
}

impl Default for ScoreFrame {
	fn default() -> Self {
		Self {
			score: PerTeam::default(),
			sets: PerTeam::default(),
			timeouts: PerTeam::default(),
			served: PerTeam::default(),
			serving: None,
			current_set: 1,
			swapped_sides: false,
			in_sudden_death: false,
			is_match_over: false,
			match_winner: None,
			is_timer_running: false,
		}
	}
}

impl ScoreFrame {
	pub fn is_fresh(&self) -> bool {
		*self == ScoreFrame { is_timer_running: self.is_timer_running, ..ScoreFrame::default() }
	}

	pub fn give_serve(&mut self, side: TeamSide) {
		self.serving = Some(side);
		self.served.set(side, true);
	}

	/// Closes the current set for `winner` and prepares the next one.
	/// Returns true if the set also decided the match.
	pub fn close_set(&mut self, winner: TeamSide, sets_to_win: u32) -> bool {
		*self.sets.get_mut(winner) += 1;
		self.score = PerTeam::default();
		self.timeouts = PerTeam::default();
		self.served = PerTeam::default();
		self.in_sudden_death = false;
		self.give_serve(winner);

		if self.sets.get(winner) >= sets_to_win {
			self.is_match_over = true;
			self.match_winner = Some(winner);
			self.is_timer_running = false;
			true
		} else {
			self.current_set += 1;
			false
		}
	}
}
