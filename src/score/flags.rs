use serde::Serialize;

use crate::config::GameConfig;
use crate::events::{PerTeam, TeamSide};
use crate::score::{DeucePolicy, ScoreFrame};

/// Flags derived from the live score. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchFlags {
	pub set_point: PerTeam<bool>,
	pub match_point: PerTeam<bool>,
	pub is_deuce: bool,
	pub in_sudden_death: bool,
	pub target_points: u32,
	pub sets_to_win: u32,
}

impl MatchFlags {
	pub fn compute(frame: &ScoreFrame, config: &GameConfig, policy: &dyn DeucePolicy) -> Self {
		let target = config.target_points(frame.current_set);
		let sets_to_win = config.sets_to_win();

		let mut set_point = PerTeam::new(false, false);
		let mut match_point = PerTeam::new(false, false);

		if !frame.is_match_over {
			for side in TeamSide::both() {
				let mut next = frame.score;
				*next.get_mut(side) += 1;
				let (next, sudden_death) = policy.after_rally(next, target, frame.in_sudden_death);
				let wins = policy.set_winner(next, target, sudden_death) == Some(side);
				set_point.set(side, wins);
				match_point.set(side, wins && frame.sets.get(side) + 1 >= sets_to_win);
			}
		}

		let is_deuce = !frame.is_match_over
			&& frame.score.a == frame.score.b
			&& frame.score.a >= target.saturating_sub(1);

		Self {
			set_point,
			match_point,
			is_deuce,
			in_sudden_death: frame.in_sudden_death,
			target_points: target,
			sets_to_win,
		}
	}

	pub fn is_set_point(&self, side: TeamSide) -> bool {
		self.set_point.get(side)
	}

	pub fn is_match_point(&self, side: TeamSide) -> bool {
		self.match_point.get(side)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::DeuceRule;
	use crate::score::{SuddenDeathReset, WinByTwo};

	fn frame(a: u32, b: u32) -> ScoreFrame {
		ScoreFrame {
			score: PerTeam::new(a, b),
			..ScoreFrame::default()
		}
	}

	#[test]
	fn test_set_point_at_24_23() {
		let config = GameConfig::default();
		let flags = MatchFlags::compute(&frame(24, 23), &config, &WinByTwo);
		assert!(flags.is_set_point(TeamSide::A));
		assert!(!flags.is_set_point(TeamSide::B));
		assert!(!flags.is_deuce);
	}

	#[test]
	fn test_deuce_at_24_all() {
		let config = GameConfig::default();
		let flags = MatchFlags::compute(&frame(24, 24), &config, &WinByTwo);
		assert!(flags.is_deuce);
		assert!(!flags.is_set_point(TeamSide::A));
		assert!(!flags.is_set_point(TeamSide::B));
	}

	#[test]
	fn test_match_point_needs_set_lead() {
		let config = GameConfig::default();
		let mut f = frame(24, 20);
		f.sets = PerTeam::new(2, 1);
		f.current_set = 4;
		let flags = MatchFlags::compute(&f, &config, &WinByTwo);
		assert!(flags.is_match_point(TeamSide::A));
		assert!(!flags.is_match_point(TeamSide::B));

		f.sets = PerTeam::new(1, 2);
		let flags = MatchFlags::compute(&f, &config, &WinByTwo);
		assert!(flags.is_set_point(TeamSide::A));
		assert!(!flags.is_match_point(TeamSide::A));
	}

	#[test]
	fn test_tie_break_target() {
		let config = GameConfig::default();
		let mut f = frame(14, 10);
		f.current_set = 5;
		f.sets = PerTeam::new(2, 2);
		let flags = MatchFlags::compute(&f, &config, &WinByTwo);
		assert_eq!(flags.target_points, 15);
		assert!(flags.is_match_point(TeamSide::A));
	}

	#[test]
	fn test_sudden_death_set_point() {
		let config = GameConfig {
			deuce: DeuceRule::SuddenDeath { points: 3 },
			..GameConfig::default()
		};
		let policy = SuddenDeathReset { points: 3 };
		let mut f = frame(2, 2);
		f.in_sudden_death = true;
		let flags = MatchFlags::compute(&f, &config, &policy);
		assert!(flags.in_sudden_death);
		assert!(flags.is_set_point(TeamSide::A));
		assert!(flags.is_set_point(TeamSide::B));
	}

	#[test]
	fn test_no_flags_after_match_over() {
		let config = GameConfig::default();
		let mut f = frame(0, 0);
		f.is_match_over = true;
		f.match_winner = Some(TeamSide::A);
		let flags = MatchFlags::compute(&f, &config, &WinByTwo);
		assert!(!flags.is_set_point(TeamSide::A));
		assert!(!flags.is_deuce);
	}
}
