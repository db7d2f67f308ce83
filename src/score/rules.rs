use crate::events::{PerTeam, TeamSide};

/// Decides how a set ends once the score gets close.
///
/// `after_rally` runs after every point and may rewrite the score (for
/// policies that restart the count) or switch sudden death on. `set_winner`
/// is then asked whether the adjusted score closes the set.
pub trait DeucePolicy: Send + Sync + std::fmt::Debug {
	fn after_rally(
		&self,
		score: PerTeam<u32>,
		target: u32,
		in_sudden_death: bool,
	) -> (PerTeam<u32>, bool);

	fn set_winner(&self, score: PerTeam<u32>, target: u32, in_sudden_death: bool) -> Option<TeamSide>;

	fn name(&self) -> &'static str;
}

fn leader(score: PerTeam<u32>) -> Option<(TeamSide, u32, u32)> {
	if score.a > score.b {
		Some((TeamSide::A, score.a, score.a - score.b))
	} else if score.b > score.a {
		Some((TeamSide::B, score.b, score.b - score.a))
	} else {
		None
	}
}

fn win_by_two(score: PerTeam<u32>, target: u32) -> Option<TeamSide> {
	let (side, points, lead) = leader(score)?;
	if points >= target && lead >= 2 { Some(side) } else { None }
}

/// Reach the target with a two-point lead, however long it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinByTwo;

impl DeucePolicy for WinByTwo {
	fn after_rally(&self, score: PerTeam<u32>, _target: u32, in_sudden_death: bool) -> (PerTeam<u32>, bool) {
		(score, in_sudden_death)
	}

	fn set_winner(&self, score: PerTeam<u32>, target: u32, _in_sudden_death: bool) -> Option<TeamSide> {
		win_by_two(score, target)
	}

	fn name(&self) -> &'static str {
		"win-by-two"
	}
}

/// Both teams at target-1 wipes the score; first to `points` with a lead
/// takes the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuddenDeathReset {
	pub points: u32,
}

impl DeucePolicy for SuddenDeathReset {
	fn after_rally(&self, score: PerTeam<u32>, target: u32, in_sudden_death: bool) -> (PerTeam<u32>, bool) {
		let threshold = target.saturating_sub(1);
		if !in_sudden_death && score.a >= threshold && score.b >= threshold {
			return (PerTeam::default(), true);
		}
		(score, in_sudden_death)
	}

	fn set_winner(&self, score: PerTeam<u32>, target: u32, in_sudden_death: bool) -> Option<TeamSide> {
		if !in_sudden_death {
			return win_by_two(score, target);
		}
		let (side, points, _) = leader(score)?;
		if points >= self.points { Some(side) } else { None }
	}

	fn name(&self) -> &'static str {
		"sudden-death"
	}
}

/// Win by two until the teams are level at `cap`; after that one point
/// decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedDeuce {
	pub cap: u32,
}

impl DeucePolicy for CappedDeuce {
	fn after_rally(&self, score: PerTeam<u32>, _target: u32, in_sudden_death: bool) -> (PerTeam<u32>, bool) {
		let tied_at_cap = score.a == score.b && score.a >= self.cap;
		(score, in_sudden_death || tied_at_cap)
	}

	fn set_winner(&self, score: PerTeam<u32>, target: u32, in_sudden_death: bool) -> Option<TeamSide> {
		if in_sudden_death {
			return leader(score).map(|(side, _, _)| side);
		}
		win_by_two(score, target)
	}

	fn name(&self) -> &'static str {
		"capped"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn s(a: u32, b: u32) -> PerTeam<u32> {
		PerTeam::new(a, b)
	}

	#[test]
	fn test_win_by_two_needs_lead() {
		let policy = WinByTwo;
		assert_eq!(policy.set_winner(s(25, 24), 25, false), None);
		assert_eq!(policy.set_winner(s(26, 24), 25, false), Some(TeamSide::A));
		assert_eq!(policy.set_winner(s(25, 23), 25, false), Some(TeamSide::A));
		assert_eq!(policy.set_winner(s(30, 32), 25, false), Some(TeamSide::B));
	}

	#[test]
	fn test_win_by_two_below_target() {
		assert_eq!(WinByTwo.set_winner(s(20, 10), 25, false), None);
	}

	#[test]
	fn test_sudden_death_reset_at_threshold() {
		let policy = SuddenDeathReset { points: 3 };
		let (score, sd) = policy.after_rally(s(24, 23), 25, false);
		assert_eq!(score, s(24, 23));
		assert!(!sd);

		let (score, sd) = policy.after_rally(s(24, 24), 25, false);
		assert_eq!(score, s(0, 0));
		assert!(sd);
	}

	#[test]
	fn test_sudden_death_winner() {
		let policy = SuddenDeathReset { points: 3 };
		assert_eq!(policy.set_winner(s(2, 2), 25, true), None);
		assert_eq!(policy.set_winner(s(3, 2), 25, true), Some(TeamSide::A));
		assert_eq!(policy.set_winner(s(1, 3), 25, true), Some(TeamSide::B));
	}

	#[test]
	fn test_sudden_death_does_not_reset_twice() {
		let policy = SuddenDeathReset { points: 3 };
		let (score, sd) = policy.after_rally(s(24, 24), 25, true);
		assert_eq!(score, s(24, 24));
		assert!(sd);
	}

	#[test]
	fn test_capped_single_point_decides() {
		let policy = CappedDeuce { cap: 27 };
		let (_, sd) = policy.after_rally(s(26, 26), 25, false);
		assert!(!sd);
		let (_, sd) = policy.after_rally(s(27, 27), 25, false);
		assert!(sd);

		assert_eq!(policy.set_winner(s(28, 27), 25, true), Some(TeamSide::A));
		assert_eq!(policy.set_winner(s(27, 26), 25, false), None);
	}
}
