use serde::{Deserialize, Serialize};

use crate::config::RotationMode;
use crate::events::TeamSide;
use crate::roster::{Player, Roster, Team, TeamId};

mod balance;
mod queue;

pub use balance::{balance_teams, distribute_standard};
pub use queue::{disband_team, reorder_queue};

/// A player pulled from a waiting team to fill a short-handed challenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowedPlayer {
	pub player: Player,
	pub from_team: TeamId,
	pub from_team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationReport {
	pub outgoing_team: Team,
	pub incoming_team: Team,
	pub retained_players: Vec<Player>,
	pub borrowed_players: Vec<BorrowedPlayer>,
	pub queue_after: Vec<TeamId>,
	#[serde(default)]
	pub notes: Vec<String>,
}

impl RotationReport {
	pub fn is_borrowed(&self, player: &Player) -> bool {
		self.borrowed_players.iter().any(|b| b.player.id == player.id)
	}
}

/// Winner stays, loser goes to the back of the queue and the front of the
/// queue takes its side. Returns `None` and leaves the roster alone when
/// nobody is waiting.
pub fn rotate_teams(
	roster: &mut Roster,
	winner: TeamSide,
	court_size: usize,
	mode: RotationMode,
) -> Option<RotationReport> {
	if roster.queue.is_empty() {
		return None;
	}

	let loser_side = winner.other();
	let mut notes = Vec::new();

	let incoming = roster.queue.remove(0);
	let mut outgoing = std::mem::replace(roster.side_mut(loser_side), incoming);
	outgoing.tactical_offset = 0;
	let outgoing_team = outgoing.clone();
	if outgoing.is_empty() {
		notes.push(format!("{} had no players and left the rotation", outgoing.name));
	} else {
		roster.queue.push(outgoing);
	}

	let challenger = roster.side(loser_side);
	let needed = court_size.saturating_sub(challenger.players.len());
	let (sum, count) = (challenger.strength(), challenger.players.len());
	let target = roster.side(winner).average_skill();

	let borrowed = if needed == 0 {
		Vec::new()
	} else {
		match mode {
			RotationMode::Standard => borrow_in_order(&mut roster.queue, needed),
			RotationMode::Balanced => borrow_balanced(&mut roster.queue, needed, sum, count, target),
		}
	};

	let challenger = roster.side_mut(loser_side);
	if borrowed.len() < needed {
		notes.push(format!(
			"{} is {} player(s) short after borrowing",
			challenger.name,
			needed - borrowed.len()
		));
	}
	challenger.tactical_offset = 0;
	challenger.players.extend(borrowed.iter().map(|b| b.player.clone()));
	challenger.renumber_display_order();
	let incoming_team = challenger.clone();

	let before = roster.queue.len();
	roster.queue.retain(|t| !t.is_empty());
	if roster.queue.len() < before {
		notes.push(format!("{} emptied team(s) left the queue", before - roster.queue.len()));
	}
	for team in roster.queue.iter_mut() {
		team.tactical_offset = 0;
		team.renumber_display_order();
	}

	Some(RotationReport {
		outgoing_team,
		incoming_team,
		retained_players: roster.side(winner).fixed_players().cloned().collect(),
		borrowed_players: borrowed,
		queue_after: roster.queue.iter().map(|t| t.id).collect(),
		notes,
	})
}

/// What `rotate_teams` would do, without doing it.
pub fn preview_rotation(
	roster: &Roster,
	winner: TeamSide,
	court_size: usize,
	mode: RotationMode,
) -> Option<RotationReport> {
	let mut scratch = roster.clone();
	rotate_teams(&mut scratch, winner, court_size, mode)
}

/// Takes non-fixed players from the queue front to back, each donor giving
/// from the end of its lineup.
fn borrow_in_order(queue: &mut [Team], needed: usize) -> Vec<BorrowedPlayer> {
	let mut borrowed = Vec::new();
	for donor in queue.iter_mut() {
		while borrowed.len() < needed {
			let Some(index) = donor.players.iter().rposition(|p| !p.fixed) else { break };
			let player = donor.players.remove(index);
			borrowed.push(BorrowedPlayer {
				player,
				from_team: donor.id,
				from_team_name: donor.name.clone(),
			});
		}
		if borrowed.len() >= needed {
			break;
		}
	}
	borrowed
}

/// Repeatedly takes the candidate that brings the challenger's average
/// closest to `target`. Ties go to the lowest player id.
fn borrow_balanced(
	queue: &mut [Team],
	needed: usize,
	mut sum: u32,
	mut count: usize,
	target: f64,
) -> Vec<BorrowedPlayer> {
	let mut borrowed = Vec::new();
	while borrowed.len() < needed {
		let mut best: Option<(f64, u64, usize, usize)> = None;
		for (t, donor) in queue.iter().enumerate() {
			for (i, player) in donor.players.iter().enumerate() {
				if player.fixed {
					continue;
				}
				let projected = (sum + player.skill as u32) as f64 / (count + 1) as f64;
				let gap = (projected - target).abs();
				let better = match best {
					None => true,
					Some((best_gap, best_id, _, _)) => {
						gap.total_cmp(&best_gap).then(player.id.0.cmp(&best_id)).is_lt()
					}
				};
				if better {
					best = Some((gap, player.id.0, t, i));
				}
			}
		}

		let Some((_, _, t, i)) = best else { break };
		let donor = &mut queue[t];
		let player = donor.players.remove(i);
		sum += player.skill as u32;
		count += 1;
		borrowed.push(BorrowedPlayer {
			player,
			from_team: donor.id,
			from_team_name: donor.name.clone(),
		});
	}
	borrowed
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::roster::PlayerId;

	fn player(id: u64, skill: u8) -> Player {
		Player {
			id: PlayerId(id),
			name: format!("P{}", id),
			number: None,
			skill,
			fixed: false,
			profile_id: None,
			display_order: 0,
			original_index: id,
		}
	}

	fn team(id: u64, players: Vec<Player>) -> Team {
		let mut team = Team::new(TeamId(id), format!("T{}", id), "sky");
		team.players = players;
		team
	}

	fn ids(players: &[Player]) -> Vec<u64> {
		players.iter().map(|p| p.id.0).collect()
	}

	fn roster_with(a: Vec<Player>, b: Vec<Player>, queue: Vec<Team>) -> Roster {
		let mut roster = Roster::default();
		roster.team_a.players = a;
		roster.team_b.players = b;
		roster.queue = queue;
		roster
	}

	#[test]
	fn test_empty_queue_is_noop() {
		let mut roster = roster_with(vec![player(1, 5)], vec![player(2, 5)], vec![]);
		let before = roster.clone();
		assert!(rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Standard).is_none());
		assert_eq!(roster, before);
	}

	#[test]
	fn test_loser_goes_to_back_challenger_comes_in() {
		let mut roster = roster_with(
			vec![player(1, 5), player(2, 5)],
			vec![player(3, 5), player(4, 5)],
			vec![team(10, vec![player(5, 5), player(6, 5)]), team(11, vec![player(7, 5), player(8, 5)])],
		);

		let report = rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Standard).unwrap();
		assert_eq!(ids(&roster.team_a.players), vec![1, 2]);
		assert_eq!(roster.team_b.id, TeamId(10));
		assert_eq!(roster.queue.iter().map(|t| t.id.0).collect::<Vec<_>>(), vec![11, 2]);
		assert_eq!(report.outgoing_team.id, TeamId(2));
		assert_eq!(report.incoming_team.id, TeamId(10));
		assert!(report.borrowed_players.is_empty());
		assert_eq!(report.queue_after, vec![TeamId(11), TeamId(2)]);
	}

	#[test]
	fn test_losing_bench_travels_with_its_team() {
		let mut loser = team(2, vec![player(3, 5), player(4, 5)]);
		loser.reserves = vec![player(30, 5)];
		loser.has_active_bench = true;
		let mut roster = roster_with(vec![player(1, 5), player(2, 5)], vec![], vec![team(10, vec![player(5, 5), player(6, 5)])]);
		roster.team_b = loser;

		rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Standard).unwrap();
		assert_eq!(roster.team_b.id, TeamId(10));
		assert!(roster.team_b.reserves.is_empty());
		assert!(!roster.team_b.has_active_bench);

		let parked = roster.queue.last().unwrap();
		assert_eq!(parked.id, TeamId(2));
		assert_eq!(ids(&parked.reserves), vec![30]);
		assert!(parked.has_active_bench);
	}

	#[test]
	fn test_short_challenger_borrows_from_back_of_donor() {
		let mut roster = roster_with(
			vec![player(1, 5), player(2, 5), player(3, 5)],
			vec![player(4, 5), player(5, 5), player(6, 5)],
			vec![
				team(10, vec![player(7, 5)]),
				team(11, vec![player(8, 5), player(9, 5), player(20, 5)]),
			],
		);

		let report = rotate_teams(&mut roster, TeamSide::A, 3, RotationMode::Standard).unwrap();
		assert_eq!(ids(&roster.team_b.players), vec![7, 20, 9]);
		assert_eq!(report.borrowed_players.len(), 2);
		assert!(report.borrowed_players.iter().all(|b| b.from_team == TeamId(11)));
		assert!(report.is_borrowed(&player(20, 5)));
		assert!(!report.is_borrowed(&player(7, 5)));
	}

	#[test]
	fn test_fixed_players_are_not_borrowed() {
		let mut anchored = player(9, 5);
		anchored.fixed = true;
		let mut roster = roster_with(
			vec![player(1, 5), player(2, 5)],
			vec![player(3, 5), player(4, 5)],
			vec![team(10, vec![player(5, 5)]), team(11, vec![player(8, 5), anchored])],
		);

		rotate_teams(&mut roster, TeamSide::B, 2, RotationMode::Standard).unwrap();
		assert_eq!(ids(&roster.team_a.players), vec![5, 8]);
		let donor = roster.queue.iter().find(|t| t.id == TeamId(11)).unwrap();
		assert_eq!(ids(&donor.players), vec![9]);
	}

	#[test]
	fn test_emptied_donor_leaves_queue() {
		let mut roster = roster_with(
			vec![player(1, 5), player(2, 5)],
			vec![player(3, 5), player(4, 5)],
			vec![team(10, vec![player(5, 5)]), team(11, vec![player(6, 5)])],
		);

		let report = rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Standard).unwrap();
		assert_eq!(ids(&roster.team_b.players), vec![5, 6]);
		assert_eq!(report.queue_after, vec![TeamId(2)]);
		assert!(!report.notes.is_empty());
	}

	#[test]
	fn test_retained_players_are_winners_fixed() {
		let mut captain = player(1, 9);
		captain.fixed = true;
		let mut roster = roster_with(
			vec![captain, player(2, 5)],
			vec![player(3, 5), player(4, 5)],
			vec![team(10, vec![player(5, 5), player(6, 5)])],
		);

		let report = rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Standard).unwrap();
		assert_eq!(ids(&report.retained_players), vec![1]);
	}

	#[test]
	fn test_balanced_borrow_matches_winner_average() {
		let mut roster = roster_with(
			vec![player(1, 8), player(2, 8)],
			vec![player(3, 5), player(4, 5)],
			vec![
				team(10, vec![player(5, 8)]),
				team(11, vec![player(6, 2), player(7, 8), player(21, 4)]),
			],
		);

		rotate_teams(&mut roster, TeamSide::A, 2, RotationMode::Balanced).unwrap();
		assert_eq!(ids(&roster.team_b.players), vec![5, 7]);
	}

	#[test]
	fn test_preview_does_not_mutate() {
		let roster = roster_with(
			vec![player(1, 5)],
			vec![player(2, 5)],
			vec![team(10, vec![player(3, 5)])],
		);
		let report = preview_rotation(&roster, TeamSide::A, 1, RotationMode::Standard).unwrap();
		assert_eq!(report.incoming_team.id, TeamId(10));
		assert_eq!(roster.queue.len(), 1);
		assert_eq!(roster.team_b.id, TeamId(2));
	}
}
