use crate::events::PerTeam;
use crate::roster::{Player, Roster, Team};

fn take_buckets(roster: &mut Roster) -> Vec<Team> {
	let mut buckets = vec![roster.team_a.clone(), roster.team_b.clone()];
	buckets.append(&mut roster.queue);
	buckets
}

fn put_buckets(roster: &mut Roster, mut buckets: Vec<Team>) {
	for team in buckets.iter_mut() {
		team.tactical_offset = 0;
		team.renumber_display_order();
	}
	let mut rest = buckets.split_off(2);
	rest.retain(|t| !t.is_empty());
	roster.queue = rest;
	let mut courts = buckets.into_iter();
	if let (Some(a), Some(b)) = (courts.next(), courts.next()) {
		roster.team_a = a;
		roster.team_b = b;
	}
}

/// Pulls every non-fixed lineup player into a pool. Fixed players keep
/// their team as long as they fit on court.
fn pool_players(buckets: &mut [Team], court_size: usize) -> Vec<Player> {
	let mut pool = Vec::new();
	for team in buckets.iter_mut() {
		let players = std::mem::take(&mut team.players);
		for player in players {
			if player.fixed && team.players.len() < court_size {
				team.players.push(player);
			} else {
				pool.push(player);
			}
		}
	}
	pool
}

/// Spreads players over the court teams and the queue so skill totals end
/// up as even as possible, then trades players between the two court
/// teams while that narrows the gap. Same input, same output.
pub fn balance_teams(roster: &mut Roster, court_size: usize) -> PerTeam<u32> {
	let mut buckets = take_buckets(roster);
	let mut pool = pool_players(&mut buckets, court_size);
	pool.sort_by(|a, b| b.skill.cmp(&a.skill).then(a.id.cmp(&b.id)));

	let total = pool.len() + buckets.iter().map(|t| t.players.len()).sum::<usize>();
	let full_teams = if court_size == 0 { 0 } else { total / court_size };
	let preferred = full_teams.max(2).min(buckets.len());

	let mut overflow = Vec::new();
	for player in pool {
		let pick = |range: std::ops::Range<usize>, buckets: &[Team]| {
			range
				.filter(|&i| buckets[i].players.len() < court_size)
				.min_by_key(|&i| (buckets[i].strength(), i))
		};
		let choice = pick(0..preferred, &buckets).or_else(|| pick(0..buckets.len(), &buckets));
		match choice {
			Some(i) => buckets[i].players.push(player),
			None => overflow.push(player),
		}
	}

	swap_pass(&mut buckets, court_size);

	let strengths = PerTeam::new(buckets[0].strength(), buckets[1].strength());
	put_buckets(roster, buckets);
	roster.unassigned.extend(overflow);
	strengths
}

fn swap_pass(buckets: &mut [Team], court_size: usize) {
	let (left, right) = buckets.split_at_mut(1);
	let (a, b) = (&mut left[0], &mut right[0]);

	for _ in 0..court_size * court_size {
		let diff = a.strength() as i64 - b.strength() as i64;
		let mut best: Option<(i64, usize, usize)> = None;
		for (i, pa) in a.players.iter().enumerate() {
			if pa.fixed {
				continue;
			}
			for (j, pb) in b.players.iter().enumerate() {
				if pb.fixed {
					continue;
				}
				let delta = pa.skill as i64 - pb.skill as i64;
				let gap = (diff - 2 * delta).abs();
				if gap < diff.abs() && best.is_none_or(|(g, _, _)| gap < g) {
					best = Some((gap, i, j));
				}
			}
		}
		let Some((_, i, j)) = best else { break };
		std::mem::swap(&mut a.players[i], &mut b.players[j]);
	}
}

/// Lays players out in entry order: fixed players stay, everyone else
/// (including the unassigned pool) fills the court teams and then the
/// queue, opening new queue teams as needed.
pub fn distribute_standard(roster: &mut Roster, court_size: usize) {
	let mut buckets = take_buckets(roster);
	let mut pool = pool_players(&mut buckets, court_size);
	pool.append(&mut roster.unassigned);
	pool.sort_by(|a, b| a.original_index.cmp(&b.original_index).then(a.id.cmp(&b.id)));

	let mut current = 0;
	for player in pool {
		while current < buckets.len() && buckets[current].players.len() >= court_size {
			current += 1;
		}
		if current == buckets.len() {
			let id = roster.ids.team();
			let name = format!("Team {}", buckets.len() + 1);
			buckets.push(Team::new(id, name, Team::default_color(id)));
		}
		buckets[current].players.push(player);
	}

	put_buckets(roster, buckets);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::roster::{PlayerId, TeamId};

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

	fn ids(players: &[Player]) -> Vec<u64> {
		players.iter().map(|p| p.id.0).collect()
	}

	#[test]
	fn test_balance_evens_out_two_teams() {
		let mut roster = Roster::default();
		roster.team_a.players = vec![player(1, 10), player(2, 9), player(3, 8)];
		roster.team_b.players = vec![player(4, 1), player(5, 2), player(6, 3)];

		let strengths = balance_teams(&mut roster, 3);
		assert_eq!(strengths.a + strengths.b, 33);
		assert!((strengths.a as i64 - strengths.b as i64).abs() <= 1);
		assert_eq!(roster.team_a.players.len(), 3);
		assert_eq!(roster.team_b.players.len(), 3);
	}

	#[test]
	fn test_balance_is_deterministic() {
		let build = || {
			let mut roster = Roster::default();
			roster.team_a.players = vec![player(1, 7), player(2, 7), player(3, 4), player(4, 6)];
			roster.team_b.players = vec![player(5, 7), player(6, 3), player(7, 9), player(8, 2)];
			roster
		};
		let mut first = build();
		let mut second = build();
		balance_teams(&mut first, 4);
		balance_teams(&mut second, 4);
		assert_eq!(first, second);
	}

	#[test]
	fn test_balance_keeps_fixed_players() {
		let mut roster = Roster::default();
		let mut anchor = player(1, 10);
		anchor.fixed = true;
		roster.team_a.players = vec![anchor, player(2, 10)];
		roster.team_b.players = vec![player(3, 1), player(4, 1)];

		balance_teams(&mut roster, 2);
		assert!(roster.team_a.players.iter().any(|p| p.id == PlayerId(1)));
		assert!(roster.team_b.players.iter().any(|p| p.id == PlayerId(2)));
	}

	#[test]
	fn test_balance_fills_courts_before_queue() {
		let mut roster = Roster::default();
		roster.team_a.players = vec![player(1, 5), player(2, 5)];
		let mut waiting = Team::new(TeamId(10), "Waiting", "sky");
		waiting.players = vec![player(3, 5), player(4, 5)];
		roster.queue.push(waiting);

		balance_teams(&mut roster, 2);
		assert_eq!(roster.team_a.players.len(), 2);
		assert_eq!(roster.team_b.players.len(), 2);
		assert!(roster.queue.is_empty());
	}

	#[test]
	fn test_distribute_standard_restores_entry_order() {
		let mut roster = Roster::default();
		roster.team_a.players = vec![player(4, 5), player(2, 5)];
		roster.team_b.players = vec![player(3, 5)];
		roster.unassigned = vec![player(1, 5), player(5, 5)];

		distribute_standard(&mut roster, 2);
		assert_eq!(ids(&roster.team_a.players), vec![1, 2]);
		assert_eq!(ids(&roster.team_b.players), vec![3, 4]);
		assert_eq!(roster.queue.len(), 1);
		assert_eq!(ids(&roster.queue[0].players), vec![5]);
		assert!(roster.unassigned.is_empty());
	}

	#[test]
	fn test_distribute_standard_shrinks_courts() {
		let mut roster = Roster::default();
		roster.team_a.players = (1..=6).map(|i| player(i, 5)).collect();
		roster.team_b.players = (7..=12).map(|i| player(i, 5)).collect();

		distribute_standard(&mut roster, 4);
		assert_eq!(roster.team_a.players.len(), 4);
		assert_eq!(roster.team_b.players.len(), 4);
		assert_eq!(roster.queue.len(), 1);
		assert_eq!(ids(&roster.queue[0].players), vec![9, 10, 11, 12]);
	}

	#[test]
	fn test_distribute_keeps_fixed_in_place() {
		let mut roster = Roster::default();
		let mut anchor = player(3, 5);
		anchor.fixed = true;
		roster.team_b.players = vec![anchor];
		roster.team_a.players = vec![player(1, 5), player(2, 5)];

		distribute_standard(&mut roster, 2);
		assert_eq!(ids(&roster.team_a.players), vec![1, 2]);
		assert_eq!(ids(&roster.team_b.players), vec![3]);
	}
}
