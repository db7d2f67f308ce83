use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::CourtLimits;
use crate::roster::{
	sanitize_name, validate_skill, Container, DeletedPlayer, NewPlayer, Player, PlayerId,
	PlayerProfile, PlayerUpdate, ProfileId, Roster, RosterError, RosterSlot, Team, TeamRef,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub logo: Option<String>,
	#[serde(default)]
	pub clear_logo: bool,
	#[serde(default)]
	pub has_active_bench: Option<bool>,
}

enum Placement {
	Into(Container),
	NewQueueTeam,
}

fn check_number(team: &Team, number: Option<u8>, mover: Option<PlayerId>) -> Result<(), RosterError> {
	if let Some(n) = number {
		if team.number_holder(n, mover).is_some() {
			return Err(RosterError::DuplicateNumber { number: n, team: team.name.clone() });
		}
	}
	Ok(())
}

impl Roster {
	/// Validates a destination without touching the roster.
	fn placement(
		&self,
		slot: RosterSlot,
		number: Option<u8>,
		mover: Option<PlayerId>,
		limits: CourtLimits,
	) -> Result<Placement, RosterError> {
		match slot {
			RosterSlot::Lineup { team } => {
				let t = self.team(team).ok_or(RosterError::TeamNotFound(team))?;
				let already_here = mover.is_some_and(|id| t.players.iter().any(|p| p.id == id));
				if !already_here && t.players.len() >= limits.court_size {
					return Err(RosterError::CourtFull {
						team: t.name.clone(),
						capacity: limits.court_size,
					});
				}
				check_number(t, number, mover)?;
				Ok(Placement::Into(Container::Lineup(t.id)))
			}
			RosterSlot::Bench { team } => {
				let t = self.team(team).ok_or(RosterError::TeamNotFound(team))?;
				let already_here = mover.is_some_and(|id| t.reserves.iter().any(|p| p.id == id));
				if !already_here && t.reserves.len() >= limits.bench_limit {
					return Err(RosterError::BenchFull {
						team: t.name.clone(),
						limit: limits.bench_limit,
					});
				}
				check_number(t, number, mover)?;
				Ok(Placement::Into(Container::Bench(t.id)))
			}
			RosterSlot::NextInQueue => match self.queue.last() {
				Some(t)
					if t.players.len() < limits.court_size
						&& check_number(t, number, mover).is_ok()
						&& !mover.is_some_and(|id| t.contains(id)) =>
				{
					Ok(Placement::Into(Container::Lineup(t.id)))
				}
				_ => Ok(Placement::NewQueueTeam),
			},
			RosterSlot::Unassigned => Ok(Placement::Into(Container::Unassigned)),
		}
	}

	fn open(&mut self, placement: Placement) -> Container {
		match placement {
			Placement::Into(container) => container,
			Placement::NewQueueTeam => {
				let id = self.ids.team();
				let name = format!("Team {}", self.queue.len() + 3);
				self.queue.push(Team::new(id, name, Team::default_color(id)));
				Container::Lineup(id)
			}
		}
	}

	fn touch(&mut self, container: Container) {
		match container {
			Container::Lineup(id) => {
				if let Some(team) = self.team_by_id_mut(id) {
					team.tactical_offset = 0;
					team.renumber_display_order();
				}
			}
			Container::Bench(id) => {
				if let Some(team) = self.team_by_id_mut(id) {
					team.has_active_bench = true;
					team.renumber_display_order();
				}
			}
			Container::Unassigned => {
				for (i, player) in self.unassigned.iter_mut().enumerate() {
					player.display_order = i as u32;
				}
			}
		}
	}

	fn insert(&mut self, container: Container, index: Option<usize>, player: Player) {
		let target = match self.container_mut(container) {
			Some(_) => container,
			None => Container::Unassigned,
		};
		if let Some(list) = self.container_mut(target) {
			let at = index.map_or(list.len(), |i| i.min(list.len()));
			list.insert(at, player);
		}
		self.touch(target);
	}

	fn team_of(&self, container: Container) -> Option<&Team> {
		match container {
			Container::Lineup(id) | Container::Bench(id) => self.teams().find(|t| t.id == id),
			Container::Unassigned => None,
		}
	}

	pub fn add_player(&mut self, new: NewPlayer, target: RosterSlot, limits: CourtLimits) -> Result<PlayerId, RosterError> {
		let name = sanitize_name(&new.name)?;
		let skill = validate_skill(new.skill)?;
		let placement = self.placement(target, new.number, None, limits)?;

		let container = self.open(placement);
		let id = self.ids.player();
		let player = Player {
			id,
			name,
			number: new.number,
			skill,
			fixed: new.fixed,
			profile_id: new.profile_id,
			display_order: 0,
			original_index: id.0,
		};
		self.insert(container, None, player);
		Ok(id)
	}

	/// Creates players straight into the unassigned pool.
	pub fn create_unassigned(&mut self, entries: Vec<(String, u8)>) -> Vec<PlayerId> {
		entries
			.into_iter()
			.map(|(name, skill)| {
				let id = self.ids.player();
				self.unassigned.push(Player {
					id,
					name,
					number: None,
					skill,
					fixed: false,
					profile_id: None,
					display_order: 0,
					original_index: id.0,
				});
				id
			})
			.collect()
	}

	pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Result<(), RosterError> {
		let location = self.locate(id).ok_or(RosterError::PlayerNotFound(id))?;
		let name = update.name.as_deref().map(sanitize_name).transpose()?;
		let skill = update.skill.map(validate_skill).transpose()?;
		if let Some(team) = self.team_of(location.container) {
			check_number(team, update.number, Some(id))?;
		}

		let player = self.player_mut(id).ok_or(RosterError::PlayerNotFound(id))?;
		if let Some(name) = name {
			player.name = name;
		}
		if let Some(skill) = skill {
			player.skill = skill;
		}
		if update.clear_number {
			player.number = None;
		}
		if let Some(number) = update.number {
			player.number = Some(number);
		}
		if let Some(fixed) = update.fixed {
			player.fixed = fixed;
		}
		Ok(())
	}

	pub fn move_player(
		&mut self,
		id: PlayerId,
		to: RosterSlot,
		index: Option<usize>,
		limits: CourtLimits,
	) -> Result<(), RosterError> {
		let location = self.locate(id).ok_or(RosterError::PlayerNotFound(id))?;
		let number = self.player(id).and_then(|p| p.number);
		let placement = self.placement(to, number, Some(id), limits)?;

		let container = self.open(placement);
		let player = match self.container_mut(location.container) {
			Some(list) => list.remove(location.index),
			None => return Err(RosterError::PlayerNotFound(id)),
		};
		self.touch(location.container);
		self.insert(container, index, player);
		Ok(())
	}

	/// Soft delete: the player moves to the pending buffer with its position.
	pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RosterError> {
		let location = self.locate(id).ok_or(RosterError::PlayerNotFound(id))?;
		let player = match self.container_mut(location.container) {
			Some(list) => list.remove(location.index),
			None => return Err(RosterError::PlayerNotFound(id)),
		};
		self.touch(location.container);
		self.pending_deletions.push(DeletedPlayer {
			player: player.clone(),
			from: location.container,
			index: location.index,
		});
		Ok(player)
	}

	fn reinstate(&mut self, deleted: DeletedPlayer, limits: CourtLimits) -> Container {
		let fits = match deleted.from {
			Container::Lineup(id) => self
				.team(TeamRef::Id(id))
				.is_some_and(|t| t.players.len() < limits.court_size),
			Container::Bench(id) => self
				.team(TeamRef::Id(id))
				.is_some_and(|t| t.reserves.len() < limits.bench_limit),
			Container::Unassigned => true,
		};
		let (target, index) = if fits {
			(deleted.from, Some(deleted.index))
		} else {
			(Container::Unassigned, None)
		};
		self.insert(target, index, deleted.player);
		target
	}

	/// Restores the most recently removed player at its old position.
	pub fn undo_remove_player(&mut self, limits: CourtLimits) -> Result<(Player, Container), RosterError> {
		let deleted = self.pending_deletions.pop().ok_or(RosterError::NothingToRestore)?;
		let player = deleted.player.clone();
		let container = self.reinstate(deleted, limits);
		Ok((player, container))
	}

	/// Pulls a specific player out of the pending buffer without placing it.
	pub fn take_pending(&mut self, id: PlayerId) -> Option<DeletedPlayer> {
		let pos = self.pending_deletions.iter().rposition(|d| d.player.id == id)?;
		Some(self.pending_deletions.remove(pos))
	}

	pub fn commit_deletions(&mut self) -> usize {
		let count = self.pending_deletions.len();
		self.pending_deletions.clear();
		count
	}

	/// Swaps one court player with one bench player of the same team.
	pub fn substitute(&mut self, team: TeamRef, incoming: PlayerId, outgoing: PlayerId) -> Result<Team, RosterError> {
		let t = self.team_mut(team).ok_or(RosterError::TeamNotFound(team))?;
		let court = t
			.players
			.iter()
			.position(|p| p.id == outgoing)
			.ok_or_else(|| RosterError::NotOnCourt { player: outgoing, team: t.name.clone() })?;
		let bench = t
			.reserves
			.iter()
			.position(|p| p.id == incoming)
			.ok_or_else(|| RosterError::NotOnBench { player: incoming, team: t.name.clone() })?;

		std::mem::swap(&mut t.players[court], &mut t.reserves[bench]);
		t.renumber_display_order();
		Ok(t.clone())
	}

	pub fn update_team(&mut self, team: TeamRef, update: TeamUpdate) -> Result<(), RosterError> {
		let name = update.name.as_deref().map(sanitize_name).transpose()?;
		let t = self.team_mut(team).ok_or(RosterError::TeamNotFound(team))?;
		if update.has_active_bench == Some(false) && !t.reserves.is_empty() {
			return Err(RosterError::BenchInUse { team: t.name.clone() });
		}

		if let Some(name) = name {
			t.name = name;
		}
		if let Some(color) = update.color {
			t.color = color;
		}
		if update.clear_logo {
			t.logo = None;
		}
		if let Some(logo) = update.logo {
			t.logo = Some(logo);
		}
		if let Some(active) = update.has_active_bench {
			t.has_active_bench = active;
		}
		Ok(())
	}

	/// Links a player to a profile and takes over its name, skill and number.
	pub fn relink_profile(&mut self, id: PlayerId, profile: &PlayerProfile) -> Result<(), RosterError> {
		let location = self.locate(id).ok_or(RosterError::PlayerNotFound(id))?;
		let number = match self.team_of(location.container) {
			Some(team) => profile.number.filter(|&n| team.number_holder(n, Some(id)).is_none()),
			None => profile.number,
		};

		let player = self.player_mut(id).ok_or(RosterError::PlayerNotFound(id))?;
		player.name = profile.name.clone();
		player.skill = profile.skill.clamp(crate::roster::MIN_SKILL, crate::roster::MAX_SKILL);
		if number.is_some() {
			player.number = number;
		}
		player.profile_id = Some(profile.id.clone());
		Ok(())
	}

	/// Pushes the given profile set into linked players. Players whose
	/// profile is not in the set are unlinked. Returns how many changed.
	pub fn sync_profiles(&mut self, profiles: &[PlayerProfile]) -> usize {
		let by_id: HashMap<&ProfileId, &PlayerProfile> = profiles.iter().map(|p| (&p.id, p)).collect();
		let mut changed = 0;

		for team in [&mut self.team_a, &mut self.team_b].into_iter().chain(self.queue.iter_mut()) {
			for bench in [false, true] {
				let len = if bench { team.reserves.len() } else { team.players.len() };
				for i in 0..len {
					let (id, link) = {
						let p = if bench { &team.reserves[i] } else { &team.players[i] };
						(p.id, p.profile_id.clone())
					};
					let Some(link) = link else { continue };
					let update = by_id.get(&link).map(|profile| {
						let number = profile.number.filter(|&n| team.number_holder(n, Some(id)).is_none());
						(profile.name.clone(), profile.skill, number)
					});
					let p = if bench { &mut team.reserves[i] } else { &mut team.players[i] };
					if apply_profile(p, update) {
						changed += 1;
					}
				}
			}
		}

		for i in 0..self.unassigned.len() {
			let Some(link) = self.unassigned[i].profile_id.clone() else { continue };
			let update = by_id.get(&link).map(|profile| (profile.name.clone(), profile.skill, profile.number));
			if apply_profile(&mut self.unassigned[i], update) {
				changed += 1;
			}
		}

		changed
	}

	pub fn unlink_profile(&mut self, profile: &ProfileId) -> usize {
		let mut changed = 0;
		for team in [&mut self.team_a, &mut self.team_b].into_iter().chain(self.queue.iter_mut()) {
			for player in team.players.iter_mut().chain(team.reserves.iter_mut()) {
				if player.profile_id.as_ref() == Some(profile) {
					player.profile_id = None;
					changed += 1;
				}
			}
		}
		for player in self.unassigned.iter_mut() {
			if player.profile_id.as_ref() == Some(profile) {
				player.profile_id = None;
				changed += 1;
			}
		}
		changed
	}
}

fn apply_profile(player: &mut Player, update: Option<(String, u8, Option<u8>)>) -> bool {
	match update {
		Some((name, skill, number)) => {
			let skill = skill.clamp(crate::roster::MIN_SKILL, crate::roster::MAX_SKILL);
			let number_changes = number.is_some() && player.number != number;
			if player.name == name && player.skill == skill && !number_changes {
				return false;
			}
			player.name = name;
			player.skill = skill;
			if number_changes {
				player.number = number;
			}
			true
		}
		None => {
			player.profile_id = None;
			true
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::TeamSide;
	use crate::roster::TeamId;

	const LIMITS: CourtLimits = CourtLimits { court_size: 2, bench_limit: 1 };

	fn lineup(side: TeamSide) -> RosterSlot {
		RosterSlot::Lineup { team: side.into() }
	}

	fn bench(side: TeamSide) -> RosterSlot {
		RosterSlot::Bench { team: side.into() }
	}

	fn names(players: &[Player]) -> Vec<&str> {
		players.iter().map(|p| p.name.as_str()).collect()
	}

	#[test]
	fn test_add_player_respects_court_size() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();

		let err = roster.add_player(NewPlayer::new("Caio"), lineup(TeamSide::A), LIMITS).unwrap_err();
		assert!(matches!(err, RosterError::CourtFull { capacity: 2, .. }));
		assert_eq!(roster.team_a.players.len(), 2);
	}

	#[test]
	fn test_add_player_respects_bench_limit() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana"), bench(TeamSide::B), LIMITS).unwrap();
		assert!(roster.team_b.has_active_bench);

		let before = roster.clone();
		let err = roster.add_player(NewPlayer::new("Bia"), bench(TeamSide::B), LIMITS).unwrap_err();
		assert!(matches!(err, RosterError::BenchFull { limit: 1, .. }));
		assert_eq!(roster, before);
	}

	#[test]
	fn test_add_player_rejects_duplicate_number() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana").with_number(7), lineup(TeamSide::A), LIMITS).unwrap();
		let err = roster
			.add_player(NewPlayer::new("Bia").with_number(7), bench(TeamSide::A), LIMITS)
			.unwrap_err();
		assert!(matches!(err, RosterError::DuplicateNumber { number: 7, .. }));

		roster.add_player(NewPlayer::new("Caio").with_number(7), lineup(TeamSide::B), LIMITS).unwrap();
	}

	#[test]
	fn test_add_player_rejects_bad_input() {
		let mut roster = Roster::default();
		assert_eq!(
			roster.add_player(NewPlayer::new("  "), lineup(TeamSide::A), LIMITS),
			Err(RosterError::EmptyName)
		);
		assert_eq!(
			roster.add_player(NewPlayer::new("Ana").with_skill(12), lineup(TeamSide::A), LIMITS),
			Err(RosterError::InvalidSkill(12))
		);
		assert_eq!(roster.ids.peek_player(), PlayerId(1));
	}

	#[test]
	fn test_next_in_queue_creates_teams() {
		let mut roster = Roster::default();
		for name in ["Ana", "Bia", "Caio"] {
			roster.add_player(NewPlayer::new(name), RosterSlot::NextInQueue, LIMITS).unwrap();
		}
		assert_eq!(roster.queue.len(), 2);
		assert_eq!(roster.queue[0].name, "Team 3");
		assert_eq!(names(&roster.queue[0].players), vec!["Ana", "Bia"]);
		assert_eq!(names(&roster.queue[1].players), vec!["Caio"]);
	}

	#[test]
	fn test_ids_are_never_reused() {
		let mut roster = Roster::default();
		let first = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.remove_player(first).unwrap();
		roster.commit_deletions();
		let second = roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn test_remove_and_restore_keeps_index() {
		let mut roster = Roster::default();
		let limits = CourtLimits { court_size: 6, bench_limit: 2 };
		let ids: Vec<PlayerId> = ["Ana", "Bia", "Caio", "Duda"]
			.iter()
			.map(|n| roster.add_player(NewPlayer::new(*n), lineup(TeamSide::A), limits).unwrap())
			.collect();

		roster.remove_player(ids[1]).unwrap();
		assert_eq!(names(&roster.team_a.players), vec!["Ana", "Caio", "Duda"]);

		let (player, container) = roster.undo_remove_player(limits).unwrap();
		assert_eq!(player.name, "Bia");
		assert_eq!(container, Container::Lineup(TeamId(1)));
		assert_eq!(names(&roster.team_a.players), vec!["Ana", "Bia", "Caio", "Duda"]);
		assert_eq!(roster.undo_remove_player(limits), Err(RosterError::NothingToRestore));
	}

	#[test]
	fn test_restore_into_full_court_goes_to_pool() {
		let mut roster = Roster::default();
		let ana = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.remove_player(ana).unwrap();
		roster.add_player(NewPlayer::new("Caio"), lineup(TeamSide::A), LIMITS).unwrap();

		let (_, container) = roster.undo_remove_player(LIMITS).unwrap();
		assert_eq!(container, Container::Unassigned);
		assert_eq!(roster.team_a.players.len(), 2);
		assert_eq!(names(&roster.unassigned), vec!["Ana"]);
	}

	#[test]
	fn test_take_pending_picks_by_id() {
		let mut roster = Roster::default();
		let ana = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		let bia = roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.remove_player(ana).unwrap();
		roster.remove_player(bia).unwrap();

		let taken = roster.take_pending(ana).unwrap();
		assert_eq!(taken.player.name, "Ana");
		assert_eq!(roster.pending_deletions.len(), 1);
		assert!(roster.take_pending(ana).is_none());
		assert!(roster.player(ana).is_none());
	}

	#[test]
	fn test_move_player_between_teams() {
		let mut roster = Roster::default();
		let ana = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.move_player(ana, lineup(TeamSide::B), None, LIMITS).unwrap();
		assert!(roster.team_a.players.is_empty());
		assert_eq!(names(&roster.team_b.players), vec!["Ana"]);
	}

	#[test]
	fn test_move_player_within_lineup_reorders() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		let bia = roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.move_player(bia, lineup(TeamSide::A), Some(0), LIMITS).unwrap();
		assert_eq!(names(&roster.team_a.players), vec!["Bia", "Ana"]);
	}

	#[test]
	fn test_move_into_full_court_is_rejected() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		let caio = roster.add_player(NewPlayer::new("Caio"), lineup(TeamSide::B), LIMITS).unwrap();

		let before = roster.clone();
		let err = roster.move_player(caio, lineup(TeamSide::A), None, LIMITS).unwrap_err();
		assert!(matches!(err, RosterError::CourtFull { .. }));
		assert_eq!(roster, before);
	}

	#[test]
	fn test_substitute_swaps_in_place() {
		let mut roster = Roster::default();
		let ana = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.add_player(NewPlayer::new("Bia"), lineup(TeamSide::A), LIMITS).unwrap();
		let caio = roster.add_player(NewPlayer::new("Caio"), bench(TeamSide::A), LIMITS).unwrap();

		roster.substitute(TeamSide::A.into(), caio, ana).unwrap();
		assert_eq!(names(&roster.team_a.players), vec!["Caio", "Bia"]);
		assert_eq!(names(&roster.team_a.reserves), vec!["Ana"]);
	}

	#[test]
	fn test_substitute_unknown_bench_id_changes_nothing() {
		let mut roster = Roster::default();
		let ana = roster.add_player(NewPlayer::new("Ana"), lineup(TeamSide::A), LIMITS).unwrap();
		roster.add_player(NewPlayer::new("Caio"), bench(TeamSide::A), LIMITS).unwrap();

		let before = roster.clone();
		let err = roster.substitute(TeamSide::A.into(), PlayerId(999), ana).unwrap_err();
		assert!(matches!(err, RosterError::NotOnBench { .. }));
		assert_eq!(roster, before);
	}

	#[test]
	fn test_update_player_checks_number() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana").with_number(4), lineup(TeamSide::A), LIMITS).unwrap();
		let bia = roster.add_player(NewPlayer::new("Bia").with_number(5), lineup(TeamSide::A), LIMITS).unwrap();

		let err = roster
			.update_player(bia, PlayerUpdate { number: Some(4), ..PlayerUpdate::default() })
			.unwrap_err();
		assert!(matches!(err, RosterError::DuplicateNumber { number: 4, .. }));

		roster
			.update_player(bia, PlayerUpdate { skill: Some(9), fixed: Some(true), ..PlayerUpdate::default() })
			.unwrap();
		let bia = roster.player(bia).unwrap();
		assert_eq!(bia.skill, 9);
		assert!(bia.fixed);
	}

	#[test]
	fn test_update_team_bench_guard() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana"), bench(TeamSide::A), LIMITS).unwrap();
		let err = roster
			.update_team(TeamSide::A.into(), TeamUpdate { has_active_bench: Some(false), ..TeamUpdate::default() })
			.unwrap_err();
		assert!(matches!(err, RosterError::BenchInUse { .. }));

		roster
			.update_team(TeamSide::A.into(), TeamUpdate { name: Some(" Sharks ".to_string()), ..TeamUpdate::default() })
			.unwrap();
		assert_eq!(roster.team_a.name, "Sharks");
	}

	#[test]
	fn test_sync_profiles_updates_and_unlinks() {
		let mut roster = Roster::default();
		let ana = roster
			.add_player(NewPlayer::new("Ana").with_profile(ProfileId("p1".into())), lineup(TeamSide::A), LIMITS)
			.unwrap();
		let bia = roster
			.add_player(NewPlayer::new("Bia").with_profile(ProfileId("p2".into())), lineup(TeamSide::A), LIMITS)
			.unwrap();

		let profiles = vec![PlayerProfile::new(ProfileId("p1".into()), "Ana Lima", 8)];
		let changed = roster.sync_profiles(&profiles);
		assert_eq!(changed, 2);
		assert_eq!(roster.player(ana).unwrap().name, "Ana Lima");
		assert_eq!(roster.player(ana).unwrap().skill, 8);
		assert_eq!(roster.player(bia).unwrap().profile_id, None);
	}

	#[test]
	fn test_relink_profile_keeps_conflicting_number() {
		let mut roster = Roster::default();
		roster.add_player(NewPlayer::new("Ana").with_number(10), lineup(TeamSide::A), LIMITS).unwrap();
		let bia = roster.add_player(NewPlayer::new("Bia").with_number(3), lineup(TeamSide::A), LIMITS).unwrap();

		let mut profile = PlayerProfile::new(ProfileId("p9".into()), "Beatriz", 7);
		profile.number = Some(10);
		roster.relink_profile(bia, &profile).unwrap();

		let bia = roster.player(bia).unwrap();
		assert_eq!(bia.name, "Beatriz");
		assert_eq!(bia.number, Some(3));
		assert_eq!(bia.profile_id, Some(ProfileId("p9".into())));
	}
}
