use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::engine::LoggedAction;
use crate::events::{SkillTag, TeamSide};
use crate::history::MatchRecord;
use crate::roster::{PlayerId, ProfileId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
	#[serde(default)]
	pub matches_played: u32,
	#[serde(default)]
	pub matches_won: u32,
	#[serde(default)]
	pub total_points: u32,
	#[serde(default)]
	pub attacks: u32,
	#[serde(default)]
	pub blocks: u32,
	#[serde(default)]
	pub aces: u32,
	#[serde(default)]
	pub mvp_score: f32,
}

/// What one match adds to a profile's totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsDelta {
	pub matches_played: u32,
	pub matches_won: u32,
	pub total_points: u32,
	pub attacks: u32,
	pub blocks: u32,
	pub aces: u32,
	pub mvp_score: f32,
}

impl ProfileStats {
	pub fn merge(&mut self, delta: &StatsDelta) {
		self.matches_played += delta.matches_played;
		self.matches_won += delta.matches_won;
		self.total_points += delta.total_points;
		self.attacks += delta.attacks;
		self.blocks += delta.blocks;
		self.aces += delta.aces;
		self.mvp_score += delta.mvp_score;
	}

	pub fn win_rate(&self) -> f32 {
		if self.matches_played == 0 {
			0.0
		} else {
			self.matches_won as f32 / self.matches_played as f32
		}
	}
}

/// Per-profile deltas for one finished match. Only players linked to a
/// profile count; attributed points follow the match log.
pub fn calculate_match_deltas(record: &MatchRecord) -> BTreeMap<ProfileId, StatsDelta> {
	let mut deltas: BTreeMap<ProfileId, StatsDelta> = BTreeMap::new();
	let mut owners: HashMap<PlayerId, ProfileId> = HashMap::new();

	for side in TeamSide::both() {
		let team = record.team(side);
		for player in team.players.iter().chain(team.reserves.iter()) {
			let Some(profile) = &player.profile_id else { continue };
			owners.insert(player.id, profile.clone());
			let delta = deltas.entry(profile.clone()).or_default();
			delta.matches_played = 1;
			if side == record.winner {
				delta.matches_won = 1;
			}
		}
	}

	for entry in &record.log {
		let LoggedAction::Point { player: Some(player), skill, .. } = &entry.action else { continue };
		let Some(profile) = owners.get(player) else { continue };
		let delta = deltas.entry(profile.clone()).or_default();
		delta.total_points += 1;
		delta.mvp_score += 1.0;
		match skill {
			Some(SkillTag::Attack) => {
				delta.attacks += 1;
				delta.mvp_score += 0.5;
			}
			Some(SkillTag::Block) => {
				delta.blocks += 1;
				delta.mvp_score += 1.0;
			}
			Some(SkillTag::Ace) => {
				delta.aces += 1;
				delta.mvp_score += 1.0;
			}
			_ => {}
		}
	}

	deltas
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_adds() {
		let mut stats = ProfileStats { matches_played: 3, matches_won: 1, mvp_score: 2.5, ..ProfileStats::default() };
		stats.merge(&StatsDelta { matches_played: 1, matches_won: 1, mvp_score: 1.5, aces: 2, ..StatsDelta::default() });
		assert_eq!(stats.matches_played, 4);
		assert_eq!(stats.matches_won, 2);
		assert_eq!(stats.aces, 2);
		assert_eq!(stats.mvp_score, 4.0);
	}

	#[test]
	fn test_win_rate() {
		assert_eq!(ProfileStats::default().win_rate(), 0.0);
		let stats = ProfileStats { matches_played: 4, matches_won: 3, ..ProfileStats::default() };
		assert_eq!(stats.win_rate(), 0.75);
	}

	fn finished_record() -> MatchRecord {
		use crate::config::GameConfig;
		use crate::engine::{Command, MatchEngine};
		use crate::roster::{NewPlayer, RosterSlot};

		let config = GameConfig { max_sets: 1, has_tie_break: false, ..GameConfig::default() };
		let (mut engine, _handle) = MatchEngine::new(config, Some(3)).unwrap();
		for (name, side) in [("ana", TeamSide::A), ("bia", TeamSide::B)] {
			engine
				.dispatch(Command::AddPlayer {
					player: NewPlayer::new(name).with_profile(ProfileId(name.to_string())),
					target: RosterSlot::Lineup { team: side.into() },
				})
				.unwrap();
		}
		let ana = engine.state().roster.team_a.players[0].id;

		engine
			.dispatch(Command::AddPoint { team: TeamSide::A, player: Some(ana), skill: Some(SkillTag::Ace) })
			.unwrap();
		engine
			.dispatch(Command::AddPoint { team: TeamSide::A, player: Some(ana), skill: Some(SkillTag::Block) })
			.unwrap();
		for _ in 0..23 {
			engine.dispatch(Command::AddPoint { team: TeamSide::A, player: None, skill: None }).unwrap();
		}
		MatchRecord::from_state(engine.state()).unwrap()
	}

	#[test]
	fn test_deltas_follow_attributed_points() {
		let deltas = calculate_match_deltas(&finished_record());
		assert_eq!(deltas.len(), 2);

		let ana = deltas[&ProfileId("ana".to_string())];
		assert_eq!(ana.matches_played, 1);
		assert_eq!(ana.matches_won, 1);
		assert_eq!(ana.total_points, 2);
		assert_eq!((ana.aces, ana.blocks, ana.attacks), (1, 1, 0));
		assert_eq!(ana.mvp_score, 4.0);

		let bia = deltas[&ProfileId("bia".to_string())];
		assert_eq!(bia.matches_played, 1);
		assert_eq!(bia.matches_won, 0);
		assert_eq!(bia.total_points, 0);
	}

	#[test]
	fn test_unlinked_players_are_ignored() {
		let mut record = finished_record();
		for player in record.team_a.players.iter_mut() {
			player.profile_id = None;
		}
		let deltas = calculate_match_deltas(&record);
		assert_eq!(deltas.len(), 1);
		assert!(!deltas.contains_key(&ProfileId("ana".to_string())));
	}
}
