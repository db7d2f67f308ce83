use std::sync::{mpsc, Arc};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::engine::{Command, LogEntry, LoggedAction, MatchState, MatchView, PriorMatch, Rejection};
use crate::events::{EngineEvent, MatchId, PerTeam, SetHistory, SkillTag, TeamSide};
use crate::history::MatchRecord;
use crate::logging;
use crate::roster::{
	parse_generated_line, Container, NewPlayer, PlayerId, PlayerProfile, PlayerUpdate, ProfileId, ProfileStore,
	RosterError, RosterSlot, RotationDirection, TeamId, TeamRef, TeamUpdate,
};
use crate::rotation::{self, preview_rotation};
use crate::score::{DeucePolicy, MatchFlags, ScoreFrame, MAX_TIMEOUTS_PER_SET};
use crate::sync::{generate_session_code, StateSnapshot, SyncRole};

/// Single writer for one device's match. Commands are applied one at a
/// time and either fully succeed or leave the state untouched.
pub struct MatchEngine {
	pub(super) state: MatchState,
	pub(super) policy: Arc<dyn DeucePolicy>,
	custom_policy: bool,
	pub(super) event_tx: mpsc::Sender<EngineEvent>,
	rng: StdRng,
	version: u64,
}

pub struct EngineHandle {
	pub event_rx: mpsc::Receiver<EngineEvent>,
	pub match_id: MatchId,
}

impl MatchEngine {
	pub fn new(config: GameConfig, seed: Option<u64>) -> Result<(Self, EngineHandle), Rejection> {
		config.validate().map_err(Rejection::InvalidConfig)?;
		let (event_tx, event_rx) = mpsc::channel();

		let mut rng = match seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => StdRng::from_os_rng(),
		};

		let match_id = MatchId(rng.random());
		let policy: Arc<dyn DeucePolicy> = Arc::from(config.deuce.policy());
		logging::set_match_id(match_id.0);
		logging::set_set_num(1);

		let engine = Self {
			state: MatchState::new(match_id, config),
			policy,
			custom_policy: false,
			event_tx,
			rng,
			version: 0,
		};

		Ok((engine, EngineHandle { event_rx, match_id }))
	}

	/// Replaces the deuce policy picked from the config. The custom policy
	/// survives settings changes.
	pub fn with_deuce_policy(mut self, policy: Arc<dyn DeucePolicy>) -> Self {
		self.policy = policy;
		self.custom_policy = true;
		self
	}

	pub fn state(&self) -> &MatchState {
		&self.state
	}

	pub fn flags(&self) -> MatchFlags {
		MatchFlags::compute(&self.state.frame, &self.state.config, self.policy.as_ref())
	}

	pub fn view(&self) -> MatchView<'_> {
		MatchView { state: &self.state, flags: self.flags() }
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn policy_name(&self) -> &'static str {
		self.policy.name()
	}

	pub fn can_undo(&self) -> bool {
		!self.state.match_log.is_empty() && !self.state.sync.is_spectator()
	}

	pub fn dispatch(&mut self, command: Command) -> Result<MatchView<'_>, Rejection> {
		let name = command.name();
		if self.state.sync.is_spectator() {
			logging::engine::rejected(name, "read-only spectator");
			return Err(Rejection::ReadOnly);
		}

		match self.apply(command) {
			Ok(()) => {
				self.after_transition();
				Ok(self.view())
			}
			Err(e) => {
				logging::engine::rejected(name, &e.to_string());
				Err(e)
			}
		}
	}

	/// One second of match time. Never touches scoring.
	pub fn tick(&mut self) -> bool {
		if self.state.frame.is_timer_running && !self.state.sync.is_spectator() {
			self.state.match_duration_seconds += 1;
			true
		} else {
			false
		}
	}

	/// Applies every tick waiting on a clock channel.
	pub fn drain_ticks(&mut self, ticks: &mpsc::Receiver<()>) -> u32 {
		let mut applied = 0;
		while ticks.try_recv().is_ok() {
			if self.tick() {
				applied += 1;
			}
		}
		applied
	}

	fn apply(&mut self, command: Command) -> Result<(), Rejection> {
		match command {
			Command::AddPoint { team, player, skill } => self.add_point(team, player, skill),
			Command::SubtractPoint { team } => self.subtract_point(team),
			Command::SetServer { team } => self.set_server(team),
			Command::UseTimeout { team } => self.use_timeout(team),
			Command::Undo => self.undo(),
			Command::ToggleSides => {
				self.state.frame.swapped_sides = !self.state.frame.swapped_sides;
				self.record(LoggedAction::SideSwap);
				Ok(())
			}
			Command::ToggleTimer => self.toggle_timer(),
			Command::ResetTimer => {
				self.set_duration(0);
				Ok(())
			}
			Command::SetMatchDuration { seconds } => {
				self.set_duration(seconds);
				Ok(())
			}
			Command::RotateTeams => self.rotate_teams(),
			Command::ManualRotate { team, direction } => self.manual_rotate(team, direction),
			Command::CommitRotation { team } => {
				let t = self.state.roster.side_mut(team);
				let offset = t.tactical_offset;
				t.commit_offset();
				self.record(LoggedAction::CommitRotation { team, offset });
				Ok(())
			}
			Command::SubstitutePlayers { team, incoming, outgoing } => self.substitute(team, incoming, outgoing),
			Command::BalanceTeams => self.balance_teams(),
			Command::ReorderQueue { from, to } => self.roster_edit("reorder queue", |engine| {
				rotation::reorder_queue(&mut engine.state.roster, from, to)
			}),
			Command::DisbandTeam { team } => self.disband_team(team),
			Command::AddPlayer { player, target } => self.add_player(player, target),
			Command::GeneratePlayers { text } => self.generate_players(&text),
			Command::RemovePlayer { player } => self.remove_player(player),
			Command::UndoRemovePlayer => self.undo_remove_player(),
			Command::CommitDeletions => {
				let count = self.state.roster.commit_deletions();
				logging::roster::deletions_committed(count);
				Ok(())
			}
			Command::MovePlayer { player, to, index } => self.move_player(player, to, index),
			Command::UpdatePlayer { player, update } => self.update_player(player, update),
			Command::UpdateTeam { team, update } => self.update_team(team, update),
			Command::RelinkProfile { player, profile } => self.relink_profile(player, profile),
			Command::SyncProfiles { profiles } => self.roster_edit("sync profiles", |engine| {
				engine.state.roster.sync_profiles(&profiles);
				Ok(())
			}),
			Command::ApplySettings { config, reset } => self.apply_settings(config, reset),
			Command::ResetMatch => {
				let config = self.state.config.clone();
				self.reset_with(config);
				Ok(())
			}
			Command::LoadState { state } => self.load_state(*state),
		}
	}

	pub(super) fn record(&mut self, action: LoggedAction) {
		self.state.match_log.push(LogEntry::now(action));
	}

	pub(super) fn emit(&self, event: EngineEvent) {
		let _ = self.event_tx.send(event);
	}

	fn after_transition(&mut self) {
		self.version += 1;
		logging::set_set_num(self.state.frame.current_set);
		if let Some(snapshot) = self.snapshot() {
			self.emit(EngineEvent::SnapshotReady(Box::new(snapshot)));
		}
	}

	pub(super) fn refresh_policy(&mut self) {
		if !self.custom_policy {
			self.policy = Arc::from(self.state.config.deuce.policy());
		}
	}

	fn add_point(
		&mut self,
		team: TeamSide,
		player: Option<PlayerId>,
		skill: Option<SkillTag>,
	) -> Result<(), Rejection> {
		if self.state.frame.is_match_over {
			return Err(Rejection::MatchOver);
		}

		let (player, skill) = if self.state.config.enable_player_stats {
			(player, skill)
		} else {
			(None, None)
		};
		let player = match player {
			Some(id) if self.state.roster.player(id).is_none() => {
				logging::engine::guard(&format!("point credited to unknown player {}", id));
				None
			}
			other => other,
		};

		let prev = self.state.frame;
		let config = &self.state.config;
		let target = config.target_points(prev.current_set);
		let sets_to_win = config.sets_to_win();
		let swap_interval = config.swap_interval(prev.current_set);

		let mut frame = prev;
		frame.is_timer_running = true;
		*frame.score.get_mut(team) += 1;
		let (score, sudden_death) = self.policy.after_rally(frame.score, target, frame.in_sudden_death);
		let entered_sudden_death = sudden_death && !frame.in_sudden_death;
		frame.score = score;
		frame.in_sudden_death = sudden_death;

		let mut closed_set = None;
		let mut auto_rotated = false;
		let shown_score;

		match self.policy.set_winner(frame.score, target, frame.in_sudden_death) {
			Some(winner) => {
				let record = SetHistory {
					set_number: frame.current_set,
					score_a: frame.score.a,
					score_b: frame.score.b,
					winner,
				};
				shown_score = frame.score;
				frame.close_set(winner, sets_to_win);
				closed_set = Some(record);
			}
			None => {
				if frame.serving != Some(team) {
					if frame.served.get(team) {
						self.state.roster.side_mut(team).rotate(RotationDirection::Clockwise);
						auto_rotated = true;
					}
					frame.give_serve(team);
				}
				if let Some(interval) = swap_interval {
					let total = frame.score.a + frame.score.b;
					if total > 0 && total % interval == 0 {
						frame.swapped_sides = !frame.swapped_sides;
					}
				}
				shown_score = frame.score;
			}
		}

		let match_won = frame.is_match_over && !prev.is_match_over;
		let prev_report = if match_won {
			self.state.rotation_report.take().map(Box::new)
		} else {
			None
		};

		self.state.frame = frame;
		if let Some(record) = closed_set {
			self.state.history.push(record);
		}
		self.record(LoggedAction::Point {
			team,
			player,
			skill,
			prev,
			closed_set,
			auto_rotated,
			prev_report,
		});

		let scorer = player.and_then(|id| self.state.roster.player(id)).map(|p| p.name.clone());
		logging::engine::point(self.state.team_name(team), shown_score.a, shown_score.b, scorer.as_deref());
		self.emit(EngineEvent::PointScored { team, score: shown_score, player });

		if entered_sudden_death {
			logging::engine::sudden_death(frame.score.a, frame.score.b);
			self.emit(EngineEvent::SuddenDeath { set_number: prev.current_set });
		}

		if let Some(record) = closed_set {
			logging::engine::set_won(
				record.set_number,
				self.state.team_name(record.winner),
				record.score_a,
				record.score_b,
			);
			self.emit(EngineEvent::SetCompleted(record));
		}

		if match_won {
			self.finish_match();
		}

		Ok(())
	}

	fn finish_match(&mut self) {
		let Some(winner) = self.state.frame.match_winner else { return };
		let limits = self.state.config.limits();
		self.state.rotation_report = preview_rotation(
			&self.state.roster,
			winner,
			limits.court_size,
			self.state.config.rotation_mode,
		);

		logging::engine::match_over(
			self.state.team_name(winner),
			self.state.frame.sets.a,
			self.state.frame.sets.b,
		);
		if let Some(record) = MatchRecord::from_state(&self.state) {
			self.emit(EngineEvent::MatchCompleted(Box::new(record)));
		}
	}

	fn subtract_point(&mut self, team: TeamSide) -> Result<(), Rejection> {
		if self.state.frame.score.get(team) == 0 {
			let just_closed = matches!(
				self.state.match_log.last(),
				Some(LogEntry { action: LoggedAction::Point { team: t, closed_set: Some(_), .. }, .. }) if *t == team
			);
			if just_closed {
				return self.undo();
			}
			return Err(Rejection::ScoreAtZero(team));
		}
		if self.state.frame.is_match_over {
			return Err(Rejection::MatchOver);
		}

		let prev = self.state.frame;
		*self.state.frame.score.get_mut(team) -= 1;
		self.record(LoggedAction::PointCorrection { team, prev });
		Ok(())
	}

	fn set_server(&mut self, team: TeamSide) -> Result<(), Rejection> {
		if self.state.frame.is_match_over {
			return Err(Rejection::MatchOver);
		}
		let frame = &mut self.state.frame;
		let action = LoggedAction::ServeChange {
			prev: frame.serving,
			prev_served: frame.served.get(team),
			next: team,
		};
		frame.give_serve(team);
		self.record(action);
		Ok(())
	}

	fn use_timeout(&mut self, team: TeamSide) -> Result<(), Rejection> {
		if self.state.frame.is_match_over {
			return Err(Rejection::MatchOver);
		}
		let prev = self.state.frame.timeouts.get(team);
		if prev >= MAX_TIMEOUTS_PER_SET {
			return Err(Rejection::TimeoutsExhausted(team));
		}
		self.state.frame.timeouts.set(team, prev + 1);
		self.record(LoggedAction::Timeout { team, prev });
		Ok(())
	}

	fn toggle_timer(&mut self) -> Result<(), Rejection> {
		let running = self.state.frame.is_timer_running;
		if !running && self.state.frame.is_match_over {
			return Err(Rejection::MatchOver);
		}
		self.state.frame.is_timer_running = !running;
		self.record(LoggedAction::TimerToggle { prev_running: running });
		Ok(())
	}

	fn set_duration(&mut self, seconds: u64) {
		let prev_seconds = self.state.match_duration_seconds;
		self.state.match_duration_seconds = seconds;
		self.record(LoggedAction::TimerSet { prev_seconds });
	}

	fn undo(&mut self) -> Result<(), Rejection> {
		let entry = self.state.match_log.pop().ok_or(Rejection::NothingToUndo)?;
		let kind = entry.kind();
		self.revert(entry);
		logging::engine::undo(&kind.to_string());
		self.emit(EngineEvent::Undone { kind });
		Ok(())
	}

	/// Winner stays, loser joins the queue, and a fresh match begins. The
	/// finished match is parked in the log entry so undo can bring it back.
	fn rotate_teams(&mut self) -> Result<(), Rejection> {
		let winner = self.state.frame.match_winner.ok_or(Rejection::MatchInProgress)?;
		let limits = self.state.config.limits();

		let prior = PriorMatch {
			match_id: self.state.match_id,
			frame: self.state.frame,
			history: std::mem::take(&mut self.state.history),
			log: std::mem::take(&mut self.state.match_log),
			roster: self.state.roster.snapshot(),
			rotation_report: self.state.rotation_report.take(),
			duration: self.state.match_duration_seconds,
		};

		let report = rotation::rotate_teams(
			&mut self.state.roster,
			winner,
			limits.court_size,
			self.state.config.rotation_mode,
		);

		self.state.match_id = MatchId(self.rng.random());
		self.state.frame = ScoreFrame::default();
		self.state.match_duration_seconds = 0;
		logging::set_match_id(self.state.match_id.0);

		match &report {
			Some(r) => {
				logging::rotation::rotated(&r.outgoing_team.name, &r.incoming_team.name, r.borrowed_players.len());
				for note in &r.notes {
					logging::rotation::note(note);
				}
			}
			None => logging::rotation::note("queue empty, teams unchanged"),
		}

		let report = report.map(Box::new);
		self.record(LoggedAction::Rotation { prior: Box::new(prior), report: report.clone() });
		if let Some(report) = report {
			self.emit(EngineEvent::TeamsRotated(report));
		}
		Ok(())
	}

	fn manual_rotate(&mut self, team: TeamSide, direction: RotationDirection) -> Result<(), Rejection> {
		let t = self.state.roster.side_mut(team);
		if t.players.len() < 2 {
			return Err(RosterError::NotEnoughPlayers { team: t.name.clone() }.into());
		}
		t.shift_offset(direction);
		self.record(LoggedAction::ManualRotation { team, direction });
		Ok(())
	}

	fn substitute(&mut self, team: TeamRef, incoming: PlayerId, outgoing: PlayerId) -> Result<(), Rejection> {
		let t = self.state.roster.substitute(team, incoming, outgoing)?;
		let name_of = |id: PlayerId| {
			t.players
				.iter()
				.chain(t.reserves.iter())
				.find(|p| p.id == id)
				.map(|p| p.name.clone())
				.unwrap_or_default()
		};
		logging::roster::substitution(&t.name, &name_of(incoming), &name_of(outgoing));
		self.record(LoggedAction::Substitution { team: t.id, incoming, outgoing });
		Ok(())
	}

	/// Snapshots the roster, runs `edit`, and logs the snapshot if the edit
	/// went through.
	fn roster_edit<F>(&mut self, label: &str, edit: F) -> Result<(), Rejection>
	where
		F: FnOnce(&mut Self) -> Result<(), RosterError>,
	{
		let before = Box::new(self.state.roster.snapshot());
		edit(self)?;
		self.record(LoggedAction::RosterEdit { label: label.to_string(), before });
		Ok(())
	}

	fn balance_teams(&mut self) -> Result<(), Rejection> {
		let court_size = self.state.config.limits().court_size;
		self.roster_edit("balance teams", |engine| {
			let strengths = rotation::balance_teams(&mut engine.state.roster, court_size);
			logging::rotation::balanced(strengths.a, strengths.b);
			Ok(())
		})
	}

	fn disband_team(&mut self, team: TeamId) -> Result<(), Rejection> {
		self.roster_edit("disband team", |engine| {
			let disbanded = rotation::disband_team(&mut engine.state.roster, team)?;
			logging::rotation::note(&format!("{} disbanded", disbanded.name));
			Ok(())
		})
	}

	fn add_player(&mut self, player: NewPlayer, target: RosterSlot) -> Result<(), Rejection> {
		let limits = self.state.config.limits();
		self.roster_edit("add player", |engine| {
			let roster = &mut engine.state.roster;
			let id = roster.add_player(player, target, limits)?;
			if let Some(location) = roster.locate(id) {
				let team = match location.container {
					Container::Lineup(t) | Container::Bench(t) => roster.team_name(t),
					Container::Unassigned => "unassigned".to_string(),
				};
				let name = roster.player(id).map(|p| p.name.clone()).unwrap_or_default();
				logging::roster::player_added(&name, &team);
			}
			Ok(())
		})
	}

	fn generate_players(&mut self, text: &str) -> Result<(), Rejection> {
		let entries: Vec<(String, u8)> = text.lines().filter_map(parse_generated_line).collect();
		if entries.is_empty() {
			return Err(RosterError::EmptyName.into());
		}
		let court_size = self.state.config.limits().court_size;
		self.roster_edit("generate players", |engine| {
			let roster = &mut engine.state.roster;
			let ids = roster.create_unassigned(entries);
			rotation::distribute_standard(roster, court_size);
			logging::roster::player_added(&format!("{} generated", ids.len()), "standard layout");
			Ok(())
		})
	}

	fn remove_player(&mut self, id: PlayerId) -> Result<(), Rejection> {
		let index = self.state.roster.locate(id).map(|l| l.index).unwrap_or_default();
		let before = Box::new(self.state.roster.snapshot());
		let player = self.state.roster.remove_player(id)?;
		logging::roster::player_removed(&player.name, index);
		self.record(LoggedAction::PlayerRemoved { player, before });
		Ok(())
	}

	fn undo_remove_player(&mut self) -> Result<(), Rejection> {
		let limits = self.state.config.limits();
		let before = Box::new(self.state.roster.snapshot());
		let deleted = self.state.roster.pending_deletions.last().cloned();
		let (player, _) = self.state.roster.undo_remove_player(limits)?;
		let index = self.state.roster.locate(player.id).map(|l| l.index).unwrap_or_default();
		logging::roster::player_restored(&player.name, index);
		if let Some(deleted) = deleted {
			self.record(LoggedAction::PlayerRestored { deleted, before });
		}
		Ok(())
	}

	fn move_player(&mut self, id: PlayerId, to: RosterSlot, index: Option<usize>) -> Result<(), Rejection> {
		let limits = self.state.config.limits();
		self.roster_edit("move player", |engine| engine.state.roster.move_player(id, to, index, limits))
	}

	fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Result<(), Rejection> {
		self.roster_edit("update player", |engine| engine.state.roster.update_player(id, update))
	}

	fn update_team(&mut self, team: TeamRef, update: TeamUpdate) -> Result<(), Rejection> {
		self.roster_edit("update team", |engine| engine.state.roster.update_team(team, update))
	}

	fn relink_profile(&mut self, id: PlayerId, profile: PlayerProfile) -> Result<(), Rejection> {
		self.roster_edit("relink profile", |engine| {
			engine.state.roster.relink_profile(id, &profile)?;
			logging::roster::profile("link", &profile.id.0);
			Ok(())
		})
	}

	fn apply_settings(&mut self, config: GameConfig, reset: bool) -> Result<(), Rejection> {
		config.validate().map_err(Rejection::InvalidConfig)?;
		if reset {
			self.reset_with(config);
			return Ok(());
		}
		if self.state.has_started() && self.state.config.scoring_differs(&config) {
			return Err(Rejection::ConfigLocked);
		}

		let layout_changes = self.state.config.limits() != config.limits();
		let roster = layout_changes.then(|| Box::new(self.state.roster.snapshot()));
		let prev = Box::new(std::mem::replace(&mut self.state.config, config));
		if layout_changes {
			self.relayout();
		}
		self.refresh_policy();
		self.record(LoggedAction::Settings { prev, roster });
		Ok(())
	}

	/// Fits the roster to the current court layout.
	fn relayout(&mut self) {
		let limits = self.state.config.limits();
		let roster = &mut self.state.roster;
		rotation::distribute_standard(roster, limits.court_size);

		let mut released = Vec::new();
		for side in TeamSide::both() {
			let team = roster.side_mut(side);
			while team.reserves.len() > limits.bench_limit {
				if let Some(player) = team.reserves.pop() {
					released.push(player);
				}
			}
		}
		for team in roster.queue.iter_mut() {
			while team.reserves.len() > limits.bench_limit {
				if let Some(player) = team.reserves.pop() {
					released.push(player);
				}
			}
		}
		roster.unassigned.extend(released);
	}

	fn reset_with(&mut self, config: GameConfig) {
		let layout_changes = self.state.config.limits() != config.limits();
		self.state.config = config;
		self.state.match_id = MatchId(self.rng.random());
		self.state.frame = ScoreFrame::default();
		self.state.match_duration_seconds = 0;
		self.state.history.clear();
		self.state.match_log.clear();
		self.state.rotation_report = None;
		if layout_changes {
			self.relayout();
		}
		self.refresh_policy();

		logging::set_match_id(self.state.match_id.0);
		logging::engine::reset("new match");
		self.emit(EngineEvent::MatchReset { match_id: self.state.match_id });
	}

	fn load_state(&mut self, mut state: MatchState) -> Result<(), Rejection> {
		state.config.validate().map_err(Rejection::InvalidState)?;
		let court_size = state.config.limits().court_size;
		for side in TeamSide::both() {
			let team = state.roster.side(side);
			if team.players.len() > court_size {
				return Err(Rejection::InvalidState(format!(
					"{} has {} players on a {}-player court",
					team.name,
					team.players.len(),
					court_size
				)));
			}
		}
		if state.frame.is_match_over != state.frame.match_winner.is_some() {
			return Err(Rejection::InvalidState("match winner does not match match-over flag".to_string()));
		}

		state.sync = self.state.sync.clone();
		state.roster.observe_ids();
		self.state = state;
		self.refresh_policy();
		logging::set_match_id(self.state.match_id.0);
		logging::engine::reset("state loaded");
		Ok(())
	}

	/// Starts broadcasting this device's state. Returns the session code.
	pub fn host_session(&mut self, code: Option<String>) -> String {
		let code = code.unwrap_or_else(|| generate_session_code(&mut self.rng));
		self.state.sync.role = SyncRole::Authoritative;
		self.state.sync.session_code = Some(code.clone());
		logging::sync::session("host", &code);
		self.after_transition();
		code
	}

	/// Becomes a read-only mirror of `code`.
	pub fn join_session(&mut self, code: impl Into<String>) {
		let code = code.into();
		logging::sync::session("join", &code);
		self.state.sync.role = SyncRole::Spectator;
		self.state.sync.session_code = Some(code);
		self.version = 0;
	}

	pub fn leave_session(&mut self) {
		if let Some(code) = self.state.sync.session_code.take() {
			logging::sync::session("leave", &code);
		}
		self.state.sync.role = SyncRole::Authoritative;
	}

	/// Spectator side of the bridge: replaces the local state with a newer
	/// snapshot from the followed session.
	pub fn apply_snapshot(&mut self, snapshot: StateSnapshot) -> Result<MatchView<'_>, Rejection> {
		if !self.state.sync.is_spectator() {
			return Err(Rejection::NotSpectating);
		}
		let expected = self.state.sync.session_code.clone().unwrap_or_default();
		if snapshot.session_code != expected {
			return Err(Rejection::SessionMismatch { expected, got: snapshot.session_code });
		}
		if snapshot.version <= self.version {
			return Err(Rejection::StaleSnapshot { current: self.version, got: snapshot.version });
		}

		let sync = self.state.sync.clone();
		self.version = snapshot.version;
		self.state = snapshot.state;
		self.state.sync = sync;
		self.refresh_policy();
		logging::set_match_id(self.state.match_id.0);
		logging::sync::applied(&expected, self.version);
		Ok(self.view())
	}

	/// The current state as a snapshot, if this device is hosting.
	pub fn snapshot(&self) -> Option<StateSnapshot> {
		if !self.state.sync.is_broadcasting() {
			return None;
		}
		let session_code = self.state.sync.session_code.clone()?;
		Some(StateSnapshot {
			session_code,
			version: self.version,
			sent_at: chrono::Utc::now().timestamp_millis(),
			state: self.state.clone(),
		})
	}

	/// Creates or refreshes a profile from a roster player and links the
	/// player to it.
	pub fn save_player_to_profile(
		&mut self,
		store: &mut ProfileStore,
		id: PlayerId,
	) -> Result<ProfileId, Rejection> {
		if self.state.sync.is_spectator() {
			return Err(Rejection::ReadOnly);
		}
		let player = self.state.roster.player(id).cloned().ok_or(RosterError::PlayerNotFound(id))?;
		let now = chrono::Utc::now().timestamp_millis();

		let profile_id = match &player.profile_id {
			Some(existing) => existing.clone(),
			None => ProfileId(format!("{:016x}", self.rng.random::<u64>())),
		};
		let profile = match store.get(&profile_id) {
			Some(existing) => PlayerProfile {
				name: player.name.clone(),
				skill: player.skill,
				number: player.number,
				updated_at: now.max(existing.updated_at),
				..existing.clone()
			},
			None => PlayerProfile::from_player(profile_id.clone(), &player, now),
		};
		store.upsert(profile);

		let linked = profile_id.clone();
		self.roster_edit("save profile", |engine| {
			let p = engine.state.roster.player_mut(id).ok_or(RosterError::PlayerNotFound(id))?;
			p.profile_id = Some(linked);
			Ok(())
		})?;
		self.after_transition();
		Ok(profile_id)
	}

	pub fn score(&self) -> PerTeam<u32> {
		self.state.frame.score
	}
}
