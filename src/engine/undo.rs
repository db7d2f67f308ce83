use crate::engine::{LogEntry, LoggedAction, MatchEngine};
use crate::events::EngineEvent;
use crate::logging;
use crate::roster::RotationDirection;

impl MatchEngine {
	/// Applies the inverse stored in `entry`. Entries that point at players
	/// who are gone are logged and skipped.
	pub(super) fn revert(&mut self, entry: LogEntry) {
		match entry.action {
			LoggedAction::Point { team, prev, closed_set, auto_rotated, prev_report, .. } => {
				let was_over = self.state.frame.is_match_over;
				if closed_set.is_some() {
					self.state.history.pop();
				}
				if auto_rotated {
					self.state.roster.side_mut(team).rotate(RotationDirection::CounterClockwise);
				}
				self.state.frame = prev;
				if was_over && !prev.is_match_over {
					self.state.rotation_report = prev_report.map(|r| *r);
					self.emit(EngineEvent::MatchReopened { match_id: self.state.match_id });
				}
			}
			LoggedAction::PointCorrection { prev, .. } => {
				self.state.frame = prev;
			}
			LoggedAction::Timeout { team, prev } => {
				self.state.frame.timeouts.set(team, prev);
			}
			LoggedAction::ServeChange { prev, prev_served, next } => {
				self.state.frame.serving = prev;
				self.state.frame.served.set(next, prev_served);
			}
			LoggedAction::SideSwap => {
				self.state.frame.swapped_sides = !self.state.frame.swapped_sides;
			}
			LoggedAction::Rotation { prior, .. } => {
				let prior = *prior;
				self.state.match_id = prior.match_id;
				self.state.frame = prior.frame;
				self.state.history = prior.history;
				self.state.match_log = prior.log;
				self.state.roster.restore(prior.roster);
				self.state.rotation_report = prior.rotation_report;
				self.state.match_duration_seconds = prior.duration;
				logging::set_match_id(self.state.match_id.0);
			}
			LoggedAction::ManualRotation { team, direction } => {
				let t = self.state.roster.side_mut(team);
				if t.players.len() < 2 {
					logging::engine::guard(&format!("{} lost its lineup since the rotation", t.name));
					return;
				}
				t.shift_offset(direction.opposite());
			}
			LoggedAction::CommitRotation { team, offset } => {
				self.state.roster.side_mut(team).uncommit_offset(offset);
			}
			LoggedAction::Substitution { team, incoming, outgoing } => {
				let Some(t) = self.state.roster.team_by_id_mut(team) else {
					logging::engine::guard(&format!("substitution team #{} is gone", team.0));
					return;
				};
				let court = t.players.iter().position(|p| p.id == incoming);
				let bench = t.reserves.iter().position(|p| p.id == outgoing);
				match (court, bench) {
					(Some(c), Some(b)) => {
						std::mem::swap(&mut t.players[c], &mut t.reserves[b]);
						t.renumber_display_order();
					}
					_ => logging::engine::guard(&format!(
						"substitution {} for {} no longer matches {}",
						incoming, outgoing, t.name
					)),
				}
			}
			LoggedAction::RosterEdit { before, .. } => {
				self.state.roster.restore(*before);
			}
			LoggedAction::PlayerRemoved { player, before } => {
				if self.state.roster.take_pending(player.id).is_none() {
					logging::engine::guard(&format!("{} is no longer pending deletion", player.name));
					return;
				}
				self.state.roster.restore(*before);
			}
			LoggedAction::PlayerRestored { deleted, before } => {
				self.state.roster.restore(*before);
				self.state.roster.pending_deletions.push(deleted);
			}
			LoggedAction::TimerToggle { prev_running } => {
				self.state.frame.is_timer_running = prev_running;
			}
			LoggedAction::TimerSet { prev_seconds } => {
				self.state.match_duration_seconds = prev_seconds;
			}
			LoggedAction::Settings { prev, roster } => {
				self.state.config = *prev;
				if let Some(roster) = roster {
					self.state.roster.restore(*roster);
				}
				self.refresh_policy();
			}
		}
	}
}
