use crate::roster::{Roster, RosterError, Team, TeamId, TeamRef};

/// Moves the queue team at `from` to position `to`.
pub fn reorder_queue(roster: &mut Roster, from: usize, to: usize) -> Result<(), RosterError> {
	let len = roster.queue.len();
	if from >= len {
		return Err(RosterError::QueueIndexOutOfRange { index: from, len });
	}
	if to >= len {
		return Err(RosterError::QueueIndexOutOfRange { index: to, len });
	}
	let team = roster.queue.remove(from);
	roster.queue.insert(to, team);
	Ok(())
}

/// Dissolves a waiting team. Its players and reserves land in the
/// unassigned pool; court teams cannot be disbanded.
pub fn disband_team(roster: &mut Roster, id: TeamId) -> Result<Team, RosterError> {
	if roster.side_of(id).is_some() {
		return Err(RosterError::NotQueued(TeamRef::Id(id)));
	}
	let pos = roster
		.queue
		.iter()
		.position(|t| t.id == id)
		.ok_or(RosterError::TeamNotFound(TeamRef::Id(id)))?;

	let team = roster.queue.remove(pos);
	roster
		.unassigned
		.extend(team.players.iter().chain(team.reserves.iter()).cloned());
	for (i, player) in roster.unassigned.iter_mut().enumerate() {
		player.display_order = i as u32;
	}
	Ok(team)
}
