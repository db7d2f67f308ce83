use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use chrono::Local;

struct LogState {
	file: Option<std::fs::File>,
	current_date: String,
	match_id: String,
	set_num: u32,
}

static LOG_STATE: Mutex<LogState> = Mutex::new(LogState {
	file: None,
	current_date: String::new(),
	match_id: String::new(),
	set_num: 0,
});

fn today() -> String {
	Local::now().format("%Y-%m-%d").to_string()
}

fn timestamp() -> String {
	Local::now().format("%H:%M:%S%.3f").to_string()
}

fn ensure_log_file(state: &mut LogState) {
	let date = today();
	if state.current_date != date || state.file.is_none() {
		let _ = fs::create_dir_all("logs");
		let path = format!("logs/volley-{}.log", date);
		if let Ok(file) = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
		{
			state.file = Some(file);
			state.current_date = date;
		}
	}
}

pub fn set_match_id(match_id: u64) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.match_id = format!("{:08x}", match_id & 0xFFFFFFFF);
	}
}

pub fn set_set_num(set_num: u32) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.set_num = set_num;
	}
}

pub fn log(module: &str, log_type: &str, message: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		ensure_log_file(&mut state);

		let match_id = if state.match_id.is_empty() { "--------" } else { &state.match_id };
		let line = format!(
			"[{}][{}][S{}][{}:{}] {}\n",
			timestamp(),
			match_id,
			state.set_num,
			module,
			log_type,
			message
		);

		if let Some(ref mut file) = state.file {
			let _ = file.write_all(line.as_bytes());
			let _ = file.flush();
		}
	}
}

pub mod engine {
	use super::log;

	pub fn point(team: &str, score_a: u32, score_b: u32, scorer: Option<&str>) {
		match scorer {
			Some(name) => log("Engine", "POINT", &format!("{} ({}) {}-{}", team, name, score_a, score_b)),
			None => log("Engine", "POINT", &format!("{} {}-{}", team, score_a, score_b)),
		}
	}

	pub fn set_won(set: u32, winner: &str, score_a: u32, score_b: u32) {
		log("Engine", "SET", &format!("set {} to {} ({}-{})", set, winner, score_a, score_b));
	}

	pub fn sudden_death(score_a: u32, score_b: u32) {
		log("Engine", "DEUCE", &format!("sudden death at {}-{}", score_a, score_b));
	}

	pub fn match_over(winner: &str, sets_a: u32, sets_b: u32) {
		log("Engine", "MATCH", &format!("won by {} ({}-{})", winner, sets_a, sets_b));
	}

	pub fn undo(kind: &str) {
		log("Engine", "UNDO", kind);
	}

	pub fn rejected(command: &str, reason: &str) {
		log("Engine", "REJECT", &format!("{}: {}", command, reason));
	}

	pub fn guard(msg: &str) {
		log("Engine", "GUARD", msg);
	}

	pub fn reset(reason: &str) {
		log("Engine", "RESET", reason);
	}
}

pub mod roster {
	use super::log;

	pub fn player_added(name: &str, team: &str) {
		log("Roster", "ADD", &format!("{} -> {}", name, team));
	}

	pub fn player_removed(name: &str, index: usize) {
		log("Roster", "REMOVE", &format!("{} (was #{})", name, index));
	}

	pub fn player_restored(name: &str, index: usize) {
		log("Roster", "RESTORE", &format!("{} at #{}", name, index));
	}

	pub fn deletions_committed(count: usize) {
		log("Roster", "COMMIT", &format!("{} player(s) purged", count));
	}

	pub fn substitution(team: &str, incoming: &str, outgoing: &str) {
		log("Roster", "SUB", &format!("{}: {} in, {} out", team, incoming, outgoing));
	}

	pub fn profile(action: &str, id: &str) {
		log("Roster", "PROFILE", &format!("{} {}", action, id));
	}
}

pub mod rotation {
	use super::log;

	pub fn rotated(outgoing: &str, incoming: &str, borrowed: usize) {
		log("Rotation", "ROTATE", &format!("{} out, {} in, {} borrowed", outgoing, incoming, borrowed));
	}

	pub fn note(msg: &str) {
		log("Rotation", "NOTE", msg);
	}

	pub fn balanced(strength_a: u32, strength_b: u32) {
		log("Rotation", "BALANCE", &format!("A={} B={}", strength_a, strength_b));
	}
}

pub mod sync {
	use super::log;

	pub fn session(role: &str, code: &str) {
		log("Sync", "SESSION", &format!("{} {}", role, code));
	}

	pub fn pushed(code: &str, version: u64) {
		log("Sync", "PUSH", &format!("{} v{}", code, version));
	}

	pub fn retry(code: &str, error: &str) {
		log("Sync", "RETRY", &format!("{}: {}", code, error));
	}

	pub fn failed(code: &str, error: &str) {
		log("Sync", "FAIL", &format!("{}: {}", code, error));
	}

	pub fn applied(code: &str, version: u64) {
		log("Sync", "APPLY", &format!("{} v{}", code, version));
	}
}
