use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use volley_score::config::{load_default_game_config, load_game_config, GameConfig};
use volley_score::engine::{Command, MatchEngine};
use volley_score::events::{EngineEvent, TeamSide};
use volley_score::history::save_record;
use volley_score::sync::{InMemoryTransport, SyncBridge};

#[derive(Parser)]
#[command(name = "headless")]
#[command(about = "Simulate matches through the scoring engine")]
struct Cli {
	#[arg(short, long, env = "VOLLEY_SEED")]
	seed: Option<u64>,

	/// Matches to play, rotating teams in between.
	#[arg(short, long, default_value_t = 3)]
	matches: u32,

	/// indoor or beach; ignored when --config is given.
	#[arg(long)]
	mode: Option<String>,

	/// Teams to generate players for.
	#[arg(short, long, default_value_t = 3)]
	teams: usize,

	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Mirror every state change into a spectator engine.
	#[arg(long)]
	spectate: bool,

	#[arg(long, env = "VOLLEY_HISTORY_DIR")]
	history_dir: Option<PathBuf>,
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, String> {
	if let Some(path) = &cli.config {
		return load_game_config(path);
	}
	match cli.mode.as_deref() {
		Some("beach") => Ok(GameConfig::beach()),
		Some("indoor") => Ok(GameConfig::default()),
		Some(other) => Err(format!("Unknown mode '{}', expected indoor or beach", other)),
		None => load_default_game_config(),
	}
}

fn print_event(event: &EngineEvent) {
	match event {
		EngineEvent::SuddenDeath { set_number } => {
			println!("  [SUDDEN DEATH] Set {} restarts from zero", set_number);
		}
		EngineEvent::SetCompleted(set) => {
			println!("  [SET {}] {}-{} for team {}", set.set_number, set.score_a, set.score_b, set.winner);
		}
		EngineEvent::MatchCompleted(record) => {
			println!("\n[MATCH OVER] {}", record.summary());
		}
		EngineEvent::TeamsRotated(report) => {
			println!("[ROTATION] {} out, {} in", report.outgoing_team.name, report.incoming_team.name);
			for borrowed in &report.borrowed_players {
				println!("       borrowed {} from {}", borrowed.player.name, borrowed.from_team_name);
			}
			for note in &report.notes {
				println!("       {}", note);
			}
		}
		EngineEvent::MatchReset { match_id } => {
			println!("[RESET] Match {}", match_id);
		}
		_ => {}
	}
}

fn main() {
	let cli = Cli::parse();

	let config = match resolve_config(&cli) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("Error: {}", e);
			std::process::exit(1);
		}
	};

	println!("=== Volleyball Engine Headless Run ===\n");

	let court_size = config.limits().court_size;
	let (engine, handle) = match MatchEngine::new(config, cli.seed) {
		Ok(pair) => pair,
		Err(e) => {
			eprintln!("Error: {}", e);
			std::process::exit(1);
		}
	};
	let mut engine = engine;
	let mut rng = match cli.seed {
		Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
		None => StdRng::from_os_rng(),
	};

	let lines: Vec<String> = (1..=cli.teams.max(2) * court_size)
		.map(|i| format!("Player {} {}", i, rng.random_range(3..=9)))
		.collect();
	if let Err(e) = engine.dispatch(Command::GeneratePlayers { text: lines.join("\n") }) {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
	if let Err(e) = engine.dispatch(Command::BalanceTeams) {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}

	let runtime = match tokio::runtime::Runtime::new() {
		Ok(r) => r,
		Err(e) => {
			eprintln!("Error: failed to start runtime: {}", e);
			std::process::exit(1);
		}
	};

	let mut mirror = None;
	if cli.spectate {
		let transport = InMemoryTransport::new(64);
		let feed = transport.subscribe();
		let bridge = SyncBridge::new(Arc::new(transport), runtime.handle().clone());
		let code = engine.host_session(None);
		let (mut spectator, _spectator_handle) = match MatchEngine::new(GameConfig::default(), None) {
			Ok(pair) => pair,
			Err(e) => {
				eprintln!("Error: {}", e);
				std::process::exit(1);
			}
		};
		spectator.join_session(code.clone());
		println!("[SYNC] Hosting session {}", code);
		mirror = Some((bridge, feed, spectator));
	}

	let mut points = 0u32;
	let mut saved = 0u32;

	for match_num in 1..=cli.matches {
		let state = engine.state();
		println!(
			"\n[MATCH #{}] {} vs {} ({} waiting)",
			match_num,
			state.roster.team_a.name,
			state.roster.team_b.name,
			state.roster.queue.len()
		);

		while !engine.state().is_match_over() {
			let roster = &engine.state().roster;
			let (a, b) = (roster.team_a.average_skill() + 1.0, roster.team_b.average_skill() + 1.0);
			let team = if rng.random_bool(a / (a + b)) { TeamSide::A } else { TeamSide::B };
			let player = engine
				.state()
				.roster
				.side(team)
				.players
				.first()
				.map(|p| p.id)
				.filter(|_| rng.random_bool(0.5));

			if let Err(e) = engine.dispatch(Command::AddPoint { team, player, skill: None }) {
				eprintln!("Rejected: {}", e);
				break;
			}
			points += 1;

			for event in handle.event_rx.try_iter() {
				match &event {
					EngineEvent::SnapshotReady(snapshot) => {
						if let Some((bridge, _, _)) = &mirror {
							let _ = runtime.block_on(bridge.push((**snapshot).clone()));
						}
					}
					EngineEvent::MatchCompleted(record) => {
						print_event(&event);
						if let Some(dir) = &cli.history_dir {
							match save_record(dir, record) {
								Ok(path) => {
									saved += 1;
									println!("       saved to {}", path.display());
								}
								Err(e) => eprintln!("Error: {}", e),
							}
						}
					}
					other => print_event(other),
				}
			}

			if let Some((_, feed, spectator)) = &mut mirror {
				while let Some(Ok(snapshot)) = feed.try_next() {
					let _ = spectator.apply_snapshot(snapshot);
				}
			}
		}

		if match_num < cli.matches {
			if let Err(e) = engine.dispatch(Command::RotateTeams) {
				eprintln!("Rejected: {}", e);
				break;
			}
			for event in handle.event_rx.try_iter() {
				print_event(&event);
			}
		}
	}

	println!("\n=== Summary ===");
	println!("Points played: {}", points);
	println!("Log entries in current match: {}", engine.state().match_log.len());
	if cli.history_dir.is_some() {
		println!("Records saved: {}", saved);
	}
	if let Some((_, _, spectator)) = &mirror {
		let same = spectator.state().frame == engine.state().frame;
		println!("Spectator in sync: {}", same);
	}
}
