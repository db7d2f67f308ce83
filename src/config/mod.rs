use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::score::{CappedDeuce, DeucePolicy, SuddenDeathReset, WinByTwo};

mod presets;

pub use presets::{CourtLimits, CourtPreset};

pub const APP_DIR: &str = "volley-score";

fn config_paths(filename: &str) -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(config_dir) = dirs::config_dir() {
		paths.push(config_dir.join(APP_DIR).join(filename));
	}

	paths.push(PathBuf::from("config").join(filename));

	paths
}

fn find_config(filename: &str) -> Option<PathBuf> {
	config_paths(filename).into_iter().find(|p| p.exists())
}

pub fn resolve_config(filename: &str) -> Result<PathBuf, String> {
	find_config(filename).ok_or_else(|| {
		let searched: Vec<_> = config_paths(filename)
			.iter()
			.map(|p| p.display().to_string())
			.collect();
		format!("Config file '{}' not found. Searched: {}", filename, searched.join(", "))
	})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
	Indoor,
	Beach,
}

impl GameMode {
	pub fn default_preset(self) -> CourtPreset {
		match self {
			GameMode::Indoor => CourtPreset::Indoor6v6,
			GameMode::Beach => CourtPreset::Beach4v4,
		}
	}
}

impl std::fmt::Display for GameMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GameMode::Indoor => write!(f, "Indoor"),
			GameMode::Beach => write!(f, "Beach"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
	Standard,
	Balanced,
}

/// Selects one of the built-in deuce policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DeuceRule {
	#[default]
	WinByTwo,
	/// Tied at target-1 resets both scores; first to `points` with a lead wins.
	SuddenDeath {
		#[serde(default = "default_sudden_death_points")]
		points: u32,
	},
	/// Win by two until tied at `cap`, then the next point decides.
	Cap {
		cap: u32,
	},
}

fn default_sudden_death_points() -> u32 {
	3
}

impl DeuceRule {
	pub fn policy(&self) -> Box<dyn DeucePolicy> {
		match *self {
			DeuceRule::WinByTwo => Box::new(WinByTwo),
			DeuceRule::SuddenDeath { points } => Box::new(SuddenDeathReset { points }),
			DeuceRule::Cap { cap } => Box::new(CappedDeuce { cap }),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
	#[serde(default = "default_mode")]
	pub mode: GameMode,
	#[serde(default)]
	pub preset: Option<CourtPreset>,
	#[serde(default = "default_max_sets")]
	pub max_sets: u32,
	#[serde(default = "default_points_per_set")]
	pub points_per_set: u32,
	#[serde(default = "default_true")]
	pub has_tie_break: bool,
	#[serde(default = "default_tie_break_points")]
	pub tie_break_points: u32,
	#[serde(default)]
	pub deuce: DeuceRule,
	#[serde(default = "default_rotation_mode")]
	pub rotation_mode: RotationMode,
	#[serde(default)]
	pub auto_swap_sides: bool,
	#[serde(default = "default_true")]
	pub enable_player_stats: bool,
	#[serde(default)]
	pub voice_control: bool,
	#[serde(default = "default_true")]
	pub haptics: bool,
	#[serde(default)]
	pub low_graphics: bool,
	#[serde(default)]
	pub reduced_motion: bool,
	#[serde(default)]
	pub developer_mode: bool,
}

fn default_mode() -> GameMode {
	GameMode::Indoor
}

fn default_max_sets() -> u32 {
	5
}

fn default_points_per_set() -> u32 {
	25
}

fn default_tie_break_points() -> u32 {
	15
}

fn default_rotation_mode() -> RotationMode {
	RotationMode::Standard
}

fn default_true() -> bool {
	true
}

impl Default for GameConfig {
	fn default() -> Self {
		Self {
			mode: default_mode(),
			preset: None,
			max_sets: default_max_sets(),
			points_per_set: default_points_per_set(),
			has_tie_break: true,
			tie_break_points: default_tie_break_points(),
			deuce: DeuceRule::default(),
			rotation_mode: default_rotation_mode(),
			auto_swap_sides: false,
			enable_player_stats: true,
			voice_control: false,
			haptics: true,
			low_graphics: false,
			reduced_motion: false,
			developer_mode: false,
		}
	}
}

impl GameConfig {
	pub fn beach() -> Self {
		Self {
			mode: GameMode::Beach,
			max_sets: 3,
			points_per_set: 21,
			auto_swap_sides: true,
			..Self::default()
		}
	}

	pub fn court_preset(&self) -> CourtPreset {
		self.preset.unwrap_or_else(|| self.mode.default_preset())
	}

	pub fn limits(&self) -> CourtLimits {
		self.court_preset().limits()
	}

	pub fn sets_to_win(&self) -> u32 {
		self.max_sets / 2 + 1
	}

	pub fn is_tie_break(&self, set_number: u32) -> bool {
		self.has_tie_break && set_number == self.max_sets
	}

	pub fn target_points(&self, set_number: u32) -> u32 {
		if self.is_tie_break(set_number) {
			self.tie_break_points
		} else {
			self.points_per_set
		}
	}

	/// Combined points between automatic side swaps, if enabled.
	pub fn swap_interval(&self, set_number: u32) -> Option<u32> {
		if !self.auto_swap_sides {
			return None;
		}
		if self.is_tie_break(set_number) { Some(5) } else { Some(7) }
	}

	/// True when the two configs differ in anything that changes how a
	/// match in progress is scored or laid out.
	pub fn scoring_differs(&self, other: &GameConfig) -> bool {
		self.mode != other.mode
			|| self.court_preset() != other.court_preset()
			|| self.max_sets != other.max_sets
			|| self.points_per_set != other.points_per_set
			|| self.has_tie_break != other.has_tie_break
			|| self.tie_break_points != other.tie_break_points
			|| self.deuce != other.deuce
			|| self.auto_swap_sides != other.auto_swap_sides
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.max_sets == 0 || self.max_sets % 2 == 0 {
			return Err(format!("max_sets must be odd, got {}", self.max_sets));
		}
		if self.points_per_set == 0 {
			return Err("points_per_set must be positive".to_string());
		}
		if self.has_tie_break && self.tie_break_points == 0 {
			return Err("tie_break_points must be positive".to_string());
		}
		match self.deuce {
			DeuceRule::SuddenDeath { points: 0 } => {
				return Err("sudden death needs at least one point".to_string());
			}
			DeuceRule::Cap { cap } if cap < self.points_per_set => {
				return Err(format!(
					"deuce cap {} is below points_per_set {}",
					cap, self.points_per_set
				));
			}
			_ => {}
		}
		Ok(())
	}
}

pub fn load_game_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, String> {
	let content = fs::read_to_string(&path)
		.map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;

	let config: GameConfig = toml::from_str(&content)
		.map_err(|e| format!("Failed to parse game config: {}", e))?;

	config.validate()?;
	Ok(config)
}

/// Loads `game.toml` from the usual places, falling back to defaults when
/// no file exists.
pub fn load_default_game_config() -> Result<GameConfig, String> {
	match find_config("game.toml") {
		Some(path) => load_game_config(path),
		None => Ok(GameConfig::default()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_defaults() {
		let config = GameConfig::default();
		assert_eq!(config.mode, GameMode::Indoor);
		assert_eq!(config.max_sets, 5);
		assert_eq!(config.sets_to_win(), 3);
		assert_eq!(config.limits(), CourtLimits { court_size: 6, bench_limit: 6 });
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_target_points_tie_break() {
		let config = GameConfig::default();
		assert_eq!(config.target_points(1), 25);
		assert_eq!(config.target_points(4), 25);
		assert_eq!(config.target_points(5), 15);

		let no_tie_break = GameConfig { has_tie_break: false, ..GameConfig::default() };
		assert_eq!(no_tie_break.target_points(5), 25);
	}

	#[test]
	fn test_beach_defaults() {
		let config = GameConfig::beach();
		assert_eq!(config.sets_to_win(), 2);
		assert_eq!(config.limits().court_size, 4);
		assert_eq!(config.swap_interval(1), Some(7));
		assert_eq!(config.swap_interval(3), Some(5));
	}

	#[test]
	fn test_validate_rejects_even_sets() {
		let config = GameConfig { max_sets: 4, ..GameConfig::default() };
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_validate_rejects_low_cap() {
		let config = GameConfig { deuce: DeuceRule::Cap { cap: 20 }, ..GameConfig::default() };
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_scoring_differs_ignores_ui_toggles() {
		let base = GameConfig::default();
		let toggled = GameConfig { haptics: false, low_graphics: true, ..GameConfig::default() };
		assert!(!base.scoring_differs(&toggled));

		let changed = GameConfig { points_per_set: 21, ..GameConfig::default() };
		assert!(base.scoring_differs(&changed));
	}

	#[test]
	fn test_load_partial_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
mode = "beach"
max_sets = 3
points_per_set = 21

[deuce]
rule = "cap"
cap = 27
"#
		)
		.unwrap();

		let config = load_game_config(file.path()).unwrap();
		assert_eq!(config.mode, GameMode::Beach);
		assert_eq!(config.max_sets, 3);
		assert_eq!(config.deuce, DeuceRule::Cap { cap: 27 });
		assert_eq!(config.tie_break_points, 15);
		assert!(config.enable_player_stats);
	}

	#[test]
	fn test_load_sudden_death_default_points() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[deuce]\nrule = \"sudden_death\"").unwrap();

		let config = load_game_config(file.path()).unwrap();
		assert_eq!(config.deuce, DeuceRule::SuddenDeath { points: 3 });
	}

	#[test]
	fn test_load_missing_file() {
		let result = load_game_config("/nonexistent/game.toml");
		assert!(result.unwrap_err().contains("Failed to read"));
	}
}
