use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging;
use crate::roster::{Player, ProfileId, DEFAULT_SKILL};
use crate::stats::{ProfileStats, StatsDelta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
	pub id: ProfileId,
	pub name: String,
	#[serde(default = "default_skill")]
	pub skill: u8,
	#[serde(default)]
	pub number: Option<u8>,
	#[serde(default)]
	pub stats: ProfileStats,
	/// Milliseconds since the epoch of the last write.
	#[serde(default)]
	pub updated_at: i64,
}

fn default_skill() -> u8 {
	DEFAULT_SKILL
}

impl PlayerProfile {
	pub fn new(id: ProfileId, name: impl Into<String>, skill: u8) -> Self {
		Self {
			id,
			name: name.into(),
			skill,
			number: None,
			stats: ProfileStats::default(),
			updated_at: 0,
		}
	}

	pub fn from_player(id: ProfileId, player: &Player, now: i64) -> Self {
		Self {
			id,
			name: player.name.clone(),
			skill: player.skill,
			number: player.number,
			stats: ProfileStats::default(),
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfilesFile {
	#[serde(default)]
	profiles: BTreeMap<String, PlayerProfile>,
}

pub struct ProfileStore {
	profiles: HashMap<ProfileId, PlayerProfile>,
	path: PathBuf,
}

impl ProfileStore {
	pub fn load() -> Result<Self, String> {
		let path = Self::config_path()?;
		Self::load_from(path)
	}

	pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, String> {
		let path = path.as_ref().to_path_buf();
		let file = if path.exists() {
			let content = fs::read_to_string(&path)
				.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
			toml::from_str(&content)
				.map_err(|e| format!("Failed to parse profiles: {}", e))?
		} else {
			ProfilesFile::default()
		};

		let profiles = file
			.profiles
			.into_values()
			.map(|p| (p.id.clone(), p))
			.collect();

		Ok(Self { profiles, path })
	}

	pub fn in_memory() -> Self {
		Self {
			profiles: HashMap::new(),
			path: PathBuf::from("config/profiles.toml"),
		}
	}

	fn config_path() -> Result<PathBuf, String> {
		if let Some(config_dir) = dirs::config_dir() {
			let dir = config_dir.join(crate::config::APP_DIR);
			fs::create_dir_all(&dir)
				.map_err(|e| format!("Failed to create config dir: {}", e))?;
			Ok(dir.join("profiles.toml"))
		} else {
			Ok(PathBuf::from("config/profiles.toml"))
		}
	}

	pub fn get(&self, id: &ProfileId) -> Option<&PlayerProfile> {
		self.profiles.get(id)
	}

	/// Last write wins by `updated_at`. Returns false when the stored copy
	/// is newer and the incoming one was dropped.
	pub fn upsert(&mut self, profile: PlayerProfile) -> bool {
		if let Some(existing) = self.profiles.get(&profile.id) {
			if existing.updated_at > profile.updated_at {
				logging::roster::profile("stale", &profile.id.0);
				return false;
			}
		}
		logging::roster::profile("upsert", &profile.id.0);
		self.profiles.insert(profile.id.clone(), profile);
		true
	}

	pub fn delete(&mut self, id: &ProfileId) -> Option<PlayerProfile> {
		let removed = self.profiles.remove(id);
		if removed.is_some() {
			logging::roster::profile("delete", &id.0);
		}
		removed
	}

	/// Profiles sorted by name, then id.
	pub fn list(&self) -> Vec<&PlayerProfile> {
		let mut profiles: Vec<&PlayerProfile> = self.profiles.values().collect();
		profiles.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
		profiles
	}

	pub fn snapshot(&self) -> Vec<PlayerProfile> {
		self.list().into_iter().cloned().collect()
	}

	pub fn apply_deltas(&mut self, deltas: &BTreeMap<ProfileId, StatsDelta>, now: i64) -> usize {
		let mut applied = 0;
		for (id, delta) in deltas {
			if let Some(profile) = self.profiles.get_mut(id) {
				profile.stats.merge(delta);
				profile.updated_at = now;
				applied += 1;
			}
		}
		applied
	}

	pub fn len(&self) -> usize {
		self.profiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.profiles.is_empty()
	}

	pub fn save(&self) -> Result<(), String> {
		let file = ProfilesFile {
			profiles: self
				.profiles
				.iter()
				.map(|(id, p)| (id.0.clone(), p.clone()))
				.collect(),
		};

		let content = toml::to_string_pretty(&file)
			.map_err(|e| format!("Failed to serialize profiles: {}", e))?;

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)
				.map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
		}
		fs::write(&self.path, content)
			.map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;

		Ok(())
	}
}
