use serde::{Deserialize, Serialize};

use super::RosterError;

pub const MIN_SKILL: u8 = 1;
pub const MAX_SKILL: u8 = 10;
pub const DEFAULT_SKILL: u8 = 5;
const MAX_NAME_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "P{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl std::fmt::Display for ProfileId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
	pub id: PlayerId,
	pub name: String,
	#[serde(default)]
	pub number: Option<u8>,
	pub skill: u8,
	#[serde(default)]
	pub fixed: bool,
	#[serde(default)]
	pub profile_id: Option<ProfileId>,
	#[serde(default)]
	pub display_order: u32,
	/// Entry order, used to restore the standard layout.
	#[serde(default)]
	pub original_index: u64,
}

impl Player {
	pub fn label(&self) -> String {
		match self.number {
			Some(n) => format!("#{} {}", n, self.name),
			None => self.name.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
	pub name: String,
	#[serde(default)]
	pub number: Option<u8>,
	#[serde(default = "default_skill")]
	pub skill: u8,
	#[serde(default)]
	pub fixed: bool,
	#[serde(default)]
	pub profile_id: Option<ProfileId>,
}

fn default_skill() -> u8 {
	DEFAULT_SKILL
}

impl NewPlayer {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			number: None,
			skill: DEFAULT_SKILL,
			fixed: false,
			profile_id: None,
		}
	}

	pub fn with_skill(mut self, skill: u8) -> Self {
		self.skill = skill;
		self
	}

	pub fn with_number(mut self, number: u8) -> Self {
		self.number = Some(number);
		self
	}

	pub fn fixed(mut self) -> Self {
		self.fixed = true;
		self
	}

	pub fn with_profile(mut self, profile_id: ProfileId) -> Self {
		self.profile_id = Some(profile_id);
		self
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub number: Option<u8>,
	#[serde(default)]
	pub clear_number: bool,
	#[serde(default)]
	pub skill: Option<u8>,
	#[serde(default)]
	pub fixed: Option<bool>,
}

pub fn sanitize_name(raw: &str) -> Result<String, RosterError> {
	let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
	if collapsed.is_empty() {
		return Err(RosterError::EmptyName);
	}
	Ok(collapsed.chars().take(MAX_NAME_LEN).collect())
}

pub fn validate_skill(skill: u8) -> Result<u8, RosterError> {
	if (MIN_SKILL..=MAX_SKILL).contains(&skill) {
		Ok(skill)
	} else {
		Err(RosterError::InvalidSkill(skill))
	}
}

/// Parses one line of a bulk entry such as `"Ana 7"`. A trailing integer
/// is read as the skill rating and clamped to the valid range.
pub fn parse_generated_line(line: &str) -> Option<(String, u8)> {
	let mut words: Vec<&str> = line.split_whitespace().collect();
	let skill = match words.last().and_then(|w| w.parse::<u32>().ok()) {
		Some(value) if words.len() > 1 => {
			words.pop();
			value.clamp(MIN_SKILL as u32, MAX_SKILL as u32) as u8
		}
		_ => DEFAULT_SKILL,
	};
	let name = sanitize_name(&words.join(" ")).ok()?;
	Some((name, skill))
}
