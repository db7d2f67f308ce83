use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtLimits {
	pub court_size: usize,
	pub bench_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourtPreset {
	#[serde(rename = "indoor-6v6")]
	Indoor6v6,
	#[serde(rename = "quads-5v5")]
	Quads5v5,
	#[serde(rename = "beach-4v4")]
	Beach4v4,
	#[serde(rename = "triples-3v3")]
	Triples3v3,
	#[serde(rename = "beach-2v2")]
	Beach2v2,
}

impl CourtPreset {
	pub fn limits(self) -> CourtLimits {
		let (court_size, bench_limit) = match self {
			CourtPreset::Indoor6v6 => (6, 6),
			CourtPreset::Quads5v5 => (5, 4),
			CourtPreset::Beach4v4 => (4, 3),
			CourtPreset::Triples3v3 => (3, 2),
			CourtPreset::Beach2v2 => (2, 1),
		};
		CourtLimits { court_size, bench_limit }
	}

	pub fn all() -> [CourtPreset; 5] {
		[
			CourtPreset::Indoor6v6,
			CourtPreset::Quads5v5,
			CourtPreset::Beach4v4,
			CourtPreset::Triples3v3,
			CourtPreset::Beach2v2,
		]
	}
}

impl std::fmt::Display for CourtPreset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let limits = self.limits();
		write!(f, "{}v{}", limits.court_size, limits.court_size)
	}
}
