use rand::Rng;
use serde::{Deserialize, Serialize};

mod bridge;
mod protocol;

pub use bridge::{InMemoryTransport, SnapshotTransport, SpectatorFeed, SyncBridge};
pub use protocol::{decode_frame, decode_length, encode_frame, StateSnapshot};

const SESSION_CODE_LEN: usize = 6;
const SESSION_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRole {
	/// Local scorer or session host. The only writer.
	#[default]
	Authoritative,
	/// Read-only mirror of a host.
	Spectator,
}

impl std::fmt::Display for SyncRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SyncRole::Authoritative => write!(f, "host"),
			SyncRole::Spectator => write!(f, "spectator"),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
	#[serde(default)]
	pub role: SyncRole,
	#[serde(default)]
	pub session_code: Option<String>,
}

impl SyncState {
	pub fn is_spectator(&self) -> bool {
		self.role == SyncRole::Spectator
	}

	pub fn is_broadcasting(&self) -> bool {
		self.role == SyncRole::Authoritative && self.session_code.is_some()
	}
}

pub fn generate_session_code<R: Rng + ?Sized>(rng: &mut R) -> String {
	(0..SESSION_CODE_LEN)
		.map(|_| SESSION_ALPHABET[rng.random_range(0..SESSION_ALPHABET.len())] as char)
		.collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
	#[error("failed to encode snapshot: {0}")]
	Encode(String),
	#[error("failed to decode snapshot: {0}")]
	Decode(String),
	#[error("frame is truncated: need {needed} bytes, have {have}")]
	Truncated { needed: usize, have: usize },
	#[error("transport closed")]
	Closed,
	#[error("transport error: {0}")]
	Transport(String),
}
