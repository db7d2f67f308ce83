use serde::{Deserialize, Serialize};

use crate::engine::MatchState;
use crate::sync::SyncError;

/// Whole-state replica pushed from host to spectators. No deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
	pub session_code: String,
	pub version: u64,
	/// Milliseconds since the epoch on the host.
	pub sent_at: i64,
	pub state: MatchState,
}

/// 4-byte big-endian length, then the JSON body.
pub fn encode_frame(snapshot: &StateSnapshot) -> Result<Vec<u8>, SyncError> {
	let json = serde_json::to_string(snapshot).map_err(|e| SyncError::Encode(e.to_string()))?;
	let len = json.len() as u32;
	let mut buf = len.to_be_bytes().to_vec();
	buf.extend(json.as_bytes());
	Ok(buf)
}

pub fn decode_length(buf: &[u8]) -> Option<u32> {
	if buf.len() < 4 {
		return None;
	}
	Some(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

pub fn decode_frame(buf: &[u8]) -> Result<StateSnapshot, SyncError> {
	let len = decode_length(buf).ok_or(SyncError::Truncated { needed: 4, have: buf.len() })? as usize;
	let body = buf
		.get(4..4 + len)
		.ok_or(SyncError::Truncated { needed: 4 + len, have: buf.len() })?;
	serde_json::from_slice(body).map_err(|e| SyncError::Decode(e.to_string()))
}
