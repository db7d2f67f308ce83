use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::logging;
use crate::sync::{decode_frame, encode_frame, StateSnapshot, SyncError};

fn lock_mutex<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Whatever carries frames from host to spectators.
#[async_trait]
pub trait SnapshotTransport: Send + Sync {
	async fn send(&self, frame: Vec<u8>) -> Result<(), SyncError>;
}

/// Fire-and-forget pusher. Only the newest snapshot waiting to go out is
/// kept; a failed push is retried once and then dropped.
pub struct SyncBridge {
	transport: Arc<dyn SnapshotTransport>,
	pending: Arc<Mutex<Option<StateSnapshot>>>,
	runtime: Handle,
}

impl SyncBridge {
	pub fn new(transport: Arc<dyn SnapshotTransport>, runtime: Handle) -> Self {
		Self {
			transport,
			pending: Arc::new(Mutex::new(None)),
			runtime,
		}
	}

	pub fn push(&self, snapshot: StateSnapshot) -> JoinHandle<Result<(), SyncError>> {
		{
			let mut pending = lock_mutex(&self.pending);
			let newer = pending.as_ref().is_none_or(|p| snapshot.version >= p.version);
			if newer {
				*pending = Some(snapshot);
			}
		}

		let pending = Arc::clone(&self.pending);
		let transport = Arc::clone(&self.transport);
		self.runtime.spawn(async move {
			let next = lock_mutex(&pending).take();
			let Some(snapshot) = next else {
				return Ok(());
			};
			let frame = encode_frame(&snapshot)?;

			match transport.send(frame.clone()).await {
				Ok(()) => {
					logging::sync::pushed(&snapshot.session_code, snapshot.version);
					Ok(())
				}
				Err(e) => {
					logging::sync::retry(&snapshot.session_code, &e.to_string());
					match transport.send(frame).await {
						Ok(()) => {
							logging::sync::pushed(&snapshot.session_code, snapshot.version);
							Ok(())
						}
						Err(e) => {
							logging::sync::failed(&snapshot.session_code, &e.to_string());
							Err(e)
						}
					}
				}
			}
		})
	}
}

/// Loopback transport backed by a broadcast channel.
#[derive(Clone)]
pub struct InMemoryTransport {
	tx: broadcast::Sender<Vec<u8>>,
}

impl InMemoryTransport {
	pub fn new(capacity: usize) -> Self {
		let (tx, _) = broadcast::channel(capacity.max(1));
		Self { tx }
	}

	pub fn subscribe(&self) -> SpectatorFeed {
		SpectatorFeed { rx: self.tx.subscribe() }
	}
}

#[async_trait]
impl SnapshotTransport for InMemoryTransport {
	async fn send(&self, frame: Vec<u8>) -> Result<(), SyncError> {
		self.tx.send(frame).map(|_| ()).map_err(|_| SyncError::Closed)
	}
}

/// Receiving end for a spectator.
pub struct SpectatorFeed {
	rx: broadcast::Receiver<Vec<u8>>,
}

impl SpectatorFeed {
	/// Waits for the next snapshot. Frames missed while lagging are
	/// skipped since every snapshot is a full state.
	pub async fn next(&mut self) -> Result<StateSnapshot, SyncError> {
		loop {
			match self.rx.recv().await {
				Ok(frame) => return decode_frame(&frame),
				Err(broadcast::error::RecvError::Lagged(_)) => continue,
				Err(broadcast::error::RecvError::Closed) => return Err(SyncError::Closed),
			}
		}
	}

	/// Non-blocking variant; `None` when nothing is waiting.
	pub fn try_next(&mut self) -> Option<Result<StateSnapshot, SyncError>> {
		loop {
			match self.rx.try_recv() {
				Ok(frame) => return Some(decode_frame(&frame)),
				Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
				Err(broadcast::error::TryRecvError::Empty) => return None,
				Err(broadcast::error::TryRecvError::Closed) => return Some(Err(SyncError::Closed)),
			}
		}
	}
}
