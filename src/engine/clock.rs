use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Periodic one-second pulse for the match timer. Ticks arrive on a plain
/// channel and the engine applies them with `drain_ticks`, so the timer
/// never runs inside a scoring command.
pub struct MatchClock {
	stop: Arc<AtomicBool>,
	task: JoinHandle<()>,
}

impl MatchClock {
	pub fn start(runtime: &Handle) -> (Self, mpsc::Receiver<()>) {
		Self::with_period(runtime, Duration::from_secs(1))
	}

	pub fn with_period(runtime: &Handle, period: Duration) -> (Self, mpsc::Receiver<()>) {
		let (tx, rx) = mpsc::channel();
		let stop = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&stop);

		let task = runtime.spawn(async move {
			let mut interval = tokio::time::interval(period);
			// First tick completes immediately.
			interval.tick().await;
			loop {
				interval.tick().await;
				if flag.load(Ordering::SeqCst) || tx.send(()).is_err() {
					break;
				}
			}
		});

		(Self { stop, task }, rx)
	}

	pub fn stop(&self) {
		self.stop.store(true, Ordering::SeqCst);
	}

	pub fn is_running(&self) -> bool {
		!self.stop.load(Ordering::SeqCst) && !self.task.is_finished()
	}
}

impl Drop for MatchClock {
	fn drop(&mut self) {
		self.stop();
		self.task.abort();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clock_ticks_until_stopped() {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let (clock, ticks) = MatchClock::with_period(runtime.handle(), Duration::from_millis(5));

		std::thread::sleep(Duration::from_millis(100));
		clock.stop();
		assert!(!clock.is_running());

		let received = ticks.try_iter().count();
		assert!(received >= 1);
	}

	#[test]
	fn test_dropping_clock_ends_ticks() {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let (clock, ticks) = MatchClock::with_period(runtime.handle(), Duration::from_millis(5));
		drop(clock);
		std::thread::sleep(Duration::from_millis(50));
		ticks.try_iter().count();
		std::thread::sleep(Duration::from_millis(30));
		assert_eq!(ticks.try_iter().count(), 0);
	}
}
