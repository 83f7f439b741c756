//! Recurring cycle scheduler
//!
//! Runs a [`Cycle`] immediately on start, then once per interval until
//! stopped. Stopping waits for any in-flight run to finish.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// A unit of recurring work driven by the scheduler
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Cycle: Send + Sync {
	/// Short name used in scheduler logs
	fn name(&self) -> &'static str;

	/// One full pass of the cycle. Errors are handled internally; a
	/// failed pass must not prevent the next tick.
	async fn run(&self);
}

/// Handle over a running cycle. Dropping it leaves the cycle running;
/// call [`CycleHandle::stop`] for an orderly shutdown.
pub struct CycleHandle {
	stop_tx: watch::Sender<bool>,
	first_run: JoinHandle<()>,
	ticker: JoinHandle<()>,
}

impl CycleHandle {
	/// Signal the cycle to stop and wait for any in-flight run.
	pub async fn stop(self) {
		let _ = self.stop_tx.send(true);
		let _ = self.first_run.await;
		let _ = self.ticker.await;
	}
}

/// Start a cycle: one immediate run, then one run per interval.
///
/// The immediate run is detached from the tick loop, so a slow first
/// pass never delays the schedule. Ticks missed while a run is still
/// in progress are delayed rather than bursted.
pub fn start(cycle: Arc<dyn Cycle>, interval: Duration) -> CycleHandle {
	let (stop_tx, stop_rx) = watch::channel(false);
	info!(cycle = cycle.name(), ?interval, "Starting cycle");

	let first = Arc::clone(&cycle);
	let first_run = tokio::spawn(async move {
		first.run().await;
	});

	let mut ticks = stop_rx;
	let ticker = tokio::spawn(async move {
		let mut timer = interval_at(Instant::now() + interval, interval);
		timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				biased;
				_ = ticks.changed() => {
					debug!(cycle = cycle.name(), "Cycle stopped");
					break;
				},
				_ = timer.tick() => {
					cycle.run().await;
				},
			}
		}
	});

	CycleHandle {
		stop_tx,
		first_run,
		ticker,
	}
}
