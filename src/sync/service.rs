use log::{error, info};

use crate::sync::error::SyncError;
use crate::sync::status::SyncStatusTracker;
use crate::sync::synchronizer::SyncTask;

/// Runs every registered synchronizer once and reports to the status tracker.
///
/// This is the thin pass runner the hosting application triggers from a timer
/// or a "sync now" action; scheduling itself stays outside the engine. Entity
/// types are independent, so one type's failure does not stop the pass — the
/// remaining synchronizers still run, and the tracker ends up reflecting the
/// last recorded outcome, with the first failure returned to the caller.
pub struct SyncService {
	tasks: Vec<Box<dyn SyncTask>>,
	tracker: SyncStatusTracker,
}

impl SyncService {
	pub fn new(tracker: SyncStatusTracker) -> Self {
		Self {
			tasks: Vec::new(),
			tracker,
		}
	}

	/// Register one entity type's synchronizer. One registration per type.
	pub fn register(&mut self, task: Box<dyn SyncTask>) -> &mut Self {
		self.tasks.push(task);
		self
	}

	pub fn tracker(&self) -> &SyncStatusTracker {
		&self.tracker
	}

	/// Run one pass over all registered entity types.
	///
	/// Marks the tracker in-progress up front, records each synchronizer's
	/// outcome as it lands, and marks the whole pass completed only when
	/// every type succeeded. Returns the first failure, if any.
	pub async fn run_once(&self) -> Result<(), SyncError> {
		info!("sync pass starting: {} entity type(s)", self.tasks.len());
		self.tracker.start_sync();

		let mut first_failure: Option<SyncError> = None;

		for task in &self.tasks {
			match task.synchronize().await {
				Ok(()) => {
					self.tracker.sync_completed();
				}
				Err(e) => {
					error!("{}", e);
					if first_failure.is_none() {
						first_failure = Some(e);
					}
				}
			}
		}

		match first_failure {
			None => {
				self.tracker.run_completed();
				info!("sync pass completed");
				Ok(())
			}
			Some(e) => {
				// The pass keeps going past a failed type, so record the
				// failure last: the tracker must not end the pass reporting
				// success when any type failed.
				self.tracker.sync_failed(e.to_string());
				Err(e)
			}
		}
	}
}
