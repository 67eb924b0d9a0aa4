use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle state of the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
	/// No sync has been attempted since process start.
	Idle,
	/// A sync pass is currently running.
	InProgress,
	/// The most recent synchronizer finished successfully.
	Success,
	/// The most recent synchronizer failed; see `last_error`.
	Failed,
	/// A whole pass over every registered entity type finished cleanly.
	Completed,
}

/// Immutable snapshot of the current/last synchronization run.
///
/// The tracker hands out whole snapshots rather than individual fields so a
/// UI polling for progress can never observe a state from one run paired with
/// an error message from another.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
	pub state: SyncState,
	pub last_sync_attempt: Option<DateTime<Utc>>,
	pub last_successful_sync: Option<DateTime<Utc>>,
	pub last_error: Option<String>,
}

impl SyncStatus {
	fn initial() -> Self {
		Self {
			state: SyncState::Idle,
			last_sync_attempt: None,
			last_successful_sync: None,
			last_error: None,
		}
	}
}

/// Process-wide, thread-safe record of the current/last synchronization run.
///
/// Cloning the tracker clones a handle to the same underlying status. Every
/// transition builds a fresh [`SyncStatus`] and swaps the shared `Arc` in one
/// write — field-level mutation is never exposed, so concurrent readers
/// always see a complete before-or-after snapshot, never a torn one.
///
/// Construct one at startup and pass the handle to whatever triggers sync;
/// there is no ambient global instance.
#[derive(Clone, Default)]
pub struct SyncStatusTracker {
	current: Arc<RwLock<Arc<SyncStatus>>>,
}

impl SyncStatusTracker {
	pub fn new() -> Self {
		Self {
			current: Arc::new(RwLock::new(Arc::new(SyncStatus::initial()))),
		}
	}

	/// The current snapshot. Cheap: clones an `Arc`, not the status.
	pub fn current_status(&self) -> Arc<SyncStatus> {
		self.current
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.clone()
	}

	/// Record that a sync pass has started.
	pub fn start_sync(&self) {
		self.replace(|prev| SyncStatus {
			state: SyncState::InProgress,
			last_sync_attempt: Some(Utc::now()),
			last_successful_sync: prev.last_successful_sync,
			last_error: prev.last_error.clone(),
		});
	}

	/// Record a successful synchronizer run: stamps `last_successful_sync`
	/// and clears the error.
	pub fn sync_completed(&self) {
		self.replace(|prev| SyncStatus {
			state: SyncState::Success,
			last_sync_attempt: prev.last_sync_attempt,
			last_successful_sync: Some(Utc::now()),
			last_error: None,
		});
	}

	/// Record a failed synchronizer run. The previous `last_successful_sync`
	/// is kept so the UI can still show when data was last known good.
	pub fn sync_failed(&self, error: impl Into<String>) {
		let message = error.into();
		self.replace(|prev| SyncStatus {
			state: SyncState::Failed,
			last_sync_attempt: prev.last_sync_attempt,
			last_successful_sync: prev.last_successful_sync,
			last_error: Some(message),
		});
	}

	/// Record that a full pass over every registered entity type finished
	/// without failures.
	pub fn run_completed(&self) {
		self.replace(|prev| SyncStatus {
			state: SyncState::Completed,
			last_sync_attempt: prev.last_sync_attempt,
			last_successful_sync: prev.last_successful_sync,
			last_error: None,
		});
	}

	fn replace(&self, build: impl FnOnce(&SyncStatus) -> SyncStatus) {
		let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
		let next = build(slot.as_ref());
		*slot = Arc::new(next);
	}
}

impl Default for SyncStatus {
	fn default() -> Self {
		Self::initial()
	}
}
