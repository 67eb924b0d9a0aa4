//! The two-store synchronization and conflict-resolution engine.
//!
//! One [`synchronizer::Synchronizer`] exists per entity type. A pass fetches
//! the full local and remote collections, reconciles them with the pure
//! last-writer-wins [`merge::merge`] (remote is the baseline; local overrides
//! only when strictly newer), and writes the merged result back to both
//! stores through the [`coordinator::UpdateCoordinator`]. Outcomes are
//! published to the [`status::SyncStatusTracker`] for the UI to poll.

pub mod coordinator;
pub mod error;
pub mod merge;
pub mod service;
pub mod status;
pub mod synchronizer;

pub use coordinator::UpdateCoordinator;
pub use error::{SyncError, SyncPhase};
pub use merge::merge;
pub use service::SyncService;
pub use status::{SyncState, SyncStatus, SyncStatusTracker};
pub use synchronizer::{SyncTask, Synchronizer};
