use thiserror::Error;

/// Phase of a synchronizer run in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
	FetchLocal,
	FetchRemote,
	WriteBack,
}

impl SyncPhase {
	pub fn as_str(&self) -> &'static str {
		match self {
			SyncPhase::FetchLocal => "fetching the local collection",
			SyncPhase::FetchRemote => "fetching the remote collection",
			SyncPhase::WriteBack => "writing back the merged collection",
		}
	}
}

impl std::fmt::Display for SyncPhase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Unrecoverable failure of one entity type's synchronizer run.
///
/// The merge engine and the gateways never swallow errors; the synchronizer
/// is the single point that wraps a root cause with the entity kind and the
/// failing phase before it reaches the orchestrator and the status tracker.
/// One type's failure never affects another type's independent run.
#[derive(Debug, Error)]
#[error("synchronization of {entity} failed while {phase}: {source}")]
pub struct SyncError {
	pub entity: &'static str,
	pub phase: SyncPhase,
	#[source]
	pub source: anyhow::Error,
}

impl SyncError {
	pub fn new(entity: &'static str, phase: SyncPhase, source: anyhow::Error) -> Self {
		Self {
			entity,
			phase,
			source,
		}
	}
}
