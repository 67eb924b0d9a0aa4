use std::sync::Arc;

use log::debug;

use crate::entity::SyncEntity;
use crate::gateway::{LocalGateway, RemoteGateway};
use crate::sync::error::{SyncError, SyncPhase};

/// Wraps the dual write-back of a merged collection in a single
/// failure-reporting unit.
///
/// Order: clear the local collection, rewrite it from the merged collection,
/// then upsert the merged collection to the remote store. The clear-then-save
/// guarantees the local store exactly mirrors the merged result, with no
/// stale rows left behind for records deleted upstream.
///
/// There is no atomicity across the local/remote pair. If the remote upsert
/// fails after the local rewrite succeeded, the stores stay inconsistent
/// until the next sync pass — the merge is idempotent and convergent, so a
/// repeated run self-heals. Transient remote faults are the remote gateway's
/// concern (see [`crate::gateway::Retrying`]); this layer never retries.
pub struct UpdateCoordinator<E: SyncEntity> {
	local: Arc<dyn LocalGateway<E>>,
	remote: Arc<dyn RemoteGateway<E>>,
}

impl<E: SyncEntity> UpdateCoordinator<E> {
	pub fn new(local: Arc<dyn LocalGateway<E>>, remote: Arc<dyn RemoteGateway<E>>) -> Self {
		Self { local, remote }
	}

	/// Persist `merged` to both stores, wrapping any failure with the entity
	/// kind so the caller can surface it as-is.
	pub async fn update_both_stores(&self, merged: &[E]) -> Result<(), SyncError> {
		let wrap = |e: anyhow::Error| SyncError::new(E::KIND, SyncPhase::WriteBack, e);

		debug!(
			"writing back {} merged {} record(s) to both stores",
			merged.len(),
			E::KIND
		);

		self.local.clear_all().await.map_err(wrap)?;
		self.local.save_all(merged).await.map_err(wrap)?;
		self.remote.save_all(merged).await.map_err(wrap)?;

		Ok(())
	}
}
