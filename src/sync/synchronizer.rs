use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::entity::SyncEntity;
use crate::gateway::{LocalGateway, RemoteGateway};
use crate::sync::coordinator::UpdateCoordinator;
use crate::sync::error::{SyncError, SyncPhase};
use crate::sync::merge::merge;

/// One synchronization pass for one entity type, erased over the concrete
/// entity so heterogeneous synchronizers can be registered side by side in a
/// [`crate::sync::service::SyncService`].
#[async_trait]
pub trait SyncTask: Send + Sync + 'static {
	/// Human-readable entity kind, used in logs and status messages.
	fn entity_kind(&self) -> &'static str;

	/// Run one full fetch/merge/write-back pass.
	async fn synchronize(&self) -> Result<(), SyncError>;
}

/// Per-entity-type synchronizer: fetch both collections, merge, write back.
///
/// Each concrete entity type is a thin configuration of this generic flow —
/// implementing [`SyncEntity`] supplies the id/timestamp accessors and the
/// kind name; the hosting application supplies the two gateway adapters.
/// Synchronizers for different entity types share no mutable state and may
/// run concurrently.
pub struct Synchronizer<E: SyncEntity> {
	local: Arc<dyn LocalGateway<E>>,
	remote: Arc<dyn RemoteGateway<E>>,
	coordinator: UpdateCoordinator<E>,
}

impl<E: SyncEntity> Synchronizer<E> {
	pub fn new(local: Arc<dyn LocalGateway<E>>, remote: Arc<dyn RemoteGateway<E>>) -> Self {
		let coordinator = UpdateCoordinator::new(Arc::clone(&local), Arc::clone(&remote));
		Self {
			local,
			remote,
			coordinator,
		}
	}

	/// Run one synchronization pass.
	///
	/// The two fetches run concurrently; the merge is order-independent, so
	/// neither side needs to complete first. The merge itself must finish
	/// before any write-back begins, which the control flow here guarantees.
	/// Either both stores end up updated or the pass fails with a
	/// [`SyncError`] and neither store is guaranteed current — the next pass
	/// reconciles (see [`UpdateCoordinator`]).
	pub async fn synchronize(&self) -> Result<(), SyncError> {
		debug!("starting {} synchronization", E::KIND);

		let (local_rows, remote_rows) = tokio::try_join!(
			async {
				self.local
					.fetch_all()
					.await
					.map_err(|e| SyncError::new(E::KIND, SyncPhase::FetchLocal, e))
			},
			async {
				self.remote
					.fetch_all()
					.await
					.map_err(|e| SyncError::new(E::KIND, SyncPhase::FetchRemote, e))
			},
		)?;

		debug!(
			"merging {} local and {} remote {} record(s)",
			local_rows.len(),
			remote_rows.len(),
			E::KIND
		);
		let merged = merge(local_rows, remote_rows);

		self.coordinator.update_both_stores(&merged).await?;

		info!("{} synchronization finished: {} record(s)", E::KIND, merged.len());
		Ok(())
	}
}

#[async_trait]
impl<E: SyncEntity> SyncTask for Synchronizer<E> {
	fn entity_kind(&self) -> &'static str {
		E::KIND
	}

	async fn synchronize(&self) -> Result<(), SyncError> {
		Synchronizer::synchronize(self).await
	}
}
