//! Boundary contracts between the sync engine and the two stores.
//!
//! The engine never embeds SQL or transport specifics; it talks to whatever
//! the hosting application registers behind these two traits. Concrete
//! adapters live in [`crate::store`]. Both traits operate on full snapshots —
//! a fetch always returns the entire collection for the entity type, and a
//! save always persists the entire merged collection. There are no
//! incremental reads or per-row round trips.

pub mod retry;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::entity::SyncEntity;

pub use retry::{RetryPolicy, Retrying};

/// Access to the embedded (desktop/offline) store for one entity type.
///
/// The local store is assumed reliable; its operations are not retried.
#[async_trait]
pub trait LocalGateway<E: SyncEntity>: Send + Sync + 'static {
	/// Full snapshot of the local collection.
	async fn fetch_all(&self) -> Result<Vec<E>>;

	/// Persist the given collection.
	async fn save_all(&self, entities: &[E]) -> Result<()>;

	/// Delete every row for this entity type. The update coordinator calls
	/// this before a full rewrite so the local store exactly mirrors the
	/// merged collection, leaving no stale rows for records removed upstream.
	async fn clear_all(&self) -> Result<()>;
}

/// Access to the server-side store for one entity type.
///
/// `save_all` is an upsert keyed by entity id, expressed as batched
/// statements rather than per-row round trips; at real data volumes this is
/// the throughput-critical path of a sync pass. Remote operations cross the
/// network and should be composed with [`Retrying`] so transient faults are
/// absorbed before they surface to the synchronizer.
#[async_trait]
pub trait RemoteGateway<E: SyncEntity>: Send + Sync + 'static {
	/// Full snapshot of the remote collection.
	async fn fetch_all(&self) -> Result<Vec<E>>;

	/// Insert-or-update the given collection, keyed by entity id.
	async fn save_all(&self, entities: &[E]) -> Result<()>;
}

// Shared gateway handles are gateways themselves, so decorators like
// `Retrying` can wrap an `Arc` without caring what is behind it.

#[async_trait]
impl<E: SyncEntity, G: LocalGateway<E> + ?Sized> LocalGateway<E> for Arc<G> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		self.as_ref().fetch_all().await
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.as_ref().save_all(entities).await
	}

	async fn clear_all(&self) -> Result<()> {
		self.as_ref().clear_all().await
	}
}

#[async_trait]
impl<E: SyncEntity, G: RemoteGateway<E> + ?Sized> RemoteGateway<E> for Arc<G> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		self.as_ref().fetch_all().await
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.as_ref().save_all(entities).await
	}
}
