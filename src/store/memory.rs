use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::entity::SyncEntity;
use crate::gateway::{LocalGateway, RemoteGateway};

/// In-memory gateway adapter, implementing both store contracts.
///
/// Used as a test double throughout the test suites and handy for local
/// tooling that wants the sync flow without a database. `save_all` behaves
/// as an upsert keyed by id, matching the SQL adapters.
pub struct MemoryStore<E: SyncEntity> {
	rows: Mutex<BTreeMap<E::Id, E>>,
}

impl<E: SyncEntity> Default for MemoryStore<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E: SyncEntity> MemoryStore<E> {
	pub fn new() -> Self {
		Self {
			rows: Mutex::new(BTreeMap::new()),
		}
	}

	/// Pre-populate the store, replacing any existing rows.
	pub fn seed(&self, entities: Vec<E>) {
		let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
		rows.clear();
		for entity in entities {
			rows.insert(entity.id(), entity);
		}
	}

	/// Current contents, ordered by id.
	pub fn snapshot(&self) -> Vec<E> {
		self.rows
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.cloned()
			.collect()
	}

	pub fn len(&self) -> usize {
		self.rows.lock().unwrap_or_else(|e| e.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn upsert(&self, entities: &[E]) {
		let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
		for entity in entities {
			rows.insert(entity.id(), entity.clone());
		}
	}
}

#[async_trait]
impl<E: SyncEntity> LocalGateway<E> for MemoryStore<E> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		Ok(self.snapshot())
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.upsert(entities);
		Ok(())
	}

	async fn clear_all(&self) -> Result<()> {
		self.rows.lock().unwrap_or_else(|e| e.into_inner()).clear();
		Ok(())
	}
}

#[async_trait]
impl<E: SyncEntity> RemoteGateway<E> for MemoryStore<E> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		Ok(self.snapshot())
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.upsert(entities);
		Ok(())
	}
}
