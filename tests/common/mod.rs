//! Common test entities and gateway doubles for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_sync::entity::SyncEntity;
use campus_sync::gateway::RemoteGateway;
use campus_sync::store::StoredEntity;

/// A student record as the sync engine sees it: an id, a timestamp, and
/// otherwise opaque business fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
	pub id: u64,
	pub name: String,
	pub cohort: String,
	pub last_modified: Option<DateTime<Utc>>,
}

impl SyncEntity for Student {
	type Id = u64;

	const KIND: &'static str = "student";

	fn id(&self) -> u64 {
		self.id
	}

	fn last_modified(&self) -> Option<DateTime<Utc>> {
		self.last_modified
	}
}

impl StoredEntity for Student {
	const TABLE: &'static str = "students";
}

/// A second entity type so suites can exercise independent per-type runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
	pub id: String,
	pub name: String,
	pub last_modified: Option<DateTime<Utc>>,
}

impl SyncEntity for Team {
	type Id = String;

	const KIND: &'static str = "team";

	fn id(&self) -> String {
		self.id.clone()
	}

	fn last_modified(&self) -> Option<DateTime<Utc>> {
		self.last_modified
	}
}

impl StoredEntity for Team {
	const TABLE: &'static str = "teams";
}

pub fn student(id: u64, name: &str, last_modified: Option<DateTime<Utc>>) -> Student {
	Student {
		id,
		name: name.to_string(),
		cohort: "2026".to_string(),
		last_modified,
	}
}

pub fn team(id: &str, name: &str, last_modified: Option<DateTime<Utc>>) -> Team {
	Team {
		id: id.to_string(),
		name: name.to_string(),
		last_modified,
	}
}

/// Remote gateway double that fails its first `failures` calls with a
/// transient-looking error before delegating to the wrapped gateway.
pub struct FlakyRemote<E: SyncEntity> {
	inner: Arc<dyn RemoteGateway<E>>,
	failures: u32,
	calls: AtomicU32,
}

impl<E: SyncEntity> FlakyRemote<E> {
	pub fn failing(inner: Arc<dyn RemoteGateway<E>>, failures: u32) -> Self {
		Self {
			inner,
			failures,
			calls: AtomicU32::new(0),
		}
	}

	pub fn calls(&self) -> u32 {
		self.calls.load(Ordering::SeqCst)
	}

	fn fault(&self) -> Result<()> {
		let n = self.calls.fetch_add(1, Ordering::SeqCst);
		if n < self.failures {
			bail!("connection reset by peer");
		}
		Ok(())
	}
}

#[async_trait]
impl<E: SyncEntity> RemoteGateway<E> for FlakyRemote<E> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		self.fault()?;
		self.inner.fetch_all().await
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.fault()?;
		self.inner.save_all(entities).await
	}
}
