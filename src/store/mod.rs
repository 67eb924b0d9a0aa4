//! Concrete gateway adapters for the two stores.
//!
//! Entities are persisted opaquely: one table per entity type with the id,
//! the last-modified timestamp, and the full record as a JSON document. The
//! adapters never look inside business fields — exactly what the merge
//! engine needs and nothing more. [`local::SqliteStore`] backs the embedded
//! desktop store, [`remote::PgStore`] the server-side store, and
//! [`memory::MemoryStore`] backs tests and local tooling.

pub mod local;
pub mod memory;
pub mod remote;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::SyncEntity;

pub use local::SqliteStore;
pub use memory::MemoryStore;
pub use remote::PgStore;

/// A [`SyncEntity`] the SQL adapters can persist.
///
/// `TABLE` is the per-type registry entry: each entity type names its own
/// table at compile time, replacing the runtime class-token lookup of earlier
/// revisions. Table names are compile-time constants and are interpolated
/// into SQL directly; all values go through bind parameters.
pub trait StoredEntity: SyncEntity + Serialize + DeserializeOwned {
	const TABLE: &'static str;
}

/// Flat row shape shared by both SQL adapters:
/// `(id, last_modified as RFC 3339, JSON document)`.
pub(crate) type StoredRow = (String, Option<String>, String);

pub(crate) fn encode_row<E: StoredEntity>(entity: &E) -> Result<StoredRow> {
	let doc = serde_json::to_string(entity)
		.with_context(|| format!("failed to serialize {} record", E::KIND))?;
	let last_modified = entity.last_modified().map(|t| t.to_rfc3339());
	Ok((entity.id().to_string(), last_modified, doc))
}

pub(crate) fn decode_doc<E: StoredEntity>(doc: &str) -> Result<E> {
	serde_json::from_str(doc)
		.with_context(|| format!("failed to deserialize stored {} record", E::KIND))
}
