use std::marker::PhantomData;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use crate::gateway::RemoteGateway;
use crate::store::{StoredEntity, StoredRow, decode_doc, encode_row};

/// Rows per batched upsert statement. Postgres allows 65535 bind variables;
/// 1000 rows at three columns each stays far below that while keeping the
/// statement count low for large collections.
const BATCH_ROWS: usize = 1000;

/// Server-side store adapter for one entity type.
///
/// `save_all` is the throughput-critical path of a sync pass: a batched
/// `INSERT .. ON CONFLICT (id) DO UPDATE`, never per-row round trips. Network
/// faults are not handled here — compose with
/// [`crate::gateway::Retrying`] to give remote operations their
/// transient-fault budget.
pub struct PgStore<E> {
	pool: PgPool,
	_entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> PgStore<E> {
	/// Connect to the server database and ensure this entity type's table
	/// exists.
	pub async fn connect(database_url: &str) -> Result<Self> {
		let pool = PgPool::connect(database_url)
			.await
			.context("failed to connect to the remote store")?;
		Self::with_pool(pool).await
	}

	/// Adapt an existing pool shared across entity types.
	pub async fn with_pool(pool: PgPool) -> Result<Self> {
		let store = Self {
			pool,
			_entity: PhantomData,
		};
		store.ensure_table().await?;
		Ok(store)
	}

	/// Lightweight connectivity probe for readiness checks.
	pub async fn ping(&self) -> Result<()> {
		sqlx::query("SELECT 1")
			.fetch_one(&self.pool)
			.await
			.context("remote store ping failed")?;
		Ok(())
	}

	async fn ensure_table(&self) -> Result<()> {
		let sql = format!(
			"CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, last_modified TEXT, doc TEXT NOT NULL)",
			E::TABLE
		);
		sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.with_context(|| format!("failed to create remote table {}", E::TABLE))?;
		Ok(())
	}
}

#[async_trait]
impl<E: StoredEntity> RemoteGateway<E> for PgStore<E> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		let sql = format!("SELECT doc FROM {}", E::TABLE);
		let docs: Vec<String> = sqlx::query_scalar(&sql)
			.fetch_all(&self.pool)
			.await
			.with_context(|| format!("failed to read remote table {}", E::TABLE))?;

		docs.iter().map(|doc| decode_doc(doc)).collect()
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		if entities.is_empty() {
			return Ok(());
		}

		let rows: Vec<StoredRow> = entities.iter().map(encode_row).collect::<Result<_>>()?;

		for chunk in rows.chunks(BATCH_ROWS) {
			let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
				"INSERT INTO {} (id, last_modified, doc) ",
				E::TABLE
			));
			qb.push_values(chunk, |mut b, (id, last_modified, doc)| {
				b.push_bind(id).push_bind(last_modified).push_bind(doc);
			});
			qb.push(
				" ON CONFLICT (id) DO UPDATE SET last_modified = excluded.last_modified, doc = excluded.doc",
			);
			qb.build()
				.execute(&self.pool)
				.await
				.with_context(|| format!("failed to upsert into remote table {}", E::TABLE))?;
		}

		debug!("upserted {} row(s) into remote table {}", rows.len(), E::TABLE);
		Ok(())
	}
}
