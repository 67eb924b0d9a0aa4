use std::marker::PhantomData;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::gateway::LocalGateway;
use crate::store::{StoredEntity, StoredRow, decode_doc, encode_row};

/// SQLite keeps a default limit of 999 bind variables per statement; three
/// columns per row keeps batches comfortably under it.
const BATCH_ROWS: usize = 300;

/// Embedded local store adapter for one entity type.
///
/// Backs the desktop/offline side of a sync pass. The embedded database is
/// assumed reliable, so no retry wrapping is applied here.
pub struct SqliteStore<E> {
	pool: SqlitePool,
	_entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> SqliteStore<E> {
	/// Open (creating if missing) the database file and ensure this entity
	/// type's table exists.
	pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
		let options = SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true);
		let pool = SqlitePoolOptions::new()
			.connect_with(options)
			.await
			.with_context(|| {
				format!("failed to open local store at {}", path.as_ref().display())
			})?;
		Self::with_pool(pool).await
	}

	/// Adapt an existing pool. Several entity types usually share one
	/// database file, each with its own table.
	pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
		let store = Self {
			pool,
			_entity: PhantomData,
		};
		store.ensure_table().await?;
		Ok(store)
	}

	async fn ensure_table(&self) -> Result<()> {
		let sql = format!(
			"CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, last_modified TEXT, doc TEXT NOT NULL)",
			E::TABLE
		);
		sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.with_context(|| format!("failed to create local table {}", E::TABLE))?;
		Ok(())
	}
}

#[async_trait]
impl<E: StoredEntity> LocalGateway<E> for SqliteStore<E> {
	async fn fetch_all(&self) -> Result<Vec<E>> {
		let sql = format!("SELECT doc FROM {}", E::TABLE);
		let docs: Vec<String> = sqlx::query_scalar(&sql)
			.fetch_all(&self.pool)
			.await
			.with_context(|| format!("failed to read local table {}", E::TABLE))?;

		docs.iter().map(|doc| decode_doc(doc)).collect()
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		if entities.is_empty() {
			return Ok(());
		}

		let rows: Vec<StoredRow> = entities.iter().map(encode_row).collect::<Result<_>>()?;

		for chunk in rows.chunks(BATCH_ROWS) {
			let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new(format!(
				"INSERT INTO {} (id, last_modified, doc) ",
				E::TABLE
			));
			qb.push_values(chunk, |mut b, (id, last_modified, doc)| {
				b.push_bind(id).push_bind(last_modified).push_bind(doc);
			});
			qb.push(
				" ON CONFLICT(id) DO UPDATE SET last_modified = excluded.last_modified, doc = excluded.doc",
			);
			qb.build()
				.execute(&self.pool)
				.await
				.with_context(|| format!("failed to write local table {}", E::TABLE))?;
		}

		debug!("saved {} row(s) to local table {}", rows.len(), E::TABLE);
		Ok(())
	}

	async fn clear_all(&self) -> Result<()> {
		let sql = format!("DELETE FROM {}", E::TABLE);
		sqlx::query(&sql)
			.execute(&self.pool)
			.await
			.with_context(|| format!("failed to clear local table {}", E::TABLE))?;
		Ok(())
	}
}
