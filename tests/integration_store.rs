mod common;

use std::sync::Arc;

use chrono::Utc;
use tempfile::tempdir;

use campus_sync::gateway::LocalGateway;
use campus_sync::store::{MemoryStore, SqliteStore};
use campus_sync::sync::Synchronizer;

use common::{Student, Team, student, team};

fn sorted_students(mut rows: Vec<Student>) -> Vec<Student> {
	rows.sort_by_key(|s| s.id);
	rows
}

#[tokio::test]
async fn open_creates_the_database_and_an_empty_table() {
	let dir = tempdir().unwrap();
	let store = SqliteStore::<Student>::open(dir.path().join("sync.db"))
		.await
		.expect("store opens");

	let rows = store.fetch_all().await.unwrap();
	assert!(rows.is_empty());
}

#[tokio::test]
async fn saved_records_round_trip_unchanged() {
	let dir = tempdir().unwrap();
	let store = SqliteStore::<Student>::open(dir.path().join("sync.db"))
		.await
		.unwrap();

	let t0 = Utc::now();
	let records = vec![
		student(1, "amara", Some(t0)),
		student(2, "bjorn", None),
	];
	store.save_all(&records).await.unwrap();

	let fetched = sorted_students(store.fetch_all().await.unwrap());
	assert_eq!(fetched.len(), 2);
	assert_eq!(fetched[0].name, "amara");
	assert_eq!(fetched[1].last_modified, None);
	// Timestamps survive the RFC 3339 round trip to the exact instant.
	assert_eq!(fetched[0].last_modified, Some(t0));
}

#[tokio::test]
async fn save_is_an_upsert_keyed_by_id() {
	let dir = tempdir().unwrap();
	let store = SqliteStore::<Student>::open(dir.path().join("sync.db"))
		.await
		.unwrap();

	let t0 = Utc::now();
	store.save_all(&[student(1, "before", Some(t0))]).await.unwrap();
	store.save_all(&[student(1, "after", Some(t0))]).await.unwrap();

	let rows = store.fetch_all().await.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].name, "after");
}

#[tokio::test]
async fn clear_all_leaves_no_stale_rows() {
	let dir = tempdir().unwrap();
	let store = SqliteStore::<Student>::open(dir.path().join("sync.db"))
		.await
		.unwrap();

	store
		.save_all(&[student(1, "a", None), student(2, "b", None)])
		.await
		.unwrap();
	store.clear_all().await.unwrap();

	assert!(store.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn collections_larger_than_one_batch_are_written_whole() {
	let dir = tempdir().unwrap();
	let store = SqliteStore::<Student>::open(dir.path().join("sync.db"))
		.await
		.unwrap();

	// Several statement batches' worth of rows.
	let records: Vec<Student> = (0..750).map(|i| student(i, "bulk", None)).collect();
	store.save_all(&records).await.unwrap();

	assert_eq!(store.fetch_all().await.unwrap().len(), 750);
}

#[tokio::test]
async fn entity_types_sharing_one_file_stay_separate() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("sync.db");

	let students = SqliteStore::<Student>::open(&path).await.unwrap();
	let teams = SqliteStore::<Team>::open(&path).await.unwrap();

	students.save_all(&[student(1, "amara", None)]).await.unwrap();
	teams.save_all(&[team("t-1", "alpha", None)]).await.unwrap();
	teams.clear_all().await.unwrap();

	assert_eq!(students.fetch_all().await.unwrap().len(), 1);
	assert!(teams.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_sync_pass_runs_against_the_embedded_store() {
	let dir = tempdir().unwrap();
	let local = Arc::new(
		SqliteStore::<Student>::open(dir.path().join("sync.db"))
			.await
			.unwrap(),
	);
	let remote = Arc::new(MemoryStore::<Student>::new());

	let t0 = Utc::now();
	local.save_all(&[student(2, "created offline", Some(t0))]).await.unwrap();
	remote.seed(vec![student(3, "created upstream", Some(t0))]);

	Synchronizer::new(local.clone(), remote.clone())
		.synchronize()
		.await
		.expect("sync pass succeeds");

	let local_rows = sorted_students(local.fetch_all().await.unwrap());
	assert_eq!(
		local_rows.iter().map(|s| s.id).collect::<Vec<_>>(),
		vec![2, 3]
	);
	assert_eq!(remote.len(), 2);
}

/// Remote adapter tests need a reachable Postgres; they are compiled with
/// `--features integration-tests` and skipped unless `CAMPUS_TEST_REMOTE_URL`
/// points at a disposable database.
#[cfg(feature = "integration-tests")]
mod remote {
	use campus_sync::gateway::RemoteGateway;
	use campus_sync::store::PgStore;

	use super::*;

	fn remote_url() -> Option<String> {
		match std::env::var("CAMPUS_TEST_REMOTE_URL") {
			Ok(url) if !url.is_empty() => Some(url),
			_ => {
				eprintln!(
					"Skipping remote store test; set CAMPUS_TEST_REMOTE_URL to enable"
				);
				None
			}
		}
	}

	#[tokio::test]
	async fn upsert_round_trips_through_postgres() {
		let Some(url) = remote_url() else { return };

		let store = PgStore::<Student>::connect(&url).await.expect("connects");
		store.ping().await.unwrap();

		let t0 = Utc::now();
		store.save_all(&[student(9001, "first", Some(t0))]).await.unwrap();
		store.save_all(&[student(9001, "second", Some(t0))]).await.unwrap();

		let rows = store.fetch_all().await.unwrap();
		let row = rows.iter().find(|s| s.id == 9001).expect("row present");
		assert_eq!(row.name, "second");
	}
}
