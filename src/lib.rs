//! campus_sync — two-store synchronization engine for the Campus platform.
//!
//! The desktop client mirrors the server's records into an embedded local
//! store so it keeps working offline. This crate owns the reconciliation of
//! the two stores: per-entity-type [`sync::Synchronizer`]s fetch both full
//! collections, merge them deterministically (last writer wins; remote is
//! the baseline and local overrides only when strictly newer), and write the
//! merged result back to both sides. A [`sync::SyncStatusTracker`] exposes
//! the run's progress to the UI as atomically swapped snapshots.
//!
//! The hosting application registers one synchronizer per entity type
//! (students, teams, projects, tasks, ...) behind the [`gateway`] traits and
//! triggers passes through [`sync::SyncService::run_once`]; scheduling,
//! transport, and the CRUD rules of individual entity types live outside
//! this crate.

pub mod config;
pub mod entity;
pub mod gateway;
pub mod observability;
pub mod store;
pub mod sync;
