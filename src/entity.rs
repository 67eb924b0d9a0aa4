use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Contract every synchronizable record must satisfy.
///
/// The merge engine and the gateways treat entities as opaque documents; the
/// only attributes they ever read are the stable identifier and the optional
/// last-modified timestamp. A missing timestamp is ordered before every
/// present one, so a record that has never been touched can never override a
/// timestamped counterpart from the other store.
///
/// Each entity type participating in sync implements this trait once. The
/// associated `KIND` replaces the runtime class-token dispatch of earlier
/// revisions: table names and log labels are resolved at compile time.
pub trait SyncEntity: Clone + Send + Sync + 'static {
	/// Stable unique identifier, identical across both stores.
	type Id: Eq + Hash + Ord + Clone + Debug + Display + Send + Sync;

	/// Human-readable name of the entity type ("student", "team", ...),
	/// used in log lines and error messages.
	const KIND: &'static str;

	fn id(&self) -> Self::Id;

	/// When the record was last modified, if known. `None` is treated as
	/// the oldest possible timestamp during merging.
	fn last_modified(&self) -> Option<DateTime<Utc>>;
}
