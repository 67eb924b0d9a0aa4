use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::entity::SyncEntity;

/// Reconcile a local and a remote collection of one entity type into a single
/// merged collection.
///
/// The remote collection is the baseline: every remote entity is seeded into
/// the result first. A local entity then replaces the seeded entry only when
/// its `last_modified` is strictly newer; on a tie (including both timestamps
/// missing) the remote entity is kept. Local entities whose id is unknown to
/// the remote side are inserted as-is — this is how records created offline
/// propagate upstream on the next write-back.
///
/// The function is pure and deterministic: the merged id set is always the
/// union of the input id sets, and feeding the output back in as both sides
/// returns it unchanged. Within one collection ids are assumed unique (both
/// stores key their tables by id).
pub fn merge<E: SyncEntity>(local: Vec<E>, remote: Vec<E>) -> Vec<E> {
	let mut by_id: HashMap<E::Id, E> = HashMap::with_capacity(remote.len() + local.len());

	for entity in remote {
		by_id.insert(entity.id(), entity);
	}

	for entity in local {
		match by_id.entry(entity.id()) {
			Entry::Vacant(slot) => {
				slot.insert(entity);
			}
			Entry::Occupied(mut slot) => {
				// `None < Some(_)`, so an untimestamped record never wins.
				if entity.last_modified() > slot.get().last_modified() {
					slot.insert(entity);
				}
			}
		}
	}

	by_id.into_values().collect()
}
