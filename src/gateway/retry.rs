use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::{Duration, sleep};

use crate::entity::SyncEntity;
use crate::gateway::RemoteGateway;

/// Retry policy for remote store operations.
///
/// Transient connectivity and lock faults are absorbed by re-running the
/// operation up to `max_attempts` times with exponential backoff before the
/// failure escalates to the synchronizer. The policy is deliberately separate
/// from the persistence adapters themselves; compose it around any
/// [`RemoteGateway`] via [`Retrying`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	/// Total attempts, including the first one. Must be at least 1.
	pub max_attempts: u32,
	pub initial_backoff: Duration,
	pub max_backoff: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			initial_backoff: Duration::from_millis(250),
			max_backoff: Duration::from_secs(5),
		}
	}
}

impl RetryPolicy {
	pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			initial_backoff,
			max_backoff,
		}
	}

	/// Run `op` until it succeeds or the attempt budget is exhausted.
	/// Returns the last error when every attempt fails.
	pub async fn run<T, F, Fut>(&self, op_name: &str, op: F) -> Result<T>
	where
		F: Fn() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let mut backoff = self.initial_backoff;
		let mut attempt = 1u32;

		loop {
			match op().await {
				Ok(value) => {
					if attempt > 1 {
						debug!("{} succeeded on attempt {}", op_name, attempt);
					}
					return Ok(value);
				}
				Err(e) if attempt < self.max_attempts.max(1) => {
					warn!(
						"{} failed (attempt {}/{}): {}; retrying after {:?}",
						op_name, attempt, self.max_attempts, e, backoff
					);
					sleep(backoff.saturating_add(jitter(backoff))).await;
					backoff = (backoff * 2).min(self.max_backoff);
					attempt += 1;
				}
				Err(e) => {
					warn!(
						"{} failed on final attempt {}/{}: {}",
						op_name, attempt, self.max_attempts, e
					);
					return Err(e);
				}
			}
		}
	}
}

/// Small clock-derived jitter (up to a quarter of the backoff) to avoid
/// lock-stepped retries when several synchronizers hit the same fault.
fn jitter(backoff: Duration) -> Duration {
	let quarter_ms = backoff.as_millis() as u64 / 4;
	if quarter_ms == 0 {
		return Duration::ZERO;
	}
	let now_ms = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_millis() as u64;
	Duration::from_millis(now_ms % quarter_ms)
}

/// Decorator that applies a [`RetryPolicy`] to every operation of a wrapped
/// [`RemoteGateway`]. Both gateway operations are idempotent (snapshot read,
/// upsert by id), so re-running a partially applied attempt is safe.
pub struct Retrying<G> {
	inner: G,
	policy: RetryPolicy,
}

impl<G> Retrying<G> {
	pub fn new(inner: G, policy: RetryPolicy) -> Self {
		Self { inner, policy }
	}

	pub fn policy(&self) -> &RetryPolicy {
		&self.policy
	}
}

#[async_trait]
impl<E, G> RemoteGateway<E> for Retrying<G>
where
	E: SyncEntity,
	G: RemoteGateway<E>,
{
	async fn fetch_all(&self) -> Result<Vec<E>> {
		self.policy
			.run(
				&format!("remote fetch_all[{}]", E::KIND),
				|| self.inner.fetch_all(),
			)
			.await
	}

	async fn save_all(&self, entities: &[E]) -> Result<()> {
		self.policy
			.run(
				&format!("remote save_all[{}]", E::KIND),
				|| self.inner.save_all(entities),
			)
			.await
	}
}
