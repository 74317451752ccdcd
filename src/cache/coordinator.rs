//! Cache coordinator that orchestrates TTL caching with network fetching.

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::entry::CacheEntry;
use super::error::FetchError;
use crate::entity::Entity;
use crate::mutation::EntityMutated;
use crate::sdk::{EntitySdk, SdkError};

pub type FetchResult = Result<Arc<Vec<Entity>>, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Timing knobs for fetching and retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
  /// TTL used when a source does not set its own
  pub default_ttl: Duration,
  /// Automatic retries allowed for transient failures
  pub max_retries: u32,
  /// Delay before the first retry; doubles per attempt
  pub base_delay: Duration,
  /// Upper bound for a single retry delay
  pub max_delay: Duration,
  /// Pause after every network call before the slot accepts the next one
  pub cooldown: Duration,
}

impl Default for FetchSettings {
  fn default() -> Self {
    Self {
      default_ttl: Duration::from_secs(5 * 60),
      max_retries: 3,
      base_delay: Duration::from_millis(1000),
      max_delay: Duration::from_millis(8000),
      cooldown: Duration::from_millis(250),
    }
  }
}

impl FetchSettings {
  /// Delay before retry number `retry_count` (1-based).
  pub fn retry_delay(&self, retry_count: u32) -> Duration {
    let exponent = retry_count.saturating_sub(1).min(16);
    self
      .base_delay
      .saturating_mul(1u32 << exponent)
      .min(self.max_delay)
  }
}

/// Where one entity key's list comes from.
#[derive(Clone)]
pub struct ListSource {
  pub key: String,
  pub sdk: Arc<dyn EntitySdk>,
  pub sort_hint: Option<String>,
  pub ttl: Duration,
}

impl fmt::Debug for ListSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ListSource")
      .field("key", &self.key)
      .field("sort_hint", &self.sort_hint)
      .field("ttl", &self.ttl)
      .finish_non_exhaustive()
  }
}

#[derive(Default)]
struct Slot {
  entry: CacheEntry,
  refreshed_at: Option<Instant>,
  retry_count: u32,
  in_flight: Option<SharedFetch>,
  retry_timer: Option<JoinHandle<()>>,
  source: Option<ListSource>,
}

impl Slot {
  fn fresh_data(&self, ttl: Duration) -> Option<Arc<Vec<Entity>>> {
    let refreshed_at = self.refreshed_at?;
    if refreshed_at.elapsed() < ttl {
      self.entry.data.clone()
    } else {
      None
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
  Caller,
  Retry,
}

enum Step {
  Fresh(Arc<Vec<Entity>>),
  Join(SharedFetch),
  Issued(SharedFetch),
}

struct Inner {
  settings: FetchSettings,
  slots: Mutex<HashMap<String, Slot>>,
  /// Set on teardown; no retry is scheduled or fired afterwards
  closed: AtomicBool,
}

/// Cache store for one engine, parametrized by entity key.
///
/// Cloning shares the same slots. Slots are isolated from each other; the
/// lock is never held across an await.
#[derive(Clone)]
pub struct CacheCoordinator {
  inner: Arc<Inner>,
}

impl CacheCoordinator {
  pub fn new(settings: FetchSettings) -> Self {
    Self {
      inner: Arc::new(Inner {
        settings,
        slots: Mutex::new(HashMap::new()),
        closed: AtomicBool::new(false),
      }),
    }
  }

  pub fn settings(&self) -> &FetchSettings {
    &self.inner.settings
  }

  fn is_closed(&self) -> bool {
    self.inner.closed.load(Ordering::SeqCst)
  }

  fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
    self
      .inner
      .slots
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  /// Current state of a key; empty if it was never fetched.
  pub fn snapshot(&self, key: &str) -> CacheEntry {
    self
      .slots()
      .get(key)
      .map(|slot| slot.entry.clone())
      .unwrap_or_default()
  }

  /// Whether the key holds data younger than `ttl`.
  pub fn is_fresh(&self, key: &str, ttl: Duration) -> bool {
    self
      .slots()
      .get(key)
      .is_some_and(|slot| slot.fresh_data(ttl).is_some())
  }

  /// Fetch a list with cache-first strategy.
  ///
  /// 1. Without `force_refresh`, fresh cached data is returned immediately
  /// 2. Without `force_refresh`, an in-flight request is joined
  /// 3. With `force_refresh`, an in-flight request is awaited and a new one issued
  /// 4. Otherwise a new request is issued
  pub async fn fetch(&self, source: &ListSource, force_refresh: bool) -> FetchResult {
    self.fetch_from(source, force_refresh, Origin::Caller).await
  }

  async fn fetch_from(&self, source: &ListSource, force_refresh: bool, origin: Origin) -> FetchResult {
    loop {
      match self.plan(source, force_refresh, origin) {
        Step::Fresh(data) => return Ok(data),
        Step::Issued(fetch) => return fetch.await,
        Step::Join(fetch) => {
          let result = fetch.await;
          if !force_refresh {
            return result;
          }
          // The settled request predates this one; go again.
        }
      }
    }
  }

  fn plan(&self, source: &ListSource, force_refresh: bool, origin: Origin) -> Step {
    let mut slots = self.slots();
    let slot = slots.entry(source.key.clone()).or_default();
    slot.source = Some(source.clone());

    if !force_refresh {
      if let Some(data) = slot.fresh_data(source.ttl) {
        debug!(key = %source.key, "serving cached list");
        return Step::Fresh(data);
      }
    }

    if let Some(in_flight) = &slot.in_flight {
      debug!(key = %source.key, "joining in-flight fetch");
      return Step::Join(in_flight.clone());
    }

    match origin {
      Origin::Caller => {
        // A fresh request from a caller gets a fresh retry budget.
        if let Some(timer) = slot.retry_timer.take() {
          timer.abort();
        }
        slot.retry_count = 0;
      }
      Origin::Retry => {
        slot.retry_timer = None;
      }
    }

    slot.entry.loading = true;
    slot.entry.error = None;
    slot.entry.retry_pending = false;

    let fetch = self.spawn_fetch(source.clone());
    slot.in_flight = Some(fetch.clone());
    Step::Issued(fetch)
  }

  fn spawn_fetch(&self, source: ListSource) -> SharedFetch {
    let key = source.key.clone();
    let coordinator = self.clone();
    let handle = tokio::spawn(async move {
      info!(key = %source.key, "fetching list");
      let result = source.sdk.list(source.sort_hint.as_deref()).await;
      let outcome = coordinator.settle(&source, result);
      tokio::time::sleep(coordinator.inner.settings.cooldown).await;
      coordinator.release(&source.key);
      outcome
    });

    let coordinator = self.clone();
    async move {
      match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
          coordinator.release(&key);
          let mut slots = coordinator.slots();
          if let Some(slot) = slots.get_mut(&key) {
            slot.entry.loading = false;
          }
          Err(FetchError::Fatal {
            key,
            message: format!("fetch task failed: {}", e),
          })
        }
      }
    }
    .boxed()
    .shared()
  }

  /// Record the outcome of a network call and schedule a retry if warranted.
  fn settle(&self, source: &ListSource, result: Result<Vec<Entity>, SdkError>) -> FetchResult {
    let settings = self.inner.settings;
    let key = source.key.clone();
    let mut slots = self.slots();
    let slot = slots.entry(key.clone()).or_default();
    slot.entry.loading = false;

    match result {
      Ok(records) => {
        info!(key = %key, count = records.len(), "list fetched");
        let data = Arc::new(records);
        slot.entry.data = Some(Arc::clone(&data));
        slot.entry.fetched_at = Some(Utc::now());
        slot.entry.error = None;
        slot.entry.retry_pending = false;
        slot.refreshed_at = Some(Instant::now());
        slot.retry_count = 0;
        Ok(data)
      }
      Err(err) if err.is_transient() => {
        slot.retry_count += 1;
        let attempt = slot.retry_count;
        if self.is_closed() {
          debug!(key = %key, error = %err, "coordinator closed, not retrying");
          let fetch_error = FetchError::Transient {
            key,
            message: err.to_string(),
          };
          slot.entry.error = Some(fetch_error.to_string());
          slot.entry.retry_pending = false;
          Err(fetch_error)
        } else if attempt <= settings.max_retries {
          let delay = settings.retry_delay(attempt);
          warn!(key = %key, attempt, delay_ms = delay.as_millis() as u64, error = %err, "transient fetch failure, retry scheduled");
          let fetch_error = FetchError::Transient {
            key,
            message: err.to_string(),
          };
          slot.entry.error = Some(fetch_error.to_string());
          slot.entry.retry_pending = true;
          if let Some(previous) = slot.retry_timer.replace(self.schedule_retry(source.clone(), delay)) {
            previous.abort();
          }
          Err(fetch_error)
        } else {
          error!(key = %key, attempts = attempt, error = %err, "giving up after repeated transient failures");
          let fetch_error = FetchError::Exhausted {
            key,
            attempts: attempt,
            message: err.to_string(),
          };
          slot.entry.error = Some(fetch_error.to_string());
          slot.entry.retry_pending = false;
          Err(fetch_error)
        }
      }
      Err(err) => {
        error!(key = %key, error = %err, "fetch failed");
        let fetch_error = FetchError::Fatal {
          key,
          message: err.to_string(),
        };
        slot.entry.error = Some(fetch_error.to_string());
        slot.entry.retry_pending = false;
        Err(fetch_error)
      }
    }
  }

  fn schedule_retry(&self, source: ListSource, delay: Duration) -> JoinHandle<()> {
    let coordinator = self.clone();
    tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      if coordinator.is_closed() {
        return;
      }
      if let Err(e) = coordinator.fetch_from(&source, true, Origin::Retry).await {
        debug!(key = %source.key, error = %e, "retry attempt failed");
      }
    })
  }

  fn release(&self, key: &str) {
    if let Some(slot) = self.slots().get_mut(key) {
      slot.in_flight = None;
    }
  }

  /// Refetch the key named by a mutation event.
  ///
  /// Returns `None` when the key was never fetched through this coordinator.
  pub async fn on_mutated(&self, event: &EntityMutated) -> Option<FetchResult> {
    let source = self
      .slots()
      .get(&event.entity_key)
      .and_then(|slot| slot.source.clone());

    match source {
      Some(source) => {
        debug!(key = %event.entity_key, kind = %event.kind, "refreshing after mutation");
        Some(self.fetch(&source, true).await)
      }
      None => {
        debug!(key = %event.entity_key, "mutation for unknown key ignored");
        None
      }
    }
  }

  /// Cancel a key's scheduled retry. In-flight requests keep running.
  pub fn cancel_retries(&self, key: &str) {
    if let Some(slot) = self.slots().get_mut(key) {
      if let Some(timer) = slot.retry_timer.take() {
        timer.abort();
      }
      slot.entry.retry_pending = false;
    }
  }

  /// Stop retrying for good: pending timers are aborted and failures that
  /// settle later schedule nothing. In-flight requests still finish.
  pub fn close(&self) {
    self.inner.closed.store(true, Ordering::SeqCst);
    self.cancel_all_retries();
  }

  /// Cancel every scheduled retry.
  pub fn cancel_all_retries(&self) {
    for slot in self.slots().values_mut() {
      if let Some(timer) = slot.retry_timer.take() {
        timer.abort();
      }
      slot.entry.retry_pending = false;
    }
  }
}
