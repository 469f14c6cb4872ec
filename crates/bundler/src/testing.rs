//! Scripted engine for tests.
//!
//! `MockEngine` stands in for a real compiler: results are scripted with
//! [`MockEngine::push_result`] (builds and rebuilds share one queue and
//! default to an empty success when it runs dry), context creation can be
//! made to fail, and every call is counted. `max_in_flight` records the
//! highest number of engine calls that were ever active at once, which is
//! what the rebuild-serialization tests assert on.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::BuildConfig;
use crate::engine::{BuildResult, Engine, EngineError, EngineSession, OutputFile};
use crate::plugin::Plugin;

#[derive(Default)]
struct MockShared {
  results: Mutex<VecDeque<Result<BuildResult, String>>>,
  context_errors: Mutex<VecDeque<String>>,

  build_calls: AtomicUsize,
  context_calls: AtomicUsize,
  rebuild_calls: AtomicUsize,
  watch_calls: AtomicUsize,
  dispose_calls: AtomicUsize,

  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
  call_delay_ms: AtomicU64,
}

impl MockShared {
  async fn run_call(&self) -> Result<BuildResult, EngineError> {
    let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(active, Ordering::SeqCst);

    let delay = self.call_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
      tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let next = self.results.lock().unwrap().pop_front();
    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    match next {
      Some(Ok(result)) => Ok(result),
      Some(Err(message)) => Err(EngineError::new(message)),
      None => Ok(BuildResult::default()),
    }
  }
}

/// A scripted [`Engine`]. Clones share state, so a test can keep a handle
/// for scripting and assertions while the adapter owns another.
#[derive(Clone, Default)]
pub struct MockEngine {
  shared: Arc<MockShared>,
}

impl MockEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue the outcome of the next build or rebuild.
  pub fn push_result(&self, result: Result<BuildResult, &str>) {
    self
      .shared
      .results
      .lock()
      .unwrap()
      .push_back(result.map_err(|message| message.to_string()));
  }

  /// Queue a successful result carrying the given files.
  pub fn push_files(&self, files: Vec<OutputFile>) {
    self.push_result(Ok(BuildResult::with_files(files)));
  }

  /// Make the next `context()` call fail.
  pub fn fail_next_context(&self, message: &str) {
    self
      .shared
      .context_errors
      .lock()
      .unwrap()
      .push_back(message.to_string());
  }

  /// Delay every build/rebuild by `delay`, to widen overlap windows.
  pub fn set_call_delay(&self, delay: Duration) {
    self
      .shared
      .call_delay_ms
      .store(delay.as_millis() as u64, Ordering::SeqCst);
  }

  pub fn build_calls(&self) -> usize {
    self.shared.build_calls.load(Ordering::SeqCst)
  }

  pub fn context_calls(&self) -> usize {
    self.shared.context_calls.load(Ordering::SeqCst)
  }

  pub fn rebuild_calls(&self) -> usize {
    self.shared.rebuild_calls.load(Ordering::SeqCst)
  }

  pub fn watch_calls(&self) -> usize {
    self.shared.watch_calls.load(Ordering::SeqCst)
  }

  pub fn dispose_calls(&self) -> usize {
    self.shared.dispose_calls.load(Ordering::SeqCst)
  }

  /// Highest number of concurrently active build/rebuild calls observed.
  pub fn max_in_flight(&self) -> usize {
    self.shared.max_in_flight.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Engine for MockEngine {
  type Session = MockSession;

  async fn build(
    &self,
    _config: &BuildConfig,
    _plugins: &[Arc<Plugin>],
  ) -> Result<BuildResult, EngineError> {
    self.shared.build_calls.fetch_add(1, Ordering::SeqCst);
    self.shared.run_call().await
  }

  async fn context(
    &self,
    _config: &BuildConfig,
    _plugins: &[Arc<Plugin>],
  ) -> Result<Self::Session, EngineError> {
    self.shared.context_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(message) = self.shared.context_errors.lock().unwrap().pop_front() {
      return Err(EngineError::new(message));
    }

    Ok(MockSession {
      shared: self.shared.clone(),
    })
  }
}

/// Session half of [`MockEngine`]; counters live on the shared state so
/// they stay observable after the adapter consumes the session.
pub struct MockSession {
  shared: Arc<MockShared>,
}

#[async_trait]
impl EngineSession for MockSession {
  async fn rebuild(&self) -> Result<BuildResult, EngineError> {
    self.shared.rebuild_calls.fetch_add(1, Ordering::SeqCst);
    self.shared.run_call().await
  }

  async fn watch(&self) -> Result<(), EngineError> {
    self.shared.watch_calls.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn dispose(&self) -> Result<(), EngineError> {
    self.shared.dispose_calls.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}
