//! Execution seam for background telemetry work.
//!
//! Flush actions must never run on the caller's thread; a [`Dispatcher`]
//! decides which runtime carries them.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::runtime::{Builder, Runtime};

#[cfg(test)]
mod tests;

pub struct Runnable(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>);

impl Runnable {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Box::new(move || Box::pin(f()) as BoxFuture<'static, ()>))
  }

  pub async fn run(self) {
    (self.0)().await;
  }
}

// Dispatcher trait
#[async_trait]
pub trait Dispatcher: Debug + Send + Sync + 'static {
  async fn schedule(&self, runner: Runnable);
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle(Arc<dyn Dispatcher>);

impl DispatcherHandle {
  pub fn new_arc(dispatcher: Arc<dyn Dispatcher>) -> Self {
    Self(dispatcher)
  }

  pub fn new(dispatcher: impl Dispatcher + 'static) -> Self {
    Self(Arc::new(dispatcher))
  }
}

#[async_trait]
impl Dispatcher for DispatcherHandle {
  async fn schedule(&self, runner: Runnable) {
    self.0.schedule(runner).await;
  }
}

// --- TokioContextDispatcher implementation

/// Dispatcher that spawns work on the runtime of the calling task.
#[derive(Debug, Clone)]
pub struct TokioContextDispatcher;

impl TokioContextDispatcher {
  pub fn new() -> Self {
    Self
  }
}

impl Default for TokioContextDispatcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Dispatcher for TokioContextDispatcher {
  async fn schedule(&self, runner: Runnable) {
    tokio::spawn(runner.run());
  }
}

// --- SingleWorkerDispatcher implementation

/// Dispatcher that executes work on a dedicated Tokio runtime, keeping
/// telemetry flushes off the embedding application's runtime.
///
/// ## Runtime lifecycle
/// The internal runtime is owned via `Option<Arc<Runtime>>`.
/// When this dispatcher is dropped, it will call `shutdown_background()`
/// on the runtime if this instance is the last owner.
///
/// ```rust
/// use flare_core_rs::telemetry::{Dispatcher, Runnable, SingleWorkerDispatcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatcher = SingleWorkerDispatcher::new()?;
/// dispatcher.schedule(Runnable::new(|| async move {
///   // async work
/// })).await;
/// // When `dispatcher` is dropped, the internal runtime is shut down safely.
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SingleWorkerDispatcher {
  runtime: Option<Arc<Runtime>>,
}

impl SingleWorkerDispatcher {
  pub fn new() -> Result<Self, std::io::Error> {
    let runtime = Builder::new_multi_thread().worker_threads(1).enable_all().build()?;
    Ok(Self {
      runtime: Some(Arc::new(runtime)),
    })
  }
}

#[async_trait]
impl Dispatcher for SingleWorkerDispatcher {
  async fn schedule(&self, runner: Runnable) {
    if let Some(runtime) = &self.runtime {
      runtime.spawn(runner.run());
    } else {
      tracing::warn!("SingleWorkerDispatcher runtime already shut down");
    }
  }
}

impl Drop for SingleWorkerDispatcher {
  fn drop(&mut self) {
    if let Some(runtime_arc) = self.runtime.take() {
      if Arc::strong_count(&runtime_arc) == 1 {
        if let Ok(runtime) = Arc::try_unwrap(runtime_arc) {
          runtime.shutdown_background();
        }
      }
    }
  }
}
