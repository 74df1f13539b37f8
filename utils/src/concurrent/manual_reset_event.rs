use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;


/// Manually reset signal shared between async tasks.
///
/// Once [`set`](ManualResetEvent::set) has been called, every current and
/// future [`wait`](ManualResetEvent::wait) returns immediately until
/// [`reset`](ManualResetEvent::reset) clears the signal again.
#[derive(Debug, Clone)]
pub struct ManualResetEvent {
  inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
  set: AtomicBool,
  notify: Notify,
}

impl ManualResetEvent {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Inner {
        set: AtomicBool::new(false),
        notify: Notify::new(),
      }),
    }
  }

  pub fn set(&self) {
    self.inner.set.store(true, Ordering::SeqCst);
    self.inner.notify.notify_waiters();
  }

  pub fn reset(&self) {
    self.inner.set.store(false, Ordering::SeqCst);
  }

  pub fn is_set(&self) -> bool {
    self.inner.set.load(Ordering::SeqCst)
  }

  pub async fn wait(&self) {
    loop {
      // register before re-checking so a concurrent set is not missed
      let notified = self.inner.notify.notified();
      if self.is_set() {
        return;
      }
      notified.await;
    }
  }
}

impl Default for ManualResetEvent {
  fn default() -> Self {
    Self::new()
  }
}
