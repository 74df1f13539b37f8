use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_condvar::Condvar;

#[cfg(test)]
mod tests;

/// Latch that releases its waiters once it has been counted down to zero.
#[derive(Clone)]
pub struct CountDownLatch {
  count: Arc<Mutex<usize>>,
  condvar: Arc<Condvar>,
}

impl Debug for CountDownLatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CountDownLatch").field("count", &self.count).finish()
  }
}

impl CountDownLatch {
  pub fn new(count: usize) -> Self {
    Self {
      count: Arc::new(Mutex::new(count)),
      condvar: Arc::new(Condvar::new()),
    }
  }

  pub async fn count_down(&self) {
    let mut count = self.count.lock().await;
    *count = count.saturating_sub(1);
    tracing::debug!("count_down: count={}", *count);
    if *count == 0 {
      self.condvar.notify_all();
    }
  }

  pub async fn count(&self) -> usize {
    *self.count.lock().await
  }

  pub async fn wait(&self) {
    let mut count = self.count.lock().await;
    while *count > 0 {
      count = self.condvar.wait(count).await;
    }
  }
}
