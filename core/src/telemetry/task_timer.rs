use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use flare_utils_rs::concurrent::ManualResetEvent;
use tokio::sync::{Mutex, RwLock};

use crate::telemetry::delay::{DelayError, TimerDelay};
use crate::telemetry::dispatch::{Dispatcher, DispatcherHandle, Runnable, TokioContextDispatcher};


const STATE_SCHEDULED: u8 = 0;
const STATE_BEGUN: u8 = 1;
const STATE_CANCELLED: u8 = 2;

/// Cancellation handle for one scheduled flush action.
///
/// The gate moves `Scheduled -> Begun` or `Scheduled -> Cancelled` exactly
/// once: an action that lost the gate to a cancellation never runs its body,
/// and a cancellation that lost the gate never interrupts a running body.
#[derive(Debug)]
struct ScheduledAction {
  state: AtomicU8,
  cancelled: ManualResetEvent,
}

impl ScheduledAction {
  fn new() -> Self {
    Self {
      state: AtomicU8::new(STATE_SCHEDULED),
      cancelled: ManualResetEvent::new(),
    }
  }

  fn try_begin(&self) -> bool {
    self
      .state
      .compare_exchange(STATE_SCHEDULED, STATE_BEGUN, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  fn cancel(&self) -> bool {
    let won = self
      .state
      .compare_exchange(STATE_SCHEDULED, STATE_CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok();
    if won {
      self.cancelled.set();
    }
    won
  }

  async fn wait_cancelled(&self) {
    self.cancelled.wait().await;
  }
}

/// One-shot delay timer driving the client's flush cadence.
///
/// At most one action is outstanding per timer: `start` supersedes the
/// previously pending action and `cancel` prevents a not-yet-begun action
/// from running. The action itself is carried by the configured
/// [`DispatcherHandle`], never by the caller.
#[derive(Debug, Clone)]
pub struct TaskTimer {
  delay: Arc<RwLock<TimerDelay>>,
  pending: Arc<Mutex<Option<Arc<ScheduledAction>>>>,
  dispatcher: DispatcherHandle,
}

impl TaskTimer {
  pub fn new() -> Self {
    Self::with_dispatcher(DispatcherHandle::new(TokioContextDispatcher::new()))
  }

  pub fn with_dispatcher(dispatcher: DispatcherHandle) -> Self {
    Self {
      delay: Arc::new(RwLock::new(TimerDelay::default())),
      pending: Arc::new(Mutex::new(None)),
      dispatcher,
    }
  }

  /// Returns the configured delay.
  pub async fn delay(&self) -> TimerDelay {
    *self.delay.read().await
  }

  /// Replaces the configured delay.
  ///
  /// Out-of-range values are rejected and the stored delay is left
  /// untouched. An already-pending action keeps the delay it was scheduled
  /// with.
  pub async fn set_delay(&self, delay: TimerDelay) -> Result<(), DelayError> {
    delay.validate()?;
    *self.delay.write().await = delay;
    Ok(())
  }

  /// Returns true while an action is scheduled or still running.
  pub async fn is_started(&self) -> bool {
    self.pending.lock().await.is_some()
  }

  /// Schedules `action_factory` to run once after the configured delay.
  ///
  /// A previously pending action is superseded: if its body has not yet
  /// begun, it will never run. The factory is invoked on the dispatcher's
  /// execution context once the delay elapses; with an infinite delay it is
  /// never invoked.
  pub async fn start<F, Fut>(&self, action_factory: F)
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    let runnable = Runnable::new(action_factory);
    let delay = *self.delay.read().await;
    let action = Arc::new(ScheduledAction::new());
    {
      let mut pending = self.pending.lock().await;
      if let Some(previous) = pending.replace(action.clone()) {
        if previous.cancel() {
          tracing::debug!("superseded pending action");
        }
      }
    }
    tracing::debug!("scheduled action: delay = {:?}", delay);

    let slot = Arc::clone(&self.pending);
    let gate = Arc::clone(&action);
    self
      .dispatcher
      .schedule(Runnable::new(move || async move {
        match delay {
          TimerDelay::Finite(duration) => {
            tokio::select! {
              _ = gate.wait_cancelled() => {
                tracing::debug!("action cancelled before firing");
              }
              _ = tokio::time::sleep(duration) => {
                if gate.try_begin() {
                  runnable.run().await;
                  tracing::debug!("action completed");
                }
              }
            }
          }
          TimerDelay::Infinite => {
            gate.wait_cancelled().await;
            tracing::debug!("action cancelled before firing");
          }
        }
        // Only the handle that still owns the slot may clear it; a newer
        // start must not be clobbered by a stale completion.
        let mut pending = slot.lock().await;
        let owns_slot = matches!(pending.as_ref(), Some(current) if Arc::ptr_eq(current, &gate));
        if owns_slot {
          *pending = None;
        }
      }))
      .await;
  }

  /// Cancels the pending action if it has not yet begun.
  ///
  /// An action that is already running is left to finish and clears the
  /// started flag itself on completion. Calling this with nothing pending
  /// does nothing.
  pub async fn cancel(&self) {
    let mut pending = self.pending.lock().await;
    let won = pending.as_ref().map(|action| action.cancel()).unwrap_or(false);
    if won {
      *pending = None;
      tracing::debug!("cancelled pending action");
    }
  }
}

impl Default for TaskTimer {
  fn default() -> Self {
    Self::new()
  }
}
