use std::sync::Arc;
use std::time::Duration;

use flare_utils_rs::concurrent::ManualResetEvent;
use tokio::time::timeout;

use crate::telemetry::dispatch::{
  Dispatcher, DispatcherHandle, Runnable, SingleWorkerDispatcher, TokioContextDispatcher,
};

#[tokio::test]
async fn tokio_context_dispatcher_runs_scheduled_work() {
  let dispatcher = TokioContextDispatcher::new();
  let done = ManualResetEvent::new();
  let signal = done.clone();
  dispatcher
    .schedule(Runnable::new(move || async move {
      signal.set();
    }))
    .await;
  timeout(Duration::from_secs(1), done.wait()).await.unwrap();
}

#[tokio::test]
async fn schedule_returns_before_the_work_finishes() {
  let dispatcher = DispatcherHandle::new(TokioContextDispatcher::new());
  let entered = ManualResetEvent::new();
  let release = ManualResetEvent::new();
  let entered_signal = entered.clone();
  let release_signal = release.clone();
  dispatcher
    .schedule(Runnable::new(move || async move {
      entered_signal.set();
      release_signal.wait().await;
    }))
    .await;
  timeout(Duration::from_secs(1), entered.wait()).await.unwrap();
  release.set();
}

#[tokio::test]
async fn single_worker_dispatcher_runs_on_its_own_runtime() {
  let dispatcher = SingleWorkerDispatcher::new().unwrap();
  let done = ManualResetEvent::new();
  let signal = done.clone();
  dispatcher
    .schedule(Runnable::new(move || async move {
      tokio::time::sleep(Duration::from_millis(1)).await;
      signal.set();
    }))
    .await;
  timeout(Duration::from_secs(1), done.wait()).await.unwrap();
}

#[tokio::test]
async fn dispatcher_handle_is_shared_by_clones() {
  let dispatcher = Arc::new(TokioContextDispatcher::new());
  let handle = DispatcherHandle::new_arc(dispatcher);
  let cloned = handle.clone();
  let done = ManualResetEvent::new();
  let signal = done.clone();
  cloned
    .schedule(Runnable::new(move || async move {
      signal.set();
    }))
    .await;
  timeout(Duration::from_secs(1), done.wait()).await.unwrap();
}
