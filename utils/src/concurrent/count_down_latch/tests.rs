use std::time::Duration;

use tokio::time::timeout;

use crate::concurrent::count_down_latch::CountDownLatch;

#[tokio::test]
async fn waiters_are_released_at_zero() {
  let latch = CountDownLatch::new(2);
  let waiter = latch.clone();
  let handle = tokio::spawn(async move {
    waiter.wait().await;
  });

  latch.count_down().await;
  assert_eq!(latch.count().await, 1);
  latch.count_down().await;

  timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn wait_returns_immediately_once_zero() {
  let latch = CountDownLatch::new(1);
  latch.count_down().await;
  timeout(Duration::from_millis(100), latch.wait()).await.unwrap();
}

#[tokio::test]
async fn count_down_saturates_at_zero() {
  let latch = CountDownLatch::new(1);
  latch.count_down().await;
  latch.count_down().await;
  assert_eq!(latch.count().await, 0);
}
