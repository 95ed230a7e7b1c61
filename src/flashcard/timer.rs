//! Cancellable one-shot delay used before leaving a passed quiz.

use std::time::Duration;

use tokio::task::AbortHandle;

/// Runs a callback once after a delay unless dropped first.
///
/// Dropping the timer cancels it, so storing it inside the state it acts on
/// ties its lifetime to that state. Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct CompletionTimer {
  handle: AbortHandle,
}

impl CompletionTimer {
  pub fn start<F>(delay: Duration, on_fire: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    let task = tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      on_fire();
    });
    Self {
      handle: task.abort_handle(),
    }
  }

}

impl Drop for CompletionTimer {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[tokio::test(start_paused = true)]
  async fn test_fires_after_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let _timer = CompletionTimer::start(Duration::from_millis(500), move || {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    for _ in 0..5 {
      tokio::task::yield_now().await;
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_drop_prevents_fire() {
    let fired = Arc::new(AtomicUsize::new(0));
    {
      let counter = fired.clone();
      let _timer = CompletionTimer::start(Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
      });
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
  }
}
