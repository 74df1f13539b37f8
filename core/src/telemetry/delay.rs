use std::time::Duration;

use thiserror::Error;


/// Upper bound accepted for a finite delay, in milliseconds.
pub const MAX_DELAY_MILLIS: u128 = i32::MAX as u128;

/// Default interval between telemetry flushes.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelayError {
  #[error("timer: delay out of range ({millis} ms)")]
  OutOfRange { millis: u128 },
}

/// Delay between scheduling a flush action and running it.
///
/// `Infinite` disables firing altogether; an action scheduled with it stays
/// parked until it is cancelled or superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDelay {
  Finite(Duration),
  Infinite,
}

impl TimerDelay {
  /// Rejects finite delays that are zero or not representable as a 32-bit
  /// millisecond count.
  pub fn validate(&self) -> Result<(), DelayError> {
    match self {
      TimerDelay::Infinite => Ok(()),
      TimerDelay::Finite(duration) => {
        let millis = duration.as_millis();
        if millis == 0 || millis > MAX_DELAY_MILLIS {
          Err(DelayError::OutOfRange { millis })
        } else {
          Ok(())
        }
      }
    }
  }

  pub fn is_infinite(&self) -> bool {
    matches!(self, TimerDelay::Infinite)
  }

  pub fn as_duration(&self) -> Option<Duration> {
    match self {
      TimerDelay::Finite(duration) => Some(*duration),
      TimerDelay::Infinite => None,
    }
  }
}

impl Default for TimerDelay {
  fn default() -> Self {
    TimerDelay::Finite(DEFAULT_DELAY)
  }
}

impl From<Duration> for TimerDelay {
  fn from(duration: Duration) -> Self {
    TimerDelay::Finite(duration)
  }
}
