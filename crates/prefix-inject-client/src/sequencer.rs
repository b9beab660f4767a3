//! Command ordering.
//!
//! Every insertion command issued by this process must carry a strictly
//! greater generation marker (a millisecond wall-clock value doubling as an
//! anti-replay token) than the previous one, even with concurrent callers or
//! coarse clock resolution. The watermark is the only long-lived mutable
//! state in the protocol and is touched exclusively under the mutex here.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;

/// Configuration for marker reservation.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Upper bound for the pre-reservation jitter sleep. The jitter
    /// desynchronizes independent processes likely to race at the same
    /// millisecond; it does nothing for ordering within this process.
    pub max_jitter: Duration,
    /// How many wall-clock samples to take before giving up on the clock.
    pub max_retries: usize,
    /// Sleep between samples.
    pub retry_interval: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_jitter: Duration::from_secs(1),
            max_retries: 10,
            retry_interval: Duration::from_millis(1),
        }
    }
}

impl SequencerConfig {
    /// Disable jitter (tests).
    pub fn without_jitter() -> Self {
        Self { max_jitter: Duration::ZERO, ..Self::default() }
    }
}

/// Reserves strictly increasing generation markers for this process.
pub struct CommandSequencer {
    /// Last marker issued; non-decreasing for the process lifetime.
    watermark: Mutex<u64>,
    config: SequencerConfig,
}

impl CommandSequencer {
    /// Sequencer with default configuration.
    pub fn new() -> Self {
        Self::with_config(SequencerConfig::default())
    }

    /// Sequencer with explicit configuration.
    pub fn with_config(config: SequencerConfig) -> Self {
        Self { watermark: Mutex::new(0), config }
    }

    /// Reserve the next generation marker.
    ///
    /// Sleeps a uniform random jitter, then enters the critical section and
    /// samples the wall clock until it exceeds the watermark. If the clock
    /// fails to advance within the retry budget the watermark is bumped by
    /// one instead, so strict per-process monotonicity holds even under a
    /// stalled or coarse clock.
    pub async fn reserve(&self) -> u64 {
        if !self.config.max_jitter.is_zero() {
            let jitter = self.config.max_jitter.mul_f64(rand::random::<f64>());
            tokio::time::sleep(jitter).await;
        }

        let mut watermark = self.watermark.lock().await;
        for _ in 0..self.config.max_retries {
            let now = unix_millis();
            if now > *watermark {
                *watermark = now;
                return now;
            }
            tokio::time::sleep(self.config.retry_interval).await;
        }

        let bumped = *watermark + 1;
        tracing::warn!(
            watermark = *watermark,
            "wall clock did not advance past watermark; issuing bumped marker"
        );
        *watermark = bumped;
        bumped
    }

    /// The last marker issued, 0 if none.
    pub async fn last_marker(&self) -> u64 {
        *self.watermark.lock().await
    }
}

impl Default for CommandSequencer {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
