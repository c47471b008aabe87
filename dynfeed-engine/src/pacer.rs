// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Fixed delay between successive deliveries.
///
/// The interval is a per-source setting and does not follow record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits one interval.
    ///
    /// Returns `false` as soon as `cancel` fires, without waiting out the rest of
    /// the interval. Cancellation wins when both are ready.
    ///
    /// A zero interval still yields to the scheduler once, so a producer over an
    /// always-ready source cannot starve the other tasks on its worker.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if self.interval.is_zero() {
            yield_now().await;
            return !cancel.is_cancelled();
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            () = sleep(self.interval) => true,
        }
    }
}
