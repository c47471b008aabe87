// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated by an engine across all of its runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Observations handed to the channel.
    pub published: u64,
    /// Malformed lines skipped under `DecodeErrorPolicy::Skip`.
    pub skipped: u64,
    /// `ConnectionFailure` events published.
    pub failures: u64,
    /// Times the source was opened.
    pub passes: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    published: AtomicU64,
    skipped: AtomicU64,
    failures: AtomicU64,
    passes: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pass(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> FeedStats {
        FeedStats {
            published: self.published.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            passes: self.passes.load(Ordering::Relaxed),
        }
    }
}
