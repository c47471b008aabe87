// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! The dynfeed ingestion engine.
//!
//! [`FeedEngine`] owns one producer task at a time. The task reads raw lines from
//! a [`RecordSource`](dynfeed_source::RecordSource), decodes them, waits one
//! [`Pacer`] interval and publishes them on the engine's
//! [`FeedChannel`](dynfeed_channel::FeedChannel):
//!
//! ```text
//! connect() -> spawn producer
//!              loop { read -> decode -> pace -> publish }
//!              until exhausted | cancelled | failed
//! disconnect() -> cancel -> join -> Disconnected
//! ```
//!
//! Behaviour at the end of the source, on malformed lines and under slow
//! consumers is chosen by [`FeedConfig`]:
//!
//! | preset                     | overflow    | end of source | malformed line |
//! |----------------------------|-------------|---------------|----------------|
//! | [`FeedConfig::replay`]     | drop oldest | stop          | fail the run   |
//! | [`FeedConfig::simulation`] | block       | reopen        | skip           |
//!
//! Failures while running reach subscribers as `ConnectionFailure` events.
//! Cancellation never does.
//!
//! # Logging
//!
//! With the default `tracing` feature, lifecycle transitions, skipped records
//! and failures are reported through `tracing`. Without it, they go to stderr.

mod logging;

pub mod config;
pub mod engine;
pub mod pacer;
pub mod producer;
pub mod provider;
pub mod stats;

pub use self::config::{DecodeErrorPolicy, FeedConfig, DEFAULT_PACING};
pub use self::engine::FeedEngine;
pub use self::pacer::Pacer;
pub use self::producer::RunOutcome;
pub use self::provider::EntityFeedProvider;
pub use self::stats::FeedStats;
pub use dynfeed_channel::OverflowPolicy;
