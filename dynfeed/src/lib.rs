// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # dynfeed
//!
//! Real-time entity observation feeds: a producer task reads geolocated records
//! from a line-oriented source, paces them and publishes them on a broadcast
//! channel, under a connect/disconnect lifecycle that never reports its own
//! cancellation as a failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynfeed::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> dynfeed::Result<()> {
//! let source = MemorySource::new([
//!     r#"{"geometry":{"x":-117.2,"y":32.7},"attributes":{"MMSI":"367000001"}}"#,
//!     r#"{"attributes":{"MMSI":"367000002"}}"#,
//! ]);
//! let config = FeedConfig::replay().with_pacing(Duration::from_millis(1));
//! let engine = FeedEngine::new(source, ais_vessel_schema(), config)?;
//!
//! let mut feed = engine.subscribe();
//! engine.connect().await?;
//!
//! let first = feed.next().await.and_then(FeedEvent::into_observation);
//! assert_eq!(first.and_then(|o| o.position()), Some(Point::new(-117.2, 32.7)));
//!
//! engine.disconnect().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | crate             | contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | `dynfeed-error`   | [`FeedError`] and [`Result`]                          |
//! | `dynfeed-core`    | observations, feed events, schema descriptors         |
//! | `dynfeed-source`  | record sources and the record parser                  |
//! | `dynfeed-channel` | the feed channel and its overflow policies            |
//! | `dynfeed-engine`  | configuration, pacing, producer task and lifecycle    |
//! | `dynfeed-layer`   | the dynamic entity layer and its tracker              |

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

// Re-export error types
pub use dynfeed_error::{FeedError, Result};

// Re-export the data model
pub use dynfeed_core::{
    ais_vessel_schema, AttributeValue, ConnectionStatus, DataSourceInfo, FeedEvent,
    FieldDescriptor, FieldType, Observation, Point, SpatialReference,
};

// Re-export sources, channel, engine and layer
pub use dynfeed_channel::{FeedChannel, FeedSubscription, OverflowPolicy};
pub use dynfeed_engine::{
    DecodeErrorPolicy, EntityFeedProvider, FeedConfig, FeedEngine, FeedStats, Pacer, RunOutcome,
};
pub use dynfeed_layer::{EntityLayer, EntityTracker, LastFailure, TrackedEntity};
pub use dynfeed_source::{
    FileSource, MemorySource, RawRecord, RecordParser, RecordReader, RecordSource,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ais_vessel_schema, ConnectionStatus, DataSourceInfo, EntityFeedProvider, EntityLayer,
        FeedConfig, FeedEngine, FeedError, FeedEvent, FileSource, MemorySource, Observation,
        OverflowPolicy, Point, RecordSource,
    };
    pub use futures::StreamExt;
}
