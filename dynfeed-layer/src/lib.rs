// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! The dynamic entity layer: the consumer side of a dynfeed feed.
//!
//! [`EntityLayer`] calls the [`EntityFeedProvider`](dynfeed_engine::EntityFeedProvider)
//! hooks in order (load the schema, subscribe, connect) and feeds every event
//! into an [`EntityTracker`]. The tracker keys observations by the schema's
//! entity-id field and keeps a bounded history per entity.

mod logging;

pub mod entity_layer;
pub mod entity_tracker;

pub use self::entity_layer::EntityLayer;
pub use self::entity_tracker::{
    EntityTracker, LastFailure, TrackedEntity, DEFAULT_MAXIMUM_OBSERVATIONS,
};
