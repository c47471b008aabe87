// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! The feed channel: the only structure shared between a producer task and
//! its consumers.
//!
//! Two overflow policies are supported:
//!
//! - [`OverflowPolicy::DropOldest`] - backed by a `tokio::sync::broadcast` ring.
//!   `publish` never suspends; a slow subscriber loses its oldest unread events
//!   and can see how many through [`FeedSubscription::missed`].
//! - [`OverflowPolicy::Block`] - one bounded `mpsc` buffer per subscriber.
//!   `publish` suspends until every live subscriber has room, and until at
//!   least one subscriber is attached, so nothing is lost.
//!
//! Within one subscriber, events arrive in publish order under both policies.

mod logging;

pub mod feed_channel;
pub mod feed_subscription;
pub mod overflow_policy;

pub use self::feed_channel::FeedChannel;
pub use self::feed_subscription::FeedSubscription;
pub use self::overflow_policy::{
    OverflowPolicy, DEFAULT_BLOCK_CAPACITY, DEFAULT_DROP_OLDEST_CAPACITY, MAX_CAPACITY,
};
