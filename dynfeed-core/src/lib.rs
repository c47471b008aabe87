// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core data model for dynfeed.
//!
//! Every other dynfeed crate speaks in terms of the types defined here:
//!
//! - [`Observation`] - one decoded record: an optional [`Point`] plus scalar attributes
//! - [`FeedEvent`] - what travels over the feed channel
//! - [`DataSourceInfo`] / [`FieldDescriptor`] - the static schema handed out once at load time
//! - [`ConnectionStatus`] - the externally observable lifecycle state of a feed

pub mod attribute;
pub mod connection_status;
pub mod feed_event;
pub mod geometry;
pub mod observation;
pub mod schema;

pub use self::attribute::AttributeValue;
pub use self::connection_status::ConnectionStatus;
pub use self::feed_event::FeedEvent;
pub use self::geometry::{Point, SpatialReference};
pub use self::observation::Observation;
pub use self::schema::{ais_vessel_schema, DataSourceInfo, FieldDescriptor, FieldType};
pub use dynfeed_error::{FeedError, Result};
