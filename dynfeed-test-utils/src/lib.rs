// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the dynfeed workspace.
//!
//! This crate is meant for development and testing only, not for production code.
//!
//! # Key Items
//!
//! ## AIS fixtures
//!
//! ```rust
//! use dynfeed_test_utils::vessels::{vessel_record, record_without_geometry};
//!
//! let line = vessel_record("367000001", "Foo", -117.2, 32.7);
//! assert!(line.contains("\"MMSI\":\"367000001\""));
//!
//! let bare = record_without_geometry("123");
//! assert_eq!(bare, r#"{"attributes":{"MMSI":"123"}}"#);
//! ```
//!
//! ## JSONL files
//!
//! [`jsonl_file`] writes lines to a named temp file that is deleted on drop.
//!
//! ## Scripted sources
//!
//! [`ScriptedSource`] replays a fixed list of lines and then ends the pass the way
//! the test needs: a clean end of stream, an I/O failure or a read that never
//! completes. It also counts opens and live readers, so tests can check that a
//! stopped producer released what it opened.
//!
//! ## Assertion helpers
//!
//! ```rust
//! use dynfeed_test_utils::assert_no_event_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut empty = stream::empty::<dynfeed_core::FeedEvent>();
//! assert_no_event_emitted(&mut empty, 10).await;
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `vessels` - AIS vessel record fixtures
//! - `files` - JSONL temp files
//! - `scripted_source` - `ScriptedSource` and its pass endings
//! - `helpers` - Assertion and utility functions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod files;
pub mod helpers;
pub mod scripted_source;
pub mod vessels;

// Re-export commonly used test utilities
pub use files::{jsonl_file, jsonl_file_with_invalid_utf8, write_lines};
pub use helpers::{
    assert_no_event_emitted, collect_observations, next_event, next_failure, next_observation,
    wait_until,
};
pub use scripted_source::{PassEnding, ScriptedSource};
pub use vessels::{
    malformed_record, mmsi_at, record_without_geometry, vessel_record, vessel_records,
};
