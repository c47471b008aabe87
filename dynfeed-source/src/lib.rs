// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Record sources and the record parser.
//!
//! A [`RecordSource`] hands out a fresh [`RecordReader`] per pass; the reader yields
//! raw lines ([`RawRecord`]) until the end of the stream. The [`RecordParser`] turns
//! one raw line into an [`Observation`](dynfeed_core::Observation).
//!
//! Two sources ship with the crate:
//!
//! - [`FileSource`] - newline-delimited JSON on disk, read through `tokio::fs`
//!   so the blocking file I/O runs on tokio's blocking pool
//! - [`MemorySource`] - a fixed list of lines, handy for embedding and tests

pub mod file_source;
pub mod memory_source;
pub mod parser;
pub mod record_source;

pub use self::file_source::FileSource;
pub use self::memory_source::MemorySource;
pub use self::parser::RecordParser;
pub use self::record_source::{RawRecord, RecordReader, RecordSource};
