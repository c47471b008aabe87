// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use core::fmt::Debug;
use dynfeed_error::Result;

/// One raw line read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number within the current pass.
    pub line: u64,
    pub text: String,
}

impl RawRecord {
    pub fn new(line: u64, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// Whether the line carries no record at all (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An ordered, line-oriented origin of raw observation records.
///
/// A source may be opened any number of times; every [`open`](Self::open) starts
/// a fresh pass from the beginning. The reader it returns is owned exclusively by
/// the producer task, which drops it (releasing any handle) when the pass ends.
#[async_trait]
pub trait RecordSource: Debug + Send + Sync + 'static {
    /// Human readable location used in errors and logs.
    fn location(&self) -> String;

    /// Checks that the underlying resource exists without opening it.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SourceNotFound`](dynfeed_error::FeedError::SourceNotFound)
    /// when the resource is absent.
    async fn check_available(&self) -> Result<()>;

    /// Opens the source for a new pass.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` when the resource is absent and `Io` for any
    /// other failure to open it.
    async fn open(&self) -> Result<Box<dyn RecordReader>>;
}

/// Read cursor over one pass of a [`RecordSource`].
#[async_trait]
pub trait RecordReader: Send {
    /// Reads the next raw line; `Ok(None)` marks the end of the stream.
    ///
    /// # Errors
    ///
    /// - `Io` when the underlying read fails mid-stream
    /// - `Decode` when one line cannot be turned into text; the cursor has moved
    ///   past that line and reading may go on
    async fn read_next(&mut self) -> Result<Option<RawRecord>>;
}
