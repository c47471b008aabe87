// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use dynfeed_error::{FeedError, Result};
use dynfeed_source::{RawRecord, RecordReader, RecordSource};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What happens once a pass of a [`ScriptedSource`] has served all its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEnding {
    /// Clean end of stream.
    Eof,
    /// The next read fails with an I/O error.
    IoError,
    /// The next read never completes.
    Stall,
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    live_readers: AtomicUsize,
}

/// A [`RecordSource`] that replays scripted lines and ends every pass with a
/// chosen [`PassEnding`].
///
/// Clones share their counters.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    lines: Arc<[String]>,
    ending: PassEnding,
    available_opens: Option<usize>,
    counters: Arc<Counters>,
}

impl ScriptedSource {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>, ending: PassEnding) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ending,
            available_opens: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// The source passes `check_available` but every `open` after the first
    /// `opens` ones fails with `SourceNotFound`.
    #[must_use]
    pub fn vanish_after_opens(mut self, opens: usize) -> Self {
        self.available_opens = Some(opens);
        self
    }

    /// Number of `open` calls so far, successful or not.
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Readers handed out and not dropped yet.
    pub fn live_readers(&self) -> usize {
        self.counters.live_readers.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    fn location(&self) -> String {
        "scripted".to_string()
    }

    async fn check_available(&self) -> Result<()> {
        Ok(())
    }

    async fn open(&self) -> Result<Box<dyn RecordReader>> {
        let previous = self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if self.available_opens.is_some_and(|limit| previous >= limit) {
            return Err(FeedError::source_not_found(self.location()));
        }

        self.counters.live_readers.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedReader {
            lines: Arc::clone(&self.lines),
            ending: self.ending,
            next: 0,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct ScriptedReader {
    lines: Arc<[String]>,
    ending: PassEnding,
    next: usize,
    counters: Arc<Counters>,
}

#[async_trait]
impl RecordReader for ScriptedReader {
    async fn read_next(&mut self) -> Result<Option<RawRecord>> {
        if let Some(text) = self.lines.get(self.next) {
            self.next += 1;
            return Ok(Some(RawRecord::new(self.next as u64, text.clone())));
        }

        match self.ending {
            PassEnding::Eof => Ok(None),
            PassEnding::IoError => Err(FeedError::io(
                "reading scripted source",
                io::Error::new(io::ErrorKind::BrokenPipe, "device went away"),
            )),
            PassEnding::Stall => std::future::pending().await,
        }
    }
}

impl Drop for ScriptedReader {
    fn drop(&mut self) {
        self.counters.live_readers.fetch_sub(1, Ordering::SeqCst);
    }
}
