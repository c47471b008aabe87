// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{RawRecord, RecordReader, RecordSource};
use async_trait::async_trait;
use dynfeed_error::Result;
use std::sync::Arc;

/// A source over a fixed, in-memory list of lines.
///
/// Always available. Every pass replays the same lines from the start.
///
/// # Example
///
/// ```rust
/// use dynfeed_source::{MemorySource, RecordSource};
///
/// # #[tokio::main]
/// # async fn main() -> dynfeed_error::Result<()> {
/// let source = MemorySource::new(vec![r#"{"attributes":{"MMSI":"1"}}"#]);
/// let mut reader = source.open().await?;
///
/// let first = reader.read_next().await?.expect("one line");
/// assert_eq!(first.line, 1);
/// assert!(reader.read_next().await?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    lines: Arc<[String]>,
}

impl MemorySource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn location(&self) -> String {
        format!("memory ({} lines)", self.lines.len())
    }

    async fn check_available(&self) -> Result<()> {
        Ok(())
    }

    async fn open(&self) -> Result<Box<dyn RecordReader>> {
        Ok(Box::new(MemoryReader {
            lines: Arc::clone(&self.lines),
            next: 0,
        }))
    }
}

struct MemoryReader {
    lines: Arc<[String]>,
    next: usize,
}

#[async_trait]
impl RecordReader for MemoryReader {
    async fn read_next(&mut self) -> Result<Option<RawRecord>> {
        let Some(text) = self.lines.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        Ok(Some(RawRecord::new(self.next as u64, text.clone())))
    }
}
