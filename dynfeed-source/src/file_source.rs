// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{RawRecord, RecordReader, RecordSource};
use async_trait::async_trait;
use dynfeed_error::{FeedError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Newline-delimited records stored in a file.
///
/// File access goes through `tokio::fs`, which runs the blocking reads on the
/// runtime's blocking pool, away from the pacing and publishing logic.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn not_found(&self) -> FeedError {
        FeedError::source_not_found(self.location())
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn check_available(&self) -> Result<()> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) if metadata.is_file() => Ok(()),
            Ok(_) => Err(self.not_found()),
            Err(error) if error.kind() == ErrorKind::NotFound => Err(self.not_found()),
            Err(error) => Err(FeedError::io(
                format!("inspecting {}", self.location()),
                error,
            )),
        }
    }

    async fn open(&self) -> Result<Box<dyn RecordReader>> {
        let file = File::open(&self.path).await.map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                self.not_found()
            } else {
                FeedError::io(format!("opening {}", self.location()), error)
            }
        })?;

        Ok(Box::new(FileReader {
            location: self.location(),
            reader: BufReader::new(file),
            buffer: Vec::new(),
            line: 0,
        }))
    }
}

struct FileReader {
    location: String,
    reader: BufReader<File>,
    buffer: Vec<u8>,
    line: u64,
}

#[async_trait]
impl RecordReader for FileReader {
    async fn read_next(&mut self) -> Result<Option<RawRecord>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .await
            .map_err(|error| {
                FeedError::io(
                    format!("reading line {} of {}", self.line + 1, self.location),
                    error,
                )
            })?;

        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut bytes = self.buffer.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }

        // The whole line has been consumed, so the next read starts on the next line.
        let text = std::str::from_utf8(bytes).map_err(|error| {
            FeedError::decode(self.line, format!("line is not valid UTF-8: {error}"))
        })?;
        Ok(Some(RawRecord::new(self.line, text)))
    }
}
