// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the dynfeed observation feed engine
//!
//! This crate defines the root [`FeedError`] type shared by every dynfeed crate.
//! Variants are split into two families:
//!
//! - **Fatal** errors surface synchronously from `connect()` or from construction
//!   (missing source, invalid configuration or schema) and are never retried.
//! - **Recoverable** errors happen inside a running producer (malformed record,
//!   read failure, read timeout) and reach consumers wrapped in a
//!   `ConnectionFailure` feed event.
//!
//! Cancellation of a producer is deliberately absent from this enum: it is a
//! normal way for a run to end, not a failure.
//!
//! # Examples
//!
//! ```
//! use dynfeed_error::{FeedError, Result};
//!
//! fn open_feed(exists: bool) -> Result<()> {
//!     if !exists {
//!         return Err(FeedError::source_not_found("vessels.jsonl"));
//!     }
//!     Ok(())
//! }
//!
//! let err = open_feed(false).unwrap_err();
//! assert!(err.is_fatal());
//! ```

use std::time::Duration;

/// Root error type for all dynfeed operations
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The record source does not exist
    ///
    /// Raised by `connect()` before any producer task is spawned, or by a
    /// running producer when the source vanished before it could be (re)opened.
    #[error("Record source not found: {location}")]
    SourceNotFound {
        /// Path or description of the missing source
        location: String,
    },

    /// `connect()` was called while a producer task is still running
    #[error("Feed is already connected")]
    AlreadyConnected,

    /// A raw record could not be decoded into an observation
    #[error("Malformed record at line {line}: {reason}")]
    Decode {
        /// 1-based line number within the current pass over the source
        line: u64,
        /// Parser diagnostic
        reason: String,
    },

    /// Reading from the record source failed
    #[error("I/O failure while {context}")]
    Io {
        /// What the producer was doing when the failure happened
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A single read from the record source took longer than the configured limit
    #[error("Reading the next record timed out after {duration:?}")]
    ReadTimeout {
        /// The configured per-read limit
        duration: Duration,
    },

    /// The engine configuration is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the offending setting
        message: String,
    },

    /// The schema descriptor is inconsistent
    #[error("Invalid schema: {message}")]
    InvalidSchema {
        /// Description of the inconsistency
        message: String,
    },
}

impl FeedError {
    /// Create a source-not-found error for the given location
    pub fn source_not_found(location: impl Into<String>) -> Self {
        Self::SourceNotFound {
            location: location.into(),
        }
    }

    /// Create a decode error for the given line
    pub fn decode(line: u64, reason: impl Into<String>) -> Self {
        Self::Decode {
            line,
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a read timeout error
    #[must_use]
    pub const fn read_timeout(duration: Duration) -> Self {
        Self::ReadTimeout { duration }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Check if this error leaves room for a fresh `connect()` to succeed
    ///
    /// Recoverable errors are the ones a running producer reports through a
    /// `ConnectionFailure` event with `recoverable = true`.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::Io { .. } | Self::ReadTimeout { .. }
        )
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::InvalidConfig { .. } | Self::InvalidSchema { .. }
        )
    }
}

/// Specialized Result type for dynfeed operations
///
/// # Examples
///
/// ```
/// use dynfeed_error::Result;
///
/// fn pace() -> Result<u64> {
///     Ok(10)
/// }
/// ```
pub type Result<T> = std::result::Result<T, FeedError>;
