// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Engine configuration.
//!
//! [`FeedConfig`] is injected at construction time. It can be built in code from
//! one of the presets or loaded from JSON:
//!
//! ```json
//! {
//!   "pacing_ms": 10,
//!   "overflow": { "mode": "block", "capacity": 1 },
//!   "loop_on_eof": true,
//!   "on_decode_error": "skip",
//!   "read_timeout_ms": 2000
//! }
//! ```
//!
//! Missing keys take their value from [`FeedConfig::default`], unknown keys are
//! rejected.

use dynfeed_channel::OverflowPolicy;
use dynfeed_error::{FeedError, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Default delay between two published observations.
pub const DEFAULT_PACING: Duration = Duration::from_millis(10);

/// What the producer does with a line that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorPolicy {
    /// Log the line and move on to the next one.
    Skip,
    /// Publish a recoverable `ConnectionFailure` and end the run.
    #[default]
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Fixed delay before each published observation.
    #[serde(rename = "pacing_ms", deserialize_with = "millis")]
    pub pacing: Duration,
    pub overflow: OverflowPolicy,
    /// Reopen the source from the start when it is exhausted.
    pub loop_on_eof: bool,
    pub on_decode_error: DecodeErrorPolicy,
    /// Upper bound for a single read; `None` waits forever.
    #[serde(rename = "read_timeout_ms", deserialize_with = "optional_millis")]
    pub read_timeout: Option<Duration>,
}

impl FeedConfig {
    /// Terminates at the end of the source, never blocks on consumers, stops on
    /// the first malformed line.
    #[must_use]
    pub const fn replay() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            overflow: OverflowPolicy::drop_oldest(),
            loop_on_eof: false,
            on_decode_error: DecodeErrorPolicy::Fail,
            read_timeout: None,
        }
    }

    /// Loops over the source forever, waits for consumers, skips malformed lines.
    #[must_use]
    pub const fn simulation() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            overflow: OverflowPolicy::block(),
            loop_on_eof: true,
            on_decode_error: DecodeErrorPolicy::Skip,
            read_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub const fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    #[must_use]
    pub const fn with_loop_on_eof(mut self, loop_on_eof: bool) -> Self {
        self.loop_on_eof = loop_on_eof;
        self
    }

    #[must_use]
    pub const fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.on_decode_error = policy;
        self
    }

    #[must_use]
    pub const fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] for a zero channel capacity or a
    /// zero read timeout.
    pub fn validate(&self) -> Result<()> {
        self.overflow.validate()?;
        if self.read_timeout.is_some_and(|limit| limit.is_zero()) {
            return Err(FeedError::invalid_config(
                "read_timeout_ms must be greater than zero when set",
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] when the JSON is malformed, carries an
    /// unknown key, or fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|error| FeedError::invalid_config(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|error| {
            FeedError::io(format!("reading configuration {}", path.display()), error)
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::replay()
    }
}

fn millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn optional_millis<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(|millis| millis.map(Duration::from_millis))
}
