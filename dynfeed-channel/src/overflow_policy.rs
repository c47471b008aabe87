// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use dynfeed_error::{FeedError, Result};
use serde::{Deserialize, Serialize};

/// Default ring size of a drop-oldest channel.
pub const DEFAULT_DROP_OLDEST_CAPACITY: usize = 1024;

/// Default per-subscriber buffer of a blocking channel.
pub const DEFAULT_BLOCK_CAPACITY: usize = 1;

/// Largest accepted capacity. Drop-oldest channels allocate their ring up front.
pub const MAX_CAPACITY: usize = 1 << 20;

/// What the channel does when a subscriber falls behind.
///
/// Serialized with a `mode` tag:
///
/// ```json
/// {"mode": "drop_oldest", "capacity": 1024}
/// {"mode": "block", "capacity": 1}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Publish never waits. A subscriber more than `capacity` events behind
    /// loses its oldest unread events.
    DropOldest {
        #[serde(default = "default_drop_oldest_capacity")]
        capacity: usize,
    },
    /// Publish waits until every live subscriber has room in its `capacity`
    /// sized buffer, and until at least one subscriber is attached.
    Block {
        #[serde(default = "default_block_capacity")]
        capacity: usize,
    },
}

const fn default_drop_oldest_capacity() -> usize {
    DEFAULT_DROP_OLDEST_CAPACITY
}

const fn default_block_capacity() -> usize {
    DEFAULT_BLOCK_CAPACITY
}

impl OverflowPolicy {
    #[must_use]
    pub const fn drop_oldest() -> Self {
        Self::DropOldest {
            capacity: DEFAULT_DROP_OLDEST_CAPACITY,
        }
    }

    #[must_use]
    pub const fn block() -> Self {
        Self::Block {
            capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }

    pub const fn capacity(&self) -> usize {
        match self {
            Self::DropOldest { capacity } | Self::Block { capacity } => *capacity,
        }
    }

    /// Whether `publish` may suspend the producer.
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// # Errors
    ///
    /// Returns [`FeedError::InvalidConfig`] for a zero capacity or one above
    /// [`MAX_CAPACITY`].
    pub fn validate(&self) -> Result<()> {
        match self.capacity() {
            0 => Err(FeedError::invalid_config(
                "overflow capacity must be greater than zero",
            )),
            capacity if capacity > MAX_CAPACITY => Err(FeedError::invalid_config(format!(
                "overflow capacity {capacity} exceeds the maximum of {MAX_CAPACITY}"
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        Self::drop_oldest()
    }
}
