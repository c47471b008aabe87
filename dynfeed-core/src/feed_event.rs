// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Observation;
use dynfeed_error::FeedError;
use std::sync::Arc;

/// An event published on the feed channel.
///
/// The end of a subscription stream plays the role of the implicit `Closed`
/// event: it happens once the channel itself is dropped.
///
/// Once a `ConnectionFailure` with `recoverable == false` has been published,
/// the producer run that published it is over.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A freshly decoded observation.
    NewObservation(Observation),
    /// The producer hit a failure while reading or decoding.
    ConnectionFailure {
        /// Shared so that every subscriber receives the same error.
        cause: Arc<FeedError>,
        /// Whether a fresh `connect()` can be expected to work.
        recoverable: bool,
    },
}

impl FeedEvent {
    /// Builds a `ConnectionFailure` event.
    #[must_use]
    pub fn connection_failure(cause: FeedError, recoverable: bool) -> Self {
        Self::ConnectionFailure {
            cause: Arc::new(cause),
            recoverable,
        }
    }

    pub const fn is_observation(&self) -> bool {
        matches!(self, Self::NewObservation(_))
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailure { .. })
    }

    pub const fn observation(&self) -> Option<&Observation> {
        match self {
            Self::NewObservation(observation) => Some(observation),
            Self::ConnectionFailure { .. } => None,
        }
    }

    pub fn into_observation(self) -> Option<Observation> {
        match self {
            Self::NewObservation(observation) => Some(observation),
            Self::ConnectionFailure { .. } => None,
        }
    }

    /// Returns the failure cause and its recoverability, if this is a failure event.
    pub fn failure(&self) -> Option<(&FeedError, bool)> {
        match self {
            Self::NewObservation(_) => None,
            Self::ConnectionFailure { cause, recoverable } => Some((cause.as_ref(), *recoverable)),
        }
    }
}

impl From<Observation> for FeedEvent {
    fn from(observation: Observation) -> Self {
        Self::NewObservation(observation)
    }
}
