// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use dynfeed_core::{FeedError, FeedEvent, Observation};
use futures::stream::StreamExt;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

const NEXT_EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn assert_no_event_emitted<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = FeedEvent> + Unpin,
{
    tokio::select! {
        event = stream.next() => {
            if let Some(event) = event {
                panic!("Unexpected event emitted, expected no output: {event:?}");
            }
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits up to five seconds for the next event.
pub async fn next_event<S>(stream: &mut S) -> FeedEvent
where
    S: Stream<Item = FeedEvent> + Unpin,
{
    timeout(NEXT_EVENT_TIMEOUT, stream.next())
        .await
        .expect("timed out waiting for the next event")
        .expect("feed stream ended")
}

pub async fn next_observation<S>(stream: &mut S) -> Observation
where
    S: Stream<Item = FeedEvent> + Unpin,
{
    match next_event(stream).await {
        FeedEvent::NewObservation(observation) => observation,
        other => panic!("expected an observation, got {other:?}"),
    }
}

pub async fn next_failure<S>(stream: &mut S) -> (Arc<FeedError>, bool)
where
    S: Stream<Item = FeedEvent> + Unpin,
{
    match next_event(stream).await {
        FeedEvent::ConnectionFailure { cause, recoverable } => (cause, recoverable),
        other => panic!("expected a connection failure, got {other:?}"),
    }
}

pub async fn collect_observations<S>(stream: &mut S, count: usize) -> Vec<Observation>
where
    S: Stream<Item = FeedEvent> + Unpin,
{
    let mut observations = Vec::with_capacity(count);
    for _ in 0..count {
        observations.push(next_observation(stream).await);
    }
    observations
}

/// Polls `condition` every few milliseconds; returns whether it held within `timeout_ms`.
pub async fn wait_until<F>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(5)).await;
    }
}
