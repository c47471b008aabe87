// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use dynfeed::prelude::*;
use dynfeed::{DecodeErrorPolicy, RunOutcome};
use dynfeed_test_utils::{
    jsonl_file, malformed_record, mmsi_at, next_failure, next_observation, record_without_geometry,
    vessel_records, wait_until,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_file_feed_replays_into_entity_layer() -> anyhow::Result<()> {
    // Arrange
    let mut lines = vessel_records(4);
    lines.push(record_without_geometry(&mmsi_at(0)));
    let file = jsonl_file(&lines);
    let config = FeedConfig::replay().with_pacing(Duration::from_millis(1));
    let engine = Arc::new(FeedEngine::from_file(file.path(), ais_vessel_schema(), config)?);
    let mut layer = EntityLayer::new(Arc::clone(&engine));

    // Act
    let tracker = layer.load().await?;
    layer.start().await?;
    let settled = wait_until(
        || {
            tracker
                .entity(&mmsi_at(0))
                .is_some_and(|entity| entity.observation_count() == 2)
        },
        2_000,
    )
    .await;
    layer.stop().await;

    // Assert
    assert!(settled);
    assert_eq!(tracker.len(), 4);
    let first_vessel = tracker.entity(&mmsi_at(0)).expect("tracked");
    assert_eq!(first_vessel.latest().and_then(Observation::position), None);
    assert_eq!(engine.status(), ConnectionStatus::Disconnected);
    assert_eq!(engine.stats().published, 5);
    Ok(())
}

#[tokio::test]
async fn test_both_decode_policies_on_the_same_input() -> anyhow::Result<()> {
    // Arrange
    let mut lines = vessel_records(3);
    lines.insert(1, malformed_record());
    let skipping = FeedEngine::new(
        MemorySource::new(lines.clone()),
        ais_vessel_schema(),
        FeedConfig::replay()
            .with_pacing(Duration::ZERO)
            .with_decode_error_policy(DecodeErrorPolicy::Skip),
    )?;
    let failing = FeedEngine::new(
        MemorySource::new(lines),
        ais_vessel_schema(),
        FeedConfig::replay().with_pacing(Duration::ZERO),
    )?;
    let mut skipped_feed = skipping.subscribe();
    let mut failing_feed = failing.subscribe();

    // Act
    skipping.connect().await?;
    failing.connect().await?;
    let mut skipped = Vec::new();
    for _ in 0..3 {
        skipped.push(next_observation(&mut skipped_feed).await);
    }
    let before_failure = next_observation(&mut failing_feed).await;
    let (cause, recoverable) = next_failure(&mut failing_feed).await;

    // Assert
    assert_eq!(skipped.len(), 3);
    assert_eq!(before_failure.entity_id("MMSI"), Some(mmsi_at(0)));
    assert!(matches!(cause.as_ref(), FeedError::Decode { line: 2, .. }));
    assert!(recoverable);
    assert!(skipping.disconnect().await.is_some());
    assert_eq!(failing.disconnect().await, Some(RunOutcome::Failed));
    Ok(())
}
