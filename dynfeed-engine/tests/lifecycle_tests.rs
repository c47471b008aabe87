// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use dynfeed_core::{ais_vessel_schema, ConnectionStatus, FeedError, Observation};
use dynfeed_engine::{EntityFeedProvider, FeedConfig, FeedEngine, RunOutcome};
use dynfeed_source::MemorySource;
use dynfeed_test_utils::{
    assert_no_event_emitted, jsonl_file, mmsi_at, next_observation, vessel_record, vessel_records,
    wait_until, write_lines, PassEnding, ScriptedSource,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

fn fast_replay() -> FeedConfig {
    FeedConfig::replay().with_pacing(Duration::ZERO)
}

async fn wait_for_run_end(engine: &FeedEngine) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while engine.is_running().await {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("producer run did not end");
}

#[tokio::test]
async fn test_connect_missing_file_fails_without_spawning() -> anyhow::Result<()> {
    // Arrange
    let dir = tempfile::tempdir()?;
    let engine = FeedEngine::from_file(
        dir.path().join("absent.jsonl"),
        ais_vessel_schema(),
        fast_replay(),
    )?;

    // Act
    let result = engine.connect().await;

    // Assert
    assert!(matches!(result, Err(FeedError::SourceNotFound { .. })));
    assert!(!engine.is_running().await);
    assert_eq!(engine.status(), ConnectionStatus::Disconnected);
    assert_eq!(engine.disconnect().await, None);
    Ok(())
}

#[tokio::test]
async fn test_second_connect_while_running_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let source = ScriptedSource::new(vessel_records(2), PassEnding::Stall);
    let engine = FeedEngine::new(source, ais_vessel_schema(), fast_replay())?;
    engine.connect().await?;

    // Act
    let second = engine.connect().await;

    // Assert
    assert!(matches!(second, Err(FeedError::AlreadyConnected)));
    assert_eq!(engine.disconnect().await, Some(RunOutcome::Cancelled));
    engine.connect().await?;
    assert_eq!(engine.disconnect().await, Some(RunOutcome::Cancelled));
    Ok(())
}

#[tokio::test]
async fn test_disconnect_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let engine = FeedEngine::new(
        MemorySource::new(vessel_records(1)),
        ais_vessel_schema(),
        fast_replay(),
    )?;

    // Act
    let before_connect = engine.disconnect().await;
    engine.connect().await?;
    let first = engine.disconnect().await;
    let second = engine.disconnect().await;

    // Assert
    assert_eq!(before_connect, None);
    assert!(first.is_some());
    assert_eq!(second, None);
    assert_eq!(engine.status(), ConnectionStatus::Disconnected);
    Ok(())
}

#[tokio::test]
async fn test_connect_reaps_a_run_that_ended_on_its_own() -> anyhow::Result<()> {
    // Arrange
    let engine = FeedEngine::new(
        MemorySource::new(vessel_records(1)),
        ais_vessel_schema(),
        fast_replay(),
    )?;
    let mut feed = engine.subscribe();
    engine.connect().await?;
    let first_run = next_observation(&mut feed).await;
    wait_for_run_end(&engine).await;

    // Act
    engine.connect().await?;
    let second_run = next_observation(&mut feed).await;

    // Assert
    assert_eq!(first_run.sequence(), 0);
    assert_eq!(second_run.sequence(), 0);
    assert_eq!(second_run.entity_id("MMSI"), Some(mmsi_at(0)));
    assert_eq!(engine.disconnect().await, Some(RunOutcome::Exhausted));
    Ok(())
}

#[tokio::test]
async fn test_connect_returns_before_ingestion_completes() -> anyhow::Result<()> {
    // Arrange
    let engine = FeedEngine::new(
        MemorySource::new(vessel_records(100)),
        ais_vessel_schema(),
        FeedConfig::replay().with_pacing(Duration::from_millis(50)),
    )?;
    let started = Instant::now();

    // Act
    engine.connect().await?;

    // Assert
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(engine.is_running().await);
    assert_eq!(engine.disconnect().await, Some(RunOutcome::Cancelled));
    Ok(())
}

#[tokio::test]
async fn test_status_follows_connect_and_disconnect() -> anyhow::Result<()> {
    // Arrange
    let source = ScriptedSource::new(vessel_records(1), PassEnding::Stall);
    let engine = FeedEngine::new(source, ais_vessel_schema(), fast_replay())?;
    let status = engine.watch_status();
    assert_eq!(*status.borrow(), ConnectionStatus::Disconnected);

    // Act
    engine.connect().await?;
    let connected = *status.borrow();
    engine.disconnect().await;
    let disconnected = *status.borrow();

    // Assert
    assert_eq!(connected, ConnectionStatus::Connected);
    assert_eq!(disconnected, ConnectionStatus::Disconnected);
    assert!(connected.is_connected());
    Ok(())
}

#[tokio::test]
async fn test_schema_is_stable_across_connect_cycles() -> anyhow::Result<()> {
    // Arrange
    let engine = FeedEngine::new(
        MemorySource::new(vessel_records(3)),
        ais_vessel_schema(),
        fast_replay(),
    )?;
    let before = engine.load_schema();

    // Act
    for _ in 0..3 {
        engine.connect().await?;
        engine.disconnect().await;
    }
    let after = engine.load_schema();

    // Assert
    assert_eq!(before, after);
    assert_eq!(after, ais_vessel_schema());
    assert_eq!(after.entity_id_field(), "MMSI");
    Ok(())
}

#[tokio::test]
async fn test_disconnect_stops_publishing_and_releases_the_source() -> anyhow::Result<()> {
    // Arrange
    let source = ScriptedSource::new(vessel_records(500), PassEnding::Eof);
    let engine = FeedEngine::new(
        source.clone(),
        ais_vessel_schema(),
        FeedConfig::replay().with_pacing(Duration::from_millis(1)),
    )?;
    let mut feed = engine.subscribe();
    engine.connect().await?;
    for _ in 0..3 {
        next_observation(&mut feed).await;
    }

    // Act
    let outcome = engine.disconnect().await;
    let published = engine.stats().published;

    // Assert
    assert_eq!(outcome, Some(RunOutcome::Cancelled));
    assert_eq!(source.live_readers(), 0);
    for _ in 3..published {
        next_observation(&mut feed).await;
    }
    assert_no_event_emitted(&mut feed, 50).await;
    assert_eq!(engine.stats().published, published);
    Ok(())
}

#[tokio::test]
async fn test_file_can_be_rewritten_between_runs() -> anyhow::Result<()> {
    // Arrange
    let file = jsonl_file(&vessel_records(200));
    let engine = FeedEngine::from_file(
        file.path(),
        ais_vessel_schema(),
        FeedConfig::replay().with_pacing(Duration::from_millis(1)),
    )?;
    let mut feed = engine.subscribe();
    engine.connect().await?;
    next_observation(&mut feed).await;
    engine.disconnect().await;
    let mut feed = engine.subscribe();

    // Act
    write_lines(file.path(), &[vessel_record("999", "REWRITTEN", 1.0, 2.0)]);
    engine.connect().await?;
    let observation: Observation = next_observation(&mut feed).await;
    wait_for_run_end(&engine).await;

    // Assert
    assert_eq!(observation.entity_id("MMSI"), Some("999".to_string()));
    assert_eq!(engine.disconnect().await, Some(RunOutcome::Exhausted));
    Ok(())
}

#[tokio::test]
async fn test_dropping_the_engine_cancels_the_run() -> anyhow::Result<()> {
    // Arrange
    let source = ScriptedSource::new(vessel_records(1), PassEnding::Stall);
    let engine = FeedEngine::new(source.clone(), ais_vessel_schema(), fast_replay())?;
    engine.connect().await?;
    assert!(wait_until(|| source.live_readers() == 1, 1_000).await);

    // Act
    drop(engine);

    // Assert
    assert!(wait_until(|| source.live_readers() == 0, 1_000).await);
    Ok(())
}

#[tokio::test]
async fn test_engine_drives_through_provider_hooks() -> anyhow::Result<()> {
    // Arrange
    let provider: Arc<dyn EntityFeedProvider> = Arc::new(FeedEngine::new(
        MemorySource::new(vessel_records(2)),
        ais_vessel_schema(),
        fast_replay(),
    )?);

    // Act
    let schema = provider.on_load().await?;
    let mut feed = provider.feed();
    provider.on_connect().await?;
    let first = next_observation(&mut feed).await;
    provider.on_disconnect().await;

    // Assert
    assert_eq!(schema, ais_vessel_schema());
    assert_eq!(first.entity_id(schema.entity_id_field()), Some(mmsi_at(0)));
    Ok(())
}
