// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use dynfeed_channel::{FeedChannel, OverflowPolicy, MAX_CAPACITY};
use dynfeed_core::{AttributeValue, FeedError, FeedEvent, Observation};
use dynfeed_test_utils::{assert_no_event_emitted, collect_observations, next_event, next_failure};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::{Duration, Instant};

fn observation(sequence: u64) -> FeedEvent {
    let attributes = HashMap::from([(
        "MMSI".to_string(),
        AttributeValue::from(sequence.to_string()),
    )]);
    Observation::new(sequence, None, attributes).into()
}

#[tokio::test]
async fn test_drop_oldest_preserves_order_without_overflow() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::drop_oldest())?;
    let mut feed = channel.subscribe();

    // Act
    for sequence in 0..10 {
        channel.publish(observation(sequence)).await;
    }

    // Assert
    let sequences: Vec<u64> = collect_observations(&mut feed, 10)
        .await
        .iter()
        .map(Observation::sequence)
        .collect();
    assert_eq!(sequences, (0..10).collect::<Vec<_>>());
    assert_eq!(feed.missed(), 0);
    Ok(())
}

#[tokio::test]
async fn test_drop_oldest_publish_never_waits_for_slow_subscriber() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::DropOldest { capacity: 4 })?;
    let mut feed = channel.subscribe();
    let started = Instant::now();

    // Act
    for sequence in 0..1_000 {
        channel.publish(observation(sequence)).await;
    }
    let elapsed = started.elapsed();

    // Assert
    assert!(elapsed < Duration::from_secs(1), "publish blocked: {elapsed:?}");
    let survivors = collect_observations(&mut feed, 4).await;
    let sequences: Vec<u64> = survivors.iter().map(Observation::sequence).collect();
    assert_eq!(sequences, vec![996, 997, 998, 999]);
    assert_eq!(feed.missed(), 996);
    Ok(())
}

#[tokio::test]
async fn test_drop_oldest_late_subscriber_misses_earlier_events() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::drop_oldest())?;

    // Act
    channel.publish(observation(0)).await;
    let mut feed = channel.subscribe();
    channel.publish(observation(1)).await;

    // Assert
    let event = next_event(&mut feed).await;
    assert_eq!(event.observation().map(Observation::sequence), Some(1));
    assert_no_event_emitted(&mut feed, 20).await;
    Ok(())
}

#[tokio::test]
async fn test_every_subscriber_receives_the_same_failure() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::drop_oldest())?;
    let mut first = channel.subscribe();
    let mut second = channel.subscribe();

    // Act
    channel
        .publish(FeedEvent::connection_failure(FeedError::decode(3, "bad"), true))
        .await;

    // Assert
    let (first_cause, first_recoverable) = next_failure(&mut first).await;
    let (second_cause, _) = next_failure(&mut second).await;
    assert!(first_recoverable);
    assert!(std::sync::Arc::ptr_eq(&first_cause, &second_cause));
    Ok(())
}

#[tokio::test]
async fn test_subscription_ends_when_channel_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::block())?;
    let mut feed = channel.subscribe();

    // Act
    drop(channel);

    // Assert
    assert!(feed.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_block_publish_waits_for_a_subscriber() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::block())?;
    let publisher = channel.clone();
    let publishing = tokio::spawn(async move {
        publisher.publish(observation(0)).await;
    });

    // Act
    tokio::time::sleep(Duration::from_millis(30)).await;
    let still_waiting = !publishing.is_finished();
    let mut feed = channel.subscribe();

    // Assert
    assert!(still_waiting);
    let event = next_event(&mut feed).await;
    assert_eq!(event.observation().map(Observation::sequence), Some(0));
    publishing.await?;
    Ok(())
}

#[tokio::test]
async fn test_block_publish_suspends_while_buffer_is_full() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::Block { capacity: 2 })?;
    let mut feed = channel.subscribe();
    let publisher = channel.clone();
    let publishing = tokio::spawn(async move {
        for sequence in 0..5 {
            publisher.publish(observation(sequence)).await;
        }
    });

    // Act
    tokio::time::sleep(Duration::from_millis(30)).await;
    let blocked = !publishing.is_finished();
    let received = collect_observations(&mut feed, 5).await;

    // Assert
    assert!(blocked, "publish should wait for the slow subscriber");
    let sequences: Vec<u64> = received.iter().map(Observation::sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    assert_eq!(feed.missed(), 0);
    publishing.await?;
    Ok(())
}

#[tokio::test]
async fn test_block_drops_departed_subscribers() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::block())?;
    let gone = channel.subscribe();
    let mut stays = channel.subscribe();
    drop(gone);

    // Act
    channel.publish(observation(7)).await;

    // Assert
    assert_eq!(channel.subscriber_count(), 1);
    let event = next_event(&mut stays).await;
    assert_eq!(event.observation().map(Observation::sequence), Some(7));
    Ok(())
}

#[test]
fn test_zero_capacity_is_rejected() {
    // Act
    let drop_oldest = FeedChannel::new(OverflowPolicy::DropOldest { capacity: 0 });
    let block = FeedChannel::new(OverflowPolicy::Block { capacity: 0 });

    // Assert
    assert!(matches!(drop_oldest, Err(FeedError::InvalidConfig { .. })));
    assert!(matches!(block, Err(FeedError::InvalidConfig { .. })));
}

#[tokio::test]
async fn test_block_cancelled_publish_reaches_no_subscriber() -> anyhow::Result<()> {
    // Arrange
    let channel = FeedChannel::new(OverflowPolicy::Block { capacity: 1 })?;
    let mut fast = channel.subscribe();
    let mut slow = channel.subscribe();
    channel.publish(observation(0)).await;
    next_event(&mut fast).await;

    // Act
    let published =
        tokio::time::timeout(Duration::from_millis(50), channel.publish(observation(1))).await;

    // Assert
    assert!(published.is_err(), "publish should wait for the slow subscriber");
    let event = next_event(&mut slow).await;
    assert_eq!(event.observation().map(Observation::sequence), Some(0));
    assert_no_event_emitted(&mut fast, 50).await;
    assert_no_event_emitted(&mut slow, 50).await;
    Ok(())
}

#[test]
fn test_oversized_capacity_is_rejected() {
    // Act
    let drop_oldest = FeedChannel::new(OverflowPolicy::DropOldest {
        capacity: usize::MAX,
    });
    let block = FeedChannel::new(OverflowPolicy::Block {
        capacity: MAX_CAPACITY + 1,
    });
    let largest = FeedChannel::new(OverflowPolicy::Block {
        capacity: MAX_CAPACITY,
    });

    // Assert
    assert!(matches!(drop_oldest, Err(FeedError::InvalidConfig { .. })));
    assert!(matches!(block, Err(FeedError::InvalidConfig { .. })));
    assert!(largest.is_ok());
}
