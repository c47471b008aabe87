// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{FeedSubscription, OverflowPolicy};
use dynfeed_core::FeedEvent;
use dynfeed_error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Single-producer, multi-subscriber conduit for [`FeedEvent`]s.
///
/// Cheap to clone; all clones share the same subscribers. The channel outlives
/// individual producer runs. Subscription streams end only once every clone has
/// been dropped.
///
/// Subscribers are hot: they only see events published after they subscribed.
/// Under [`OverflowPolicy::Block`] nothing published is lost, because `publish`
/// waits for a subscriber when none is attached.
///
/// # Example
///
/// ```
/// use dynfeed_channel::{FeedChannel, OverflowPolicy};
/// use dynfeed_core::{FeedEvent, Observation};
/// use futures::StreamExt;
/// use std::collections::HashMap;
///
/// # #[tokio::main]
/// # async fn main() -> dynfeed_error::Result<()> {
/// let channel = FeedChannel::new(OverflowPolicy::drop_oldest())?;
/// let mut feed = channel.subscribe();
///
/// channel.publish(Observation::new(0, None, HashMap::new()).into()).await;
///
/// let event = feed.next().await.expect("one event");
/// assert!(event.is_observation());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FeedChannel {
    inner: Arc<ChannelInner>,
}

#[derive(Debug)]
enum ChannelInner {
    DropOldest(broadcast::Sender<FeedEvent>),
    Block(BlockingRegistry),
}

#[derive(Debug)]
struct BlockingRegistry {
    capacity: usize,
    senders: Mutex<Vec<mpsc::Sender<FeedEvent>>>,
    subscribers: watch::Sender<usize>,
}

impl FeedChannel {
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the policy capacity is zero or above
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn new(policy: OverflowPolicy) -> Result<Self> {
        policy.validate()?;

        let inner = match policy {
            OverflowPolicy::DropOldest { capacity } => {
                let (tx, _) = broadcast::channel(capacity);
                ChannelInner::DropOldest(tx)
            }
            OverflowPolicy::Block { capacity } => {
                let (subscribers, _) = watch::channel(0);
                ChannelInner::Block(BlockingRegistry {
                    capacity,
                    senders: Mutex::new(Vec::new()),
                    subscribers,
                })
            }
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Attaches a new subscriber that sees every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> FeedSubscription {
        match self.inner.as_ref() {
            ChannelInner::DropOldest(tx) => FeedSubscription::drop_oldest(tx.subscribe()),
            ChannelInner::Block(registry) => FeedSubscription::blocking(registry.attach()),
        }
    }

    /// Publishes one event.
    ///
    /// Never suspends under [`OverflowPolicy::DropOldest`]; events published with
    /// no subscriber attached are discarded. Under [`OverflowPolicy::Block`] this
    /// waits for buffer room and for a subscriber, and is cancel safe: dropping
    /// the future abandons the event for every subscriber. An event is handed
    /// out only once a slot is reserved in each live subscriber's buffer.
    pub async fn publish(&self, event: FeedEvent) {
        match self.inner.as_ref() {
            ChannelInner::DropOldest(tx) => {
                // Err only means "no subscriber right now".
                let _ = tx.send(event);
            }
            ChannelInner::Block(registry) => registry.deliver(event).await,
        }
    }

    /// Number of subscribers currently attached.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match self.inner.as_ref() {
            ChannelInner::DropOldest(tx) => tx.receiver_count(),
            ChannelInner::Block(registry) => registry.live_senders().len(),
        }
    }
}

impl BlockingRegistry {
    fn attach(&self) -> mpsc::Receiver<FeedEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut senders = self.senders.lock();
        senders.push(tx);
        self.subscribers.send_replace(senders.len());
        rx
    }

    fn live_senders(&self) -> Vec<mpsc::Sender<FeedEvent>> {
        let mut senders = self.senders.lock();
        senders.retain(|tx| !tx.is_closed());
        self.subscribers.send_replace(senders.len());
        senders.clone()
    }

    async fn deliver(&self, event: FeedEvent) {
        loop {
            let senders = self.live_senders();

            if senders.is_empty() {
                crate::debug!("blocking feed channel has no subscriber, waiting for one");
                let mut count = self.subscribers.subscribe();
                // The registry owns the watch sender, so this cannot fail.
                let _ = count.wait_for(|attached| *attached > 0).await;
                continue;
            }

            let mut permits = Vec::with_capacity(senders.len());
            for tx in &senders {
                // Err: that subscriber left while we waited for room.
                if let Ok(permit) = tx.reserve().await {
                    permits.push(permit);
                }
            }

            // Every subscriber left while we were waiting: wait for the next one.
            if permits.is_empty() {
                continue;
            }
            for permit in permits {
                permit.send(event.clone());
            }
            return;
        }
    }
}
