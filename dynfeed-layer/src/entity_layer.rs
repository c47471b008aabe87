// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::EntityTracker;
use dynfeed_core::{DataSourceInfo, FeedError};
use dynfeed_engine::EntityFeedProvider;
use dynfeed_error::Result;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Drives an [`EntityTracker`] from an [`EntityFeedProvider`].
///
/// ```text
/// load()  -> provider.on_load() once, tracker created from the schema
/// start() -> subscribe, provider.on_connect(), spawn tracking task
/// stop()  -> provider.on_disconnect(), stop tracking task
/// ```
pub struct EntityLayer<P: EntityFeedProvider + ?Sized> {
    provider: Arc<P>,
    maximum_observations: Option<usize>,
    schema: Option<DataSourceInfo>,
    tracker: Option<Arc<EntityTracker>>,
    tracking: Option<Tracking>,
}

struct Tracking {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl<P: EntityFeedProvider + ?Sized> EntityLayer<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            maximum_observations: None,
            schema: None,
            tracker: None,
            tracking: None,
        }
    }

    /// Overrides the per-entity history length used when the tracker is created.
    #[must_use]
    pub fn with_maximum_observations(mut self, maximum_observations: usize) -> Self {
        self.maximum_observations = Some(maximum_observations);
        self
    }

    /// Fetches the schema and creates the tracker. Later calls return the same tracker.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `on_load` failure, or `InvalidConfig` for a zero
    /// history length.
    pub async fn load(&mut self) -> Result<Arc<EntityTracker>> {
        if let Some(tracker) = &self.tracker {
            return Ok(Arc::clone(tracker));
        }

        let schema = self.provider.on_load().await?;
        let mut tracker = EntityTracker::new(&schema);
        if let Some(maximum_observations) = self.maximum_observations {
            tracker = tracker.with_maximum_observations(maximum_observations)?;
        }

        let tracker = Arc::new(tracker);
        self.schema = Some(schema);
        self.tracker = Some(Arc::clone(&tracker));
        Ok(tracker)
    }

    /// Subscribes to the provider, connects it and starts tracking. Loads first
    /// if needed.
    ///
    /// # Errors
    ///
    /// - `AlreadyConnected` when this layer is already tracking
    /// - whatever the provider's `on_connect` returns
    pub async fn start(&mut self) -> Result<()> {
        if self.is_tracking() {
            return Err(FeedError::AlreadyConnected);
        }
        // A tracking task that ended because the feed closed is simply replaced.
        self.tracking = None;

        let tracker = self.load().await?;
        // Subscribe before connecting so the first observation is not missed.
        let mut feed = self.provider.feed();
        self.provider.on_connect().await?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    event = feed.next() => event,
                };
                let Some(event) = event else {
                    break;
                };
                if let Some((cause, recoverable)) = event.failure() {
                    crate::warn!(
                        "entity layer received connection failure (recoverable: {}): {}",
                        recoverable,
                        cause
                    );
                }
                tracker.apply(event);
            }
        });

        self.tracking = Some(Tracking { cancel, handle });
        crate::info!("entity layer started");
        Ok(())
    }

    /// Disconnects the provider, then stops the tracking task and waits for it.
    ///
    /// Tracked entities are kept; see [`EntityTracker::purge_all`].
    pub async fn stop(&mut self) {
        self.provider.on_disconnect().await;

        if let Some(tracking) = self.tracking.take() {
            tracking.cancel.cancel();
            if let Err(error) = tracking.handle.await {
                crate::warn!("entity tracking task ended abnormally: {}", error);
            }
            crate::info!("entity layer stopped");
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
            .as_ref()
            .is_some_and(|tracking| !tracking.handle.is_finished())
    }

    /// The schema fetched by [`load`](Self::load).
    pub const fn schema(&self) -> Option<&DataSourceInfo> {
        self.schema.as_ref()
    }

    pub fn tracker(&self) -> Option<Arc<EntityTracker>> {
        self.tracker.clone()
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}

impl<P: EntityFeedProvider + ?Sized> Drop for EntityLayer<P> {
    fn drop(&mut self) {
        if let Some(tracking) = &self.tracking {
            tracking.cancel.cancel();
        }
    }
}
