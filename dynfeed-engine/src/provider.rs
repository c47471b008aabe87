// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::FeedEngine;
use async_trait::async_trait;
use dynfeed_channel::FeedSubscription;
use dynfeed_core::DataSourceInfo;
use dynfeed_error::Result;

/// The hooks a dynamic entity layer drives a feed through.
///
/// The layer calls [`on_load`](Self::on_load) once, subscribes with
/// [`feed`](Self::feed), then brackets ingestion with
/// [`on_connect`](Self::on_connect) and [`on_disconnect`](Self::on_disconnect).
#[async_trait]
pub trait EntityFeedProvider: Send + Sync {
    /// Schema of the entities this provider publishes.
    ///
    /// # Errors
    ///
    /// Implementations may fail when their schema cannot be produced.
    async fn on_load(&self) -> Result<DataSourceInfo>;

    /// Begins ingestion without waiting for it to complete.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` or `AlreadyConnected` as [`FeedEngine::connect`] does.
    async fn on_connect(&self) -> Result<()>;

    /// Stops ingestion and waits for the producer to be gone.
    async fn on_disconnect(&self);

    /// A fresh subscription to the provider's event stream.
    fn feed(&self) -> FeedSubscription;
}

#[async_trait]
impl EntityFeedProvider for FeedEngine {
    async fn on_load(&self) -> Result<DataSourceInfo> {
        Ok(self.load_schema())
    }

    async fn on_connect(&self) -> Result<()> {
        self.connect().await
    }

    async fn on_disconnect(&self) {
        let _ = self.disconnect().await;
    }

    fn feed(&self) -> FeedSubscription {
        self.subscribe()
    }
}
