// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::producer::{Producer, ProducerTask, RunOutcome};
use crate::stats::StatsCounters;
use crate::{FeedConfig, FeedStats};
use dynfeed_channel::{FeedChannel, FeedSubscription};
use dynfeed_core::{ConnectionStatus, DataSourceInfo, FeedError};
use dynfeed_error::Result;
use dynfeed_source::{FileSource, RecordParser, RecordSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Lifecycle controller of one feed.
///
/// Owns the feed channel, the schema and at most one producer task. The channel
/// lives as long as the engine, so subscriptions survive disconnect/connect
/// cycles. Dropping the engine cancels a running producer.
///
/// # Example
///
/// ```
/// use dynfeed_core::ais_vessel_schema;
/// use dynfeed_engine::{FeedConfig, FeedEngine};
/// use dynfeed_source::MemorySource;
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> dynfeed_error::Result<()> {
/// let source = MemorySource::new([r#"{"attributes":{"MMSI":"123"}}"#]);
/// let engine = FeedEngine::new(source, ais_vessel_schema(), FeedConfig::replay())?;
///
/// let mut feed = engine.subscribe();
/// engine.connect().await?;
///
/// let event = feed.next().await.expect("one event");
/// assert!(event.is_observation());
///
/// engine.disconnect().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeedEngine {
    source: Arc<dyn RecordSource>,
    schema: DataSourceInfo,
    parser: RecordParser,
    config: FeedConfig,
    channel: FeedChannel,
    task: Mutex<Option<ProducerTask>>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    stats: Arc<StatsCounters>,
}

impl FeedEngine {
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `config` does not validate.
    pub fn new<S: RecordSource>(
        source: S,
        schema: DataSourceInfo,
        config: FeedConfig,
    ) -> Result<Self> {
        config.validate()?;
        let channel = FeedChannel::new(config.overflow)?;
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);

        Ok(Self {
            source: Arc::new(source),
            parser: RecordParser::new(&schema),
            schema,
            config,
            channel,
            task: Mutex::new(None),
            status: Arc::new(status),
            stats: Arc::new(StatsCounters::default()),
        })
    }

    /// Engine over a newline-delimited JSON file.
    ///
    /// The file is not touched until [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `config` does not validate.
    pub fn from_file(
        path: impl Into<PathBuf>,
        schema: DataSourceInfo,
        config: FeedConfig,
    ) -> Result<Self> {
        Self::new(FileSource::new(path), schema, config)
    }

    /// Starts a producer run and returns without waiting for it.
    ///
    /// A run that already ended on its own (exhausted or failed) is reaped first.
    ///
    /// # Errors
    ///
    /// - [`FeedError::AlreadyConnected`] while a producer run is alive
    /// - [`FeedError::SourceNotFound`] when the source is absent; no task is spawned
    pub async fn connect(&self) -> Result<()> {
        let mut task = self.task.lock().await;

        if task.as_ref().is_some_and(|running| !running.is_finished()) {
            return Err(FeedError::AlreadyConnected);
        }
        if let Some(finished) = task.take() {
            let outcome = finished.stop().await;
            crate::debug!("reaped previous feed run ({:?})", outcome);
        }

        self.status.send_replace(ConnectionStatus::Connecting);
        if let Err(error) = self.source.check_available().await {
            self.status.send_replace(ConnectionStatus::Disconnected);
            return Err(error);
        }

        // Connected before spawning, so a run that fails at once still ends as Failed.
        self.status.send_replace(ConnectionStatus::Connected);
        *task = Some(ProducerTask::spawn(self.producer()));
        crate::info!("feed connected to {}", self.source.location());
        Ok(())
    }

    /// Cancels the producer run and waits until it has fully stopped.
    ///
    /// Once this returns the run publishes nothing more and has released the
    /// source. Idempotent: returns `None` when no run was left to stop.
    pub async fn disconnect(&self) -> Option<RunOutcome> {
        let mut task = self.task.lock().await;
        let outcome = match task.take() {
            Some(running) => Some(running.stop().await),
            None => None,
        };

        if outcome.is_some() {
            crate::info!("feed disconnected from {}", self.source.location());
        }
        self.status.send_replace(ConnectionStatus::Disconnected);
        outcome
    }

    /// Whether a producer run is alive. A run that ended on its own counts as
    /// not running even before the next `connect()` reaps it.
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| !running.is_finished())
    }

    /// The static schema of this feed. Pure; callable in any state.
    #[must_use]
    pub fn load_schema(&self) -> DataSourceInfo {
        self.schema.clone()
    }

    #[must_use]
    pub const fn schema(&self) -> &DataSourceInfo {
        &self.schema
    }

    /// Attaches a subscriber to the feed channel.
    #[must_use]
    pub fn subscribe(&self) -> FeedSubscription {
        self.channel.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Receiver that observes every status transition.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn stats(&self) -> FeedStats {
        self.stats.snapshot()
    }

    #[must_use]
    pub const fn config(&self) -> &FeedConfig {
        &self.config
    }

    fn producer(&self) -> Producer {
        Producer::new(
            Arc::clone(&self.source),
            self.parser.clone(),
            self.channel.clone(),
            &self.config,
            Arc::clone(&self.status),
            Arc::clone(&self.stats),
        )
    }
}
