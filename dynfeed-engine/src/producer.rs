// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The producer task: read, decode, pace, publish.
//!
//! Every suspension point (open, read, pacing wait, publish) races against the
//! run's cancellation token. Cancellation ends the run without publishing
//! anything; it is a [`RunOutcome`], not an error.

use crate::stats::StatsCounters;
use crate::{DecodeErrorPolicy, FeedConfig, Pacer};
use dynfeed_channel::FeedChannel;
use dynfeed_core::{ConnectionStatus, FeedError, FeedEvent};
use dynfeed_error::Result;
use dynfeed_source::{RawRecord, RecordParser, RecordReader, RecordSource};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a producer run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `disconnect()` (or dropping the engine) stopped the run.
    Cancelled,
    /// The source ran out of records and the run was not looping, or a looping
    /// pass produced nothing.
    Exhausted,
    /// A `ConnectionFailure` was published and the run stopped.
    Failed,
}

/// How one pass over the source ended, when the run goes on.
enum PassEnd {
    Eof { published: u64 },
    Halt(RunOutcome),
}

pub(crate) struct Producer {
    source: Arc<dyn RecordSource>,
    parser: RecordParser,
    channel: FeedChannel,
    pacer: Pacer,
    loop_on_eof: bool,
    on_decode_error: DecodeErrorPolicy,
    read_timeout: Option<Duration>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    stats: Arc<StatsCounters>,
}

impl Producer {
    pub(crate) fn new(
        source: Arc<dyn RecordSource>,
        parser: RecordParser,
        channel: FeedChannel,
        config: &FeedConfig,
        status: Arc<watch::Sender<ConnectionStatus>>,
        stats: Arc<StatsCounters>,
    ) -> Self {
        Self {
            source,
            parser,
            channel,
            pacer: Pacer::new(config.pacing),
            loop_on_eof: config.loop_on_eof,
            on_decode_error: config.on_decode_error,
            read_timeout: config.read_timeout,
            status,
            stats,
        }
    }

    pub(crate) async fn run(self, cancel: CancellationToken) -> RunOutcome {
        let location = self.source.location();
        let mut sequence = 0_u64;

        loop {
            let opened = match cancellable(&cancel, self.source.open()).await {
                Some(opened) => opened,
                None => return RunOutcome::Cancelled,
            };

            let reader = match opened {
                Ok(reader) => reader,
                Err(error) => {
                    // A source that vanished after connect() will not come back on its own.
                    let recoverable = !matches!(error, FeedError::SourceNotFound { .. });
                    return self.fail(error, recoverable, &cancel).await;
                }
            };
            self.stats.record_pass();

            match self.run_pass(reader, &mut sequence, &cancel).await {
                PassEnd::Halt(outcome) => return outcome,
                PassEnd::Eof { .. } if !self.loop_on_eof => {
                    crate::info!("feed source {} exhausted", location);
                    return RunOutcome::Exhausted;
                }
                PassEnd::Eof { published: 0 } => {
                    crate::warn!(
                        "feed source {} yielded no observation in a full pass, stopping",
                        location
                    );
                    return RunOutcome::Exhausted;
                }
                PassEnd::Eof { .. } => {
                    crate::debug!("end of feed source {}, reopening", location);
                }
            }
        }
    }

    /// Drives one pass. The reader, and whatever handle it holds, is dropped
    /// before this returns.
    async fn run_pass(
        &self,
        mut reader: Box<dyn RecordReader>,
        sequence: &mut u64,
        cancel: &CancellationToken,
    ) -> PassEnd {
        let mut published = 0_u64;

        loop {
            let next = match cancellable(cancel, self.read_next(reader.as_mut())).await {
                Some(next) => next,
                None => return PassEnd::Halt(RunOutcome::Cancelled),
            };

            let decoded = match next {
                Ok(Some(raw)) if raw.is_blank() => continue,
                Ok(Some(raw)) => self.parser.decode(&raw.text, raw.line, *sequence),
                Ok(None) => return PassEnd::Eof { published },
                // A line the reader could not turn into text is a bad record like any other.
                Err(error @ FeedError::Decode { .. }) => Err(error),
                Err(error) => return PassEnd::Halt(self.fail(error, true, cancel).await),
            };

            let observation = match decoded {
                Ok(observation) => observation,
                Err(error) => match self.on_decode_error {
                    DecodeErrorPolicy::Skip => {
                        crate::warn!("skipping record: {}", error);
                        self.stats.record_skipped();
                        continue;
                    }
                    DecodeErrorPolicy::Fail => {
                        return PassEnd::Halt(self.fail(error, true, cancel).await)
                    }
                },
            };
            let event = FeedEvent::NewObservation(observation);
            *sequence += 1;

            if !self.pacer.wait(cancel).await {
                return PassEnd::Halt(RunOutcome::Cancelled);
            }

            if cancellable(cancel, self.channel.publish(event)).await.is_none() {
                return PassEnd::Halt(RunOutcome::Cancelled);
            }
            self.stats.record_published();
            published += 1;
        }
    }

    async fn read_next(&self, reader: &mut dyn RecordReader) -> Result<Option<RawRecord>> {
        match self.read_timeout {
            None => reader.read_next().await,
            Some(limit) => tokio::time::timeout(limit, reader.read_next())
                .await
                .map_err(|_| FeedError::read_timeout(limit))?,
        }
    }

    async fn fail(
        &self,
        cause: FeedError,
        recoverable: bool,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        crate::error!(
            "feed source {} failed (recoverable: {}): {}",
            self.source.location(),
            recoverable,
            cause
        );

        let event = FeedEvent::connection_failure(cause, recoverable);
        if cancellable(cancel, self.channel.publish(event)).await.is_none() {
            return RunOutcome::Cancelled;
        }

        self.stats.record_failure();
        self.status.send_replace(ConnectionStatus::Failed);
        RunOutcome::Failed
    }
}

/// Runs `future` unless `cancel` fires first; cancellation wins ties.
async fn cancellable<F: Future>(cancel: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        output = future => Some(output),
    }
}

/// Handle to a spawned producer run. Dropping it cancels the run.
#[derive(Debug)]
pub(crate) struct ProducerTask {
    cancel: CancellationToken,
    handle: JoinHandle<RunOutcome>,
}

impl ProducerTask {
    pub(crate) fn spawn(producer: Producer) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(producer.run(cancel.clone()));
        Self { cancel, handle }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the run and waits until the task is gone.
    pub(crate) async fn stop(mut self) -> RunOutcome {
        self.cancel.cancel();
        match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(error) => {
                crate::error!("feed producer task ended abnormally: {}", error);
                RunOutcome::Failed
            }
        }
    }
}

impl Drop for ProducerTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
