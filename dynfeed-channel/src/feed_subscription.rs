// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use dynfeed_core::FeedEvent;
use futures::{ready, Stream};
use pin_project::pin_project;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, ReceiverStream};

/// Stream of [`FeedEvent`]s handed out by [`FeedChannel::subscribe`](crate::FeedChannel::subscribe).
///
/// Ends once the channel has been dropped.
#[pin_project]
pub struct FeedSubscription {
    #[pin]
    inner: SubscriptionInner,
    missed: u64,
}

#[pin_project(project = SubscriptionInnerProj)]
enum SubscriptionInner {
    DropOldest(#[pin] BroadcastStream<FeedEvent>),
    Block(#[pin] ReceiverStream<FeedEvent>),
}

impl FeedSubscription {
    pub(crate) fn drop_oldest(rx: broadcast::Receiver<FeedEvent>) -> Self {
        Self {
            inner: SubscriptionInner::DropOldest(BroadcastStream::new(rx)),
            missed: 0,
        }
    }

    pub(crate) fn blocking(rx: mpsc::Receiver<FeedEvent>) -> Self {
        Self {
            inner: SubscriptionInner::Block(ReceiverStream::new(rx)),
            missed: 0,
        }
    }

    /// Events this subscriber lost because it fell more than the channel
    /// capacity behind. Always zero under the blocking policy.
    pub const fn missed(&self) -> u64 {
        self.missed
    }
}

impl fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.inner {
            SubscriptionInner::DropOldest(_) => "drop_oldest",
            SubscriptionInner::Block(_) => "block",
        };
        f.debug_struct("FeedSubscription")
            .field("mode", &mode)
            .field("missed", &self.missed)
            .finish()
    }
}

impl Stream for FeedSubscription {
    type Item = FeedEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        match this.inner.project() {
            SubscriptionInnerProj::Block(stream) => stream.poll_next(cx),
            SubscriptionInnerProj::DropOldest(mut stream) => loop {
                match ready!(stream.as_mut().poll_next(cx)) {
                    Some(Ok(event)) => return Poll::Ready(Some(event)),
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        *this.missed += skipped;
                        crate::warn!(
                            "feed subscriber fell behind, {} oldest events dropped",
                            skipped
                        );
                    }
                    None => return Poll::Ready(None),
                }
            },
        }
    }
}
