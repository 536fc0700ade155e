use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::{error::AppResult, models::InteractionNotification};

/// Destination of interaction notifications (an external stream)
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Performs a single publish attempt
    async fn publish(&self, notification: &InteractionNotification) -> AppResult<()>;

    /// Sink name for logging
    fn name(&self) -> &'static str;
}

/// Fire-and-forget publisher in front of an [`EventSink`]
///
/// Notifications go through a bounded queue drained by a single background task,
/// so a slow or failing stream never delays the caller. Delivery is at most once:
/// every notification gets exactly one publish attempt and failures are only logged.
#[derive(Clone)]
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    queue_tx: mpsc::Sender<InteractionNotification>,
}

/// Handle for gracefully shutting down the publisher loop
pub struct PublisherHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PublisherHandle {
    /// Stops the publisher loop after flushing everything still queued
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Publisher shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Publisher task ended abnormally");
        }
    }
}

impl EventPublisher {
    /// Creates a publisher and spawns its background loop
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(sink: Arc<dyn EventSink>, capacity: usize) -> (Self, PublisherHandle) {
        let (queue_tx, queue_rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let loop_sink = sink.clone();
        let task = tokio::spawn(async move {
            Self::publisher_task(loop_sink, queue_rx, shutdown_rx).await;
        });

        let publisher = Self { sink, queue_tx };
        let handle = PublisherHandle { shutdown_tx, task };

        (publisher, handle)
    }

    /// Background task that drains the notification queue
    ///
    /// Exits when every publisher clone is dropped, or on shutdown after
    /// flushing what is left in the queue.
    async fn publisher_task(
        sink: Arc<dyn EventSink>,
        mut queue_rx: mpsc::Receiver<InteractionNotification>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(sink = sink.name(), "Publisher task started");

        loop {
            tokio::select! {
                msg = queue_rx.recv() => match msg {
                    Some(notification) => Self::publish_once(sink.as_ref(), &notification).await,
                    None => {
                        tracing::info!("All publishers dropped, publisher task stopped");
                        break;
                    }
                },
                Some(()) = shutdown_rx.recv() => {
                    queue_rx.close();
                    let mut flushed = 0usize;
                    while let Some(notification) = queue_rx.recv().await {
                        Self::publish_once(sink.as_ref(), &notification).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Publisher task stopped");
                    break;
                }
            }
        }
    }

    async fn publish_once(sink: &dyn EventSink, notification: &InteractionNotification) {
        if let Err(e) = sink.publish(notification).await {
            tracing::error!(
                error = %e,
                sink = sink.name(),
                user_id = %notification.user_id,
                event_id = %notification.event_id,
                "Failed to publish interaction notification"
            );
        }
    }

    /// Hands a notification to the publisher without waiting for delivery
    ///
    /// When the queue is full or the loop has stopped, the notification is
    /// published from a detached task instead, so it still gets its attempt.
    pub fn dispatch(&self, notification: InteractionNotification) {
        match self.queue_tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(notification)) => {
                tracing::warn!(
                    user_id = %notification.user_id,
                    "Publish queue full, publishing on a detached task"
                );
                self.spawn_detached(notification);
            }
            Err(TrySendError::Closed(notification)) => {
                tracing::warn!(
                    user_id = %notification.user_id,
                    "Publisher loop stopped, publishing on a detached task"
                );
                self.spawn_detached(notification);
            }
        }
    }

    fn spawn_detached(&self, notification: InteractionNotification) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            Self::publish_once(sink.as_ref(), &notification).await;
        });
    }
}
