//! Isolated worker context.
//!
//! A worker owns its executor and talks to its caller only through two
//! channels: an inbox of submissions and an outbox of notifications. Each
//! submission runs on the blocking pool and is awaited before the next one
//! is taken, so work never interleaves and the caller is never blocked.

use std::any::Any;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use worker_lab_core::{CoreError, Notification, Result, TaskRequest};

use crate::config::RunnerConfig;
use crate::executor::TaskExecutor;
use crate::progress::NotificationPort;

#[derive(Debug)]
enum Inbound {
    Request(TaskRequest),
    Raw(serde_json::Value),
}

pub struct Worker;

impl Worker {
    /// Start a worker running the built-in tasks on the current Tokio runtime.
    pub fn spawn(config: RunnerConfig) -> WorkerHandle {
        Self::with_executor(TaskExecutor::new(config))
    }

    /// Start a worker that serves submissions through `executor`.
    pub fn with_executor(executor: TaskExecutor) -> WorkerHandle {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_loop(executor, inbox_rx, outbox_tx));
        tracing::debug!("worker started");

        WorkerHandle {
            inbox: Some(inbox_tx),
            notifications: outbox_rx,
            task,
        }
    }
}

async fn run_loop(
    executor: TaskExecutor,
    mut inbox: mpsc::UnboundedReceiver<Inbound>,
    outbox: mpsc::UnboundedSender<Notification>,
) {
    while let Some(inbound) = inbox.recv().await {
        let executor = executor.clone();
        let port = outbox.clone();

        let outcome = tokio::task::spawn_blocking(move || match inbound {
            Inbound::Request(request) => Some(executor.execute(request, &port)),
            Inbound::Raw(message) => executor.handle_message(&message, &port),
        })
        .await;

        if let Err(err) = outcome {
            let reason = if err.is_panic() {
                panic_message(err.into_panic())
            } else {
                err.to_string()
            };
            tracing::error!(%reason, "task aborted");
            outbox.post(CoreError::TaskPanicked(reason).into());
        }
    }

    tracing::debug!("worker inbox closed");
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Caller-side handle to a running worker.
pub struct WorkerHandle {
    inbox: Option<mpsc::UnboundedSender<Inbound>>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Submit a typed request
    pub fn submit(&self, request: TaskRequest) -> Result<()> {
        self.send(Inbound::Request(request))
    }

    /// Submit a raw message; it is decoded inside the worker.
    pub fn post_message(&self, message: serde_json::Value) -> Result<()> {
        self.send(Inbound::Raw(message))
    }

    fn send(&self, inbound: Inbound) -> Result<()> {
        let inbox = self
            .inbox
            .as_ref()
            .ok_or_else(|| CoreError::WorkerClosed("worker inbox was closed".to_string()))?;

        inbox
            .send(inbound)
            .map_err(|_| CoreError::WorkerClosed("worker has stopped".to_string()))
    }

    /// Receive the next notification.
    ///
    /// Returns `None` once the worker has been closed and every queued
    /// submission has finished.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    /// Forward progress values to `on_progress` until the next terminal
    /// notification arrives.
    pub async fn wait_for_terminal<F>(&mut self, mut on_progress: F) -> Option<Notification>
    where
        F: FnMut(u8),
    {
        while let Some(notification) = self.recv().await {
            match notification {
                Notification::Progress { value } => on_progress(value),
                terminal => return Some(terminal),
            }
        }
        None
    }

    /// Stop accepting submissions. Work already queued still runs.
    pub fn close(&mut self) {
        self.inbox.take();
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.as_ref().map_or(true, |inbox| inbox.is_closed())
    }

    /// Close the worker, collect every remaining notification and wait for
    /// the worker to stop.
    pub async fn finish(mut self) -> Result<Vec<Notification>> {
        self.close();

        let mut remaining = Vec::new();
        while let Some(notification) = self.notifications.recv().await {
            remaining.push(notification);
        }

        self.task
            .await
            .map_err(|e| CoreError::Internal(format!("worker loop failed: {}", e)))?;

        Ok(remaining)
    }

    /// Close the worker and wait for in-flight work to finish, discarding
    /// any notifications not yet received.
    pub async fn shutdown(self) -> Result<()> {
        self.finish().await.map(|_| ())
    }
}
