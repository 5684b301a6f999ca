use std::fmt;
use std::sync::Arc;

use uuid::Uuid;
use worker_lab_core::{Notification, TaskRequest};

use crate::config::RunnerConfig;
use crate::progress::{NotificationPort, ProgressReporter};
use crate::tasks::{CsvStatsTask, PrimeTask, Task};

/// Maps a decoded request onto the task that serves it.
pub trait TaskFactory: Send + Sync {
    fn create(&self, request: TaskRequest, config: &RunnerConfig) -> Box<dyn Task>;
}

/// The prime search and CSV statistics tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTasks;

impl TaskFactory for BuiltinTasks {
    fn create(&self, request: TaskRequest, config: &RunnerConfig) -> Box<dyn Task> {
        match request {
            TaskRequest::Calculate { max } => Box::new(
                PrimeTask::new(max).with_progress_interval(config.prime_progress_interval),
            ),
            TaskRequest::Process { data } => Box::new(
                CsvStatsTask::new(data).with_progress_interval(config.csv_progress_interval),
            ),
        }
    }
}

/// Runs one request to completion and posts its notifications.
#[derive(Clone)]
pub struct TaskExecutor {
    config: RunnerConfig,
    factory: Arc<dyn TaskFactory>,
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TaskExecutor {
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_factory(config, BuiltinTasks)
    }

    /// Use `factory` instead of the built-in tasks to serve requests.
    pub fn with_factory(config: RunnerConfig, factory: impl TaskFactory + 'static) -> Self {
        Self {
            config,
            factory: Arc::new(factory),
        }
    }

    /// Build the task that serves `request`
    pub fn task_for(&self, request: TaskRequest) -> Box<dyn Task> {
        self.factory.create(request, &self.config)
    }

    /// Execute `request`, posting progress and exactly one terminal
    /// notification to `port`. The terminal notification is also returned.
    pub fn execute(&self, request: TaskRequest, port: &dyn NotificationPort) -> Notification {
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("task", %submission_id, command = request.command());
        let _enter = span.enter();

        let task = self.task_for(request);
        let mut progress = ProgressReporter::new(port);

        let terminal = match task.execute(&mut progress) {
            Ok(output) => {
                tracing::info!(
                    task = task.name(),
                    progress_updates = progress.emitted(),
                    elapsed_ms = output.elapsed_ms(),
                    "task completed"
                );
                Notification::Result(output)
            }
            Err(e) => {
                tracing::warn!(task = task.name(), error = %e, "task failed");
                Notification::from(e)
            }
        };

        port.post(terminal.clone());
        terminal
    }

    /// Decode and execute a raw inbound message.
    ///
    /// Unrecognised commands are dropped without any notification and
    /// return `None`. A recognised command with a malformed payload posts
    /// a single error notification.
    pub fn handle_message(
        &self,
        message: &serde_json::Value,
        port: &dyn NotificationPort,
    ) -> Option<Notification> {
        match TaskRequest::from_message(message) {
            Ok(Some(request)) => Some(self.execute(request, port)),
            Ok(None) => {
                tracing::debug!(?message, "ignoring message with unrecognized command");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejecting malformed message");
                let terminal = Notification::from(e);
                port.post(terminal.clone());
                Some(terminal)
            }
        }
    }
}
