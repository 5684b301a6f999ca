use tokio::sync::mpsc;
use worker_lab_core::Notification;

/// Outbound side of a worker: where notifications are posted.
///
/// Posting is fire-and-forget. A port whose receiver has gone away drops
/// the notification.
pub trait NotificationPort: Send + Sync {
    fn post(&self, notification: Notification);
}

impl NotificationPort for mpsc::UnboundedSender<Notification> {
    fn post(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::trace!("notification receiver dropped");
        }
    }
}

/// Emits progress notifications for a single task execution.
///
/// Values are clamped to 100 and never go backwards.
pub struct ProgressReporter<'a> {
    port: &'a dyn NotificationPort,
    last: Option<u8>,
    emitted: usize,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(port: &'a dyn NotificationPort) -> Self {
        Self {
            port,
            last: None,
            emitted: 0,
        }
    }

    pub fn report(&mut self, percent: u8) {
        let mut value = percent.min(100);
        if let Some(last) = self.last {
            value = value.max(last);
        }
        self.last = Some(value);
        self.emitted += 1;
        self.port.post(Notification::progress(value));
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
