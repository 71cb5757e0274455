use crate::error::AppError;
use crate::speech::Speaker;
use notify_rust::Notification;
use tracing::warn;

pub struct DesktopEcho<S> {
    inner: S,
}

impl<S: Speaker> DesktopEcho<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Speaker> Speaker for DesktopEcho<S> {
    fn speak(&self, text: &str) -> Result<(), AppError> {
        let spoken = self.inner.speak(text);

        if let Err(err) = Notification::new()
            .summary("Smart Reminder")
            .body(text)
            .icon("appointment-soon")
            .timeout(5000)
            .show()
        {
            warn!(error = %err, "failed to show notification");
        }

        spoken
    }
}
