#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient, toast-style notification. No notification is fatal: the
/// thread view stays usable after any single failed operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Notification {
        Notification {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Notification {
        Notification {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-visible feedback; the UI wires this to whatever transient
/// display it has.
pub trait Notifier {
    fn notify(&mut self, n: Notification);
}

/// Fallback sink that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, n: Notification) {
        match n.severity {
            Severity::Success => tracing::info!(message = %n.message, "notification"),
            Severity::Error => tracing::error!(message = %n.message, "notification"),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, n: Notification) {
        (**self).notify(n)
    }
}
