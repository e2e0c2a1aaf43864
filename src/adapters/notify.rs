use crate::domain::ports::{Navigator, Notification, Notifier, Severity};
use std::sync::{Arc, Mutex};

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => {
                tracing::warn!("{} - {}", notification.title, notification.description)
            }
            Severity::Default => {
                tracing::info!("{} - {}", notification.title, notification.description)
            }
        }
    }
}

/// Keeps every notification; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

/// Records destinations instead of routing anywhere.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNavigator {
    visited: Arc<Mutex<Vec<String>>>,
}

impl InMemoryNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|visited| visited.clone())
            .unwrap_or_default()
    }
}

impl Navigator for InMemoryNavigator {
    fn navigate(&self, destination: &str) {
        tracing::debug!("Navigating to {}", destination);
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(destination.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_notifier_clones_share_buffer() {
        let notifier = InMemoryNotifier::default();
        let handle = notifier.clone();
        handle.notify(Notification::error("Oops", "Something failed"));

        let received = notifier.notifications();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].severity, Severity::Destructive);
    }

    #[test]
    fn test_in_memory_navigator_records_destinations() {
        let navigator = InMemoryNavigator::default();
        navigator.navigate("/login");
        assert_eq!(navigator.visited(), vec!["/login".to_string()]);
    }
}
