//! Operator notifications
//!
//! Workflow outcomes are reported through a [`Notifier`]; the till UI decides
//! how to show them.

use shared::message::{NotificationLevel, NotificationPayload};

pub trait Notifier: Send + Sync {
    fn notify(&self, payload: NotificationPayload);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, payload: NotificationPayload) {
        let NotificationPayload {
            title,
            message,
            level,
            category,
        } = payload;
        match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(?category, %title, "{message}")
            }
            NotificationLevel::Warning => tracing::warn!(?category, %title, "{message}"),
            NotificationLevel::Error => tracing::error!(?category, %title, "{message}"),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, payload: NotificationPayload) {
        (**self).notify(payload)
    }
}
