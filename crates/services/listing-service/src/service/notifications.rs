//! Notification dispatch.
//!
//! Services hand a [`MarketplaceEvent`] to the dispatcher after a successful
//! write and move on; dispatch never blocks and cannot fail the request.

use domain::MarketplaceEvent;
use tracing::info;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fire-and-forget sink for marketplace events.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, event: MarketplaceEvent);
}

/// Dispatcher that records events in the log stream.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl NotificationDispatcher for TracingNotifier {
    fn dispatch(&self, event: MarketplaceEvent) {
        info!(
            event = event.kind(),
            recipient = %event.recipient(),
            "notification queued"
        );
    }
}
