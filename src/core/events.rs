//! Internal event system for dashboard mutations
//!
//! The EventBus uses `tokio::sync::broadcast` to decouple the actions that
//! change invoices from whatever wants to hear about it (route cache
//! observers, live views, audit sinks).
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(1024);
//! let mut rx = event_bus.subscribe();
//!
//! event_bus.publish(DashboardEvent::PathRevalidated {
//!     path: "/dashboard/invoices".to_string(),
//! });
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events related to invoice mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvoiceEvent {
    Created { invoice_id: String, amount: i64 },
    Updated { invoice_id: String, amount: i64 },
    Deleted { invoice_id: String },
}

/// Top-level dashboard event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// An invoice row changed
    Invoice(InvoiceEvent),

    /// A cached page was marked stale
    PathRevalidated { path: String },
}

impl DashboardEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            DashboardEvent::Invoice(_) => "invoice",
            DashboardEvent::PathRevalidated { .. } => "path_revalidated",
        }
    }

    /// Invoice this event relates to (if applicable)
    pub fn invoice_id(&self) -> Option<&str> {
        match self {
            DashboardEvent::Invoice(
                InvoiceEvent::Created { invoice_id, .. }
                | InvoiceEvent::Updated { invoice_id, .. }
                | InvoiceEvent::Deleted { invoice_id },
            ) => Some(invoice_id.as_str()),
            DashboardEvent::PathRevalidated { .. } => None,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: DashboardEvent,
}

impl EventEnvelope {
    pub fn new(event: DashboardEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    ///
    /// Never fails; with no subscribers the event is dropped. Returns the
    /// number of receivers that will see it.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
