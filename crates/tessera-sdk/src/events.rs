//! Identity lifecycle events
//!
//! Hosts subscribe to a broadcast channel instead of a global notification
//! bus: every subscriber gets its own receiver, and emitting never blocks
//! the service.

use crate::error::IdentityError;
use crate::types::Account;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the event channel; laggy subscribers miss old events rather
/// than stalling the service
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle events emitted by the identity service
#[derive(Debug, Clone)]
pub enum IdentityEvent {
    /// A login attempt completed and the session token was acquired
    UserLoggedIn,
    /// The user cancelled the login attempt
    LoginCancelled,
    /// The login attempt failed before a token was acquired
    LoginFailed { error: Arc<IdentityError> },
    /// The session ended
    UserLoggedOut {
        /// True when the logout was forced by a confirmed-unauthorized token
        unauthorized: bool,
        /// True when the logout was caused by account deletion
        deleted: bool,
    },
    /// The cached account was replaced
    AccountUpdated {
        account: Account,
        previous: Option<Account>,
    },
}

/// Broadcast sender for lifecycle events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<IdentityEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to lifecycle events from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all current subscribers
    pub fn emit(&self, event: IdentityEvent) {
        debug!("Emitting identity event: {:?}", event);
        // A send error only means nobody is subscribed
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(IdentityEvent::UserLoggedIn);
        bus.emit(IdentityEvent::UserLoggedOut {
            unauthorized: true,
            deleted: false,
        });

        assert!(matches!(rx.recv().await.unwrap(), IdentityEvent::UserLoggedIn));
        assert!(matches!(
            rx.recv().await.unwrap(),
            IdentityEvent::UserLoggedOut {
                unauthorized: true,
                deleted: false
            }
        ));
    }

    #[test]
    fn emitting_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.emit(IdentityEvent::LoginCancelled);
    }
}
