//! Users and their subscriptions.
//!
//! This module provides the [`User`] struct, which owns the subscribers a user
//! picked and fans alert changes out to them.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Mutex;

use crate::{
    alerts::AlertDelta, dispatch::DeliveryFailure, subscribers::Subscriber,
    suggestions::Suggestion,
};

/// A user receiving weather alert reactions.
///
/// # Subscribers
///
/// Subscribers are kept in insertion order, which is the order they are
/// notified in. The list behaves as a set of instances: subscribing the same
/// instance twice, or unsubscribing one that isn't there, does nothing.
/// Instance identity is the address behind the [`Arc`], so the same
/// subscriber may be shared by many users.
///
/// # Thread Safety
///
/// The subscriber list and the suggestion sit behind async mutexes.
/// [`User::on_alerts_changed`] works on a snapshot of the list, so a
/// subscriber may subscribe or unsubscribe (itself included) while a dispatch
/// is running without affecting that dispatch.
///
/// # Examples
///
/// ```no_run
/// let user = User::new("alice", "alice@example.com");
/// user.subscribe(Arc::clone(&mail_subscriber)).await;
/// user.subscribe(mail_subscriber).await; // no-op
/// assert_eq!(user.subscriber_count().await, 1);
/// ```
pub struct User {
    /// Opaque user identifier
    pub id: String,
    /// E-mail address mails are sent to
    pub email: String,
    /// Subscribers in notification order
    subscribers: Mutex<Vec<Arc<dyn Subscriber>>>,
    /// Current outfit suggestion, overwritten on every computation
    suggestion: Mutex<Option<Suggestion>>,
}

/// Whether two handles point to the same subscriber instance.
fn same_subscriber(a: &Arc<dyn Subscriber>, b: &Arc<dyn Subscriber>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl User {
    /// Creates a user without subscribers.
    pub fn new(id: &str, email: &str) -> Self {
        User {
            id: id.to_owned(),
            email: email.to_owned(),
            subscribers: Mutex::new(Vec::new()),
            suggestion: Mutex::new(None),
        }
    }

    /// Adds `subscriber` at the end of the notification order.
    ///
    /// # Returns
    ///
    /// `false` if this instance was already subscribed, in which case
    /// nothing changes.
    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.subscribers.lock().await;

        if subscribers.iter().any(|s| same_subscriber(s, &subscriber)) {
            debug!(
                "{} already subscribed for user {}",
                subscriber.name(),
                self.id
            );
            return false;
        }

        info!("subscribed {} for user {}", subscriber.name(), self.id);
        subscribers.push(subscriber);
        true
    }

    /// Removes `subscriber` from the list.
    ///
    /// # Returns
    ///
    /// `false` if this instance wasn't subscribed, in which case nothing
    /// changes.
    pub async fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.subscribers.lock().await;
        let before = subscribers.len();

        subscribers.retain(|s| !same_subscriber(s, subscriber));

        let removed = subscribers.len() != before;
        if removed {
            info!("unsubscribed {} for user {}", subscriber.name(), self.id);
        }
        removed
    }

    /// Returns the number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Returns the current outfit suggestion, if one was computed.
    pub async fn suggestion(&self) -> Option<Suggestion> {
        self.suggestion.lock().await.clone()
    }

    /// Replaces the current outfit suggestion.
    pub async fn set_suggestion(&self, suggestion: Suggestion) {
        debug!("new suggestion for user {}: {:?}", self.id, suggestion);
        *self.suggestion.lock().await = Some(suggestion);
    }

    /// Hands `delta` to every subscriber, one after the other.
    ///
    /// Subscribers are called in insertion order, on the list as it was when
    /// this call started. A failing subscriber is logged and recorded; the
    /// following ones still run.
    ///
    /// # Returns
    ///
    /// One [`DeliveryFailure`] per subscriber that failed, in call order.
    pub async fn on_alerts_changed(&self, delta: &AlertDelta) -> Vec<DeliveryFailure> {
        let subscribers: Vec<Arc<dyn Subscriber>> = self.subscribers.lock().await.clone();
        let mut failures = Vec::new();

        debug!(
            "dispatching {} to {} subscribers of user {}",
            delta,
            subscribers.len(),
            self.id
        );

        for subscriber in subscribers {
            if let Err(e) = subscriber.on_alerts_changed(self, delta).await {
                error!(
                    "subscriber {} failed for user {}: {}",
                    subscriber.name(),
                    self.id,
                    e
                );
                failures.push(DeliveryFailure {
                    user_id: self.id.clone(),
                    subscriber: subscriber.name().to_owned(),
                    error: e,
                });
            }
        }

        failures
    }
}
