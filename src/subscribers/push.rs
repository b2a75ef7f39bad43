//! Push notification reaction to new alerts.

use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use log::{debug, warn};

use crate::{
    alerts::{AlertDelta, AlertKind},
    notifications::{DeliveryError, Notifier},
    subscribers::Subscriber,
    users::User,
};

/// Pushes one short piece of advice for every alert that just started.
///
/// Ended alerts are not pushed. A failed push doesn't stop the pushes of
/// the other new alerts. The notifier is usually bound to the device topic
/// of a single user, so one instance is created per user.
pub struct PushSubscriber {
    notifier: Arc<dyn Notifier>,
}

impl PushSubscriber {
    /// Creates a subscriber pushing through `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        PushSubscriber { notifier }
    }

    /// Push text for a newly active alert.
    fn message(kind: AlertKind) -> &'static str {
        match kind {
            AlertKind::Storm => "Take an umbrella!",
            AlertKind::Hail => "Don't take the car out!",
        }
    }
}

impl Subscriber for PushSubscriber {
    fn name(&self) -> &str {
        "push"
    }

    fn on_alerts_changed<'a>(
        &'a self,
        user: &'a User,
        delta: &'a AlertDelta,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        async move {
            if delta.added.is_empty() {
                debug!("no new alert, nothing to push for user {}", user.id);
                return Ok(());
            }

            // The first failure is returned, later ones only logged
            let mut first_error = None;
            for kind in &delta.added {
                if let Err(e) = self.notifier.notify(Self::message(*kind)).await {
                    if first_error.is_none() {
                        first_error = Some(e);
                    } else {
                        warn!("push of {} alert failed for user {}: {}", kind, user.id, e);
                    }
                }
            }
            first_error.map_or(Ok(()), Err)
        }
        .boxed()
    }
}
