//! Reactions to weather alert changes.
//!
//! A [`Subscriber`] is attached to a [`User`] and called with the full
//! [`AlertDelta`] every time the alerts are refreshed. It decides on its own
//! whether the delta is relevant: the dispatcher never branches on alert
//! kinds.
//!
//! # Variants
//!
//! - [`MailSubscriber`]: Mails the user the alerts that changed
//! - [`PushSubscriber`]: Pushes one short message per new alert
//! - [`SuggestionRecalculator`]: Recomputes the user's outfit suggestion
//!
//! A subscriber may be shared by many users (one mail subscriber serving
//! everybody) or created per user (a push subscriber bound to one device
//! topic); users don't care which.

mod mail;
mod push;
mod recalculator;

use futures::future::BoxFuture;

use crate::{
    alerts::{AlertDelta, AlertKind},
    notifications::DeliveryError,
    users::User,
};

pub use crate::subscribers::mail::MailSubscriber;
pub use crate::subscribers::push::PushSubscriber;
pub use crate::subscribers::recalculator::SuggestionRecalculator;

/// Reaction run for a user when the active alerts change.
pub trait Subscriber: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Reacts to `delta` on behalf of `user`.
    ///
    /// Called on every refresh, including when `delta` is empty.
    fn on_alerts_changed<'a>(
        &'a self,
        user: &'a User,
        delta: &'a AlertDelta,
    ) -> BoxFuture<'a, Result<(), DeliveryError>>;
}

/// Joins alert kinds into a comma separated list.
fn list_alerts<'a>(alerts: impl IntoIterator<Item = &'a AlertKind>) -> String {
    alerts
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
