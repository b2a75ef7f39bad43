//! Outgoing notification channels.
//!
//! Subscribers speak to users through these channels. The core treats them
//! as opaque sinks that either accept a message or fail with
//! [`DeliveryError::DeliveryFailed`].
//!
//! - [`Mailer`]: Sends an e-mail body to a recipient ([`HttpMailer`])
//! - [`Notifier`]: Pushes a short message to a device topic ([`PushNotifier`])

mod mailer;
mod push_notifier;

use futures::future::BoxFuture;
use thiserror::Error;

pub use crate::notifications::mailer::HttpMailer;
pub use crate::notifications::push_notifier::PushNotifier;

/// Errors raised by a notification channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The channel could not deliver the message.
    #[error("delivery failed on {channel}: {reason}")]
    DeliveryFailed {
        /// Name of the channel that failed
        channel: String,
        /// Why the delivery failed
        reason: String,
    },
}

impl DeliveryError {
    /// Builds a [`DeliveryError::DeliveryFailed`] for `channel`.
    pub fn failed(channel: &str, reason: impl ToString) -> Self {
        DeliveryError::DeliveryFailed {
            channel: channel.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Channel sending e-mails.
pub trait Mailer: Send + Sync {
    /// Sends `body` to `recipient`.
    fn send_mail<'a>(
        &'a self,
        recipient: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>>;
}

/// Channel pushing short messages.
pub trait Notifier: Send + Sync {
    /// Pushes `message`.
    fn notify<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), DeliveryError>>;
}
