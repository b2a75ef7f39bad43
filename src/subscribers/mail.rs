//! Mail reaction to alert changes.

use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::{
    alerts::AlertDelta,
    notifications::{DeliveryError, Mailer},
    subscribers::{Subscriber, list_alerts},
    users::User,
};

/// Mails the user which alerts appeared and which ended.
///
/// One instance can serve every user: the recipient is taken from the user
/// being notified.
pub struct MailSubscriber {
    mailer: Arc<dyn Mailer>,
}

impl MailSubscriber {
    /// Creates a subscriber sending through `mailer`.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        MailSubscriber { mailer }
    }

    /// Formats the mail body for `delta`.
    fn format_body(delta: &AlertDelta) -> String {
        let mut body = String::from("The weather alerts for your area changed.\n");

        if !delta.added.is_empty() {
            body.push_str(&format!("New alerts: {}\n", list_alerts(&delta.added)));
        }
        if !delta.removed.is_empty() {
            body.push_str(&format!(
                "No longer active: {}\n",
                list_alerts(&delta.removed)
            ));
        }

        body
    }
}

impl Subscriber for MailSubscriber {
    fn name(&self) -> &str {
        "mail"
    }

    fn on_alerts_changed<'a>(
        &'a self,
        user: &'a User,
        delta: &'a AlertDelta,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        async move {
            if delta.is_empty() {
                debug!("no alert change, no mail for user {}", user.id);
                return Ok(());
            }

            let body = Self::format_body(delta);
            self.mailer.send_mail(&user.email, &body).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::alerts::{AlertKind, AlertSet};

    /// Keeps every mail instead of sending it.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send_mail<'a>(
            &'a self,
            recipient: &'a str,
            body: &'a str,
        ) -> BoxFuture<'a, Result<(), DeliveryError>> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_owned(), body.to_owned()));
            futures::future::ready(Ok(())).boxed()
        }
    }

    struct FailingMailer;

    impl Mailer for FailingMailer {
        fn send_mail<'a>(
            &'a self,
            _recipient: &'a str,
            _body: &'a str,
        ) -> BoxFuture<'a, Result<(), DeliveryError>> {
            futures::future::ready(Err(DeliveryError::failed("mail", "relay down"))).boxed()
        }
    }

    #[tokio::test]
    async fn test_mails_added_and_removed_alerts() {
        let mailer = Arc::new(RecordingMailer::default());
        let subscriber = MailSubscriber::new(Arc::clone(&mailer) as Arc<dyn Mailer>);
        let user = User::new("alice", "alice@example.com");
        let delta = AlertDelta {
            added: AlertSet::from([AlertKind::Storm, AlertKind::Hail]),
            removed: AlertSet::new(),
        };

        subscriber.on_alerts_changed(&user, &delta).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
        assert_eq!(
            sent[0].1,
            "The weather alerts for your area changed.\nNew alerts: storm, hail\n"
        );
    }

    #[tokio::test]
    async fn test_mails_removed_alerts() {
        let mailer = Arc::new(RecordingMailer::default());
        let subscriber = MailSubscriber::new(Arc::clone(&mailer) as Arc<dyn Mailer>);
        let user = User::new("bob", "bob@example.com");
        let delta = AlertDelta {
            added: AlertSet::from([AlertKind::Hail]),
            removed: AlertSet::from([AlertKind::Storm]),
        };

        subscriber.on_alerts_changed(&user, &delta).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(
            sent[0].1,
            "The weather alerts for your area changed.\nNew alerts: hail\nNo longer active: storm\n"
        );
    }

    #[tokio::test]
    async fn test_empty_delta_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let subscriber = MailSubscriber::new(Arc::clone(&mailer) as Arc<dyn Mailer>);
        let user = User::new("alice", "alice@example.com");

        subscriber
            .on_alerts_changed(&user, &AlertDelta::default())
            .await
            .unwrap();

        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shared_instance_mails_each_user() {
        let mailer = Arc::new(RecordingMailer::default());
        let subscriber = MailSubscriber::new(Arc::clone(&mailer) as Arc<dyn Mailer>);
        let delta = AlertDelta {
            added: AlertSet::from([AlertKind::Storm]),
            removed: AlertSet::new(),
        };

        for user in [
            User::new("alice", "alice@example.com"),
            User::new("bob", "bob@example.com"),
        ] {
            subscriber.on_alerts_changed(&user, &delta).await.unwrap();
        }

        let recipients: Vec<String> = mailer
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(recipient, _)| recipient.clone())
            .collect();
        assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
    }

    #[tokio::test]
    async fn test_mailer_failure_is_returned() {
        let subscriber = MailSubscriber::new(Arc::new(FailingMailer));
        let user = User::new("alice", "alice@example.com");
        let delta = AlertDelta {
            added: AlertSet::from([AlertKind::Storm]),
            removed: AlertSet::new(),
        };

        let result = subscriber.on_alerts_changed(&user, &delta).await;
        assert_eq!(result, Err(DeliveryError::failed("mail", "relay down")));
    }
}
