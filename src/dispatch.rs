//! Fan-out of an alert delta to every user.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::{alerts::AlertDelta, notifications::DeliveryError, users::User};

/// A subscriber that failed to react to an alert change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Id of the user the subscriber was called for
    pub user_id: String,
    /// Name of the failing subscriber
    pub subscriber: String,
    /// What went wrong
    pub error: DeliveryError,
}

/// Outcome of one dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of users the delta was handed to
    pub users: usize,
    /// Number of users whose subscribers all succeeded
    pub notified: usize,
    /// Every subscriber failure, grouped by user
    pub failures: Vec<DeliveryFailure>,
}

/// Hands an alert delta to a list of users.
///
/// Users are served one after the other unless `concurrent_users` is set,
/// in which case all users are served at once. The subscribers of a single
/// user always run sequentially.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dispatcher {
    concurrent_users: bool,
}

impl Dispatcher {
    pub fn new(concurrent_users: bool) -> Self {
        Dispatcher { concurrent_users }
    }

    /// Dispatches `delta` to every user in `users`.
    ///
    /// A failing user never prevents the others from being served.
    ///
    /// # Returns
    ///
    /// A [`DispatchReport`] counting the users served and listing failures.
    pub async fn dispatch(&self, users: &[Arc<User>], delta: &AlertDelta) -> DispatchReport {
        let per_user: Vec<Vec<DeliveryFailure>> = if self.concurrent_users {
            join_all(users.iter().map(|user| user.on_alerts_changed(delta))).await
        } else {
            let mut per_user = Vec::with_capacity(users.len());
            for user in users {
                per_user.push(user.on_alerts_changed(delta).await);
            }
            per_user
        };

        let notified = per_user.iter().filter(|f| f.is_empty()).count();
        let failures: Vec<DeliveryFailure> = per_user.into_iter().flatten().collect();

        if failures.is_empty() {
            info!("dispatched {} to {} users", delta, users.len());
        } else {
            warn!(
                "dispatched {} to {} users, {} deliveries failed",
                delta,
                users.len(),
                failures.len()
            );
        }

        DispatchReport {
            users: users.len(),
            notified,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::{FutureExt, future::BoxFuture};

    use super::*;
    use crate::{
        alerts::{AlertKind, AlertRegistry, AlertSet},
        subscribers::Subscriber,
    };

    type CallLog = Arc<Mutex<Vec<(String, String, AlertDelta)>>>;

    /// Records (subscriber, user, delta) for every call.
    struct RecordingSubscriber {
        name: &'static str,
        calls: CallLog,
    }

    impl Subscriber for RecordingSubscriber {
        fn name(&self) -> &str {
            self.name
        }

        fn on_alerts_changed<'a>(
            &'a self,
            user: &'a User,
            delta: &'a AlertDelta,
        ) -> BoxFuture<'a, Result<(), DeliveryError>> {
            self.calls.lock().unwrap().push((
                self.name.to_owned(),
                user.id.clone(),
                delta.clone(),
            ));
            futures::future::ready(Ok(())).boxed()
        }
    }

    struct FailingSubscriber;

    impl Subscriber for FailingSubscriber {
        fn name(&self) -> &str {
            "broken"
        }

        fn on_alerts_changed<'a>(
            &'a self,
            _user: &'a User,
            _delta: &'a AlertDelta,
        ) -> BoxFuture<'a, Result<(), DeliveryError>> {
            futures::future::ready(Err(DeliveryError::failed("push", "unreachable"))).boxed()
        }
    }

    fn recording(name: &'static str, calls: &CallLog) -> Arc<dyn Subscriber> {
        Arc::new(RecordingSubscriber {
            name,
            calls: Arc::clone(calls),
        })
    }

    fn storm_added() -> AlertDelta {
        AlertDelta {
            added: AlertSet::from([AlertKind::Storm]),
            removed: AlertSet::new(),
        }
    }

    #[tokio::test]
    async fn test_storm_reaches_mail_and_push_of_subscribed_user_only() {
        let calls: CallLog = Arc::default();
        let registry = AlertRegistry::new();

        let alice = Arc::new(User::new("alice", "alice@example.com"));
        alice.subscribe(recording("mail", &calls)).await;
        alice.subscribe(recording("push", &calls)).await;
        let bob = Arc::new(User::new("bob", "bob@example.com"));

        let delta = registry
            .refresh(AlertSet::from([AlertKind::Storm]))
            .await;
        let report = Dispatcher::default()
            .dispatch(&[Arc::clone(&alice), Arc::clone(&bob)], &delta)
            .await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ("mail".to_owned(), "alice".to_owned(), storm_added()),
                ("push".to_owned(), "alice".to_owned(), storm_added()),
            ]
        );
        assert_eq!(
            report,
            DispatchReport {
                users: 2,
                notified: 2,
                failures: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_failing_user_does_not_block_others() {
        let calls: CallLog = Arc::default();

        let alice = Arc::new(User::new("alice", "alice@example.com"));
        alice.subscribe(Arc::new(FailingSubscriber)).await;
        alice.subscribe(recording("mail", &calls)).await;
        let bob = Arc::new(User::new("bob", "bob@example.com"));
        bob.subscribe(recording("mail", &calls)).await;

        let report = Dispatcher::new(false)
            .dispatch(&[alice, bob], &storm_added())
            .await;

        let users: Vec<String> = calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, user, _)| user.clone())
            .collect();
        assert_eq!(users, vec!["alice", "bob"]);
        assert_eq!(report.users, 2);
        assert_eq!(report.notified, 1);
        assert_eq!(
            report.failures,
            vec![DeliveryFailure {
                user_id: "alice".to_owned(),
                subscriber: "broken".to_owned(),
                error: DeliveryError::failed("push", "unreachable"),
            }]
        );
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_serves_every_user() {
        let calls: CallLog = Arc::default();
        let mut users = Vec::new();
        for i in 0..8 {
            let user = Arc::new(User::new(&format!("user{i}"), "user@example.com"));
            user.subscribe(recording("mail", &calls)).await;
            user.subscribe(recording("push", &calls)).await;
            users.push(user);
        }

        let report = Dispatcher::new(true)
            .dispatch(&users, &storm_added())
            .await;

        assert_eq!(report.users, 8);
        assert_eq!(report.notified, 8);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 16);
        for i in 0..8 {
            let names: Vec<&str> = calls
                .iter()
                .filter(|(_, user, _)| *user == format!("user{i}"))
                .map(|(name, _, _)| name.as_str())
                .collect();
            assert_eq!(names, vec!["mail", "push"]);
        }
    }

    #[tokio::test]
    async fn test_empty_delta_is_still_dispatched() {
        let calls: CallLog = Arc::default();
        let alice = Arc::new(User::new("alice", "alice@example.com"));
        alice.subscribe(recording("mail", &calls)).await;

        let report = Dispatcher::default()
            .dispatch(&[alice], &AlertDelta::default())
            .await;

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(report.notified, 1);
    }

    #[tokio::test]
    async fn test_no_users() {
        let report = Dispatcher::default()
            .dispatch(&[], &storm_added())
            .await;
        assert_eq!(report, DispatchReport::default());
    }
}
