//! Periodic alert refresh.
//!
//! The [`Scheduler`] drives one refresh cycle per tick: fetch the current
//! alerts, refresh the registry, then hand the resulting delta to every user.

use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use log::{error, info, warn};
use tokio::{
    sync::Mutex,
    time::{self, Instant},
};

use crate::{
    alerts::{AlertDelta, AlertKind, AlertRegistry, AlertSet},
    config::{Config, SubscriptionKind},
    dispatch::{DispatchReport, Dispatcher},
    notifications::{HttpMailer, Mailer, PushNotifier},
    subscribers::{MailSubscriber, PushSubscriber, Subscriber, SuggestionRecalculator},
    suggestions::{NoopAdvisor, SuggestionGenerator},
    users::{User, UserDirectory, UserRepository},
    weather::{AlertsRequester, WeatherError, WeatherProvider, WeatherSync},
};

/// Refreshes the alerts and notifies users on a fixed interval.
///
/// # Cycle
///
/// 1. Fetch the current alerts from the [`WeatherProvider`]
/// 2. Refresh the [`AlertRegistry`] to get the delta
/// 3. List the users from the [`UserDirectory`]
/// 4. Dispatch the delta to every user
/// 5. Once a day, recompute the outfit suggestion of every user
///
/// When the provider is unavailable the cycle stops at step 1: the registry
/// keeps the last known alerts and the next tick tries again.
pub struct Scheduler<P: WeatherProvider, D: UserDirectory> {
    provider: P,

    registry: Arc<AlertRegistry>,

    directory: D,

    dispatcher: Dispatcher,

    /// Seconds between two cycles
    polling_interval: u64,

    /// Advisor used for the daily suggestions, none disables them
    advisor: Option<Arc<dyn SuggestionGenerator + Send + Sync>>,

    /// When the daily suggestions were last computed
    last_daily_suggestions: Mutex<Option<Instant>>,
}

/// Time between two daily suggestion computations.
const DAILY: Duration = Duration::from_secs(24 * 60 * 60);

impl<P: WeatherProvider, D: UserDirectory> Scheduler<P, D> {
    /// Create a new [Scheduler].
    ///
    /// # Arguments
    ///
    /// * `provider` - Source of the current alerts
    /// * `registry` - Registry holding the last known alerts
    /// * `directory` - Source of the users to notify
    /// * `dispatcher` - Fan-out of the delta to the users
    /// * `polling_interval` - Seconds between two cycles
    pub fn new(
        provider: P,
        registry: Arc<AlertRegistry>,
        directory: D,
        dispatcher: Dispatcher,
        polling_interval: u64,
    ) -> Self {
        Scheduler {
            provider,
            registry,
            directory,
            dispatcher,
            polling_interval,
            advisor: None,
            last_daily_suggestions: Mutex::new(None),
        }
    }

    /// Enables the daily suggestions, computed by `advisor`.
    pub fn with_daily_suggestions(
        mut self,
        advisor: Arc<dyn SuggestionGenerator + Send + Sync>,
    ) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Runs a single refresh cycle.
    ///
    /// The daily suggestions are computed at the end of the first cycle and
    /// then at the end of the first cycle of every following day.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::ProviderUnavailable`] if the alerts couldn't
    /// be fetched. Nothing was refreshed nor dispatched in that case.
    pub async fn run_cycle(&self) -> Result<DispatchReport, WeatherError> {
        let alerts = self.provider.fetch_current_alerts().await.map_err(|e| {
            error!("skipping alert refresh: {}", e);
            e
        })?;

        let delta = self.registry.refresh(alerts).await;
        let users = self.directory.list_users().await;

        let report = self.dispatcher.dispatch(&users, &delta).await;

        if self.daily_suggestions_due().await {
            self.compute_daily_suggestions(&users).await;
        }

        Ok(report)
    }

    /// Returns `true`, and starts a new day, when the daily suggestions have
    /// to be computed.
    async fn daily_suggestions_due(&self) -> bool {
        if self.advisor.is_none() {
            return false;
        }

        let mut last = self.last_daily_suggestions.lock().await;
        let due = last.is_none_or(|at| at.elapsed() >= DAILY);
        if due {
            *last = Some(Instant::now());
        }
        due
    }

    /// Recomputes the outfit suggestion of every user in `users`.
    ///
    /// The advisor sees every active alert as added.
    ///
    /// # Returns
    ///
    /// The number of suggestions computed.
    pub async fn compute_daily_suggestions(&self, users: &[Arc<User>]) -> usize {
        let Some(advisor) = &self.advisor else {
            return 0;
        };

        let delta = AlertDelta::between(&AlertSet::new(), &self.registry.current().await);
        for user in users {
            user.set_suggestion(advisor.suggest(&user.id, &delta)).await;
        }

        info!("computed daily suggestions for {} users", users.len());
        users.len()
    }

    /// Runs a refresh cycle every `polling_interval` seconds, forever.
    ///
    /// The first cycle runs immediately.
    pub async fn start(self) {
        info!(
            "watching {:?} alerts, refreshing every {} seconds",
            AlertKind::all(),
            self.polling_interval
        );
        let mut interval = time::interval(Duration::from_secs(self.polling_interval.max(1)));

        loop {
            interval.tick().await;

            match self.run_cycle().await {
                Ok(report) => info!(
                    "cycle done: {}/{} users notified, {} failures",
                    report.notified,
                    report.users,
                    report.failures.len()
                ),
                Err(_) => warn!("cycle skipped, retrying at the next tick"),
            }
        }
    }
}

impl Scheduler<WeatherSync<AlertsRequester>, UserRepository> {
    /// Builds the scheduler described by `config`.
    ///
    /// Every user subscribing to mail shares the same mail subscriber. Push
    /// subscribers are bound to the user's own topic. Suggestion
    /// recalculators and the daily suggestions share a single
    /// [`NoopAdvisor`].
    ///
    /// # Errors
    ///
    /// Fails if an HTTP client can't be built or if a user subscribes to push
    /// without a push topic.
    pub async fn from_config(config: Config) -> Result<Self, anyhow::Error> {
        let timeout = config.weather.timeout;

        let requester = AlertsRequester::new(
            &config.weather.url,
            &config.weather.api_key,
            &config.weather.location,
            timeout,
        )?;
        let provider = WeatherSync::new(requester);

        let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(&config.mail.url, timeout)?);
        let mail_subscriber: Arc<dyn Subscriber> = Arc::new(MailSubscriber::new(mailer));
        let advisor = Arc::new(NoopAdvisor);

        let directory = UserRepository::new();
        for user_config in &config.users {
            if directory.remove_user(&user_config.id).await.is_some() {
                warn!(
                    "user {} is configured more than once, keeping the last entry",
                    user_config.id
                );
            }
            let user = Arc::new(User::new(&user_config.id, &user_config.email));

            for kind in &user_config.subscriptions {
                let subscriber: Arc<dyn Subscriber> = match kind {
                    SubscriptionKind::Mail => Arc::clone(&mail_subscriber),
                    SubscriptionKind::Push => {
                        let topic = user_config.push_topic.as_deref().ok_or_else(|| {
                            anyhow!("user {} subscribes to push without a push_topic", user_config.id)
                        })?;
                        let notifier = PushNotifier::new(&config.push.url, topic, timeout)?;
                        Arc::new(PushSubscriber::new(Arc::new(notifier)))
                    }
                    SubscriptionKind::Suggestion => {
                        Arc::new(SuggestionRecalculator::new(Arc::clone(&advisor)))
                    }
                };
                user.subscribe(subscriber).await;
            }

            directory.add_user(user).await;
        }

        Ok(Scheduler::new(
            provider,
            Arc::new(AlertRegistry::new()),
            directory,
            Dispatcher::new(config.dispatch.concurrent_users),
            config.weather.polling_interval,
        )
        .with_daily_suggestions(advisor))
    }
}
