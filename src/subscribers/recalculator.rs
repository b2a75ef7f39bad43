//! Outfit suggestion reaction to alert changes.

use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::{
    alerts::AlertDelta, notifications::DeliveryError, subscribers::Subscriber,
    suggestions::SuggestionGenerator, users::User,
};

/// Recomputes the user's outfit suggestion whenever the alerts change.
///
/// The new suggestion replaces the user's current one.
pub struct SuggestionRecalculator<G: SuggestionGenerator> {
    generator: Arc<G>,
}

impl<G: SuggestionGenerator> SuggestionRecalculator<G> {
    /// Creates a recalculator asking `generator` for suggestions.
    pub fn new(generator: Arc<G>) -> Self {
        SuggestionRecalculator { generator }
    }
}

impl<G: SuggestionGenerator + Send + Sync> Subscriber for SuggestionRecalculator<G> {
    fn name(&self) -> &str {
        "suggestion"
    }

    fn on_alerts_changed<'a>(
        &'a self,
        user: &'a User,
        delta: &'a AlertDelta,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        async move {
            if delta.is_empty() {
                debug!("alerts unchanged, keeping suggestion of user {}", user.id);
                return Ok(());
            }

            let suggestion = self.generator.suggest(&user.id, delta);
            user.set_suggestion(suggestion).await;
            Ok(())
        }
        .boxed()
    }
}
