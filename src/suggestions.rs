//! Daily outfit suggestions.
//!
//! Computing an outfit is left to a [`SuggestionGenerator`]. The notifier only
//! decides when a suggestion has to be recomputed and stores the result on
//! the user.

use mockall::automock;

use crate::alerts::AlertDelta;

/// Outfit suggested to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Suggestion {
    /// Garments and accessories, in wearing order
    pub outfit: Vec<String>,
}

/// Computes outfit suggestions.
#[automock]
pub trait SuggestionGenerator {
    /// Computes the suggestion for `user_id` after `delta` happened.
    fn suggest(&self, user_id: &str, delta: &AlertDelta) -> Suggestion;
}

/// [`SuggestionGenerator`] producing empty outfits.
///
/// Used when no outfit advisor is plugged in.
#[derive(Default)]
pub struct NoopAdvisor;

impl SuggestionGenerator for NoopAdvisor {
    fn suggest(&self, _user_id: &str, _delta: &AlertDelta) -> Suggestion {
        Suggestion::default()
    }
}
