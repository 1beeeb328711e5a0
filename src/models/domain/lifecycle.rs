use async_graphql::Enum;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Lifecycle of a single quiz: Requested -> Resolving -> Archived -> Evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuizLifecycle {
    Requested,
    Resolving,
    Archived,
    Evaluated,
}

impl QuizLifecycle {
    pub fn next(self) -> Option<QuizLifecycle> {
        match self {
            QuizLifecycle::Requested => Some(QuizLifecycle::Resolving),
            QuizLifecycle::Resolving => Some(QuizLifecycle::Archived),
            QuizLifecycle::Archived => Some(QuizLifecycle::Evaluated),
            QuizLifecycle::Evaluated => None,
        }
    }

    /// Moves to `target`, which must be the immediate successor.
    pub fn advance_to(self, target: QuizLifecycle) -> AppResult<QuizLifecycle> {
        if self.next() == Some(target) {
            Ok(target)
        } else {
            Err(AppError::InternalError(format!(
                "invalid lifecycle transition {:?} -> {:?}",
                self, target
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_walks_every_state_in_order() {
        let state = QuizLifecycle::Requested
            .advance_to(QuizLifecycle::Resolving)
            .and_then(|s| s.advance_to(QuizLifecycle::Archived))
            .and_then(|s| s.advance_to(QuizLifecycle::Evaluated))
            .expect("full walk should succeed");
        assert_eq!(state, QuizLifecycle::Evaluated);
        assert_eq!(state.next(), None);
    }

    #[test]
    fn lifecycle_rejects_skipped_states() {
        assert!(QuizLifecycle::Requested
            .advance_to(QuizLifecycle::Archived)
            .is_err());
        assert!(QuizLifecycle::Resolving
            .advance_to(QuizLifecycle::Evaluated)
            .is_err());
        assert!(QuizLifecycle::Archived
            .advance_to(QuizLifecycle::Requested)
            .is_err());
    }
}
