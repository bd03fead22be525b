//! # Error Types
//!
//! Two layers, both `thiserror` enums:
//!
//! - [`ValidationError`] is what the reducer validator reports about a single
//!   candidate reducer. It knows nothing about section keys.
//! - [`ReducerError`] is what a reducer invocation returns. A deferred
//!   validation failure is wrapped with the offending section key; every
//!   other variant is raised by section reducers themselves and passes
//!   through the combinators untouched.
//!
//! Both are `Clone` because a combined reducer replays the same captured
//! validation failure on every invocation.

use thiserror::Error;

use crate::state::State;

/// A candidate reducer does not satisfy the reducer contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The reducer failed when asked for its initial state.
    #[error("reducer returned no initial state: {reason}")]
    NoInitialState {
        /// The error the reducer raised.
        reason: String,
    },

    /// Two identical initialization calls produced different states.
    #[error("reducer produced different initial states for identical initialization calls")]
    NonDeterministic,

    /// Strict mode: an unrecognized action produced a new state instead of
    /// returning the previous one.
    #[error("reducer replaced its state on unknown action {action}; unrecognized actions must return the previous state")]
    ReplacesStateOnUnknownAction {
        /// Kind of the probe action.
        action: String,
    },

    /// Strict mode: an unrecognized action made the reducer fail.
    #[error("reducer failed on unknown action {action}: {reason}")]
    RejectsUnknownAction {
        /// Kind of the probe action.
        action: String,
        /// The error the reducer raised.
        reason: String,
    },
}

/// Errors returned by reducer invocations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReducerError {
    /// A section reducer failed validation when the combined reducer was
    /// built. Returned by every invocation of that combined reducer.
    #[error("section {key:?} is not a valid reducer: {source}")]
    InvalidReducer {
        /// The section whose reducer failed validation.
        key: String,
        /// What the validator reported.
        source: ValidationError,
    },

    /// A reducer needed its previous state but none was supplied.
    #[error("section {section:?} has no previous state")]
    MissingState {
        /// Name of the section (or reducer) that needed a state.
        section: String,
    },

    /// A state node had a different shape than the reducer expected.
    #[error("expected {expected} state, found {found}")]
    TypeMismatch {
        /// The shape the reducer expected.
        expected: &'static str,
        /// The shape it found.
        found: &'static str,
    },

    /// A reducer refused to handle an action.
    #[error("action rejected: {reason}")]
    Rejected {
        /// Human-readable rejection reason.
        reason: String,
    },
}

impl ReducerError {
    /// Shorthand for a [`ReducerError::TypeMismatch`] against `found`.
    pub fn type_mismatch(expected: &'static str, found: &State) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.kind_name(),
        }
    }

    /// Shorthand for a [`ReducerError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_reducer_exposes_validation_source() {
        let err = ReducerError::InvalidReducer {
            key: "b".to_string(),
            source: ValidationError::NonDeterministic,
        };
        assert!(err.to_string().starts_with("section \"b\" is not a valid reducer"));
        let source = err.source().expect("validation error is the source");
        assert_eq!(
            source.to_string(),
            ValidationError::NonDeterministic.to_string()
        );
    }

    #[test]
    fn type_mismatch_names_found_shape() {
        let err = ReducerError::type_mismatch("list", &State::from(3));
        assert_eq!(err.to_string(), "expected list state, found number");
    }
}
