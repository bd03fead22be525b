//! # Reducer Validation
//!
//! Checks that a candidate satisfies the reducer contract before a combinator
//! accepts it:
//!
//! 1. Called with no state and the [`INIT`](crate::action::INIT) action, it
//!    produces an initial state.
//! 2. A second identical call produces an equal initial state.
//! 3. Strict mode only: called with its initial state and an action of a
//!    random, unknowable kind, it returns that same state handle.
//!
//! Being callable at all is guaranteed by the [`Reducer`] bound.

use crate::action::Action;
use crate::error::ValidationError;
use crate::reducer::Reducer;
use crate::state::State;

/// How thoroughly a combinator validates its sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Initial-state checks plus the unknown-action identity check.
    #[default]
    Strict,
    /// Initial-state checks only.
    Lenient,
}

impl ValidationMode {
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Lenient => f.write_str("lenient"),
        }
    }
}

/// Validate `reducer` against the reducer contract.
pub fn validate_reducer<R>(reducer: &R, strict: bool) -> Result<(), ValidationError>
where
    R: Reducer + ?Sized,
{
    let init = Action::init();
    let initial = initial_state(reducer, &init)?;
    let again = initial_state(reducer, &init)?;
    if initial != again {
        return Err(ValidationError::NonDeterministic);
    }

    if !strict {
        return Ok(());
    }

    let probe = Action::probe();
    let next = reducer
        .reduce(Some(&initial), &probe, None)
        .map_err(|e| ValidationError::RejectsUnknownAction {
            action: probe.kind.clone(),
            reason: e.to_string(),
        })?;
    if !State::ptr_eq(&initial, &next) {
        return Err(ValidationError::ReplacesStateOnUnknownAction { action: probe.kind });
    }
    Ok(())
}

fn initial_state<R>(reducer: &R, init: &Action) -> Result<State, ValidationError>
where
    R: Reducer + ?Sized,
{
    reducer
        .reduce(None, init, None)
        .map_err(|e| ValidationError::NoInitialState {
            reason: e.to_string(),
        })
}
