//! # Section Reducer Combination
//!
//! [`combine_section_reducers`] turns a map of section name to reducer into a
//! single reducer over a map of section name to section state. Unlike the
//! conventional combination in [`crate::conventional`], every section reducer
//! also receives the *entire* state tree, so it can read state outside its
//! own section.
//!
//! ## Access modes
//!
//! The combined reducer picks a mode per call from the arguments it gets:
//!
//! ```text
//! state    entire     mode         previous section value   entire passed down
//! ─────    ──────     ──────────   ──────────────────────   ──────────────────
//! None     any        Initialize   None                     None
//! Some(s)  None       Standalone   s[key]                   s
//! Some(s)  Some(e)    Section      s[key]                   e
//! ```
//!
//! Standalone mode is what makes the combined reducer a drop-in replacement
//! for a conventional one. Section mode is what a parent combined reducer
//! uses when this one is nested inside a larger tree.
//!
//! ## Validation
//!
//! Sections are validated once, when the combined reducer is built. A
//! failure does not stop construction: the first one is captured and
//! returned from every later invocation.

use std::fmt;

use crate::action::Action;
use crate::error::ReducerError;
use crate::reducer::{from_fn, Reducer, SharedReducer};
use crate::state::State;
use crate::validate::{validate_reducer, ValidationMode};

// ─── Access mode ─────────────────────────────────────────────────────

/// How a combined reducer interprets its arguments for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// No previous state: every section starts from nothing.
    Initialize,
    /// Previous state without an entire state: the previous state doubles as
    /// the entire state.
    Standalone,
    /// Previous state plus a distinct entire state from an enclosing tree.
    Section,
}

impl AccessMode {
    pub fn select(state: Option<&State>, entire: Option<&State>) -> Self {
        match (state, entire) {
            (None, _) => Self::Initialize,
            (Some(_), None) => Self::Standalone,
            (Some(_), Some(_)) => Self::Section,
        }
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Builder for a [`CombinedSectionReducer`].
///
/// ```
/// use section_reducers::{Action, SectionReducers, State};
///
/// let reducer = SectionReducers::new()
///     .section("count", |state, action, _entire| {
///         let n = state.and_then(State::as_i64).unwrap_or(0);
///         match action.kind.as_str() {
///             "INCREMENT" => Ok(State::from(n + 1)),
///             _ => Ok(state.cloned().unwrap_or_else(|| State::from(0))),
///         }
///     })
///     .build();
///
/// let state = reducer.reduce_standalone(None, &Action::init()).unwrap();
/// let state = reducer.reduce_standalone(Some(&state), &Action::new("INCREMENT")).unwrap();
/// assert_eq!(state.get("count").and_then(State::as_i64), Some(1));
/// ```
#[derive(Default)]
pub struct SectionReducers {
    sections: Vec<(String, SharedReducer)>,
    mode: ValidationMode,
}

impl SectionReducers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a closure section. A later section with the same key replaces the
    /// earlier one in place.
    pub fn section<F>(self, key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(Option<&State>, &Action, Option<&State>) -> Result<State, ReducerError>
            + Send
            + Sync
            + 'static,
    {
        self.reducer(key, from_fn(reducer))
    }

    /// Add any [`Reducer`] as a section, including another combined reducer.
    pub fn reducer<R>(self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer + 'static,
    {
        self.shared(key, std::sync::Arc::new(reducer))
    }

    /// Add an already shared reducer as a section.
    pub fn shared(mut self, key: impl Into<String>, reducer: SharedReducer) -> Self {
        insert_section(&mut self.sections, key.into(), reducer);
        self
    }

    /// How sections are validated at build time. Defaults to strict.
    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> CombinedSectionReducer {
        let error = first_invalid_section(&self.sections, self.mode);
        tracing::debug!(
            sections = self.sections.len(),
            mode = %self.mode,
            valid = error.is_none(),
            "built combined section reducer"
        );
        CombinedSectionReducer {
            sections: self.sections,
            error,
        }
    }
}

impl fmt::Debug for SectionReducers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionReducers")
            .field("keys", &section_keys(&self.sections))
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Combine `sections` into one reducer, validating each section strictly.
///
/// Never fails: an invalid section makes every call of the returned reducer
/// fail instead.
pub fn combine_section_reducers<I, K>(sections: I) -> CombinedSectionReducer
where
    I: IntoIterator<Item = (K, SharedReducer)>,
    K: Into<String>,
{
    sections
        .into_iter()
        .fold(SectionReducers::new(), |builder, (key, reducer)| {
            builder.shared(key, reducer)
        })
        .build()
}

// ─── Combined reducer ────────────────────────────────────────────────

/// A reducer over a map of sections, each owned by one section reducer.
pub struct CombinedSectionReducer {
    sections: Vec<(String, SharedReducer)>,
    error: Option<ReducerError>,
}

impl CombinedSectionReducer {
    /// Section keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(key, _)| key.as_str())
    }

    /// The validation failure captured at build time, if any.
    pub fn validation_error(&self) -> Option<&ReducerError> {
        self.error.as_ref()
    }

    /// Two-argument calling convention: `reduce(state, action, None)`.
    pub fn reduce_standalone(
        &self,
        state: Option<&State>,
        action: &Action,
    ) -> Result<State, ReducerError> {
        self.reduce(state, action, None)
    }
}

impl Reducer for CombinedSectionReducer {
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let mode = AccessMode::select(state, entire);
        tracing::trace!(?mode, action = %action.kind, "reducing sections");

        let (previous, passed_down) = match (mode, state) {
            (AccessMode::Initialize, _) | (_, None) => (None, None),
            (AccessMode::Standalone, Some(state)) => (state.as_map(), Some(state)),
            (AccessMode::Section, Some(state)) => (state.as_map(), entire),
        };

        let mut next = previous.cloned().unwrap_or_default();
        let mut changed = false;
        for (key, reducer) in &self.sections {
            let before = previous.and_then(|map| map.get(key));
            let after = reducer.reduce(before, action, passed_down)?;
            changed |= before.map_or(true, |before| !State::ptr_eq(before, &after));
            next.insert(key.clone(), after);
        }

        match state {
            Some(state) if !changed => Ok(state.clone()),
            _ => Ok(State::from(next)),
        }
    }
}

impl fmt::Debug for CombinedSectionReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedSectionReducer")
            .field("keys", &section_keys(&self.sections))
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

// ─── Shared helpers ──────────────────────────────────────────────────

pub(crate) fn insert_section(
    sections: &mut Vec<(String, SharedReducer)>,
    key: String,
    reducer: SharedReducer,
) {
    match sections.iter_mut().find(|(existing, _)| *existing == key) {
        Some(slot) => slot.1 = reducer,
        None => sections.push((key, reducer)),
    }
}

/// Validate every section in order, returning the first failure.
pub(crate) fn first_invalid_section(
    sections: &[(String, SharedReducer)],
    mode: ValidationMode,
) -> Option<ReducerError> {
    sections.iter().find_map(|(key, reducer)| {
        validate_reducer(reducer.as_ref(), mode.is_strict())
            .err()
            .map(|source| {
                tracing::warn!(section = %key, error = %source, "section reducer failed validation");
                ReducerError::InvalidReducer {
                    key: key.clone(),
                    source,
                }
            })
    })
}

pub(crate) fn section_keys(sections: &[(String, SharedReducer)]) -> Vec<&str> {
    sections.iter().map(|(key, _)| key.as_str()).collect()
}
