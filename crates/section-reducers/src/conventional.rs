//! # Conventional Reducer Combination
//!
//! The classic two-argument combination: each section reducer sees only its
//! own slice and the action. Provided so that section reducers and
//! conventional reducers can be nested inside each other in either
//! direction.
//!
//! Differences from [`crate::combine`]:
//!
//! - Sections never receive an entire state (`entire` is always `None`).
//! - The next state holds exactly the combined keys; other keys in the
//!   previous state are dropped, and a differing key set counts as a change.
//! - Validation defaults to [`ValidationMode::Lenient`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::combine::{first_invalid_section, insert_section, section_keys};
use crate::error::ReducerError;
use crate::reducer::{Conventional, Reducer, SharedReducer};
use crate::state::State;
use crate::validate::ValidationMode;

/// Builder for a [`CombinedReducer`].
pub struct ConventionalReducers {
    sections: Vec<(String, SharedReducer)>,
    mode: ValidationMode,
}

impl Default for ConventionalReducers {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            mode: ValidationMode::Lenient,
        }
    }
}

impl ConventionalReducers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a two-argument closure section.
    pub fn section<F>(self, key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(Option<&State>, &Action) -> Result<State, ReducerError> + Send + Sync + 'static,
    {
        self.reducer(key, Conventional::new(reducer))
    }

    /// Add any [`Reducer`] as a section. It is called without an entire
    /// state, so a nested combined section reducer runs in standalone mode.
    pub fn reducer<R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer + 'static,
    {
        insert_section(&mut self.sections, key.into(), Arc::new(reducer));
        self
    }

    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> CombinedReducer {
        let error = first_invalid_section(&self.sections, self.mode);
        tracing::debug!(
            sections = self.sections.len(),
            mode = %self.mode,
            valid = error.is_none(),
            "built combined reducer"
        );
        CombinedReducer {
            sections: self.sections,
            error,
        }
    }
}

impl fmt::Debug for ConventionalReducers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConventionalReducers")
            .field("keys", &section_keys(&self.sections))
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Combine shared reducers conventionally, validating leniently.
pub fn combine_reducers<I, K>(sections: I) -> CombinedReducer
where
    I: IntoIterator<Item = (K, SharedReducer)>,
    K: Into<String>,
{
    let mut builder = ConventionalReducers::new();
    for (key, reducer) in sections {
        insert_section(&mut builder.sections, key.into(), reducer);
    }
    builder.build()
}

/// A conventionally combined reducer.
pub struct CombinedReducer {
    sections: Vec<(String, SharedReducer)>,
    error: Option<ReducerError>,
}

impl CombinedReducer {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(key, _)| key.as_str())
    }

    pub fn validation_error(&self) -> Option<&ReducerError> {
        self.error.as_ref()
    }
}

impl Reducer for CombinedReducer {
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        _entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let previous = state.and_then(State::as_map);
        let mut next = BTreeMap::new();
        let mut changed = false;
        for (key, reducer) in &self.sections {
            let before = previous.and_then(|map| map.get(key));
            let after = reducer.reduce(before, action, None)?;
            changed |= before.map_or(true, |before| !State::ptr_eq(before, &after));
            next.insert(key.clone(), after);
        }
        changed |= previous.map_or(true, |map| map.len() != next.len());

        match state {
            Some(state) if !changed => Ok(state.clone()),
            _ => Ok(State::from(next)),
        }
    }
}

impl fmt::Debug for CombinedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("keys", &section_keys(&self.sections))
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::{conventional, from_fn, Constant};
    use serde_json::json;

    #[test]
    fn initializes_every_section() {
        let reducer = ConventionalReducers::new()
            .reducer("a", Constant::new(0))
            .reducer("b", Constant::new(1))
            .build();
        let state = reducer.reduce(None, &Action::init(), None).unwrap();
        assert_eq!(state.to_json(), json!({"a": 0, "b": 1}));
    }

    #[test]
    fn drops_unknown_keys() {
        let reducer = ConventionalReducers::new()
            .reducer("a", Constant::new(0))
            .build();
        let state = State::from(json!({"a": 0, "extra": true}));
        let next = reducer.reduce(Some(&state), &Action::new("NOOP"), None).unwrap();
        assert!(!State::ptr_eq(&state, &next));
        assert_eq!(next.to_json(), json!({"a": 0}));
    }

    #[test]
    fn noop_preserves_identity() {
        let reducer = ConventionalReducers::new()
            .reducer("a", Constant::new(0))
            .build();
        let state = reducer.reduce(None, &Action::init(), None).unwrap();
        let next = reducer.reduce(Some(&state), &Action::new("NOOP"), None).unwrap();
        assert!(State::ptr_eq(&state, &next));
    }

    #[test]
    fn sections_never_see_entire_state() {
        let reducer = ConventionalReducers::new()
            .reducer(
                "a",
                from_fn(|state, _action, entire| {
                    assert!(entire.is_none());
                    Ok(state.cloned().unwrap_or_else(State::null))
                }),
            )
            .build();
        let entire = State::from("entire");
        let state = reducer.reduce(None, &Action::init(), Some(&entire)).unwrap();
        assert!(reducer.reduce(Some(&state), &Action::new("X"), Some(&entire)).is_ok());
    }

    #[test]
    fn defers_invalid_section() {
        let reducer = combine_reducers(vec![(
            "a",
            conventional(|state, _action| {
                state.cloned().ok_or(ReducerError::MissingState {
                    section: "a".to_string(),
                })
            }),
        )]);
        assert!(reducer.validation_error().is_some());
        let err = reducer.reduce(None, &Action::init(), None).unwrap_err();
        assert!(matches!(err, ReducerError::InvalidReducer { ref key, .. } if key == "a"));
    }

    #[test]
    fn closure_sections() {
        let reducer = ConventionalReducers::new()
            .section("n", |state, action| {
                let n = state.and_then(State::as_i64).unwrap_or(0);
                if action.is("INC") {
                    Ok(State::from(n + 1))
                } else {
                    Ok(state.cloned().unwrap_or_else(|| State::from(0)))
                }
            })
            .build();
        let state = reducer.reduce(None, &Action::init(), None).unwrap();
        let state = reducer.reduce(Some(&state), &Action::new("INC"), None).unwrap();
        assert_eq!(state.to_json(), json!({"n": 1}));
        assert_eq!(reducer.keys().collect::<Vec<_>>(), vec!["n"]);
    }
}
