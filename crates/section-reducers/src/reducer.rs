//! # The Reducer Seam
//!
//! Every reducer, whether a closure, an adapted two-argument function, or a
//! combined reducer, implements [`Reducer`]. Combinators store their
//! sections as [`SharedReducer`] trait objects, which is what lets a combined
//! reducer be used as a section of another one.

use std::sync::Arc;

use crate::action::Action;
use crate::error::ReducerError;
use crate::state::State;

/// A function of (previous section state, action, entire state) to the next
/// section state.
///
/// `state` is `None` when the section has no previous state yet. `entire` is
/// `None` when the caller did not supply an entire-state value.
///
/// Unrecognized actions must return the previous state handle itself (a
/// clone of `state`), not an equal copy, so that callers can detect "no
/// change" by identity.
pub trait Reducer: Send + Sync {
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        entire: Option<&State>,
    ) -> Result<State, ReducerError>;
}

impl<R> Reducer for Arc<R>
where
    R: Reducer + ?Sized,
{
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        (**self).reduce(state, action, entire)
    }
}

impl<R> Reducer for Box<R>
where
    R: Reducer + ?Sized,
{
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        (**self).reduce(state, action, entire)
    }
}

/// A reducer shared between combinators.
pub type SharedReducer = Arc<dyn Reducer>;

// ─── Closure reducers ────────────────────────────────────────────────

/// Adapts a three-argument closure to [`Reducer`].
pub struct FnReducer<F>(F);

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Option<&State>, &Action, Option<&State>) -> Result<State, ReducerError> + Send + Sync,
{
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        (self.0)(state, action, entire)
    }
}

impl<F> std::fmt::Debug for FnReducer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnReducer").finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Reducer`].
///
/// The explicit `Fn` bound lets the compiler infer the closure's
/// higher-ranked signature.
pub fn from_fn<F>(f: F) -> FnReducer<F>
where
    F: Fn(Option<&State>, &Action, Option<&State>) -> Result<State, ReducerError> + Send + Sync,
{
    FnReducer(f)
}

/// Wraps a closure as a [`SharedReducer`].
pub fn shared<F>(f: F) -> SharedReducer
where
    F: Fn(Option<&State>, &Action, Option<&State>) -> Result<State, ReducerError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(from_fn(f))
}

// ─── Conventional reducers ───────────────────────────────────────────

/// Adapts a two-argument `(state, action)` reducer to [`Reducer`]. The
/// entire-state argument is ignored.
pub struct Conventional<F>(F);

impl<F> Conventional<F>
where
    F: Fn(Option<&State>, &Action) -> Result<State, ReducerError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Reducer for Conventional<F>
where
    F: Fn(Option<&State>, &Action) -> Result<State, ReducerError> + Send + Sync,
{
    fn reduce(
        &self,
        state: Option<&State>,
        action: &Action,
        _entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        (self.0)(state, action)
    }
}

impl<F> std::fmt::Debug for Conventional<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conventional").finish_non_exhaustive()
    }
}

/// Wraps a two-argument closure as a [`SharedReducer`].
pub fn conventional<F>(f: F) -> SharedReducer
where
    F: Fn(Option<&State>, &Action) -> Result<State, ReducerError> + Send + Sync + 'static,
{
    Arc::new(Conventional::new(f))
}

/// A reducer that owns a constant default and ignores every action.
///
/// Returns the previous state when there is one, otherwise the same default
/// handle on every call.
#[derive(Debug, Clone)]
pub struct Constant {
    default: State,
}

impl Constant {
    pub fn new(default: impl Into<State>) -> Self {
        Self {
            default: default.into(),
        }
    }
}

impl Reducer for Constant {
    fn reduce(
        &self,
        state: Option<&State>,
        _action: &Action,
        _entire: Option<&State>,
    ) -> Result<State, ReducerError> {
        Ok(state.unwrap_or(&self.default).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_reducers() {
        let r = shared(|state, action, entire| {
            assert!(action.is("X"));
            assert!(entire.is_none());
            Ok(state.cloned().unwrap_or_else(|| State::from(7)))
        });
        let out = r.reduce(None, &Action::new("X"), None).unwrap();
        assert_eq!(out.as_i64(), Some(7));
    }

    #[test]
    fn conventional_ignores_entire_state() {
        let r = conventional(|state, _action| Ok(state.cloned().unwrap_or_else(State::null)));
        let entire = State::from("entire");
        let out = r.reduce(None, &Action::init(), Some(&entire)).unwrap();
        assert!(out.is_null());
    }

    #[test]
    fn arc_and_box_forward_to_inner_reducer() {
        let arc = Arc::new(Constant::new(1));
        let boxed: Box<dyn Reducer> = Box::new(Constant::new(2));
        let from_arc = arc.reduce(None, &Action::init(), None).unwrap();
        let from_box = boxed.reduce(None, &Action::init(), None).unwrap();
        assert_eq!(from_arc.as_i64(), Some(1));
        assert_eq!(from_box.as_i64(), Some(2));
    }

    #[test]
    fn constant_keeps_previous_state() {
        let r = Constant::new(2);
        let first = r.reduce(None, &Action::init(), None).unwrap();
        let second = r.reduce(None, &Action::init(), None).unwrap();
        assert!(State::ptr_eq(&first, &second));
        let previous = State::from(5);
        let kept = r.reduce(Some(&previous), &Action::new("ANY"), None).unwrap();
        assert!(State::ptr_eq(&kept, &previous));
    }
}
