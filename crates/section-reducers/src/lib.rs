//! # section-reducers — Entire-State Reducer Combination
//!
//! Composes state-update functions ("reducers") for a unidirectional
//! state-management architecture. [`combine_section_reducers`] works like the
//! conventional reducer combination, except that every section reducer also
//! receives the *entire* state tree alongside its own slice.
//!
//! ## Modules
//!
//! - **State** (`state.rs`): [`State`], a reference-counted immutable tree.
//!   Handle identity is how "nothing changed" is detected.
//! - **Action** (`action.rs`): [`Action`], the opaque dispatched value.
//! - **Reducer** (`reducer.rs`): the [`Reducer`] trait, its `Arc`/`Box`
//!   forwarding impls, and adapters for closures and two-argument reducers.
//! - **Validate** (`validate.rs`): the reducer-contract check run once per
//!   section when a combined reducer is built.
//! - **Combine** (`combine.rs`): [`combine_section_reducers`] and its
//!   builder [`SectionReducers`].
//! - **Conventional** (`conventional.rs`): [`combine_reducers`], the classic
//!   two-argument combination, for nesting in either direction.
//!
//! ## Calling convention
//!
//! ```text
//! reduce(None,        action, _)            initialize every section
//! reduce(Some(state), action, None)         standalone: state is also the entire state
//! reduce(Some(state), action, Some(entire)) nested: entire comes from the enclosing tree
//! ```
//!
//! When no section changes, the combined reducer returns the input handle
//! itself, so callers can detect a no-op with [`State::ptr_eq`].

pub mod action;
pub mod combine;
pub mod conventional;
pub mod error;
pub mod reducer;
pub mod state;
pub mod validate;

pub use action::Action;
pub use combine::{combine_section_reducers, AccessMode, CombinedSectionReducer, SectionReducers};
pub use conventional::{combine_reducers, CombinedReducer, ConventionalReducers};
pub use error::{ReducerError, ValidationError};
pub use reducer::{
    conventional, from_fn, shared, Constant, Conventional, FnReducer, Reducer, SharedReducer,
};
pub use state::{Node, State};
pub use validate::{validate_reducer, ValidationMode};
