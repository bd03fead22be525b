//! # Actions
//!
//! An [`Action`] is opaque to the combinators: they forward it unchanged to
//! every section reducer. Only its `kind` discriminant is interpreted, and
//! only by the reducers themselves.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// Kind of the action used to ask a reducer for its initial state.
pub const INIT: &str = "@@section-reducers/INIT";

/// Prefix of the randomly named probe actions the validator dispatches.
pub const PROBE_PREFIX: &str = "@@section-reducers/PROBE_";

/// A dispatched action.
///
/// Serializes with the discriminant under `type`:
/// `{"type": "ADD", "payload": "d"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<State>,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<String>, payload: impl Into<State>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload.into()),
        }
    }

    /// The initialization action.
    pub fn init() -> Self {
        Self::new(INIT)
    }

    /// An action of a fresh, random kind that no reducer can recognize.
    pub fn probe() -> Self {
        Self::new(format!("{PROBE_PREFIX}{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_kind_as_type() {
        let action = Action::with_payload("ADD", "d");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "ADD", "payload": "d"})
        );
        assert_eq!(
            serde_json::to_value(Action::new("INIT")).unwrap(),
            json!({"type": "INIT"})
        );
    }

    #[test]
    fn deserializes_without_payload() {
        let action: Action = serde_json::from_value(json!({"type": "DO_NOTHING"})).unwrap();
        assert!(action.is("DO_NOTHING"));
        assert!(action.payload.is_none());
    }

    #[test]
    fn probes_are_unique() {
        let a = Action::probe();
        let b = Action::probe();
        assert!(a.kind.starts_with(PROBE_PREFIX));
        assert_ne!(a.kind, b.kind);
        assert_ne!(a.kind, INIT);
    }
}
