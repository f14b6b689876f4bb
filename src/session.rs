//! Per-key test state tracked outside the keyboard model.
//!
//! The parsing subsystem never mutates a [`KeySpec`]; downstream key-test
//! state lives here, keyed by key id. A [`TestSession`] walks every key of
//! one model through untested → pressed → tested, and a [`TestReport`]
//! materializes the results document that collaborators serialize.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::models::{KeySpec, KeyboardModel};

/// Test state of a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyTestState {
    /// Not yet pressed.
    #[default]
    Untested,
    /// Pointer is over the key; still untested.
    Hover,
    /// Currently held down.
    Pressed,
    /// Pressed and released at least once.
    Tested,
}

/// External per-key test state for one keyboard model.
///
/// Sessions hold the keyboard name and a state map keyed by key id; the
/// model itself stays untouched. Unknown ids are ignored by every
/// transition, so stale events from a previous model are harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSession {
    /// Session identity.
    pub id: Uuid,
    /// Name of the keyboard under test.
    pub keyboard: String,
    states: BTreeMap<usize, KeyTestState>,
}

impl TestSession {
    /// Starts a session covering every key of the model.
    #[must_use]
    pub fn new(model: &KeyboardModel) -> Self {
        let states = model
            .keys
            .iter()
            .map(|key| (key.id, KeyTestState::Untested))
            .collect();

        let session = Self {
            id: Uuid::new_v4(),
            keyboard: model.name.clone(),
            states,
        };
        debug!(session = %session.id, keyboard = %session.keyboard, keys = session.total(), "test session started");
        session
    }

    /// Current state of a key; unknown ids read as untested.
    #[must_use]
    pub fn state(&self, id: usize) -> KeyTestState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Marks a key as held down.
    pub fn press(&mut self, id: usize) {
        if let Some(state) = self.states.get_mut(&id) {
            *state = KeyTestState::Pressed;
        }
    }

    /// Releases a key; a key that was held becomes tested. Once tested a
    /// key never regresses.
    pub fn release(&mut self, id: usize) {
        if let Some(state) = self.states.get_mut(&id) {
            if *state == KeyTestState::Pressed {
                *state = KeyTestState::Tested;
            }
        }
    }

    /// Marks an untested key as hovered.
    pub fn hover(&mut self, id: usize) {
        if let Some(state) = self.states.get_mut(&id) {
            if *state == KeyTestState::Untested {
                *state = KeyTestState::Hover;
            }
        }
    }

    /// Clears a hover back to untested.
    pub fn unhover(&mut self, id: usize) {
        if let Some(state) = self.states.get_mut(&id) {
            if *state == KeyTestState::Hover {
                *state = KeyTestState::Untested;
            }
        }
    }

    /// Number of keys covered by the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.states.len()
    }

    /// Number of keys tested so far.
    #[must_use]
    pub fn tested_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| **state == KeyTestState::Tested)
            .count()
    }

    /// Test progress in percent. An empty session counts as complete.
    #[must_use]
    pub fn progress_percent(&self) -> f32 {
        if self.states.is_empty() {
            return 100.0;
        }
        self.tested_count() as f32 / self.total() as f32 * 100.0
    }

    /// True once every key has been tested.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.states
            .values()
            .all(|state| *state == KeyTestState::Tested)
    }
}

/// One key's line in the results document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyReport {
    /// Key identity.
    pub id: usize,
    /// Matrix row.
    pub row: u8,
    /// Matrix column.
    pub col: u8,
    /// Bound keycode.
    pub keycode: String,
    /// Whether the key was tested during the session.
    pub tested: bool,
}

/// The results document collaborators serialize after a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Moment the report was materialized.
    pub timestamp: DateTime<Utc>,
    /// Name of the keyboard under test.
    pub keyboard: String,
    /// Total keys in the session.
    pub total_keys: usize,
    /// Keys tested during the session.
    pub tested_keys: usize,
    /// Progress in percent.
    pub progress: f32,
    /// Per-key results in key order.
    pub keys: Vec<KeyReport>,
}

impl TestReport {
    /// Materializes the results document for a session over its model.
    ///
    /// Keys appear in model order; keys the session does not cover report
    /// as untested.
    #[must_use]
    pub fn from_session(session: &TestSession, model: &KeyboardModel) -> Self {
        let keys = model
            .keys
            .iter()
            .map(|key| key_report(key, session))
            .collect();

        Self {
            timestamp: Utc::now(),
            keyboard: session.keyboard.clone(),
            total_keys: session.total(),
            tested_keys: session.tested_count(),
            progress: session.progress_percent(),
            keys,
        }
    }
}

fn key_report(key: &KeySpec, session: &TestSession) -> KeyReport {
    KeyReport {
        id: key.id,
        row: key.row,
        col: key.col,
        keycode: key.keycode.clone(),
        tested: session.state(key.id) == KeyTestState::Tested,
    }
}
