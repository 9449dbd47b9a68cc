use std::fs;
use std::path::Path;

use engine::{InputAction, InputSnapshot, InputSource};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse input script: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptAction {
    MoveLeft,
    MoveRight,
    Jump,
    Confirm,
    Reset,
    Quit,
}

/// One scripted input window. Held actions apply on every tick in
/// `[from_tick, to_tick)`; pressed actions fire only on `from_tick`.
#[derive(Debug, Clone, Deserialize)]
struct ScriptEntry {
    from_tick: u64,
    to_tick: u64,
    #[serde(default)]
    hold: Vec<ScriptAction>,
    #[serde(default)]
    press: Vec<ScriptAction>,
}

/// Deterministic input source for headless runs. With no entries it
/// plays back an idle controller forever.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedInput {
    entries: Vec<ScriptEntry>,
    tick: u64,
}

impl ScriptedInput {
    pub(crate) fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn from_json_str(raw: &str) -> Result<Self, ScriptError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let entries: Vec<ScriptEntry> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| ScriptError::Parse(format!("{}: {error}", error.path())))?;
        Ok(Self { entries, tick: 0 })
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path).map_err(ScriptError::Read)?;
        Self::from_json_str(&raw)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputSnapshot {
        let tick = self.tick;
        self.tick = self.tick.saturating_add(1);

        let mut snapshot = InputSnapshot::empty();
        for entry in &self.entries {
            if tick < entry.from_tick || tick >= entry.to_tick {
                continue;
            }
            for action in &entry.hold {
                snapshot = apply_hold(snapshot, *action);
            }
            if tick == entry.from_tick {
                for action in &entry.press {
                    snapshot = apply_press(snapshot, *action);
                }
            }
        }
        snapshot
    }
}

fn apply_hold(snapshot: InputSnapshot, action: ScriptAction) -> InputSnapshot {
    match action {
        ScriptAction::MoveLeft => snapshot.with_action_down(InputAction::MoveLeft, true),
        ScriptAction::MoveRight => snapshot.with_action_down(InputAction::MoveRight, true),
        ScriptAction::Jump => snapshot.with_action_down(InputAction::Jump, true),
        ScriptAction::Confirm => snapshot.with_action_down(InputAction::Confirm, true),
        ScriptAction::Reset => snapshot.with_action_down(InputAction::Reset, true),
        ScriptAction::Quit => snapshot.with_quit_requested(true),
    }
}

fn apply_press(snapshot: InputSnapshot, action: ScriptAction) -> InputSnapshot {
    match action {
        ScriptAction::Jump => snapshot.with_jump_pressed(true),
        ScriptAction::Confirm => snapshot.with_confirm_pressed(true),
        ScriptAction::Reset => snapshot.with_reset_pressed(true),
        ScriptAction::Quit => snapshot.with_quit_requested(true),
        ScriptAction::MoveLeft => snapshot.with_action_down(InputAction::MoveLeft, true),
        ScriptAction::MoveRight => snapshot.with_action_down(InputAction::MoveRight, true),
    }
}
