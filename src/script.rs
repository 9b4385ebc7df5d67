// Gesture scripts: TOML descriptions of pointer/keyboard input replayed through an overlay.

use std::path::Path;

use serde::Deserialize;

use crate::geometry::PixelSize;
use crate::input::{NavKey, UnknownKey};
use crate::overlay::{Overlay, UnknownWindow};
use crate::window::hit_test::{HandleId, UnknownHandle};
use crate::window::store::Commit;
use crate::window::WindowContent;

/// One input event of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Pointer moved to surface coordinates.
    Move { x: f64, y: f64 },
    /// Pointer pressed on whatever handle is hovered.
    Press,
    /// Pointer pressed on a named handle at `(x, y)`.
    PressHandle {
        window: String,
        handle: HandleId,
        x: f64,
        y: f64,
    },
    Release,
    Key(NavKey),
    /// Give keyboard focus to a handle; `None` blurs the window.
    Focus {
        window: String,
        handle: Option<HandleId>,
    },
    /// Resize the boundary container.
    Container(PixelSize),
    Lock(bool),
    Visible { window: String, visible: bool },
}

/// A parsed gesture script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Container size set before the first step.
    pub container: Option<PixelSize>,
    pub steps: Vec<Step>,
}

/// Errors raised while loading or replaying a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("step {step}: {source}")]
    UnknownWindow { step: usize, source: UnknownWindow },
    #[error("step {step}: {source}")]
    InvalidHandle { step: usize, source: UnknownHandle },
    #[error("step {step}: {source}")]
    InvalidKey { step: usize, source: UnknownKey },
}

// ── Serde intermediate structs ───────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawScript {
    container: Option<RawSize>,
    #[serde(rename = "step")]
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
struct RawSize {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum RawStep {
    Move {
        x: f64,
        y: f64,
    },
    Press {
        window: Option<String>,
        handle: Option<String>,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Release,
    Key {
        key: String,
    },
    Focus {
        window: String,
        handle: Option<String>,
    },
    Container {
        width: f64,
        height: f64,
    },
    Lock {
        locked: bool,
    },
    Visible {
        window: String,
        visible: bool,
    },
}

fn parse_handle(step: usize, name: &str) -> Result<HandleId, ScriptError> {
    name.parse()
        .map_err(|source| ScriptError::InvalidHandle { step, source })
}

impl RawStep {
    fn into_step(self, step: usize) -> Result<Step, ScriptError> {
        Ok(match self {
            RawStep::Move { x, y } => Step::Move { x, y },
            RawStep::Press {
                window: None,
                handle: None,
                ..
            } => Step::Press,
            RawStep::Press {
                window: None,
                handle: Some(handle),
                ..
            } => {
                return Err(ScriptError::Parse(format!(
                    "step {step}: handle '{handle}' given without a window"
                )))
            }
            RawStep::Press {
                window: Some(window),
                handle,
                x,
                y,
            } => Step::PressHandle {
                window,
                handle: match handle {
                    Some(name) => parse_handle(step, &name)?,
                    None => HandleId::Drag,
                },
                x,
                y,
            },
            RawStep::Release => Step::Release,
            RawStep::Key { key } => Step::Key(
                key.parse()
                    .map_err(|source| ScriptError::InvalidKey { step, source })?,
            ),
            RawStep::Focus { window, handle } => Step::Focus {
                window,
                handle: handle.map(|name| parse_handle(step, &name)).transpose()?,
            },
            RawStep::Container { width, height } => Step::Container(PixelSize::new(width, height)),
            RawStep::Lock { locked } => Step::Lock(locked),
            RawStep::Visible { window, visible } => Step::Visible { window, visible },
        })
    }
}

// ── Script implementation ───────────────────────────────────────────────

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ScriptError> {
        let raw: RawScript =
            toml::from_str(toml_str).map_err(|e| ScriptError::Parse(e.to_string()))?;
        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| step.into_step(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            container: raw.container.map(|s| PixelSize::new(s.width, s.height)),
            steps,
        })
    }

    /// Feed every step to `overlay`. Returns the commits applied, oldest first.
    pub fn replay<C: WindowContent>(&self, overlay: &mut Overlay<C>) -> Result<Vec<Commit>, ScriptError> {
        if let Some(size) = self.container {
            let selector = overlay.boundary_selector().to_string();
            overlay.stage_mut().set_boundary(selector, size);
        }

        let mut commits = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            let n = i + 1;
            log::trace!("step {n}: {step:?}");
            let effect = match step {
                Step::Move { x, y } => overlay.on_cursor_moved(*x, *y),
                Step::Press => overlay.on_mouse_press(),
                Step::PressHandle { window, handle, x, y } => overlay
                    .press_handle(window, *handle, *x, *y)
                    .map_err(|source| ScriptError::UnknownWindow { step: n, source })?,
                Step::Release => overlay.on_mouse_release(),
                Step::Key(key) => overlay.on_key(*key),
                Step::Focus { window, handle } => {
                    overlay
                        .focus(window, *handle)
                        .map_err(|source| ScriptError::UnknownWindow { step: n, source })?;
                    continue;
                }
                Step::Container(size) => {
                    let selector = overlay.boundary_selector().to_string();
                    overlay.stage_mut().set_boundary(selector, *size);
                    continue;
                }
                Step::Lock(locked) => {
                    overlay.set_locked_all(*locked);
                    continue;
                }
                Step::Visible { window, visible } => {
                    overlay
                        .set_visible(window, *visible)
                        .map_err(|source| ScriptError::UnknownWindow { step: n, source })?;
                    continue;
                }
            };
            log::debug!("step {n}: {effect:?}");
            commits.extend(overlay.drain_applied());
        }
        Ok(commits)
    }
}
