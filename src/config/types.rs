use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::window::hit_test::{HandleMetrics, DEFAULT_DRAG_BAR_HEIGHT, DEFAULT_GRIP_MARGIN};
use crate::window::model::WindowGeometry;
use crate::window::store::WindowEntry;
use crate::window::{WindowBehavior, DEFAULT_MIN_SIZE, DEFAULT_MOVE_STEP, DEFAULT_RESIZE_STEP};

const DEFAULT_BOUNDARY_SELECTOR: &str = "#player-surface";
const MAX_STEP: f64 = 50.0;

/// Top-level overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub boundary: BoundaryConfig,
    pub steps: StepsConfig,
    pub limits: LimitsConfig,
    pub handles: HandlesConfig,
    pub windows: Vec<WindowEntry>,
}

/// Container that defines the percentage coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConfig {
    pub selector: String,
}

/// Keyboard step sizes, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct StepsConfig {
    pub move_step: f64,
    pub resize_step: f64,
}

/// Size limits, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitsConfig {
    pub min_size: f64,
}

/// Handle hit areas, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlesConfig {
    pub drag_bar_height: f64,
    pub grip_margin: f64,
}

/// Errors that can occur during config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate structs ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(default)]
struct RawConfig {
    boundary: RawBoundaryConfig,
    steps: RawStepsConfig,
    limits: RawLimitsConfig,
    handles: RawHandlesConfig,
    windows: Vec<WindowEntry>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            boundary: RawBoundaryConfig::default(),
            steps: RawStepsConfig::default(),
            limits: RawLimitsConfig::default(),
            handles: RawHandlesConfig::default(),
            windows: default_windows(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawBoundaryConfig {
    selector: String,
}

impl Default for RawBoundaryConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_BOUNDARY_SELECTOR.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawStepsConfig {
    #[serde(rename = "move")]
    move_step: f64,
    #[serde(rename = "resize")]
    resize_step: f64,
}

impl Default for RawStepsConfig {
    fn default() -> Self {
        Self {
            move_step: DEFAULT_MOVE_STEP,
            resize_step: DEFAULT_RESIZE_STEP,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawLimitsConfig {
    min_size: f64,
}

impl Default for RawLimitsConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawHandlesConfig {
    drag_bar_height: f64,
    grip_margin: f64,
}

impl Default for RawHandlesConfig {
    fn default() -> Self {
        Self {
            drag_bar_height: DEFAULT_DRAG_BAR_HEIGHT,
            grip_margin: DEFAULT_GRIP_MARGIN,
        }
    }
}

/// Panels shown over the player surface out of the box.
fn default_windows() -> Vec<WindowEntry> {
    vec![
        WindowEntry::new("captions", WindowGeometry::new(78.0, 10.0, 80.0, 15.0)),
        WindowEntry::new("slides", WindowGeometry::new(5.0, 55.0, 40.0, 40.0)),
        WindowEntry::new("additional-information", WindowGeometry::new(5.0, 5.0, 40.0, 40.0)),
    ]
}

// ── Default impls ───────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            boundary: BoundaryConfig::default(),
            steps: StepsConfig::default(),
            limits: LimitsConfig::default(),
            handles: HandlesConfig::default(),
            windows: default_windows(),
        }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_BOUNDARY_SELECTOR.to_string(),
        }
    }
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            move_step: DEFAULT_MOVE_STEP,
            resize_step: DEFAULT_RESIZE_STEP,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl Default for HandlesConfig {
    fn default() -> Self {
        Self {
            drag_bar_height: DEFAULT_DRAG_BAR_HEIGHT,
            grip_margin: DEFAULT_GRIP_MARGIN,
        }
    }
}

// ── Config implementation ───────────────────────────────────────────────

impl Config {
    /// Load config from a TOML file path. Returns defaults if file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Parse a TOML string into a Config.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let config = Self {
            boundary: BoundaryConfig {
                selector: raw.boundary.selector,
            },
            steps: StepsConfig {
                move_step: raw.steps.move_step,
                resize_step: raw.steps.resize_step,
            },
            limits: LimitsConfig {
                min_size: raw.limits.min_size,
            },
            handles: HandlesConfig {
                drag_bar_height: raw.handles.drag_bar_height,
                grip_margin: raw.handles.grip_margin,
            },
            windows: raw.windows,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the config, returning an error if any values are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boundary.selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "boundary selector must not be empty".to_string(),
            ));
        }

        for (name, step) in [("move", self.steps.move_step), ("resize", self.steps.resize_step)] {
            if step.is_nan() || step <= 0.0 || step > MAX_STEP {
                return Err(ConfigError::Validation(format!(
                    "{name} step must be > 0 and <= {MAX_STEP}, got {step}"
                )));
            }
        }

        let min_size = self.limits.min_size;
        if !(0.0..100.0).contains(&min_size) {
            return Err(ConfigError::Validation(format!(
                "min_size must be >= 0 and < 100, got {min_size}"
            )));
        }

        let handles = [self.handles.drag_bar_height, self.handles.grip_margin];
        if handles.iter().any(|v| v.is_nan() || *v < 0.0) {
            return Err(ConfigError::Validation(
                "handle sizes must be >= 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for window in &self.windows {
            if window.name.is_empty() {
                return Err(ConfigError::Validation(
                    "window name must not be empty".to_string(),
                ));
            }
            if !seen.insert(window.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate window '{}'",
                    window.name
                )));
            }
            if !window.geometry.satisfies_bounds() {
                return Err(ConfigError::Validation(format!(
                    "window '{}' does not fit inside its container: {:?}",
                    window.name, window.geometry
                )));
            }
        }

        Ok(())
    }

    /// Interaction settings shared by every window controller.
    pub fn behavior(&self) -> WindowBehavior {
        WindowBehavior {
            move_step: self.steps.move_step,
            resize_step: self.steps.resize_step,
            min_size: self.limits.min_size,
            metrics: HandleMetrics {
                drag_bar_height: self.handles.drag_bar_height,
                grip_margin: self.handles.grip_margin,
            },
        }
    }

    /// Commented default config, for `--print-default-config`.
    pub fn print_default() -> String {
        let mut out = format!(
            "# floatpane configuration\n\
             \n\
             [boundary]\n\
             # Container that defines the 0-100 coordinate space\n\
             selector = \"{DEFAULT_BOUNDARY_SELECTOR}\"\n\
             \n\
             [steps]\n\
             # Percent per arrow key press\n\
             move = {DEFAULT_MOVE_STEP:?}\n\
             resize = {DEFAULT_RESIZE_STEP:?}\n\
             \n\
             [limits]\n\
             # Smallest width/height a resize may leave, in percent\n\
             min_size = {DEFAULT_MIN_SIZE:?}\n\
             \n\
             [handles]\n\
             # Pixel sizes of the hit areas\n\
             drag_bar_height = {DEFAULT_DRAG_BAR_HEIGHT:?}\n\
             grip_margin = {DEFAULT_GRIP_MARGIN:?}\n"
        );
        for window in default_windows() {
            let g = window.geometry;
            out.push_str(&format!(
                "\n[[windows]]\n\
                 name = \"{}\"\n\
                 top = {:?}\n\
                 left = {:?}\n\
                 width = {:?}\n\
                 height = {:?}\n\
                 locked = {}\n\
                 visible = {}\n",
                window.name, g.top, g.left, g.width, g.height, window.locked, window.visible
            ));
        }
        out
    }
}
