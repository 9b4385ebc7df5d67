// Floating overlay panels: geometry, interaction handles, and the window controller.

pub mod config;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod script;
pub mod stage;
pub mod window;
