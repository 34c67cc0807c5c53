//! Core domain types for stipple.
//!
//! - `Colour` - RGBA colour values for ink and background
//! - `RenderConfig` - validated per-run parameters
//! - `Viewport` - drawing surface extent

mod colour;
mod config;

pub use colour::Colour;
pub use config::{
    RenderConfig, RenderConfigBuilder, Viewport, MAX_THRESHOLD, MIN_THRESHOLD, SCALE_RANGE,
    SPACING_RANGE,
};
