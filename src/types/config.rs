//! Render parameters.
//!
//! A `RenderConfig` is immutable for the lifetime of a run. Any change goes
//! through [`RenderConfigBuilder`] (or the session setters) and starts a new run.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StippleError};

/// Allowed grid spacing, in fitted-image pixels.
pub const SPACING_RANGE: RangeInclusive<u32> = 2..=30;

/// Lowest accepted luminance threshold.
pub const MIN_THRESHOLD: u32 = 2;

/// Thresholds above this are clamped.
pub const MAX_THRESHOLD: u32 = 255;

/// Allowed export scale divisor.
pub const SCALE_RANGE: RangeInclusive<f64> = 1.0..=100.0;

/// Drawing surface extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Shrink both axes by a reserved margin, never below 1.
    pub fn without_margin(self, margin: u32) -> Self {
        Self {
            width: self.width.saturating_sub(margin).max(1),
            height: self.height.saturating_sub(margin).max(1),
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Viewport {
    type Err = StippleError;

    /// Parse `WIDTHxHEIGHT`, e.g. `800x600`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StippleError::Parse {
            message: format!("Invalid viewport '{}'", s),
            help: Some("Use WIDTHxHEIGHT, e.g. 800x600".to_string()),
        };

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(StippleError::Validation {
                message: format!("Viewport must be at least 1x1, got {}x{}", width, height),
                help: None,
            });
        }

        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Viewport {
    type Error = StippleError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Viewport> for String {
    fn from(viewport: Viewport) -> Self {
        viewport.to_string()
    }
}

/// Parameters for one stippling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    spacing: u32,
    threshold: u32,
    inverted: bool,
    scale_factor: f64,
    viewport: Viewport,
}

impl RenderConfig {
    pub const DEFAULT_SPACING: u32 = 5;
    pub const DEFAULT_THRESHOLD: u32 = 128;
    pub const DEFAULT_SCALE: f64 = 1.0;

    /// Start building a config for the given viewport.
    pub fn builder(viewport: Viewport) -> RenderConfigBuilder {
        RenderConfigBuilder::new(viewport)
    }

    /// Pixel step between grid samples.
    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    /// Luminance cutoff handed to the classifier.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether accept/reject polarity is flipped.
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Divisor applied to exported coordinates.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Reopen this config for editing.
    pub fn to_builder(self) -> RenderConfigBuilder {
        RenderConfigBuilder {
            spacing: self.spacing,
            threshold: self.threshold,
            inverted: self.inverted,
            scale_factor: self.scale_factor,
            viewport: self.viewport,
        }
    }
}

/// Builder that validates parameters before producing a [`RenderConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RenderConfigBuilder {
    spacing: u32,
    threshold: u32,
    inverted: bool,
    scale_factor: f64,
    viewport: Viewport,
}

impl RenderConfigBuilder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            spacing: RenderConfig::DEFAULT_SPACING,
            threshold: RenderConfig::DEFAULT_THRESHOLD,
            inverted: false,
            scale_factor: RenderConfig::DEFAULT_SCALE,
            viewport,
        }
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Validate and build.
    ///
    /// Thresholds above [`MAX_THRESHOLD`] are clamped rather than rejected;
    /// every other out-of-range value is a validation error.
    pub fn build(self) -> Result<RenderConfig> {
        if !SPACING_RANGE.contains(&self.spacing) {
            return Err(StippleError::Validation {
                message: format!(
                    "Spacing must be between {} and {}, got {}",
                    SPACING_RANGE.start(),
                    SPACING_RANGE.end(),
                    self.spacing
                ),
                help: Some("Smaller spacing gives denser stippling".to_string()),
            });
        }

        if self.threshold < MIN_THRESHOLD {
            return Err(StippleError::Validation {
                message: format!(
                    "Threshold must be at least {}, got {}",
                    MIN_THRESHOLD, self.threshold
                ),
                help: None,
            });
        }

        let threshold = if self.threshold > MAX_THRESHOLD {
            log::warn!(
                "threshold {} is above {}, clamping",
                self.threshold,
                MAX_THRESHOLD
            );
            MAX_THRESHOLD
        } else {
            self.threshold
        };

        if !SCALE_RANGE.contains(&self.scale_factor) {
            return Err(StippleError::Validation {
                message: format!(
                    "Scale factor must be between {} and {}, got {}",
                    SCALE_RANGE.start(),
                    SCALE_RANGE.end(),
                    self.scale_factor
                ),
                help: Some("Exported coordinates are divided by the scale factor".to_string()),
            });
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(StippleError::Validation {
                message: format!("Viewport must be at least 1x1, got {}", self.viewport),
                help: None,
            });
        }

        Ok(RenderConfig {
            spacing: self.spacing,
            threshold,
            inverted: self.inverted,
            scale_factor: self.scale_factor,
            viewport: self.viewport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(100, 80)
    }

    #[test]
    fn test_defaults() {
        let config = RenderConfig::builder(viewport()).build().unwrap();
        assert_eq!(config.spacing(), 5);
        assert_eq!(config.threshold(), 128);
        assert!(!config.inverted());
        assert_eq!(config.scale_factor(), 1.0);
        assert_eq!(config.viewport(), viewport());
    }

    #[test]
    fn test_spacing_out_of_range() {
        assert!(RenderConfig::builder(viewport()).spacing(1).build().is_err());
        assert!(RenderConfig::builder(viewport()).spacing(31).build().is_err());
        assert!(RenderConfig::builder(viewport()).spacing(30).build().is_ok());
    }

    #[test]
    fn test_threshold_clamped_above_255() {
        let config = RenderConfig::builder(viewport())
            .threshold(1000)
            .build()
            .unwrap();
        assert_eq!(config.threshold(), 255);
    }

    #[test]
    fn test_threshold_below_minimum_rejected() {
        assert!(RenderConfig::builder(viewport()).threshold(1).build().is_err());
    }

    #[test]
    fn test_scale_out_of_range() {
        assert!(RenderConfig::builder(viewport())
            .scale_factor(0.5)
            .build()
            .is_err());
        assert!(RenderConfig::builder(viewport())
            .scale_factor(f64::NAN)
            .build()
            .is_err());
        assert!(RenderConfig::builder(viewport())
            .scale_factor(100.0)
            .build()
            .is_ok());
    }

    #[test]
    fn test_to_builder_preserves_values() {
        let config = RenderConfig::builder(viewport())
            .spacing(7)
            .inverted(true)
            .build()
            .unwrap();
        let rebuilt = config.to_builder().threshold(200).build().unwrap();
        assert_eq!(rebuilt.spacing(), 7);
        assert!(rebuilt.inverted());
        assert_eq!(rebuilt.threshold(), 200);
    }

    #[test]
    fn test_viewport_parse() {
        assert_eq!("800x600".parse::<Viewport>().unwrap(), Viewport::new(800, 600));
        assert_eq!("10X20".parse::<Viewport>().unwrap(), Viewport::new(10, 20));
        assert!("800".parse::<Viewport>().is_err());
        assert!("0x10".parse::<Viewport>().is_err());
        assert!("axb".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_viewport_without_margin() {
        assert_eq!(Viewport::new(100, 50).without_margin(20), Viewport::new(80, 30));
        assert_eq!(Viewport::new(10, 10).without_margin(40), Viewport::new(1, 1));
    }
}
