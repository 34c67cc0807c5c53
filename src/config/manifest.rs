//! Project defaults (stipple.yaml) parsing.
//!
//! The manifest holds default render parameters and colours. Every field is
//! optional; command-line flags override whatever it sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StippleError};
use crate::render::Style;
use crate::types::{Colour, Viewport};

/// Manifest filename looked up in the working directory.
pub const MANIFEST_FILENAME: &str = "stipple.yaml";

/// Defaults loaded from stipple.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Grid spacing in pixels.
    pub spacing: Option<u32>,

    /// Luminance threshold.
    pub threshold: Option<u32>,

    /// Flip accept/reject polarity.
    pub inverted: Option<bool>,

    /// Divisor for exported coordinates.
    pub scale: Option<f64>,

    /// Drawing surface size, e.g. "800x600".
    pub viewport: Option<Viewport>,

    /// Pixels reserved around an explicit viewport.
    pub viewport_margin: Option<u32>,

    /// Dot colour.
    pub ink: Option<Colour>,

    /// Background when not inverted.
    pub background: Option<Colour>,

    /// Background when inverted.
    pub inverted_background: Option<Colour>,

    /// Output directory for rendered PNGs.
    pub output: Option<PathBuf>,
}

impl Manifest {
    /// Load manifest from a stipple.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StippleError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| StippleError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some(format!("Check {} syntax", MANIFEST_FILENAME)),
        })
    }

    /// Load an explicit manifest, or `stipple.yaml` from `dir` if present.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(MANIFEST_FILENAME);
        if candidate.is_file() {
            log::debug!("using {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Colours with built-in defaults filled in.
    pub fn style(&self) -> Style {
        let defaults = Style::default();
        Style {
            ink: self.ink.unwrap_or(defaults.ink),
            background: self.background.unwrap_or(defaults.background),
            inverted_background: self
                .inverted_background
                .unwrap_or(defaults.inverted_background),
        }
    }

    /// Get the effective output directory.
    pub fn effective_output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("dist"))
    }
}

/// Commented template written by `stipple init`.
pub const MANIFEST_TEMPLATE: &str = "\
# stipple defaults. Command-line flags override these.

# Pixel step between grid samples (2-30)
spacing: 5

# Luminance cutoff; values above 255 are clamped
threshold: 128

# Keep light samples instead of dark ones
inverted: false

# Exported coordinates are divided by this (1-100)
scale: 1

# Drawing surface size; defaults to the image size when omitted
# viewport: 800x600
# viewport_margin: 0

ink: \"#000000\"
background: \"#FFFFFF\"
inverted_background: \"#000000\"

output: dist
";

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("spacing: 8").unwrap();
        assert_eq!(manifest.spacing, Some(8));
        assert!(manifest.threshold.is_none());
        assert!(manifest.viewport.is_none());
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r##"
spacing: 12
threshold: 90
inverted: true
scale: 2.5
viewport: 640x480
viewport_margin: 40
ink: "#112233"
background: "#FFF"
inverted_background: "#000000"
output: out/stipples
"##;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.spacing, Some(12));
        assert_eq!(manifest.threshold, Some(90));
        assert_eq!(manifest.inverted, Some(true));
        assert_eq!(manifest.scale, Some(2.5));
        assert_eq!(manifest.viewport, Some(Viewport::new(640, 480)));
        assert_eq!(manifest.viewport_margin, Some(40));
        assert_eq!(manifest.ink, Some(Colour::rgb(0x11, 0x22, 0x33)));
        assert_eq!(manifest.background, Some(Colour::WHITE));
        assert_eq!(manifest.effective_output(), PathBuf::from("out/stipples"));
    }

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.effective_output(), PathBuf::from("dist"));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let err = Manifest::parse("spacin: 3").unwrap_err();
        assert!(matches!(err, StippleError::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_colour() {
        assert!(Manifest::parse("ink: \"#GG0000\"").is_err());
    }

    #[test]
    fn test_template_parses() {
        let manifest = Manifest::parse(MANIFEST_TEMPLATE).unwrap();
        assert_eq!(manifest.spacing, Some(5));
        assert_eq!(manifest.threshold, Some(128));
        assert_eq!(manifest.inverted, Some(false));
        assert_eq!(manifest.scale, Some(1.0));
        assert_eq!(manifest.style(), Style::default());
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempdir().unwrap();
        assert_eq!(Manifest::discover(None, dir.path()).unwrap(), Manifest::default());

        std::fs::write(dir.path().join(MANIFEST_FILENAME), "threshold: 42").unwrap();
        assert_eq!(
            Manifest::discover(None, dir.path()).unwrap().threshold,
            Some(42)
        );
    }

    #[test]
    fn test_discover_explicit_missing_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(Manifest::discover(Some(&missing), dir.path()).is_err());
    }
}
