//! Rendering module for stipple.
//!
//! Drawing surfaces and the colours used to paint them.

mod canvas;

pub use canvas::{Canvas, Surface};

use crate::types::Colour;

/// Colours used when painting a run.
///
/// The dot colour never changes with inversion; only the background does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub ink: Colour,
    pub background: Colour,
    pub inverted_background: Colour,
}

impl Style {
    /// Background for a run with the given polarity.
    pub fn background_for(&self, inverted: bool) -> Colour {
        if inverted {
            self.inverted_background
        } else {
            self.background
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            ink: Colour::BLACK,
            background: Colour::WHITE,
            inverted_background: Colour::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_follows_inversion() {
        let style = Style::default();
        assert_eq!(style.background_for(false), Colour::WHITE);
        assert_eq!(style.background_for(true), Colour::BLACK);
        assert_eq!(style.ink, Colour::BLACK);
    }
}
