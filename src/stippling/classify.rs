//! Grayscale classification of a single pixel.

/// Signal for a pixel brighter than the threshold.
pub const ABOVE: u8 = 255;

/// Signal for a pixel at or below the threshold.
pub const BELOW: u8 = 0;

/// ITU-R BT.601 luminance: `0.299*R + 0.587*G + 0.114*B`.
pub fn luminance(r: i32, g: i32, b: i32) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Classify a pixel against `threshold`, returning [`ABOVE`] or [`BELOW`].
///
/// Total over all integers: values outside `0..=255` are not validated and
/// simply flow through the luminance formula.
pub fn classify(threshold: i32, r: i32, g: i32, b: i32) -> u8 {
    if luminance(r, g, b) > f64::from(threshold) {
        ABOVE
    } else {
        BELOW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_is_below() {
        assert_eq!(classify(128, 0, 0, 0), BELOW);
    }

    #[test]
    fn test_white_is_above() {
        assert_eq!(classify(128, 255, 255, 255), ABOVE);
    }

    #[test]
    fn test_equal_to_threshold_is_below() {
        // 0.299*100 + 0.587*100 + 0.114*100 == 100 (within float error)
        assert_eq!(classify(101, 100, 100, 100), BELOW);
        assert_eq!(classify(99, 100, 100, 100), ABOVE);
    }

    #[test]
    fn test_green_weighs_most() {
        // Pure green luminance ~149.7, pure red ~76.2, pure blue ~29.1
        assert_eq!(classify(128, 0, 255, 0), ABOVE);
        assert_eq!(classify(128, 255, 0, 0), BELOW);
        assert_eq!(classify(128, 0, 0, 255), BELOW);
    }

    #[test]
    fn test_out_of_range_inputs_are_accepted() {
        assert_eq!(classify(-10, 0, 0, 0), ABOVE);
        assert_eq!(classify(10_000, 1000, 1000, 1000), BELOW);
        assert_eq!(classify(0, -5, -5, -5), BELOW);
    }

    #[test]
    fn test_exhaustive_sweep_matches_formula() {
        for threshold in (0..=255).step_by(17) {
            for r in (0..=255).step_by(51) {
                for g in (0..=255).step_by(51) {
                    for b in (0..=255).step_by(51) {
                        let out = classify(threshold, r, g, b);
                        assert!(out == ABOVE || out == BELOW);
                        let expected = luminance(r, g, b) > f64::from(threshold);
                        assert_eq!(out == ABOVE, expected);
                    }
                }
            }
        }
    }
}
