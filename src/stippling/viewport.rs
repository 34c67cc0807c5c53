//! Fit-to-viewport transform.
//!
//! Scales an image uniformly so it fits the drawing surface and centres it.

use crate::types::Viewport;

/// Placement of a fitted image inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitTransform {
    /// Fit an `image_width` x `image_height` image into `viewport`.
    ///
    /// Landscape images (aspect > 1) fill the viewport width, everything else
    /// fills the height. Aspect ratio is preserved either way.
    pub fn fit(image_width: u32, image_height: u32, viewport: Viewport) -> Self {
        let aspect = f64::from(image_width) / f64::from(image_height);
        let vw = f64::from(viewport.width);
        let vh = f64::from(viewport.height);

        let (draw_width, draw_height) = if aspect > 1.0 {
            (vw, vw / aspect)
        } else {
            (vh * aspect, vh)
        };

        Self {
            draw_width,
            draw_height,
            offset_x: (vw - draw_width) / 2.0,
            offset_y: (vh - draw_height) / 2.0,
        }
    }

    /// Draw size rounded up to whole pixels, at least 1x1. A partial last row
    /// or column still gets a pixel so it can be sampled.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.draw_width.ceil().max(1.0) as u32;
        let h = self.draw_height.ceil().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_square_into_square() {
        let fit = FitTransform::fit(10, 10, Viewport::new(10, 10));
        assert_eq!(fit.draw_width, 10.0);
        assert_eq!(fit.draw_height, 10.0);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn test_landscape_fits_width() {
        let fit = FitTransform::fit(200, 100, Viewport::new(400, 400));
        assert_eq!(fit.draw_width, 400.0);
        assert_eq!(fit.draw_height, 200.0);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 100.0);
    }

    #[test]
    fn test_portrait_fits_height() {
        let fit = FitTransform::fit(100, 200, Viewport::new(400, 300));
        assert_eq!(fit.draw_height, 300.0);
        assert_eq!(fit.draw_width, 150.0);
        assert_eq!(fit.offset_x, 125.0);
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn test_square_image_uses_height_even_when_viewport_is_wide() {
        let fit = FitTransform::fit(50, 50, Viewport::new(300, 100));
        assert_eq!(fit.draw_width, 100.0);
        assert_eq!(fit.draw_height, 100.0);
        assert_eq!(fit.offset_x, 100.0);
    }

    #[test]
    fn test_aspect_and_centering_hold_across_sizes() {
        let sizes = [(1, 1), (3, 7), (640, 480), (17, 1000), (1920, 1080)];
        let viewports = [Viewport::new(1, 1), Viewport::new(333, 777), Viewport::new(800, 600)];

        for &(w, h) in &sizes {
            for &vp in &viewports {
                let fit = FitTransform::fit(w, h, vp);
                let aspect = f64::from(w) / f64::from(h);
                assert!((fit.draw_width / fit.draw_height - aspect).abs() < 1e-6 * aspect.max(1.0));
                assert!((fit.offset_x - (f64::from(vp.width) - fit.draw_width) / 2.0).abs() < EPS);
                assert!((fit.offset_y - (f64::from(vp.height) - fit.draw_height) / 2.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_pixel_size_never_zero() {
        let fit = FitTransform::fit(1000, 1, Viewport::new(10, 10));
        assert_eq!(fit.pixel_size(), (10, 1));
    }

    #[test]
    fn test_pixel_size_keeps_partial_row() {
        let fit = FitTransform::fit(3, 1, Viewport::new(301, 301));
        assert!((fit.draw_height - 100.333).abs() < 1e-3);
        assert_eq!(fit.pixel_size(), (301, 101));
    }
}
