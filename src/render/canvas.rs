//! Raster drawing surface.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::{Result, StippleError};
use crate::types::{Colour, Viewport};

/// Something dots can be drawn on.
pub trait Surface {
    /// Whether the surface can still be drawn on. A closed surface turns
    /// runs into no-ops.
    fn is_open(&self) -> bool {
        true
    }

    /// Match the surface extent to `viewport`, discarding its contents.
    fn resize(&mut self, viewport: Viewport);

    /// Flood the whole surface with `colour`.
    fn fill(&mut self, colour: Colour);

    /// Fill a circle centred at (`cx`, `cy`).
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, colour: Colour);

    /// Blank the surface to fully transparent.
    fn clear(&mut self) {
        self.fill(Colour::new(0, 0, 0, 0));
    }
}

/// An in-memory RGBA canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a transparent canvas the size of `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            image: RgbaImage::new(viewport.width, viewport.height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Get a pixel, if in bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Colour::new(p[0], p[1], p[2], p[3]))
    }

    /// Write the canvas to a PNG file.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(|e| StippleError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
    }
}

impl Surface for Canvas {
    fn resize(&mut self, viewport: Viewport) {
        if self.image.dimensions() != (viewport.width, viewport.height) {
            self.image = RgbaImage::new(viewport.width, viewport.height);
        }
    }

    fn fill(&mut self, colour: Colour) {
        let rgba: Rgba<u8> = colour.to_pixel();
        for pixel in self.image.pixels_mut() {
            *pixel = rgba;
        }
    }

    /// Pixels whose centres fall inside the circle are painted; the rest of
    /// the circle is clipped to the canvas.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, colour: Colour) {
        if !(cx.is_finite() && cy.is_finite()) || radius <= 0.0 {
            return;
        }

        let rgba = colour.to_pixel();
        let r2 = radius * radius;
        let (w, h) = self.image.dimensions();

        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w);
        let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h);

        for y in y0..y1 {
            let dy = f64::from(y) + 0.5 - cy;
            for x in x0..x1 {
                let dx = f64::from(x) + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(x, y, rgba);
                }
            }
        }
    }
}
