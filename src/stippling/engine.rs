//! Band-by-band stippling.
//!
//! A [`StippleJob`] owns the fitted pixels for one run and turns each
//! horizontal band of the sampling grid into a [`Chunk`] of jittered points,
//! drawing them onto a [`Surface`] as it goes.

use std::f64::consts::TAU;
use std::ops::Range;

use image::RgbaImage;
use rand::Rng;

use crate::render::Surface;
use crate::types::{Colour, RenderConfig};

use super::bitmap::Bitmap;
use super::classify::classify;
use super::viewport::FitTransform;

/// Fitted-pixel rows per band.
pub const BAND_ROWS: u32 = 100;

/// Classified values above this are treated as paper, not ink.
pub const INK_CUTOFF: u8 = 240;

/// Radius of a drawn dot, in surface pixels.
pub const DOT_RADIUS: f64 = 2.0;

/// Accept rule applied on top of the classifier.
///
/// Paper samples (above [`INK_CUTOFF`]) are dropped unless `inverted`, which
/// keeps every sample and lets the background carry the image.
pub fn accepts(gray: u8, inverted: bool) -> bool {
    let paper = gray > INK_CUTOFF;
    !(paper && !inverted) && (!paper || inverted)
}

/// Format one export coordinate: two decimals, comma separator.
pub fn format_coordinate(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

/// Random offset within a disc of radius `max_radius`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, max_radius: f64) -> (f64, f64) {
    let angle = rng.gen_range(0.0..TAU);
    let radius = rng.gen_range(0.0..=max_radius);
    (radius * angle.cos(), radius * angle.sin())
}

/// One accepted grid sample after jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StipplePoint {
    /// Grid column, in fitted-image pixels.
    pub grid_x: u32,
    /// Grid row, in fitted-image pixels.
    pub grid_y: u32,
    /// Surface position (origin top-left).
    pub draw_x: f64,
    pub draw_y: f64,
    /// Export position (origin bottom-left, divided by the scale factor).
    pub export_x: f64,
    pub export_y: f64,
}

impl StipplePoint {
    /// The exported text line, e.g. `"12,50 40,00"`.
    pub fn export_line(&self) -> String {
        format!(
            "{} {}",
            format_coordinate(self.export_x),
            format_coordinate(self.export_y)
        )
    }
}

/// The points produced by one band, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub band: u32,
    pub points: Vec<StipplePoint>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Export lines joined by newlines, with a trailing newline.
    ///
    /// An empty band is a lone `"\n"`.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 12 + 1);
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&point.export_line());
        }
        out.push('\n');
        out
    }
}

/// Everything needed to process the bands of one run.
#[derive(Debug, Clone)]
pub struct StippleJob {
    config: RenderConfig,
    fit: FitTransform,
    fitted: RgbaImage,
    total_bands: u32,
}

impl StippleJob {
    /// Fit `bitmap` into the configured viewport and prepare the grid.
    pub fn new(bitmap: &Bitmap, config: RenderConfig) -> Self {
        let fit = FitTransform::fit(bitmap.width(), bitmap.height(), config.viewport());
        let (width, height) = fit.pixel_size();
        let fitted = bitmap.resized(width, height);
        let total_bands = ((fit.draw_height / f64::from(BAND_ROWS)).ceil() as u32).max(1);

        Self {
            config,
            fit,
            fitted,
            total_bands,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn fit(&self) -> FitTransform {
        self.fit
    }

    /// Size of the resampled image the grid walks over.
    pub fn fitted_size(&self) -> (u32, u32) {
        self.fitted.dimensions()
    }

    pub fn total_bands(&self) -> u32 {
        self.total_bands
    }

    /// Fitted-pixel rows owned by `band`.
    pub fn band_rows(&self, band: u32) -> Range<u32> {
        let start = band.saturating_mul(BAND_ROWS).min(self.fitted.height());
        let end = start.saturating_add(BAND_ROWS).min(self.fitted.height());
        start..end
    }

    /// Grid rows inside `band`. The lattice is global, so it never restarts at
    /// a band boundary.
    pub fn grid_rows(&self, band: u32) -> impl Iterator<Item = u32> {
        let rows = self.band_rows(band);
        let spacing = self.config.spacing();
        let first = rows.start.div_ceil(spacing) * spacing;
        (first..rows.end).step_by(spacing as usize)
    }

    /// Grid columns across the fitted width.
    pub fn grid_columns(&self) -> impl Iterator<Item = u32> {
        (0..self.fitted.width()).step_by(self.config.spacing() as usize)
    }

    /// Whether the grid sample at (`x`, `y`) receives a dot.
    pub fn is_accepted(&self, x: u32, y: u32) -> bool {
        let [r, g, b, _] = self.fitted.get_pixel(x, y).0;
        let gray = classify(
            self.config.threshold() as i32,
            i32::from(r),
            i32::from(g),
            i32::from(b),
        );
        accepts(gray, self.config.inverted())
    }

    /// Accepted grid samples in `band`, before jitter.
    pub fn accepted_samples(&self, band: u32) -> Vec<(u32, u32)> {
        let mut samples = Vec::new();
        for y in self.grid_rows(band) {
            for x in self.grid_columns() {
                if self.is_accepted(x, y) {
                    samples.push((x, y));
                }
            }
        }
        samples
    }

    /// Jitter a grid sample and compute its draw and export positions.
    pub fn place<R: Rng + ?Sized>(&self, x: u32, y: u32, rng: &mut R) -> StipplePoint {
        let (dx, dy) = jitter(rng, f64::from(self.config.spacing()) / 2.0);
        let draw_x = self.fit.offset_x + f64::from(x) + dx;
        let draw_y = self.fit.offset_y + f64::from(y) + dy;
        let scale = self.config.scale_factor();
        let viewport_height = f64::from(self.config.viewport().height);

        StipplePoint {
            grid_x: x,
            grid_y: y,
            draw_x,
            draw_y,
            export_x: draw_x / scale,
            export_y: (viewport_height - draw_y) / scale,
        }
    }

    /// Sample, draw and format every grid point in `band`.
    ///
    /// Bands past the end produce an empty chunk and draw nothing.
    pub fn process_band<R, S>(&self, band: u32, rng: &mut R, surface: &mut S, ink: Colour) -> Chunk
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        let mut points = Vec::new();
        for (x, y) in self.accepted_samples(band) {
            let point = self.place(x, y, rng);
            surface.fill_circle(point.draw_x, point.draw_y, DOT_RADIUS, ink);
            points.push(point);
        }
        Chunk { band, points }
    }
}
