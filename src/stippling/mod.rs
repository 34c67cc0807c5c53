//! Stippling core.
//!
//! Decoding, the fit-to-viewport transform, the grayscale classifier and the
//! band engine that turns fitted pixels into jittered points.

mod bitmap;
mod classify;
mod engine;
mod viewport;

pub use bitmap::Bitmap;
pub use classify::{classify, luminance, ABOVE, BELOW};
pub use engine::{
    accepts, format_coordinate, jitter, Chunk, StippleJob, StipplePoint, BAND_ROWS, DOT_RADIUS,
    INK_CUTOFF,
};
pub use viewport::FitTransform;
