//! stipple - Image to stippled point pattern generator
//!
//! A library for sampling a raster image on a jittered grid, drawing the
//! accepted samples as dots band by band, and exporting their coordinates.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod output;
pub mod render;
pub mod session;
pub mod stippling;
pub mod types;

pub use config::Manifest;
pub use error::{Result, StippleError};
pub use host::{FileHost, Host};
pub use render::{Canvas, Style, Surface};
pub use session::{BandReport, RunSummary, Session, SessionState, TickOutcome};
pub use stippling::{classify, Bitmap, Chunk, FitTransform, StippleJob, StipplePoint};
pub use types::{Colour, RenderConfig, Viewport};
