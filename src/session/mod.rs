//! Run lifecycle.
//!
//! A [`Session`] owns the loaded image, the current [`RenderConfig`], the
//! drawing surface and the host. Every parameter change bumps the run
//! generation and schedules a fresh run from band 0; continuations queued by
//! an older generation are dropped when they come up, without drawing or
//! emitting anything.

mod scheduler;

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::Result;
use crate::host::Host;
use crate::render::{Style, Surface};
use crate::stippling::{Bitmap, StippleJob};
use crate::types::{RenderConfig, Viewport};

pub use scheduler::{FrameScheduler, ScheduledBand};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded.
    Idle,
    /// Image loaded, nothing in flight.
    Ready,
    /// Bands are being processed; `band` is the next one to run.
    Running { band: u32, total: u32 },
}

/// Progress after one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandReport {
    pub generation: u64,
    pub band: u32,
    pub total: u32,
    /// Points accepted in this band.
    pub points: usize,
}

/// Totals for a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub generation: u64,
    pub bands: u32,
    pub points: usize,
    pub fitted_width: u32,
    pub fitted_height: u32,
    pub export: Option<PathBuf>,
}

/// What a single [`Session::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing was scheduled.
    Idle,
    /// A continuation from a superseded run was discarded.
    Stale(ScheduledBand),
    /// A band ran and the next one is scheduled.
    Band(BandReport),
    /// The last band ran and the run is complete.
    Finished {
        report: BandReport,
        summary: RunSummary,
    },
}

struct ActiveRun {
    generation: u64,
    job: StippleJob,
    export: Option<PathBuf>,
    next_band: u32,
    points: usize,
}

/// Single-threaded stippling session.
pub struct Session<S: Surface, H: Host> {
    surface: S,
    host: H,
    style: Style,
    config: RenderConfig,
    image: Option<Bitmap>,
    generation: u64,
    scheduler: FrameScheduler,
    run: Option<ActiveRun>,
    rng: StdRng,
}

impl<S: Surface, H: Host> Session<S, H> {
    /// Create an idle session.
    pub fn new(surface: S, host: H, config: RenderConfig) -> Self {
        Self {
            surface,
            host,
            style: Style::default(),
            config,
            image: None,
            generation: 0,
            scheduler: FrameScheduler::new(),
            run: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a reproducible jitter sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> SessionState {
        match (&self.image, &self.run) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::Ready,
            (Some(_), Some(run)) => SessionState::Running {
                band: run.next_band,
                total: run.job.total_bands(),
            },
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Continuations waiting to run, stale ones included.
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Load a decoded image and start a preview run.
    pub fn load_image(&mut self, bitmap: Bitmap) {
        log::info!("loaded {}x{} image", bitmap.width(), bitmap.height());
        self.image = Some(bitmap);
        self.restart(None);
    }

    /// Decode and load an image file.
    ///
    /// A decode failure leaves the session exactly as it was.
    pub fn load_image_file(&mut self, path: &Path) -> Result<()> {
        let bitmap = Bitmap::open(path).inspect_err(|e| log::warn!("{}", e))?;
        self.load_image(bitmap);
        Ok(())
    }

    /// Replace the whole config.
    pub fn set_config(&mut self, config: RenderConfig) {
        if config.viewport() != self.config.viewport() {
            self.surface.resize(config.viewport());
        }
        self.config = config;
        self.restart(None);
    }

    pub fn set_spacing(&mut self, spacing: u32) -> Result<()> {
        let config = self.config.to_builder().spacing(spacing).build()?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: u32) -> Result<()> {
        let config = self.config.to_builder().threshold(threshold).build()?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<()> {
        let config = self.config.to_builder().inverted(inverted).build()?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Result<()> {
        let config = self.config.to_builder().scale_factor(scale_factor).build()?;
        self.set_config(config);
        Ok(())
    }

    /// Track a new drawing surface extent.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let config = self.config.to_builder().viewport(viewport).build()?;
        self.set_config(config);
        Ok(())
    }

    /// Ask the host for a destination and start an exporting run.
    ///
    /// Returns the chosen path, or `None` when the prompt was cancelled or
    /// there is no image to export. In both cases no file is touched.
    pub fn save(&mut self) -> Result<Option<PathBuf>> {
        if self.image.is_none() {
            log::debug!("save requested with no image loaded");
            return Ok(None);
        }

        let Some(path) = self.host.request_save_path() else {
            log::info!("save cancelled");
            return Ok(None);
        };

        self.host.clear_file(&path)?;
        self.restart(Some(path.clone()));
        Ok(Some(path))
    }

    /// Drop the image and any run, and blank the surface.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.run = None;
        self.image = None;
        self.surface.clear();
        log::debug!("session cleared (generation {})", self.generation);
    }

    /// Invalidate the current run and schedule band 0 of a new one.
    fn restart(&mut self, export: Option<PathBuf>) {
        self.generation += 1;
        self.run = None;

        let Some(bitmap) = &self.image else {
            return;
        };
        if !self.surface.is_open() {
            log::debug!("surface closed, not starting run");
            return;
        }

        let job = StippleJob::new(bitmap, self.config);
        let (width, height) = job.fitted_size();
        log::info!(
            "run {} started: {}x{} fitted, {} band(s), spacing {}, threshold {}{}",
            self.generation,
            width,
            height,
            job.total_bands(),
            self.config.spacing(),
            self.config.threshold(),
            if self.config.inverted() { ", inverted" } else { "" }
        );

        self.surface.resize(self.config.viewport());
        self.surface
            .fill(self.style.background_for(self.config.inverted()));

        self.run = Some(ActiveRun {
            generation: self.generation,
            job,
            export,
            next_band: 0,
            points: 0,
        });
        self.scheduler.schedule(ScheduledBand {
            generation: self.generation,
            band: 0,
        });
    }

    /// Run the next scheduled band.
    ///
    /// Stale continuations are discarded here. A failed export append ends
    /// the run and returns the error; the session is left `Ready`.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let Some(task) = self.scheduler.next_task() else {
            return Ok(TickOutcome::Idle);
        };

        if task.generation != self.generation {
            log::debug!(
                "dropping band {} of stale run {} (current {})",
                task.band,
                task.generation,
                self.generation
            );
            return Ok(TickOutcome::Stale(task));
        }

        if !self.surface.is_open() {
            log::debug!("surface closed, abandoning run {}", task.generation);
            self.run = None;
            return Ok(TickOutcome::Idle);
        }

        let Some(run) = self.run.as_mut().filter(|r| r.generation == task.generation) else {
            return Ok(TickOutcome::Stale(task));
        };

        let chunk = run
            .job
            .process_band(task.band, &mut self.rng, &mut self.surface, self.style.ink);
        let total = run.job.total_bands();
        run.points += chunk.len();
        run.next_band = task.band + 1;

        let report = BandReport {
            generation: task.generation,
            band: task.band,
            total,
            points: chunk.len(),
        };

        if let Some(path) = run.export.as_deref() {
            if let Err(err) = self.host.append_chunk(path, &chunk.text()) {
                log::error!("export of band {} failed: {}", task.band, err);
                self.run = None;
                return Err(err);
            }
            log::trace!("band {} appended {} line(s)", task.band, chunk.len());
        }

        if run.next_band < total {
            self.scheduler.schedule(ScheduledBand {
                generation: task.generation,
                band: run.next_band,
            });
            return Ok(TickOutcome::Band(report));
        }

        let (fitted_width, fitted_height) = run.job.fitted_size();
        let summary = RunSummary {
            generation: run.generation,
            bands: total,
            points: run.points,
            fitted_width,
            fitted_height,
            export: run.export.take(),
        };
        self.run = None;
        log::info!(
            "run {} finished: {} point(s) in {} band(s)",
            summary.generation,
            summary.points,
            summary.bands
        );

        Ok(TickOutcome::Finished { report, summary })
    }

    /// Tick until nothing is scheduled, calling `observer` after every band
    /// that actually ran. Returns the summary of the last run that finished.
    pub fn run_until_idle<F>(&mut self, mut observer: F) -> Result<Option<RunSummary>>
    where
        F: FnMut(&BandReport, &S) -> Result<()>,
    {
        let mut last = None;
        loop {
            match self.tick()? {
                TickOutcome::Idle => return Ok(last),
                TickOutcome::Stale(_) => {}
                TickOutcome::Band(report) => observer(&report, &self.surface)?,
                TickOutcome::Finished { report, summary } => {
                    observer(&report, &self.surface)?;
                    last = Some(summary);
                }
            }
        }
    }
}
