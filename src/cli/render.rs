//! Render command implementation.
//!
//! Stipples one image, writes the finished canvas as a PNG and optionally
//! exports the point list.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Manifest;
use crate::error::{Result, StippleError};
use crate::host::FileHost;
use crate::output::{display_path, plural, Printer};
use crate::render::Canvas;
use crate::session::{RunSummary, Session};
use crate::stippling::Bitmap;
use crate::types::{RenderConfig, Viewport};

/// Stipple an image into a dot pattern
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Image to stipple
    #[arg(required = true)]
    pub image: PathBuf,

    /// Pixel step between grid samples (2-30)
    #[arg(long, short)]
    pub spacing: Option<u32>,

    /// Luminance threshold (values above 255 are clamped)
    #[arg(long, short)]
    pub threshold: Option<u32>,

    /// Keep light samples instead of dark ones
    #[arg(long)]
    pub invert: bool,

    /// Divisor for exported coordinates (1-100)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Drawing surface size as WIDTHxHEIGHT (default: image size)
    #[arg(long)]
    pub viewport: Option<Viewport>,

    /// Pixels reserved around an explicit viewport
    #[arg(long)]
    pub margin: Option<u32>,

    /// Output directory for the rendered PNG
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Export point coordinates to this file
    #[arg(long)]
    pub points: Option<PathBuf>,

    /// Also write a PNG snapshot after every band
    #[arg(long)]
    pub frames: bool,

    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read defaults from this file instead of ./stipple.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a JSON run summary to stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RenderArgs, printer: &Printer) -> Result<()> {
    let json = args.json;
    let summary = render(&args, printer)?;

    if json {
        println!("{}", summary_json(&summary)?);
    }

    Ok(())
}

/// Run the full pipeline and return what it produced.
pub fn render(args: &RenderArgs, printer: &Printer) -> Result<RunSummary> {
    let cwd = std::env::current_dir()?;
    let manifest = Manifest::discover(args.config.as_deref(), &cwd)?;

    let bitmap = Bitmap::open(&args.image)?;
    let config = resolve_config(args, &manifest, &bitmap)?;
    let viewport = config.viewport();

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| manifest.effective_output());
    ensure_dir(&output_dir)?;

    let stem = args
        .image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();
    let png_path = output_dir.join(format!("{}.stipple.png", stem));
    let frames_dir = output_dir.join(format!("{}-frames", stem));
    if args.frames {
        ensure_dir(&frames_dir)?;
    }

    printer.status(
        "Stippling",
        &format!(
            "{} ({}x{} into {})",
            display_path(&args.image),
            bitmap.width(),
            bitmap.height(),
            viewport
        ),
    );

    let host = args
        .points
        .as_ref()
        .map(FileHost::with_save_path)
        .unwrap_or_default();
    let mut session = Session::new(Canvas::new(viewport), host, config).with_style(manifest.style());
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    session.load_image(bitmap);
    if let Some(path) = session.save()? {
        printer.info("Exporting", &display_path(&path));
    }

    let summary = session
        .run_until_idle(|report, canvas| {
            if args.frames {
                let frame = frames_dir.join(format!("band-{:03}.png", report.band));
                canvas.write_png(&frame)?;
            }
            Ok(())
        })?
        .ok_or_else(|| StippleError::Validation {
            message: "Nothing was rendered".to_string(),
            help: None,
        })?;

    session.surface().write_png(&png_path)?;

    printer.status(
        "Finished",
        &format!(
            "{} in {} -> {}",
            plural(summary.points, "point", "points"),
            plural(summary.bands as usize, "band", "bands"),
            printer.cyan(&display_path(&png_path))
        ),
    );

    Ok(summary)
}

/// Merge CLI flags over manifest values over built-in defaults.
fn resolve_config(args: &RenderArgs, manifest: &Manifest, bitmap: &Bitmap) -> Result<RenderConfig> {
    let margin = args.margin.or(manifest.viewport_margin).unwrap_or(0);
    let viewport = args
        .viewport
        .or(manifest.viewport)
        .map(|v| v.without_margin(margin))
        .unwrap_or_else(|| Viewport::new(bitmap.width(), bitmap.height()));

    RenderConfig::builder(viewport)
        .spacing(
            args.spacing
                .or(manifest.spacing)
                .unwrap_or(RenderConfig::DEFAULT_SPACING),
        )
        .threshold(
            args.threshold
                .or(manifest.threshold)
                .unwrap_or(RenderConfig::DEFAULT_THRESHOLD),
        )
        .inverted(args.invert || manifest.inverted.unwrap_or(false))
        .scale_factor(
            args.scale
                .or(manifest.scale)
                .unwrap_or(RenderConfig::DEFAULT_SCALE),
        )
        .build()
}

/// Pretty JSON for `--json`.
pub fn summary_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(|e| StippleError::Parse {
        message: format!("Failed to serialize summary: {}", e),
        help: None,
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| StippleError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_image(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
            .save(path)
            .unwrap();
    }

    fn args(dir: &Path, image: PathBuf) -> RenderArgs {
        RenderArgs {
            image,
            output: Some(dir.join("out")),
            seed: Some(1),
            // Point at a file that exists so the cwd's stipple.yaml is ignored
            config: Some(write_empty_manifest(dir)),
            ..Default::default()
        }
    }

    fn write_empty_manifest(dir: &Path) -> PathBuf {
        let path = dir.join("empty.yaml");
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_render_black_square_with_export() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("black.png");
        write_image(&image, 10, 10, [0, 0, 0, 255]);

        let points = dir.path().join("points.txt");
        let mut args = args(dir.path(), image);
        args.spacing = Some(10);
        args.points = Some(points.clone());

        let summary = render(&args, &Printer::new()).unwrap();
        assert_eq!(summary.points, 1);
        assert_eq!(summary.bands, 1);
        assert_eq!(summary.export, Some(points.clone()));

        let text = fs::read_to_string(&points).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(text.ends_with('\n'));

        let coords: Vec<f64> = lines[0]
            .split(' ')
            .map(|v| v.replace(',', ".").parse().unwrap())
            .collect();
        assert!(coords[0].abs() <= 5.0);
        assert!((coords[1] - 10.0).abs() <= 5.0);

        assert!(dir.path().join("out").join("black.stipple.png").exists());
    }

    #[test]
    fn test_render_white_square_exports_single_newline() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("white.png");
        write_image(&image, 10, 10, [255, 255, 255, 255]);

        let points = dir.path().join("points.txt");
        let mut args = args(dir.path(), image);
        args.spacing = Some(10);
        args.points = Some(points.clone());

        let summary = render(&args, &Printer::new()).unwrap();
        assert_eq!(summary.points, 0);
        assert_eq!(fs::read_to_string(&points).unwrap(), "\n");
    }

    #[test]
    fn test_render_writes_frames() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("tall.png");
        write_image(&image, 20, 250, [0, 0, 0, 255]);

        let mut args = args(dir.path(), image);
        args.frames = true;

        let summary = render(&args, &Printer::new()).unwrap();
        assert_eq!(summary.bands, 3);

        let frames = dir.path().join("out").join("tall-frames");
        for band in 0..3 {
            assert!(frames.join(format!("band-{:03}.png", band)).exists());
        }
    }

    #[test]
    fn test_render_undecodable_image() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("broken.png");
        fs::write(&image, b"not an image").unwrap();

        let err = render(&args(dir.path(), image), &Printer::new()).unwrap_err();
        assert!(matches!(err, StippleError::Decode { .. }));
    }

    #[test]
    fn test_render_rejects_bad_spacing() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("img.png");
        write_image(&image, 4, 4, [0, 0, 0, 255]);

        let mut args = args(dir.path(), image);
        args.spacing = Some(1);

        let err = render(&args, &Printer::new()).unwrap_err();
        assert!(matches!(err, StippleError::Validation { .. }));
    }

    #[test]
    fn test_cli_flags_override_manifest() {
        let bitmap = Bitmap::from_rgba(RgbaImage::new(100, 50));
        let manifest = Manifest::parse(
            "spacing: 8\nthreshold: 40\nviewport: 300x200\nviewport_margin: 20\nscale: 2",
        )
        .unwrap();

        let args = RenderArgs {
            spacing: Some(12),
            ..Default::default()
        };
        let config = resolve_config(&args, &manifest, &bitmap).unwrap();

        assert_eq!(config.spacing(), 12);
        assert_eq!(config.threshold(), 40);
        assert_eq!(config.scale_factor(), 2.0);
        assert_eq!(config.viewport(), Viewport::new(280, 180));
    }

    #[test]
    fn test_viewport_defaults_to_image_size() {
        let bitmap = Bitmap::from_rgba(RgbaImage::new(64, 48));
        let config =
            resolve_config(&RenderArgs::default(), &Manifest::default(), &bitmap).unwrap();
        assert_eq!(config.viewport(), Viewport::new(64, 48));
        assert_eq!(config.spacing(), RenderConfig::DEFAULT_SPACING);
    }

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            generation: 1,
            bands: 1,
            points: 1,
            fitted_width: 10,
            fitted_height: 10,
            export: None,
        };

        insta::assert_snapshot!(summary_json(&summary).unwrap(), @r###"
        {
          "generation": 1,
          "bands": 1,
          "points": 1,
          "fitted_width": 10,
          "fitted_height": 10,
          "export": null
        }
        "###);
    }
}
