//! Init command implementation.
//!
//! Writes a commented `stipple.yaml` with the built-in defaults.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{MANIFEST_FILENAME, MANIFEST_TEMPLATE};
use crate::error::{Result, StippleError};
use crate::output::{display_path, Printer};

/// Write a stipple.yaml with default parameters
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing stipple.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(StippleError::Validation {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&manifest_path, MANIFEST_TEMPLATE).map_err(|e| StippleError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.status("Created", &display_path(&manifest_path));

    Ok(())
}
