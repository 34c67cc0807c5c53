pub mod completions;
pub mod init;
pub mod render;

use clap::{ArgAction, Parser, Subcommand};

/// stipple - Turn raster images into stippled point patterns
#[derive(Parser, Debug)]
#[command(name = "stipple")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug-level log output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stipple an image, writing a PNG and optionally a point list
    Render(render::RenderArgs),

    /// Write a stipple.yaml with default parameters
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
