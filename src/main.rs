use clap::Parser;
use miette::Result;
use stipple::cli::{Cli, Commands};
use stipple::output::{init_logging, Printer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => stipple::cli::render::run(args, &printer)?,
        Commands::Init(args) => stipple::cli::init::run(args, &printer)?,
        Commands::Completions(args) => stipple::cli::completions::run(args)?,
    }

    Ok(())
}
