use clap::Parser;
use miette::Result;
use squiggle::cli::{Cli, Commands};
use squiggle::output::Printer;
use tracing_subscriber::EnvFilter;

/// Log filter used when `SQUIGGLE_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("SQUIGGLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => squiggle::cli::render::run(args, &printer)?,
        Commands::Watch(args) => squiggle::cli::watch::run(args, &printer)?,
        Commands::Inspect(args) => squiggle::cli::inspect::run(args, &printer)?,
        Commands::Init(args) => squiggle::cli::init::run(args, &printer)?,
        Commands::Completions(args) => squiggle::cli::completions::run(args)?,
    }

    Ok(())
}
