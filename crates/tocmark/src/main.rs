//! tocmark CLI - Markdown to HTML with heading anchors and a table of contents.
//!
//! Provides commands for:
//! - `render`: Render one Markdown file (or stdin) to HTML
//! - `build`: Render every Markdown file under a source directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RenderArgs};
use output::Output;

/// tocmark - Markdown rendering with anchors and a table of contents.
#[derive(Parser)]
#[command(name = "tocmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single Markdown document.
    Render(RenderArgs),
    /// Render every Markdown document in the source directory.
    Build(BuildArgs),
}

/// Log filter: `info` with `--verbose`, otherwise `RUST_LOG` or `warn`.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::INFO));

        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        assert_eq!(log_filter(false).max_level_hint(), Some(LevelFilter::WARN));
    }
}
