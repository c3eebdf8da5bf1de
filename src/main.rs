mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::context::Context;
use cli::{Cli, Commands};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "ACS_LOG";

fn main() {
    let args = Cli::parse();
    init_tracing(&args);
    cli::output::set_quiet(args.quiet);

    if let Err(e) = run(&args) {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> core::errors::Result<()> {
    match &args.command {
        Commands::Validate { root } => cli::commands::validate::execute(root),
        Commands::Build {
            root,
            output,
            template,
        } => {
            let ctx = Context::load(args)?;
            cli::commands::build::execute(&ctx, root, output, template.as_deref())
        }
        Commands::Sync { root } => {
            let ctx = Context::load(args)?;
            cli::commands::sync::execute(&ctx, root)
        }
        Commands::Deploy { root } => {
            let ctx = Context::load(args)?;
            cli::commands::deploy::execute(&ctx, root.as_deref())
        }
    }
}

/// Diagnostics go to stderr; `ACS_LOG` overrides the flag-derived level.
fn init_tracing(args: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = match (args.verbose, args.quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(args.verbose),
        )
        .init();
}
