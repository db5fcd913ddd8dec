use clap::Parser;
use storefront_checkout::cli::commands::{cmd_checkout, cmd_featured, cmd_templates, cmd_validate};
use storefront_checkout::cli::config::{Cli, Commands, load_config, resolve_endpoint};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Resolve endpoint: CLI > config > default
    let endpoint = resolve_endpoint(cli.endpoint.as_deref(), &config);

    match cli.command {
        Commands::Checkout { order, format } => {
            let all_advanced = cmd_checkout(&order, &format, &endpoint, &config)?;
            if !all_advanced {
                std::process::exit(1);
            }
        }
        Commands::Validate { order } => {
            if !cmd_validate(&order)? {
                std::process::exit(1);
            }
        }
        Commands::Featured => cmd_featured(&endpoint, &config)?,
        Commands::Templates => cmd_templates()?,
    }

    Ok(())
}

/// RUST_LOG wins; otherwise -v raises the level from warn.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
