use anyhow::Result;
use autofactory::cli::{parse_args, Commands};
use autofactory::commands::{self, GenerateConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Generate { config, force } => commands::handle_generate(GenerateConfig {
            source: config.into(),
            force,
        }),
        Commands::Resolve { type_name, config } => {
            if !commands::handle_resolve(&config.into(), &type_name)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Index { config } => commands::handle_index(&config.into()),
        Commands::Init { force } => commands::init_config(force),
    }
}

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "autofactory=info",
        1 => "autofactory=debug",
        _ => "autofactory=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
