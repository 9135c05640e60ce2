//! Code Companion server binary.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use codecompanion::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "codecompanion", version, about = "AI code companion backend")]
struct Cli {
    /// Path to a TOML config file (defaults to codecompanion.toml if present)
    #[arg(short, long, env = "CODECOMPANION_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,

    /// Override the AI provider (mock, gemini, watsonx)
    #[arg(long)]
    provider: Option<String>,

    /// Write a default codecompanion.toml and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "codecompanion=debug,tower_http=debug"
    } else if cli.quiet {
        "warn"
    } else {
        "codecompanion=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if cli.init_config {
        let path = cli
            .config
            .unwrap_or_else(|| PathBuf::from("codecompanion.toml"));
        ConfigLoader::write_default(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(provider) = cli.provider {
        config.provider.provider = provider;
        config.validate()?;
    }

    codecompanion::server::serve(config).await?;
    Ok(())
}
