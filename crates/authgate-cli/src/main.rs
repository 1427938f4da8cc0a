//! AuthGate CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod menu;
mod output;

use authgate_client::{DEFAULT_SERVER_URL, SessionDriver};

/// AuthGate interactive client
#[derive(Debug, Parser)]
#[command(name = "authgate-cli", version, about, long_about = None)]
struct Cli {
    /// Base URL of the AuthGate server
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    server: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut session = SessionDriver::new(&cli.server)?;

    output::print_kv("Server", session.base_url().as_str());
    menu::run(&mut session).await
}
