//! Frontdesk CLI entry point.

use clap::Parser;
use frontdesk_cli::{init_logging, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli);

    run(cli).await
}
