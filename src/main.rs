use anyhow::Result;
use clap::Parser;
use godot_asset_library_client::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may live in a local .env file.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
