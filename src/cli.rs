//! Command-line interface for godot-asset-library-client.
//!
//! All business logic lives in the library modules; this is argument parsing,
//! credential sourcing and orchestration glue. The async [`run`] entrypoint is
//! separate from `main` so integration tests can drive it programmatically.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::HttpApi;
use crate::config::Config;
use crate::error::Error;
use crate::upload::{upload, UploadOptions};

/// Publish Godot projects to the Godot Asset Library.
#[derive(Parser)]
#[clap(
    name = "godot-asset-library-client",
    version,
    about = "Upload a Godot project to the Godot Asset Library from a YAML description"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Uploads the project to the Godot Asset Library
    Upload {
        /// Path to the YAML metadata file
        yaml_metadata: PathBuf,

        /// Do the actual upload instead of a dry run
        #[clap(long = "do")]
        do_upload: bool,

        /// Send previews (disabled by default until the API accepts them)
        #[clap(long)]
        send_previews: bool,
    },
}

fn credentials() -> Result<(String, String), Error> {
    let username =
        env::var("GODOT_ASSET_LIB_USER").map_err(|_| Error::MissingCredentials("GODOT_ASSET_LIB_USER"))?;
    let password = env::var("GODOT_ASSET_LIB_PASSWORD")
        .map_err(|_| Error::MissingCredentials("GODOT_ASSET_LIB_PASSWORD"))?;
    Ok((username, password))
}

/// Async CLI entrypoint, shared by `main` and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload {
            yaml_metadata,
            do_upload,
            send_previews,
        } => {
            tracing::info!(command = "upload", config = ?yaml_metadata, "Starting upload");

            let (username, password) = credentials()?;
            let config = Config::from_file(&yaml_metadata)?;

            let mut api = HttpApi::new(None);
            api.login(&username, &password).await?;

            let options = UploadOptions {
                do_upload,
                send_previews,
            };
            match upload(&api, &config, options).await {
                Ok(_) => {
                    tracing::info!(command = "upload", "Upload flow complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "upload", error = %e, "Upload flow failed");
                    Err(e.into())
                }
            }
        }
    }
}
