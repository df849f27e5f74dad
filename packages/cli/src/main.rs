#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for zanza.
//!
//! ```text
//! zanza resolve <ADDRESS>
//! zanza routes <ORIGIN> <DESTINATION>
//! zanza community [--neighborhoods 3] [--streets 5] [--file reviews.json] [--token TOKEN]
//! zanza serve
//! ```
//!
//! Running `zanza` with no subcommand enters interactive mode. Service
//! URLs and the city come from the `ZANZA_*` environment variables.

mod commands;
mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::Outcome;
use zanza_community::rank::{DEFAULT_NEIGHBORHOOD_COUNT, DEFAULT_STREET_COUNT};
use zanza_community::{FileReviewSource, ReviewSource, SummaryOptions};
use zanza_community_models::AuthToken;
use zanza_config::AppConfig;
use zanza_routing::SearchSession;
use zanza_server::AppState;

#[derive(Parser)]
#[command(
    name = "zanza",
    about = "Safer pedestrian routes and community safety rankings"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address to a coordinate inside the city
    Resolve {
        /// Free-text address
        address: String,
    },
    /// Find and classify routes between two addresses
    Routes {
        /// Origin address
        origin: String,
        /// Destination address
        destination: String,
    },
    /// Show the safest neighborhoods and the worst street hazards
    Community {
        /// Number of neighborhoods to show
        #[arg(long, default_value_t = DEFAULT_NEIGHBORHOOD_COUNT)]
        neighborhoods: usize,
        /// Number of street hazards to show
        #[arg(long, default_value_t = DEFAULT_STREET_COUNT)]
        streets: usize,
        /// Read reviews from a local JSON file instead of the backend
        #[arg(long)]
        file: Option<PathBuf>,
        /// Bearer token for the backend
        #[arg(long)]
        token: Option<String>,
    },
    /// Start the HTTP API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    if matches!(command, Commands::Serve) {
        // The server uses actix-web's runtime, so run it on a blocking
        // task to avoid nesting tokio runtimes.
        tokio::task::spawn_blocking(|| {
            actix_web::rt::System::new().block_on(zanza_server::run_server())
        })
        .await??;
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let outcome = match command {
        Commands::Resolve { address } => commands::resolve(&state, &address).await,
        Commands::Routes {
            origin,
            destination,
        } => commands::routes(&state, &SearchSession::new(), &origin, &destination).await,
        Commands::Community {
            neighborhoods,
            streets,
            file,
            token,
        } => {
            let source: Arc<dyn ReviewSource> = match file {
                Some(path) => Arc::new(FileReviewSource::new(path)),
                None => state.reviews.clone(),
            };
            let token = token.as_deref().and_then(AuthToken::new);
            let options = SummaryOptions {
                neighborhoods,
                streets,
                ..SummaryOptions::default()
            };
            commands::community(source.as_ref(), token.as_ref(), options).await
        }
        Commands::Serve => Outcome::Done,
    };

    if matches!(outcome, Outcome::Failed) {
        std::process::exit(1);
    }

    Ok(())
}
