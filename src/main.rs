//! `deeplink` command line tool.
//!
//! Runs the link engine against headless collaborators so links can be
//! checked without a device:
//!
//! ```text
//! deeplink resolve "bulge://achievement/7?source=push"
//! deeplink resolve --authenticated "https://bulge.app/workout/5"
//! deeplink resume --state links.json
//! deeplink share workout 42 -p sharedBy=u1
//! deeplink routes
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use bulge_deeplink::analytics::RecordingSink;
use bulge_deeplink::auth::StaticAuth;
use bulge_deeplink::config::{load_config, DeepLinkConfig};
use bulge_deeplink::handlers::ROUTE_TABLE;
use bulge_deeplink::lifecycle::bootstrap;
use bulge_deeplink::link::{LinkGenerator, Params};
use bulge_deeplink::navigation::RecordingNavigator;
use bulge_deeplink::observability::logging::init_logging;
use bulge_deeplink::storage::{FileStorage, MemoryStorage, Storage};
use bulge_deeplink::{Collaborators, DispatchCoordinator};

#[derive(Parser)]
#[command(name = "deeplink")]
#[command(about = "Resolve, resume and generate app deep links", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a link and print the navigation it produces
    Resolve {
        url: String,

        /// Treat the user as signed in
        #[arg(long)]
        authenticated: bool,

        /// Simulate a navigation container that has not mounted yet
        #[arg(long)]
        not_ready: bool,

        /// JSON file used as persistent storage
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Replay a navigation deferred behind sign-in
    Resume {
        /// JSON file used as persistent storage
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Generate a share link
    Share {
        /// Content kind (workout, achievement, invite, premium, ...)
        kind: String,

        id: String,

        /// Extra query parameter, repeatable
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// List the route table in registration order
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DeepLinkConfig::default(),
    };
    init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Resolve {
            url,
            authenticated,
            not_ready,
            state,
        } => {
            let navigator = Arc::new(if not_ready {
                RecordingNavigator::not_ready()
            } else {
                RecordingNavigator::ready()
            });
            let analytics = Arc::new(RecordingSink::new());
            let collaborators = Collaborators {
                navigator: navigator.clone(),
                storage: open_storage(&config, state)?,
                analytics: analytics.clone(),
                auth: Arc::new(StaticAuth::new(authenticated)),
            };

            let (coordinator, outcome) = bootstrap(&config, collaborators, Some(&url)).await;
            let report = json!({
                "outcome": outcome,
                "state": coordinator.state(),
                "navigation": navigator.actions(),
                "analytics": analytics.events(),
                "pending_navigation": coordinator.auth_gate().pending().await,
                "referral": coordinator.attribution().referral().await,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Resume { state } => {
            let navigator = Arc::new(RecordingNavigator::ready());
            let collaborators = Collaborators {
                navigator: navigator.clone(),
                storage: open_storage(&config, state)?,
                analytics: Arc::new(RecordingSink::new()),
                auth: Arc::new(StaticAuth::new(true)),
            };

            let mut coordinator = DispatchCoordinator::new(&config, collaborators);
            let outcome = coordinator.resume_after_auth().await;
            let report = json!({
                "resume": outcome,
                "navigation": navigator.actions(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Share { kind, id, params } => {
            let generator = LinkGenerator::from_config(&config.links)?;
            let params: Params = params.into_iter().collect();
            println!("{}", generator.share_link(&kind, &id, &params));
        }
        Commands::Routes => {
            for (pattern, kind) in ROUTE_TABLE {
                let auth = if kind.requires_auth() { "auth" } else { "public" };
                println!("{:<22} {:<16} {}", pattern, kind.name(), auth);
            }
        }
    }

    Ok(())
}

fn open_storage(
    config: &DeepLinkConfig,
    state: Option<PathBuf>,
) -> Result<Arc<dyn Storage>, Box<dyn std::error::Error>> {
    let path = state.or_else(|| config.storage.state_file.as_ref().map(PathBuf::from));
    let storage: Arc<dyn Storage> = match path {
        Some(path) => Arc::new(FileStorage::open(path)?),
        None => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{}`", s))
}
