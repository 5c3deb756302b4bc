//! `vidtune` binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn, Instrument};

use vtune_ai::{GeminiClient, MetadataGenerator};
use vtune_auth::{handle_callback, TokenLifecycle};
use vtune_cli::{
    init_tracing, load_settings, mask_secret, update_settings, AppConfig, Session, SessionEnd,
};
use vtune_storage::{FileStore, SharedStore};
use vtune_wizard::Wizard;
use vtune_youtube::YouTubeUploader;

#[derive(Parser)]
#[command(name = "vidtune")]
#[command(about = "VidTune - prepare and publish a video to YouTube")]
#[command(version)]
struct Cli {
    /// JSON file holding progress, credentials and settings
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive wizard (default)
    Session,
    /// Complete YouTube sign-in with the redirected URL or its fragment
    Callback {
        /// Redirect URL, or the part after `#`
        response: String,
    },
    /// Show or change stored settings
    Settings {
        #[arg(long, help = "YouTube OAuth client id")]
        client_id: Option<String>,
        #[arg(long, help = "Google AI API key")]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }
    init_tracing(config.json_logs);

    let store: SharedStore = Arc::new(FileStore::new(&config.state_file));
    let settings = load_settings(store.as_ref());
    let config = config.with_settings(&settings);

    info!(state_file = %config.state_file.display(), "Starting vidtune");

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => run_session(&config, store).await,
        Commands::Callback { response } => {
            let tokens = TokenLifecycle::new(store.clone());
            let outcome = handle_callback(&response, &tokens).context("failed to store the sign-in result")?;
            println!("{}", outcome.message);
            tokio::time::sleep(outcome.redirect_delay).await;
            run_session(&config, store).await
        }
        Commands::Settings { client_id, api_key } => {
            let settings = if client_id.is_none() && api_key.is_none() {
                settings
            } else {
                let saved = update_settings(store.as_ref(), client_id, api_key)
                    .context("failed to save settings")?;
                println!("Settings saved.");
                saved
            };
            println!("YouTube client id: {}", display_or_unset(&settings.youtube_client_id));
            println!("Google AI API key: {}", mask_secret(&settings.google_ai_api_key));
            Ok(())
        }
    }
}

async fn run_session(config: &AppConfig, store: SharedStore) -> anyhow::Result<()> {
    let uploader = YouTubeUploader::new(&config.youtube).context("failed to create YouTube client")?;
    let wizard = Wizard::new(store).with_watch_base(config.youtube.watch_base.clone());
    let mut session = Session::new(wizard, Arc::new(uploader), config.oauth.clone());

    match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => {
            let generator: Arc<dyn MetadataGenerator> = Arc::new(client);
            session = session.with_generator(generator);
        }
        Err(e) => warn!("AI metadata generation disabled: {}", e),
    }

    let mut stdout = std::io::stdout();
    let span = session.wizard().logger().create_span();
    span.in_scope(|| session.start(&mut stdout))?;

    let stdin = BufReader::new(tokio::io::stdin());
    match session.run(stdin, &mut stdout).instrument(span).await? {
        SessionEnd::Quit => info!("Session ended"),
        SessionEnd::Redirect(url) => info!(host = ?url.host_str(), "Session ended for OAuth redirect"),
    }
    Ok(())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
