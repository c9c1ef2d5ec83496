use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vidask::config::Config;
use vidask::state::AppState;
use vidask::web::create_router;

#[derive(Parser)]
#[command(name = "vidask")]
#[command(version, about = "Ask questions about YouTube video transcripts")]
#[command(
    long_about = "Web service that fetches a video's auto-generated subtitles and runs \
free-form instructions over the transcript with Gemini, OpenAI, or a local Ollama daemon."
)]
struct Cli {
    /// Address to bind the server to
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Language: {}", config.language);
    info!("Ollama:   {}", config.ollama_url);

    let addr = config.socket_addr();
    let state = Arc::new(AppState::new(config).context("Failed to build application state")?);
    let app = create_router(state);

    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
