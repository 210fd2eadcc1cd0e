use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

use episode_summarizer::api::ApiServer;
use episode_summarizer::config::ServerConfig;
use episode_summarizer::{AppState, Config};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Parser)]
#[command(name = "episode-summarizer")]
#[command(version, about = "Podcast site backend: channel stats, episode feed and AI summaries")]
struct Cli {
    /// Configuration file (defaults to ./episode-summarizer.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Summarize one video and print the result as JSON
    Summarize {
        /// YouTube video id
        video_id: String,
        /// Regenerate even if a cached summary exists
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging before the config is read; its level is applied once known
    let startup_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(ServerConfig::default().log_level));
    let (subscriber, filter_handle) = logging(startup_filter, std::io::stderr);
    subscriber.init();

    let mut config = Config::load(cli.config.as_deref())?;
    if std::env::var_os("RUST_LOG").is_none() {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.server.log_level)) {
            warn!("Failed to apply log level {}: {}", config.server.log_level, e);
        }
    }

    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    config.validate()?;
    info!("{}", config.summary());

    let state = AppState::from_config(Arc::new(config))?;

    match cli.command {
        Commands::Serve { .. } => {
            info!("🚀 Episode summarizer starting...");
            ApiServer::new(state).start().await?;
        }
        Commands::Summarize { video_id, refresh } => {
            state.summaries.cache().initialize().await?;
            let summary = state.summaries.summary(&video_id, refresh).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Formatting subscriber whose filter can be swapped after startup
fn logging<W>(filter: EnvFilter, writer: W) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_loading_is_logged() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("episode-summarizer.toml");
        std::fs::write(&path, "[server]\nlog_level = \"debug\"\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let (subscriber, handle) = logging(EnvFilter::new(ServerConfig::default().log_level), move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "episode_summarizer", "before config");
            let config = Config::from_file(&path).unwrap();
            handle.reload(EnvFilter::new(&config.server.log_level)).unwrap();
            tracing::debug!(target: "episode_summarizer", "after config");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Loaded configuration from"));
        assert!(!output.contains("before config"));
        assert!(output.contains("after config"));
    }
}
