use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use episode_summarizer::summary::SummaryCache;
use episode_summarizer::Config;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cache-manager")]
#[command(about = "Summary cache management utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Overrides the cache directory from configuration
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all cached summaries, newest first
    List,
    /// Print one cached summary as JSON
    Show {
        /// Video id
        video_id: String,
    },
    /// Get cache statistics
    Stats,
    /// Invalidate the cached summary for one video
    Invalidate {
        /// Video id
        video_id: String,
    },
    /// Clear all cache entries
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let cli = Cli::parse();

    let cache_dir = match cli.cache_dir {
        Some(dir) => dir,
        None => Config::load(cli.config.as_deref())?.cache.cache_dir,
    };
    let cache = SummaryCache::new(cache_dir);

    match cli.command {
        Commands::List => {
            let summaries = cache.list().await?;

            if summaries.is_empty() {
                info!("📭 No cached summaries found in {}", cache.cache_dir().display());
                return Ok(());
            }

            info!("📚 Found {} cached summaries:", summaries.len());
            for entry in summaries {
                info!("  {} - {} ({})", entry.video_id, entry.title, entry.generated_at.to_rfc3339());
            }
        }

        Commands::Show { video_id } => {
            let summary = cache
                .get(&video_id)
                .await
                .ok_or_else(|| anyhow!("No cached summary for {}", video_id))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Stats => {
            let stats = cache.stats().await?;
            info!("📊 Cache Statistics:");
            info!("  Total files: {}", stats.total_files);
            info!("  Readable files: {}", stats.readable_files);
            info!("  Corrupt files: {}", stats.corrupt_files);
            info!("  Total size: {} bytes", stats.total_bytes);
        }

        Commands::Invalidate { video_id } => {
            if cache.invalidate(&video_id).await? {
                info!("✅ Invalidated cached summary for: {}", video_id);
            } else {
                warn!("⚠️ No cached summary for: {}", video_id);
            }
        }

        Commands::Clear => {
            let count = cache.clear().await?;
            info!("🧹 Cleared {} cached summaries", count);
        }
    }

    Ok(())
}
