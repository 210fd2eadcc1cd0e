/// Summary cache: one pretty-printed JSON file per video id
use super::Summary;
use crate::youtube::is_valid_video_id;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Listing entry for one cached summary
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedSummaryInfo {
    pub video_id: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

/// Fields a listing needs; the rest of the file is not validated
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedHeader {
    #[serde(default)]
    title: String,
    generated_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug, Default, PartialEq)]
pub struct CacheStats {
    pub total_files: usize,
    pub readable_files: usize,
    pub corrupt_files: usize,
    pub total_bytes: u64,
}

/// Manages summary cache operations
#[derive(Debug, Clone)]
pub struct SummaryCache {
    cache_dir: PathBuf,
}

impl SummaryCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into() }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Initialize cache directory
    pub async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        info!("📁 Summary cache directory initialized: {}", self.cache_dir.display());
        Ok(())
    }

    fn entry_path(&self, video_id: &str) -> Result<PathBuf> {
        if !is_valid_video_id(video_id) {
            bail!("refusing to use {:?} as a cache key", video_id);
        }
        Ok(self.cache_dir.join(format!("{}.json", video_id)))
    }

    /// Load a cached summary; unreadable or corrupt entries count as misses
    pub async fn get(&self, video_id: &str) -> Option<Summary> {
        let cache_path = self.entry_path(video_id).ok()?;

        let content = match tokio::fs::read_to_string(&cache_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss: no file found for {}", video_id);
                return None;
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", cache_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Summary>(&content) {
            Ok(summary) => {
                debug!("📚 Cache hit for {}", video_id);
                Some(summary)
            }
            Err(e) => {
                warn!("Failed to parse cache file {}: {}", cache_path.display(), e);
                None
            }
        }
    }

    /// Write a summary, replacing any previous entry for the same video
    pub async fn put(&self, video_id: &str, summary: &Summary) -> Result<()> {
        let cache_path = self.entry_path(video_id)?;
        let json_content = serde_json::to_string_pretty(summary)?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        // Readers never observe a half-written entry
        let tmp_path = self.cache_dir.join(format!(".{}.json.tmp", video_id));
        tokio::fs::write(&tmp_path, json_content).await?;
        tokio::fs::rename(&tmp_path, &cache_path).await?;

        info!("💾 Saved summary to cache: {}", video_id);
        Ok(())
    }

    /// All readable entries, newest first
    pub async fn list(&self) -> Result<Vec<CachedSummaryInfo>> {
        let mut summaries = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(summaries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(video_id) = cached_video_id(&path) else {
                continue;
            };

            let header = match tokio::fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<CachedHeader>(&content),
                Err(e) => {
                    warn!("Failed to read cache file {}: {}", path.display(), e);
                    continue;
                }
            };

            match header {
                Ok(header) => summaries.push(CachedSummaryInfo {
                    video_id,
                    title: header.title,
                    generated_at: header.generated_at,
                }),
                Err(e) => warn!("Skipping unparseable cache file {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(summaries)
    }

    /// Force invalidate a single entry
    pub async fn invalidate(&self, video_id: &str) -> Result<bool> {
        let cache_path = self.entry_path(video_id)?;

        match tokio::fs::remove_file(&cache_path).await {
            Ok(()) => {
                info!("🗑️ Invalidated cached summary for {}", video_id);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache file not found for {}", video_id);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every cached summary
    pub async fn clear(&self) -> Result<usize> {
        let mut cleared_count = 0;

        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if cached_video_id(&path).is_some() && tokio::fs::remove_file(&path).await.is_ok() {
                cleared_count += 1;
                debug!("🗑️ Removed cache file: {}", path.display());
            }
        }

        if cleared_count > 0 {
            info!("🧹 Cleared {} cached summaries", cleared_count);
        }

        Ok(cleared_count)
    }

    /// Get cache statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();

        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if cached_video_id(&path).is_none() {
                continue;
            }

            stats.total_files += 1;
            if let Ok(metadata) = entry.metadata().await {
                stats.total_bytes += metadata.len();
            }

            let readable = tokio::fs::read_to_string(&path)
                .await
                .ok()
                .and_then(|content| serde_json::from_str::<Summary>(&content).ok())
                .is_some();
            if readable {
                stats.readable_files += 1;
            } else {
                stats.corrupt_files += 1;
            }
        }

        Ok(stats)
    }
}

/// Video id for `<id>.json` cache entries; temp files and strays yield None
fn cached_video_id(path: &Path) -> Option<String> {
    if path.extension().map_or(true, |ext| ext != "json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_video_id(stem).then(|| stem.to_string())
}
