mod common;

use common::*;
use episode_summarizer::summary::SummaryCache;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_summaries_survive_restart() {
    let dir = TempDir::new().unwrap();

    let first_run = app_state(
        dir.path(),
        FakeYouTube::default(),
        ScriptedLLM::perplexity().reply(SUMMARY_JSON),
        ScriptedLLM::gemini(),
    );
    let generated = first_run.summaries.summary(VIDEO_ID, false).await.unwrap();
    assert!(!generated.cached);

    // Fresh process, providers that would fail if asked
    let second_run = app_state(dir.path(), FakeYouTube::default(), ScriptedLLM::perplexity(), ScriptedLLM::gemini());
    let served = second_run.summaries.summary(VIDEO_ID, false).await.unwrap();
    assert!(served.cached);
    assert_eq!(served.summary, generated.summary);
}

#[tokio::test]
async fn test_invalidate_forces_regeneration() {
    let dir = TempDir::new().unwrap();
    let primary = ScriptedLLM::perplexity().reply(SUMMARY_JSON).reply(SUMMARY_JSON);
    let prompts = primary.prompts.clone();
    let state = app_state(dir.path(), FakeYouTube::default(), primary, ScriptedLLM::gemini());

    state.summaries.summary(VIDEO_ID, false).await.unwrap();

    let cache = SummaryCache::new(dir.path());
    assert!(cache.invalidate(VIDEO_ID).await.unwrap());

    let regenerated = state.summaries.summary(VIDEO_ID, false).await.unwrap();
    assert!(!regenerated.cached);
    assert_eq!(prompts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_requests_generate_once() {
    let dir = TempDir::new().unwrap();
    let primary = ScriptedLLM::perplexity().reply(SUMMARY_JSON).reply(SUMMARY_JSON);
    let prompts = primary.prompts.clone();
    let state = app_state(dir.path(), FakeYouTube::default(), primary, ScriptedLLM::gemini());
    let service = Arc::clone(&state.summaries);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.summary(VIDEO_ID, false).await.unwrap() })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(prompts.lock().unwrap().len(), 1);
    assert_eq!(results.iter().filter(|r| !r.cached).count(), 1);
    assert!(results.iter().all(|r| r.summary == results[0].summary));
}
