use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::cache::{LruCache, TranscriptCache};
use crate::config::{Config, TranscriptConfig};
use crate::output::OutputRecord;
use crate::provider::youtube::YoutubeProvider;
use crate::provider::{ProviderError, TranscriptProvider};
use crate::title::TitleResolver;
use crate::utils::sanitize_filename;
use crate::video_id::{self, VideoId};
use crate::TranscriptError;

pub mod selector;

/// Transcript text, or the reason it could not be produced
pub type TranscriptResult = std::result::Result<String, TranscriptError>;

/// How often, and how patiently, transient provider failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Delay before retry `n` is `backoff_step * n`
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Delay before the given 1-based retry
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff_step * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_step: Duration::from_millis(500),
        }
    }
}

impl From<&TranscriptConfig> for RetryPolicy {
    fn from(config: &TranscriptConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_step: Duration::from_millis(config.backoff_step_ms),
        }
    }
}

/// Fetches transcripts through the cache, the provider and the retry policy
pub struct TranscriptFetcher {
    provider: Arc<dyn TranscriptProvider>,
    cache: Arc<TranscriptCache>,
    preferred_languages: Vec<String>,
    retry: RetryPolicy,
}

impl TranscriptFetcher {
    pub fn new(
        provider: Arc<dyn TranscriptProvider>,
        cache: Arc<TranscriptCache>,
        preferred_languages: Vec<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            cache,
            preferred_languages,
            retry,
        }
    }

    pub fn cache(&self) -> &Arc<TranscriptCache> {
        &self.cache
    }

    /// Transcript for a video as a single space-joined string
    pub async fn fetch_transcript(&self, video_id: &VideoId) -> TranscriptResult {
        if let Some(cached) = self.cache.get(video_id.as_str()) {
            tracing::debug!("Transcript cache hit for {}", video_id);
            return Ok(cached);
        }

        let mut retries = 0;
        loop {
            match self.fetch_once(video_id).await {
                Ok(transcript) => {
                    self.cache.put(video_id.as_str(), transcript.clone());
                    return Ok(transcript);
                }
                Err(ProviderError::NoTranscripts) => {
                    tracing::info!("No transcripts available for {}", video_id);
                    return Err(TranscriptError::NoTranscriptsAvailable);
                }
                Err(ProviderError::Transient(message)) => {
                    if retries >= self.retry.max_retries {
                        tracing::warn!(
                            "Giving up on {} after {} attempts: {}",
                            video_id,
                            retries + 1,
                            message
                        );
                        return Err(TranscriptError::FetchFailed(message));
                    }

                    retries += 1;
                    let wait = self.retry.delay_for(retries);
                    tracing::warn!(
                        "Transcript fetch for {} failed ({}), retry {}/{} in {:?}",
                        video_id,
                        message,
                        retries,
                        self.retry.max_retries,
                        wait
                    );
                    sleep(wait).await;
                }
            }
        }
    }

    async fn fetch_once(&self, video_id: &VideoId) -> std::result::Result<String, ProviderError> {
        let tracks = self.provider.list(video_id).await?;
        let track = selector::select(&tracks, &self.preferred_languages)?;

        tracing::info!(
            "Fetching {} transcript{} for {}",
            track.language_code,
            if track.is_generated { " (generated)" } else { "" },
            video_id
        );

        let snippets = self.provider.fetch(track).await?;

        let text = snippets
            .iter()
            .map(|snippet| snippet.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(text.trim().to_string())
    }
}

/// One request/response cycle: input string to output record
pub struct TranscriptPipeline {
    fetcher: TranscriptFetcher,
    titles: TitleResolver,
}

impl TranscriptPipeline {
    /// Build the provider client and both caches once for the process
    pub fn new(config: &Config) -> crate::Result<Self> {
        let provider = YoutubeProvider::new(&config.proxy)?;

        let fetcher = TranscriptFetcher::new(
            Arc::new(provider),
            Arc::new(LruCache::new(config.transcript.cache_capacity)),
            config.transcript.preferred_languages.clone(),
            RetryPolicy::from(&config.transcript),
        );

        let title_client = reqwest::Client::builder()
            .build()
            .context("Failed to build title HTTP client")?;
        let titles = TitleResolver::new(title_client, &config.title);

        Ok(Self::from_parts(fetcher, titles))
    }

    pub fn from_parts(fetcher: TranscriptFetcher, titles: TitleResolver) -> Self {
        Self { fetcher, titles }
    }

    pub async fn run(&self, input: &str) -> std::result::Result<OutputRecord, TranscriptError> {
        let video_id = video_id::resolve(input)?;
        tracing::info!("Resolved {:?} to video {}", input, video_id);

        self.run_for(&video_id).await
    }

    /// Fetch transcript and title for an already resolved video
    pub async fn run_for(&self, video_id: &VideoId) -> std::result::Result<OutputRecord, TranscriptError> {
        let transcript = self.fetcher.fetch_transcript(video_id).await?;

        let title = self.titles.get_title(video_id).await;
        let filename = sanitize_filename(&title);

        Ok(OutputRecord {
            video_id: video_id.to_string(),
            title,
            filename,
            transcript,
        })
    }
}
