use anyhow::Context;
use async_trait::async_trait;
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};
use yt_transcript_rs::proxies::GenericProxyConfig;

use super::{ProviderError, Snippet, TranscriptProvider, TranscriptTrack};
use crate::config::ProxyConfig;
use crate::video_id::VideoId;
use crate::Result;

/// Transcript provider backed by `yt_transcript_rs`
///
/// Track handles are the video ID; `fetch` asks the API for that video in the
/// track's language.
pub struct YoutubeProvider {
    api: YouTubeTranscriptApi,
}

impl YoutubeProvider {
    /// Build the API client once; it is reused for every call
    pub fn new(proxy: &ProxyConfig) -> Result<Self> {
        let api = match proxy_url(proxy)? {
            Some(url) => {
                tracing::debug!("Routing transcript requests through {}", proxy.domain);
                let config = GenericProxyConfig::new(Some(url.clone()), Some(url))
                    .map_err(|e| anyhow::anyhow!("Invalid proxy configuration: {}", e))?;
                YouTubeTranscriptApi::new(None, Some(Box::new(config)), None)
            }
            None => YouTubeTranscriptApi::new(None, None, None),
        }
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to build transcript API client")?;

        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeProvider {
    async fn list(&self, video_id: &VideoId) -> std::result::Result<Vec<TranscriptTrack>, ProviderError> {
        tracing::debug!("Listing transcripts for: {}", video_id);

        let listing = self
            .api
            .list_transcripts(video_id.as_str())
            .await
            .map_err(|e| classify(&e))?;

        let tracks: Vec<TranscriptTrack> = listing
            .transcripts()
            .map(|transcript| TranscriptTrack {
                language_code: transcript.language_code().to_string(),
                language: transcript.language().to_string(),
                is_generated: transcript.is_generated(),
                handle: video_id.to_string(),
            })
            .collect();

        if tracks.is_empty() {
            return Err(ProviderError::NoTranscripts);
        }

        Ok(tracks)
    }

    async fn fetch(&self, track: &TranscriptTrack) -> std::result::Result<Vec<Snippet>, ProviderError> {
        let fetched = self
            .api
            .fetch_transcript(&track.handle, &[track.language_code.as_str()], false)
            .await
            .map_err(|e| classify(&e))?;

        Ok(fetched
            .parts()
            .iter()
            .map(|part| Snippet {
                text: part.text.clone(),
                start: part.start,
                duration: part.duration,
            })
            .collect())
    }
}

/// Webshare-style rotating residential proxy URL, if credentials are configured
///
/// The location filter is encoded in the username: `{user}-US-CA-rotate`.
fn proxy_url(config: &ProxyConfig) -> Result<Option<String>> {
    let (Some(username), Some(password)) = (&config.username, &config.password) else {
        return Ok(None);
    };

    let locations: String = config
        .filter_ip_locations
        .iter()
        .map(|location| format!("-{}", location.to_uppercase()))
        .collect();

    let mut url = Url::parse(&format!("http://{}:{}/", config.domain, config.port))
        .context("Invalid proxy address")?;
    url.set_username(&format!("{}{}-rotate", username, locations))
        .map_err(|_| anyhow::anyhow!("Proxy address cannot carry credentials"))?;
    url.set_password(Some(password))
        .map_err(|_| anyhow::anyhow!("Proxy address cannot carry credentials"))?;

    Ok(Some(url.to_string()))
}

fn classify(err: &CouldNotRetrieveTranscript) -> ProviderError {
    if is_deterministic(err.reason.as_ref()) {
        ProviderError::NoTranscripts
    } else {
        ProviderError::Transient(err.to_string())
    }
}

/// Disabled or missing transcripts will not appear on a retry
fn is_deterministic(reason: Option<&CouldNotRetrieveTranscriptReason>) -> bool {
    matches!(
        reason,
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled)
            | Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. })
    )
}
