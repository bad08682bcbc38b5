use async_trait::async_trait;

pub mod youtube;

use crate::video_id::VideoId;

/// One caption track available for a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTrack {
    /// Language code, e.g. `en` or `en-US`
    pub language_code: String,

    /// Human-readable language name
    pub language: String,

    /// Automatically generated (speech recognition) rather than uploaded
    pub is_generated: bool,

    /// Opaque handle the provider uses to fetch this track
    pub handle: String,
}

/// One timed caption entry
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    /// Caption text, empty when the provider had none
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Failure kinds a provider reports to the fetch orchestrator
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The video has no transcripts; retrying will not change that
    #[error("No transcripts available for this video.")]
    NoTranscripts,

    /// Transport or provider failure that may succeed on another attempt
    #[error("{0}")]
    Transient(String),
}

/// Source of transcript tracks and their snippets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// List every transcript track available for a video, in provider order
    async fn list(&self, video_id: &VideoId) -> Result<Vec<TranscriptTrack>, ProviderError>;

    /// Download the snippets of one track
    async fn fetch(&self, track: &TranscriptTrack) -> Result<Vec<Snippet>, ProviderError>;
}
