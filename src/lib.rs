//! yt-transcript - resolve a YouTube video reference to a single transcript string
//!
//! This library normalizes YouTube URLs and bare IDs, fetches captions through a
//! pluggable transcript provider with retry and an in-process LRU cache, and pairs
//! the result with a filesystem-safe title.

pub mod cache;
pub mod cli;
pub mod config;
pub mod output;
pub mod provider;
pub mod title;
pub mod transcribe;
pub mod utils;
pub mod video_id;

pub use cache::LruCache;
pub use cli::Cli;
pub use config::Config;
pub use output::{ErrorRecord, OutputRecord};
pub use provider::{ProviderError, Snippet, TranscriptProvider, TranscriptTrack};
pub use title::TitleResolver;
pub use transcribe::{RetryPolicy, TranscriptFetcher, TranscriptPipeline, TranscriptResult};
pub use video_id::{resolve, VideoId};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced to the caller of a transcript request
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No transcripts available for this video.")]
    NoTranscriptsAvailable,

    #[error("{0}")]
    FetchFailed(String),
}
