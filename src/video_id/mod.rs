use std::fmt;
use url::Url;

use crate::TranscriptError;

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// A validated 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accept `candidate` only if it is exactly an identifier, nothing more
    pub fn parse(candidate: &str) -> Option<Self> {
        is_video_id(candidate).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Full match against `[A-Za-z0-9_-]{11}`
pub fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract a video identifier from a bare ID or any supported YouTube URL shape
pub fn resolve(input: &str) -> Result<VideoId, TranscriptError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TranscriptError::InvalidInput(
            "Missing YouTube URL or ID".to_string(),
        ));
    }

    if let Some(id) = VideoId::parse(input) {
        return Ok(id);
    }

    Url::parse(input)
        .ok()
        .and_then(|url| from_url(&url))
        .ok_or_else(|| TranscriptError::InvalidInput("Invalid YouTube URL".to_string()))
}

fn from_url(url: &Url) -> Option<VideoId> {
    let host = url.host_str()?.to_ascii_lowercase();

    // youtu.be/<id>
    if host.contains("youtu.be") {
        if let Some(id) = VideoId::parse(url.path().trim_start_matches('/')) {
            return Some(id);
        }
    }

    if host.contains("youtube.com") {
        // watch?v=<id>
        let from_query = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .and_then(|(_, value)| VideoId::parse(&value));
        if from_query.is_some() {
            return from_query;
        }

        // embed/<id>, shorts/<id>, live/<id>, v/<id>
        return url
            .path_segments()?
            .find_map(VideoId::parse);
    }

    None
}
