use crate::provider::{ProviderError, TranscriptTrack};

/// Pick the track to download.
///
/// Each preferred language is tried in order, taking a manually created track
/// over a generated one for the same language. When none of them is listed the
/// first track in provider order wins.
pub fn select<'a>(
    tracks: &'a [TranscriptTrack],
    preferred: &[String],
) -> Result<&'a TranscriptTrack, ProviderError> {
    let first = tracks.first().ok_or(ProviderError::NoTranscripts)?;

    let preferred_match = preferred.iter().find_map(|language| {
        let mut matching = tracks.iter().filter(|t| &t.language_code == language);
        matching
            .clone()
            .find(|t| !t.is_generated)
            .or_else(|| matching.next())
    });

    match preferred_match {
        Some(track) => Ok(track),
        None => {
            tracing::debug!(
                "No preferred transcript language available, falling back to {}",
                first.language_code
            );
            Ok(first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: generated,
            handle: format!("handle-{}-{}", code, generated),
        }
    }

    fn preferred() -> Vec<String> {
        vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()]
    }

    #[test]
    fn test_preferred_language_wins() {
        let tracks = vec![track("fr", false), track("en-US", false)];
        assert_eq!(select(&tracks, &preferred()).unwrap().language_code, "en-US");
    }

    #[test]
    fn test_preference_order_breaks_ties() {
        let tracks = vec![track("en-GB", false), track("en-US", false), track("en", true)];
        assert_eq!(select(&tracks, &preferred()).unwrap().language_code, "en");
    }

    #[test]
    fn test_manual_track_beats_generated() {
        let tracks = vec![track("en", true), track("en", false)];
        assert!(!select(&tracks, &preferred()).unwrap().is_generated);
    }

    #[test]
    fn test_fallback_to_first_listed() {
        let tracks = vec![track("fr", false), track("de", false)];
        assert_eq!(select(&tracks, &preferred()).unwrap().language_code, "fr");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(select(&[], &preferred()), Err(ProviderError::NoTranscripts));
    }
}
