use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::LruCache;
use crate::config::TitleConfig;
use crate::video_id::VideoId;

/// Looks up human-readable video titles through an oEmbed endpoint
pub struct TitleResolver {
    client: Client,
    oembed_url: String,
    timeout: Duration,
    cache: LruCache<String>,
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
}

impl TitleResolver {
    pub fn new(client: Client, config: &TitleConfig) -> Self {
        Self {
            client,
            oembed_url: config.oembed_url.clone(),
            timeout: config.timeout(),
            cache: LruCache::new(config.cache_capacity),
        }
    }

    /// Title for a video, or `Video_<id>` when the lookup fails for any reason
    pub async fn get_title(&self, video_id: &VideoId) -> String {
        if let Some(title) = self.cache.get(video_id.as_str()) {
            return title;
        }

        match self.lookup(video_id).await {
            Ok(title) => {
                self.cache.put(video_id.as_str(), title.clone());
                title
            }
            Err(err) => {
                tracing::debug!("Title lookup failed for {}: {:#}", video_id, err);
                fallback_title(video_id)
            }
        }
    }

    async fn lookup(&self, video_id: &VideoId) -> anyhow::Result<String> {
        let watch_url = format!("http://www.youtube.com/watch?v={}", video_id);

        let response = self
            .client
            .get(&self.oembed_url)
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let body: OEmbed = response.json().await?;

        body.title
            .ok_or_else(|| anyhow::anyhow!("oEmbed response has no title"))
    }
}

/// Deterministic placeholder used when no title can be fetched
pub fn fallback_title(video_id: &VideoId) -> String {
    format!("Video_{}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, Matcher};

    fn resolver(path: &str) -> TitleResolver {
        let config = TitleConfig {
            oembed_url: format!("{}{}", mockito::server_url(), path),
            timeout_secs: 2,
            cache_capacity: 4,
        };
        TitleResolver::new(Client::new(), &config)
    }

    fn id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_configured_timeout_is_used() {
        let titles = resolver("/oembed-timeout");
        assert_eq!(titles.timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_title_is_fetched_and_memoized() {
        let endpoint = mock("GET", "/oembed-ok")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), "http://www.youtube.com/watch?v=dQw4w9WgXcQ".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title":"Never Gonna Give You Up","author_name":"Rick Astley"}"#)
            .expect(1)
            .create();

        let titles = resolver("/oembed-ok");
        assert_eq!(titles.get_title(&id()).await, "Never Gonna Give You Up");
        assert_eq!(titles.get_title(&id()).await, "Never Gonna Give You Up");

        endpoint.assert();
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let _endpoint = mock("GET", "/oembed-down")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let titles = resolver("/oembed-down");
        assert_eq!(titles.get_title(&id()).await, "Video_dQw4w9WgXcQ");
        assert!(titles.cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_title_falls_back() {
        let _endpoint = mock("GET", "/oembed-untitled")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"author_name":"Rick Astley"}"#)
            .create();

        let titles = resolver("/oembed-untitled");
        assert_eq!(titles.get_title(&id()).await, "Video_dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let _endpoint = mock("GET", "/oembed-garbage")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let titles = resolver("/oembed-garbage");
        assert_eq!(titles.get_title(&id()).await, "Video_dQw4w9WgXcQ");
    }
}
