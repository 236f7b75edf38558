use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{CaptionSource, CaptionTrack, TrackKind, TranscriptError};

/// Caption source backed by the YouTube `timedtext` endpoint (json3 format)
pub struct TimedTextSource {
    base_url: Url,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

impl TimedTextSource {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, TranscriptError> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { base_url, client })
    }

    fn query_for<'a>(video_id: &'a str, track: &'a CaptionTrack) -> Vec<(&'static str, &'a str)> {
        let mut query = vec![
            ("v", video_id),
            ("lang", track.language.as_str()),
            ("fmt", "json3"),
        ];
        if track.kind == TrackKind::AutoGenerated {
            query.push(("kind", "asr"));
        }
        query
    }

    /// Extract one caption line per event. An empty body means no captions.
    fn parse_json3(body: &str) -> Result<Vec<String>, TranscriptError> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response: TimedTextResponse = serde_json::from_str(body)?;
        let entries = response
            .events
            .into_iter()
            .map(|event| {
                event
                    .segs
                    .iter()
                    .map(|seg| seg.utf8.as_str())
                    .collect::<String>()
                    .replace('\n', " ")
            })
            .filter(|line| !line.trim().is_empty())
            .collect();

        Ok(entries)
    }
}

#[async_trait]
impl CaptionSource for TimedTextSource {
    async fn fetch_captions(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<Vec<String>, TranscriptError> {
        debug!("Requesting {:?} captions for {} ({})", track.kind, video_id, track.language);

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&Self::query_for(video_id, track))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscriptError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Self::parse_json3(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SAMPLE_JSON3: &str = r#"{
        "wireMagic": "pb3",
        "events": [
            {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "Welcome "}, {"utf8": "back"}]},
            {"tStartMs": 1500, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
            {"tStartMs": 1600},
            {"tStartMs": 2000, "dDurationMs": 2000, "segs": [{"utf8": "to the\nchannel"}]}
        ]
    }"#;

    #[test]
    fn test_parse_json3_joins_segments_per_event() {
        let entries = TimedTextSource::parse_json3(SAMPLE_JSON3).unwrap();
        assert_eq!(entries, vec!["Welcome back", "to the channel"]);
    }

    #[test]
    fn test_parse_empty_body_is_no_captions() {
        assert!(TimedTextSource::parse_json3("").unwrap().is_empty());
        assert!(TimedTextSource::parse_json3("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(matches!(
            TimedTextSource::parse_json3("<html>nope</html>"),
            Err(TranscriptError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            TimedTextSource::new("not a url", 5),
            Err(TranscriptError::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_auto_generated_track() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/timedtext")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("v".into(), "abc123".into()),
                Matcher::UrlEncoded("lang".into(), "en".into()),
                Matcher::UrlEncoded("fmt".into(), "json3".into()),
                Matcher::UrlEncoded("kind".into(), "asr".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE_JSON3)
            .create_async()
            .await;

        let source =
            TimedTextSource::new(&format!("{}/api/timedtext", server.url()), 5).unwrap();
        let entries = source
            .fetch_captions("abc123", &CaptionTrack::auto_generated("en"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(entries, vec!["Welcome back", "to the channel"]);
    }

    #[tokio::test]
    async fn test_fetch_empty_manual_track() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/timedtext")
            .match_query(Matcher::UrlEncoded("v".into(), "abc123".into()))
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let source =
            TimedTextSource::new(&format!("{}/api/timedtext", server.url()), 5).unwrap();
        let entries = source
            .fetch_captions("abc123", &CaptionTrack::manual("en"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/timedtext")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let source =
            TimedTextSource::new(&format!("{}/api/timedtext", server.url()), 5).unwrap();
        let result = source
            .fetch_captions("missing", &CaptionTrack::manual("en"))
            .await;

        assert!(matches!(result, Err(TranscriptError::Status(404))));
    }
}
