//! Caption acquisition with a manual → auto-generated fallback.
//!
//! Failures never leave this module: a video whose captions cannot be
//! obtained yields [`Transcript::Unavailable`].

pub mod video_id;
pub mod youtube;

pub use video_id::normalize_video_id;
pub use youtube::TimedTextSource;

use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Errors raised by a caption source
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Caption source returned status {0}")]
    Status(u16),

    #[error("Invalid caption source URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Which caption track to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Captions uploaded by the video author
    Manual,
    /// Speech-recognition captions generated by YouTube
    AutoGenerated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language: String,
    pub kind: TrackKind,
}

impl CaptionTrack {
    pub fn manual(language: &str) -> Self {
        Self {
            language: language.to_string(),
            kind: TrackKind::Manual,
        }
    }

    pub fn auto_generated(language: &str) -> Self {
        Self {
            language: language.to_string(),
            kind: TrackKind::AutoGenerated,
        }
    }
}

/// A provider of caption text for a video track.
///
/// An empty `Vec` means the track exists but carries no captions; it is not
/// an error.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch_captions(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<Vec<String>, TranscriptError>;
}

/// Outcome of caption acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Found(String),
    Unavailable,
}

impl Transcript {
    /// Join caption entries, skipping blank ones. `None` if nothing remains.
    pub fn join_entries(entries: &[String]) -> Option<String> {
        let text = entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Transcript::Found(text) => Some(text),
            Transcript::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Transcript::Found(_))
    }
}

/// Runs the two-step caption lookup against a [`CaptionSource`]
pub struct TranscriptFetcher {
    source: Box<dyn CaptionSource>,
    language: String,
}

impl TranscriptFetcher {
    pub fn new(source: Box<dyn CaptionSource>, language: impl Into<String>) -> Self {
        Self {
            source,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Fetch the transcript for a video, trying the manual track first and
    /// the auto-generated track second.
    pub async fn fetch(&self, video_id: &str) -> Transcript {
        if video_id.trim().is_empty() {
            return Transcript::Unavailable;
        }

        let tracks = [
            CaptionTrack::manual(&self.language),
            CaptionTrack::auto_generated(&self.language),
        ];

        for track in &tracks {
            match self.source.fetch_captions(video_id, track).await {
                Ok(entries) => match Transcript::join_entries(&entries) {
                    Some(text) => {
                        info!(
                            "📝 Transcript found for {} ({:?} track, {} chars)",
                            video_id,
                            track.kind,
                            text.len()
                        );
                        return Transcript::Found(text);
                    }
                    None => debug!("No {:?} captions for {}", track.kind, video_id),
                },
                Err(e) => warn!(
                    "Caption lookup for {} ({:?} track) failed: {}",
                    video_id, track.kind, e
                ),
            }
        }

        info!("Transcript unavailable for {}", video_id);
        Transcript::Unavailable
    }
}
