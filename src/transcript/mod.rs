use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::provider::{RawSegment, TranscriptProvider};
use crate::resolver::resolve_video_id;
use crate::utils::format_duration;

pub mod classify;

pub use classify::classify;

/// Individual transcript segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl From<RawSegment> for TranscriptSegment {
    fn from(raw: RawSegment) -> Self {
        Self {
            text: raw.text,
            start: raw.start,
            duration: raw.duration.unwrap_or(0.0),
        }
    }
}

/// Successful extraction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResult {
    /// Segment texts joined by single spaces
    pub transcript: String,

    pub items: Vec<TranscriptSegment>,

    /// Best-effort language tag, "en" or "unknown"
    pub language: String,

    /// End of the last segment in seconds
    pub duration: f64,

    pub word_count: usize,

    pub video_id: String,
}

impl TranscriptResult {
    /// Assemble a result from ordered segments
    pub fn from_segments(video_id: String, items: Vec<TranscriptSegment>, language: String) -> Self {
        let transcript = items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let duration = items.last().map(|last| last.start + last.duration).unwrap_or(0.0);
        let word_count = transcript.split_whitespace().count();

        Self {
            transcript,
            items,
            language,
            duration,
            word_count,
            video_id,
        }
    }
}

/// Fixed vocabulary of failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    MissingUrl,
    EmptyTranscript,
    TranscriptsDisabled,
    VideoUnavailable,
    NoTranscriptFound,
    UnknownError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MissingUrl => "missing_url",
            ErrorType::EmptyTranscript => "empty_transcript",
            ErrorType::TranscriptsDisabled => "transcripts_disabled",
            ErrorType::VideoUnavailable => "video_unavailable",
            ErrorType::NoTranscriptFound => "no_transcript_found",
            ErrorType::UnknownError => "unknown_error",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one extraction attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Success(TranscriptResult),
    Failure { error: String, error_type: ErrorType },
}

impl ExtractionOutcome {
    pub fn failure(error_type: ErrorType, error: impl Into<String>) -> Self {
        ExtractionOutcome::Failure {
            error: error.into(),
            error_type,
        }
    }

    pub fn missing_url() -> Self {
        Self::failure(ErrorType::MissingUrl, "No video URL provided")
    }
}

impl Serialize for ExtractionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionOutcome::Success(data) => {
                let mut state = serializer.serialize_struct("ExtractionOutcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            ExtractionOutcome::Failure { error, error_type } => {
                let mut state = serializer.serialize_struct("ExtractionOutcome", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.serialize_field("errorType", error_type)?;
                state.end()
            }
        }
    }
}

/// Resolves ids, calls the provider and shapes the outcome
pub struct TranscriptFetcher {
    provider: Box<dyn TranscriptProvider>,
}

impl TranscriptFetcher {
    pub fn new(provider: Box<dyn TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// Extract the transcript of a video.
    ///
    /// `preferred_languages` is accepted for interface compatibility but is
    /// not forwarded: the provider picks the track on its own. Provider
    /// failures never escape; they come back as a failure outcome.
    pub async fn fetch(&self, video_url_or_id: &str, preferred_languages: &[String]) -> ExtractionOutcome {
        let video_id = resolve_video_id(video_url_or_id);
        tracing::info!("Fetching transcript for video id: {}", video_id);
        tracing::debug!("Preferred languages (not applied): {:?}", preferred_languages);

        let segments = match self.provider.fetch(&video_id).await {
            Ok(segments) => segments,
            Err(err) => {
                let failure = err.to_string();
                let (error_type, error) = classify(&failure);
                tracing::warn!("Transcript fetch failed ({}): {}", error_type, failure);
                return ExtractionOutcome::failure(error_type, error);
            }
        };

        if segments.is_empty() {
            return ExtractionOutcome::failure(ErrorType::EmptyTranscript, "No transcript content found");
        }

        let items: Vec<TranscriptSegment> = segments.into_iter().map(TranscriptSegment::from).collect();
        let language = self.detect_language(&video_id).await;

        let result = TranscriptResult::from_segments(video_id, items, language);
        tracing::info!(
            "Extracted {} segments, {} words, {}",
            result.items.len(),
            result.word_count,
            format_duration(result.duration)
        );

        ExtractionOutcome::Success(result)
    }

    /// Substring heuristic over the rendered track listing, not real detection
    async fn detect_language(&self, video_id: &str) -> String {
        match self.provider.list(video_id).await {
            Ok(list) if list.to_string().contains("en") => "en".to_string(),
            Ok(_) => "unknown".to_string(),
            Err(err) => {
                tracing::debug!("Track listing failed, language unknown: {}", err);
                "unknown".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{track, MockTranscriptProvider, ProviderError, TranscriptList};

    fn raw(text: &str, start: f64, duration: Option<f64>) -> RawSegment {
        RawSegment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    fn english_list(video_id: &str) -> TranscriptList {
        TranscriptList {
            video_id: video_id.to_string(),
            manual: vec![track("en", "English", false)],
            ..Default::default()
        }
    }

    fn no_languages() -> Vec<String> {
        Vec::new()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().times(1).returning(|video_id| {
            assert_eq!(video_id, "dQw4w9WgXcQ");
            Ok(vec![raw("Hello", 0.0, Some(1.2)), raw("world", 1.2, Some(0.8))])
        });
        provider
            .expect_list()
            .times(1)
            .returning(|video_id| Ok(english_list(video_id)));

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30s", &no_languages())
            .await;

        match outcome {
            ExtractionOutcome::Success(result) => {
                assert_eq!(result.transcript, "Hello world");
                assert!((result.duration - 2.0).abs() < 1e-9);
                assert_eq!(result.word_count, 2);
                assert_eq!(result.language, "en");
                assert_eq!(result.video_id, "dQw4w9WgXcQ");
                assert_eq!(result.items.len(), 2);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_transcript() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().returning(|_| Ok(Vec::new()));
        provider.expect_list().times(0);

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = fetcher.fetch("abc123XYZ", &no_languages()).await;

        assert_eq!(
            outcome,
            ExtractionOutcome::failure(ErrorType::EmptyTranscript, "No transcript content found")
        );
    }

    #[tokio::test]
    async fn test_fetch_disabled_failure() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch().returning(|video_id| {
            Err(ProviderError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            })
        });

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = fetcher.fetch("abc123XYZ", &no_languages()).await;

        assert_eq!(
            outcome,
            ExtractionOutcome::failure(
                ErrorType::TranscriptsDisabled,
                "Transcripts are disabled for this video"
            )
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_failure() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .returning(|_| Err(ProviderError::Other("connection reset".to_string())));

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = fetcher.fetch("abc123XYZ", &no_languages()).await;

        assert_eq!(
            outcome,
            ExtractionOutcome::failure(
                ErrorType::UnknownError,
                "Error extracting transcript: connection reset"
            )
        );
    }

    #[tokio::test]
    async fn test_list_failure_is_swallowed() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .returning(|_| Ok(vec![raw("bonjour", 0.5, None)]));
        provider.expect_list().returning(|_| Err(ProviderError::IpBlocked));

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = fetcher.fetch("abc123XYZ", &["fr".to_string()]).await;

        match outcome {
            ExtractionOutcome::Success(result) => {
                assert_eq!(result.language, "unknown");
                assert_eq!(result.items[0].duration, 0.0);
                assert_eq!(result.duration, 0.5);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_language_unknown_without_en() {
        let mut provider = MockTranscriptProvider::new();
        provider
            .expect_fetch()
            .returning(|_| Ok(vec![raw("hallo welt", 0.0, Some(2.0))]));
        provider.expect_list().returning(|video_id| {
            Ok(TranscriptList {
                video_id: video_id.to_string(),
                manual: vec![track("de", "Deutsch", false)],
                ..Default::default()
            })
        });

        let fetcher = TranscriptFetcher::new(Box::new(provider));
        let outcome = tokio_test::block_on(fetcher.fetch("xyz987", &no_languages()));

        match outcome {
            ExtractionOutcome::Success(result) => {
                assert_eq!(result.language, "unknown");
                assert_eq!(result.word_count, 2);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_word_count_uses_any_whitespace() {
        let items = vec![
            TranscriptSegment {
                text: "one\ntwo".to_string(),
                start: 0.0,
                duration: 1.0,
            },
            TranscriptSegment {
                text: "  three ".to_string(),
                start: 1.0,
                duration: 1.5,
            },
        ];
        let result = TranscriptResult::from_segments("id".to_string(), items, "en".to_string());
        assert_eq!(result.transcript, "one\ntwo   three ");
        assert_eq!(result.word_count, 3);
        assert_eq!(result.duration, 2.5);
    }

    #[test]
    fn test_success_json_round_trip() {
        let items = vec![
            TranscriptSegment {
                text: "Grüße".to_string(),
                start: 0.0,
                duration: 1.0,
            },
            TranscriptSegment {
                text: "日本語".to_string(),
                start: 1.0,
                duration: 2.0,
            },
        ];
        let result = TranscriptResult::from_segments("id".to_string(), items, "unknown".to_string());
        let json = serde_json::to_string(&ExtractionOutcome::Success(result.clone())).unwrap();

        assert!(json.contains("Grüße"));
        assert!(json.contains("\"wordCount\":2"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["success"], true);
        let parsed: TranscriptResult = serde_json::from_value(value["data"].clone()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_failure_json_shape() {
        let json = serde_json::to_string(&ExtractionOutcome::missing_url()).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"error":"No video URL provided","errorType":"missing_url"}"#
        );
    }
}
