use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod timedtext;
pub mod youtube;

pub use youtube::YoutubeProvider;

/// A caption unit exactly as the provider reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds, when the provider supplies one
    pub duration: Option<f64>,
}

/// One caption track offered for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,

    /// Human readable language name
    pub language: String,

    /// Auto-generated (ASR) track
    pub is_generated: bool,

    pub is_translatable: bool,

    /// Timed text endpoint for this track
    pub base_url: String,
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)?;
        if self.is_translatable {
            write!(f, "[TRANSLATABLE]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language_code: String,
    pub language: String,
}

/// Caption tracks available for a video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptList {
    pub video_id: String,
    pub manual: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
    pub translation_languages: Vec<TranslationLanguage>,
}

impl TranscriptList {
    /// Find the first track matching the given codes in order of preference.
    /// Manually created tracks win over generated ones for the same code.
    pub fn find_transcript(&self, language_codes: &[&str]) -> Option<&CaptionTrack> {
        language_codes.iter().find_map(|code| {
            self.manual
                .iter()
                .chain(self.generated.iter())
                .find(|track| track.language_code == *code)
        })
    }
}

fn write_section<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "None");
    }
    for item in items {
        writeln!(f, " - {}", item)?;
    }
    Ok(())
}

impl fmt::Display for TranslationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)
    }
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "For this video ({}) transcripts are available in the following languages:",
            self.video_id
        )?;
        writeln!(f)?;
        writeln!(f, "(MANUALLY CREATED)")?;
        write_section(f, &self.manual)?;
        writeln!(f)?;
        writeln!(f, "(GENERATED)")?;
        write_section(f, &self.generated)?;
        writeln!(f)?;
        writeln!(f, "(TRANSLATION LANGUAGES)")?;
        write_section(f, &self.translation_languages)
    }
}

/// Failures raised by a transcript provider.
///
/// Every message starts with the failure name; callers classify failures by
/// their text, so wording changes here change the reported error kind.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("TranscriptsDisabled: subtitles are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("VideoUnavailable: video {video_id} is no longer available")]
    VideoUnavailable { video_id: String },

    #[error("NoTranscriptFound: no transcripts were found for video {video_id} in any of the requested languages {requested:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
    },

    #[error("InvalidVideoId: \"{video_id}\" looks like a URL, expected a bare video id")]
    InvalidVideoId { video_id: String },

    #[error("RequestBlocked: YouTube is asking to confirm this client is not a bot")]
    RequestBlocked { video_id: String },

    #[error("IpBlocked: YouTube is rejecting requests from this IP address")]
    IpBlocked,

    #[error("AgeRestricted: video {video_id} is age restricted and requires sign-in")]
    AgeRestricted { video_id: String },

    #[error("VideoUnplayable: video {video_id} is unplayable: {reason}{}", format_sub_reasons(.sub_reasons))]
    VideoUnplayable {
        video_id: String,
        reason: String,
        sub_reasons: Vec<String>,
    },

    #[error("FailedToCreateConsentCookie: could not get past the consent page for video {video_id}")]
    FailedToCreateConsentCookie { video_id: String },

    #[error("YouTubeDataUnparsable: {0}")]
    YouTubeDataUnparsable(String),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

fn format_sub_reasons(sub_reasons: &[String]) -> String {
    if sub_reasons.is_empty() {
        String::new()
    } else {
        format!(" ({})", sub_reasons.join("; "))
    }
}

/// Source of caption data for a video id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the ordered caption segments of the provider's chosen track
    async fn fetch(&self, video_id: &str) -> Result<Vec<RawSegment>, ProviderError>;

    /// List the caption tracks available for a video
    async fn list(&self, video_id: &str) -> Result<TranscriptList, ProviderError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub(crate) fn track(code: &str, name: &str, generated: bool) -> CaptionTrack {
    CaptionTrack {
        language_code: code.to_string(),
        language: name.to_string(),
        is_generated: generated,
        is_translatable: false,
        base_url: format!("https://example.test/timedtext?lang={}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> TranscriptList {
        TranscriptList {
            video_id: "abc123XYZ".to_string(),
            manual: vec![track("de", "German", false)],
            generated: vec![track("en", "English (auto-generated)", true), track("de", "German (auto-generated)", true)],
            translation_languages: vec![TranslationLanguage {
                language_code: "fr".to_string(),
                language: "French".to_string(),
            }],
        }
    }

    #[test]
    fn test_find_transcript_prefers_manual() {
        let list = sample_list();
        let found = list.find_transcript(&["de"]).unwrap();
        assert!(!found.is_generated);
    }

    #[test]
    fn test_find_transcript_follows_code_order() {
        let list = sample_list();
        let found = list.find_transcript(&["ja", "en", "de"]).unwrap();
        assert_eq!(found.language_code, "en");
        assert!(list.find_transcript(&["ja"]).is_none());
    }

    #[test]
    fn test_list_display() {
        let rendered = sample_list().to_string();
        assert!(rendered.starts_with("For this video (abc123XYZ) transcripts are available"));
        assert!(rendered.contains("(MANUALLY CREATED)\n - de (\"German\")\n"));
        assert!(rendered.contains(" - en (\"English (auto-generated)\")"));
        assert!(rendered.contains("(TRANSLATION LANGUAGES)\n - fr (\"French\")\n"));
    }

    #[test]
    fn test_empty_list_display() {
        let list = TranscriptList {
            video_id: "xyz".to_string(),
            ..Default::default()
        };
        let rendered = list.to_string();
        assert!(list.find_transcript(&["en"]).is_none());
        assert_eq!(rendered.matches("None").count(), 3);
        assert!(!rendered.contains("en"));
    }

    #[test]
    fn test_error_messages_lead_with_name() {
        let err = ProviderError::TranscriptsDisabled {
            video_id: "abc".to_string(),
        };
        assert!(err.to_string().starts_with("TranscriptsDisabled"));

        let err = ProviderError::VideoUnplayable {
            video_id: "abc".to_string(),
            reason: "Video unavailable".to_string(),
            sub_reasons: vec!["This video is private".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "VideoUnplayable: video abc is unplayable: Video unavailable (This video is private)"
        );
    }
}
