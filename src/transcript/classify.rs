use super::ErrorType;

struct Rule {
    marker: &'static str,
    lowercase: &'static str,
    error_type: ErrorType,
    message: &'static str,
}

/// Ordered classification table, first match wins.
///
/// Provider wording lives here and nowhere else.
const RULES: &[Rule] = &[
    Rule {
        marker: "TranscriptsDisabled",
        lowercase: "disabled",
        error_type: ErrorType::TranscriptsDisabled,
        message: "Transcripts are disabled for this video",
    },
    Rule {
        marker: "VideoUnavailable",
        lowercase: "unavailable",
        error_type: ErrorType::VideoUnavailable,
        message: "Video is unavailable (private, deleted, or region-locked)",
    },
    Rule {
        marker: "NoTranscriptFound",
        lowercase: "no transcript",
        error_type: ErrorType::NoTranscriptFound,
        message: "No transcript found for this video",
    },
];

/// Classify a provider failure by its text into an error kind and message
pub fn classify(failure: &str) -> (ErrorType, String) {
    let lowered = failure.to_lowercase();

    RULES
        .iter()
        .find(|rule| failure.contains(rule.marker) || lowered.contains(rule.lowercase))
        .map(|rule| (rule.error_type, rule.message.to_string()))
        .unwrap_or_else(|| {
            (
                ErrorType::UnknownError,
                format!("Error extracting transcript: {}", failure),
            )
        })
}
