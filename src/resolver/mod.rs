use regex::Regex;
use std::sync::OnceLock;

/// Patterns tried in order; the first capture wins.
fn id_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("Failed to compile video id regex"),
            Regex::new(r"youtube\.com/watch\?.*v=([^&\n?#]+)")
                .expect("Failed to compile watch query regex"),
        ]
    })
}

/// Resolve a YouTube video identifier from a URL or bare id.
///
/// Inputs that match none of the known URL shapes are returned unchanged and
/// treated as an identifier by the provider.
pub fn resolve_video_id(input: &str) -> String {
    for pattern in id_patterns() {
        if let Some(id) = pattern.captures(input).and_then(|caps| caps.get(1)) {
            return id.as_str().to_string();
        }
    }

    tracing::debug!("No URL pattern matched, using input as video id: {}", input);
    input.to_string()
}
