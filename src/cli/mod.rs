use clap::Parser;
use std::path::PathBuf;

/// Options go before the video argument; positionals accept values
/// starting with `-` since video ids may begin with one.
#[derive(Parser, Debug)]
#[command(
    name = "yt-transcript",
    about = "Extract the transcript of a YouTube video as JSON",
    version,
    long_about = "Fetches the caption track of a YouTube video and prints a single JSON object with the transcript text, timed segments and metadata, or a categorized error."
)]
pub struct Cli {
    /// YouTube URL (watch, youtu.be, embed) or bare video id
    #[arg(value_name = "VIDEO_URL_OR_ID", allow_hyphen_values = true)]
    pub video: Option<String>,

    /// Comma separated language preferences (accepted but not applied to track selection)
    #[arg(value_name = "LANGUAGES", allow_hyphen_values = true)]
    pub languages: Option<String>,

    /// Anything after the language list is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Configuration file (YAML)
    #[arg(long, value_name = "FILE", env = "YT_TRANSCRIPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the YouTube base URL
    #[arg(long, value_name = "URL", env = "YT_TRANSCRIPT_BASE_URL")]
    pub base_url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
