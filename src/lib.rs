//! yt-transcript - extract YouTube caption transcripts as structured JSON
//!
//! The pipeline resolves a video id from a URL, asks a [`TranscriptProvider`]
//! for the caption segments, and shapes the result into an
//! [`ExtractionOutcome`] that is either a transcript or a categorized error.

pub mod cli;
pub mod config;
pub mod output;
pub mod provider;
pub mod resolver;
pub mod transcript;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use provider::{ProviderError, TranscriptProvider, YoutubeProvider};
pub use resolver::resolve_video_id;
pub use transcript::{ErrorType, ExtractionOutcome, TranscriptFetcher, TranscriptResult, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
