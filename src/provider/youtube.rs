use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::{timedtext, CaptionTrack, ProviderError, RawSegment, TranscriptList, TranscriptProvider, TranslationLanguage};
use crate::config::ProviderConfig;

const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
const BOT_DETECTED_REASON: &str = "Sign in to confirm you\u{2019}re not a bot";
const AGE_RESTRICTED_REASON: &str = "This video may be inappropriate for some users.";
const VIDEO_UNAVAILABLE_REASON: &str = "This video is unavailable";

fn api_key_regex() -> &'static Regex {
    static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    API_KEY_REGEX.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Failed to compile API key regex")
    })
}

fn consent_value_regex() -> &'static Regex {
    static CONSENT_VALUE_REGEX: OnceLock<Regex> = OnceLock::new();
    CONSENT_VALUE_REGEX.get_or_init(|| {
        Regex::new(r#"name="v" value="(.*?)""#).expect("Failed to compile consent value regex")
    })
}

/// Transcript provider backed by YouTube's watch page and innertube API
pub struct YoutubeProvider {
    client: Client,
    config: ProviderConfig,
}

impl YoutubeProvider {
    pub fn new(config: ProviderConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn watch_url(&self, video_id: &str) -> String {
        format!("{}/watch?v={}", self.base_url(), urlencoding::encode(video_id))
    }

    /// Fetch the watch page, passing the EU consent interstitial if shown
    async fn fetch_video_html(&self, video_id: &str) -> Result<String, ProviderError> {
        let url = self.watch_url(video_id);
        let html = self.get_text(&url, None).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::debug!("Consent page served for {}, retrying with consent cookie", video_id);
        let value = consent_value_regex()
            .captures(&html)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| ProviderError::FailedToCreateConsentCookie {
                video_id: video_id.to_string(),
            })?;

        let cookie = format!("CONSENT=YES+{}", value);
        let html = self.get_text(&url, Some(&cookie)).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(ProviderError::FailedToCreateConsentCookie {
                video_id: video_id.to_string(),
            });
        }

        Ok(html)
    }

    async fn get_text(&self, url: &str, cookie: Option<&str>) -> Result<String, ProviderError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, self.config.accept_language.as_str());
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = check_status(request.send().await?, url)?;
        Ok(response.text().await?)
    }

    async fn fetch_player_response(&self, video_id: &str, api_key: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url(), api_key);
        let body = json!({
            "context": {
                "client": {
                    "clientName": self.config.innertube_client_name,
                    "clientVersion": self.config.innertube_client_version,
                }
            },
            "videoId": video_id,
        });

        tracing::debug!("Requesting player data for {}", video_id);
        let response = self
            .client
            .post(&url)
            .header(ACCEPT_LANGUAGE, self.config.accept_language.as_str())
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response, &url)?.json::<Value>().await?)
    }

    async fn fetch_transcript_list(&self, video_id: &str) -> Result<TranscriptList, ProviderError> {
        let html = self.fetch_video_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;
        check_playability(&player, video_id)?;
        parse_transcript_list(&player, video_id)
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeProvider {
    async fn fetch(&self, video_id: &str) -> Result<Vec<RawSegment>, ProviderError> {
        let list = self.fetch_transcript_list(video_id).await?;

        let language = self.config.transcript_language.as_str();
        let track = list
            .find_transcript(&[language])
            .ok_or_else(|| ProviderError::NoTranscriptFound {
                video_id: video_id.to_string(),
                requested: vec![language.to_string()],
            })?;

        tracing::info!(
            "Fetching {} transcript track {} for {}",
            if track.is_generated { "generated" } else { "manual" },
            track.language_code,
            video_id
        );

        let xml = self.get_text(&track.base_url, None).await?;
        timedtext::parse_timedtext(&xml)
    }

    async fn list(&self, video_id: &str) -> Result<TranscriptList, ProviderError> {
        self.fetch_transcript_list(video_id).await
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, ProviderError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::IpBlocked);
    }
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

/// Pull the innertube API key out of a watch page
pub fn extract_api_key(html: &str, video_id: &str) -> Result<String, ProviderError> {
    if let Some(caps) = api_key_regex().captures(html) {
        return Ok(caps[1].to_string());
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(ProviderError::IpBlocked);
    }

    Err(ProviderError::YouTubeDataUnparsable(format!(
        "no innertube API key on the watch page of {}",
        video_id
    )))
}

/// Map a non-OK playability status to the matching failure
pub fn check_playability(player: &Value, video_id: &str) -> Result<(), ProviderError> {
    let playability = &player["playabilityStatus"];
    let status = match playability["status"].as_str() {
        None | Some("OK") => return Ok(()),
        Some(status) => status,
    };
    let reason = playability["reason"].as_str().unwrap_or_default();

    if status == "LOGIN_REQUIRED" {
        if reason == BOT_DETECTED_REASON {
            return Err(ProviderError::RequestBlocked {
                video_id: video_id.to_string(),
            });
        }
        if reason == AGE_RESTRICTED_REASON {
            return Err(ProviderError::AgeRestricted {
                video_id: video_id.to_string(),
            });
        }
    }

    if status == "ERROR" && reason == VIDEO_UNAVAILABLE_REASON {
        if video_id.starts_with("http://") || video_id.starts_with("https://") {
            return Err(ProviderError::InvalidVideoId {
                video_id: video_id.to_string(),
            });
        }
        return Err(ProviderError::VideoUnavailable {
            video_id: video_id.to_string(),
        });
    }

    let sub_reasons = playability["errorScreen"]["playerErrorMessageRenderer"]["subreason"]["runs"]
        .as_array()
        .map(|runs| {
            runs.iter()
                .map(|run| run["text"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    Err(ProviderError::VideoUnplayable {
        video_id: video_id.to_string(),
        reason: reason.to_string(),
        sub_reasons,
    })
}

fn text_of(value: &Value) -> Option<String> {
    value["simpleText"]
        .as_str()
        .or_else(|| value["runs"][0]["text"].as_str())
        .map(|s| s.to_string())
}

/// Build the track list from a player response
pub fn parse_transcript_list(player: &Value, video_id: &str) -> Result<TranscriptList, ProviderError> {
    let captions = &player["captions"]["playerCaptionsTracklistRenderer"];
    let tracks = captions["captionTracks"]
        .as_array()
        .ok_or_else(|| ProviderError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        })?;

    let mut list = TranscriptList {
        video_id: video_id.to_string(),
        ..Default::default()
    };

    for caption in tracks {
        let language_code = caption["languageCode"]
            .as_str()
            .ok_or_else(|| ProviderError::YouTubeDataUnparsable("caption track without languageCode".to_string()))?;
        let base_url = caption["baseUrl"]
            .as_str()
            .ok_or_else(|| ProviderError::YouTubeDataUnparsable("caption track without baseUrl".to_string()))?;

        let track = CaptionTrack {
            language_code: language_code.to_string(),
            language: text_of(&caption["name"]).unwrap_or_else(|| language_code.to_string()),
            is_generated: caption["kind"].as_str() == Some("asr"),
            is_translatable: caption["isTranslatable"].as_bool().unwrap_or(false),
            base_url: base_url.replace("&fmt=srv3", ""),
        };

        if track.is_generated {
            list.generated.push(track);
        } else {
            list.manual.push(track);
        }
    }

    if let Some(languages) = captions["translationLanguages"].as_array() {
        list.translation_languages = languages
            .iter()
            .filter_map(|language| {
                Some(TranslationLanguage {
                    language_code: language["languageCode"].as_str()?.to_string(),
                    language: text_of(&language["languageName"])?,
                })
            })
            .collect();
    }

    Ok(list)
}
