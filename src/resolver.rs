use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::types::QualityTier;

const SEARCH_ENDPOINT: &str = "https://api.tidal.com/v1/search";
const API_TOKEN: &str = "CzET4vdadNUFQ5JU";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Why a lookup produced no metadata. The synchronizer treats every variant
/// the same way (track stays unresolved, no retry); the split exists for
/// logging.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search returned status {0}")]
    Status(u16),
    #[error("malformed search response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no matching track in search results")]
    NoMatch,
}

/// Authoritative metadata for one accepted catalog candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub id: String,
    pub duration_seconds: u64,
    pub track_number: u32,
    pub volume_number: u32,
    pub quality: QualityTier,
}

/// Seam between the synchronizer and the catalog search.
pub trait TrackResolver {
    fn resolve(&self, title: &str, artist: &str) -> Result<ResolvedMetadata, ResolveError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(rename = "totalNumberOfItems")]
    total_number_of_items: u64,
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: u64,
    title: String,
    #[serde(rename = "audioQuality")]
    audio_quality: String,
    #[serde(rename = "trackNumber")]
    track_number: u32,
    #[serde(rename = "volumeNumber")]
    volume_number: u32,
    duration: u64,
}

/// Percent-encode per RFC 3986: unreserved characters (ALPHA / DIGIT / `-`
/// `_` `.` `~`) pass through, every other byte becomes uppercase-hex `%XX`.
pub fn url_encode(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                escaped.push(byte as char);
            }
            _ => escaped.push_str(&format!("%{:02X}", byte)),
        }
    }
    escaped
}

/// Resolves observed (title, artist) text against the TIDAL search API.
pub struct MetadataResolver {
    client: reqwest::blocking::Client,
    country_code: String,
}

impl MetadataResolver {
    pub fn new(country_code: String) -> Result<Self, ResolveError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            country_code,
        })
    }
}

impl TrackResolver for MetadataResolver {
    fn resolve(&self, title: &str, artist: &str) -> Result<ResolvedMetadata, ResolveError> {
        // Collaborator suffixes ("feat. ..." after an '&') hurt the match
        // rate, so only the leading artist goes into the query.
        let artist_prefix = artist.split('&').next().unwrap_or(artist);
        let query = format!("{} - {}", title, artist_prefix);

        let url = format!(
            "{}?query={}&limit=50&offset=0&types=TRACKS&countryCode={}",
            SEARCH_ENDPOINT,
            url_encode(&query),
            self.country_code
        );
        log::debug!("Querying {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-tidal-token", API_TOKEN)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        log::debug!(
            "Search returned {} items ({} total)",
            parsed.tracks.items.len(),
            parsed.tracks.total_number_of_items
        );

        select_candidate(title, parsed.tracks.items.into_iter()).ok_or(ResolveError::NoMatch)
    }
}

/// Walk candidates in API order and keep a running best.
///
/// Only candidates whose title string-equals the observed title are eligible.
/// The first eligible candidate is accepted as a baseline; a later eligible
/// candidate replaces it only while the best has no runtime recorded or the
/// candidate is itself hi-quality. Scanning stops as soon as a hi-quality
/// candidate is accepted, so entries after it are never inspected.
fn select_candidate<I>(observed_title: &str, items: I) -> Option<ResolvedMetadata>
where
    I: Iterator<Item = TrackItem>,
{
    let mut best: Option<ResolvedMetadata> = None;

    for item in items {
        if item.title != observed_title {
            continue;
        }

        let no_runtime_yet = best
            .as_ref()
            .map(|b| b.duration_seconds == 0)
            .unwrap_or(true);
        let quality = QualityTier::from_api(&item.audio_quality);

        if no_runtime_yet || quality.is_high_quality() {
            best = Some(ResolvedMetadata {
                id: item.id.to_string(),
                duration_seconds: item.duration,
                track_number: item.track_number,
                volume_number: item.volume_number,
                quality,
            });
            if quality.is_high_quality() {
                break;
            }
        }
    }

    best
}
