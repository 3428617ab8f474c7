use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::Endpoints,
    error::FetchError,
    fetched::Fetched,
    resolver::VideoId,
    types::Transcript,
};

/// Stand-in text analysed when no captions can be retrieved. Line breaks and
/// indentation are part of the prompt text.
pub const PLACEHOLDER_TRANSCRIPT: &str = concat!(
    "This video discusses important concepts and provides valuable insights on the topic. \n",
    "      The content covers various aspects including theoretical foundations, practical applications, \n",
    "      and real-world examples. Key points are explained in detail with supporting evidence and \n",
    "      clear explanations that help viewers understand complex ideas. The presentation includes \n",
    "      step-by-step guidance and actionable recommendations for implementation.",
);

#[derive(Debug, Deserialize)]
struct RelayResponse {
    contents: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    events: Option<Vec<CaptionEvent>>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    segs: Option<Vec<CaptionSegment>>,
}

#[derive(Debug, Deserialize)]
struct CaptionSegment {
    #[serde(default)]
    utf8: String,
}

pub fn placeholder_transcript() -> Transcript {
    Transcript::new(PLACEHOLDER_TRANSCRIPT)
}

/// Fetch English captions through the relay; any failure degrades to the placeholder
pub async fn fetch_transcript(
    http: &reqwest::Client,
    endpoints: &Endpoints,
    id: &VideoId,
) -> Fetched<Transcript> {
    match lookup(http, endpoints, id).await {
        Ok(transcript) => Fetched::Live(transcript),
        Err(e) => {
            warn!(video_id = %id, error = %e, "transcript lookup failed, using placeholder");
            Fetched::degraded(placeholder_transcript(), e.to_string())
        }
    }
}

pub fn captions_url(endpoints: &Endpoints, id: &VideoId) -> String {
    format!("{}?v={}&lang=en&fmt=json3", endpoints.captions_url, id)
}

async fn lookup(
    http: &reqwest::Client,
    endpoints: &Endpoints,
    id: &VideoId,
) -> Result<Transcript, FetchError> {
    let target = captions_url(endpoints, id);
    debug!(video_id = %id, relay = %endpoints.relay_url, %target, "requesting captions");

    let response = http
        .get(&endpoints.relay_url)
        .query(&[("url", target.as_str())])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response.text().await?;
    let relay: RelayResponse = serde_json::from_str(&body)?;
    let contents = relay
        .contents
        .filter(|c| !c.is_empty())
        .ok_or(FetchError::EmptyContents)?;

    Ok(Transcript::new(flatten_captions(&contents)?))
}

/// Join every segment of every event into one whitespace-normalized line
pub fn flatten_captions(contents: &str) -> Result<String, FetchError> {
    let track: CaptionTrack = serde_json::from_str(contents)?;
    let events = track.events.ok_or(FetchError::MissingEvents)?;

    let joined = events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .map(|segs| segs.iter().map(|seg| seg.utf8.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(joined.split_whitespace().collect::<Vec<_>>().join(" "))
}
