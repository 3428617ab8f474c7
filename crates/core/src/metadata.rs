use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::Endpoints,
    error::FetchError,
    fetched::Fetched,
    resolver::VideoId,
    types::VideoMetadata,
};

pub const FALLBACK_TITLE: &str = "YouTube Video";
pub const FALLBACK_CHANNEL: &str = "Unknown Channel";
/// The embed service never reports a duration.
pub const UNKNOWN_DURATION: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
    author_name: String,
    thumbnail_url: String,
}

pub fn fallback_metadata(id: &VideoId) -> VideoMetadata {
    VideoMetadata {
        title: FALLBACK_TITLE.to_string(),
        channel: FALLBACK_CHANNEL.to_string(),
        thumbnail_url: id.thumbnail_url(),
        duration: UNKNOWN_DURATION.to_string(),
    }
}

/// Look up display metadata; any failure degrades to [`fallback_metadata`]
pub async fn fetch_metadata(
    http: &reqwest::Client,
    endpoints: &Endpoints,
    id: &VideoId,
) -> Fetched<VideoMetadata> {
    match lookup(http, endpoints, id).await {
        Ok(metadata) => Fetched::Live(metadata),
        Err(e) => {
            warn!(video_id = %id, error = %e, "metadata lookup failed, using fallback");
            Fetched::degraded(fallback_metadata(id), e.to_string())
        }
    }
}

async fn lookup(
    http: &reqwest::Client,
    endpoints: &Endpoints,
    id: &VideoId,
) -> Result<VideoMetadata, FetchError> {
    debug!(video_id = %id, url = %endpoints.oembed_url, "requesting oEmbed metadata");

    let response = http
        .get(&endpoints.oembed_url)
        .query(&[("url", id.watch_url().as_str()), ("format", "json")])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response.text().await?;
    let oembed: OembedResponse = serde_json::from_str(&body)?;

    Ok(VideoMetadata {
        title: oembed.title,
        channel: oembed.author_name,
        thumbnail_url: oembed.thumbnail_url,
        duration: UNKNOWN_DURATION.to_string(),
    })
}
