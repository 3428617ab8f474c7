use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{KonspektError, Result},
    types::Timestamp,
};

pub const VIDEO_ID_LEN: usize = 11;

// Group 7 holds the token for every accepted shape: youtu.be/, v/, /u/x/, embed/, watch?v=
static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*((youtu.be/)|(v/)|(/u/\w/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*")
        .expect("video url pattern is valid")
});

/// 11-character video token, obtainable through [`resolve_video_id`] or a
/// deserialized string of the right length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct VideoId(String);

impl TryFrom<String> for VideoId {
    type Error = KonspektError;

    fn try_from(token: String) -> Result<Self> {
        if token.chars().count() != VIDEO_ID_LEN {
            return Err(KonspektError::InvalidUrl { url: token });
        }
        Ok(VideoId(token))
    }
}

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Watch link that starts playback at `stamp`, e.g. `&t=3m30s`
    pub fn watch_url_at(&self, stamp: &Timestamp) -> String {
        format!("{}&t={}s", self.watch_url(), stamp.time.replacen(':', "m", 1))
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video identifier from any accepted URL shape
pub fn resolve_video_id(url: &str) -> Result<VideoId> {
    let invalid = || KonspektError::InvalidUrl {
        url: url.to_string(),
    };

    if url.trim().is_empty() {
        return Err(invalid());
    }

    let token = VIDEO_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(7))
        .map(|m| m.as_str())
        .ok_or_else(invalid)?;

    if token.chars().count() != VIDEO_ID_LEN {
        return Err(invalid());
    }

    Ok(VideoId(token.to_string()))
}

pub fn is_valid_video_url(url: &str) -> bool {
    resolve_video_id(url).is_ok()
}
