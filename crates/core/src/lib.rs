//! Konspekt Core Library
//!
//! Turns a YouTube link into structured study notes: resolves the video id,
//! gathers metadata and captions (falling back to synthesized values when a
//! lookup fails), asks a generative model for a fixed-schema analysis and
//! renders the result as a markdown notes document.

pub mod config;
pub mod error;
pub mod export;
pub mod fetched;
pub mod format;
pub mod metadata;
pub mod pipeline;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod structuring;
pub mod timestamps;
pub mod transcript;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{Endpoints, http_client};
pub use error::{KonspektError, Result};
pub use export::{
    default_export_dir, load_result_json, notes_filename, save_notes, save_result_json,
};
pub use fetched::{Fetched, Provenance};
pub use format::{format_notes_markdown, format_section};
pub use metadata::{fallback_metadata, fetch_metadata};
pub use pipeline::{Pipeline, Stage};
pub use provider::{ChatCompletionsClient, Provider, ProviderConfig, ProviderError, TextGenerator};
pub use resolver::{VideoId, is_valid_video_url, resolve_video_id};
pub use session::{AnalysisSession, RunId, SessionSnapshot};
pub use structuring::{analyze, build_prompt, extract_payload};
pub use timestamps::{synthesize_timestamps, synthetic_time};
pub use transcript::{PLACEHOLDER_TRANSCRIPT, fetch_transcript, placeholder_transcript};
pub use types::{
    AnalysisPayload, AnalysisResult, DetailedNotes, MainConcept, Section, SectionView, Timestamp,
    Transcript, VideoMetadata,
};
