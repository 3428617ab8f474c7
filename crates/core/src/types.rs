use serde::{Deserialize, Serialize};

use crate::{
    fetched::{Fetched, Provenance},
    resolver::VideoId,
    timestamps::synthesize_timestamps,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Normalized reply of the generative service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub detailed_notes: DetailedNotes,
    pub action_items: Vec<String>,
    #[serde(default)]
    pub study_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedNotes {
    pub introduction: String,
    pub main_concepts: Vec<MainConcept>,
    pub practical_applications: Vec<String>,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainConcept {
    pub topic: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub time: String,
    pub topic: String,
}

/// Everything one successful run produced. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,
    #[serde(flatten)]
    pub payload: AnalysisPayload,
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub metadata_provenance: Provenance,
    #[serde(default)]
    pub transcript_provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Insights,
    Notes,
    Actions,
    Topics,
    Timestamps,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Summary,
        Section::Insights,
        Section::Notes,
        Section::Actions,
        Section::Topics,
        Section::Timestamps,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Insights => "Key Insights",
            Section::Notes => "Detailed Notes",
            Section::Actions => "Action Items",
            Section::Topics => "Study Topics",
            Section::Timestamps => "Timestamps",
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        match name.trim().to_ascii_lowercase().as_str() {
            "summary" => Some(Section::Summary),
            "insights" => Some(Section::Insights),
            "notes" => Some(Section::Notes),
            "actions" => Some(Section::Actions),
            "topics" => Some(Section::Topics),
            "timestamps" => Some(Section::Timestamps),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SectionView<'a> {
    Summary(&'a str),
    Insights(&'a [String]),
    Notes(&'a DetailedNotes),
    Actions(&'a [String]),
    Topics(&'a [String]),
    Timestamps {
        video_id: &'a VideoId,
        stamps: &'a [Timestamp],
    },
}

impl AnalysisResult {
    /// Combine the stage outputs, deriving timestamps from the main concepts.
    pub fn assemble(
        video_id: VideoId,
        metadata: Fetched<VideoMetadata>,
        transcript_provenance: Provenance,
        payload: AnalysisPayload,
    ) -> Self {
        let timestamps = synthesize_timestamps(&payload.detailed_notes.main_concepts);
        let (metadata, metadata_provenance) = metadata.into_parts();
        Self {
            video_id,
            metadata,
            payload,
            timestamps,
            metadata_provenance,
            transcript_provenance,
        }
    }

    pub fn section(&self, section: Section) -> SectionView<'_> {
        match section {
            Section::Summary => SectionView::Summary(&self.payload.summary),
            Section::Insights => SectionView::Insights(&self.payload.key_insights),
            Section::Notes => SectionView::Notes(&self.payload.detailed_notes),
            Section::Actions => SectionView::Actions(&self.payload.action_items),
            Section::Topics => SectionView::Topics(&self.payload.study_topics),
            Section::Timestamps => SectionView::Timestamps {
                video_id: &self.video_id,
                stamps: &self.timestamps,
            },
        }
    }

    /// True when either lookup fell back to synthesized data.
    pub fn is_degraded(&self) -> bool {
        self.metadata_provenance.is_degraded() || self.transcript_provenance.is_degraded()
    }
}
