use std::sync::Arc;

use tracing::{Instrument, info, info_span};

use crate::{
    config::Endpoints,
    error::Result,
    metadata::fetch_metadata,
    provider::TextGenerator,
    resolver::resolve_video_id,
    structuring::analyze,
    transcript::fetch_transcript,
    types::AnalysisResult,
};

/// Progress of a single analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Resolving,
    FetchingMetadata,
    FetchingTranscript,
    Structuring,
    Synthesizing,
    Ready,
    Failed,
}

impl Stage {
    /// Working stages in the order a run passes through them
    pub const STEPS: [Stage; 5] = [
        Stage::Resolving,
        Stage::FetchingMetadata,
        Stage::FetchingTranscript,
        Stage::Structuring,
        Stage::Synthesizing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Idle => "",
            Stage::Resolving => "Validating video URL...",
            Stage::FetchingMetadata => "Fetching video information...",
            Stage::FetchingTranscript => "Fetching video transcript...",
            Stage::Structuring => "AI is analyzing the content...",
            Stage::Synthesizing => "Generating timestamps...",
            Stage::Ready => "Analysis complete",
            Stage::Failed => "Analysis failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Ready | Stage::Failed)
    }
}

pub struct Pipeline {
    http: reqwest::Client,
    endpoints: Endpoints,
    generator: Arc<dyn TextGenerator>,
}

impl Pipeline {
    pub fn new(
        http: reqwest::Client,
        endpoints: Endpoints,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            http,
            endpoints,
            generator,
        }
    }

    /// Run every stage in order.
    ///
    /// `on_stage` is called before each stage starts and once more with
    /// `Ready` or `Failed`. Only resolving and structuring can fail; the two
    /// lookups always advance with live or fallback data.
    pub async fn run(
        &self,
        url: &str,
        mut on_stage: impl FnMut(Stage) + Send,
    ) -> Result<AnalysisResult> {
        let outcome = self.run_stages(url, &mut on_stage).await;
        on_stage(if outcome.is_ok() {
            Stage::Ready
        } else {
            Stage::Failed
        });
        outcome
    }

    async fn run_stages(
        &self,
        url: &str,
        on_stage: &mut (impl FnMut(Stage) + Send),
    ) -> Result<AnalysisResult> {
        on_stage(Stage::Resolving);
        let id = resolve_video_id(url)?;

        let span = info_span!("analysis", video_id = %id);
        async move {
            on_stage(Stage::FetchingMetadata);
            let metadata = fetch_metadata(&self.http, &self.endpoints, &id).await;

            on_stage(Stage::FetchingTranscript);
            let (transcript, transcript_provenance) =
                fetch_transcript(&self.http, &self.endpoints, &id)
                    .await
                    .into_parts();

            on_stage(Stage::Structuring);
            let payload = analyze(self.generator.as_ref(), &transcript, metadata.value()).await?;

            on_stage(Stage::Synthesizing);
            let result =
                AnalysisResult::assemble(id, metadata, transcript_provenance, payload);

            info!(
                title = %result.metadata.title,
                concepts = result.timestamps.len(),
                degraded = result.is_degraded(),
                "analysis ready"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
