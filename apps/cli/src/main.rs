use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use konspekt_core::{
    AnalysisResult, AnalysisSession, ChatCompletionsClient, Endpoints, Pipeline, Provider,
    Section, Stage,
    config::{DEFAULT_CAPTIONS_URL, DEFAULT_OEMBED_URL, DEFAULT_RELAY_URL},
    default_export_dir, format_section, http_client, load_result_json, resolve_video_id,
    save_notes, save_result_json,
};

mod browse;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliSection {
    Summary,
    Insights,
    Notes,
    Actions,
    Topics,
    Timestamps,
}

impl From<CliSection> for Section {
    fn from(cli: CliSection) -> Self {
        match cli {
            CliSection::Summary => Section::Summary,
            CliSection::Insights => Section::Insights,
            CliSection::Notes => Section::Notes,
            CliSection::Actions => Section::Actions,
            CliSection::Topics => Section::Topics,
            CliSection::Timestamps => Section::Timestamps,
        }
    }
}

#[derive(Parser)]
#[command(name = "konspekt")]
#[command(about = "Turn YouTube videos into AI-generated study notes")]
struct Cli {
    /// Video URL
    #[arg(required_unless_present = "from_json")]
    url: Option<String>,

    /// Reopen a result saved with --json instead of analysing a video
    #[arg(long, conflicts_with = "url")]
    from_json: Option<PathBuf>,

    /// AI provider for the analysis
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Override the provider's default model
    #[arg(short, long)]
    model: Option<String>,

    /// Override the provider's chat-completions URL
    #[arg(long, env = "KONSPEKT_API_URL")]
    api_url: Option<String>,

    /// Sections to print (repeatable). Prints all when omitted.
    #[arg(short, long = "section", value_enum)]
    sections: Vec<CliSection>,

    /// Browse sections interactively after the analysis
    #[arg(short, long)]
    interactive: bool,

    /// Write the notes document as markdown
    #[arg(short, long)]
    export: bool,

    /// Directory for exported notes. Defaults to the download directory.
    #[arg(short, long, env = "KONSPEKT_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Also save the full result as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Show diagnostic logs on stderr
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, env = "KONSPEKT_OEMBED_URL", default_value = DEFAULT_OEMBED_URL, hide = true)]
    oembed_url: String,

    #[arg(long, env = "KONSPEKT_RELAY_URL", default_value = DEFAULT_RELAY_URL, hide = true)]
    relay_url: String,

    #[arg(long, env = "KONSPEKT_CAPTIONS_URL", default_value = DEFAULT_CAPTIONS_URL, hide = true)]
    captions_url: String,
}

fn init_tracing(verbose: bool) {
    // Fallback and fetch diagnostics stay out of the user's way unless asked for
    let default_filter = if verbose {
        "konspekt=debug,konspekt_core=debug,warn"
    } else {
        "konspekt=warn,konspekt_core=off"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn completed_label(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Resolving => Some("URL validated"),
        Stage::FetchingMetadata => Some("Video information fetched"),
        Stage::FetchingTranscript => Some("Transcript fetched"),
        Stage::Structuring => Some("AI analysis complete"),
        Stage::Synthesizing => Some("Timestamps generated"),
        _ => None,
    }
}

/// Steps finished when a run moves from `from` to `to`. Polling can skip
/// stages, so this may be more than one; a failed run finishes none.
fn completed_steps(from: Stage, to: Stage) -> &'static [Stage] {
    let position = |stage: Stage| match stage {
        Stage::Ready => Some(Stage::STEPS.len()),
        _ => Stage::STEPS.iter().position(|step| *step == stage),
    };

    match (position(from), position(to)) {
        (Some(from), Some(to)) if from < to => &Stage::STEPS[from..to],
        _ => &[],
    }
}

/// Spinner that follows the stages of a session's current run
struct StageProgress {
    spinner: ProgressBar,
    current: Stage,
    step_start: Instant,
}

impl StageProgress {
    fn new() -> Self {
        Self {
            spinner: create_spinner(Stage::Resolving.label()),
            current: Stage::Idle,
            step_start: Instant::now(),
        }
    }

    fn observe(&mut self, stage: Stage) {
        if stage == self.current {
            return;
        }
        for done in completed_steps(self.current, stage) {
            if let Some(label) = completed_label(*done) {
                self.spinner.println(format!(
                    "{} {} {}",
                    style("✓").green().bold(),
                    label,
                    style(format!("[{}]", format_duration(self.step_start.elapsed()))).dim()
                ));
                self.step_start = Instant::now();
            }
        }
        self.current = stage;
        if !stage.label().is_empty() {
            self.spinner.set_message(stage.label());
        }
    }

    fn finish(self) {
        self.spinner.finish_and_clear();
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

pub(crate) fn print_section(result: &AnalysisResult, section: Section) {
    println!("{}\n", style(format!("## {}", section.title())).cyan().bold());
    println!("{}", format_section(&result.section(section)));
}

pub(crate) async fn export_notes(result: &AnalysisResult, out_dir: Option<&PathBuf>) -> Result<()> {
    let dir = out_dir.cloned().unwrap_or_else(default_export_dir);
    let today = chrono::Local::now().date_naive();
    let path = save_notes(result, &dir, today).await?;
    println!(
        "{} {}",
        style("Notes saved:").dim(),
        style(path.display()).cyan()
    );
    Ok(())
}

async fn analyze_url(cli: &Cli, url: &str) -> Result<AnalysisResult> {
    // Validate input before touching the network
    if let Err(e) = resolve_video_id(url) {
        fail(e.user_message());
    }

    let provider: Provider = cli.provider.clone().into();
    let http = http_client()?;

    // Validate API key early
    let mut generator = match ChatCompletionsClient::for_provider(http.clone(), &provider) {
        Ok(generator) => generator,
        Err(e) => fail(&e.to_string()),
    };
    if let Some(model) = &cli.model {
        generator = generator.with_model(model);
    }
    if let Some(api_url) = &cli.api_url {
        generator = generator.with_api_url(api_url);
    }
    let model = generator.model().to_string();

    let endpoints = Endpoints::default()
        .with_oembed_url(&cli.oembed_url)
        .with_relay_url(&cli.relay_url)
        .with_captions_url(&cli.captions_url);
    let pipeline = Pipeline::new(http, endpoints, Arc::new(generator));

    println!(
        "\n{}  {}\n",
        style("konspekt").cyan().bold(),
        style(format!("Video Analyzer ({}, {})", provider.name(), model)).dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    let total_start = Instant::now();
    let session = AnalysisSession::new(pipeline);
    session.start(url);

    let mut progress = StageProgress::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let settled = loop {
        tokio::select! {
            snapshot = session.wait_settled() => break snapshot,
            _ = ticker.tick() => progress.observe(session.current_stage()),
        }
    };
    progress.observe(settled.stage);
    progress.finish();
    tracing::debug!(run = ?settled.run, trace_id = ?settled.trace_id, stage = ?settled.stage, "run settled");

    let result = match (settled.result, settled.error) {
        (Some(result), _) => Arc::unwrap_or_clone(result),
        (None, Some(message)) => fail(&message),
        (None, None) => fail("Failed to analyze video. Please try again."),
    };

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!("{}", style("─".repeat(60)).dim());

    Ok(result)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match (&cli.from_json, &cli.url) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), "reopening saved result");
            load_result_json(path).await?
        }
        (None, Some(url)) => analyze_url(&cli, url).await?,
        (None, None) => fail("Please enter a YouTube URL"),
    };

    println!(
        "\n{}\n{} {}\n",
        style(&result.metadata.title).bold(),
        style("Channel:").dim(),
        result.metadata.channel
    );

    if let Some(path) = &cli.json {
        save_result_json(&result, path).await?;
        println!(
            "{} {}",
            style("Saved:").dim(),
            style(path.display()).cyan()
        );
    }

    if cli.export {
        export_notes(&result, cli.out_dir.as_ref()).await?;
    }

    if cli.interactive {
        browse::run(&result, cli.out_dir.as_ref()).await?;
        return Ok(());
    }

    let sections: Vec<Section> = if cli.sections.is_empty() {
        Section::ALL.to_vec()
    } else {
        cli.sections.iter().map(|s| (*s).into()).collect()
    };

    println!();
    for section in sections {
        print_section(&result, section);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_skipped_between_polls_are_all_completed() {
        assert_eq!(
            completed_steps(Stage::Resolving, Stage::Structuring),
            &[
                Stage::Resolving,
                Stage::FetchingMetadata,
                Stage::FetchingTranscript
            ]
        );
        assert_eq!(
            completed_steps(Stage::Synthesizing, Stage::Ready),
            &[Stage::Synthesizing]
        );
    }

    #[test]
    fn starting_or_failing_completes_nothing() {
        assert!(completed_steps(Stage::Idle, Stage::Resolving).is_empty());
        assert!(completed_steps(Stage::Structuring, Stage::Failed).is_empty());
        assert!(completed_steps(Stage::Ready, Stage::Ready).is_empty());
    }
}
