use chrono::NaiveDate;

use crate::types::{AnalysisResult, SectionView};

const BULLET: &str = "•";

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", BULLET, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a date the way the notes header shows it, e.g. `10/19/2026`
pub fn format_generated_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Render one section for terminal display
pub fn format_section(view: &SectionView<'_>) -> String {
    let mut output = String::new();

    match view {
        SectionView::Summary(summary) => {
            output.push_str(summary);
            output.push('\n');
        }
        SectionView::Insights(items) | SectionView::Actions(items) => {
            for (i, item) in items.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, item));
            }
        }
        SectionView::Topics(items) => {
            for item in items.iter() {
                output.push_str(&format!("{} {}\n", BULLET, item));
            }
        }
        SectionView::Notes(notes) => {
            output.push_str("### Introduction\n\n");
            output.push_str(&notes.introduction);
            output.push_str("\n\n### Main Concepts\n\n");
            for concept in &notes.main_concepts {
                output.push_str(&format!("**{}**\n{}\n\n", concept.topic, concept.content));
            }
            output.push_str("### Practical Applications\n\n");
            output.push_str(&bullets(&notes.practical_applications));
            output.push_str("\n\n### Conclusion\n\n");
            output.push_str(&notes.conclusion);
            output.push('\n');
        }
        SectionView::Timestamps { video_id, stamps } => {
            for stamp in stamps.iter() {
                output.push_str(&format!(
                    "[{}] {}\n    {}\n",
                    stamp.time,
                    stamp.topic,
                    video_id.watch_url_at(stamp)
                ));
            }
        }
    }

    output
}

/// Full notes document offered for download
pub fn format_notes_markdown(result: &AnalysisResult, generated: NaiveDate) -> String {
    let payload = &result.payload;
    let notes = &payload.detailed_notes;
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", result.metadata.title));
    output.push_str(&format!("**Channel:** {}\n", result.metadata.channel));
    output.push_str(&format!("**Duration:** {}\n", result.metadata.duration));
    output.push_str(&format!(
        "**Generated:** {}\n\n",
        format_generated_date(generated)
    ));

    output.push_str("## Summary\n");
    output.push_str(&payload.summary);
    output.push_str("\n\n");

    output.push_str("## Key Insights\n");
    output.push_str(&bullets(&payload.key_insights));
    output.push_str("\n\n");

    output.push_str("## Detailed Notes\n\n");
    output.push_str("### Introduction\n");
    output.push_str(&notes.introduction);
    output.push_str("\n\n");

    output.push_str("### Main Concepts\n");
    let concepts = notes
        .main_concepts
        .iter()
        .map(|concept| format!("**{}**\n{}\n", concept.topic, concept.content))
        .collect::<Vec<_>>()
        .join("\n");
    output.push_str(&concepts);
    output.push_str("\n\n");

    output.push_str("### Practical Applications\n");
    output.push_str(&bullets(&notes.practical_applications));
    output.push_str("\n\n");

    output.push_str("### Conclusion\n");
    output.push_str(&notes.conclusion);
    output.push_str("\n\n");

    output.push_str("## Action Items\n");
    output.push_str(&bullets(&payload.action_items));
    output.push_str("\n\n");

    output.push_str("## Related Study Topics\n");
    output.push_str(&bullets(&payload.study_topics));
    output.push_str("\n\n");

    output.push_str("## Video Timestamps\n");
    let stamps = result
        .timestamps
        .iter()
        .map(|ts| format!("{} - {}", ts.time, ts.topic))
        .collect::<Vec<_>>()
        .join("\n");
    output.push_str(&stamps);
    output.push_str("\n\n");

    output.push_str("---\nGenerated by AI Video Analyzer");

    output.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetched::{Fetched, Provenance},
        resolver::resolve_video_id,
        types::{AnalysisPayload, DetailedNotes, MainConcept, Section, VideoMetadata},
    };

    fn result() -> AnalysisResult {
        let id = resolve_video_id("https://youtu.be/ABCDEFGHIJK").unwrap();
        let payload = AnalysisPayload {
            summary: "Short summary.".into(),
            key_insights: vec!["i1".into(), "i2".into()],
            detailed_notes: DetailedNotes {
                introduction: "Intro text".into(),
                main_concepts: vec![
                    MainConcept { topic: "Alpha".into(), content: "About alpha".into() },
                    MainConcept { topic: "Beta".into(), content: "About beta".into() },
                ],
                practical_applications: vec!["p1".into()],
                conclusion: "The end".into(),
            },
            action_items: vec!["a1".into()],
            study_topics: vec!["s1".into(), "s2".into()],
        };
        let metadata = VideoMetadata {
            title: "My Talk".into(),
            channel: "Chan".into(),
            thumbnail_url: id.thumbnail_url(),
            duration: "N/A".into(),
        };
        AnalysisResult::assemble(id, Fetched::Live(metadata), Provenance::Live, payload)
    }

    #[test]
    fn notes_document_has_every_section_in_order() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let doc = format_notes_markdown(&result(), date);

        let expected = "\
# My Talk

**Channel:** Chan
**Duration:** N/A
**Generated:** 3/7/2026

## Summary
Short summary.

## Key Insights
• i1
• i2

## Detailed Notes

### Introduction
Intro text

### Main Concepts
**Alpha**
About alpha

**Beta**
About beta


### Practical Applications
• p1

### Conclusion
The end

## Action Items
• a1

## Related Study Topics
• s1
• s2

## Video Timestamps
0:00 - Alpha
3:30 - Beta

---
Generated by AI Video Analyzer";

        assert_eq!(doc, expected);
    }

    #[test]
    fn sections_render_from_the_same_result() {
        let result = result();

        assert_eq!(
            format_section(&result.section(Section::Summary)),
            "Short summary.\n"
        );
        assert_eq!(
            format_section(&result.section(Section::Insights)),
            "1. i1\n2. i2\n"
        );
        assert_eq!(
            format_section(&result.section(Section::Timestamps)),
            "[0:00] Alpha\n    https://www.youtube.com/watch?v=ABCDEFGHIJK&t=0m00s\n\
             [3:30] Beta\n    https://www.youtube.com/watch?v=ABCDEFGHIJK&t=3m30s\n"
        );
        assert!(format_section(&result.section(Section::Notes)).contains("**Beta**\nAbout beta"));
    }
}
