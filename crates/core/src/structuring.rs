use tracing::{debug, error};

use crate::{
    error::{KonspektError, Result},
    provider::TextGenerator,
    types::{AnalysisPayload, Transcript, VideoMetadata},
};

static ANALYSIS_SCHEMA: &str = r#"{
  "summary": "A comprehensive 2-3 sentence summary of the video content",
  "keyInsights": [
    "First key insight from the video",
    "Second key insight from the video",
    "Third key insight from the video",
    "Fourth key insight from the video",
    "Fifth key insight from the video"
  ],
  "detailedNotes": {
    "introduction": "Brief overview of what the video introduces",
    "mainConcepts": [
      {
        "topic": "First main concept/topic",
        "content": "Detailed explanation of this concept"
      },
      {
        "topic": "Second main concept/topic",
        "content": "Detailed explanation of this concept"
      },
      {
        "topic": "Third main concept/topic",
        "content": "Detailed explanation of this concept"
      }
    ],
    "practicalApplications": [
      "First practical application or use case",
      "Second practical application or use case",
      "Third practical application or use case",
      "Fourth practical application or use case"
    ],
    "conclusion": "Summary of the video's conclusion and final thoughts"
  },
  "actionItems": [
    "First actionable step viewers can take",
    "Second actionable step viewers can take",
    "Third actionable step viewers can take",
    "Fourth actionable step viewers can take"
  ],
  "studyTopics": [
    "Related topic 1 for further study",
    "Related topic 2 for further study",
    "Related topic 3 for further study",
    "Related topic 4 for further study"
  ]
}"#;

pub fn build_prompt(transcript: &Transcript, metadata: &VideoMetadata) -> String {
    format!(
        r#"Analyze the following YouTube video transcript and provide a comprehensive analysis in JSON format:

Video Title: {title}
Channel: {channel}
Transcript: {transcript}

Please provide the analysis in this exact JSON structure:
{schema}

Make sure the response is valid JSON only, with no additional text or formatting."#,
        title = metadata.title,
        channel = metadata.channel,
        transcript = transcript.text,
        schema = ANALYSIS_SCHEMA,
    )
}

/// Parse the single JSON object embedded in a reply.
///
/// The reply is scanned once for top-level `{...}` spans, skipping braces
/// inside JSON strings. Prose or a code fence around the object is fine;
/// no object, an unbalanced brace or a second top-level object is rejected.
pub fn extract_payload(reply: &str) -> Result<AnalysisPayload> {
    let span = single_object_span(reply)?;

    serde_json::from_str(span).map_err(|e| KonspektError::AiResponseFormat {
        reason: e.to_string(),
    })
}

fn single_object_span(reply: &str) -> Result<&str> {
    let format_error = |reason: &str| KonspektError::AiResponseFormat {
        reason: reason.to_string(),
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;
    let mut span = None;

    for (i, c) in reply.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    if span.is_some() {
                        return Err(format_error("reply contains more than one JSON object"));
                    }
                    start = i;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(format_error("reply has an unmatched closing brace"));
                }
                depth -= 1;
                if depth == 0 {
                    span = Some(&reply[start..=i]);
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(format_error("reply has an unterminated JSON object"));
    }
    span.ok_or_else(|| format_error("reply contains no JSON object"))
}

/// Send the transcript to the generator and normalize its reply
pub async fn analyze(
    generator: &dyn TextGenerator,
    transcript: &Transcript,
    metadata: &VideoMetadata,
) -> Result<AnalysisPayload> {
    let prompt = build_prompt(transcript, metadata);
    debug!(generator = generator.name(), prompt_len = prompt.len(), "structuring transcript");

    let reply = generator.generate(&prompt).await.inspect_err(|e| {
        error!(generator = generator.name(), error = %e, "AI request failed");
    })?;

    extract_payload(&reply).inspect_err(|e| {
        error!(generator = generator.name(), error = %e, reply_len = reply.len(), "AI reply rejected");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "summary": "A talk about ownership.",
        "keyInsights": ["a", "b", "c", "d", "e"],
        "detailedNotes": {
            "introduction": "Intro",
            "mainConcepts": [
                {"topic": "Moves", "content": "Values move by default."},
                {"topic": "Borrows", "content": "References borrow."},
                {"topic": "Lifetimes", "content": "Scopes of borrows."}
            ],
            "practicalApplications": ["p1", "p2", "p3", "p4"],
            "conclusion": "Done"
        },
        "actionItems": ["x1", "x2", "x3", "x4"],
        "studyTopics": ["t1", "t2", "t3", "t4"]
    }"#;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            title: "Rust Ownership".to_string(),
            channel: "Crab Channel".to_string(),
            thumbnail_url: "https://img.youtube.com/vi/ABCDEFGHIJK/maxresdefault.jpg".to_string(),
            duration: "N/A".to_string(),
        }
    }

    #[test]
    fn prompt_carries_video_details_and_schema() {
        let prompt = build_prompt(&Transcript::new("we talk about borrowing"), &metadata());

        assert!(prompt.contains("Video Title: Rust Ownership"));
        assert!(prompt.contains("Channel: Crab Channel"));
        assert!(prompt.contains("Transcript: we talk about borrowing"));
        assert!(prompt.contains("\"mainConcepts\""));
        assert!(prompt.contains("\"studyTopics\""));
        assert!(prompt.ends_with("with no additional text or formatting."));
    }

    #[test]
    fn bare_object_is_returned_unchanged() {
        let payload = extract_payload(PAYLOAD).unwrap();
        let expected: AnalysisPayload = serde_json::from_str(PAYLOAD).unwrap();

        assert_eq!(payload, expected);
        assert_eq!(payload.detailed_notes.main_concepts.len(), 3);
        assert_eq!(payload.key_insights.len(), 5);
    }

    #[test]
    fn surrounding_whitespace_and_code_fence_are_accepted() {
        let fenced = format!("\n```json\n{PAYLOAD}\n```\n");
        assert_eq!(
            extract_payload(&fenced).unwrap(),
            extract_payload(PAYLOAD).unwrap()
        );

        let bare_fence = format!("```\n{PAYLOAD}\n```");
        assert!(extract_payload(&bare_fence).is_ok());
    }

    #[test]
    fn prose_around_a_single_object_is_accepted() {
        let chatty = format!("Here is the analysis you asked for:\n{PAYLOAD}\nLet me know if you need more.");
        assert_eq!(
            extract_payload(&chatty).unwrap(),
            extract_payload(PAYLOAD).unwrap()
        );
    }

    #[test]
    fn braces_inside_strings_do_not_split_the_object() {
        let mut value: serde_json::Value = serde_json::from_str(PAYLOAD).unwrap();
        value["summary"] = serde_json::Value::from(r#"Covers {braces}, "quotes" and a lone } too"#);
        let reply = format!("Result: {value} done");

        let payload = extract_payload(&reply).unwrap();
        assert_eq!(payload.summary, r#"Covers {braces}, "quotes" and a lone } too"#);
    }

    #[test]
    fn reply_without_braces_is_a_format_error() {
        let err = extract_payload("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, KonspektError::AiResponseFormat { .. }));
    }

    #[test]
    fn two_objects_are_rejected() {
        let doubled = format!("{PAYLOAD} and also {PAYLOAD}");
        let err = extract_payload(&doubled).unwrap_err();
        assert!(matches!(err, KonspektError::AiResponseFormat { .. }));
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        let truncated = &PAYLOAD[..PAYLOAD.len() - 1];
        for reply in [truncated.to_string(), format!("}} {PAYLOAD}")] {
            let err = extract_payload(&reply).unwrap_err();
            assert!(matches!(err, KonspektError::AiResponseFormat { .. }), "reply: {reply}");
        }
    }

    #[test]
    fn schema_mismatch_is_a_format_error() {
        let err = extract_payload(r#"{"summary": "only this"}"#).unwrap_err();
        assert!(matches!(err, KonspektError::AiResponseFormat { .. }));
    }

    #[test]
    fn missing_study_topics_default_to_empty() {
        let mut value: serde_json::Value = serde_json::from_str(PAYLOAD).unwrap();
        value.as_object_mut().unwrap().remove("studyTopics");

        let payload = extract_payload(&value.to_string()).unwrap();
        assert!(payload.study_topics.is_empty());
    }
}
