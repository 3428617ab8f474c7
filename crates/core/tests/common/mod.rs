//! Shared fixtures for the integration tests: a scripted `TextGenerator`
//! and canned collaborator payloads.

#![allow(dead_code)]

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use konspekt_core::{Endpoints, KonspektError, Result, TextGenerator};
use serde_json::json;

pub const VIDEO_ID: &str = "ABCDEFGHIJK";

/// Points every lookup at `base`, which may be a wiremock server or a dead port.
pub fn endpoints(base: &str) -> Endpoints {
    Endpoints::default()
        .with_oembed_url(format!("{base}/oembed"))
        .with_relay_url(format!("{base}/get"))
        .with_captions_url("https://www.youtube.com/api/timedtext")
}

/// Nothing listens here, so every request fails at connect time.
pub const DEAD_BASE: &str = "http://127.0.0.1:1";

pub fn payload_json(summary: &str) -> serde_json::Value {
    json!({
        "summary": summary,
        "keyInsights": ["k1", "k2", "k3", "k4", "k5"],
        "detailedNotes": {
            "introduction": "What the talk sets out to do.",
            "mainConcepts": [
                {"topic": "Ownership", "content": "Every value has one owner."},
                {"topic": "Borrowing", "content": "References do not own."},
                {"topic": "Lifetimes", "content": "Borrows are scoped."}
            ],
            "practicalApplications": ["a1", "a2", "a3", "a4"],
            "conclusion": "Ownership makes memory safety static."
        },
        "actionItems": ["do1", "do2", "do3", "do4"],
        "studyTopics": ["st1", "st2", "st3", "st4"]
    })
}

pub fn oembed_json(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "author_name": "Crab Channel",
        "author_url": "https://www.youtube.com/@crab",
        "type": "video",
        "thumbnail_url": "https://i.ytimg.com/vi/ABCDEFGHIJK/hqdefault.jpg",
        "provider_name": "YouTube"
    })
}

pub fn relay_json(events: serde_json::Value) -> serde_json::Value {
    json!({
        "contents": json!({ "wireMagic": "pb3", "events": events }).to_string(),
        "status": { "url": "https://www.youtube.com/api/timedtext", "http_code": 200 }
    })
}

enum Script {
    Reply(String),
    Fail(String),
    /// Reply after a delay when the prompt mentions the given title.
    SlowFor { title: String, delay: Duration },
}

/// Records every prompt and answers from a fixed script.
pub struct ScriptedGenerator {
    script: Script,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with(Script::Reply(reply.into()))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with(Script::Fail(reason.into()))
    }

    pub fn slow_for(title: impl Into<String>, delay: Duration) -> Self {
        Self::with(Script::SlowFor {
            title: title.into(),
            delay,
        })
    }

    fn with(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Fail(reason) => Err(KonspektError::AiRequest {
                reason: reason.clone(),
            }),
            Script::SlowFor { title, delay } => {
                if prompt.contains(&format!("Video Title: {title}")) {
                    tokio::time::sleep(*delay).await;
                    Ok(payload_json("slow run").to_string())
                } else {
                    Ok(payload_json("fast run").to_string())
                }
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
