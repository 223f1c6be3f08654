//! Response generation against the external chat endpoint

use crate::error::Result;
use crate::llm::{ChatMessage, LlmClient};
use std::sync::Arc;

/// Source labels attached to live model answers, in citation order
pub const SOURCE_LABELS: &[&str] = &[
    "Expert Knowledge Base",
    "Professional Development Resources",
    "Industry Best Practices",
    "Research Publications",
];

const BASE_PROMPT: &str = "You are an expert AI assistant specializing in providing helpful, accurate, and actionable advice. You should provide comprehensive responses that are practical and easy to understand.";

const CLOSING_INSTRUCTION: &str = "Please provide a helpful, detailed response that addresses the user's question directly and offers practical next steps.";

/// A successful answer from the generation endpoint
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    pub text: String,
    pub sources: Vec<String>,
}

/// Generates responses through the external chat model.
///
/// Builds a subject-specific instruction preamble, sends it with the raw
/// question in a single round trip, and reports failures to the caller.
/// The degradation policy lives in the orchestrator, not here: no retries,
/// no fallback.
pub struct ResponseGenerator {
    client: Arc<dyn LlmClient>,
}

impl ResponseGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generate an answer for a question within a subject
    pub async fn generate(&self, question: &str, subject: &str) -> Result<GeneratedAnswer> {
        let messages = vec![
            ChatMessage::system(build_system_prompt(subject)),
            ChatMessage::user(question),
        ];

        let text = self.client.chat_completion(messages).await?;

        Ok(GeneratedAnswer {
            text,
            sources: SOURCE_LABELS.iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// Build the instruction preamble for a subject. Subjects without a
/// dedicated focus get the base prompt alone.
pub fn build_system_prompt(subject: &str) -> String {
    let focus = match subject {
        "Leadership" => Some(
            "Focus on leadership development, team management, communication skills, and organizational behavior. Provide specific strategies and actionable steps.",
        ),
        "Business Strategy" => Some(
            "Focus on strategic planning, market analysis, competitive positioning, and business growth. Include frameworks and methodologies where relevant.",
        ),
        "Health & Wellness" => Some(
            "Focus on holistic health approaches including physical, mental, and emotional well-being. Provide evidence-based recommendations.",
        ),
        "Technology" => Some(
            "Focus on technology trends, digital transformation, and practical implementation strategies. Consider both technical and business perspectives.",
        ),
        "Personal Development" => Some(
            "Focus on self-improvement, skill development, goal setting, and personal growth strategies. Provide motivational and practical guidance.",
        ),
        _ => None,
    };

    match focus {
        Some(focus) => format!("{} {}\n\n{}", BASE_PROMPT, focus, CLOSING_INSTRUCTION),
        None => format!("{}\n\n{}", BASE_PROMPT, CLOSING_INSTRUCTION),
    }
}
