//! Upload command

use crate::app::{OutputFormat, UploadArgs};
use crate::output::{print_json, print_labeled};
use anyhow::Result;
use counsel_core::{Config, Database, LlmClient, MediaKind, OpenAiClient, TranscriptionGate, UploadOutcome};
use serde_json::json;
use std::sync::{Arc, Mutex};
use termcolor::Color;

pub async fn run(args: UploadArgs, db: Database, config: Config, format: OutputFormat) -> Result<()> {
    let media_kind: MediaKind = args.kind.parse()?;
    let bytes = std::fs::read(&args.file)?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(config.llm_service.clone())?);
    let gate = TranscriptionGate::new(Arc::new(Mutex::new(db)), llm);

    let outcome = gate
        .on_upload(args.expert, &args.subject, media_kind, &file_name, &bytes)
        .await?;

    match format {
        OutputFormat::Json => {
            let content = outcome.content();
            let failed = matches!(outcome, UploadOutcome::TranscriptionFailed { .. });
            print_json(&json!({
                "content_id": content.id,
                "media_kind": content.media_kind.as_str(),
                "hash": content.hash,
                "has_transcription": content.has_transcription,
                "transcription_failed": failed,
            }))?;
        }
        OutputFormat::Cli => match &outcome {
            UploadOutcome::Complete(content) => {
                println!(
                    "Uploaded content #{} ({}, {} bytes)",
                    content.id, content.media_kind, content.size
                );
                if content.has_transcription {
                    println!("Transcription stored");
                }
            }
            UploadOutcome::TranscriptionFailed { content, reason } => {
                println!(
                    "Uploaded content #{} ({}, {} bytes)",
                    content.id, content.media_kind, content.size
                );
                print_labeled("[incomplete]", &format!("transcription failed: {}", reason), Color::Yellow);
            }
        },
    }
    Ok(())
}
