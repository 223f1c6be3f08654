//! Upload handling and the transcription gate

use crate::db::{Content, Database, MediaKind};
use crate::error::Result;
use crate::llm::LlmClient;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};

/// Outcome of an upload. Transcription failure still persists the content,
/// but is surfaced distinctly so incomplete assets are never mistaken for
/// complete ones.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Complete(Content),
    TranscriptionFailed { content: Content, reason: String },
}

impl UploadOutcome {
    pub fn content(&self) -> &Content {
        match self {
            UploadOutcome::Complete(content) => content,
            UploadOutcome::TranscriptionFailed { content, .. } => content,
        }
    }
}

/// Decides from the declared media kind whether an uploaded asset must be
/// transcribed before it counts as complete, and runs that step.
pub struct TranscriptionGate {
    db: Arc<Mutex<Database>>,
    llm: Arc<dyn LlmClient>,
}

impl TranscriptionGate {
    pub fn new(db: Arc<Mutex<Database>>, llm: Arc<dyn LlmClient>) -> Self {
        Self { db, llm }
    }

    /// Persist an uploaded asset and, for audio/video, transcribe it.
    ///
    /// The content row is created before transcription is attempted, with
    /// the transcription absent; a transcription failure therefore leaves a
    /// persisted-but-incomplete row and reports `TranscriptionFailed`.
    pub async fn on_upload(
        &self,
        expert_id: i64,
        subject: &str,
        media_kind: MediaKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UploadOutcome> {
        let hash = hash_media(bytes);

        let content_id = {
            let db = self.db.lock().expect("database lock poisoned");
            db.get_expert(expert_id)?;
            db.insert_content(expert_id, subject, media_kind, file_name, &hash, bytes.len())?
        };

        if !media_kind.requires_transcription() {
            let db = self.db.lock().expect("database lock poisoned");
            return Ok(UploadOutcome::Complete(db.get_content(content_id)?));
        }

        match self.llm.transcribe(file_name, bytes.to_vec()).await {
            Ok(text) => {
                let db = self.db.lock().expect("database lock poisoned");
                db.set_transcription(content_id, &text)?;
                Ok(UploadOutcome::Complete(db.get_content(content_id)?))
            }
            Err(e) => {
                tracing::warn!("transcription failed for content {}: {}", content_id, e);
                let db = self.db.lock().expect("database lock poisoned");
                Ok(UploadOutcome::TranscriptionFailed {
                    content: db.get_content(content_id)?,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// SHA-256 hex digest of uploaded media
pub fn hash_media(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
