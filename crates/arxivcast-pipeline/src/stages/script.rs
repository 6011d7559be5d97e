//! Script stage adapter.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use arxivcast_models::{Paper, ReportItem, Stage, StageOutcome};

use crate::ollama::OllamaClient;
use crate::stages::StageAdapter;

/// Target narration length in characters.
pub const SCRIPT_MAX_CHARS: usize = 300;
/// Characters of the abstract quoted by the template script.
const TEMPLATE_SUMMARY_CHARS: usize = 150;

/// Script stage: language model narration first, fixed template second.
pub struct ScriptStage {
    ollama: Option<OllamaClient>,
    dir: PathBuf,
    max_chars: usize,
}

impl ScriptStage {
    /// Create the adapter. `ollama` is `None` in fallback-only runs.
    pub fn new(ollama: Option<OllamaClient>, dir: PathBuf) -> Self {
        Self {
            ollama,
            dir,
            max_chars: SCRIPT_MAX_CHARS,
        }
    }
}

#[async_trait]
impl StageAdapter for ScriptStage {
    fn stage(&self) -> Stage {
        Stage::Script
    }

    async fn produce(&self, item: &ReportItem) -> StageOutcome {
        let path = self.dir.join(item.artifact_file_name(Stage::Script));

        if let Some(client) = &self.ollama {
            match client.chat(&build_prompt(&item.paper)).await {
                Ok(reply) => {
                    let script = enforce_length(&reply, self.max_chars);
                    match tokio::fs::write(&path, &script).await {
                        Ok(()) => {
                            info!(
                                model = client.model(),
                                "Generated script for {}", item.paper.arxiv_id
                            );
                            return StageOutcome::Success(path);
                        }
                        Err(e) => {
                            warn!("Failed to write script for {}: {}", item.paper.arxiv_id, e)
                        }
                    }
                }
                Err(e) => warn!("Script backend failed for {}: {}", item.paper.arxiv_id, e),
            }
        }

        let script = template_script(&item.paper);
        match tokio::fs::write(&path, &script).await {
            Ok(()) => StageOutcome::Degraded(path),
            Err(e) => StageOutcome::absent(format!("template script write: {e}")),
        }
    }
}

/// Prompt sent to the language model.
fn build_prompt(paper: &Paper) -> String {
    format!(
        "Write a short spoken narration (at most {} characters) for a daily research \
         video digest. Plain broadcast English, no markdown, no stage directions.\n\n\
         Title: {}\nAuthors: {}\nAffiliations: {}\nAbstract: {}",
        SCRIPT_MAX_CHARS,
        paper.title,
        paper.authors.join(", "),
        paper.known_affiliations().join(", "),
        paper.summary
    )
}

/// Trim and truncate a model reply to `max_chars`, respecting char boundaries.
fn enforce_length(reply: &str, max_chars: usize) -> String {
    let trimmed = reply.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    trimmed.chars().take(max_chars).collect()
}

/// Deterministic narration used when no language model is available.
fn template_script(paper: &Paper) -> String {
    let authors = paper.authors.join(", ");
    let summary_prefix: String = paper.summary.chars().take(TEMPLATE_SUMMARY_CHARS).collect();
    let affiliations = paper.known_affiliations();
    if affiliations.is_empty() {
        format!(
            "Today on arXiv: {}. By {}. {}...",
            paper.title, authors, summary_prefix
        )
    } else {
        format!(
            "Today on arXiv: {}. By {} from {}. {}...",
            paper.title,
            authors,
            affiliations.join(", "),
            summary_prefix
        )
    }
}
