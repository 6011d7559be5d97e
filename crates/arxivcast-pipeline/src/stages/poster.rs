//! Poster stage adapter.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use arxivcast_media::render_text_poster;
use arxivcast_models::encoding::{POSTER_HEIGHT, POSTER_WIDTH};
use arxivcast_models::{Paper, ReportItem, Stage, StageOutcome};

use crate::imagegen::ImageGenClient;
use crate::stages::StageAdapter;

/// Wrap column for template poster text.
const WRAP_COLUMNS: usize = 60;
/// Abstract lines kept on the template poster.
const MAX_ABSTRACT_LINES: usize = 20;
/// Characters of the abstract fed to the image prompt.
const PROMPT_SUMMARY_CHARS: usize = 100;

/// Poster stage: generative backend first, template canvas second.
pub struct PosterStage {
    imagegen: Option<ImageGenClient>,
    dir: PathBuf,
}

impl PosterStage {
    /// Create the adapter. `imagegen` is `None` in fallback-only runs.
    pub fn new(imagegen: Option<ImageGenClient>, dir: PathBuf) -> Self {
        Self { imagegen, dir }
    }
}

#[async_trait]
impl StageAdapter for PosterStage {
    fn stage(&self) -> Stage {
        Stage::Poster
    }

    async fn produce(&self, item: &ReportItem) -> StageOutcome {
        let path = self.dir.join(item.artifact_file_name(Stage::Poster));

        if let Some(client) = &self.imagegen {
            let prompt = poster_prompt(&item.paper);
            match client.txt2img(&prompt, POSTER_WIDTH, POSTER_HEIGHT).await {
                Ok(bytes) => match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => {
                        info!("Generated poster for {}", item.paper.arxiv_id);
                        return StageOutcome::Success(path);
                    }
                    Err(e) => {
                        warn!("Failed to write poster for {}: {}", item.paper.arxiv_id, e)
                    }
                },
                Err(e) => warn!("Image backend failed for {}: {}", item.paper.arxiv_id, e),
            }
        }

        // Template tier: flat canvas with title, authors and wrapped abstract
        let text = template_layout(&item.paper);
        match render_text_poster(&text, &path).await {
            Ok(()) => StageOutcome::Degraded(path),
            Err(e) => StageOutcome::absent(format!("template poster render: {e}")),
        }
    }
}

/// Prompt sent to the generative backend.
fn poster_prompt(paper: &Paper) -> String {
    let summary_prefix: String = paper.summary.chars().take(PROMPT_SUMMARY_CHARS).collect();
    format!(
        "Academic poster for AI research paper titled '{}'. {}",
        paper.title, summary_prefix
    )
}

/// Lay out title, authors and the abstract as one drawable text block.
fn template_layout(paper: &Paper) -> String {
    let mut lines = wrap_text(&paper.title, WRAP_COLUMNS);
    lines.push(String::new());

    let byline = format!("Authors: {}", paper.authors.join(", "));
    lines.extend(wrap_text(&byline, WRAP_COLUMNS));
    lines.push(String::new());

    lines.extend(
        wrap_text(&paper.summary, WRAP_COLUMNS)
            .into_iter()
            .take(MAX_ABSTRACT_LINES),
    );

    lines.join("\n")
}

/// Greedy word wrap.
///
/// Words accumulate until the next one would exceed `width`; overlong words
/// land on their own line unsplit. Widths count chars, not bytes.
pub(crate) fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if !current.is_empty() && current_len + word_len + 1 > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_paper() -> Paper {
        Paper {
            title: "An Unreasonably Long Title About Sparse Mixture of Experts Routing".to_string(),
            authors: vec!["Alice Example".to_string(), "Bob Example".to_string()],
            affiliations: vec![String::new(), String::new()],
            summary: "word ".repeat(400).trim().to_string(),
            published: "2026-08-24".to_string(),
            updated: "2026-08-24".to_string(),
            arxiv_id: "2608.01234v1".to_string(),
            pdf_url: String::new(),
            primary_category: "cs.AI".to_string(),
            categories: vec!["cs.AI".to_string()],
        }
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 15, "line too long: {line:?}");
        }
        // Round trip preserves every word
        assert_eq!(
            lines.join(" "),
            "the quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn test_wrap_text_keeps_overlong_word_whole() {
        let lines = wrap_text("a pneumonoultramicroscopic b", 10);
        assert!(lines.contains(&"pneumonoultramicroscopic".to_string()));
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("", 60).is_empty());
        assert!(wrap_text("   ", 60).is_empty());
    }

    #[test]
    fn test_template_layout_caps_abstract() {
        let layout = template_layout(&sample_paper());
        let lines: Vec<&str> = layout.lines().collect();

        // Title block, blank, byline, blank, then at most 20 abstract lines
        assert!(lines.iter().any(|l| l.starts_with("Authors: Alice Example")));
        let abstract_lines = lines
            .iter()
            .skip_while(|l| !l.starts_with("word"))
            .count();
        assert!(abstract_lines <= MAX_ABSTRACT_LINES);
    }

    #[test]
    fn test_poster_prompt_truncates_summary() {
        let prompt = poster_prompt(&sample_paper());
        assert!(prompt.starts_with("Academic poster for AI research paper titled"));
        assert!(prompt.chars().count() < 250);
    }

    #[tokio::test]
    async fn test_produce_reports_stage() {
        let dir = TempDir::new().unwrap();
        let stage = PosterStage::new(None, dir.path().to_path_buf());
        assert_eq!(stage.stage(), Stage::Poster);
    }

    #[tokio::test]
    async fn test_produce_falls_back_when_backend_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = ImageGenClient::new(server.uri(), Duration::from_secs(2)).unwrap();
        let stage = PosterStage::new(Some(client), dir.path().to_path_buf());
        let item = ReportItem::new(1, sample_paper());

        // The template tier renders through ffmpeg; on machines without it
        // the stage must still exhaust cleanly to Absent
        match stage.produce(&item).await {
            StageOutcome::Degraded(path) => assert!(path.exists()),
            StageOutcome::Absent(reason) => assert!(reason.contains("template poster")),
            StageOutcome::Success(_) => panic!("primary backend cannot have succeeded"),
        }
    }
}
