//! Paper metadata models.

use serde::{Deserialize, Serialize};

/// Metadata for one arXiv paper, as produced by the fetch stage.
///
/// Field names match the JSON batch document written to
/// `data/arxiv_papers_<date>.json`, so saved batches stay readable across
/// versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Paper title (whitespace-normalized)
    pub title: String,

    /// Author names in feed order
    pub authors: Vec<String>,

    /// One entry per author; the export feed rarely fills these in
    #[serde(default)]
    pub affiliations: Vec<String>,

    /// Abstract text
    pub summary: String,

    /// Submission date, `YYYY-MM-DD`
    pub published: String,

    /// Last revision date, `YYYY-MM-DD`
    pub updated: String,

    /// Bare arXiv identifier, e.g. `2408.12345v1`
    pub arxiv_id: String,

    /// Direct PDF link
    pub pdf_url: String,

    /// Primary category term, e.g. `cs.AI`
    pub primary_category: String,

    /// All category terms
    pub categories: Vec<String>,
}

impl Paper {
    /// Affiliations that are actually present.
    pub fn known_affiliations(&self) -> Vec<&str> {
        self.affiliations
            .iter()
            .map(String::as_str)
            .filter(|a| !a.trim().is_empty())
            .collect()
    }
}

/// Sanitize an arXiv identifier for use as a filename component.
///
/// New-style ids (`2408.12345v1`) pass through unchanged; old-style ids
/// (`cs/0112017`) have their slash replaced so they cannot escape the
/// stage directory.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paper() -> Paper {
        Paper {
            title: "Attention Is Not All You Need".to_string(),
            authors: vec!["A. Author".to_string(), "B. Author".to_string()],
            affiliations: vec![String::new(), String::new()],
            summary: "We revisit attention.".to_string(),
            published: "2026-08-24".to_string(),
            updated: "2026-08-24".to_string(),
            arxiv_id: "2608.01234v1".to_string(),
            pdf_url: "http://arxiv.org/pdf/2608.01234v1".to_string(),
            primary_category: "cs.AI".to_string(),
            categories: vec!["cs.AI".to_string(), "cs.LG".to_string()],
        }
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("2608.01234v1"), "2608.01234v1");
        assert_eq!(sanitize_id("cs/0112017"), "cs_0112017");
        assert_eq!(sanitize_id("hep-th/9901001"), "hep-th_9901001");
    }

    #[test]
    fn test_known_affiliations_skips_blanks() {
        let mut paper = sample_paper();
        assert!(paper.known_affiliations().is_empty());

        paper.affiliations = vec!["MIT".to_string(), String::new(), " ".to_string()];
        assert_eq!(paper.known_affiliations(), vec!["MIT"]);
    }

    #[test]
    fn test_json_round_trip_keeps_field_names() {
        let paper = sample_paper();
        let json = serde_json::to_value(&paper).unwrap();
        assert!(json.get("arxiv_id").is_some());
        assert!(json.get("primary_category").is_some());

        let back: Paper = serde_json::from_value(json).unwrap();
        assert_eq!(back, paper);
    }

    #[test]
    fn test_missing_affiliations_default_to_empty() {
        let json = r#"{
            "title": "T",
            "authors": ["A"],
            "summary": "S",
            "published": "2026-08-24",
            "updated": "2026-08-24",
            "arxiv_id": "2608.00001v1",
            "pdf_url": "http://arxiv.org/pdf/2608.00001v1",
            "primary_category": "cs.AI",
            "categories": ["cs.AI"]
        }"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert!(paper.affiliations.is_empty());
    }
}
