//! Domain types shared by the normalizer, the aggregator and the chat layer.

use serde::{Deserialize, Serialize};

pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Page label used when a hit carries no page number.
pub const UNKNOWN_PAGE: &str = "Unknown";
/// Text used when a hit carries no parsed markdown.
pub const MISSING_TEXT: &str = "No parsed text found.";

/// A retrieval result exactly as the index hands it back: free-form node
/// metadata plus an optional similarity score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub metadata: Meta,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One scored chunk after boundary normalization.
///
/// - `source_document_path`: `./<documents_dir>/...`, or `None` when the hit
///   cannot be attributed to a document
/// - `image_path`: `./<images_dir>/...` when the chunk has a page image
/// - `page_number`: page label, [`UNKNOWN_PAGE`] when absent
/// - `parsed_text`: chunk markdown, [`MISSING_TEXT`] when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub source_document_path: Option<String>,
    pub image_path: Option<String>,
    pub page_number: String,
    pub parsed_text: String,
    pub score: Option<f64>,
}

impl Default for RetrievalHit {
    fn default() -> Self {
        Self {
            source_document_path: None,
            image_path: None,
            page_number: UNKNOWN_PAGE.to_string(),
            parsed_text: MISSING_TEXT.to_string(),
            score: None,
        }
    }
}

impl RetrievalHit {
    pub fn for_document(path: impl Into<String>) -> Self {
        Self { source_document_path: Some(path.into()), ..Self::default() }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self { self.page_number = page.into(); self }

    pub fn with_text(mut self, text: impl Into<String>) -> Self { self.parsed_text = text.into(); self }

    pub fn with_score(mut self, score: f64) -> Self { self.score = Some(score); self }

    pub fn with_image(mut self, path: impl Into<String>) -> Self { self.image_path = Some(path.into()); self }
}

/// Image attached to a [`DocumentSummary`], named `image<N>` by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub name: String,
    pub path: String,
    pub page_number: String,
    pub score: Option<f64>,
}

/// All hits of one source document folded together.
///
/// `page_numbers` is sorted by plain string order, `text` holds every chunk
/// followed by a blank line, `score` is the best score seen (if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub path: String,
    pub page_numbers: Vec<String>,
    pub text: String,
    pub score: Option<f64>,
    pub images: Vec<ImageSummary>,
}

/// Inline attachment shown next to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Pdf { name: String, path: String, page: String },
    Image { name: String, path: String },
}
