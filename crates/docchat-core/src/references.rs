//! Reference aggregation: fold scored chunks into one summary per source
//! document, then render them for display.
use std::collections::{BTreeSet, HashMap};

use crate::config::DataConfig;
use crate::types::{DocumentSummary, Element, ImageSummary, RetrievalHit};

struct Pending {
    summary: DocumentSummary,
    pages: BTreeSet<String>,
}

/// Group hits by source document in first-seen order.
///
/// A new document is named `pdf<N>` where N is the number of documents known
/// once it has been inserted; later hits never rename it. Hits without a
/// document path are skipped and consume no ordinal.
pub fn aggregate(hits: &[RetrievalHit]) -> Vec<DocumentSummary> {
    let mut order: Vec<Pending> = Vec::new();
    let mut by_path: HashMap<&str, usize> = HashMap::new();

    for hit in hits {
        let Some(path) = hit.source_document_path.as_deref() else { continue };
        let slot = *by_path.entry(path).or_insert_with(|| {
            let name = format!("pdf{}", order.len() + 1);
            order.push(Pending {
                summary: DocumentSummary {
                    name,
                    path: path.to_string(),
                    page_numbers: Vec::new(),
                    text: String::new(),
                    score: None,
                    images: Vec::new(),
                },
                pages: BTreeSet::new(),
            });
            order.len() - 1
        });
        let entry = &mut order[slot];

        entry.pages.insert(hit.page_number.clone());
        entry.summary.text.push_str(&hit.parsed_text);
        entry.summary.text.push_str("\n\n");
        entry.summary.score = match (entry.summary.score, hit.score) {
            (Some(old), Some(new)) => Some(old.max(new)),
            (None, new) => new,
            (old, None) => old,
        };

        if let Some(image) = &hit.image_path {
            let name = format!("image{}", entry.summary.images.len() + 1);
            entry.summary.images.push(ImageSummary {
                name,
                path: image.clone(),
                page_number: hit.page_number.clone(),
                score: hit.score,
            });
        }
    }

    order
        .into_iter()
        .map(|p| DocumentSummary { page_numbers: p.pages.into_iter().collect(), ..p.summary })
        .collect()
}

/// Directory prefixes stripped from paths in rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLayout {
    pub documents_prefix: String,
    pub images_prefix: String,
}

impl ReferenceLayout {
    pub fn from_data(data: &DataConfig) -> Self {
        Self { documents_prefix: data.documents_prefix(), images_prefix: data.images_prefix() }
    }
}

impl Default for ReferenceLayout {
    fn default() -> Self { Self::from_data(&DataConfig::default()) }
}

/// Markdown "Sources" block listing score, file, pages and images per document.
pub fn render_sources_markdown(summaries: &[DocumentSummary], layout: &ReferenceLayout) -> String {
    let mut out = String::from("#### Sources:\n");
    for doc in summaries {
        let score = doc.score.map_or_else(|| "None".to_string(), format_score);
        out.push_str(&format!("**Score:** {score}\n"));
        out.push_str(&format!("**File:** {}\n", doc.path.replace(&layout.documents_prefix, "")));
        out.push_str(&format!("**Page:** {}\n", doc.page_numbers.join(", ")));
        if !doc.images.is_empty() {
            out.push_str("**Images:**\n");
            let images: Vec<String> = doc.images.iter().map(|img| img.path.replace(&layout.images_prefix, "")).collect();
            out.push_str(&images.join("\n"));
        }
        out.push_str("\n\n");
    }
    out
}

/// Shortest round-trip form, keeping `.0` on integral scores.
fn format_score(score: f64) -> String { format!("{score:?}") }

/// Inline elements: each document followed by its images.
pub fn display_elements(summaries: &[DocumentSummary]) -> Vec<Element> {
    let mut elements = Vec::new();
    for doc in summaries {
        let page = doc.page_numbers.first().cloned().unwrap_or_default();
        elements.push(Element::Pdf { name: doc.name.clone(), path: doc.path.clone(), page });
        for img in &doc.images {
            elements.push(Element::Image { name: img.name.clone(), path: img.path.clone() });
        }
    }
    elements
}

/// Answer body for personas that reply with the retrieved text itself.
pub fn operator_body(summaries: &[DocumentSummary]) -> String {
    summaries.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n\n")
}
