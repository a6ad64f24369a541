//! Boundary normalization of raw index metadata into [`RetrievalHit`]s.
//!
//! Index nodes carry `source_file_path`, `image_path`, `page_num` and
//! `parsed_text_markdown` keys written at indexing time. Paths are absolute
//! on the machine that built the index, so only the part after the data
//! directory marker is trusted and rebased onto `./<dir>/`.
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::types::{RawHit, RetrievalHit, MISSING_TEXT, UNKNOWN_PAGE};

pub const SOURCE_PATH_KEY: &str = "source_file_path";
pub const IMAGE_PATH_KEY: &str = "image_path";
pub const PAGE_KEY: &str = "page_num";
pub const TEXT_KEY: &str = "parsed_text_markdown";

#[derive(Debug, Clone)]
struct PathRule {
    pattern: Regex,
    prefix: String,
}

impl PathRule {
    fn new(dir: &str) -> Result<Self> {
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            return Err(Error::InvalidConfig("data directory marker must not be empty".into()));
        }
        let pattern = Regex::new(&format!(r".*/{}/(.*)", regex::escape(dir)))
            .map_err(|e| Error::InvalidConfig(format!("bad data directory marker '{dir}': {e}")))?;
        Ok(Self { pattern, prefix: format!("./{dir}/") })
    }

    fn extract(&self, value: Option<&Value>) -> Option<String> {
        let raw = value?.as_str()?;
        let caps = self.pattern.captures(raw)?;
        Some(format!("{}{}", self.prefix, &caps[1]))
    }
}

#[derive(Debug, Clone)]
pub struct HitNormalizer {
    documents: PathRule,
    images: PathRule,
}

impl HitNormalizer {
    pub fn new(data: &DataConfig) -> Result<Self> {
        Ok(Self { documents: PathRule::new(&data.documents_dir)?, images: PathRule::new(&data.images_dir)? })
    }

    pub fn normalize(&self, raw: &RawHit) -> RetrievalHit {
        let meta = &raw.metadata;
        let source_document_path = self.documents.extract(meta.get(SOURCE_PATH_KEY));
        if source_document_path.is_none() {
            debug!(value = ?meta.get(SOURCE_PATH_KEY), "no source document path match");
        }
        let image_path = self.images.extract(meta.get(IMAGE_PATH_KEY));
        if image_path.is_none() && meta.contains_key(IMAGE_PATH_KEY) {
            debug!(value = ?meta.get(IMAGE_PATH_KEY), "no valid image path found");
        }
        RetrievalHit {
            source_document_path,
            image_path,
            page_number: page_label(meta.get(PAGE_KEY)),
            parsed_text: meta.get(TEXT_KEY).and_then(Value::as_str).unwrap_or(MISSING_TEXT).to_string(),
            score: raw.score,
        }
    }

    pub fn normalize_all(&self, raw: &[RawHit]) -> Vec<RetrievalHit> { raw.iter().map(|r| self.normalize(r)).collect() }
}

fn page_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_PAGE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
