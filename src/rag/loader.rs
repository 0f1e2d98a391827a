//! PDF loading: one document per page.

use std::path::{Path, PathBuf};

use lopdf::Document;
use serde_json::{json, Map, Value};

use crate::core::errors::AgentError;

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    pub content: String,
    /// `source` (file path) and `page` (0-based).
    pub metadata: Map<String, Value>,
}

impl PageDocument {
    pub fn new(content: String, source: &str, page: u32) -> Self {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), json!(source));
        metadata.insert("page".to_string(), json!(page));
        Self { content, metadata }
    }

    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }

    pub fn page(&self) -> u64 {
        self.metadata
            .get("page")
            .and_then(|v| v.as_u64())
            .unwrap_or_default()
    }
}

/// Load a PDF and return its pages in order. Pages without extractable text
/// are skipped.
pub async fn load_pdf_pages(path: &Path) -> Result<Vec<PageDocument>, AgentError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || load_pdf_pages_blocking(&path))
        .await
        .map_err(|e| AgentError::Document(format!("PDF loader task failed: {}", e)))?
}

fn load_pdf_pages_blocking(path: &Path) -> Result<Vec<PageDocument>, AgentError> {
    let source = path.display().to_string();
    let doc = Document::load(path)
        .map_err(|e| AgentError::Document(format!("Failed to load PDF {}: {}", source, e)))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Page {} of {} has no text, skipping", page_number, source);
                    continue;
                }
                pages.push(PageDocument::new(
                    text.to_string(),
                    &source,
                    page_number.saturating_sub(1),
                ));
            }
            Err(e) => {
                tracing::warn!("Could not extract text from page {} of {}: {}", page_number, source, e);
            }
        }
    }

    if pages.is_empty() {
        return Err(AgentError::Document(format!(
            "No text content could be extracted from {}",
            source
        )));
    }

    tracing::info!("Loaded {} pages from {}", pages.len(), source);
    Ok(pages)
}

#[cfg(test)]
pub(crate) mod test_pdf {
    use std::path::Path;

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Write a minimal PDF with one text line per page.
    pub fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
