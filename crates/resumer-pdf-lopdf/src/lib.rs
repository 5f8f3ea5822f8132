use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, ObjectId};

use resumer_core::{ExtractionError, PageText, PageTextSource, PdfBackend};

mod content;
#[doc(hidden)]
pub mod testing;

use content::{ContentWalker, FontInfo, PageBox, number, resolve};

/// US Letter, used when a page has no readable `/MediaBox`.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// lopdf-based implementation of [`PdfBackend`].
///
/// This crate isolates the lopdf dependency so that the parsing pipeline
/// only sees [`PageTextSource`]. Text is located by interpreting each page's
/// content stream; glyph advances come from the font's `/Widths` array.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PageTextSource + Send>, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|e| match e {
            lopdf::Error::Decryption(_) => ExtractionError::PasswordProtected,
            other => ExtractionError::Corrupt(other.to_string()),
        })?;
        // lopdf does not decrypt; streams of a document still carrying
        // `/Encrypt` are ciphertext.
        if doc.is_encrypted() {
            tracing::debug!("document is encrypted");
            return Err(ExtractionError::PasswordProtected);
        }
        Ok(Box::new(LopdfSource::new(doc)))
    }
}

/// A loaded document, decoded page by page on request.
pub struct LopdfSource {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl LopdfSource {
    pub fn new(doc: Document) -> Self {
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }

    /// Resolve `/MediaBox`, walking up the `/Parent` chain for inherited values.
    fn media_box(&self, page_id: ObjectId) -> [f64; 4] {
        let mut current = self.doc.get_dictionary(page_id).ok();
        // Parent chains are shallow; the bound guards against cycles.
        for _ in 0..32 {
            let Some(dict) = current else { break };
            if let Some(bbox) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|o| resolve(&self.doc, o).as_array().ok())
                .and_then(|arr| {
                    let nums: Vec<f64> =
                        arr.iter().filter_map(|o| number(resolve(&self.doc, o))).collect();
                    <[f64; 4]>::try_from(nums).ok()
                })
            {
                return bbox;
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|o| o.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        DEFAULT_MEDIA_BOX
    }
}

impl PageTextSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageText, ExtractionError> {
        let page_id = *self.pages.get(index).ok_or_else(|| {
            ExtractionError::Corrupt(format!("page {index} out of range ({})", self.pages.len()))
        })?;

        let [x0, y0, x1, y1] = self.media_box(page_id);
        let page_box = PageBox {
            left: x0.min(x1),
            top: y0.max(y1),
        };
        let height = (y1 - y0).abs();

        let data = self.doc.get_page_content(page_id).map_err(corrupt)?;
        let content = Content::decode(&data).map_err(corrupt)?;

        let fonts: BTreeMap<Vec<u8>, FontInfo<'_>> = self
            .doc
            .get_page_fonts(page_id)
            .unwrap_or_default()
            .into_iter()
            .map(|(name, dict)| (name, FontInfo::new(&self.doc, dict)))
            .collect();

        let tokens = ContentWalker::new(&self.doc, fonts, page_box).walk(&content);
        tracing::trace!(page = index, tokens = tokens.len(), height, "lopdf page decoded");
        Ok(PageText { height, tokens })
    }
}

fn corrupt(e: lopdf::Error) -> ExtractionError {
    ExtractionError::Corrupt(e.to_string())
}
