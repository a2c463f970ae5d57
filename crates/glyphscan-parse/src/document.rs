//! PDF document access and per-page glyph extraction.

use std::path::Path;

use glyphscan_core::{BBox, Ctm, Glyph};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::BackendError;
use crate::interpreter::{Interpreter, resolve, stream_bytes};

/// Page dimensions from the MediaBox.
///
/// Glyph boxes are reported relative to `(origin_x, origin_y)`, so they lie
/// within `0..width` and `0..height` for content inside the MediaBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    /// Lower-left corner of the MediaBox in user space.
    pub origin_x: f64,
    pub origin_y: f64,
}

impl PageSize {
    /// The page as a box in its own coordinates.
    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// A loaded PDF ready for glyph extraction.
pub struct GlyphDocument {
    inner: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for GlyphDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl GlyphDocument {
    /// Parse a PDF from memory.
    ///
    /// # Errors
    ///
    /// [`BackendError::Parse`] for malformed input and
    /// [`BackendError::Encrypted`] for encrypted documents.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        Self::from_document(inner)
    }

    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes)
    }

    /// Wrap an already loaded lopdf document.
    pub fn from_document(inner: Document) -> Result<Self, BackendError> {
        if inner.is_encrypted() {
            return Err(BackendError::Encrypted);
        }
        let page_ids = inner.get_pages().into_values().collect();
        Ok(Self { inner, page_ids })
    }

    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Give up extraction access and return the lopdf document for editing.
    pub fn into_inner(self) -> Document {
        self.inner
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of a 1-based page.
    pub fn page_id(&self, page: u32) -> Result<ObjectId, BackendError> {
        (page as usize)
            .checked_sub(1)
            .and_then(|i| self.page_ids.get(i))
            .copied()
            .ok_or_else(|| {
                BackendError::Parse(format!(
                    "page {page} out of range (1..={})",
                    self.page_ids.len()
                ))
            })
    }

    /// MediaBox size of a 1-based page, inherited through the page tree.
    pub fn page_size(&self, page: u32) -> Result<PageSize, BackendError> {
        let id = self.page_id(page)?;
        let obj = inherited(&self.inner, id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse(format!("page {page} has no MediaBox")))?;
        let values = resolve(&self.inner, obj)
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?
            .iter()
            .map(|o| match resolve(&self.inner, o) {
                Object::Integer(i) => Ok(*i as f64),
                Object::Real(r) => Ok(f64::from(*r)),
                other => Err(BackendError::Parse(format!(
                    "MediaBox entry is not a number: {other:?}"
                ))),
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let &[x0, y0, x1, y1] = values.as_slice() else {
            return Err(BackendError::Parse(format!(
                "MediaBox has {} entries, expected 4",
                values.len()
            )));
        };
        Ok(PageSize {
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            origin_x: x0.min(x1),
            origin_y: y0.min(y1),
        })
    }

    /// Glyphs on one 1-based page, in content stream order.
    pub fn extract_page_glyphs(&self, page: u32) -> Result<Vec<Glyph>, BackendError> {
        let id = self.page_id(page)?;
        let size = self.page_size(page)?;

        let empty = Dictionary::new();
        let resources = match inherited(&self.inner, id, b"Resources")? {
            Some(obj) => resolve(&self.inner, obj).as_dict().unwrap_or(&empty),
            None => &empty,
        };
        let content = self.page_content(id)?;

        let mut interpreter = Interpreter::new(
            &self.inner,
            Ctm::translate(-size.origin_x, -size.origin_y),
        );
        interpreter.run(&content, resources, 0)?;

        let glyphs: Vec<Glyph> = interpreter
            .into_glyphs()
            .into_iter()
            .map(|g| Glyph::new(g.text, page, g.bbox, g.font_size))
            .collect();
        tracing::debug!(page, glyphs = glyphs.len(), "extracted page");
        Ok(glyphs)
    }

    /// Glyphs on every page, pages in ascending order.
    pub fn extract_glyphs(&self) -> Result<Vec<Glyph>, BackendError> {
        let mut glyphs = Vec::new();
        for page in 1..=self.page_count() as u32 {
            glyphs.extend(self.extract_page_glyphs(page)?);
        }
        Ok(glyphs)
    }

    /// Concatenated page content; streams are joined with a newline.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>, BackendError> {
        let page = self.inner.get_dictionary(page_id)?;
        let Ok(contents) = page.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let refs: Vec<&Object> = match resolve(&self.inner, contents) {
            Object::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in refs {
            match resolve(&self.inner, obj).as_stream() {
                Ok(stream) => {
                    content.extend(stream_bytes(stream));
                    content.push(b'\n');
                }
                Err(_) => tracing::warn!(?page_id, "skipping non-stream page content entry"),
            }
        }
        Ok(content)
    }
}

/// Look up a page attribute, walking `/Parent` links when absent.
///
/// Returns the value as stored, which may be a reference.
pub fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // Bounded walk guards against /Parent cycles
    for _ in 0..64 {
        let dict = doc.get_dictionary(current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    /// Single-font document with one page per content string.
    fn build_pdf(media_box: [i64; 4], pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for content in pages {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.as_bytes().to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
                "MediaBox" => media_box.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    #[test]
    fn page_count_and_inherited_media_box() {
        let bytes = build_pdf([0, 0, 612, 792], &["", ""]);
        let doc = GlyphDocument::open(&bytes).unwrap();
        assert_eq!(doc.page_count(), 2);
        let size = doc.page_size(2).unwrap();
        assert_eq!((size.width, size.height), (612.0, 792.0));
        assert_eq!(size.bbox(), BBox::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn page_numbers_are_one_based() {
        let bytes = build_pdf([0, 0, 100, 100], &[""]);
        let doc = GlyphDocument::open(&bytes).unwrap();
        assert!(doc.page_id(1).is_ok());
        assert!(matches!(doc.page_id(0), Err(BackendError::Parse(_))));
        assert!(matches!(doc.page_size(2), Err(BackendError::Parse(_))));
    }

    #[test]
    fn extracts_glyphs_with_page_numbers() {
        let bytes = build_pdf(
            [0, 0, 612, 792],
            &[
                "BT /F1 12 Tf 72 700 Td (Hi) Tj ET",
                "BT /F1 12 Tf 72 700 Td (A B) Tj ET",
            ],
        );
        let doc = GlyphDocument::open(&bytes).unwrap();
        let glyphs = doc.extract_glyphs().unwrap();

        let summary: Vec<(&str, Option<u32>)> =
            glyphs.iter().map(|g| (g.text.as_str(), g.page)).collect();
        assert_eq!(
            summary,
            vec![
                ("H", Some(1)),
                ("i", Some(1)),
                ("A", Some(2)),
                (" ", Some(2)),
                ("B", Some(2)),
            ]
        );
        assert_eq!(glyphs[0].font_size, 12.0);
        assert!((glyphs[0].bbox.x - 72.0).abs() < 1e-9);
        assert!((glyphs[0].bbox.y - 697.0).abs() < 1e-9);
        // Helvetica 'H' advances 722/1000 em
        assert!((glyphs[0].bbox.width - 8.664).abs() < 1e-9);
        assert!((glyphs[1].bbox.x - 80.664).abs() < 1e-9);
        // 'A' 667 then space 278
        assert!((glyphs[3].bbox.x - 80.004).abs() < 1e-9);
        assert!((glyphs[4].bbox.x - 83.34).abs() < 1e-9);
    }

    #[test]
    fn boxes_are_relative_to_media_box_origin() {
        let bytes = build_pdf([100, 200, 400, 600], &["BT /F1 10 Tf 110 210 Td (x) Tj ET"]);
        let doc = GlyphDocument::open(&bytes).unwrap();
        let size = doc.page_size(1).unwrap();
        assert_eq!((size.origin_x, size.origin_y), (100.0, 200.0));
        assert_eq!((size.width, size.height), (300.0, 400.0));

        let glyphs = doc.extract_page_glyphs(1).unwrap();
        assert!((glyphs[0].bbox.x - 10.0).abs() < 1e-9);
        assert!((glyphs[0].bbox.y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn page_without_contents_has_no_glyphs() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 50.into(), 50.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let doc = GlyphDocument::from_document(doc).unwrap();
        assert!(doc.extract_glyphs().unwrap().is_empty());
    }

    #[test]
    fn garbage_is_parse_error() {
        let err = GlyphDocument::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GlyphDocument::open_file("/nonexistent/glyphscan/test.pdf").unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
