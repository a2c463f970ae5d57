//! Drawing overlap highlights and region labels onto a PDF.
//!
//! Each marked page keeps its original content, wrapped in `q … Q` so its
//! graphics state cannot leak, followed by one overlay stream. Highlight
//! boxes are in MediaBox-relative coordinates, so the overlay translates by
//! the MediaBox origin before drawing.

use glyphscan_core::{
    BBox, HighlightSet, HorizontalBand, PositionLabel, VerticalBand, count_positions,
};
use glyphscan_parse::{PageSize, inherited};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;

/// Resource name of the translucent highlight graphics state.
pub const MARK_GS: &str = "GSOverlapMark";
/// Resource name of the label graphics state.
pub const LABEL_GS: &str = "GSOverlapLabel";
/// Resource name of the label font.
pub const LABEL_FONT: &str = "FOverlapLabel";

const MARK_ALPHA: f32 = 0.3;
const LABEL_ALPHA: f32 = 0.7;
const LABEL_FONT_SIZE: i64 = 10;

/// Failure while adding overlays to a document.
#[derive(Debug, Error)]
pub enum MarkError {
    #[error("page {0} not found")]
    PageNotFound(u32),

    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
}

/// Highlights to draw on one page.
#[derive(Debug, Clone, Copy)]
pub struct PageMarks<'a> {
    /// 1-based page number.
    pub page: u32,
    pub size: PageSize,
    pub highlights: &'a HighlightSet,
}

/// Where the label for a region is drawn, relative to the MediaBox origin.
pub fn label_anchor(label: PositionLabel, page_width: f64, page_height: f64) -> (f64, f64) {
    let x = match label.horizontal {
        HorizontalBand::Left => 10.0,
        HorizontalBand::Center => page_width / 2.0 - 40.0,
        HorizontalBand::Right => page_width - 120.0,
    };
    let y = match label.vertical {
        VerticalBand::Bottom => 10.0,
        VerticalBand::Middle => page_height / 2.0,
        VerticalBand::Top => page_height - 20.0,
    };
    (x, y)
}

/// Add highlight overlays for every entry of `marks` to `doc`.
///
/// # Errors
///
/// Fails if a page number does not exist, a page object is not a
/// dictionary, or an overlay stream cannot be encoded.
pub fn mark_document(
    doc: &mut Document,
    marks: &[PageMarks<'_>],
    add_labels: bool,
) -> Result<(), MarkError> {
    let pages = doc.get_pages();
    for mark in marks {
        let page_id = *pages
            .get(&mark.page)
            .ok_or(MarkError::PageNotFound(mark.page))?;
        mark_page(doc, page_id, mark, add_labels)?;
    }
    Ok(())
}

fn mark_page(
    doc: &mut Document,
    page_id: ObjectId,
    mark: &PageMarks<'_>,
    add_labels: bool,
) -> Result<(), lopdf::Error> {
    let resources = overlay_resources(doc, page_id);
    let overlay = overlay_operations(mark, add_labels);
    let overlay_bytes = Content { operations: overlay }.encode()?;

    let existing = page_contents(doc, page_id)?;
    let mut contents: Vec<Object> = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(open.into());
        contents.extend(existing);
        contents.push(close.into());
    }
    contents.push(
        doc.add_object(Stream::new(Dictionary::new(), overlay_bytes))
            .into(),
    );

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));

    tracing::debug!(
        page = mark.page,
        boxes = mark.highlights.len(),
        "marked page"
    );
    Ok(())
}

/// The page's `/Contents` entries as a flat list of objects.
fn page_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, lopdf::Error> {
    let page = doc.get_dictionary(page_id)?;
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    Ok(match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            // An indirect array of streams
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Object::Array(items) => items.clone(),
        _ => {
            tracing::warn!(?page_id, "dropping malformed /Contents");
            Vec::new()
        }
    })
}

/// A direct copy of the page's effective resources with the overlay's
/// graphics states and font added.
fn overlay_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut resources = inherited(doc, page_id, b"Resources")
        .ok()
        .flatten()
        .and_then(|obj| resolve_dict(doc, obj))
        .unwrap_or_default();

    let mut gs = sub_dict(doc, &resources, b"ExtGState");
    gs.set(MARK_GS, ext_gstate(MARK_ALPHA));
    gs.set(LABEL_GS, ext_gstate(LABEL_ALPHA));
    resources.set("ExtGState", Object::Dictionary(gs));

    let mut fonts = sub_dict(doc, &resources, b"Font");
    fonts.set(
        LABEL_FONT,
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        },
    );
    resources.set("Font", Object::Dictionary(fonts));

    resources
}

fn ext_gstate(alpha: f32) -> Dictionary {
    dictionary! {
        "Type" => "ExtGState",
        "CA" => Object::Real(alpha),
        "ca" => Object::Real(alpha),
    }
}

fn resolve_dict(doc: &Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        Object::Dictionary(dict) => Some(dict.clone()),
        _ => None,
    }
}

fn sub_dict(doc: &Document, parent: &Dictionary, key: &[u8]) -> Dictionary {
    parent
        .get(key)
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))
        .unwrap_or_default()
}

fn overlay_operations(mark: &PageMarks<'_>, add_labels: bool) -> Vec<Operation> {
    let size = mark.size;
    let mut ops = vec![
        Operation::new("q", vec![]),
        translate(size.origin_x, size.origin_y),
        Operation::new("gs", vec![Object::Name(MARK_GS.as_bytes().to_vec())]),
        Operation::new("RG", ints(&[1, 0, 0])),
        Operation::new("rg", ints(&[1, 0, 0])),
        Operation::new("w", ints(&[1])),
    ];
    for b in mark.highlights.boxes() {
        ops.push(rect(b));
        ops.push(Operation::new("B", vec![]));
    }
    ops.push(Operation::new("Q", vec![]));

    if add_labels {
        let counts = count_positions(mark.highlights.boxes(), size.width, size.height);
        if !counts.is_empty() {
            ops.push(Operation::new("q", vec![]));
            ops.push(translate(size.origin_x, size.origin_y));
            ops.push(Operation::new(
                "gs",
                vec![Object::Name(LABEL_GS.as_bytes().to_vec())],
            ));
            ops.push(Operation::new("rg", ints(&[0, 0, 1])));
            for (label, count) in counts {
                let (x, y) = label_anchor(label, size.width, size.height);
                ops.extend([
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![
                            Object::Name(LABEL_FONT.as_bytes().to_vec()),
                            Object::Integer(LABEL_FONT_SIZE),
                        ],
                    ),
                    Operation::new("Tm", [ints(&[1, 0, 0, 1]), vec![real(x), real(y)]].concat()),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("{label}: {count}"))],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
            ops.push(Operation::new("Q", vec![]));
        }
    }
    ops
}

fn translate(x: f64, y: f64) -> Operation {
    Operation::new("cm", [ints(&[1, 0, 0, 1]), vec![real(x), real(y)]].concat())
}

fn rect(b: &BBox) -> Operation {
    Operation::new(
        "re",
        vec![real(b.x), real(b.y), real(b.width), real(b.height)],
    )
}

fn ints(values: &[i64]) -> Vec<Object> {
    values.iter().map(|&v| Object::Integer(v)).collect()
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}
