//! Content stream interpreter producing positioned glyphs.
//!
//! Walks the operators of a page (and the Form XObjects it paints),
//! tracking the CTM and text state, and records one [`RenderedGlyph`] per
//! shown character code. Path, color, image and marked-content operators
//! do not affect glyph placement and are skipped.

use std::collections::HashMap;
use std::rc::Rc;

use glyphscan_core::{BBox, Ctm, Point};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::BackendError;
use crate::font::Font;
use crate::text_state::TextState;

/// Maximum nesting of Form XObjects painted with `Do`.
pub const MAX_FORM_DEPTH: usize = 10;

/// A shown glyph in the coordinate space of the initial CTM.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGlyph {
    pub text: String,
    pub bbox: BBox,
    /// Font size scaled by the text matrix and CTM.
    pub font_size: f64,
}

pub(crate) struct Interpreter<'a> {
    doc: &'a Document,
    ctm: Ctm,
    text: TextState,
    stack: Vec<(Ctm, TextState)>,
    fonts: HashMap<ObjectId, Rc<Font>>,
    glyphs: Vec<RenderedGlyph>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(doc: &'a Document, ctm: Ctm) -> Self {
        Self {
            doc,
            ctm,
            text: TextState::default(),
            stack: Vec::new(),
            fonts: HashMap::new(),
            glyphs: Vec::new(),
        }
    }

    pub(crate) fn into_glyphs(self) -> Vec<RenderedGlyph> {
        self.glyphs
    }

    /// Interpret one content stream against `resources`.
    ///
    /// `depth` is 0 for page content and grows by one per Form XObject.
    pub(crate) fn run(
        &mut self,
        content: &[u8],
        resources: &Dictionary,
        depth: usize,
    ) -> Result<(), BackendError> {
        if depth > MAX_FORM_DEPTH {
            return Err(BackendError::Interpreter(format!(
                "Form XObject nesting exceeds {MAX_FORM_DEPTH}"
            )));
        }

        let content = Content::decode(content)
            .map_err(|e| BackendError::Interpreter(format!("cannot decode content stream: {e}")))?;

        for op in &content.operations {
            let args = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => self.stack.push((self.ctm, self.text.clone())),
                "Q" => {
                    if let Some((ctm, text)) = self.stack.pop() {
                        self.ctm = ctm;
                        self.text.restore_params(text);
                    }
                }
                "cm" => {
                    if let Some(m) = matrix(args) {
                        self.ctm = m.concat(&self.ctm);
                    }
                }
                "BT" => self.text.begin_text(),
                "ET" => {}
                "Tf" => {
                    if let (Some(name), Some(size)) = (
                        args.first().and_then(|o| o.as_name().ok()),
                        num(args, 1),
                    ) {
                        self.text.font = self.load_font(resources, name);
                        self.text.font_size = size;
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix(args) {
                        self.text.set_matrix(m);
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (num(args, 0), num(args, 1)) {
                        self.text.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (num(args, 0), num(args, 1)) {
                        self.text.move_line_set_leading(tx, ty);
                    }
                }
                "T*" => self.text.next_line(),
                "TL" => set(&mut self.text.leading, num(args, 0)),
                "Tc" => set(&mut self.text.char_spacing, num(args, 0)),
                "Tw" => set(&mut self.text.word_spacing, num(args, 0)),
                "Tz" => set(&mut self.text.h_scaling, num(args, 0)),
                "Ts" => set(&mut self.text.rise, num(args, 0)),
                "Tj" => {
                    if let Some(bytes) = string(args, 0) {
                        self.show(bytes);
                    }
                }
                "'" => {
                    self.text.next_line();
                    if let Some(bytes) = string(args, 0) {
                        self.show(bytes);
                    }
                }
                "\"" => {
                    set(&mut self.text.word_spacing, num(args, 0));
                    set(&mut self.text.char_spacing, num(args, 1));
                    self.text.next_line();
                    if let Some(bytes) = string(args, 2) {
                        self.show(bytes);
                    }
                }
                "TJ" => {
                    if let Some(Ok(items)) = args.first().map(Object::as_array) {
                        self.show_positioned(items);
                    }
                }
                "Do" => {
                    if let Some(Ok(name)) = args.first().map(Object::as_name) {
                        self.paint_xobject(resources, name, depth)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// `TJ`: strings are shown, numbers move left by thousandths of a unit.
    fn show_positioned(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show(bytes),
                other => {
                    if let Some(adjust) = as_f64(other) {
                        let tx = -adjust / 1000.0 * self.text.font_size * self.text.scale();
                        self.text.advance(tx);
                    }
                }
            }
        }
    }

    fn show(&mut self, bytes: &[u8]) {
        let font = Rc::clone(&self.text.font);
        let ascent = font.ascent() / 1000.0;
        let descent = font.descent() / 1000.0;

        for code in font.decode_codes(bytes) {
            let w0 = font.width(code) / 1000.0;
            let text = font.text(code);

            if !text.is_empty() {
                let trm = self.text.render_matrix(&self.ctm);
                self.glyphs.push(RenderedGlyph {
                    text,
                    bbox: hull(&trm, w0, descent, ascent),
                    font_size: self.text.effective_font_size(&self.ctm),
                });
            }

            let word_spacing = if code == 32 && !font.is_composite() {
                self.text.word_spacing
            } else {
                0.0
            };
            let tx = (w0 * self.text.font_size + self.text.char_spacing + word_spacing)
                * self.text.scale();
            self.text.advance(tx);
        }
    }

    fn load_font(&mut self, resources: &Dictionary, name: &[u8]) -> Rc<Font> {
        let label = String::from_utf8_lossy(name).into_owned();
        let entry = resources
            .get(b"Font")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .and_then(|fonts| fonts.get(name).ok());

        let Some(entry) = entry else {
            tracing::warn!(font = %label, "font resource not found; using default metrics");
            return Rc::new(Font::fallback(&label));
        };

        let id = entry.as_reference().ok();
        if let Some(font) = id.and_then(|id| self.fonts.get(&id)) {
            return Rc::clone(font);
        }

        let font = match resolve(self.doc, entry).as_dict() {
            Ok(dict) => Font::from_dict(self.doc, dict).unwrap_or_else(|e| {
                tracing::warn!(font = %label, error = %e, "using default metrics");
                Font::fallback(&label)
            }),
            Err(_) => {
                tracing::warn!(font = %label, "font resource is not a dictionary");
                Font::fallback(&label)
            }
        };
        let font = Rc::new(font);
        if let Some(id) = id {
            self.fonts.insert(id, Rc::clone(&font));
        }
        font
    }

    fn paint_xobject(
        &mut self,
        resources: &Dictionary,
        name: &[u8],
        depth: usize,
    ) -> Result<(), BackendError> {
        let doc = self.doc;
        let stream = resources
            .get(b"XObject")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|xobjects| xobjects.get(name).ok())
            .and_then(|o| resolve(doc, o).as_stream().ok());

        let Some(stream) = stream else {
            tracing::warn!(
                xobject = %String::from_utf8_lossy(name),
                "XObject not found in resources"
            );
            return Ok(());
        };

        let is_form = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            == Some(b"Form".as_slice());
        if !is_form {
            return Ok(());
        }

        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .unwrap_or(resources);
        let content = stream_bytes(stream);

        self.stack.push((self.ctm, self.text.clone()));
        if let Some(m) = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| matrix(arr))
        {
            self.ctm = m.concat(&self.ctm);
        }

        let result = self.run(&content, form_resources, depth + 1);

        if let Some((ctm, text)) = self.stack.pop() {
            self.ctm = ctm;
            self.text.restore_params(text);
        }
        result
    }
}

/// Axis-aligned hull of the glyph rectangle `[0, w] x [descent, ascent]`
/// after transformation by `trm`.
fn hull(trm: &Ctm, w: f64, descent: f64, ascent: f64) -> BBox {
    let corners = [
        trm.transform_point(Point::new(0.0, descent)),
        trm.transform_point(Point::new(w, descent)),
        trm.transform_point(Point::new(w, ascent)),
        trm.transform_point(Point::new(0.0, ascent)),
    ];
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    BBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Stream bytes, decompressed when a filter is present.
pub(crate) fn stream_bytes(stream: &Stream) -> Vec<u8> {
    if stream.dict.get(b"Filter").is_err() {
        return stream.content.clone();
    }
    stream.decompressed_content().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "cannot decompress stream; using raw bytes");
        stream.content.clone()
    })
}

fn as_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn num(args: &[Object], index: usize) -> Option<f64> {
    args.get(index).and_then(as_f64)
}

fn string(args: &[Object], index: usize) -> Option<&[u8]> {
    match args.get(index) {
        Some(Object::String(bytes, _)) => Some(bytes.as_slice()),
        _ => None,
    }
}

fn matrix(args: &[Object]) -> Option<Ctm> {
    if args.len() < 6 {
        return None;
    }
    Some(Ctm::new(
        num(args, 0)?,
        num(args, 1)?,
        num(args, 2)?,
        num(args, 3)?,
        num(args, 4)?,
        num(args, 5)?,
    ))
}

fn set(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn run(doc: &Document, content: &[u8], resources: &Dictionary) -> Vec<RenderedGlyph> {
        let mut interp = Interpreter::new(doc, Ctm::identity());
        interp.run(content, resources, 0).unwrap();
        interp.into_glyphs()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn simple_text_with_default_metrics() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf 100 200 Td (Hi) Tj ET", &Dictionary::new());

        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].text, "H");
        assert_eq!(glyphs[1].text, "i");
        // 500/1000 * 10 wide, from descent -2.5 to ascent 7.5
        assert_approx(glyphs[0].bbox.x, 100.0);
        assert_approx(glyphs[0].bbox.y, 197.5);
        assert_approx(glyphs[0].bbox.width, 5.0);
        assert_approx(glyphs[0].bbox.height, 10.0);
        assert_approx(glyphs[1].bbox.x, 105.0);
        assert_eq!(glyphs[0].font_size, 10.0);
    }

    #[test]
    fn spaces_are_emitted_with_glyph_width() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf 2 Tw (a b) Tj ET", &Dictionary::new());
        let texts: Vec<&str> = glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " ", "b"]);
        assert_approx(glyphs[1].bbox.x, 5.0);
        // Word spacing moves the next glyph but does not widen the space
        assert_approx(glyphs[1].bbox.width, 5.0);
        assert_approx(glyphs[2].bbox.x, 12.0);
    }

    #[test]
    fn code_mapped_to_nothing_is_not_a_glyph() {
        let mut doc = Document::with_version("1.5");
        let cmap = doc.add_object(Stream::new(
            Dictionary::new(),
            b"beginbfchar\n<01> <>\nendbfchar".to_vec(),
        ));
        let font_id = doc.add_object(dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "ToUnicode" => cmap,
        });
        let resources = dictionary! { "Font" => dictionary! { "F1" => font_id } };
        let glyphs = run(&doc, b"BT /F1 10 Tf <0161> Tj ET", &resources);
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].text, "a");
        assert_approx(glyphs[0].bbox.x, 5.0);
    }

    #[test]
    fn tj_array_adjustments() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf [(A) 500 (B) -1000 (C)] TJ ET", &Dictionary::new());
        assert_eq!(glyphs.len(), 3);
        assert_approx(glyphs[1].bbox.x, 0.0);
        assert_approx(glyphs[2].bbox.x, 15.0);
        // B moved back onto A
        assert!(glyphs[0].bbox.intersects(&glyphs[1].bbox));
    }

    #[test]
    fn char_spacing_and_horizontal_scaling() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf 1 Tc 50 Tz (ab) Tj ET", &Dictionary::new());
        assert_approx(glyphs[0].bbox.width, 2.5);
        assert_approx(glyphs[1].bbox.x, 3.0);
    }

    #[test]
    fn quote_operators_move_to_next_line() {
        let doc = Document::with_version("1.5");
        let content = b"BT /F1 10 Tf 12 TL 0 100 Td (a) Tj (b) ' 3 0 (c) \" ET";
        let glyphs = run(&doc, content, &Dictionary::new());
        assert_eq!(glyphs.len(), 3);
        assert_approx(glyphs[1].bbox.x, 0.0);
        assert_approx(glyphs[1].bbox.y, 88.0 - 2.5);
        assert_approx(glyphs[2].bbox.y, 76.0 - 2.5);
    }

    #[test]
    fn ctm_and_save_restore() {
        let doc = Document::with_version("1.5");
        let content = b"q 2 0 0 2 10 10 cm BT /F1 10 Tf (a) Tj ET Q BT /F1 10 Tf (b) Tj ET";
        let glyphs = run(&doc, content, &Dictionary::new());
        assert_approx(glyphs[0].bbox.x, 10.0);
        assert_approx(glyphs[0].bbox.width, 10.0);
        assert_eq!(glyphs[0].font_size, 20.0);
        assert_approx(glyphs[1].bbox.x, 0.0);
        assert_approx(glyphs[1].bbox.width, 5.0);
    }

    #[test]
    fn rise_shifts_box() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf 4 Ts (x) Tj ET", &Dictionary::new());
        assert_approx(glyphs[0].bbox.y, 1.5);
    }

    #[test]
    fn rotated_text_uses_hull() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"BT /F1 10 Tf 0 1 -1 0 50 50 Tm (a) Tj ET", &Dictionary::new());
        let b = glyphs[0].bbox;
        assert_approx(b.width, 10.0);
        assert_approx(b.height, 5.0);
        assert_approx(b.x, 42.5);
        assert_approx(b.y, 50.0);
    }

    #[test]
    fn font_widths_from_resources() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Narrow",
            "FirstChar" => 97,
            "Widths" => vec![200.into(), 800.into()],
        });
        let resources = dictionary! { "Font" => dictionary! { "F1" => font_id } };
        let glyphs = run(&doc, b"BT /F1 10 Tf (abc) Tj ET", &resources);
        assert_approx(glyphs[0].bbox.width, 2.0);
        assert_approx(glyphs[1].bbox.x, 2.0);
        assert_approx(glyphs[1].bbox.width, 8.0);
        // c falls back to the descriptor-less missing width
        assert_approx(glyphs[2].bbox.x, 10.0);
        assert_approx(glyphs[2].bbox.width, 5.0);
    }

    #[test]
    fn form_xobject_is_interpreted_with_matrix() {
        let mut doc = Document::with_version("1.5");
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 100.into(), 0.into()],
            },
            b"BT /F1 10 Tf (z) Tj ET".to_vec(),
        );
        let form_id = doc.add_object(form);
        let resources = dictionary! { "XObject" => dictionary! { "X1" => form_id } };

        let glyphs = run(&doc, b"q 1 0 0 1 0 20 cm /X1 Do Q BT /F1 10 Tf (y) Tj ET", &resources);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].text, "z");
        assert_approx(glyphs[0].bbox.x, 100.0);
        assert_approx(glyphs[0].bbox.y, 17.5);
        assert_approx(glyphs[1].bbox.x, 0.0);
    }

    #[test]
    fn self_referencing_form_hits_depth_limit() {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        let resources = dictionary! { "XObject" => dictionary! { "X1" => form_id } };
        let form = Stream::new(
            dictionary! {
                "Subtype" => "Form",
                "Resources" => resources.clone(),
            },
            b"/X1 Do".to_vec(),
        );
        doc.objects.insert(form_id, Object::Stream(form));

        let mut interp = Interpreter::new(&doc, Ctm::identity());
        let err = interp.run(b"/X1 Do", &resources, 0).unwrap_err();
        assert!(matches!(err, BackendError::Interpreter(_)));
        assert!(err.to_string().contains("nesting"));
    }

    #[test]
    fn missing_xobject_is_ignored() {
        let doc = Document::with_version("1.5");
        let glyphs = run(&doc, b"/Nope Do BT /F1 10 Tf (a) Tj ET", &Dictionary::new());
        assert_eq!(glyphs.len(), 1);
    }
}
