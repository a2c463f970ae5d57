//! Text state and text positioning for the content stream interpreter.
//!
//! Tracks the parameters set by `Tc`, `Tw`, `Tz`, `TL`, `Tf` and `Ts`
//! together with the text and line matrices managed by `BT`, `Tm`, `Td`,
//! `TD` and `T*`.

use std::rc::Rc;

use glyphscan_core::Ctm;

use crate::font::Font;

/// Text parameters plus the text and line matrices.
///
/// The parameters belong to the graphics state and are saved by `q`; the
/// matrices only live inside a `BT`/`ET` text object.
#[derive(Debug, Clone)]
pub struct TextState {
    /// Character spacing (`Tc`), in unscaled text space units.
    pub char_spacing: f64,
    /// Word spacing (`Tw`), applied after single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (`Tz`) as a percentage; 100 is normal.
    pub h_scaling: f64,
    /// Leading (`TL`).
    pub leading: f64,
    pub font: Rc<Font>,
    pub font_size: f64,
    /// Text rise (`Ts`).
    pub rise: f64,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font: Rc::new(Font::default()),
            font_size: 0.0,
            rise: 0.0,
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }
}

impl TextState {
    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
    }

    /// `Tm`: replace both matrices.
    pub fn set_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: move to the start of the next line, offset by `(tx, ty)`.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translate(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: as `Td`, also setting the leading to `-ty`.
    pub fn move_line_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_line(tx, ty);
    }

    /// `T*`: move down by the current leading.
    pub fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Shift the text matrix horizontally by `tx` text space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Ctm::translate(tx, 0.0).concat(&self.text_matrix);
    }

    /// Horizontal scaling as a factor.
    pub fn scale(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// Text rendering matrix: `[fs*Th 0 0 fs 0 rise] x Tm x CTM`.
    pub fn render_matrix(&self, ctm: &Ctm) -> Ctm {
        Ctm::new(
            self.font_size * self.scale(),
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.rise,
        )
        .concat(&self.text_matrix)
        .concat(ctm)
    }

    /// Font size in device space, scaled by the vertical axis of `Tm x CTM`.
    pub fn effective_font_size(&self, ctm: &Ctm) -> f64 {
        let m = self.text_matrix.concat(ctm);
        self.font_size * m.c.hypot(m.d)
    }

    /// Restore the graphics-state parameters from `saved`, keeping the
    /// current matrices.
    pub fn restore_params(&mut self, saved: TextState) {
        let text_matrix = self.text_matrix;
        let line_matrix = self.line_matrix;
        *self = saved;
        self.text_matrix = text_matrix;
        self.line_matrix = line_matrix;
    }
}
