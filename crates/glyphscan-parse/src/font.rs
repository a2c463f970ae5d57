//! Font resources: glyph widths, vertical metrics, and code to text decoding.
//!
//! Simple fonts read one byte per glyph and take widths from `/Widths`
//! starting at `/FirstChar`. Type0 (composite) fonts read two bytes per glyph
//! and take widths from the descendant font's `/W` and `/DW`. A standard 14
//! font without `/Widths` uses its built-in AFM advances. All widths and
//! vertical metrics are in glyph space (1/1000 of text space).

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::cmap::{ToUnicode, capped_range};
use crate::error::BackendError;
use crate::standard_fonts;

/// Width of a glyph the font does not describe.
pub const DEFAULT_WIDTH: f64 = 500.0;

pub const DEFAULT_ASCENT: f64 = 750.0;

pub const DEFAULT_DESCENT: f64 = -250.0;

/// `/DW` when a descendant font omits it.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Composite {
        default: f64,
        widths: HashMap<u32, f64>,
    },
}

/// A font as needed for glyph placement.
#[derive(Debug, Clone)]
pub struct Font {
    base_font: String,
    widths: Widths,
    ascent: f64,
    descent: f64,
    to_unicode: Option<ToUnicode>,
    differences: HashMap<u8, char>,
}

impl Default for Font {
    fn default() -> Self {
        Self::fallback("")
    }
}

impl Font {
    /// Metrics used when a font resource is missing or unreadable.
    pub fn fallback(base_font: &str) -> Self {
        Self {
            base_font: base_font.to_string(),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_WIDTH,
            },
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            to_unicode: None,
            differences: HashMap::new(),
        }
    }

    /// Load a font from its resource dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] for a Type0 font whose
    /// `/DescendantFonts` cannot be resolved.
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> Result<Self, BackendError> {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();

        let subtype = dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok());
        let to_unicode = load_to_unicode(doc, dict);

        if subtype == Some(b"Type0".as_slice()) {
            let descendant = descendant_font(doc, dict).ok_or_else(|| {
                BackendError::Font(format!("Type0 font {base_font} has no descendant font"))
            })?;
            let default = number(doc, descendant.get(b"DW").ok()).unwrap_or(DEFAULT_CID_WIDTH);
            let widths = descendant
                .get(b"W")
                .ok()
                .map(|o| resolve(doc, o))
                .and_then(|o| o.as_array().ok())
                .map(|arr| parse_w_array(doc, arr))
                .unwrap_or_default();
            let (ascent, descent, _) = descriptor_metrics(doc, descendant);

            return Ok(Self {
                base_font,
                widths: Widths::Composite { default, widths },
                ascent,
                descent,
                to_unicode,
                differences: HashMap::new(),
            });
        }

        let (ascent, descent, missing) = descriptor_metrics(doc, dict);
        let explicit = dict
            .get(b"Widths")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok());
        let standard = standard_fonts::widths(&base_font);
        let (first_char, widths): (u32, Vec<f64>) = match (explicit, standard) {
            (Some(arr), _) => (
                number(doc, dict.get(b"FirstChar").ok()).unwrap_or(0.0) as u32,
                arr.iter().map(|w| number(doc, Some(w)).unwrap_or(0.0)).collect(),
            ),
            (None, Some(table)) => (
                standard_fonts::FIRST_CODE,
                table.iter().map(|&w| f64::from(w)).collect(),
            ),
            (None, None) => (0, Vec::new()),
        };

        Ok(Self {
            base_font,
            widths: Widths::Simple {
                first_char,
                widths,
                missing,
            },
            ascent,
            descent,
            to_unicode,
            differences: load_differences(doc, dict),
        })
    }

    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.widths, Widths::Composite { .. })
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Split a shown string into character codes.
    ///
    /// Composite fonts read big-endian pairs; a trailing odd byte is dropped.
    pub fn decode_codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.is_composite() {
            bytes
                .chunks_exact(2)
                .map(|pair| (u32::from(pair[0]) << 8) | u32::from(pair[1]))
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Horizontal advance of `code` in glyph space.
    pub fn width(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Composite { default, widths } => {
                widths.get(&code).copied().unwrap_or(*default)
            }
        }
    }

    /// Unicode text for `code`.
    ///
    /// `/ToUnicode` wins; simple fonts then consult `/Differences` and fall
    /// back to the byte as a Latin-1 code point (with the WinAnsi
    /// punctuation block at 0x80-0x9F).
    pub fn text(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|t| t.lookup(code)) {
            return text.to_string();
        }
        if !self.is_composite() {
            if let Some(&ch) = u8::try_from(code).ok().and_then(|b| self.differences.get(&b)) {
                return ch.to_string();
            }
            if let Some(ch) = win_ansi_high(code) {
                return ch.to_string();
            }
        }
        char::from_u32(code)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string()
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(doc: &Document, obj: Option<&Object>) -> Option<f64> {
    match resolve(doc, obj?) {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// `(ascent, descent, missing_width)` from `/FontDescriptor`.
///
/// A zero ascent and descent (seen in some subset fonts) is treated as absent.
fn descriptor_metrics(doc: &Document, font: &Dictionary) -> (f64, f64, f64) {
    let Some(desc) = font
        .get(b"FontDescriptor")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
    else {
        return (DEFAULT_ASCENT, DEFAULT_DESCENT, DEFAULT_WIDTH);
    };

    let ascent = number(doc, desc.get(b"Ascent").ok()).unwrap_or(DEFAULT_ASCENT);
    let descent = number(doc, desc.get(b"Descent").ok()).unwrap_or(DEFAULT_DESCENT);
    let missing = number(doc, desc.get(b"MissingWidth").ok()).unwrap_or(DEFAULT_WIDTH);

    if ascent == 0.0 && descent == 0.0 {
        (DEFAULT_ASCENT, DEFAULT_DESCENT, missing)
    } else {
        (ascent, descent, missing)
    }
}

fn descendant_font<'a>(doc: &'a Document, type0: &'a Dictionary) -> Option<&'a Dictionary> {
    let arr = resolve(doc, type0.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve(doc, arr.first()?).as_dict().ok()
}

/// Parse a `/W` array: `c [w1 w2 ...]` or `c_first c_last w` runs.
fn parse_w_array(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(start) = number(doc, Some(&items[i])) else {
            i += 1;
            continue;
        };
        let start = start as u32;
        let Some(next) = items.get(i + 1).map(|o| resolve(doc, o)) else {
            break;
        };

        if let Ok(list) = next.as_array() {
            for (cid, w) in (start..=u32::MAX).zip(list) {
                if let Some(w) = number(doc, Some(w)) {
                    widths.insert(cid, w);
                }
            }
            i += 2;
        } else if let (Some(end), Some(w)) = (
            number(doc, Some(next)),
            number(doc, items.get(i + 2)),
        ) {
            for cid in capped_range(start, end as u32) {
                widths.insert(cid, w);
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    widths
}

fn load_to_unicode(doc: &Document, font: &Dictionary) -> Option<ToUnicode> {
    let stream = resolve(doc, font.get(b"ToUnicode").ok()?).as_stream().ok()?;
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    match ToUnicode::parse(&data) {
        Ok(cmap) => Some(cmap),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable ToUnicode CMap");
            None
        }
    }
}

/// `/Encoding << /Differences [code /name ...] >>` as code to character.
fn load_differences(doc: &Document, font: &Dictionary) -> HashMap<u8, char> {
    let mut map = HashMap::new();
    let Some(items) = font
        .get(b"Encoding")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|enc| enc.get(b"Differences").ok())
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
    else {
        return map;
    };

    let mut code: Option<u8> = None;
    for item in items {
        match item {
            Object::Integer(i) => code = u8::try_from(*i).ok(),
            Object::Name(name) => {
                if let Some(c) = code {
                    if let Some(ch) = glyph_name_to_char(&String::from_utf8_lossy(name)) {
                        map.insert(c, ch);
                    }
                    code = c.checked_add(1);
                }
            }
            _ => {}
        }
    }
    map
}

/// Resolve a glyph name: single characters, `uniXXXX`, `uXXXX[XX]`, and
/// common punctuation names.
pub(crate) fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch);
    }
    if let Some(hex) = name.strip_prefix("uni").filter(|h| h.len() == 4) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(hex) = name
        .strip_prefix('u')
        .filter(|h| (4..=6).contains(&h.len()))
    {
        if let Ok(code) = u32::from_str_radix(hex, 16) {
            return char::from_u32(code);
        }
    }
    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

/// Sorted for binary search.
static GLYPH_NAMES: &[(&str, char)] = &[
    ("ampersand", '&'),
    ("asterisk", '*'),
    ("at", '@'),
    ("bracketleft", '['),
    ("bracketright", ']'),
    ("bullet", '\u{2022}'),
    ("colon", ':'),
    ("comma", ','),
    ("dollar", '$'),
    ("eight", '8'),
    ("ellipsis", '\u{2026}'),
    ("emdash", '\u{2014}'),
    ("endash", '\u{2013}'),
    ("equal", '='),
    ("exclam", '!'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '5'),
    ("fl", '\u{FB02}'),
    ("four", '4'),
    ("hyphen", '-'),
    ("nine", '9'),
    ("numbersign", '#'),
    ("one", '1'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("percent", '%'),
    ("period", '.'),
    ("plus", '+'),
    ("question", '?'),
    ("quotedbl", '"'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotesingle", '\''),
    ("semicolon", ';'),
    ("seven", '7'),
    ("six", '6'),
    ("slash", '/'),
    ("space", ' '),
    ("three", '3'),
    ("two", '2'),
    ("underscore", '_'),
    ("zero", '0'),
];

/// WinAnsi assignments for 0x80-0x9F, where Latin-1 has control codes.
fn win_ansi_high(code: u32) -> Option<char> {
    let ch = match code {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(ch)
}
