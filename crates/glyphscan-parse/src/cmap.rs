//! ToUnicode CMap parsing.
//!
//! Only the parts of a CMap that map codes to text are read:
//! `beginbfchar`/`endbfchar` and `beginbfrange`/`endbfrange` sections with
//! UTF-16BE destinations. Entries may share a line or span several.

use std::collections::HashMap;

use crate::error::BackendError;

/// Most codes a single range entry may cover. Larger ranges are truncated.
pub(crate) const MAX_RANGE_CODES: u32 = 0x1_0000;

/// `lo..=hi`, cut down to at most [`MAX_RANGE_CODES`] codes.
pub(crate) fn capped_range(lo: u32, hi: u32) -> std::ops::RangeInclusive<u32> {
    let last = lo.saturating_add(MAX_RANGE_CODES - 1);
    if hi > last {
        tracing::warn!(lo, hi, "truncating oversized code range");
    }
    lo..=hi.min(last)
}

/// Character code to Unicode text mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicode {
    mappings: HashMap<u32, String>,
}

impl ToUnicode {
    /// Parse raw (decompressed) CMap bytes.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let tokens = tokenize(section);
            for pair in tokens.chunks_exact(2) {
                if let (Token::Hex(src), Token::Hex(dst)) = (pair[0], pair[1]) {
                    mappings.insert(parse_code(src)?, decode_utf16be(dst)?);
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            let tokens = tokenize(section);
            let mut i = 0;
            while i + 2 < tokens.len() {
                let (Token::Hex(lo), Token::Hex(hi)) = (tokens[i], tokens[i + 1]) else {
                    i += 1;
                    continue;
                };
                let lo = parse_code(lo)?;
                let hi = parse_code(hi)?;
                match tokens[i + 2] {
                    Token::Hex(dst) => {
                        insert_incrementing(&mut mappings, lo, hi, &decode_utf16be(dst)?);
                        i += 3;
                    }
                    Token::ArrayStart => {
                        let mut code = lo;
                        i += 3;
                        while i < tokens.len() {
                            match tokens[i] {
                                Token::Hex(dst) => {
                                    if code <= hi {
                                        mappings.insert(code, decode_utf16be(dst)?);
                                    }
                                    code = code.saturating_add(1);
                                }
                                Token::ArrayEnd => {
                                    i += 1;
                                    break;
                                }
                                Token::ArrayStart => {}
                            }
                            i += 1;
                        }
                    }
                    Token::ArrayEnd => i += 3,
                }
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    ArrayStart,
    ArrayEnd,
}

/// Bodies of every `begin ... end` section, in document order.
fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else { break };
        found.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    found
}

/// Hex strings and array brackets; everything else is ignored.
fn tokenize(section: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = section;
    while let Some(pos) = rest.find(['<', '[', ']']) {
        match rest.as_bytes()[pos] {
            b'[' => {
                tokens.push(Token::ArrayStart);
                rest = &rest[pos + 1..];
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                rest = &rest[pos + 1..];
            }
            _ => {
                let body = &rest[pos + 1..];
                let Some(close) = body.find('>') else { break };
                tokens.push(Token::Hex(body[..close].trim()));
                rest = &body[close + 1..];
            }
        }
    }
    tokens
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Parse(format!("invalid CMap code '{hex}': {e}")))
}

/// Decode a hex UTF-16BE destination string. Two-digit values are single bytes.
fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    if hex.len() == 2 {
        let code = parse_code(hex)?;
        return Ok(char::from_u32(code).map(String::from).unwrap_or_default());
    }
    if hex.len() % 4 != 0 {
        return Err(BackendError::Parse(format!(
            "UTF-16BE destination '{hex}' has odd length {}",
            hex.len()
        )));
    }

    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let digits = std::str::from_utf8(chunk).unwrap_or_default();
            u16::from_str_radix(digits, 16)
                .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE unit '{digits}': {e}")))
        })
        .collect::<Result<Vec<u16>, _>>()?;

    String::from_utf16(&units)
        .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE sequence: {e}")))
}

/// Map `lo..=hi` to `start`, incrementing the last character of `start`.
fn insert_incrementing(mappings: &mut HashMap<u32, String>, lo: u32, hi: u32, start: &str) {
    let Some(last) = start.chars().last() else {
        return;
    };
    let prefix = &start[..start.len() - last.len_utf8()];
    for (offset, code) in (0u32..).zip(capped_range(lo, hi)) {
        if let Some(ch) = (last as u32).checked_add(offset).and_then(char::from_u32) {
            mappings.insert(code, format!("{prefix}{ch}"));
        }
    }
}
