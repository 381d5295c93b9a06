//! Content stream interpretation.
//!
//! Walks a page's content stream tracking the text matrix, and emits one
//! [`TextRun`] per shown string with its decoded text, geometry, and font
//! attributes. Only the text-positioning subset of operators is
//! interpreted; graphics operators are ignored.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, FontStyle, TextRun};

/// Approximate glyph width as a fraction of font size, used when the
/// content stream gives no metrics.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments beyond this many 1/1000 text-space units are treated as
/// word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extract the text runs of one page in content-stream order.
pub(crate) fn extract_page_runs(
    doc: &LopdfDocument,
    page: u32,
    page_id: ObjectId,
) -> Result<Vec<TextRun>> {
    let lopdf_fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::decode(page, e.to_string()))?;

    // Resolve resource names to base font names once per page.
    let mut base_fonts = HashMap::new();
    for (name, font) in &lopdf_fonts {
        let base = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        base_fonts.insert(name.clone(), base);
    }

    let content = page_content(doc, page, page_id)?;
    interpret(doc, page, &content, &base_fonts, &lopdf_fonts)
}

/// Fetch and concatenate the page's (possibly split) content streams.
fn page_content(doc: &LopdfDocument, page: u32, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::decode(page, e.to_string()))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| Error::decode(page, e.to_string()))?;

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .decompressed_content()
                    .map_err(|e| Error::decode(page, e.to_string()));
            }
            Err(Error::decode(page, "invalid content stream"))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::decode(page, "invalid content stream")),
    }
}

fn interpret(
    doc: &LopdfDocument,
    page: u32,
    content: &[u8],
    base_fonts: &HashMap<Vec<u8>, String>,
    lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
) -> Result<Vec<TextRun>> {
    let content = lopdf::content::Content::decode(content)
        .map_err(|e| Error::decode(page, e.to_string()))?;

    let mut runs = Vec::new();
    let mut style = FontStyle::Regular;
    let mut font_resource: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                matrix = TextMatrix::default();
            }
            "ET" => in_text = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        font_resource = name.clone();
                        let base = base_fonts
                            .get(name.as_slice())
                            .map(String::as_str)
                            .unwrap_or("");
                        style = FontStyle::from_font_name(base);
                    }
                    font_size = number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    matrix.set(
                        number(&op.operands[0]).unwrap_or(1.0),
                        number(&op.operands[1]).unwrap_or(0.0),
                        number(&op.operands[2]).unwrap_or(0.0),
                        number(&op.operands[3]).unwrap_or(1.0),
                        number(&op.operands[4]).unwrap_or(0.0),
                        number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => matrix.next_line(),
            "Tj" | "TJ" => {
                if !in_text {
                    continue;
                }
                let encoding = lopdf_fonts
                    .get(&font_resource)
                    .and_then(|f| f.get_font_encoding(doc).ok());

                let text = if op.operator == "TJ" {
                    decode_tj_array(op.operands.first(), encoding.as_ref())
                } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                    decode_string(bytes, encoding.as_ref())
                } else {
                    String::new()
                };

                emit_run(&mut runs, &text, page, font_size, style, &mut matrix);
            }
            "'" | "\"" => {
                matrix.next_line();
                if !in_text {
                    continue;
                }
                // The " operator carries word/char spacing before the string.
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                    let encoding = lopdf_fonts
                        .get(&font_resource)
                        .and_then(|f| f.get_font_encoding(doc).ok());
                    let text = decode_string(bytes, encoding.as_ref());
                    emit_run(&mut runs, &text, page, font_size, style, &mut matrix);
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

/// Push a run for decoded text, estimating its box from glyph count, and
/// advance the matrix so following runs on the same line land to the right.
fn emit_run(
    runs: &mut Vec<TextRun>,
    text: &str,
    page: u32,
    font_size: f32,
    style: FontStyle,
    matrix: &mut TextMatrix,
) {
    let text: String = text.nfc().collect();
    if text.trim().is_empty() {
        return;
    }

    let (x, y) = matrix.position();
    let size = font_size * matrix.scale();
    let width = size * AVG_GLYPH_WIDTH * text.chars().count() as f32;
    // Approximate ascender/descender extents from the font size.
    let bbox = BoundingBox::new(x, y - size * 0.2, x + width, y + size * 0.8);

    runs.push(TextRun::new(text, page, size, style, bbox));
    matrix.advance(width);
}

fn decode_string(bytes: &[u8], encoding: Option<&lopdf::Encoding>) -> String {
    if let Some(enc) = encoding {
        if let Ok(decoded) = LopdfDocument::decode_text(enc, bytes) {
            return decoded;
        }
    }
    decode_text_simple(bytes)
}

fn decode_tj_array(operand: Option<&Object>, encoding: Option<&lopdf::Encoding>) -> String {
    let Some(Object::Array(arr)) = operand else {
        return String::new();
    };

    let mut combined = String::new();
    for item in arr {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_string(bytes, encoding));
            }
            Object::Integer(n) => {
                push_tj_space(&mut combined, -(*n as f32));
            }
            Object::Real(n) => {
                push_tj_space(&mut combined, -n);
            }
            _ => {}
        }
    }
    combined
}

/// Large negative TJ adjustments move the pen rightward far enough to act
/// as word separators.
fn push_tj_space(combined: &mut String, adjustment: f32) {
    if adjustment > TJ_SPACE_THRESHOLD
        && !combined.is_empty()
        && !combined.ends_with(' ')
        && !combined.ends_with('\u{00A0}')
    {
        combined.push(' ');
    }
}

/// Decoding fallback when the font declares no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM is the PDF convention for Unicode strings.
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix tracking the pen position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; TL is rare enough in headings to ignore here.
        self.f -= 12.0 * self.d;
    }

    fn advance(&mut self, width: f32) {
        self.e += width;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
