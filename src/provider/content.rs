//! Content stream interpretation.
//!
//! Walks the operators of a page content stream and records positioned text
//! runs and the bounding boxes of painted paths. Coordinates are PDF user
//! space (bottom-up) after the current transformation matrix is applied.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// TJ adjustments (thousandths of an em) above this read as word spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A shown string with its position and font, in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    /// Decoded text
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size after text and graphics scaling
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl RawSpan {
    /// Approximate top edge (ascender).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Approximate bottom edge (descender).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Axis-aligned rectangle in user space: (x0, y0, x1, y1), bottom-up.
pub(crate) type RawRect = [f32; 4];

/// Everything recorded from one page's content.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageContent {
    /// Text runs in stream order
    pub spans: Vec<RawSpan>,
    /// Bounding boxes of stroked or filled paths
    pub paths: Vec<RawRect>,
}

/// Affine transformation `[a b c d e f]` acting on row vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

impl Matrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text object state between BT and ET.
#[derive(Debug, Clone, Default)]
struct TextState {
    matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
}

impl TextState {
    fn begin(&mut self) {
        self.matrix = Matrix::default();
        self.line_matrix = Matrix::default();
    }

    fn set(&mut self, m: Matrix) {
        self.matrix = m;
        self.line_matrix = m;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn advance(&mut self, tx: f32) {
        self.matrix = Matrix::translation(tx, 0.0).then(&self.matrix);
    }
}

/// Running bounding box of the path under construction.
#[derive(Debug, Clone, Copy, Default)]
struct PathBounds(Option<RawRect>);

impl PathBounds {
    fn add(&mut self, (x, y): (f32, f32)) {
        self.0 = Some(match self.0 {
            Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
            None => [x, y, x, y],
        });
    }

    fn take(&mut self) -> Option<RawRect> {
        self.0.take()
    }
}

/// Interprets the content streams of one page.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>,
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(doc: &'a LopdfDocument, fonts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>) -> Self {
        Self { doc, fonts }
    }

    /// Run the operators of a decoded content stream.
    pub fn run(&self, content: &[u8]) -> Result<PageContent> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut out = PageContent::default();
        let mut ctm = Matrix::default();
        let mut saved: Vec<Matrix> = Vec::new();
        let mut text = TextState::default();
        let mut path = PathBounds::default();
        let mut in_text_block = false;
        let mut font_key: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => {
                    if let Some(m) = saved.pop() {
                        ctm = m;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    text.begin();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            font_key = name.clone();
                            font_name = self.base_font(name);
                        }
                        font_size = get_number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(tl) = operands.first().and_then(get_number) {
                        text.leading = tl;
                    }
                }
                "Td" | "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            text.leading = -ty;
                        }
                        text.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operand(operands) {
                        text.set(m);
                    }
                }
                "T*" => text.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        text.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }

                    let (shown, advance) = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(items)) => self.show_array(&font_key, items, font_size),
                            _ => (String::new(), 0.0),
                        },
                        operator => {
                            let index = if operator == "\"" { 2 } else { 0 };
                            match operands.get(index) {
                                Some(Object::String(bytes, _)) => {
                                    let s = self.decode(&font_key, bytes);
                                    let advance = s.chars().count() as f32 * GLYPH_ADVANCE * font_size;
                                    (s, advance)
                                }
                                _ => (String::new(), 0.0),
                            }
                        }
                    };

                    if !shown.trim().is_empty() {
                        let rendering = text.matrix.then(&ctm);
                        let (x, y) = rendering.apply(0.0, 0.0);
                        out.spans.push(RawSpan {
                            text: shown,
                            x,
                            y,
                            width: advance * rendering.horizontal_scale(),
                            font_size: font_size * rendering.vertical_scale(),
                            font_name: font_name.clone(),
                        });
                    }
                    text.advance(advance);
                }
                "re" => {
                    if operands.len() >= 4 {
                        let x = get_number(&operands[0]).unwrap_or(0.0);
                        let y = get_number(&operands[1]).unwrap_or(0.0);
                        let w = get_number(&operands[2]).unwrap_or(0.0);
                        let h = get_number(&operands[3]).unwrap_or(0.0);
                        for (px, py) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
                            path.add(ctm.apply(px, py));
                        }
                    }
                }
                "m" | "l" | "c" | "v" | "y" => {
                    let coords: Vec<f32> = operands.iter().filter_map(get_number).collect();
                    for pair in coords.chunks_exact(2) {
                        path.add(ctm.apply(pair[0], pair[1]));
                    }
                }
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                    if let Some(rect) = path.take() {
                        out.paths.push(rect);
                    }
                }
                "n" => {
                    path.take();
                }
                _ => {}
            }
        }

        Ok(out)
    }

    /// Decode a TJ array, inserting spaces at large negative adjustments.
    fn show_array(&self, font_key: &[u8], items: &[Object], font_size: f32) -> (String, f32) {
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = self.decode(font_key, bytes);
                    advance += decoded.chars().count() as f32 * GLYPH_ADVANCE * font_size;
                    combined.push_str(&decoded);
                }
                other => {
                    let Some(n) = get_number(other) else {
                        continue;
                    };
                    advance -= n / 1000.0 * font_size;
                    if -n > TJ_SPACE_THRESHOLD
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && combined
                            .chars()
                            .last()
                            .is_some_and(|c| !is_spaceless_script_char(c))
                    {
                        combined.push(' ');
                    }
                }
            }
        }

        (combined, advance)
    }

    fn decode(&self, font_key: &[u8], bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    fn base_font(&self, key: &[u8]) -> String {
        self.fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string())
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let n: Vec<f32> = operands[..6].iter().map(get_number).collect::<Option<_>>()?;
    Some(Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Whether a character belongs to a script written without word spaces.
///
/// Hangul is excluded: Korean separates words with spaces.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

/// Decode string bytes when the font has no usable encoding.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then Latin-1.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stream: &str) -> PageContent {
        let doc = LopdfDocument::with_version("1.5");
        let fonts = BTreeMap::new();
        ContentInterpreter::new(&doc, &fonts)
            .run(stream.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_text_position_and_size() {
        let content = run("BT /F1 24 Tf 72 700 Td (Overview) Tj ET");
        assert_eq!(content.spans.len(), 1);
        let span = &content.spans[0];
        assert_eq!(span.text, "Overview");
        assert_eq!((span.x, span.y), (72.0, 700.0));
        assert_eq!(span.font_size, 24.0);
        assert_eq!(span.width, 8.0 * 0.5 * 24.0);
        assert_eq!(span.font_name, "F1");
    }

    #[test]
    fn test_text_matrix_scales_size() {
        let content = run("BT /F1 1 Tf 18 0 0 18 100 500 Tm (Scaled) Tj ET");
        assert_eq!(content.spans[0].font_size, 18.0);
        assert_eq!(content.spans[0].x, 100.0);
    }

    #[test]
    fn test_ctm_applies_to_text() {
        let content = run("q 1 0 0 1 10 20 cm BT /F1 12 Tf 50 50 Td (Moved) Tj ET Q");
        assert_eq!((content.spans[0].x, content.spans[0].y), (60.0, 70.0));
    }

    #[test]
    fn test_leading_and_next_line() {
        let content = run("BT /F1 10 Tf 14 TL 72 700 Td (One) Tj T* (Two) Tj ET");
        assert_eq!(content.spans[0].y, 700.0);
        assert_eq!(content.spans[1].y, 686.0);
        assert_eq!(content.spans[1].x, 72.0);
    }

    #[test]
    fn test_consecutive_shows_advance() {
        let content = run("BT /F1 10 Tf 0 0 Td (ab) Tj (cd) Tj ET");
        assert_eq!(content.spans[1].x, 10.0);
    }

    #[test]
    fn test_tj_array_inserts_space() {
        let content = run("BT /F1 10 Tf 0 0 Td [(Key) -300 (Points) 20 (!)] TJ ET");
        assert_eq!(content.spans[0].text, "Key Points!");
    }

    #[test]
    fn test_rectangle_paths() {
        let content = run("q 2 0 0 2 0 0 cm 10 10 50 20 re S Q 0 0 m 30 40 l n 5 5 m 15 25 l f");
        assert_eq!(content.paths, vec![[20.0, 20.0, 120.0, 60.0], [5.0, 5.0, 15.0, 25.0]]);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"plain"), "plain");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
