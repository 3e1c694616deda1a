//! Layout provider backed by `lopdf`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BBox, DocumentMetadata, Page};

use super::content::{decode_text_simple, get_number, ContentInterpreter, PageContent, RawRect};
use super::layout::PageLayout;
use super::tables::TableFinder;
use super::LayoutProvider;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// The header may be preceded by junk within this many bytes.
const HEADER_SEARCH_LEN: usize = 1024;

/// Page box used when a page declares none.
const LETTER: RawRect = [0.0, 0.0, 612.0, 792.0];

/// Page tree depth searched for an inherited MediaBox.
const MAX_INHERITANCE_DEPTH: usize = 16;

/// Check the PDF header and return its version (e.g., "1.7").
pub fn detect_pdf_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_LEN)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = data
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).to_string())
        }
        _ => Err(Error::UnknownFormat),
    }
}

/// Reads layout from a PDF with `lopdf`.
///
/// Text runs are taken from page content streams and regrouped into lines
/// and blocks. Drawings are the bounding boxes of painted paths; tables are
/// found from text alignment.
pub struct LopdfProvider {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    table_finder: TableFinder,
}

impl LopdfProvider {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut header = Vec::with_capacity(HEADER_SEARCH_LEN);
        File::open(path)?
            .take(HEADER_SEARCH_LEN as u64)
            .read_to_end(&mut header)?;
        detect_pdf_version(&header)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_pdf_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", doc.version, pages.len());
        Self {
            doc,
            pages,
            table_finder: TableFinder::new(),
        }
    }

    /// Replace the table finder used for excluded-region hints.
    pub fn with_table_finder(mut self, finder: TableFinder) -> Self {
        self.table_finder = finder;
        self
    }

    /// PDF version from the header.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }

    /// Interpret a page's content streams.
    fn interpret(&self, number: u32) -> Result<(PageLayout, PageContent)> {
        let page_id = self.page_id(number)?;
        let layout = PageLayout::new(number, self.media_box(page_id));

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.page_content(page_id)?;
        let parsed = ContentInterpreter::new(&self.doc, &fonts).run(&content)?;

        log::debug!(
            "Page {}: {} text runs, {} paths",
            number,
            parsed.spans.len(),
            parsed.paths.len()
        );
        Ok((layout, parsed))
    }

    /// Get page content stream. A page without contents is blank.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let refs: Vec<ObjectId> = match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
                _ => vec![*r],
            },
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
        };

        let mut content = Vec::new();
        for r in refs {
            if let Ok(Object::Stream(s)) = self.doc.get_object(r) {
                match s.decompressed_content() {
                    Ok(data) => content.extend_from_slice(&data),
                    Err(_) => content.extend_from_slice(&s.content),
                }
                content.push(b' ');
            }
        }
        Ok(content)
    }

    /// MediaBox of a page, inherited from the page tree when absent.
    fn media_box(&self, page_id: ObjectId) -> RawRect {
        let mut current = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(dict) = current else {
                break;
            };
            if let Some(rect) = dict.get(b"MediaBox").ok().and_then(|o| self.rect(o)) {
                return rect;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|r| self.doc.get_dictionary(r))
                .ok();
        }
        LETTER
    }

    fn rect(&self, obj: &Object) -> Option<RawRect> {
        let obj = match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok()?,
            other => other,
        };
        let values: Vec<f32> = obj
            .as_array()
            .ok()?
            .iter()
            .take(4)
            .map(get_number)
            .collect::<Option<_>>()?;
        match values[..] {
            [x0, y0, x1, y1] => Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]),
            _ => None,
        }
    }

    /// The document information dictionary, direct or referenced.
    fn info_dict(&self) -> Option<&lopdf::Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl LayoutProvider for LopdfProvider {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> Result<DocumentMetadata> {
        let mut metadata = DocumentMetadata {
            pdf_version: self.doc.version.clone(),
            page_count: self.page_count(),
            ..Default::default()
        };

        if let Some(info) = self.info_dict() {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|d| parse_pdf_date(&d));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|d| parse_pdf_date(&d));
        }

        Ok(metadata)
    }

    fn page(&self, number: u32) -> Result<Page> {
        let (layout, content) = self.interpret(number)?;
        Ok(layout.build(content.spans))
    }

    fn tables(&self, number: u32) -> Result<Vec<BBox>> {
        let (layout, content) = self.interpret(number)?;
        Ok(self
            .table_finder
            .find_rects(&content.spans)
            .into_iter()
            .map(|r| layout.to_page(r))
            .collect())
    }

    fn drawings(&self, number: u32) -> Result<Vec<BBox>> {
        let (layout, content) = self.interpret(number)?;
        Ok(content.paths.into_iter().map(|r| layout.to_page(r)).collect())
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };
    let month = field(4..6, 1);
    let day = field(6..8, 1);
    let hour = field(8..10, 0);
    let minute = field(10..12, 0);
    let second = field(12..14, 0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
