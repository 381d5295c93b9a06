//! Document tokenizer built on lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use super::content::extract_page_runs;
use super::options::{ErrorMode, ParseOptions};
use crate::detect::detect_version_from_path;
use crate::error::{Error, Result};
use crate::model::TextRun;

/// Layout tokenizer: reads a PDF document one page at a time, yielding
/// text runs in visual reading order.
///
/// Only this type performs I/O; scoring and classification downstream are
/// pure. Page decode failures are scoped to the page being read.
pub struct Tokenizer {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl Tokenizer {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Cheap magic-byte check before the full load.
        detect_version_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Self::from_document(doc, options)
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Open a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Self::from_document(doc, options)
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, options: ParseOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Document title from the Info dictionary, if present and non-empty.
    pub fn info_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        let title = pdf_string(info_dict.get(b"Title").ok()?)?;
        let title = title.trim().to_string();
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }

    /// Extract the text runs of one page (1-indexed), restartable.
    ///
    /// Runs come back in visual top-to-bottom, left-to-right order.
    pub fn page_runs(&self, page: u32) -> Result<Vec<TextRun>> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, pages.len() as u32))?;

        let mut runs = extract_page_runs(&self.doc, page, page_id)?;

        // Content streams emit in paint order; normalize to reading order
        // (PDF y grows upward, so descending y then ascending x).
        runs.sort_by(|a, b| {
            let y_cmp = b
                .bbox
                .y_center()
                .partial_cmp(&a.bbox.y_center())
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        Ok(runs)
    }

    /// Extract the text runs of the whole document in page order.
    ///
    /// In lenient mode (the default) undecodable pages are logged and
    /// skipped; in strict mode the first page failure is propagated. A
    /// document where every page fails still yields an empty sequence in
    /// lenient mode.
    pub fn document_runs(&self) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        for page in 1..=self.page_count() {
            match self.page_runs(page) {
                Ok(page_runs) => runs.extend(page_runs),
                Err(e) if e.is_page_scoped() => match self.options.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        log::warn!("Skipping page {page}: {e}");
                    }
                },
                Err(e) => return Err(e),
            }
        }
        Ok(runs)
    }
}

/// Decode a PDF string object (UTF-16BE with BOM, else UTF-8, else Latin-1).
fn pdf_string(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => {
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
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_non_pdf_bytes() {
        assert!(Tokenizer::from_bytes(b"not a pdf at all").is_err());
        assert!(Tokenizer::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_pdf_string_utf16() {
        let obj = lopdf::Object::String(
            vec![0xFE, 0xFF, 0x00, b'O', 0x00, b'k'],
            lopdf::StringFormat::Literal,
        );
        assert_eq!(pdf_string(&obj).unwrap(), "Ok");
    }

    #[test]
    fn test_pdf_string_plain() {
        let obj = lopdf::Object::String(b"Report".to_vec(), lopdf::StringFormat::Literal);
        assert_eq!(pdf_string(&obj).unwrap(), "Report");
    }
}
