//! Document text extraction for uploaded JDs and résumés.
//!
//! Which binary formats are accepted is decided once at startup ([`FormatSupport`]).
//! PDF and DOCX failures are surfaced as errors; plain text never fails (invalid UTF-8
//! sequences are dropped).

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{format} extraction is disabled in this deployment")]
    Disabled { format: DocumentFormat },

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::PlainText => "plain text",
        })
    }
}

impl DocumentFormat {
    /// Detects the format from the file extension, then from magic bytes.
    /// Anything unrecognised is treated as plain text.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") | Some("doc") => DocumentFormat::Docx,
            Some("txt") | Some("md") => DocumentFormat::PlainText,
            _ if bytes.starts_with(b"%PDF") => DocumentFormat::Pdf,
            _ if bytes.starts_with(b"PK") => DocumentFormat::Docx,
            _ => DocumentFormat::PlainText,
        }
    }
}

/// Binary formats enabled for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatSupport {
    pub pdf: bool,
    pub docx: bool,
}

impl Default for FormatSupport {
    fn default() -> Self {
        Self {
            pdf: true,
            docx: true,
        }
    }
}

impl FormatSupport {
    pub fn allows(&self, format: DocumentFormat) -> bool {
        match format {
            DocumentFormat::Pdf => self.pdf,
            DocumentFormat::Docx => self.docx,
            DocumentFormat::PlainText => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor {
    support: FormatSupport,
}

impl DocumentExtractor {
    pub fn new(support: FormatSupport) -> Self {
        Self { support }
    }

    /// Extracts best-effort plain text from an uploaded file.
    pub fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        let format = DocumentFormat::detect(file_name, bytes);
        if !self.support.allows(format) {
            return Err(ExtractionError::Disabled { format });
        }
        debug!("Extracting {file_name} as {format} ({} bytes)", bytes.len());

        match format {
            DocumentFormat::Pdf => extract_pdf(bytes),
            DocumentFormat::Docx => extract_docx(bytes),
            DocumentFormat::PlainText => Ok(decode_lenient(bytes)),
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(result) => result.map_err(|e| ExtractionError::Pdf(e.to_string())),
        Err(_) => Err(ExtractionError::Pdf("decoder panicked on malformed input".to_string())),
    }
}

/// Reads `word/document.xml` and joins the text runs of each paragraph, one paragraph per line.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCX_BODY_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "malformed {DOCX_BODY_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

/// UTF-8 decode that drops invalid sequences instead of failing.
/// Valid characters, U+FFFD included, pass through untouched.
fn decode_lenient(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
