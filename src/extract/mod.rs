//! Extraction domain: turn a picked file into plain text.
//!
//! Dispatch is by lower-cased extension:
//!   - txt                 → text.rs (UTF-8, Latin-1 fallback)
//!   - pdf                 → pdf.rs (one line per page)
//!   - docx                → docx.rs (one line per paragraph)
//!   - xlsx/xls/xlsm/ods   → spreadsheet.rs (aligned table)
//!   - png/jpg/jpeg/bmp    → crate::ocr pipeline

pub mod docx;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use crate::error::ReaderError;
use crate::ocr::{OcrPipeline, OcrTier};
use crate::source::{SourceContent, SourceFile};
use serde::Serialize;

/// Shown in place of blank extractions.
pub const NO_TEXT_FOUND: &str = "Nenhum texto encontrado no arquivo.";

/// Shown in place of image results when OCR is switched off.
pub const OCR_DISABLED: &str = "OCR de imagens não está disponível nesta versão. \
     Use a versão desktop para extrair texto de imagens; PDF, DOCX, XLSX e TXT funcionam normalmente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
    Spreadsheet,
    Image,
}

impl DocumentKind {
    pub const TEXT_EXTENSIONS: &'static [&'static str] = &["txt"];
    pub const PDF_EXTENSIONS: &'static [&'static str] = &["pdf"];
    pub const DOCX_EXTENSIONS: &'static [&'static str] = &["docx"];
    pub const SPREADSHEET_EXTENSIONS: &'static [&'static str] = &["xlsx", "xls", "xlsm", "ods"];
    pub const IMAGE_EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg", "bmp"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let ext = ext.as_str();
        if Self::TEXT_EXTENSIONS.contains(&ext) {
            Some(DocumentKind::Text)
        } else if Self::PDF_EXTENSIONS.contains(&ext) {
            Some(DocumentKind::Pdf)
        } else if Self::DOCX_EXTENSIONS.contains(&ext) {
            Some(DocumentKind::Docx)
        } else if Self::SPREADSHEET_EXTENSIONS.contains(&ext) {
            Some(DocumentKind::Spreadsheet)
        } else if Self::IMAGE_EXTENSIONS.contains(&ext) {
            Some(DocumentKind::Image)
        } else {
            None
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Text => Self::TEXT_EXTENSIONS,
            DocumentKind::Pdf => Self::PDF_EXTENSIONS,
            DocumentKind::Docx => Self::DOCX_EXTENSIONS,
            DocumentKind::Spreadsheet => Self::SPREADSHEET_EXTENSIONS,
            DocumentKind::Image => Self::IMAGE_EXTENSIONS,
        }
    }
}

/// Extensions offered by the file picker.
pub fn allowed_extensions(ocr_enabled: bool) -> Vec<&'static str> {
    let mut kinds = vec![
        DocumentKind::Text,
        DocumentKind::Pdf,
        DocumentKind::Docx,
        DocumentKind::Spreadsheet,
    ];
    if ocr_enabled {
        kinds.push(DocumentKind::Image);
    }
    kinds.into_iter().flat_map(|k| k.extensions().iter().copied()).collect()
}

/// Text pulled out of one file.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub text: String,
    pub kind: DocumentKind,
    /// Set for image input: which OCR tier recognised the text.
    pub provenance: Option<OcrTier>,
}

impl Extraction {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// What the text area shows: the text with its OCR tag, or the
    /// no-text message.
    pub fn display_text(&self) -> String {
        if self.is_blank() {
            return NO_TEXT_FOUND.to_string();
        }
        match self.provenance {
            Some(tier) => format!("{}\n\n[{}]", self.text.trim_end(), tier.label()),
            None => self.text.clone(),
        }
    }
}

pub struct Extractor {
    ocr: Option<OcrPipeline>,
}

impl Extractor {
    pub fn new(ocr: OcrPipeline) -> Self {
        Self { ocr: Some(ocr) }
    }

    /// Extractor for deployments without image OCR.
    pub fn without_ocr() -> Self {
        Self { ocr: None }
    }

    pub fn ocr_enabled(&self) -> bool {
        self.ocr.is_some()
    }

    pub async fn extract(&self, source: &SourceFile) -> Result<Extraction, ReaderError> {
        let start = std::time::Instant::now();
        let ext = source.extension().unwrap_or_default();
        let kind = DocumentKind::from_extension(&ext).ok_or_else(|| {
            ReaderError::UnsupportedOrUnreadable(format!(
                "tipo de arquivo não suportado: '{}'",
                source.name
            ))
        })?;
        log::info!("[EXTRACT] '{}' dispatched as {:?}", source.name, kind);

        let mut provenance = None;
        let text = match kind {
            DocumentKind::Text => match &source.content {
                SourceContent::Bytes(bytes) => text::decode_bytes(bytes),
                SourceContent::Path(path) => text::read_path(path).await?,
            },
            DocumentKind::Pdf => pdf::extract_pdf(&source.read_bytes().await?)?,
            DocumentKind::Docx => docx::extract_docx(&source.read_bytes().await?)?,
            DocumentKind::Spreadsheet => spreadsheet::extract_spreadsheet(&source.read_bytes().await?)?,
            DocumentKind::Image => {
                let ocr = self
                    .ocr
                    .as_ref()
                    .ok_or_else(|| ReaderError::UnsupportedOrUnreadable(OCR_DISABLED.to_string()))?;
                let bytes = source.read_bytes().await?;
                image::guess_format(&bytes).map_err(|e| ReaderError::parse("imagem", e))?;
                let recognized = ocr.recognize(&bytes).await?;
                provenance = Some(recognized.tier);
                recognized.text
            }
        };

        log::info!(
            "[EXTRACT] '{}': {} chars in {}ms",
            source.name,
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(Extraction {
            text,
            kind,
            provenance,
        })
    }
}
