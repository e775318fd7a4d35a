//! OCR domain: two-tier text recognition for photographed or scanned pages.
//!
//! Tiers:
//!   - local:  Tesseract subprocess (tesseract.rs), offline, language-tuned
//!   - hosted: OCR.space web API (ocr_space.rs), needs network
//!
//! The local tier runs first. Anything short of non-blank local text (engine
//! missing, both attempts erroring, whitespace-only output) falls through to
//! exactly one hosted call. External code should only use `OcrPipeline`.

pub mod ocr_space;
pub mod tesseract;

use crate::config::Settings;
use crate::error::ReaderError;
use serde::Serialize;

pub use ocr_space::OcrSpaceClient;
pub use tesseract::TesseractEngine;

/// Offline recognition engine.
#[async_trait::async_trait]
pub trait LocalRecognizer: Send + Sync {
    /// Cheap presence check, e.g. a version query.
    async fn is_available(&self) -> bool;

    /// Recognise `image`; `None` uses the engine's default language model.
    async fn recognize(&self, image: &[u8], language: Option<&str>) -> Result<String, String>;
}

/// Web recognition service.
#[async_trait::async_trait]
pub trait HostedRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, String>;
}

/// Which tier produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OcrTier {
    Local,
    Online,
}

impl OcrTier {
    pub fn label(self) -> &'static str {
        match self {
            OcrTier::Local => "OCR Local",
            OcrTier::Online => "OCR Online",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrText {
    pub text: String,
    pub tier: OcrTier,
}

pub struct OcrPipeline {
    local: Box<dyn LocalRecognizer>,
    hosted: Box<dyn HostedRecognizer>,
    language: String,
}

impl OcrPipeline {
    pub fn new(
        local: Box<dyn LocalRecognizer>,
        hosted: Box<dyn HostedRecognizer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            local,
            hosted,
            language: language.into(),
        }
    }

    /// Tesseract + OCR.space, wired from settings.
    pub fn from_settings(settings: &Settings, client: reqwest::Client) -> Self {
        let local = TesseractEngine::new(settings.ocr.tesseract.clone());
        let hosted = OcrSpaceClient::new(
            client,
            &settings.ocr.api_url,
            &settings.ocr.api_key,
            &settings.ocr.api_language,
        );
        Self::new(Box::new(local), Box::new(hosted), settings.ocr.language.clone())
    }

    /// Recognise text in `image`, local tier first.
    pub async fn recognize(&self, image: &[u8]) -> Result<OcrText, ReaderError> {
        let start = std::time::Instant::now();

        let local_failure = match self.recognize_locally(image).await {
            Ok(text) => {
                log::info!(
                    "[OCR] Local engine: {} chars in {}ms",
                    text.len(),
                    start.elapsed().as_millis()
                );
                return Ok(OcrText {
                    text,
                    tier: OcrTier::Local,
                });
            }
            Err(reason) => reason,
        };
        log::info!("[OCR] Local tier gave no text ({}), trying hosted API", local_failure);

        let online_start = std::time::Instant::now();
        match self.hosted.recognize(image).await {
            Ok(text) if !text.trim().is_empty() => {
                log::info!(
                    "[OCR] Hosted API: {} chars in {}ms",
                    text.len(),
                    online_start.elapsed().as_millis()
                );
                Ok(OcrText {
                    text,
                    tier: OcrTier::Online,
                })
            }
            Ok(_) => {
                log::warn!("[OCR] Hosted API returned no text");
                Err(ReaderError::OcrUnavailable {
                    local: local_failure,
                    online: "nenhum texto reconhecido".to_string(),
                })
            }
            Err(reason) => {
                log::error!("[OCR] Hosted API failed: {}", reason);
                Err(ReaderError::OcrUnavailable {
                    local: local_failure,
                    online: reason,
                })
            }
        }
    }

    /// Local engine with the configured language, then its default one.
    /// `Err` carries why the local tier produced nothing usable.
    async fn recognize_locally(&self, image: &[u8]) -> Result<String, String> {
        if !self.local.is_available().await {
            return Err("motor local indisponível".to_string());
        }

        let text = match self.local.recognize(image, Some(&self.language)).await {
            Ok(text) => text,
            Err(first) => {
                log::warn!(
                    "[OCR] Local engine failed with language '{}': {}; retrying with default model",
                    self.language,
                    first
                );
                self.local.recognize(image, None).await?
            }
        };

        if text.trim().is_empty() {
            return Err("motor local não encontrou texto".to_string());
        }
        Ok(text)
    }
}
