//! Reader pipeline: the two user actions of the reader screen.
//!
//! - open:       file selection → Extractor (→ OCR) → display text
//! - read_aloud: edited text → Synthesizer → playback with retry
//!
//! Both return typed results alongside the text the shell should display, so
//! a GUI can render the display string while tests and the CLI inspect the
//! underlying outcome.

use crate::config::Settings;
use crate::error::ReaderError;
use crate::extract::{allowed_extensions, Extraction, Extractor};
use crate::ocr::OcrPipeline;
use crate::source::SourceFile;
use crate::speech::{start_playback, AudioPlayer, GeneratedAudio, PlaybackStatus, Synthesizer, SystemPlayer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of opening a file.
#[derive(Debug, Serialize)]
pub struct OpenedFile {
    /// What the text area shows.
    pub display: String,
    pub result: Result<Extraction, ReaderError>,
}

impl OpenedFile {
    fn from_result(result: Result<Extraction, ReaderError>) -> Self {
        let display = match &result {
            Ok(extraction) => extraction.display_text(),
            Err(err) => format!("Erro ao processar arquivo: {}", err),
        };
        Self { display, result }
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }
}

/// Outcome of converting text to speech.
#[derive(Debug, Serialize)]
pub struct ReadAloud {
    pub result: Result<GeneratedAudio, ReaderError>,
    pub playback: PlaybackStatus,
}

impl ReadAloud {
    /// Replacement text for the text area; `None` leaves the user's text as is.
    pub fn display(&self) -> Option<String> {
        match &self.result {
            Ok(_) => None,
            Err(err @ ReaderError::EmptyInput) => Some(err.to_string()),
            Err(err) => Some(format!("Erro ao gerar áudio: {}", err)),
        }
    }

    /// Non-fatal playback warning; the audio is still downloadable.
    pub fn warning(&self) -> Option<String> {
        self.playback.warning()
    }

    /// Target of the download control.
    pub fn download_path(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(|audio| audio.path.as_path())
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }
}

pub struct Reader {
    settings: Settings,
    extractor: Extractor,
    synthesizer: Synthesizer,
    player: Box<dyn AudioPlayer>,
}

impl Reader {
    pub fn new(
        settings: Settings,
        extractor: Extractor,
        synthesizer: Synthesizer,
        player: Box<dyn AudioPlayer>,
    ) -> Self {
        Self {
            settings,
            extractor,
            synthesizer,
            player,
        }
    }

    /// Production wiring: Tesseract + OCR.space, Google TTS, system player.
    pub fn from_settings(settings: Settings) -> Result<Self, ReaderError> {
        let client = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(concat!("leitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReaderError::Io(std::io::Error::other(e)))?;

        let extractor = if settings.ocr.disabled {
            log::info!("[STARTUP] Image OCR disabled");
            Extractor::without_ocr()
        } else {
            Extractor::new(OcrPipeline::from_settings(&settings, client.clone()))
        };
        let synthesizer = Synthesizer::from_settings(&settings, client);

        Ok(Self::new(settings, extractor, synthesizer, Box::new(SystemPlayer)))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extensions to offer in the file picker.
    pub fn allowed_extensions(&self) -> Vec<&'static str> {
        allowed_extensions(self.extractor.ocr_enabled())
    }

    pub async fn open(&self, source: &SourceFile) -> OpenedFile {
        let opened = OpenedFile::from_result(self.extractor.extract(source).await);
        if let Err(err) = &opened.result {
            log::error!("[PIPELINE] Opening '{}' failed: {}", source.name, err);
        }
        opened
    }

    /// Direct pick: name plus whatever of path/bytes the picker supplied.
    pub async fn open_pick(&self, name: &str, path: Option<PathBuf>, bytes: Option<Vec<u8>>) -> OpenedFile {
        match SourceFile::from_pick(name, path, bytes) {
            Ok(source) => self.open(&source).await,
            Err(err) => OpenedFile::from_result(Err(err)),
        }
    }

    /// A completed upload, stored under the uploads directory.
    pub async fn open_upload(&self, name: &str) -> OpenedFile {
        match SourceFile::uploaded(&self.settings.uploads_dir, name) {
            Ok(source) => self.open(&source).await,
            Err(err) => {
                log::warn!("[PIPELINE] Rejected upload name {:?}", name);
                OpenedFile::from_result(Err(err))
            }
        }
    }

    /// Synthesize `text` and, if `play` is set, start playback.
    pub async fn read_aloud(&self, text: &str, play: bool) -> ReadAloud {
        let result = self.synthesizer.synthesize(text).await;
        let playback = match (&result, play) {
            (Ok(audio), true) => {
                start_playback(self.player.as_ref(), &audio.path, self.settings.speech.playback).await
            }
            _ => PlaybackStatus::Disabled,
        };
        if let Err(err) = &result {
            log::error!("[PIPELINE] Read aloud failed: {}", err);
        }
        ReadAloud { result, playback }
    }
}
