//! Speech domain: text to an MP3 on disk, then playback.
//!
//! Generated files are named `leitura_<unix_timestamp>.mp3` and live in the
//! shared uploads directory. Only the latest one is kept: every synthesis
//! removes earlier generated files before writing its own.

pub mod google_tts;
pub mod playback;

use crate::config::Settings;
use crate::error::ReaderError;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

pub use google_tts::GoogleTranslateTts;
pub use playback::{start_playback, AudioPlayer, PlaybackStatus, SystemPlayer};

const AUDIO_PREFIX: &str = "leitura_";
const AUDIO_EXTENSION: &str = "mp3";

/// Text-to-speech backend.
#[async_trait::async_trait]
pub trait SpeechEngine: Send + Sync {
    /// MP3 bytes for `text` spoken in `language`.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAudio {
    pub path: PathBuf,
    pub bytes: u64,
}

impl GeneratedAudio {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn generated_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"^{}\d+\.{}$", AUDIO_PREFIX, AUDIO_EXTENSION))
            .expect("generated audio pattern is valid")
    })
}

/// Whether `name` is a file this module generated.
pub fn is_generated_audio(name: &str) -> bool {
    generated_pattern().is_match(name)
}

pub fn audio_file_name(timestamp: u64) -> String {
    format!("{}{}.{}", AUDIO_PREFIX, timestamp, AUDIO_EXTENSION)
}

/// Delete every generated audio file in `dir`. Failures are logged and
/// skipped; returns how many files were removed.
pub async fn remove_generated_audio(dir: &Path) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("[TTS] Cannot list {}: {}", dir.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                log::warn!("[TTS] Stopped scanning {}: {}", dir.display(), e);
                break;
            }
        };
        let name = entry.file_name();
        if !is_generated_audio(&name.to_string_lossy()) {
            continue;
        }
        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("[TTS] Could not remove {}: {}", entry.path().display(), e),
        }
    }
    removed
}

pub struct Synthesizer {
    output_dir: PathBuf,
    language: String,
    engine: Box<dyn SpeechEngine>,
}

impl Synthesizer {
    pub fn new(output_dir: impl Into<PathBuf>, language: impl Into<String>, engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            output_dir: output_dir.into(),
            language: language.into(),
            engine,
        }
    }

    /// Google Translate TTS into the uploads directory.
    pub fn from_settings(settings: &Settings, client: reqwest::Client) -> Self {
        Self::new(
            settings.uploads_dir.clone(),
            settings.speech.language.clone(),
            Box::new(GoogleTranslateTts::new(client, &settings.speech.tts_url)),
        )
    }

    /// Speak `text` into a fresh `leitura_<timestamp>.mp3`.
    ///
    /// Blank text is rejected before anything touches the filesystem. The
    /// engine runs before old files are removed, so a failed synthesis keeps
    /// the previous audio available.
    pub async fn synthesize(&self, text: &str) -> Result<GeneratedAudio, ReaderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReaderError::EmptyInput);
        }

        let start = std::time::Instant::now();
        let audio = self
            .engine
            .synthesize(text, &self.language)
            .await
            .map_err(ReaderError::SynthesisFailed)?;
        if audio.is_empty() {
            return Err(ReaderError::SynthesisFailed(
                "o serviço de voz não retornou áudio".to_string(),
            ));
        }
        log::info!(
            "[TTS] {} chars → {} bytes in {}ms (lang={})",
            text.chars().count(),
            audio.len(),
            start.elapsed().as_millis(),
            self.language
        );

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ReaderError::SynthesisFailed(format!("{}: {}", self.output_dir.display(), e)))?;

        let removed = remove_generated_audio(&self.output_dir).await;
        if removed > 0 {
            log::info!("[TTS] Removed {} previous audio file(s)", removed);
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let path = self.output_dir.join(audio_file_name(timestamp));
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|e| ReaderError::SynthesisFailed(format!("{}: {}", path.display(), e)))?;

        log::info!("[TTS] Wrote {}", path.display());
        Ok(GeneratedAudio {
            path,
            bytes: audio.len() as u64,
        })
    }
}
