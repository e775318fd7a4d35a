//! Runtime settings.
//!
//! Everything the extractor, OCR pipeline and synthesizer need is carried in
//! one `Settings` value built at startup and handed to each component.
//! Values come from `LEITOR_*` environment variables; `load_env_files`
//! populates the environment from `.env` files first.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_OCR_API_URL: &str = "https://api.ocr.space/parse/image";
/// OCR.space public demo key.
pub const DEFAULT_OCR_API_KEY: &str = "helloworld";
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PLAYBACK_ATTEMPTS: u32 = 5;
pub const DEFAULT_PLAYBACK_BACKOFF_MS: u64 = 200;

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_PLAYBACK_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_PLAYBACK_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    /// Tesseract language model requested on the first local attempt.
    pub language: String,
    /// Explicit engine binary. `None` resolves `tesseract` on PATH.
    pub tesseract: Option<PathBuf>,
    /// Image OCR switched off entirely (browser-hosted deployments).
    pub disabled: bool,
    pub api_url: String,
    pub api_key: String,
    pub api_language: String,
}

#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub language: String,
    pub tts_url: String,
    pub playback: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Shared directory for completed uploads and generated audio.
    pub uploads_dir: PathBuf,
    pub http_timeout: Duration,
    pub ocr: OcrSettings,
    pub speech: SpeechSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            ocr: OcrSettings {
                language: "por".to_string(),
                tesseract: None,
                disabled: false,
                api_url: DEFAULT_OCR_API_URL.to_string(),
                api_key: DEFAULT_OCR_API_KEY.to_string(),
                api_language: "por".to_string(),
            },
            speech: SpeechSettings {
                language: "pt".to_string(),
                tts_url: DEFAULT_TTS_URL.to_string(),
                playback: RetryPolicy::default(),
            },
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or empty keys keep
    /// their defaults; malformed numbers and booleans are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(dir) = get("LEITOR_UPLOADS_DIR") {
            settings.uploads_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_or_warn::<u64>("LEITOR_HTTP_TIMEOUT_SECS", get("LEITOR_HTTP_TIMEOUT_SECS")) {
            settings.http_timeout = Duration::from_secs(secs);
        }

        if let Some(lang) = get("LEITOR_OCR_LANGUAGE") {
            settings.ocr.language = lang;
        }
        settings.ocr.tesseract = get("LEITOR_TESSERACT").map(PathBuf::from);
        if let Some(raw) = get("LEITOR_OCR_DISABLED") {
            match parse_bool(&raw) {
                Some(v) => settings.ocr.disabled = v,
                None => log::warn!("[CONFIG] Ignoring LEITOR_OCR_DISABLED={:?}: expected a boolean", raw),
            }
        }
        if let Some(url) = get("LEITOR_OCR_API_URL") {
            settings.ocr.api_url = url;
        }
        if let Some(key) = get("LEITOR_OCR_API_KEY") {
            settings.ocr.api_key = key;
        }
        if let Some(lang) = get("LEITOR_OCR_API_LANGUAGE") {
            settings.ocr.api_language = lang;
        }

        if let Some(lang) = get("LEITOR_TTS_LANGUAGE") {
            settings.speech.language = lang;
        }
        if let Some(url) = get("LEITOR_TTS_URL") {
            settings.speech.tts_url = url;
        }
        if let Some(n) = parse_or_warn::<u32>("LEITOR_PLAYBACK_ATTEMPTS", get("LEITOR_PLAYBACK_ATTEMPTS")) {
            settings.speech.playback.max_attempts = n.max(1);
        }
        if let Some(ms) = parse_or_warn::<u64>("LEITOR_PLAYBACK_BACKOFF_MS", get("LEITOR_PLAYBACK_BACKOFF_MS")) {
            settings.speech.playback.backoff = Duration::from_millis(ms);
        }

        settings
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("[CONFIG] Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load `.env.local` → `.env` from `dir`, then the per-user config file.
///
/// The first project file found wins; the user file only fills gaps since
/// dotenvy never overrides variables that are already set.
pub fn load_env_files(dir: &Path) -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    'project: for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => loaded.push(path),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'project;
        }
    }

    if let Some(user_env) = dirs::config_dir().map(|c| c.join("leitor").join(".env")) {
        if user_env.exists() {
            match dotenvy::from_path(&user_env) {
                Ok(_) => loaded.push(user_env),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", user_env.display(), e),
            }
        }
    }

    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_match_reader_conventions() {
        let s = settings_from(&[]);
        assert_eq!(s.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(s.http_timeout, Duration::from_secs(30));
        assert_eq!(s.ocr.language, "por");
        assert_eq!(s.speech.language, "pt");
        assert_eq!(s.speech.playback.max_attempts, 5);
        assert_eq!(s.speech.playback.backoff, Duration::from_millis(200));
        assert!(!s.ocr.disabled);
        assert!(s.ocr.tesseract.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let s = settings_from(&[
            ("LEITOR_UPLOADS_DIR", "/srv/uploads"),
            ("LEITOR_OCR_DISABLED", "yes"),
            ("LEITOR_TESSERACT", "/opt/bin/tesseract"),
            ("LEITOR_PLAYBACK_ATTEMPTS", "3"),
            ("LEITOR_PLAYBACK_BACKOFF_MS", "50"),
            ("LEITOR_OCR_API_KEY", "secret"),
        ]);
        assert_eq!(s.uploads_dir, PathBuf::from("/srv/uploads"));
        assert!(s.ocr.disabled);
        assert_eq!(s.ocr.tesseract, Some(PathBuf::from("/opt/bin/tesseract")));
        assert_eq!(s.speech.playback.max_attempts, 3);
        assert_eq!(s.speech.playback.backoff, Duration::from_millis(50));
        assert_eq!(s.ocr.api_key, "secret");
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let s = settings_from(&[
            ("LEITOR_HTTP_TIMEOUT_SECS", "soon"),
            ("LEITOR_OCR_DISABLED", "maybe"),
            ("LEITOR_PLAYBACK_ATTEMPTS", "-2"),
            ("LEITOR_UPLOADS_DIR", "   "),
        ]);
        assert_eq!(s.http_timeout, Duration::from_secs(30));
        assert!(!s.ocr.disabled);
        assert_eq!(s.speech.playback.max_attempts, 5);
        assert_eq!(s.uploads_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let s = settings_from(&[("LEITOR_PLAYBACK_ATTEMPTS", "0")]);
        assert_eq!(s.speech.playback.max_attempts, 1);
    }
}
