//! Google Translate TTS: MP3 over plain HTTP GET.
//!
//! The endpoint rejects long inputs, so text is cut into chunks of at most
//! `MAX_CHUNK_CHARS` characters on sentence and word boundaries. Each chunk
//! comes back as a standalone MP3 stream; the streams concatenate into one
//! playable file.

use super::SpeechEngine;

pub const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleTranslateTts {
    client: reqwest::Client,
    url: String,
}

impl GoogleTranslateTts {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SpeechEngine for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err("nothing to synthesize".to_string());
        }
        let total = chunks.len().to_string();

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let response = self
                .client
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk.as_str()),
                    ("tl", language),
                    ("client", "tw-ob"),
                    ("total", total.as_str()),
                    ("idx", idx.to_string().as_str()),
                    ("textlen", chunk.chars().count().to_string().as_str()),
                ])
                .send()
                .await
                .map_err(|e| format!("TTS request {}/{} failed: {}", idx + 1, total, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("TTS service returned {} for chunk {}/{}", status, idx + 1, total));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| format!("TTS response unreadable: {}", e))?;
            audio.extend_from_slice(&bytes);
        }

        log::debug!("[TTS] {} chunks → {} bytes", chunks.len(), audio.len());
        Ok(audio)
    }
}

/// Cut `text` into pieces of at most `max` chars, preferring to end a piece
/// after sentence punctuation and never splitting a word unless it alone
/// exceeds `max`.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current.chars().count() + needed > max {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        if word.ends_with(['.', '!', '?', ';', ':']) {
            chunks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
