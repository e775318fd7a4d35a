//! Plain-text decoding.

use crate::error::ReaderError;
use std::path::Path;

/// UTF-8 first; anything else is read as ISO-8859-1, which maps every byte
/// to the code point of the same value (0x80-0x9F stay C1 controls).
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            log::info!("[EXTRACT] Text is not valid UTF-8, decoding as Latin-1");
            encoding_rs::mem::decode_latin1(bytes).into_owned()
        }
    }
}

/// Path-only input is read strictly as UTF-8.
pub async fn read_path(path: &Path) -> Result<String, ReaderError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ReaderError::UnsupportedOrUnreadable(format!("{}: {}", path.display(), e)))?;
    String::from_utf8(bytes).map_err(|e| ReaderError::parse("texto", e))
}
