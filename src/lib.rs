//! Leitor: accessible reader library.
//!
//! Picks text out of documents and photos and reads it aloud. The crate has
//! no UI; a shell (the `leitor` binary, or a GUI) calls into it.
//!
//! Modules:
//!   - source.rs    picked/uploaded files as `Bytes | Path`
//!   - extract/     extension dispatch and format parsers
//!   - ocr/         local Tesseract tier, hosted OCR.space tier
//!   - speech/      TTS into `leitura_<ts>.mp3`, playback retry
//!   - pipeline.rs  the open / read-aloud actions with display text
//!   - config.rs    `Settings` from `LEITOR_*` variables and .env files
//!   - error.rs     `ReaderError`

pub mod config;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pipeline;
pub mod source;
pub mod speech;

pub use config::{RetryPolicy, Settings};
pub use error::ReaderError;
pub use extract::{Extraction, Extractor};
pub use pipeline::{OpenedFile, ReadAloud, Reader};
pub use source::{SourceContent, SourceFile};
