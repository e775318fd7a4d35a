//! Error taxonomy for the reader.
//!
//! Display strings are user-facing: the reader pipeline renders them straight
//! into the text area, so they are written in Portuguese like the rest of the UI.

/// Guidance shown when neither OCR tier produced text.
pub const OCR_GUIDANCE: &str = "Verifique se a imagem está nítida e bem iluminada, \
     e se há conexão com a internet para o OCR online.";

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("O conteúdo do arquivo não pôde ser lido: {0}")]
    UnsupportedOrUnreadable(String),

    #[error("Falha ao interpretar {format}: {message}")]
    ParseFailure { format: &'static str, message: String },

    #[error("Não foi possível reconhecer texto na imagem.\nOCR local: {local}\nOCR online: {online}\n\n{guidance}", guidance = OCR_GUIDANCE)]
    OcrUnavailable { local: String, online: String },

    #[error("Nenhum texto para converter.")]
    EmptyInput,

    #[error("Falha na síntese de voz: {0}")]
    SynthesisFailed(String),

    #[error("Não foi possível iniciar o áudio após {attempts} tentativas. Use o botão de download para ouvir o arquivo.")]
    PlaybackNotStarted { attempts: u32 },

    #[error("Erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    pub fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        ReaderError::ParseFailure {
            format,
            message: err.to_string(),
        }
    }
}

impl serde::Serialize for ReaderError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
