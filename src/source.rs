//! Input files as handed over by the picker or the upload handler.

use crate::error::ReaderError;
use std::path::{Component, Path, PathBuf};

/// Where the file's content lives.
#[derive(Debug, Clone)]
pub enum SourceContent {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A file selected by the user.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original filename; only used for the extension when there is no path.
    pub name: String,
    pub content: SourceContent,
}

impl SourceFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: SourceContent::Bytes(bytes),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            content: SourceContent::Path(path),
        }
    }

    /// Build from a picker result. In-memory bytes are preferred when present.
    pub fn from_pick(
        name: impl Into<String>,
        path: Option<PathBuf>,
        bytes: Option<Vec<u8>>,
    ) -> Result<Self, ReaderError> {
        let name = name.into();
        let content = match (bytes, path) {
            (Some(bytes), _) => SourceContent::Bytes(bytes),
            (None, Some(path)) => SourceContent::Path(path),
            (None, None) => {
                return Err(ReaderError::UnsupportedOrUnreadable(format!(
                    "'{}' chegou sem caminho e sem conteúdo",
                    name
                )))
            }
        };
        Ok(Self { name, content })
    }

    /// A finished upload, stored under `uploads_dir` with its original name.
    ///
    /// The name must be a bare file name; anything that would resolve
    /// outside `uploads_dir` is refused.
    pub fn uploaded(uploads_dir: &Path, name: &str) -> Result<Self, ReaderError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self {
                name: name.to_string(),
                content: SourceContent::Path(uploads_dir.join(name)),
            }),
            _ => Err(ReaderError::UnsupportedOrUnreadable(format!(
                "nome de arquivo inválido: '{}'",
                name
            ))),
        }
    }

    /// Lower-cased extension without the dot, from the path if there is one.
    pub fn extension(&self) -> Option<String> {
        let from = match &self.content {
            SourceContent::Path(path) => path.as_path(),
            SourceContent::Bytes(_) => Path::new(&self.name),
        };
        from.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            SourceContent::Path(path) => Some(path),
            SourceContent::Bytes(_) => None,
        }
    }

    /// The file's raw bytes, reading from disk when needed.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, ReaderError> {
        match &self.content {
            SourceContent::Bytes(bytes) => Ok(bytes.clone()),
            SourceContent::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                ReaderError::UnsupportedOrUnreadable(format!("{}: {}", path.display(), e))
            }),
        }
    }
}
