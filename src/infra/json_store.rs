use std::path::{Path, PathBuf};

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

/// 永続化ファイルのインデント（表示上のみ。読み込みには影響しない）
const INDENT: &[u8] = b"    ";

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// 1 Library = 1 JSONファイル（Bookの配列）。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 4スペースインデントのJSON文字列に変換する。
pub fn to_pretty_json(library: &Library) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    library.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Library, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "library file not found, starting empty");
            return Ok(Library::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let library: Library = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "library loaded");
        Ok(library)
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = to_pretty_json(library)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "library saved");
        Ok(())
    }
}
