//! Content store module
//!
//! Resolves book/chapter/language identifiers to files under the content root.
//! Layout: `{root}/{book}/{chapter}/{language}.json`. Nothing is cached; every
//! call goes back to the filesystem.

pub mod chapter;

pub use chapter::{decode, parse_chapter_number, Chapter, Verse};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Content store failures
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to list '{path}': {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read-only accessor over the content root
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    default_language: String,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, default_language: &str) -> Self {
        Self {
            root: root.into(),
            default_language: default_language.to_string(),
        }
    }

    /// Build `{root}/{book}/{chapter}/{language}.json`
    ///
    /// A missing or empty language falls back to the default language.
    pub fn resolve_path(&self, book: &str, chapter: &str, language: Option<&str>) -> PathBuf {
        let language = language
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_language);
        self.root
            .join(book)
            .join(chapter)
            .join(format!("{language}.json"))
    }

    /// Any stat failure counts as missing
    pub async fn exists(path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    pub async fn read_bytes(path: &Path) -> Result<Vec<u8>, ContentError> {
        fs::read(path).await.map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Names of the immediate subdirectories of `dir`, sorted by name
    pub async fn list_subdirectories(dir: &Path) -> Result<Vec<String>, ContentError> {
        let list_err = |source| ContentError::List {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(list_err)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let file_type = entry.file_type().await.map_err(list_err)?;
            if file_type.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn list_books(&self) -> Result<Vec<String>, ContentError> {
        Self::list_subdirectories(&self.root).await
    }

    /// Chapter numbers of a book in directory-name order; names without a
    /// leading integer are skipped
    pub async fn list_chapters(&self, book: &str) -> Result<Vec<i64>, ContentError> {
        let names = Self::list_subdirectories(&self.root.join(book)).await?;
        Ok(names
            .iter()
            .filter_map(|name| parse_chapter_number(name))
            .collect())
    }
}
