//! Durable page persistence.
//!
//! One file per page under a dedicated directory, keyed by the lowercased
//! title, holding the raw body bytes. Two titles differing only by case refer
//! to the same stored page. There is no locking and no history: concurrent
//! saves to the same title race and the last write wins, relying on the
//! rename below being atomic at the filesystem level.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

/// A wiki page: the title as the visitor addressed it, plus the raw body.
/// An empty body is a valid page (a page that was just created).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: Vec<u8>) -> Self {
        Self { title: title.into(), body }
    }

    /// An empty page for a title nothing has been saved under yet.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no page stored under '{0}'")]
    NotFound(String),
    #[error("page storage failure: {0}")]
    Io(#[from] io::Error),
}

/// Storage seam for page content. The handlers only ever need these two
/// operations, and taking them through a trait lets tests substitute a
/// failing or in-memory store.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Read the stored content for a title. `StoreError::NotFound` means no
    /// case variant of this title has ever been saved.
    async fn load(&self, title: &str) -> Result<Page, StoreError>;

    /// Replace the entire stored content for a title. Creates the page if it
    /// does not exist. A concurrent reader never observes a partial body.
    async fn save(&self, title: &str, body: &[u8]) -> Result<(), StoreError>;
}

/// Filesystem-backed store: `<root>/<lowercase-title>.txt` per page.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    /// Open (creating if necessary) the page directory.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}.txt", title.to_ascii_lowercase()))
    }
}

#[async_trait]
impl PageStore for FsPageStore {
    async fn load(&self, title: &str) -> Result<Page, StoreError> {
        match tokio::fs::read(self.page_path(title)).await {
            Ok(body) => Ok(Page::new(title, body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(title.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, title: &str, body: &[u8]) -> Result<(), StoreError> {
        let dest = self.page_path(title);
        // Write to a sibling temp file, then rename into place. Rename within
        // one directory is atomic, so a reader sees either the old body or
        // the new one, never a torn write.
        let tmp = self
            .root
            .join(format!(".{}.{}.tmp", title.to_ascii_lowercase(), Uuid::new_v4()));

        tokio::fs::write(&tmp, body).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(title, bytes = body.len(), "page saved");
        Ok(())
    }
}
