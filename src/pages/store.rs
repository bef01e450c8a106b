use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{FileName, PageError, Result};

/// Metadata for one regular file in the page directory
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: FileName,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Flat directory of page files, addressed by [`FileName`]
///
/// There is no locking: two writers to the same name race and the last
/// write wins.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Create the directory (and parents) if missing
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| io_error(&self.root.display().to_string(), source))?;
        debug!(root = %self.root.display(), "Page directory ready");
        Ok(())
    }

    /// Create or overwrite a file
    pub async fn write(&self, name: &FileName, data: &[u8]) -> Result<()> {
        fs::write(self.path_of(name), data)
            .await
            .map_err(|source| io_error(name.as_str(), source))?;
        info!(name = %name, size = data.len(), "Wrote page file");
        Ok(())
    }

    pub async fn read(&self, name: &FileName) -> Result<Bytes> {
        match fs::read(self.path_of(name)).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Err(PageError::NotFound(name.to_string()))
            }
            Err(source) => Err(io_error(name.as_str(), source)),
        }
    }

    /// True only for an existing regular file
    pub async fn exists(&self, name: &FileName) -> Result<bool> {
        match fs::metadata(self.path_of(name)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(io_error(name.as_str(), source)),
        }
    }

    pub async fn delete(&self, name: &FileName) -> Result<()> {
        if !self.exists(name).await? {
            return Err(PageError::NotFound(name.to_string()));
        }

        match fs::remove_file(self.path_of(name)).await {
            Ok(()) => {
                info!(name = %name, "Deleted page file");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(PageError::NotFound(name.to_string()))
            }
            Err(source) => Err(io_error(name.as_str(), source)),
        }
    }

    /// Regular files in the directory, unordered
    ///
    /// Subdirectories and names that fail [`FileName::parse`] are skipped.
    /// A missing directory lists as empty.
    pub async fn list(&self) -> Result<Vec<StoredFile>> {
        let root = self.root.display().to_string();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&root, source)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(&root, source))?
        {
            let Some(name) = entry.file_name().to_str().and_then(FileName::parse) else {
                continue;
            };

            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(name = %name, error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }

            let modified_at = match meta.modified() {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(err) => {
                    warn!(name = %name, error = %err, "Skipping entry without mtime");
                    continue;
                }
            };

            files.push(StoredFile {
                name,
                size: meta.len(),
                modified_at,
            });
        }

        debug!(count = files.len(), "Listed page files");
        Ok(files)
    }

    /// Remove every regular file and then the directory itself
    ///
    /// Returns the number of files removed. Fails if the directory still
    /// holds anything else afterwards.
    pub async fn purge(&self) -> Result<usize> {
        let files = self.list().await?;
        for file in &files {
            fs::remove_file(self.path_of(&file.name))
                .await
                .map_err(|source| io_error(file.name.as_str(), source))?;
        }

        match fs::remove_dir(&self.root).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(io_error(&self.root.display().to_string(), source)),
        }

        info!(root = %self.root.display(), removed = files.len(), "Purged page directory");
        Ok(files.len())
    }
}

fn io_error(name: &str, source: std::io::Error) -> PageError {
    PageError::Io {
        name: name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(raw: &str) -> FileName {
        FileName::parse(raw).unwrap()
    }

    async fn store() -> (PageStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::new(temp_dir.path().join("custom-html-pages"));
        store.ensure_dir().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (store, _temp_dir) = store().await;

        store.write(&name("a.html"), b"<p>a</p>").await.unwrap();
        let data = store.read(&name("a.html")).await.unwrap();
        assert_eq!(&data[..], b"<p>a</p>");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let (store, _temp_dir) = store().await;

        store.write(&name("a.html"), b"first").await.unwrap();
        store.write(&name("a.html"), b"second").await.unwrap();
        assert_eq!(&store.read(&name("a.html")).await.unwrap()[..], b"second");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (store, _temp_dir) = store().await;

        let err = store.read(&name("missing.html")).await.unwrap_err();
        assert!(matches!(err, PageError::NotFound(ref n) if n == "missing.html"));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _temp_dir) = store().await;

        store.write(&name("gone.js"), b"x").await.unwrap();
        store.delete(&name("gone.js")).await.unwrap();
        assert!(!store.exists(&name("gone.js")).await.unwrap());

        let err = store.delete(&name("gone.js")).await.unwrap_err();
        assert!(matches!(err, PageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_directory_entry_is_not_found() {
        let (store, _temp_dir) = store().await;

        std::fs::create_dir(store.root().join("nested")).unwrap();
        let err = store.delete(&name("nested")).await.unwrap_err();
        assert!(matches!(err, PageError::NotFound(_)));
        assert!(store.root().join("nested").is_dir());
    }

    #[tokio::test]
    async fn test_list_skips_directories_and_hidden_files() {
        let (store, _temp_dir) = store().await;

        store.write(&name("one.html"), b"1").await.unwrap();
        store.write(&name("two.js"), b"22").await.unwrap();
        std::fs::create_dir(store.root().join("subdir")).unwrap();
        std::fs::write(store.root().join(".hidden"), b"x").unwrap();

        let mut files = store.list().await.unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["one.html", "two.js"]);
        assert_eq!(files[0].size, 1);
        assert_eq!(files[1].size, 2);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::new(temp_dir.path().join("never-created"));

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_without_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::new(temp_dir.path().join("never-created"));

        let err = store.write(&name("a.html"), b"x").await.unwrap_err();
        assert!(matches!(err, PageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_purge_removes_files_and_directory() {
        let (store, _temp_dir) = store().await;

        store.write(&name("a.html"), b"a").await.unwrap();
        store.write(&name("b.php"), b"b").await.unwrap();

        assert_eq!(store.purge().await.unwrap(), 2);
        assert!(!store.root().exists());
        assert_eq!(store.purge().await.unwrap(), 0);
    }
}
