//! Local filesystem storage implementation.
//!
//! The feed lives in a single file. Writes go to a uniquely named sibling
//! temp file which is synced and then renamed over the target.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::FeedDocument;
use crate::storage::{FeedStorage, WriteMetadata, rss};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage publishing to the given file.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write bytes atomically (write to a unique temp file, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let path = &self.output_path;
        let failed = |e: std::io::Error| AppError::write(path, e);

        tokio::fs::create_dir_all(parent_dir(path))
            .await
            .map_err(failed)?;

        // Removed on drop unless persisted.
        let tmp = temp_beside(path).map_err(failed)?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&tmp)
            .await
            .map_err(failed)?;
        file.write_all(bytes).await.map_err(failed)?;
        file.flush().await.map_err(failed)?;
        file.sync_all().await.map_err(failed)?;
        drop(file);

        tmp.persist(path).map_err(|e| failed(e.error))?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.output_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Create an empty, uniquely named file next to `path`.
fn temp_beside(path: &Path) -> std::io::Result<TempPath> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(parent_dir(path))
        .map(NamedTempFile::into_temp_path)
}

#[async_trait]
impl FeedStorage for LocalStorage {
    async fn write_feed(&self, doc: &FeedDocument) -> Result<WriteMetadata> {
        let xml = rss::render(doc)?;
        self.write_bytes(xml.as_bytes()).await?;

        log::info!(
            "Feed written: {} items ({} bytes) to {}",
            doc.len(),
            xml.len(),
            self.output_path.display()
        );

        Ok(WriteMetadata {
            path: self.output_path.clone(),
            item_count: doc.len(),
            bytes_written: xml.len(),
        })
    }

    async fn load_feed(&self) -> Result<Option<::rss::Channel>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(::rss::Channel::read_from(&bytes[..])?)),
            None => {
                log::warn!("No feed found at {}", self.output_path.display());
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{ArticleRecord, FeedConfig, FeedMeta};
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn document(titles: &[&str]) -> FeedDocument {
        FeedDocument {
            meta: FeedMeta::from(&FeedConfig::default()),
            last_build: Utc::now(),
            items: titles
                .iter()
                .enumerate()
                .map(|(i, t)| ArticleRecord::new(*t, format!("https://epiotrkow.pl/news/a,{i}")))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_write_and_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("out/feed.xml"));

        let meta = storage.write_feed(&document(&["A", "B"])).await.unwrap();
        assert_eq!(meta.item_count, 2);
        assert!(meta.bytes_written > 0);

        let channel = storage.load_feed().await.unwrap().unwrap();
        assert_eq!(channel.items().len(), 2);
        assert_eq!(channel.items()[1].title(), Some("B"));
        assert_eq!(dir_entries(&tmp.path().join("out")), vec!["feed.xml"]);
    }

    #[tokio::test]
    async fn test_load_missing_feed() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("feed.xml"));

        assert!(storage.load_feed().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_feed() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("feed.xml"));

        storage.write_feed(&document(&["stary"])).await.unwrap();
        storage.write_feed(&document(&["nowy", "drugi"])).await.unwrap();

        let channel = storage.load_feed().await.unwrap().unwrap();
        assert_eq!(channel.items()[0].title(), Some("nowy"));
    }

    #[test]
    fn test_temp_file_never_aliases_output() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.tmp");
        std::fs::write(&path, "stary").unwrap();

        let temp = temp_beside(&path).unwrap();
        let temp_path: &Path = temp.as_ref();
        assert_ne!(temp_path, path.as_path());
        assert_eq!(temp_path.parent(), path.parent());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "stary");

        drop(temp);
        assert_eq!(dir_entries(tmp.path()), vec!["feed.tmp"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "stary");
    }

    #[tokio::test]
    async fn test_write_twice_to_tmp_named_output() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("feed.tmp"));

        storage.write_feed(&document(&["stary"])).await.unwrap();
        storage.write_feed(&document(&["nowy"])).await.unwrap();

        let channel = storage.load_feed().await.unwrap().unwrap();
        assert_eq!(channel.items()[0].title(), Some("nowy"));
        assert_eq!(dir_entries(tmp.path()), vec!["feed.tmp"]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_output() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.tmp");
        // A non-empty directory at the output path makes the final rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("stary.xml"), "stary").unwrap();
        let storage = LocalStorage::new(&path);

        let err = storage.write_feed(&document(&["nowy"])).await.unwrap_err();

        assert!(matches!(err, AppError::Write { .. }));
        assert_eq!(dir_entries(tmp.path()), vec!["feed.tmp"]);
        assert_eq!(
            std::fs::read_to_string(path.join("stary.xml")).unwrap(),
            "stary"
        );
    }
}
