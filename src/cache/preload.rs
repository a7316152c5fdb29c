//! Warm the cache from a directory at startup

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::fs;

use super::writer::CacheWriter;
use crate::logger;

/// Publish every regular file under `dir`, keyed by its path relative to `dir`
///
/// Each file's modification time becomes its `Last-Modified`. Returns the
/// number of files published; individual failures are logged and skipped.
pub async fn preload_directory(writer: &CacheWriter, dir: &Path, ttl: Duration) -> io::Result<usize> {
    let expires_at = Utc::now()
        + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));

    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];
    let mut published = 0;
    let mut is_root = true;

    while let Some(current) = pending.pop() {
        let mut entries = match fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) if is_root => return Err(e),
            Err(e) => {
                logger::log_warning(&format!(
                    "Skipping unreadable directory '{}': {e}",
                    current.display()
                ));
                continue;
            }
        };
        is_root = false;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let Some(relative) = relative.to_str() else {
                logger::log_warning(&format!("Skipping non UTF-8 path '{}'", path.display()));
                continue;
            };

            match publish_file(writer, &path, relative, expires_at).await {
                Ok(()) => published += 1,
                Err(e) => logger::log_warning(&format!(
                    "Failed to preload '{}': {e}",
                    path.display()
                )),
            }
        }
    }

    Ok(published)
}

async fn publish_file(
    writer: &CacheWriter,
    path: &Path,
    relative: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let content = fs::read(path).await?;
    let modified: DateTime<Local> = fs::metadata(path).await?.modified()?.into();
    writer.add_cache_file(content, modified, relative, expires_at)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{path_key, CacheStore, MemoryStore};
    use std::sync::Arc;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("memserve-preload-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_preload_nested_files() {
        let root = scratch_dir();
        fs::create_dir_all(root.join("css")).await.unwrap();
        fs::write(root.join("index.html"), b"<h1>hi</h1>").await.unwrap();
        fs::write(root.join("css").join("site.css"), b"body{}").await.unwrap();

        let store = Arc::new(MemoryStore::new(1 << 20, 1 << 20));
        let writer = CacheWriter::new(store.clone());
        let count = preload_directory(&writer, &root, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(count, 2);
        let index = store.get(&path_key("index.html")).unwrap().unwrap();
        assert_eq!(index.payload().as_ref(), b"<h1>hi</h1>");
        let css = store.get(&path_key("/css/site.css")).unwrap().unwrap();
        assert_eq!(css.payload().as_ref(), b"body{}");

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_root_is_error() {
        let store = Arc::new(MemoryStore::new(1024, 1024));
        let writer = CacheWriter::new(store);
        let result = preload_directory(&writer, &scratch_dir(), Duration::from_secs(60)).await;
        assert!(result.is_err());
    }
}
