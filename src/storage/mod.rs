//! Local image storage for listing photos.
//!
//! Files land under the configured upload directory and are served back at
//! `/uploads/<name>`. Deletion is best-effort; a missing file is not an error
//! worth surfacing to callers.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Persist one uploaded file under a fresh name, returning its public URL
    /// path.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        Ok(format!("/uploads/{}", name))
    }

    /// Best-effort removal by public URL path. Paths that do not point into
    /// the upload directory are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(name) = public_path.strip_prefix("/uploads/") else {
            return;
        };
        // Never follow a name out of the upload directory
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to remove image {}: {}", public_path, e);
            }
        }
    }

    pub async fn remove_all(&self, public_paths: &[String]) {
        for path in public_paths {
            self.remove(path).await;
        }
    }
}

/// Short alphanumeric extension from the client's filename, if any.
fn extension_of(original_name: Option<&str>) -> Option<String> {
    let name = original_name?;
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_parsing() {
        assert_eq!(extension_of(Some("photo.JPG")), Some("jpg".to_string()));
        assert_eq!(extension_of(Some("archive.tar.gz")), Some("gz".to_string()));
        assert_eq!(extension_of(Some("noext")), None);
        assert_eq!(extension_of(Some("weird.e/xt")), None);
        assert_eq!(extension_of(None), None);
    }

    #[tokio::test]
    async fn save_and_remove_round_trip() {
        let dir = std::env::temp_dir().join(format!("nyumba-test-{}", Uuid::new_v4()));
        let store = ImageStore::new(&dir);
        store.ensure_dir().await.unwrap();

        let path = store.save(Some("house.png"), b"png-bytes").await.unwrap();
        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));

        let on_disk = dir.join(path.strip_prefix("/uploads/").unwrap());
        assert!(on_disk.exists());

        store.remove(&path).await;
        assert!(!on_disk.exists());

        // Outside the upload namespace: ignored
        store.remove("/etc/passwd").await;
        store.remove("/uploads/../escape").await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
