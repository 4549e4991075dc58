use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::model::AppSettings;

/// Well-known key the settings document is stored under.
pub const SETTINGS_KEY: &str = "librarySettings";

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<AppSettings>>;
    async fn save(&self, settings: &AppSettings) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

/// Key-value storage on the local filesystem: one JSON document per key.
#[derive(Debug, Clone)]
pub struct LocalFsStorage {
    base_dir: PathBuf,
}

impl LocalFsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(format!("{SETTINGS_KEY}.json"))
    }
}

#[async_trait]
impl SettingsStorage for LocalFsStorage {
    async fn load(&self) -> anyhow::Result<Option<AppSettings>> {
        let path = self.settings_path();
        read_settings(&path)
            .await
            .with_context(|| format!("read: {}", path.display()))
    }

    async fn save(&self, settings: &AppSettings) -> anyhow::Result<()> {
        let path = self.settings_path();
        write_settings_atomic(&path, settings)
            .await
            .with_context(|| format!("write: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "persisted settings");
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let path = self.settings_path();
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove: {}", path.display())),
        }
    }
}

/// In-process storage, for embedders without a filesystem and for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<AppSettings>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(settings: AppSettings) -> Self {
        Self {
            slot: Mutex::new(Some(settings)),
        }
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Option<AppSettings>>> {
        self.slot
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock is poisoned"))
    }
}

#[async_trait]
impl SettingsStorage for MemoryStorage {
    async fn load(&self) -> anyhow::Result<Option<AppSettings>> {
        Ok(self.lock()?.clone())
    }

    async fn save(&self, settings: &AppSettings) -> anyhow::Result<()> {
        *self.lock()? = Some(settings.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

async fn read_settings(path: &Path) -> anyhow::Result<Option<AppSettings>> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let settings = serde_json::from_slice(&raw).context("parse settings document")?;
    Ok(Some(settings))
}

/// Writes a hidden sibling temp file, then renames it over `path`. A failed
/// rename removes the temp file.
async fn write_settings_atomic(path: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("settings path has no parent: {}", path.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("settings path has no file name: {}", path.display()))?;
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create data dir: {}", dir.display()))?;

    let mut document = serde_json::to_vec_pretty(settings).context("serialize settings")?;
    document.push(b'\n');

    let tmp_path = dir.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    ));
    fs::write(&tmp_path, &document)
        .await
        .with_context(|| format!("write temp settings: {}", tmp_path.display()))?;
    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(err).with_context(|| format!("replace settings: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_settings;

    #[tokio::test]
    async fn local_fs_round_trip_and_clear() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let storage = LocalFsStorage::new(temp.path().join("data"));

        assert!(storage.load().await?.is_none());

        let mut settings = default_settings();
        settings.site_name = "Saved".to_owned();
        storage.save(&settings).await?;
        assert!(storage.settings_path().ends_with("librarySettings.json"));
        assert_eq!(storage.load().await?, Some(settings));

        storage.clear().await?;
        assert!(storage.load().await?.is_none());
        storage.clear().await?;
        Ok(())
    }

    #[tokio::test]
    async fn save_leaves_only_the_settings_document() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let storage = LocalFsStorage::new(temp.path());
        storage.save(&default_settings()).await?;
        storage.save(&default_settings()).await?;

        let names: Vec<_> = std::fs::read_dir(temp.path())?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<_, _>>()?;
        assert_eq!(names, ["librarySettings.json"]);

        let raw = std::fs::read_to_string(storage.settings_path())?;
        assert!(raw.ends_with("}\n"));
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_document_is_an_error() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let storage = LocalFsStorage::new(temp.path());
        std::fs::write(storage.settings_path(), "{ not json")?;

        let err = storage.load().await.unwrap_err();
        assert!(format!("{err:#}").contains("parse settings document"));
        Ok(())
    }
}
