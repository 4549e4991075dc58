use std::sync::Arc;

use anyhow::Context as _;
use tokio::sync::watch;

use crate::defaults::default_settings;
use crate::model::AppSettings;
use crate::persist::SettingsStorage;

/// Single source of truth for the running application.
///
/// Mutation is full-value replacement only. Dependents hold a
/// [`watch::Receiver`] from [`SettingsStore::subscribe`] and re-derive
/// their view whenever it changes.
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<Arc<AppSettings>>,
}

impl SettingsStore {
    pub fn new(initial: AppSettings) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Starts from the persisted value, falling back to the defaults.
    pub async fn open(storage: &dyn SettingsStorage) -> anyhow::Result<Self> {
        let initial = match storage.load().await.context("load persisted settings")? {
            Some(settings) => {
                tracing::debug!("using persisted settings");
                settings
            }
            None => {
                tracing::debug!("no persisted settings; using defaults");
                default_settings()
            }
        };
        Ok(Self::new(initial))
    }

    pub fn get(&self) -> Arc<AppSettings> {
        self.tx.borrow().clone()
    }

    pub fn replace(&self, settings: AppSettings) {
        self.tx.send_replace(Arc::new(settings));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppSettings>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;

    #[tokio::test]
    async fn replace_notifies_subscribers() -> anyhow::Result<()> {
        let store = SettingsStore::new(default_settings());
        let mut rx = store.subscribe();

        let mut next = (*store.get()).clone();
        next.site_name = "Renamed".to_owned();
        store.replace(next);

        rx.changed().await?;
        assert_eq!(rx.borrow().site_name, "Renamed");
        assert_eq!(store.get().site_name, "Renamed");
        Ok(())
    }

    #[tokio::test]
    async fn open_prefers_persisted_settings() -> anyhow::Result<()> {
        let empty = MemoryStorage::new();
        let store = SettingsStore::open(&empty).await?;
        assert_eq!(*store.get(), default_settings());

        let mut saved = default_settings();
        saved.site_name = "Persisted".to_owned();
        let storage = MemoryStorage::with(saved);
        let store = SettingsStore::open(&storage).await?;
        assert_eq!(store.get().site_name, "Persisted");
        Ok(())
    }
}
