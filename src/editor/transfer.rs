use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt as _;

use super::SettingsEditor;
use crate::model::AppSettings;

impl SettingsEditor {
    pub fn export_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.pending).context("serialize settings")
    }

    /// Writes the pending settings to `path`, refusing to overwrite unless `force`.
    pub async fn export_to(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        let contents = self.export_json()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create output dir: {}", parent.display()))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if force {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = match options.open(path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                anyhow::bail!("output already exists: {}", path.display());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("open output: {}", path.display()));
            }
        };
        file.write_all(contents.as_bytes())
            .await
            .with_context(|| format!("write output: {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("flush output: {}", path.display()))?;

        tracing::info!(path = %path.display(), "exported settings");
        Ok(())
    }

    /// Replaces the pending settings wholesale with an imported document.
    pub fn import_json(&mut self, text: &str) -> anyhow::Result<()> {
        let settings = parse_import(text)?;
        self.set_pending(settings)?;
        tracing::info!("imported settings");
        Ok(())
    }

    pub async fn import_from(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("read import file: {}", path.display()))?;
        self.import_json(&text)
            .with_context(|| format!("import: {}", path.display()))
    }
}

/// Minimal acceptance check: an object with a string `siteName` and an
/// array `categories`.
fn parse_import(text: &str) -> anyhow::Result<AppSettings> {
    let value: Value = serde_json::from_str(text).context("invalid or corrupted JSON file")?;
    let has_site_name = value.get("siteName").is_some_and(Value::is_string);
    let has_categories = value.get("categories").is_some_and(Value::is_array);
    if !has_site_name || !has_categories {
        anyhow::bail!("settings file must contain a siteName and a categories array");
    }
    serde_json::from_value(value).context("settings file has an unexpected shape")
}
