//! Administrative editing of the catalog, promotions, and site settings.
//!
//! All operations mutate a pending copy. Nothing reaches the
//! [`SettingsStore`] or local storage until [`SettingsEditor::commit`].

mod crud;
mod draft;
mod transfer;

use anyhow::Context as _;

pub use crud::{BookEdit, NewBook, NewPromotion};
pub use draft::{JsonDraft, replace_in_strings};

use crate::defaults::default_settings;
use crate::gist::GistClient;
use crate::model::{AppSettings, Category, PromotionalAd};
use crate::persist::SettingsStorage;
use crate::store::SettingsStore;

/// Directly editable scalar settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingsField {
    SiteName,
    LogoUrl,
    AdUrl,
    AdDuration,
    /// Comma-separated list.
    AdAlternateUrls,
    /// Comma-separated list.
    AdWatchUrls,
    DeveloperName,
    DeveloperEmail,
    DeveloperCopyright,
    AboutTitle,
    AboutContent,
    GistRawUrl,
    GistToken,
    ColorBackground,
    ColorText,
    ColorPrimary,
    ColorSecondary,
    ColorCardBg,
}

#[derive(Debug, Clone)]
pub struct SettingsEditor {
    pending: AppSettings,
    categories: JsonDraft,
    promotions: JsonDraft,
}

impl SettingsEditor {
    pub fn new(current: &AppSettings) -> anyhow::Result<Self> {
        Ok(Self {
            categories: JsonDraft::render(&current.categories)?,
            promotions: JsonDraft::render(&current.promotional_ads)?,
            pending: current.clone(),
        })
    }

    pub fn pending(&self) -> &AppSettings {
        &self.pending
    }

    pub fn categories_draft(&self) -> &JsonDraft {
        &self.categories
    }

    pub fn promotions_draft(&self) -> &JsonDraft {
        &self.promotions
    }

    /// Stages new text for the categories draft without applying it.
    pub fn edit_categories_text(&mut self, text: impl Into<String>) {
        self.categories.set_text(text);
    }

    pub fn edit_promotions_text(&mut self, text: impl Into<String>) {
        self.promotions.set_text(text);
    }

    /// Replaces the pending categories with the parsed draft, or fails and
    /// leaves them untouched.
    pub fn apply_categories_draft(&mut self) -> anyhow::Result<()> {
        let categories: Vec<Category> = self
            .categories
            .parse()
            .context("categories JSON is invalid")?;
        tracing::info!(categories = categories.len(), "applied categories draft");
        self.pending.categories = categories;
        Ok(())
    }

    pub fn apply_promotions_draft(&mut self) -> anyhow::Result<()> {
        let promotions: Vec<PromotionalAd> = self
            .promotions
            .parse()
            .context("promotional ads JSON is invalid")?;
        tracing::info!(promotions = promotions.len(), "applied promotional ads draft");
        self.pending.promotional_ads = promotions;
        Ok(())
    }

    pub fn set_field(&mut self, field: SettingsField, value: &str) -> anyhow::Result<()> {
        let settings = &mut self.pending;
        match field {
            SettingsField::SiteName => settings.site_name = value.to_owned(),
            SettingsField::LogoUrl => {
                settings.logo_url = (!value.trim().is_empty()).then(|| value.to_owned());
            }
            SettingsField::AdUrl => settings.ad.url = value.to_owned(),
            SettingsField::AdDuration => {
                settings.ad.duration = value
                    .trim()
                    .parse()
                    .with_context(|| format!("ad duration must be a whole number of seconds: {value:?}"))?;
            }
            SettingsField::AdAlternateUrls => settings.ad.alternate_urls = split_list(value),
            SettingsField::AdWatchUrls => settings.ad.watch_urls = split_list(value),
            SettingsField::DeveloperName => settings.developer.name = value.to_owned(),
            SettingsField::DeveloperEmail => settings.developer.email = value.to_owned(),
            SettingsField::DeveloperCopyright => settings.developer.copyright = value.to_owned(),
            SettingsField::AboutTitle => settings.about.title = value.to_owned(),
            SettingsField::AboutContent => settings.about.content = value.to_owned(),
            SettingsField::GistRawUrl => settings.gist_sync.raw_url = value.trim().to_owned(),
            SettingsField::GistToken => settings.gist_sync.token = value.trim().to_owned(),
            SettingsField::ColorBackground => settings.colors.background = value.to_owned(),
            SettingsField::ColorText => settings.colors.text = value.to_owned(),
            SettingsField::ColorPrimary => settings.colors.primary = value.to_owned(),
            SettingsField::ColorSecondary => settings.colors.secondary = value.to_owned(),
            SettingsField::ColorCardBg => settings.colors.card_bg = value.to_owned(),
        }
        tracing::debug!(?field, "updated pending field");
        Ok(())
    }

    /// Replaces `find` in every string value of the pending settings.
    pub fn find_replace(&mut self, find: &str, replace: &str) -> anyhow::Result<usize> {
        if find.is_empty() {
            anyhow::bail!("enter the text to search for");
        }

        let mut value = serde_json::to_value(&self.pending).context("serialize pending settings")?;
        let count = replace_in_strings(&mut value, find, replace);
        let replaced: AppSettings =
            serde_json::from_value(value).context("re-read settings after replace")?;
        self.set_pending(replaced)?;

        tracing::info!(count, "replaced text in settings");
        Ok(count)
    }

    /// Pulls the remote document into the pending settings.
    ///
    /// Local sync credentials survive when the remote document carries none.
    pub async fn load_from_gist(&mut self, client: &GistClient) -> anyhow::Result<()> {
        let mut loaded = client.load(&self.pending.gist_sync).await?;
        if loaded.gist_sync.raw_url.is_empty() {
            loaded.gist_sync.raw_url = self.pending.gist_sync.raw_url.clone();
        }
        if loaded.gist_sync.token.is_empty() {
            loaded.gist_sync.token = self.pending.gist_sync.token.clone();
        }
        self.set_pending(loaded)
    }

    pub async fn save_to_gist(&self, client: &GistClient) -> anyhow::Result<()> {
        client.save(&self.pending.gist_sync, &self.pending).await
    }

    /// Validates both drafts, persists the result, then publishes it.
    pub async fn commit(
        &mut self,
        store: &SettingsStore,
        storage: &dyn SettingsStorage,
    ) -> anyhow::Result<()> {
        let categories: Vec<Category> = self
            .categories
            .parse()
            .context("categories JSON is invalid")?;
        let promotional_ads: Vec<PromotionalAd> = self
            .promotions
            .parse()
            .context("promotional ads JSON is invalid")?;
        let committed = AppSettings {
            categories,
            promotional_ads,
            ..self.pending.clone()
        };

        storage
            .save(&committed)
            .await
            .context("persist committed settings")?;
        store.replace(committed.clone());
        self.pending = committed;

        tracing::info!("settings committed");
        Ok(())
    }

    /// Forgets persisted settings and falls back to the defaults.
    pub async fn reset(
        store: &SettingsStore,
        storage: &dyn SettingsStorage,
        confirmed: bool,
    ) -> anyhow::Result<()> {
        if !confirmed {
            anyhow::bail!("reset requires confirmation");
        }
        storage.clear().await.context("clear persisted settings")?;
        store.replace(default_settings());
        tracing::info!("settings reset to defaults");
        Ok(())
    }

    fn set_pending(&mut self, settings: AppSettings) -> anyhow::Result<()> {
        self.categories = JsonDraft::render(&settings.categories)?;
        self.promotions = JsonDraft::render(&settings.promotional_ads)?;
        self.pending = settings;
        Ok(())
    }

    fn refresh_drafts(&mut self) -> anyhow::Result<()> {
        self.categories = JsonDraft::render(&self.pending.categories)?;
        self.promotions = JsonDraft::render(&self.pending.promotional_ads)?;
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn generate_id(prefix: &str) -> String {
    format!("{prefix}{}", chrono::Utc::now().timestamp_millis())
}
