use serde::{Deserialize, Serialize};

/// Root aggregate persisted locally and synced to the remote document.
///
/// Every field has a serde default so that documents written by older
/// versions load as-is; there is no schema versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub colors: ThemeTokens,
    pub ad: AdSettings,
    pub developer: DeveloperInfo,
    pub categories: Vec<Category>,
    pub promotional_ads: Vec<PromotionalAd>,
    pub about: AboutPage,
    pub gist_sync: GistSyncSettings,
}

/// Named style tokens. They are opaque strings, not colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeTokens {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub secondary: String,
    pub card_bg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdSettings {
    pub url: String,
    /// Countdown length in seconds.
    pub duration: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternate_urls: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watch_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeveloperInfo {
    pub name: String,
    pub email: String,
    pub copyright: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AboutPage {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub emoji: String,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Theme token selecting the card background.
    pub cover_color: String,
    pub click_count: u64,
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPart {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PromotionalAd {
    pub id: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub link_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GistSyncSettings {
    pub raw_url: String,
    pub token: String,
}
