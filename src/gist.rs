use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use url::Url;

use crate::model::{AppSettings, GistSyncSettings};

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_RAW_HOST: &str = "gist.githubusercontent.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone)]
pub struct GistConfig {
    pub api_base_url: String,
    pub raw_host: String,
}

impl Default for GistConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            raw_host: DEFAULT_RAW_HOST.to_owned(),
        }
    }
}

impl GistConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base_url = std::env::var("MAKTABA_GIST_API_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);
        let raw_host = std::env::var("MAKTABA_GIST_RAW_HOST")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.raw_host);
        Self {
            api_base_url,
            raw_host,
        }
    }
}

/// Gist id and file name taken from a raw document URL of the form
/// `https://<raw host>/<owner>/<id>/raw/[<revision>/]<filename>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistRef {
    pub gist_id: String,
    pub filename: String,
}

impl GistRef {
    pub fn parse(raw_url: &str, raw_host: &str) -> anyhow::Result<Self> {
        let invalid = || anyhow::anyhow!("invalid Gist raw URL: {raw_url:?}");

        let url = Url::parse(raw_url.trim()).map_err(|_| invalid())?;
        if url.host_str() != Some(raw_host) {
            return Err(invalid());
        }
        let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
        let [_owner, gist_id, "raw", rest @ ..] = segments.as_slice() else {
            return Err(invalid());
        };
        let file_segments = match rest {
            [single] => std::slice::from_ref(single),
            [_revision, file @ ..] => file,
            [] => return Err(invalid()),
        };
        let filename = file_segments.join("/");
        if gist_id.is_empty() || filename.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            gist_id: (*gist_id).to_owned(),
            filename,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GistClient {
    client: reqwest::Client,
    config: GistConfig,
}

impl GistClient {
    pub fn new(config: GistConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self { client, config })
    }

    pub fn edit_endpoint(&self, gist: &GistRef) -> String {
        let base = self.config.api_base_url.trim_end_matches('/');
        format!("{base}/gists/{}", gist.gist_id)
    }

    /// Fetches and parses the raw document.
    pub async fn load(&self, sync: &GistSyncSettings) -> anyhow::Result<AppSettings> {
        if sync.raw_url.trim().is_empty() {
            anyhow::bail!("a Gist raw URL is required to sync");
        }
        let gist = GistRef::parse(&sync.raw_url, &self.config.raw_host)?;
        tracing::info!(gist = %gist.gist_id, file = %gist.filename, "loading settings from gist");

        let response = self
            .client
            .get(sync.raw_url.trim())
            .header(USER_AGENT, user_agent())
            .send()
            .await
            .with_context(|| format!("GET {}", sync.raw_url))?;

        let status = response.status();
        let raw = response.text().await.context("read gist response body")?;
        if !status.is_success() {
            anyhow::bail!("failed to load settings from gist ({status})");
        }

        let value: serde_json::Value =
            serde_json::from_str(&raw).context("gist document is not valid JSON")?;
        if !value.is_object() {
            anyhow::bail!("gist document must be a JSON object");
        }
        serde_json::from_value(value).context("gist document has an unexpected shape")
    }

    /// Overwrites the gist file with `settings`. The access token itself is
    /// never uploaded.
    pub async fn save(
        &self,
        sync: &GistSyncSettings,
        settings: &AppSettings,
    ) -> anyhow::Result<()> {
        if sync.raw_url.trim().is_empty() || sync.token.trim().is_empty() {
            anyhow::bail!("a Gist raw URL and access token are required to sync");
        }
        let gist = GistRef::parse(&sync.raw_url, &self.config.raw_host)?;
        let endpoint = self.edit_endpoint(&gist);

        let mut uploaded = settings.clone();
        uploaded.gist_sync.token.clear();
        let content = serde_json::to_string_pretty(&uploaded).context("serialize settings")?;
        let mut files = serde_json::Map::new();
        files.insert(
            gist.filename.clone(),
            serde_json::json!({ "content": content }),
        );
        let body = serde_json::json!({ "files": files });

        tracing::info!(gist = %gist.gist_id, file = %gist.filename, "saving settings to gist");
        let response = self
            .client
            .patch(&endpoint)
            .header(AUTHORIZATION, format!("token {}", sync.token.trim()))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, user_agent())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("PATCH {endpoint}"))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = parse_error_message(&raw).unwrap_or(raw);
            anyhow::bail!("failed to save settings to gist ({status}): {message}");
        }
        Ok(())
    }
}

fn user_agent() -> String {
    format!("maktaba/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    Some(value.get("message")?.as_str()?.to_owned())
}
