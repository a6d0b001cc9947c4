//! DevTools HTTP endpoint binding.
//!
//! Talks to the browser's `/json` discovery endpoints (the ones behind
//! `--remote-debugging-port`): `GET /json/list` to enumerate targets,
//! `PUT /json/new?<url>` to open a tab, `GET /json/activate/<id>` and
//! `GET /json/close/<id>` to drive one. No WebSocket session is needed
//! for any of that.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::browser::{LiveTab, TabHost};
use crate::config::BrowserConfig;
use crate::error::{Error, Result};

/// Target record as the discovery endpoint reports it.
#[derive(Debug, Deserialize)]
struct Target {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "faviconUrl")]
    favicon_url: Option<String>,
}

impl Target {
    fn into_live_tab(self) -> LiveTab {
        LiveTab {
            id: self.id,
            url: self.url,
            title: self.title,
            fav_icon_url: self.favicon_url,
            // The discovery endpoints do not expose window identity.
            window_id: None,
        }
    }
}

/// Tab host backed by a browser's remote debugging endpoint.
pub struct CdpHost {
    client: Client,
    endpoint: String,
}

impl CdpHost {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint base this host talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_targets(&self) -> Result<Vec<Target>> {
        let url = format!("{}/json/list", self.endpoint);
        let targets = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Target>>()
            .await?;
        debug!(count = targets.len(), "listed browser targets");
        Ok(targets)
    }
}

impl TabHost for CdpHost {
    async fn list_tabs(&self) -> Result<Vec<LiveTab>> {
        let targets = self.fetch_targets().await?;
        // Extensions, workers and devtools windows show up as targets too;
        // only page targets correspond to tabs.
        Ok(targets
            .into_iter()
            .filter(|target| target.kind == "page")
            .map(Target::into_live_tab)
            .collect())
    }

    async fn get_tab(&self, tab_id: &str) -> Result<Option<LiveTab>> {
        // There is no per-target lookup; resolve hints against the listing.
        let tabs = self.list_tabs().await?;
        Ok(tabs.into_iter().find(|tab| tab.id == tab_id))
    }

    async fn create_tab(&self, url: &str) -> Result<LiveTab> {
        // The whole query string is the target url, percent-encoded.
        let request_url = format!("{}/json/new?{}", self.endpoint, urlencoding::encode(url));
        debug!(%url, "opening tab");
        let target = self
            .client
            .put(&request_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Target>()
            .await?;
        Ok(target.into_live_tab())
    }

    async fn activate_tab(&self, tab_id: &str) -> Result<()> {
        let request_url = format!("{}/json/activate/{tab_id}", self.endpoint);
        let response = self.client.get(&request_url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::Browser(format!("no such tab: {tab_id}")));
        }
        response.error_for_status()?;
        debug!(%tab_id, "activated tab");
        Ok(())
    }

    async fn focus_window(&self, _window_id: &str) -> Result<()> {
        // Activating a target already raises its window; the discovery
        // endpoints offer nothing finer-grained than that.
        Ok(())
    }

    async fn close_tab(&self, tab_id: &str) -> Result<()> {
        let request_url = format!("{}/json/close/{tab_id}", self.endpoint);
        let response = self.client.get(&request_url).send().await?;
        // A tab that is already gone counts as closed.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        response.error_for_status()?;
        debug!(%tab_id, "closed tab");
        Ok(())
    }
}
