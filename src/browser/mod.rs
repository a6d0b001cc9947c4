//! Browser integration.
//!
//! `TabHost` is the seam between task bookkeeping and a running browser;
//! [`cdp::CdpHost`] is the production binding, and tests substitute fakes.

pub mod cdp;

pub use cdp::CdpHost;

use crate::error::Result;

/// A tab currently open in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTab {
    /// Browser-assigned identifier, recycled once the tab closes.
    pub id: String,
    pub url: String,
    pub title: String,
    pub fav_icon_url: Option<String>,
    /// Identifier of the containing window, when the host exposes one.
    pub window_id: Option<String>,
}

/// Operations tabq needs from a running browser.
///
/// Errors from these methods fall in two classes the callers treat
/// differently: a reference to a tab that no longer exists (callers fall
/// back or ignore), and an unreachable endpoint (callers abort and report).
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// All open page tabs, in the host's listing order.
    async fn list_tabs(&self) -> Result<Vec<LiveTab>>;

    /// Look up one tab by identifier. `Ok(None)` when it no longer exists.
    async fn get_tab(&self, tab_id: &str) -> Result<Option<LiveTab>>;

    /// Open a new tab on the given url.
    async fn create_tab(&self, url: &str) -> Result<LiveTab>;

    /// Bring a tab to the foreground of its window.
    async fn activate_tab(&self, tab_id: &str) -> Result<()>;

    /// Raise the window holding a tab, when the host can address windows.
    async fn focus_window(&self, window_id: &str) -> Result<()>;

    /// Close a tab. Closing one that is already gone is not an error.
    async fn close_tab(&self, tab_id: &str) -> Result<()>;

    /// First open tab whose url matches exactly, in listing order.
    async fn find_by_url(&self, url: &str) -> Result<Option<LiveTab>> {
        let tabs = self.list_tabs().await?;
        Ok(tabs.into_iter().find(|tab| tab.url == url))
    }
}
