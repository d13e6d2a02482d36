mod economy;
mod games;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::FetchError;

pub use economy::{RevenueWindow, Sale, fetch_group_funds, fetch_recent_sales, fetch_revenue};
pub use games::{fetch_player_counts, list_group_games};

/// The `{ "data": [...] }` envelope most list endpoints share.
#[derive(Deserialize)]
pub(crate) struct DataList<T> {
    #[serde(default = "Vec::new")]
    pub(crate) data: Vec<T>,
}

impl DataList<Value> {
    /// Decode each entry on its own, skipping the ones that don't fit `T`
    /// so one bad row never costs the rest of the list.
    pub(crate) fn entries<T: DeserializeOwned>(self, url: &str) -> Vec<T> {
        self.data
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(%url, "skipping malformed entry: {e}");
                    None
                }
            })
            .collect()
    }
}

/// Thin GET-only client for the platform's REST APIs. Every call is made
/// exactly once; callers decide how to degrade on failure.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    games_api_url: String,
    economy_api_url: String,
    develop_api_url: String,
}

impl PlatformClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            games_api_url: config.games_api_url.trim_end_matches('/').to_string(),
            economy_api_url: config.economy_api_url.trim_end_matches('/').to_string(),
            develop_api_url: config.develop_api_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn games_url(&self, path: &str) -> String {
        format!("{}{path}", self.games_api_url)
    }

    pub(crate) fn economy_url(&self, path: &str) -> String {
        format!("{}{path}", self.economy_api_url)
    }

    pub(crate) fn develop_url(&self, path: &str) -> String {
        format!("{}{path}", self.develop_api_url)
    }

    /// GET `url` and parse the body as JSON. `auth` is an opaque session
    /// credential forwarded as the `.ROBLOSECURITY` cookie.
    pub async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        auth: Option<&str>,
    ) -> Result<Value, FetchError> {
        let mut req = self.http.get(url).query(query);
        if let Some(token) = auth {
            req = req.header(reqwest::header::COOKIE, format!(".ROBLOSECURITY={token}"));
        }

        let resp = req.send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::PermissionDenied {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(%url, "fetched");
        Ok(body)
    }

    /// Like [`fetch_json`](Self::fetch_json) but decodes into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        auth: Option<&str>,
    ) -> Result<T, FetchError> {
        let body = self.fetch_json(url, query, auth).await?;
        serde_json::from_value(body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            cause: e.to_string(),
        })
    }
}
