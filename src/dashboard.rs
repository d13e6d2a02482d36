use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::{Config, DashboardMode};
use crate::error::{ConfigError, FetchError};
use crate::platform::{self, PlatformClient, RevenueWindow, Sale};
use crate::summary::{self, GroupSummary, MetricTable, NO_PERMISSION, UNAVAILABLE};

/// Everything one page view shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    #[serde(skip)]
    pub mode: DashboardMode,
    pub analysis_data: Vec<GroupSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finances: Vec<GroupFinances>,
}

impl Dashboard {
    fn config_error(mode: DashboardMode, err: ConfigError) -> Self {
        tracing::warn!("{err}");
        Self {
            mode,
            analysis_data: vec![GroupSummary::error(&err)],
            finances: vec![],
        }
    }
}

/// Balance and recent sales for one group. Shown beside the summaries,
/// never added to their totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupFinances {
    pub group_id: u64,
    pub group_name: String,
    pub funds: String,
    pub recent_sales: Vec<Sale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_note: Option<String>,
}

fn failure_marker(err: &FetchError) -> String {
    if err.is_permission_denied() {
        NO_PERMISSION.to_string()
    } else {
        UNAVAILABLE.to_string()
    }
}

/// Fetch and summarize every configured group. Upstream failures only
/// blank out the affected figures; missing configuration replaces the whole
/// result with one error row.
pub async fn build_dashboard(
    client: &PlatformClient,
    config: &Config,
    now: DateTime<Utc>,
) -> Dashboard {
    if config.groups.is_empty() {
        return Dashboard::config_error(config.mode, ConfigError::MissingGroupIds);
    }

    let auth = match (config.mode, config.session_cookie.as_deref()) {
        (DashboardMode::Revenue, None) => {
            return Dashboard::config_error(config.mode, ConfigError::MissingCredential);
        }
        (_, auth) => auth,
    };

    let mut games_by_group = HashMap::with_capacity(config.groups.len());
    let mut universe_ids = Vec::new();
    for group in &config.groups {
        let games = platform::list_group_games(client, group.id, auth).await;
        tracing::debug!(group_id = group.id, games = games.len(), "listed group games");
        universe_ids.extend(games.iter().map(|g| g.universe_id));
        games_by_group.insert(group.id, games);
    }

    let metrics = match (config.mode, auth) {
        (DashboardMode::Revenue, Some(auth)) => {
            let window = RevenueWindow::trailing(now);
            let mut table = MetricTable::new();
            for universe_id in universe_ids {
                if table.get(universe_id).is_none() {
                    let metric = platform::fetch_revenue(client, universe_id, auth, &window).await;
                    table.insert(universe_id, metric);
                }
            }
            table
        }
        _ => platform::fetch_player_counts(client, &universe_ids).await,
    };

    let analysis_data = summary::summarize(&config.groups, games_by_group, &metrics, config.mode);

    let finances = match (config.mode, auth) {
        (DashboardMode::Revenue, Some(auth)) => group_finances(client, config, auth).await,
        _ => vec![],
    };

    Dashboard {
        mode: config.mode,
        analysis_data,
        finances,
    }
}

async fn group_finances(
    client: &PlatformClient,
    config: &Config,
    auth: &str,
) -> Vec<GroupFinances> {
    let mut out = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let funds = match platform::fetch_group_funds(client, group.id, auth).await {
            Ok(robux) => summary::format_robux(robux),
            Err(e) => {
                tracing::warn!(
                    group_id = group.id,
                    url = e.url(),
                    "failed to fetch group funds: {e}"
                );
                failure_marker(&e)
            }
        };

        let (recent_sales, sales_note) =
            match platform::fetch_recent_sales(client, group.id, auth).await {
                Ok(sales) => (sales, None),
                Err(e) => {
                    tracing::warn!(
                        group_id = group.id,
                        url = e.url(),
                        "failed to fetch transactions: {e}"
                    );
                    (vec![], Some(failure_marker(&e)))
                }
            };

        out.push(GroupFinances {
            group_id: group.id,
            group_name: group.name.clone(),
            funds,
            recent_sales,
            sales_note,
        });
    }
    out
}
