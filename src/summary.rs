use serde::Serialize;
use std::collections::HashMap;

use crate::config::{DashboardMode, GroupConfig};
use crate::error::ConfigError;

/// Shown in place of a revenue figure the credential can't read.
pub const NO_PERMISSION: &str = "no permission";
/// Shown in place of a figure whose request failed.
pub const UNAVAILABLE: &str = "N/A";

/// One game owned by a group, as handed to the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub name: String,
    #[serde(rename = "universeId")]
    pub universe_id: u64,
    #[serde(rename = "placeId")]
    pub place_id: Option<u64>,
    pub current_players: u64,
    pub total_revenue: String,
}

impl GameRecord {
    pub fn new(name: impl Into<String>, universe_id: u64, place_id: Option<u64>) -> Self {
        Self {
            name: name.into(),
            universe_id,
            place_id,
            current_players: 0,
            total_revenue: "0".into(),
        }
    }

    /// The numeric value this game contributes to its group's total.
    pub fn metric_value(&self, mode: DashboardMode) -> u64 {
        match mode {
            DashboardMode::Players => self.current_players,
            DashboardMode::Revenue => parse_amount(&self.total_revenue),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub group_id: u64,
    pub group_name: String,
    pub games_data: Vec<GameRecord>,
    pub total_summary: String,
    /// Set only on the row standing in for a page that couldn't be built.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl GroupSummary {
    /// The single row shown when the page can't be built at all.
    pub fn error(err: &ConfigError) -> Self {
        Self {
            group_id: 0,
            group_name: "Error".into(),
            games_data: vec![],
            total_summary: err.to_string(),
            error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// A per-game figure returned by one of the metric endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Players(u64),
    Robux(u64),
    NoPermission,
    Unavailable,
}

/// Universe id to metric, built once per page view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricTable(HashMap<u64, Metric>);

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, universe_id: u64, metric: Metric) {
        self.0.insert(universe_id, metric);
    }

    pub fn get(&self, universe_id: u64) -> Option<Metric> {
        self.0.get(&universe_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u64, Metric)> for MetricTable {
    fn from_iter<I: IntoIterator<Item = (u64, Metric)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Write each game's metric from `metrics`. Games missing from the table
/// get the neutral value, so running this twice gives the same result.
pub fn merge_metrics(games: &mut [GameRecord], metrics: &MetricTable) {
    for game in games.iter_mut() {
        game.current_players = 0;
        game.total_revenue = "0".into();

        match metrics.get(game.universe_id) {
            Some(Metric::Players(n)) => game.current_players = n,
            Some(Metric::Robux(amount)) => game.total_revenue = format_robux(amount),
            Some(Metric::NoPermission) => game.total_revenue = NO_PERMISSION.into(),
            Some(Metric::Unavailable) => game.total_revenue = UNAVAILABLE.into(),
            None => {}
        }
    }
}

/// Merge metrics onto every group's games and total them up. Groups
/// without an entry in `games_by_group` still produce a summary.
pub fn summarize(
    groups: &[GroupConfig],
    mut games_by_group: HashMap<u64, Vec<GameRecord>>,
    metrics: &MetricTable,
    mode: DashboardMode,
) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|group| {
            let mut games = games_by_group.remove(&group.id).unwrap_or_default();
            merge_metrics(&mut games, metrics);

            let total: u64 = games.iter().map(|g| g.metric_value(mode)).sum();
            let total_summary = match mode {
                DashboardMode::Players => format_thousands(total),
                DashboardMode::Revenue => format_robux(total),
            };

            GroupSummary {
                group_id: group.id,
                group_name: group.name.clone(),
                games_data: games,
                total_summary,
                error: false,
            }
        })
        .collect()
}

pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_robux(n: u64) -> String {
    format!("R$ {}", format_thousands(n))
}

/// Numeric portion of a formatted amount; markers count as zero.
pub fn parse_amount(s: &str) -> u64 {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
