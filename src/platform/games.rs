use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use super::{DataList, PlatformClient};
use crate::summary::{GameRecord, Metric, MetricTable};

#[derive(Deserialize)]
struct GroupGame {
    id: Option<u64>,
    name: Option<String>,
    #[serde(rename = "placeId")]
    place_id: Option<u64>,
    #[serde(rename = "rootPlace")]
    root_place: Option<RootPlace>,
}

#[derive(Deserialize)]
struct RootPlace {
    id: Option<u64>,
}

#[derive(Deserialize)]
struct UniverseStats {
    id: u64,
    playing: Option<u64>,
}

/// List up to 100 of a group's games, newest first as the platform orders
/// them. Entries without a usable universe id are dropped one by one. A
/// failed request yields an empty list.
pub async fn list_group_games(
    client: &PlatformClient,
    group_id: u64,
    auth: Option<&str>,
) -> Vec<GameRecord> {
    let url = client.games_url(&format!("/v2/groups/{group_id}/games"));
    let query = [("sortOrder", "Desc".to_string()), ("limit", "100".to_string())];

    let list: DataList<Value> = match client.fetch(&url, &query, auth).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(group_id, url = e.url(), "failed to list group games: {e}");
            return vec![];
        }
    };

    list.entries::<GroupGame>(&url)
        .into_iter()
        .filter_map(|game| {
            let universe_id = game.id?;
            let place_id = game.place_id.or(game.root_place.and_then(|p| p.id));
            Some(GameRecord::new(
                game.name.unwrap_or_default(),
                universe_id,
                place_id,
            ))
        })
        .collect()
}

/// Fetch live player counts for all `universe_ids` in one call. Ids missing
/// from the response, or whose entry is malformed, are absent from the table.
pub async fn fetch_player_counts(client: &PlatformClient, universe_ids: &[u64]) -> MetricTable {
    let mut seen = HashSet::with_capacity(universe_ids.len());
    let ids: Vec<u64> = universe_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();
    if ids.is_empty() {
        return MetricTable::new();
    }

    let url = client.games_url("/v1/games");
    let joined = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    match client
        .fetch::<DataList<Value>>(&url, &[("universeIds", joined)], None)
        .await
    {
        Ok(list) => list
            .entries::<UniverseStats>(&url)
            .into_iter()
            .map(|s| (s.id, Metric::Players(s.playing.unwrap_or(0))))
            .collect(),
        Err(e) => {
            tracing::warn!(
                count = ids.len(),
                url = e.url(),
                "failed to fetch player counts: {e}"
            );
            MetricTable::new()
        }
    }
}
