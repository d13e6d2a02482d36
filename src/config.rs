use std::collections::HashMap;
use std::net::SocketAddr;

/// Names shown for groups that `GROUP_NAMES` doesn't cover.
const BUILTIN_GROUP_NAMES: &[(u64, &str)] = &[(35507841, "Gn-Studios"), (6443807, "Nearo")];

/// Which metric the dashboard collects per game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardMode {
    /// Public live player counts, batched in one call.
    #[default]
    Players,
    /// Authenticated 30-day revenue, one call per game.
    Revenue,
}

impl DashboardMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "players" => Some(DashboardMode::Players),
            "revenue" => Some(DashboardMode::Revenue),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupConfig {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mode: DashboardMode,
    pub groups: Vec<GroupConfig>,
    pub session_cookie: Option<String>,
    pub games_api_url: String,
    pub economy_api_url: String,
    pub develop_api_url: String,
    pub place_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset and blank values are
    /// treated the same.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PORT, using 5000");
                5000
            }),
            None => 5000,
        };

        let mode = match get("DASHBOARD_MODE") {
            Some(raw) => DashboardMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown DASHBOARD_MODE, using players");
                DashboardMode::Players
            }),
            None => DashboardMode::Players,
        };

        let names = group_names(get("GROUP_NAMES").as_deref());
        let groups = parse_group_ids(get("GROUP_IDS").as_deref().unwrap_or_default())
            .into_iter()
            .map(|id| GroupConfig {
                id,
                name: names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("Group {id}")),
            })
            .collect();

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            mode,
            groups,
            session_cookie: get("ROBLOX_COOKIE").map(|c| c.trim().to_string()),
            games_api_url: get("GAMES_API_URL")
                .unwrap_or_else(|| "https://games.roblox.com".into()),
            economy_api_url: get("ECONOMY_API_URL")
                .unwrap_or_else(|| "https://economy.roblox.com".into()),
            develop_api_url: get("DEVELOP_API_URL")
                .unwrap_or_else(|| "https://develop.roblox.com".into()),
            place_url: get("PLACE_URL").unwrap_or_else(|| "https://www.roblox.com/games".into()),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}

/// Parse a comma-separated id list, skipping anything that isn't all digits.
fn parse_group_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn group_names(overrides: Option<&str>) -> HashMap<u64, String> {
    let mut names: HashMap<u64, String> = BUILTIN_GROUP_NAMES
        .iter()
        .map(|(id, name)| (*id, name.to_string()))
        .collect();

    for pair in overrides.unwrap_or_default().split(',') {
        let Some((id, name)) = pair.split_once(':') else {
            continue;
        };
        match id.trim().parse::<u64>() {
            Ok(id) if !name.trim().is_empty() => {
                names.insert(id, name.trim().to_string());
            }
            _ => tracing::warn!(entry = %pair, "ignoring malformed GROUP_NAMES entry"),
        }
    }

    names
}
