use reqwest::StatusCode;

/// A single upstream call that produced no usable data.
#[derive(Debug)]
pub enum FetchError {
    Transport { url: String, cause: String },
    Status { url: String, status: StatusCode },
    PermissionDenied { url: String },
    Decode { url: String, cause: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::PermissionDenied { url }
            | FetchError::Decode { url, .. } => url,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FetchError::PermissionDenied { .. })
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport { url, cause } => write!(f, "request to {url} failed: {cause}"),
            FetchError::Status { url, status } => write!(f, "{url} returned {status}"),
            FetchError::PermissionDenied { url } => write!(f, "no permission for {url}"),
            FetchError::Decode { url, cause } => write!(f, "invalid response from {url}: {cause}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Configuration the page can't be built without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingGroupIds,
    MissingCredential,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingGroupIds => {
                write!(f, "Set GROUP_IDS in the environment to list the groups to show")
            }
            ConfigError::MissingCredential => {
                write!(f, "Set ROBLOX_COOKIE in the environment to load revenue data")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
