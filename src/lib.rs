pub mod config;
pub mod dashboard;
pub mod error;
pub mod platform;
pub mod render;
pub mod server;
pub mod summary;

use config::Config;
use platform::PlatformClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub platform: PlatformClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let platform = PlatformClient::new(reqwest::Client::new(), &config);
        Self { config, platform }
    }
}
