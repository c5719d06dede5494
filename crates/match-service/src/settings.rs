use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Option<String>,
    pub database_url: String,
    pub port: Option<u16>,
    pub candidate_page_size: Option<usize>,
    pub run_migrations: Option<bool>,
}

impl Settings {
    pub fn is_production(&self) -> bool {
        self.environment
            .as_deref()
            .is_some_and(|env| env.eq_ignore_ascii_case("PROD"))
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder();
    let settings = settings.add_source(Environment::default().try_parsing(true));
    settings.build()?.try_deserialize()
}
