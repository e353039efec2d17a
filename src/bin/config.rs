use once_cell::sync::Lazy;
use serde_derive::Deserialize;

pub static CONFIG: Lazy<Config> = Lazy::new(|| Config::new().expect("Config could not be loaded."));

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: log::Level,
    pub display_framerate: bool,
    pub data_root: String,
}

#[derive(Debug, Deserialize)]
pub struct Window {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct Map {
    pub initial_latitude: f64,
    pub initial_longitude: f64,
    pub initial_zoom: u32,
    pub fly_to_zoom: u32,
    pub fly_speed: f64,
    pub tile_url: String,
    pub tile_size: u32,
    pub max_zoom: u32,
    pub max_tiles: usize,
    pub attribution: String,
    pub scroll_zoom_speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct Geocoder {
    pub endpoint: String,
    pub limit: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub window: Window,
    pub map: Map,
    pub geocoder: Geocoder,
    pub user_agent: String,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut s = config::Config::new();

        // Start off by merging in the "default" configuration file
        s.merge(config::File::with_name("config/default"))?;

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        s.merge(config::File::with_name("config/local").required(false))?;

        s.try_into()
    }
}

#[test]
fn defaults_start_over_taichung() {
    let mut s = config::Config::new();
    s.merge(config::File::with_name("config/default")).unwrap();
    let config: Config = s.try_into().unwrap();

    assert_eq!(config.map.initial_latitude, 24.137396608878987);
    assert_eq!(config.map.initial_longitude, 120.68692065044608);
    assert_eq!(config.map.initial_zoom, 8);
    assert!(config.map.fly_to_zoom > config.map.initial_zoom);
    assert!(config.map.fly_to_zoom <= config.map.max_zoom);
}
