use std::time::Duration;

use crate::config::CONFIG;
use crate::stats::Stats;
use waypoint::*;

pub struct AppState {
    pub tile_cache: TileCache,
    pub map: MapView,
    pub search: SearchController<GeocodeWorker<Nominatim>>,
    pub shortcuts: ShortcutBus,
    pub stats: Stats,
}

impl AppState {
    pub fn new(width: f64, height: f64) -> Result<Self, PositionError> {
        let shortcuts = ShortcutBus::new();

        let geocoder = Nominatim::new(NominatimSettings {
            endpoint: CONFIG.geocoder.endpoint.clone(),
            user_agent: CONFIG.user_agent.clone(),
            limit: CONFIG.geocoder.limit,
            timeout: Duration::from_secs(CONFIG.geocoder.timeout_seconds),
        });
        let search = SearchController::new(GeocodeWorker::new(geocoder), &shortcuts);

        let mut map = MapView::new(
            Screen::new(width, height, CONFIG.map.tile_size),
            CONFIG.map.max_zoom,
            CONFIG.map.fly_speed,
        );
        map.initialize(
            Position::new(CONFIG.map.initial_latitude, CONFIG.map.initial_longitude)?,
            CONFIG.map.initial_zoom,
        );

        let tile_cache = TileCache::new(
            &CONFIG.general.data_root,
            TileSource {
                url_template: CONFIG.map.tile_url.clone(),
                user_agent: CONFIG.user_agent.clone(),
                attribution: CONFIG.map.attribution.clone(),
                max_zoom: CONFIG.map.max_zoom,
                timeout: Duration::from_secs(CONFIG.geocoder.timeout_seconds),
            },
            CONFIG.map.max_tiles,
        );

        Ok(Self {
            tile_cache,
            map,
            search,
            shortcuts,
            stats: Stats::new(),
        })
    }

    /// Works everything that happened since the last frame.
    pub fn update(&mut self) {
        self.search
            .update(&mut FlyTo::new(&mut self.map, CONFIG.map.fly_to_zoom));
        self.map.advance(self.stats.get_last_delta());
        self.load_tiles();
    }

    pub fn load_tiles(&mut self) {
        let tile_field = self.map.visible_tiles();

        self.tile_cache.finalize_loaded_tiles();
        for tile_id in tile_field.iter() {
            self.tile_cache.request_tile(&tile_id);
        }
        self.tile_cache.evict(&tile_field);
    }
}

#[test]
fn starts_over_the_configured_center() {
    let app_state = AppState::new(1600.0, 1000.0).unwrap();

    let center = app_state.map.center().unwrap();
    assert!((center.lat() - CONFIG.map.initial_latitude).abs() < 1e-9);
    assert!((center.lng() - CONFIG.map.initial_longitude).abs() < 1e-9);
    assert_eq!(app_state.map.zoom(), CONFIG.map.initial_zoom as f64);
    assert!(!app_state.map.is_flying());
    assert!(!app_state.search.state().is_shown());
    assert_eq!(app_state.search.state().resolved_position, None);
}
