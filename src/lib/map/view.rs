use crate::*;
use glm::DVec2;

/// A headless slippy map: the camera, the screen it is shown on and a possibly running flight.
pub struct MapView {
    camera: Camera,
    screen: Screen,
    max_zoom: u32,
    speed: f64,
    flight: Option<(Flight, f64)>,
}

impl MapView {
    pub fn new(screen: Screen, max_zoom: u32, speed: f64) -> Self {
        Self {
            camera: Camera::new(glm::vec2(0.5, 0.5), 0.0),
            screen,
            max_zoom,
            speed,
            flight: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn center(&self) -> Option<Position> {
        self.camera.position()
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.screen.width = width;
        self.screen.height = height;
    }

    /// Moves a running flight `dt` seconds ahead.
    pub fn advance(&mut self, dt: f64) {
        if let Some((flight, elapsed)) = &mut self.flight {
            *elapsed += dt;
            self.camera = flight.sample(*elapsed);
            if *elapsed >= flight.duration() {
                log::debug!("Arrived at {:?} on zoom {:.2}.", self.camera.position(), self.camera.zoom);
                self.flight = None;
            }
        }
    }

    /// Drags the map by a distance in pixels. Cancels a running flight.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.flight = None;
        self.camera.center -= glm::vec2(dx, dy) / self.screen.world_size(self.camera.zoom);
        self.clamp();
    }

    /// Zooms by `delta` levels keeping the world point under `anchor` in place.
    /// Cancels a running flight.
    pub fn zoom_by(&mut self, delta: f64, anchor: Option<DVec2>) {
        self.flight = None;
        let anchor = anchor.unwrap_or_else(|| glm::vec2(self.screen.width / 2.0, self.screen.height / 2.0));
        let fixed = self
            .screen
            .screen_to_global(&self.camera.center, self.camera.zoom, &anchor);

        self.camera.zoom += delta;
        self.clamp();

        let drifted = self
            .screen
            .screen_to_global(&self.camera.center, self.camera.zoom, &anchor);
        self.camera.center += fixed - drifted;
        self.clamp();
    }

    pub fn visible_tiles(&self) -> TileField {
        self.screen
            .get_tile_boundaries_for_zoom_level(&self.camera.center, self.camera.zoom, self.max_zoom)
    }

    /// Top left corner and edge length of a tile in screen pixels.
    pub fn tile_rect(&self, tile_id: &TileId) -> (DVec2, f64) {
        self.screen
            .tile_to_screen_space(&self.camera.center, self.camera.zoom, tile_id)
    }

    fn clamp(&mut self) {
        self.camera.clamp(0.0, self.max_zoom as f64);
    }
}

impl MapSurface for MapView {
    fn initialize(&mut self, center: Position, zoom: u32) {
        self.flight = None;
        self.camera = Camera::looking_at(&center, zoom as f64);
        self.clamp();
    }

    fn fly_to(&mut self, target: Position, zoom: u32) {
        let mut to = Camera::looking_at(&target, zoom as f64);
        to.clamp(0.0, self.max_zoom as f64);
        log::info!("Flying to {} on zoom {}.", target, to.zoom);
        self.flight = Some((Flight::new(self.camera, to, &self.screen, self.speed), 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        let mut view = MapView::new(Screen::new(1600.0, 1000.0, 256), 19, 0.8);
        view.initialize(
            Position::new(24.137396608878987, 120.68692065044608).unwrap(),
            8,
        );
        view
    }

    #[test]
    fn initializes_without_animation() {
        let view = view();
        let center = view.center().unwrap();
        assert!((center.lat() - 24.137396608878987).abs() < 1e-9);
        assert!((center.lng() - 120.68692065044608).abs() < 1e-9);
        assert_eq!(view.zoom(), 8.0);
        assert!(!view.is_flying());
    }

    #[test]
    fn flies_until_the_target_is_reached() {
        let mut view = view();
        let target = Position::new(25.0330, 121.5654).unwrap();
        view.fly_to(target, 15);
        assert!(view.is_flying());

        for _ in 0..10_000 {
            if !view.is_flying() {
                break;
            }
            view.advance(1.0 / 60.0);
        }

        assert!(!view.is_flying());
        assert_eq!(view.zoom(), 15.0);
        let center = view.center().unwrap();
        assert!((center.lat() - 25.0330).abs() < 1e-9);
        assert!((center.lng() - 121.5654).abs() < 1e-9);
    }

    #[test]
    fn a_new_flight_starts_where_the_camera_is() {
        let mut view = view();
        view.fly_to(Position::new(25.0330, 121.5654).unwrap(), 15);
        view.advance(0.5);
        let midway = *view.camera();

        view.fly_to(Position::new(22.6273, 120.3014).unwrap(), 15);
        view.advance(0.0);
        assert!(glm::distance(&view.camera().center, &midway.center) < 1e-12);
        assert!((view.zoom() - midway.zoom).abs() < 1e-9);
    }

    #[test]
    fn flying_past_the_antimeridian_lands_on_the_wrapped_longitude() {
        let mut view = MapView::new(Screen::new(1600.0, 1000.0, 256), 19, 0.8);
        view.initialize(Position::new(0.0, 170.0).unwrap(), 8);
        view.fly_to(Position::new(0.0, 200.0).unwrap(), 15);

        for _ in 0..10_000 {
            if !view.is_flying() {
                break;
            }
            view.advance(1.0 / 60.0);
        }

        assert!(!view.is_flying());
        let center = view.center().unwrap();
        assert!((center.lng() + 160.0).abs() < 1e-9);
        assert!(center.lat().abs() < 1e-9);
    }

    #[test]
    fn dragging_cancels_a_flight() {
        let mut view = view();
        view.fly_to(Position::new(25.0330, 121.5654).unwrap(), 15);
        view.pan_by(10.0, 0.0);
        assert!(!view.is_flying());
    }

    #[test]
    fn dragging_right_moves_the_center_west() {
        let mut view = view();
        let before = view.center().unwrap();
        view.pan_by(100.0, 0.0);
        assert!(view.center().unwrap().lng() < before.lng());
    }

    #[test]
    fn zooming_keeps_the_anchor_in_place() {
        let mut view = view();
        let anchor = glm::vec2(200.0, 300.0);
        let screen = *view.screen();
        let before = screen.screen_to_global(&view.camera().center, view.zoom(), &anchor);

        view.zoom_by(1.5, Some(anchor));

        let after = screen.screen_to_global(&view.camera().center, view.zoom(), &anchor);
        assert_eq!(view.zoom(), 9.5);
        assert!(glm::distance(&before, &after) < 1e-12);
    }

    #[test]
    fn zoom_is_limited() {
        let mut view = view();
        view.zoom_by(100.0, None);
        assert_eq!(view.zoom(), 19.0);
        view.zoom_by(-100.0, None);
        assert_eq!(view.zoom(), 0.0);
    }
}
