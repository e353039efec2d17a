use super::*;

/// The drawable area the map is rendered into, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
    tile_size: u32,
}

impl Screen {
    pub fn new(width: f64, height: f64, tile_size: u32) -> Self {
        Self {
            width,
            height,
            tile_size,
        }
    }

    /// Edge length of the whole world in pixels at zoom level `z`.
    pub fn world_size(&self, z: f64) -> f64 {
        self.tile_size as f64 * 2f64.powf(z)
    }

    pub fn get_tile_boundaries_for_zoom_level(&self, center: &DVec2, z: f64, max_z: u32) -> TileField {
        let tile_z = (z.round().max(0.0) as u32).min(max_z);
        let half_extent = glm::vec2(self.width / 2.0, self.height / 2.0) / self.world_size(z);

        let top_left: TileId = global_to_num_space(&(center - half_extent), tile_z).into();
        let bottom_right: TileId = global_to_num_space(&(center + half_extent), tile_z).into();
        TileField::new(top_left, bottom_right)
    }

    /// Returns the top left corner and the edge length of a tile in screen pixels.
    pub fn tile_to_screen_space(&self, center: &DVec2, z: f64, tile_id: &TileId) -> (DVec2, f64) {
        let origin = num_to_global_space(&(*tile_id).into());
        let size = self.world_size(z) / tile_id.tiles_per_axis() as f64;
        (self.global_to_screen(center, z, &origin), size)
    }

    pub fn global_to_screen(&self, center: &DVec2, z: f64, point: &DVec2) -> DVec2 {
        (point - center) * self.world_size(z) + glm::vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn screen_to_global(&self, center: &DVec2, z: f64, pixel: &DVec2) -> DVec2 {
        (pixel - glm::vec2(self.width / 2.0, self.height / 2.0)) / self.world_size(z) + center
    }
}

#[test]
fn get_tile_boundaries_for_8_zoom() {
    let screen = Screen::new(800.0, 800.0, 256);
    let zurich = Position::new(47.3769, 8.5417).unwrap();
    let center = position_to_global_space(&zurich);
    let tile_field = screen.get_tile_boundaries_for_zoom_level(&center, 8.0, 19);

    assert!(tile_field.contains(&deg2num(&zurich, 8).into()));
    assert!(tile_field.len() >= 9 && tile_field.len() <= 16);
}

#[test]
fn tile_boundaries_stop_at_the_edge_of_the_world() {
    let screen = Screen::new(4096.0, 4096.0, 256);
    let tile_field = screen.get_tile_boundaries_for_zoom_level(&glm::vec2(0.5, 0.5), 1.0, 19);

    assert_eq!(tile_field, TileField::new(TileId::new(1, 0, 0), TileId::new(1, 1, 1)));
}

#[test]
fn screen_space_is_the_inverse_of_global_space() {
    let screen = Screen::new(1600.0, 1000.0, 256);
    let center = glm::vec2(0.7, 0.4);
    let pixel = glm::vec2(12.0, 987.0);
    let global = screen.screen_to_global(&center, 9.3, &pixel);
    let back = screen.global_to_screen(&center, 9.3, &global);
    assert!((back - pixel).norm() < 1e-6);
}

#[test]
fn the_center_tile_is_drawn_around_the_screen_center() {
    let screen = Screen::new(256.0, 256.0, 256);
    let (origin, size) = screen.tile_to_screen_space(&glm::vec2(0.5, 0.5), 0.0, &TileId::new(0, 0, 0));
    assert!((origin - glm::vec2(0.0, 0.0)).norm() < 1e-9);
    assert!((size - 256.0).abs() < 1e-9);
}
