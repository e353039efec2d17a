#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct TileId {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this tile's zoom level.
    pub fn tiles_per_axis(&self) -> u32 {
        1 << self.z
    }

    pub fn is_valid(&self) -> bool {
        self.x < self.tiles_per_axis() && self.y < self.tiles_per_axis()
    }
}

impl From<TileCoordinate> for TileId {
    fn from(value: TileCoordinate) -> Self {
        let max = ((1u64 << value.z) - 1) as f64;
        Self {
            z: value.z,
            x: value.x.max(0.0).min(max) as u32,
            y: value.y.max(0.0).min(max) as u32,
        }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileCoordinate {
    pub z: u32,
    pub x: f64,
    pub y: f64,
}

impl TileCoordinate {
    pub fn new(z: u32, x: f64, y: f64) -> Self {
        Self { z, x, y }
    }
}

#[test]
fn tile_coordinates_outside_the_world_are_clamped() {
    let tile_id: TileId = TileCoordinate::new(2, -1.5, 7.2).into();
    assert_eq!(tile_id, TileId::new(2, 0, 3));
    assert!(tile_id.is_valid());
}
