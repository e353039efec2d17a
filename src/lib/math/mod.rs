mod screen;
mod tile_field;
mod tile_id;

use crate::Position;
use glm::DVec2;
use std::f64::consts::PI;

pub use screen::*;
pub use tile_field::*;
pub use tile_id::*;

/// The latitude at which the Web Mercator projection is cut off.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

fn deg2rad(deg: f64) -> f64 {
    2.0 * PI * deg / 360.0
}

fn rad2deg(rad: f64) -> f64 {
    360.0 * rad / (2.0 * PI)
}

/// Latitude is clamped to the Mercator limit, longitude wraps around into `[-180, 180)`.
pub fn deg2num(position: &Position, zoom: u32) -> TileCoordinate {
    let lat_rad = deg2rad(position.lat().max(-MAX_LATITUDE).min(MAX_LATITUDE));
    let n = 2f64.powi(zoom as i32);
    let xtile = (position.lng() + 180.0).rem_euclid(360.0) / 360.0 * n;
    let ytile = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    TileCoordinate::new(zoom, xtile, ytile)
}

/// Returns `(latitude, longitude)` of a tile space coordinate.
pub fn num2deg(coordinate: &TileCoordinate) -> (f64, f64) {
    let n = 2f64.powi(coordinate.z as i32);
    let lng = coordinate.x / n * 360.0 - 180.0;
    let lat = rad2deg((PI * (1.0 - 2.0 * coordinate.y / n)).sinh().atan());
    (lat, lng)
}

pub fn num_to_global_space(coordinate: &TileCoordinate) -> DVec2 {
    glm::vec2(coordinate.x, coordinate.y) / 2f64.powi(coordinate.z as i32)
}

pub fn global_to_num_space(point: &DVec2, z: u32) -> TileCoordinate {
    let p = point * 2f64.powi(z as i32);
    TileCoordinate::new(z, p.x, p.y)
}

/// Projects a position into global space, where the whole world spans `[0, 1]` on both axes.
pub fn position_to_global_space(position: &Position) -> DVec2 {
    num_to_global_space(&deg2num(position, 0))
}

pub fn global_space_to_position(point: &DVec2) -> Option<Position> {
    let (lat, lng) = num2deg(&global_to_num_space(point, 0));
    Position::new(lat, lng).ok()
}

#[test]
fn zurich_lies_in_the_expected_tile() {
    let zurich = Position::new(47.3769, 8.5417).unwrap();
    let tile_id: TileId = deg2num(&zurich, 8).into();
    assert_eq!(tile_id, TileId::new(8, 134, 89));
}

#[test]
fn global_space_projection_is_reversible() {
    let taichung = Position::new(24.137396608878987, 120.68692065044608).unwrap();
    let global = position_to_global_space(&taichung);
    let back = global_space_to_position(&global).unwrap();
    assert!((back.lat() - taichung.lat()).abs() < 1e-9);
    assert!((back.lng() - taichung.lng()).abs() < 1e-9);
}

#[test]
fn latitudes_beyond_the_projection_are_clamped() {
    let pole = Position::new(90.0, 0.0).unwrap();
    let global = position_to_global_space(&pole);
    assert!(global.y.abs() < 1e-9);
}

#[test]
fn longitude_wraps_around_the_world() {
    let east = Position::new(10.0, 200.0).unwrap();
    let west = Position::new(10.0, -160.0).unwrap();
    assert!(glm::distance(&position_to_global_space(&east), &position_to_global_space(&west)) < 1e-12);

    let back = global_space_to_position(&position_to_global_space(&east)).unwrap();
    assert!((back.lng() + 160.0).abs() < 1e-9);
}
