use crate::*;
use glm::DVec2;

/// The part of the world the map is looking at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Center of the view in global space.
    pub center: DVec2,
    pub zoom: f64,
}

impl Camera {
    pub fn new(center: DVec2, zoom: f64) -> Self {
        Self { center, zoom }
    }

    pub fn looking_at(position: &Position, zoom: f64) -> Self {
        Self::new(position_to_global_space(position), zoom)
    }

    pub fn position(&self) -> Option<Position> {
        global_space_to_position(&self.center)
    }

    pub(crate) fn clamp(&mut self, min_zoom: f64, max_zoom: f64) {
        self.center.x = self.center.x.max(0.0).min(1.0);
        self.center.y = self.center.y.max(0.0).min(1.0);
        self.zoom = self.zoom.max(min_zoom).min(max_zoom);
    }
}
