use crate::*;

/// Gets told about every newly resolved position.
pub trait PositionObserver {
    fn position_changed(&mut self, position: &Position);
}

/// Flies a map surface to every position it is told about.
pub struct FlyTo<'a, S: MapSurface + ?Sized> {
    surface: &'a mut S,
    zoom: u32,
}

impl<'a, S: MapSurface + ?Sized> FlyTo<'a, S> {
    pub fn new(surface: &'a mut S, zoom: u32) -> Self {
        Self { surface, zoom }
    }
}

impl<'a, S: MapSurface + ?Sized> PositionObserver for FlyTo<'a, S> {
    fn position_changed(&mut self, position: &Position) {
        self.surface.fly_to(*position, self.zoom);
    }
}
