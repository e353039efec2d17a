use crate::Position;

/// Something that shows a map and can be told where to look.
pub trait MapSurface {
    /// Jumps to `center` at `zoom` without animation.
    fn initialize(&mut self, center: Position, zoom: u32);

    /// Starts an animated transition to `target` at `zoom` and returns immediately.
    fn fly_to(&mut self, target: Position, zoom: u32);
}
