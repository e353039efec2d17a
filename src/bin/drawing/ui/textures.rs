use std::collections::HashMap;

use waypoint::*;

/// GPU copies of the raster tiles currently drawn.
pub struct TileTextures {
    textures: HashMap<TileId, egui::TextureHandle>,
}

impl TileTextures {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    pub fn get(&mut self, ctx: &egui::Context, tile: &RasterTile) -> &egui::TextureHandle {
        self.textures.entry(tile.tile_id).or_insert_with(|| {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [tile.width as usize, tile.height as usize],
                &tile.rgba,
            );
            ctx.load_texture(
                format!("tile {}", tile.tile_id),
                image,
                egui::TextureFilter::Linear,
            )
        })
    }

    /// Frees the textures of all tiles which cover nothing of `keep`.
    pub fn retain(&mut self, keep: &TileField) {
        self.textures.retain(|tile_id, _| keep.overlaps(tile_id));
    }
}
