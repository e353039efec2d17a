use super::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{spawn, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("could not decode tile image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded raster tile in RGBA8.
pub struct RasterTile {
    pub tile_id: TileId,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterTile {
    pub fn decode(tile_id: TileId, data: &[u8]) -> Result<Self, TileError> {
        let image = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            tile_id,
            width,
            height,
            rgba: image.into_raw(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cached_tiles: usize,
    pub loading_tiles: usize,
    pub failed_tiles: usize,
}

/// A cache structure to hold all loaded `RasterTile`s.
pub struct TileCache {
    cache: HashMap<TileId, Arc<RasterTile>>,
    failed: HashSet<TileId>,
    loaders: Vec<(u64, JoinHandle<Option<RasterTile>>, TileId)>,
    channel: (Sender<u64>, Receiver<u64>),
    cache_location: PathBuf,
    source: Arc<TileSource>,
    max_tiles: usize,
    id: u64,
}

impl TileCache {
    /// Create a new `TileCache`.
    pub fn new(cache_location: impl Into<PathBuf>, source: TileSource, max_tiles: usize) -> Self {
        Self {
            cache: HashMap::new(),
            failed: HashSet::new(),
            loaders: vec![],
            channel: unbounded(),
            cache_location: cache_location.into(),
            source: Arc::new(source),
            max_tiles,
            id: 0,
        }
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }

    /// Check loaders for loaded tiles and insert them if there is any.
    pub fn finalize_loaded_tiles(&mut self) {
        // Get all pending messages and work them.
        for id in self.channel.1.try_iter() {
            let potential_loader = self.loaders.iter().position(|l| l.0 == id);

            if let Some(i) = potential_loader {
                let loader = self.loaders.remove(i);
                match loader.1.join() {
                    Ok(Some(tile)) => {
                        self.cache.insert(loader.2, Arc::new(tile));
                    }
                    Ok(None) => {
                        self.failed.insert(loader.2);
                    }
                    Err(e) => {
                        log::error!(
                            "Failed to join tile loader thread for {}. Reason:\r\n{:?}",
                            loader.2,
                            e
                        );
                        self.failed.insert(loader.2);
                    }
                }
            }
        }
    }

    /// Request a tile from the cache.
    ///
    /// Tiles which failed to load once are not requested again.
    pub fn request_tile(&mut self, tile_id: &TileId) {
        if self.cache.contains_key(tile_id)
            || self.failed.contains(tile_id)
            || self.loaders.iter().any(|l| l.2 == *tile_id)
        {
            return;
        }

        let id = self.id;
        self.id += 1;

        // Clone values to be moved into the thread.
        let tile_id_clone = *tile_id;
        let tx = self.channel.0.clone();
        let source = self.source.clone();
        let cache_location = self.cache_location.clone();

        self.loaders.push((
            id,
            spawn(move || {
                let tile = fetch_tile_data(cache_location, &source, &tile_id_clone).and_then(
                    |data| match RasterTile::decode(tile_id_clone, &data) {
                        Ok(tile) => Some(tile),
                        Err(e) => {
                            log::error!(
                                "Unable to decode tile {}. Reason:\r\n{}",
                                tile_id_clone,
                                e
                            );
                            None
                        }
                    },
                );
                if tx.send(id).is_err() {
                    log::debug!("Could not send the tile load message. This most likely happened because the app was terminated.")
                }
                tile
            }),
            *tile_id,
        ));
    }

    /// Get a `RasterTile` from the `TileCache`.
    ///
    /// Returns `None` if the tile is not in the cache.
    /// The user has to request the loading of the tile on their own.
    pub fn try_get_tile(&self, tile_id: &TileId) -> Option<Arc<RasterTile>> {
        self.cache.get(tile_id).cloned()
    }

    /// Finds a loaded tile covering `tile_id`, looking up to `max_levels` zoom levels up.
    ///
    /// Returns the tile and the part of it showing `tile_id` as `[min_u, min_v, max_u, max_v]`.
    pub fn try_get_cover(&self, tile_id: &TileId, max_levels: u32) -> Option<(Arc<RasterTile>, [f64; 4])> {
        for level in 0..=max_levels.min(tile_id.z) {
            let ancestor = TileId::new(tile_id.z - level, tile_id.x >> level, tile_id.y >> level);
            if let Some(tile) = self.try_get_tile(&ancestor) {
                let n = (1u32 << level) as f64;
                let u = (tile_id.x - (ancestor.x << level)) as f64 / n;
                let v = (tile_id.y - (ancestor.y << level)) as f64 / n;
                return Some((tile, [u, v, u + 1.0 / n, v + 1.0 / n]));
            }
        }
        None
    }

    /// Drops tiles which cover nothing of `keep` once the cache holds more than its limit.
    pub fn evict(&mut self, keep: &TileField) {
        if self.cache.len() > self.max_tiles {
            self.cache.retain(|tile_id, _| keep.overlaps(tile_id));
        }
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            cached_tiles: self.cache.len(),
            loading_tiles: self.loaders.len(),
            failed_tiles: self.failed.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([170, 211, 223, 255]));
        let mut data = vec![];
        image::DynamicImage::ImageRgba8(image)
            .write_to(
                &mut std::io::Cursor::new(&mut data),
                image::ImageOutputFormat::Png,
            )
            .unwrap();
        data
    }

    fn offline_source() -> TileSource {
        TileSource {
            url_template: "http://127.0.0.1:9/{z}/{x}/{y}.png".to_string(),
            user_agent: "waypoint-test".to_string(),
            attribution: String::new(),
            max_zoom: 19,
            timeout: Duration::from_millis(50),
        }
    }

    fn wait_for_loaders(cache: &mut TileCache) {
        let start = Instant::now();
        while cache.get_stats().loading_tiles > 0 && start.elapsed() < Duration::from_secs(10) {
            std::thread::sleep(Duration::from_millis(5));
            cache.finalize_loaded_tiles();
        }
    }

    fn blank(tile_id: TileId) -> Arc<RasterTile> {
        Arc::new(RasterTile {
            tile_id,
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        })
    }

    #[test]
    fn coarser_tiles_stand_in_for_missing_ones() {
        let mut cache = TileCache::new(std::env::temp_dir(), offline_source(), 16);
        cache.cache.insert(TileId::new(2, 1, 1), blank(TileId::new(2, 1, 1)));

        let (tile, uv) = cache.try_get_cover(&TileId::new(4, 7, 5), 2).unwrap();
        assert_eq!(tile.tile_id, TileId::new(2, 1, 1));
        assert_eq!(uv, [0.75, 0.25, 1.0, 0.5]);

        assert!(cache.try_get_cover(&TileId::new(4, 7, 5), 1).is_none());
        assert!(cache.try_get_cover(&TileId::new(4, 0, 0), 2).is_none());
    }

    #[test]
    fn eviction_keeps_what_is_in_view() {
        let mut cache = TileCache::new(std::env::temp_dir(), offline_source(), 2);
        for tile_id in &[TileId::new(3, 0, 0), TileId::new(2, 0, 0), TileId::new(3, 7, 7)] {
            cache.cache.insert(*tile_id, blank(*tile_id));
        }

        cache.evict(&TileField::new(TileId::new(3, 0, 0), TileId::new(3, 1, 1)));

        assert!(cache.try_get_tile(&TileId::new(3, 0, 0)).is_some());
        assert!(cache.try_get_tile(&TileId::new(2, 0, 0)).is_some());
        assert!(cache.try_get_tile(&TileId::new(3, 7, 7)).is_none());
    }

    #[test]
    fn decodes_png_tiles() {
        let tile = RasterTile::decode(TileId::new(0, 0, 0), &png_bytes()).unwrap();
        assert_eq!((tile.width, tile.height), (2, 2));
        assert_eq!(&tile.rgba[..4], &[170, 211, 223, 255]);
    }

    #[test]
    fn garbage_is_not_a_tile() {
        assert!(RasterTile::decode(TileId::new(0, 0, 0), b"garbage").is_err());
    }

    #[test]
    fn loads_tiles_from_the_disk_cache() {
        let root = std::env::temp_dir().join("waypoint-cache-test");
        let tile_id = TileId::new(5, 6, 7);
        std::fs::create_dir_all(root.join("cache/5/6")).unwrap();
        std::fs::write(root.join("cache/5/6/7.png"), png_bytes()).unwrap();

        let mut cache = TileCache::new(&root, offline_source(), 16);
        cache.request_tile(&tile_id);
        wait_for_loaders(&mut cache);

        let tile = cache.try_get_tile(&tile_id).unwrap();
        assert_eq!(tile.tile_id, tile_id);
    }

    #[test]
    fn failed_tiles_are_not_requested_again() {
        let root = std::env::temp_dir().join("waypoint-cache-test-failed");
        let tile_id = TileId::new(5, 1, 1);
        std::fs::create_dir_all(root.join("cache/5/1")).unwrap();
        std::fs::write(root.join("cache/5/1/1.png"), b"garbage").unwrap();

        let mut cache = TileCache::new(&root, offline_source(), 16);
        cache.request_tile(&tile_id);
        wait_for_loaders(&mut cache);
        cache.request_tile(&tile_id);

        assert!(cache.try_get_tile(&tile_id).is_none());
        assert_eq!(cache.get_stats().loading_tiles, 0);
        assert_eq!(cache.get_stats().failed_tiles, 1);
    }
}
