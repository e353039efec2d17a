use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

use super::*;

/// Where raster tiles come from.
#[derive(Debug, Clone)]
pub struct TileSource {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    pub user_agent: String,
    pub attribution: String,
    pub max_zoom: u32,
    pub timeout: Duration,
}

impl TileSource {
    pub fn url(&self, tile_id: &TileId) -> String {
        self.url_template
            .replace("{z}", &tile_id.z.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }
}

pub fn fetch_tile_data(
    cache_location: impl AsRef<Path>,
    source: &TileSource,
    tile_id: &TileId,
) -> Option<Vec<u8>> {
    let png = tile_cache_path(&cache_location, tile_id);
    if !png.exists() {
        if let Some(data) = fetch_tile_from_server(source, tile_id) {
            if let Err(e) = ensure_cache_structure(&cache_location, tile_id) {
                log::error!(
                    "Could not create cache directories for {}. Reason:\r\n{}",
                    tile_id,
                    e
                );
                return Some(data);
            }
            match File::create(&png) {
                Ok(mut file) => {
                    use std::io::Write;
                    if let Err(e) = file.write_all(&data[..]) {
                        log::error!("Unable to write png {}. Reason:\r\n{}", png.display(), e);
                    }
                }
                Err(e) => {
                    log::error!("Could not create png {}. Reason:\r\n{}", png.display(), e);
                }
            }
            Some(data)
        } else {
            None
        }
    } else {
        match File::open(&png) {
            Ok(mut f) => {
                let mut buffer = Vec::new();
                match f.read_to_end(&mut buffer) {
                    Ok(_) => Some(buffer),
                    Err(e) => {
                        log::error!("Unable to read {}. Reason:\r\n{}", png.display(), e);
                        None
                    }
                }
            }
            Err(e) => {
                log::error!("Unable to open {}. Reason:\r\n{}", png.display(), e);
                None
            }
        }
    }
}

fn fetch_tile_from_server(source: &TileSource, tile_id: &TileId) -> Option<Vec<u8>> {
    let request_url = source.url(tile_id);
    let response = ureq::get(&request_url)
        .set("User-Agent", &source.user_agent)
        .timeout(source.timeout)
        .call();
    if response.ok() {
        let mut reader = response.into_reader();
        let mut data = vec![];
        match reader.read_to_end(&mut data) {
            Ok(_) => Some(data),
            Err(e) => {
                log::warn!(
                    "Could not read http response for {} to buffer. Reason:\r\n{}",
                    tile_id,
                    e
                );
                None
            }
        }
    } else {
        log::warn!(
            "Http request for {} failed. Reason:\r\n{:?}",
            tile_id,
            response.status_line()
        );
        None
    }
}

fn tile_cache_path(root: impl AsRef<Path>, tile_id: &TileId) -> PathBuf {
    root.as_ref()
        .join(format!("cache/{}/{}/{}.png", tile_id.z, tile_id.x, tile_id.y))
}

fn ensure_cache_structure(root: impl AsRef<Path>, tile_id: &TileId) -> std::io::Result<()> {
    let dir_path = root
        .as_ref()
        .join(&format!("cache/{}/{}/", tile_id.z, tile_id.x));
    std::fs::create_dir_all(dir_path)
}

#[test]
fn test_ensure_cache_structure() {
    let root = std::env::temp_dir().join("waypoint-test");
    ensure_cache_structure(&root, &crate::TileId::new(8, 42, 42)).unwrap();
    let md = std::fs::metadata(root.join("cache/8/42"));
    assert!(md.is_ok());
    assert!(md.unwrap().is_dir());
}

#[test]
fn cached_tiles_are_read_from_disk() {
    let root = std::env::temp_dir().join("waypoint-test-cached");
    let tile_id = crate::TileId::new(3, 4, 5);
    ensure_cache_structure(&root, &tile_id).unwrap();
    std::fs::write(tile_cache_path(&root, &tile_id), b"not really a png").unwrap();

    let source = TileSource {
        url_template: "http://127.0.0.1:9/{z}/{x}/{y}.png".to_string(),
        user_agent: "waypoint-test".to_string(),
        attribution: String::new(),
        max_zoom: 19,
        timeout: Duration::from_millis(10),
    };
    assert_eq!(
        fetch_tile_data(&root, &source, &tile_id),
        Some(b"not really a png".to_vec())
    );
}

#[test]
fn tile_urls_are_expanded() {
    let source = TileSource {
        url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
        user_agent: String::new(),
        attribution: String::new(),
        max_zoom: 19,
        timeout: Duration::from_secs(1),
    };
    assert_eq!(
        source.url(&crate::TileId::new(8, 213, 110)),
        "https://tile.openstreetmap.org/8/213/110.png"
    );
}
