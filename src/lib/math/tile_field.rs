use super::*;

impl From<TileId> for TileCoordinate {
    fn from(value: TileId) -> Self {
        Self {
            z: value.z,
            x: value.x as f64,
            y: value.y as f64,
        }
    }
}

/// An inclusive rectangle of tiles on a single zoom level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TileField {
    pub topleft: TileId,
    pub bottomright: TileId,
}

impl TileField {
    pub fn new(topleft: TileId, bottomright: TileId) -> Self {
        Self {
            topleft,
            bottomright,
        }
    }

    pub fn iter(&self) -> TileIterator {
        TileIterator {
            tile_field: self,
            x: self.topleft.x,
            y: self.topleft.y,
        }
    }

    pub fn contains(&self, tile_id: &TileId) -> bool {
        tile_id.z == self.topleft.z
            && (self.topleft.x..=self.bottomright.x).contains(&tile_id.x)
            && (self.topleft.y..=self.bottomright.y).contains(&tile_id.y)
    }

    /// Whether `tile_id`, on this field's zoom level or above, covers any tile of the field.
    pub fn overlaps(&self, tile_id: &TileId) -> bool {
        if tile_id.z > self.topleft.z || self.is_empty() {
            return false;
        }
        let d = self.topleft.z - tile_id.z;
        let (x_min, x_max) = (tile_id.x << d, ((tile_id.x + 1) << d) - 1);
        let (y_min, y_max) = (tile_id.y << d, ((tile_id.y + 1) << d) - 1);
        x_min <= self.bottomright.x
            && x_max >= self.topleft.x
            && y_min <= self.bottomright.y
            && y_max >= self.topleft.y
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let columns = (self.bottomright.x - self.topleft.x + 1) as usize;
        let rows = (self.bottomright.y - self.topleft.y + 1) as usize;
        columns * rows
    }

    pub fn is_empty(&self) -> bool {
        self.topleft.x > self.bottomright.x || self.topleft.y > self.bottomright.y
    }
}

pub struct TileIterator<'a> {
    tile_field: &'a TileField,
    x: u32,
    y: u32,
}

impl<'a> Iterator for TileIterator<'a> {
    type Item = TileId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.tile_field.is_empty() || self.y > self.tile_field.bottomright.y {
            return None;
        }
        let tile_id = TileId::new(self.tile_field.topleft.z, self.x, self.y);
        if self.x < self.tile_field.bottomright.x {
            self.x += 1;
        } else {
            self.x = self.tile_field.topleft.x;
            self.y += 1;
        }
        Some(tile_id)
    }
}

#[test]
fn iterates_rows_left_to_right() {
    let field = TileField::new(TileId::new(3, 1, 2), TileId::new(3, 2, 3));
    let tiles = field.iter().collect::<Vec<_>>();
    assert_eq!(
        tiles,
        vec![
            TileId::new(3, 1, 2),
            TileId::new(3, 2, 2),
            TileId::new(3, 1, 3),
            TileId::new(3, 2, 3),
        ]
    );
    assert_eq!(field.len(), 4);
    assert!(field.contains(&TileId::new(3, 2, 3)));
    assert!(!field.contains(&TileId::new(4, 2, 3)));
}

#[test]
fn coarser_tiles_overlap_the_field_they_cover() {
    let field = TileField::new(TileId::new(4, 4, 4), TileId::new(4, 5, 5));
    assert!(field.overlaps(&TileId::new(4, 5, 5)));
    assert!(field.overlaps(&TileId::new(3, 2, 2)));
    assert!(field.overlaps(&TileId::new(0, 0, 0)));
    assert!(!field.overlaps(&TileId::new(3, 3, 2)));
    assert!(!field.overlaps(&TileId::new(5, 8, 8)));
}
