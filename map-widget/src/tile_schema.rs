//! [`TileSchema`] converts zoom levels into resolutions and calculates [tile indices](TileIndex)
//! visible in a [`MapView`].

use std::collections::BTreeSet;

use map_widget_types::cartesian::{Point2d, Rect};
use crate::view::MapView;

const RESOLUTION_TOLERANCE: f64 = 0.01;

/// Resolution of the zero zoom level of the standard web schema (meters per pixel).
pub const WEB_TOP_RESOLUTION: f64 = 156543.03392800014;

/// Highest zoom level a web schema can have. Tile indices of deeper levels do not fit into `i32`.
pub const MAX_Z_LEVEL: u32 = 30;

/// Level of detail: a zoom level together with its resolution.
#[derive(Debug, Clone, Copy)]
pub struct Lod {
    resolution: f64,
    z_index: u32,
}

impl Lod {
    /// Creates new level of detail. Returns `None` for zero or non-finite resolution.
    pub fn new(resolution: f64, z_index: u32) -> Option<Lod> {
        if resolution.is_finite() && resolution != 0.0 {
            Some(Self {
                resolution,
                z_index,
            })
        } else {
            None
        }
    }

    /// Zoom level.
    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Map units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}

impl PartialEq for Lod {
    fn eq(&self, other: &Self) -> bool {
        self.resolution == other.resolution
    }
}

impl Eq for Lod {}

impl PartialOrd for Lod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Lod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.resolution
            .partial_cmp(&other.resolution)
            .unwrap_or_else(|| self.z_index.cmp(&other.z_index))
    }
}

/// Tile index.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    /// Z index.
    pub z: u32,
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Tile schema with tiles numbered from the top left corner of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSchema {
    origin: Point2d,
    bounds: Rect,
    lods: BTreeSet<Lod>,
    tile_size: u32,
}

impl TileSchema {
    /// Standard Web Mercator schema (used by OSM and most other tile services) with zoom levels
    /// `0..=max_zoom`. Levels above [`MAX_Z_LEVEL`] are not included.
    pub fn web(max_zoom: u32) -> Self {
        const HALF_EXTENT: f64 = 20037508.342787;

        let mut lods = BTreeSet::new();
        let mut resolution = WEB_TOP_RESOLUTION;
        for z in 0..=max_zoom.min(MAX_Z_LEVEL) {
            if let Some(lod) = Lod::new(resolution, z) {
                lods.insert(lod);
            }
            resolution /= 2.0;
        }

        Self {
            origin: Point2d::new(-HALF_EXTENT, HALF_EXTENT),
            bounds: Rect::new(-HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT, HALF_EXTENT),
            lods,
            tile_size: 256,
        }
    }

    /// Resolution of the given zoom level, if the schema has it.
    pub fn lod_resolution(&self, z: u32) -> Option<f64> {
        self.lods
            .iter()
            .find(|lod| lod.z_index() == z)
            .map(Lod::resolution)
    }

    /// Highest zoom level of the schema.
    pub fn max_z(&self) -> u32 {
        self.lods.iter().map(Lod::z_index).max().unwrap_or_default()
    }

    /// Width and height of a tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Select the level of detail best matching the given resolution.
    pub fn select_lod(&self, resolution: f64) -> Option<Lod> {
        if !resolution.is_finite() {
            return None;
        }

        // Lods are sorted from the finest to the coarsest resolution.
        let mut selected = self.lods.iter().next()?;
        for lod in self.lods.iter().skip(1) {
            if lod.resolution() * (1.0 - RESOLUTION_TOLERANCE) > resolution {
                break;
            }
            selected = lod;
        }

        Some(*selected)
    }

    /// Tile indices covering the visible area of the view, row by row from the top left corner.
    ///
    /// Returns `None` if the view has no visible area.
    pub fn iter_tiles(&self, view: &MapView) -> Option<impl Iterator<Item = TileIndex>> {
        let lod = self.select_lod(view.resolution())?;
        let bbox = view.get_bbox()?.intersect(&self.bounds)?;

        let tile_span = lod.resolution() * self.tile_size as f64;
        let max_index = 1i32
            .checked_shl(lod.z_index())
            .filter(|count| *count > 0)
            .map_or(i32::MAX, |count| count - 1);
        let first = |v: f64| ((v / tile_span).floor() as i32).clamp(0, max_index);
        let last = |v: f64| ((v / tile_span).ceil() as i32 - 1).clamp(0, max_index);

        let x_min = first(bbox.x_min() - self.origin.x);
        let x_max = last(bbox.x_max() - self.origin.x);
        let y_min = first(self.origin.y - bbox.y_max());
        let y_max = last(self.origin.y - bbox.y_min());

        let z = lod.z_index();
        Some((y_min..=y_max).flat_map(move |y| (x_min..=x_max).map(move |x| TileIndex { x, y, z })))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use map_widget_types::cartesian::Size;

    use super::*;

    #[test]
    fn lod_comparison() {
        assert_eq!(Lod::new(1.0, 1), Lod::new(1.0, 1));
        assert_eq!(Lod::new(1.0, 1), Lod::new(1.0, 2));
        assert!(Lod::new(2.0, 1) > Lod::new(1.0, 1));
        assert!(Lod::new(2.0, 1) < Lod::new(4.0, 1));
    }

    #[test]
    fn invalid_lod_creation() {
        assert!(Lod::new(0.0, 1).is_none());
        assert!(Lod::new(f64::NAN, 1).is_none());
        assert!(Lod::new(f64::INFINITY, 1).is_none());
    }

    #[test]
    fn web_schema_resolutions() {
        let schema = TileSchema::web(18);
        assert_eq!(schema.max_z(), 18);
        assert_relative_eq!(
            schema.lod_resolution(0).expect("level exists"),
            WEB_TOP_RESOLUTION
        );
        assert_relative_eq!(
            schema.lod_resolution(13).expect("level exists"),
            WEB_TOP_RESOLUTION / 8192.0
        );
        assert!(schema.lod_resolution(19).is_none());
    }

    #[test]
    fn select_lod() {
        let schema = TileSchema::web(18);
        let lod = schema
            .select_lod(WEB_TOP_RESOLUTION / 1024.0)
            .expect("lod selected");
        assert_eq!(lod.z_index(), 10);

        let lod = schema
            .select_lod(WEB_TOP_RESOLUTION / 1500.0)
            .expect("lod selected");
        assert_eq!(lod.z_index(), 11);

        assert!(schema.select_lod(f64::NAN).is_none());
    }

    #[test]
    fn whole_world_at_zero_level() {
        let schema = TileSchema::web(18);
        let view = MapView::new(Point2d::new(0.0, 0.0), WEB_TOP_RESOLUTION)
            .with_size(Size::new(256.0, 256.0));
        let tiles: Vec<_> = schema.iter_tiles(&view).expect("visible").collect();
        assert_eq!(tiles, vec![TileIndex::new(0, 0, 0)]);
    }

    #[test]
    fn four_tiles_around_center() {
        let schema = TileSchema::web(18);
        let resolution = schema.lod_resolution(1).expect("level exists");
        let view = MapView::new(Point2d::new(0.0, 0.0), resolution).with_size(Size::new(100.0, 100.0));
        let tiles: Vec<_> = schema.iter_tiles(&view).expect("visible").collect();
        assert_eq!(
            tiles,
            vec![
                TileIndex::new(0, 0, 1),
                TileIndex::new(1, 0, 1),
                TileIndex::new(0, 1, 1),
                TileIndex::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn deep_levels_are_capped() {
        let schema = TileSchema::web(70);
        assert_eq!(schema.max_z(), MAX_Z_LEVEL);
        assert!(schema.lod_resolution(MAX_Z_LEVEL + 1).is_none());

        let resolution = schema.lod_resolution(MAX_Z_LEVEL).expect("level exists");
        let view = MapView::new(Point2d::new(1000.0, 1000.0), resolution)
            .with_size(Size::new(512.0, 512.0));
        let tiles: Vec<_> = schema.iter_tiles(&view).expect("visible").collect();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|tile| tile.z == MAX_Z_LEVEL && tile.x >= 0 && tile.y >= 0));
    }

    #[test]
    fn no_tiles_for_empty_view() {
        let schema = TileSchema::web(18);
        let view = MapView::new(Point2d::new(0.0, 0.0), 1.0);
        assert!(schema.iter_tiles(&view).is_none());
    }
}
