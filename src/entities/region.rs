use geo_types::Rect;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinates,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRect {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl MapRect {
    pub fn degenerate(at: Coordinates) -> Self {
        Self {
            south_west: at,
            north_east: at,
        }
    }
}

impl From<Rect<f64>> for MapRect {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            south_west: rect.min().into(),
            north_east: rect.max().into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgePadding {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgePadding {
    pub fn uniform(inset: f64) -> Self {
        Self {
            top: inset,
            left: inset,
            bottom: inset,
            right: inset,
        }
    }
}

#[test]
fn map_rect_from_geo_rect() {
    use geo_types::coord;

    let rect = Rect::new(coord! { x: -122.0, y: 37.5 }, coord! { x: -121.0, y: 37.0 });
    let map_rect: MapRect = rect.into();

    assert_eq!(map_rect.south_west, Coordinates::new(37.0, -122.0));
    assert_eq!(map_rect.north_east, Coordinates::new(37.5, -121.0));
}
