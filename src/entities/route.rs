use geo::BoundingRect;
use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, MapRect};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: Uuid,
    pub name: String,
    /// metres
    pub distance: f64,
    /// seconds
    pub expected_travel_time: f64,
    pub path: Vec<Coordinates>,
}

impl RouteOption {
    pub fn new(
        name: String,
        distance: f64,
        expected_travel_time: f64,
        path: Vec<Coordinates>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            distance,
            expected_travel_time,
            path,
        }
    }

    pub fn start(&self) -> Coordinates {
        self.path.first().copied().unwrap_or_default()
    }

    pub fn end(&self) -> Coordinates {
        self.path.last().copied().unwrap_or_default()
    }

    // empty path: degenerate rect at (0, 0)
    pub fn bounding_rect(&self) -> MapRect {
        let line: LineString<f64> = self.path.iter().copied().collect();

        line.bounding_rect()
            .map(MapRect::from)
            .unwrap_or_else(|| MapRect::degenerate(Coordinates::default()))
    }

    pub fn formatted_distance(&self) -> String {
        format!("{:.1} Km", self.distance / 1000.0)
    }

    pub fn formatted_expected_travel_time(&self) -> String {
        let total = self.expected_travel_time as i64;
        let hours = total / 3600;
        let minutes = total / 60 % 60;
        let seconds = total % 60;

        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[test]
fn route_endpoints_and_bounds() {
    let route = RouteOption::new(
        "US-101 S".into(),
        12_345.0,
        900.0,
        vec![
            Coordinates::new(37.422, -122.084),
            Coordinates::new(37.390, -122.050),
            Coordinates::new(37.331, -122.030),
        ],
    );

    assert_eq!(route.start(), Coordinates::new(37.422, -122.084));
    assert_eq!(route.end(), Coordinates::new(37.331, -122.030));

    let rect = route.bounding_rect();
    assert_eq!(rect.south_west, Coordinates::new(37.331, -122.084));
    assert_eq!(rect.north_east, Coordinates::new(37.422, -122.030));
}

#[test]
fn empty_route_falls_back_to_origin() {
    let route = RouteOption::new("".into(), 0.0, 0.0, vec![]);

    assert_eq!(route.start(), Coordinates::default());
    assert_eq!(route.end(), Coordinates::default());
    assert_eq!(route.bounding_rect(), MapRect::degenerate(Coordinates::default()));
}

#[test]
fn route_formatting() {
    let route = RouteOption::new("I-280 S".into(), 12_345.0, 3_725.0, vec![]);

    assert_eq!(route.formatted_distance(), "12.3 Km");
    assert_eq!(route.formatted_expected_travel_time(), "01:02:05");
}
