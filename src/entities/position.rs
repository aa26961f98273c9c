use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinates: Coordinates,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            timestamp: Utc::now(),
        }
    }
}

impl Default for Position {
    // an empty fix: (0, 0) at the epoch
    fn default() -> Self {
        Self {
            coordinates: Coordinates::default(),
            timestamp: DateTime::<Utc>::default(),
        }
    }
}
