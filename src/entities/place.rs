use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPoint {
    pub place_id: String,
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

impl GeocodedPoint {
    pub fn new(place_id: String, formatted_address: String, coordinates: Coordinates) -> Self {
        Self {
            place_id,
            formatted_address,
            coordinates,
        }
    }
}
