use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, GeocodedPoint, RouteOption, TransportMode},
    error::{directions_error, geocode_error, invalid_input_error, upstream_error, Error},
    external::{polyline, DirectionsService, GeocodingService},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

impl From<Place> for GeocodedPoint {
    fn from(place: Place) -> Self {
        GeocodedPoint::new(
            place.place_id,
            place.formatted_address,
            place.geometry.location,
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub summary: String,
    pub legs: Vec<Leg>,
    pub overview_polyline: EncodedPolyline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leg {
    pub distance: Measure,
    pub duration: Measure,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measure {
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

impl TryFrom<Route> for RouteOption {
    type Error = Error;

    fn try_from(route: Route) -> Result<Self, Self::Error> {
        let distance = route.legs.iter().map(|leg| leg.distance.value).sum();
        let duration = route.legs.iter().map(|leg| leg.duration.value).sum();
        let path = polyline::decode(&route.overview_polyline.points)?;

        Ok(RouteOption::new(route.summary, distance, duration, path))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<T>,
    routes: Option<T>,
}

#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl GoogleMaps {
    pub fn new(api_base: String, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.google_maps_api_base.clone(),
            config.google_maps_api_key.clone(),
        )
    }

    fn url(&self, endpoint: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, endpoint)
    }
}

fn check_status(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

#[async_trait]
impl GeocodingService for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeocodedPoint, Error> {
        let res = self
            .client
            .get(self.url("geocode"))
            .query(&[("key", self.key.as_str())])
            .query(&[("address", address)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<Vec<Place>> = res.json().await?;

        if data.status != "OK" {
            tracing::warn!("geocoding status: {}", data.status);
            return Err(geocode_error());
        }

        data.results
            .and_then(|places| places.into_iter().next())
            .map(GeocodedPoint::from)
            .ok_or_else(|| geocode_error())
    }
}

#[async_trait]
impl DirectionsService for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn directions(
        &self,
        origin: &GeocodedPoint,
        destination: &GeocodedPoint,
        mode: TransportMode,
    ) -> Result<Vec<RouteOption>, Error> {
        let origin: String = origin.coordinates.into();
        let destination: String = destination.coordinates.into();

        let res = self
            .client
            .get(self.url("directions"))
            .query(&[("key", self.key.as_str())])
            .query(&[("origin", origin)])
            .query(&[("destination", destination)])
            .query(&[("mode", mode.name())])
            .query(&[("alternatives", "true")])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: Response<Vec<Route>> = res.json().await?;

        if data.status != "OK" {
            tracing::warn!("directions status: {}", data.status);
            return Err(directions_error());
        }

        data.routes
            .ok_or_else(|| directions_error())?
            .into_iter()
            .map(RouteOption::try_from)
            .collect()
    }
}

#[test]
fn geocode_response_parses_first_place() {
    let body = r#"{
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJj61dQgK6j4AR4GeTYWZsKWw",
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                "geometry": { "location": { "lat": 37.4223878, "lng": -122.0841877 } }
            }
        ]
    }"#;

    let data: Response<Vec<Place>> = serde_json::from_str(body).unwrap();
    let point: GeocodedPoint = data.results.unwrap().remove(0).into();

    assert_eq!(point.place_id, "ChIJj61dQgK6j4AR4GeTYWZsKWw");
    assert_eq!(point.coordinates, Coordinates::new(37.4223878, -122.0841877));
}

#[test]
fn directions_response_keeps_service_order() {
    let body = r#"{
        "status": "OK",
        "routes": [
            {
                "summary": "I-280 S",
                "legs": [
                    { "distance": { "value": 15000 }, "duration": { "value": 1200 } }
                ],
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" }
            },
            {
                "summary": "CA-85 S",
                "legs": [
                    { "distance": { "value": 9000 }, "duration": { "value": 800 } },
                    { "distance": { "value": 7000 }, "duration": { "value": 600 } }
                ],
                "overview_polyline": { "points": "" }
            }
        ]
    }"#;

    let data: Response<Vec<Route>> = serde_json::from_str(body).unwrap();
    let routes: Vec<RouteOption> = data
        .routes
        .unwrap()
        .into_iter()
        .map(RouteOption::try_from)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].name, "I-280 S");
    assert_eq!(routes[0].path.len(), 2);
    assert_eq!(routes[1].name, "CA-85 S");
    assert_eq!(routes[1].distance, 16000.0);
    assert_eq!(routes[1].expected_travel_time, 1400.0);
}

#[test]
fn http_status_classification() {
    assert!(check_status(200).is_ok());
    assert_eq!(check_status(403), Err(invalid_input_error()));
    assert_eq!(check_status(503), Err(upstream_error()));
}
