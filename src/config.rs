use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, Error};

const DEFAULT_API_BASE: &str = "maps.googleapis.com";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SIMULATION_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub listen_addr: SocketAddr,
    /// Center of the simulated location feed; no feed when unset.
    pub simulated_location: Option<Coordinates>,
    pub simulation_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |key: &str| match lookup(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(Error::from(err)),
        };

        let google_maps_api_base =
            optional("GOOGLE_MAPS_API_BASE")?.unwrap_or_else(|| DEFAULT_API_BASE.into());
        let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")?;

        let listen_addr = optional("NAVI_LISTEN_ADDR")?
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|_| invalid_input_error())?;

        let simulated_location = optional("NAVI_SIMULATED_LOCATION")?
            .map(|value| parse_coordinates(&value))
            .transpose()?;

        let simulation_interval = match optional("NAVI_SIMULATION_INTERVAL_MS")? {
            Some(value) => value.parse::<u64>().map_err(|_| invalid_input_error())?,
            None => DEFAULT_SIMULATION_INTERVAL_MS,
        };

        if simulation_interval == 0 {
            return Err(invalid_input_error());
        }

        Ok(Self {
            google_maps_api_base,
            google_maps_api_key,
            listen_addr,
            simulated_location,
            simulation_interval: Duration::from_millis(simulation_interval),
        })
    }
}

pub fn parse_coordinates(value: &str) -> Result<Coordinates, Error> {
    let (lat, lng) = value.split_once(',').ok_or_else(|| invalid_input_error())?;

    let lat: f64 = lat.trim().parse().map_err(|_| invalid_input_error())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid_input_error())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid_input_error());
    }

    Ok(Coordinates::new(lat, lng))
}

#[cfg(test)]
fn lookup_from(
    pairs: &'static [(&'static str, &'static str)],
) -> impl Fn(&str) -> Result<String, env::VarError> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .ok_or(env::VarError::NotPresent)
    }
}

#[test]
fn config_defaults() {
    let config = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "secret")])).unwrap();

    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert_eq!(config.google_maps_api_key, "secret");
    assert_eq!(config.listen_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.simulated_location, None);
    assert_eq!(config.simulation_interval, Duration::from_secs(1));
}

#[test]
fn config_missing_key_is_env_error() {
    let err = Config::from_lookup(lookup_from(&[])).unwrap_err();

    assert_eq!(err.code, 1);
}

#[test]
fn config_reads_simulation_settings() {
    let config = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("NAVI_LISTEN_ADDR", "0.0.0.0:8080"),
        ("NAVI_SIMULATED_LOCATION", "43.6532, -79.3832"),
        ("NAVI_SIMULATION_INTERVAL_MS", "250"),
    ]))
    .unwrap();

    assert_eq!(config.listen_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(
        config.simulated_location,
        Some(Coordinates::new(43.6532, -79.3832))
    );
    assert_eq!(config.simulation_interval, Duration::from_millis(250));
}

#[test]
fn config_rejects_zero_simulation_interval() {
    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("NAVI_SIMULATION_INTERVAL_MS", "0"),
    ]))
    .unwrap_err();

    assert_eq!(err, invalid_input_error());
}

#[test]
fn config_rejects_unparsable_simulation_interval() {
    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("NAVI_SIMULATION_INTERVAL_MS", "-5"),
    ]))
    .unwrap_err();

    assert_eq!(err, invalid_input_error());
}

#[test]
fn malformed_coordinates_are_rejected() {
    assert_eq!(parse_coordinates("43.6"), Err(invalid_input_error()));
    assert_eq!(parse_coordinates("abc,1"), Err(invalid_input_error()));
    assert_eq!(parse_coordinates("91,0"), Err(invalid_input_error()));
}
