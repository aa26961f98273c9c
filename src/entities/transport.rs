use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Automobile,
    Walking,
    Transit,
}

impl TransportMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Automobile => "driving",
            Self::Walking => "walking",
            Self::Transit => "transit",
        }
    }
}

#[test]
fn transport_mode_names() {
    assert_eq!(TransportMode::default(), TransportMode::Automobile);
    assert_eq!(TransportMode::Automobile.name(), "driving");
    assert_eq!(TransportMode::Walking.name(), "walking");
    assert_eq!(TransportMode::Transit.name(), "transit");
}

#[test]
fn transport_mode_deserializes_snake_case() {
    let mode: TransportMode = serde_json::from_str("\"automobile\"").unwrap();
    assert_eq!(mode, TransportMode::Automobile);
}
