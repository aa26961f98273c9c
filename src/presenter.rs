use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{Coordinates, EdgePadding, MapRect, Position, Region, RouteOption, Span};

pub const DEGREES_PER_KM: f64 = 1.0 / 111.111;

pub const START_TITLE: &str = "Start";
pub const END_TITLE: &str = "End";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub title: String,
    pub coordinates: Coordinates,
}

impl Annotation {
    pub fn new(title: &str, coordinates: Coordinates) -> Self {
        Self {
            title: title.into(),
            coordinates,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum DrawInstruction {
    RemoveOverlays,
    RemoveAnnotations,
    SetRegion {
        region: Region,
    },
    ShowsUserLocation {
        visible: bool,
    },
    AddOverlay {
        polyline: Vec<Coordinates>,
    },
    AddAnnotations {
        annotations: Vec<Annotation>,
    },
    SetVisibleRect {
        rect: MapRect,
        padding: EdgePadding,
    },
}

pub trait MapSurface {
    fn apply(&mut self, instruction: &DrawInstruction);

    fn apply_all(&mut self, instructions: &[DrawInstruction]) {
        for instruction in instructions {
            self.apply(instruction);
        }
    }
}

pub type SharedSurface = Arc<Mutex<dyn MapSurface + Send>>;

#[derive(Clone, Debug)]
pub struct MapPresenter {
    pub span_km: f64,
    pub edge_padding: EdgePadding,
}

impl Default for MapPresenter {
    fn default() -> Self {
        Self {
            span_km: 1.0,
            edge_padding: EdgePadding::uniform(50.0),
        }
    }
}

impl MapPresenter {
    pub fn render(
        &self,
        position: &Position,
        tracking: bool,
        selected: Option<&RouteOption>,
    ) -> Vec<DrawInstruction> {
        let mut instructions = vec![
            DrawInstruction::RemoveOverlays,
            DrawInstruction::RemoveAnnotations,
        ];

        if tracking {
            instructions.push(DrawInstruction::SetRegion {
                region: self.region_around(position.coordinates),
            });
        }

        // issued after the region so the route fit is what ends up visible
        if let Some(route) = selected {
            instructions.push(DrawInstruction::ShowsUserLocation { visible: false });
            instructions.push(DrawInstruction::AddOverlay {
                polyline: route.path.clone(),
            });
            instructions.push(DrawInstruction::AddAnnotations {
                annotations: vec![
                    Annotation::new(START_TITLE, route.start()),
                    Annotation::new(END_TITLE, route.end()),
                ],
            });
            instructions.push(DrawInstruction::SetVisibleRect {
                rect: route.bounding_rect(),
                padding: self.edge_padding,
            });
        }

        instructions
    }

    pub fn region_around(&self, center: Coordinates) -> Region {
        let delta = self.span_km * DEGREES_PER_KM;

        Region {
            center,
            span: Span {
                latitude_delta: delta,
                longitude_delta: delta,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Camera {
    Region { region: Region },
    Rect { rect: MapRect, padding: EdgePadding },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub overlays: Vec<Vec<Coordinates>>,
    pub annotations: Vec<Annotation>,
    pub shows_user_location: bool,
    pub camera: Option<Camera>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            overlays: vec![],
            annotations: vec![],
            shows_user_location: true,
            camera: None,
        }
    }
}

impl MapSurface for MapState {
    fn apply(&mut self, instruction: &DrawInstruction) {
        match instruction {
            DrawInstruction::RemoveOverlays => self.overlays.clear(),
            DrawInstruction::RemoveAnnotations => self.annotations.clear(),
            DrawInstruction::SetRegion { region } => {
                self.camera = Some(Camera::Region { region: *region })
            }
            DrawInstruction::ShowsUserLocation { visible } => self.shows_user_location = *visible,
            DrawInstruction::AddOverlay { polyline } => self.overlays.push(polyline.clone()),
            DrawInstruction::AddAnnotations { annotations } => {
                self.annotations.extend(annotations.iter().cloned())
            }
            DrawInstruction::SetVisibleRect { rect, padding } => {
                self.camera = Some(Camera::Rect {
                    rect: *rect,
                    padding: *padding,
                })
            }
        }
    }
}

#[cfg(test)]
fn sample_route() -> RouteOption {
    RouteOption::new(
        "I-280 S".into(),
        14_000.0,
        1_080.0,
        vec![
            Coordinates::new(37.4220, -122.0841),
            Coordinates::new(37.3861, -122.0839),
            Coordinates::new(37.3318, -122.0312),
        ],
    )
}

#[test]
fn tracking_without_route_centers_on_position() {
    let presenter = MapPresenter::default();
    let position = Position::new(Coordinates::new(43.6532, -79.3832));

    let instructions = presenter.render(&position, true, None);

    assert_eq!(
        instructions,
        vec![
            DrawInstruction::RemoveOverlays,
            DrawInstruction::RemoveAnnotations,
            DrawInstruction::SetRegion {
                region: Region {
                    center: position.coordinates,
                    span: Span {
                        latitude_delta: DEGREES_PER_KM,
                        longitude_delta: DEGREES_PER_KM,
                    },
                },
            },
        ]
    );
}

#[test]
fn nothing_but_clears_without_tracking_or_route() {
    let presenter = MapPresenter::default();

    let instructions = presenter.render(&Position::default(), false, None);

    assert_eq!(
        instructions,
        vec![
            DrawInstruction::RemoveOverlays,
            DrawInstruction::RemoveAnnotations
        ]
    );
}

#[test]
fn selected_route_draws_markers_at_path_ends() {
    let presenter = MapPresenter::default();
    let route = sample_route();

    let instructions = presenter.render(&Position::default(), false, Some(&route));

    assert_eq!(instructions[0], DrawInstruction::RemoveOverlays);
    assert_eq!(instructions[1], DrawInstruction::RemoveAnnotations);
    assert!(instructions.contains(&DrawInstruction::ShowsUserLocation { visible: false }));
    assert!(instructions.contains(&DrawInstruction::AddOverlay {
        polyline: route.path.clone()
    }));
    assert!(instructions.contains(&DrawInstruction::AddAnnotations {
        annotations: vec![
            Annotation::new(START_TITLE, Coordinates::new(37.4220, -122.0841)),
            Annotation::new(END_TITLE, Coordinates::new(37.3318, -122.0312)),
        ]
    }));
    assert_eq!(
        instructions.last(),
        Some(&DrawInstruction::SetVisibleRect {
            rect: route.bounding_rect(),
            padding: EdgePadding::uniform(50.0),
        })
    );
}

#[test]
fn route_fit_wins_over_tracking_region() {
    let presenter = MapPresenter::default();
    let route = sample_route();
    let position = Position::new(Coordinates::new(43.6532, -79.3832));

    let instructions = presenter.render(&position, true, Some(&route));

    let region_index = instructions
        .iter()
        .position(|i| matches!(i, DrawInstruction::SetRegion { .. }))
        .unwrap();
    let rect_index = instructions
        .iter()
        .position(|i| matches!(i, DrawInstruction::SetVisibleRect { .. }))
        .unwrap();
    assert!(region_index < rect_index);

    let mut state = MapState::default();
    state.apply_all(&instructions);

    assert_eq!(
        state.camera,
        Some(Camera::Rect {
            rect: route.bounding_rect(),
            padding: EdgePadding::uniform(50.0),
        })
    );
    assert!(!state.shows_user_location);
}

#[test]
fn empty_path_uses_degenerate_markers() {
    let presenter = MapPresenter::default();
    let route = RouteOption::new("empty".into(), 0.0, 0.0, vec![]);

    let mut state = MapState::default();
    state.apply_all(&presenter.render(&Position::default(), false, Some(&route)));

    assert_eq!(
        state.annotations,
        vec![
            Annotation::new(START_TITLE, Coordinates::default()),
            Annotation::new(END_TITLE, Coordinates::default()),
        ]
    );
    assert_eq!(
        state.camera,
        Some(Camera::Rect {
            rect: MapRect::degenerate(Coordinates::default()),
            padding: EdgePadding::uniform(50.0),
        })
    );
}

#[test]
fn repeated_render_is_idempotent() {
    let presenter = MapPresenter::default();
    let route = sample_route();
    let position = Position::new(Coordinates::new(37.0, -122.0));
    let instructions = presenter.render(&position, true, Some(&route));

    let mut once = MapState::default();
    once.apply_all(&instructions);

    let mut twice = MapState::default();
    twice.apply_all(&instructions);
    twice.apply_all(&presenter.render(&position, true, Some(&route)));

    assert_eq!(once, twice);
    assert_eq!(twice.overlays.len(), 1);
    assert_eq!(twice.annotations.len(), 2);
}

#[test]
fn span_scales_with_configured_kilometres() {
    let presenter = MapPresenter {
        span_km: 2.0,
        ..MapPresenter::default()
    };

    let region = presenter.region_around(Coordinates::default());

    assert_eq!(region.span.latitude_delta, 2.0 * DEGREES_PER_KM);
    assert_eq!(region.span.longitude_delta, 2.0 * DEGREES_PER_KM);
}
