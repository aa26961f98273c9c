mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{MapAPI, API};
use crate::error::{unexpected_error, Error};
use crate::presenter::MapState;
use crate::server::handlers::{location, map, routes};

pub(crate) type DynAPI = Arc<dyn API + Send + Sync>;
pub(crate) type SharedMap = Arc<Mutex<MapState>>;

pub fn router(api: DynAPI) -> Router {
    let surface: SharedMap = Arc::new(Mutex::new(MapState::default()));
    api.attach_surface(surface.clone());

    Router::new()
        .route("/routes", post(routes::fetch).get(routes::list))
        .route("/routes/selected", get(routes::selected).put(routes::select))
        .route("/tracking/start", post(location::start))
        .route("/tracking/stop", post(location::stop))
        .route("/location", get(location::find))
        .route("/location/events", post(location::push_event))
        .route("/map", get(map::render))
        .layer(Extension(api))
        .layer(Extension(surface))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: Arc<T>, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api as DynAPI);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
