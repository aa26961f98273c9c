use std::sync::Arc;

use navi::config::Config;
use navi::engine::Engine;
use navi::external::google_maps::GoogleMaps;
use navi::server::serve;
use navi::simulation::{drive, SimulatedLocationSource};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let maps = Arc::new(GoogleMaps::from_config(&config));
    let source = Arc::new(SimulatedLocationSource::new());
    let engine = Arc::new(Engine::new(maps.clone(), maps, source.clone()));

    let (tx, rx) = async_channel::unbounded();

    match config.simulated_location {
        Some(center) => {
            tracing::info!("simulating location around {:?}", center);
            tokio::spawn(drive(source, center, config.simulation_interval, tx));
        }
        // positions then only arrive through the HTTP shell
        None => drop(tx),
    }

    {
        let engine = engine.clone();
        tokio::spawn(async move { engine.tracker().run(rx).await });
    }

    if let Err(err) = serve(engine, config.listen_addr).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
