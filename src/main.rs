use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use tripmap::config::{ConfigError, TripConfig};
use tripmap::error::{ErrorCode, TripError, ValidationError};
use tripmap::mode::TransportMode;
use tripmap::position::LatLng;
use tripmap::route::client::HttpRouteService;
use tripmap::route::{RouteError, RouteRequestCoordinator};
use tripmap::stops::{NewStop, StopListModel};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] RouteError),
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error("{given} modes given for {segments} segments")]
    TooManyModes { given: usize, segments: usize },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Trip(value.into())
    }
}

#[derive(Parser, Debug)]
#[command(name = "tripmap", about = "Multi-modal trip routing CLI")]
struct Cli {
    /// Overrides `ROUTE_SERVICE_URL` from the environment.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a route through the given stops and print its polylines.
    Route {
        /// A stop as `Name@latitude,longitude`. Repeat for each stop, in order.
        #[arg(long = "stop", value_parser = parse_stop, required = true)]
        stops: Vec<NewStop>,

        /// Mode for each segment, in order. Missing trailing modes default to car.
        #[arg(long = "mode")]
        modes: Vec<TransportMode>,
    },
    /// List the transport modes and their colors.
    Modes,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Route { stops, modes } => run_route(cli.base_url, stops, modes).await,
        Command::Modes => {
            run_modes();
            Ok(())
        }
    }
}

async fn run_route(base_url: Option<String>, stops: Vec<NewStop>, modes: Vec<TransportMode>) -> Result<(), CliError> {
    let mut config = TripConfig::from_env()?;
    if let Some(url) = base_url {
        config.route.base_url = url.trim_end_matches('/').to_owned();
    }

    let model = build_model(stops, &modes)?;
    let service = HttpRouteService::new(&config.route)?;
    tracing::info!(endpoint = service.endpoint(), stops = model.len(), "requesting route");

    let mut coordinator = RouteRequestCoordinator::new(Arc::new(service));
    if let Err(e) = coordinator.fetch(&model).await {
        tracing::error!(code = e.error_code(), retryable = e.retryable(), "route request failed");
        return Err(e.into());
    }

    let segments: Vec<_> = coordinator
        .polylines()
        .iter()
        .map(|line| {
            json!({
                "mode": line.mode,
                "color": line.mode.color(),
                "coordinates": line.coordinates.iter().map(|c| c.to_lon_lat()).collect::<Vec<_>>(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&json!({ "segments": segments }))?);
    Ok(())
}

fn run_modes() {
    for mode in TransportMode::ALL {
        println!("{:<6} {:<8} {:<8} {}", mode.as_str(), mode.label(), mode.icon(), mode.color());
    }
}

/// Build a trip from CLI stops and modes.
fn build_model(stops: Vec<NewStop>, modes: &[TransportMode]) -> Result<StopListModel, CliError> {
    let segments = stops.len().saturating_sub(1);
    if modes.len() > segments {
        return Err(CliError::TooManyModes { given: modes.len(), segments });
    }

    let mut model = StopListModel::new();
    for stop in stops {
        model.add(stop)?;
    }
    for (index, mode) in modes.iter().enumerate() {
        model.set_mode(index, *mode)?;
    }
    Ok(model)
}

/// Parse `Name@latitude,longitude`.
fn parse_stop(raw: &str) -> Result<NewStop, String> {
    let (name, coords) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected Name@latitude,longitude, got `{raw}`"))?;
    let (lat, lon) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected latitude,longitude, got `{coords}`"))?;
    let latitude: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude `{lat}`"))?;
    let longitude: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude `{lon}`"))?;
    let position = LatLng::new(latitude, longitude);
    if !position.is_valid() {
        return Err(format!("coordinate out of range: {latitude},{longitude}"));
    }
    Ok(NewStop::new(name.trim(), position))
}
