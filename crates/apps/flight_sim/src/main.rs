//! Headless driver: flies from the configured origin to one destination for
//! a scripted number of frames and prints one JSON report per frame.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use foundation::handles::Handle;
use foundation::math::{LatLng, Vec3};
use globe::{
    FlightScene, FrameReport, GlobeConfig, LineStyle, MarkerPose, MorphGrid, OrbitCamera,
    RenderBackend, TripRecord,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flight_sim", about = "Simulate the globe flight animation headlessly")]
struct Args {
    /// JSON config; defaults are used for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, allow_hyphen_values = true, requires = "dest_lng")]
    dest_lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "dest_lat")]
    dest_lng: Option<f64>,

    /// JSON array of `{ "name", "destination": { "lat", "lng" } }`.
    #[arg(long, conflicts_with = "dest_lat")]
    trips: Option<PathBuf>,

    /// Index into `--trips`.
    #[arg(long, requires = "trips")]
    trip: Option<usize>,

    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Frame index at which to toggle the view (repeatable).
    #[arg(long = "toggle-at")]
    toggle_at: Vec<u64>,
}

/// Counts what the scene asks of the renderer.
#[derive(Debug, Default, Serialize)]
struct CountingBackend {
    meshes_uploaded: usize,
    mesh_updates: usize,
    lines_uploaded: usize,
    released: usize,
}

impl RenderBackend for CountingBackend {
    fn upload_mesh(&mut self, _handle: Handle, _grid: &MorphGrid, _texture: &str) {
        self.meshes_uploaded += 1;
    }

    fn update_mesh(&mut self, _handle: Handle, _grid: &MorphGrid) {
        self.mesh_updates += 1;
    }

    fn upload_line(&mut self, _handle: Handle, _points: &[Vec3], _style: &LineStyle) {
        self.lines_uploaded += 1;
    }

    fn release(&mut self, _handle: Handle) {
        self.released += 1;
    }

    fn set_marker(&mut self, _asset: &str, _pose: Option<MarkerPose>) {}
}

#[derive(Serialize)]
struct Summary<'a> {
    frames: u64,
    backend: &'a CountingBackend,
    released_on_teardown: usize,
    live_after_teardown: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GlobeConfig::load(path).map_err(|e| format!("load {path:?}: {e}"))?,
        None => GlobeConfig::default(),
    };

    let mut camera = OrbitCamera::with_home(&config.camera, config.home_position());
    let mut scene = FlightScene::new(config).map_err(|e| e.to_string())?;
    let mut backend = CountingBackend::default();

    if let Some(path) = &args.trips {
        let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
        let trips: Vec<TripRecord> =
            serde_json::from_str(&payload).map_err(|e| format!("parse {path:?}: {e}"))?;
        scene
            .select_trip(&trips, args.trip, &mut backend)
            .map_err(|e| e.to_string())?;
    } else if let (Some(lat), Some(lng)) = (args.dest_lat, args.dest_lng) {
        scene
            .select_destination(Some(LatLng::new(lat, lng)), &mut backend)
            .map_err(|e| e.to_string())?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for index in 0..args.frames {
        if args.toggle_at.contains(&index) {
            if let Err(e) = scene.toggle_view(&mut camera) {
                warn!(frame = index, "{e}");
            }
        }
        camera.update(args.dt);
        let report: FrameReport = scene
            .frame(args.dt, &mut camera, &mut backend)
            .map_err(|e| e.to_string())?;
        let line = serde_json::to_string(&report).map_err(|e| e.to_string())?;
        writeln!(out, "{line}").map_err(|e| e.to_string())?;
    }

    let released_on_teardown = scene.teardown(&mut backend).map_err(|e| e.to_string())?;
    let summary = Summary {
        frames: args.frames,
        backend: &backend,
        released_on_teardown,
        live_after_teardown: scene.live_count(),
    };
    let line = serde_json::to_string(&summary).map_err(|e| e.to_string())?;
    writeln!(out, "{line}").map_err(|e| e.to_string())?;
    info!(frames = args.frames, "simulation finished");
    Ok(())
}
