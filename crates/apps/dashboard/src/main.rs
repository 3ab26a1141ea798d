use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alerts::mock::{mock_alerts, mock_heatmap};
use alerts::{AlertStore, FilterUpdate, HeatmapPoint, Severity, load_feed, load_heatmap};
use clap::Parser;
use controller::{DashboardAction, GeolocationError, MapConfig, MapController, MapStatus};
use foundation::geo::LatLng;
use provider::{GestureKind, InMemoryMap};
use runtime::clock::ManualClock;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Headless incident map: drives the map controller against the in-memory
/// provider on a simulated clock and reports what it did.
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
struct Cli {
    /// Simulated run length in seconds.
    #[arg(long, default_value_t = 30)]
    duration_secs: u64,

    /// Number of mock alerts when no feed file is given.
    #[arg(long, default_value_t = 7)]
    alerts: usize,

    /// JSON alert feed; replaces the mock alerts.
    #[arg(long)]
    alerts_file: Option<PathBuf>,

    /// JSON heatmap points; replaces the mock heatmap.
    #[arg(long)]
    heatmap_file: Option<PathBuf>,

    #[arg(long, default_value_t = 40)]
    heatmap_points: usize,

    #[arg(long)]
    no_heatmap: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Overrides MAP_API_KEY.
    #[arg(long)]
    api_key: Option<String>,

    /// Only show alerts of these severities (repeatable).
    #[arg(long = "severity", value_parser = parse_severity)]
    severities: Vec<Severity>,

    /// Seconds at which a simulated drag gesture happens (repeatable).
    #[arg(long = "gesture-at")]
    gestures: Vec<u64>,

    /// Seconds at which the marker under the autopilot cursor is clicked (repeatable).
    #[arg(long = "click-at")]
    clicks: Vec<u64>,

    /// User position as `LAT,LNG`, applied at `--locate-at`.
    #[arg(long, value_parser = parse_lat_lng)]
    locate: Option<LatLng>,

    #[arg(long, default_value_t = 0)]
    locate_at: u64,

    /// Simulate a denied location permission at `--locate-at`.
    #[arg(long)]
    deny_location: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();

    let mut config = MapConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(key) = cli.api_key.clone() {
        config.credential = Some(key);
    }
    run(&cli, config)
}

/// Runs the simulation. An unavailable map leaves the controller inert but
/// the store and clock keep running.
fn run(cli: &Cli, config: MapConfig) -> Result<(), String> {
    let mut store = AlertStore::new();
    store.set_alerts(match &cli.alerts_file {
        Some(path) => load_feed(&read(path)?).map_err(|e| e.to_string())?,
        None => mock_alerts(cli.alerts),
    });
    if !cli.severities.is_empty() {
        store.update_filters(FilterUpdate {
            severities: Some(cli.severities.clone()),
            ..FilterUpdate::default()
        });
    }
    let heatmap: Vec<HeatmapPoint> = match &cli.heatmap_file {
        Some(path) => load_heatmap(&read(path)?).map_err(|e| e.to_string())?,
        None => mock_heatmap(cli.seed, cli.heatmap_points),
    };
    info!(
        alerts = store.all().len(),
        shown = store.filtered().len(),
        heatmap = heatmap.len(),
        "dataset loaded"
    );

    let map = InMemoryMap::new();
    let mut controller = MapController::new(map.clone(), config);
    controller.set_alerts(store.filtered().to_vec());
    controller.set_heatmap(heatmap, !cli.no_heatmap);

    let mut clock = ManualClock::new();
    if let MapStatus::Unavailable(err) = controller.mount(clock.now()) {
        error!(error = %err, "{}", err.user_message());
    }
    drain_actions(&mut controller, &mut store);

    for second in 0..=cli.duration_secs {
        if second > 0 {
            clock.advance(Duration::from_secs(1));
        }
        controller.advance_to(clock.now());

        if cli.gestures.contains(&second) {
            map.emit_gesture(GestureKind::DragStart);
        }
        if cli.clicks.contains(&second) {
            click_current(&controller, &map);
        }
        if second == cli.locate_at {
            if cli.deny_location {
                controller.locate(Err(GeolocationError::PermissionDenied));
            } else if let Some(position) = cli.locate {
                controller.locate(Ok(position));
            }
        }
        // Stamps any gesture raised this second.
        controller.advance_to(clock.now());
        drain_actions(&mut controller, &mut store);
    }

    let cursor = controller.cursor();
    let final_status = controller.status().as_str();
    controller.teardown();
    let stats = controller.stats();
    let kinds = controller.events().counts();

    println!("simulated {}s at {}", cli.duration_secs, clock.now());
    println!("map status={final_status}");
    println!(
        "markers placed={} removed={} live_after_teardown={}",
        stats.markers_placed,
        stats.markers_removed,
        map.marker_count()
    );
    println!(
        "heatmap installs={} viewport_commands={} gestures={} ticks_skipped={}",
        stats.heatmap_installs, stats.viewport_commands, stats.gestures, stats.ticks_skipped
    );
    println!("cursor index={} phase={:?}", cursor.index, cursor.phase);
    if let Some(selected) = store.selected() {
        println!("selected {} ({})", selected.id, selected.title);
    }
    for (kind, n) in kinds {
        println!("events {kind}={n}");
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))
}

fn click_current(controller: &MapController<InMemoryMap>, map: &InMemoryMap) {
    let markers = map.live_markers();
    if markers.is_empty() {
        return;
    }
    let (marker, spec) = &markers[controller.cursor().index % markers.len()];
    info!(%marker, title = %spec.title, "simulated marker click");
    map.click_marker(*marker);
}

fn drain_actions(controller: &mut MapController<InMemoryMap>, store: &mut AlertStore) {
    for action in controller.take_actions() {
        match action {
            DashboardAction::SelectAlert(id) => {
                if store.select(Some(&id)) {
                    info!(alert = %id, "alert selected");
                } else {
                    warn!(alert = %id, "selected alert is not in the store");
                }
            }
            DashboardAction::StatusChanged(status) => info!(status = status.as_str(), "map status"),
            DashboardAction::Notify(notice) => warn!(level = ?notice.level, "{}", notice.message),
        }
    }
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::ALL
        .into_iter()
        .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown severity {s:?} (expected critical, high, medium or low)"))
}

fn parse_lat_lng(s: &str) -> Result<LatLng, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate {v:?}: {e}"))
    };
    let p = LatLng::new(parse(lat)?, parse(lng)?);
    if !p.is_valid() {
        return Err(format!("coordinates out of range: {s}"));
    }
    Ok(p)
}
