//! warehouse: a small robot fleet shuttling across a warehouse floor.
//!
//! Loads a navigation graph (and optionally a fleet config), spawns robots
//! on distinct random vertices, and keeps handing each idle robot a random
//! destination while ticking the fleet.  Set `RUST_LOG=info` (or `debug`)
//! to watch the fleet's own event log.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::warn;

use fleet_core::{FleetConfig, RobotId, SimRng, Tick, VertexId};
use fleet_graph::{NavGraph, Router, load_graph_file};
use fleet_robot::RobotStatus;
use fleet_sim::{FleetBuilder, FleetManager, FleetObserver, LogObserver};
use fleet_traffic::DirectedEdge;

/// Warehouse fleet demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Navigation graph JSON file
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/nav_graph.json"))]
    graph: PathBuf,

    /// Fleet configuration JSON file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of robots to spawn
    #[arg(short, long, default_value = "4")]
    robots: usize,

    /// Number of ticks to run
    #[arg(short, long, default_value = "200")]
    ticks: u64,

    /// Print a fleet snapshot every N ticks (0 = only at the end)
    #[arg(long, default_value = "25")]
    snapshot_interval: u64,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs every event and counts completed tasks.
#[derive(Default)]
struct DemoObserver {
    log:       LogObserver,
    completed: usize,
    waits:     usize,
}

impl FleetObserver for DemoObserver {
    fn on_spawn(&mut self, robot: RobotId, vertex: VertexId) {
        self.log.on_spawn(robot, vertex);
    }

    fn on_task_assigned(&mut self, robot: RobotId, destination: VertexId, path: &[VertexId]) {
        self.log.on_task_assigned(robot, destination, path);
    }

    fn on_task_rejected(&mut self, robot: RobotId, from: VertexId, destination: VertexId) {
        self.log.on_task_rejected(robot, from, destination);
    }

    fn on_wait(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        self.waits += 1;
        self.log.on_wait(tick, robot, edge);
    }

    fn on_promoted(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        self.log.on_promoted(tick, robot, edge);
    }

    fn on_resumed(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        self.log.on_resumed(tick, robot, edge);
    }

    fn on_arrival(&mut self, tick: Tick, robot: RobotId, vertex: VertexId) {
        self.log.on_arrival(tick, robot, vertex);
    }

    fn on_task_complete(&mut self, tick: Tick, robot: RobotId, vertex: VertexId) {
        self.completed += 1;
        self.log.on_task_complete(tick, robot, vertex);
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize, waiting: usize) {
        self.log.on_tick_end(tick, moving, waiting);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<FleetConfig> {
    let Some(path) = path else {
        return Ok(FleetConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: FleetConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn describe(graph: &NavGraph, vertex: VertexId) -> String {
    match graph.attributes(vertex).ok().and_then(|a| a.name()) {
        Some(name) => format!("{vertex} ({name})"),
        None => vertex.to_string(),
    }
}

fn print_snapshot<R: Router, O: FleetObserver>(fleet: &FleetManager<R, O>) -> Result<()> {
    let positions = fleet.positions()?;
    println!("── {} ──", fleet.current_tick());
    for robot in fleet.robots() {
        let id = robot.id();
        println!(
            "  {:<9} {:<12} {:<18} at {}  {}",
            id.to_string(),
            robot.status().as_str(),
            describe(fleet.graph(), robot.current()),
            positions[&id],
            robot.color(),
        );
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let graph = load_graph_file(&args.graph, config.level.as_deref())
        .with_context(|| format!("loading {}", args.graph.display()))?;
    println!(
        "Graph: {} vertices, {} lanes, {} chargers",
        graph.vertex_count(),
        graph.lane_count(),
        graph.chargers().len()
    );
    if args.robots > graph.vertex_count() {
        bail!(
            "{} robots requested but the graph has only {} vertices",
            args.robots,
            graph.vertex_count()
        );
    }

    println!(
        "Speed: {} per tick ({} ticks per lane), seed {}",
        config.speed_per_tick,
        config.ticks_per_edge(),
        config.seed
    );

    // Separate streams for placement and task choice.
    let mut rng = SimRng::new(config.seed);
    let mut tasks = rng.child(1);
    let mut starts: Vec<VertexId> = graph.vertices().collect();
    rng.shuffle(&mut starts);
    let destinations = starts.clone();

    let mut fleet = FleetBuilder::new(graph)
        .config(config)
        .observer(DemoObserver::default())
        .build()?;
    for &vertex in starts.iter().take(args.robots) {
        fleet.spawn_robot(vertex)?;
    }

    for _ in 0..args.ticks {
        let free: Vec<(RobotId, VertexId)> = fleet
            .robots()
            .iter()
            .filter(|r| r.status().accepts_task())
            .map(|r| (r.id(), r.current()))
            .collect();
        for (id, current) in free {
            let Some(&dest) = tasks.choose(&destinations) else {
                continue;
            };
            if dest == current {
                continue;
            }
            if let Err(err) = fleet.assign_task(id, dest) {
                warn!("{err}");
            }
        }

        fleet.tick();
        let now = fleet.current_tick().0;
        if args.snapshot_interval > 0 && now % args.snapshot_interval == 0 {
            print_snapshot(&fleet)?;
        }
    }

    print_snapshot(&fleet)?;
    let waiting = fleet
        .statuses()
        .values()
        .filter(|&&s| s == RobotStatus::Waiting)
        .count();
    println!();
    println!(
        "Finished {} ticks: {} tasks completed, {} waits, {waiting} robots waiting now",
        args.ticks,
        fleet.observer().completed,
        fleet.observer().waits,
    );
    Ok(())
}
