//! Fluent builder for constructing a [`FleetManager`].

use fleet_core::{FleetConfig, RobotId};
use fleet_graph::{BfsRouter, NavGraph, Router};
use fleet_traffic::TrafficManager;

use crate::{FleetManager, FleetObserver, FleetResult, LogObserver};

/// Fluent builder for [`FleetManager<R, O>`].
///
/// # Required inputs
///
/// - [`NavGraph`]: the loaded navigation graph
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                   |
/// |-----------------|---------------------------|
/// | `.config(c)`    | `FleetConfig::default()`  |
/// | `.router(r)`    | [`BfsRouter`]             |
/// | `.observer(o)`  | [`LogObserver`]           |
///
/// # Example
///
/// ```rust,ignore
/// let graph = fleet_graph::load_graph_file("nav_graph.json", None)?;
/// let mut fleet = FleetBuilder::new(graph)
///     .config(config)
///     .observer(NoopObserver)
///     .build()?;
/// let r = fleet.spawn_robot(VertexId(0))?;
/// fleet.assign_task(r, VertexId(4))?;
/// fleet.run_ticks(50);
/// ```
pub struct FleetBuilder<R: Router = BfsRouter, O: FleetObserver = LogObserver> {
    graph:    NavGraph,
    config:   FleetConfig,
    router:   R,
    observer: O,
}

impl FleetBuilder {
    /// Start a builder over `graph` with default config, router and observer.
    pub fn new(graph: NavGraph) -> Self {
        Self {
            graph,
            config:   FleetConfig::default(),
            router:   BfsRouter,
            observer: LogObserver,
        }
    }
}

impl<R: Router, O: FleetObserver> FleetBuilder<R, O> {
    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the path-finding algorithm.
    pub fn router<R2: Router>(self, router: R2) -> FleetBuilder<R2, O> {
        FleetBuilder {
            graph:    self.graph,
            config:   self.config,
            router,
            observer: self.observer,
        }
    }

    /// Replace the event sink.
    pub fn observer<O2: FleetObserver>(self, observer: O2) -> FleetBuilder<R, O2> {
        FleetBuilder {
            graph:  self.graph,
            config: self.config,
            router: self.router,
            observer,
        }
    }

    /// Validate the config and return an empty fleet at tick 0.
    pub fn build(self) -> FleetResult<FleetManager<R, O>> {
        self.config.validate()?;
        Ok(FleetManager {
            config:   self.config,
            graph:    self.graph,
            traffic:  TrafficManager::new(),
            robots:   Vec::new(),
            next_id:  RobotId(0),
            tick:     Default::default(),
            router:   self.router,
            observer: self.observer,
        })
    }
}
