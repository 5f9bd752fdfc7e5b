//! JSON graph loader.
//!
//! # Accepted shapes
//!
//! Vertices are `[x, y]` or `[x, y, {attributes}]`; lanes are `[a, b]` or
//! `[a, b, {attributes}]` where `a`/`b` are 0-based vertex indices.  Lane
//! attributes are accepted and ignored (every lane costs 1).
//!
//! | Shape   | Example                                                    |
//! |---------|------------------------------------------------------------|
//! | flat    | `{"vertices": [...], "lanes": [...]}`                      |
//! | levels  | `{"levels": {"l1": {"vertices": [...], "lanes": [...]}}}`  |
//! | named   | `{"l1": {"vertices": [...], "lanes": [...]}}`              |
//! | items   | `[[x, y, {..}], [x, y, {..}], [0, 1]]`                     |
//!
//! In the legacy `items` shape an element with more than two entries is a
//! vertex and an element with exactly two is a lane.
//!
//! When a source has several levels and no level name is requested, the
//! lexicographically first level is used.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Value};

use fleet_core::Point;

use crate::graph::{NavGraph, NavGraphBuilder, VertexAttributes};
use crate::GraphLoadError;

// ── Raw records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVertex {
    WithAttrs(f64, f64, Map<String, Value>),
    Bare(f64, f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLane {
    Bare(u32, u32),
    WithAttrs(u32, u32, #[allow(dead_code)] Value),
}

impl RawLane {
    fn endpoints(&self) -> (u32, u32) {
        match *self {
            RawLane::Bare(a, b) | RawLane::WithAttrs(a, b, _) => (a, b),
        }
    }
}

#[derive(Deserialize)]
struct RawLevel {
    vertices: Vec<RawVertex>,
    #[serde(default)]
    lanes:    Vec<RawLane>,
}

impl RawLevel {
    fn build(self) -> Result<NavGraph, GraphLoadError> {
        let mut b = NavGraphBuilder::with_capacity(self.vertices.len(), self.lanes.len());
        for v in self.vertices {
            push_vertex(&mut b, v);
        }
        for lane in &self.lanes {
            let (a, c) = lane.endpoints();
            b.add_raw_lane(a, c);
        }
        b.build()
    }
}

fn push_vertex(b: &mut NavGraphBuilder, v: RawVertex) {
    match v {
        RawVertex::WithAttrs(x, y, attrs) => {
            b.add_vertex(Point::new(x, y), VertexAttributes::new(attrs));
        }
        RawVertex::Bare(x, y) => {
            b.add_vertex(Point::new(x, y), VertexAttributes::default());
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NavGraph`] from a JSON file.
///
/// `level` selects a named level from nested sources and is ignored for flat
/// ones.
pub fn load_graph_file(path: &Path, level: Option<&str>) -> Result<NavGraph, GraphLoadError> {
    let file = std::fs::File::open(path)?;
    let graph = load_graph_reader(std::io::BufReader::new(file), level)?;
    debug!(
        "loaded {} vertices / {} lanes from {}",
        graph.vertex_count(),
        graph.lane_count(),
        path.display()
    );
    Ok(graph)
}

/// Like [`load_graph_file`] but accepts any `Read` source.
pub fn load_graph_reader<R: Read>(reader: R, level: Option<&str>) -> Result<NavGraph, GraphLoadError> {
    let value: Value = serde_json::from_reader(reader)?;
    load_graph_value(value, level)
}

/// Like [`load_graph_file`] but parses an in-memory string.
pub fn load_graph_str(source: &str, level: Option<&str>) -> Result<NavGraph, GraphLoadError> {
    let value: Value = serde_json::from_str(source)?;
    load_graph_value(value, level)
}

/// Normalise any accepted shape into a [`NavGraph`].
pub fn load_graph_value(value: Value, level: Option<&str>) -> Result<NavGraph, GraphLoadError> {
    match value {
        Value::Array(items) => load_items(items),
        Value::Object(mut obj) => {
            if obj.contains_key("vertices") {
                let flat: RawLevel = serde_json::from_value(Value::Object(obj))?;
                return flat.build();
            }
            let levels_value = match obj.remove("levels") {
                Some(nested) => nested,
                None => Value::Object(obj),
            };
            let levels: BTreeMap<String, RawLevel> = serde_json::from_value(levels_value)?;
            select_level(levels, level)?.build()
        }
        other => Err(GraphLoadError::Parse(serde_json::Error::custom(format!(
            "expected a JSON object or array at the top level, found {}",
            json_kind(&other)
        )))),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn select_level(
    mut levels: BTreeMap<String, RawLevel>,
    wanted: Option<&str>,
) -> Result<RawLevel, GraphLoadError> {
    match wanted {
        Some(name) => levels
            .remove(name)
            .ok_or_else(|| GraphLoadError::LevelNotFound(name.to_owned())),
        None => {
            if levels.len() > 1 {
                warn!(
                    "graph source has {} levels and none was requested; using the first",
                    levels.len()
                );
            }
            levels.pop_first().map(|(_, lvl)| lvl).ok_or(GraphLoadError::NoLevels)
        }
    }
}

fn load_items(items: Vec<Value>) -> Result<NavGraph, GraphLoadError> {
    let mut b = NavGraphBuilder::with_capacity(items.len(), items.len());
    for item in items {
        let len = item.as_array().map(Vec::len).unwrap_or(0);
        if len > 2 {
            push_vertex(&mut b, serde_json::from_value(item)?);
        } else if len == 2 {
            let lane: RawLane = serde_json::from_value(item)?;
            let (a, c) = lane.endpoints();
            b.add_raw_lane(a, c);
        } else {
            return Err(GraphLoadError::Parse(serde_json::Error::custom(format!(
                "graph item must be a vertex [x, y, {{..}}] or a lane [a, b], found {}",
                json_kind(&item)
            ))));
        }
    }
    b.build()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array of the wrong length",
        Value::Object(_) => "an object",
    }
}
