//! Minimal TopoJSON decoding: just enough to turn the counties topology
//! into boundary features and a state-border mesh.
//!
//! Arcs are shared between neighboring shapes, delta-encoded and (when a
//! `transform` is present) quantized. Features are rebuilt by walking each
//! geometry's arc indices; a negative index means the complement arc
//! (`!index`) traversed backwards.

use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::{Boundary, BoundaryCollection, DividerMesh};

#[derive(Debug, Deserialize)]
pub struct Topology {
    pub objects: HashMap<String, Geometry>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub transform: Option<Transform>,
}

#[derive(Debug, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<Value>,
        arcs: Vec<Vec<i32>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<Value>,
        arcs: Vec<Vec<Vec<i32>>>,
    },
}

/// Converts one named topology object into a boundary feature collection.
pub fn feature_collection(topo: &Topology, object: &str) -> Result<BoundaryCollection> {
    let geometry = topo
        .objects
        .get(object)
        .with_context(|| format!("topology has no object named '{}'", object))?;

    let mut features = Vec::new();
    collect_features(topo, geometry, &mut features)?;
    Ok(features)
}

/// Builds the divider mesh for one named topology object: only arcs shared
/// by two distinct shapes survive, so exterior coastlines and self-adjacent
/// edges drop out and what remains is the borders between states.
pub fn mesh(topo: &Topology, object: &str) -> Result<DividerMesh> {
    let geometry = topo
        .objects
        .get(object)
        .with_context(|| format!("topology has no object named '{}'", object))?;

    // Which shapes (by ordinal) reference each arc.
    let mut users: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut ordinal = 0usize;
    record_arc_users(geometry, &mut ordinal, &mut users);

    let mut lines = Vec::new();
    let mut shared: Vec<usize> = users
        .into_iter()
        .filter(|(_, owners)| {
            let first = owners[0];
            owners.iter().any(|&o| o != first)
        })
        .map(|(arc, _)| arc)
        .collect();
    shared.sort_unstable();

    for arc in shared {
        let points = decode_arc(topo, arc)?;
        lines.push(LineString::from(points));
    }
    Ok(MultiLineString(lines))
}

fn collect_features(
    topo: &Topology,
    geometry: &Geometry,
    out: &mut Vec<Boundary>,
) -> Result<()> {
    match geometry {
        Geometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_features(topo, child, out)?;
            }
        }
        Geometry::Polygon { id, arcs } => {
            let polygon = assemble_polygon(topo, arcs)?;
            out.push(Boundary {
                id: id.as_ref().and_then(id_to_fips),
                geometry: MultiPolygon(vec![polygon]),
            });
        }
        Geometry::MultiPolygon { id, arcs } => {
            let polygons = arcs
                .iter()
                .map(|rings| assemble_polygon(topo, rings))
                .collect::<Result<Vec<_>>>()?;
            out.push(Boundary {
                id: id.as_ref().and_then(id_to_fips),
                geometry: MultiPolygon(polygons),
            });
        }
    }
    Ok(())
}

fn record_arc_users(
    geometry: &Geometry,
    ordinal: &mut usize,
    users: &mut HashMap<usize, Vec<usize>>,
) {
    match geometry {
        Geometry::GeometryCollection { geometries } => {
            for child in geometries {
                record_arc_users(child, ordinal, users);
            }
        }
        Geometry::Polygon { arcs, .. } => {
            for ring in arcs {
                for &index in ring {
                    users.entry(absolute_index(index)).or_default().push(*ordinal);
                }
            }
            *ordinal += 1;
        }
        Geometry::MultiPolygon { arcs, .. } => {
            for polygon in arcs {
                for ring in polygon {
                    for &index in ring {
                        users.entry(absolute_index(index)).or_default().push(*ordinal);
                    }
                }
            }
            *ordinal += 1;
        }
    }
}

fn assemble_polygon(topo: &Topology, rings: &[Vec<i32>]) -> Result<Polygon<f64>> {
    if rings.is_empty() {
        bail!("polygon geometry with no rings");
    }
    let mut assembled = rings
        .iter()
        .map(|ring| assemble_ring(topo, ring))
        .collect::<Result<Vec<_>>>()?;
    let exterior = assembled.remove(0);
    Ok(Polygon::new(exterior, assembled))
}

/// Stitches a ring from its arc indices. Consecutive arcs share their
/// junction point, so every arc after the first contributes from its
/// second point on.
fn assemble_ring(topo: &Topology, indices: &[i32]) -> Result<LineString<f64>> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for &index in indices {
        let mut arc = decode_arc(topo, absolute_index(index))?;
        if index < 0 {
            arc.reverse();
        }
        let skip = usize::from(!points.is_empty());
        points.extend(arc.into_iter().skip(skip));
    }
    if points.len() < 4 {
        bail!("ring has too few points ({})", points.len());
    }
    Ok(LineString::from(points))
}

/// Expands one arc to coordinates. Quantized topologies store cumulative
/// integer deltas that the transform maps back to real positions; without
/// a transform the points are already absolute.
fn decode_arc(topo: &Topology, index: usize) -> Result<Vec<Coord<f64>>> {
    let arc = topo
        .arcs
        .get(index)
        .with_context(|| format!("arc index {} out of range", index))?;

    let mut points = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for point in arc {
        if point.len() < 2 {
            bail!("arc {} contains a point with fewer than 2 coordinates", index);
        }
        let coord = match &topo.transform {
            Some(t) => {
                x += point[0];
                y += point[1];
                Coord {
                    x: x * t.scale[0] + t.translate[0],
                    y: y * t.scale[1] + t.translate[1],
                }
            }
            None => Coord {
                x: point[0],
                y: point[1],
            },
        };
        points.push(coord);
    }
    Ok(points)
}

fn absolute_index(index: i32) -> usize {
    if index < 0 {
        !index as usize
    } else {
        index as usize
    }
}

fn id_to_fips(id: &Value) -> Option<u32> {
    match id {
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
