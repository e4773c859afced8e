use hashbrown::HashSet;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Point, Rect};

/// A point resource with an identifier; the unit of routing and congestion
/// accounting. Field names follow the camelCase fixture JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub x: f64,
    pub y: f64,
    pub port_id: String,
}

/// A hyperedge: every pair of member ports is directly adjacent for search
/// purposes, regardless of geometric distance. Regions may overlap in
/// membership.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub region_id: String,
    pub port_ids: Vec<String>,
}

/// A requested start-to-end routing demand between two ports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub start_port_id: String,
    pub end_port_id: String,
    pub connection_id: String,
}

/// The immutable router input: all regions, ports and connections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub regions: Vec<Region>,
    pub ports: Vec<Port>,
    pub connections: Vec<Connection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) u32);

struct RegionData {
    bounds: Rect,
    members: Vec<PortId>,
}

struct ConnectionData {
    start: Option<PortId>,
    end: Option<PortId>,
}

/// The input graph with every string id interned to a dense index, plus the
/// port/region adjacency tables the search walks. Built once at engine
/// construction and never mutated afterwards.
pub struct RoutingGraph {
    port_names: IndexSet<String>,
    port_points: Vec<Point>,
    region_names: IndexSet<String>,
    regions: Vec<RegionData>,
    /// Regions each port belongs to, indexed by `PortId`.
    port_regions: Vec<Vec<RegionId>>,
    connection_names: IndexSet<String>,
    connections: Vec<ConnectionData>,
    raw_connections: Vec<Connection>,
}

impl RoutingGraph {
    pub fn new(graph: Graph) -> Self {
        let mut port_names = IndexSet::with_capacity(graph.ports.len());
        let mut port_points = Vec::with_capacity(graph.ports.len());
        for port in &graph.ports {
            let (index, inserted) = port_names.insert_full(port.port_id.clone());
            let point = Point::new(port.x, port.y);
            if inserted {
                port_points.push(point);
            } else {
                // Last definition wins for duplicated ids.
                debug!(port_id = %port.port_id, "duplicate port id in input graph");
                port_points[index] = point;
            }
        }

        let mut region_names = IndexSet::with_capacity(graph.regions.len());
        let mut regions = Vec::with_capacity(graph.regions.len());
        let mut port_regions = vec![Vec::new(); port_points.len()];
        for region in &graph.regions {
            let (region_index, inserted) = region_names.insert_full(region.region_id.clone());
            if !inserted {
                debug!(region_id = %region.region_id, "duplicate region id in input graph");
                continue;
            }
            let region_id = RegionId(region_index as u32);
            let mut members = Vec::with_capacity(region.port_ids.len());
            let mut seen: HashSet<PortId> = HashSet::with_capacity(region.port_ids.len());
            for member in &region.port_ids {
                let Some(index) = port_names.get_index_of(member) else {
                    debug!(
                        region_id = %region.region_id,
                        port_id = %member,
                        "region member not in port table, skipped"
                    );
                    continue;
                };
                let port = PortId(index as u32);
                if seen.insert(port) {
                    members.push(port);
                    port_regions[index].push(region_id);
                }
            }
            regions.push(RegionData {
                bounds: Rect {
                    min_x: region.min_x,
                    min_y: region.min_y,
                    max_x: region.max_x,
                    max_y: region.max_y,
                },
                members,
            });
        }

        let mut connection_names = IndexSet::with_capacity(graph.connections.len());
        let mut connections = Vec::with_capacity(graph.connections.len());
        let mut raw_connections = Vec::with_capacity(graph.connections.len());
        for connection in &graph.connections {
            let (_, inserted) = connection_names.insert_full(connection.connection_id.clone());
            if !inserted {
                debug!(
                    connection_id = %connection.connection_id,
                    "duplicate connection id in input graph"
                );
                continue;
            }
            connections.push(ConnectionData {
                start: port_names
                    .get_index_of(&connection.start_port_id)
                    .map(|index| PortId(index as u32)),
                end: port_names
                    .get_index_of(&connection.end_port_id)
                    .map(|index| PortId(index as u32)),
            });
            raw_connections.push(connection.clone());
        }

        RoutingGraph {
            port_names,
            port_points,
            region_names,
            regions,
            port_regions,
            connection_names,
            connections,
            raw_connections,
        }
    }

    pub fn port_count(&self) -> usize {
        self.port_points.len()
    }

    pub fn port_point(&self, port: PortId) -> Point {
        self.port_points[port.0 as usize]
    }

    pub fn port_name(&self, port: PortId) -> &str {
        self.port_names
            .get_index(port.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn resolve_port(&self, port_id: &str) -> Option<PortId> {
        self.port_names
            .get_index_of(port_id)
            .map(|index| PortId(index as u32))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region_bounds(&self, region: RegionId) -> Rect {
        self.regions[region.0 as usize].bounds
    }

    pub fn region_members(&self, region: RegionId) -> &[PortId] {
        &self.regions[region.0 as usize].members
    }

    pub fn region_name(&self, region: RegionId) -> &str {
        self.region_names
            .get_index(region.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Regions the port is a member of, in input order.
    pub fn regions_of(&self, port: PortId) -> &[RegionId] {
        &self.port_regions[port.0 as usize]
    }

    /// Whether two ports are members of at least one common region, i.e.
    /// adjacent in one search step.
    pub fn ports_share_region(&self, a: PortId, b: PortId) -> bool {
        self.regions_of(a)
            .iter()
            .any(|region| self.regions_of(b).contains(region))
    }

    /// Whether one region contains both endpoints of both segments: the two
    /// segments occupy the same physical resource.
    pub fn segments_share_region(&self, a1: PortId, a2: PortId, b1: PortId, b2: PortId) -> bool {
        self.regions_of(a1).iter().any(|region| {
            self.regions_of(a2).contains(region)
                && self.regions_of(b1).contains(region)
                && self.regions_of(b2).contains(region)
        })
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection_ids(&self) -> impl Iterator<Item = ConnectionId> {
        (0..self.connections.len() as u32).map(ConnectionId)
    }

    pub fn connection_name(&self, connection: ConnectionId) -> &str {
        self.connection_names
            .get_index(connection.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn resolve_connection(&self, connection_id: &str) -> Option<ConnectionId> {
        self.connection_names
            .get_index_of(connection_id)
            .map(|index| ConnectionId(index as u32))
    }

    pub fn connection(&self, connection: ConnectionId) -> &Connection {
        &self.raw_connections[connection.0 as usize]
    }

    /// Resolved endpoints of a connection; `Err` carries the first missing
    /// port id for diagnostics.
    pub fn connection_endpoints(
        &self,
        connection: ConnectionId,
    ) -> Result<(PortId, PortId), String> {
        let data = &self.connections[connection.0 as usize];
        let raw = &self.raw_connections[connection.0 as usize];
        match (data.start, data.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            (None, _) => Err(raw.start_port_id.clone()),
            (_, None) => Err(raw.end_port_id.clone()),
        }
    }
}
