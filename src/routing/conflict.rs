use indexmap::IndexMap;
use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{segments_intersect, Point};
use crate::graph::{ConnectionId, PortId, RoutingGraph};

use super::types::Route;

/// One consecutive-port segment of a committed route, indexed by its
/// axis-aligned envelope.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RouteSegment {
    pub connection: ConnectionId,
    pub a: PortId,
    pub b: PortId,
    pub from: Point,
    pub to: Point,
}

impl RTreeObject for RouteSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.from.x, self.from.y], [self.to.x, self.to.y])
    }
}

fn route_segments<'a>(
    graph: &'a RoutingGraph,
    connection: ConnectionId,
    route: &'a Route,
) -> impl Iterator<Item = RouteSegment> + 'a {
    route.segments().map(move |(a, b)| RouteSegment {
        connection,
        a,
        b,
        from: graph.port_point(a),
        to: graph.port_point(b),
    })
}

/// The current best-known global solution: one route per satisfied
/// connection, the ports those routes occupy, and a spatial index over
/// their segments for conflict queries.
#[derive(Default)]
pub(crate) struct CommittedSet {
    routes: IndexMap<ConnectionId, Route>,
    occupancy: hashbrown::HashMap<PortId, ConnectionId>,
    segments: RTree<RouteSegment>,
}

impl CommittedSet {
    /// Committed routes in commit order.
    pub fn routes(&self) -> &IndexMap<ConnectionId, Route> {
        &self.routes
    }

    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.routes.contains_key(&connection)
    }

    /// The committed connection occupying a port, if any. Committed routes
    /// never share ports, so there is at most one.
    pub fn occupant(&self, port: PortId) -> Option<ConnectionId> {
        self.occupancy.get(&port).copied()
    }

    pub fn commit(&mut self, graph: &RoutingGraph, connection: ConnectionId, route: Route) {
        for &port in &route.ports {
            self.occupancy.insert(port, connection);
        }
        for segment in route_segments(graph, connection, &route) {
            self.segments.insert(segment);
        }
        self.routes.insert(connection, route);
    }

    /// Evict a committed route, releasing its ports and segments. Congestion
    /// counters are owned by the engine and deliberately left untouched.
    pub fn rip(&mut self, graph: &RoutingGraph, connection: ConnectionId) -> Option<Route> {
        let route = self.routes.shift_remove(&connection)?;
        for &port in &route.ports {
            self.occupancy.remove(&port);
        }
        for segment in route_segments(graph, connection, &route) {
            self.segments.remove(&segment);
        }
        Some(route)
    }

    fn segment_hits<'a>(
        &'a self,
        graph: &'a RoutingGraph,
        a: PortId,
        b: PortId,
    ) -> impl Iterator<Item = &'a RouteSegment> + 'a {
        let from = graph.port_point(a);
        let to = graph.port_point(b);
        let envelope = AABB::from_corners([from.x, from.y], [to.x, to.y]);
        self.segments
            .locate_in_envelope_intersecting(&envelope)
            .filter(move |segment| {
                segments_intersect(from, to, segment.from, segment.to)
                    && graph.segments_share_region(a, b, segment.a, segment.b)
            })
    }

    /// Whether the single step (a, b) crosses any committed segment inside a
    /// shared region. This is the two-point form used to price moves.
    pub fn step_crosses_committed(&self, graph: &RoutingGraph, a: PortId, b: PortId) -> bool {
        self.segment_hits(graph, a, b).next().is_some()
    }

    /// Committed connections whose routes conflict with the candidate path:
    /// some segment of theirs intersects some segment of the candidate and
    /// both segments lie inside one common region. Returned in commit order.
    pub fn conflicting_routes(&self, graph: &RoutingGraph, path: &[PortId]) -> Vec<ConnectionId> {
        let mut hits: Vec<ConnectionId> = Vec::new();
        for pair in path.windows(2) {
            for segment in self.segment_hits(graph, pair[0], pair[1]) {
                if !hits.contains(&segment.connection) {
                    hits.push(segment.connection);
                }
            }
        }
        // The R-tree yields matches in tree order; report in commit order.
        hits.sort_by_key(|connection| self.routes.get_index_of(connection));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, RoutingGraph};
    use serde_json::json;

    fn graph(regions: serde_json::Value) -> RoutingGraph {
        let graph: Graph = serde_json::from_value(json!({
            "regions": regions,
            "ports": [
                { "x": 0.0, "y": 5.0, "portId": "A" },
                { "x": 10.0, "y": 5.0, "portId": "B" },
                { "x": 5.0, "y": 0.0, "portId": "C" },
                { "x": 5.0, "y": 10.0, "portId": "D" }
            ],
            "connections": [
                { "startPortId": "A", "endPortId": "B", "connectionId": "c1" },
                { "startPortId": "C", "endPortId": "D", "connectionId": "c2" }
            ]
        }))
        .expect("fixture graph");
        RoutingGraph::new(graph)
    }

    fn one_region() -> RoutingGraph {
        graph(json!([{
            "minX": 0.0, "maxX": 10.0, "minY": 0.0, "maxY": 10.0,
            "regionId": "r1",
            "portIds": ["A", "B", "C", "D"]
        }]))
    }

    fn two_regions() -> RoutingGraph {
        graph(json!([
            {
                "minX": 0.0, "maxX": 10.0, "minY": 0.0, "maxY": 10.0,
                "regionId": "r1",
                "portIds": ["A", "B"]
            },
            {
                "minX": 0.0, "maxX": 10.0, "minY": 0.0, "maxY": 10.0,
                "regionId": "r2",
                "portIds": ["C", "D"]
            }
        ]))
    }

    fn ports(graph: &RoutingGraph, ids: &[&str]) -> Vec<PortId> {
        ids.iter()
            .map(|id| graph.resolve_port(id).expect("known port"))
            .collect()
    }

    #[test]
    fn crossing_segments_in_shared_region_conflict() {
        let graph = one_region();
        let ab = ports(&graph, &["A", "B"]);
        let cd = ports(&graph, &["C", "D"]);
        let c1 = graph.resolve_connection("c1").unwrap();

        let mut committed = CommittedSet::default();
        committed.commit(&graph, c1, Route::new(ab));
        assert_eq!(committed.conflicting_routes(&graph, &cd), vec![c1]);
        assert!(committed.step_crosses_committed(&graph, cd[0], cd[1]));
    }

    #[test]
    fn crossing_segments_in_different_regions_do_not_conflict() {
        let graph = two_regions();
        let ab = ports(&graph, &["A", "B"]);
        let cd = ports(&graph, &["C", "D"]);
        let c1 = graph.resolve_connection("c1").unwrap();

        let mut committed = CommittedSet::default();
        committed.commit(&graph, c1, Route::new(ab));
        assert!(committed.conflicting_routes(&graph, &cd).is_empty());
        assert!(!committed.step_crosses_committed(&graph, cd[0], cd[1]));
    }

    #[test]
    fn rip_releases_ports_and_segments() {
        let graph = one_region();
        let ab = ports(&graph, &["A", "B"]);
        let cd = ports(&graph, &["C", "D"]);
        let c1 = graph.resolve_connection("c1").unwrap();

        let mut committed = CommittedSet::default();
        committed.commit(&graph, c1, Route::new(ab.clone()));
        assert_eq!(committed.occupant(ab[0]), Some(c1));

        let ripped = committed.rip(&graph, c1).expect("was committed");
        assert_eq!(ripped.ports, ab);
        assert!(!committed.contains(c1));
        assert_eq!(committed.occupant(ab[0]), None);
        assert!(committed.conflicting_routes(&graph, &cd).is_empty());
        assert!(committed.rip(&graph, c1).is_none());
    }

    #[test]
    fn conflicts_are_reported_in_commit_order() {
        let graph = one_region();
        let c1 = graph.resolve_connection("c1").unwrap();
        let c2 = graph.resolve_connection("c2").unwrap();
        let a = graph.resolve_port("A").unwrap();
        let b = graph.resolve_port("B").unwrap();
        let c = graph.resolve_port("C").unwrap();
        let d = graph.resolve_port("D").unwrap();

        // Commit c2 first, then c1; a candidate crossing both must report
        // them in that order.
        let mut committed = CommittedSet::default();
        committed.commit(&graph, c2, Route::new(vec![c, d]));
        committed.commit(&graph, c1, Route::new(vec![a, b]));
        let diagonal = vec![a, d];
        assert_eq!(
            committed.conflicting_routes(&graph, &diagonal),
            vec![c2, c1]
        );
    }
}
