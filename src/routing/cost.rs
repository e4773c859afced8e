use hashbrown::HashMap;

use crate::graph::{PortId, RoutingGraph};

use super::conflict::CommittedSet;
use super::types::RouterConfig;

/// Heuristic remaining cost: Euclidean distance to the current target.
/// Admissible for the distance component of `gcost`; the penalty terms are
/// surcharges the heuristic does not anticipate.
pub(crate) fn hcost(graph: &RoutingGraph, port: PortId, target: PortId) -> f64 {
    graph.port_point(port).distance(&graph.port_point(target))
}

/// Accumulated cost of stepping from a parent candidate to `port`:
/// parent cost, plus Euclidean step distance, plus a ripping penalty when
/// the step crosses a committed route inside a shared region, plus a
/// congestion penalty proportional to how many committed routes already
/// used the port.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gcost(
    graph: &RoutingGraph,
    committed: &CommittedSet,
    congestion: &HashMap<PortId, u32>,
    config: &RouterConfig,
    parent_port: PortId,
    parent_g: f64,
    port: PortId,
) -> f64 {
    let distance = graph
        .port_point(parent_port)
        .distance(&graph.port_point(port));

    let ripping = if graph.ports_share_region(parent_port, port)
        && committed.step_crosses_committed(graph, parent_port, port)
    {
        config.ripping_cost
    } else {
        0.0
    };

    let congestion_cost =
        congestion.get(&port).copied().unwrap_or(0) as f64 * config.congestion_multiplier;

    parent_g + distance + ripping + congestion_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::routing::types::Route;
    use serde_json::json;

    fn cross_graph() -> RoutingGraph {
        let graph: Graph = serde_json::from_value(json!({
            "regions": [{
                "minX": 0.0, "maxX": 10.0, "minY": 0.0, "maxY": 10.0,
                "regionId": "r1",
                "portIds": ["A", "B", "C", "D"]
            }],
            "ports": [
                { "x": 0.0, "y": 5.0, "portId": "A" },
                { "x": 10.0, "y": 5.0, "portId": "B" },
                { "x": 5.0, "y": 0.0, "portId": "C" },
                { "x": 5.0, "y": 10.0, "portId": "D" }
            ],
            "connections": [
                { "startPortId": "C", "endPortId": "D", "connectionId": "c2" }
            ]
        }))
        .expect("fixture graph");
        RoutingGraph::new(graph)
    }

    #[test]
    fn hcost_is_distance_to_target() {
        let graph = cross_graph();
        let c = graph.resolve_port("C").unwrap();
        let d = graph.resolve_port("D").unwrap();
        assert!((hcost(&graph, c, d) - 10.0).abs() < 1e-12);
        assert_eq!(hcost(&graph, d, d), 0.0);
    }

    #[test]
    fn gcost_accumulates_distance_from_parent() {
        let graph = cross_graph();
        let c = graph.resolve_port("C").unwrap();
        let d = graph.resolve_port("D").unwrap();
        let committed = CommittedSet::default();
        let congestion = HashMap::new();
        let config = RouterConfig::default();

        let g = gcost(&graph, &committed, &congestion, &config, c, 3.0, d);
        assert!((g - 13.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_a_committed_route_adds_the_ripping_cost() {
        let graph = cross_graph();
        let a = graph.resolve_port("A").unwrap();
        let b = graph.resolve_port("B").unwrap();
        let c = graph.resolve_port("C").unwrap();
        let d = graph.resolve_port("D").unwrap();
        let config = RouterConfig::default();
        let congestion = HashMap::new();

        let mut committed = CommittedSet::default();
        committed.commit(
            &graph,
            graph.resolve_connection("c2").unwrap(),
            Route::new(vec![a, b]),
        );

        let g = gcost(&graph, &committed, &congestion, &config, c, 0.0, d);
        assert!((g - (10.0 + config.ripping_cost)).abs() < 1e-12);
    }

    #[test]
    fn congested_ports_cost_extra_per_prior_use() {
        let graph = cross_graph();
        let c = graph.resolve_port("C").unwrap();
        let d = graph.resolve_port("D").unwrap();
        let committed = CommittedSet::default();
        let config = RouterConfig::default();

        let mut congestion = HashMap::new();
        congestion.insert(d, 3u32);

        let g = gcost(&graph, &committed, &congestion, &config, c, 0.0, d);
        assert!((g - (10.0 + 3.0 * config.congestion_multiplier)).abs() < 1e-12);
    }
}
