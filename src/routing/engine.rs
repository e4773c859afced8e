use std::collections::{BinaryHeap, VecDeque};

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::graph::{ConnectionId, Graph, PortId, RoutingGraph};

use super::candidate::{CandidateArena, CandidateId};
use super::conflict::CommittedSet;
use super::cost::{gcost, hcost};
use super::error::RouteError;
use super::types::{Route, RouterConfig, SolverStatus};

/// Frontier entry ordered for a min-heap on `f = g + h`, ties broken by
/// insertion sequence (earlier wins).
#[derive(Debug)]
pub(crate) struct FrontierEntry {
    pub f: f64,
    pub seq: u64,
    pub candidate: CandidateId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Inverted so that BinaryHeap::pop yields the smallest f, then the
        // earliest insertion. Costs are finite, total_cmp is a total order.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Incremental congestion-negotiated router over a region hypergraph.
///
/// The router owns all solver state; an external driver repeatedly calls
/// [`advance`](HyperRouter::advance) until [`solved`](HyperRouter::solved) or
/// [`failed`](HyperRouter::failed). Each call performs exactly one
/// transition of the solver state machine, so it is safe to interleave with
/// rendering or UI ticks.
pub struct HyperRouter {
    pub(crate) graph: RoutingGraph,
    pub(crate) config: RouterConfig,
    pub(crate) status: SolverStatus,
    pub(crate) error: Option<RouteError>,
    pub(crate) queue: VecDeque<ConnectionId>,
    pub(crate) current: Option<(ConnectionId, PortId)>,
    pub(crate) arena: CandidateArena,
    pub(crate) frontier: BinaryHeap<FrontierEntry>,
    frontier_seq: u64,
    visited: HashSet<PortId>,
    pub(crate) committed: CommittedSet,
    congestion: HashMap<PortId, u32>,
    advances: u64,
}

impl HyperRouter {
    pub fn new(graph: Graph) -> Self {
        Self::with_config(graph, RouterConfig::default())
    }

    pub fn with_config(graph: Graph, config: RouterConfig) -> Self {
        let graph = RoutingGraph::new(graph);
        let queue: VecDeque<ConnectionId> = graph.connection_ids().collect();
        let mut router = HyperRouter {
            graph,
            config,
            status: SolverStatus::Initializing,
            error: None,
            queue,
            current: None,
            arena: CandidateArena::default(),
            frontier: BinaryHeap::new(),
            frontier_seq: 0,
            visited: HashSet::new(),
            committed: CommittedSet::default(),
            congestion: HashMap::new(),
            advances: 0,
        };
        if router.queue.is_empty() {
            router.fail(RouteError::EmptyInput);
        } else {
            router.begin_next_connection();
        }
        router
    }

    /// Perform one discrete step: one frontier expansion, one
    /// connection-completion transition (commit plus rip-up), or one pop of
    /// the next queued connection. Calling after a terminal state is a
    /// logged no-op.
    pub fn advance(&mut self) -> SolverStatus {
        if self.status.is_terminal() {
            warn!(status = ?self.status, "advance called after terminal state");
            return self.status;
        }
        if let Some(limit) = self.config.max_advances {
            if self.advances >= limit {
                self.fail(RouteError::NoConvergence {
                    advances: self.advances,
                });
                return self.status;
            }
        }
        self.advances += 1;
        if self.status == SolverStatus::AdvancingConnection {
            self.begin_next_connection();
        } else {
            self.step();
        }
        self.status
    }

    fn step(&mut self) {
        let Some((connection, target)) = self.current else {
            return;
        };

        // Pop until an admissible candidate: not yet visited, not occupied
        // by a committed route of another connection.
        let chosen = loop {
            let Some(entry) = self.frontier.pop() else {
                self.fail(RouteError::FrontierExhausted {
                    connection_id: self.graph.connection_name(connection).to_owned(),
                });
                return;
            };
            let port = self.arena.get(entry.candidate).port;
            if self.visited.contains(&port) {
                continue;
            }
            if self
                .committed
                .occupant(port)
                .is_some_and(|owner| owner != connection)
            {
                continue;
            }
            break entry.candidate;
        };

        let port = self.arena.get(chosen).port;
        self.visited.insert(port);

        if port == target {
            self.complete_connection(connection, chosen);
            return;
        }

        // Hyperedge expansion: every unvisited member of every region the
        // current port belongs to. Ports reachable through several shared
        // regions are enqueued once per region and deduplicated by the
        // visited check on pop.
        let parent_g = self.arena.get(chosen).g;
        for &region in self.graph.regions_of(port) {
            for &member in self.graph.region_members(region) {
                if self.visited.contains(&member) {
                    continue;
                }
                let g = gcost(
                    &self.graph,
                    &self.committed,
                    &self.congestion,
                    &self.config,
                    port,
                    parent_g,
                    member,
                );
                let f = g + hcost(&self.graph, member, target);
                let candidate = self.arena.push(member, g, Some(chosen));
                self.frontier.push(FrontierEntry {
                    f,
                    seq: self.frontier_seq,
                    candidate,
                });
                self.frontier_seq += 1;
            }
        }
    }

    fn complete_connection(&mut self, connection: ConnectionId, terminal: CandidateId) {
        let path = self.arena.reconstruct_path(terminal);

        // Rip up every committed route the new path conflicts with and
        // requeue the evicted connections at the front, first conflict
        // frontmost.
        let conflicts = self.committed.conflicting_routes(&self.graph, &path);
        for &evicted in conflicts.iter().rev() {
            if self.committed.rip(&self.graph, evicted).is_some() {
                self.queue.push_front(evicted);
                debug!(
                    connection = %self.graph.connection_name(evicted),
                    evicted_by = %self.graph.connection_name(connection),
                    "ripped committed route, requeued at front"
                );
            }
        }

        for &port in &path {
            *self.congestion.entry(port).or_insert(0) += 1;
        }
        debug!(
            connection = %self.graph.connection_name(connection),
            ports = path.len(),
            "committed route"
        );
        self.committed.commit(&self.graph, connection, Route::new(path));

        if self.queue.is_empty() {
            self.current = None;
            self.status = SolverStatus::Solved;
            info!(
                routes = self.committed.routes().len(),
                advances = self.advances,
                "all connections routed"
            );
        } else {
            // The pop of the next queued connection is deferred to the next
            // advance, so ripped-up connections stay observable in `pending`
            // after the commit that evicted them.
            self.current = None;
            self.status = SolverStatus::AdvancingConnection;
        }
    }

    /// Pop the next queued connection and reseed the search state.
    fn begin_next_connection(&mut self) {
        self.status = SolverStatus::AdvancingConnection;
        let Some(connection) = self.queue.pop_front() else {
            self.current = None;
            self.status = SolverStatus::Solved;
            return;
        };
        match self.graph.connection_endpoints(connection) {
            Ok((start, end)) => {
                self.current = Some((connection, end));
                self.arena.clear();
                self.visited.clear();
                self.frontier.clear();
                self.frontier_seq = 0;
                let origin = self.arena.push(start, 0.0, None);
                let f = hcost(&self.graph, start, end);
                self.frontier.push(FrontierEntry {
                    f,
                    seq: self.frontier_seq,
                    candidate: origin,
                });
                self.frontier_seq += 1;
                self.status = SolverStatus::Searching;
                debug!(
                    connection = %self.graph.connection_name(connection),
                    start = %self.graph.port_name(start),
                    end = %self.graph.port_name(end),
                    "searching connection"
                );
            }
            Err(port_id) => {
                self.fail(RouteError::DanglingPortReference {
                    connection_id: self.graph.connection_name(connection).to_owned(),
                    port_id,
                });
            }
        }
    }

    fn fail(&mut self, error: RouteError) {
        info!(%error, "routing failed");
        self.current = None;
        self.status = SolverStatus::Failed;
        self.error = Some(error);
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn solved(&self) -> bool {
        self.status == SolverStatus::Solved
    }

    pub fn failed(&self) -> bool {
        self.status == SolverStatus::Failed
    }

    pub fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }

    /// Number of `advance` calls performed so far.
    pub fn iterations(&self) -> u64 {
        self.advances
    }

    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Committed routes in commit order, as (connection id, port ids).
    pub fn routes(&self) -> Vec<(&str, Vec<&str>)> {
        self.committed
            .routes()
            .iter()
            .map(|(&connection, route)| {
                (
                    self.graph.connection_name(connection),
                    route
                        .ports
                        .iter()
                        .map(|&port| self.graph.port_name(port))
                        .collect(),
                )
            })
            .collect()
    }

    /// The committed route for one connection, as port ids.
    pub fn route(&self, connection_id: &str) -> Option<Vec<&str>> {
        let connection = self.graph.resolve_connection(connection_id)?;
        let route = self.committed.routes().get(&connection)?;
        Some(
            route
                .ports
                .iter()
                .map(|&port| self.graph.port_name(port))
                .collect(),
        )
    }

    /// Connections still waiting to be attempted (or re-attempted after a
    /// rip-up), front first.
    pub fn pending(&self) -> Vec<&str> {
        self.queue
            .iter()
            .map(|&connection| self.graph.connection_name(connection))
            .collect()
    }

    /// Committed-route usage count of a port. Monotonic for the lifetime of
    /// the router; ripping a route does not decrement its ports.
    pub fn congestion(&self, port_id: &str) -> u32 {
        self.graph
            .resolve_port(port_id)
            .and_then(|port| self.congestion.get(&port).copied())
            .unwrap_or(0)
    }
}
