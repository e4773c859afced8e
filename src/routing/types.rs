use crate::graph::PortId;

/// Tunables of the negotiated-congestion cost model.
#[derive(Clone, PartialEq, Debug)]
pub struct RouterConfig {
    /// Surcharge for a step whose segment crosses a committed route inside a
    /// shared region. Large enough to dominate any plain distance cost.
    pub ripping_cost: f64,
    /// Per-use surcharge for ports already carrying committed routes.
    pub congestion_multiplier: f64,
    /// Hard cap on `advance()` calls; `None` means unbounded. A graph where
    /// rip-up keeps evicting and re-admitting the same connections never
    /// terminates on its own, so drivers should set this.
    pub max_advances: Option<u64>,
    /// Number of frontier edges included in a visualization snapshot.
    pub frontier_preview: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            ripping_cost: 5000.0,
            congestion_multiplier: 10.0,
            max_advances: None,
            frontier_preview: 20,
        }
    }
}

/// Lifecycle of the router.
///
/// `Initializing → Searching ⇄ AdvancingConnection → Solved`, with
/// `Searching → Failed`. `Solved` and `Failed` are terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolverStatus {
    Initializing,
    Searching,
    AdvancingConnection,
    Solved,
    Failed,
}

impl SolverStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SolverStatus::Solved | SolverStatus::Failed)
    }
}

/// The accepted solution for one connection: an ordered port sequence from
/// the declared start port to the declared end port.
#[derive(Clone, PartialEq, Debug)]
pub struct Route {
    pub ports: Vec<PortId>,
}

impl Route {
    pub fn new(ports: Vec<PortId>) -> Self {
        Route { ports }
    }

    /// Consecutive port pairs of the route.
    pub fn segments(&self) -> impl Iterator<Item = (PortId, PortId)> + '_ {
        self.ports.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
