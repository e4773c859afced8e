use crate::graph::PortId;

/// Handle into the per-search candidate arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CandidateId(u32);

/// One partial-path state of the best-first search. Candidates form a tree:
/// each node has at most one parent and may parent many children.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub port: PortId,
    pub g: f64,
    pub parent: Option<CandidateId>,
}

/// Arena holding every candidate of the connection search in progress.
/// Cleared in one shot when the engine advances to the next connection,
/// which also invalidates all outstanding handles.
#[derive(Default)]
pub(crate) struct CandidateArena {
    nodes: Vec<Candidate>,
}

impl CandidateArena {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn push(&mut self, port: PortId, g: f64, parent: Option<CandidateId>) -> CandidateId {
        let id = CandidateId(self.nodes.len() as u32);
        self.nodes.push(Candidate { port, g, parent });
        id
    }

    pub fn get(&self, id: CandidateId) -> &Candidate {
        &self.nodes[id.0 as usize]
    }

    /// Walk parent handles back to the origin and return the port sequence
    /// in start-to-end order.
    pub fn reconstruct_path(&self, terminal: CandidateId) -> Vec<PortId> {
        let mut path = Vec::new();
        let mut cursor = Some(terminal);
        while let Some(id) = cursor {
            let candidate = self.get(id);
            path.push(candidate.port);
            cursor = candidate.parent;
        }
        path.reverse();
        path
    }
}
