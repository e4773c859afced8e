use thiserror::Error;

/// Terminal failures of the router. The engine surfaces one of these,
/// flips to `Failed` and stops advancing; none of them is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no connections to route")]
    EmptyInput,

    #[error("frontier exhausted before reaching the target of connection `{connection_id}`")]
    FrontierExhausted { connection_id: String },

    #[error("connection `{connection_id}` references unknown port `{port_id}`")]
    DanglingPortReference {
        connection_id: String,
        port_id: String,
    },

    #[error("routing did not converge within {advances} advances")]
    NoConvergence { advances: u64 },
}
