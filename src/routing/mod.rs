mod candidate;
mod conflict;
mod cost;
mod engine;
mod error;
mod trace;
mod types;

pub use engine::HyperRouter;
pub use error::RouteError;
pub use trace::{Scene, SceneLine, ScenePoint, SceneRect};
pub use types::{Route, RouterConfig, SolverStatus};
