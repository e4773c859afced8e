//! Incremental, congestion-negotiated routing over a hypergraph of spatial
//! regions.
//!
//! The input is a [`Graph`] of regions, ports and requested connections.
//! A region is a hyperedge: every pair of its member ports is adjacent in
//! one search step. [`HyperRouter`] resolves the connections one at a time
//! with a best-first search whose costs fold in distance, a penalty for
//! crossing committed routes, and an escalating congestion surcharge; when a
//! freshly completed route conflicts with already committed ones, those are
//! ripped up and requeued at the front.
//!
//! The router is step-driven: each [`HyperRouter::advance`] call does exactly
//! one frontier expansion or one connection-completion transition, and an
//! external driver loops until [`HyperRouter::solved`] or
//! [`HyperRouter::failed`]. [`HyperRouter::visualize`] projects the current
//! state into a serializable debug scene without mutating anything.

pub mod geometry;
pub mod graph;
pub mod routing;

pub use graph::{Connection, Graph, Port, Region, RoutingGraph};
pub use routing::{HyperRouter, RouteError, RouterConfig, Scene, SolverStatus};
