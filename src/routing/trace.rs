use serde::Serialize;

use crate::geometry::Point;

use super::engine::HyperRouter;

/// Debug palette: region outlines use the fixed stroke, committed routes
/// cycle through the rest by commit order.
const REGION_STROKE: &str = "#ce7b7b";
const ROUTE_STROKES: [&str; 6] = [
    "#2f6fb5", "#3a9d5d", "#b5762f", "#8a4fb5", "#b52f5e", "#2fa6b5",
];
const FRONTIER_STROKE: &str = "#9aa2ab";

#[derive(Clone, Debug, Serialize)]
pub struct SceneRect {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub stroke: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLine {
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<[f64; 2]>,
}

/// Renderable snapshot of the router state: read-only, producible at any
/// point of the lifecycle, consumed by an external debugging UI.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Scene {
    pub title: String,
    pub rects: Vec<SceneRect>,
    pub points: Vec<ScenePoint>,
    pub lines: Vec<SceneLine>,
}

impl HyperRouter {
    /// Project the current solver state into a renderable scene: region
    /// outlines, labeled port markers, dashed lines for unrouted
    /// connections, solid polylines for committed routes, and a bounded
    /// preview of in-progress frontier edges.
    pub fn visualize(&self) -> Scene {
        let mut scene = Scene {
            title: format!(
                "{:?} after {} advances, {}/{} connections routed",
                self.status,
                self.iterations(),
                self.committed.routes().len(),
                self.graph.connection_count()
            ),
            ..Scene::default()
        };

        for index in 0..self.graph.region_count() {
            let region = crate::graph::RegionId(index as u32);
            let bounds = self.graph.region_bounds(region);
            scene.rects.push(SceneRect {
                center: bounds.center(),
                width: bounds.width(),
                height: bounds.height(),
                stroke: REGION_STROKE.to_owned(),
                label: self.graph.region_name(region).to_owned(),
            });
        }

        for index in 0..self.graph.port_count() {
            let port = crate::graph::PortId(index as u32);
            let point = self.graph.port_point(port);
            scene.points.push(ScenePoint {
                x: point.x,
                y: point.y,
                label: format!(
                    "x: {}\ny: {}\nportId: {}",
                    point.x,
                    point.y,
                    self.graph.port_name(port)
                ),
            });
        }

        // Requested-but-unrouted connections as dashed straight lines;
        // dangling endpoints are simply skipped.
        for connection in self.graph.connection_ids() {
            if self.committed.contains(connection) {
                continue;
            }
            let Ok((start, end)) = self.graph.connection_endpoints(connection) else {
                continue;
            };
            scene.lines.push(SceneLine {
                points: vec![self.graph.port_point(start), self.graph.port_point(end)],
                stroke: None,
                stroke_dash: Some([1.0, 2.0]),
            });
        }

        for (index, route) in self.committed.routes().values().enumerate() {
            scene.lines.push(SceneLine {
                points: route
                    .ports
                    .iter()
                    .map(|&port| self.graph.port_point(port))
                    .collect(),
                stroke: Some(ROUTE_STROKES[index % ROUTE_STROKES.len()].to_owned()),
                stroke_dash: None,
            });
        }

        for entry in self.frontier.iter().take(self.config.frontier_preview) {
            let candidate = self.arena.get(entry.candidate);
            let Some(parent) = candidate.parent else {
                continue;
            };
            scene.lines.push(SceneLine {
                points: vec![
                    self.graph.port_point(self.arena.get(parent).port),
                    self.graph.port_point(candidate.port),
                ],
                stroke: Some(FRONTIER_STROKE.to_owned()),
                stroke_dash: Some([1.0, 1.0]),
            });
        }

        scene
    }
}
