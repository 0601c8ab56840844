//! Splitting a solved path into per-line legs.

use serde::Serialize;

use crate::domain::{FALLBACK_COLOR, Line, LineId, NodeId};
use crate::graph::Graph;

/// Name shown for a leg whose line is not in the graph.
const UNKNOWN_LINE: &str = "Unknown Line";

/// One contiguous ride on a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub line_id: LineId,
    pub line_name: String,
    pub line_color: String,
    pub from_station: String,
    pub to_station: String,
    /// Physical stops ridden on this leg.
    pub station_count: u32,
}

/// Leg being accumulated during the walk.
struct OpenLeg {
    line_id: LineId,
    from_station: String,
    count: u32,
}

/// Split a path into legs, one per run of same-line nodes.
///
/// A leg ends at the last node before the line changes. A trailing leg with
/// no physical stops (a path that ends on a transfer) is dropped. Nodes not
/// in the graph are skipped.
pub fn segment(graph: &Graph, path: &[NodeId]) -> Vec<RouteLeg> {
    let mut legs = Vec::new();
    let mut open: Option<OpenLeg> = None;
    let mut prev: Option<NodeId> = None;

    for &id in path {
        let Some(node) = graph.node(id) else {
            continue;
        };

        match open.as_mut() {
            None => {
                open = Some(OpenLeg {
                    line_id: node.line_id,
                    from_station: node.station_name.clone(),
                    count: 0,
                });
            }
            Some(leg) if leg.line_id == node.line_id => {
                if prev.is_some_and(|p| !graph.is_transfer(p, id)) {
                    leg.count += 1;
                }
            }
            Some(leg) => {
                let to_station = prev
                    .and_then(|p| graph.node(p))
                    .map(|n| n.station_name.clone())
                    .unwrap_or_default();
                legs.push(close(graph, leg, to_station));
                *leg = OpenLeg {
                    line_id: node.line_id,
                    from_station: node.station_name.clone(),
                    count: 0,
                };
            }
        }
        prev = Some(id);
    }

    if let (Some(leg), Some(last)) = (open.as_ref(), prev.and_then(|p| graph.node(p)))
        && leg.count > 0
    {
        legs.push(close(graph, leg, last.station_name.clone()));
    }

    legs
}

fn close(graph: &Graph, leg: &OpenLeg, to_station: String) -> RouteLeg {
    let line = graph.line(leg.line_id);

    RouteLeg {
        line_id: leg.line_id,
        line_name: line.map_or(UNKNOWN_LINE, |l| l.name.as_str()).to_string(),
        line_color: line.map_or_else(|| FALLBACK_COLOR.to_string(), Line::display_color),
        from_station: leg.from_station.clone(),
        to_station,
        station_count: leg.count,
    }
}
