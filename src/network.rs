use crate::aggregate::{aggregate, PassEdge, PlayerAverageLocation};
use crate::event::{PlayerId, PASS};
use crate::registry::{Player, PlayerRegistry};
use crate::store::EventStore;
use crate::util::{lerp, scale};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, instrument};

pub const MAX_LINE_WIDTH: f64 = 18.0;
pub const MAX_MARKER_SIZE: f64 = 3000.0;
pub const MIN_FONT_SIZE: f64 = 10.0;
pub const MAX_FONT_SIZE: f64 = 20.0;
pub const MIN_TRANSPARENCY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEdge {
    #[serde(flatten)]
    pub edge: PassEdge,
    pub width: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    #[serde(flatten)]
    pub location: PlayerAverageLocation,
    pub player_name: Option<String>,
    pub jersey_number: Option<u32>,
    pub position_id: Option<u32>,
    pub position_name: Option<String>,
    pub position_abbreviation: Option<&'static str>,
    pub marker_size: f64,
    pub normalized_marker_size: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassNetwork {
    pub edges: Vec<NetworkEdge>,
    pub nodes: Vec<NetworkNode>,
}

/// Keeps the edges with both ends in `roster_filter` and the nodes in it, then sizes them for
/// drawing against the busiest remaining edge and node.
pub fn build_network(
    edges: &[PassEdge],
    node_locations: &[PlayerAverageLocation],
    roster_filter: &FxHashSet<PlayerId>,
    player_index: &FxHashMap<PlayerId, Player>,
) -> PassNetwork {
    let edges: Vec<&PassEdge> = edges
        .iter()
        .filter(|e| roster_filter.contains(&e.player_id) && roster_filter.contains(&e.recipient_id))
        .collect();
    let nodes: Vec<&PlayerAverageLocation> = node_locations
        .iter()
        .filter(|l| roster_filter.contains(&l.player_id))
        .collect();

    PassNetwork {
        edges: scale_edges(&edges),
        nodes: scale_nodes(&nodes, player_index),
    }
}

fn scale_edges(edges: &[&PassEdge]) -> Vec<NetworkEdge> {
    let max = match edges.iter().map(|e| e.pass_count).max() {
        Some(max) => max,
        None => return Vec::new(),
    };
    edges
        .iter()
        .map(|&edge| NetworkEdge {
            edge: edge.clone(),
            width: scale(edge.pass_count, max, MAX_LINE_WIDTH),
            alpha: lerp(scale(edge.pass_count, max, 1.0), MIN_TRANSPARENCY, 1.0),
        })
        .collect()
}

fn scale_nodes(
    nodes: &[&PlayerAverageLocation],
    player_index: &FxHashMap<PlayerId, Player>,
) -> Vec<NetworkNode> {
    let max = match nodes.iter().map(|l| l.total_passes).max() {
        Some(max) => max,
        None => return Vec::new(),
    };
    let marker_sizes: Vec<f64> = nodes
        .iter()
        .map(|l| scale(l.total_passes, max, MAX_MARKER_SIZE))
        .collect();
    let max_marker = marker_sizes.iter().copied().fold(0.0, f64::max);

    nodes
        .iter()
        .zip(marker_sizes)
        .map(|(&location, marker_size)| {
            let player = player_index.get(&location.player_id);
            let normalized_marker_size = marker_size / max_marker;
            NetworkNode {
                location: location.clone(),
                player_name: player.map(|p| p.name.clone()),
                jersey_number: player.and_then(|p| p.jersey_number),
                position_id: player.and_then(|p| p.position_id),
                position_name: player.and_then(|p| p.position_name.clone()),
                position_abbreviation: player.and_then(|p| p.position_abbreviation),
                marker_size,
                normalized_marker_size,
                font_size: lerp(normalized_marker_size, MIN_FONT_SIZE, MAX_FONT_SIZE),
            }
        })
        .collect()
}

/// The full pipeline for one team in one match: its passes, aggregated, filtered to its roster.
#[instrument(name = "team_network", skip(store, registry), fields(match_id = store.match_id()))]
pub fn team_network(
    store: &EventStore,
    registry: &PlayerRegistry,
    team_id: u32,
    starters_only: bool,
) -> PassNetwork {
    let passes = store.team_events(team_id, PASS);
    let aggregates = aggregate(&passes);
    let network = build_network(
        &aggregates.edges,
        &aggregates.locations,
        &registry.roster_ids(team_id, starters_only),
        &registry.player_index(),
    );
    debug!(
        nodes = network.nodes.len(),
        edges = network.edges.len(),
        "built pass network"
    );
    network
}
