use crate::event::{PlayerId, PASS};
use crate::network::team_network;
use crate::registry::PlayerRegistry;
use crate::store::EventStore;
use crate::tally::{tally, Tally, DUEL_EVENTS};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusiestPair {
    pub player_id: PlayerId,
    pub recipient_id: PlayerId,
    pub pass_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub opponent: Option<String>,
    pub formation: Option<u32>,
    /// The formation in force at the match's last event, after any tactical shifts.
    pub final_formation: Option<u32>,
    pub passes: usize,
    pub completed_passes: usize,
    pub nodes: usize,
    pub edges: usize,
    pub busiest_pair: Option<BusiestPair>,
    pub tally: Tally,
    pub skipped_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedMatch {
    pub match_id: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SeasonSummary {
    pub matches: Vec<MatchSummary>,
    pub skipped: Vec<SkippedMatch>,
}

pub fn summarize_match(store: &EventStore, team_id: u32, starters_only: bool) -> MatchSummary {
    let registry = PlayerRegistry::build(store);
    let network = team_network(store, &registry, team_id, starters_only);
    let passes = store.team_events(team_id, PASS);

    // widest edge first; ties go to the first pair in id order
    let busiest_pair = network
        .edges
        .iter()
        .max_by(|a, b| {
            a.edge
                .pass_count
                .cmp(&b.edge.pass_count)
                .then_with(|| b.edge.player_id.cmp(&a.edge.player_id))
                .then_with(|| b.edge.recipient_id.cmp(&a.edge.recipient_id))
        })
        .map(|e| BusiestPair {
            player_id: e.edge.player_id.clone(),
            recipient_id: e.edge.recipient_id.clone(),
            pass_count: e.edge.pass_count,
        });

    MatchSummary {
        match_id: store.match_id().to_owned(),
        opponent: registry.sides(team_id).map(|sides| sides.opponent.name),
        formation: registry.formation(team_id),
        final_formation: store
            .events()
            .last()
            .and_then(|last| registry.formation_at(team_id, last.index)),
        passes: passes.len(),
        completed_passes: passes
            .iter()
            .filter(|e| e.pass.as_ref().map_or(false, |p| p.is_complete()))
            .count(),
        nodes: network.nodes.len(),
        edges: network.edges.len(),
        busiest_pair,
        tally: tally(store.events(), &DUEL_EVENTS, Some(team_id), None),
        skipped_events: store.skipped(),
    }
}

/// Summarises each match on its own, in parallel. Matches that fail to load are reported as
/// skipped.
#[instrument(name = "season_summary", skip(data_dir, match_ids), fields(matches = match_ids.len()))]
pub fn season_summary(
    data_dir: &Path,
    match_ids: &[String],
    team_id: u32,
    starters_only: bool,
) -> SeasonSummary {
    let results: Vec<Result<MatchSummary, SkippedMatch>> = match_ids
        .par_iter()
        .map(|match_id| match EventStore::load(data_dir, match_id) {
            Ok(store) => Ok(summarize_match(&store, team_id, starters_only)),
            Err(err) => {
                warn!(%match_id, %err, "skipping match");
                Err(SkippedMatch {
                    match_id: match_id.clone(),
                    reason: err.to_string(),
                })
            }
        })
        .collect();

    let mut summary = SeasonSummary::default();
    for result in results {
        match result {
            Ok(m) => summary.matches.push(m),
            Err(s) => summary.skipped.push(s),
        }
    }
    info!(
        summarized = summary.matches.len(),
        skipped = summary.skipped.len(),
        "season summary done"
    );
    summary
}
