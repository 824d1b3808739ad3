use crate::event::{Event, PlayerId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Event types summarised on the radar chart. Passes are deliberately absent.
pub const DUEL_EVENTS: [&str; 14] = [
    "Miscontrol",
    "Block",
    "Foul Committed",
    "Foul Won",
    "Interception",
    "Ball Recovery",
    "Shot",
    "Goal Keeper",
    "Duel",
    "Clearance",
    "Dribble",
    "Dispossessed",
    "Dribbled Past",
    "Bad Behaviour",
];

/// Occurrences per event type name, in alphabetical order.
pub type Tally = BTreeMap<String, u32>;

/// Counts events whose type is in `allow_list`, optionally only those in possession of
/// `team_id` and only those by `player_id`.
pub fn tally<'a, I>(
    events: I,
    allow_list: &[&str],
    team_id: Option<u32>,
    player_id: Option<&PlayerId>,
) -> Tally
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut tally = Tally::new();
    for event in events {
        if !allow_list.contains(&event.kind.name.as_str()) {
            continue;
        }
        if team_id.map_or(false, |id| event.possession_team_id() != Some(id)) {
            continue;
        }
        if player_id.map_or(false, |id| event.player_id() != Some(id)) {
            continue;
        }
        *tally.entry(event.kind.name.clone()).or_default() += 1;
    }
    tally
}

/// The two radar tallies for a match.
///
/// `unrestricted` scans every event regardless of team, so it includes everything in `team`;
/// it is not an opponent-only count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventTallies {
    pub team: Tally,
    pub unrestricted: Tally,
}

pub fn event_tallies(events: &[Event], team_id: u32, player_id: Option<&PlayerId>) -> EventTallies {
    EventTallies {
        team: tally(events, &DUEL_EVENTS, Some(team_id), player_id),
        unrestricted: tally(events, &DUEL_EVENTS, None, player_id),
    }
}
