use crate::event::{Event, PlayerId};
use crate::pitch::Location;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

/// Without a player filter, the pass map only shows the start of the match.
pub const PASS_MAP_LIMIT: usize = 100;

/// The parts of a pass the aggregation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub passer: PlayerId,
    pub recipient: Option<PlayerId>,
    pub origin: Option<Location>,
}

impl PassRecord {
    /// Passes without a passer cannot be attributed to anyone and yield `None`.
    pub fn from_event(event: &Event) -> Option<PassRecord> {
        let passer = event.player_id()?.clone();
        let recipient = event
            .pass
            .as_ref()
            .and_then(|pass| pass.recipient.as_ref())
            .map(|recipient| recipient.id.clone());
        Some(PassRecord {
            passer,
            recipient,
            origin: event.location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAverageLocation {
    pub player_id: PlayerId,
    /// Mean origin of the player's passes; absent for players who only ever received.
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub passes_given: u32,
    pub passes_received: u32,
    pub total_passes: u32,
}

/// Passes between an unordered pair of players, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassEdge {
    pub player_id: PlayerId,
    pub recipient_id: PlayerId,
    pub pass_count: u32,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x_end: Option<f64>,
    pub y_end: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassAggregates {
    pub locations: Vec<PlayerAverageLocation>,
    pub edges: Vec<PassEdge>,
}

#[derive(Debug, Default)]
struct Given {
    count: u32,
    located: u32,
    sum_x: f64,
    sum_y: f64,
}

/// Orders a pair of ids so that A→B and B→A share a key.
pub fn canonical_pair(a: &PlayerId, b: &PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

pub fn pass_records<'a, I>(passes: I) -> Vec<PassRecord>
where
    I: IntoIterator<Item = &'a Event>,
{
    passes
        .into_iter()
        .filter_map(|event| {
            let record = PassRecord::from_event(event);
            match &record {
                None => trace!(index = event.index, "pass without a passer"),
                Some(PassRecord {
                    origin: Some(origin),
                    ..
                }) if !origin.is_on_pitch() => {
                    trace!(index = event.index, ?origin, "pass starts off the pitch");
                }
                Some(_) => {}
            }
            record
        })
        .collect()
}

/// One row per player who gave or received a pass, sorted by player id.
pub fn average_locations(records: &[PassRecord]) -> Vec<PlayerAverageLocation> {
    let mut given: FxHashMap<&PlayerId, Given> = FxHashMap::default();
    let mut received: FxHashMap<&PlayerId, u32> = FxHashMap::default();

    for record in records {
        let entry = given.entry(&record.passer).or_default();
        entry.count += 1;
        if let Some(origin) = record.origin {
            entry.located += 1;
            entry.sum_x += origin.x;
            entry.sum_y += origin.y;
        }
        if let Some(recipient) = &record.recipient {
            *received.entry(recipient).or_default() += 1;
        }
    }

    let mut ids: Vec<&PlayerId> = given.keys().chain(received.keys()).copied().collect();
    ids.sort();
    ids.dedup();

    ids.into_iter()
        .map(|id| {
            let passes_received = received.get(id).copied().unwrap_or(0);
            let (x, y, passes_given) = match given.get(id) {
                Some(g) if g.located > 0 => {
                    let n = f64::from(g.located);
                    (Some(g.sum_x / n), Some(g.sum_y / n), g.count)
                }
                Some(g) => (None, None, g.count),
                None => (None, None, 0),
            };
            PlayerAverageLocation {
                player_id: id.clone(),
                x,
                y,
                passes_given,
                passes_received,
                total_passes: passes_given + passes_received,
            }
        })
        .collect()
}

/// Pass counts per unordered pair, with both endpoints' average locations joined in. Passes with
/// no recipient are not part of any edge.
pub fn pass_edges(records: &[PassRecord], locations: &[PlayerAverageLocation]) -> Vec<PassEdge> {
    let mut counts: FxHashMap<(PlayerId, PlayerId), u32> = FxHashMap::default();
    for record in records {
        if let Some(recipient) = &record.recipient {
            *counts
                .entry(canonical_pair(&record.passer, recipient))
                .or_default() += 1;
        }
    }

    let by_player: FxHashMap<&PlayerId, &PlayerAverageLocation> =
        locations.iter().map(|l| (&l.player_id, l)).collect();
    let position = |id: &PlayerId| {
        by_player
            .get(id)
            .map_or((None, None), |l| (l.x, l.y))
    };

    let mut edges: Vec<PassEdge> = counts
        .into_iter()
        .map(|((player_id, recipient_id), pass_count)| {
            let (x, y) = position(&player_id);
            let (x_end, y_end) = position(&recipient_id);
            PassEdge {
                player_id,
                recipient_id,
                pass_count,
                x,
                y,
                x_end,
                y_end,
            }
        })
        .collect();
    edges.sort_by(|a, b| {
        (&a.player_id, &a.recipient_id).cmp(&(&b.player_id, &b.recipient_id))
    });
    edges
}

/// Aggregates one team's passes. No passes yields empty tables.
#[instrument(name = "aggregate", skip(passes))]
pub fn aggregate(passes: &[&Event]) -> PassAggregates {
    let records = pass_records(passes.iter().copied());
    let locations = average_locations(&records);
    let edges = pass_edges(&records, &locations);
    debug!(
        passes = records.len(),
        players = locations.len(),
        edges = edges.len(),
        "aggregated passes"
    );
    PassAggregates { locations, edges }
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassMapRow {
    pub event_id: Uuid,
    pub index: u32,
    pub timestamp: Option<String>,
    pub minute: u16,
    pub second: u8,
    pub possession: Option<u32>,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub start: Option<Location>,
    pub end: Option<Location>,
    pub length: Option<f64>,
    pub angle: Option<f64>,
    pub recipient_name: String,
    pub body_part: String,
    pub height: Option<String>,
    pub technique: Option<String>,
    pub cross: bool,
    pub outcome: String,
    pub play_pattern: Option<String>,
    pub complete: bool,
}

/// Individual passes for drawing as arrows: one player's, or the first [`PASS_MAP_LIMIT`].
pub fn pass_map(passes: &[&Event], player_id: Option<&PlayerId>) -> Vec<PassMapRow> {
    let selected: Vec<&Event> = match player_id {
        Some(id) => passes
            .iter()
            .copied()
            .filter(|e| e.player_id() == Some(id))
            .collect(),
        None => passes.iter().copied().take(PASS_MAP_LIMIT).collect(),
    };

    selected
        .into_iter()
        .map(|event| {
            let pass = event.pass.clone().unwrap_or_default();
            let end = pass.end_location;
            // older files leave length and angle out; derive them from the two locations
            let length = pass
                .length
                .or_else(|| Some(event.location?.distance(end?)));
            let angle = pass
                .angle
                .or_else(|| Some(event.location?.angle_to(end?)));
            PassMapRow {
                event_id: event.id,
                index: event.index,
                timestamp: event.timestamp.clone(),
                minute: event.minute,
                second: event.second,
                possession: event.possession,
                player_id: event.player_id().cloned(),
                player_name: event.player.as_ref().map(|p| p.name.clone()),
                start: event.location,
                end,
                length,
                angle,
                complete: pass.is_complete(),
                height: pass.height.map(|h| h.name),
                technique: pass.technique.map(|t| t.name),
                cross: pass.cross.unwrap_or(false),
                recipient_name: pass
                    .recipient
                    .map_or_else(|| "No recipient".to_owned(), |r| r.name),
                body_part: pass
                    .body_part
                    .map_or_else(|| "No body part".to_owned(), |b| b.name),
                outcome: pass
                    .outcome
                    .map_or_else(|| "Complete".to_owned(), |o| o.name),
                play_pattern: event.play_pattern.as_ref().map(|p| p.name.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{aggregate, canonical_pair, pass_map, PassAggregates, PassRecord, PASS_MAP_LIMIT};
    use crate::event::tests::event;
    use crate::event::{Event, PlayerId};
    use assert_approx_eq::assert_approx_eq;
    use serde_json::{json, Value};

    fn pass(index: u32, passer: u64, recipient: Option<u64>, x: f64, y: f64) -> Event {
        let mut payload = json!({"end_location": [x + 10.0, y]});
        if let Some(recipient) = recipient {
            payload["recipient"] = json!({"id": recipient, "name": format!("Player {}", recipient)});
        }
        event(
            index,
            json!({
                "type": {"id": 30, "name": "Pass"},
                "team": {"id": 904, "name": "Bayer Leverkusen"},
                "player": {"id": passer, "name": format!("Player {}", passer)},
                "location": [x, y],
                "pass": payload,
            }),
        )
    }

    fn refs(events: &[Event]) -> Vec<&Event> {
        events.iter().collect()
    }

    #[test]
    fn test_canonical_pair() {
        let a = PlayerId::from(10);
        let b = PlayerId::from(9);
        // string order, not numeric
        assert_eq!(canonical_pair(&a, &b), (a.clone(), b.clone()));
        assert_eq!(canonical_pair(&b, &a), (a, b));
    }

    #[test]
    fn test_two_way_pass() {
        let events = vec![pass(1, 1, Some(2), 40.0, 20.0), pass(2, 2, Some(1), 40.0, 20.0)];
        let aggregates = aggregate(&refs(&events));

        assert_eq!(aggregates.edges.len(), 1);
        let edge = &aggregates.edges[0];
        assert_eq!(edge.player_id, PlayerId::from(1));
        assert_eq!(edge.recipient_id, PlayerId::from(2));
        assert_eq!(edge.pass_count, 2);

        assert_eq!(aggregates.locations.len(), 2);
        for location in &aggregates.locations {
            assert_eq!(location.passes_given, 1);
            assert_eq!(location.passes_received, 1);
            assert_eq!(location.total_passes, 2);
        }
    }

    #[test]
    fn test_locations() {
        let events = vec![
            pass(1, 1, Some(2), 30.0, 10.0),
            pass(2, 1, None, 50.0, 30.0),
            pass(3, 2, Some(3), 80.0, 60.0),
            pass(4, 1, Some(2), 40.0, 20.0),
        ];
        let aggregates = aggregate(&refs(&events));
        let locations = &aggregates.locations;
        assert_eq!(locations.len(), 3);

        assert_eq!(locations[0].player_id, PlayerId::from(1));
        assert_approx_eq!(locations[0].x.unwrap(), 40.0);
        assert_approx_eq!(locations[0].y.unwrap(), 20.0);
        assert_eq!(locations[0].passes_given, 3);
        assert_eq!(locations[0].passes_received, 0);
        assert_eq!(locations[0].total_passes, 3);

        assert_eq!(locations[1].passes_given, 1);
        assert_eq!(locations[1].passes_received, 2);

        // only ever received
        assert_eq!(locations[2].player_id, PlayerId::from(3));
        assert_eq!(locations[2].x, None);
        assert_eq!(locations[2].passes_given, 0);
        assert_eq!(locations[2].total_passes, 1);

        let given: u32 = locations.iter().map(|l| l.passes_given).sum();
        assert_eq!(given as usize, events.len());
        for l in locations {
            assert_eq!(l.total_passes, l.passes_given + l.passes_received);
        }

        // the pass with no recipient is not an edge
        let edges = &aggregates.edges;
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].pass_count, 2);
        assert_approx_eq!(edges[0].x.unwrap(), 40.0);
        assert_approx_eq!(edges[0].x_end.unwrap(), 80.0);
        assert_eq!(edges[1].recipient_id, PlayerId::from(3));
        assert_eq!(edges[1].x_end, None);
    }

    #[test]
    fn test_edges_symmetric() {
        let forward = vec![
            pass(1, 7, Some(12), 10.0, 10.0),
            pass(2, 12, Some(9), 20.0, 20.0),
            pass(3, 9, Some(7), 30.0, 30.0),
            pass(4, 7, Some(12), 40.0, 40.0),
        ];
        let swapped: Vec<Event> = forward
            .iter()
            .map(|e| {
                let passer = e.player.clone().unwrap();
                let mut swapped = e.clone();
                let payload = swapped.pass.as_mut().unwrap();
                swapped.player = payload.recipient.replace(passer);
                swapped
            })
            .collect();

        let key = |events: &[Event]| -> Vec<(PlayerId, PlayerId, u32)> {
            aggregate(&refs(events))
                .edges
                .into_iter()
                .map(|e| (e.player_id, e.recipient_id, e.pass_count))
                .collect()
        };
        assert_eq!(key(&forward), key(&swapped));
        assert_eq!(key(&forward).len(), 3);
    }

    #[test]
    fn test_empty_and_unattributed() {
        assert_eq!(aggregate(&[]), PassAggregates::default());

        let anonymous = event(1, json!({"type": {"id": 30, "name": "Pass"}, "pass": {}}));
        assert_eq!(PassRecord::from_event(&anonymous), None);
        assert_eq!(aggregate(&[&anonymous]), PassAggregates::default());
    }

    #[test]
    fn test_pass_map() {
        let mut events = vec![
            pass(1, 1, Some(2), 30.0, 10.0),
            pass(2, 2, None, 50.0, 30.0),
        ];
        let mut incomplete: Value = json!({
            "type": {"id": 30, "name": "Pass"},
            "player": {"id": 1, "name": "Player 1"},
            "location": [60.0, 40.0],
            "play_pattern": {"id": 1, "name": "Regular Play"},
            "pass": {
                "recipient": {"id": 2, "name": "Player 2"},
                "outcome": {"id": 9, "name": "Incomplete"},
                "body_part": {"id": 40, "name": "Right Foot"},
                "height": {"id": 3, "name": "High Pass"},
                "cross": true,
                "length": 12.5,
            },
        });
        incomplete["minute"] = json!(12);
        events.push(event(3, incomplete));

        let rows = pass_map(&refs(&events), None);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].complete);
        assert_eq!(rows[0].outcome, "Complete");
        assert_approx_eq!(rows[0].length.unwrap(), 10.0);
        assert_approx_eq!(rows[0].angle.unwrap(), 0.0);
        assert!(!rows[0].cross);
        assert!(!rows[1].complete);
        assert_eq!(rows[1].recipient_name, "No recipient");
        assert_eq!(rows[1].body_part, "No body part");
        assert!(!rows[2].complete);
        assert_eq!(rows[2].minute, 12);
        assert_eq!(rows[2].outcome, "Incomplete");
        assert_eq!(rows[2].body_part, "Right Foot");
        assert_eq!(rows[2].length, Some(12.5));
        assert_eq!(rows[2].angle, None);
        assert_eq!(rows[2].height.as_deref(), Some("High Pass"));
        assert!(rows[2].cross);
        assert_eq!(rows[2].end, None);
        assert_eq!(rows[2].play_pattern.as_deref(), Some("Regular Play"));

        let rows = pass_map(&refs(&events), Some(&PlayerId::from(1)));
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), [1, 3]);

        let many: Vec<Event> = (0..150)
            .map(|i| pass(i, 1, Some(2), 10.0, 10.0))
            .collect();
        assert_eq!(pass_map(&refs(&many), None).len(), PASS_MAP_LIMIT);
        assert_eq!(pass_map(&refs(&many), Some(&PlayerId::from(1))).len(), 150);
    }
}
