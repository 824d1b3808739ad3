use crate::event::{Event, PlayerId, TypeRef, SHOT};
use crate::pitch::Location;
use crate::store::EventStore;
use serde::Serialize;
use uuid::Uuid;

/// Without a player filter, the shot map only shows the first shots of the match.
pub const SHOT_MAP_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRow {
    pub event_id: Uuid,
    pub index: u32,
    pub timestamp: Option<String>,
    pub period: u8,
    pub minute: u16,
    pub second: u8,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub location: Option<Location>,
    pub end_location: Option<Location>,
    pub statsbomb_xg: Option<f64>,
    pub outcome: String,
    pub technique: String,
    pub body_part: String,
    pub shot_type: String,
    pub play_pattern: Option<String>,
    pub is_goal: bool,
}

impl ShotRow {
    fn from_event(event: &Event) -> ShotRow {
        let shot = event.shot.clone().unwrap_or_default();
        let name_or = |field: Option<TypeRef>, default: &str| {
            field.map_or_else(|| default.to_owned(), |f| f.name)
        };
        let outcome = name_or(shot.outcome, "Complete");
        ShotRow {
            event_id: event.id,
            index: event.index,
            timestamp: event.timestamp.clone(),
            period: event.period,
            minute: event.minute,
            second: event.second,
            player_id: event.player_id().cloned(),
            player_name: event.player.as_ref().map(|p| p.name.clone()),
            location: event.location,
            end_location: shot.end_location,
            statsbomb_xg: shot.statsbomb_xg,
            is_goal: outcome == "Goal",
            outcome,
            technique: name_or(shot.technique, "No technique"),
            body_part: name_or(shot.body_part, "No body part"),
            shot_type: name_or(shot.kind, "No type"),
            play_pattern: event.play_pattern.as_ref().map(|p| p.name.clone()),
        }
    }
}

/// A team's shots: one player's, or the first [`SHOT_MAP_LIMIT`].
pub fn shot_map(store: &EventStore, team_id: u32, player_id: Option<&PlayerId>) -> Vec<ShotRow> {
    let shots = store.team_events(team_id, SHOT).into_iter();
    match player_id {
        Some(id) => shots
            .filter(|e| e.player_id() == Some(id))
            .map(ShotRow::from_event)
            .collect(),
        None => shots.take(SHOT_MAP_LIMIT).map(ShotRow::from_event).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::shot_map;
    use crate::event::{PlayerId, SHOT};
    use crate::pitch::Location;
    use crate::store::tests::raw;
    use crate::store::EventStore;
    use assert_approx_eq::assert_approx_eq;
    use serde_json::json;

    fn store() -> EventStore {
        EventStore::from_values(
            "1",
            vec![
                raw(
                    1,
                    json!({
                        "type": {"id": SHOT, "name": "Shot"},
                        "team": {"id": 904, "name": "Bayer Leverkusen"},
                        "player": {"id": 8221, "name": "Granit Xhaka"},
                        "play_pattern": {"id": 4, "name": "From Throw In"},
                        "location": [100.0, 35.0],
                        "shot": {
                            "end_location": [120.0, 38.5, 1.2],
                            "statsbomb_xg": 0.08,
                            "outcome": {"id": 97, "name": "Goal"},
                            "technique": {"id": 93, "name": "Normal"},
                            "body_part": {"id": 40, "name": "Right Foot"},
                            "type": {"id": 87, "name": "Open Play"},
                        },
                    }),
                ),
                raw(
                    2,
                    json!({
                        "type": {"id": SHOT, "name": "Shot"},
                        "team": {"id": 904, "name": "Bayer Leverkusen"},
                        "player": {"id": 40724, "name": "Florian Wirtz"},
                        "location": [108.0, 42.0],
                    }),
                ),
                raw(
                    3,
                    json!({
                        "type": {"id": SHOT, "name": "Shot"},
                        "team": {"id": 170, "name": "Werder Bremen"},
                        "shot": {"outcome": {"id": 100, "name": "Saved"}},
                    }),
                ),
            ],
        )
    }

    #[test]
    fn test_shot_map() {
        let store = store();
        let shots = shot_map(&store, 904, None);
        assert_eq!(shots.len(), 2);

        let goal = &shots[0];
        assert!(goal.is_goal);
        assert_eq!(goal.outcome, "Goal");
        assert_eq!(goal.end_location, Some(Location::new(120.0, 38.5)));
        assert_approx_eq!(goal.statsbomb_xg.unwrap(), 0.08);
        assert_eq!(goal.shot_type, "Open Play");
        assert_eq!(goal.play_pattern.as_deref(), Some("From Throw In"));

        // no shot payload at all
        let bare = &shots[1];
        assert!(!bare.is_goal);
        assert_eq!(bare.outcome, "Complete");
        assert_eq!(bare.technique, "No technique");
        assert_eq!(bare.body_part, "No body part");
        assert_eq!(bare.shot_type, "No type");
        assert_eq!(bare.statsbomb_xg, None);

        let wirtz = shot_map(&store, 904, Some(&PlayerId::from(40724)));
        assert_eq!(wirtz.len(), 1);
        assert_eq!(wirtz[0].player_name.as_deref(), Some("Florian Wirtz"));

        assert_eq!(shot_map(&store, 170, None)[0].outcome, "Saved");
        assert!(shot_map(&store, 999, None).is_empty());
    }
}
