use crate::event::{
    Event, LineupEntry, PlayerId, PlayerRef, TeamRef, STARTING_XI, SUBSTITUTION, TACTICAL_SHIFT,
};
use crate::history::History;
use crate::store::EventStore;
use crate::util::Sides;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, instrument, warn};

const POSITIONS: [(u32, &str); 25] = [
    (1, "GK"),
    (2, "RB"),
    (3, "RCB"),
    (4, "CB"),
    (5, "LCB"),
    (6, "LB"),
    (7, "RWB"),
    (8, "LWB"),
    (9, "RDM"),
    (10, "CDM"),
    (11, "LDM"),
    (12, "RM"),
    (13, "RCM"),
    (14, "CM"),
    (15, "LCM"),
    (16, "LM"),
    (17, "RW"),
    (18, "RAM"),
    (19, "CAM"),
    (20, "LAM"),
    (21, "LW"),
    (22, "RCF"),
    (23, "ST"),
    (24, "LCF"),
    (25, "SS"),
];

pub fn position_abbreviation(position_id: u32) -> Option<&'static str> {
    POSITIONS
        .iter()
        .find(|(id, _)| *id == position_id)
        .map(|(_, abbreviation)| *abbreviation)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub jersey_number: Option<u32>,
    pub position_id: Option<u32>,
    pub position_name: Option<String>,
    pub position_abbreviation: Option<&'static str>,
    pub team_id: Option<u32>,
    pub starter: bool,
}

impl Player {
    fn starter(entry: &LineupEntry, team_id: u32) -> Player {
        let position_id = entry.position.as_ref().map(|p| p.id);
        Player {
            id: entry.player.id.clone(),
            name: entry.player.name.clone(),
            jersey_number: entry.jersey_number,
            position_id,
            position_name: entry.position.as_ref().map(|p| p.name.clone()),
            position_abbreviation: position_id.and_then(position_abbreviation),
            team_id: Some(team_id),
            starter: true,
        }
    }

    fn replacement(player: &PlayerRef, team_id: Option<u32>) -> Player {
        Player {
            id: player.id.clone(),
            name: player.name.clone(),
            jersey_number: None,
            position_id: None,
            position_name: None,
            position_abbreviation: None,
            team_id,
            starter: false,
        }
    }
}

#[derive(Debug)]
struct TeamLineup {
    team: TeamRef,
    players: Vec<Player>,
    formations: History<u32>,
}

/// Who played in a match, derived from its kickoff lineups and substitutions.
#[derive(Debug)]
pub struct PlayerRegistry {
    lineups: Vec<TeamLineup>,
    replacements: Vec<Player>,
}

impl PlayerRegistry {
    #[instrument(name = "PlayerRegistry::build", skip(store), fields(match_id = store.match_id()))]
    pub fn build(store: &EventStore) -> PlayerRegistry {
        let mut lineups: Vec<TeamLineup> = store
            .lineup_events()
            .into_iter()
            .filter_map(team_lineup)
            .collect();

        for event in store.events_of_type(TACTICAL_SHIFT) {
            let formation = event.tactics.as_ref().and_then(|t| t.formation);
            let lineup = event
                .team_id()
                .and_then(|id| lineups.iter_mut().find(|l| l.team.id == id));
            if let (Some(formation), Some(lineup)) = (formation, lineup) {
                lineup.formations.insert(event.index, formation);
            }
        }
        for lineup in &mut lineups {
            lineup.formations.dedup();
        }

        // Substitution events are kept for every team; `roster` callers filter by team themselves.
        let replacements: Vec<Player> = store
            .events_of_type(SUBSTITUTION)
            .into_iter()
            .filter_map(|event| {
                let replacement = event.substitution.as_ref()?.replacement.as_ref()?;
                Some(Player::replacement(replacement, event.team_id()))
            })
            .collect();

        debug!(
            lineups = lineups.len(),
            replacements = replacements.len(),
            "built player registry"
        );
        PlayerRegistry {
            lineups,
            replacements,
        }
    }

    fn lineup(&self, team_id: u32) -> Option<&TeamLineup> {
        self.lineups.iter().find(|l| l.team.id == team_id)
    }

    /// The team's starting XI, followed (unless `starters_only`) by every substitution
    /// replacement in the match, whichever team made the change. Each player appears once.
    pub fn roster(&self, team_id: u32, starters_only: bool) -> Vec<Player> {
        let mut roster: Vec<Player> = self
            .lineup(team_id)
            .map(|l| l.players.clone())
            .unwrap_or_default();
        if !starters_only {
            let mut seen: FxHashSet<PlayerId> = roster.iter().map(|p| p.id.clone()).collect();
            for player in &self.replacements {
                if seen.insert(player.id.clone()) {
                    roster.push(player.clone());
                }
            }
        }
        roster
    }

    pub fn roster_ids(&self, team_id: u32, starters_only: bool) -> FxHashSet<PlayerId> {
        self.roster(team_id, starters_only)
            .into_iter()
            .map(|p| p.id)
            .collect()
    }

    /// Display metadata for every known player of both teams.
    pub fn player_index(&self) -> FxHashMap<PlayerId, Player> {
        let mut index = FxHashMap::default();
        for player in self.lineups.iter().flat_map(|l| &l.players) {
            index.insert(player.id.clone(), player.clone());
        }
        for player in &self.replacements {
            index
                .entry(player.id.clone())
                .or_insert_with(|| player.clone());
        }
        index
    }

    pub fn sides(&self, team_id: u32) -> Option<Sides<TeamRef>> {
        let sides = Sides {
            team: self.lineup(team_id),
            opponent: self.lineups.iter().find(|l| l.team.id != team_id),
        };
        sides.map_opt(|lineup| lineup.map(|l| l.team.clone()))
    }

    /// The formation the team kicked off in.
    pub fn formation(&self, team_id: u32) -> Option<u32> {
        self.lineup(team_id)?.formations.first().copied()
    }

    pub fn formation_at(&self, team_id: u32, index: u32) -> Option<u32> {
        self.lineup(team_id)?.formations.get(index).copied()
    }
}

fn team_lineup(event: &Event) -> Option<TeamLineup> {
    if !event.is_type(STARTING_XI) {
        debug!(
            index = event.index,
            kind = %event.kind.name,
            "lineup taken from a non Starting XI event"
        );
    }
    let team = match &event.team {
        Some(team) => team.clone(),
        None => {
            warn!(index = event.index, "lineup event without a team");
            return None;
        }
    };
    let players = event
        .lineup()
        .unwrap_or_default()
        .iter()
        .map(|entry| Player::starter(entry, team.id))
        .collect();
    let mut formations = History::new();
    if let Some(formation) = event.tactics.as_ref().and_then(|t| t.formation) {
        formations.insert(event.index, formation);
    }
    Some(TeamLineup {
        team,
        players,
        formations,
    })
}

#[cfg(test)]
mod tests {
    use super::{position_abbreviation, PlayerRegistry};
    use crate::event::{PlayerId, SUBSTITUTION, TACTICAL_SHIFT};
    use crate::store::tests::{raw, sample};
    use crate::store::EventStore;
    use serde_json::json;

    fn substitution(index: u32, team: u32, replacement: u64) -> serde_json::Value {
        raw(
            index,
            json!({
                "type": {"id": SUBSTITUTION, "name": "Substitution"},
                "team": {"id": team, "name": format!("Team {}", team)},
                "substitution": {"replacement": {"id": replacement, "name": format!("Sub {}", replacement)}},
            }),
        )
    }

    fn store() -> EventStore {
        let mut events = sample();
        events.push(substitution(20, 904, 150));
        events.push(substitution(21, 170, 250));
        events.push(substitution(22, 904, 151));
        events.push(raw(
            23,
            json!({
                "type": {"id": TACTICAL_SHIFT, "name": "Tactical Shift"},
                "team": {"id": 904, "name": "Team 904"},
                "tactics": {"formation": 4231, "lineup": []},
            }),
        ));
        events.push(raw(
            30,
            json!({
                "type": {"id": TACTICAL_SHIFT, "name": "Tactical Shift"},
                "team": {"id": 904, "name": "Team 904"},
                "tactics": {"formation": 352},
            }),
        ));
        EventStore::from_values("1", events)
    }

    #[test]
    fn test_positions() {
        assert_eq!(position_abbreviation(1), Some("GK"));
        assert_eq!(position_abbreviation(10), Some("CDM"));
        assert_eq!(position_abbreviation(25), Some("SS"));
        assert_eq!(position_abbreviation(26), None);
    }

    #[test]
    fn test_roster() {
        let registry = PlayerRegistry::build(&store());

        let starters = registry.roster(904, true);
        assert_eq!(starters.len(), 11);
        assert!(starters.iter().all(|p| p.starter && p.team_id == Some(904)));
        assert_eq!(starters[0].position_abbreviation, Some("GK"));
        assert_eq!(starters[0].jersey_number, Some(1));

        // replacements from both teams are included
        let everyone = registry.roster(904, false);
        assert_eq!(everyone.len(), 11 + 3);
        assert!(everyone.iter().any(|p| p.id == PlayerId::from(250)));

        assert_eq!(registry.roster(170, true).len(), 11);
        assert!(registry.roster(999, true).is_empty());
        assert_eq!(registry.roster(999, false).len(), 3);

        let ids = registry.roster_ids(904, true);
        assert!(ids.contains(&PlayerId::from("100")));
        assert!(!ids.contains(&PlayerId::from("200")));
        assert!(!ids.contains(&PlayerId::from("300")));
    }

    #[test]
    fn test_player_index() {
        let index = PlayerRegistry::build(&store()).player_index();
        assert_eq!(index.len(), 22 + 3);
        assert_eq!(index[&PlayerId::from(205)].name, "Player 205");
        assert_eq!(index[&PlayerId::from(151)].name, "Sub 151");
        assert!(!index[&PlayerId::from(151)].starter);
    }

    #[test]
    fn test_sides_and_formations() {
        let registry = PlayerRegistry::build(&store());
        let sides = registry.sides(904).unwrap();
        assert_eq!(sides.team.name, "Team 904");
        assert_eq!(sides.opponent.id, 170);
        assert!(registry.sides(999).is_none());

        assert_eq!(registry.formation(904), Some(4231));
        assert_eq!(registry.formation_at(904, 25), Some(4231));
        assert_eq!(registry.formation_at(904, 30), Some(352));
        assert_eq!(registry.formation_at(170, 30), Some(4231));
        assert_eq!(registry.formation(999), None);
    }
}
