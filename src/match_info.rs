use crate::time::kickoff;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawMatch {
    match_id: u64,
    match_date: Option<String>,
    kick_off: Option<String>,
    #[serde(default)]
    competition: Option<RawCompetition>,
    #[serde(default)]
    season: Option<RawSeason>,
    home_team: RawHomeTeam,
    away_team: RawAwayTeam,
    #[serde(default)]
    home_score: Option<u32>,
    #[serde(default)]
    away_score: Option<u32>,
    #[serde(default)]
    stadium: Option<Named>,
    #[serde(default)]
    referee: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct RawCompetition {
    competition_name: String,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    season_name: String,
}

#[derive(Debug, Deserialize)]
struct RawHomeTeam {
    home_team_id: u32,
    home_team_name: String,
}

#[derive(Debug, Deserialize)]
struct RawAwayTeam {
    away_team_id: u32,
    away_team_name: String,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    pub match_id: String,
    pub home_team_id: u32,
    pub home_team: String,
    pub away_team_id: u32,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub competition: Option<String>,
    pub season: Option<String>,
    pub stadium: Option<String>,
    pub referee: Option<String>,
    pub kickoff: Option<NaiveDateTime>,
}

/// What `info` prints: the match metadata with its scoreboard line alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub scoreboard: String,
    #[serde(flatten)]
    pub info: MatchInfo,
}

impl MatchInfo {
    /// Looks `match_id` up in a competition/season matches file. `Ok(None)` if it isn't listed.
    pub fn load<P: AsRef<Path>>(path: P, match_id: &str) -> Result<Option<MatchInfo>> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
        let matches: Vec<RawMatch> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("unable to parse {}", path.display()))?;
        Ok(matches
            .into_iter()
            .find(|m| m.match_id.to_string() == match_id)
            .map(MatchInfo::from))
    }

    pub fn scoreboard(&self) -> String {
        format!(
            "{} {} x {} {}",
            self.home_team, self.home_score, self.away_score, self.away_team
        )
    }

    pub fn report(self) -> MatchReport {
        MatchReport {
            scoreboard: self.scoreboard(),
            info: self,
        }
    }
}

impl From<RawMatch> for MatchInfo {
    fn from(raw: RawMatch) -> MatchInfo {
        let kickoff = raw.match_date.as_deref().and_then(|date| {
            match kickoff(date, raw.kick_off.as_deref()) {
                Ok(kickoff) => Some(kickoff),
                Err(err) => {
                    warn!(match_id = raw.match_id, %err, "ignoring kick-off time");
                    None
                }
            }
        });
        MatchInfo {
            match_id: raw.match_id.to_string(),
            home_team_id: raw.home_team.home_team_id,
            home_team: raw.home_team.home_team_name,
            away_team_id: raw.away_team.away_team_id,
            away_team: raw.away_team.away_team_name,
            home_score: raw.home_score.unwrap_or(0),
            away_score: raw.away_score.unwrap_or(0),
            competition: raw.competition.map(|c| c.competition_name),
            season: raw.season.map(|s| s.season_name),
            stadium: raw.stadium.map(|s| s.name),
            referee: raw.referee.map(|r| r.name),
            kickoff,
        }
    }
}
