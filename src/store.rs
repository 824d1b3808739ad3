use crate::error::StoreError;
use crate::event::Event;
use crate::read_dir::{read_dir, MatchFiles};
use anyhow::Context;
use flate2::read::GzDecoder;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// One match's events, in file order.
#[derive(Debug)]
pub struct EventStore {
    match_id: String,
    events: Vec<Event>,
    skipped: usize,
    /// How many of the file's first two records decoded; only those are lineup candidates.
    kickoff_events: usize,
}

impl EventStore {
    /// Loads `<data_dir>/events/<match_id>.json`, falling back to `<match_id>.json.gz`.
    #[instrument(name = "EventStore::load", skip(data_dir))]
    pub fn load<P: AsRef<Path>>(data_dir: P, match_id: &str) -> Result<EventStore, StoreError> {
        let events_dir = events_dir(data_dir.as_ref());
        let path = ["json", "json.gz"]
            .iter()
            .map(|ext| events_dir.join(format!("{}.{}", match_id, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| StoreError::NotFound {
                match_id: match_id.to_owned(),
            })?;

        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let raw: Vec<Value> = serde_json::from_reader(BufReader::new(reader))
            .map_err(|source| StoreError::Json { path, source })?;

        Ok(EventStore::from_values(match_id, raw))
    }

    /// Decodes each record on its own; a record that cannot be decoded is skipped rather than
    /// failing the match.
    pub fn from_values(match_id: &str, raw: Vec<Value>) -> EventStore {
        let mut events = Vec::with_capacity(raw.len());
        let mut skipped = 0;
        let mut kickoff_events = 0;
        for (position, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<Event>(value) {
                Ok(event) => {
                    if position < 2 {
                        kickoff_events += 1;
                    }
                    events.push(event);
                }
                Err(err) => {
                    warn!(match_id, position, %err, "skipping undecodable event");
                    skipped += 1;
                }
            }
        }
        debug!(match_id, events = events.len(), skipped, "loaded events");
        EventStore {
            match_id: match_id.to_owned(),
            events,
            skipped,
            kickoff_events,
        }
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn events_of_type(&self, type_id: u32) -> Vec<&Event> {
        self.events.iter().filter(|e| e.is_type(type_id)).collect()
    }

    pub fn team_events(&self, team_id: u32, type_id: u32) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.is_type(type_id) && e.team_id() == Some(team_id))
            .collect()
    }

    /// Kickoff lineups only ever appear in the first two records of the file, one per side;
    /// nothing later is scanned, even when one of those two failed to decode.
    pub fn lineup_events(&self) -> Vec<&Event> {
        self.events
            .iter()
            .take(self.kickoff_events)
            .filter(|e| e.lineup().is_some())
            .collect()
    }
}

pub fn events_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("events")
}

/// Match ids with an event file under `<data_dir>/events`.
pub fn match_ids(data_dir: &Path) -> anyhow::Result<Vec<String>> {
    let dir = events_dir(data_dir);
    let files: MatchFiles =
        read_dir(&dir).with_context(|| format!("unable to list {}", dir.display()))?;
    Ok(files.into_iter().map(|(id, _)| id).collect())
}
