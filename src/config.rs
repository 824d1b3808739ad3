use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_COMPETITION_ID: u32 = 9;
const DEFAULT_SEASON_ID: u32 = 281;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Holds `events/<match_id>.json` and `matches/<competition>/<season>.json`.
    pub data_dir: PathBuf,
    pub competition_id: u32,
    pub season_id: u32,
}

impl Config {
    /// Reads the process environment, after loading `.env` from the working directory if there
    /// is one.
    pub fn from_env() -> Result<Config> {
        dotenvy::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a number, got {:?}", key, value)),
                None => Ok(default),
            }
        };
        Ok(Config {
            data_dir: lookup("FOOTBALL_DATA_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            competition_id: number("FOOTBALL_COMPETITION_ID", DEFAULT_COMPETITION_ID)?,
            season_id: number("FOOTBALL_SEASON_ID", DEFAULT_SEASON_ID)?,
        })
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir
            .join("matches")
            .join(self.competition_id.to_string())
            .join(format!("{}.json", self.season_id))
    }
}
