#![warn(clippy::pedantic, rust_2018_idioms)]

mod aggregate;
mod config;
mod error;
mod event;
mod history;
mod match_info;
mod network;
mod pitch;
mod read_dir;
mod registry;
mod season;
mod shots;
mod store;
mod tally;
mod time;
mod util;

use crate::aggregate::pass_map;
use crate::config::Config;
use crate::event::{PlayerId, PASS};
use crate::match_info::MatchInfo;
use crate::network::team_network;
use crate::registry::PlayerRegistry;
use crate::season::season_summary;
use crate::shots::shot_map;
use crate::store::{match_ids, EventStore};
use crate::tally::event_tallies;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "pass-network",
    about = "Pass networks and event summaries from match event files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pass network for one team, limited to its starting XI unless --all-players is given
    Network {
        match_id: String,
        team_id: u32,
        #[arg(long)]
        all_players: bool,
    },
    /// Individual passes, for one player or the first of the match
    Passes {
        match_id: String,
        team_id: u32,
        #[arg(long)]
        player: Option<String>,
    },
    /// Shots, for one player or the first of the match
    Shots {
        match_id: String,
        team_id: u32,
        #[arg(long)]
        player: Option<String>,
    },
    /// Duel-type event counts for a team's possessions and for the whole match
    Tally {
        match_id: String,
        team_id: u32,
        #[arg(long)]
        player: Option<String>,
    },
    /// Scoreboard and metadata from the season's matches file
    Info { match_id: String },
    /// Summary of every listed match, or of every match in the data directory
    Season {
        team_id: u32,
        match_ids: Vec<String>,
        #[arg(long)]
        all_players: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Network {
            match_id,
            team_id,
            all_players,
        } => {
            let store = EventStore::load(&config.data_dir, &match_id)?;
            let registry = PlayerRegistry::build(&store);
            print(&team_network(&store, &registry, team_id, !all_players))
        }
        Command::Passes {
            match_id,
            team_id,
            player,
        } => {
            let store = EventStore::load(&config.data_dir, &match_id)?;
            let player = player.as_deref().map(PlayerId::from);
            print(&pass_map(&store.team_events(team_id, PASS), player.as_ref()))
        }
        Command::Shots {
            match_id,
            team_id,
            player,
        } => {
            let store = EventStore::load(&config.data_dir, &match_id)?;
            let player = player.as_deref().map(PlayerId::from);
            print(&shot_map(&store, team_id, player.as_ref()))
        }
        Command::Tally {
            match_id,
            team_id,
            player,
        } => {
            let store = EventStore::load(&config.data_dir, &match_id)?;
            let player = player.as_deref().map(PlayerId::from);
            print(&event_tallies(store.events(), team_id, player.as_ref()))
        }
        Command::Info { match_id } => {
            let path = config.matches_path();
            let info = MatchInfo::load(&path, &match_id)?.with_context(|| {
                format!("match {} is not listed in {}", match_id, path.display())
            })?;
            print(&info.report())
        }
        Command::Season {
            team_id,
            match_ids: ids,
            all_players,
        } => {
            let ids = if ids.is_empty() {
                match_ids(&config.data_dir)?
            } else {
                ids
            };
            print(&season_summary(&config.data_dir, &ids, team_id, !all_players))
        }
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
