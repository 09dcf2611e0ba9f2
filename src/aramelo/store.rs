use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aramelo_model::history::{HistoryEntry, MatchHistory};
use aramelo_model::player::{PlayerRecord, Roster};
use aramelo_model::PlayerId;
use itertools::Itertools;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::Config;

const ROSTER_FILE: &str = "players.json";
const HISTORY_FILE: &str = "matches.history.json";
const CONFIG_FILE: &str = "config.yaml";

pub fn data_dir() -> PathBuf {
    let project_dirs = directories::ProjectDirs::from("com", "aramelo", "aramelo")
        .expect("Cannot retrieve project dirs");
    project_dirs.data_dir().to_owned()
}

/// File-backed persistence for the roster, config and match history.
/// One directory per installation; tests point it at a temp dir.
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn open_default() -> Self {
        Store { data_dir: data_dir() }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Store { data_dir: dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn roster_path(&self) -> PathBuf {
        self.data_dir.join(ROSTER_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        info!("Config file: {}", path.to_string_lossy());
        if !path.exists() {
            info!("Config file does not exist, creating.");
            self.store_default_config()?;
        }
        let config_file = File::open(&path)?;
        let config: Config = serde_yaml::from_reader(config_file)?;
        config.validate().context("Invalid hero pool configuration")?;
        Ok(config)
    }

    fn store_default_config(&self) -> Result<()> {
        let path = self.config_path();
        ensure_dir_created(&path)?;
        let config_file = File::create(&path)?;
        Ok(serde_yaml::to_writer(config_file, &Config::default())?)
    }

    /// Absent roster file means an empty roster, not an error.
    pub fn load_roster(&self) -> Result<Roster> {
        let path = self.roster_path();
        info!("Roster file: {}", path.to_string_lossy());
        if !path.exists() {
            warn!("Roster file does not exist, starting with an empty roster");
            return Ok(Roster::default());
        }
        let roster_file = File::open(&path)?;
        let records: BTreeMap<PlayerId, PlayerRecord> = serde_json::from_reader(roster_file)?;
        let roster = Roster::from_records(records);
        let n = roster.len();
        if n == 0 {
            warn!("Loaded {n} players");
        } else {
            info!("Loaded {n} players: {}", roster.all().map(|p| &p.id).join(", "));
        }
        Ok(roster)
    }

    /// Persists the full profile of every player, pick-ban fields
    /// included, so no stat is lost across sessions.
    pub fn store_roster(&self, roster: &Roster) -> Result<()> {
        let path = self.roster_path();
        ensure_dir_created(&path)?;
        store_file_with_backup(&path, &roster.to_records())
    }

    pub fn load_history(&self) -> Result<MatchHistory> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(MatchHistory::default());
        }
        let history_file = File::open(&path)?;
        Ok(serde_json::from_reader(history_file)?)
    }

    pub fn append_history_entry(&self, entry: &HistoryEntry) -> Result<()> {
        let mut history = self.load_history()?;
        history.entries.push(entry.clone());

        let path = self.history_path();
        ensure_dir_created(&path)?;
        let out_file = File::create(&path)?;
        serde_json::to_writer_pretty(out_file, &history)?;
        Ok(())
    }
}

fn store_file_with_backup<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    let orig = if path.is_file() {
        let orig_file = File::open(path)?;
        let orig_content: T = serde_json::from_reader(orig_file)?;
        Some(orig_content)
    } else {
        None
    };
    if orig.as_ref() == Some(data) {
        // No need to change anything
        return Ok(());
    }
    // We are about to overwrite this file: create backup
    if path.is_file() {
        let orig_filename = path
            .file_name()
            .map(OsStr::to_string_lossy)
            .unwrap_or_default();
        let backup_path = path.with_file_name(format!("{}{}", orig_filename, ".bak"));
        std::fs::rename(path, backup_path)?;
    }
    let out_file = File::create(path)?;
    serde_json::to_writer_pretty(out_file, data)?;
    Ok(())
}

fn ensure_dir_created(path: &Path) -> Result<()> {
    let dir = path.parent().expect("Parent directory");
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", &dir.to_string_lossy()))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use aramelo_model::player::Player;
    use aramelo_model::Hero;
    use chrono::Local;
    use tempdir::TempDir;

    use super::*;

    fn test_store() -> (TempDir, Store) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new("aramelo-store-test").unwrap();
        let store = Store::with_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn missing_roster_file_is_an_empty_roster() {
        let (_dir, store) = test_store();
        assert!(store.load_roster().unwrap().is_empty());
    }

    #[test]
    fn roster_round_trip_keeps_pick_ban_fields() {
        let (_dir, store) = test_store();
        let mut player = Player::new(PlayerId::from("j"));
        player.rank = 1016.0;
        player.pb_rank = 950.0;
        player.stats.pb_losses = 2;
        player.record_hero_ban(Hero::from("Grux"));
        player.record_hero_selection(Hero::from("Gideon"));
        let roster = Roster::new([player.clone()]);

        store.store_roster(&roster).unwrap();
        let loaded = store.load_roster().unwrap();
        assert_eq!(loaded.get(&PlayerId::from("j")), Some(&player));
    }

    #[test]
    fn changed_roster_write_keeps_a_backup() {
        let (dir, store) = test_store();
        let mut roster = Roster::new([Player::new(PlayerId::from("j"))]);
        store.store_roster(&roster).unwrap();

        roster.get_mut(&PlayerId::from("j")).unwrap().rank = 1016.0;
        store.store_roster(&roster).unwrap();

        assert!(dir.path().join("players.json.bak").exists());
        assert_eq!(
            store.load_roster().unwrap().get(&PlayerId::from("j")).unwrap().rank,
            1016.0
        );
    }

    #[test]
    fn unchanged_roster_write_leaves_no_backup() {
        let (dir, store) = test_store();
        let roster = Roster::new([Player::new(PlayerId::from("j"))]);
        store.store_roster(&roster).unwrap();
        store.store_roster(&roster).unwrap();
        assert!(!dir.path().join("players.json.bak").exists());
    }

    #[test]
    fn history_entries_accumulate() {
        let (_dir, store) = test_store();
        let entry = HistoryEntry {
            timestamp: Local::now(),
            winner: vec![PlayerId::from("j")],
            loser: vec![PlayerId::from("bixkog")],
            draft: true,
        };
        store.append_history_entry(&entry).unwrap();
        store.append_history_entry(&entry).unwrap();
        assert_eq!(store.load_history().unwrap().entries.len(), 2);
    }

    #[test]
    fn missing_config_is_created_with_defaults() {
        let (dir, store) = test_store();
        let config = store.load_config().unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.yaml").exists());
    }
}
