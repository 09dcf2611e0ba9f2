use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Hero, PlayerId, Role};

/// Cumulative match counters. Only ever incremented.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
    pub pb_wins: u32,
    pub pb_losses: u32,
}

impl Stats {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.pb_wins + self.pb_losses
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    /// Current match role. Session-scoped, reset every match.
    pub role: Option<Role>,
    /// Current match hero. Session-scoped, reset every match.
    pub hero: Option<Hero>,
    /// General skill rating. Unclamped.
    pub rank: f64,
    /// Pick-ban skill rating. Held within [0, 10000] by the rating engine.
    pub pb_rank: f64,
    pub stats: Stats,
    pub hero_selection_count: BTreeMap<Hero, u32>,
    pub hero_ban_count: BTreeMap<Hero, u32>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Player {
            id,
            role: None,
            hero: None,
            rank: Player::default_rank(),
            pb_rank: Player::default_rank(),
            stats: Stats::default(),
            hero_selection_count: Default::default(),
            hero_ban_count: Default::default(),
        }
    }

    pub fn default_rank() -> f64 {
        1000.0
    }

    /// Overall win rate in percent, counting both regular and pick-ban
    /// matches. 0 when the player has no recorded matches.
    pub fn win_rate(&self) -> f64 {
        let total = self.stats.total();
        if total == 0 {
            return 0.0;
        }
        let total_wins = self.stats.wins + self.stats.pb_wins;
        total_wins as f64 / total as f64 * 100.0
    }

    /// First-max scan over the ordered selection counts, so ties resolve
    /// deterministically. None when the player never selected a hero.
    pub fn most_selected_hero(&self) -> Option<&Hero> {
        let mut best: Option<(&Hero, u32)> = None;
        for (hero, count) in &self.hero_selection_count {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((hero, *count));
            }
        }
        best.map(|(hero, _)| hero)
    }

    pub fn record_hero_selection(&mut self, hero: Hero) {
        *self.hero_selection_count.entry(hero).or_insert(0) += 1;
    }

    pub fn record_hero_ban(&mut self, hero: Hero) {
        *self.hero_ban_count.entry(hero).or_insert(0) += 1;
    }

    pub fn reset_assignment(&mut self) {
        self.role = None;
        self.hero = None;
    }
}

/// Persisted form of a profile, keyed by player name in the roster
/// document. `pb_rank` and ban counts default so documents written by
/// older versions still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub rank: f64,
    #[serde(default = "Player::default_rank")]
    pub pb_rank: f64,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub hero_selection_count: BTreeMap<Hero, u32>,
    #[serde(default)]
    pub hero_ban_count: BTreeMap<Hero, u32>,
}

impl Player {
    pub fn from_record(id: PlayerId, record: PlayerRecord) -> Self {
        Player {
            id,
            role: None,
            hero: None,
            rank: record.rank,
            pb_rank: record.pb_rank,
            stats: record.stats,
            hero_selection_count: record.hero_selection_count,
            hero_ban_count: record.hero_ban_count,
        }
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            rank: self.rank,
            pb_rank: self.pb_rank,
            stats: self.stats,
            hero_selection_count: self.hero_selection_count.clone(),
            hero_ban_count: self.hero_ban_count.clone(),
        }
    }
}

/// The in-memory collection of profiles for one run. Ordered by player
/// name so listings are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: BTreeMap<PlayerId, Player>,
}

impl Roster {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = (PlayerId, PlayerRecord)>) -> Self {
        Self::new(
            records
                .into_iter()
                .map(|(id, record)| Player::from_record(id, record)),
        )
    }

    pub fn to_records(&self) -> BTreeMap<PlayerId, PlayerRecord> {
        self.players
            .iter()
            .map(|(id, p)| (id.clone(), p.to_record()))
            .collect()
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    pub fn insert(&mut self, player: Player) {
        if self.players.contains_key(&player.id) {
            warn!("insert: replacing existing player {}", player.id);
        }
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        self.players.remove(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn player(name: &str) -> Player {
        Player::new(PlayerId::from(name))
    }

    #[test]
    fn fresh_player_defaults() {
        let p = player("j");
        assert_eq!(p.rank, 1000.0);
        assert_eq!(p.pb_rank, 1000.0);
        assert_eq!(p.stats, Stats::default());
        assert!(p.role.is_none());
        assert!(p.hero.is_none());
    }

    #[test]
    fn win_rate_without_matches_is_zero() {
        assert_eq!(player("j").win_rate(), 0.0);
    }

    #[test]
    fn win_rate_counts_both_rating_systems() {
        let mut p = player("j");
        p.stats.wins = 2;
        p.stats.pb_wins = 1;
        p.stats.losses = 1;
        assert_eq!(p.win_rate(), 75.0);
    }

    #[test]
    fn most_selected_hero_picks_the_max() {
        let mut p = player("j");
        p.hero_selection_count.insert(Hero::from("Steel"), 2);
        p.hero_selection_count.insert(Hero::from("Maco"), 1);
        assert_eq!(p.most_selected_hero(), Some(&Hero::from("Steel")));
    }

    #[test]
    fn most_selected_hero_empty() {
        assert_eq!(player("j").most_selected_hero(), None);
    }

    #[test]
    fn most_selected_hero_tie_is_deterministic() {
        let mut p = player("j");
        p.hero_selection_count.insert(Hero::from("Steel"), 2);
        p.hero_selection_count.insert(Hero::from("Maco"), 2);
        // First max in key order wins the tie.
        assert_eq!(p.most_selected_hero(), Some(&Hero::from("Maco")));
    }

    #[test]
    fn record_round_trip_preserves_everything() {
        let mut p = player("j");
        p.rank = 1234.5;
        p.pb_rank = 900.0;
        p.stats.pb_losses = 3;
        p.record_hero_selection(Hero::from("Gideon"));
        p.record_hero_ban(Hero::from("Grux"));
        let restored = Player::from_record(p.id.clone(), p.to_record());
        assert_eq!(restored, p);
    }

    #[test]
    fn legacy_record_without_pb_fields() {
        let json = r#"{"rank": 1016.0, "stats": {"wins": 1}}"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.pb_rank, 1000.0);
        assert_eq!(record.stats.wins, 1);
        assert!(record.hero_ban_count.is_empty());
    }
}
