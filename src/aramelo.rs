use anyhow::{bail, Context, Result};
use aramelo_model::history::HistoryEntry;
use aramelo_model::player::{Player, Roster};
use aramelo_model::{Hero, Lineup, PlayerId};
use chrono::Local;
use log::{info, warn};
use pairelo::{split_teams, PairwiseElo, RatingKind, RatingStrategy as _};
use rand::Rng;

pub(crate) mod assignor;
pub(crate) mod config;
pub(crate) mod draft;
pub(crate) mod store;

use config::Config;
use draft::{Draft, DraftOptions};
use store::Store;

/// Owns the roster for one run. Loaded once, mutated in place across
/// however many matches are played, saved once on exit.
pub struct Aramelo {
    roster: Roster,
    config: Config,
    store: Store,
}

impl Aramelo {
    pub fn load(store: Store) -> Result<Self> {
        let config = store.load_config().context("Failed to load config")?;
        let roster = store.load_roster().context("Failed to load roster")?;
        Ok(Aramelo { roster, config, store })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn add_players(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let id = PlayerId::from(name);
            if self.roster.contains(&id) {
                warn!("add_players: {id} already exists, skipping");
                continue;
            }
            info!("New player: {id}");
            self.roster.insert(Player::new(id));
        }
    }

    /// Resolves user-entered names against the roster. Unknown or
    /// repeated names are rejected before any team is formed.
    pub fn select_players(&self, names: &[&str]) -> Result<Vec<PlayerId>> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let id = PlayerId::from(name.trim());
            if !self.roster.contains(&id) {
                bail!("unknown player: {id}");
            }
            if selected.contains(&id) {
                bail!("player {id} selected twice");
            }
            selected.push(id);
        }
        Ok(selected)
    }

    /// Randomizer flow: rank-seeded random split, then independent
    /// role and hero assignment for both lineups.
    pub fn make_teams(
        &mut self,
        selected: &[PlayerId],
        rng: &mut impl Rng,
    ) -> Result<(Lineup, Lineup)> {
        self.reset_assignments(selected);
        let ranked: Vec<_> = selected
            .iter()
            .map(|id| {
                let rank = self
                    .roster
                    .get(id)
                    .map(|p| p.rank)
                    .unwrap_or_else(Player::default_rank);
                (id.clone(), rank)
            })
            .collect();
        let (one, two) = split_teams(ranked, rng)?;
        assignor::assign_roles_and_heroes(&one, &mut self.roster, &self.config, rng);
        assignor::assign_roles_and_heroes(&two, &mut self.roster, &self.config, rng);
        Ok((one, two))
    }

    pub fn start_draft(&mut self, selected: Vec<PlayerId>, rng: &mut impl Rng) -> Result<Draft> {
        self.reset_assignments(&selected);
        Draft::new(
            selected,
            self.config.hero_pool(),
            DraftOptions::from(&self.config),
            rng,
        )
    }

    /// The draft mutates profiles (ban/selection counters, bound
    /// heroes), so it goes through the roster owner.
    pub fn draft_ban(&mut self, draft: &mut Draft, hero: Hero) -> Result<()> {
        draft.ban(&mut self.roster, hero)
    }

    pub fn draft_pick(&mut self, draft: &mut Draft, hero: Hero) -> Result<()> {
        draft.pick(&mut self.roster, hero)
    }

    pub fn record_match_result(
        &mut self,
        winners: &Lineup,
        losers: &Lineup,
        kind: RatingKind,
    ) -> Result<()> {
        let elo = PairwiseElo::new(&self.config.elo);
        elo.update(kind, &mut self.roster, winners, losers);

        let entry = HistoryEntry {
            timestamp: Local::now(),
            winner: winners.players.clone(),
            loser: losers.players.clone(),
            draft: kind == RatingKind::PickBan,
        };
        // Failsafe copy of the result in the log
        let entry_msg = serde_json::to_string(&entry)
            .unwrap_or_else(|e| format!("Failed to serialize history entry: {e}"));
        info!(target: "history", "MatchResult: {entry_msg}");
        self.store
            .append_history_entry(&entry)
            .context("Failed to append history entry")?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.store.store_roster(&self.roster).context("Failed to store roster")?;
        info!("Roster stored.");
        Ok(())
    }

    fn reset_assignments(&mut self, selected: &[PlayerId]) {
        for id in selected {
            if let Some(player) = self.roster.get_mut(id) {
                player.reset_assignment();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempdir::TempDir;

    use super::*;

    fn test_app(names: &[&str]) -> (TempDir, Aramelo) {
        let dir = TempDir::new("aramelo-test").unwrap();
        let mut app = Aramelo::load(Store::with_dir(dir.path())).unwrap();
        app.add_players(names.iter().map(|n| n.to_string()));
        (dir, app)
    }

    #[test]
    fn select_players_rejects_unknown_names() {
        let (_dir, app) = test_app(&["j", "bixkog"]);
        assert!(app.select_players(&["j", "ghost"]).is_err());
    }

    #[test]
    fn select_players_rejects_duplicates() {
        let (_dir, app) = test_app(&["j", "bixkog"]);
        assert!(app.select_players(&["j", "j"]).is_err());
    }

    #[test]
    fn make_teams_assigns_roles_and_heroes() {
        let (_dir, mut app) = test_app(&["p1", "p2", "p3", "p4"]);
        let selected = app.select_players(&["p1", "p2", "p3", "p4"]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (one, two) = app.make_teams(&selected, &mut rng).unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(two.len(), 2);
        for id in one.iter().chain(two.iter()) {
            let player = app.roster().get(id).unwrap();
            assert!(player.role.is_some());
            assert!(player.hero.is_some());
        }
    }

    #[test]
    fn match_results_update_ranks_and_append_history() {
        let (_dir, mut app) = test_app(&["a", "b"]);
        let winners = Lineup::new(vec![PlayerId::from("a")]);
        let losers = Lineup::new(vec![PlayerId::from("b")]);
        app.record_match_result(&winners, &losers, RatingKind::General).unwrap();

        assert_eq!(app.roster().get(&PlayerId::from("a")).unwrap().rank, 1016.0);
        assert_eq!(app.roster().get(&PlayerId::from("b")).unwrap().rank, 984.0);
        assert_eq!(app.store.load_history().unwrap().entries.len(), 1);
    }

    #[test]
    fn stats_never_decrease_across_matches() {
        let (_dir, mut app) = test_app(&["a", "b"]);
        let a = Lineup::new(vec![PlayerId::from("a")]);
        let b = Lineup::new(vec![PlayerId::from("b")]);
        app.record_match_result(&a, &b, RatingKind::General).unwrap();
        app.record_match_result(&b, &a, RatingKind::General).unwrap();
        app.record_match_result(&a, &b, RatingKind::PickBan).unwrap();

        let stats = app.roster().get(&PlayerId::from("a")).unwrap().stats;
        assert_eq!((stats.wins, stats.losses), (1, 1));
        assert_eq!((stats.pb_wins, stats.pb_losses), (1, 0));
    }

    #[test]
    fn saved_roster_survives_reload() {
        let (dir, mut app) = test_app(&["a", "b"]);
        let winners = Lineup::new(vec![PlayerId::from("a")]);
        let losers = Lineup::new(vec![PlayerId::from("b")]);
        app.record_match_result(&winners, &losers, RatingKind::PickBan).unwrap();
        app.save().unwrap();

        let reloaded = Aramelo::load(Store::with_dir(dir.path())).unwrap();
        assert_eq!(
            reloaded.roster().get(&PlayerId::from("a")).unwrap().pb_rank,
            1016.0
        );
    }
}
