use std::collections::BTreeSet;

use anyhow::{bail, Result};
use aramelo_model::player::Roster;
use aramelo_model::{Hero, Lineup, PlayerId, Team};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use super::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftOptions {
    pub bans_per_team: usize,
    pub strict_validation: bool,
}

impl From<&Config> for DraftOptions {
    fn from(config: &Config) -> Self {
        DraftOptions {
            bans_per_team: config.bans_per_team,
            strict_validation: config.strict_draft_validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    Ban,
    Pick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub action: DraftAction,
    pub team: Team,
    pub player: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ban { round: usize, team: Team },
    Pick { slot: usize, team: Team },
    Complete,
}

/// Turn-based pick-and-ban session over a shared, shrinking hero pool.
///
/// Bans alternate between the teams' last members for `bans_per_team`
/// rounds and remove heroes from the available set. Picks then walk
/// both lineups by position, binding heroes directly to players. Only
/// bans shrink the pool: picks are not checked against availability
/// and do not have to be unique. `strict_validation` opts into
/// rejecting unknown names instead of recording them verbatim.
pub struct Draft {
    team_one: Lineup,
    team_two: Lineup,
    pool: BTreeSet<Hero>,
    available: BTreeSet<Hero>,
    options: DraftOptions,
    phase: Phase,
}

impl Draft {
    /// Shuffles the selected players and splits them by position, team
    /// one taking the extra member on odd counts. The available set
    /// starts as the full pool.
    pub fn new(
        mut selected: Vec<PlayerId>,
        pool: BTreeSet<Hero>,
        options: DraftOptions,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if selected.len() < 4 {
            bail!("a draft needs at least 4 players, got {}", selected.len());
        }
        selected.shuffle(rng);
        let mid = (selected.len() + 1) / 2;
        let team_two = Lineup::new(selected.split_off(mid));
        let team_one = Lineup::new(selected);
        let phase = if options.bans_per_team > 0 {
            Phase::Ban { round: 0, team: Team::One }
        } else {
            Phase::Pick { slot: 0, team: Team::One }
        };
        Ok(Draft {
            team_one,
            team_two,
            available: pool.clone(),
            pool,
            options,
            phase,
        })
    }

    fn lineup(&self, team: Team) -> &Lineup {
        match team {
            Team::One => &self.team_one,
            Team::Two => &self.team_two,
        }
    }

    pub fn lineups(&self) -> (&Lineup, &Lineup) {
        (&self.team_one, &self.team_two)
    }

    pub fn available_heroes(&self) -> &BTreeSet<Hero> {
        &self.available
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Whose move it is. None once the draft is complete.
    pub fn current_turn(&self) -> Option<Turn> {
        match self.phase {
            Phase::Ban { team, .. } => Some(Turn {
                action: DraftAction::Ban,
                team,
                player: self.lineup(team).last()?.clone(),
            }),
            Phase::Pick { slot, team } => Some(Turn {
                action: DraftAction::Pick,
                team,
                player: self.lineup(team).get(slot)?.clone(),
            }),
            Phase::Complete => None,
        }
    }

    /// Records a ban by the current team's last member and removes the
    /// hero from the available set. Without strict validation an
    /// unknown or already-banned name is recorded on the player but
    /// leaves the pool untouched.
    pub fn ban(&mut self, roster: &mut Roster, hero: Hero) -> Result<()> {
        let Phase::Ban { team, .. } = self.phase else {
            bail!("no ban expected now");
        };
        if self.options.strict_validation && !self.available.contains(&hero) {
            bail!("hero {hero} is not available to ban");
        }
        let banner = self
            .lineup(team)
            .last()
            .expect("non-empty draft lineup")
            .clone();
        if !self.available.remove(&hero) {
            debug!("ban of unavailable hero {hero} recorded without shrinking the pool");
        }
        match roster.get_mut(&banner) {
            Some(player) => player.record_hero_ban(hero),
            None => warn!("ban: {banner} missing from roster"),
        }
        self.advance();
        Ok(())
    }

    /// Binds a hero to the current slot's player. Picks are not
    /// required to be unique or available; with strict validation the
    /// hero must at least exist in the configured pool.
    pub fn pick(&mut self, roster: &mut Roster, hero: Hero) -> Result<()> {
        let Phase::Pick { slot, team } = self.phase else {
            bail!("no pick expected now");
        };
        if self.options.strict_validation && !self.pool.contains(&hero) {
            bail!("unknown hero {hero}");
        }
        let picker = self
            .lineup(team)
            .get(slot)
            .expect("pick slot within lineup")
            .clone();
        match roster.get_mut(&picker) {
            Some(player) => {
                player.hero = Some(hero.clone());
                player.record_hero_selection(hero);
            }
            None => warn!("pick: {picker} missing from roster"),
        }
        self.advance();
        Ok(())
    }

    pub fn into_lineups(self) -> Result<(Lineup, Lineup)> {
        if !self.is_complete() {
            bail!("draft is not complete yet");
        }
        Ok((self.team_one, self.team_two))
    }

    fn advance(&mut self) {
        self.phase = match self.phase {
            Phase::Ban { round, team: Team::One } => Phase::Ban { round, team: Team::Two },
            Phase::Ban { round, team: Team::Two } => {
                if round + 1 < self.options.bans_per_team {
                    Phase::Ban { round: round + 1, team: Team::One }
                } else {
                    Phase::Pick { slot: 0, team: Team::One }
                }
            }
            // Team one is never smaller than team two, so trailing
            // unpaired slots belong to team one only.
            Phase::Pick { slot, team: Team::One } if slot < self.team_two.len() => {
                Phase::Pick { slot, team: Team::Two }
            }
            Phase::Pick { slot, .. } => {
                let next = slot + 1;
                if next < self.team_one.len() {
                    Phase::Pick { slot: next, team: Team::One }
                } else {
                    Phase::Complete
                }
            }
            Phase::Complete => Phase::Complete,
        };
    }
}
