use aramelo_model::player::{Player, Roster};
use aramelo_model::{Lineup, PlayerId};

use itertools::Itertools;
use log::{debug, warn};
use rand::Rng;
use thiserror::Error;

mod options;

pub use options::EloOptions;

pub const PB_RANK_MIN: f64 = 0.0;
pub const PB_RANK_MAX: f64 = 10000.0;

/// Selects which rating scalar and which win/loss counters an update
/// touches. The two systems share one engine; only the scalar, the
/// clamp and the counters differ.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RatingKind {
    General,
    PickBan,
}

impl RatingKind {
    pub fn rating(&self, player: &Player) -> f64 {
        match self {
            RatingKind::General => player.rank,
            RatingKind::PickBan => player.pb_rank,
        }
    }

    pub fn set_rating(&self, player: &mut Player, value: f64) {
        match self {
            RatingKind::General => player.rank = value,
            RatingKind::PickBan => player.pb_rank = value.clamp(PB_RANK_MIN, PB_RANK_MAX),
        }
    }

    fn record_win(&self, player: &mut Player) {
        match self {
            RatingKind::General => player.stats.wins += 1,
            RatingKind::PickBan => player.stats.pb_wins += 1,
        }
    }

    fn record_loss(&self, player: &mut Player) {
        match self {
            RatingKind::General => player.stats.losses += 1,
            RatingKind::PickBan => player.stats.pb_losses += 1,
        }
    }
}

/// Seam for the rating math so the pairwise accumulation below can be
/// swapped for a single-adjustment variant without touching callers.
pub trait RatingStrategy {
    fn update(&self, kind: RatingKind, roster: &mut Roster, winners: &Lineup, losers: &Lineup);
}

/// Classic Elo applied over the full winner x loser cross product.
///
/// Every pair accumulates onto the live scalars, so an N-vs-N match
/// produces N^2 adjustments per side and larger teams swing ratings
/// faster than a single team-vs-team adjustment would. Load-bearing
/// for existing rating history; tune by swapping the strategy, not by
/// changing the loop.
pub struct PairwiseElo {
    k: f64,
}

impl PairwiseElo {
    pub fn new(options: &EloOptions) -> Self {
        Self { k: options.k_factor }
    }
}

impl RatingStrategy for PairwiseElo {
    fn update(&self, kind: RatingKind, roster: &mut Roster, winners: &Lineup, losers: &Lineup) {
        for winner in winners.iter() {
            for loser in losers.iter() {
                let ratings = (
                    roster.get(winner).map(|p| kind.rating(p)),
                    roster.get(loser).map(|p| kind.rating(p)),
                );
                let (Some(winner_rating), Some(loser_rating)) = ratings else {
                    warn!("update: {winner} or {loser} missing from roster");
                    continue;
                };
                let expected = expected_score(winner_rating, loser_rating);
                let delta = self.k * (1.0 - expected);
                if let Some(p) = roster.get_mut(winner) {
                    kind.set_rating(p, winner_rating + delta);
                }
                if let Some(p) = roster.get_mut(loser) {
                    kind.set_rating(p, loser_rating - delta);
                }
            }
        }

        // Counters move once per player, not once per pair.
        for winner in winners.iter() {
            match roster.get_mut(winner) {
                Some(p) => kind.record_win(p),
                None => warn!("record_win: {winner} missing from roster"),
            }
        }
        for loser in losers.iter() {
            match roster.get_mut(loser) {
                Some(p) => kind.record_loss(p),
                None => warn!("record_loss: {loser} missing from roster"),
            }
        }
    }
}

/// Probability that `rating` beats `opponent` under the Elo curve.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0f64.powf((opponent - rating) / 400.0))
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BalanceError {
    #[error("cannot split {0} players into two teams, at least 2 required")]
    NotEnoughPlayers(usize),
}

/// Splits the selected players into two lineups whose sizes differ by
/// at most one.
///
/// The descending rank sort is a seeding step only; the draw below is
/// uniform over the remaining pool and does not consume the order, so
/// skill balance is approximate rather than enforced. Size balance
/// comes from always appending to the smaller lineup, ties to team one.
pub fn split_teams(
    players: impl IntoIterator<Item = (PlayerId, f64)>,
    rng: &mut impl Rng,
) -> Result<(Lineup, Lineup), BalanceError> {
    let mut pool: Vec<(PlayerId, f64)> = players.into_iter().collect();
    if pool.len() < 2 {
        return Err(BalanceError::NotEnoughPlayers(pool.len()));
    }
    pool.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut one: Vec<PlayerId> = Vec::new();
    let mut two: Vec<PlayerId> = Vec::new();
    while !pool.is_empty() {
        let idx = rng.gen_range(0..pool.len());
        let (id, _) = pool.swap_remove(idx);
        if one.len() <= two.len() {
            one.push(id);
        } else {
            two.push(id);
        }
    }
    debug!(
        "split_teams: [{}] vs [{}]",
        one.iter().join(", "),
        two.iter().join(", ")
    );
    Ok((Lineup::new(one), Lineup::new(two)))
}
