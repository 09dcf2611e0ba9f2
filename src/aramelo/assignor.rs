use aramelo_model::player::Roster;
use aramelo_model::{Lineup, Role};
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use super::config::Config;

/// Gives every lineup member a role and a random hero from that role's
/// sub-pool, recording the selection on the player's profile.
///
/// Roles are dealt in shuffled blocks of the five fixed roles: the
/// first five members always get distinct roles, larger teams repeat
/// roles block by block. Each lineup is assigned independently, so the
/// same hero can appear on both teams.
pub fn assign_roles_and_heroes(
    lineup: &Lineup,
    roster: &mut Roster,
    config: &Config,
    rng: &mut impl Rng,
) {
    let mut roles: Vec<Role> = Vec::with_capacity(lineup.len());
    while roles.len() < lineup.len() {
        let mut block = Role::ALL;
        block.shuffle(rng);
        roles.extend(block);
    }

    for (member, role) in lineup.iter().zip(roles) {
        let Some(player) = roster.get_mut(member) else {
            warn!("assign: {member} missing from roster");
            continue;
        };
        player.role = Some(role);
        match config.heroes_for(role).choose(rng) {
            Some(hero) => {
                player.hero = Some(hero.clone());
                player.record_hero_selection(hero.clone());
            }
            None => warn!("assign: no heroes configured for {role}"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use aramelo_model::player::Player;
    use aramelo_model::PlayerId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn setup(names: &[&str]) -> (Lineup, Roster) {
        let lineup: Lineup = names.iter().copied().map(PlayerId::from).collect();
        let roster = Roster::new(names.iter().map(|n| Player::new(PlayerId::from(*n))));
        (lineup, roster)
    }

    #[test]
    fn five_members_get_five_distinct_roles() {
        let (lineup, mut roster) = setup(&["a", "b", "c", "d", "e"]);
        let mut rng = StdRng::seed_from_u64(3);
        assign_roles_and_heroes(&lineup, &mut roster, &Config::default(), &mut rng);

        let roles: BTreeSet<Role> = roster.all().map(|p| p.role.unwrap()).collect();
        assert_eq!(roles.len(), 5);
    }

    #[test]
    fn heroes_come_from_the_assigned_roles_pool() {
        let (lineup, mut roster) = setup(&["a", "b", "c"]);
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(3);
        assign_roles_and_heroes(&lineup, &mut roster, &config, &mut rng);

        for player in roster.all() {
            let hero = player.hero.as_ref().unwrap();
            assert!(config.heroes_for(player.role.unwrap()).contains(hero));
            assert_eq!(player.hero_selection_count.get(hero), Some(&1));
        }
    }

    #[test]
    fn oversized_team_repeats_roles_after_the_first_five() {
        let (lineup, mut roster) = setup(&["a", "b", "c", "d", "e", "f", "g"]);
        let mut rng = StdRng::seed_from_u64(3);
        assign_roles_and_heroes(&lineup, &mut roster, &Config::default(), &mut rng);

        let first_five: BTreeSet<Role> = lineup
            .iter()
            .take(5)
            .map(|id| roster.get(id).unwrap().role.unwrap())
            .collect();
        assert_eq!(first_five.len(), 5);
        assert!(roster.all().all(|p| p.role.is_some() && p.hero.is_some()));
    }

    #[test]
    fn unknown_members_are_skipped() {
        let (lineup, _) = setup(&["a", "ghost"]);
        let mut roster = Roster::new([Player::new(PlayerId::from("a"))]);
        let mut rng = StdRng::seed_from_u64(3);
        assign_roles_and_heroes(&lineup, &mut roster, &Config::default(), &mut rng);
        assert!(roster.get(&PlayerId::from("a")).unwrap().role.is_some());
    }
}
