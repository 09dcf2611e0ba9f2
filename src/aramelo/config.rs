use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};
use aramelo_model::{Hero, Role};
use pairelo::EloOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Bans each team makes before picks start in a draft.
    #[serde(default = "default_bans_per_team")]
    pub bans_per_team: usize,

    /// Reject unknown hero names during a draft instead of recording
    /// them verbatim. Off by default.
    #[serde(default)]
    pub strict_draft_validation: bool,

    #[serde(default)]
    pub elo: EloOptions,

    /// The five role sub-pools. Together they form the global hero set.
    #[serde(default = "default_role_pools")]
    pub roles: BTreeMap<Role, Vec<Hero>>,
}

fn default_bans_per_team() -> usize {
    1
}

fn heroes(names: &[&str]) -> Vec<Hero> {
    names.iter().copied().map(Hero::from).collect()
}

fn default_role_pools() -> BTreeMap<Role, Vec<Hero>> {
    BTreeMap::from([
        (
            Role::Carry,
            heroes(&["Twinblast", "Sparrow", "Wraith", "Murdock", "Revenant"]),
        ),
        (
            Role::Support,
            heroes(&["Steel", "Maco", "Muriel", "Dekker", "Narbash"]),
        ),
        (
            Role::Solo,
            heroes(&["Serath", "Aurora", "Rampage", "Feng Mao", "Countess", "Shinbi", "Zena"]),
        ),
        (
            Role::Jungle,
            heroes(&["Grux", "Sevarog", "Khaimera", "Kallari", "Wukong", "Crunch"]),
        ),
        (
            Role::Mid,
            heroes(&["Gideon", "The Fey", "Howitzer", "Belica", "Gadget", "Phase"]),
        ),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bans_per_team: default_bans_per_team(),
            strict_draft_validation: false,
            elo: EloOptions::default(),
            roles: default_role_pools(),
        }
    }
}

impl Config {
    pub fn heroes_for(&self, role: Role) -> &[Hero] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The global hero set, the union of all role sub-pools.
    pub fn hero_pool(&self) -> BTreeSet<Hero> {
        self.roles.values().flatten().cloned().collect()
    }

    /// Every hero must belong to exactly one role's sub-pool.
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeMap<&Hero, Role> = BTreeMap::new();
        for (role, pool) in &self.roles {
            for hero in pool {
                if let Some(previous) = seen.insert(hero, *role) {
                    bail!("hero {hero} appears in both {previous} and {role} pools");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_pools_are_disjoint() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn default_pool_size() {
        assert_eq!(Config::default().hero_pool().len(), 29);
    }

    #[test]
    fn duplicated_hero_across_roles_is_rejected() {
        let mut config = Config::default();
        config
            .roles
            .get_mut(&Role::Mid)
            .unwrap()
            .push(Hero::from("Steel"));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Steel"), "{err}");
    }

    #[test]
    fn deserialize_partial_config() {
        let yaml = "bansPerTeam: 2\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bans_per_team, 2);
        assert!(!config.strict_draft_validation);
        assert_eq!(config.elo.k_factor, 32.0);
        assert_eq!(config.roles, default_role_pools());
    }
}
