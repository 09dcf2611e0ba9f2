use std::borrow::Borrow;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod history;
pub mod player;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Hash, Default)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        PlayerId(value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        PlayerId(String::from(value))
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Hero(String);

impl Hero {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Hero {
    fn from(value: String) -> Self {
        Hero(value)
    }
}

impl From<&str> for Hero {
    fn from(value: &str) -> Self {
        Hero(String::from(value))
    }
}

impl Display for Hero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for Hero {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The five fixed team positions. Every hero belongs to exactly one
/// role's sub-pool.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Hash,
)]
pub enum Role {
    Carry,
    Support,
    Solo,
    Jungle,
    Mid,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Carry, Role::Support, Role::Solo, Role::Jungle, Role::Mid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Carry => "Carry",
            Role::Support => "Support",
            Role::Solo => "Solo",
            Role::Jungle => "Jungle",
            Role::Mid => "Mid",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid value: {0}")]
pub struct FromStrError(String);

impl TryFrom<&str> for Role {
    type Error = FromStrError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "carry" => Ok(Role::Carry),
            "support" => Ok(Role::Support),
            "solo" => Ok(Role::Solo),
            "jungle" => Ok(Role::Jungle),
            "mid" => Ok(Role::Mid),
            other => Err(FromStrError(other.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Team::One => "Team 1",
            Team::Two => "Team 2",
        })
    }
}

/// An ordered team roster. Position establishes turn order during a
/// draft and display order elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub players: Vec<PlayerId>,
}

impl Lineup {
    pub fn new(players: Vec<PlayerId>) -> Self {
        Lineup { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| p == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter()
    }

    pub fn last(&self) -> Option<&PlayerId> {
        self.players.last()
    }

    pub fn get(&self, idx: usize) -> Option<&PlayerId> {
        self.players.get(idx)
    }
}

impl FromIterator<PlayerId> for Lineup {
    fn from_iter<T: IntoIterator<Item = PlayerId>>(iter: T) -> Self {
        Lineup::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn role_from_str_is_case_insensitive() {
        assert_eq!(Role::try_from("jungle").unwrap(), Role::Jungle);
        assert_eq!(Role::try_from("CARRY").unwrap(), Role::Carry);
    }

    #[test]
    fn role_from_str_error() {
        assert_eq!(
            &Role::try_from("offlane").unwrap_err().to_string(),
            "Invalid value: offlane"
        );
    }
}
