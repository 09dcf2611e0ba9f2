use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::PlayerId;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHistory {
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub winner: Vec<PlayerId>,
    pub loser: Vec<PlayerId>,
    /// True when the match came from a pick-ban draft rather than the
    /// randomizer flow.
    #[serde(default)]
    pub draft: bool,
}

impl HistoryEntry {
    pub fn all_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.winner.iter().chain(self.loser.iter())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn all_players_chains_both_sides() {
        let entry = HistoryEntry {
            timestamp: DateTime::<Utc>::from_timestamp(1, 0).unwrap().into(),
            winner: vec![PlayerId::from("j"), PlayerId::from("bixkog")],
            loser: vec![PlayerId::from("spawek")],
            draft: false,
        };
        let all: Vec<_> = entry.all_players().map(PlayerId::as_str).collect();
        assert_eq!(all, vec!["j", "bixkog", "spawek"]);
    }

    #[test]
    fn draft_flag_defaults_to_false() {
        let json = r#"{
            "timestamp": "2024-06-01T20:00:00+02:00",
            "winner": ["j"],
            "loser": ["bixkog"]
        }"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.draft);
    }
}
