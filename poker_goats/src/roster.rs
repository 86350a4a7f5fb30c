//! Roster of known players.
//!
//! The roster only grows. Identifiers are kept exactly as entered (after
//! trimming), so `Alice` and `alice` are distinct entries; lookups made on
//! behalf of users go through [`Roster::resolve`], which prefers an exact
//! match and falls back to the first case-insensitive one.

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, collections::HashMap, fmt};

use crate::session::{
    entities::Amount,
    errors::{SessionError, SessionResult},
};

/// Unique, case-sensitive player identifier.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against raw user input.
    #[must_use]
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered player.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    /// Running balance across sessions. Stored but not yet aggregated.
    pub balance: Amount,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            balance: Amount::ZERO,
        }
    }
}

/// Insertion-ordered mapping of player identifiers to players.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(from = "Vec<Player>", into = "Vec<Player>")]
pub struct Roster {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add players by name, returning the identifiers that were new.
    ///
    /// Names are trimmed. If any name is empty after trimming the whole batch
    /// is rejected and the roster is left untouched. Names already on the
    /// roster (or repeated within the batch) are skipped.
    pub fn add_players<I, S>(&mut self, names: I) -> SessionResult<Vec<PlayerId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();

        if names.iter().any(String::is_empty) {
            return Err(SessionError::InvalidInput(
                "player names can't be empty".to_string(),
            ));
        }

        let mut added = Vec::new();
        for name in names {
            let id = PlayerId::from(name);
            if self.index.contains_key(&id) {
                continue;
            }
            self.index.insert(id.clone(), self.players.len());
            self.players.push(Player::new(id.clone()));
            added.push(id);
        }

        if !added.is_empty() {
            log::info!("Roster grew by {} to {} players", added.len(), self.players.len());
        }

        Ok(added)
    }

    /// Known identifiers in insertion order.
    #[must_use]
    pub fn list_players(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Player> {
        self.index.get(id).map(|&i| &self.players[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Resolve user input to a stored identifier: exact match first, then the
    /// first case-insensitive match in roster order.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&PlayerId> {
        let name = name.trim();
        if let Some(player) = self.get(name) {
            return Some(&player.id);
        }
        self.players
            .iter()
            .map(|p| &p.id)
            .find(|id| id.matches_ignore_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl From<Vec<Player>> for Roster {
    fn from(players: Vec<Player>) -> Self {
        let mut roster = Self::default();
        for player in players {
            if roster.index.contains_key(&player.id) {
                continue;
            }
            roster.index.insert(player.id.clone(), roster.players.len());
            roster.players.push(player);
        }
        roster
    }
}

impl From<Roster> for Vec<Player> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_players_trims_and_dedups() {
        let mut roster = Roster::new();
        let added = roster.add_players([" alice", "bob ", "alice"]).unwrap();
        assert_eq!(added, vec![PlayerId::from("alice"), PlayerId::from("bob")]);

        let added = roster.add_players(["bob", "carol"]).unwrap();
        assert_eq!(added, vec![PlayerId::from("carol")]);
        assert_eq!(
            roster.list_players(),
            vec![
                PlayerId::from("alice"),
                PlayerId::from("bob"),
                PlayerId::from("carol")
            ]
        );
    }

    #[test]
    fn test_empty_name_rejects_whole_batch() {
        let mut roster = Roster::new();
        let err = roster.add_players(["alice", "  "]).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let mut roster = Roster::new();
        roster.add_players(["Alice", "alice"]).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let mut roster = Roster::new();
        roster.add_players(["Alice", "alice", "Bob"]).unwrap();
        assert_eq!(roster.resolve("alice").map(PlayerId::as_str), Some("alice"));
        assert_eq!(roster.resolve("ALICE").map(PlayerId::as_str), Some("Alice"));
        assert_eq!(roster.resolve("bob").map(PlayerId::as_str), Some("Bob"));
        assert_eq!(roster.resolve("dave"), None);
    }

    #[test]
    fn test_new_players_start_at_zero() {
        let mut roster = Roster::new();
        roster.add_players(["alice"]).unwrap();
        assert_eq!(roster.get("alice").unwrap().balance, Amount::ZERO);
    }

    #[test]
    fn test_serde_round_trip_restores_index() {
        let mut roster = Roster::new();
        roster.add_players(["alice", "bob"]).unwrap();
        let json = serde_json::to_string(&roster).unwrap();
        let restored: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, roster);
        assert!(restored.contains("bob"));
    }
}
