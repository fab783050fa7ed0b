// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const KEY_PLAYER_NAME: &str = "PLAYER_NAME";
pub const KEY_GAME_DATE: &str = "GAME_DATE";
pub const ERROR_LOADING: &str = "Error loading";
pub const NOT_AVAILABLE: &str = "N/A";

/// Stat payload returned by the stats backend, keyed by upper-case column
/// names (`PTS`, `GAME_DATE`, ...). Unknown keys are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStats(Map<String, Value>);

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts either a bare stat object or one wrapped as `{"stats": {...}}`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(mut fields) => match fields.remove("stats") {
                Some(Value::Object(inner)) => Some(Self(inner)),
                Some(other) => {
                    fields.insert("stats".to_owned(), other);
                    Some(Self(fields))
                }
                None => Some(Self(fields)),
            },
            _ => None,
        }
    }

    /// Placeholder payload for a player whose stats could not be fetched.
    pub fn degraded(player_name: &str) -> Self {
        let mut stats = Self::new();
        stats.insert(KEY_PLAYER_NAME, Value::from(player_name));
        stats.insert(KEY_GAME_DATE, Value::from(ERROR_LOADING));
        stats.insert("PTS", Value::from(NOT_AVAILABLE));
        stats.insert("MIN", Value::from(NOT_AVAILABLE));
        stats.insert("PTS_AVG_LAST_5_USER", Value::from(NOT_AVAILABLE));
        stats
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn player_name(&self) -> Option<&str> {
        self.text(KEY_PLAYER_NAME)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One row of the favorites list as the favorites API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub player_name: String,
    #[serde(default)]
    pub added_at: Option<String>,
}

impl FavoriteEntry {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            added_at: None,
        }
    }
}

/// A favorite joined with its stats. Records whose stats fetch failed are
/// kept with `error` set instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritePlayer {
    pub name: String,
    pub stats: PlayerStats,
    pub error: bool,
    pub is_favorited: bool,
    pub added_at: Option<String>,
}

impl FavoritePlayer {
    pub fn loaded(entry: &FavoriteEntry, mut stats: PlayerStats) -> Self {
        if stats.player_name().is_none() {
            stats.insert(KEY_PLAYER_NAME, Value::from(entry.player_name.as_str()));
        }
        Self {
            name: entry.player_name.clone(),
            stats,
            error: false,
            is_favorited: true,
            added_at: entry.added_at.clone(),
        }
    }

    pub fn degraded(entry: &FavoriteEntry) -> Self {
        Self {
            name: entry.player_name.clone(),
            stats: PlayerStats::degraded(&entry.player_name),
            error: true,
            is_favorited: true,
            added_at: entry.added_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }

    /// Backend id, sent as `_id` or `id`.
    pub fn id(&self) -> Option<&str> {
        ["_id", "id"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::{FavoriteEntry, FavoritePlayer, PlayerStats, User};
    use serde_json::json;

    #[test]
    fn from_json_unwraps_stats_envelope() {
        let stats = PlayerStats::from_json(json!({
            "player": "LeBron James",
            "stats": {"PTS": 31.0, "GAME_DATE": "2025-03-01"}
        }))
        .expect("object payload");
        assert_eq!(stats.number("PTS"), Some(31.0));
        assert!(stats.get("player").is_none());
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(PlayerStats::from_json(json!([1, 2, 3])).is_none());
        assert!(PlayerStats::from_json(json!("nope")).is_none());
    }

    #[test]
    fn degraded_record_marks_error_loading() {
        let player = FavoritePlayer::degraded(&FavoriteEntry::new("Unknown Player"));
        assert!(player.error);
        assert!(player.is_favorited);
        assert_eq!(player.stats.text("GAME_DATE"), Some("Error loading"));
        assert_eq!(player.stats.text("PTS"), Some("N/A"));
        assert_eq!(player.stats.player_name(), Some("Unknown Player"));
    }

    #[test]
    fn loaded_record_fills_missing_player_name() {
        let mut stats = PlayerStats::new();
        stats.insert("PTS", json!(22.5));
        let entry = FavoriteEntry {
            player_name: "Ja Morant".to_owned(),
            added_at: Some("2025-01-02T03:04:05Z".to_owned()),
        };
        let player = FavoritePlayer::loaded(&entry, stats);
        assert_eq!(player.stats.player_name(), Some("Ja Morant"));
        assert_eq!(player.added_at.as_deref(), Some("2025-01-02T03:04:05Z"));
        assert!(!player.error);
    }

    #[test]
    fn favorite_entry_uses_camel_case_wire_names() {
        let entry: FavoriteEntry =
            serde_json::from_value(json!({"playerName": "Luka Dončić", "addedAt": "x"}))
                .expect("decode entry");
        assert_eq!(entry.player_name, "Luka Dončić");
        assert_eq!(entry.added_at.as_deref(), Some("x"));
    }

    #[test]
    fn user_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "_id": "abc123",
            "username": "hooper",
            "email": "hooper@example.com"
        }))
        .expect("decode user");
        assert_eq!(user.display_name(), "hooper");
        assert_eq!(user.extra.get("_id"), Some(&json!("abc123")));
        assert_eq!(user.id(), Some("abc123"));
        assert_eq!(User::default().id(), None);
    }
}
