// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApiError, Credentials, FavoriteEntry, NewUser, PlayerStats, Session};

pub type ApiResult<T> = Result<T, ApiError>;

pub trait AuthService: Send + Sync {
    fn login(&self, credentials: &Credentials) -> ApiResult<Session>;
    /// Returns the backend's confirmation message.
    fn signup(&self, new_user: &NewUser) -> ApiResult<String>;
}

/// Favorites are shared with background fetch threads, hence `Send + Sync`.
pub trait FavoritesService: Send + Sync {
    fn list(&self, token: &str) -> ApiResult<Vec<FavoriteEntry>>;
    fn add(&self, player_name: &str, token: &str) -> ApiResult<()>;
    fn remove(&self, player_name: &str, token: &str) -> ApiResult<()>;
    fn check_status(&self, player_name: &str, token: &str) -> ApiResult<bool>;

    /// Removes when currently favorited, adds otherwise. Returns the new status.
    fn toggle(&self, player_name: &str, currently_favorited: bool, token: &str) -> ApiResult<bool> {
        if currently_favorited {
            self.remove(player_name, token)?;
            Ok(false)
        } else {
            self.add(player_name, token)?;
            Ok(true)
        }
    }
}

pub trait StatsService: Send + Sync {
    fn player_stats(&self, player_name: &str) -> ApiResult<PlayerStats>;
    fn top5_last5_games(&self) -> ApiResult<Vec<PlayerStats>>;
    fn heat_up_players(&self) -> ApiResult<Vec<PlayerStats>>;
}
