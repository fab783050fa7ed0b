// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApiError, FavoritePlayer, FavoritesService, StatsService};
use std::collections::BTreeMap;
use std::thread;
use tracing::{debug, info, warn};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to view your favorites.";
pub const TOGGLE_FAILED_MESSAGE: &str = "Failed to update favorite. Please try again.";
pub const LOGIN_TO_SAVE_MESSAGE: &str = "Please login to save favorites";

/// Last known record per player. Outlives list refreshes so a detail view
/// can still render a player who was just removed from the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerCache {
    players: BTreeMap<String, FavoritePlayer>,
}

impl PlayerCache {
    pub fn get(&self, name: &str) -> Option<&FavoritePlayer> {
        self.players.get(name)
    }

    pub fn upsert(&mut self, player: FavoritePlayer) {
        self.players.insert(player.name.clone(), player);
    }

    pub fn set_favorited(&mut self, name: &str, favorited: bool) {
        if let Some(player) = self.players.get_mut(name) {
            player.is_favorited = favorited;
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesPhase {
    Idle,
    Loading,
    Failed(String),
    Ready,
}

/// What the favorites screen should draw right now.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    List(Vec<&'a FavoritePlayer>),
    Detail(&'a FavoritePlayer),
    NotFound(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesCommand {
    Mount {
        authenticated: bool,
    },
    LoadFinished {
        request_id: u64,
        result: Result<Vec<FavoritePlayer>, ApiError>,
    },
    SetFilter(String),
    ViewStats(String),
    FinishTransition,
    /// Outcome of a favorite toggle from the detail card; `Ok` carries the
    /// new status.
    FavoriteToggled {
        name: String,
        result: Result<bool, ApiError>,
    },
    Back,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    LoadRequested { request_id: u64 },
    Discarded { request_id: u64 },
    Loaded { count: usize },
    LoadFailed(String),
    TransitionStarted(String),
    DetailOpened(String),
    ReturnedToList,
    Alert(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesPage {
    phase: FavoritesPhase,
    players: Vec<FavoritePlayer>,
    cache: PlayerCache,
    selected: Option<String>,
    closing: Option<String>,
    filter: String,
    next_request_id: u64,
    in_flight: Option<u64>,
}

impl Default for FavoritesPage {
    fn default() -> Self {
        Self {
            phase: FavoritesPhase::Idle,
            players: Vec::new(),
            cache: PlayerCache::default(),
            selected: None,
            closing: None,
            filter: String::new(),
            next_request_id: 1,
            in_flight: None,
        }
    }
}

impl FavoritesPage {
    pub fn phase(&self) -> &FavoritesPhase {
        &self.phase
    }

    pub fn players(&self) -> &[FavoritePlayer] {
        &self.players
    }

    pub fn cache(&self) -> &PlayerCache {
        &self.cache
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.closing.is_some()
    }

    pub const fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// List rows matching the current filter, in list order.
    pub fn visible_players(&self) -> Vec<&FavoritePlayer> {
        let needle = self.filter.trim().to_lowercase();
        self.players
            .iter()
            .filter(|player| needle.is_empty() || player.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Fresh list first, then the cache.
    pub fn lookup(&self, name: &str) -> Option<&FavoritePlayer> {
        self.players
            .iter()
            .find(|player| player.name == name)
            .or_else(|| self.cache.get(name))
    }

    pub fn view(&self) -> FavoritesView<'_> {
        if let Some(name) = &self.selected {
            return match self.lookup(name) {
                Some(player) => FavoritesView::Detail(player),
                None => FavoritesView::NotFound(name),
            };
        }
        match &self.phase {
            FavoritesPhase::Idle | FavoritesPhase::Loading => FavoritesView::Loading,
            FavoritesPhase::Failed(message) => FavoritesView::Error(message),
            FavoritesPhase::Ready if self.players.is_empty() => FavoritesView::Empty,
            FavoritesPhase::Ready => FavoritesView::List(self.visible_players()),
        }
    }

    pub fn dispatch(&mut self, command: FavoritesCommand) -> Vec<FavoritesEvent> {
        match command {
            FavoritesCommand::Mount { authenticated } => {
                if !authenticated {
                    return self.require_login();
                }
                self.selected = None;
                self.closing = None;
                self.phase = FavoritesPhase::Loading;
                vec![self.request_load()]
            }
            FavoritesCommand::LoadFinished { request_id, result } => {
                self.finish_load(request_id, result)
            }
            FavoritesCommand::SetFilter(filter) => {
                if self.closing.is_some() {
                    return Vec::new();
                }
                self.filter = filter;
                Vec::new()
            }
            FavoritesCommand::ViewStats(name) => {
                let listing = self.selected.is_none()
                    && self.closing.is_none()
                    && self.phase == FavoritesPhase::Ready;
                if !listing {
                    return Vec::new();
                }
                debug!(player = %name, "opening detail");
                self.closing = Some(name.clone());
                vec![FavoritesEvent::TransitionStarted(name)]
            }
            FavoritesCommand::FinishTransition => match self.closing.take() {
                Some(name) => {
                    self.selected = Some(name.clone());
                    vec![FavoritesEvent::DetailOpened(name)]
                }
                None => Vec::new(),
            },
            FavoritesCommand::FavoriteToggled { name, result } => match result {
                Ok(favorited) => {
                    self.cache.set_favorited(&name, favorited);
                    if let Some(player) = self.players.iter_mut().find(|player| player.name == name) {
                        player.is_favorited = favorited;
                    }
                    vec![self.request_load()]
                }
                Err(ApiError::Unauthenticated) => {
                    vec![FavoritesEvent::Alert(LOGIN_TO_SAVE_MESSAGE.to_owned())]
                }
                Err(err) => {
                    warn!(player = %name, error = %err, "favorite toggle failed");
                    vec![FavoritesEvent::Alert(TOGGLE_FAILED_MESSAGE.to_owned())]
                }
            },
            FavoritesCommand::Back => {
                if self.selected.is_none() || self.closing.is_some() {
                    return Vec::new();
                }
                self.selected = None;
                self.phase = FavoritesPhase::Loading;
                vec![FavoritesEvent::ReturnedToList, self.request_load()]
            }
            FavoritesCommand::Reset => {
                let next_request_id = self.next_request_id;
                *self = Self {
                    next_request_id,
                    ..Self::default()
                };
                Vec::new()
            }
        }
    }

    fn require_login(&mut self) -> Vec<FavoritesEvent> {
        self.selected = None;
        self.closing = None;
        self.in_flight = None;
        self.players.clear();
        self.phase = FavoritesPhase::Failed(LOGIN_REQUIRED_MESSAGE.to_owned());
        vec![FavoritesEvent::LoadFailed(LOGIN_REQUIRED_MESSAGE.to_owned())]
    }

    fn request_load(&mut self) -> FavoritesEvent {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(request_id);
        FavoritesEvent::LoadRequested { request_id }
    }

    fn finish_load(
        &mut self,
        request_id: u64,
        result: Result<Vec<FavoritePlayer>, ApiError>,
    ) -> Vec<FavoritesEvent> {
        if self.in_flight != Some(request_id) {
            debug!(request_id, "discarding stale favorites result");
            return vec![FavoritesEvent::Discarded { request_id }];
        }
        self.in_flight = None;

        match result {
            Ok(players) => {
                for player in &players {
                    self.cache.upsert(player.clone());
                }
                let stale: Vec<String> = self
                    .cache
                    .players
                    .keys()
                    .filter(|name| !players.iter().any(|player| &player.name == *name))
                    .cloned()
                    .collect();
                for name in stale {
                    self.cache.set_favorited(&name, false);
                }
                let count = players.len();
                self.players = players;
                self.phase = FavoritesPhase::Ready;
                vec![FavoritesEvent::Loaded { count }]
            }
            Err(ApiError::Unauthenticated) => self.require_login(),
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, "favorites fetch failed");
                if self.selected.is_some() {
                    // Detail stays on screen; the refresh was in the background.
                    self.phase = FavoritesPhase::Ready;
                    return vec![FavoritesEvent::Alert(message)];
                }
                self.phase = FavoritesPhase::Failed(message.clone());
                vec![FavoritesEvent::LoadFailed(message)]
            }
        }
    }
}

/// Fetches the favorites list, then every favorite's stats concurrently.
/// A failed stat fetch yields a degraded record in place of the player.
pub fn load_favorites<F, S>(
    favorites: &F,
    stats: &S,
    token: &str,
) -> Result<Vec<FavoritePlayer>, ApiError>
where
    F: FavoritesService + ?Sized,
    S: StatsService + ?Sized,
{
    let entries = favorites.list(token)?;
    let players: Vec<FavoritePlayer> = thread::scope(|scope| {
        let handles: Vec<_> = entries
            .iter()
            .map(|entry| {
                let handle = scope.spawn(move || stats.player_stats(&entry.player_name));
                (entry, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(entry, handle)| match handle.join() {
                Ok(Ok(player_stats)) => FavoritePlayer::loaded(entry, player_stats),
                Ok(Err(err)) => {
                    warn!(player = %entry.player_name, error = %err, "stats fetch failed");
                    FavoritePlayer::degraded(entry)
                }
                Err(_) => {
                    warn!(player = %entry.player_name, "stats fetch panicked");
                    FavoritePlayer::degraded(entry)
                }
            })
            .collect()
    });

    let degraded = players.iter().filter(|player| player.error).count();
    info!(count = players.len(), degraded, "favorites loaded");
    Ok(players)
}
