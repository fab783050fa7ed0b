// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use heatcheck_api::{AuthClient, Client, FavoritesClient, StatsClient};
use heatcheck_app::{
    ApiError, ApiResult, AuthService, Credentials, FavoritePlayer, FavoritesService, NewUser,
    PlayerStats, Session, StatsService,
};
use heatcheck_db::Store;
use heatcheck_testkit::{FakeAuth, FakeFavorites, FakeStats, player_roster};
use heatcheck_tui::{AppRuntime, HomeFeed, InternalEvent};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info};

use crate::config::Config;

pub const DEMO_EMAIL: &str = "demo@heatcheck.dev";
pub const DEMO_PASSWORD: &str = "demo";
const DEMO_USERNAME: &str = "demo";
const DEMO_FAVORITES: [&str; 3] = ["Nikola Jokić", "Stephen Curry", "Victor Wembanyama"];

/// Backends plus the session store. Fetches that can outlive a keypress run
/// on worker threads and report back over the event channel.
pub struct ServiceRuntime {
    auth: Arc<dyn AuthService>,
    favorites: Arc<dyn FavoritesService>,
    stats: Arc<dyn StatsService>,
    store: Store,
    candidates: Vec<String>,
}

impl ServiceRuntime {
    pub fn new(
        auth: Arc<dyn AuthService>,
        favorites: Arc<dyn FavoritesService>,
        stats: Arc<dyn StatsService>,
        store: Store,
    ) -> Self {
        Self {
            auth,
            favorites,
            stats,
            store,
            candidates: player_roster(),
        }
    }

    pub fn from_config(config: &Config, store: Store) -> Result<Self> {
        let timeout = config.timeout()?;
        let auth_client = Client::new(config.auth_base_url(), timeout)
            .context("build auth API client; check [api].auth_base_url")?;
        let stats_client = Client::new(config.stats_base_url(), timeout)
            .context("build stats API client; check [api].stats_base_url")?;
        info!(
            auth = auth_client.base_url(),
            stats = stats_client.base_url(),
            timeout = ?auth_client.timeout(),
            "using remote backends"
        );

        Ok(Self::new(
            Arc::new(AuthClient::new(auth_client.clone())),
            Arc::new(FavoritesClient::new(auth_client)),
            Arc::new(StatsClient::new(stats_client)),
            store,
        ))
    }

    /// Offline backends with one registered user and a few favorites.
    pub fn demo(store: Store) -> Self {
        info!(email = DEMO_EMAIL, "running with demo backends");
        let auth = FakeAuth::with_user(DEMO_USERNAME, DEMO_EMAIL, DEMO_PASSWORD);
        let favorites =
            FakeFavorites::with_players(FakeAuth::token_for(DEMO_USERNAME), &DEMO_FAVORITES);
        Self::new(
            Arc::new(auth),
            Arc::new(favorites),
            Arc::new(FakeStats::default()),
            store,
        )
    }

    #[cfg(test)]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl AppRuntime for ServiceRuntime {
    fn candidates(&self) -> Vec<String> {
        self.candidates.clone()
    }

    fn login(&mut self, credentials: &Credentials) -> ApiResult<Session> {
        self.auth.login(credentials)
    }

    fn signup(&mut self, new_user: &NewUser) -> ApiResult<String> {
        self.auth.signup(new_user)
    }

    fn save_session(&mut self, session: &Session) -> Result<()> {
        self.store.save_session(session)
    }

    fn clear_session(&mut self) -> Result<()> {
        self.store.clear_session()
    }

    fn check_favorite(&mut self, player_name: &str, token: &str) -> ApiResult<bool> {
        self.favorites.check_status(player_name, token)
    }

    fn toggle_favorite(
        &mut self,
        player_name: &str,
        currently_favorited: bool,
        token: &str,
    ) -> ApiResult<bool> {
        self.favorites.toggle(player_name, currently_favorited, token)
    }

    fn load_favorites(&mut self, token: &str) -> ApiResult<Vec<FavoritePlayer>> {
        heatcheck_app::load_favorites(self.favorites.as_ref(), self.stats.as_ref(), token)
    }

    fn load_player_stats(&mut self, player_name: &str) -> ApiResult<PlayerStats> {
        self.stats.player_stats(player_name)
    }

    fn load_home_feed(&mut self) -> HomeFeed {
        fetch_home_feed(self.stats.as_ref())
    }

    fn spawn_favorites_load(
        &mut self,
        request_id: u64,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let favorites = Arc::clone(&self.favorites);
        let stats = Arc::clone(&self.stats);
        let token = token.to_owned();
        thread::Builder::new()
            .name("favorites-load".to_owned())
            .spawn(move || {
                let result =
                    heatcheck_app::load_favorites(favorites.as_ref(), stats.as_ref(), &token);
                if tx
                    .send(InternalEvent::FavoritesLoaded { request_id, result })
                    .is_err()
                {
                    debug!(request_id, "favorites result dropped; UI closed");
                }
            })
            .context("spawn favorites loader")?;
        Ok(())
    }

    fn spawn_player_lookup(
        &mut self,
        request_id: u64,
        player_name: &str,
        token: Option<&str>,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let favorites = Arc::clone(&self.favorites);
        let stats = Arc::clone(&self.stats);
        let name = player_name.to_owned();
        let token = token.map(str::to_owned);
        thread::Builder::new()
            .name("player-lookup".to_owned())
            .spawn(move || {
                let result = stats.player_stats(&name);
                let favorited = match (&result, token.as_deref()) {
                    (Ok(_), Some(token)) => favorites
                        .check_status(&name, token)
                        .inspect_err(|error| debug!(%error, "favorite status check failed"))
                        .unwrap_or(false),
                    _ => false,
                };
                let event = InternalEvent::PlayerLoaded {
                    request_id,
                    name,
                    result,
                    favorited,
                };
                if tx.send(event).is_err() {
                    debug!(request_id, "lookup result dropped; UI closed");
                }
            })
            .context("spawn player lookup")?;
        Ok(())
    }

    fn spawn_home_feed(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let stats = Arc::clone(&self.stats);
        thread::Builder::new()
            .name("home-feed".to_owned())
            .spawn(move || {
                let feed = fetch_home_feed(stats.as_ref());
                if tx
                    .send(InternalEvent::HomeFeedLoaded { request_id, feed })
                    .is_err()
                {
                    debug!(request_id, "home feed dropped; UI closed");
                }
            })
            .context("spawn home feed loader")?;
        Ok(())
    }

    fn spawn_login(
        &mut self,
        request_id: u64,
        credentials: &Credentials,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let auth = Arc::clone(&self.auth);
        let credentials = credentials.clone();
        thread::Builder::new()
            .name("login".to_owned())
            .spawn(move || {
                let result = auth.login(&credentials);
                if tx
                    .send(InternalEvent::LoginFinished { request_id, result })
                    .is_err()
                {
                    debug!(request_id, "login result dropped; UI closed");
                }
            })
            .context("spawn login")?;
        Ok(())
    }

    fn spawn_signup(
        &mut self,
        request_id: u64,
        new_user: &NewUser,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let auth = Arc::clone(&self.auth);
        let new_user = new_user.clone();
        thread::Builder::new()
            .name("signup".to_owned())
            .spawn(move || {
                let result = auth.signup(&new_user);
                let event = InternalEvent::SignupFinished {
                    request_id,
                    email: new_user.email,
                    result,
                };
                if tx.send(event).is_err() {
                    debug!(request_id, "signup result dropped; UI closed");
                }
            })
            .context("spawn signup")?;
        Ok(())
    }

    fn spawn_toggle_favorite(
        &mut self,
        request_id: u64,
        player_name: &str,
        currently_favorited: bool,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let favorites = Arc::clone(&self.favorites);
        let name = player_name.to_owned();
        let token = token.to_owned();
        thread::Builder::new()
            .name("favorite-toggle".to_owned())
            .spawn(move || {
                let result = favorites.toggle(&name, currently_favorited, &token);
                let event = InternalEvent::FavoriteToggled {
                    request_id,
                    name,
                    result,
                };
                if tx.send(event).is_err() {
                    debug!(request_id, "favorite toggle dropped; UI closed");
                }
            })
            .context("spawn favorite toggle")?;
        Ok(())
    }
}

/// Both feeds are requested together and fail independently.
fn fetch_home_feed(stats: &dyn StatsService) -> HomeFeed {
    thread::scope(|scope| {
        let top5 = scope.spawn(|| stats.top5_last5_games());
        let heating_up = stats.heat_up_players();
        let top5 = top5.join().unwrap_or_else(|_| {
            Err(ApiError::Decode {
                url: "/top5_last5".to_owned(),
                message: "feed worker panicked".to_owned(),
            })
        });
        HomeFeed { top5, heating_up }
    })
}

#[cfg(test)]
mod tests {
    use super::{DEMO_EMAIL, DEMO_PASSWORD, ServiceRuntime};
    use anyhow::Result;
    use heatcheck_app::{ApiError, Credentials, NewUser};
    use heatcheck_db::Store;
    use heatcheck_testkit::sample_session;
    use heatcheck_tui::{AppRuntime, InternalEvent};
    use std::sync::mpsc;
    use std::time::Duration;

    fn demo_runtime() -> Result<ServiceRuntime> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        Ok(ServiceRuntime::demo(store))
    }

    fn demo_login(runtime: &mut ServiceRuntime) -> String {
        runtime
            .login(&Credentials {
                email: DEMO_EMAIL.to_owned(),
                password: DEMO_PASSWORD.to_owned(),
            })
            .expect("demo user should log in")
            .token
    }

    #[test]
    fn demo_user_can_log_in() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let session = runtime
            .login(&Credentials {
                email: DEMO_EMAIL.to_owned(),
                password: DEMO_PASSWORD.to_owned(),
            })
            .expect("demo login");
        assert_eq!(session.user.username, "demo");

        let error = runtime
            .login(&Credentials {
                email: DEMO_EMAIL.to_owned(),
                password: "nope".to_owned(),
            })
            .expect_err("wrong password");
        assert!(matches!(error, ApiError::Auth(_)));
        Ok(())
    }

    #[test]
    fn signup_then_login_with_new_account() -> Result<()> {
        let mut runtime = demo_runtime()?;
        runtime
            .signup(&NewUser {
                username: "rookie".to_owned(),
                email: "rookie@example.com".to_owned(),
                password: "pw".to_owned(),
            })
            .expect("signup");
        let session = runtime
            .login(&Credentials {
                email: "rookie@example.com".to_owned(),
                password: "pw".to_owned(),
            })
            .expect("login after signup");
        assert_eq!(session.user.username, "rookie");
        Ok(())
    }

    #[test]
    fn session_writes_go_to_the_store() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let session = sample_session();
        runtime.save_session(&session)?;
        assert_eq!(runtime.store().load_session()?, Some(session));

        runtime.clear_session()?;
        assert_eq!(runtime.store().load_session()?, None);
        Ok(())
    }

    #[test]
    fn demo_favorites_load_with_stats() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let token = demo_login(&mut runtime);
        let players = runtime.load_favorites(&token).expect("favorites");
        let names: Vec<_> = players.iter().map(|player| player.name.as_str()).collect();
        assert!(names.contains(&"Stephen Curry"));
        assert_eq!(players.len(), 3);
        Ok(())
    }

    #[test]
    fn toggle_flips_favorite_status() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let token = demo_login(&mut runtime);
        assert!(!runtime.check_favorite("LeBron James", &token).expect("check"));

        assert!(runtime.toggle_favorite("LeBron James", false, &token).expect("add"));
        assert!(runtime.check_favorite("LeBron James", &token).expect("check"));

        assert!(!runtime.toggle_favorite("LeBron James", true, &token).expect("remove"));
        assert!(!runtime.check_favorite("LeBron James", &token).expect("check"));
        Ok(())
    }

    #[test]
    fn spawned_lookup_reports_stats_and_status() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let token = demo_login(&mut runtime);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_player_lookup(7, "Stephen Curry", Some(&token), tx)?;
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::PlayerLoaded {
                request_id,
                name,
                result,
                favorited,
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(name, "Stephen Curry");
                assert!(result.is_ok());
                assert!(favorited);
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn spawned_lookup_for_guest_skips_status() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let (tx, rx) = mpsc::channel();

        runtime.spawn_player_lookup(1, "Nobody Special", None, tx)?;
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::PlayerLoaded {
                result, favorited, ..
            } => {
                assert_eq!(result, Err(ApiError::NotFound("Nobody Special".to_owned())));
                assert!(!favorited);
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn spawned_favorites_and_home_feed_report_back() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let token = demo_login(&mut runtime);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_favorites_load(3, &token, tx.clone())?;
        runtime.spawn_home_feed(4, tx)?;

        let mut saw_favorites = false;
        let mut saw_feed = false;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5))? {
                InternalEvent::FavoritesLoaded { request_id, result } => {
                    assert_eq!(request_id, 3);
                    assert_eq!(result.expect("favorites").len(), 3);
                    saw_favorites = true;
                }
                InternalEvent::HomeFeedLoaded { request_id, feed } => {
                    assert_eq!(request_id, 4);
                    assert!(!feed.top5.expect("top5").is_empty());
                    assert!(feed.heating_up.is_ok());
                    saw_feed = true;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_favorites && saw_feed);
        Ok(())
    }

    #[test]
    fn spawned_login_and_signup_report_back() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let (tx, rx) = mpsc::channel();

        let credentials = Credentials {
            email: DEMO_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        };
        runtime.spawn_login(11, &credentials, tx.clone())?;
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::LoginFinished { request_id, result } => {
                assert_eq!(request_id, 11);
                assert_eq!(result.expect("demo login").user.username, "demo");
            }
            other => panic!("unexpected event {other:?}"),
        }

        let new_user = NewUser {
            username: "rookie".to_owned(),
            email: "rookie@example.com".to_owned(),
            password: "pw".to_owned(),
        };
        runtime.spawn_signup(12, &new_user, tx)?;
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::SignupFinished {
                request_id,
                email,
                result,
            } => {
                assert_eq!(request_id, 12);
                assert_eq!(email, "rookie@example.com");
                assert!(result.is_ok());
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn spawned_toggle_reports_new_status() -> Result<()> {
        let mut runtime = demo_runtime()?;
        let token = demo_login(&mut runtime);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_toggle_favorite(21, "Stephen Curry", true, &token, tx)?;
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::FavoriteToggled {
                request_id,
                name,
                result,
            } => {
                assert_eq!(request_id, 21);
                assert_eq!(name, "Stephen Curry");
                assert_eq!(result, Ok(false));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(!runtime.check_favorite("Stephen Curry", &token).expect("check"));
        Ok(())
    }

    #[test]
    fn candidates_come_from_the_roster() -> Result<()> {
        let runtime = demo_runtime()?;
        let candidates = runtime.candidates();
        assert!(candidates.iter().any(|name| name == "LeBron James"));
        Ok(())
    }
}
