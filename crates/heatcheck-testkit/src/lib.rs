// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use heatcheck_app::{
    ApiError, ApiResult, AuthService, Credentials, FavoriteEntry, FavoritesService, NewUser,
    PlayerStats, Session, StatsService, User,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const PLAYER_ROSTER: [&str; 90] = [
    "Alex Sarr",
    "Alperen Sengun",
    "Amen Thompson",
    "Andrew Wiggins",
    "Anfernee Simons",
    "Anthony Davis",
    "Anthony Edwards",
    "Austin Reaves",
    "Bam Adebayo",
    "Bennedict Mathurin",
    "Bradley Beal",
    "Brandon Ingram",
    "Brandon Miller",
    "CJ McCollum",
    "Cade Cunningham",
    "Cam Thomas",
    "Cameron Johnson",
    "Chet Holmgren",
    "Coby White",
    "Collin Sexton",
    "D'Angelo Russell",
    "Damian Lillard",
    "Darius Garland",
    "De'Aaron Fox",
    "DeMar DeRozan",
    "Deni Avdija",
    "Desmond Bane",
    "Devin Booker",
    "Devin Vassell",
    "Domantas Sabonis",
    "Donovan Mitchell",
    "Dyson Daniels",
    "Evan Mobley",
    "Franz Wagner",
    "Giannis Antetokounmpo",
    "Ja Morant",
    "Jaden Ivey",
    "Jalen Brunson",
    "Jalen Green",
    "Jalen Johnson",
    "Jalen Suggs",
    "Jalen Williams",
    "Jamal Murray",
    "James Harden",
    "Jaren Jackson Jr.",
    "Jaylen Brown",
    "Jayson Tatum",
    "Jimmy Butler III",
    "Joel Embiid",
    "John Collins",
    "Jonathan Kuminga",
    "Jordan Poole",
    "Josh Giddey",
    "Julius Randle",
    "Karl-Anthony Towns",
    "Kawhi Leonard",
    "Kevin Durant",
    "Kristaps Porziņģis",
    "Kyle Kuzma",
    "Kyrie Irving",
    "LaMelo Ball",
    "Lauri Markkanen",
    "LeBron James",
    "Luka Dončić",
    "Malcolm Brogdon",
    "Malik Beasley",
    "Michael Porter Jr.",
    "Miles Bridges",
    "Naz Reid",
    "Nikola Jokić",
    "Nikola Vučević",
    "Norman Powell",
    "OG Anunoby",
    "P.J. Washington",
    "Paolo Banchero",
    "Pascal Siakam",
    "Paul George",
    "RJ Barrett",
    "Scottie Barnes",
    "Shaedon Sharpe",
    "Shai Gilgeous-Alexander",
    "Stephen Curry",
    "Trae Young",
    "Trey Murphy III",
    "Tyler Herro",
    "Tyrese Haliburton",
    "Tyrese Maxey",
    "Victor Wembanyama",
    "Zach LaVine",
    "Zion Williamson",
];

const REFERENCE_YEAR: i32 = 2025;
const SEASON_GAMES: usize = 82;

/// Known player names offered by the search box.
pub fn player_roster() -> Vec<String> {
    PLAYER_ROSTER.iter().map(|name| (*name).to_owned()).collect()
}

pub fn is_rostered(name: &str) -> bool {
    PLAYER_ROSTER.contains(&name)
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Generates plausible stat lines. The same player always gets the same
/// numbers, independent of call order.
#[derive(Debug, Clone, Copy)]
pub struct StatFaker {
    seed: u64,
}

impl StatFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: if seed == 0 { 1 } else { seed },
        }
    }

    fn rng_for(&self, name: &str) -> DeterministicRng {
        // FNV-1a over the name, mixed with the faker seed.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in name.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        DeterministicRng::new(hash ^ self.seed)
    }

    /// Most recent game plus the rolling scoring averages.
    pub fn player_stats(&self, name: &str) -> PlayerStats {
        let mut rng = self.rng_for(name);
        let base = 12.0 + tenths(&mut rng, 200);
        let game_number = 20 + rng.int_n(SEASON_GAMES - 20);
        let game_date = reference_date() + Duration::days(game_number as i64 * 2);
        let minutes = 24.0 + tenths(&mut rng, 140);
        let points = (base + tenths(&mut rng, 160) - 8.0).max(0.0).round();
        let plus_minus = rng.int_n(31) as i64 - 15;

        let mut stats = PlayerStats::new();
        stats.insert("PLAYER_NAME", json!(name));
        stats.insert("GAME_DATE", json!(iso_date(game_date)));
        stats.insert("IS_HOME", json!(i64::from(rng.bool())));
        stats.insert("DAYS_REST", json!(1 + rng.int_n(3)));
        stats.insert("GAME_NUMBER_IN_SEASON", json!(game_number));
        stats.insert("MIN", json!(minutes));
        stats.insert("PTS", json!(points));
        stats.insert("FG_PCT", json!(0.38 + tenths(&mut rng, 170) / 100.0));
        stats.insert("PLUS_MINUS", json!(plus_minus));
        stats.insert("AVG_MIN_LAST_5_USER", json!(minutes - 1.5 + tenths(&mut rng, 30)));
        stats.insert("PTS_AVG_LAST_5_USER", json!(base + tenths(&mut rng, 40)));
        stats.insert("PTS_AVG_LAST_10_USER", json!(base + tenths(&mut rng, 30)));
        stats.insert("PTS_AVG_LAST_20_USER", json!(base + tenths(&mut rng, 20)));
        stats
    }

    /// Row shape of the trending feeds.
    pub fn trend_line(&self, name: &str) -> PlayerStats {
        let mut rng = self.rng_for(name);
        let last20 = 12.0 + tenths(&mut rng, 200);
        let last5 = last20 + tenths(&mut rng, 100) - 1.0;

        let mut stats = PlayerStats::new();
        stats.insert("PLAYER_NAME", json!(name));
        stats.insert(
            "GAME_DATE",
            json!(iso_date(reference_date() + Duration::days(120))),
        );
        stats.insert("PTS_AVG_LAST_5", json!(round1(last5)));
        stats.insert("PTS_AVG_LAST_20", json!(round1(last20)));
        stats
    }
}

impl Default for StatFaker {
    fn default() -> Self {
        Self::new(42)
    }
}

fn tenths(rng: &mut DeterministicRng, range: usize) -> f64 {
    rng.int_n(range) as f64 / 10.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn reference_date() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR - 1, Month::October, 20).unwrap_or(Date::MIN)
}

fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// In-memory auth backend keyed by email.
#[derive(Debug, Default)]
pub struct FakeAuth {
    users: Mutex<Vec<(User, String)>>,
}

impl FakeAuth {
    pub fn with_user(username: &str, email: &str, password: &str) -> Self {
        let auth = Self::default();
        auth.register(username, email, password);
        auth
    }

    pub fn register(&self, username: &str, email: &str, password: &str) {
        let user = User {
            username: username.to_owned(),
            email: email.to_owned(),
            ..User::default()
        };
        if let Ok(mut users) = self.users.lock() {
            users.push((user, password.to_owned()));
        }
    }

    pub fn token_for(username: &str) -> String {
        format!("token-{username}")
    }
}

impl AuthService for FakeAuth {
    fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let users = self
            .users
            .lock()
            .map_err(|_| ApiError::Auth("auth backend unavailable".to_owned()))?;
        users
            .iter()
            .find(|(user, password)| {
                user.email == credentials.email && *password == credentials.password
            })
            .map(|(user, _)| Session {
                user: user.clone(),
                token: Self::token_for(&user.username),
            })
            .ok_or_else(|| ApiError::Auth("Invalid credentials".to_owned()))
    }

    fn signup(&self, new_user: &NewUser) -> ApiResult<String> {
        {
            let users = self
                .users
                .lock()
                .map_err(|_| ApiError::Auth("auth backend unavailable".to_owned()))?;
            if users.iter().any(|(user, _)| user.email == new_user.email) {
                return Err(ApiError::Auth("User already exists".to_owned()));
            }
        }
        self.register(&new_user.username, &new_user.email, &new_user.password);
        Ok("User registered successfully".to_owned())
    }
}

/// In-memory favorites list for a single token.
#[derive(Debug)]
pub struct FakeFavorites {
    token: String,
    entries: Mutex<Vec<FavoriteEntry>>,
    fail_list: AtomicBool,
    fail_mutations: AtomicBool,
}

impl FakeFavorites {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            entries: Mutex::new(Vec::new()),
            fail_list: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
        }
    }

    pub fn with_players(token: impl Into<String>, names: &[&str]) -> Self {
        let favorites = Self::new(token);
        if let Ok(mut entries) = favorites.entries.lock() {
            for (offset, name) in names.iter().enumerate() {
                entries.push(entry_at(name, offset as i64));
            }
        }
        favorites
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().map(|entry| entry.player_name.clone()).collect())
            .unwrap_or_default()
    }

    fn authorize(&self, token: &str) -> ApiResult<()> {
        if token.is_empty() || token != self.token {
            return Err(ApiError::Unauthenticated);
        }
        Ok(())
    }

    fn check_mutation(&self) -> ApiResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }
}

impl FavoritesService for FakeFavorites {
    fn list(&self, token: &str) -> ApiResult<Vec<FavoriteEntry>> {
        self.authorize(token)?;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|_| server_error())
    }

    fn add(&self, player_name: &str, token: &str) -> ApiResult<()> {
        self.authorize(token)?;
        self.check_mutation()?;
        let mut entries = self.entries.lock().map_err(|_| server_error())?;
        if entries.iter().any(|entry| entry.player_name == player_name) {
            return Err(ApiError::Api {
                status: 400,
                message: "Player already in favorites".to_owned(),
            });
        }
        let offset = entries.len() as i64;
        entries.push(entry_at(player_name, offset));
        Ok(())
    }

    fn remove(&self, player_name: &str, token: &str) -> ApiResult<()> {
        self.authorize(token)?;
        self.check_mutation()?;
        let mut entries = self.entries.lock().map_err(|_| server_error())?;
        let before = entries.len();
        entries.retain(|entry| entry.player_name != player_name);
        if entries.len() == before {
            return Err(ApiError::Api {
                status: 404,
                message: "Favorite not found".to_owned(),
            });
        }
        Ok(())
    }

    fn check_status(&self, player_name: &str, token: &str) -> ApiResult<bool> {
        self.authorize(token)?;
        self.entries
            .lock()
            .map(|entries| entries.iter().any(|entry| entry.player_name == player_name))
            .map_err(|_| server_error())
    }
}

fn server_error() -> ApiError {
    ApiError::Api {
        status: 500,
        message: "Server error".to_owned(),
    }
}

fn entry_at(name: &str, offset_minutes: i64) -> FavoriteEntry {
    FavoriteEntry {
        player_name: name.to_owned(),
        added_at: (fixture_now() + Duration::minutes(offset_minutes))
            .format(&Rfc3339)
            .ok(),
    }
}

/// Stats backend over the faker. Unknown names and names marked failing
/// report `NotFound`.
#[derive(Debug, Default)]
pub struct FakeStats {
    faker: StatFaker,
    failing: Mutex<BTreeSet<String>>,
    offline: AtomicBool,
}

impl FakeStats {
    pub fn new(faker: StatFaker) -> Self {
        Self {
            faker,
            ..Self::default()
        }
    }

    pub fn fail_for(&self, name: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(name.to_owned());
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> ApiResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Network {
                url: "http://stats.invalid".to_owned(),
                message: "connection refused".to_owned(),
            });
        }
        Ok(())
    }

    fn feed(&self, names: &[&str]) -> Vec<PlayerStats> {
        names.iter().map(|name| self.faker.trend_line(name)).collect()
    }
}

impl StatsService for FakeStats {
    fn player_stats(&self, player_name: &str) -> ApiResult<PlayerStats> {
        self.check_online()?;
        let failing = self
            .failing
            .lock()
            .map(|failing| failing.contains(player_name))
            .unwrap_or(false);
        if failing || !is_rostered(player_name) {
            return Err(ApiError::NotFound(player_name.to_owned()));
        }
        Ok(self.faker.player_stats(player_name))
    }

    fn top5_last5_games(&self) -> ApiResult<Vec<PlayerStats>> {
        self.check_online()?;
        Ok(self.feed(&[
            "Shai Gilgeous-Alexander",
            "Giannis Antetokounmpo",
            "Nikola Jokić",
            "Luka Dončić",
            "Anthony Edwards",
        ]))
    }

    fn heat_up_players(&self) -> ApiResult<Vec<PlayerStats>> {
        self.check_online()?;
        Ok(self.feed(&[
            "Cade Cunningham",
            "Jalen Green",
            "Tyler Herro",
            "Alperen Sengun",
            "Coby White",
        ]))
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("heatcheck.db");
    Ok((dir, db_path))
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19T12:34:56Z"
}

pub fn sample_user() -> User {
    User {
        username: "hooper".to_owned(),
        email: "hooper@example.com".to_owned(),
        ..User::default()
    }
}

pub fn sample_session() -> Session {
    Session {
        user: sample_user(),
        token: FakeAuth::token_for("hooper"),
    }
}

/// Raw JSON for a stat payload, as a backend would send it.
pub fn stats_json(name: &str) -> Value {
    serde_json::to_value(StatFaker::default().player_stats(name)).unwrap_or(Value::Null)
}

fn fixture_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(2026, Month::February, 19).unwrap_or(Date::MIN);
    date.with_time(Time::MIDNIGHT).assume_utc()
}
