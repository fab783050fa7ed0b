// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use heatcheck_app::{
    ApiError, ApiResult, AuthService, Credentials, FavoriteEntry, FavoritesService, NewUser,
    PlayerStats, Session, StatsService, User,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const SIGNUP_OK: &str = "Signup successful! Please login.";

/// Shared HTTP plumbing for one backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("base URL must not be empty");
        }
        let base_url =
            Url::parse(trimmed).with_context(|| format!("parse base URL {trimmed:?}"))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("base URL {trimmed:?} must be an http:// or https:// address");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Network {
                url: self.base_url().to_owned(),
                message: "base URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, url: &Url, request: RequestBuilder, call: Call) -> ApiResult<String> {
        debug!(%url, ?call, "request");
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url(), &error))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(clean_error_response(call, status, &body));
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> ApiResult<T> {
        serde_json::from_str(body).map_err(|error| ApiError::Decode {
            url: url.to_string(),
            message: error.to_string(),
        })
    }
}

/// Which call failed; picks the fallback message and status mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Login,
    Signup,
    ListFavorites,
    CheckFavorite,
    AddFavorite,
    RemoveFavorite,
    PlayerStats(String),
    Feed,
}

impl Call {
    fn fallback_message(&self) -> &'static str {
        match self {
            Self::Login => LOGIN_FAILED,
            Self::Signup => SIGNUP_FAILED,
            Self::ListFavorites => "Failed to fetch favorites",
            Self::CheckFavorite => "Failed to check favorite status",
            Self::AddFavorite => "Failed to add to favorites",
            Self::RemoveFavorite => "Failed to remove from favorites",
            Self::PlayerStats(_) => "Failed to fetch player data",
            Self::Feed => "Failed to fetch trending players",
        }
    }

    fn uses_token(&self) -> bool {
        matches!(
            self,
            Self::ListFavorites | Self::CheckFavorite | Self::AddFavorite | Self::RemoveFavorite
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl MessageEnvelope {
    fn text(self) -> Option<String> {
        [self.msg, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}

fn connection_error(base_url: &str, error: &reqwest::Error) -> ApiError {
    let message = if error.is_timeout() {
        "request timed out".to_owned()
    } else {
        error.to_string()
    };
    ApiError::Network {
        url: base_url.to_owned(),
        message,
    }
}

fn backend_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body) {
        return parsed.text();
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') && !trimmed.contains('<')
    {
        return Some(trimmed.to_owned());
    }
    None
}

fn clean_error_response(call: Call, status: StatusCode, body: &str) -> ApiError {
    let message = backend_message(body).unwrap_or_else(|| call.fallback_message().to_owned());
    match call {
        Call::Login | Call::Signup => ApiError::Auth(message),
        _ if call.uses_token()
            && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) =>
        {
            ApiError::Unauthenticated
        }
        Call::PlayerStats(name) if status == StatusCode::NOT_FOUND => ApiError::NotFound(name),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn require_token(token: &str) -> ApiResult<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::Unauthenticated);
    }
    Ok(token)
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct FavoritesResponse {
    #[serde(default)]
    favorites: Vec<FavoriteEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    is_favorite: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteRequest<'a> {
    player_name: &'a str,
}

/// Login and signup against the accounts backend.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
}

impl AuthClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AuthService for AuthClient {
    fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let url = self.client.endpoint(&["api", "auth", "login"])?;
        let request = self.client.http.post(url.clone()).json(credentials);
        let body = self.client.send(&url, request, Call::Login)?;
        let parsed: LoginResponse = Client::decode(&url, &body)?;

        let token = parsed
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Decode {
                url: url.to_string(),
                message: "login response carries no token".to_owned(),
            })?;
        let user = parsed.user.unwrap_or_else(|| User {
            email: credentials.email.clone(),
            ..User::default()
        });
        info!(user = %user.display_name(), "login accepted");
        Ok(Session { user, token })
    }

    fn signup(&self, new_user: &NewUser) -> ApiResult<String> {
        let url = self.client.endpoint(&["api", "auth", "signup"])?;
        let request = self.client.http.post(url.clone()).json(new_user);
        let body = self.client.send(&url, request, Call::Signup)?;
        Ok(backend_message(&body).unwrap_or_else(|| SIGNUP_OK.to_owned()))
    }
}

/// Per-user favorites, authorized with the session's bearer token.
#[derive(Debug, Clone)]
pub struct FavoritesClient {
    client: Client,
}

impl FavoritesClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FavoritesService for FavoritesClient {
    fn list(&self, token: &str) -> ApiResult<Vec<FavoriteEntry>> {
        let token = require_token(token)?;
        let url = self.client.endpoint(&["api", "favorites"])?;
        let request = self.client.http.get(url.clone()).bearer_auth(token);
        let body = self.client.send(&url, request, Call::ListFavorites)?;
        let parsed: FavoritesResponse = Client::decode(&url, &body)?;
        Ok(parsed.favorites)
    }

    fn add(&self, player_name: &str, token: &str) -> ApiResult<()> {
        let token = require_token(token)?;
        let url = self.client.endpoint(&["api", "favorites"])?;
        let request = self
            .client
            .http
            .post(url.clone())
            .bearer_auth(token)
            .json(&AddFavoriteRequest { player_name });
        self.client.send(&url, request, Call::AddFavorite)?;
        info!(player = %player_name, "favorite added");
        Ok(())
    }

    fn remove(&self, player_name: &str, token: &str) -> ApiResult<()> {
        let token = require_token(token)?;
        let url = self.client.endpoint(&["api", "favorites", player_name])?;
        let request = self.client.http.delete(url.clone()).bearer_auth(token);
        self.client.send(&url, request, Call::RemoveFavorite)?;
        info!(player = %player_name, "favorite removed");
        Ok(())
    }

    fn check_status(&self, player_name: &str, token: &str) -> ApiResult<bool> {
        let token = require_token(token)?;
        let url = self
            .client
            .endpoint(&["api", "favorites", "check", player_name])?;
        let request = self.client.http.get(url.clone()).bearer_auth(token);
        let body = self.client.send(&url, request, Call::CheckFavorite)?;
        let parsed: CheckResponse = Client::decode(&url, &body)?;
        Ok(parsed.is_favorite)
    }
}

/// Read-only stats backend; no authentication.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
}

impl StatsClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn feed(&self, path: &str) -> ApiResult<Vec<PlayerStats>> {
        let url = self.client.endpoint(&[path])?;
        let request = self.client.http.get(url.clone());
        let body = self.client.send(&url, request, Call::Feed)?;
        let rows: Vec<Value> = Client::decode(&url, &body)?;
        rows.into_iter()
            .map(|row| {
                PlayerStats::from_json(row).ok_or_else(|| ApiError::Decode {
                    url: url.to_string(),
                    message: "feed row is not an object".to_owned(),
                })
            })
            .collect()
    }
}

impl StatsService for StatsClient {
    fn player_stats(&self, player_name: &str) -> ApiResult<PlayerStats> {
        let url = self.client.endpoint(&["player_stats", player_name])?;
        let request = self.client.http.get(url.clone());
        let body = self
            .client
            .send(&url, request, Call::PlayerStats(player_name.to_owned()))?;
        let value: Value = Client::decode(&url, &body)?;
        PlayerStats::from_json(value).ok_or_else(|| ApiError::Decode {
            url: url.to_string(),
            message: "stats payload is not an object".to_owned(),
        })
    }

    fn top5_last5_games(&self) -> ApiResult<Vec<PlayerStats>> {
        self.feed("top5_last5")
    }

    fn heat_up_players(&self) -> ApiResult<Vec<PlayerStats>> {
        self.feed("heat_up_5")
    }
}
