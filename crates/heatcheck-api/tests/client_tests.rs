// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use heatcheck_api::{AuthClient, Client, FavoritesClient, StatsClient};
use heatcheck_app::{
    ApiError, AuthService, Credentials, FavoritesService, NewUser, StatsService,
};
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Method, Request, Response, Server};

fn json_response(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

/// Serves `count` requests with `handler` and returns the base URL.
fn mock_server<F>(count: usize, handler: F) -> Result<(String, JoinHandle<()>)>
where
    F: Fn(&mut Request) -> (u16, String) + Send + 'static,
{
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    let handle = thread::spawn(move || {
        for _ in 0..count {
            let mut request = server.recv().expect("request expected");
            let (status, body) = handler(&mut request);
            request
                .respond(json_response(status, &body))
                .expect("response should succeed");
        }
    });
    Ok((addr, handle))
}

fn header(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_owned())
}

fn body(request: &mut Request) -> String {
    let mut text = String::new();
    request
        .as_reader()
        .read_to_string(&mut text)
        .expect("request body should be readable");
    text
}

fn client(addr: &str) -> Result<Client> {
    Client::new(addr, Duration::from_secs(2))
}

#[test]
fn login_posts_credentials_and_returns_session() -> Result<()> {
    let (addr, handle) = mock_server(1, |request| {
        assert_eq!(*request.method(), Method::Post);
        assert_eq!(request.url(), "/api/auth/login");
        let sent: serde_json::Value =
            serde_json::from_str(&body(request)).expect("json credentials");
        assert_eq!(sent["email"], "hooper@example.com");
        assert_eq!(sent["password"], "secret");
        (
            200,
            r#"{"token":"jwt-123","user":{"_id":"u1","username":"hooper","email":"hooper@example.com"}}"#
                .to_owned(),
        )
    })?;

    let auth = AuthClient::new(client(&addr)?);
    let session = auth.login(&Credentials {
        email: "hooper@example.com".to_owned(),
        password: "secret".to_owned(),
    })?;
    assert_eq!(session.token, "jwt-123");
    assert_eq!(session.user.username, "hooper");
    assert!(session.user.extra.contains_key("_id"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn login_failure_surfaces_backend_msg() -> Result<()> {
    let (addr, handle) = mock_server(2, |request| {
        if body(request).contains("wrong") {
            (400, r#"{"msg":"Invalid credentials"}"#.to_owned())
        } else {
            (500, "{}".to_owned())
        }
    })?;

    let auth = AuthClient::new(client(&addr)?);
    let error = auth
        .login(&Credentials {
            email: "hooper@example.com".to_owned(),
            password: "wrong".to_owned(),
        })
        .expect_err("login should fail");
    assert_eq!(error, ApiError::Auth("Invalid credentials".to_owned()));

    let error = auth
        .login(&Credentials {
            email: "hooper@example.com".to_owned(),
            password: "other".to_owned(),
        })
        .expect_err("login should fail");
    assert_eq!(
        error,
        ApiError::Auth("Login failed. Please check your credentials.".to_owned())
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn signup_returns_backend_message_or_default() -> Result<()> {
    let (addr, handle) = mock_server(2, |request| {
        assert_eq!(request.url(), "/api/auth/signup");
        if body(request).contains("first") {
            (201, r#"{"msg":"User registered"}"#.to_owned())
        } else {
            (201, r#"{"user":{"username":"second"}}"#.to_owned())
        }
    })?;

    let auth = AuthClient::new(client(&addr)?);
    let new_user = |username: &str| NewUser {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password: "pw".to_owned(),
    };
    assert_eq!(auth.signup(&new_user("first"))?, "User registered");
    assert_eq!(
        auth.signup(&new_user("second"))?,
        "Signup successful! Please login."
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn favorites_list_sends_bearer_token() -> Result<()> {
    let (addr, handle) = mock_server(1, |request| {
        assert_eq!(*request.method(), Method::Get);
        assert_eq!(request.url(), "/api/favorites");
        assert_eq!(
            header(request, "Authorization").as_deref(),
            Some("Bearer jwt-123")
        );
        (
            200,
            r#"{"favorites":[{"playerName":"LeBron James","addedAt":"2025-03-01T10:00:00Z"},{"playerName":"Luka Dončić"}]}"#
                .to_owned(),
        )
    })?;

    let favorites = FavoritesClient::new(client(&addr)?);
    let entries = favorites.list("jwt-123")?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].player_name, "LeBron James");
    assert_eq!(entries[0].added_at.as_deref(), Some("2025-03-01T10:00:00Z"));
    assert_eq!(entries[1].added_at, None);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn favorite_mutations_encode_player_names() -> Result<()> {
    let (addr, handle) = mock_server(3, |request| match request.method() {
        Method::Post => {
            assert_eq!(request.url(), "/api/favorites");
            let sent: serde_json::Value =
                serde_json::from_str(&body(request)).expect("json body");
            assert_eq!(sent["playerName"], "D'Angelo Russell");
            (201, r#"{"msg":"added"}"#.to_owned())
        }
        Method::Delete => {
            assert_eq!(request.url(), "/api/favorites/Nikola%20Joki%C4%87");
            (200, r#"{"msg":"removed"}"#.to_owned())
        }
        _ => {
            assert_eq!(request.url(), "/api/favorites/check/Jaren%20Jackson%20Jr.");
            (200, r#"{"isFavorite":true}"#.to_owned())
        }
    })?;

    let favorites = FavoritesClient::new(client(&addr)?);
    favorites.add("D'Angelo Russell", "jwt")?;
    favorites.remove("Nikola Jokić", "jwt")?;
    assert!(favorites.check_status("Jaren Jackson Jr.", "jwt")?);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn expired_token_maps_to_unauthenticated() -> Result<()> {
    let (addr, handle) = mock_server(1, |_| (401, r#"{"msg":"Token is not valid"}"#.to_owned()))?;

    let favorites = FavoritesClient::new(client(&addr)?);
    let error = favorites.list("stale").expect_err("list should fail");
    assert_eq!(error, ApiError::Unauthenticated);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn missing_token_fails_without_a_request() -> Result<()> {
    let favorites = FavoritesClient::new(Client::new(
        "http://127.0.0.1:1",
        Duration::from_millis(50),
    )?);
    assert_eq!(favorites.list(""), Err(ApiError::Unauthenticated));
    assert_eq!(
        favorites.check_status("LeBron James", "  "),
        Err(ApiError::Unauthenticated)
    );
    Ok(())
}

#[test]
fn player_stats_unwraps_envelope_and_maps_not_found() -> Result<()> {
    let (addr, handle) = mock_server(2, |request| {
        if request.url() == "/player_stats/LeBron%20James" {
            (
                200,
                r#"{"player":"LeBron James","stats":{"PLAYER_NAME":"LeBron James","PTS":31.0,"GAME_DATE":"2025-03-01"}}"#
                    .to_owned(),
            )
        } else {
            (404, r#"{"msg":"Player not found"}"#.to_owned())
        }
    })?;

    let stats = StatsClient::new(client(&addr)?);
    let line = stats.player_stats("LeBron James")?;
    assert_eq!(line.number("PTS"), Some(31.0));
    assert_eq!(line.player_name(), Some("LeBron James"));

    let error = stats
        .player_stats("Nobody Special")
        .expect_err("unknown player");
    assert_eq!(error, ApiError::NotFound("Nobody Special".to_owned()));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn trending_feeds_decode_rows() -> Result<()> {
    let (addr, handle) = mock_server(2, |request| match request.url() {
        "/top5_last5" => (
            200,
            r#"[{"PLAYER_NAME":"Nikola Jokić","PTS_AVG_LAST_5":31.2,"GAME_DATE":"2025-03-01"}]"#
                .to_owned(),
        ),
        other => {
            assert_eq!(other, "/heat_up_5");
            (200, "not json".to_owned())
        }
    })?;

    let stats = StatsClient::new(client(&addr)?);
    let top = stats.top5_last5_games()?;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].number("PTS_AVG_LAST_5"), Some(31.2));

    let error = stats.heat_up_players().expect_err("bad body");
    assert!(matches!(error, ApiError::Decode { .. }));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_backend_is_a_network_error() -> Result<()> {
    let stats = StatsClient::new(Client::new(
        "http://127.0.0.1:1",
        Duration::from_millis(50),
    )?);
    let error = stats.top5_last5_games().expect_err("nothing listening");
    assert!(error.is_network());
    Ok(())
}
