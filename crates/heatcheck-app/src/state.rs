// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Route, Session};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub route: Route,
    pub session: Option<Session>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Landing,
            session: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Navigate(Route),
    FollowBrand,
    SignIn(Session),
    SignOut,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    SignedIn { username: String },
    SignedOut,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn with_session(session: Option<Session>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.token.is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .filter(|token| !token.is_empty())
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::FollowBrand => self.navigate(Route::home_for(self.is_authenticated())),
            AppCommand::SignIn(session) => {
                let username = session.user.display_name().to_owned();
                info!(user = %username, "signed in");
                self.session = Some(session);
                let mut events = vec![AppEvent::SignedIn { username }];
                events.extend(self.navigate(Route::Home));
                events
            }
            AppCommand::SignOut => {
                info!("signed out");
                self.session = None;
                let mut events = vec![AppEvent::SignedOut];
                events.extend(self.navigate(Route::Landing));
                events
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Landing and login redirect to home once a session exists.
    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        let target = match route {
            Route::Landing | Route::LoginSignup if self.is_authenticated() => Route::Home,
            other => other,
        };
        if target == self.route {
            return Vec::new();
        }
        debug!(from = %self.route.path(), to = %target.path(), "navigate");
        self.route = target.clone();
        vec![AppEvent::RouteChanged(target)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
