// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use heatcheck_app::{
    ApiError, ApiResult, AppCommand, AppEvent, AppState, Autocomplete, AutocompleteEvent,
    AutocompleteKey, Credentials, FavoritePlayer, FavoritesCommand, FavoritesEvent,
    FavoritesPage, FavoritesView, HeatTier, KEY_GAME_DATE, LOGIN_TO_SAVE_MESSAGE, NOT_AVAILABLE,
    NewUser, PlayerStats, Route, Session, TOGGLE_FAILED_MESSAGE, format_card_stat, format_stat,
    heat_up, stat_sheet,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const DETAIL_TRANSITION: Duration = Duration::from_millis(150);
const LOOKUP_FAILED_MESSAGE: &str = "Failed to fetch player data";
const NO_PLAYER_DATA: &str = "No player data available";
const NO_TRENDING: &str = "No trending players available";
const LOGIN_FIELDS: [&str; 2] = ["Email", "Password"];
const SIGNUP_FIELDS: [&str; 3] = ["Username", "Email", "Password"];

/// Both trending feeds, fetched together for the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub top5: ApiResult<Vec<PlayerStats>>,
    pub heating_up: ApiResult<Vec<PlayerStats>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    FinishTransition,
    FavoritesLoaded {
        request_id: u64,
        result: ApiResult<Vec<FavoritePlayer>>,
    },
    PlayerLoaded {
        request_id: u64,
        name: String,
        result: ApiResult<PlayerStats>,
        favorited: bool,
    },
    HomeFeedLoaded {
        request_id: u64,
        feed: HomeFeed,
    },
    LoginFinished {
        request_id: u64,
        result: ApiResult<Session>,
    },
    SignupFinished {
        request_id: u64,
        email: String,
        result: ApiResult<String>,
    },
    /// `Ok` carries the new favorite status.
    FavoriteToggled {
        request_id: u64,
        name: String,
        result: ApiResult<bool>,
    },
}

/// Everything the UI needs from the outside world. The `spawn_*` methods
/// default to running the call inline and posting the result; runtimes
/// backed by real network clients override them to run off the UI thread.
pub trait AppRuntime {
    fn candidates(&self) -> Vec<String>;
    fn login(&mut self, credentials: &Credentials) -> ApiResult<Session>;
    fn signup(&mut self, new_user: &NewUser) -> ApiResult<String>;
    fn save_session(&mut self, session: &Session) -> Result<()>;
    fn clear_session(&mut self) -> Result<()>;
    fn check_favorite(&mut self, player_name: &str, token: &str) -> ApiResult<bool>;
    fn toggle_favorite(
        &mut self,
        player_name: &str,
        currently_favorited: bool,
        token: &str,
    ) -> ApiResult<bool>;
    fn load_favorites(&mut self, token: &str) -> ApiResult<Vec<FavoritePlayer>>;
    fn load_player_stats(&mut self, player_name: &str) -> ApiResult<PlayerStats>;
    fn load_home_feed(&mut self) -> HomeFeed;

    fn spawn_favorites_load(
        &mut self,
        request_id: u64,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.load_favorites(token);
        tx.send(InternalEvent::FavoritesLoaded { request_id, result })
            .map_err(|_| anyhow!("favorites event channel closed"))?;
        Ok(())
    }

    /// Fetches stats for `player_name` and, when a token is present, its
    /// favorite status. Status check failures read as "not favorited".
    fn spawn_player_lookup(
        &mut self,
        request_id: u64,
        player_name: &str,
        token: Option<&str>,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.load_player_stats(player_name);
        let favorited = match (&result, token) {
            (Ok(_), Some(token)) => self
                .check_favorite(player_name, token)
                .inspect_err(|error| debug!(%error, "favorite status check failed"))
                .unwrap_or(false),
            _ => false,
        };
        tx.send(InternalEvent::PlayerLoaded {
            request_id,
            name: player_name.to_owned(),
            result,
            favorited,
        })
        .map_err(|_| anyhow!("lookup event channel closed"))?;
        Ok(())
    }

    fn spawn_home_feed(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let feed = self.load_home_feed();
        tx.send(InternalEvent::HomeFeedLoaded { request_id, feed })
            .map_err(|_| anyhow!("home feed event channel closed"))?;
        Ok(())
    }

    fn spawn_login(
        &mut self,
        request_id: u64,
        credentials: &Credentials,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.login(credentials);
        tx.send(InternalEvent::LoginFinished { request_id, result })
            .map_err(|_| anyhow!("login event channel closed"))?;
        Ok(())
    }

    fn spawn_signup(
        &mut self,
        request_id: u64,
        new_user: &NewUser,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.signup(new_user);
        tx.send(InternalEvent::SignupFinished {
            request_id,
            email: new_user.email.clone(),
            result,
        })
        .map_err(|_| anyhow!("signup event channel closed"))?;
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
        let result = self.toggle_favorite(player_name, currently_favorited, token);
        tx.send(InternalEvent::FavoriteToggled {
            request_id,
            name: player_name.to_owned(),
            result,
        })
        .map_err(|_| anyhow!("favorite event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PlayerCard {
    name: String,
    stats: PlayerStats,
    favorited: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct SearchUiState {
    input: Autocomplete,
    pending: Option<u64>,
    toggle_pending: Option<u64>,
    card: Option<PlayerCard>,
    error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FavoritesUiState {
    page: FavoritesPage,
    cursor: usize,
    filter_focused: bool,
    toggle_pending: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct HomeUiState {
    pending: Option<u64>,
    feed: Option<HomeFeed>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AuthTab {
    #[default]
    Login,
    SignUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormMessage {
    text: String,
    is_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LoginUiState {
    tab: AuthTab,
    field: usize,
    pending: Option<u64>,
    email: String,
    password: String,
    username: String,
    signup_email: String,
    signup_password: String,
    message: Option<FormMessage>,
}

impl LoginUiState {
    const fn labels(&self) -> &'static [&'static str] {
        match self.tab {
            AuthTab::Login => &LOGIN_FIELDS,
            AuthTab::SignUp => &SIGNUP_FIELDS,
        }
    }

    fn value(&self, index: usize) -> &str {
        match (self.tab, index) {
            (AuthTab::Login, 0) => &self.email,
            (AuthTab::Login, _) => &self.password,
            (AuthTab::SignUp, 0) => &self.username,
            (AuthTab::SignUp, 1) => &self.signup_email,
            (AuthTab::SignUp, _) => &self.signup_password,
        }
    }

    fn active_value_mut(&mut self) -> &mut String {
        match (self.tab, self.field) {
            (AuthTab::Login, 0) => &mut self.email,
            (AuthTab::Login, _) => &mut self.password,
            (AuthTab::SignUp, 0) => &mut self.username,
            (AuthTab::SignUp, 1) => &mut self.signup_email,
            (AuthTab::SignUp, _) => &mut self.signup_password,
        }
    }

    fn switch_tab(&mut self) {
        self.tab = match self.tab {
            AuthTab::Login => AuthTab::SignUp,
            AuthTab::SignUp => AuthTab::Login,
        };
        self.field = 0;
        self.message = None;
    }

    fn move_field(&mut self, step: isize) {
        let count = self.labels().len() as isize;
        self.field = (self.field as isize + step).rem_euclid(count) as usize;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    status_token: u64,
    next_request_id: u64,
    search: SearchUiState,
    favorites: FavoritesUiState,
    home: HomeUiState,
    login: LoginUiState,
}

impl ViewData {
    fn new(candidates: Vec<String>) -> Self {
        Self {
            status_token: 0,
            next_request_id: 1,
            search: SearchUiState {
                input: Autocomplete::new(candidates),
                pending: None,
                toggle_pending: None,
                card: None,
                error: None,
            },
            favorites: FavoritesUiState::default(),
            home: HomeUiState::default(),
            login: LoginUiState::default(),
        }
    }

    fn next_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.saturating_add(1);
        id
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(runtime.candidates());
    let (internal_tx, internal_rx) = mpsc::channel();

    enter_initial_route(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size().context("read terminal size")?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse_event(state, runtime, &mut view_data, &internal_tx, mouse, area);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

/// Mounts whatever screen the session starts on. A stored session skips
/// the landing and login screens.
fn enter_initial_route<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let route = state.route.clone();
    if state.is_authenticated() && matches!(route, Route::Landing | Route::LoginSignup) {
        navigate(state, runtime, view_data, tx, AppCommand::Navigate(Route::Home));
    } else {
        enter_route(state, runtime, view_data, tx, &route);
    }
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, runtime, view_data, tx, event);
    }
}

fn handle_internal_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::FinishTransition => {
            let events = view_data
                .favorites
                .page
                .dispatch(FavoritesCommand::FinishTransition);
            apply_favorites_events(state, runtime, view_data, tx, events);
        }
        InternalEvent::FavoritesLoaded { request_id, result } => {
            let events = view_data
                .favorites
                .page
                .dispatch(FavoritesCommand::LoadFinished { request_id, result });
            apply_favorites_events(state, runtime, view_data, tx, events);
        }
        InternalEvent::PlayerLoaded {
            request_id,
            name,
            result,
            favorited,
        } => {
            if view_data.search.pending != Some(request_id) {
                debug!(request_id, "discarding stale player lookup");
                return;
            }
            view_data.search.pending = None;
            match result {
                Ok(stats) => {
                    view_data.search.error = None;
                    view_data.search.card = Some(PlayerCard {
                        name,
                        stats,
                        favorited,
                    });
                }
                Err(error) => {
                    warn!(player = %name, %error, "player lookup failed");
                    view_data.search.card = None;
                    view_data.search.error = Some(lookup_error_message(&error));
                }
            }
        }
        InternalEvent::HomeFeedLoaded { request_id, feed } => {
            if view_data.home.pending != Some(request_id) {
                return;
            }
            view_data.home.pending = None;
            view_data.home.feed = Some(feed);
        }
        InternalEvent::LoginFinished { request_id, result } => {
            if !auth_result_is_current(state, view_data, request_id) {
                debug!(request_id, "discarding stale login result");
                return;
            }
            view_data.login.pending = None;
            finish_login(state, runtime, view_data, tx, result);
        }
        InternalEvent::SignupFinished {
            request_id,
            email,
            result,
        } => {
            if !auth_result_is_current(state, view_data, request_id) {
                debug!(request_id, "discarding stale signup result");
                return;
            }
            view_data.login.pending = None;
            finish_signup(view_data, email, result);
        }
        InternalEvent::FavoriteToggled {
            request_id,
            name,
            result,
        } => {
            if view_data.search.toggle_pending == Some(request_id) {
                view_data.search.toggle_pending = None;
                finish_card_toggle(state, view_data, tx, name, result);
            } else if view_data.favorites.toggle_pending == Some(request_id) {
                view_data.favorites.toggle_pending = None;
                let events = view_data
                    .favorites
                    .page
                    .dispatch(FavoritesCommand::FavoriteToggled { name, result });
                apply_favorites_events(state, runtime, view_data, tx, events);
            } else {
                debug!(request_id, "discarding stale favorite toggle");
            }
        }
    }
}

/// Auth results only land on the login screen that issued them.
fn auth_result_is_current(state: &AppState, view_data: &ViewData, request_id: u64) -> bool {
    state.route == Route::LoginSignup && view_data.login.pending == Some(request_id)
}

fn lookup_error_message(error: &ApiError) -> String {
    if error.is_not_found() || error.is_network() {
        error.user_message()
    } else {
        LOOKUP_FAILED_MESSAGE.to_owned()
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn schedule_detail_transition(internal_tx: &Sender<InternalEvent>) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(DETAIL_TRANSITION);
        let _ = sender.send(InternalEvent::FinishTransition);
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn navigate<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    apply_app_events(state, runtime, view_data, tx, events);
}

fn apply_app_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::RouteChanged(route) => enter_route(state, runtime, view_data, tx, &route),
            AppEvent::SignedOut => {
                reset_favorites(view_data);
                view_data.search.card = None;
                view_data.search.error = None;
                view_data.search.pending = None;
                view_data.search.toggle_pending = None;
                view_data.search.input.clear();
                view_data.search.input.blur();
                view_data.home = HomeUiState::default();
            }
            AppEvent::SignedIn { .. } | AppEvent::StatusUpdated(_) | AppEvent::StatusCleared => {}
        }
    }
}

fn enter_route<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    route: &Route,
) {
    if *route != Route::Favorites {
        reset_favorites(view_data);
    }
    match route {
        Route::Favorites => {
            view_data.favorites.cursor = 0;
            view_data.favorites.filter_focused = false;
            let events = view_data.favorites.page.dispatch(FavoritesCommand::Mount {
                authenticated: state.is_authenticated(),
            });
            apply_favorites_events(state, runtime, view_data, tx, events);
        }
        Route::Home => request_home_feed(state, runtime, view_data, tx),
        Route::Search => view_data.search.input.focus(),
        Route::LoginSignup => view_data.login = LoginUiState::default(),
        Route::Landing | Route::About | Route::Predict | Route::NotFound(_) => {}
    }
}

fn reset_favorites(view_data: &mut ViewData) {
    view_data.favorites.page.dispatch(FavoritesCommand::Reset);
    view_data.favorites.cursor = 0;
    view_data.favorites.filter_focused = false;
    view_data.favorites.toggle_pending = None;
}

fn apply_favorites_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<FavoritesEvent>,
) {
    let mut queue = VecDeque::from(events);
    while let Some(event) = queue.pop_front() {
        match event {
            FavoritesEvent::LoadRequested { request_id } => {
                let Some(token) = state.token().map(str::to_owned) else {
                    queue.extend(view_data.favorites.page.dispatch(
                        FavoritesCommand::LoadFinished {
                            request_id,
                            result: Err(ApiError::Unauthenticated),
                        },
                    ));
                    continue;
                };
                if let Err(error) = runtime.spawn_favorites_load(request_id, &token, tx.clone()) {
                    emit_status(
                        state,
                        view_data,
                        tx,
                        format!("favorites load failed: {error}"),
                    );
                }
            }
            FavoritesEvent::TransitionStarted(_) => schedule_detail_transition(tx),
            FavoritesEvent::Loaded { count } => {
                let visible = view_data.favorites.page.visible_players().len();
                view_data.favorites.cursor = view_data
                    .favorites
                    .cursor
                    .min(visible.saturating_sub(1));
                debug!(count, "favorites ready");
            }
            FavoritesEvent::Alert(message) => emit_status(state, view_data, tx, message),
            FavoritesEvent::DetailOpened(name) => debug!(player = %name, "detail opened"),
            FavoritesEvent::Discarded { .. }
            | FavoritesEvent::LoadFailed(_)
            | FavoritesEvent::ReturnedToList => {}
        }
    }
}

fn request_home_feed<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let request_id = view_data.next_request_id();
    view_data.home.pending = Some(request_id);
    if let Err(error) = runtime.spawn_home_feed(request_id, tx.clone()) {
        view_data.home.pending = None;
        emit_status(state, view_data, tx, format!("home feed failed: {error}"));
    }
}

fn start_player_lookup<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    name: &str,
) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    let request_id = view_data.next_request_id();
    view_data.search.pending = Some(request_id);
    view_data.search.error = None;
    let token = state.token().map(str::to_owned);
    debug!(player = %name, request_id, "looking up player");
    if let Err(error) =
        runtime.spawn_player_lookup(request_id, name, token.as_deref(), tx.clone())
    {
        view_data.search.pending = None;
        emit_status(state, view_data, tx, format!("lookup failed: {error}"));
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('n') => {
                cycle_nav(state, runtime, view_data, internal_tx, 1);
                return false;
            }
            KeyCode::Char('p') => {
                cycle_nav(state, runtime, view_data, internal_tx, -1);
                return false;
            }
            KeyCode::Char('b') => {
                navigate(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::FollowBrand,
                );
                return false;
            }
            KeyCode::Char('l') if state.is_authenticated() => {
                sign_out(state, runtime, view_data, internal_tx);
                return false;
            }
            _ => {}
        }
    }

    match state.route.clone() {
        Route::Landing => {
            if key.code == KeyCode::Enter {
                navigate(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::Navigate(Route::LoginSignup),
                );
            }
        }
        Route::LoginSignup => handle_login_key(state, runtime, view_data, internal_tx, key),
        Route::Home => {
            if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::NONE {
                request_home_feed(state, runtime, view_data, internal_tx);
            }
        }
        Route::Search => handle_search_key(state, runtime, view_data, internal_tx, key),
        Route::Favorites => handle_favorites_key(state, runtime, view_data, internal_tx, key),
        Route::NotFound(_) => {
            if key.code == KeyCode::Enter {
                navigate(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::FollowBrand,
                );
            }
        }
        Route::About | Route::Predict => {}
    }
    false
}

fn is_text_input(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

fn cycle_nav<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    step: isize,
) {
    let links = Route::nav_links(state.is_authenticated());
    if links.is_empty() {
        return;
    }
    let len = links.len() as isize;
    let index = match links.iter().position(|route| *route == state.route) {
        Some(current) => (current as isize + step).rem_euclid(len),
        None if step > 0 => 0,
        None => len - 1,
    };
    let target = links[index as usize].clone();
    navigate(state, runtime, view_data, tx, AppCommand::Navigate(target));
}

fn sign_out<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if let Err(error) = runtime.clear_session() {
        warn!(%error, "failed to clear stored session");
    }
    navigate(state, runtime, view_data, tx, AppCommand::SignOut);
    emit_status(state, view_data, tx, "logged out");
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Enter {
        submit_auth_form(state, runtime, view_data, tx);
        return;
    }

    let form = &mut view_data.login;
    match key.code {
        KeyCode::Left | KeyCode::Right => form.switch_tab(),
        KeyCode::Tab | KeyCode::Down => form.move_field(1),
        KeyCode::BackTab | KeyCode::Up => form.move_field(-1),
        KeyCode::Backspace => {
            form.active_value_mut().pop();
        }
        _ => {
            if let Some(ch) = is_text_input(&key) {
                form.active_value_mut().push(ch);
            }
        }
    }
}

fn submit_auth_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if view_data.login.pending.is_some() {
        return;
    }
    let form = &view_data.login;
    let missing = (0..form.labels().len()).any(|index| form.value(index).trim().is_empty());
    if missing {
        view_data.login.message = Some(FormMessage {
            text: "All fields are required.".to_owned(),
            is_error: true,
        });
        return;
    }

    let request_id = view_data.next_request_id();
    let form = &view_data.login;
    let spawned = match form.tab {
        AuthTab::Login => {
            let credentials = Credentials {
                email: form.email.trim().to_owned(),
                password: form.password.clone(),
            };
            runtime.spawn_login(request_id, &credentials, tx.clone())
        }
        AuthTab::SignUp => {
            let new_user = NewUser {
                username: form.username.trim().to_owned(),
                email: form.signup_email.trim().to_owned(),
                password: form.signup_password.clone(),
            };
            runtime.spawn_signup(request_id, &new_user, tx.clone())
        }
    };

    match spawned {
        Ok(()) => {
            view_data.login.pending = Some(request_id);
            view_data.login.message = None;
        }
        Err(error) => emit_status(state, view_data, tx, format!("request failed: {error}")),
    }
}

fn finish_login<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    result: ApiResult<Session>,
) {
    match result {
        Ok(session) => {
            if let Err(error) = runtime.save_session(&session) {
                warn!(%error, "session not persisted");
            }
            let username = session.user.display_name().to_owned();
            view_data.login = LoginUiState::default();
            navigate(state, runtime, view_data, tx, AppCommand::SignIn(session));
            emit_status(state, view_data, tx, format!("logged in as {username}"));
        }
        Err(error) => {
            info!(%error, "login rejected");
            view_data.login.password.clear();
            view_data.login.message = Some(FormMessage {
                text: error.user_message(),
                is_error: true,
            });
        }
    }
}

fn finish_signup(view_data: &mut ViewData, email: String, result: ApiResult<String>) {
    match result {
        Ok(message) => {
            info!(%email, "signed up");
            view_data.login = LoginUiState {
                email,
                field: 1,
                message: Some(FormMessage {
                    text: message,
                    is_error: false,
                }),
                ..LoginUiState::default()
            };
        }
        Err(error) => {
            info!(%error, "signup rejected");
            view_data.login.message = Some(FormMessage {
                text: error.user_message(),
                is_error: true,
            });
        }
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        toggle_card_favorite(state, runtime, view_data, tx);
        return;
    }

    let input = &mut view_data.search.input;
    let event = match key.code {
        KeyCode::Down => input.handle_key(AutocompleteKey::Down),
        KeyCode::Up => input.handle_key(AutocompleteKey::Up),
        KeyCode::Esc => input.handle_key(AutocompleteKey::Escape),
        KeyCode::Enter => input
            .handle_key(AutocompleteKey::Enter)
            .or_else(|| input.submit()),
        KeyCode::Tab => {
            if input.focused() {
                input.dismiss();
                input.blur();
            } else {
                input.focus();
            }
            None
        }
        KeyCode::Backspace => {
            input.pop_char();
            None
        }
        _ => {
            if let Some(ch) = is_text_input(&key) {
                input.push_char(ch);
            }
            None
        }
    };

    if let Some(event) = event {
        apply_autocomplete_event(state, runtime, view_data, tx, event);
    }
}

fn apply_autocomplete_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: AutocompleteEvent,
) {
    match event {
        AutocompleteEvent::Selected(name) | AutocompleteEvent::Submitted(name) => {
            start_player_lookup(state, runtime, view_data, tx, &name);
        }
    }
}

fn toggle_card_favorite<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if view_data.search.toggle_pending.is_some() {
        return;
    }
    let Some(card) = view_data.search.card.as_ref() else {
        emit_status(state, view_data, tx, "look up a player first");
        return;
    };
    let Some(token) = state.token().map(str::to_owned) else {
        emit_status(state, view_data, tx, LOGIN_TO_SAVE_MESSAGE);
        return;
    };

    let name = card.name.clone();
    let favorited = card.favorited;
    let request_id = view_data.next_request_id();
    view_data.search.toggle_pending = Some(request_id);
    if let Err(error) =
        runtime.spawn_toggle_favorite(request_id, &name, favorited, &token, tx.clone())
    {
        view_data.search.toggle_pending = None;
        warn!(player = %name, %error, "favorite toggle not started");
        emit_status(state, view_data, tx, TOGGLE_FAILED_MESSAGE);
    }
}

fn finish_card_toggle(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    name: String,
    result: ApiResult<bool>,
) {
    match result {
        Ok(favorited) => {
            if let Some(card) = view_data
                .search
                .card
                .as_mut()
                .filter(|card| card.name == name)
            {
                card.favorited = favorited;
            }
            let message = if favorited {
                format!("{name} added to favorites")
            } else {
                format!("{name} removed from favorites")
            };
            emit_status(state, view_data, tx, message);
        }
        Err(ApiError::Unauthenticated) => {
            emit_status(state, view_data, tx, LOGIN_TO_SAVE_MESSAGE);
        }
        Err(error) => {
            warn!(player = %name, %error, "favorite toggle failed");
            emit_status(state, view_data, tx, TOGGLE_FAILED_MESSAGE);
        }
    }
}

fn handle_favorites_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let page = &view_data.favorites.page;
    if page.is_transitioning() {
        return;
    }

    if page.selected().is_some() {
        let events = match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                view_data.favorites.page.dispatch(FavoritesCommand::Back)
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                toggle_detail_favorite(state, runtime, view_data, tx)
            }
            KeyCode::Char('f') if key.modifiers == KeyModifiers::NONE => {
                toggle_detail_favorite(state, runtime, view_data, tx)
            }
            _ => Vec::new(),
        };
        apply_favorites_events(state, runtime, view_data, tx, events);
        return;
    }

    let ui = &mut view_data.favorites;
    if ui.filter_focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => ui.filter_focused = false,
            KeyCode::Backspace => {
                let mut filter = ui.page.filter().to_owned();
                filter.pop();
                ui.page.dispatch(FavoritesCommand::SetFilter(filter));
                ui.cursor = 0;
            }
            _ => {
                if let Some(ch) = is_text_input(&key) {
                    let mut filter = ui.page.filter().to_owned();
                    filter.push(ch);
                    ui.page.dispatch(FavoritesCommand::SetFilter(filter));
                    ui.cursor = 0;
                }
            }
        }
        return;
    }

    let visible = ui.page.visible_players().len();
    match key.code {
        KeyCode::Char('/') => ui.filter_focused = true,
        KeyCode::Char('j') | KeyCode::Down => {
            ui.cursor = (ui.cursor + 1).min(visible.saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => ui.cursor = ui.cursor.saturating_sub(1),
        KeyCode::Esc if !ui.page.filter().is_empty() => {
            ui.page.dispatch(FavoritesCommand::SetFilter(String::new()));
            ui.cursor = 0;
        }
        KeyCode::Enter => {
            let Some(name) = ui
                .page
                .visible_players()
                .get(ui.cursor)
                .map(|player| player.name.clone())
            else {
                return;
            };
            let events = ui.page.dispatch(FavoritesCommand::ViewStats(name));
            apply_favorites_events(state, runtime, view_data, tx, events);
        }
        KeyCode::Char('r') => {
            let events = view_data.favorites.page.dispatch(FavoritesCommand::Mount {
                authenticated: state.is_authenticated(),
            });
            apply_favorites_events(state, runtime, view_data, tx, events);
        }
        _ => {}
    }
}

/// Starts a toggle for the player on the detail card. The outcome reaches
/// the page as `FavoriteToggled` once the request finishes.
fn toggle_detail_favorite<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) -> Vec<FavoritesEvent> {
    if view_data.favorites.toggle_pending.is_some() {
        return Vec::new();
    }
    let FavoritesView::Detail(player) = view_data.favorites.page.view() else {
        return Vec::new();
    };
    let name = player.name.clone();
    let favorited = player.is_favorited;
    let Some(token) = state.token() else {
        return view_data
            .favorites
            .page
            .dispatch(FavoritesCommand::FavoriteToggled {
                name,
                result: Err(ApiError::Unauthenticated),
            });
    };

    let request_id = view_data.next_request_id();
    view_data.favorites.toggle_pending = Some(request_id);
    if let Err(error) =
        runtime.spawn_toggle_favorite(request_id, &name, favorited, token, tx.clone())
    {
        view_data.favorites.toggle_pending = None;
        warn!(player = %name, %error, "favorite toggle not started");
        return vec![FavoritesEvent::Alert(TOGGLE_FAILED_MESSAGE.to_owned())];
    }
    Vec::new()
}

fn handle_mouse_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
    area: Rect,
) {
    if state.route != Route::Search {
        return;
    }
    let body = screen_layout(area)[1];
    let (input_area, _) = search_layout(body);
    let input = &mut view_data.search.input;
    let row = dropdown_row_at(input, input_area, body, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved => {
            if let Some(index) = row {
                input.hover(index);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(name) = row.and_then(|index| input.matches().get(index).cloned()) {
                let event = input.select(name);
                apply_autocomplete_event(state, runtime, view_data, tx, event);
            } else if rect_contains(input_area, mouse.column, mouse.row) {
                input.focus();
            } else {
                input.dismiss();
                input.blur();
            }
        }
        _ => {}
    }
}

fn dropdown_row_at(
    input: &Autocomplete,
    input_area: Rect,
    bounds: Rect,
    column: u16,
    row: u16,
) -> Option<usize> {
    if !input.dropdown_open() {
        return None;
    }
    let area = dropdown_area(input_area, bounds, input.matches().len());
    let inner_top = area.y.saturating_add(1);
    let inner_bottom = area.bottom().saturating_sub(1);
    let inside_columns = column > area.x && column < area.right().saturating_sub(1);
    if !inside_columns || row < inner_top || row >= inner_bottom {
        return None;
    }
    let index = usize::from(row - inner_top);
    (index < input.matches().len()).then_some(index)
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn screen_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area)
}

fn search_layout(area: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    (layout[0], layout[1])
}

/// The dropdown hangs below the input, clipped to the body.
fn dropdown_area(input_area: Rect, bounds: Rect, rows: usize) -> Rect {
    let wanted = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2);
    let available = bounds.bottom().saturating_sub(input_area.bottom());
    Rect::new(
        input_area.x,
        input_area.bottom(),
        input_area.width,
        wanted.min(available),
    )
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = screen_layout(frame.area());

    let authenticated = state.is_authenticated();
    let links = Route::nav_links(authenticated);
    let mut titles = links
        .iter()
        .map(|route| route.label().to_owned())
        .collect::<Vec<String>>();
    if authenticated {
        titles.push("Logout".to_owned());
    }
    let selected = links.iter().position(|route| *route == state.route);
    let highlight = if selected.is_some() {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let brand = match &state.session {
        Some(session) if authenticated => format!("HeatCheck · {}", session.user.display_name()),
        _ => "HeatCheck".to_owned(),
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().title(brand).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(highlight)
        .select(selected.unwrap_or(0));
    frame.render_widget(tabs, layout[0]);

    if state.route == Route::Search {
        render_search(frame, layout[1], view_data);
    } else {
        let body = Paragraph::new(body_text(state, view_data))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(state.route.label()),
            );
        frame.render_widget(body, layout[1]);
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status_widget, layout[2]);
}

fn render_search(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let (input_area, result_area) = search_layout(area);
    let input = &view_data.search.input;

    let cursor = if input.focused() { "_" } else { "" };
    let input_style = if input.focused() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input_widget = Paragraph::new(format!("{}{cursor}", input.query())).block(
        Block::default()
            .title("player name")
            .borders(Borders::ALL)
            .style(input_style),
    );
    frame.render_widget(input_widget, input_area);

    let result = Paragraph::new(render_search_result_text(&view_data.search))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("stats"));
    frame.render_widget(result, result_area);

    if input.dropdown_open() {
        let dropdown = dropdown_area(input_area, area, input.matches().len());
        frame.render_widget(Clear, dropdown);
        let list = Paragraph::new(render_dropdown_text(input))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(list, dropdown);
    }
}

fn body_text(state: &AppState, view_data: &ViewData) -> String {
    match &state.route {
        Route::Landing => render_landing_text(),
        Route::LoginSignup => render_login_text(&view_data.login),
        Route::Home => render_home_text(&view_data.home),
        Route::About => render_about_text(),
        Route::Favorites => render_favorites_text(&view_data.favorites),
        Route::Search => render_search_result_text(&view_data.search),
        Route::Predict => "Coming Soon\n\nGame predictions are on the way.".to_owned(),
        Route::NotFound(path) => format!(
            "404: nothing lives at {path}\n\nPress enter to go back {}.",
            if state.is_authenticated() {
                "home"
            } else {
                "to the start"
            }
        ),
    }
}

fn render_landing_text() -> String {
    [
        "HeatCheck",
        "",
        "Who's hot in the NBA right now?",
        "Track recent scoring, search any player's latest line,",
        "and keep your favorite players one keypress away.",
        "",
        "Press enter to log in or sign up.",
    ]
    .join("\n")
}

fn render_about_text() -> String {
    [
        "About HeatCheck",
        "",
        "HeatCheck compares each player's last five games against their",
        "longer-run averages to spot who is heating up.",
        "",
        "Stats come from the HeatCheck stats service and refresh daily.",
    ]
    .join("\n")
}

fn render_login_text(form: &LoginUiState) -> String {
    let tab = |label: &str, active: bool| {
        if active {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    };
    let mut lines = vec![
        format!(
            "{}  {}",
            tab("Login", form.tab == AuthTab::Login),
            tab("Sign Up", form.tab == AuthTab::SignUp)
        ),
        String::new(),
    ];
    for (index, label) in form.labels().iter().enumerate() {
        let marker = if index == form.field { ">" } else { " " };
        let value = form.value(index);
        let shown = if *label == "Password" {
            "*".repeat(value.chars().count())
        } else {
            value.to_owned()
        };
        let cursor = if index == form.field { "_" } else { "" };
        lines.push(format!("{marker} {label:<9} {shown}{cursor}"));
    }
    if form.pending.is_some() {
        lines.push(String::new());
        let action = match form.tab {
            AuthTab::Login => "Signing in...",
            AuthTab::SignUp => "Creating account...",
        };
        lines.push(action.to_owned());
    } else if let Some(message) = &form.message {
        lines.push(String::new());
        let prefix = if message.is_error { "! " } else { "" };
        lines.push(format!("{prefix}{}", message.text));
    }
    lines.join("\n")
}

fn render_home_text(home: &HomeUiState) -> String {
    let Some(feed) = &home.feed else {
        return if home.pending.is_some() {
            "Loading trending players...".to_owned()
        } else {
            "Press r to load trending players.".to_owned()
        };
    };

    let mut lines = vec!["Top 5 (last 5 games)".to_owned()];
    match &feed.top5 {
        Ok(rows) if rows.is_empty() => lines.push(format!("  {NO_PLAYER_DATA}")),
        Ok(rows) => {
            for (index, stats) in rows.iter().enumerate() {
                lines.push(format!(
                    "  {}. {:<26} {:>5} PPG   {}",
                    index + 1,
                    stats.player_name().unwrap_or(NOT_AVAILABLE),
                    format_card_stat(stats.get("PTS_AVG_LAST_5")),
                    game_date_text(stats),
                ));
            }
        }
        Err(error) => lines.push(format!("  {}", error.user_message())),
    }

    lines.push(String::new());
    lines.push("Heating up".to_owned());
    match &feed.heating_up {
        Ok(rows) if rows.is_empty() => lines.push(format!("  {NO_TRENDING}")),
        Ok(rows) => {
            for stats in rows {
                let trend = heat_up(stats);
                lines.push(format!(
                    "  {:<26} L5 {:>5.1}  L20 {:>5.1}  {:>6}  {}",
                    stats.player_name().unwrap_or(NOT_AVAILABLE),
                    trend.last5,
                    trend.last20,
                    trend.improvement_label(),
                    tier_label(trend.tier),
                ));
            }
        }
        Err(error) => lines.push(format!("  {}", error.user_message())),
    }
    lines.join("\n")
}

const fn tier_label(tier: HeatTier) -> &'static str {
    match tier {
        HeatTier::Hot => "hot",
        HeatTier::Warm => "warm",
        HeatTier::Mild => "mild",
    }
}

fn game_date_text(stats: &PlayerStats) -> String {
    stats
        .get(KEY_GAME_DATE)
        .map_or_else(|| NOT_AVAILABLE.to_owned(), |value| format_stat(KEY_GAME_DATE, value))
}

fn render_dropdown_text(input: &Autocomplete) -> String {
    input
        .matches()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if input.highlight() == Some(index) {
                format!("> {name}")
            } else {
                format!("  {name}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_search_result_text(search: &SearchUiState) -> String {
    if search.pending.is_some() {
        return "Loading...".to_owned();
    }
    if let Some(error) = &search.error {
        return error.clone();
    }
    match &search.card {
        Some(card) => render_stat_card_text(&card.name, &card.stats, card.favorited),
        None => "Type a player name and press enter.".to_owned(),
    }
}

fn render_stat_card_text(name: &str, stats: &PlayerStats, favorited: bool) -> String {
    let star = if favorited {
        "★ favorite"
    } else {
        "☆ not a favorite"
    };
    let sheet = stat_sheet(stats);
    let mut lines = vec![format!("{name}   {star}")];
    for (title, rows) in [
        ("General", &sheet.general),
        ("Averages", &sheet.averages),
        ("Other", &sheet.other),
    ] {
        if rows.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_owned());
        for row in rows {
            lines.push(format!("  {:<22} {}", row.label, row.value));
        }
    }
    lines.join("\n")
}

fn render_favorites_text(ui: &FavoritesUiState) -> String {
    match ui.page.view() {
        FavoritesView::Loading => "Loading favorites...".to_owned(),
        FavoritesView::Error(message) => message.to_owned(),
        FavoritesView::Empty => {
            "No favorite players yet. Star players from the Search screen.".to_owned()
        }
        FavoritesView::NotFound(name) => {
            format!("Player {name} is not in your favorites.\n\nPress esc to go back.")
        }
        FavoritesView::Detail(player) => {
            let mut text = render_stat_card_text(&player.name, &player.stats, player.is_favorited);
            if player.error {
                text.push_str("\n\nStats could not be loaded for this player.");
            }
            text
        }
        FavoritesView::List(players) => {
            let cursor = if ui.filter_focused { "_" } else { "" };
            let mut lines = vec![format!("Filter: {}{cursor}", ui.page.filter()), String::new()];
            if players.is_empty() {
                lines.push("No favorites match the filter.".to_owned());
            }
            for (index, player) in players.iter().enumerate() {
                lines.push(render_favorite_row(player, index == ui.cursor));
            }
            if ui.page.is_transitioning() {
                lines.push(String::new());
                lines.push("Opening player stats...".to_owned());
            }
            lines.join("\n")
        }
    }
}

fn render_favorite_row(player: &FavoritePlayer, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let stats = &player.stats;
    let mut row = format!(
        "{marker} {:<26} {:<13} PTS {:>5}  MIN {:>5}  L5 {:>5}",
        player.name,
        game_date_text(stats),
        format_card_stat(stats.get("PTS")),
        format_card_stat(stats.get("MIN")),
        format_card_stat(stats.get("PTS_AVG_LAST_5_USER")),
    );
    if player.error {
        row.push_str("  (stats unavailable)");
    }
    if !player.is_favorited {
        row.push_str("  (removed)");
    }
    row
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let screen = state.route.label().to_uppercase();
    let hints = route_hints(state, view_data);
    let nav = if state.is_authenticated() {
        "ctrl+n/p nav | ctrl+b home | ctrl+l logout | ctrl+q"
    } else {
        "ctrl+n/p nav | ctrl+b home | ctrl+q"
    };
    let default = if hints.is_empty() {
        nav.to_owned()
    } else {
        format!("{hints} | {nav}")
    };
    match &state.status_line {
        Some(status) => format!("{screen} | {status} | {default}"),
        None => format!("{screen} | {default}"),
    }
}

fn route_hints(state: &AppState, view_data: &ViewData) -> &'static str {
    match &state.route {
        Route::Landing => "enter get started",
        Route::LoginSignup => "←/→ login/sign up | tab field | enter submit",
        Route::Home => "r reload",
        Route::Search => {
            if view_data.search.input.dropdown_open() {
                "↑/↓ pick | enter choose | esc close"
            } else {
                "type a name | enter look up | tab focus | ctrl+s star"
            }
        }
        Route::Favorites => {
            let ui = &view_data.favorites;
            if ui.page.selected().is_some() {
                "esc back | f favorite"
            } else if ui.filter_focused {
                "type to filter | enter done"
            } else {
                "j/k move | enter stats | / filter | r reload"
            }
        }
        Route::NotFound(_) => "enter home",
        Route::About | Route::Predict => "",
    }
}
