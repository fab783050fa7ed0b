// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

static GUEST_LINKS: [Route; 2] = [Route::LoginSignup, Route::About];
static USER_LINKS: [Route; 5] = [
    Route::Home,
    Route::Search,
    Route::Favorites,
    Route::Predict,
    Route::About,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    LoginSignup,
    Home,
    About,
    Favorites,
    Search,
    Predict,
    NotFound(String),
}

impl Route {
    pub const KNOWN: [Self; 7] = [
        Self::Landing,
        Self::LoginSignup,
        Self::Home,
        Self::About,
        Self::Favorites,
        Self::Search,
        Self::Predict,
    ];

    /// Unknown paths resolve to the not-found screen.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "/" | "" => Self::Landing,
            "/login_signup" => Self::LoginSignup,
            "/home_page" => Self::Home,
            "/about" => Self::About,
            "/favorites" => Self::Favorites,
            "/search_page" => Self::Search,
            "/predict_page" => Self::Predict,
            _ => Self::NotFound(trimmed.to_owned()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Landing => "/",
            Self::LoginSignup => "/login_signup",
            Self::Home => "/home_page",
            Self::About => "/about",
            Self::Favorites => "/favorites",
            Self::Search => "/search_page",
            Self::Predict => "/predict_page",
            Self::NotFound(path) => path,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Landing => "HeatCheck",
            Self::LoginSignup => "Login",
            Self::Home => "Home",
            Self::About => "About",
            Self::Favorites => "Favorites",
            Self::Search => "Search",
            Self::Predict => "Predict",
            Self::NotFound(_) => "Not Found",
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Navigation links for the current auth state, in display order.
    pub fn nav_links(authenticated: bool) -> &'static [Self] {
        if authenticated {
            &USER_LINKS
        } else {
            &GUEST_LINKS
        }
    }

    /// Where the brand link and the not-found "home" link point.
    pub const fn home_for(authenticated: bool) -> Self {
        if authenticated {
            Self::Home
        } else {
            Self::Landing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn known_paths_round_trip() {
        for route in Route::KNOWN {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn unknown_paths_map_to_not_found() {
        let route = Route::parse("/feature1_guest");
        assert_eq!(route, Route::NotFound("/feature1_guest".to_owned()));
        assert!(route.is_not_found());
        assert_eq!(route.path(), "/feature1_guest");
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        assert_eq!(Route::parse("/favorites/"), Route::Favorites);
        assert_eq!(Route::parse("/"), Route::Landing);
    }

    #[test]
    fn nav_links_depend_on_auth() {
        assert!(Route::nav_links(false).contains(&Route::LoginSignup));
        assert!(!Route::nav_links(false).contains(&Route::Favorites));
        assert!(Route::nav_links(true).contains(&Route::Favorites));
        assert!(!Route::nav_links(true).contains(&Route::LoginSignup));
    }

    #[test]
    fn home_link_follows_auth() {
        assert_eq!(Route::home_for(true), Route::Home);
        assert_eq!(Route::home_for(false), Route::Landing);
    }
}
