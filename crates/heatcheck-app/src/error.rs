// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failures reported by the remote collaborators.
///
/// Values are plain strings so results can cross thread and channel
/// boundaries and be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Bad credentials or a signup conflict. Shown inline on the form.
    #[error("{0}")]
    Auth(String),
    /// Transport failure. Shown as a page-level banner.
    #[error("cannot reach {url} ({message})")]
    Network { url: String, message: String },
    /// No stats exist for the requested player.
    #[error("no stats found for {0}")]
    NotFound(String),
    /// Non-success status with the backend's message.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    /// No session token at fetch time.
    #[error("not logged in")]
    Unauthenticated,
}

impl ApiError {
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Plain-language text for banners and inline messages.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) | Self::Api { message, .. } => message.clone(),
            Self::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            Self::NotFound(name) => format!("No stats found for {name}."),
            Self::Decode { .. } => "The server sent a response we could not read.".to_owned(),
            Self::Unauthenticated => "Please log in to continue.".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn user_message_prefers_backend_text() {
        let error = ApiError::Api {
            status: 409,
            message: "Player already in favorites".to_owned(),
        };
        assert_eq!(error.user_message(), "Player already in favorites");
        assert_eq!(error.to_string(), "Player already in favorites");
    }

    #[test]
    fn network_errors_hide_transport_details_from_users() {
        let error = ApiError::Network {
            url: "http://127.0.0.1:1".to_owned(),
            message: "connection refused".to_owned(),
        };
        assert!(error.is_network());
        assert!(!error.user_message().contains("refused"));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn not_found_names_the_player() {
        let error = ApiError::NotFound("Ja Morant".to_owned());
        assert!(error.is_not_found());
        assert_eq!(error.user_message(), "No stats found for Ja Morant.");
    }
}
