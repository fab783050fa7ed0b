// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Incremental player-name search with a keyboard-driven dropdown.
//!
//! Matching is a case-insensitive substring test over the candidate list.
//! Matches keep candidate order and are cut at [`MAX_MATCHES`]. The dropdown
//! only opens for text the user typed: once a name is selected or the query
//! is submitted, recomputing matches leaves it closed.

pub const MAX_MATCHES: usize = 10;

/// Where the last change to the query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    Typing,
    Selected,
}

/// What `submit` does when the query is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Emit the raw query to the caller.
    Emit,
    /// No submit handler: select the first match, if any.
    SelectFirstMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    Selected(String),
    Submitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autocomplete {
    candidates: Vec<String>,
    query: String,
    matches: Vec<String>,
    highlight: Option<usize>,
    origin: InputOrigin,
    dropdown_open: bool,
    focused: bool,
    submit_mode: SubmitMode,
}

impl Autocomplete {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            query: String::new(),
            matches: Vec::new(),
            highlight: None,
            origin: InputOrigin::Typing,
            dropdown_open: false,
            focused: false,
            submit_mode: SubmitMode::Emit,
        }
    }

    pub fn with_submit_mode(mut self, mode: SubmitMode) -> Self {
        self.submit_mode = mode;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    /// `None` means nothing is highlighted.
    pub const fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlight
            .and_then(|index| self.matches.get(index))
            .map(String::as_str)
    }

    pub const fn origin(&self) -> InputOrigin {
        self.origin
    }

    pub const fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
        self.refresh_matches();
    }

    /// Replaces the query as if the user typed it.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.origin = InputOrigin::Typing;
        self.focused = true;
        self.refresh_matches();
    }

    pub fn push_char(&mut self, ch: char) {
        let mut text = std::mem::take(&mut self.query);
        text.push(ch);
        self.set_query(text);
    }

    pub fn pop_char(&mut self) {
        let mut text = std::mem::take(&mut self.query);
        text.pop();
        self.set_query(text);
    }

    pub fn clear(&mut self) {
        self.set_query(String::new());
    }

    /// Re-runs the filter for the current query and candidates.
    pub fn refresh_matches(&mut self) {
        self.matches = filter_candidates(&self.candidates, &self.query);
        self.dropdown_open = self.origin == InputOrigin::Typing && !self.matches.is_empty();
        self.highlight = None;
    }

    /// Keys are ignored while the dropdown is closed.
    pub fn handle_key(&mut self, key: AutocompleteKey) -> Option<AutocompleteEvent> {
        if !self.dropdown_open {
            return None;
        }

        match key {
            AutocompleteKey::Down => {
                let last = self.matches.len().saturating_sub(1);
                self.highlight = Some(match self.highlight {
                    None => 0,
                    Some(index) => (index + 1).min(last),
                });
                None
            }
            AutocompleteKey::Up => {
                self.highlight = Some(self.highlight.map_or(0, |index| index.saturating_sub(1)));
                None
            }
            AutocompleteKey::Enter => {
                let name = self.highlighted()?.to_owned();
                Some(self.select(name))
            }
            AutocompleteKey::Escape => {
                self.dropdown_open = false;
                None
            }
        }
    }

    pub fn select(&mut self, name: impl Into<String>) -> AutocompleteEvent {
        let name = name.into();
        self.query = name.clone();
        self.origin = InputOrigin::Selected;
        self.dropdown_open = false;
        self.focused = false;
        self.refresh_matches();
        AutocompleteEvent::Selected(name)
    }

    pub fn submit(&mut self) -> Option<AutocompleteEvent> {
        self.dropdown_open = false;
        self.focused = false;
        match self.submit_mode {
            SubmitMode::Emit => {
                self.origin = InputOrigin::Selected;
                Some(AutocompleteEvent::Submitted(self.query.clone()))
            }
            SubmitMode::SelectFirstMatch => {
                if self.query.trim().is_empty() {
                    return None;
                }
                let first = self.matches.first()?.clone();
                Some(self.select(first))
            }
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        if !self.query.trim().is_empty() && !self.matches.is_empty() {
            self.origin = InputOrigin::Typing;
            self.dropdown_open = true;
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// An interaction landed outside the input and the dropdown.
    pub fn dismiss(&mut self) {
        self.dropdown_open = false;
    }

    pub fn hover(&mut self, index: usize) {
        if self.dropdown_open && index < self.matches.len() {
            self.highlight = Some(index);
        }
    }
}

pub fn filter_candidates(candidates: &[String], query: &str) -> Vec<String> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .take(MAX_MATCHES)
        .cloned()
        .collect()
}
