// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ERROR_LOADING, KEY_GAME_DATE, KEY_PLAYER_NAME, NOT_AVAILABLE, PlayerStats};
use serde_json::Value;
use time::Date;
use time::macros::format_description;

pub const INVALID_DATE: &str = "Invalid date";

const KEY_ORDER: [&str; 12] = [
    "GAME_DATE",
    "IS_HOME",
    "DAYS_REST",
    "GAME_NUMBER_IN_SEASON",
    "MIN",
    "PTS",
    "FG_PCT",
    "PLUS_MINUS",
    "AVG_MIN_LAST_5_USER",
    "PTS_AVG_LAST_5_USER",
    "PTS_AVG_LAST_10_USER",
    "PTS_AVG_LAST_20_USER",
];
const GENERAL_KEYS: [&str; 8] = [
    "GAME_DATE",
    "IS_HOME",
    "DAYS_REST",
    "GAME_NUMBER_IN_SEASON",
    "MIN",
    "PTS",
    "FG_PCT",
    "PLUS_MINUS",
];
const AVERAGE_KEYS: [&str; 4] = [
    "AVG_MIN_LAST_5_USER",
    "PTS_AVG_LAST_5_USER",
    "PTS_AVG_LAST_10_USER",
    "PTS_AVG_LAST_20_USER",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// A stat payload formatted for the player card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatSheet {
    pub general: Vec<StatRow>,
    pub averages: Vec<StatRow>,
    pub other: Vec<StatRow>,
}

impl StatSheet {
    pub fn row(&self, key: &str) -> Option<&StatRow> {
        self.general
            .iter()
            .chain(&self.averages)
            .chain(&self.other)
            .find(|row| row.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.averages.is_empty() && self.other.is_empty()
    }
}

/// Formats and groups every stat except the player name, which titles the
/// card. Known keys come first in a fixed order, the rest alphabetically.
pub fn stat_sheet(stats: &PlayerStats) -> StatSheet {
    let mut keys: Vec<&String> = stats
        .fields()
        .map(|(key, _)| key)
        .filter(|key| key.as_str() != KEY_PLAYER_NAME)
        .collect();
    keys.sort_by(|left, right| {
        let rank = |key: &str| KEY_ORDER.iter().position(|known| *known == key);
        match (rank(left), rank(right)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => left.cmp(right),
        }
    });

    let mut sheet = StatSheet::default();
    for key in keys {
        let Some(value) = stats.get(key) else {
            continue;
        };
        let row = StatRow {
            key: key.clone(),
            label: stat_label(key),
            value: format_stat(key, value),
        };
        if GENERAL_KEYS.contains(&key.as_str()) {
            sheet.general.push(row);
        } else if AVERAGE_KEYS.contains(&key.as_str()) {
            sheet.averages.push(row);
        } else {
            sheet.other.push(row);
        }
    }
    sheet
}

pub fn stat_label(key: &str) -> String {
    let known = match key {
        "GAME_DATE" => "Most Recent Game",
        "FG_PCT" => "Field Goal %",
        "IS_HOME" => "Home Game?",
        "PTS" => "Points Scored",
        "AVG_MIN_LAST_5_USER" => "Avg Minutes (Last 5)",
        "PTS_AVG_LAST_5_USER" => "PPG (Last 5)",
        "PTS_AVG_LAST_10_USER" => "PPG (Last 10)",
        "PTS_AVG_LAST_20_USER" => "PPG (Last 20)",
        "DAYS_REST" => "Days of Rest",
        "GAME_NUMBER_IN_SEASON" => "Game No.",
        "MIN" => "Minutes Played",
        "PLUS_MINUS" => "+/-",
        _ => return humanize_key(key),
    };
    known.to_owned()
}

/// `REB_AVG_LAST_5_USER` -> `Reb Avg Last 5`.
fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty() && *word != "USER")
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_stat(key: &str, value: &Value) -> String {
    match key {
        KEY_GAME_DATE => match value {
            Value::String(text) => format_game_date(text),
            Value::Null => NOT_AVAILABLE.to_owned(),
            other => format_game_date(&plain_text(other)),
        },
        "FG_PCT" => value
            .as_f64()
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |pct| format!("{:.1}%", pct * 100.0)),
        "IS_HOME" => match value.as_f64() {
            Some(flag) if flag == 1.0 => "Yes".to_owned(),
            Some(flag) if flag == 0.0 => "No".to_owned(),
            _ => NOT_AVAILABLE.to_owned(),
        },
        _ if key.contains("AVG") || key == "PTS" || key == "MIN" => value
            .as_f64()
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |number| format!("{number:.1}")),
        "PLUS_MINUS" => match value.as_f64() {
            Some(number) if number > 0.0 => format!("+{}", plain_number(number)),
            Some(number) => plain_number(number),
            None => NOT_AVAILABLE.to_owned(),
        },
        _ => plain_text(value),
    }
}

/// `2023-05-10` -> `May 10, 2023`. Placeholder values pass through.
pub fn format_game_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw == NOT_AVAILABLE || raw == ERROR_LOADING {
        return raw.to_owned();
    }
    let Some(day) = raw.get(..10) else {
        return INVALID_DATE.to_owned();
    };
    let Ok(date) = Date::parse(day, format_description!("[year]-[month]-[day]")) else {
        return INVALID_DATE.to_owned();
    };
    date.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| INVALID_DATE.to_owned())
}

/// Numbers get one decimal; anything else is shown as-is.
pub fn format_card_stat(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(number)) => number
            .as_f64()
            .map_or_else(|| number.to_string(), |number| format!("{number:.1}")),
        Some(other) => plain_text(other),
        None => NOT_AVAILABLE.to_owned(),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_owned(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number
            .as_f64()
            .map_or_else(|| number.to_string(), plain_number),
        other => other.to_string(),
    }
}

fn plain_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatTier {
    Hot,
    Warm,
    Mild,
}

impl HeatTier {
    pub fn for_improvement(improvement: f64) -> Self {
        if improvement > 6.0 {
            Self::Hot
        } else if improvement >= 4.5 {
            Self::Warm
        } else {
            Self::Mild
        }
    }
}

/// Scoring trend for a heat-up card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatUp {
    pub last5: f64,
    pub last20: f64,
    pub improvement: f64,
    pub tier: HeatTier,
}

impl HeatUp {
    /// `+4.2` when improving, `-1.0` otherwise.
    pub fn improvement_label(&self) -> String {
        if self.improvement > 0.0 {
            format!("+{:.1}", self.improvement)
        } else {
            format!("{:.1}", self.improvement)
        }
    }
}

/// Non-numeric averages count as zero.
pub fn heat_up(stats: &PlayerStats) -> HeatUp {
    let last5 = stats.number("PTS_AVG_LAST_5").unwrap_or(0.0);
    let last20 = stats.number("PTS_AVG_LAST_20").unwrap_or(0.0);
    let improvement = last5 - last20;
    HeatUp {
        last5,
        last20,
        improvement,
        tier: HeatTier::for_improvement(improvement),
    }
}
