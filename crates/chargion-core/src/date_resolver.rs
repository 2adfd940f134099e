// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of ChargION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{Datelike, Duration, NaiveDate};

/// Relative phrases with their day offsets, longest phrase first.
/// "day before yesterday" must be checked before "yesterday" (which it
/// contains), same for "day after tomorrow" and "tomorrow".
const RELATIVE_PHRASES: &[(&str, i64)] = &[
    ("day before yesterday", -2),
    ("yesterday", -1),
    ("day after tomorrow", 2),
    ("tomorrow", 1),
    ("today", 0),
];

/// Explicit date formats, day-before-month first to keep inputs like
/// "05-06-2025" on the day-first convention. Two-digit-year forms come
/// before their four-digit twins: %y rejects a four-digit year outright,
/// while %Y would happily read "25" as the year 25 AD.
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%y",
    "%d/%m/%y",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Resolve a free-form date expression against a reference date.
///
/// Strategies are tried in fixed priority order, first hit wins:
/// relative keywords ("tomorrow"), weekday expressions ("next monday"),
/// explicit dates ("15-11-2025"). Returns `None` when nothing date-like is
/// found; the default policy for that case belongs to the caller.
pub fn resolve(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let lowered = text.to_lowercase();
    parse_relative(&lowered, reference)
        .or_else(|| parse_weekday(&lowered, reference))
        .or_else(|| parse_explicit(&lowered, reference))
}

fn parse_relative(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    RELATIVE_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, offset)| reference + Duration::days(*offset))
}

/// Monday=0 .. Sunday=6, matching full English weekday names
fn weekday_index(word: &str) -> Option<i64> {
    let idx = match word {
        "monday" => 0,
        "tuesday" => 1,
        "wednesday" => 2,
        "thursday" => 3,
        "friday" => 4,
        "saturday" => 5,
        "sunday" => 6,
        _ => return None,
    };
    Some(idx)
}

fn parse_weekday(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let today = i64::from(reference.weekday().num_days_from_monday());

    // Qualified form first: "next monday", "last friday", "this sunday"
    for pair in words.windows(2) {
        let [qualifier, day] = pair else { continue };
        let Some(target) = weekday_index(day) else {
            continue;
        };
        match *qualifier {
            "next" => {
                // "next monday" on a Monday means +7, never today
                let mut diff = (target - today).rem_euclid(7);
                if diff == 0 {
                    diff = 7;
                }
                return Some(reference + Duration::days(diff));
            }
            "last" => {
                let mut diff = (today - target).rem_euclid(7);
                if diff == 0 {
                    diff = 7;
                }
                return Some(reference - Duration::days(diff));
            }
            "this" => {
                // Same-day allowed: "this monday" on a Monday is today
                let diff = (target - today).rem_euclid(7);
                return Some(reference + Duration::days(diff));
            }
            _ => {}
        }
    }

    // Bare form: "(on) monday" resolves to the next occurrence, today included
    for word in &words {
        if let Some(target) = weekday_index(word) {
            let diff = (target - today).rem_euclid(7);
            return Some(reference + Duration::days(diff));
        }
    }

    None
}

fn parse_explicit(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| {
            let cleaned = t
                .trim_matches(|c: char| matches!(c, ',' | '?' | '!' | ';' | ':'))
                .trim_end_matches('.');
            strip_ordinal(cleaned).to_owned()
        })
        // "of" is filler in dates like "15th of november"
        .filter(|t| !t.is_empty() && t != "of")
        .collect();

    // Single tokens ("15-11-2025"), then 2- and 3-token windows
    // ("15 nov 2025"); a candidate without a digit can never be a date
    for width in 1..=3 {
        for window in tokens.windows(width) {
            let candidate = window.join(" ");
            if !candidate.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(&candidate, format) {
                    return Some(date);
                }
            }
        }
    }

    // Year-less month-name dates ("15 november", "november 15") take the
    // reference date's year
    for window in tokens.windows(2) {
        let candidate = window.join(" ");
        if !candidate.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        let with_year = format!("{candidate} {}", reference.year());
        for format in ["%d %B %Y", "%d %b %Y", "%B %d %Y", "%b %d %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
                return Some(date);
            }
        }
    }

    None
}

/// Drop an ordinal suffix from a day number: "15th" → "15"
fn strip_ordinal(token: &str) -> &str {
    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits > 0 && matches!(token.get(digits..), Some("st" | "nd" | "rd" | "th")) {
        token.get(..digits).unwrap_or(token)
    } else {
        token
    }
}
